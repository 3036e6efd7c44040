//! Operators describe what a node computes.
//!
//! An [`Operator`] is an immutable descriptor made of an [`Opcode`], a set of
//! [`Properties`], the declared arity of every input zone and output kind, and
//! an optional typed [`OpParameter`]. Operators are values; nodes own a copy.
//! Two operators are equal when their opcode and parameter are equal.
pub mod common;
pub mod machine;
pub mod simplified;

use std::{fmt, ops, sync::Arc};

pub use common::{BailoutId, CommonOperatorBuilder, FrameStateCallInfo, OutputFrameStateCombine};
pub use machine::MachineOperatorBuilder;
pub use simplified::SimplifiedOperatorBuilder;

use crate::{
    linkage::CallDescriptor,
    machine_type::MachineType,
    value::{ExternalReference, HeapObject},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    // Control.
    Start,
    Dead,
    End,
    Branch,
    IfTrue,
    IfFalse,
    Throw,
    Return,
    Merge,
    Loop,

    // Common values and structure.
    Parameter,
    Int32Constant,
    Int64Constant,
    Float64Constant,
    ExternalConstant,
    NumberConstant,
    HeapConstant,
    Phi,
    EffectPhi,
    ControlEffect,
    ValueEffect,
    Finish,
    StateValues,
    FrameState,
    Call,
    Projection,

    // Simplified.
    BooleanNot,
    NumberEqual,
    NumberLessThan,
    NumberLessThanOrEqual,
    NumberAdd,
    NumberSubtract,
    NumberMultiply,
    NumberDivide,
    NumberModulus,
    ChangeTaggedToInt32,
    ChangeTaggedToUint32,
    ChangeTaggedToFloat64,
    ChangeInt32ToTagged,
    ChangeUint32ToTagged,
    ChangeFloat64ToTagged,
    ChangeBoolToBit,
    ChangeBitToBool,

    // Machine.
    Load,
    Store,
    Int32Add,
    Int32Sub,
    Int32Mul,
    Word32Equal,
    Int32LessThan,
    Int32LessThanOrEqual,
    Uint32LessThan,
    Uint32LessThanOrEqual,
    Float64Add,
    Float64Sub,
    Float64Mul,
    Float64Div,
    Float64Mod,
    Float64Equal,
    Float64LessThan,
    Float64LessThanOrEqual,
    ChangeInt32ToFloat64,
    ChangeUint32ToFloat64,
    ChangeFloat64ToInt32,
    ChangeFloat64ToUint32,
}

impl Opcode {
    pub fn is_control(self) -> bool {
        matches!(
            self,
            Self::Start
                | Self::Dead
                | Self::End
                | Self::Branch
                | Self::IfTrue
                | Self::IfFalse
                | Self::Throw
                | Self::Return
                | Self::Merge
                | Self::Loop
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Properties(u8);

impl Properties {
    pub const NO_PROPERTIES: Self = Self(0);
    pub const COMMUTATIVE: Self = Self(1 << 0);
    pub const ASSOCIATIVE: Self = Self(1 << 1);
    pub const IDEMPOTENT: Self = Self(1 << 2);
    pub const NO_READ: Self = Self(1 << 3);
    pub const NO_WRITE: Self = Self(1 << 4);
    pub const NO_THROW: Self = Self(1 << 5);

    /// Neither reads nor writes; nodes with equal inputs may be merged.
    pub const FOLDABLE: Self = Self(Self::NO_READ.0 | Self::NO_WRITE.0);
    pub const ELIMINATABLE: Self = Self(Self::NO_WRITE.0 | Self::NO_THROW.0);
    /// No side effect at all, and foldable under identical inputs.
    pub const PURE: Self =
        Self(Self::NO_READ.0 | Self::NO_WRITE.0 | Self::NO_THROW.0 | Self::IDEMPOTENT.0);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn has_side_effect(self) -> bool {
        !self.contains(Self::NO_WRITE)
    }
}

impl ops::BitOr for Properties {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Properties({:#08b})", self.0)
    }
}

/// Declared number of inputs per zone and of outputs per kind.
///
/// Inputs of a node are laid out contiguously as
/// `[values, context, frame state, effects, control]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Arity {
    pub value_in: usize,
    pub context_in: usize,
    pub frame_state_in: usize,
    pub effect_in: usize,
    pub control_in: usize,
    pub value_out: usize,
    pub effect_out: usize,
    pub control_out: usize,
}

impl Arity {
    pub const NONE: Self = Self {
        value_in: 0,
        context_in: 0,
        frame_state_in: 0,
        effect_in: 0,
        control_in: 0,
        value_out: 0,
        effect_out: 0,
        control_out: 0,
    };

    /// A pure value computation.
    pub const fn pure(value_in: usize, value_out: usize) -> Self {
        Self {
            value_in,
            value_out,
            ..Self::NONE
        }
    }

    pub const fn input_count(&self) -> usize {
        self.value_in + self.context_in + self.frame_state_in + self.effect_in + self.control_in
    }
}

#[derive(Debug, Clone)]
pub enum OpParameter {
    None,
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Index(usize),
    MachineType(MachineType),
    FrameState(FrameStateCallInfo),
    Call(Arc<CallDescriptor>),
    Heap(HeapObject),
    External(ExternalReference),
}

impl PartialEq for OpParameter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Int32(lhs), Self::Int32(rhs)) => lhs == rhs,
            (Self::Int64(lhs), Self::Int64(rhs)) => lhs == rhs,
            (Self::Float64(lhs), Self::Float64(rhs)) => lhs.to_bits() == rhs.to_bits(),
            (Self::Index(lhs), Self::Index(rhs)) => lhs == rhs,
            (Self::MachineType(lhs), Self::MachineType(rhs)) => lhs == rhs,
            (Self::FrameState(lhs), Self::FrameState(rhs)) => lhs == rhs,
            (Self::Call(lhs), Self::Call(rhs)) => Arc::ptr_eq(lhs, rhs) || lhs == rhs,
            (Self::Heap(lhs), Self::Heap(rhs)) => lhs == rhs,
            (Self::External(lhs), Self::External(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl Eq for OpParameter {}

impl fmt::Display for OpParameter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Int32(v) => write!(f, "[{v}]"),
            Self::Int64(v) => write!(f, "[{v}]"),
            Self::Float64(v) => write!(f, "[{v}]"),
            Self::Index(v) => write!(f, "[{v}]"),
            Self::MachineType(ty) => write!(f, "[{ty}]"),
            Self::FrameState(info) => write!(f, "[{info}]"),
            Self::Call(desc) => write!(f, "[{desc}]"),
            Self::Heap(obj) => write!(f, "[{obj}]"),
            Self::External(ext) => write!(f, "[{ext}]"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Operator {
    opcode: Opcode,
    properties: Properties,
    mnemonic: &'static str,
    arity: Arity,
    param: OpParameter,
}

impl Operator {
    pub fn new(
        opcode: Opcode,
        properties: Properties,
        mnemonic: &'static str,
        arity: Arity,
        param: OpParameter,
    ) -> Self {
        Self {
            opcode,
            properties,
            mnemonic,
            arity,
            param,
        }
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn properties(&self) -> Properties {
        self.properties
    }

    pub fn mnemonic(&self) -> &'static str {
        self.mnemonic
    }

    pub fn arity(&self) -> &Arity {
        &self.arity
    }

    pub fn param(&self) -> &OpParameter {
        &self.param
    }

    pub fn is_pure(&self) -> bool {
        self.properties.contains(Properties::PURE)
    }

    pub fn has_side_effect(&self) -> bool {
        self.properties.has_side_effect()
    }

    pub fn value_input_count(&self) -> usize {
        self.arity.value_in
    }

    pub fn context_input_count(&self) -> usize {
        self.arity.context_in
    }

    pub fn frame_state_input_count(&self) -> usize {
        self.arity.frame_state_in
    }

    pub fn effect_input_count(&self) -> usize {
        self.arity.effect_in
    }

    pub fn control_input_count(&self) -> usize {
        self.arity.control_in
    }

    pub fn input_count(&self) -> usize {
        self.arity.input_count()
    }

    pub fn value_output_count(&self) -> usize {
        self.arity.value_out
    }

    pub fn effect_output_count(&self) -> usize {
        self.arity.effect_out
    }

    pub fn control_output_count(&self) -> usize {
        self.arity.control_out
    }

    pub fn has_context_input(&self) -> bool {
        self.arity.context_in > 0
    }

    pub fn has_frame_state_input(&self) -> bool {
        self.arity.frame_state_in > 0
    }

    pub fn has_effect_input(&self) -> bool {
        self.arity.effect_in > 0
    }

    pub fn has_control_output(&self) -> bool {
        self.arity.control_out > 0
    }

    pub fn int32_param(&self) -> i32 {
        match self.param {
            OpParameter::Int32(v) => v,
            _ => panic!("{} has no int32 parameter", self.mnemonic),
        }
    }

    pub fn int64_param(&self) -> i64 {
        match self.param {
            OpParameter::Int64(v) => v,
            _ => panic!("{} has no int64 parameter", self.mnemonic),
        }
    }

    pub fn float64_param(&self) -> f64 {
        match self.param {
            OpParameter::Float64(v) => v,
            _ => panic!("{} has no float64 parameter", self.mnemonic),
        }
    }

    pub fn index_param(&self) -> usize {
        match self.param {
            OpParameter::Index(v) => v,
            _ => panic!("{} has no index parameter", self.mnemonic),
        }
    }

    pub fn machine_type_param(&self) -> MachineType {
        match self.param {
            OpParameter::MachineType(ty) => ty,
            _ => panic!("{} has no machine type parameter", self.mnemonic),
        }
    }

    pub fn heap_param(&self) -> HeapObject {
        match self.param {
            OpParameter::Heap(obj) => obj,
            _ => panic!("{} has no heap object parameter", self.mnemonic),
        }
    }

    pub fn frame_state_param(&self) -> FrameStateCallInfo {
        match self.param {
            OpParameter::FrameState(info) => info,
            _ => panic!("{} has no frame state parameter", self.mnemonic),
        }
    }

    pub fn call_descriptor(&self) -> &CallDescriptor {
        match &self.param {
            OpParameter::Call(desc) => desc,
            _ => panic!("{} has no call descriptor", self.mnemonic),
        }
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.opcode == other.opcode && self.param == other.param
    }
}

impl Eq for Operator {}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.mnemonic, self.param)
    }
}
