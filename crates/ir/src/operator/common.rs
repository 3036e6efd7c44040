//! Operators shared by every level of the IR: control structure, constants,
//! phis, effect plumbing, frame states and calls.
use std::{fmt, sync::Arc};

use super::{Arity, OpParameter, Opcode, Operator, Properties};
use crate::{
    linkage::CallDescriptor,
    machine_type::MachineType,
    value::{ExternalReference, HeapObject},
};

/// Identifies the bytecode position execution resumes at after a bailout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BailoutId(pub u32);

/// How the output of a node is combined with the captured environment to
/// obtain the frame state for a lazy bailout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFrameStateCombine {
    /// Push the output onto the expression stack before resuming.
    PushOutput,
    /// Resume with the captured environment as is.
    IgnoreOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameStateCallInfo {
    pub bailout_id: BailoutId,
    pub state_combine: OutputFrameStateCombine,
}

impl FrameStateCallInfo {
    pub fn new(bailout_id: BailoutId, state_combine: OutputFrameStateCombine) -> Self {
        Self {
            bailout_id,
            state_combine,
        }
    }
}

impl fmt::Display for FrameStateCallInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let combine = match self.state_combine {
            OutputFrameStateCombine::PushOutput => "push",
            OutputFrameStateCombine::IgnoreOutput => "ignore",
        };
        write!(f, "bailout {}, {combine}", self.bailout_id.0)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CommonOperatorBuilder;

impl CommonOperatorBuilder {
    pub fn new() -> Self {
        Self
    }

    /// The graph entry. Besides the formal parameters, it produces the
    /// context, the receiver and the function object.
    pub fn start(&self, num_formal_parameters: usize) -> Operator {
        let arity = Arity {
            value_out: num_formal_parameters + 3,
            effect_out: 1,
            control_out: 1,
            ..Arity::NONE
        };
        Operator::new(
            Opcode::Start,
            Properties::FOLDABLE,
            "Start",
            arity,
            OpParameter::None,
        )
    }

    pub fn dead(&self) -> Operator {
        control_op(Opcode::Dead, "Dead", 0, 0)
    }

    pub fn end(&self) -> Operator {
        let arity = Arity {
            control_in: 1,
            ..Arity::NONE
        };
        Operator::new(
            Opcode::End,
            Properties::FOLDABLE,
            "End",
            arity,
            OpParameter::None,
        )
    }

    pub fn branch(&self) -> Operator {
        control_op(Opcode::Branch, "Branch", 1, 1)
    }

    pub fn if_true(&self) -> Operator {
        control_op(Opcode::IfTrue, "IfTrue", 0, 1)
    }

    pub fn if_false(&self) -> Operator {
        control_op(Opcode::IfFalse, "IfFalse", 0, 1)
    }

    pub fn throw(&self) -> Operator {
        exit_op(Opcode::Throw, Properties::FOLDABLE, "Throw")
    }

    pub fn ret(&self) -> Operator {
        exit_op(Opcode::Return, Properties::NO_PROPERTIES, "Return")
    }

    pub fn merge(&self, controls: usize) -> Operator {
        control_op(Opcode::Merge, "Merge", 0, controls)
    }

    /// Like [`Self::merge`], but the joined region carries a back edge.
    pub fn loop_(&self, controls: usize) -> Operator {
        control_op(Opcode::Loop, "Loop", 0, controls)
    }

    pub fn parameter(&self, index: usize) -> Operator {
        Operator::new(
            Opcode::Parameter,
            Properties::PURE,
            "Parameter",
            Arity::pure(1, 1),
            OpParameter::Index(index),
        )
    }

    pub fn int32_constant(&self, value: i32) -> Operator {
        constant_op(Opcode::Int32Constant, "Int32Constant", OpParameter::Int32(value))
    }

    pub fn int64_constant(&self, value: i64) -> Operator {
        constant_op(Opcode::Int64Constant, "Int64Constant", OpParameter::Int64(value))
    }

    pub fn float64_constant(&self, value: f64) -> Operator {
        constant_op(
            Opcode::Float64Constant,
            "Float64Constant",
            OpParameter::Float64(value),
        )
    }

    pub fn external_constant(&self, value: ExternalReference) -> Operator {
        constant_op(
            Opcode::ExternalConstant,
            "ExternalConstant",
            OpParameter::External(value),
        )
    }

    /// A tagged number.
    pub fn number_constant(&self, value: f64) -> Operator {
        constant_op(
            Opcode::NumberConstant,
            "NumberConstant",
            OpParameter::Float64(value),
        )
    }

    pub fn heap_constant(&self, value: HeapObject) -> Operator {
        constant_op(Opcode::HeapConstant, "HeapConstant", OpParameter::Heap(value))
    }

    /// # Panics
    /// Panics if `arguments` is zero.
    pub fn phi(&self, ty: MachineType, arguments: usize) -> Operator {
        assert!(arguments > 0, "empty phi");
        let arity = Arity {
            value_in: arguments,
            control_in: 1,
            value_out: 1,
            ..Arity::NONE
        };
        Operator::new(
            Opcode::Phi,
            Properties::PURE,
            "Phi",
            arity,
            OpParameter::MachineType(ty),
        )
    }

    /// # Panics
    /// Panics if `arguments` is zero.
    pub fn effect_phi(&self, arguments: usize) -> Operator {
        assert!(arguments > 0, "empty effect phi");
        let arity = Arity {
            effect_in: arguments,
            control_in: 1,
            effect_out: 1,
            ..Arity::NONE
        };
        Operator::new(
            Opcode::EffectPhi,
            Properties::PURE,
            "EffectPhi",
            arity,
            OpParameter::Int32(arguments as i32),
        )
    }

    pub fn control_effect(&self) -> Operator {
        let arity = Arity {
            control_in: 1,
            effect_out: 1,
            ..Arity::NONE
        };
        Operator::new(
            Opcode::ControlEffect,
            Properties::PURE,
            "ControlEffect",
            arity,
            OpParameter::None,
        )
    }

    pub fn value_effect(&self, arguments: usize) -> Operator {
        assert!(arguments > 0, "empty value effect");
        let arity = Arity {
            value_in: arguments,
            effect_out: 1,
            ..Arity::NONE
        };
        Operator::new(
            Opcode::ValueEffect,
            Properties::PURE,
            "ValueEffect",
            arity,
            OpParameter::None,
        )
    }

    /// Produces its value input once all `arguments` effects have happened.
    pub fn finish(&self, arguments: usize) -> Operator {
        assert!(arguments > 0, "empty finish");
        let arity = Arity {
            value_in: 1,
            effect_in: arguments,
            value_out: 1,
            ..Arity::NONE
        };
        Operator::new(
            Opcode::Finish,
            Properties::PURE,
            "Finish",
            arity,
            OpParameter::Int32(arguments as i32),
        )
    }

    pub fn state_values(&self, arguments: usize) -> Operator {
        Operator::new(
            Opcode::StateValues,
            Properties::PURE,
            "StateValues",
            Arity::pure(arguments, 1),
            OpParameter::Int32(arguments as i32),
        )
    }

    /// Inputs are the parameters, locals and stack as `StateValues`, then
    /// the context.
    pub fn frame_state(
        &self,
        bailout_id: BailoutId,
        combine: OutputFrameStateCombine,
    ) -> Operator {
        Operator::new(
            Opcode::FrameState,
            Properties::PURE,
            "FrameState",
            Arity::pure(4, 1),
            OpParameter::FrameState(FrameStateCallInfo::new(bailout_id, combine)),
        )
    }

    pub fn call(&self, descriptor: Arc<CallDescriptor>) -> Operator {
        let properties = descriptor.properties();
        let mut arity = Arity {
            value_in: descriptor.input_count(),
            context_in: descriptor.needs_context() as usize,
            frame_state_in: descriptor.frame_state_count(),
            value_out: descriptor.return_count(),
            ..Arity::NONE
        };
        if !properties.contains(Properties::PURE) {
            arity.effect_in = 1;
            arity.control_in = 1;
            arity.effect_out = 1;
        }
        Operator::new(
            Opcode::Call,
            properties,
            "Call",
            arity,
            OpParameter::Call(descriptor),
        )
    }

    pub fn projection(&self, index: usize) -> Operator {
        Operator::new(
            Opcode::Projection,
            Properties::PURE,
            "Projection",
            Arity::pure(1, 1),
            OpParameter::Index(index),
        )
    }
}

fn control_op(opcode: Opcode, mnemonic: &'static str, inputs: usize, controls: usize) -> Operator {
    let arity = Arity {
        value_in: inputs,
        control_in: controls,
        control_out: 1,
        ..Arity::NONE
    };
    Operator::new(
        opcode,
        Properties::FOLDABLE,
        mnemonic,
        arity,
        OpParameter::None,
    )
}

fn exit_op(opcode: Opcode, properties: Properties, mnemonic: &'static str) -> Operator {
    let arity = Arity {
        value_in: 1,
        effect_in: 1,
        control_in: 1,
        control_out: 1,
        ..Arity::NONE
    };
    Operator::new(opcode, properties, mnemonic, arity, OpParameter::None)
}

fn constant_op(opcode: Opcode, mnemonic: &'static str, param: OpParameter) -> Operator {
    Operator::new(opcode, Properties::PURE, mnemonic, Arity::pure(0, 1), param)
}
