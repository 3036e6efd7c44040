//! Machine-level value representations and type hints.
//!
//! A [`MachineType`] is a 16 bit set. The low byte holds representation bits,
//! exactly one of which is set for a concrete type. The high byte holds type
//! hints, which may be combined freely.
use std::{fmt, ops};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MachineType(u16);

impl MachineType {
    // Representations.
    pub const REP_BIT: Self = Self(1 << 0);
    pub const REP_WORD8: Self = Self(1 << 1);
    pub const REP_WORD16: Self = Self(1 << 2);
    pub const REP_WORD32: Self = Self(1 << 3);
    pub const REP_WORD64: Self = Self(1 << 4);
    pub const REP_FLOAT32: Self = Self(1 << 5);
    pub const REP_FLOAT64: Self = Self(1 << 6);
    pub const REP_TAGGED: Self = Self(1 << 7);

    // Types.
    pub const TYPE_BOOL: Self = Self(1 << 8);
    pub const TYPE_INT32: Self = Self(1 << 9);
    pub const TYPE_UINT32: Self = Self(1 << 10);
    pub const TYPE_INT64: Self = Self(1 << 11);
    pub const TYPE_UINT64: Self = Self(1 << 12);
    pub const TYPE_NUMBER: Self = Self(1 << 13);
    pub const TYPE_ANY: Self = Self(1 << 14);

    pub const REP_MASK: Self = Self(0x00ff);
    pub const TYPE_MASK: Self = Self(0x7f00);

    /// Representations that are at most 32 bits wide. Values in these
    /// representations are extended on load and truncated on store, so
    /// moving between them never needs a conversion.
    pub const REP_NARROW_WORD: Self =
        Self(Self::REP_BIT.0 | Self::REP_WORD8.0 | Self::REP_WORD16.0 | Self::REP_WORD32.0);

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `self` and `other` share at least one bit.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Pointer-sized untagged word.
    pub const fn ptr(pointer_width: usize) -> Self {
        if pointer_width == 4 {
            Self::REP_WORD32
        } else {
            Self::REP_WORD64
        }
    }

    pub const fn type_of(self) -> Self {
        Self(self.0 & Self::TYPE_MASK.0)
    }

    /// Returns the representation bits without checking that they describe a
    /// single representation.
    pub const fn representation_bits(self) -> Self {
        Self(self.0 & Self::REP_MASK.0)
    }

    /// Returns `true` if exactly one representation bit is set.
    pub const fn has_single_representation(self) -> bool {
        let rep = self.representation_bits().0 as u32;
        rep != 0 && rep & (rep - 1) == 0
    }

    /// Returns the representation of a concrete machine type.
    ///
    /// # Panics
    /// Panics unless exactly one representation bit is set.
    pub fn representation_of(self) -> Self {
        assert!(
            self.has_single_representation(),
            "{self} does not have exactly one representation"
        );
        self.representation_bits()
    }

    /// Returns the size of an element of this type in bytes.
    pub fn element_size_of(self, pointer_width: usize) -> usize {
        match self.representation_of() {
            Self::REP_BIT | Self::REP_WORD8 => 1,
            Self::REP_WORD16 => 2,
            Self::REP_WORD32 | Self::REP_FLOAT32 => 4,
            Self::REP_WORD64 | Self::REP_FLOAT64 => 8,
            Self::REP_TAGGED => pointer_width,
            _ => unreachable!(),
        }
    }
}

pub const MACH_NONE: MachineType = MachineType(0);
pub const MACH_FLOAT32: MachineType =
    MachineType(MachineType::REP_FLOAT32.0 | MachineType::TYPE_NUMBER.0);
pub const MACH_FLOAT64: MachineType =
    MachineType(MachineType::REP_FLOAT64.0 | MachineType::TYPE_NUMBER.0);
pub const MACH_INT8: MachineType =
    MachineType(MachineType::REP_WORD8.0 | MachineType::TYPE_INT32.0);
pub const MACH_UINT8: MachineType =
    MachineType(MachineType::REP_WORD8.0 | MachineType::TYPE_UINT32.0);
pub const MACH_INT16: MachineType =
    MachineType(MachineType::REP_WORD16.0 | MachineType::TYPE_INT32.0);
pub const MACH_UINT16: MachineType =
    MachineType(MachineType::REP_WORD16.0 | MachineType::TYPE_UINT32.0);
pub const MACH_INT32: MachineType =
    MachineType(MachineType::REP_WORD32.0 | MachineType::TYPE_INT32.0);
pub const MACH_UINT32: MachineType =
    MachineType(MachineType::REP_WORD32.0 | MachineType::TYPE_UINT32.0);
pub const MACH_INT64: MachineType =
    MachineType(MachineType::REP_WORD64.0 | MachineType::TYPE_INT64.0);
pub const MACH_UINT64: MachineType =
    MachineType(MachineType::REP_WORD64.0 | MachineType::TYPE_UINT64.0);
pub const MACH_ANY_TAGGED: MachineType =
    MachineType(MachineType::REP_TAGGED.0 | MachineType::TYPE_ANY.0);

impl ops::BitOr for MachineType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for MachineType {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl ops::BitAnd for MachineType {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

const BIT_NAMES: [&str; 15] = [
    "kRepBit",
    "kRepWord8",
    "kRepWord16",
    "kRepWord32",
    "kRepWord64",
    "kRepFloat32",
    "kRepFloat64",
    "kRepTagged",
    "kTypeBool",
    "kTypeInt32",
    "kTypeUint32",
    "kTypeInt64",
    "kTypeUint64",
    "kTypeNumber",
    "kTypeAny",
];

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_none() {
            return write!(f, "kMachNone");
        }

        let mut first = true;
        for (bit, name) in BIT_NAMES.iter().enumerate() {
            if self.0 & (1 << bit) == 0 {
                continue;
            }
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{name}")?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MachineType({self})")
    }
}

/// Describes the inputs and outputs of a function or call: `return_count`
/// return types followed by `parameter_count` parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature<T> {
    return_count: usize,
    reps: Box<[T]>,
}

pub type MachineSignature = Signature<MachineType>;

impl<T: Copy> Signature<T> {
    pub fn return_count(&self) -> usize {
        self.return_count
    }

    pub fn parameter_count(&self) -> usize {
        self.reps.len() - self.return_count
    }

    pub fn get_return(&self, index: usize) -> T {
        assert!(index < self.return_count, "return index {index} out of range");
        self.reps[index]
    }

    pub fn get_param(&self, index: usize) -> T {
        assert!(index < self.parameter_count(), "parameter index {index} out of range");
        self.reps[self.return_count + index]
    }

    pub fn returns(&self) -> &[T] {
        &self.reps[..self.return_count]
    }

    pub fn params(&self) -> &[T] {
        &self.reps[self.return_count..]
    }
}

/// Incremental builder for [`Signature`].
///
/// Exactly `return_count` returns and `parameter_count` parameters must be
/// added before [`SignatureBuilder::build`]. Anything else is a programming
/// error and panics.
#[derive(Debug)]
pub struct SignatureBuilder<T> {
    return_count: usize,
    parameter_count: usize,
    returns: Vec<T>,
    params: Vec<T>,
}

impl<T: Copy> SignatureBuilder<T> {
    pub fn new(return_count: usize, parameter_count: usize) -> Self {
        Self {
            return_count,
            parameter_count,
            returns: Vec::with_capacity(return_count),
            params: Vec::with_capacity(parameter_count),
        }
    }

    pub fn add_return(&mut self, val: T) -> &mut Self {
        assert!(
            self.returns.len() < self.return_count,
            "signature declares only {} returns",
            self.return_count
        );
        self.returns.push(val);
        self
    }

    pub fn add_param(&mut self, val: T) -> &mut Self {
        assert!(
            self.params.len() < self.parameter_count,
            "signature declares only {} parameters",
            self.parameter_count
        );
        self.params.push(val);
        self
    }

    pub fn build(self) -> Signature<T> {
        assert_eq!(self.returns.len(), self.return_count, "missing returns");
        assert_eq!(self.params.len(), self.parameter_count, "missing parameters");

        let mut reps = self.returns;
        reps.extend(self.params);
        Signature {
            return_count: self.return_count,
            reps: reps.into_boxed_slice(),
        }
    }
}
