//! Value-domain bounds attached to nodes.
//!
//! This is a small bitset lattice. It is only as precise as representation
//! selection needs: integer ranges are split at the `i32`/`u32` boundaries and
//! everything that is not a number or an oddball collapses into `OTHER`.
use std::{fmt, ops};

use crate::conversions::is_minus_zero;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Type(u32);

impl Type {
    pub const NONE: Self = Self(0);

    pub const MINUS_ZERO: Self = Self(1 << 0);
    pub const NAN: Self = Self(1 << 1);
    /// Integers in `[0, 2^31)`.
    pub const UNSIGNED31: Self = Self(1 << 2);
    /// Integers in `[-2^31, 0)`.
    pub const NEGATIVE32: Self = Self(1 << 3);
    /// Integers in `[2^31, 2^32)`.
    pub const OTHER_UNSIGNED32: Self = Self(1 << 4);
    pub const OTHER_NUMBER: Self = Self(1 << 5);
    pub const BOOLEAN: Self = Self(1 << 6);
    pub const NULL: Self = Self(1 << 7);
    pub const UNDEFINED: Self = Self(1 << 8);
    pub const INTERNAL: Self = Self(1 << 9);
    pub const OTHER: Self = Self(1 << 10);

    pub const SIGNED32: Self = Self(Self::UNSIGNED31.0 | Self::NEGATIVE32.0);
    pub const UNSIGNED32: Self = Self(Self::UNSIGNED31.0 | Self::OTHER_UNSIGNED32.0);
    pub const INTEGRAL32: Self = Self(Self::SIGNED32.0 | Self::UNSIGNED32.0);
    pub const NUMBER: Self =
        Self(Self::INTEGRAL32.0 | Self::MINUS_ZERO.0 | Self::NAN.0 | Self::OTHER_NUMBER.0);
    pub const ANY: Self = Self((1 << 11) - 1);

    /// Returns the most precise type containing `value`.
    pub fn of(value: f64) -> Self {
        if value.is_nan() {
            return Self::NAN;
        }
        if is_minus_zero(value) {
            return Self::MINUS_ZERO;
        }
        if value.fract() != 0.0 {
            return Self::OTHER_NUMBER;
        }

        if (0.0..2_147_483_648.0).contains(&value) {
            Self::UNSIGNED31
        } else if (-2_147_483_648.0..0.0).contains(&value) {
            Self::NEGATIVE32
        } else if (2_147_483_648.0..4_294_967_296.0).contains(&value) {
            Self::OTHER_UNSIGNED32
        } else {
            Self::OTHER_NUMBER
        }
    }

    /// Subtype check.
    pub fn is(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn maybe(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl ops::BitOr for Type {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const NAMES: [&str; 11] = [
            "MinusZero",
            "NaN",
            "Unsigned31",
            "Negative32",
            "OtherUnsigned32",
            "OtherNumber",
            "Boolean",
            "Null",
            "Undefined",
            "Internal",
            "Other",
        ];

        if *self == Self::ANY {
            return write!(f, "Any");
        }
        if *self == Self::NONE {
            return write!(f, "None");
        }

        let names: Vec<_> = NAMES
            .iter()
            .enumerate()
            .filter(|(bit, _)| self.0 & (1 << bit) != 0)
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join("|"))
    }
}

/// Lower and upper bound of the values a node may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub lower: Type,
    pub upper: Type,
}

impl Bounds {
    pub fn new(lower: Type, upper: Type) -> Self {
        debug_assert!(lower.is(upper), "{lower:?} is not within {upper:?}");
        Self { lower, upper }
    }

    /// Bounds of a node producing exactly values of `ty`.
    pub fn exact(ty: Type) -> Self {
        Self::new(ty, ty)
    }

    pub fn unbounded() -> Self {
        Self::new(Type::NONE, Type::ANY)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}
