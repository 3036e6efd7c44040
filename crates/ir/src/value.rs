//! Literal payloads of constant operators that refer to the outside world.
use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::types::Type;

/// A heap object known at compile time.
///
/// The heap itself is owned by the embedding VM. Apart from the oddballs and
/// boxed numbers, objects are referred to through an opaque handle.
#[derive(Debug, Clone, Copy)]
pub enum HeapObject {
    Undefined,
    TheHole,
    True,
    False,
    Null,
    /// A boxed number.
    Number(f64),
    /// Any other object, identified by its VM handle.
    Object(u32),
}

impl HeapObject {
    pub fn from_bool(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }

    /// Returns the boolean value of the two boolean oddballs.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            _ => None,
        }
    }

    pub fn ty(self) -> Type {
        match self {
            Self::Undefined => Type::UNDEFINED,
            Self::TheHole => Type::INTERNAL,
            Self::True | Self::False => Type::BOOLEAN,
            Self::Null => Type::NULL,
            Self::Number(value) => Type::of(value),
            Self::Object(_) => Type::OTHER,
        }
    }
}

/// Numbers compare by bit pattern so that `-0.0` and `0.0` stay distinct.
impl PartialEq for HeapObject {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(lhs), Self::Number(rhs)) => lhs.to_bits() == rhs.to_bits(),
            (Self::Object(lhs), Self::Object(rhs)) => lhs == rhs,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for HeapObject {}

impl Hash for HeapObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Number(value) => value.to_bits().hash(state),
            Self::Object(handle) => handle.hash(state),
            _ => {}
        }
    }
}

impl fmt::Display for HeapObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::TheHole => write!(f, "the_hole"),
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Null => write!(f, "null"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Object(handle) => write!(f, "object@{handle}"),
        }
    }
}

/// The address of a VM-provided runtime entity such as a C function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExternalReference(pub u64);

impl fmt::Display for ExternalReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_object_equality() {
        assert_eq!(HeapObject::Number(1.0), HeapObject::Number(1.0));
        assert_ne!(HeapObject::Number(0.0), HeapObject::Number(-0.0));
        assert_eq!(HeapObject::Number(f64::NAN), HeapObject::Number(f64::NAN));
        assert_ne!(HeapObject::True, HeapObject::False);
        assert_ne!(HeapObject::Object(1), HeapObject::Object(2));
        assert_eq!(HeapObject::from_bool(true), HeapObject::True);
        assert_eq!(HeapObject::Null.as_bool(), None);
    }
}
