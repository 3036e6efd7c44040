//! Operators that map directly onto machine instructions.
use super::{Arity, OpParameter, Opcode, Operator, Properties};
use crate::machine_type::MachineType;

#[derive(Debug, Default, Clone, Copy)]
pub struct MachineOperatorBuilder;

impl MachineOperatorBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Loads a value of `rep` from `base + index`.
    pub fn load(&self, rep: MachineType) -> Operator {
        let arity = Arity {
            value_in: 2,
            effect_in: 1,
            value_out: 1,
            effect_out: 1,
            ..Arity::NONE
        };
        Operator::new(
            Opcode::Load,
            Properties::NO_THROW | Properties::NO_WRITE,
            "Load",
            arity,
            OpParameter::MachineType(rep),
        )
    }

    /// Stores a value of `rep` to `base + index`.
    pub fn store(&self, rep: MachineType) -> Operator {
        let arity = Arity {
            value_in: 3,
            effect_in: 1,
            effect_out: 1,
            ..Arity::NONE
        };
        Operator::new(
            Opcode::Store,
            Properties::NO_READ | Properties::NO_THROW,
            "Store",
            arity,
            OpParameter::MachineType(rep),
        )
    }

    pub fn int32_add(&self) -> Operator {
        binop(Opcode::Int32Add, commutative_associative(), "Int32Add")
    }

    pub fn int32_sub(&self) -> Operator {
        binop(Opcode::Int32Sub, Properties::NO_PROPERTIES, "Int32Sub")
    }

    pub fn int32_mul(&self) -> Operator {
        binop(Opcode::Int32Mul, commutative_associative(), "Int32Mul")
    }

    pub fn word32_equal(&self) -> Operator {
        binop(Opcode::Word32Equal, Properties::COMMUTATIVE, "Word32Equal")
    }

    pub fn int32_less_than(&self) -> Operator {
        binop(Opcode::Int32LessThan, Properties::NO_PROPERTIES, "Int32LessThan")
    }

    pub fn int32_less_than_or_equal(&self) -> Operator {
        binop(
            Opcode::Int32LessThanOrEqual,
            Properties::NO_PROPERTIES,
            "Int32LessThanOrEqual",
        )
    }

    pub fn uint32_less_than(&self) -> Operator {
        binop(Opcode::Uint32LessThan, Properties::NO_PROPERTIES, "Uint32LessThan")
    }

    pub fn uint32_less_than_or_equal(&self) -> Operator {
        binop(
            Opcode::Uint32LessThanOrEqual,
            Properties::NO_PROPERTIES,
            "Uint32LessThanOrEqual",
        )
    }

    pub fn float64_add(&self) -> Operator {
        binop(Opcode::Float64Add, Properties::COMMUTATIVE, "Float64Add")
    }

    pub fn float64_sub(&self) -> Operator {
        binop(Opcode::Float64Sub, Properties::NO_PROPERTIES, "Float64Sub")
    }

    pub fn float64_mul(&self) -> Operator {
        binop(Opcode::Float64Mul, Properties::COMMUTATIVE, "Float64Mul")
    }

    pub fn float64_div(&self) -> Operator {
        binop(Opcode::Float64Div, Properties::NO_PROPERTIES, "Float64Div")
    }

    pub fn float64_mod(&self) -> Operator {
        binop(Opcode::Float64Mod, Properties::NO_PROPERTIES, "Float64Mod")
    }

    pub fn float64_equal(&self) -> Operator {
        binop(Opcode::Float64Equal, Properties::COMMUTATIVE, "Float64Equal")
    }

    pub fn float64_less_than(&self) -> Operator {
        binop(Opcode::Float64LessThan, Properties::NO_PROPERTIES, "Float64LessThan")
    }

    pub fn float64_less_than_or_equal(&self) -> Operator {
        binop(
            Opcode::Float64LessThanOrEqual,
            Properties::NO_PROPERTIES,
            "Float64LessThanOrEqual",
        )
    }

    pub fn change_int32_to_float64(&self) -> Operator {
        unop(Opcode::ChangeInt32ToFloat64, "ChangeInt32ToFloat64")
    }

    pub fn change_uint32_to_float64(&self) -> Operator {
        unop(Opcode::ChangeUint32ToFloat64, "ChangeUint32ToFloat64")
    }

    pub fn change_float64_to_int32(&self) -> Operator {
        unop(Opcode::ChangeFloat64ToInt32, "ChangeFloat64ToInt32")
    }

    pub fn change_float64_to_uint32(&self) -> Operator {
        unop(Opcode::ChangeFloat64ToUint32, "ChangeFloat64ToUint32")
    }
}

fn commutative_associative() -> Properties {
    Properties::COMMUTATIVE | Properties::ASSOCIATIVE
}

fn unop(opcode: Opcode, mnemonic: &'static str) -> Operator {
    Operator::new(
        opcode,
        Properties::PURE,
        mnemonic,
        Arity::pure(1, 1),
        OpParameter::None,
    )
}

fn binop(opcode: Opcode, extra: Properties, mnemonic: &'static str) -> Operator {
    Operator::new(
        opcode,
        Properties::PURE | extra,
        mnemonic,
        Arity::pure(2, 1),
        OpParameter::None,
    )
}
