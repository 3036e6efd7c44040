//! Representation-independent operators on numbers and booleans, plus the
//! explicit representation changes inserted during lowering.
use super::{Arity, OpParameter, Opcode, Operator, Properties};

#[derive(Debug, Default, Clone, Copy)]
pub struct SimplifiedOperatorBuilder;

impl SimplifiedOperatorBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn boolean_not(&self) -> Operator {
        unop(Opcode::BooleanNot, "BooleanNot")
    }

    pub fn number_equal(&self) -> Operator {
        binop(Opcode::NumberEqual, Properties::COMMUTATIVE, "NumberEqual")
    }

    pub fn number_less_than(&self) -> Operator {
        binop(Opcode::NumberLessThan, Properties::NO_PROPERTIES, "NumberLessThan")
    }

    pub fn number_less_than_or_equal(&self) -> Operator {
        binop(
            Opcode::NumberLessThanOrEqual,
            Properties::NO_PROPERTIES,
            "NumberLessThanOrEqual",
        )
    }

    pub fn number_add(&self) -> Operator {
        binop(Opcode::NumberAdd, Properties::COMMUTATIVE, "NumberAdd")
    }

    pub fn number_subtract(&self) -> Operator {
        binop(Opcode::NumberSubtract, Properties::NO_PROPERTIES, "NumberSubtract")
    }

    pub fn number_multiply(&self) -> Operator {
        binop(Opcode::NumberMultiply, Properties::COMMUTATIVE, "NumberMultiply")
    }

    pub fn number_divide(&self) -> Operator {
        binop(Opcode::NumberDivide, Properties::NO_PROPERTIES, "NumberDivide")
    }

    pub fn number_modulus(&self) -> Operator {
        binop(Opcode::NumberModulus, Properties::NO_PROPERTIES, "NumberModulus")
    }

    pub fn change_tagged_to_int32(&self) -> Operator {
        unop(Opcode::ChangeTaggedToInt32, "ChangeTaggedToInt32")
    }

    pub fn change_tagged_to_uint32(&self) -> Operator {
        unop(Opcode::ChangeTaggedToUint32, "ChangeTaggedToUint32")
    }

    pub fn change_tagged_to_float64(&self) -> Operator {
        unop(Opcode::ChangeTaggedToFloat64, "ChangeTaggedToFloat64")
    }

    pub fn change_int32_to_tagged(&self) -> Operator {
        unop(Opcode::ChangeInt32ToTagged, "ChangeInt32ToTagged")
    }

    pub fn change_uint32_to_tagged(&self) -> Operator {
        unop(Opcode::ChangeUint32ToTagged, "ChangeUint32ToTagged")
    }

    pub fn change_float64_to_tagged(&self) -> Operator {
        unop(Opcode::ChangeFloat64ToTagged, "ChangeFloat64ToTagged")
    }

    pub fn change_bool_to_bit(&self) -> Operator {
        unop(Opcode::ChangeBoolToBit, "ChangeBoolToBit")
    }

    pub fn change_bit_to_bool(&self) -> Operator {
        unop(Opcode::ChangeBitToBool, "ChangeBitToBool")
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_are_pure_unops() {
        let simplified = SimplifiedOperatorBuilder::new();
        for op in [
            simplified.change_tagged_to_int32(),
            simplified.change_tagged_to_uint32(),
            simplified.change_tagged_to_float64(),
            simplified.change_int32_to_tagged(),
            simplified.change_uint32_to_tagged(),
            simplified.change_float64_to_tagged(),
            simplified.change_bool_to_bit(),
            simplified.change_bit_to_bool(),
            simplified.boolean_not(),
        ] {
            assert!(op.is_pure(), "{op}");
            assert_eq!(op.value_input_count(), 1);
            assert_eq!(op.input_count(), 1);
            assert_eq!(op.value_output_count(), 1);
        }
    }

    #[test]
    fn number_binops() {
        let simplified = SimplifiedOperatorBuilder::new();
        let add = simplified.number_add();
        assert_eq!(add.value_input_count(), 2);
        assert!(add.properties().contains(Properties::COMMUTATIVE));
        assert!(!simplified
            .number_subtract()
            .properties()
            .contains(Properties::COMMUTATIVE));
        assert_eq!(simplified.number_modulus().mnemonic(), "NumberModulus");
    }
}
