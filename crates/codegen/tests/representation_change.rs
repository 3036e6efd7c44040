use proptest::prelude::*;
use reef_codegen::{ChangerConfig, RepresentationChanger};
use reef_ir::{machine_type::*, prelude::*, Graph, MachineType, NodeId, Opcode};

struct Tester {
    graph: Graph,
    changer: RepresentationChanger,
    param: NodeId,
}

impl Tester {
    fn new() -> Self {
        let common = CommonOperatorBuilder::new();
        let mut graph = Graph::new();
        let start = graph.make_node(common.start(1), &[]);
        graph.set_start(start);
        let param = graph.make_node(common.parameter(0), &[start]);
        Self {
            graph,
            changer: RepresentationChanger::new(ChangerConfig::testing()),
            param,
        }
    }

    fn change(&mut self, node: NodeId, from: MachineType, to: MachineType) -> NodeId {
        self.changer
            .get_representation_for(&mut self.graph, node, from, to)
    }

    fn check_nop(&mut self, from: MachineType, to: MachineType) {
        let param = self.param;
        assert_eq!(self.change(param, from, to), param, "{from} to {to}");
        assert!(!self.changer.had_type_error());
    }

    fn check_change(&mut self, expected: Opcode, from: MachineType, to: MachineType) {
        let param = self.param;
        let change = self.change(param, from, to);
        assert_ne!(change, param, "{from} to {to}");
        assert_eq!(self.graph.opcode(change), expected, "{from} to {to}");
        assert_eq!(self.graph.inputs(change), &[param]);
        assert!(!self.changer.had_type_error());
    }

    fn check_type_error(&mut self, from: MachineType, to: MachineType) {
        let param = self.param;
        let mut changer = RepresentationChanger::new(ChangerConfig::testing());
        let result = changer.get_representation_for(&mut self.graph, param, from, to);
        assert_eq!(result, param, "{from} to {to}");
        assert!(changer.had_type_error(), "{from} to {to}");
    }
}

#[test]
fn same_representation_is_a_nop() {
    let mut t = Tester::new();
    for ty in [
        MACH_ANY_TAGGED,
        MACH_FLOAT64,
        MACH_INT32,
        MACH_UINT32,
        MACH_INT64,
        MachineType::REP_BIT,
    ] {
        t.check_nop(ty, ty);
    }
}

#[test]
fn narrow_words_are_interchangeable() {
    let mut t = Tester::new();
    let narrow = [MACH_INT8, MACH_UINT8, MACH_INT16, MACH_UINT16, MACH_INT32, MACH_UINT32];
    for from in narrow {
        for to in narrow {
            t.check_nop(from, to);
        }
    }
}

#[test]
fn bits_are_valid_words() {
    let mut t = Tester::new();
    t.check_nop(MACH_INT32, MachineType::REP_BIT);
    t.check_nop(MachineType::REP_WORD64, MachineType::REP_BIT);
    t.check_nop(MachineType::REP_BIT, MachineType::REP_WORD64);
}

#[test]
fn int32_constant_to_tagged() {
    let mut t = Tester::new();
    let five = t.graph.int32_constant(5);
    let tagged = t.change(five, MACH_INT32, MACH_ANY_TAGGED);
    assert_eq!(t.graph.opcode(tagged), Opcode::NumberConstant);
    assert_eq!(tagged, t.graph.constant(5.0));

    let all_ones = t.graph.int32_constant(-1);
    let tagged = t.change(all_ones, MACH_UINT32, MACH_ANY_TAGGED);
    assert_eq!(tagged, t.graph.constant(4_294_967_295.0));
    let tagged = t.change(all_ones, MACH_INT32, MACH_ANY_TAGGED);
    assert_eq!(tagged, t.graph.constant(-1.0));

    let zero = t.graph.int32_constant(0);
    let tagged = t.change(zero, MachineType::REP_BIT, MACH_ANY_TAGGED);
    assert_eq!(tagged, t.graph.false_constant());
    let one = t.graph.int32_constant(1);
    let tagged = t.change(one, MachineType::REP_BIT, MACH_ANY_TAGGED);
    assert_eq!(tagged, t.graph.true_constant());
}

#[test]
fn tagged_constants_stay() {
    let mut t = Tester::new();
    let number = t.graph.constant(1.5);
    assert_eq!(t.change(number, MACH_FLOAT64, MACH_ANY_TAGGED), number);
    let truth = t.graph.true_constant();
    assert_eq!(t.change(truth, MACH_FLOAT64, MACH_ANY_TAGGED), truth);
}

#[test]
fn float64_constants() {
    let mut t = Tester::new();
    let float = t.graph.float64_constant(2.5);
    let tagged = t.change(float, MACH_FLOAT64, MACH_ANY_TAGGED);
    assert_eq!(tagged, t.graph.constant(2.5));

    let number = t.graph.constant(-0.25);
    let float = t.change(number, MACH_ANY_TAGGED, MACH_FLOAT64);
    assert_eq!(float, t.graph.float64_constant(-0.25));

    let all_ones = t.graph.int32_constant(-1);
    let float = t.change(all_ones, MACH_UINT32, MACH_FLOAT64);
    assert_eq!(float, t.graph.float64_constant(4_294_967_295.0));
    let float = t.change(all_ones, MACH_INT32, MACH_FLOAT64);
    assert_eq!(float, t.graph.float64_constant(-1.0));
}

#[test]
fn word32_constants() {
    let mut t = Tester::new();
    let float = t.graph.float64_constant(-3.0);
    let word = t.change(float, MACH_FLOAT64, MACH_INT32);
    assert_eq!(word, t.graph.int32_constant(-3));

    let number = t.graph.constant(4_294_967_295.0);
    let word = t.change(number, MACH_ANY_TAGGED, MACH_UINT32);
    assert_eq!(word, t.graph.int32_constant(-1));
}

#[test]
fn bit_constants() {
    let mut t = Tester::new();
    let seven = t.graph.int32_constant(7);
    assert_eq!(t.change(seven, MACH_INT32, MachineType::REP_BIT), seven);
    let bit = t.change(seven, MACH_INT64, MachineType::REP_BIT);
    assert_eq!(bit, t.graph.int32_constant(1));

    let zero = t.graph.int32_constant(0);
    assert_eq!(t.change(zero, MACH_INT32, MachineType::REP_BIT), zero);

    let truth = t.graph.true_constant();
    let bit = t.change(truth, MACH_ANY_TAGGED, MachineType::REP_BIT);
    assert_eq!(bit, t.graph.int32_constant(1));
    let falsity = t.graph.false_constant();
    let bit = t.change(falsity, MACH_ANY_TAGGED, MachineType::REP_BIT);
    assert_eq!(bit, zero);
}

#[test]
fn inserted_changes() {
    let mut t = Tester::new();
    let bit = MachineType::REP_BIT;

    t.check_change(Opcode::ChangeInt32ToTagged, MACH_INT32, MACH_ANY_TAGGED);
    t.check_change(Opcode::ChangeUint32ToTagged, MACH_UINT32, MACH_ANY_TAGGED);
    t.check_change(Opcode::ChangeFloat64ToTagged, MACH_FLOAT64, MACH_ANY_TAGGED);
    t.check_change(Opcode::ChangeBitToBool, bit, MACH_ANY_TAGGED);

    t.check_change(Opcode::ChangeTaggedToFloat64, MACH_ANY_TAGGED, MACH_FLOAT64);
    t.check_change(Opcode::ChangeInt32ToFloat64, MACH_INT32, MACH_FLOAT64);
    t.check_change(Opcode::ChangeUint32ToFloat64, MACH_UINT32, MACH_FLOAT64);

    t.check_change(Opcode::ChangeFloat64ToInt32, MACH_FLOAT64, MACH_INT32);
    t.check_change(Opcode::ChangeFloat64ToUint32, MACH_FLOAT64, MACH_UINT32);
    t.check_change(Opcode::ChangeTaggedToInt32, MACH_ANY_TAGGED, MACH_INT32);
    t.check_change(Opcode::ChangeTaggedToUint32, MACH_ANY_TAGGED, MACH_UINT32);

    t.check_change(Opcode::ChangeBoolToBit, MACH_ANY_TAGGED, bit);
}

#[test]
fn unsigned_output_selects_unsigned_change() {
    let mut t = Tester::new();
    let from = MachineType::REP_FLOAT64 | MachineType::TYPE_UINT32;
    t.check_change(Opcode::ChangeFloat64ToUint32, from, MACH_INT32);
}

#[test]
fn type_errors_are_recorded() {
    let mut t = Tester::new();
    t.check_type_error(MachineType::REP_BIT, MACH_FLOAT64);
    t.check_type_error(MACH_INT64, MACH_ANY_TAGGED);
    t.check_type_error(MACH_INT64, MACH_FLOAT64);
    t.check_type_error(MACH_INT64, MACH_INT32);
    t.check_type_error(MACH_FLOAT64, MACH_INT64);
    t.check_type_error(MACH_ANY_TAGGED, MACH_INT64);
    t.check_type_error(MACH_FLOAT64, MachineType::REP_BIT);
    t.check_type_error(MachineType::REP_WORD32 | MachineType::TYPE_BOOL, MACH_ANY_TAGGED);
}

#[test]
fn multiple_output_representations_are_errors() {
    let mut t = Tester::new();
    t.check_type_error(MACH_INT32 | MachineType::REP_FLOAT64, MACH_FLOAT64);
    t.check_type_error(MACH_ANY_TAGGED | MachineType::REP_WORD32, MACH_ANY_TAGGED);
    t.check_type_error(MachineType::TYPE_INT32, MACH_INT32);
}

#[test]
fn try_does_not_set_the_error_flag() {
    let mut t = Tester::new();
    let result = t.changer.try_get_representation_for(
        &mut t.graph,
        t.param,
        MachineType::REP_BIT,
        MACH_FLOAT64,
    );
    let err = result.unwrap_err();
    assert_eq!(err.node, t.param);
    assert_eq!(err.mnemonic, "Parameter");
    assert!(!t.changer.had_type_error());
}

proptest! {
    #[test]
    fn int32_constants_survive_tagging(value in any::<i32>()) {
        let mut t = Tester::new();
        let constant = t.graph.int32_constant(value);
        let tagged = t.change(constant, MACH_INT32, MACH_ANY_TAGGED);
        prop_assert_eq!(t.graph.float64_value(tagged), Some(value as f64));
        prop_assert_eq!(t.change(tagged, MACH_ANY_TAGGED, MACH_INT32), constant);
        prop_assert!(!t.changer.had_type_error());
    }
}
