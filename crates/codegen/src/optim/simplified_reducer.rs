//! Peephole rules for simplified operators.
//!
//! Folds representation changes of constants and cancels chains of changes
//! that convert a value back to where it came from.
use reef_ir::{
    conversions::{double_to_int32, double_to_uint32, fast_ui2d},
    operator::MachineOperatorBuilder,
    Graph, NodeId, Opcode, Operator,
};

use super::reducer::{Reducer, Reduction};

#[derive(Debug, Default)]
pub struct SimplifiedOperatorReducer {
    machine: MachineOperatorBuilder,
}

impl SimplifiedOperatorReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrites `node` in place to apply `op` to the operand of its input.
    fn change(&self, graph: &mut Graph, node: NodeId, op: Operator) -> Reduction {
        let operand = graph.input_at(graph.input_at(node, 0), 0);
        log::trace!("{node}: {} becomes {op}({operand})", graph.op(node));
        graph.set_op(node, op);
        graph.replace_input(node, 0, operand);
        Reduction::Changed(node)
    }
}

fn replace(node: NodeId, replacement: NodeId) -> Reduction {
    log::trace!("{node} reduces to {replacement}");
    Reduction::Replace(replacement)
}

/// Replaces `node` with the operand of its input, undoing a change.
fn cancel(graph: &Graph, node: NodeId) -> Reduction {
    let operand = graph.input_at(graph.input_at(node, 0), 0);
    replace(node, operand)
}

impl Reducer for SimplifiedOperatorReducer {
    fn reduce(&mut self, graph: &mut Graph, node: NodeId) -> Reduction {
        match graph.opcode(node) {
            Opcode::BooleanNot => {
                let input = graph.input_at(node, 0);
                match graph.boolean_value(input) {
                    Some(false) => replace(node, graph.true_constant()),
                    Some(true) => replace(node, graph.false_constant()),
                    None if graph.is_opcode(input, Opcode::BooleanNot) => cancel(graph, node),
                    None => Reduction::NoChange,
                }
            }

            Opcode::ChangeBitToBool => {
                let input = graph.input_at(node, 0);
                match graph.int32_value(input) {
                    Some(0) => replace(node, graph.false_constant()),
                    Some(1) => replace(node, graph.true_constant()),
                    _ if graph.is_opcode(input, Opcode::ChangeBoolToBit) => cancel(graph, node),
                    _ => Reduction::NoChange,
                }
            }

            Opcode::ChangeBoolToBit => {
                let input = graph.input_at(node, 0);
                match graph.boolean_value(input) {
                    Some(value) => replace(node, graph.int32_constant(value as i32)),
                    None if graph.is_opcode(input, Opcode::ChangeBitToBool) => cancel(graph, node),
                    None => Reduction::NoChange,
                }
            }

            Opcode::ChangeFloat64ToTagged => {
                let input = graph.input_at(node, 0);
                match graph.float64_value(input) {
                    Some(value) => replace(node, graph.constant(value)),
                    None => Reduction::NoChange,
                }
            }

            Opcode::ChangeInt32ToTagged => {
                let input = graph.input_at(node, 0);
                match graph.int32_value(input) {
                    Some(value) => replace(node, graph.constant_i32(value)),
                    None => Reduction::NoChange,
                }
            }

            Opcode::ChangeTaggedToFloat64 => {
                let input = graph.input_at(node, 0);
                if let Some(value) = graph.float64_value(input) {
                    return replace(node, graph.float64_constant(value));
                }
                match graph.opcode(input) {
                    Opcode::ChangeFloat64ToTagged => cancel(graph, node),
                    Opcode::ChangeInt32ToTagged => {
                        self.change(graph, node, self.machine.change_int32_to_float64())
                    }
                    Opcode::ChangeUint32ToTagged => {
                        self.change(graph, node, self.machine.change_uint32_to_float64())
                    }
                    _ => Reduction::NoChange,
                }
            }

            Opcode::ChangeTaggedToInt32 => {
                let input = graph.input_at(node, 0);
                if let Some(value) = graph.float64_value(input) {
                    return replace(node, graph.int32_constant(double_to_int32(value)));
                }
                match graph.opcode(input) {
                    Opcode::ChangeFloat64ToTagged => {
                        self.change(graph, node, self.machine.change_float64_to_int32())
                    }
                    Opcode::ChangeInt32ToTagged => cancel(graph, node),
                    _ => Reduction::NoChange,
                }
            }

            Opcode::ChangeTaggedToUint32 => {
                let input = graph.input_at(node, 0);
                if let Some(value) = graph.float64_value(input) {
                    let bits = double_to_uint32(value) as i32;
                    return replace(node, graph.int32_constant(bits));
                }
                match graph.opcode(input) {
                    Opcode::ChangeFloat64ToTagged => {
                        self.change(graph, node, self.machine.change_float64_to_uint32())
                    }
                    Opcode::ChangeUint32ToTagged => cancel(graph, node),
                    _ => Reduction::NoChange,
                }
            }

            Opcode::ChangeUint32ToTagged => {
                let input = graph.input_at(node, 0);
                match graph.uint32_value(input) {
                    Some(value) => replace(node, graph.constant(fast_ui2d(value))),
                    None => Reduction::NoChange,
                }
            }

            _ => Reduction::NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_ir::{machine_type::MACH_ANY_TAGGED, prelude::*};

    struct Tester {
        graph: Graph,
        simplified: SimplifiedOperatorBuilder,
        reducer: SimplifiedOperatorReducer,
        param: NodeId,
    }

    impl Tester {
        fn new() -> Self {
            let mut graph = Graph::new();
            let start = graph.make_node(CommonOperatorBuilder::new().start(1), &[]);
            graph.set_start(start);
            let param = graph.make_node(CommonOperatorBuilder::new().parameter(0), &[start]);
            Self {
                graph,
                simplified: SimplifiedOperatorBuilder::new(),
                reducer: SimplifiedOperatorReducer::new(),
                param,
            }
        }

        fn unop(&mut self, op: Operator, input: NodeId) -> NodeId {
            self.graph.make_node(op, &[input])
        }

        fn reduce(&mut self, node: NodeId) -> Reduction {
            self.reducer.reduce(&mut self.graph, node)
        }
    }

    #[test]
    fn boolean_not_folds_constants() {
        let mut t = Tester::new();
        let false_constant = t.graph.false_constant();
        let true_constant = t.graph.true_constant();

        let not_false = t.unop(t.simplified.boolean_not(), false_constant);
        assert_eq!(t.reduce(not_false), Reduction::Replace(true_constant));
        let not_true = t.unop(t.simplified.boolean_not(), true_constant);
        assert_eq!(t.reduce(not_true), Reduction::Replace(false_constant));
    }

    #[test]
    fn double_negation() {
        let mut t = Tester::new();
        let inner = t.unop(t.simplified.boolean_not(), t.param);
        let outer = t.unop(t.simplified.boolean_not(), inner);
        assert_eq!(t.reduce(inner), Reduction::NoChange);
        assert_eq!(t.reduce(outer), Reduction::Replace(t.param));
    }

    #[test]
    fn bit_bool_round_trips() {
        let mut t = Tester::new();
        let to_bool = t.unop(t.simplified.change_bit_to_bool(), t.param);
        let to_bit = t.unop(t.simplified.change_bool_to_bit(), to_bool);
        assert_eq!(t.reduce(to_bit), Reduction::Replace(t.param));

        let to_bit = t.unop(t.simplified.change_bool_to_bit(), t.param);
        let to_bool = t.unop(t.simplified.change_bit_to_bool(), to_bit);
        assert_eq!(t.reduce(to_bool), Reduction::Replace(t.param));
    }

    #[test]
    fn bit_bool_constants() {
        let mut t = Tester::new();
        let zero = t.graph.int32_constant(0);
        let one = t.graph.int32_constant(1);
        let two = t.graph.int32_constant(2);
        let false_constant = t.graph.false_constant();
        let true_constant = t.graph.true_constant();

        let node = t.unop(t.simplified.change_bit_to_bool(), zero);
        assert_eq!(t.reduce(node), Reduction::Replace(false_constant));
        let node = t.unop(t.simplified.change_bit_to_bool(), one);
        assert_eq!(t.reduce(node), Reduction::Replace(true_constant));
        let node = t.unop(t.simplified.change_bit_to_bool(), two);
        assert_eq!(t.reduce(node), Reduction::NoChange);

        let node = t.unop(t.simplified.change_bool_to_bit(), false_constant);
        assert_eq!(t.reduce(node), Reduction::Replace(zero));
        let node = t.unop(t.simplified.change_bool_to_bit(), true_constant);
        assert_eq!(t.reduce(node), Reduction::Replace(one));
    }

    #[test]
    fn tagging_constants() {
        let mut t = Tester::new();
        let int32 = t.graph.int32_constant(-7);
        let float64 = t.graph.float64_constant(2.5);
        let uint32 = t.graph.int32_constant(-1);

        let node = t.unop(t.simplified.change_int32_to_tagged(), int32);
        let expected = t.graph.constant(-7.0);
        assert_eq!(t.reduce(node), Reduction::Replace(expected));

        let node = t.unop(t.simplified.change_float64_to_tagged(), float64);
        let expected = t.graph.constant(2.5);
        assert_eq!(t.reduce(node), Reduction::Replace(expected));

        let node = t.unop(t.simplified.change_uint32_to_tagged(), uint32);
        let expected = t.graph.constant(4_294_967_295.0);
        assert_eq!(t.reduce(node), Reduction::Replace(expected));
    }

    #[test]
    fn untagging_constants() {
        let mut t = Tester::new();
        let number = t.graph.constant(-1.5);
        let big = t.graph.constant(4_294_967_297.0);

        let node = t.unop(t.simplified.change_tagged_to_float64(), number);
        let expected = t.graph.float64_constant(-1.5);
        assert_eq!(t.reduce(node), Reduction::Replace(expected));

        let node = t.unop(t.simplified.change_tagged_to_int32(), number);
        let expected = t.graph.int32_constant(-1);
        assert_eq!(t.reduce(node), Reduction::Replace(expected));

        let node = t.unop(t.simplified.change_tagged_to_int32(), big);
        let expected = t.graph.int32_constant(1);
        assert_eq!(t.reduce(node), Reduction::Replace(expected));

        let node = t.unop(t.simplified.change_tagged_to_uint32(), number);
        let expected = t.graph.int32_constant(-1);
        assert_eq!(t.reduce(node), Reduction::Replace(expected));
    }

    #[test]
    fn untagging_cancels_tagging() {
        let mut t = Tester::new();

        let tagged = t.unop(t.simplified.change_float64_to_tagged(), t.param);
        let node = t.unop(t.simplified.change_tagged_to_float64(), tagged);
        assert_eq!(t.reduce(node), Reduction::Replace(t.param));

        let tagged = t.unop(t.simplified.change_int32_to_tagged(), t.param);
        let node = t.unop(t.simplified.change_tagged_to_int32(), tagged);
        assert_eq!(t.reduce(node), Reduction::Replace(t.param));

        let tagged = t.unop(t.simplified.change_uint32_to_tagged(), t.param);
        let node = t.unop(t.simplified.change_tagged_to_uint32(), tagged);
        assert_eq!(t.reduce(node), Reduction::Replace(t.param));
    }

    #[test]
    fn untagging_skips_intermediate_tagging() {
        let mut t = Tester::new();
        let cases = [
            (
                t.simplified.change_int32_to_tagged(),
                t.simplified.change_tagged_to_float64(),
                Opcode::ChangeInt32ToFloat64,
            ),
            (
                t.simplified.change_uint32_to_tagged(),
                t.simplified.change_tagged_to_float64(),
                Opcode::ChangeUint32ToFloat64,
            ),
            (
                t.simplified.change_float64_to_tagged(),
                t.simplified.change_tagged_to_int32(),
                Opcode::ChangeFloat64ToInt32,
            ),
            (
                t.simplified.change_float64_to_tagged(),
                t.simplified.change_tagged_to_uint32(),
                Opcode::ChangeFloat64ToUint32,
            ),
        ];

        for (tag, untag, expected) in cases {
            let tagged = t.unop(tag, t.param);
            let node = t.unop(untag, tagged);
            assert_eq!(t.reduce(node), Reduction::Changed(node));
            assert_eq!(t.graph.opcode(node), expected);
            assert_eq!(t.graph.inputs(node), &[t.param]);
            assert_eq!(t.graph.use_count(tagged), 0);
        }
    }

    #[test]
    fn reduced_nodes_do_not_change() {
        let mut t = Tester::new();
        let phi_like = t.unop(t.simplified.change_tagged_to_float64(), t.param);
        assert_eq!(t.reduce(phi_like), Reduction::NoChange);

        let constant = t.graph.constant(1.0);
        assert_eq!(t.reduce(constant), Reduction::NoChange);
        assert_eq!(t.reduce(t.param), Reduction::NoChange);

        let load = t.graph.make_node(
            MachineOperatorBuilder::new().load(MACH_ANY_TAGGED),
            &[t.param, constant, t.param],
        );
        assert_eq!(t.reduce(load), Reduction::NoChange);
    }
}
