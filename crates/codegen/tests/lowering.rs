//! Representation changes followed by simplified reductions over a whole
//! graph.
use reef_codegen::{
    optim::{GraphReducer, SimplifiedOperatorReducer},
    ChangerConfig, RepresentationChanger,
};
use reef_ir::{machine_type::*, prelude::*, Graph, GraphWriter, NodeId, Opcode};

/// Builds `return value` and returns the return node.
fn finish(graph: &mut Graph, value: NodeId) -> NodeId {
    let common = CommonOperatorBuilder::new();
    let start = graph.start().unwrap();
    let ret = graph.make_node(common.ret(), &[value, start, start]);
    let end = graph.make_node(common.end(), &[ret]);
    graph.set_end(end);
    ret
}

fn new_graph() -> (Graph, NodeId) {
    let common = CommonOperatorBuilder::new();
    let mut graph = Graph::new();
    let start = graph.make_node(common.start(1), &[]);
    graph.set_start(start);
    let param = graph.make_node(common.parameter(0), &[start]);
    (graph, param)
}

fn simplify(graph: &mut Graph) {
    let mut reducer = GraphReducer::new().with_max_steps(1000);
    reducer.add_reducer(SimplifiedOperatorReducer::new());
    reducer.reduce_graph(graph);
}

#[test]
fn tagging_round_trip_is_removed() {
    let (mut graph, param) = new_graph();
    let mut changer = RepresentationChanger::new(ChangerConfig::testing());
    let tagged = changer.get_representation_for(&mut graph, param, MACH_INT32, MACH_ANY_TAGGED);
    let float = changer.get_representation_for(&mut graph, tagged, MACH_ANY_TAGGED, MACH_FLOAT64);
    let ret = finish(&mut graph, float);

    simplify(&mut graph);

    let value = graph.value_input(ret, 0);
    assert_eq!(value, float);
    assert_eq!(graph.opcode(value), Opcode::ChangeInt32ToFloat64);
    assert_eq!(graph.inputs(value), &[param]);
    assert_eq!(graph.use_count(tagged), 0);
    assert!(!changer.had_type_error());
}

#[test]
fn boolean_chain_folds_to_constant() {
    let simplified = SimplifiedOperatorBuilder::new();
    let (mut graph, _) = new_graph();
    let one = graph.int32_constant(1);
    let to_bool = graph.make_node(simplified.change_bit_to_bool(), &[one]);
    let not = graph.make_node(simplified.boolean_not(), &[to_bool]);
    let not_not = graph.make_node(simplified.boolean_not(), &[not]);
    let ret = finish(&mut graph, not_not);

    simplify(&mut graph);

    let truth = graph.true_constant();
    assert_eq!(graph.value_input(ret, 0), truth);
    for dead in [to_bool, not, not_not] {
        assert_eq!(graph.use_count(dead), 0);
    }
}

#[test]
fn lowered_graph_dump() {
    let (mut graph, param) = new_graph();
    let mut changer = RepresentationChanger::new(ChangerConfig::testing());
    let float = changer.get_representation_for(&mut graph, param, MACH_ANY_TAGGED, MACH_FLOAT64);
    let tagged = changer.get_representation_for(&mut graph, float, MACH_FLOAT64, MACH_ANY_TAGGED);
    let again = changer.get_representation_for(&mut graph, tagged, MACH_ANY_TAGGED, MACH_FLOAT64);
    finish(&mut graph, again);

    simplify(&mut graph);

    let text = GraphWriter::new(&graph).dump_string().unwrap();
    insta::assert_snapshot!(text, @r"
    #0: Start()
    #1: Parameter[0](#0)
    #2: ChangeTaggedToFloat64(#1)
    #3: ChangeFloat64ToTagged(#2)
    #4: ChangeTaggedToFloat64(#3)
    #5: Return(#2, #0, #0)
    #6: End(#5)
    ");
}
