//! The node arena together with its use-lists.
use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicU32, Ordering},
};

use cranelift_entity::{packed_option::PackedOption, PrimaryMap, SecondaryMap};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    constants::ConstantKey,
    node::{Edge, EdgeKind, GraphId, Node, NodeId},
    operator::{CommonOperatorBuilder, Opcode, Operator},
    types::Bounds,
};

// Zero is `GraphId::UNOWNED`.
static NEXT_GRAPH_ID: AtomicU32 = AtomicU32::new(1);

pub struct Graph {
    id: GraphId,
    nodes: PrimaryMap<NodeId, Node>,
    uses: SecondaryMap<NodeId, BTreeSet<Edge>>,
    start: PackedOption<NodeId>,
    end: PackedOption<NodeId>,
    pub(crate) constants: FxHashMap<ConstantKey, NodeId>,
    pub(crate) common: CommonOperatorBuilder,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            id: GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed)),
            nodes: PrimaryMap::default(),
            uses: SecondaryMap::default(),
            start: None.into(),
            end: None.into(),
            constants: FxHashMap::default(),
            common: CommonOperatorBuilder::new(),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Creates a node and registers it as a user of each of its inputs.
    ///
    /// # Panics
    /// Panics if the number of inputs differs from the operator's declared
    /// input count, or if an input is not a node of this graph.
    pub fn make_node(&mut self, op: Operator, inputs: &[NodeId]) -> NodeId {
        assert_eq!(
            inputs.len(),
            op.input_count(),
            "{} expects {} inputs",
            op.mnemonic(),
            op.input_count()
        );
        for &input in inputs {
            self.check_node(input);
        }

        let node = self
            .nodes
            .push(Node::new(op, SmallVec::from_slice(inputs)))
            .owned_by(self.id);
        for (index, &input) in inputs.iter().enumerate() {
            self.uses[input].insert(Edge::new(node, index));
        }
        node
    }

    pub fn node(&self, node: NodeId) -> &Node {
        self.data(node)
    }

    pub fn op(&self, node: NodeId) -> &Operator {
        self.data(node).op()
    }

    pub fn opcode(&self, node: NodeId) -> Opcode {
        self.op(node).opcode()
    }

    pub fn set_op(&mut self, node: NodeId, op: Operator) {
        self.data_mut(node).set_op(op);
    }

    pub fn is_control(&self, node: NodeId) -> bool {
        self.opcode(node).is_control()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.graph() == self.id && self.nodes.is_valid(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        let id = self.id;
        self.nodes.keys().map(move |node| node.owned_by(id))
    }

    pub fn start(&self) -> Option<NodeId> {
        self.start.expand()
    }

    pub fn set_start(&mut self, start: NodeId) {
        self.check_node(start);
        self.start = start.into();
    }

    pub fn end(&self) -> Option<NodeId> {
        self.end.expand()
    }

    pub fn set_end(&mut self, end: NodeId) {
        self.check_node(end);
        self.end = end.into();
    }

    pub fn bounds(&self, node: NodeId) -> Bounds {
        self.data(node).bounds()
    }

    pub fn set_bounds(&mut self, node: NodeId, bounds: Bounds) {
        self.data_mut(node).set_bounds(bounds);
    }

    pub fn inputs(&self, node: NodeId) -> &[NodeId] {
        self.data(node).inputs()
    }

    pub fn input_count(&self, node: NodeId) -> usize {
        self.data(node).input_count()
    }

    pub fn input_at(&self, node: NodeId, index: usize) -> NodeId {
        self.data(node).inputs()[index]
    }

    pub fn value_input(&self, node: NodeId, index: usize) -> NodeId {
        let data = self.data(node);
        debug_assert!(index < data.op().value_input_count(), "value input out of range");
        data.inputs()[data.first_value_index() + index]
    }

    pub fn context_input(&self, node: NodeId) -> NodeId {
        let data = self.data(node);
        debug_assert!(data.op().has_context_input(), "{} has no context", data.op());
        data.inputs()[data.first_context_index()]
    }

    pub fn frame_state_input(&self, node: NodeId) -> NodeId {
        let data = self.data(node);
        debug_assert!(
            data.op().has_frame_state_input(),
            "{} has no frame state",
            data.op()
        );
        data.inputs()[data.first_frame_state_index()]
    }

    pub fn effect_input(&self, node: NodeId, index: usize) -> NodeId {
        let data = self.data(node);
        debug_assert!(index < data.op().effect_input_count(), "effect input out of range");
        data.inputs()[data.first_effect_index() + index]
    }

    pub fn control_input(&self, node: NodeId, index: usize) -> NodeId {
        let data = self.data(node);
        debug_assert!(
            index < data.op().control_input_count(),
            "control input out of range"
        );
        data.inputs()[data.first_control_index() + index]
    }

    /// Replaces input slot `index` of `node`, keeping both use-lists in sync.
    pub fn replace_input(&mut self, node: NodeId, index: usize, new: NodeId) {
        self.check_node(node);
        self.check_node(new);
        let old = self.data(node).inputs()[index];
        if old == new {
            return;
        }

        let edge = Edge::new(node, index);
        self.uses[old].remove(&edge);
        self.uses[new].insert(edge);
        self.data_mut(node).inputs_mut()[index] = new;
    }

    /// Appends an input past the current last slot. The operator is expected
    /// to be updated with [`Graph::set_op`] to cover it.
    pub fn append_input(&mut self, node: NodeId, input: NodeId) {
        self.check_node(node);
        self.check_node(input);
        let index = self.data(node).input_count();
        self.data_mut(node).inputs_mut().push(input);
        self.uses[input].insert(Edge::new(node, index));
    }

    /// Drops every input at or after `count`.
    pub fn trim_input_count(&mut self, node: NodeId, count: usize) {
        self.check_node(node);
        let len = self.data(node).input_count();
        assert!(count <= len, "cannot trim {len} inputs to {count}");

        for index in count..len {
            let input = self.data(node).inputs()[index];
            self.uses[input].remove(&Edge::new(node, index));
        }
        self.data_mut(node).inputs_mut().truncate(count);
    }

    /// Drops the context, frame state, effect and control inputs of `node`.
    pub fn remove_non_value_inputs(&mut self, node: NodeId) {
        let count = self.data(node).op().value_input_count();
        self.trim_input_count(node, count);
    }

    pub fn replace_effect_input(&mut self, node: NodeId, effect: NodeId, index: usize) {
        let data = self.data(node);
        debug_assert!(index < data.op().effect_input_count(), "effect input out of range");
        let slot = data.first_effect_index() + index;
        self.replace_input(node, slot, effect);
    }

    pub fn replace_control_input(&mut self, node: NodeId, control: NodeId) {
        let data = self.data(node);
        debug_assert!(data.op().control_input_count() > 0, "{} has no control", data.op());
        let slot = data.first_control_index();
        self.replace_input(node, slot, control);
    }

    /// Returns all uses of `node`, ordered by user and slot.
    pub fn uses(&self, node: NodeId) -> impl Iterator<Item = Edge> + '_ {
        debug_assert!(self.contains(node), "{node} does not belong to graph {:?}", self.id);
        self.uses[node].iter().copied()
    }

    pub fn use_count(&self, node: NodeId) -> usize {
        debug_assert!(self.contains(node), "{node} does not belong to graph {:?}", self.id);
        self.uses[node].len()
    }

    /// Returns the distinct nodes using `node`.
    pub fn users(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut last = None;
        self.uses(node).filter_map(move |edge| {
            if last == Some(edge.user) {
                None
            } else {
                last = Some(edge.user);
                Some(edge.user)
            }
        })
    }

    pub fn edge_kind(&self, edge: Edge) -> EdgeKind {
        self.nodes[edge.user].edge_kind(edge.index())
    }

    pub fn is_value_edge(&self, edge: Edge) -> bool {
        self.edge_kind(edge) == EdgeKind::Value
    }

    pub fn is_context_edge(&self, edge: Edge) -> bool {
        self.edge_kind(edge) == EdgeKind::Context
    }

    pub fn is_frame_state_edge(&self, edge: Edge) -> bool {
        self.edge_kind(edge) == EdgeKind::FrameState
    }

    pub fn is_effect_edge(&self, edge: Edge) -> bool {
        self.edge_kind(edge) == EdgeKind::Effect
    }

    pub fn is_control_edge(&self, edge: Edge) -> bool {
        self.edge_kind(edge) == EdgeKind::Control
    }

    /// Redirects every use of `node` to `replacement`.
    pub fn replace_uses(&mut self, node: NodeId, replacement: NodeId) {
        self.check_node(node);
        self.check_node(replacement);
        if node == replacement {
            return;
        }

        let uses = std::mem::take(&mut self.uses[node]);
        for edge in uses {
            self.nodes[edge.user].inputs_mut()[edge.index()] = replacement;
            self.uses[replacement].insert(edge);
        }
    }

    /// Replaces `node` by a value and an effect: effect uses are redirected
    /// to `effect`, every other use to `value`.
    ///
    /// Without an explicit `effect`, the first effect input of `node` is used.
    ///
    /// # Panics
    /// Panics if `node` produces control, or if it has an effect use but no
    /// effect replacement is available.
    pub fn replace_with_value(&mut self, node: NodeId, value: NodeId, effect: Option<NodeId>) {
        self.check_node(node);
        assert!(
            !self.op(node).has_control_output(),
            "{node}:{} produces control",
            self.op(node).mnemonic()
        );
        self.check_node(value);
        if let Some(effect) = effect {
            self.check_node(effect);
        }

        let effect = effect.or_else(|| {
            self.op(node)
                .has_effect_input()
                .then(|| self.effect_input(node, 0))
        });

        let uses = std::mem::take(&mut self.uses[node]);
        for edge in uses {
            let replacement = if self.is_effect_edge(edge) {
                match effect {
                    Some(effect) => effect,
                    None => panic!("effect use of {node} without an effect replacement"),
                }
            } else {
                value
            };
            self.nodes[edge.user].inputs_mut()[edge.index()] = replacement;
            self.uses[replacement].insert(edge);
        }
    }

    fn data(&self, node: NodeId) -> &Node {
        debug_assert!(self.contains(node), "{node} does not belong to graph {:?}", self.id);
        &self.nodes[node]
    }

    fn data_mut(&mut self, node: NodeId) -> &mut Node {
        self.check_node(node);
        &mut self.nodes[node]
    }

    /// Rejects ids issued by another graph, even when their index is in
    /// range here.
    fn check_node(&self, node: NodeId) {
        assert!(
            self.contains(node),
            "{node} of graph {:?} does not belong to graph {:?}",
            node.graph(),
            self.id
        );
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
