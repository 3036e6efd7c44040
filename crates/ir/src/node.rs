//! Nodes of the sea-of-nodes graph.
use std::fmt;

use cranelift_entity::{packed_option::ReservedValue, EntityRef};
use smallvec::SmallVec;

use crate::{operator::Operator, types::Bounds};

/// Identifies one graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GraphId(pub(crate) u32);

impl GraphId {
    /// The owner of ids minted by the arena itself, before a graph claims
    /// them. No graph has this id.
    pub(crate) const UNOWNED: Self = Self(0);
}

/// An opaque reference to a [`Node`] of a [`Graph`](crate::Graph).
///
/// An id remembers the graph that issued it, and graphs reject ids issued
/// by any other graph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    graph: GraphId,
    index: u32,
}

impl NodeId {
    pub(crate) fn owned_by(self, graph: GraphId) -> Self {
        Self {
            graph,
            index: self.index,
        }
    }

    pub fn graph(self) -> GraphId {
        self.graph
    }

    pub fn as_u32(self) -> u32 {
        self.index
    }
}

impl EntityRef for NodeId {
    fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize);
        Self {
            graph: GraphId::UNOWNED,
            index: index as u32,
        }
    }

    fn index(self) -> usize {
        self.index as usize
    }
}

impl ReservedValue for NodeId {
    fn reserved_value() -> Self {
        Self {
            graph: GraphId(u32::MAX),
            index: u32::MAX,
        }
    }

    fn is_reserved_value(&self) -> bool {
        *self == Self::reserved_value()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// One operation of the graph.
///
/// Inputs are laid out by zone: value inputs first, then the context, the
/// frame states, the effects and finally the control inputs. Zone sizes are
/// given by the operator.
#[derive(Debug, Clone)]
pub struct Node {
    op: Operator,
    inputs: SmallVec<[NodeId; 4]>,
    bounds: Bounds,
}

impl Node {
    pub(crate) fn new(op: Operator, inputs: SmallVec<[NodeId; 4]>) -> Self {
        Self {
            op,
            inputs,
            bounds: Bounds::default(),
        }
    }

    pub fn op(&self) -> &Operator {
        &self.op
    }

    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn first_value_index(&self) -> usize {
        0
    }

    pub fn first_context_index(&self) -> usize {
        self.past_value_index()
    }

    pub fn first_frame_state_index(&self) -> usize {
        self.past_context_index()
    }

    pub fn first_effect_index(&self) -> usize {
        self.past_frame_state_index()
    }

    pub fn first_control_index(&self) -> usize {
        self.past_effect_index()
    }

    pub fn past_value_index(&self) -> usize {
        self.first_value_index() + self.op.value_input_count()
    }

    pub fn past_context_index(&self) -> usize {
        self.first_context_index() + self.op.context_input_count()
    }

    pub fn past_frame_state_index(&self) -> usize {
        self.first_frame_state_index() + self.op.frame_state_input_count()
    }

    pub fn past_effect_index(&self) -> usize {
        self.first_effect_index() + self.op.effect_input_count()
    }

    pub fn past_control_index(&self) -> usize {
        self.first_control_index() + self.op.control_input_count()
    }

    /// Classifies the input slot `index`.
    ///
    /// Slots past the declared arity, which only exist transiently while a
    /// node is being rebuilt with [`Graph::append_input`](crate::Graph::append_input),
    /// count as value inputs.
    pub fn edge_kind(&self, index: usize) -> EdgeKind {
        if index < self.past_value_index() {
            EdgeKind::Value
        } else if index < self.past_context_index() {
            EdgeKind::Context
        } else if index < self.past_frame_state_index() {
            EdgeKind::FrameState
        } else if index < self.past_effect_index() {
            EdgeKind::Effect
        } else if index < self.past_control_index() {
            EdgeKind::Control
        } else {
            EdgeKind::Value
        }
    }

    pub(crate) fn set_op(&mut self, op: Operator) {
        self.op = op;
    }

    pub(crate) fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub(crate) fn inputs_mut(&mut self) -> &mut SmallVec<[NodeId; 4]> {
        &mut self.inputs
    }
}

/// A use of a node: input slot `index` of `user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub user: NodeId,
    pub index: u32,
}

impl Edge {
    pub fn new(user: NodeId, index: usize) -> Self {
        Self {
            user,
            index: index as u32,
        }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Value,
    Context,
    FrameState,
    Effect,
    Control,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::CommonOperatorBuilder;

    #[test]
    fn zone_boundaries() {
        let common = CommonOperatorBuilder::new();
        let phi = common.phi(crate::machine_type::MACH_INT32, 2);
        let inputs = (0..3).map(NodeId::new).collect();
        let node = Node::new(phi, inputs);

        assert_eq!(node.past_value_index(), 2);
        assert_eq!(node.first_context_index(), 2);
        assert_eq!(node.first_effect_index(), 2);
        assert_eq!(node.first_control_index(), 2);
        assert_eq!(node.past_control_index(), 3);

        assert_eq!(node.edge_kind(0), EdgeKind::Value);
        assert_eq!(node.edge_kind(1), EdgeKind::Value);
        assert_eq!(node.edge_kind(2), EdgeKind::Control);
    }

    #[test]
    fn display() {
        let node = NodeId::new(12).owned_by(GraphId(3));
        assert_eq!(node.to_string(), "#12");
        assert_eq!(format!("{node:?}"), "#12");
        assert_eq!(node.as_u32(), 12);
        assert_eq!(node.graph(), GraphId(3));
    }

    #[test]
    fn ids_of_different_graphs_differ() {
        let a = NodeId::new(1).owned_by(GraphId(1));
        let b = NodeId::new(1).owned_by(GraphId(2));
        assert_ne!(a, b);
        assert_eq!(a.index(), b.index());
        assert!(NodeId::reserved_value().is_reserved_value());
        assert!(!a.is_reserved_value());
    }
}
