//! This module contains a fixed-point driver for local graph reductions.
use std::collections::VecDeque;

use cranelift_entity::SecondaryMap;
use reef_ir::{Graph, NodeId};
use smallvec::SmallVec;

/// The outcome of reducing one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    NoChange,
    /// The node was rewritten in place.
    Changed(NodeId),
    /// All uses of the node should be redirected to the given node.
    Replace(NodeId),
}

impl Reduction {
    pub fn changed(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// A local rewrite rule set. A reducer only looks at `node` and its inputs.
pub trait Reducer {
    fn reduce(&mut self, graph: &mut Graph, node: NodeId) -> Reduction;
}

/// Applies a set of reducers until none of them fires.
#[derive(Default)]
pub struct GraphReducer<'a> {
    reducers: Vec<Box<dyn Reducer + 'a>>,
    worklist: VecDeque<NodeId>,
    queued: SecondaryMap<NodeId, bool>,
    max_steps: Option<usize>,
}

impl<'a> GraphReducer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds the number of reduction steps of one run.
    ///
    /// # Panics
    /// A run that needs more steps panics, since a well-formed set of
    /// reducers always converges.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn add_reducer(&mut self, reducer: impl Reducer + 'a) {
        self.reducers.push(Box::new(reducer));
    }

    /// Reduces every node reachable from the end of `graph`.
    pub fn reduce_graph(&mut self, graph: &mut Graph) {
        let Some(end) = graph.end() else {
            return;
        };

        for node in post_order(graph, end) {
            self.enqueue(node);
        }
        self.run(graph);
    }

    /// Reduces `node` and everything its reductions touch.
    pub fn reduce_node(&mut self, graph: &mut Graph, node: NodeId) {
        self.enqueue(node);
        self.run(graph);
    }

    fn run(&mut self, graph: &mut Graph) {
        let mut steps = 0;
        while let Some(node) = self.worklist.pop_front() {
            self.queued[node] = false;
            steps += 1;
            if let Some(max_steps) = self.max_steps {
                assert!(
                    steps <= max_steps,
                    "graph reduction did not converge within {max_steps} steps"
                );
            }

            self.reduce(graph, node);
        }
    }

    fn reduce(&mut self, graph: &mut Graph, node: NodeId) {
        let reduction = self
            .reducers
            .iter_mut()
            .map(|reducer| reducer.reduce(graph, node))
            .find(|reduction| reduction.changed())
            .unwrap_or(Reduction::NoChange);

        match reduction {
            Reduction::NoChange => {}

            Reduction::Replace(replacement) if replacement != node => {
                log::trace!("replaced {node} with {replacement}");
                let users: SmallVec<[NodeId; 8]> = graph.users(node).collect();
                graph.replace_uses(node, replacement);
                for user in users {
                    self.enqueue(user);
                }
                self.enqueue(replacement);
            }

            Reduction::Changed(_) | Reduction::Replace(_) => {
                log::trace!("changed {node} to {}", graph.op(node));
                let users: SmallVec<[NodeId; 8]> = graph.users(node).collect();
                for user in users {
                    self.enqueue(user);
                }
                self.enqueue(node);
            }
        }
    }

    fn enqueue(&mut self, node: NodeId) {
        if self.queued[node] {
            return;
        }
        log::trace!("enqueued {node}");
        self.queued[node] = true;
        self.worklist.push_back(node);
    }
}

/// Returns the nodes reachable from `root` through inputs, inputs first.
fn post_order(graph: &Graph, root: NodeId) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut visited: SecondaryMap<NodeId, bool> = SecondaryMap::default();
    let mut stack = vec![(root, 0)];
    visited[root] = true;

    while let Some((node, next_input)) = stack.pop() {
        match graph.inputs(node).get(next_input) {
            Some(&input) => {
                stack.push((node, next_input + 1));
                if !visited[input] {
                    visited[input] = true;
                    stack.push((input, 0));
                }
            }
            None => order.push(node),
        }
    }
    order
}
