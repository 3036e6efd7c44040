//! Textual dump of a graph, one node per line in id order.
use std::io;

use crate::{graph::Graph, node::NodeId};

pub struct GraphWriter<'a> {
    graph: &'a Graph,
}

impl<'a> GraphWriter<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    pub fn write(&self, mut w: impl io::Write) -> io::Result<()> {
        for node in self.graph.node_ids() {
            self.write_node(node, &mut w)?;
            writeln!(w)?;
        }
        Ok(())
    }

    pub fn write_node(&self, node: NodeId, mut w: impl io::Write) -> io::Result<()> {
        write!(w, "{node}: {}(", self.graph.op(node))?;
        let mut inputs = self.graph.inputs(node).iter();
        if let Some(first) = inputs.next() {
            write!(w, "{first}")?;
            for input in inputs {
                write!(w, ", {input}")?;
            }
        }
        write!(w, ")")
    }

    pub fn dump_string(&self) -> io::Result<String> {
        let mut s = Vec::new();
        self.write(&mut s)?;
        String::from_utf8(s).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }
}
