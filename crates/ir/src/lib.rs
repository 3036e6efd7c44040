pub mod bits;
pub mod conversions;
pub mod graph;
pub mod ir_writer;
pub mod linkage;
pub mod machine_type;
pub mod node;
pub mod operator;
pub mod rng;
pub mod types;
pub mod value;

mod constants;
mod matchers;

pub use graph::Graph;
pub use ir_writer::GraphWriter;
pub use linkage::{CallDescriptor, CallKind};
pub use machine_type::{MachineSignature, MachineType, Signature, SignatureBuilder};
pub use node::{Edge, EdgeKind, GraphId, Node, NodeId};
pub use operator::{Opcode, Operator, Properties};
pub use types::{Bounds, Type};
pub use value::{ExternalReference, HeapObject};

pub mod prelude {
    pub use crate::operator::{
        CommonOperatorBuilder, MachineOperatorBuilder, SimplifiedOperatorBuilder,
    };
}
