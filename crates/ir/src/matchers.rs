//! Read-only queries for statically known node values.
use crate::{
    conversions::{fast_d2i, fast_d2ui},
    graph::Graph,
    node::NodeId,
    operator::Opcode,
    value::HeapObject,
};

impl Graph {
    pub fn is_opcode(&self, node: NodeId, opcode: Opcode) -> bool {
        self.opcode(node) == opcode
    }

    /// The value of an `Int32Constant`, or the int32 truncation of a
    /// `NumberConstant`.
    pub fn int32_value(&self, node: NodeId) -> Option<i32> {
        let op = self.op(node);
        match op.opcode() {
            Opcode::Int32Constant => Some(op.int32_param()),
            Opcode::NumberConstant => Some(fast_d2i(op.float64_param())),
            _ => None,
        }
    }

    pub fn uint32_value(&self, node: NodeId) -> Option<u32> {
        let op = self.op(node);
        match op.opcode() {
            Opcode::Int32Constant => Some(op.int32_param() as u32),
            Opcode::NumberConstant => Some(fast_d2ui(op.float64_param())),
            _ => None,
        }
    }

    pub fn int64_value(&self, node: NodeId) -> Option<i64> {
        let op = self.op(node);
        match op.opcode() {
            Opcode::Int32Constant => Some(op.int32_param() as i64),
            Opcode::Int64Constant => Some(op.int64_param()),
            _ => None,
        }
    }

    pub fn float64_value(&self, node: NodeId) -> Option<f64> {
        let op = self.op(node);
        match op.opcode() {
            Opcode::Float64Constant | Opcode::NumberConstant => Some(op.float64_param()),
            Opcode::Int32Constant => Some(op.int32_param() as f64),
            _ => None,
        }
    }

    pub fn heap_object_value(&self, node: NodeId) -> Option<HeapObject> {
        let op = self.op(node);
        match op.opcode() {
            Opcode::HeapConstant => Some(op.heap_param()),
            _ => None,
        }
    }

    /// Returns `true` if `node` is the canonical true or false object.
    pub fn boolean_value(&self, node: NodeId) -> Option<bool> {
        self.heap_object_value(node).and_then(HeapObject::as_bool)
    }
}
