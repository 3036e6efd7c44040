//! Canonical constant nodes.
//!
//! Every constant is created at most once per graph. Floating point keys
//! compare by bit pattern, so `0.0` and `-0.0` get distinct nodes while all
//! NaNs share one.
use crate::{
    graph::Graph,
    node::NodeId,
    operator::Operator,
    types::{Bounds, Type},
    value::{ExternalReference, HeapObject},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ConstantKey {
    Int32(i32),
    Int64(i64),
    Float64(u64),
    Number(u64),
    External(ExternalReference),
    Heap(HeapObject),
}

fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

fn canonical(value: f64) -> f64 {
    f64::from_bits(canonical_bits(value))
}

impl Graph {
    fn cached_constant(
        &mut self,
        key: ConstantKey,
        make_op: impl FnOnce(&Self) -> Operator,
        bounds: Bounds,
    ) -> NodeId {
        if let Some(&node) = self.constants.get(&key) {
            return node;
        }

        let op = make_op(self);
        let node = self.make_node(op, &[]);
        self.set_bounds(node, bounds);
        self.constants.insert(key, node);
        log::trace!("new constant {node}: {}", self.op(node));
        node
    }

    /// A tagged number. The same as [`Graph::number_constant`].
    pub fn constant(&mut self, value: f64) -> NodeId {
        self.number_constant(value)
    }

    pub fn constant_i32(&mut self, value: i32) -> NodeId {
        self.number_constant(value as f64)
    }

    /// A tagged constant for `obj`. Boxed numbers become number constants.
    pub fn constant_heap(&mut self, obj: HeapObject) -> NodeId {
        match obj {
            HeapObject::Number(value) => self.number_constant(value),
            _ => self.heap_constant(obj),
        }
    }

    pub fn number_constant(&mut self, value: f64) -> NodeId {
        let value = canonical(value);
        self.cached_constant(
            ConstantKey::Number(value.to_bits()),
            |graph| graph.common.number_constant(value),
            Bounds::exact(Type::of(value)),
        )
    }

    pub fn int32_constant(&mut self, value: i32) -> NodeId {
        self.cached_constant(
            ConstantKey::Int32(value),
            |graph| graph.common.int32_constant(value),
            Bounds::exact(Type::of(value as f64)),
        )
    }

    pub fn int64_constant(&mut self, value: i64) -> NodeId {
        self.cached_constant(
            ConstantKey::Int64(value),
            |graph| graph.common.int64_constant(value),
            Bounds::exact(Type::of(value as f64)),
        )
    }

    pub fn float64_constant(&mut self, value: f64) -> NodeId {
        let value = canonical(value);
        self.cached_constant(
            ConstantKey::Float64(value.to_bits()),
            |graph| graph.common.float64_constant(value),
            Bounds::exact(Type::of(value)),
        )
    }

    pub fn external_constant(&mut self, value: ExternalReference) -> NodeId {
        self.cached_constant(
            ConstantKey::External(value),
            |graph| graph.common.external_constant(value),
            Bounds::exact(Type::INTERNAL),
        )
    }

    pub fn heap_constant(&mut self, obj: HeapObject) -> NodeId {
        let obj = match obj {
            HeapObject::Number(value) => HeapObject::Number(canonical(value)),
            _ => obj,
        };
        self.cached_constant(
            ConstantKey::Heap(obj),
            |graph| graph.common.heap_constant(obj),
            Bounds::exact(obj.ty()),
        )
    }

    pub fn undefined_constant(&mut self) -> NodeId {
        self.heap_constant(HeapObject::Undefined)
    }

    pub fn the_hole_constant(&mut self) -> NodeId {
        self.heap_constant(HeapObject::TheHole)
    }

    pub fn true_constant(&mut self) -> NodeId {
        self.heap_constant(HeapObject::True)
    }

    pub fn false_constant(&mut self) -> NodeId {
        self.heap_constant(HeapObject::False)
    }

    pub fn null_constant(&mut self) -> NodeId {
        self.heap_constant(HeapObject::Null)
    }

    pub fn zero_constant(&mut self) -> NodeId {
        self.number_constant(0.0)
    }

    pub fn one_constant(&mut self) -> NodeId {
        self.number_constant(1.0)
    }

    pub fn nan_constant(&mut self) -> NodeId {
        self.number_constant(f64::NAN)
    }
}
