//! Changes the machine representation of values.
//!
//! [`RepresentationChanger::get_representation_for`] takes a node producing
//! values of one machine type and returns a node that produces the same
//! values in the representation a use expects. Conversions of constants are
//! folded eagerly into new constants; everything else gets an explicit
//! conversion node.
use reef_ir::{
    conversions::{double_to_int32, double_to_uint32, is_int32_double, is_uint32_double},
    machine_type::MACH_ANY_TAGGED,
    operator::{MachineOperatorBuilder, SimplifiedOperatorBuilder},
    Graph, MachineType, NodeId, Opcode, Operator, Type,
};
use reef_triple::TargetTriple;

/// What to do when no conversion exists between two representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeErrorMode {
    /// Abort compilation. A representation error is a compiler bug.
    #[default]
    Abort,
    /// Record the error and hand back the unconverted node.
    Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangerConfig {
    pub type_errors: TypeErrorMode,
    /// Size of a tagged value and of an untagged pointer, in bytes.
    pub pointer_width: usize,
}

impl ChangerConfig {
    pub fn for_triple(triple: &TargetTriple) -> Self {
        Self {
            type_errors: TypeErrorMode::Abort,
            pointer_width: triple.pointer_width(),
        }
    }

    pub fn testing() -> Self {
        Self {
            type_errors: TypeErrorMode::Record,
            ..Self::default()
        }
    }
}

impl Default for ChangerConfig {
    fn default() -> Self {
        Self {
            type_errors: TypeErrorMode::Abort,
            pointer_width: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("RepresentationChangerError: node {node}:{mnemonic} of {output} cannot be changed to {use_type}")]
pub struct RepresentationError {
    pub node: NodeId,
    pub mnemonic: &'static str,
    pub output: MachineType,
    pub use_type: MachineType,
}

/// Whether the base pointer of a memory access is a tagged object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseTaggedness {
    Untagged,
    Tagged,
}

/// Representations of at most 32 bits. Loads extend them to a full word and
/// stores truncate them, so values move freely between them.
const REP_WORD: MachineType = MachineType::REP_NARROW_WORD;

pub struct RepresentationChanger {
    config: ChangerConfig,
    simplified: SimplifiedOperatorBuilder,
    machine: MachineOperatorBuilder,
    type_error: bool,
}

impl RepresentationChanger {
    pub fn new(config: ChangerConfig) -> Self {
        Self {
            config,
            simplified: SimplifiedOperatorBuilder::new(),
            machine: MachineOperatorBuilder::new(),
            type_error: false,
        }
    }

    pub fn config(&self) -> &ChangerConfig {
        &self.config
    }

    /// Returns `true` once any conversion failed.
    pub fn had_type_error(&self) -> bool {
        self.type_error
    }

    /// Returns a node producing the values of `node` in the representation
    /// of `use_type`.
    ///
    /// # Panics
    /// Panics on a representation error unless the changer was configured
    /// with [`TypeErrorMode::Record`], in which case the error is recorded
    /// and `node` is returned.
    pub fn get_representation_for(
        &mut self,
        graph: &mut Graph,
        node: NodeId,
        output_type: MachineType,
        use_type: MachineType,
    ) -> NodeId {
        match self.try_get_representation_for(graph, node, output_type, use_type) {
            Ok(node) => node,
            Err(err) => self.report(err),
        }
    }

    pub fn try_get_representation_for(
        &self,
        graph: &mut Graph,
        node: NodeId,
        output_type: MachineType,
        use_type: MachineType,
    ) -> Result<NodeId, RepresentationError> {
        if !output_type.has_single_representation() {
            return Err(type_error(graph, node, output_type, use_type));
        }
        if use_type.representation_bits() == output_type.representation_bits() {
            return Ok(node);
        }
        if use_type.intersects(REP_WORD) && output_type.intersects(REP_WORD) {
            return Ok(node);
        }

        if use_type.intersects(MachineType::REP_TAGGED) {
            self.get_tagged_representation_for(graph, node, output_type)
        } else if use_type.intersects(MachineType::REP_FLOAT64) {
            self.get_float64_representation_for(graph, node, output_type)
        } else if use_type.intersects(MachineType::REP_BIT) {
            self.get_bit_representation_for(graph, node, output_type)
        } else if use_type.intersects(REP_WORD) {
            let use_unsigned = use_type.intersects(MachineType::TYPE_UINT32);
            self.get_word32_representation_for(graph, node, output_type, use_unsigned)
        } else if use_type.intersects(MachineType::REP_WORD64) {
            self.get_word64_representation_for(graph, node, output_type)
        } else {
            Ok(node)
        }
    }

    pub fn get_tagged_representation_for(
        &self,
        graph: &mut Graph,
        node: NodeId,
        output_type: MachineType,
    ) -> Result<NodeId, RepresentationError> {
        let use_type = MachineType::REP_TAGGED;
        match graph.opcode(node) {
            Opcode::NumberConstant | Opcode::HeapConstant => return Ok(node),
            Opcode::Int32Constant => {
                let value = graph.op(node).int32_param();
                let folded = if output_type.intersects(MachineType::TYPE_UINT32) {
                    graph.constant(value as u32 as f64)
                } else if output_type.intersects(MachineType::TYPE_INT32) {
                    graph.constant_i32(value)
                } else if output_type.intersects(MachineType::REP_BIT) {
                    if value == 0 {
                        graph.false_constant()
                    } else {
                        graph.true_constant()
                    }
                } else {
                    return Err(type_error(graph, node, output_type, use_type));
                };
                return Ok(folded_constant(graph, node, folded));
            }
            Opcode::Float64Constant => {
                let folded = graph.constant(graph.op(node).float64_param());
                return Ok(folded_constant(graph, node, folded));
            }
            _ => {}
        }

        let op = if output_type.intersects(MachineType::REP_BIT) {
            self.simplified.change_bit_to_bool()
        } else if output_type.intersects(REP_WORD) {
            if output_type.intersects(MachineType::TYPE_UINT32) {
                self.simplified.change_uint32_to_tagged()
            } else if output_type.intersects(MachineType::TYPE_INT32) {
                self.simplified.change_int32_to_tagged()
            } else {
                return Err(type_error(graph, node, output_type, use_type));
            }
        } else if output_type.intersects(MachineType::REP_FLOAT64) {
            self.simplified.change_float64_to_tagged()
        } else {
            return Err(type_error(graph, node, output_type, use_type));
        };
        Ok(insert_change(graph, op, node))
    }

    pub fn get_float64_representation_for(
        &self,
        graph: &mut Graph,
        node: NodeId,
        output_type: MachineType,
    ) -> Result<NodeId, RepresentationError> {
        let use_type = MachineType::REP_FLOAT64;
        match graph.opcode(node) {
            Opcode::NumberConstant => {
                let folded = graph.float64_constant(graph.op(node).float64_param());
                return Ok(folded_constant(graph, node, folded));
            }
            Opcode::Int32Constant => {
                let value = graph.op(node).int32_param();
                let folded = if output_type.intersects(MachineType::TYPE_UINT32) {
                    graph.float64_constant(value as u32 as f64)
                } else {
                    graph.float64_constant(value as f64)
                };
                return Ok(folded_constant(graph, node, folded));
            }
            Opcode::Float64Constant => return Ok(node),
            _ => {}
        }

        let op = if output_type.intersects(MachineType::REP_BIT) {
            return Err(type_error(graph, node, output_type, use_type));
        } else if output_type.intersects(REP_WORD) {
            if output_type.intersects(MachineType::TYPE_UINT32) {
                self.machine.change_uint32_to_float64()
            } else {
                self.machine.change_int32_to_float64()
            }
        } else if output_type.intersects(MachineType::REP_TAGGED) {
            self.simplified.change_tagged_to_float64()
        } else {
            return Err(type_error(graph, node, output_type, use_type));
        };
        Ok(insert_change(graph, op, node))
    }

    pub fn get_word32_representation_for(
        &self,
        graph: &mut Graph,
        node: NodeId,
        output_type: MachineType,
        use_unsigned: bool,
    ) -> Result<NodeId, RepresentationError> {
        let use_type = MachineType::REP_WORD32;
        match graph.opcode(node) {
            Opcode::Int32Constant => return Ok(node),
            Opcode::NumberConstant | Opcode::Float64Constant => {
                let value = graph.op(node).float64_param();
                let bits = if value < 0.0 {
                    debug_assert!(is_int32_double(value), "{value} is not an int32");
                    double_to_int32(value)
                } else {
                    debug_assert!(is_uint32_double(value), "{value} is not a uint32");
                    double_to_uint32(value) as i32
                };
                let folded = graph.int32_constant(bits);
                return Ok(folded_constant(graph, node, folded));
            }
            _ => {}
        }

        let unsigned = output_type.intersects(MachineType::TYPE_UINT32) || use_unsigned;
        let op = if output_type.intersects(MachineType::REP_FLOAT64) {
            if unsigned {
                self.machine.change_float64_to_uint32()
            } else {
                self.machine.change_float64_to_int32()
            }
        } else if output_type.intersects(MachineType::REP_TAGGED) {
            if unsigned {
                self.simplified.change_tagged_to_uint32()
            } else {
                self.simplified.change_tagged_to_int32()
            }
        } else {
            return Err(type_error(graph, node, output_type, use_type));
        };
        Ok(insert_change(graph, op, node))
    }

    pub fn get_bit_representation_for(
        &self,
        graph: &mut Graph,
        node: NodeId,
        output_type: MachineType,
    ) -> Result<NodeId, RepresentationError> {
        let use_type = MachineType::REP_BIT;
        match graph.opcode(node) {
            Opcode::Int32Constant => {
                let value = graph.op(node).int32_param();
                if value == 0 || value == 1 {
                    return Ok(node);
                }
                let folded = graph.int32_constant(1);
                return Ok(folded_constant(graph, node, folded));
            }
            Opcode::HeapConstant => {
                let value = graph.boolean_value(node);
                debug_assert!(value.is_some(), "{node} is not a boolean constant");
                let folded = graph.int32_constant((value == Some(true)) as i32);
                return Ok(folded_constant(graph, node, folded));
            }
            _ => {}
        }

        if output_type.intersects(REP_WORD) || output_type.intersects(MachineType::REP_WORD64) {
            Ok(node)
        } else if output_type.intersects(MachineType::REP_TAGGED) {
            Ok(insert_change(graph, self.simplified.change_bool_to_bit(), node))
        } else {
            Err(type_error(graph, node, output_type, use_type))
        }
    }

    pub fn get_word64_representation_for(
        &self,
        graph: &mut Graph,
        node: NodeId,
        output_type: MachineType,
    ) -> Result<NodeId, RepresentationError> {
        if output_type.intersects(MachineType::REP_BIT) {
            // Comparisons produce a bit, which is a valid word64.
            return Ok(node);
        }
        Err(type_error(graph, node, output_type, MachineType::REP_WORD64))
    }

    /// Maps a simplified number operation onto signed 32 bit machine
    /// arithmetic.
    pub fn int32_operator_for(&self, opcode: Opcode) -> Operator {
        match opcode {
            Opcode::NumberAdd => self.machine.int32_add(),
            Opcode::NumberSubtract => self.machine.int32_sub(),
            Opcode::NumberEqual => self.machine.word32_equal(),
            Opcode::NumberLessThan => self.machine.int32_less_than(),
            Opcode::NumberLessThanOrEqual => self.machine.int32_less_than_or_equal(),
            _ => unreachable!("{opcode:?} has no int32 counterpart"),
        }
    }

    pub fn uint32_operator_for(&self, opcode: Opcode) -> Operator {
        match opcode {
            Opcode::NumberAdd => self.machine.int32_add(),
            Opcode::NumberSubtract => self.machine.int32_sub(),
            Opcode::NumberEqual => self.machine.word32_equal(),
            Opcode::NumberLessThan => self.machine.uint32_less_than(),
            Opcode::NumberLessThanOrEqual => self.machine.uint32_less_than_or_equal(),
            _ => unreachable!("{opcode:?} has no uint32 counterpart"),
        }
    }

    pub fn float64_operator_for(&self, opcode: Opcode) -> Operator {
        match opcode {
            Opcode::NumberAdd => self.machine.float64_add(),
            Opcode::NumberSubtract => self.machine.float64_sub(),
            Opcode::NumberMultiply => self.machine.float64_mul(),
            Opcode::NumberDivide => self.machine.float64_div(),
            Opcode::NumberModulus => self.machine.float64_mod(),
            Opcode::NumberEqual => self.machine.float64_equal(),
            Opcode::NumberLessThan => self.machine.float64_less_than(),
            Opcode::NumberLessThanOrEqual => self.machine.float64_less_than_or_equal(),
            _ => unreachable!("{opcode:?} has no float64 counterpart"),
        }
    }

    pub fn type_for_base_pointer(&self, base: BaseTaggedness) -> MachineType {
        match base {
            BaseTaggedness::Tagged => MACH_ANY_TAGGED,
            BaseTaggedness::Untagged => MachineType::ptr(self.config.pointer_width),
        }
    }

    /// Picks the machine type hint matching the upper bound of `node`.
    pub fn type_from_upper_bound(&self, graph: &Graph, node: NodeId) -> MachineType {
        let upper = graph.bounds(node).upper;
        if upper.is(Type::NONE) {
            MachineType::TYPE_ANY
        } else if upper.is(Type::SIGNED32) {
            MachineType::TYPE_INT32
        } else if upper.is(Type::UNSIGNED32) {
            MachineType::TYPE_UINT32
        } else if upper.is(Type::NUMBER) {
            MachineType::TYPE_NUMBER
        } else if upper.is(Type::BOOLEAN) {
            MachineType::TYPE_BOOL
        } else {
            MachineType::TYPE_ANY
        }
    }

    fn report(&mut self, err: RepresentationError) -> NodeId {
        self.type_error = true;
        log::error!("{err}");
        match self.config.type_errors {
            TypeErrorMode::Abort => panic!("{err}"),
            TypeErrorMode::Record => err.node,
        }
    }
}

fn type_error(
    graph: &Graph,
    node: NodeId,
    output: MachineType,
    use_type: MachineType,
) -> RepresentationError {
    RepresentationError {
        node,
        mnemonic: graph.op(node).mnemonic(),
        output,
        use_type,
    }
}

fn folded_constant(graph: &Graph, node: NodeId, folded: NodeId) -> NodeId {
    log::debug!("folded {node} into {folded}:{}", graph.op(folded));
    folded
}

fn insert_change(graph: &mut Graph, op: Operator, node: NodeId) -> NodeId {
    let mnemonic = op.mnemonic();
    let change = graph.make_node(op, &[node]);
    log::debug!("inserted {change}:{mnemonic} for {node}");
    change
}
