//! Call descriptors describe the calling convention of a call site.
use std::fmt;

use crate::{machine_type::MachineSignature, operator::Properties};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CallKind {
    /// A call to a code object with a fixed machine-level signature.
    #[default]
    Code,

    /// A call to a function object of the source language. Takes the callee
    /// context as an additional input.
    JsFunction,

    /// A call into the VM runtime.
    Runtime,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Code => write!(f, "Code"),
            Self::JsFunction => write!(f, "JS"),
            Self::Runtime => write!(f, "Runtime"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallDescriptor {
    kind: CallKind,
    signature: MachineSignature,
    frame_state_count: usize,
    properties: Properties,
    debug_name: &'static str,
}

impl CallDescriptor {
    pub fn new(
        kind: CallKind,
        signature: MachineSignature,
        frame_state_count: usize,
        properties: Properties,
        debug_name: &'static str,
    ) -> Self {
        Self {
            kind,
            signature,
            frame_state_count,
            properties,
            debug_name,
        }
    }

    pub fn kind(&self) -> CallKind {
        self.kind
    }

    /// Number of value arguments, including the call target.
    pub fn input_count(&self) -> usize {
        self.signature.parameter_count()
    }

    pub fn return_count(&self) -> usize {
        self.signature.return_count()
    }

    /// Number of frame states the call needs for lazy deoptimization.
    pub fn frame_state_count(&self) -> usize {
        self.frame_state_count
    }

    pub fn needs_context(&self) -> bool {
        self.kind == CallKind::JsFunction
    }

    pub fn properties(&self) -> Properties {
        self.properties
    }

    pub fn signature(&self) -> &MachineSignature {
        &self.signature
    }

    pub fn debug_name(&self) -> &'static str {
        self.debug_name
    }
}

impl fmt::Display for CallDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}:r{}p{}",
            self.kind,
            self.debug_name,
            self.return_count(),
            self.input_count()
        )
    }
}
