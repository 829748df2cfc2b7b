//! The value sink handed to running scripts

use std::fmt;
use std::sync::Arc;

use crate::render::{render, Inspect, RenderNode};

/// Name of the single global binding scripts see
pub const GLOBAL_NAME: &str = "Cauldron";

/// Member of the global binding that dumps a value
pub const DUMP: &str = "dump";

type Sink = dyn Fn(RenderNode) + Send + Sync;

/// Append-only channel for dumped values
///
/// Every [`Writer::dump`] renders the value immediately and forwards the node
/// to the sink, so nodes arrive in call order.
#[derive(Clone)]
pub struct Writer {
    sink: Arc<Sink>,
}

impl Writer {
    pub fn new(sink: impl Fn(RenderNode) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// A writer that drops everything
    pub fn discard() -> Self {
        Self::new(|_| {})
    }

    pub fn dump(&self, value: &dyn Inspect) {
        let node = render(value);
        tracing::trace!(?node, "dump");
        (self.sink)(node);
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer").finish_non_exhaustive()
    }
}

/* ===================== Globals ===================== */

/// Signature of one global binding: its name and members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSignature {
    pub name: String,
    pub members: Vec<String>,
}

/// Names and members of the globals a script is compiled against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalsShape {
    pub bindings: Vec<GlobalSignature>,
}

impl GlobalsShape {
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name == name)
    }
}

/// The fixed globals record of one run
///
/// Exposes exactly one capability: `Cauldron.dump(value)`.
#[derive(Debug, Clone)]
pub struct Globals {
    pub writer: Writer,
}

impl Globals {
    pub fn new(writer: Writer) -> Self {
        Self { writer }
    }

    /// Shape every script is compiled against
    pub fn shape() -> GlobalsShape {
        GlobalsShape {
            bindings: vec![GlobalSignature {
                name: GLOBAL_NAME.to_string(),
                members: vec![DUMP.to_string()],
            }],
        }
    }
}
