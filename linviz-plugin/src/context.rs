//! Call Context

use linviz_core::Tolerances;

/// Context passed to every operation
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub tolerances: Tolerances,
}

impl CallContext {
    pub fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }
}
