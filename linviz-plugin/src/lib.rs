//! linviz Operation System
//!
//! Exposes kernel entry points as named operations that take and return JSON,
//! so front ends written in any language can drive the kernel.

mod context;
mod registry;
mod traits;

pub use context::CallContext;
pub use registry::OpRegistry;
pub use traits::{ArgMeta, OpMeta, OpPlugin};
