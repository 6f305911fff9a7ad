//! Operation traits

use crate::CallContext;
use linviz_core::KernelError;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Metadata about an operation argument
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
}

impl ArgMeta {
    pub const fn required(
        name: &'static str,
        typ: &'static str,
        description: &'static str,
    ) -> Self {
        Self { name, typ, description }
    }
}

/// Metadata for an operation
#[derive(Debug, Clone, Serialize)]
pub struct OpMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub args: &'static [ArgMeta],
    pub returns: &'static str,
    pub examples: &'static [&'static str],
    pub category: &'static str,
    pub related: &'static [&'static str],
}

/// Pure kernel operation callable by name.
///
/// `args` is a JSON object keyed by argument name.
pub trait OpPlugin: Send + Sync {
    fn meta(&self) -> OpMeta;
    fn call(&self, args: &JsonValue, ctx: &CallContext) -> Result<JsonValue, KernelError>;
}
