//! Operation Registry

use crate::{CallContext, OpMeta, OpPlugin};
use linviz_core::KernelError;
use serde_json::{json, Value as JsonValue};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Central operation registry
pub struct OpRegistry {
    ops: BTreeMap<String, Arc<dyn OpPlugin>>,
}

impl OpRegistry {
    pub fn new() -> Self {
        Self { ops: BTreeMap::new() }
    }

    pub fn with_op<O: OpPlugin + 'static>(mut self, op: O) -> Self {
        let name = op.meta().name.to_lowercase();
        self.ops.insert(name, Arc::new(op));
        self
    }

    pub fn get_op(&self, name: &str) -> Option<&dyn OpPlugin> {
        self.ops.get(&name.to_lowercase()).map(|o| o.as_ref())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn call_op(
        &self,
        name: &str,
        args: &JsonValue,
        ctx: &CallContext,
    ) -> Result<JsonValue, KernelError> {
        match self.get_op(name) {
            Some(op) => {
                tracing::debug!(op = name, "calling operation");
                op.call(args, ctx)
            }
            None => {
                let similar = self.find_similar_ops(name).into_iter().take(5).collect();
                Err(KernelError::unknown_op(name, similar))
            }
        }
    }

    /// Find op names similar to the given name (for error suggestions)
    fn find_similar_ops(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.ops.keys()
            .filter_map(|op_name| {
                let score = Self::similarity_score(&name_lower, op_name);
                if score > 0 {
                    Some((op_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, ties alphabetical
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        // Shared characters count only once a substring relation exists or
        // the overlap is substantial; otherwise every name would match.
        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        if score > 0 || common * 2 >= query_chars.len().max(1) + 2 {
            score += common * 2;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Result<JsonValue, KernelError> {
        match name {
            Some(n) => self.help_for(n),
            None => Ok(self.general_help()),
        }
    }

    fn help_for(&self, name: &str) -> Result<JsonValue, KernelError> {
        match self.ops.get(&name.to_lowercase()) {
            Some(op) => Ok(Self::op_to_help(op.meta())),
            None => Err(KernelError::unknown_op(name, self.find_similar_ops(name))),
        }
    }

    fn general_help(&self) -> JsonValue {
        let mut by_category: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for op in self.ops.values() {
            let meta = op.meta();
            by_category.entry(meta.category).or_default().push(meta.name);
        }

        json!({
            "operations": by_category,
            "usage": "Call ops/help with a name for detailed help.",
        })
    }

    fn op_to_help(meta: OpMeta) -> JsonValue {
        json!({
            "name": meta.name,
            "description": meta.description,
            "usage": meta.usage,
            "args": meta.args,
            "returns": meta.returns,
            "examples": meta.examples,
            "category": meta.category,
            "related": meta.related,
        })
    }

    pub fn list_ops(&self, category: Option<&str>) -> JsonValue {
        let ops: Vec<JsonValue> = self.ops.values()
            .map(|o| o.meta())
            .filter(|meta| category.map_or(true, |c| meta.category == c))
            .map(|meta| json!({
                "name": meta.name,
                "description": meta.description,
                "usage": meta.usage,
                "category": meta.category,
            }))
            .collect();
        JsonValue::Array(ops)
    }
}

impl Default for OpRegistry {
    fn default() -> Self {
        Self::new()
    }
}
