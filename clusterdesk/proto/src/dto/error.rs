use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Error body returned by the backend.
///
/// Validation failures carry `{"errors": {"field": "message"}}` (or a list of
/// messages per field); everything else carries `{"message": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, FieldMessages>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldMessages {
    One(String),
    Many(Vec<String>),
}

impl FieldMessages {
    /// Collapse into a single display line.
    pub fn joined(&self) -> String {
        match self {
            FieldMessages::One(s) => s.clone(),
            FieldMessages::Many(v) => v.join(" "),
        }
    }
}

impl ErrorBody {
    /// Per-field messages flattened to one string each; empty when absent.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        self.errors
            .as_ref()
            .map(|errs| {
                errs.iter()
                    .map(|(field, msgs)| (field.clone(), msgs.joined()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
