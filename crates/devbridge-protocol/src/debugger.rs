//! The slice of the `Debugger` domain other domains refer to.

use crate::runtime::ScriptId;
use serde::{Deserialize, Serialize};

/// Location in the source code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub script_id: ScriptId,
    /// 0-based.
    pub line_number: i64,
    /// 0-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_number: Option<i64>,
}

impl Location {
    pub fn new(script_id: impl Into<ScriptId>, line_number: i64) -> Self {
        Self {
            script_id: script_id.into(),
            line_number,
            column_number: None,
        }
    }
}
