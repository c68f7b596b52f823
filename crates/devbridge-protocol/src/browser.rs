//! The `Browser` domain commands devbridge needs: version query and shutdown.

use crate::EmptyReturns;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetVersionParams {}

impl GetVersionParams {
    pub fn new() -> Self {
        Self {}
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVersionReturns {
    pub protocol_version: String,
    pub product: String,
    pub revision: String,
    pub user_agent: String,
    pub js_version: String,
}

impl_command!(GetVersionParams, "Browser.getVersion", GetVersionReturns);

/// Closes the browser gracefully.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CloseParams {}

impl CloseParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(CloseParams, "Browser.close", EmptyReturns);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn version_returns_require_every_field() {
        let full = json!({
            "protocolVersion": "1.3",
            "product": "HeadlessChrome/120.0.0.0",
            "revision": "@abc",
            "userAgent": "Mozilla/5.0",
            "jsVersion": "12.0"
        });
        let version: GetVersionReturns = serde_json::from_value(full).unwrap();
        assert_eq!(version.protocol_version, "1.3");

        let partial = json!({ "protocolVersion": "1.3", "product": "x" });
        assert!(serde_json::from_value::<GetVersionReturns>(partial).is_err());
    }

    #[test]
    fn params_without_fields_serialize_as_empty_object() {
        assert_eq!(serde_json::to_string(&CloseParams::new()).unwrap(), "{}");
    }
}
