//! The `Target` domain: discovering, attaching to and closing targets.
//!
//! Attaching with `flatten: true` yields a [`SessionId`] that is then carried
//! as `sessionId` on every command and event of that target.

use crate::EmptyReturns;
use serde::{Deserialize, Serialize};

string_id!(TargetId);

string_id!(
    /// Unique identifier of an attached debugging session.
    SessionId
);

string_id!(BrowserContextId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub target_id: TargetId,
    /// e.g. `page`, `browser`, `service_worker`, `worker`.
    #[serde(rename = "type")]
    pub r#type: String,
    pub title: String,
    pub url: String,
    /// Whether the target has an attached client.
    pub attached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opener_id: Option<TargetId>,
    #[serde(default)]
    pub can_access_opener: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

// --- Commands ---

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTargetsParams {}

impl GetTargetsParams {
    pub fn new() -> Self {
        Self {}
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTargetsReturns {
    pub target_infos: Vec<TargetInfo>,
}

impl_command!(GetTargetsParams, "Target.getTargets", GetTargetsReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetParams {
    pub target_id: TargetId,
    /// Enables "flat" access to the session via `sessionId` on the root connection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flatten: Option<bool>,
}

impl AttachToTargetParams {
    pub fn new(target_id: impl Into<TargetId>) -> Self {
        Self {
            target_id: target_id.into(),
            flatten: None,
        }
    }

    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = Some(flatten);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetReturns {
    pub session_id: SessionId,
}

impl_command!(AttachToTargetParams, "Target.attachToTarget", AttachToTargetReturns);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachFromTargetParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl DetachFromTargetParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_id(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

impl_command!(DetachFromTargetParams, "Target.detachFromTarget", EmptyReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDiscoverTargetsParams {
    pub discover: bool,
}

impl SetDiscoverTargetsParams {
    pub fn new(discover: bool) -> Self {
        Self { discover }
    }
}

impl_command!(SetDiscoverTargetsParams, "Target.setDiscoverTargets", EmptyReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetParams {
    /// Initial URL; `about:blank` for an empty page.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_window: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<bool>,
}

impl CreateTargetParams {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            width: None,
            height: None,
            browser_context_id: None,
            new_window: None,
            background: None,
        }
    }

    pub fn with_size(mut self, width: i64, height: i64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_browser_context_id(mut self, id: impl Into<BrowserContextId>) -> Self {
        self.browser_context_id = Some(id.into());
        self
    }

    pub fn with_new_window(mut self, new_window: bool) -> Self {
        self.new_window = Some(new_window);
        self
    }

    pub fn with_background(mut self, background: bool) -> Self {
        self.background = Some(background);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetReturns {
    pub target_id: TargetId,
}

impl_command!(CreateTargetParams, "Target.createTarget", CreateTargetReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTargetParams {
    pub target_id: TargetId,
}

impl CloseTargetParams {
    pub fn new(target_id: impl Into<TargetId>) -> Self {
        Self {
            target_id: target_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTargetReturns {
    /// Always `true` on current browsers.
    #[serde(default)]
    pub success: bool,
}

impl_command!(CloseTargetParams, "Target.closeTarget", CloseTargetReturns);

// --- Events ---

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTargetCreated {
    pub target_info: TargetInfo,
}

impl_event!(EventTargetCreated, "Target.targetCreated");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTargetDestroyed {
    pub target_id: TargetId,
}

impl_event!(EventTargetDestroyed, "Target.targetDestroyed");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTargetInfoChanged {
    pub target_info: TargetInfo,
}

impl_event!(EventTargetInfoChanged, "Target.targetInfoChanged");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttachedToTarget {
    pub session_id: SessionId,
    pub target_info: TargetInfo,
    pub waiting_for_debugger: bool,
}

impl_event!(EventAttachedToTarget, "Target.attachedToTarget");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetachedFromTarget {
    pub session_id: SessionId,
    #[serde(default)]
    pub target_id: Option<TargetId>,
}

impl_event!(EventDetachedFromTarget, "Target.detachedFromTarget");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Command;
    use serde_json::json;

    #[test]
    fn attach_params_omit_unset_flatten() {
        let params = AttachToTargetParams::new("T1");
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({ "targetId": "T1" }));

        let flat = params.with_flatten(true);
        assert_eq!(
            serde_json::to_value(&flat).unwrap(),
            json!({ "targetId": "T1", "flatten": true })
        );
        assert_eq!(AttachToTargetParams::METHOD, "Target.attachToTarget");
    }

    #[test]
    fn target_info_reads_browser_payload() {
        let info: TargetInfo = serde_json::from_value(json!({
            "targetId": "ABC",
            "type": "page",
            "title": "about:blank",
            "url": "about:blank",
            "attached": false,
            "canAccessOpener": false,
            "browserContextId": "CTX"
        }))
        .unwrap();
        assert_eq!(info.target_id.as_ref(), "ABC");
        assert_eq!(info.r#type, "page");
        assert_eq!(info.browser_context_id, Some(BrowserContextId::new("CTX")));
        assert_eq!(info.opener_id, None);
    }

    #[test]
    fn create_target_with_size() {
        let params = CreateTargetParams::new("about:blank").with_size(800, 600);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "url": "about:blank", "width": 800, "height": 600 })
        );
    }
}
