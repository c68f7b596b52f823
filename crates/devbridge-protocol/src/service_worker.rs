//! The `ServiceWorker` domain.

use crate::{EmptyReturns, target::TargetId};
use serde::{Deserialize, Serialize};

string_id!(RegistrationId);

/// ServiceWorker registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWorkerRegistration {
    pub registration_id: RegistrationId,
    #[serde(rename = "scopeURL")]
    pub scope_url: String,
    pub is_deleted: bool,
}

string_enum!(ServiceWorkerVersionRunningStatus {
    Stopped => "stopped",
    Starting => "starting",
    Running => "running",
    Stopping => "stopping",
});

string_enum!(ServiceWorkerVersionStatus {
    New => "new",
    Installing => "installing",
    Installed => "installed",
    Activating => "activating",
    Activated => "activated",
    Redundant => "redundant",
});

/// ServiceWorker version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWorkerVersion {
    pub version_id: String,
    pub registration_id: RegistrationId,
    #[serde(rename = "scriptURL")]
    pub script_url: String,
    pub running_status: ServiceWorkerVersionRunningStatus,
    pub status: ServiceWorkerVersionStatus,
    /// The Last-Modified header value of the main script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_last_modified: Option<f64>,
    /// The time at which the response headers of the main script were
    /// received from the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_response_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controlled_clients: Option<Vec<TargetId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<TargetId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub router_rules: Option<String>,
}

/// ServiceWorker error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWorkerErrorMessage {
    pub error_message: String,
    pub registration_id: RegistrationId,
    pub version_id: String,
    #[serde(rename = "sourceURL")]
    pub source_url: String,
    pub line_number: i64,
    pub column_number: i64,
}

// --- Commands ---

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverPushMessageParams {
    pub origin: String,
    pub registration_id: RegistrationId,
    pub data: String,
}

impl DeliverPushMessageParams {
    pub fn new(
        origin: impl Into<String>,
        registration_id: impl Into<RegistrationId>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            registration_id: registration_id.into(),
            data: data.into(),
        }
    }
}

impl_command!(
    DeliverPushMessageParams,
    "ServiceWorker.deliverPushMessage",
    EmptyReturns
);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisableParams {}

impl DisableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(DisableParams, "ServiceWorker.disable", EmptyReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchSyncEventParams {
    pub origin: String,
    pub registration_id: RegistrationId,
    pub tag: String,
    pub last_chance: bool,
}

impl DispatchSyncEventParams {
    pub fn new(
        origin: impl Into<String>,
        registration_id: impl Into<RegistrationId>,
        tag: impl Into<String>,
        last_chance: bool,
    ) -> Self {
        Self {
            origin: origin.into(),
            registration_id: registration_id.into(),
            tag: tag.into(),
            last_chance,
        }
    }
}

impl_command!(
    DispatchSyncEventParams,
    "ServiceWorker.dispatchSyncEvent",
    EmptyReturns
);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchPeriodicSyncEventParams {
    pub origin: String,
    pub registration_id: RegistrationId,
    pub tag: String,
}

impl DispatchPeriodicSyncEventParams {
    pub fn new(
        origin: impl Into<String>,
        registration_id: impl Into<RegistrationId>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            registration_id: registration_id.into(),
            tag: tag.into(),
        }
    }
}

impl_command!(
    DispatchPeriodicSyncEventParams,
    "ServiceWorker.dispatchPeriodicSyncEvent",
    EmptyReturns
);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnableParams {}

impl EnableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(EnableParams, "ServiceWorker.enable", EmptyReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectWorkerParams {
    pub version_id: String,
}

impl InspectWorkerParams {
    pub fn new(version_id: impl Into<String>) -> Self {
        Self {
            version_id: version_id.into(),
        }
    }
}

impl_command!(InspectWorkerParams, "ServiceWorker.inspectWorker", EmptyReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetForceUpdateOnPageLoadParams {
    pub force_update_on_page_load: bool,
}

impl SetForceUpdateOnPageLoadParams {
    pub fn new(force_update_on_page_load: bool) -> Self {
        Self {
            force_update_on_page_load,
        }
    }
}

impl_command!(
    SetForceUpdateOnPageLoadParams,
    "ServiceWorker.setForceUpdateOnPageLoad",
    EmptyReturns
);

/// Params of the commands that address a registration by its scope URL.
macro_rules! scope_url_params {
    ($(#[$meta:meta])* $params:ident, $method:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct $params {
            #[serde(rename = "scopeURL")]
            pub scope_url: String,
        }

        impl $params {
            pub fn new(scope_url: impl Into<String>) -> Self {
                Self {
                    scope_url: scope_url.into(),
                }
            }
        }

        impl_command!($params, $method, EmptyReturns);
    };
}

scope_url_params!(SkipWaitingParams, "ServiceWorker.skipWaiting");
scope_url_params!(StartWorkerParams, "ServiceWorker.startWorker");
scope_url_params!(UnregisterParams, "ServiceWorker.unregister");
scope_url_params!(UpdateRegistrationParams, "ServiceWorker.updateRegistration");

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StopAllWorkersParams {}

impl StopAllWorkersParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(StopAllWorkersParams, "ServiceWorker.stopAllWorkers", EmptyReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopWorkerParams {
    pub version_id: String,
}

impl StopWorkerParams {
    pub fn new(version_id: impl Into<String>) -> Self {
        Self {
            version_id: version_id.into(),
        }
    }
}

impl_command!(StopWorkerParams, "ServiceWorker.stopWorker", EmptyReturns);

// --- Events ---

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWorkerErrorReported {
    pub error_message: ServiceWorkerErrorMessage,
}

impl_event!(EventWorkerErrorReported, "ServiceWorker.workerErrorReported");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWorkerRegistrationUpdated {
    pub registrations: Vec<ServiceWorkerRegistration>,
}

impl_event!(
    EventWorkerRegistrationUpdated,
    "ServiceWorker.workerRegistrationUpdated"
);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWorkerVersionUpdated {
    pub versions: Vec<ServiceWorkerVersion>,
}

impl_event!(EventWorkerVersionUpdated, "ServiceWorker.workerVersionUpdated");
