//! The closed sum of every bound event.

use crate::{
    Domain, Event, animation, database, heap_profiler, layer_tree, profiler, service_worker,
    target,
};
use serde_json::Value;

/// Declares `CdpEvent` with one variant per bound event and generates the
/// exhaustive method-name dispatch for it.
macro_rules! cdp_events {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// A decoded protocol event.
        #[derive(Debug, Clone, PartialEq)]
        pub enum CdpEvent {
            $($variant($ty),)+
            /// An event without bindings, kept raw.
            Unknown { method: String, params: Value },
        }

        impl CdpEvent {
            /// Decodes `params` according to `method`.
            ///
            /// Methods without bindings become [`CdpEvent::Unknown`]; a bound
            /// method whose params do not match its payload type is an error.
            pub fn parse(method: &str, params: Value) -> Result<Self, serde_json::Error> {
                $(
                    if method == <$ty as Event>::METHOD {
                        return serde_json::from_value::<$ty>(params).map(CdpEvent::$variant);
                    }
                )+
                Ok(CdpEvent::Unknown {
                    method: method.to_string(),
                    params,
                })
            }

            /// Wire name of the event.
            pub fn method(&self) -> &str {
                match self {
                    $(CdpEvent::$variant(_) => <$ty as Event>::METHOD,)+
                    CdpEvent::Unknown { method, .. } => method,
                }
            }
        }
    };
}

cdp_events! {
    AnimationCanceled(animation::EventAnimationCanceled),
    AnimationCreated(animation::EventAnimationCreated),
    AnimationStarted(animation::EventAnimationStarted),
    AnimationUpdated(animation::EventAnimationUpdated),
    AddDatabase(database::EventAddDatabase),
    AddHeapSnapshotChunk(heap_profiler::EventAddHeapSnapshotChunk),
    HeapStatsUpdate(heap_profiler::EventHeapStatsUpdate),
    LastSeenObjectId(heap_profiler::EventLastSeenObjectId),
    ReportHeapSnapshotProgress(heap_profiler::EventReportHeapSnapshotProgress),
    ResetProfiles(heap_profiler::EventResetProfiles),
    LayerPainted(layer_tree::EventLayerPainted),
    LayerTreeDidChange(layer_tree::EventLayerTreeDidChange),
    ConsoleProfileFinished(profiler::EventConsoleProfileFinished),
    ConsoleProfileStarted(profiler::EventConsoleProfileStarted),
    PreciseCoverageDeltaUpdate(profiler::EventPreciseCoverageDeltaUpdate),
    WorkerErrorReported(service_worker::EventWorkerErrorReported),
    WorkerRegistrationUpdated(service_worker::EventWorkerRegistrationUpdated),
    WorkerVersionUpdated(service_worker::EventWorkerVersionUpdated),
    TargetCreated(target::EventTargetCreated),
    TargetDestroyed(target::EventTargetDestroyed),
    TargetInfoChanged(target::EventTargetInfoChanged),
    AttachedToTarget(target::EventAttachedToTarget),
    DetachedFromTarget(target::EventDetachedFromTarget),
}

impl CdpEvent {
    pub fn domain(&self) -> Domain {
        Domain::of_method(self.method())
    }
}
