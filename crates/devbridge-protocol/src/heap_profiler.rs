//! The `HeapProfiler` domain.

use crate::{
    EmptyReturns,
    runtime::{CallFrame, RemoteObject, RemoteObjectId},
};
use serde::{Deserialize, Serialize};

string_id!(
    /// Heap snapshot object id.
    HeapSnapshotObjectId
);

/// Sampling Heap Profile node. Holds callsite information, allocation
/// statistics and child nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingHeapProfileNode {
    pub call_frame: CallFrame,
    /// Allocations size in bytes for the node excluding children.
    pub self_size: f64,
    /// Node id. Ids are unique across all profiles collected between
    /// startSampling and stopSampling.
    pub id: i64,
    pub children: Vec<SamplingHeapProfileNode>,
}

/// A single sample from a sampling profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingHeapProfileSample {
    /// Allocation size in bytes attributed to the sample.
    pub size: f64,
    /// Id of the corresponding profile tree node.
    pub node_id: i64,
    /// Time-ordered sample ordinal number.
    pub ordinal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingHeapProfile {
    pub head: SamplingHeapProfileNode,
    pub samples: Vec<SamplingHeapProfileSample>,
}

impl SamplingHeapProfile {
    /// Total bytes attributed to the whole tree, children included.
    pub fn total_size(&self) -> f64 {
        fn walk(node: &SamplingHeapProfileNode) -> f64 {
            node.self_size + node.children.iter().map(walk).sum::<f64>()
        }
        walk(&self.head)
    }
}

// --- Commands ---

/// Enables console to refer to the node with given id via $x.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddInspectedHeapObjectParams {
    pub heap_object_id: HeapSnapshotObjectId,
}

impl AddInspectedHeapObjectParams {
    pub fn new(heap_object_id: impl Into<HeapSnapshotObjectId>) -> Self {
        Self {
            heap_object_id: heap_object_id.into(),
        }
    }
}

impl_command!(
    AddInspectedHeapObjectParams,
    "HeapProfiler.addInspectedHeapObject",
    EmptyReturns
);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectGarbageParams {}

impl CollectGarbageParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(CollectGarbageParams, "HeapProfiler.collectGarbage", EmptyReturns);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisableParams {}

impl DisableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(DisableParams, "HeapProfiler.disable", EmptyReturns);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnableParams {}

impl EnableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(EnableParams, "HeapProfiler.enable", EmptyReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetHeapObjectIdParams {
    /// Identifier of the object to get heap object id for.
    pub object_id: RemoteObjectId,
}

impl GetHeapObjectIdParams {
    pub fn new(object_id: impl Into<RemoteObjectId>) -> Self {
        Self {
            object_id: object_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetHeapObjectIdReturns {
    pub heap_snapshot_object_id: HeapSnapshotObjectId,
}

impl_command!(
    GetHeapObjectIdParams,
    "HeapProfiler.getHeapObjectId",
    GetHeapObjectIdReturns
);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetObjectByHeapObjectIdParams {
    pub object_id: HeapSnapshotObjectId,
    /// Symbolic group name that can be used to release multiple objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_group: Option<String>,
}

impl GetObjectByHeapObjectIdParams {
    pub fn new(object_id: impl Into<HeapSnapshotObjectId>) -> Self {
        Self {
            object_id: object_id.into(),
            object_group: None,
        }
    }

    pub fn with_object_group(mut self, group: impl Into<String>) -> Self {
        self.object_group = Some(group.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetObjectByHeapObjectIdReturns {
    /// Evaluation result.
    pub result: RemoteObject,
}

impl_command!(
    GetObjectByHeapObjectIdParams,
    "HeapProfiler.getObjectByHeapObjectId",
    GetObjectByHeapObjectIdReturns
);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetSamplingProfileParams {}

impl GetSamplingProfileParams {
    pub fn new() -> Self {
        Self {}
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingProfileReturns {
    pub profile: SamplingHeapProfile,
}

impl_command!(
    GetSamplingProfileParams,
    "HeapProfiler.getSamplingProfile",
    SamplingProfileReturns
);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSamplingParams {
    /// Average sample interval in bytes. Defaults to 32768 on the browser side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_interval: Option<f64>,
    #[serde(
        rename = "includeObjectsCollectedByMajorGC",
        skip_serializing_if = "Option::is_none"
    )]
    pub include_objects_collected_by_major_gc: Option<bool>,
    #[serde(
        rename = "includeObjectsCollectedByMinorGC",
        skip_serializing_if = "Option::is_none"
    )]
    pub include_objects_collected_by_minor_gc: Option<bool>,
}

impl StartSamplingParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sampling_interval(mut self, bytes: f64) -> Self {
        self.sampling_interval = Some(bytes);
        self
    }

    pub fn with_include_objects_collected_by_major_gc(mut self, include: bool) -> Self {
        self.include_objects_collected_by_major_gc = Some(include);
        self
    }

    pub fn with_include_objects_collected_by_minor_gc(mut self, include: bool) -> Self {
        self.include_objects_collected_by_minor_gc = Some(include);
        self
    }
}

impl_command!(StartSamplingParams, "HeapProfiler.startSampling", EmptyReturns);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTrackingHeapObjectsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_allocations: Option<bool>,
}

impl StartTrackingHeapObjectsParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track_allocations(mut self, track: bool) -> Self {
        self.track_allocations = Some(track);
        self
    }
}

impl_command!(
    StartTrackingHeapObjectsParams,
    "HeapProfiler.startTrackingHeapObjects",
    EmptyReturns
);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StopSamplingParams {}

impl StopSamplingParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(StopSamplingParams, "HeapProfiler.stopSampling", SamplingProfileReturns);

/// Options shared by `stopTrackingHeapObjects` and `takeHeapSnapshot`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotOptions {
    /// Emit `reportHeapSnapshotProgress` events while the snapshot is taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_progress: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treat_global_objects_as_roots: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_numeric_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expose_internals: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StopTrackingHeapObjectsParams {
    #[serde(flatten)]
    pub options: SnapshotOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TakeHeapSnapshotParams {
    #[serde(flatten)]
    pub options: SnapshotOptions,
}

macro_rules! snapshot_option_setters {
    ($params:ident) => {
        impl $params {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn with_report_progress(mut self, report: bool) -> Self {
                self.options.report_progress = Some(report);
                self
            }

            pub fn with_treat_global_objects_as_roots(mut self, treat: bool) -> Self {
                self.options.treat_global_objects_as_roots = Some(treat);
                self
            }

            pub fn with_capture_numeric_value(mut self, capture: bool) -> Self {
                self.options.capture_numeric_value = Some(capture);
                self
            }

            pub fn with_expose_internals(mut self, expose: bool) -> Self {
                self.options.expose_internals = Some(expose);
                self
            }
        }
    };
}

snapshot_option_setters!(StopTrackingHeapObjectsParams);
snapshot_option_setters!(TakeHeapSnapshotParams);

impl_command!(
    StopTrackingHeapObjectsParams,
    "HeapProfiler.stopTrackingHeapObjects",
    EmptyReturns
);
impl_command!(TakeHeapSnapshotParams, "HeapProfiler.takeHeapSnapshot", EmptyReturns);

// --- Events ---

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAddHeapSnapshotChunk {
    pub chunk: String,
}

impl_event!(EventAddHeapSnapshotChunk, "HeapProfiler.addHeapSnapshotChunk");

/// If heap objects tracking has been started then backend may send update for
/// one or more fragments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHeapStatsUpdate {
    /// Triplets of `(fragment index, object count, total size)`.
    pub stats_update: Vec<i64>,
}

impl EventHeapStatsUpdate {
    pub fn fragments(&self) -> impl Iterator<Item = (i64, i64, i64)> + '_ {
        self.stats_update
            .chunks_exact(3)
            .map(|triplet| (triplet[0], triplet[1], triplet[2]))
    }
}

impl_event!(EventHeapStatsUpdate, "HeapProfiler.heapStatsUpdate");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLastSeenObjectId {
    pub last_seen_object_id: i64,
    pub timestamp: f64,
}

impl_event!(EventLastSeenObjectId, "HeapProfiler.lastSeenObjectId");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReportHeapSnapshotProgress {
    pub done: i64,
    pub total: i64,
    #[serde(default)]
    pub finished: Option<bool>,
}

impl_event!(
    EventReportHeapSnapshotProgress,
    "HeapProfiler.reportHeapSnapshotProgress"
);

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventResetProfiles {}

impl_event!(EventResetProfiles, "HeapProfiler.resetProfiles");
