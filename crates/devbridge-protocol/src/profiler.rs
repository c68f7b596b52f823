//! The `Profiler` domain: CPU sampling and code coverage.

use crate::{
    EmptyReturns,
    debugger::Location,
    runtime::{CallFrame, ScriptId},
};
use serde::{Deserialize, Serialize};

/// Profile node. Holds callsite information, execution statistics and child
/// nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileNode {
    pub id: i64,
    pub call_frame: CallFrame,
    /// Number of samples where this node was on top of the call stack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_count: Option<i64>,
    /// Child node ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<i64>>,
    /// The reason of being not optimized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deopt_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_ticks: Option<Vec<PositionTickInfo>>,
}

/// Profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// The list of profile nodes. First item is the root node.
    pub nodes: Vec<ProfileNode>,
    /// Profiling start timestamp in microseconds.
    pub start_time: f64,
    /// Profiling end timestamp in microseconds.
    pub end_time: f64,
    /// Ids of samples top nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<i64>>,
    /// Time intervals between adjacent samples in microseconds. The first
    /// delta is relative to the profile start time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_deltas: Option<Vec<i64>>,
}

impl Profile {
    pub fn root(&self) -> Option<&ProfileNode> {
        self.nodes.first()
    }

    pub fn node(&self, id: i64) -> Option<&ProfileNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Specifies a number of samples attributed to a certain source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionTickInfo {
    /// Source line number (1-based).
    pub line: i64,
    pub ticks: i64,
}

/// Coverage data for a source range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageRange {
    /// JavaScript script source offset for the range start.
    pub start_offset: i64,
    /// JavaScript script source offset for the range end.
    pub end_offset: i64,
    /// Collected execution count of the source range.
    pub count: i64,
}

/// Coverage data for a JavaScript function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCoverage {
    pub function_name: String,
    /// Source ranges inside the function with coverage data.
    pub ranges: Vec<CoverageRange>,
    /// Whether coverage data for this function has block granularity.
    pub is_block_coverage: bool,
}

/// Coverage data for a JavaScript script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptCoverage {
    pub script_id: ScriptId,
    pub url: String,
    pub functions: Vec<FunctionCoverage>,
}

// --- Commands ---

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisableParams {}

impl DisableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(DisableParams, "Profiler.disable", EmptyReturns);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnableParams {}

impl EnableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(EnableParams, "Profiler.enable", EmptyReturns);

/// Collect coverage data for the current isolate. The coverage data may be
/// incomplete due to garbage collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetBestEffortCoverageParams {}

impl GetBestEffortCoverageParams {
    pub fn new() -> Self {
        Self {}
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBestEffortCoverageReturns {
    pub result: Vec<ScriptCoverage>,
}

impl_command!(
    GetBestEffortCoverageParams,
    "Profiler.getBestEffortCoverage",
    GetBestEffortCoverageReturns
);

/// Changes CPU profiler sampling interval. Must be called before CPU profiles
/// recording started.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSamplingIntervalParams {
    /// New sampling interval in microseconds.
    pub interval: i64,
}

impl SetSamplingIntervalParams {
    pub fn new(interval: i64) -> Self {
        Self { interval }
    }
}

impl_command!(
    SetSamplingIntervalParams,
    "Profiler.setSamplingInterval",
    EmptyReturns
);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StartParams {}

impl StartParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(StartParams, "Profiler.start", EmptyReturns);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPreciseCoverageParams {
    /// Collect accurate call counts beyond simple 'covered' or 'not covered'.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_count: Option<bool>,
    /// Collect block-based coverage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed: Option<bool>,
    /// Allow the backend to send updates on its own initiative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_triggered_updates: Option<bool>,
}

impl StartPreciseCoverageParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_call_count(mut self, call_count: bool) -> Self {
        self.call_count = Some(call_count);
        self
    }

    pub fn with_detailed(mut self, detailed: bool) -> Self {
        self.detailed = Some(detailed);
        self
    }

    pub fn with_allow_triggered_updates(mut self, allow: bool) -> Self {
        self.allow_triggered_updates = Some(allow);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPreciseCoverageReturns {
    /// Monotonically increasing time (in seconds) when the coverage update was taken.
    pub timestamp: f64,
}

impl_command!(
    StartPreciseCoverageParams,
    "Profiler.startPreciseCoverage",
    StartPreciseCoverageReturns
);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StopParams {}

impl StopParams {
    pub fn new() -> Self {
        Self {}
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopReturns {
    /// Recorded profile.
    pub profile: Profile,
}

impl_command!(StopParams, "Profiler.stop", StopReturns);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StopPreciseCoverageParams {}

impl StopPreciseCoverageParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(
    StopPreciseCoverageParams,
    "Profiler.stopPreciseCoverage",
    EmptyReturns
);

/// Collect coverage data for the current isolate, and resets execution
/// counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TakePreciseCoverageParams {}

impl TakePreciseCoverageParams {
    pub fn new() -> Self {
        Self {}
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakePreciseCoverageReturns {
    pub result: Vec<ScriptCoverage>,
    pub timestamp: f64,
}

impl_command!(
    TakePreciseCoverageParams,
    "Profiler.takePreciseCoverage",
    TakePreciseCoverageReturns
);

// --- Events ---

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConsoleProfileFinished {
    pub id: String,
    /// Location of console.profileEnd().
    pub location: Location,
    pub profile: Profile,
    /// Profile title passed as an argument to console.profile().
    #[serde(default)]
    pub title: Option<String>,
}

impl_event!(EventConsoleProfileFinished, "Profiler.consoleProfileFinished");

/// Sent when new profile recording is started using console.profile() call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConsoleProfileStarted {
    pub id: String,
    pub location: Location,
    #[serde(default)]
    pub title: Option<String>,
}

impl_event!(EventConsoleProfileStarted, "Profiler.consoleProfileStarted");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPreciseCoverageDeltaUpdate {
    pub timestamp: f64,
    /// Identifier for distinguishing coverage events.
    pub occasion: String,
    pub result: Vec<ScriptCoverage>,
}

impl_event!(
    EventPreciseCoverageDeltaUpdate,
    "Profiler.preciseCoverageDeltaUpdate"
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stop_returns_profile_tree() {
        let returns: StopReturns = serde_json::from_value(json!({
            "profile": {
                "nodes": [
                    { "id": 1, "callFrame": { "functionName": "(root)", "scriptId": "0",
                      "url": "", "lineNumber": -1, "columnNumber": -1 }, "children": [2] },
                    { "id": 2, "callFrame": { "functionName": "work", "scriptId": "9",
                      "url": "a.js", "lineNumber": 4, "columnNumber": 0 },
                      "hitCount": 7, "positionTicks": [ { "line": 5, "ticks": 7 } ] }
                ],
                "startTime": 100.0,
                "endTime": 250.0,
                "samples": [2, 2],
                "timeDeltas": [10, 12]
            }
        }))
        .unwrap();

        let profile = returns.profile;
        assert_eq!(profile.root().unwrap().children, Some(vec![2]));
        let work = profile.node(2).unwrap();
        assert_eq!(work.hit_count, Some(7));
        assert_eq!(work.position_ticks.as_ref().unwrap()[0].ticks, 7);
        assert!(profile.node(3).is_none());
    }

    #[test]
    fn coverage_ranges_keep_order() {
        let coverage: ScriptCoverage = serde_json::from_value(json!({
            "scriptId": "9",
            "url": "a.js",
            "functions": [{
                "functionName": "",
                "isBlockCoverage": true,
                "ranges": [
                    { "startOffset": 0, "endOffset": 100, "count": 1 },
                    { "startOffset": 10, "endOffset": 20, "count": 0 }
                ]
            }]
        }))
        .unwrap();
        let ends: Vec<_> = coverage.functions[0].ranges.iter().map(|r| r.end_offset).collect();
        assert_eq!(ends, [100, 20]);
    }

    #[test]
    fn precise_coverage_flags_are_optional() {
        assert_eq!(
            serde_json::to_value(StartPreciseCoverageParams::new()).unwrap(),
            json!({})
        );
        assert_eq!(
            serde_json::to_value(
                StartPreciseCoverageParams::new()
                    .with_call_count(true)
                    .with_detailed(true)
            )
            .unwrap(),
            json!({ "callCount": true, "detailed": true })
        );
    }

    #[test]
    fn console_profile_started_without_title() {
        let event: EventConsoleProfileStarted = serde_json::from_value(json!({
            "id": "1",
            "location": { "scriptId": "3", "lineNumber": 0, "columnNumber": 8 }
        }))
        .unwrap();
        assert_eq!(event.title, None);
        assert_eq!(event.location.column_number, Some(8));
    }
}
