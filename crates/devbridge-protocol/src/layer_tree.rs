//! The `LayerTree` domain.

use crate::{
    EmptyReturns,
    dom::{BackendNodeId, Rect},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

string_id!(
    /// Unique Layer identifier.
    LayerId
);

string_id!(
    /// Unique snapshot identifier.
    SnapshotId
);

string_enum!(
    /// Reason for rectangle to force scrolling on the main thread.
    ScrollRectType {
        RepaintsOnScroll => "RepaintsOnScroll",
        TouchEventHandler => "TouchEventHandler",
        WheelEventHandler => "WheelEventHandler",
    }
);

/// Rectangle where scrolling happens on the main thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollRect {
    pub rect: Rect,
    #[serde(rename = "type")]
    pub r#type: ScrollRectType,
}

/// Sticky position constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyPositionConstraint {
    pub sticky_box_rect: Rect,
    pub containing_block_rect: Rect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest_layer_shifting_sticky_box: Option<LayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest_layer_shifting_containing_block: Option<LayerId>,
}

/// Serialized fragment of layer picture along with its offset within the layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureTile {
    pub x: f64,
    pub y: f64,
    /// Base64-encoded snapshot data.
    pub picture: String,
}

impl PictureTile {
    pub fn new(x: f64, y: f64, picture: impl Into<String>) -> Self {
        Self {
            x,
            y,
            picture: picture.into(),
        }
    }
}

/// Information about a compositing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub layer_id: LayerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_layer_id: Option<LayerId>,
    /// The backend id for the node associated with this layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_node_id: Option<BackendNodeId>,
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
    /// Transformation matrix for layer, default is identity matrix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_z: Option<f64>,
    /// Indicates how many time this layer has painted.
    pub paint_count: i64,
    /// Indicates whether this layer hosts any content, rather than being used
    /// for transform/scrolling purposes only.
    pub draws_content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invisible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_rects: Option<Vec<ScrollRect>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticky_position_constraint: Option<StickyPositionConstraint>,
}

/// Array of timings, one per paint step.
pub type PaintProfile = Vec<f64>;

// --- Commands ---

/// Provides the reasons why the given layer was composited.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositingReasonsParams {
    pub layer_id: LayerId,
}

impl CompositingReasonsParams {
    pub fn new(layer_id: impl Into<LayerId>) -> Self {
        Self {
            layer_id: layer_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositingReasonsReturns {
    #[serde(default)]
    pub compositing_reasons: Vec<String>,
    pub compositing_reason_ids: Vec<String>,
}

impl_command!(
    CompositingReasonsParams,
    "LayerTree.compositingReasons",
    CompositingReasonsReturns
);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisableParams {}

impl DisableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(DisableParams, "LayerTree.disable", EmptyReturns);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnableParams {}

impl EnableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(EnableParams, "LayerTree.enable", EmptyReturns);

/// Returns the snapshot identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSnapshotParams {
    /// An array of tiles composing the snapshot.
    pub tiles: Vec<PictureTile>,
}

impl LoadSnapshotParams {
    pub fn new(tiles: Vec<PictureTile>) -> Self {
        Self { tiles }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotReturns {
    pub snapshot_id: SnapshotId,
}

impl_command!(LoadSnapshotParams, "LayerTree.loadSnapshot", SnapshotReturns);

/// Returns the layer snapshot identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeSnapshotParams {
    pub layer_id: LayerId,
}

impl MakeSnapshotParams {
    pub fn new(layer_id: impl Into<LayerId>) -> Self {
        Self {
            layer_id: layer_id.into(),
        }
    }
}

impl_command!(MakeSnapshotParams, "LayerTree.makeSnapshot", SnapshotReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshotParams {
    pub snapshot_id: SnapshotId,
    /// The maximum number of times to replay the snapshot (1, if not specified).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_repeat_count: Option<i64>,
    /// The minimum duration (in seconds) to replay the snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<f64>,
    /// The clip rectangle to apply when replaying the snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_rect: Option<Rect>,
}

impl ProfileSnapshotParams {
    pub fn new(snapshot_id: impl Into<SnapshotId>) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            min_repeat_count: None,
            min_duration: None,
            clip_rect: None,
        }
    }

    pub fn with_min_repeat_count(mut self, count: i64) -> Self {
        self.min_repeat_count = Some(count);
        self
    }

    pub fn with_min_duration(mut self, seconds: f64) -> Self {
        self.min_duration = Some(seconds);
        self
    }

    pub fn with_clip_rect(mut self, rect: Rect) -> Self {
        self.clip_rect = Some(rect);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshotReturns {
    pub timings: Vec<PaintProfile>,
}

impl_command!(
    ProfileSnapshotParams,
    "LayerTree.profileSnapshot",
    ProfileSnapshotReturns
);

/// Releases layer snapshot captured by the back-end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSnapshotParams {
    pub snapshot_id: SnapshotId,
}

impl ReleaseSnapshotParams {
    pub fn new(snapshot_id: impl Into<SnapshotId>) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
        }
    }
}

impl_command!(ReleaseSnapshotParams, "LayerTree.releaseSnapshot", EmptyReturns);

/// Replays the layer snapshot and returns the resulting bitmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySnapshotParams {
    pub snapshot_id: SnapshotId,
    /// The first step to replay from (replay from the very start if not specified).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_step: Option<i64>,
    /// The last step to replay to (replay till the end if not specified).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_step: Option<i64>,
    /// The scale to apply while replaying (defaults to 1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl ReplaySnapshotParams {
    pub fn new(snapshot_id: impl Into<SnapshotId>) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            from_step: None,
            to_step: None,
            scale: None,
        }
    }

    pub fn with_steps(mut self, from_step: i64, to_step: i64) -> Self {
        self.from_step = Some(from_step);
        self.to_step = Some(to_step);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplaySnapshotReturns {
    /// A data: URL for resulting image.
    #[serde(rename = "dataURL")]
    pub data_url: String,
}

impl_command!(
    ReplaySnapshotParams,
    "LayerTree.replaySnapshot",
    ReplaySnapshotReturns
);

/// Replays the layer snapshot and returns canvas log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCommandLogParams {
    pub snapshot_id: SnapshotId,
}

impl SnapshotCommandLogParams {
    pub fn new(snapshot_id: impl Into<SnapshotId>) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCommandLogReturns {
    /// The array of canvas function calls.
    pub command_log: Vec<Value>,
}

impl_command!(
    SnapshotCommandLogParams,
    "LayerTree.snapshotCommandLog",
    SnapshotCommandLogReturns
);

// --- Events ---

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLayerPainted {
    pub layer_id: LayerId,
    pub clip: Rect,
}

impl_event!(EventLayerPainted, "LayerTree.layerPainted");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLayerTreeDidChange {
    /// Layer tree, absent if not in the compositing mode.
    #[serde(default)]
    pub layers: Option<Vec<Layer>>,
}

impl_event!(EventLayerTreeDidChange, "LayerTree.layerTreeDidChange");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn layer_tree_did_change_with_and_without_layers() {
        let empty: EventLayerTreeDidChange = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.layers, None);

        let event: EventLayerTreeDidChange = serde_json::from_value(json!({
            "layers": [{
                "layerId": "1",
                "offsetX": 0.0,
                "offsetY": 0.0,
                "width": 800.0,
                "height": 600.0,
                "paintCount": 3,
                "drawsContent": true,
                "scrollRects": [
                    { "rect": { "x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0 },
                      "type": "WheelEventHandler" }
                ]
            }]
        }))
        .unwrap();
        let layer = &event.layers.unwrap()[0];
        assert_eq!(layer.paint_count, 3);
        assert_eq!(
            layer.scroll_rects.as_ref().unwrap()[0].r#type,
            ScrollRectType::WheelEventHandler
        );
        assert_eq!(layer.parent_layer_id, None);
    }

    #[test]
    fn layer_requires_paint_count() {
        let layer = json!({
            "layerId": "1", "offsetX": 0.0, "offsetY": 0.0,
            "width": 1.0, "height": 1.0, "drawsContent": false
        });
        assert!(serde_json::from_value::<Layer>(layer).is_err());
    }

    #[test]
    fn replay_snapshot_uses_upper_case_url() {
        let params = ReplaySnapshotParams::new("s1").with_scale(2.0);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "snapshotId": "s1", "scale": 2.0 })
        );
        let returns: ReplaySnapshotReturns =
            serde_json::from_value(json!({ "dataURL": "data:image/png;base64," })).unwrap();
        assert!(returns.data_url.starts_with("data:"));
    }

    #[test]
    fn load_snapshot_tiles_in_order() {
        let params = LoadSnapshotParams::new(vec![
            PictureTile::new(0.0, 0.0, "AAA"),
            PictureTile::new(256.0, 0.0, "BBB"),
        ]);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["tiles"][1]["picture"], "BBB");
        assert_eq!(value["tiles"][1]["x"], 256.0);
    }
}
