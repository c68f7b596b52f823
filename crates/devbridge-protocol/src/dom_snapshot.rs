//! The `DOMSnapshot` domain.
//!
//! `captureSnapshot` returns a columnar, string-interned layout: every string
//! is a [`StringIndex`] into [`CaptureSnapshotReturns::strings`], and sparse
//! per-node properties use the `Rare*Data` index/value pairs.

use crate::{
    EmptyReturns,
    dom::{BackendNodeId, PseudoType, Rect, ShadowRootType},
    page::FrameId,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A Node in the DOM tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomNode {
    pub node_type: i64,
    pub node_name: String,
    pub node_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_selected: Option<bool>,
    pub backend_node_id: BackendNodeId,
    /// Indexes of the node's child nodes in the `domNodes` array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_node_indexes: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<NameValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudo_element_indexes: Option<Vec<i64>>,
    /// Index of the node's related layout tree node in the `layoutTreeNodes`
    /// array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_node_index: Option<i64>,
    #[serde(rename = "documentURL", skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    #[serde(rename = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<FrameId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_document_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudo_type: Option<PseudoType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_root_type: Option<ShadowRootType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_clickable: Option<bool>,
    /// Details of the node's event listeners, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_listeners: Option<Vec<Value>>,
    #[serde(rename = "currentSourceURL", skip_serializing_if = "Option::is_none")]
    pub current_source_url: Option<String>,
    #[serde(rename = "originURL", skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_offset_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_offset_y: Option<f64>,
}

/// Details of post layout rendered text positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineTextBox {
    /// The bounding box in document coordinates.
    pub bounding_box: Rect,
    /// The starting index in characters, for this post layout textbox
    /// substring.
    pub start_character_index: i64,
    pub num_characters: i64,
}

/// Details of an element in the DOM tree with a LayoutObject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTreeNode {
    /// Index of the corresponding node in the `domNodes` array.
    pub dom_node_index: i64,
    pub bounding_box: Rect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_text_nodes: Option<Vec<InlineTextBox>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paint_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_stacking_context: Option<bool>,
}

/// A subset of the full ComputedStyle as defined by the request whitelist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedStyle {
    pub properties: Vec<NameValue>,
}

/// A name/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

integer_id!(
    /// Index of the string in the strings table.
    StringIndex
);

/// A list of indexes into the strings table.
pub type ArrayOfStrings = Vec<StringIndex>;

/// Data that is only present on rare nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RareStringData {
    pub index: Vec<i64>,
    pub value: Vec<StringIndex>,
}

impl RareStringData {
    /// Value recorded for node `node_index`, if any.
    pub fn get(&self, node_index: i64) -> Option<StringIndex> {
        self.index
            .iter()
            .position(|&i| i == node_index)
            .and_then(|pos| self.value.get(pos).copied())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RareBooleanData {
    pub index: Vec<i64>,
}

impl RareBooleanData {
    /// A node is `true` iff its index is listed.
    pub fn contains(&self, node_index: i64) -> bool {
        self.index.contains(&node_index)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RareIntegerData {
    pub index: Vec<i64>,
    pub value: Vec<i64>,
}

impl RareIntegerData {
    pub fn get(&self, node_index: i64) -> Option<i64> {
        self.index
            .iter()
            .position(|&i| i == node_index)
            .and_then(|pos| self.value.get(pos).copied())
    }
}

pub type Rectangle = Vec<f64>;

/// Document snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    #[serde(rename = "documentURL")]
    pub document_url: StringIndex,
    pub title: StringIndex,
    #[serde(rename = "baseURL")]
    pub base_url: StringIndex,
    pub content_language: StringIndex,
    pub encoding_name: StringIndex,
    pub public_id: StringIndex,
    pub system_id: StringIndex,
    pub frame_id: StringIndex,
    pub nodes: NodeTreeSnapshot,
    pub layout: LayoutTreeSnapshot,
    pub text_boxes: TextBoxSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_offset_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_offset_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_height: Option<f64>,
}

/// Table containing nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTreeSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_index: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_root_type: Option<RareStringData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<Vec<StringIndex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_value: Option<Vec<StringIndex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_node_id: Option<Vec<BackendNodeId>>,
    /// Attributes of an `Element` node. Flatten name, value pairs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<ArrayOfStrings>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_value: Option<RareStringData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_value: Option<RareStringData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_checked: Option<RareBooleanData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_selected: Option<RareBooleanData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_document_index: Option<RareIntegerData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudo_type: Option<RareStringData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudo_identifier: Option<RareStringData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_clickable: Option<RareBooleanData>,
    #[serde(rename = "currentSourceURL", skip_serializing_if = "Option::is_none")]
    pub current_source_url: Option<RareStringData>,
    #[serde(rename = "originURL", skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<RareStringData>,
}

/// Table of details of an element in the DOM tree with a LayoutObject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTreeSnapshot {
    /// Index of the corresponding node in the `NodeTreeSnapshot` array.
    pub node_index: Vec<i64>,
    /// Array of indexes specifying computed style strings, filtered according
    /// to the `computedStyles` parameter passed to `captureSnapshot`.
    pub styles: Vec<ArrayOfStrings>,
    /// The absolute position bounding box.
    pub bounds: Vec<Rectangle>,
    /// Contents of the LayoutText, if any.
    pub text: Vec<StringIndex>,
    pub stacking_contexts: RareBooleanData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paint_orders: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_rects: Option<Vec<Rectangle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_rects: Option<Vec<Rectangle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_rects: Option<Vec<Rectangle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blended_background_colors: Option<Vec<StringIndex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color_opacities: Option<Vec<f64>>,
}

/// Table of details of the post layout rendered text positions. The exact
/// layout should not be regarded as stable and may change between versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBoxSnapshot {
    /// Index of the layout tree node that owns this box collection.
    pub layout_index: Vec<i64>,
    pub bounds: Vec<Rectangle>,
    pub start: Vec<i64>,
    pub length: Vec<i64>,
}

// --- Commands ---

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisableParams {}

impl DisableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(DisableParams, "DOMSnapshot.disable", EmptyReturns);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnableParams {}

impl EnableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(EnableParams, "DOMSnapshot.enable", EmptyReturns);

/// Returns a document snapshot, including the full DOM tree of the root node
/// (including iframes, template contents, and imported documents) in a
/// flattened array, as well as layout and white-listed computed style
/// information for the nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSnapshotParams {
    pub computed_style_whitelist: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_event_listeners: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_paint_order: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_user_agent_shadow_tree: Option<bool>,
}

impl GetSnapshotParams {
    pub fn new(computed_style_whitelist: Vec<String>) -> Self {
        Self {
            computed_style_whitelist,
            include_event_listeners: None,
            include_paint_order: None,
            include_user_agent_shadow_tree: None,
        }
    }

    pub fn with_include_event_listeners(mut self, include: bool) -> Self {
        self.include_event_listeners = Some(include);
        self
    }

    pub fn with_include_paint_order(mut self, include: bool) -> Self {
        self.include_paint_order = Some(include);
        self
    }

    pub fn with_include_user_agent_shadow_tree(mut self, include: bool) -> Self {
        self.include_user_agent_shadow_tree = Some(include);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSnapshotReturns {
    pub dom_nodes: Vec<DomNode>,
    pub layout_tree_nodes: Vec<LayoutTreeNode>,
    pub computed_styles: Vec<ComputedStyle>,
}

impl_command!(GetSnapshotParams, "DOMSnapshot.getSnapshot", GetSnapshotReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSnapshotParams {
    /// Whitelist of computed styles to return.
    pub computed_styles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_paint_order: Option<bool>,
    /// Whether to include DOM rectangles (offsetRects, clientRects,
    /// scrollRects) into the snapshot.
    #[serde(rename = "includeDOMRects", skip_serializing_if = "Option::is_none")]
    pub include_dom_rects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_blended_background_colors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_text_color_opacities: Option<bool>,
}

impl CaptureSnapshotParams {
    pub fn new(computed_styles: Vec<String>) -> Self {
        Self {
            computed_styles,
            include_paint_order: None,
            include_dom_rects: None,
            include_blended_background_colors: None,
            include_text_color_opacities: None,
        }
    }

    pub fn with_include_paint_order(mut self, include: bool) -> Self {
        self.include_paint_order = Some(include);
        self
    }

    pub fn with_include_dom_rects(mut self, include: bool) -> Self {
        self.include_dom_rects = Some(include);
        self
    }

    pub fn with_include_blended_background_colors(mut self, include: bool) -> Self {
        self.include_blended_background_colors = Some(include);
        self
    }

    pub fn with_include_text_color_opacities(mut self, include: bool) -> Self {
        self.include_text_color_opacities = Some(include);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSnapshotReturns {
    /// The nodes in the DOM tree. The DOMNode at index 0 corresponds to the
    /// root document.
    pub documents: Vec<DocumentSnapshot>,
    /// Shared string table that all string properties refer to with indexes.
    pub strings: Vec<String>,
}

impl CaptureSnapshotReturns {
    /// Resolves an interned string. Negative indexes mean "no value".
    pub fn string(&self, index: StringIndex) -> Option<&str> {
        usize::try_from(index.inner())
            .ok()
            .and_then(|i| self.strings.get(i))
            .map(String::as_str)
    }
}

impl_command!(
    CaptureSnapshotParams,
    "DOMSnapshot.captureSnapshot",
    CaptureSnapshotReturns
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn captured() -> CaptureSnapshotReturns {
        serde_json::from_value(json!({
            "documents": [{
                "documentURL": 0,
                "title": 1,
                "baseURL": 0,
                "contentLanguage": -1,
                "encodingName": 2,
                "publicId": -1,
                "systemId": -1,
                "frameId": 3,
                "nodes": {
                    "parentIndex": [-1, 0],
                    "nodeName": [4, 5],
                    "backendNodeId": [1, 2],
                    "isClickable": { "index": [1] },
                    "inputValue": { "index": [1], "value": [6] }
                },
                "layout": {
                    "nodeIndex": [1],
                    "styles": [[7]],
                    "bounds": [[0.0, 0.0, 10.0, 20.0]],
                    "text": [-1],
                    "stackingContexts": { "index": [] }
                },
                "textBoxes": { "layoutIndex": [], "bounds": [], "start": [], "length": [] }
            }],
            "strings": ["https://example.com/", "Example", "UTF-8", "F1", "#document", "INPUT", "hello", "block"]
        }))
        .unwrap()
    }

    #[test]
    fn capture_snapshot_interned_strings() {
        let snapshot = captured();
        let doc = &snapshot.documents[0];
        assert_eq!(snapshot.string(doc.title), Some("Example"));
        assert_eq!(snapshot.string(doc.content_language), None);

        let nodes = &doc.nodes;
        assert!(nodes.is_clickable.as_ref().unwrap().contains(1));
        assert!(!nodes.is_clickable.as_ref().unwrap().contains(0));
        let input = nodes.input_value.as_ref().unwrap().get(1).unwrap();
        assert_eq!(snapshot.string(input), Some("hello"));
        assert_eq!(doc.layout.bounds[0], vec![0.0, 0.0, 10.0, 20.0]);
        assert_eq!(snapshot.string(doc.layout.styles[0][0]), Some("block"));
    }

    #[test]
    fn capture_params_rename_dom_rects() {
        let params = CaptureSnapshotParams::new(vec!["display".into()])
            .with_include_dom_rects(true);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "computedStyles": ["display"], "includeDOMRects": true })
        );
    }

    #[test]
    fn dom_node_requires_backend_node_id() {
        let node = json!({ "nodeType": 1, "nodeName": "DIV", "nodeValue": "" });
        assert!(serde_json::from_value::<DomNode>(node).is_err());

        let node: DomNode = serde_json::from_value(json!({
            "nodeType": 9,
            "nodeName": "#document",
            "nodeValue": "",
            "backendNodeId": 1,
            "documentURL": "https://example.com/",
            "attributes": [ { "name": "lang", "value": "en" } ],
            "pseudoType": "before"
        }))
        .unwrap();
        assert_eq!(node.document_url.as_deref(), Some("https://example.com/"));
        assert_eq!(node.attributes.unwrap()[0], NameValue::new("lang", "en"));
        assert_eq!(node.pseudo_type, Some(PseudoType::Before));
    }

    #[test]
    fn rare_integer_data_lookup() {
        let data = RareIntegerData {
            index: vec![3, 8],
            value: vec![1, 2],
        };
        assert_eq!(data.get(8), Some(2));
        assert_eq!(data.get(4), None);
    }
}
