//! The slice of the `DOM` domain other domains refer to.

use serde::{Deserialize, Serialize};

integer_id!(
    /// Unique DOM node identifier.
    NodeId
);

integer_id!(
    /// Unique DOM node identifier used to reference a node that may not have
    /// been pushed to the front-end.
    BackendNodeId
);

/// A rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

string_enum!(
    /// Pseudo element type.
    PseudoType {
        FirstLine => "first-line",
        FirstLetter => "first-letter",
        Checkmark => "checkmark",
        Before => "before",
        After => "after",
        PickerIcon => "picker-icon",
        Marker => "marker",
        Backdrop => "backdrop",
        Column => "column",
        Selection => "selection",
        SearchText => "search-text",
        TargetText => "target-text",
        SpellingError => "spelling-error",
        GrammarError => "grammar-error",
        Highlight => "highlight",
        FirstLineInherited => "first-line-inherited",
        ScrollMarker => "scroll-marker",
        ScrollMarkerGroup => "scroll-marker-group",
        ScrollButton => "scroll-button",
        Scrollbar => "scrollbar",
        ScrollbarThumb => "scrollbar-thumb",
        ScrollbarButton => "scrollbar-button",
        ScrollbarTrack => "scrollbar-track",
        ScrollbarTrackPiece => "scrollbar-track-piece",
        ScrollbarCorner => "scrollbar-corner",
        Resizer => "resizer",
        InputListButton => "input-list-button",
        ViewTransition => "view-transition",
        ViewTransitionGroup => "view-transition-group",
        ViewTransitionImagePair => "view-transition-image-pair",
        ViewTransitionOld => "view-transition-old",
        ViewTransitionNew => "view-transition-new",
        Placeholder => "placeholder",
        FileSelectorButton => "file-selector-button",
        DetailsContent => "details-content",
        Picker => "picker",
    }
);

string_enum!(
    /// Shadow root type.
    ShadowRootType {
        UserAgent => "user-agent",
        Open => "open",
        Closed => "closed",
    }
);
