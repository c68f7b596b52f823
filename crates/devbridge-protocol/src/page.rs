//! The slice of the `Page` domain other domains refer to.

string_id!(
    /// Unique frame identifier.
    FrameId
);
