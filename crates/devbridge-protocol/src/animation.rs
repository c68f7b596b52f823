//! The `Animation` domain.

use crate::{EmptyReturns, dom::BackendNodeId, runtime::RemoteObject};
use serde::{Deserialize, Serialize};

string_enum!(
    /// Animation type of an [`Animation`].
    AnimationType {
        CssTransition => "CSSTransition",
        CssAnimation => "CSSAnimation",
        WebAnimation => "WebAnimation",
    }
);

/// Animation instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    /// `Animation`'s id.
    pub id: String,
    /// `Animation`'s name.
    pub name: String,
    /// `Animation`'s internal paused state.
    pub paused_state: bool,
    /// `Animation`'s play state.
    pub play_state: String,
    pub playback_rate: f64,
    /// Start time in milliseconds.
    pub start_time: f64,
    /// Current time in milliseconds.
    pub current_time: f64,
    #[serde(rename = "type")]
    pub r#type: AnimationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<AnimationEffect>,
    /// A unique ID for `Animation` representing the sources that triggered
    /// this CSS animation/transition.
    #[serde(rename = "cssId", skip_serializing_if = "Option::is_none")]
    pub css_id: Option<String>,
}

impl Animation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        paused_state: bool,
        play_state: impl Into<String>,
        playback_rate: f64,
        start_time: f64,
        current_time: f64,
        r#type: AnimationType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            paused_state,
            play_state: play_state.into(),
            playback_rate,
            start_time,
            current_time,
            r#type,
            source: None,
            css_id: None,
        }
    }

    pub fn with_source(mut self, source: AnimationEffect) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_css_id(mut self, css_id: impl Into<String>) -> Self {
        self.css_id = Some(css_id.into());
        self
    }
}

/// AnimationEffect instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationEffect {
    pub delay: f64,
    pub end_delay: f64,
    pub iteration_start: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<f64>,
    /// `AnimationEffect`'s iteration duration in milliseconds.
    pub duration: f64,
    /// `AnimationEffect`'s playback direction.
    pub direction: String,
    /// `AnimationEffect`'s fill mode.
    pub fill: String,
    /// Node the effect is attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_node_id: Option<BackendNodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyframes_rule: Option<KeyframesRule>,
    /// `AnimationEffect`'s timing function.
    pub easing: String,
}

impl AnimationEffect {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        delay: f64,
        end_delay: f64,
        iteration_start: f64,
        duration: f64,
        direction: impl Into<String>,
        fill: impl Into<String>,
        easing: impl Into<String>,
    ) -> Self {
        Self {
            delay,
            end_delay,
            iteration_start,
            iterations: None,
            duration,
            direction: direction.into(),
            fill: fill.into(),
            backend_node_id: None,
            keyframes_rule: None,
            easing: easing.into(),
        }
    }

    pub fn with_iterations(mut self, iterations: f64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn with_backend_node_id(mut self, id: BackendNodeId) -> Self {
        self.backend_node_id = Some(id);
        self
    }

    pub fn with_keyframes_rule(mut self, rule: KeyframesRule) -> Self {
        self.keyframes_rule = Some(rule);
        self
    }
}

/// Keyframes Rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframesRule {
    /// CSS keyframed animation's name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// List of animation keyframes.
    pub keyframes: Vec<KeyframeStyle>,
}

impl KeyframesRule {
    pub fn new(keyframes: Vec<KeyframeStyle>) -> Self {
        Self {
            name: None,
            keyframes,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Keyframe Style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeStyle {
    /// Keyframe's time offset, e.g. `"50%"`.
    pub offset: String,
    pub easing: String,
}

impl KeyframeStyle {
    pub fn new(offset: impl Into<String>, easing: impl Into<String>) -> Self {
        Self {
            offset: offset.into(),
            easing: easing.into(),
        }
    }
}

// --- Commands ---

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisableParams {}

impl DisableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(DisableParams, "Animation.disable", EmptyReturns);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnableParams {}

impl EnableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(EnableParams, "Animation.enable", EmptyReturns);

/// Returns the current time of the an animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCurrentTimeParams {
    pub id: String,
}

impl GetCurrentTimeParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCurrentTimeReturns {
    pub current_time: f64,
}

impl_command!(GetCurrentTimeParams, "Animation.getCurrentTime", GetCurrentTimeReturns);

/// Gets the playback rate of the document timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetPlaybackRateParams {}

impl GetPlaybackRateParams {
    pub fn new() -> Self {
        Self {}
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPlaybackRateReturns {
    pub playback_rate: f64,
}

impl_command!(GetPlaybackRateParams, "Animation.getPlaybackRate", GetPlaybackRateReturns);

/// Releases a set of animations to no longer be manipulated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseAnimationsParams {
    pub animations: Vec<String>,
}

impl ReleaseAnimationsParams {
    pub fn new(animations: Vec<String>) -> Self {
        Self { animations }
    }
}

impl_command!(ReleaseAnimationsParams, "Animation.releaseAnimations", EmptyReturns);

/// Gets the remote object of the Animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveAnimationParams {
    pub animation_id: String,
}

impl ResolveAnimationParams {
    pub fn new(animation_id: impl Into<String>) -> Self {
        Self {
            animation_id: animation_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveAnimationReturns {
    pub remote_object: RemoteObject,
}

impl_command!(ResolveAnimationParams, "Animation.resolveAnimation", ResolveAnimationReturns);

/// Seek a set of animations to a particular time within each animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekAnimationsParams {
    pub animations: Vec<String>,
    pub current_time: f64,
}

impl SeekAnimationsParams {
    pub fn new(animations: Vec<String>, current_time: f64) -> Self {
        Self {
            animations,
            current_time,
        }
    }
}

impl_command!(SeekAnimationsParams, "Animation.seekAnimations", EmptyReturns);

/// Sets the paused state of a set of animations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPausedParams {
    pub animations: Vec<String>,
    pub paused: bool,
}

impl SetPausedParams {
    pub fn new(animations: Vec<String>, paused: bool) -> Self {
        Self { animations, paused }
    }
}

impl_command!(SetPausedParams, "Animation.setPaused", EmptyReturns);

/// Sets the playback rate of the document timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPlaybackRateParams {
    pub playback_rate: f64,
}

impl SetPlaybackRateParams {
    pub fn new(playback_rate: f64) -> Self {
        Self { playback_rate }
    }
}

impl_command!(SetPlaybackRateParams, "Animation.setPlaybackRate", EmptyReturns);

/// Sets the timing of an animation node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTimingParams {
    pub animation_id: String,
    pub duration: f64,
    pub delay: f64,
}

impl SetTimingParams {
    pub fn new(animation_id: impl Into<String>, duration: f64, delay: f64) -> Self {
        Self {
            animation_id: animation_id.into(),
            duration,
            delay,
        }
    }
}

impl_command!(SetTimingParams, "Animation.setTiming", EmptyReturns);

// --- Events ---

/// Event for when an animation has been cancelled.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAnimationCanceled {
    pub id: String,
}

impl_event!(EventAnimationCanceled, "Animation.animationCanceled");

/// Event for each animation that has been created.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAnimationCreated {
    pub id: String,
}

impl_event!(EventAnimationCreated, "Animation.animationCreated");

/// Event for animation that has been started.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAnimationStarted {
    pub animation: Animation,
}

impl_event!(EventAnimationStarted, "Animation.animationStarted");

/// Event for animation that has been updated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAnimationUpdated {
    pub animation: Animation,
}

impl_event!(EventAnimationUpdated, "Animation.animationUpdated");
