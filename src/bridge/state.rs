use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind} value: {value:?}")]
pub struct ParseValueError {
    kind: &'static str,
    value: String,
}

impl ParseValueError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Presentation state of the ad view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Loading,
    Default,
    Expanded,
    Hidden,
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::Loading
    }
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Loading => "loading",
            LifecycleState::Default => "default",
            LifecycleState::Expanded => "expanded",
            LifecycleState::Hidden => "hidden",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleState {
    type Err = ParseValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "loading" => Ok(LifecycleState::Loading),
            "default" => Ok(LifecycleState::Default),
            "expanded" => Ok(LifecycleState::Expanded),
            "hidden" => Ok(LifecycleState::Hidden),
            _ => Err(ParseValueError::new("state", raw)),
        }
    }
}

/// Whether the ad sits inline in content or covers the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementType {
    Inline,
    Interstitial,
}

impl Default for PlacementType {
    fn default() -> Self {
        Self::Inline
    }
}

impl PlacementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementType::Inline => "inline",
            PlacementType::Interstitial => "interstitial",
        }
    }
}

impl fmt::Display for PlacementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementType {
    type Err = ParseValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "inline" => Ok(PlacementType::Inline),
            "interstitial" => Ok(PlacementType::Interstitial),
            _ => Err(ParseValueError::new("placement type", raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceOrientation {
    None,
    Portrait,
    Landscape,
}

impl Default for ForceOrientation {
    fn default() -> Self {
        Self::None
    }
}

impl ForceOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForceOrientation::None => "none",
            ForceOrientation::Portrait => "portrait",
            ForceOrientation::Landscape => "landscape",
        }
    }
}

impl fmt::Display for ForceOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForceOrientation {
    type Err = ParseValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "none" => Ok(ForceOrientation::None),
            "portrait" => Ok(ForceOrientation::Portrait),
            "landscape" => Ok(ForceOrientation::Landscape),
            _ => Err(ParseValueError::new("force orientation", raw)),
        }
    }
}

/// Anchor for the close control of a resized ad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClosePosition {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Default for ClosePosition {
    fn default() -> Self {
        Self::TopRight
    }
}

impl ClosePosition {
    pub const ALL: [ClosePosition; 9] = [
        ClosePosition::TopLeft,
        ClosePosition::TopCenter,
        ClosePosition::TopRight,
        ClosePosition::CenterLeft,
        ClosePosition::Center,
        ClosePosition::CenterRight,
        ClosePosition::BottomLeft,
        ClosePosition::BottomCenter,
        ClosePosition::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClosePosition::TopLeft => "top-left",
            ClosePosition::TopCenter => "top-center",
            ClosePosition::TopRight => "top-right",
            ClosePosition::CenterLeft => "center-left",
            ClosePosition::Center => "center",
            ClosePosition::CenterRight => "center-right",
            ClosePosition::BottomLeft => "bottom-left",
            ClosePosition::BottomCenter => "bottom-center",
            ClosePosition::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for ClosePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClosePosition {
    type Err = ParseValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ClosePosition::ALL
            .into_iter()
            .find(|position| position.as_str() == raw)
            .ok_or_else(|| ParseValueError::new("close position", raw))
    }
}

/// Geometry and behaviour of the expanded view.
///
/// `is_modal` is read-only from the creative's point of view; the bridge
/// forces it back to `true` on every store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpandProperties {
    pub width: i32,
    pub height: i32,
    pub use_custom_close: bool,
    pub is_modal: bool,
}

impl Default for ExpandProperties {
    fn default() -> Self {
        Self {
            width: -1,
            height: -1,
            use_custom_close: false,
            is_modal: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrientationProperties {
    pub allow_orientation_change: bool,
    pub force_orientation: ForceOrientation,
}

impl Default for OrientationProperties {
    fn default() -> Self {
        Self {
            allow_orientation_change: true,
            force_orientation: ForceOrientation::None,
        }
    }
}

/// Geometry of a resized (non-modal) ad. A negative width or height means
/// the creative has not configured it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeProperties {
    pub width: i32,
    pub height: i32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub custom_close_position: ClosePosition,
    pub allow_offscreen: bool,
}

impl Default for ResizeProperties {
    fn default() -> Self {
        Self {
            width: -1,
            height: -1,
            offset_x: 0,
            offset_y: 0,
            custom_close_position: ClosePosition::TopRight,
            allow_offscreen: true,
        }
    }
}

impl ResizeProperties {
    pub fn is_configured(&self) -> bool {
        self.width >= 0 && self.height >= 0
    }
}

/// Every piece of presentation state the bridge tracks for one webview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateStore {
    pub state: LifecycleState,
    pub placement_type: PlacementType,
    pub viewable: bool,
    pub expand: ExpandProperties,
    pub orientation: OrientationProperties,
    pub resize: ResizeProperties,
}

impl StateStore {
    pub fn new(placement_type: PlacementType) -> Self {
        Self {
            placement_type,
            ..Self::default()
        }
    }

    /// Move to `next`, returning the viewability change the move caused.
    ///
    /// Hiding clears viewability in the same step, so no reader can see a
    /// hidden ad that still claims to be viewable.
    pub(crate) fn transition(&mut self, next: LifecycleState) -> Transition {
        if self.state == next {
            return Transition::Unchanged;
        }
        self.state = next;
        let viewability_cleared = next == LifecycleState::Hidden && self.viewable;
        if next == LifecycleState::Hidden {
            self.viewable = false;
        }
        Transition::Changed {
            viewability_cleared,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Unchanged,
    Changed { viewability_cleared: bool },
}
