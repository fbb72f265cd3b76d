//! # Gesture scripts
//!
//! The desktop host has no touch screen, so input is replayed from TOML files:
//!
//! ```toml
//! [[event]]
//! kind = "down"
//! x = 10.0
//! y = 20.0
//!
//! [[event]]
//! kind = "move"
//! x = 30.0
//! y = 20.0
//!
//! [[event]]
//! kind = "up"
//!
//! [[event]]
//! kind = "save"
//! ```
//!
//! Pointer events take an optional `pointer` id (default 0) and position (default origin). `reset` and `save`
//! stand in for the two buttons. A whole drag can be written as SVG path data, which replays as a press at the
//! move-to, a move per line-to, and a lift at the end:
//!
//! ```toml
//! [[event]]
//! kind = "stroke"
//! path = "M10 10L20 10L20 20"
//! ```

use signpad_core::path::PathCommand;
use signpad_core::pointer::{PointerEvent, PointerId, PointerPhase};
use signpad_core::FrozenPath;

#[derive(Copy, Clone, PartialEq, Default, Debug, serde::Deserialize)]
pub struct PointerStep {
    #[serde(default)]
    pub pointer: PointerId,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

#[derive(Clone, PartialEq, Debug, serde::Deserialize)]
pub struct StrokeStep {
    #[serde(default)]
    pub pointer: PointerId,
    #[serde(deserialize_with = "path_data")]
    pub path: FrozenPath,
}
fn path_data<'de, D>(deserializer: D) -> Result<FrozenPath, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let data = <String as serde::Deserialize>::deserialize(deserializer)?;
    data.parse().map_err(serde::de::Error::custom)
}

#[derive(Clone, PartialEq, Debug, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptEvent {
    Down(PointerStep),
    Move(PointerStep),
    Up(PointerStep),
    Cancel(PointerStep),
    Stroke(StrokeStep),
    Reset,
    Save,
}
impl ScriptEvent {
    /// The pointer events this step replays, in order. Empty for button presses.
    #[must_use]
    pub fn pointer_events(&self) -> Vec<PointerEvent> {
        let single = |phase, step: &PointerStep| {
            vec![PointerEvent {
                pointer: step.pointer,
                phase,
                pos: (step.x, step.y),
            }]
        };
        match self {
            Self::Down(step) => single(PointerPhase::Down, step),
            Self::Move(step) => single(PointerPhase::Move, step),
            Self::Up(step) => single(PointerPhase::Up, step),
            Self::Cancel(step) => single(PointerPhase::Cancel, step),
            Self::Stroke(StrokeStep { pointer, path }) => {
                let event = |phase, at: signpad_core::Point| PointerEvent {
                    pointer: *pointer,
                    phase,
                    pos: (at.x(), at.y()),
                };
                let mut events: Vec<_> = path
                    .commands()
                    .iter()
                    .map(|command| match command {
                        PathCommand::MoveTo(at) => event(PointerPhase::Down, *at),
                        PathCommand::LineTo(at) => event(PointerPhase::Move, *at),
                    })
                    .collect();
                if let Some(last) = path.commands().last() {
                    events.push(event(PointerPhase::Up, last.point()));
                }
                events
            }
            Self::Reset | Self::Save => Vec::new(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, PartialEq, Default, Debug, serde::Deserialize)]
pub struct Script {
    #[serde(rename = "event", default)]
    pub events: Vec<ScriptEvent>,
}
impl Script {
    pub fn load(path: &std::path::Path) -> Result<Self, ScriptError> {
        let string = std::fs::read_to_string(path)?;
        Ok(Self::parse(&string)?)
    }
    pub fn parse(string: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(string)?)
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
