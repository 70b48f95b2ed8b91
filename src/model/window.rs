use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::layout_engine::geometry::Rect;

/// Document id of an app on a board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub String);

impl AppId {
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for AppId {
    fn from(value: &str) -> Self { Self::new(value) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self { Self { x, y, z: 0.0 } }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub depth: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self { Self { width, height, depth: 0.0 } }
}

/// `WxH`, e.g. `400x300`.
impl FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s.split_once(['x', 'X']).ok_or_else(|| format!("expected WxH, got {s:?}"))?;
        let parse = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("{v:?} in {s:?}: {e}"));
        Ok(Size::new(parse(w)?, parse(h)?))
    }
}

/// The part of an app document the layout cares about. Everything else
/// (type, title, per-app state, ...) is carried along untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// An application window placed on a board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppWindow {
    #[serde(rename = "_id")]
    pub id: AppId,
    #[serde(default)]
    pub data: AppData,
}

impl AppWindow {
    pub fn new(id: impl Into<AppId>, position: Position, size: Size) -> Self {
        Self {
            id: id.into(),
            data: AppData {
                position: Some(position),
                size: Some(size),
                other: Map::new(),
            },
        }
    }

    /// Board-space rectangle of the window, `None` when position or size is
    /// missing, not finite, or the size is not positive.
    pub fn frame(&self) -> Option<Rect> {
        let position = self.data.position?;
        let size = self.data.size?;
        if !position.x.is_finite() || !position.y.is_finite() {
            return None;
        }
        let rect = Rect::new(position.x, position.y, size.width, size.height);
        rect.has_positive_size().then_some(rect)
    }
}

/// New position for one app. Applied by a [`crate::model::BatchUpdate`]
/// collaborator together with the rest of its batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowUpdate {
    pub id: AppId,
    pub position: Position,
}
