//! Persisted form of an encoding wheel
//!
//! Document shape:
//!
//! ```json
//! {"Glyphs":["0","1","2"],"Rotation":0}
//! ```
//!
//! Loading runs the same validation as construction, so a document with an
//! empty or duplicate-containing glyph list is rejected.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::encoding::EncodingWheel;
use super::errors::{WheelError, WheelResult};

/// Serialized wheel: alphabet order plus raw rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelDocument {
    /// Glyphs in storage order, rotation not applied
    #[serde(rename = "Glyphs")]
    pub glyphs: Vec<char>,
    /// Accumulated rotation, not normalized
    #[serde(rename = "Rotation", default)]
    pub rotation: i64,
}

impl From<EncodingWheel> for WheelDocument {
    fn from(wheel: EncodingWheel) -> Self {
        Self {
            rotation: wheel.rotation(),
            glyphs: wheel.into_glyphs(),
        }
    }
}

impl TryFrom<WheelDocument> for EncodingWheel {
    type Error = WheelError;

    fn try_from(doc: WheelDocument) -> WheelResult<Self> {
        let mut wheel = EncodingWheel::new(doc.glyphs)?;
        wheel.rotate(doc.rotation);
        Ok(wheel)
    }
}

impl EncodingWheel {
    /// Serialize this wheel into its JSON document
    pub fn to_json(&self) -> WheelResult<String> {
        serde_json::to_string(self).map_err(|e| WheelError::Deserialization(e.to_string()))
    }

    /// Deserialize a wheel from a JSON document
    pub fn from_json(json: &str) -> WheelResult<Self> {
        let doc: WheelDocument =
            serde_json::from_str(json).map_err(|e| WheelError::Deserialization(e.to_string()))?;
        EncodingWheel::try_from(doc).map_err(|e| match e {
            WheelError::InvalidConfig(msg) => WheelError::Deserialization(msg),
            other => other,
        })
    }

    /// Non-failing variant of [`EncodingWheel::from_json`]
    pub fn try_from_json(json: &str) -> Option<Self> {
        Self::from_json(json).ok()
    }

    /// Write the JSON document to `path`
    pub fn save(&self, path: &Path) -> WheelResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a wheel from the JSON document at `path`
    pub fn load(path: &Path) -> WheelResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
