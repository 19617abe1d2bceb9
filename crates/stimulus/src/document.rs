//! Persisted scene documents.
//!
//! A [`SceneDocument`] is the JSON form of a [`Scene`](crate::Scene): the
//! canvas size plus one [`ElementRecord`] per element in z-order.

use std::{fs, path::Path};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use stimulus_core::{element::ElementRecord, geometry::PixelSize};

use crate::StimulusError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    pub canvas: PixelSize,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
}

impl SceneDocument {
    pub fn new(canvas: PixelSize, elements: Vec<ElementRecord>) -> Self {
        Self { canvas, elements }
    }

    /// Parses a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`StimulusError::Serialization`] for malformed documents.
    pub fn from_json(text: &str) -> Result<Self, StimulusError> {
        let document: Self = serde_json::from_str(text)?;
        debug!(elements = document.elements.len(); "Parsed scene document");
        Ok(document)
    }

    /// Serializes the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, StimulusError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, StimulusError> {
        let text = fs::read_to_string(path)?;
        let document = Self::from_json(&text)?;
        info!(path:? = path, elements = document.elements.len(); "Scene document loaded");
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> Result<(), StimulusError> {
        fs::write(path, self.to_json()?)?;
        info!(path:? = path, elements = self.elements.len(); "Scene document saved");
        Ok(())
    }
}
