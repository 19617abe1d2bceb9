//! Error types for stimulus scene operations.
//!
//! This module provides the main error type [`StimulusError`] which wraps
//! the error conditions of loading, drawing and exporting scenes.

use std::io;

use thiserror::Error;

use stimulus_core::element::ElementError;

/// The main error type for stimulus scene operations.
#[derive(Debug, Error)]
pub enum StimulusError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Scene document error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Element error: {0}")]
    Element(#[from] ElementError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),
}
