//! Stimulus Core Types and Definitions
//!
//! This crate provides the element model for stimulus presentation canvases
//! used in eye-tracking experiments. It includes:
//!
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, sizes, rectangles and transforms ([`geometry`] module)
//! - **Draw**: Pens, brushes, fonts, style descriptors and surfaces ([`draw`] module)
//! - **Resources**: Bitmaps and image providers ([`resource`] module)
//! - **Input**: Keyboard modifier state ([`input`] module)
//! - **Elements**: The drawable scene elements ([`element`] module)

pub mod color;
pub mod draw;
pub mod element;
pub mod geometry;
pub mod input;
pub mod resource;
