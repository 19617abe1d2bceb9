//! Paint definitions and render targets.
//!
//! Elements describe how they look through a [`StyleDescriptor`] built from
//! shared pen, brush and font definitions, and emit primitives onto a
//! [`Surface`]. [`SvgSurface`] is the bundled surface; it regroups each
//! element's primitives into [`RenderLayer`]s so decorations always stack
//! above content.
mod fill;
mod font;
mod layer;
mod stroke;
mod style;
mod surface;
mod text;

pub use fill::FillDefinition;
pub use font::FontDefinition;
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use stroke::{StrokeCap, StrokeDefinition, StrokeJoin, StrokeStyle};
pub use style::{DrawAction, StyleDescriptor, StyleGroup};
pub use surface::{Surface, SvgSurface};
pub use text::measure_text;
