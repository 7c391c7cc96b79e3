//! Streamgraph rendering
//!
//! Pure building blocks (scales, stacking, path generation, the hover
//! reducer) plus the renderer that composes them into the mount points.
//!
//! Structure:
//! - `scale.rs`: point, linear and ordinal color scales, tick generation
//! - `stack.rs`: layer stacking with wiggle/silhouette/zero offsets
//! - `curve.rs`: basis/linear area paths
//! - `interaction.rs`: hover state and the pure pointer-event reducer
//! - `axis.rs`, `legend.rs`: axis and legend elements
//! - `mounts.rs`: chart canvas, tooltip and legend mount points
//! - `render.rs`: the renderer
//! - `document.rs`: SVG/HTML serialisation
//! - `svg.rs`: element tree

pub mod axis;
pub mod curve;
pub mod document;
pub mod interaction;
pub mod legend;
pub mod mounts;
pub mod render;
pub mod scale;
pub mod stack;
pub mod svg;

pub use curve::{area_path, Curve};
pub use document::{write, write_html, write_svg, OutputFormat};
pub use interaction::{reduce, HoverContext, InteractionState, PointerEvent, Tooltip};
pub use mounts::{LegendMount, LegendRow, Mounts, SvgCanvas, TooltipMount};
pub use render::{render, ChartConfig, Margins, Streamgraph};
pub use scale::{LinearScale, OrdinalColorScale, PointScale};
pub use stack::{stack_layers, StackOffset, StackPoint, StackedLayer};
