//! Mount points the renderer draws into
//!
//! The caller creates the mounts and hands them to [`super::render`]; the
//! renderer only appends. Rendering twice into the same mounts duplicates
//! content, so build fresh mounts per render. The duplicates include the
//! `layer-clip-{i}` clip paths: ids repeat, and the second render's hover
//! bands resolve to the first render's layer shapes.

use super::interaction::Tooltip;
use super::svg::Element;

/// Root SVG canvas: viewBox size, shared `<defs>`, and drawn elements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgCanvas {
    pub width: f64,
    pub height: f64,
    pub defs: Vec<Element>,
    pub children: Vec<Element>,
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view_box(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn append(&mut self, element: Element) {
        self.children.push(element);
    }

    pub fn append_def(&mut self, element: Element) {
        self.defs.push(element);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.defs.is_empty()
    }
}

/// The floating tooltip element's initial state (hidden)
///
/// HTML output writes it as the `.tooltip` element; hovering a band copies
/// that band's `data-tooltip` content into it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipMount {
    pub tooltip: Tooltip,
}

impl TooltipMount {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub label: String,
    pub color: String,
}

/// Legend container: one row per department
///
/// `right`/`top` are CSS offsets for a standalone legend element; `origin`
/// is where the legend sits when drawn inside the SVG canvas.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegendMount {
    pub right: String,
    pub top: String,
    pub origin: (f64, f64),
    pub rows: Vec<LegendRow>,
}

impl LegendMount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&mut self, right: &str, top: &str) {
        self.right = right.to_string();
        self.top = top.to_string();
    }

    pub fn push(&mut self, label: impl Into<String>, color: impl Into<String>) {
        self.rows.push(LegendRow {
            label: label.into(),
            color: color.into(),
        });
    }
}

/// Chart canvas, tooltip and legend
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mounts {
    pub chart: SvgCanvas,
    pub tooltip: TooltipMount,
    pub legend: LegendMount,
}

impl Mounts {
    pub fn new() -> Self {
        Self::default()
    }
}
