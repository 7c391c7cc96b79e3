//! Streamgraph renderer
//!
//! Turns pivoted rows into drawn elements in the supplied mounts:
//! 1. Geometry and term scale
//! 2. Color scale
//! 3. Stacked layers, then the count scale fitted to them
//! 4. Layer paths and hover bands with baked tooltips
//! 5. Axes and titles
//! 6. Legend

use super::axis::{bottom_axis, left_axis, x_title, y_title};
use super::curve::{area_path, Curve};
use super::interaction::{reduce, HoverContext, InteractionState, PointerEvent};
use super::legend::fill_legend;
use super::mounts::Mounts;
use super::scale::{LinearScale, OrdinalColorScale, PointScale};
use super::stack::{stack_layers, StackOffset, StackedLayer};
use super::svg::{fmt_num, Element};
use crate::enrollment::palettes::{PaletteDefinition, DEFAULT_PALETTE, PALETTE_REGISTRY};
use crate::enrollment::PivotedRow;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 180.0,
            bottom: 70.0,
            left: 60.0,
        }
    }
}

/// Chart geometry, styling and labels
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    /// Extra space between the plot and the right margin, reserved for the legend
    pub legend_offset: f64,
    pub palette: String,
    pub offset: StackOffset,
    pub curve: Curve,
    pub x_label: String,
    pub y_label: String,
    pub x_tick_rotation: f64,
    pub y_ticks: usize,
    pub legend_right: String,
    pub legend_top: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 400.0,
            margins: Margins::default(),
            legend_offset: 100.0,
            palette: DEFAULT_PALETTE.to_string(),
            offset: StackOffset::Wiggle,
            curve: Curve::Basis,
            x_label: "Academic Term".to_string(),
            y_label: "Number of Students".to_string(),
            x_tick_rotation: -30.0,
            y_ticks: 5,
            legend_right: "30%".to_string(),
            legend_top: "10%".to_string(),
        }
    }
}

impl ChartConfig {
    /// Horizontal extent of the plot area
    pub fn x_range(&self) -> (f64, f64) {
        (
            self.margins.left,
            self.width - self.margins.right - self.legend_offset,
        )
    }

    /// Vertical extent of the plot area, bottom first
    pub fn y_range(&self) -> (f64, f64) {
        (self.height - self.margins.bottom, self.margins.top)
    }
}

/// Everything computed during a render
#[derive(Debug, Clone)]
pub struct Streamgraph {
    pub x: PointScale,
    pub y: LinearScale,
    pub color: OrdinalColorScale,
    pub layers: Vec<StackedLayer>,
    /// Area path data, one per layer
    pub paths: Vec<String>,
}

/// Draw the streamgraph for `rows` into `mounts`
///
/// Layers follow `departments` order. Empty input draws axes, titles and an
/// empty legend without any layers.
pub fn render(
    rows: &[PivotedRow],
    departments: &[String],
    config: &ChartConfig,
    mounts: &mut Mounts,
) -> Streamgraph {
    mounts.chart.set_view_box(config.width, config.height);

    // 1. Term scale
    let terms: Vec<String> = rows.iter().map(|r| r.term.clone()).collect();
    let x = PointScale::new(terms, config.x_range());

    // 2. Colors
    let empty_palette = PaletteDefinition {
        name: String::new(),
        colors: Vec::new(),
    };
    let palette = PALETTE_REGISTRY.resolve(&config.palette).unwrap_or_else(|| {
        warn!("no palettes available, drawing layers in grey");
        &empty_palette
    });
    let color = OrdinalColorScale::new(departments, palette);

    // 3. Stack, then fit the count scale
    let layers = stack_layers(rows, departments, config.offset);
    let y = LinearScale::new(value_extent(&layers), config.y_range());
    debug!(
        layers = layers.len(),
        terms = x.domain().len(),
        domain = ?y.domain(),
        "stacked layers"
    );

    // 4. Layers and hover bands
    let xs = x.positions();
    let mut paths = Vec::with_capacity(layers.len());
    for layer in &layers {
        let baselines: Vec<f64> = layer.points.iter().map(|p| y.apply(p.baseline)).collect();
        let tops: Vec<f64> = layer.points.iter().map(|p| y.apply(p.top)).collect();
        let d = area_path(config.curve, &xs, &baselines, &tops);

        mounts.chart.append(
            Element::new("path")
                .attr("class", "layer")
                .attr("fill", color.hex(&layer.key))
                .attr("d", &d),
        );
        paths.push(d);
    }

    let ctx = HoverContext {
        x: &x,
        layers: &layers,
    };
    for (layer, d) in layers.iter().zip(&paths) {
        let clip_id = format!("layer-clip-{}", layer.index);
        mounts.chart.append_def(
            Element::new("clipPath")
                .attr("id", &clip_id)
                .child(Element::new("path").attr("d", d)),
        );
        mounts
            .chart
            .append(hover_bands(layer, &clip_id, &ctx, config));
    }

    // 5. Axes and titles
    let (y_bottom, y_top) = config.y_range();
    mounts
        .chart
        .append(bottom_axis(&x, y_bottom, config.x_tick_rotation));
    mounts
        .chart
        .append(left_axis(&y, config.margins.left, config.y_ticks));
    mounts.chart.append(x_title(
        &config.x_label,
        config.width / 2.0,
        config.height - config.margins.bottom + 60.0,
    ));
    mounts
        .chart
        .append(y_title(&config.y_label, -config.height / 2.0, 18.0));
    debug!(top = y_top, bottom = y_bottom, "drew axes");

    // 6. Legend
    mounts
        .legend
        .position(&config.legend_right, &config.legend_top);
    mounts.legend.origin = (
        config.width - config.margins.right + 10.0,
        config.margins.top,
    );
    fill_legend(&mut mounts.legend, departments, &color);

    Streamgraph {
        x,
        y,
        color,
        layers,
        paths,
    }
}

/// [min baseline, max top] over all layers; `(0, 0)` when nothing is stacked
fn value_extent(layers: &[StackedLayer]) -> (f64, f64) {
    let min = layers.iter().filter_map(|l| l.min_baseline()).reduce(f64::min);
    let max = layers.iter().filter_map(|l| l.max_top()).reduce(f64::max);
    match (min, max) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => (0.0, 0.0),
    }
}

/// Transparent per-term bands clipped to the layer, each carrying the tooltip
/// a pointer entering the layer at that term would show: as `<title>` text
/// for standalone SVG and as `data-tooltip` HTML for the page's tooltip element
fn hover_bands(layer: &StackedLayer, clip_id: &str, ctx: &HoverContext<'_>, config: &ChartConfig) -> Element {
    let (plot_left, plot_right) = config.x_range();
    let (plot_bottom, plot_top) = config.y_range();
    let half_step = if ctx.x.domain().len() > 1 {
        ctx.x.step() / 2.0
    } else {
        (plot_right - plot_left) / 2.0
    };

    let mut group = Element::new("g")
        .attr("class", "hover")
        .attr("clip-path", format!("url(#{})", clip_id))
        .attr("fill", "transparent");

    for (i, pos) in ctx.x.positions().into_iter().enumerate() {
        let state = reduce(
            &InteractionState::default(),
            &PointerEvent::Enter {
                layer: layer.index,
                x: pos,
                page_x: pos,
                page_y: plot_top,
            },
            ctx,
        );

        let left = (pos - half_step).max(plot_left);
        let right = (pos + half_step).min(plot_right);
        group.push(
            Element::new("rect")
                .attr("data-term", i)
                .attr("x", fmt_num(left))
                .attr("y", fmt_num(plot_top))
                .attr("width", fmt_num((right - left).max(0.0)))
                .attr("height", fmt_num((plot_bottom - plot_top).max(0.0)))
                .attr("data-tooltip", state.tooltip.html())
                .child(Element::new("title").text(state.tooltip.text())),
        );
    }

    group
}
