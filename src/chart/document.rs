//! Serialising mounts into a standalone SVG or HTML document

use super::interaction::{TOOLTIP_OFFSET_X, TOOLTIP_OFFSET_Y};
use super::legend::{html_legend, svg_legend};
use super::mounts::Mounts;
use super::svg::{fmt_num, Element};
use std::fmt;
use std::str::FromStr;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

const HTML_STYLE: &str = "
body { font-family: sans-serif; margin: 0; }
#chart { position: relative; }
svg { width: 100%; height: auto; }
.tooltip { position: absolute; pointer-events: none; background: #fff; border: 1px solid #999; border-radius: 4px; padding: 6px 8px; font-size: 12px; }
#legend { position: absolute; font-size: 12px; }
#legend span { vertical-align: middle; }
.legend-color { display: inline-block; vertical-align: middle; width: 12px; height: 12px; margin: 0 6px 4px 0; }
";

/// Copies a hovered band's `data-tooltip` into the tooltip element, follows
/// the pointer, and hides the element again on leave
fn tooltip_script() -> String {
    format!(
        r#"
(function () {{
  var tooltip = document.querySelector(".tooltip");
  function place(event) {{
    tooltip.style.left = (event.pageX + {dx}) + "px";
    tooltip.style.top = (event.pageY - {dy}) + "px";
  }}
  document.querySelectorAll("[data-tooltip]").forEach(function (band) {{
    band.addEventListener("mouseover", function (event) {{
      tooltip.innerHTML = band.getAttribute("data-tooltip");
      tooltip.style.opacity = 1;
      place(event);
    }});
    band.addEventListener("mousemove", place);
    band.addEventListener("mouseout", function () {{
      tooltip.style.opacity = 0;
    }});
  }});
}})();
"#,
        dx = fmt_num(TOOLTIP_OFFSET_X),
        dy = fmt_num(-TOOLTIP_OFFSET_Y)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    Html,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Html => "html",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "html" | "htm" => Ok(Self::Html),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

fn svg_root(mounts: &Mounts) -> Element {
    let canvas = &mounts.chart;
    let mut svg = Element::new("svg")
        .attr("viewBox", format!("0 0 {} {}", fmt_num(canvas.width), fmt_num(canvas.height)));

    if !canvas.defs.is_empty() {
        svg.push(Element::new("defs").children(canvas.defs.iter().cloned()));
    }
    for child in &canvas.children {
        svg.push(child.clone());
    }
    svg
}

/// Standalone SVG; the legend is drawn inside the canvas
pub fn write_svg(mounts: &Mounts) -> String {
    let mut svg = svg_root(mounts)
        .attr("xmlns", SVG_NS)
        .attr("width", fmt_num(mounts.chart.width))
        .attr("height", fmt_num(mounts.chart.height));
    if !mounts.legend.rows.is_empty() {
        svg.push(svg_legend(&mounts.legend));
    }

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    svg.write_to(&mut out, 0);
    out
}

/// HTML page with the chart, the `#legend` element and a tooltip element
/// driven by the hover bands
///
/// Native `<title>` tooltips are left out so only the page's tooltip shows.
/// The tooltip sits directly under `<body>` so its offsets are page
/// coordinates.
pub fn write_html(mounts: &Mounts, title: &str) -> String {
    let tooltip = &mounts.tooltip.tooltip;
    let tooltip_div = Element::new("div")
        .attr("class", "tooltip")
        .attr("style", tooltip.style())
        .raw(tooltip.html());

    let body = Element::new("body")
        .child(
            Element::new("div")
                .attr("id", "chart")
                .child(svg_root(mounts).without("title"))
                .child(html_legend(&mounts.legend)),
        )
        .child(tooltip_div)
        .child(Element::new("script").raw(tooltip_script()));
    let head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8"))
        .child(Element::new("title").text(title))
        .child(Element::new("style").raw(HTML_STYLE));

    let mut out = String::from("<!DOCTYPE html>\n");
    Element::new("html")
        .attr("lang", "en")
        .child(head)
        .child(body)
        .write_to(&mut out, 0);
    out
}

/// Serialise in the requested format
pub fn write(mounts: &Mounts, format: OutputFormat, title: &str) -> String {
    match format {
        OutputFormat::Svg => write_svg(mounts),
        OutputFormat::Html => write_html(mounts, title),
    }
}
