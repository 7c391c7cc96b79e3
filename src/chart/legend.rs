//! Department legend: colored swatch plus name, one row per department

use super::mounts::LegendMount;
use super::scale::OrdinalColorScale;
use super::svg::{fmt_num, Element};

const SWATCH_SIZE: f64 = 12.0;
const ROW_HEIGHT: f64 = 20.0;

/// Fill the legend mount in department order
pub fn fill_legend(legend: &mut LegendMount, departments: &[String], color: &OrdinalColorScale) {
    for department in departments {
        legend.push(department.clone(), color.hex(department));
    }
}

/// Legend drawn inside the SVG canvas at the mount's origin
pub fn svg_legend(legend: &LegendMount) -> Element {
    let (x, y) = legend.origin;
    let mut group = Element::new("g")
        .attr("class", "legend")
        .attr("transform", format!("translate({},{})", fmt_num(x), fmt_num(y)))
        .attr("font-family", "sans-serif")
        .attr("font-size", 12);

    for (i, row) in legend.rows.iter().enumerate() {
        group.push(
            Element::new("g")
                .attr("transform", format!("translate(0,{})", fmt_num(i as f64 * ROW_HEIGHT)))
                .child(
                    Element::new("rect")
                        .attr("class", "legend-color")
                        .attr("width", fmt_num(SWATCH_SIZE))
                        .attr("height", fmt_num(SWATCH_SIZE))
                        .attr("fill", &row.color),
                )
                .child(
                    Element::new("text")
                        .attr("x", fmt_num(SWATCH_SIZE + 6.0))
                        .attr("y", fmt_num(SWATCH_SIZE - 2.0))
                        .text(row.label.clone()),
                ),
        );
    }

    group
}

/// Standalone `#legend` element for HTML output
pub fn html_legend(legend: &LegendMount) -> Element {
    let mut container = Element::new("div")
        .attr("id", "legend")
        .attr("style", format!("right: {}; top: {};", legend.right, legend.top));

    for row in &legend.rows {
        container.push(
            Element::new("div")
                .child(
                    Element::new("div")
                        .attr("class", "legend-color")
                        .attr("style", format!("background: {};", row.color))
                        .text(""),
                )
                .child(Element::new("span").text(row.label.clone())),
        );
    }
    if legend.rows.is_empty() {
        container = container.text("");
    }

    container
}
