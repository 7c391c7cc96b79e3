//! Axes and axis titles
//!
//! Axes are `<g>` groups with a domain path and one `tick` group per value,
//! each tick holding a 6px line and a label.

use super::scale::{LinearScale, PointScale};
use super::svg::{fmt_num, Element};

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
/// Half-pixel shift keeping 1px strokes crisp
const OFFSET: f64 = 0.5;

fn axis_group(transform: String, text_anchor: &str) -> Element {
    Element::new("g")
        .attr("transform", transform)
        .attr("fill", "none")
        .attr("font-size", 10)
        .attr("font-family", "sans-serif")
        .attr("text-anchor", text_anchor)
}

/// Bottom axis for the term scale, labels rotated and bold
pub fn bottom_axis(x: &PointScale, y_position: f64, label_rotation: f64) -> Element {
    let (r0, r1) = x.range();
    let domain = format!(
        "M{},{}V{}H{}V{}",
        fmt_num(r0 + OFFSET),
        fmt_num(TICK_SIZE),
        fmt_num(OFFSET),
        fmt_num(r1 + OFFSET),
        fmt_num(TICK_SIZE)
    );

    let mut axis = axis_group(format!("translate(0,{})", fmt_num(y_position)), "middle").child(
        Element::new("path")
            .attr("class", "domain")
            .attr("stroke", "currentColor")
            .attr("d", domain),
    );

    for (term, pos) in x.domain().iter().zip(x.positions()) {
        axis.push(
            Element::new("g")
                .attr("class", "tick")
                .attr("opacity", 1)
                .attr("transform", format!("translate({},0)", fmt_num(pos)))
                .child(
                    Element::new("line")
                        .attr("stroke", "currentColor")
                        .attr("y2", fmt_num(TICK_SIZE)),
                )
                .child(
                    Element::new("text")
                        .attr("fill", "currentColor")
                        .attr("y", fmt_num(TICK_SIZE + TICK_PADDING))
                        .attr("dy", "0.71em")
                        .attr("transform", format!("rotate({})", fmt_num(label_rotation)))
                        .attr("style", "text-anchor: end; font-weight: bold;")
                        .text(term.clone()),
                ),
        );
    }

    axis
}

/// Left axis for the count scale with roughly `tick_count` ticks, bold labels
pub fn left_axis(y: &LinearScale, x_position: f64, tick_count: usize) -> Element {
    let (r0, r1) = y.range();
    let domain = format!(
        "M{},{}H{}V{}H{}",
        fmt_num(-TICK_SIZE),
        fmt_num(r0 + OFFSET),
        fmt_num(OFFSET),
        fmt_num(r1 + OFFSET),
        fmt_num(-TICK_SIZE)
    );

    let mut axis = axis_group(format!("translate({},0)", fmt_num(x_position)), "end").child(
        Element::new("path")
            .attr("class", "domain")
            .attr("stroke", "currentColor")
            .attr("d", domain),
    );

    for value in y.ticks(tick_count) {
        axis.push(
            Element::new("g")
                .attr("class", "tick")
                .attr("opacity", 1)
                .attr(
                    "transform",
                    format!("translate(0,{})", fmt_num(y.apply(value) + OFFSET)),
                )
                .child(
                    Element::new("line")
                        .attr("stroke", "currentColor")
                        .attr("x2", fmt_num(-TICK_SIZE)),
                )
                .child(
                    Element::new("text")
                        .attr("fill", "currentColor")
                        .attr("x", fmt_num(-(TICK_SIZE + TICK_PADDING)))
                        .attr("dy", "0.32em")
                        .attr("style", "font-weight: bold;")
                        .text(y.tick_format(tick_count, value)),
                ),
        );
    }

    axis
}

/// Centred title below the x axis
pub fn x_title(text: &str, x: f64, y: f64) -> Element {
    Element::new("text")
        .attr("x", fmt_num(x))
        .attr("y", fmt_num(y))
        .attr("text-anchor", "middle")
        .attr("style", "font-size: 14px; font-weight: bold;")
        .text(text)
}

/// Title rotated to run up the y axis; `x` is measured along the rotated axis
pub fn y_title(text: &str, x: f64, y: f64) -> Element {
    Element::new("text")
        .attr("x", fmt_num(x))
        .attr("y", fmt_num(y))
        .attr("transform", "rotate(-90)")
        .attr("text-anchor", "middle")
        .attr("style", "font-size: 14px; font-weight: bold;")
        .text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks_of(axis: &Element) -> Vec<&Element> {
        let mut groups = Vec::new();
        axis.find_all("g", &mut groups);
        groups
            .into_iter()
            .filter(|g| g.get_attr("class") == Some("tick"))
            .collect()
    }

    #[test]
    fn test_bottom_axis_ticks() {
        let x = PointScale::new(vec!["F23".to_string(), "S24".to_string()], (60.0, 720.0));
        let axis = bottom_axis(&x, 330.0, -30.0);

        assert_eq!(axis.get_attr("transform"), Some("translate(0,330)"));
        let ticks = ticks_of(&axis);
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[1].get_attr("transform"), Some("translate(720,0)"));

        let mut texts = Vec::new();
        axis.find_all("text", &mut texts);
        assert_eq!(texts[0].text_content(), "F23");
        assert_eq!(texts[0].get_attr("transform"), Some("rotate(-30)"));
        assert!(texts[0].get_attr("style").unwrap().contains("font-weight: bold"));
        assert!(texts[0].get_attr("style").unwrap().contains("text-anchor: end"));

        let mut paths = Vec::new();
        axis.find_all("path", &mut paths);
        assert_eq!(paths[0].get_attr("d"), Some("M60.5,6V0.5H720.5V6"));
    }

    #[test]
    fn test_left_axis_ticks() {
        let y = LinearScale::new((-1200.0, 4800.0), (330.0, 20.0));
        let axis = left_axis(&y, 60.0, 5);

        assert_eq!(axis.get_attr("transform"), Some("translate(60,0)"));
        let labels: Vec<String> = {
            let mut texts = Vec::new();
            axis.find_all("text", &mut texts);
            texts.iter().map(|t| t.text_content()).collect()
        };
        assert_eq!(
            labels,
            vec!["\u{2212}1,000", "0", "1,000", "2,000", "3,000", "4,000"]
        );
    }

    #[test]
    fn test_empty_axes() {
        let x = PointScale::new(Vec::new(), (60.0, 720.0));
        assert!(ticks_of(&bottom_axis(&x, 330.0, -30.0)).is_empty());

        let y = LinearScale::new((0.0, 0.0), (330.0, 20.0));
        assert_eq!(ticks_of(&left_axis(&y, 60.0, 5)).len(), 1);
    }

    #[test]
    fn test_titles() {
        let title = y_title("Number of Students", -200.0, 18.0);
        assert_eq!(title.get_attr("transform"), Some("rotate(-90)"));
        assert_eq!(title.get_attr("x"), Some("-200"));
        assert_eq!(x_title("Academic Term", 500.0, 390.0).text_content(), "Academic Term");
    }
}
