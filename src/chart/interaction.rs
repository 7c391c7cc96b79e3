//! Hover state for the chart layers
//!
//! Pointer events are folded into an [`InteractionState`] by a pure reducer.
//! The renderer runs the reducer once per (layer, term) to bake tooltips
//! into the document; hosts that forward live pointer events can drive the
//! same reducer and copy the resulting [`Tooltip`] into their tooltip mount.

use super::scale::PointScale;
use super::stack::StackedLayer;
use super::svg::escape;

/// Horizontal offset of the tooltip from the pointer
pub const TOOLTIP_OFFSET_X: f64 = 10.0;
/// Vertical offset of the tooltip from the pointer
pub const TOOLTIP_OFFSET_Y: f64 = -28.0;

#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Pointer entered a layer. `x` is in chart coordinates, `page_x`/`page_y`
    /// in page coordinates.
    Enter {
        layer: usize,
        x: f64,
        page_x: f64,
        page_y: f64,
    },
    Move {
        page_x: f64,
        page_y: f64,
    },
    Leave,
}

/// Tooltip element state: visibility, position and content
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tooltip {
    pub opacity: f64,
    pub left: f64,
    pub top: f64,
    pub department: String,
    pub term: String,
    pub count: String,
}

impl Tooltip {
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// Plain-text content, one field per line
    pub fn text(&self) -> String {
        format!(
            "Department: {}\nTerm: {}\nStudents: {}",
            self.department, self.term, self.count
        )
    }

    /// HTML content for a tooltip element
    pub fn html(&self) -> String {
        format!(
            "<strong>Department:</strong> {}<br><strong>Term:</strong> {}<br><strong>Students:</strong> {}",
            escape(&self.department),
            escape(&self.term),
            escape(&self.count)
        )
    }

    /// Inline style for a tooltip element
    pub fn style(&self) -> String {
        format!(
            "opacity: {}; left: {}px; top: {}px;",
            super::svg::fmt_num(self.opacity),
            super::svg::fmt_num(self.left),
            super::svg::fmt_num(self.top)
        )
    }

    fn place(&mut self, page_x: f64, page_y: f64) {
        self.left = page_x + TOOLTIP_OFFSET_X;
        self.top = page_y + TOOLTIP_OFFSET_Y;
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub hovered_layer: Option<usize>,
    pub hovered_term: Option<usize>,
    pub pointer: (f64, f64),
    pub tooltip: Tooltip,
}

/// What the reducer needs to resolve a hover: the term scale and the layers
#[derive(Debug, Clone, Copy)]
pub struct HoverContext<'a> {
    pub x: &'a PointScale,
    pub layers: &'a [StackedLayer],
}

/// Apply one pointer event
pub fn reduce(state: &InteractionState, event: &PointerEvent, ctx: &HoverContext<'_>) -> InteractionState {
    let mut next = state.clone();

    match *event {
        PointerEvent::Enter {
            layer,
            x,
            page_x,
            page_y,
        } => {
            let term_index = ctx.x.nearest_index(x);
            let term = term_index
                .and_then(|i| ctx.x.domain().get(i))
                .cloned()
                .unwrap_or_default();

            let hovered = ctx.layers.get(layer);
            let count = match (hovered, term_index) {
                (Some(l), Some(i)) => l.points.get(i).map(|p| format_count(p.value())),
                _ => None,
            };

            next.hovered_layer = hovered.map(|l| l.index);
            next.hovered_term = term_index;
            next.pointer = (page_x, page_y);
            next.tooltip = Tooltip {
                opacity: 1.0,
                department: hovered.map(|l| l.key.clone()).unwrap_or_default(),
                term,
                count: count.unwrap_or_else(|| "N/A".to_string()),
                ..Tooltip::default()
            };
            next.tooltip.place(page_x, page_y);
        }
        PointerEvent::Move { page_x, page_y } => {
            next.pointer = (page_x, page_y);
            next.tooltip.place(page_x, page_y);
        }
        PointerEvent::Leave => {
            next.hovered_layer = None;
            next.hovered_term = None;
            next.tooltip.opacity = 0.0;
        }
    }

    next
}

/// Whole-number student count, halves rounded away from zero
fn format_count(value: f64) -> String {
    let rounded = value.round();
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::stack::StackPoint;

    fn fixture() -> (PointScale, Vec<StackedLayer>) {
        let x = PointScale::new(
            vec!["F23".to_string(), "S24".to_string(), "F24".to_string()],
            (60.0, 720.0),
        );
        let layers = vec![
            StackedLayer {
                key: "CS".to_string(),
                index: 0,
                points: vec![
                    StackPoint { baseline: -5.0, top: 5.0 },
                    StackPoint { baseline: -4.0, top: 4.4 },
                    StackPoint { baseline: 0.0, top: 12.5 },
                ],
            },
            StackedLayer {
                key: "Math".to_string(),
                index: 1,
                points: vec![
                    StackPoint { baseline: 5.0, top: 10.0 },
                    StackPoint { baseline: 4.4, top: 4.4 },
                    StackPoint { baseline: 12.5, top: 20.0 },
                ],
            },
        ];
        (x, layers)
    }

    fn enter(layer: usize, x: f64) -> PointerEvent {
        PointerEvent::Enter {
            layer,
            x,
            page_x: 200.0,
            page_y: 100.0,
        }
    }

    #[test]
    fn test_enter_shows_nearest_term() {
        let (x, layers) = fixture();
        let ctx = HoverContext { x: &x, layers: &layers };

        let state = reduce(&InteractionState::default(), &enter(0, 380.0), &ctx);
        assert_eq!(state.hovered_layer, Some(0));
        assert_eq!(state.hovered_term, Some(1));
        assert_eq!(state.tooltip.department, "CS");
        assert_eq!(state.tooltip.term, "S24");
        assert_eq!(state.tooltip.count, "8");
        assert!(state.tooltip.is_visible());
        assert_eq!((state.tooltip.left, state.tooltip.top), (210.0, 72.0));
    }

    #[test]
    fn test_count_rounding() {
        let (x, layers) = fixture();
        let ctx = HoverContext { x: &x, layers: &layers };

        let state = reduce(&InteractionState::default(), &enter(0, 720.0), &ctx);
        assert_eq!(state.tooltip.count, "13");

        let state = reduce(&InteractionState::default(), &enter(1, 390.0), &ctx);
        assert_eq!(state.tooltip.count, "0");
    }

    #[test]
    fn test_enter_clamps_outside_range() {
        let (x, layers) = fixture();
        let ctx = HoverContext { x: &x, layers: &layers };

        let left = reduce(&InteractionState::default(), &enter(1, -100.0), &ctx);
        assert_eq!(left.tooltip.term, "F23");
        assert_eq!(left.tooltip.count, "5");

        let right = reduce(&InteractionState::default(), &enter(1, 990.0), &ctx);
        assert_eq!(right.tooltip.term, "F24");
    }

    #[test]
    fn test_enter_without_terms_is_na() {
        let x = PointScale::new(Vec::new(), (60.0, 720.0));
        let ctx = HoverContext { x: &x, layers: &[] };

        let state = reduce(&InteractionState::default(), &enter(0, 100.0), &ctx);
        assert_eq!(state.tooltip.term, "");
        assert_eq!(state.tooltip.count, "N/A");
        assert_eq!(state.hovered_term, None);
    }

    #[test]
    fn test_move_repositions_only() {
        let (x, layers) = fixture();
        let ctx = HoverContext { x: &x, layers: &layers };

        let entered = reduce(&InteractionState::default(), &enter(0, 60.0), &ctx);
        let moved = reduce(
            &entered,
            &PointerEvent::Move {
                page_x: 300.0,
                page_y: 50.0,
            },
            &ctx,
        );
        assert_eq!((moved.tooltip.left, moved.tooltip.top), (310.0, 22.0));
        assert_eq!(moved.tooltip.term, entered.tooltip.term);
        assert_eq!(moved.hovered_layer, Some(0));
    }

    #[test]
    fn test_leave_hides_but_keeps_content() {
        let (x, layers) = fixture();
        let ctx = HoverContext { x: &x, layers: &layers };

        let entered = reduce(&InteractionState::default(), &enter(1, 60.0), &ctx);
        let left = reduce(&entered, &PointerEvent::Leave, &ctx);

        assert!(!left.tooltip.is_visible());
        assert_eq!(left.tooltip.department, "Math");
        assert_eq!(left.tooltip.html(), entered.tooltip.html());
        assert_eq!(left.hovered_layer, None);
    }

    #[test]
    fn test_tooltip_text_and_html() {
        let tooltip = Tooltip {
            opacity: 1.0,
            left: 0.0,
            top: 0.0,
            department: "R&D".to_string(),
            term: "F23".to_string(),
            count: "12".to_string(),
        };
        assert_eq!(tooltip.text(), "Department: R&D\nTerm: F23\nStudents: 12");
        assert_eq!(
            tooltip.html(),
            "<strong>Department:</strong> R&amp;D<br><strong>Term:</strong> F23<br><strong>Students:</strong> 12"
        );
        assert_eq!(tooltip.style(), "opacity: 1; left: 0px; top: 0px;");
    }
}
