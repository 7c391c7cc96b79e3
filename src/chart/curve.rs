//! Area path generation
//!
//! An area is traced as its top edge left to right, then its baseline right
//! to left, and closed. Points are fed through a curve state machine that
//! emits SVG path commands.

use super::svg::fmt_num;
use std::fmt;
use std::str::FromStr;

/// Interpolation between points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
    /// Uniform cubic B-spline; passes through the end points only
    #[default]
    Basis,
    /// Straight segments through every point
    Linear,
}

impl FromStr for Curve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basis" => Ok(Self::Basis),
            "linear" => Ok(Self::Linear),
            other => Err(format!("unknown curve '{}'", other)),
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Basis => "basis",
            Self::Linear => "linear",
        })
    }
}

/// SVG path data accumulator
#[derive(Debug, Default)]
struct PathBuilder {
    data: String,
    started: bool,
}

impl PathBuilder {
    fn move_to(&mut self, x: f64, y: f64) {
        self.data.push_str(&format!("M{},{}", fmt_num(x), fmt_num(y)));
        self.started = true;
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.data.push_str(&format!("L{},{}", fmt_num(x), fmt_num(y)));
        self.started = true;
    }

    fn bezier_to(&mut self, c1: (f64, f64), c2: (f64, f64), end: (f64, f64)) {
        self.data.push_str(&format!(
            "C{},{},{},{},{},{}",
            fmt_num(c1.0),
            fmt_num(c1.1),
            fmt_num(c2.0),
            fmt_num(c2.1),
            fmt_num(end.0),
            fmt_num(end.1)
        ));
        self.started = true;
    }

    fn close_path(&mut self) {
        if self.started {
            self.data.push('Z');
        }
    }
}

/// Curve state machine for one area
///
/// `line` tracks which edge of the area is being drawn: `Some(false)` for
/// the top edge, `Some(true)` for the baseline, `None` outside an area.
struct CurveWriter {
    curve: Curve,
    path: PathBuilder,
    line: Option<bool>,
    point: u8,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
}

impl CurveWriter {
    fn new(curve: Curve) -> Self {
        Self {
            curve,
            path: PathBuilder::default(),
            line: None,
            point: 0,
            x0: f64::NAN,
            x1: f64::NAN,
            y0: f64::NAN,
            y1: f64::NAN,
        }
    }

    fn area_start(&mut self) {
        self.line = Some(false);
    }

    fn area_end(&mut self) {
        self.line = None;
    }

    fn line_start(&mut self) {
        self.x0 = f64::NAN;
        self.x1 = f64::NAN;
        self.y0 = f64::NAN;
        self.y1 = f64::NAN;
        self.point = 0;
    }

    fn line_end(&mut self) {
        if self.curve == Curve::Basis {
            if self.point == 3 {
                self.basis_segment(self.x1, self.y1);
            }
            if self.point >= 2 {
                self.path.line_to(self.x1, self.y1);
            }
        }

        let close = match self.line {
            Some(on_baseline) => on_baseline,
            None => self.point == 1,
        };
        if close {
            self.path.close_path();
        }
        self.line = self.line.map(|b| !b);
    }

    fn start_or_continue(&mut self, x: f64, y: f64) {
        if self.line == Some(true) {
            self.path.line_to(x, y);
        } else {
            self.path.move_to(x, y);
        }
    }

    fn point(&mut self, x: f64, y: f64) {
        match self.curve {
            Curve::Linear => match self.point {
                0 => {
                    self.point = 1;
                    self.start_or_continue(x, y);
                }
                _ => {
                    self.point = 2;
                    self.path.line_to(x, y);
                }
            },
            Curve::Basis => match self.point {
                0 => {
                    self.point = 1;
                    self.start_or_continue(x, y);
                }
                1 => self.point = 2,
                2 => {
                    self.point = 3;
                    self.path.line_to(
                        (5.0 * self.x0 + self.x1) / 6.0,
                        (5.0 * self.y0 + self.y1) / 6.0,
                    );
                    self.basis_segment(x, y);
                }
                _ => self.basis_segment(x, y),
            },
        }

        self.x0 = self.x1;
        self.x1 = x;
        self.y0 = self.y1;
        self.y1 = y;
    }

    fn basis_segment(&mut self, x: f64, y: f64) {
        let (x0, x1, y0, y1) = (self.x0, self.x1, self.y0, self.y1);
        self.path.bezier_to(
            ((2.0 * x0 + x1) / 3.0, (2.0 * y0 + y1) / 3.0),
            ((x0 + 2.0 * x1) / 3.0, (y0 + 2.0 * y1) / 3.0),
            ((x0 + 4.0 * x1 + x) / 6.0, (y0 + 4.0 * y1 + y) / 6.0),
        );
    }
}

/// Closed area path through `(x, top)` forward and `(x, baseline)` backward
///
/// The three slices are parallel; extra entries in the longer slices are
/// ignored. No points yields an empty string.
pub fn area_path(curve: Curve, xs: &[f64], baselines: &[f64], tops: &[f64]) -> String {
    let n = xs.len().min(baselines.len()).min(tops.len());
    if n == 0 {
        return String::new();
    }

    let mut writer = CurveWriter::new(curve);
    writer.area_start();
    writer.line_start();
    for i in 0..n {
        writer.point(xs[i], tops[i]);
    }
    writer.line_end();

    writer.line_start();
    for i in (0..n).rev() {
        writer.point(xs[i], baselines[i]);
    }
    writer.line_end();
    writer.area_end();

    writer.path.data
}
