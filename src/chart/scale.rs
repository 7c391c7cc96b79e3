//! Scales: discrete point scale for terms, linear scale for counts, ordinal
//! color scale for departments
//!
//! Tick generation and tick formatting follow the usual "nice step" rules
//! (steps of 1, 2, 5 × 10^k), so axes read the same as in common web charting
//! libraries.

use crate::enrollment::palettes::{to_hex, PaletteDefinition};
use indexmap::IndexMap;

/// Round half up (towards +∞), as browsers round
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Evenly spaced positions for an ordered set of categories
///
/// No outer padding; a single category is centred in the range.
#[derive(Debug, Clone, PartialEq)]
pub struct PointScale {
    domain: Vec<String>,
    range: (f64, f64),
    start: f64,
    step: f64,
}

impl PointScale {
    pub fn new(domain: Vec<String>, range: (f64, f64)) -> Self {
        let n = domain.len();
        let (r0, r1) = range;
        let span = r1 - r0;

        let (start, step) = if n == 0 {
            (r0, span)
        } else {
            let step = span / (n.saturating_sub(1).max(1)) as f64;
            let start = r0 + (span - step * (n - 1) as f64) * 0.5;
            (start, step)
        };

        Self {
            domain,
            range,
            start,
            step,
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Distance between adjacent categories
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Position of the i-th category
    pub fn position_at(&self, index: usize) -> Option<f64> {
        if index < self.domain.len() {
            Some(self.start + self.step * index as f64)
        } else {
            None
        }
    }

    /// Position of a category by name
    pub fn position(&self, term: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|t| t == term)
            .and_then(|i| self.position_at(i))
    }

    /// All positions in domain order
    pub fn positions(&self) -> Vec<f64> {
        (0..self.domain.len())
            .filter_map(|i| self.position_at(i))
            .collect()
    }

    /// Index of the category closest to a pixel position
    ///
    /// Positions before the first or after the last category clamp to the
    /// nearest end. Returns `None` only for an empty domain.
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        let n = self.domain.len();
        if n == 0 {
            return None;
        }
        if self.step == 0.0 || !x.is_finite() {
            return Some(0);
        }

        let raw = round_half_up((x - self.start) / self.step);
        Some(raw.clamp(0.0, (n - 1) as f64) as usize)
    }
}

/// Continuous linear mapping from a numeric domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a value; a collapsed domain maps everything to the range midpoint
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;

        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Roughly `count` nicely rounded ticks inside the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count as f64)
    }

    /// Format a tick value with the precision implied by the tick step
    pub fn tick_format(&self, count: usize, value: f64) -> String {
        let step = tick_step(self.domain.0, self.domain.1, count as f64);
        let precision = if step == 0.0 || !step.is_finite() {
            0
        } else {
            (-step.abs().log10().floor()).max(0.0) as usize
        };
        format_grouped(value, precision)
    }
}

/// (i1, i2, inc) where ticks are i * inc (or i / -inc when inc < 0)
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = round_half_up(start * inv);
        i2 = round_half_up(stop * inv);
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = round_half_up(start / inc);
        i2 = round_half_up(stop / inc);
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Nicely rounded tick values between `start` and `stop`
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !(count > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect();

    if stop < start {
        out.reverse();
    }
    out
}

/// Distance between adjacent ticks
pub fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    if !(count > 0.0) || start == stop || !start.is_finite() || !stop.is_finite() {
        return 0.0;
    }
    let reverse = stop < start;
    let (_, _, inc) = if reverse {
        tick_spec(stop, start, count)
    } else {
        tick_spec(start, stop, count)
    };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse {
        -step
    } else {
        step
    }
}

/// Fixed-precision number with thousands separators and a typographic minus
pub fn format_grouped(value: f64, precision: usize) -> String {
    let formatted = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted.clone(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    let mut out = String::new();
    if value < 0.0 && !is_zero {
        out.push('\u{2212}');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Department → color, by position in the domain
#[derive(Debug, Clone)]
pub struct OrdinalColorScale {
    index: IndexMap<String, usize>,
    colors: Vec<[u8; 3]>,
}

impl OrdinalColorScale {
    pub fn new(domain: &[String], palette: &PaletteDefinition) -> Self {
        let index = domain
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), i))
            .collect();
        let colors = (0..palette.len()).map(|i| palette.get_color(i)).collect();
        Self { index, colors }
    }

    /// Color for a key; keys outside the domain take the next unassigned slot
    pub fn color(&self, key: &str) -> [u8; 3] {
        if self.colors.is_empty() {
            return [128, 128, 128];
        }
        let i = self.index.get(key).copied().unwrap_or(self.index.len());
        self.colors[i % self.colors.len()]
    }

    pub fn hex(&self, key: &str) -> String {
        to_hex(self.color(key))
    }
}
