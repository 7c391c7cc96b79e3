//! Layer stacking with baseline offsets
//!
//! Every department becomes one layer; each layer holds a (baseline, top)
//! pair per term. Layers start as `[0, value]`, the offset moves the first
//! layer's baseline, and the remaining layers are stacked on top in
//! department order. The offset never changes `top - baseline`, so each
//! term's layer thicknesses always add up to that term's total.

use crate::enrollment::PivotedRow;
use std::fmt;
use std::str::FromStr;

/// How the stack's baseline is positioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOffset {
    /// Minimise the weighted change in layer slope between adjacent terms
    #[default]
    Wiggle,
    /// Centre the stack around zero
    Silhouette,
    /// Flat zero baseline
    Zero,
}

impl FromStr for StackOffset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wiggle" => Ok(Self::Wiggle),
            "silhouette" => Ok(Self::Silhouette),
            "zero" | "none" => Ok(Self::Zero),
            other => Err(format!("unknown stack offset '{}'", other)),
        }
    }
}

impl fmt::Display for StackOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wiggle => "wiggle",
            Self::Silhouette => "silhouette",
            Self::Zero => "zero",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackPoint {
    pub baseline: f64,
    pub top: f64,
}

impl StackPoint {
    /// Layer thickness at this point
    pub fn value(&self) -> f64 {
        self.top - self.baseline
    }
}

/// One department's band, one point per term (in row order)
#[derive(Debug, Clone, PartialEq)]
pub struct StackedLayer {
    pub key: String,
    pub index: usize,
    pub points: Vec<StackPoint>,
}

impl StackedLayer {
    pub fn min_baseline(&self) -> Option<f64> {
        self.points.iter().map(|p| p.baseline).reduce(f64::min)
    }

    pub fn max_top(&self) -> Option<f64> {
        self.points.iter().map(|p| p.top).reduce(f64::max)
    }
}

/// Stack rows into one layer per key, then apply the offset
///
/// No rows means no layers.
pub fn stack_layers(rows: &[PivotedRow], keys: &[String], offset: StackOffset) -> Vec<StackedLayer> {
    if rows.is_empty() {
        return Vec::new();
    }

    let mut series: Vec<Vec<[f64; 2]>> = keys
        .iter()
        .map(|key| rows.iter().map(|row| [0.0, row.value(key)]).collect())
        .collect();

    match offset {
        StackOffset::Wiggle => offset_wiggle(&mut series),
        StackOffset::Silhouette => offset_silhouette(&mut series),
        StackOffset::Zero => offset_none(&mut series),
    }

    series
        .into_iter()
        .zip(keys)
        .enumerate()
        .map(|(index, (points, key))| StackedLayer {
            key: key.clone(),
            index,
            points: points
                .into_iter()
                .map(|[baseline, top]| StackPoint { baseline, top })
                .collect(),
        })
        .collect()
}

/// NaN-safe read of a raw layer value
fn raw(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Stack each layer on the previous layer's top
fn offset_none(series: &mut [Vec<[f64; 2]>]) {
    for i in 1..series.len() {
        let (done, rest) = series.split_at_mut(i);
        let below = &done[i - 1];
        for (j, point) in rest[0].iter_mut().enumerate() {
            let base = if below[j][1].is_nan() {
                below[j][0]
            } else {
                below[j][1]
            };
            point[0] = base;
            point[1] += base;
        }
    }
}

fn offset_silhouette(series: &mut [Vec<[f64; 2]>]) {
    let Some(m) = series.first().map(|s| s.len()) else {
        return;
    };
    for j in 0..m {
        let total: f64 = series.iter().map(|s| raw(s[j][1])).sum();
        let y = -total / 2.0;
        series[0][j][0] = y;
        series[0][j][1] += y;
    }
    offset_none(series);
}

/// Streamgraph offset: for each step between adjacent terms, shift the
/// baseline by the weighted mean slope of the layers' centres so the
/// layers move as little as possible.
fn offset_wiggle(series: &mut [Vec<[f64; 2]>]) {
    let n = series.len();
    let Some(m) = series.first().map(|s| s.len()) else {
        return;
    };
    if m == 0 {
        return;
    }

    let mut y = 0.0;
    for j in 1..m {
        let mut s1 = 0.0;
        let mut s2 = 0.0;
        for i in 0..n {
            let sij0 = raw(series[i][j][1]);
            let sij1 = raw(series[i][j - 1][1]);
            let mut s3 = (sij0 - sij1) / 2.0;
            for below in series.iter().take(i) {
                s3 += raw(below[j][1]) - raw(below[j - 1][1]);
            }
            s1 += sij0;
            s2 += s3 * sij0;
        }
        series[0][j - 1][0] = y;
        series[0][j - 1][1] += y;
        if s1 != 0.0 {
            y -= s2 / s1;
        }
    }
    series[0][m - 1][0] = y;
    series[0][m - 1][1] += y;

    offset_none(series);
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn row(term: &str, values: &[(&str, f64)]) -> PivotedRow {
        PivotedRow {
            term: term.to_string(),
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<IndexMap<_, _>>(),
        }
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample_rows() -> Vec<PivotedRow> {
        vec![
            row("F22", &[("CS", 10.0), ("Math", 5.0), ("EE", 2.0)]),
            row("F23", &[("CS", 14.0), ("Math", 3.0), ("EE", 6.0)]),
            row("S24", &[("CS", 8.0), ("Math", 0.0), ("EE", 9.0)]),
            row("F24", &[("CS", 20.0), ("Math", 7.0), ("EE", 1.0)]),
        ]
    }

    #[test]
    fn test_offset_from_str() {
        assert_eq!("wiggle".parse::<StackOffset>().unwrap(), StackOffset::Wiggle);
        assert_eq!("Silhouette".parse::<StackOffset>().unwrap(), StackOffset::Silhouette);
        assert_eq!("none".parse::<StackOffset>().unwrap(), StackOffset::Zero);
        assert!("expand".parse::<StackOffset>().is_err());
        assert_eq!(StackOffset::Wiggle.to_string(), "wiggle");
    }

    #[test]
    fn test_zero_offset_stacks_from_zero() {
        let rows = vec![row("F23", &[("CS", 10.0), ("Math", 5.0)])];
        let layers = stack_layers(&rows, &keys(&["CS", "Math"]), StackOffset::Zero);

        assert_eq!(layers[0].points[0], StackPoint { baseline: 0.0, top: 10.0 });
        assert_eq!(layers[1].points[0], StackPoint { baseline: 10.0, top: 15.0 });
    }

    #[test]
    fn test_wiggle_two_terms() {
        let rows = vec![
            row("F23", &[("CS", 10.0), ("Math", 5.0)]),
            row("S24", &[("CS", 8.0), ("Math", 0.0)]),
        ];
        let layers = stack_layers(&rows, &keys(&["CS", "Math"]), StackOffset::Wiggle);

        // j=1: CS s3 = -1, Math s3 = -2.5 + -2 = -4.5 → s1 = 8, s2 = -8 → y = 1
        assert_eq!(layers[0].points[0], StackPoint { baseline: 0.0, top: 10.0 });
        assert_eq!(layers[0].points[1], StackPoint { baseline: 1.0, top: 9.0 });
        assert_eq!(layers[1].points[0], StackPoint { baseline: 10.0, top: 15.0 });
        assert_eq!(layers[1].points[1], StackPoint { baseline: 9.0, top: 9.0 });
    }

    #[test]
    fn test_layer_thickness_matches_totals() {
        let rows = sample_rows();
        let departments = keys(&["CS", "Math", "EE"]);

        for offset in [StackOffset::Wiggle, StackOffset::Silhouette, StackOffset::Zero] {
            let layers = stack_layers(&rows, &departments, offset);
            assert_eq!(layers.len(), 3);

            for (j, row) in rows.iter().enumerate() {
                let stacked: f64 = layers.iter().map(|l| l.points[j].value()).sum();
                let total: f64 = row.values.values().sum();
                assert!((stacked - total).abs() < 1e-9, "{} term {}", offset, j);

                // Layers are contiguous: each baseline is the previous top
                for pair in layers.windows(2) {
                    assert!((pair[1].points[j].baseline - pair[0].points[j].top).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_wiggle_can_go_negative() {
        let rows = vec![
            row("A", &[("X", 1.0), ("Y", 1.0)]),
            row("B", &[("X", 30.0), ("Y", 30.0)]),
        ];
        let layers = stack_layers(&rows, &keys(&["X", "Y"]), StackOffset::Wiggle);
        assert!(layers[0].min_baseline().unwrap() < 0.0);
    }

    #[test]
    fn test_silhouette_is_centred() {
        let layers = stack_layers(&sample_rows(), &keys(&["CS", "Math", "EE"]), StackOffset::Silhouette);
        for j in 0..4 {
            let bottom = layers[0].points[j].baseline;
            let top = layers[2].points[j].top;
            assert!((bottom + top).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_rows_produce_no_layers() {
        assert!(stack_layers(&[], &keys(&["CS"]), StackOffset::Wiggle).is_empty());
        assert!(stack_layers(&[], &[], StackOffset::Wiggle).is_empty());
    }

    #[test]
    fn test_no_keys_produce_no_layers() {
        let rows = vec![row("F23", &[])];
        assert!(stack_layers(&rows, &[], StackOffset::Wiggle).is_empty());
    }
}
