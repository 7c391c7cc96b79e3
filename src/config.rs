//! Streamgraph configuration from properties
//!
//! Every value comes from a [`PropertyReader`]: user overrides first, then
//! the defaults declared in streamgraph.json. Invalid values log a warning
//! and fall back to the declared default, so building a config never fails.

use crate::chart::{ChartConfig, Curve, Margins, OutputFormat, StackOffset};
use crate::enrollment::{ColumnConfig, PropertyReader};
use tracing::warn;

/// Largest accepted canvas dimension or margin
const MAX_EXTENT: f64 = 100_000.0;

/// Largest accepted y-axis tick count
const MAX_Y_TICKS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct StreamgraphConfig {
    pub columns: ColumnConfig,
    pub chart: ChartConfig,
    pub output_format: OutputFormat,
}

impl Default for StreamgraphConfig {
    fn default() -> Self {
        Self::from_properties(&PropertyReader::new())
    }
}

impl StreamgraphConfig {
    /// Build the typed config from property values
    pub fn from_properties(props: &PropertyReader) -> Self {
        let columns = ColumnConfig {
            term: props.get_string("column.term"),
            department: props.get_string("column.department"),
            students: props.get_string("column.students"),
            default_department: props.get_string("department.default"),
        };

        let margins = Margins {
            top: props.get_f64_in_range("margin.top", 0.0, MAX_EXTENT),
            right: props.get_f64_in_range("margin.right", 0.0, MAX_EXTENT),
            bottom: props.get_f64_in_range("margin.bottom", 0.0, MAX_EXTENT),
            left: props.get_f64_in_range("margin.left", 0.0, MAX_EXTENT),
        };

        // Enum values are validated by the reader, so these parses only fail
        // if streamgraph.json and the enums disagree
        let offset = parse_or_default::<StackOffset>(&props.get_enum("stack.offset"));
        let curve = parse_or_default::<Curve>(&props.get_enum("curve"));
        let output_format = parse_or_default::<OutputFormat>(&props.get_enum("output.format"));

        let chart = ChartConfig {
            width: props.get_f64_in_range("chart.width", 1.0, MAX_EXTENT),
            height: props.get_f64_in_range("chart.height", 1.0, MAX_EXTENT),
            margins,
            legend_offset: props.get_f64_in_range("legend.offset", 0.0, MAX_EXTENT),
            palette: props.get_enum("palette"),
            offset,
            curve,
            x_label: props.get_string("axis.x.label"),
            y_label: props.get_string("axis.y.label"),
            x_tick_rotation: props.get_f64_in_range("axis.x.tick.rotation", -360.0, 360.0),
            y_ticks: props.get_usize("axis.y.ticks", MAX_Y_TICKS),
            legend_right: props.get_string("legend.right"),
            legend_top: props.get_string("legend.top"),
        };

        Self {
            columns,
            chart,
            output_format,
        }
    }
}

fn parse_or_default<T>(value: &str) -> T
where
    T: std::str::FromStr<Err = String> + Default,
{
    value.parse().unwrap_or_else(|e: String| {
        warn!("{}, using default", e);
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_chart_defaults() {
        let config = StreamgraphConfig::default();
        assert_eq!(config.chart, ChartConfig::default());
        assert_eq!(config.columns, ColumnConfig::default());
        assert_eq!(config.output_format, OutputFormat::Svg);
    }

    #[test]
    fn test_overrides() {
        let props = PropertyReader::from_pairs([
            ("chart.width", "1200"),
            ("stack.offset", "Silhouette"),
            ("curve", "linear"),
            ("palette", "dark2"),
            ("output.format", "html"),
            ("column.students", "Headcount"),
            ("axis.y.ticks", "8"),
        ]);
        let config = StreamgraphConfig::from_properties(&props);

        assert_eq!(config.chart.width, 1200.0);
        assert_eq!(config.chart.offset, StackOffset::Silhouette);
        assert_eq!(config.chart.curve, Curve::Linear);
        assert_eq!(config.chart.palette, "Dark2");
        assert_eq!(config.chart.y_ticks, 8);
        assert_eq!(config.output_format, OutputFormat::Html);
        assert_eq!(config.columns.students, "Headcount");
        assert_eq!(config.columns.term, "Term");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let props = PropertyReader::from_pairs([
            ("chart.height", "tall"),
            ("margin.left", "-5"),
            ("stack.offset", "expand"),
            ("output.format", "pdf"),
        ]);
        let config = StreamgraphConfig::from_properties(&props);

        assert_eq!(config.chart.height, 400.0);
        assert_eq!(config.chart.margins.left, 60.0);
        assert_eq!(config.chart.offset, StackOffset::Wiggle);
        assert_eq!(config.output_format, OutputFormat::Svg);
    }

    #[test]
    fn test_tick_count_is_bounded() {
        let huge = PropertyReader::from_pairs([("axis.y.ticks", "50000000")]);
        assert_eq!(StreamgraphConfig::from_properties(&huge).chart.y_ticks, 5);

        let max = PropertyReader::from_pairs([("axis.y.ticks", "100")]);
        assert_eq!(StreamgraphConfig::from_properties(&max).chart.y_ticks, 100);
    }

    #[test]
    fn test_from_json_config() {
        let props = PropertyReader::from_json(
            r#"{"legend.right": "5%", "margin.right": 200, "department.default": "Other"}"#,
        )
        .unwrap();
        let config = StreamgraphConfig::from_properties(&props);

        assert_eq!(config.chart.legend_right, "5%");
        assert_eq!(config.chart.margins.right, 200.0);
        assert_eq!(config.columns.default_department, "Other");
    }
}
