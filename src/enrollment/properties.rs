//! Property definitions with defaults from streamgraph.json
//!
//! streamgraph.json is embedded at compile time and is the single source of
//! truth for property names, kinds, defaults and valid enumerated values.
//! User values (config file, command-line overrides) are layered on top by
//! [`PropertyReader`]; invalid user values fall back to the default with a
//! warning.

use super::error::{EnrollmentError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, warn};

/// streamgraph.json embedded at compile time
const PROPERTIES_JSON: &str = include_str!("../../streamgraph.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PropertyKind {
    #[serde(rename = "StringProperty")]
    String,
    #[serde(rename = "EnumeratedProperty")]
    Enumerated,
}

/// Property definition from streamgraph.json
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    #[serde(rename = "defaultValue", default)]
    pub default_value: String,
    #[serde(default)]
    pub description: String,
    /// For enumerated properties, the valid values
    #[serde(rename = "values")]
    pub valid_values: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PropertyFile {
    properties: Vec<PropertyDef>,
}

/// Registry of all properties with their defaults
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    properties: HashMap<String, PropertyDef>,
}

impl PropertyRegistry {
    /// Parse a property definition file
    pub fn from_json(json: &str) -> Result<Self> {
        let file: PropertyFile = serde_json::from_str(json)
            .map_err(|e| EnrollmentError::Config(format!("invalid property definitions: {}", e)))?;

        let properties = file
            .properties
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();

        Ok(Self { properties })
    }

    /// Get the default value for a property
    pub fn get_default(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.default_value.as_str())
    }

    /// Get the property definition
    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    /// Check if a value is valid for an enumerated property
    pub fn is_valid_enum_value(&self, name: &str, value: &str) -> bool {
        self.properties
            .get(name)
            .and_then(|p| p.valid_values.as_ref())
            .map(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value)))
            .unwrap_or(true) // Non-enumerated properties accept any value
    }

    /// All property names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.properties.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}

static REGISTRY: std::sync::OnceLock<PropertyRegistry> = std::sync::OnceLock::new();

/// Get the global property registry
pub fn registry() -> &'static PropertyRegistry {
    REGISTRY.get_or_init(|| {
        PropertyRegistry::from_json(PROPERTIES_JSON).unwrap_or_else(|e| {
            error!("failed to load streamgraph.json: {}", e);
            PropertyRegistry::default()
        })
    })
}

/// Typed property reader: user values first, registry defaults otherwise
#[derive(Debug, Clone, Default)]
pub struct PropertyReader {
    user_values: HashMap<String, String>,
}

impl PropertyReader {
    /// Reader with no user values (all defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from name/value pairs. Empty values count as "not set".
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut reader = Self::new();
        for (name, value) in pairs {
            reader.set(name, value);
        }
        reader
    }

    /// Build from a JSON object of property values (strings, numbers or bools)
    pub fn from_json(json: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| EnrollmentError::Config(format!("invalid config file: {}", e)))?;

        let mut reader = Self::new();
        for (name, value) in map {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    warn!("ignoring non-scalar value for property '{}': {}", name, other);
                    continue;
                }
            };
            reader.set(name, value);
        }
        Ok(reader)
    }

    /// Set (or override) one user value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        if registry().get_property(&name).is_none() {
            warn!("unknown property '{}' (known: {})", name, registry().names().join(", "));
        }

        if value.is_empty() {
            self.user_values.remove(&name);
        } else {
            debug!("property '{}' = '{}'", name, value);
            self.user_values.insert(name, value);
        }
    }

    /// Parse a `key=value` override
    pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
        let (name, value) = assignment.split_once('=').ok_or_else(|| {
            EnrollmentError::Config(format!("expected key=value, got '{}'", assignment))
        })?;
        self.set(name.trim(), value.trim());
        Ok(())
    }

    /// String property (user value or registry default)
    pub fn get_string(&self, name: &str) -> String {
        if let Some(value) = self.user_values.get(name) {
            return value.clone();
        }
        registry().get_default(name).unwrap_or("").to_string()
    }

    /// Enumerated property with validation, returned as the canonical
    /// spelling from streamgraph.json
    pub fn get_enum(&self, name: &str) -> String {
        let reg = registry();
        let default = reg.get_default(name).unwrap_or("");

        if let Some(value) = self.user_values.get(name) {
            let canonical = reg
                .get_property(name)
                .and_then(|p| p.valid_values.as_ref())
                .and_then(|values| values.iter().find(|v| v.eq_ignore_ascii_case(value)));

            match canonical {
                Some(v) => return v.clone(),
                None if reg.is_valid_enum_value(name, value) => return value.clone(),
                None => {
                    let valid_values = reg
                        .get_property(name)
                        .and_then(|p| p.valid_values.as_ref())
                        .map(|v| v.join(", "))
                        .unwrap_or_default();
                    warn!(
                        "invalid value '{}' for property '{}'. Valid values: [{}]. Using default: '{}'",
                        value, name, valid_values, default
                    );
                }
            }
        }

        default.to_string()
    }

    /// f64 property; unparsable user values fall back to the default
    pub fn get_f64(&self, name: &str) -> f64 {
        let default = registry()
            .get_default(name)
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        match self.user_values.get(name) {
            None => default,
            Some(value) => match value.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    warn!(
                        "invalid numeric value '{}' for property '{}'. Using default: {}",
                        value, name, default
                    );
                    default
                }
            },
        }
    }

    /// f64 property with range validation
    pub fn get_f64_in_range(&self, name: &str, min: f64, max: f64) -> f64 {
        let value = self.get_f64(name);
        if (min..=max).contains(&value) {
            return value;
        }

        let default = registry()
            .get_default(name)
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(min);
        warn!(
            "value {} for property '{}' out of range [{}, {}]. Using default: {}",
            value, name, min, max, default
        );
        default
    }

    /// Integer property in `[0, max]`; out-of-range values fall back to the default
    pub fn get_usize(&self, name: &str, max: usize) -> usize {
        let value = self.get_f64_in_range(name, 0.0, max as f64);
        value.round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads() {
        let reg = registry();
        assert!(reg.get_property("chart.width").is_some());
        assert!(reg.get_property("stack.offset").is_some());
        assert!(reg.get_property("palette").is_some());
        assert!(reg.get_property("nonexistent").is_none());
    }

    #[test]
    fn test_registry_defaults() {
        let reg = registry();
        assert_eq!(reg.get_default("chart.width"), Some("1000"));
        assert_eq!(reg.get_default("chart.height"), Some("400"));
        assert_eq!(reg.get_default("stack.offset"), Some("wiggle"));
        assert_eq!(reg.get_default("palette"), Some("Category10"));
        assert_eq!(reg.get_default("axis.x.label"), Some("Academic Term"));
        assert_eq!(reg.get_default("column.students"), Some("Student_Count"));
    }

    #[test]
    fn test_enum_validation() {
        let reg = registry();
        assert!(reg.is_valid_enum_value("curve", "basis"));
        assert!(reg.is_valid_enum_value("curve", "LINEAR"));
        assert!(!reg.is_valid_enum_value("curve", "cardinal"));
        assert!(reg.is_valid_enum_value("axis.x.label", "anything"));
    }

    #[test]
    fn test_reader_defaults() {
        let reader = PropertyReader::new();
        assert_eq!(reader.get_enum("stack.offset"), "wiggle");
        assert_eq!(reader.get_f64("chart.width"), 1000.0);
        assert_eq!(reader.get_usize("axis.y.ticks", 100), 5);
        assert_eq!(reader.get_string("legend.right"), "30%");
    }

    #[test]
    fn test_reader_user_values() {
        let reader = PropertyReader::from_pairs([
            ("chart.width", "1200"),
            ("palette", "tableau10"),
            ("axis.y.label", "Headcount"),
        ]);
        assert_eq!(reader.get_f64("chart.width"), 1200.0);
        assert_eq!(reader.get_enum("palette"), "Tableau10");
        assert_eq!(reader.get_string("axis.y.label"), "Headcount");
    }

    #[test]
    fn test_reader_invalid_values_fall_back() {
        let reader = PropertyReader::from_pairs([
            ("chart.width", "wide"),
            ("stack.offset", "expand"),
            ("axis.y.ticks", "-4"),
        ]);
        let huge = PropertyReader::from_pairs([("axis.y.ticks", "50000000")]);
        assert_eq!(huge.get_usize("axis.y.ticks", 100), 5);
        assert_eq!(reader.get_f64("chart.width"), 1000.0);
        assert_eq!(reader.get_enum("stack.offset"), "wiggle");
        assert_eq!(reader.get_usize("axis.y.ticks", 100), 5);
    }

    #[test]
    fn test_reader_from_json() {
        let reader =
            PropertyReader::from_json(r#"{"chart.height": 600, "curve": "linear", "x": [1]}"#)
                .unwrap();
        assert_eq!(reader.get_f64("chart.height"), 600.0);
        assert_eq!(reader.get_enum("curve"), "linear");

        assert!(PropertyReader::from_json("not json").is_err());
    }

    #[test]
    fn test_set_assignment() {
        let mut reader = PropertyReader::new();
        reader.set_assignment("margin.left = 80").unwrap();
        assert_eq!(reader.get_f64("margin.left"), 80.0);

        reader.set_assignment("margin.left=").unwrap();
        assert_eq!(reader.get_f64("margin.left"), 60.0);

        assert!(reader.set_assignment("no-equals-sign").is_err());
    }
}
