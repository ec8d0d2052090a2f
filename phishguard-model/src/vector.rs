use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Name of the single categorical column in every feature vector.
pub const TLD_COLUMN: &str = "TLD";

/// One cell of a feature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    /// Numeric view of the value. Anything that is not a finite number
    /// (unparseable text, NaN, infinities) reads as 0.0.
    pub fn as_f64(&self) -> f64 {
        let value = match self {
            FeatureValue::Number(n) => *n,
            FeatureValue::Category(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        };
        if value.is_finite() { value } else { 0.0 }
    }

    /// Text view of the value, used for the categorical column.
    pub fn as_label(&self) -> String {
        match self {
            FeatureValue::Number(n) => n.to_string(),
            FeatureValue::Category(s) => s.clone(),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<usize> for FeatureValue {
    fn from(value: usize) -> Self {
        FeatureValue::Number(value as f64)
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Number(if value { 1.0 } else { 0.0 })
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Category(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Category(value.to_string())
    }
}

/// A single positional row: one value per schema column, in schema order.
///
/// Serializes as a JSON object whose keys keep the column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<FeatureValue>) {
        self.entries.push((column.into(), value.into()));
    }

    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Numeric value of a column; missing columns read as 0.0.
    pub fn number(&self, column: &str) -> f64 {
        self.get(column).map(FeatureValue::as_f64).unwrap_or(0.0)
    }

    /// Label of a categorical column, if the column holds one.
    pub fn label(&self, column: &str) -> Option<&str> {
        match self.get(column) {
            Some(FeatureValue::Category(label)) => Some(label.as_str()),
            _ => None,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
