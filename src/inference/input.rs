//! Named client fields -> positional feature row

use std::collections::HashMap;

use serde_json::Value;

use super::error::ClassifyError;

/// Value for a missing feature
pub const MISSING_FEATURE_DEFAULT: f64 = 0.0;

/// One submitted field, before parsing
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    /// JSON value that is neither a number nor a string
    Unsupported(String),
}

impl RawValue {
    fn parse(&self, field: &str) -> Result<f64, ClassifyError> {
        let invalid = |value: String| ClassifyError::InvalidInput {
            field: field.to_string(),
            value,
        };

        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(text) => text.trim().parse::<f64>().map_err(|_| invalid(text.clone()))?,
            RawValue::Unsupported(repr) => return Err(invalid(repr.clone())),
        };

        if !value.is_finite() {
            return Err(invalid(self.to_string()));
        }
        Ok(value)
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Text(text) => f.write_str(text),
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Unsupported(repr) => f.write_str(repr),
        }
    }
}

/// Submitted fields keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInputs(HashMap<String, RawValue>);

impl RawInputs {
    /// From form pairs; the first occurrence of a repeated key wins
    pub fn from_form<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut fields = HashMap::new();
        for (name, value) in pairs {
            fields.entry(name).or_insert(RawValue::Text(value));
        }
        Self(fields)
    }

    /// From a JSON object of numbers or numeric strings
    pub fn from_json(object: serde_json::Map<String, Value>) -> Self {
        let fields = object
            .into_iter()
            .map(|(name, value)| {
                let raw = match value {
                    Value::String(text) => RawValue::Text(text),
                    Value::Number(n) => match n.as_f64() {
                        Some(n) => RawValue::Number(n),
                        None => RawValue::Unsupported(n.to_string()),
                    },
                    other => RawValue::Unsupported(other.to_string()),
                };
                (name, raw)
            })
            .collect();
        Self(fields)
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.0.get(name)
    }
}

impl FromIterator<(String, RawValue)> for RawInputs {
    fn from_iter<T: IntoIterator<Item = (String, RawValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Values in `features` order, substituting the default for missing names.
/// Fields not named in `features` are ignored.
pub fn ordered_values(features: &[String], raw: &RawInputs) -> Result<Vec<f64>, ClassifyError> {
    features
        .iter()
        .map(|name| match raw.get(name) {
            Some(value) => value.parse(name),
            None => Ok(MISSING_FEATURE_DEFAULT),
        })
        .collect()
}
