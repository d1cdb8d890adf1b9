//! Typed attribute values returned by the rule engine.
//!
//! Evaluating rule attributes yields a map from fully qualified attribute
//! name to a value whose type depends on the rule. [`AttributeValue`] makes
//! that type explicit so every consumer matches on it exhaustively.

use rustc_hash::FxHashMap;

/// A single rule attribute value.
///
/// String arrays keep `None` entries to mirror null elements reported by the
/// engine; consumers skip them.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Float(f64),
    Bool(bool),
    StringArray(Vec<Option<String>>),
    FloatArray(Vec<f64>),
    BoolArray(Vec<bool>),
}

impl AttributeValue {
    /// Short type tag used in log output.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::String(_) => "string",
            AttributeValue::Float(_) => "float",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::StringArray(_) => "string[]",
            AttributeValue::FloatArray(_) => "float[]",
            AttributeValue::BoolArray(_) => "bool[]",
        }
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            AttributeValue::StringArray(_) | AttributeValue::FloatArray(_) | AttributeValue::BoolArray(_)
        )
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(v: Vec<f64>) -> Self {
        AttributeValue::FloatArray(v)
    }
}

impl From<Vec<bool>> for AttributeValue {
    fn from(v: Vec<bool>) -> Self {
        AttributeValue::BoolArray(v)
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(v: Vec<&str>) -> Self {
        AttributeValue::StringArray(v.into_iter().map(|s| Some(s.to_string())).collect())
    }
}

/// Attribute values keyed by fully qualified rule attribute name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    values: FxHashMap<String, AttributeValue>,
}

impl AttributeMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.values.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = AttributeMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}
