use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value stored for one field in [`FormData`].
///
/// The shape follows the field type: text for `input`, `textarea` and
/// `select`, a flag for `checkbox` and a tag list for `tags`. Keys the host
/// keeps alongside the form fields land in [`FieldValue::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Tags(Vec<String>),
    Other(Value),
}

impl FieldValue {
    /// True when the value does not satisfy a `required` field: empty text,
    /// `false`, `null`, zero, or an empty list.
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Flag(flag) => !flag,
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Tags(tags) => tags.is_empty(),
            FieldValue::Other(value) => match value {
                Value::Null => true,
                Value::Bool(flag) => !flag,
                Value::String(text) => text.is_empty(),
                Value::Number(number) => number.as_f64().is_none_or(|n| n == 0.0 || n.is_nan()),
                Value::Array(items) => items.is_empty(),
                Value::Object(_) => false,
            },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Other(Value::String(text)) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            FieldValue::Other(Value::Bool(flag)) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_tags(&self) -> Option<&[String]> {
        match self {
            FieldValue::Tags(tags) => Some(tags),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::Tags(value)
    }
}

/// Field name to value mapping owned by the host session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, FieldValue>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.0.iter()
    }

    /// Shallow merge: every key of `patch` overwrites the stored value, all
    /// other keys are left alone.
    pub fn merge(&mut self, patch: FormPatch) {
        self.0.extend(patch.0);
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Partial update proposed by the engine and applied by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormPatch(BTreeMap<String, FieldValue>);

impl FormPatch {
    /// Patch carrying exactly one field.
    pub fn single(name: impl Into<String>, value: FieldValue) -> Self {
        let mut map = BTreeMap::new();
        map.insert(name.into(), value);
        Self(map)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_deserialize_by_shape() {
        let data: FormData = serde_json::from_value(json!({
            "name": "Acme",
            "agree": true,
            "stack": ["rust", "wasm"],
            "count": 3,
            "taskType": "new-project"
        }))
        .expect("deserialize");

        assert_eq!(data.get("name"), Some(&FieldValue::Text("Acme".into())));
        assert_eq!(data.get("agree"), Some(&FieldValue::Flag(true)));
        assert_eq!(
            data.get("stack").and_then(FieldValue::as_tags),
            Some(&["rust".to_string(), "wasm".to_string()][..])
        );
        assert_eq!(data.get("count"), Some(&FieldValue::Other(json!(3))));
    }

    #[test]
    fn falsy_values_are_missing() {
        assert!(FieldValue::Text(String::new()).is_missing());
        assert!(FieldValue::Flag(false).is_missing());
        assert!(FieldValue::Tags(Vec::new()).is_missing());
        assert!(FieldValue::Other(Value::Null).is_missing());
        assert!(FieldValue::Other(json!(0)).is_missing());
        assert!(!FieldValue::Other(json!({})).is_missing());
        assert!(!FieldValue::Text(" ".into()).is_missing());
        assert!(!FieldValue::Tags(vec!["a".into()]).is_missing());
    }

    #[test]
    fn merge_only_touches_patched_keys() {
        let mut data: FormData = [("a", "1"), ("b", "2")].into_iter().collect();
        data.merge(FormPatch::single("b", "3".into()));

        assert_eq!(data.get("a").and_then(FieldValue::as_text), Some("1"));
        assert_eq!(data.get("b").and_then(FieldValue::as_text), Some("3"));
        assert_eq!(data.len(), 2);
    }
}
