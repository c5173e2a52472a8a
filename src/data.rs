use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The value type for fields in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),

    /// String content typically used for keywords, IDs, or categories.
    String(String),

    /// Text content to be full-text indexed.
    Text(String),

    /// List of values (e.g. tags).
    List(Vec<String>),

    /// Date and time in UTC.
    DateTime(chrono::DateTime<chrono::Utc>),
}

impl DataValue {
    /// Returns the text value if this is a Text or String variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) | DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view used by range and histogram facets and by sorting.
    ///
    /// Integers and floats are returned as-is, datetimes as a unix timestamp
    /// in seconds, and strings only when they parse as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DataValue::Int64(i) => Some(*i as f64),
            DataValue::Float64(f) if f.is_finite() => Some(*f),
            DataValue::DateTime(dt) => Some(dt.timestamp() as f64),
            DataValue::Text(s) | DataValue::String(s) => {
                s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
            }
            _ => None,
        }
    }

    /// Returns the textual pieces that the analyzers consume for this value.
    pub fn analyzable_parts(&self) -> Vec<String> {
        match self {
            DataValue::Null => Vec::new(),
            DataValue::Bool(b) => vec![b.to_string()],
            DataValue::Int64(i) => vec![i.to_string()],
            DataValue::Float64(f) => vec![f.to_string()],
            DataValue::Text(s) | DataValue::String(s) => vec![s.clone()],
            DataValue::List(items) => items.clone(),
            DataValue::DateTime(dt) => vec![dt.to_rfc3339()],
        }
    }

    /// Key used to bucket this value in a terms facet.
    ///
    /// Only scalar values have a key; lists and nulls are not bucketed.
    pub fn facet_key(&self) -> Option<String> {
        match self {
            DataValue::Null | DataValue::List(_) => None,
            DataValue::Bool(b) => Some(b.to_string()),
            DataValue::Int64(i) => Some(i.to_string()),
            DataValue::Float64(f) => Some(f.to_string()),
            DataValue::Text(s) | DataValue::String(s) => Some(s.clone()),
            DataValue::DateTime(dt) => Some(dt.to_rfc3339()),
        }
    }

    /// Loose equality used by field filters.
    ///
    /// `Text` and `String` compare equal when their contents match, numbers
    /// compare by value regardless of integer/float representation, and a
    /// list matches when any of its elements equals the expected string.
    pub fn loosely_equals(&self, expected: &DataValue) -> bool {
        match (self, expected) {
            (DataValue::List(items), other) => match other.as_text() {
                Some(text) => items.iter().any(|item| item == text),
                None => false,
            },
            (DataValue::Int64(_) | DataValue::Float64(_), DataValue::Int64(_) | DataValue::Float64(_)) => {
                match (self.as_number(), expected.as_number()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (a, b) => match (a.as_text(), b.as_text()) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
        }
    }
}

// --- Conversions ---

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::Text(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::Text(v.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Int64(v)
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        DataValue::Int64(v as i64)
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Float64(v)
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        DataValue::Bool(v)
    }
}

impl From<Vec<String>> for DataValue {
    fn from(v: Vec<String>) -> Self {
        DataValue::List(v)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for DataValue {
    fn from(dt: chrono::DateTime<chrono::Utc>) -> Self {
        DataValue::DateTime(dt)
    }
}

/// Identity of a document: its type plus its id within that type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocKey {
    pub doc_type: String,
    pub id: String,
}

impl DocKey {
    pub fn new(doc_type: impl Into<String>, id: impl Into<String>) -> Self {
        DocKey {
            doc_type: doc_type.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for DocKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.doc_type, self.id)
    }
}

fn default_boost() -> f32 {
    1.0
}

/// A document: a collection of named fields plus a relevance boost.
///
/// The identity of a document, `(type, id)`, is not part of the document
/// itself; it is supplied when the document is indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Field data.
    pub fields: HashMap<String, DataValue>,

    /// Multiplier applied to every score of this document.
    #[serde(default = "default_boost")]
    pub boost: f32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document with a boost of 1.0.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
            boost: default_boost(),
        }
    }

    /// Set the document boost.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Add a field to the document.
    pub fn add_field(mut self, name: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Add a text field.
    pub fn add_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.fields.insert(name.into(), DataValue::Text(text.into()));
        self
    }

    /// Add a keyword-like string field.
    pub fn add_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .insert(name.into(), DataValue::String(value.into()));
        self
    }

    /// Add an integer field.
    pub fn add_integer(mut self, name: impl Into<String>, value: i64) -> Self {
        self.fields.insert(name.into(), DataValue::Int64(value));
        self
    }

    /// Add a float field.
    pub fn add_float(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.insert(name.into(), DataValue::Float64(value));
        self
    }

    /// Add a boolean field.
    pub fn add_boolean(mut self, name: impl Into<String>, value: bool) -> Self {
        self.fields.insert(name.into(), DataValue::Bool(value));
        self
    }

    /// Add a list field.
    pub fn add_list<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.fields.insert(name.into(), DataValue::List(values));
        self
    }

    /// Add a datetime field.
    pub fn add_datetime(
        mut self,
        name: impl Into<String>,
        value: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        self.fields.insert(name.into(), DataValue::DateTime(value));
        self
    }

    /// Get a reference to a field's value.
    pub fn get(&self, name: &str) -> Option<&DataValue> {
        self.fields.get(name)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Lowercased concatenation of every textual field value.
    ///
    /// This is the "raw content" phrase clauses are matched against. Runs of
    /// whitespace inside a value collapse to one space, the same way phrases
    /// are normalized. Field names are visited in sorted order so the result
    /// is deterministic.
    pub fn raw_content(&self) -> String {
        let mut names: Vec<&String> = self.fields.keys().collect();
        names.sort();

        let mut parts = Vec::new();
        for name in names {
            for part in self.fields[name].analyzable_parts() {
                let words: Vec<&str> = part.split_whitespace().collect();
                parts.push(words.join(" ").to_lowercase());
            }
        }
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let doc = Document::new()
            .add_text("title", "Red Shoes")
            .add_string("category", "shoes")
            .add_integer("price", 50)
            .with_boost(2.0);

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.boost, 2.0);
        assert_eq!(doc.get("title").and_then(|v| v.as_text()), Some("Red Shoes"));
        assert!(doc.has_field("price"));
        assert!(!doc.has_field("missing"));
    }

    #[test]
    fn test_boost_defaults_on_deserialize() {
        let doc: Document = serde_json::from_str(r#"{"fields":{}}"#).unwrap();
        assert_eq!(doc.boost, 1.0);
    }

    #[test]
    fn test_doc_key_ordering_and_display() {
        let a = DocKey::new("product", "1");
        let b = DocKey::new("product", "2");
        let c = DocKey::new("article", "9");
        assert!(a < b);
        assert!(c < a);
        assert_eq!(a.to_string(), "product/1");
    }

    #[test]
    fn test_as_number() {
        assert_eq!(DataValue::Int64(3).as_number(), Some(3.0));
        assert_eq!(DataValue::String("2.5".into()).as_number(), Some(2.5));
        assert_eq!(DataValue::Text("abc".into()).as_number(), None);
        assert_eq!(DataValue::Float64(f64::NAN).as_number(), None);
        assert_eq!(DataValue::Null.as_number(), None);
    }

    #[test]
    fn test_loosely_equals() {
        let text = DataValue::Text("shoes".into());
        assert!(text.loosely_equals(&DataValue::String("shoes".into())));
        assert!(!text.loosely_equals(&DataValue::String("Shoes".into())));
        assert!(DataValue::Int64(5).loosely_equals(&DataValue::Float64(5.0)));
        assert!(
            DataValue::List(vec!["a".into(), "b".into()])
                .loosely_equals(&DataValue::String("b".into()))
        );
        assert!(DataValue::Bool(true).loosely_equals(&DataValue::Bool(true)));
    }

    #[test]
    fn test_raw_content_is_lowercased_and_sorted() {
        let doc = Document::new()
            .add_text("title", "Red Shoes")
            .add_list("tags", ["Sale", "New"]);
        assert_eq!(doc.raw_content(), "red shoes\nsale\nnew");
    }

    #[test]
    fn test_raw_content_collapses_whitespace() {
        let doc = Document::new()
            .add_text("title", "  Red \t Shoes\n")
            .add_text("body", "Soft\n\nleather");
        assert_eq!(doc.raw_content(), "soft leather\nred shoes");
    }

    #[test]
    fn test_facet_key_skips_lists() {
        assert_eq!(DataValue::List(vec!["x".into()]).facet_key(), None);
        assert_eq!(DataValue::Int64(7).facet_key(), Some("7".to_string()));
    }
}
