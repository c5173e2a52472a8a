//! Field filters applied to the candidate set.

use serde::{Deserialize, Serialize};

use crate::data::{DataValue, Document};

/// Predicate on a stored document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldFilter {
    /// The field equals `value`.
    Exact { field: String, value: DataValue },
    /// The field equals one of `values`.
    In {
        field: String,
        values: Vec<DataValue>,
    },
}

impl FieldFilter {
    pub fn exact(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        FieldFilter::Exact {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn any_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        FieldFilter::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            FieldFilter::Exact { field, .. } | FieldFilter::In { field, .. } => field,
        }
    }

    /// Whether `document` passes. A missing field never passes.
    pub fn matches(&self, document: &Document) -> bool {
        let Some(actual) = document.get(self.field()) else {
            return false;
        };
        match self {
            FieldFilter::Exact { value, .. } => actual.loosely_equals(value),
            FieldFilter::In { values, .. } => values.iter().any(|v| actual.loosely_equals(v)),
        }
    }
}

/// Whether `document` passes every filter.
pub fn matches_all(filters: &[FieldFilter], document: &Document) -> bool {
    filters.iter().all(|f| f.matches(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shoe() -> Document {
        Document::new()
            .add_string("category", "shoes")
            .add_integer("size", 42)
            .add_list("tags", ["sale", "new"])
    }

    #[test]
    fn test_exact() {
        assert!(FieldFilter::exact("category", "shoes").matches(&shoe()));
        assert!(!FieldFilter::exact("category", "boots").matches(&shoe()));
        assert!(FieldFilter::exact("size", 42.0).matches(&shoe()));
        assert!(FieldFilter::exact("tags", "sale").matches(&shoe()));
        assert!(!FieldFilter::exact("missing", "x").matches(&shoe()));
    }

    #[test]
    fn test_in() {
        assert!(FieldFilter::any_of("category", ["boots", "shoes"]).matches(&shoe()));
        assert!(!FieldFilter::any_of("category", ["boots"]).matches(&shoe()));
        assert!(!FieldFilter::any_of("category", Vec::<String>::new()).matches(&shoe()));
    }

    #[test]
    fn test_matches_all() {
        let filters = vec![
            FieldFilter::exact("category", "shoes"),
            FieldFilter::exact("size", 41),
        ];
        assert!(!matches_all(&filters, &shoe()));
        assert!(matches_all(&[], &shoe()));
    }
}
