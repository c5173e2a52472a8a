//! Caller-supplied sort clauses and their validation.
//!
//! Sort requests arrive as free-form `(field, direction)` strings. Only
//! fields on the allow-list and the directions `asc` / `desc` survive
//! [`validate`]; everything else is dropped without an error.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::data::{DataValue, DocKey, Document};

/// Unvalidated sort request as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortRequest {
    pub field: String,
    pub direction: String,
}

impl SortRequest {
    pub fn new(field: impl Into<String>, direction: impl Into<String>) -> Self {
        SortRequest {
            field: field.into(),
            direction: direction.into(),
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, "asc")
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, "desc")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn parse(direction: &str) -> Option<Self> {
        match direction.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// What a validated clause sorts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Score,
    Id,
    Type,
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Keep only the requests naming an allowed field and a known direction.
pub fn validate(requests: &[SortRequest], sortable_fields: &[String]) -> Vec<SortClause> {
    requests
        .iter()
        .filter_map(|request| {
            let Some(direction) = SortDirection::parse(&request.direction) else {
                log::debug!("dropping sort on {:?}: bad direction", request.field);
                return None;
            };
            let key = match request.field.as_str() {
                "_score" => SortKey::Score,
                "_id" => SortKey::Id,
                "_type" => SortKey::Type,
                field if sortable_fields.iter().any(|f| f == field) => {
                    SortKey::Field(field.to_string())
                }
                field => {
                    log::debug!("dropping sort on {field:?}: not sortable");
                    return None;
                }
            };
            Some(SortClause { key, direction })
        })
        .collect()
}

/// A row being ordered.
pub trait Sortable {
    fn key(&self) -> &DocKey;
    fn score(&self) -> f32;
    fn document(&self) -> &Document;
}

/// Order rows by `clauses`, defaulting to score descending. Remaining ties
/// are broken by type then id ascending. Rows missing a sort field come
/// after every row that has it, in either direction.
pub fn sort_rows<T: Sortable>(rows: &mut [T], clauses: &[SortClause]) {
    rows.sort_by(|a, b| {
        let ordering = if clauses.is_empty() {
            b.score().total_cmp(&a.score())
        } else {
            clauses
                .iter()
                .map(|clause| compare_by(clause, a, b))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        };
        ordering.then_with(|| a.key().cmp(b.key()))
    });
}

fn compare_by<T: Sortable>(clause: &SortClause, a: &T, b: &T) -> Ordering {
    let ordering = match &clause.key {
        SortKey::Score => a.score().total_cmp(&b.score()),
        SortKey::Id => a.key().id.cmp(&b.key().id),
        SortKey::Type => a.key().doc_type.cmp(&b.key().doc_type),
        SortKey::Field(field) => {
            return match (a.document().get(field), b.document().get(field)) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(x), Some(y)) => clause.direction.apply(compare_values(x, y)),
            };
        }
    };
    clause.direction.apply(ordering)
}

/// Numbers compare numerically, everything else by text.
fn compare_values(a: &DataValue, b: &DataValue) -> Ordering {
    match (numeric(a), numeric(b)) {
        (Some(na), Some(nb)) => na.total_cmp(&nb),
        _ => a.facet_key().cmp(&b.facet_key()),
    }
}

fn numeric(value: &DataValue) -> Option<f64> {
    match value {
        DataValue::Int64(_) | DataValue::Float64(_) | DataValue::DateTime(_) => value.as_number(),
        _ => None,
    }
}
