//! Facet aggregations over a candidate set.
//!
//! Facets are computed over every matching document, ignoring pagination.
//! Three kinds are supported:
//!
//! - **terms**: count documents per scalar field value
//! - **range**: count documents whose numeric value falls in caller buckets
//! - **histogram**: count documents per fixed-width numeric bucket

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::data::Document;
use crate::error::{Result, SiftError};

fn default_terms_size() -> usize {
    10
}

fn default_min_count() -> u64 {
    1
}

/// A facet to compute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacetRequest {
    Terms {
        field: String,
        #[serde(default = "default_terms_size")]
        size: usize,
        #[serde(default = "default_min_count")]
        min_count: u64,
    },
    Range {
        field: String,
        ranges: Vec<RangeSpec>,
    },
    Histogram {
        field: String,
        interval: f64,
    },
}

impl FacetRequest {
    /// Terms facet with the default size (10) and minimum count (1).
    pub fn terms(field: impl Into<String>) -> Self {
        FacetRequest::Terms {
            field: field.into(),
            size: default_terms_size(),
            min_count: default_min_count(),
        }
    }

    pub fn range(field: impl Into<String>, ranges: Vec<RangeSpec>) -> Self {
        FacetRequest::Range {
            field: field.into(),
            ranges,
        }
    }

    pub fn histogram(field: impl Into<String>, interval: f64) -> Self {
        FacetRequest::Histogram {
            field: field.into(),
            interval,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            FacetRequest::Terms { field, .. }
            | FacetRequest::Range { field, .. }
            | FacetRequest::Histogram { field, .. } => field,
        }
    }

    /// Reject requests that cannot be computed.
    pub fn validate(&self) -> Result<()> {
        match self {
            FacetRequest::Histogram { interval, .. } if !(*interval > 0.0 && interval.is_finite()) => {
                Err(SiftError::invalid_argument(format!(
                    "histogram interval must be positive, got {interval}"
                )))
            }
            FacetRequest::Range { ranges, .. } => {
                for range in ranges {
                    if let (Some(from), Some(to)) = (range.from, range.to)
                        && from > to
                    {
                        return Err(SiftError::invalid_argument(format!(
                            "range bucket from {from} is above to {to}"
                        )));
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// A half-open `[from, to)` bucket; either bound may be absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeSpec {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
}

impl RangeSpec {
    pub fn new(from: Option<f64>, to: Option<f64>) -> Self {
        RangeSpec {
            key: None,
            from,
            to,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    fn contains(&self, value: f64) -> bool {
        self.from.is_none_or(|from| value >= from) && self.to.is_none_or(|to| value < to)
    }

    /// The explicit key, or `from-to` with `*` standing in for a missing
    /// bound.
    fn label(&self) -> String {
        if let Some(key) = &self.key {
            return key.clone();
        }
        let bound = |b: Option<f64>| b.map_or_else(|| "*".to_string(), |v| v.to_string());
        format!("{}-{}", bound(self.from), bound(self.to))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsBucket {
    pub key: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeBucket {
    pub key: String,
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub key: f64,
    pub count: u64,
}

/// The outcome of one [`FacetRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacetResult {
    Terms {
        buckets: Vec<TermsBucket>,
    },
    Range {
        buckets: Vec<RangeBucket>,
        /// Smallest value of the field across the matching documents.
        min: Option<f64>,
        max: Option<f64>,
    },
    Histogram {
        buckets: Vec<HistogramBucket>,
    },
}

/// Compute `request` over `documents`.
pub fn compute(request: &FacetRequest, documents: &[&Document]) -> Result<FacetResult> {
    request.validate()?;
    let result = match request {
        FacetRequest::Terms {
            field,
            size,
            min_count,
        } => terms(field, *size, *min_count, documents),
        FacetRequest::Range { field, ranges } => range(field, ranges, documents),
        FacetRequest::Histogram { field, interval } => histogram(field, *interval, documents),
    };
    Ok(result)
}

fn terms(field: &str, size: usize, min_count: u64, documents: &[&Document]) -> FacetResult {
    let mut counts: AHashMap<String, u64> = AHashMap::new();
    for key in documents
        .iter()
        .filter_map(|d| d.get(field))
        .filter_map(|v| v.facet_key())
    {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut buckets: Vec<TermsBucket> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .map(|(key, count)| TermsBucket { key, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    buckets.truncate(size);
    FacetResult::Terms { buckets }
}

fn numeric_values<'a>(field: &'a str, documents: &'a [&Document]) -> impl Iterator<Item = f64> + 'a {
    documents
        .iter()
        .filter_map(move |d| d.get(field))
        .filter_map(|v| v.as_number())
}

fn range(field: &str, ranges: &[RangeSpec], documents: &[&Document]) -> FacetResult {
    let values: Vec<f64> = numeric_values(field, documents).collect();

    let buckets = ranges
        .iter()
        .map(|spec| RangeBucket {
            key: spec.label(),
            from: spec.from,
            to: spec.to,
            count: values.iter().filter(|v| spec.contains(**v)).count() as u64,
        })
        .collect();
    let min = values.iter().copied().reduce(f64::min);
    let max = values.iter().copied().reduce(f64::max);

    FacetResult::Range { buckets, min, max }
}

/// Buckets are keyed by `floor(value / interval) * interval`, kept as a
/// float so slots far outside the integer range stay distinct.
fn histogram(field: &str, interval: f64, documents: &[&Document]) -> FacetResult {
    let mut keys: Vec<f64> = numeric_values(field, documents)
        .map(|value| {
            let key = (value / interval).floor() * interval;
            // -0.0 and 0.0 share a bucket
            if key == 0.0 { 0.0 } else { key }
        })
        .collect();
    keys.sort_by(f64::total_cmp);

    let mut buckets: Vec<HistogramBucket> = Vec::new();
    for key in keys {
        match buckets.last_mut() {
            Some(last) if last.key.total_cmp(&key).is_eq() => last.count += 1,
            _ => buckets.push(HistogramBucket { key, count: 1 }),
        }
    }
    FacetResult::Histogram { buckets }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Document> {
        vec![
            Document::new().add_string("category", "shoes").add_float("price", 19.5),
            Document::new().add_string("category", "shoes").add_integer("price", 45),
            Document::new().add_string("category", "boots").add_integer("price", 120),
            Document::new().add_list("category", ["hats"]).add_integer("price", 5),
            Document::new().add_string("category", "socks"),
        ]
    }

    fn refs(docs: &[Document]) -> Vec<&Document> {
        docs.iter().collect()
    }

    #[test]
    fn test_terms_facet() {
        let docs = catalog();
        let result = compute(&FacetRequest::terms("category"), &refs(&docs)).unwrap();
        assert_eq!(
            result,
            FacetResult::Terms {
                buckets: vec![
                    TermsBucket { key: "shoes".into(), count: 2 },
                    TermsBucket { key: "boots".into(), count: 1 },
                    TermsBucket { key: "socks".into(), count: 1 },
                ]
            }
        );
    }

    #[test]
    fn test_terms_facet_min_count_and_size() {
        let docs = catalog();
        let request = FacetRequest::Terms {
            field: "category".into(),
            size: 10,
            min_count: 2,
        };
        let FacetResult::Terms { buckets } = compute(&request, &refs(&docs)).unwrap() else {
            panic!("expected terms result");
        };
        assert_eq!(buckets.len(), 1);

        let request = FacetRequest::Terms {
            field: "category".into(),
            size: 1,
            min_count: 1,
        };
        let FacetResult::Terms { buckets } = compute(&request, &refs(&docs)).unwrap() else {
            panic!("expected terms result");
        };
        assert_eq!(buckets[0].key, "shoes");
        assert_eq!(buckets.len(), 1);
    }

    #[test]
    fn test_range_facet() {
        let docs = catalog();
        let request = FacetRequest::range(
            "price",
            vec![
                RangeSpec::new(None, Some(20.0)).with_key("cheap"),
                RangeSpec::new(Some(20.0), Some(100.0)),
                RangeSpec::new(Some(100.0), None),
            ],
        );
        let result = compute(&request, &refs(&docs)).unwrap();
        let FacetResult::Range { buckets, min, max } = result else {
            panic!("expected range result");
        };
        let summary: Vec<(&str, u64)> = buckets.iter().map(|b| (b.key.as_str(), b.count)).collect();
        assert_eq!(summary, vec![("cheap", 2), ("20-100", 1), ("100-*", 1)]);
        assert_eq!(min, Some(5.0));
        assert_eq!(max, Some(120.0));
    }

    #[test]
    fn test_range_facet_without_values() {
        let docs = catalog();
        let request = FacetRequest::range("weight", vec![RangeSpec::new(None, None)]);
        let FacetResult::Range { buckets, min, max } = compute(&request, &refs(&docs)).unwrap()
        else {
            panic!("expected range result");
        };
        assert_eq!(buckets[0].count, 0);
        assert_eq!((min, max), (None, None));
    }

    #[test]
    fn test_histogram_facet() {
        let docs = catalog();
        let result = compute(&FacetRequest::histogram("price", 50.0), &refs(&docs)).unwrap();
        assert_eq!(
            result,
            FacetResult::Histogram {
                buckets: vec![
                    HistogramBucket { key: 0.0, count: 3 },
                    HistogramBucket { key: 100.0, count: 1 },
                ]
            }
        );
    }

    #[test]
    fn test_histogram_keeps_huge_slots_apart() {
        let docs = vec![
            Document::new().add_float("price", 1e300),
            Document::new().add_float("price", 2e300),
            Document::new().add_float("price", -2e300),
            Document::new().add_float("price", -0.0),
            Document::new().add_float("price", 0.5),
        ];
        let result = compute(&FacetRequest::histogram("price", 1.0), &refs(&docs)).unwrap();
        assert_eq!(
            result,
            FacetResult::Histogram {
                buckets: vec![
                    HistogramBucket { key: -2e300, count: 1 },
                    HistogramBucket { key: 0.0, count: 2 },
                    HistogramBucket { key: 1e300, count: 1 },
                    HistogramBucket { key: 2e300, count: 1 },
                ]
            }
        );
    }

    #[test]
    fn test_histogram_rejects_non_positive_interval() {
        let docs = catalog();
        for interval in [0.0, -5.0, f64::NAN] {
            let err = compute(&FacetRequest::histogram("price", interval), &refs(&docs));
            assert!(matches!(err, Err(SiftError::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_request_from_json() {
        let request: FacetRequest =
            serde_json::from_str(r#"{"type": "terms", "field": "category"}"#).unwrap();
        assert_eq!(request, FacetRequest::terms("category"));
    }
}
