//! Query planning and result windowing.

use std::ops::Range;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::error::Result;
use crate::lexical::writer::IndexedField;
use crate::query::parser::AnalyzedQuery;
use crate::query::wildcard::WildcardPattern;
use crate::store::posting::{CandidateSpec, InvertedIndex};
use crate::store::stats::TermStatistics;

/// Scope and expansion settings for [`plan`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions<'a> {
    pub doc_type: Option<&'a str>,
    pub fields: &'a [String],
    /// Configured fields whose analyzers rewrite query terms into their
    /// indexed form.
    pub indexed_fields: &'a [IndexedField],
    /// Expand required and optional terms to indexed terms within this many
    /// edits.
    pub fuzzy_distance: Option<usize>,
}

/// Translate a parsed query into the candidate spec the inverted index
/// evaluates.
///
/// Every query term is expanded to the forms the configured field analyzers
/// index it under (a stem, a phonetic code), restricted to `fields` when
/// given. Every required term and every wildcard pattern becomes a `must`
/// group. A wildcard matching no indexed term yields an empty group, which
/// no document can satisfy. Phrase words only contribute to the score;
/// phrase containment is checked against the raw content with
/// [`contains_phrases`].
pub fn plan(
    query: &AnalyzedQuery,
    options: PlanOptions<'_>,
    index: &dyn InvertedIndex,
    stats: &dyn TermStatistics,
) -> Result<CandidateSpec> {
    let analyzers: Vec<&dyn Analyzer> = options
        .indexed_fields
        .iter()
        .filter(|f| options.fields.is_empty() || options.fields.contains(&f.name))
        .map(|f| f.analyzer.as_ref())
        .collect();
    let forms = |term: &String| indexed_forms(term, &analyzers);

    let expand = |term: &String| -> Result<Vec<String>> {
        let mut group = forms(term)?;
        if let Some(distance) = options.fuzzy_distance {
            for (similar, _) in stats.find_similar(term, distance)? {
                if !group.contains(&similar) {
                    group.push(similar);
                }
            }
        }
        Ok(group)
    };
    let flatten = |terms: &[String]| -> Result<Vec<String>> {
        let mut flat: Vec<String> = Vec::new();
        for term in terms {
            for form in forms(term)? {
                if !flat.contains(&form) {
                    flat.push(form);
                }
            }
        }
        Ok(flat)
    };

    let mut must = query.must().iter().map(&expand).collect::<Result<Vec<_>>>()?;
    for raw in query.wildcard() {
        let pattern = WildcardPattern::new(raw.as_str())?;
        let terms = index.matching_terms(&pattern)?;
        log::debug!("wildcard {raw:?} expanded to {} terms", terms.len());
        must.push(terms);
    }
    let should = query.should().iter().map(&expand).collect::<Result<Vec<_>>>()?;

    Ok(CandidateSpec {
        doc_type: options.doc_type.map(str::to_string),
        fields: options.fields.to_vec(),
        must,
        should,
        must_not: flatten(query.must_not())?,
        score_terms: flatten(query.tokens())?,
    })
}

/// `term` followed by every distinct form `analyzers` produce for it.
fn indexed_forms(term: &str, analyzers: &[&dyn Analyzer]) -> Result<Vec<String>> {
    let mut forms = vec![term.to_string()];
    for analyzer in analyzers {
        for token in analyzer.analyze(term)? {
            if !token.text.is_empty() && !forms.contains(&token.text) {
                forms.push(token.text);
            }
        }
    }
    Ok(forms)
}

/// Spec selecting every document that carries one of `terms` in any field.
pub fn exclusion_spec(doc_type: Option<&str>, terms: &[String]) -> CandidateSpec {
    CandidateSpec {
        doc_type: doc_type.map(str::to_string),
        should: terms.iter().map(|t| vec![t.clone()]).collect(),
        ..Default::default()
    }
}

/// Whether every phrase is a substring of the lowercased raw content.
pub fn contains_phrases(raw_content: &str, phrases: &[String]) -> bool {
    phrases.iter().all(|p| raw_content.contains(p.as_str()))
}

/// Slice of the ranked rows to return.
///
/// The requested window is clamped so that `from + size` never exceeds
/// `max_results`, then to the number of rows available.
pub fn window(total: usize, from: usize, size: usize, max_results: usize) -> Range<usize> {
    let from = from.min(max_results);
    let size = size.min(max_results - from);
    let start = from.min(total);
    let end = (from + size).min(total);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::analysis::analyzer::phonetic::PhoneticAnalyzer;
    use crate::analysis::analyzer::stemming::StemmingAnalyzer;
    use crate::data::DocKey;
    use crate::lexical::posting::Posting;
    use crate::query::parser::QueryParser;
    use crate::store::posting::MemoryInvertedIndex;
    use crate::store::stats::MemoryTermStatistics;

    fn fixture() -> (MemoryInvertedIndex, MemoryTermStatistics) {
        let index = MemoryInvertedIndex::new();
        let stats = MemoryTermStatistics::new();
        let key = DocKey::new("product", "1");
        let postings = ["shoes", "shirt", "sneakers"]
            .iter()
            .map(|term| Posting {
                key: key.clone(),
                term: term.to_string(),
                field: "title".into(),
                frequency: 1,
                weight: 1.0,
                score: 1.0,
            })
            .collect();
        index.upsert_postings(&key, postings).unwrap();
        for term in ["shoes", "shirt", "sneakers"] {
            stats.increment_frequency(term).unwrap();
        }
        (index, stats)
    }

    #[test]
    fn test_plan_clauses() {
        let (index, stats) = fixture();
        let query = QueryParser::default().parse("+red \"blue sky\" sh* boots -green");
        let spec = plan(&query, PlanOptions::default(), &index, &stats).unwrap();

        assert_eq!(
            spec.must,
            vec![vec!["red".to_string()], vec!["shirt".into(), "shoes".into()]]
        );
        assert_eq!(spec.should, vec![vec!["boots".to_string()]]);
        assert_eq!(spec.must_not, vec!["green"]);
        assert_eq!(spec.score_terms, vec!["blue", "sky", "red", "boots"]);
        assert!(!spec.is_unconstrained());
    }

    #[test]
    fn test_plan_fuzzy_expansion() {
        let (index, stats) = fixture();
        let query = QueryParser::default().parse("shoez");
        let options = PlanOptions {
            fuzzy_distance: Some(1),
            ..Default::default()
        };
        let spec = plan(&query, options, &index, &stats).unwrap();
        assert_eq!(spec.should, vec![vec!["shoez".to_string(), "shoes".into()]]);
    }

    #[test]
    fn test_plan_uses_field_analyzers() {
        let (index, stats) = fixture();
        let fields = vec![
            IndexedField::new("body", 1.0, Arc::new(StemmingAnalyzer::new())),
            IndexedField::new("name", 1.0, Arc::new(PhoneticAnalyzer::new())),
        ];
        let query = QueryParser::default().parse("+shoes -robert");
        let options = PlanOptions {
            indexed_fields: &fields,
            ..Default::default()
        };
        let spec = plan(&query, options, &index, &stats).unwrap();
        assert_eq!(
            spec.must,
            vec![vec!["shoes".to_string(), "shoe".into(), "s200".into()]]
        );
        assert_eq!(spec.must_not, vec!["robert", "r163"]);

        // restricting to one field only applies that field's analyzer
        let restricted = ["body".to_string()];
        let options = PlanOptions {
            fields: &restricted,
            indexed_fields: &fields,
            ..Default::default()
        };
        let spec = plan(&query, options, &index, &stats).unwrap();
        assert_eq!(spec.must, vec![vec!["shoes".to_string(), "shoe".into()]]);
    }

    #[test]
    fn test_plan_unmatched_wildcard_is_empty_group() {
        let (index, stats) = fixture();
        let query = QueryParser::default().parse("zz*");
        let spec = plan(&query, PlanOptions::default(), &index, &stats).unwrap();
        assert_eq!(spec.must, vec![Vec::<String>::new()]);
        assert!(index.query(&spec).unwrap().is_empty());
    }

    #[test]
    fn test_blank_query_matches_everything() {
        let (index, stats) = fixture();
        let query = QueryParser::default().parse("   ");
        let spec = plan(&query, PlanOptions::default(), &index, &stats).unwrap();
        assert!(spec.is_unconstrained());
    }

    #[test]
    fn test_contains_phrases() {
        let content = "red shoes\nrunning gear";
        assert!(contains_phrases(content, &["red shoes".into()]));
        assert!(!contains_phrases(content, &["blue shoes".into()]));
        assert!(contains_phrases(content, &[]));
    }

    #[test]
    fn test_window() {
        assert_eq!(window(100, 0, 10, 1000), 0..10);
        assert_eq!(window(5, 0, 10, 1000), 0..5);
        assert_eq!(window(5, 10, 10, 1000), 5..5);
        assert_eq!(window(100, 95, 10, 100), 95..100);
        assert_eq!(window(2000, 990, 50, 1000), 990..1000);
        assert_eq!(window(2000, 1500, 50, 1000), 1000..1000);
    }
}
