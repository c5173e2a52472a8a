use std::sync::Arc;

use sift::facet::{HistogramBucket, TermsBucket};
use sift::store::{MemoryEventSink, MemoryQueryLog};
use sift::{
    Document, Engine, EngineConfig, EngineEvent, FacetRequest, FacetResult, FieldConfig,
    FieldFilter, SearchOptions, SiftError, SortRequest,
};

fn config() -> EngineConfig {
    EngineConfig::builder()
        .add_text_field("title", 3.0)
        .add_text_field("description", 1.0)
        .add_field("category", FieldConfig::new(1.0, "keyword"))
        .add_sortable_field("price")
        .build()
        .unwrap()
}

fn catalog(engine: &Engine) -> sift::Result<()> {
    engine.index(
        "product",
        "1",
        Document::new()
            .add_text("title", "Red Shoes")
            .add_text("description", "Comfortable running shoes")
            .add_string("category", "shoes")
            .add_integer("price", 50),
    )?;
    engine.index(
        "product",
        "2",
        Document::new()
            .add_text("title", "Blue Shoes")
            .add_string("category", "shoes")
            .add_integer("price", 40),
    )?;
    engine.index(
        "product",
        "3",
        Document::new()
            .add_text("title", "Red Hat")
            .add_string("category", "hats")
            .add_integer("price", 15),
    )?;
    Ok(())
}

fn engine() -> sift::Result<Engine> {
    let engine = Engine::new(config())?;
    catalog(&engine)?;
    Ok(engine)
}

#[test]
fn test_red_and_blue_shoes() -> sift::Result<()> {
    let config = EngineConfig::builder()
        .add_text_field("title", 3.0)
        .add_field("category", FieldConfig::new(1.0, "keyword"))
        .build()?;
    let engine = Engine::new(config)?;
    engine.index(
        "product",
        "1",
        Document::new()
            .add_text("title", "Red Shoes")
            .add_string("category", "shoes"),
    )?;
    engine.index(
        "product",
        "2",
        Document::new()
            .add_text("title", "Blue Shoes")
            .add_string("category", "shoes"),
    )?;

    let result = engine.search("shoes", &SearchOptions::default())?;
    assert_eq!(result.total, 2);
    assert!(result.hits.iter().all(|h| h.score > 0.0));

    let result = engine.search("+red shoes", &SearchOptions::default())?;
    assert_eq!(result.ids(), vec!["1"]);

    let facet = engine.facet("shoes", &SearchOptions::default(), &FacetRequest::terms("category"))?;
    assert_eq!(
        facet,
        FacetResult::Terms {
            buckets: vec![TermsBucket {
                key: "shoes".into(),
                count: 2
            }]
        }
    );
    Ok(())
}

#[test]
fn test_ranking_and_matched_terms() -> sift::Result<()> {
    let engine = engine()?;
    let result = engine.search("shoes", &SearchOptions::default())?;
    assert_eq!(result.ids(), vec!["1", "2"]);
    assert!(result.hits[0].score > result.hits[1].score);
    assert_eq!(result.hits[0].matched_terms, vec!["shoes"]);
    Ok(())
}

#[test]
fn test_required_and_excluded_terms() -> sift::Result<()> {
    let engine = Engine::new(EngineConfig::builder().add_text_field("body", 1.0).build()?)?;
    engine.index("recipe", "1", Document::new().add_text("body", "apple pie"))?;
    engine.index("recipe", "2", Document::new().add_text("body", "apple banana bread"))?;
    engine.index("recipe", "3", Document::new().add_text("body", "banana split"))?;

    let result = engine.search("+apple -banana", &SearchOptions::default())?;
    assert_eq!(result.ids(), vec!["1"]);

    // exclusion alone keeps every other document
    let result = engine.search("-banana", &SearchOptions::default())?;
    assert_eq!(result.ids(), vec!["1"]);
    Ok(())
}

#[test]
fn test_phrase_must_be_contiguous() -> sift::Result<()> {
    let engine = engine()?;
    let result = engine.search("\"red shoes\"", &SearchOptions::default())?;
    assert_eq!(result.ids(), vec!["1"]);

    let result = engine.search("\"shoes red\"", &SearchOptions::default())?;
    assert_eq!(result.total, 0);
    Ok(())
}

#[test]
fn test_phrase_ignores_irregular_whitespace() -> sift::Result<()> {
    let engine = engine()?;
    engine.index(
        "product",
        "4",
        Document::new().add_text("title", "Green   Leather\tBoots"),
    )?;

    let result = engine.search("\"green leather boots\"", &SearchOptions::default())?;
    assert_eq!(result.ids(), vec!["4"]);
    let result = engine.search("\"leather  boots\"", &SearchOptions::default())?;
    assert_eq!(result.ids(), vec!["4"]);
    Ok(())
}

#[test]
fn test_wildcards() -> sift::Result<()> {
    let engine = engine()?;
    let result = engine.search("sho*", &SearchOptions::default())?;
    assert_eq!(result.ids(), vec!["1", "2"]);

    let result = engine.search("zzz*", &SearchOptions::default())?;
    assert_eq!(result.total, 0);
    Ok(())
}

#[test]
fn test_blank_query_matches_everything() -> sift::Result<()> {
    let engine = engine()?;
    engine.index("article", "9", Document::new().add_text("title", "Shoe care"))?;

    let all = engine.search("   ", &SearchOptions::default())?;
    assert_eq!(all.total, 4);
    assert!(all.hits.iter().all(|h| h.score == 0.0));

    let options = SearchOptions::builder().index("product").build();
    let products = engine.search("", &options)?;
    assert_eq!(products.ids(), vec!["1", "2", "3"]);
    Ok(())
}

#[test]
fn test_field_restriction() -> sift::Result<()> {
    let engine = engine()?;
    let options = SearchOptions::builder().field("title").build();
    assert_eq!(engine.search("running", &options)?.total, 0);
    assert_eq!(engine.search("running", &SearchOptions::default())?.ids(), vec!["1"]);
    Ok(())
}

#[test]
fn test_filters() -> sift::Result<()> {
    let engine = engine()?;
    let options = SearchOptions::builder()
        .filter(FieldFilter::exact("category", "hats"))
        .build();
    assert_eq!(engine.search("red", &options)?.ids(), vec!["3"]);

    let options = SearchOptions::builder()
        .filter(FieldFilter::any_of("price", [15i64, 40]))
        .build();
    assert_eq!(engine.search("", &options)?.ids(), vec!["2", "3"]);
    Ok(())
}

#[test]
fn test_sorting() -> sift::Result<()> {
    let engine = engine()?;
    let options = SearchOptions::builder().sort(SortRequest::asc("price")).build();
    assert_eq!(engine.search("shoes", &options)?.ids(), vec!["2", "1"]);

    let options = SearchOptions::builder().sort(SortRequest::desc("_id")).build();
    assert_eq!(engine.search("", &options)?.ids(), vec!["3", "2", "1"]);
    Ok(())
}

#[test]
fn test_documents_without_sort_field_come_last() -> sift::Result<()> {
    let engine = engine()?;
    engine.index("product", "4", Document::new().add_text("title", "Gift card"))?;

    let options = SearchOptions::builder().sort(SortRequest::desc("price")).build();
    assert_eq!(engine.search("", &options)?.ids(), vec!["1", "2", "3", "4"]);
    let options = SearchOptions::builder().sort(SortRequest::asc("price")).build();
    assert_eq!(engine.search("", &options)?.ids(), vec!["3", "2", "1", "4"]);
    Ok(())
}

#[test]
fn test_unknown_sort_field_is_ignored() -> sift::Result<()> {
    let engine = engine()?;
    let default = engine.search("shoes", &SearchOptions::default())?;

    let options = SearchOptions::builder()
        .sort(SortRequest::desc("color"))
        .sort(SortRequest::new("price", "sideways"))
        .build();
    let sorted = engine.search("shoes", &options)?;
    assert_eq!(sorted.ids(), default.ids());
    Ok(())
}

#[test]
fn test_pagination_is_clamped() -> sift::Result<()> {
    let engine = Engine::new(EngineConfig {
        max_results: 2,
        ..config()
    })?;
    catalog(&engine)?;

    let options = SearchOptions::builder().from(1).size(10).build();
    let result = engine.search("", &options)?;
    assert_eq!(result.total, 3);
    assert_eq!(result.ids(), vec!["2"]);
    assert_eq!((result.from, result.size), (1, 1));

    let options = SearchOptions::builder().from(5).build();
    assert!(engine.search("", &options)?.hits.is_empty());
    Ok(())
}

#[test]
fn test_highlighting() -> sift::Result<()> {
    let engine = engine()?;
    let options = SearchOptions::builder().highlight(true).build();
    let result = engine.search("red", &options)?;
    let shoes = result.hits.iter().find(|h| h.id() == "1").unwrap();
    let hat = result.hits.iter().find(|h| h.id() == "3").unwrap();
    assert_eq!(shoes.highlights["title"], "<em>Red</em> Shoes");
    assert_eq!(hat.highlights["title"], "<em>Red</em> Hat");
    assert!(!shoes.highlights.contains_key("description"));

    let result = engine.search("red", &SearchOptions::default())?;
    assert!(result.hits.iter().all(|h| h.highlights.is_empty()));
    Ok(())
}

#[test]
fn test_fuzzy_and_corrections() -> sift::Result<()> {
    let engine = engine()?;
    assert_eq!(engine.search("shoez", &SearchOptions::default())?.total, 0);

    let options = SearchOptions::builder().fuzzy(true).build();
    assert_eq!(engine.search("shoez", &options)?.ids(), vec!["1", "2"]);

    let options = SearchOptions::builder().suggest(true).build();
    let result = engine.search("shoez", &options)?;
    let suggestions = result.suggestions.unwrap_or_default();
    assert!(suggestions.contains(&"shoes".to_string()));

    // suggestions are only attached when nothing matched
    assert!(engine.search("shoes", &options)?.suggestions.is_none());
    Ok(())
}

#[test]
fn test_document_boost() -> sift::Result<()> {
    let engine = Engine::new(EngineConfig::builder().add_text_field("title", 1.0).build()?)?;
    engine.index("product", "a", Document::new().add_text("title", "shoes"))?;
    engine.index(
        "product",
        "b",
        Document::new().add_text("title", "shoes").with_boost(2.0),
    )?;
    let result = engine.search("shoes", &SearchOptions::default())?;
    assert_eq!(result.ids(), vec!["b", "a"]);
    Ok(())
}

#[test]
fn test_recency_boost() -> sift::Result<()> {
    let plain = engine()?;
    let recent = Engine::new(EngineConfig {
        boost_recent: true,
        ..config()
    })?;
    catalog(&recent)?;

    let a = plain.search("hat", &SearchOptions::default())?.hits[0].score;
    let b = recent.search("hat", &SearchOptions::default())?.hits[0].score;
    assert!((b / a - 2.0).abs() < 0.01);
    Ok(())
}

#[test]
fn test_facets() -> sift::Result<()> {
    let engine = engine()?;
    let options = SearchOptions::builder()
        .size(1)
        .facet("categories", FacetRequest::terms("category"))
        .facet("prices", FacetRequest::histogram("price", 20.0))
        .build();
    let result = engine.search("", &options)?;
    assert_eq!(result.hits.len(), 1);

    let facets = result.facets.unwrap_or_default();
    assert_eq!(
        facets["categories"],
        FacetResult::Terms {
            buckets: vec![
                TermsBucket {
                    key: "shoes".into(),
                    count: 2
                },
                TermsBucket {
                    key: "hats".into(),
                    count: 1
                },
            ]
        }
    );
    assert_eq!(
        facets["prices"],
        FacetResult::Histogram {
            buckets: vec![
                HistogramBucket { key: 0.0, count: 1 },
                HistogramBucket {
                    key: 40.0,
                    count: 2
                },
            ]
        }
    );

    let bad = SearchOptions::builder()
        .facet("prices", FacetRequest::histogram("price", 0.0))
        .build();
    assert!(matches!(
        engine.search("", &bad),
        Err(SiftError::InvalidArgument(_))
    ));
    Ok(())
}

#[test]
fn test_results_are_cached() -> sift::Result<()> {
    let events = Arc::new(MemoryEventSink::new());
    let log = Arc::new(MemoryQueryLog::new());
    let engine = Engine::builder(config())
        .event_sink(events.clone())
        .query_log(log.clone())
        .build()?;
    catalog(&engine)?;
    events.take();

    let first = engine.search("Shoes", &SearchOptions::default())?;
    let second = engine.search("shoes", &SearchOptions::default())?;
    assert_eq!(first.ids(), second.ids());

    let cached: Vec<bool> = events
        .take()
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::SearchExecuted { cached, .. } => Some(cached),
            _ => None,
        })
        .collect();
    assert_eq!(cached, vec![false, true]);

    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].query, "shoes");
    assert_eq!(entries[0].result_count, 2);
    Ok(())
}

#[test]
fn test_blank_queries_are_not_logged() -> sift::Result<()> {
    let log = Arc::new(MemoryQueryLog::new());
    let engine = Engine::builder(config()).query_log(log.clone()).build()?;
    catalog(&engine)?;

    engine.search("", &SearchOptions::default())?;
    assert!(log.is_empty());
    Ok(())
}
