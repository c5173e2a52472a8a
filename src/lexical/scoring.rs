//! TF-IDF scoring primitives.

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Inverse document frequency, `ln(1 + N / df)`.
///
/// Returns `0.0` when the term occurs in no document.
pub fn idf(total_docs: u64, doc_frequency: u64) -> f32 {
    if doc_frequency == 0 {
        return 0.0;
    }
    (1.0 + total_docs as f64 / doc_frequency as f64).ln() as f32
}

/// Sublinear term frequency, `1 + ln(frequency)`.
pub fn tf(frequency: u32) -> f32 {
    if frequency == 0 {
        return 0.0;
    }
    1.0 + (frequency as f32).ln()
}

/// Precomputed score stored on a posting.
pub fn posting_score(frequency: u32, idf: f32, weight: f32) -> f32 {
    tf(frequency) * idf * weight
}

/// Multiplier favouring recently indexed documents, `1 + 1 / (1 + age_days)`.
///
/// Ages in the future count as zero days.
pub fn recency_factor(indexed_at: DateTime<Utc>, now: DateTime<Utc>) -> f32 {
    let age_days = ((now - indexed_at).num_seconds() as f64 / SECONDS_PER_DAY).max(0.0);
    (1.0 + 1.0 / (1.0 + age_days)) as f32
}
