use crate::bm25::ScoreMap;
use crate::{Article, ArticleId, Corpus};
use std::cmp::Ordering;

pub const DEFAULT_LIMIT: usize = 5;

/// Score map entries, best first. Equal scores fall back to article id order.
pub fn sorted_scores(scores: ScoreMap) -> Vec<(ArticleId, f64)> {
    let mut scored: Vec<(ArticleId, f64)> = scores.into_iter().collect();
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored
}

/// Resolve ranked ids against the corpus, stopping once more than `limit` are held.
///
/// That yields `limit + 1` articles when enough match. Unknown ids are skipped.
pub fn rank<'c>(ranked: &[(ArticleId, f64)], corpus: &'c Corpus, limit: usize) -> Vec<&'c Article> {
    let mut results = Vec::new();
    for (article_id, _score) in ranked {
        if let Some(article) = corpus.get(article_id) {
            results.push(article);
        }
        if results.len() > limit {
            break;
        }
    }
    results
}
