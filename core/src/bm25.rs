//! Okapi BM25 over the in-memory inverted index.
//!
//! Document length is the raw character count of the stored text, markup
//! included, and the average is taken over the same measure.

use crate::{ArticleId, Corpus, InvertedIndex};
use std::collections::HashMap;

/// Per-query accumulation of article scores.
pub type ScoreMap = HashMap<ArticleId, f64>;

/// BM25 parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Length normalization.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

/// Corpus-wide figures computed once and reused by every query.
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    pub num_docs: usize,
    pub avgdl: f64,
    lengths: HashMap<ArticleId, usize>,
}

impl CorpusStats {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let lengths: HashMap<ArticleId, usize> = corpus
            .iter()
            .map(|a| (a.article_id.clone(), a.raw_len()))
            .collect();
        let num_docs = corpus.len();
        let total: usize = corpus.iter().map(|a| a.raw_len()).sum();
        let avgdl = if num_docs == 0 { 0.0 } else { total as f64 / num_docs as f64 };
        Self { num_docs, avgdl, lengths }
    }

    pub fn length(&self, article_id: &str) -> Option<usize> {
        self.lengths.get(article_id).copied()
    }
}

/// `ln(1 + (N - df + 0.5) / (df + 0.5))`, finite for every df including 0.
pub fn idf(num_docs: usize, df: usize) -> f64 {
    let n = num_docs as f64;
    let df = df as f64;
    (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
}

/// Saturated, length-normalized term frequency.
pub fn tf_weight(freq: u32, len: usize, avgdl: f64, params: Bm25Params) -> f64 {
    let f = freq as f64;
    let ratio = if avgdl > 0.0 { len as f64 / avgdl } else { 0.0 };
    f * (params.k1 + 1.0) / (f + params.k1 * (1.0 - params.b + params.b * ratio))
}

/// Contribution of one normalized term to every article in its posting list.
pub fn score_term(term: &str, index: &InvertedIndex, stats: &CorpusStats, params: Bm25Params) -> ScoreMap {
    let Some(postings) = index.postings(term) else {
        return ScoreMap::new();
    };
    let idf = idf(stats.num_docs, postings.len());
    postings
        .iter()
        .filter_map(|(article_id, &freq)| {
            // ids missing from the corpus can only come from a stale cache
            let len = stats.length(article_id)?;
            Some((article_id.clone(), idf * tf_weight(freq, len, stats.avgdl, params)))
        })
        .collect()
}

/// Sum of per-term contributions. Articles matching no term are absent.
pub fn score(terms: &[String], index: &InvertedIndex, stats: &CorpusStats, params: Bm25Params) -> ScoreMap {
    let mut scores = ScoreMap::new();
    for term in terms {
        for (article_id, contrib) in score_term(term, index, stats, params) {
            *scores.entry(article_id).or_insert(0.0) += contrib;
        }
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Article;

    fn article(id: &str, texte: &str) -> Article {
        Article {
            article_id: id.into(),
            article_num: format!("L{id}"),
            date_deb: "0".into(),
            texte: texte.into(),
            path_title: "[]".into(),
        }
    }

    #[test]
    fn idf_of_unindexed_term_is_finite() {
        let v = idf(10, 0);
        assert!(v.is_finite());
        assert!((v - (1.0f64 + 10.5 / 0.5).ln()).abs() < 1e-12);
        assert!(idf(0, 0).is_finite());
    }

    #[test]
    fn avgdl_counts_markup_characters() {
        let corpus = Corpus::from_articles(vec![article("A", "<p>ab</p>"), article("B", "é")]);
        let stats = CorpusStats::from_corpus(&corpus);
        assert_eq!(stats.num_docs, 2);
        assert_eq!(stats.length("A"), Some(9));
        assert_eq!(stats.length("B"), Some(1));
        assert!((stats.avgdl - 5.0).abs() < 1e-12);
    }

    #[test]
    fn contributions_add_up_across_terms() {
        let corpus = Corpus::from_articles(vec![
            article("A", "salaire minimum"),
            article("B", "salaire"),
            article("C", "congé"),
        ]);
        let index = InvertedIndex::build(&corpus);
        let stats = CorpusStats::from_corpus(&corpus);
        let params = Bm25Params::default();
        let salaire = score_term("salaire", &index, &stats, params);
        let minimum = score_term("minimum", &index, &stats, params);
        let both = score(&["salaire".into(), "minimum".into()], &index, &stats, params);
        assert!((both["A"] - (salaire["A"] + minimum["A"])).abs() < 1e-12);
        assert!((both["B"] - salaire["B"]).abs() < 1e-12);
        assert!(!both.contains_key("C"));
    }

    #[test]
    fn empty_terms_score_nothing() {
        let corpus = Corpus::from_articles(vec![article("A", "salaire")]);
        let index = InvertedIndex::build(&corpus);
        let stats = CorpusStats::from_corpus(&corpus);
        assert!(score(&[], &index, &stats, Bm25Params::default()).is_empty());
    }
}
