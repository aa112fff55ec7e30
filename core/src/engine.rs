use crate::bm25::{self, Bm25Params, CorpusStats};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::persist::{build_or_load, CacheOptions};
use crate::query::{self, Query};
use crate::rank::{rank, sorted_scores};
use crate::{Article, ArticleId, Corpus, InvertedIndex};

/// Corpus, index and precomputed statistics. Read-only once constructed,
/// so one instance can be shared behind an `Arc` by concurrent handlers.
pub struct SearchEngine {
    corpus: Corpus,
    index: InvertedIndex,
    stats: CorpusStats,
    params: Bm25Params,
}

/// Answer to one query: citation hits first, then ranked articles.
#[derive(Debug, Default)]
pub struct Resolution<'e> {
    pub references: Vec<&'e Article>,
    pub ranked: Vec<&'e Article>,
}

impl<'e> Resolution<'e> {
    pub fn len(&self) -> usize { self.references.len() + self.ranked.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn iter(&self) -> impl Iterator<Item = &'e Article> + '_ {
        self.references.iter().chain(self.ranked.iter()).copied()
    }
}

impl SearchEngine {
    pub fn new(corpus: Corpus, index: InvertedIndex, params: Bm25Params) -> Self {
        let stats = CorpusStats::from_corpus(&corpus);
        Self { corpus, index, stats, params }
    }

    /// Index the corpus in memory without touching any cache.
    pub fn from_corpus(corpus: Corpus, params: Bm25Params) -> Self {
        let index = InvertedIndex::build(&corpus);
        Self::new(corpus, index, params)
    }

    /// Load the corpus and obtain its index through the cache at `index_path`.
    pub fn open(config: &EngineConfig) -> Result<Self> {
        let corpus = Corpus::from_csv_path(&config.dataset_path)?;
        Self::with_cache(corpus, &config.index_path, config.cache_options(), config.bm25())
    }

    pub fn with_cache<P: AsRef<std::path::Path>>(
        corpus: Corpus,
        index_path: P,
        options: CacheOptions,
        params: Bm25Params,
    ) -> Result<Self> {
        let report = build_or_load(&corpus, index_path, options)?;
        Ok(Self::new(corpus, report.index, params))
    }

    pub fn corpus(&self) -> &Corpus { &self.corpus }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn stats(&self) -> &CorpusStats { &self.stats }

    /// Ranked `(article id, score)` pairs for the query, best first.
    pub fn search(&self, raw: &str) -> Vec<(ArticleId, f64)> {
        let terms = Query::classify(raw).terms();
        let reduced = query::reduce(&terms, &self.index, self.corpus.len());
        tracing::debug!(query = raw, ?reduced, "scoring terms");
        let scores = bm25::score(&reduced, &self.index, &self.stats, self.params);
        sorted_scores(scores)
    }

    pub fn match_reference(&self, raw: &str) -> Option<Vec<&Article>> {
        query::match_reference(raw, &self.corpus)
    }

    /// Citation hits when the query names existing articles, otherwise at most
    /// `limit + 1` ranked articles. Cited articles are never scored.
    pub fn solve(&self, raw: &str, limit: usize) -> Resolution<'_> {
        if let Some(references) = self.match_reference(raw) {
            tracing::debug!(query = raw, references = references.len(), "query resolved by citation");
            return Resolution { references, ranked: Vec::new() };
        }
        let ranked = rank(&self.search(raw), &self.corpus, limit);
        tracing::debug!(query = raw, ranked = ranked.len(), "query solved");
        Resolution { references: Vec::new(), ranked }
    }
}
