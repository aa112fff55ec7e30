use crate::tokenizer::normalize_term;
use crate::{Article, Corpus, InvertedIndex};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CITATION: Regex = Regex::new(r"^[LRD][0-9-]+$").expect("valid regex");
}

/// A query is either a bare article citation or free text to be ranked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Reference { citation: String },
    FreeText { terms: Vec<String> },
}

impl Query {
    pub fn classify(raw: &str) -> Self {
        if CITATION.is_match(raw) {
            Query::Reference { citation: raw.to_string() }
        } else {
            Query::FreeText { terms: query_terms(raw) }
        }
    }

    /// Terms to rank when the query is scored, including a citation that found no article.
    pub fn terms(&self) -> Vec<String> {
        match self {
            Query::Reference { citation } => query_terms(citation),
            Query::FreeText { terms } => terms.clone(),
        }
    }
}

/// Split on single spaces and normalize each word for lookup. Empty words are dropped.
pub fn query_terms(raw: &str) -> Vec<String> {
    raw.split(' ')
        .map(normalize_term)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Articles whose number ends with the citation, when the whole query is one.
pub fn match_reference<'c>(raw: &str, corpus: &'c Corpus) -> Option<Vec<&'c Article>> {
    match Query::classify(raw) {
        Query::Reference { citation } => find_citation(&citation, corpus),
        Query::FreeText { .. } => None,
    }
}

pub(crate) fn find_citation<'c>(citation: &str, corpus: &'c Corpus) -> Option<Vec<&'c Article>> {
    let hits: Vec<&Article> = corpus
        .iter()
        .filter(|a| a.article_num.ends_with(citation))
        .collect();
    if hits.is_empty() { None } else { Some(hits) }
}

/// Keep only the terms found in fewer than a quarter of the articles, if there are any.
///
/// When every term is that common the query is scored as is.
pub fn reduce(terms: &[String], index: &InvertedIndex, corpus_size: usize) -> Vec<String> {
    let threshold = corpus_size as f64 / 4.0;
    let unusual: Vec<String> = terms
        .iter()
        .filter(|t| (index.document_frequency(t) as f64) < threshold)
        .cloned()
        .collect();
    if unusual.is_empty() { terms.to_vec() } else { unusual }
}
