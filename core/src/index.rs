use crate::tokenizer::normalize;
use crate::{ArticleId, Corpus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Occurrence count of one word per article.
pub type Postings = HashMap<ArticleId, u32>;

/// word -> article id -> occurrences, built from normalized article text.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    pub postings: HashMap<String, Postings>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Index every article of the corpus in one pass.
    pub fn build(corpus: &Corpus) -> Self {
        let mut index = Self::new();
        for article in corpus {
            for word in normalize(&article.texte) {
                *index
                    .postings
                    .entry(word)
                    .or_default()
                    .entry(article.article_id.clone())
                    .or_insert(0) += 1;
            }
        }
        index
    }

    /// Posting list of an already-normalized word.
    pub fn postings(&self, word: &str) -> Option<&Postings> {
        self.postings.get(word)
    }

    /// Number of articles containing the word, 0 if never indexed.
    pub fn document_frequency(&self, word: &str) -> usize {
        self.postings.get(word).map_or(0, HashMap::len)
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }
}
