use crate::error::{LexError, Result};
use crate::Article;
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::path::Path;

/// The articles of one legal code, in dataset order, with an id lookup table.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    articles: Vec<Article>,
    by_id: HashMap<String, usize>,
}

impl Corpus {
    /// Build from already-loaded articles. Later duplicates of an id are skipped.
    pub fn from_articles(articles: Vec<Article>) -> Self {
        let mut corpus = Corpus::default();
        for article in articles {
            corpus.push(article);
        }
        corpus
    }

    /// Load the dataset CSV (`article_id, article_num, date_deb, texte, path_title`).
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .map_err(|source| LexError::DatasetUnavailable { path: path.to_path_buf(), source })?;

        let mut corpus = Corpus::default();
        for row in reader.deserialize::<Article>() {
            let article = row.map_err(|source| LexError::InvalidRow {
                line: source.position().map(|p| p.line()).unwrap_or(0),
                source,
            })?;
            corpus.push(article);
        }
        tracing::info!(path = %path.display(), articles = corpus.len(), "loaded dataset");
        Ok(corpus)
    }

    fn push(&mut self, article: Article) {
        if self.by_id.contains_key(&article.article_id) {
            tracing::warn!(article_id = %article.article_id, "duplicate article id skipped");
            return;
        }
        self.by_id.insert(article.article_id.clone(), self.articles.len());
        self.articles.push(article);
    }

    pub fn len(&self) -> usize { self.articles.len() }

    pub fn is_empty(&self) -> bool { self.articles.is_empty() }

    pub fn articles(&self) -> &[Article] { &self.articles }

    pub fn iter(&self) -> std::slice::Iter<'_, Article> { self.articles.iter() }

    /// Exact identifier lookup.
    pub fn get(&self, article_id: &str) -> Option<&Article> {
        self.by_id.get(article_id).map(|&i| &self.articles[i])
    }

    /// Identity of the corpus as seen by the index cache: size plus a SHA-1 over the ids.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha1::new();
        hasher.update((self.articles.len() as u64).to_le_bytes());
        for article in &self.articles {
            hasher.update(article.article_id.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter { self.articles.iter() }
}
