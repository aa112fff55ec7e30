//! Article retrieval over a French legal code: normalization, an inverted
//! index cached on disk, query reduction and BM25 ranking.

pub mod article;
pub mod bm25;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod rank;
pub mod tokenizer;

pub use article::{Article, ArticleId};
pub use corpus::Corpus;
pub use engine::{Resolution, SearchEngine};
pub use error::{LexError, Result};
pub use index::{InvertedIndex, Postings};
