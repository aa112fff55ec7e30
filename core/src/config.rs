use crate::bm25::Bm25Params;
use crate::persist::CacheOptions;
use crate::rank::DEFAULT_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings shared by the command-line tool and the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub dataset_path: PathBuf,
    pub index_path: PathBuf,
    /// Results are cut once more than this many are collected.
    pub limit: usize,
    pub k1: f64,
    pub b: f64,
    /// Rebuild the index when the cache was made from another corpus.
    pub verify_fingerprint: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let bm25 = Bm25Params::default();
        Self {
            dataset_path: PathBuf::from("./code_du_travail.csv"),
            index_path: PathBuf::from("./index_cdt.bin"),
            limit: DEFAULT_LIMIT,
            k1: bm25.k1,
            b: bm25.b,
            verify_fingerprint: false,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `LEXCODE_DATASET`, `LEXCODE_INDEX`, `LEXCODE_LIMIT`, `LEXCODE_VERIFY_CACHE`.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    fn overlay(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = var("LEXCODE_DATASET") {
            self.dataset_path = PathBuf::from(v);
        }
        if let Some(v) = var("LEXCODE_INDEX") {
            self.index_path = PathBuf::from(v);
        }
        if let Some(v) = var("LEXCODE_LIMIT") {
            match v.trim().parse() {
                Ok(limit) => self.limit = limit,
                Err(_) => tracing::warn!(value = %v, "ignoring invalid LEXCODE_LIMIT"),
            }
        }
        if let Some(v) = var("LEXCODE_VERIFY_CACHE") {
            self.verify_fingerprint = matches!(v.trim(), "1" | "true" | "yes");
        }
        self
    }

    pub fn bm25(&self) -> Bm25Params {
        Bm25Params { k1: self.k1, b: self.b }
    }

    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions { verify_fingerprint: self.verify_fingerprint }
    }
}
