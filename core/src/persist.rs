use crate::error::{LexError, Result};
use crate::{Corpus, InvertedIndex};
use serde::{Deserialize, Serialize};
use std::fs::{self, create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const CACHE_VERSION: u32 = 1;
/// Only files with this extension are ever deleted by a retrain.
pub const CACHE_EXTENSION: &str = "bin";

/// Sidecar describing which corpus a cache file was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub fingerprint: String,
    pub created_at: String,
    pub version: u32,
}

pub struct CachePaths {
    pub index: PathBuf,
}

impl CachePaths {
    pub fn new<P: AsRef<Path>>(index: P) -> Self {
        Self { index: index.as_ref().to_path_buf() }
    }

    /// `index_cdt.bin` -> `index_cdt.bin.meta.json`
    pub fn meta(&self) -> PathBuf {
        let mut name = self.index.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".meta.json");
        self.index.with_file_name(name)
    }
}

/// Where the index handed back by [`build_or_load`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    Loaded,
    Built,
}

pub struct BuildReport {
    pub index: InvertedIndex,
    pub source: IndexSource,
    /// False when a freshly built index could not be written to disk.
    pub persisted: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheOptions {
    /// Rebuild instead of trusting a cache whose sidecar names another corpus.
    pub verify_fingerprint: bool,
}

/// Write the cache through a sibling temp file renamed into place, so an
/// interrupted write never leaves a truncated cache at `path`.
pub fn save_index(path: &Path, index: &InvertedIndex) -> anyhow::Result<()> {
    let dir = match path.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => dir,
        None => Path::new("."),
    };
    create_dir_all(dir)?;
    let bytes = bincode::serialize(index)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

pub fn load_index(path: &Path) -> Result<InvertedIndex> {
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    bincode::deserialize(&buf)
        .map_err(|source| LexError::IndexCacheCorrupt { path: path.to_path_buf(), source })
}

pub fn save_meta(paths: &CachePaths, meta: &MetaFile) -> anyhow::Result<()> {
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &CachePaths) -> anyhow::Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

fn meta_for(corpus: &Corpus) -> MetaFile {
    MetaFile {
        num_docs: corpus.len() as u32,
        fingerprint: corpus.fingerprint(),
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        version: CACHE_VERSION,
    }
}

/// Load the cached index at `path`, or build it from the corpus and write it there.
///
/// A present cache is returned as stored. An undecodable cache is an error rather
/// than a silent rebuild. A failed write leaves the built index usable and is
/// reported through `persisted` and the log.
pub fn build_or_load<P: AsRef<Path>>(corpus: &Corpus, path: P, options: CacheOptions) -> Result<BuildReport> {
    let paths = CachePaths::new(path);

    if paths.index.is_file() {
        if cache_matches(&paths, corpus) || !options.verify_fingerprint {
            tracing::info!(path = %paths.index.display(), "loading pre-existing index");
            let index = load_index(&paths.index)?;
            tracing::info!(terms = index.num_terms(), "index loaded");
            return Ok(BuildReport { index, source: IndexSource::Loaded, persisted: true });
        }
        tracing::warn!(path = %paths.index.display(), "discarding stale index cache");
    }

    tracing::info!(articles = corpus.len(), "indexing articles");
    let index = InvertedIndex::build(corpus);
    tracing::info!(terms = index.num_terms(), "indexing done");

    let persisted = match persist(&paths, corpus, &index) {
        Ok(()) => {
            tracing::info!(path = %paths.index.display(), "index saved");
            true
        }
        Err(err) => {
            tracing::error!(error = %err, "index built in memory but not persisted");
            false
        }
    };
    Ok(BuildReport { index, source: IndexSource::Built, persisted })
}

fn persist(paths: &CachePaths, corpus: &Corpus, index: &InvertedIndex) -> Result<()> {
    save_index(&paths.index, index)
        .and_then(|_| save_meta(paths, &meta_for(corpus)))
        .map_err(|source| LexError::CachePersist { path: paths.index.clone(), source })
}

/// True when the sidecar names this corpus. Mismatches and missing sidecars are logged.
fn cache_matches(paths: &CachePaths, corpus: &Corpus) -> bool {
    match load_meta(paths) {
        Ok(meta) if meta.fingerprint == corpus.fingerprint() && meta.version == CACHE_VERSION => true,
        Ok(meta) => {
            tracing::warn!(
                cached_docs = meta.num_docs,
                corpus_docs = corpus.len(),
                "index cache was built from a different corpus"
            );
            false
        }
        Err(err) => {
            tracing::warn!(error = %err, "index cache has no readable metadata");
            false
        }
    }
}

/// Delete the cache and its sidecar so the next [`build_or_load`] rebuilds.
///
/// Returns whether a cache file was removed.
pub fn invalidate_cache<P: AsRef<Path>>(path: P) -> Result<bool> {
    let paths = CachePaths::new(path);
    if !paths.index.is_file() {
        return Ok(false);
    }
    if paths.index.extension().and_then(|e| e.to_str()) != Some(CACHE_EXTENSION) {
        tracing::warn!(path = %paths.index.display(), "refusing to delete a file that is not an index cache");
        return Ok(false);
    }
    fs::remove_file(&paths.index)?;
    if paths.meta().is_file() {
        fs::remove_file(paths.meta())?;
    }
    tracing::info!(path = %paths.index.display(), "index cache removed");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_path_sits_beside_cache() {
        let paths = CachePaths::new("./data/index_cdt.bin");
        assert_eq!(paths.meta(), PathBuf::from("./data/index_cdt.bin.meta.json"));
    }

    #[test]
    fn invalidate_ignores_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("code_du_travail.csv");
        fs::write(&csv, "article_id").unwrap();
        assert!(!invalidate_cache(&csv).unwrap());
        assert!(csv.is_file());
        assert!(!invalidate_cache(dir.path().join("absent.bin")).unwrap());
    }
}
