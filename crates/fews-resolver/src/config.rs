//! Source configuration provider.
//!
//! Sources are declared in a YAML list and loaded once at startup; the
//! resolver treats them as read-only shared state. The custom filter is
//! typed configuration parsed by serde, never evaluated.

use std::collections::HashMap;
use std::path::Path;

use fews_common::{FewsError, FewsResult, Source};

/// Yields source records by slug. Read-only.
pub trait SourceProvider: Send + Sync {
    /// Look up a source; `NotFound` when no source carries the slug.
    fn source(&self, slug: &str) -> FewsResult<Source>;

    /// Every configured source, for listing endpoints.
    fn sources(&self) -> Vec<Source>;
}

/// File-backed provider: a YAML list of [`Source`] records.
///
/// ```yaml
/// - slug: demo
///   name: Demo source
///   url: http://fews.example.com:8080/xmlrpc
///   tag_name: demo-tag
///   connector_string: "jdbc:vjdbc:rmi://fews:2000/VJdbc,FewsDataStore"
/// ```
pub struct YamlSourceProvider {
    by_slug: HashMap<String, Source>,
    order: Vec<String>,
}

impl YamlSourceProvider {
    /// Load sources from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> FewsResult<Self> {
        Self::from_sources(read_sources(path.as_ref())?)
    }

    /// Load sources from every `*.yaml`/`*.yml` file in a directory.
    ///
    /// Files are read in name order and their source lists merged; slugs
    /// must be unique across all of them. Other files are ignored.
    pub fn from_dir(dir: impl AsRef<Path>) -> FewsResult<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            FewsError::ConfigError(format!("cannot read {}: {}", dir.display(), e))
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("yaml") | Some("yml")
                )
            })
            .collect();
        paths.sort();

        let mut sources = Vec::new();
        for path in paths {
            sources.extend(read_sources(&path)?);
        }
        Self::from_sources(sources)
    }

    /// Parse sources from YAML text.
    pub fn from_yaml(text: &str) -> FewsResult<Self> {
        let sources: Vec<Source> = serde_yaml::from_str(text)
            .map_err(|e| FewsError::ConfigError(format!("invalid source config: {}", e)))?;
        Self::from_sources(sources)
    }

    pub fn from_sources(sources: Vec<Source>) -> FewsResult<Self> {
        let mut by_slug = HashMap::new();
        let mut order = Vec::with_capacity(sources.len());
        for source in sources {
            let slug = source.slug.clone();
            if by_slug.insert(slug.clone(), source).is_some() {
                return Err(FewsError::ConfigError(format!(
                    "duplicate source slug '{}'",
                    slug
                )));
            }
            order.push(slug);
        }
        Ok(Self { by_slug, order })
    }
}

fn read_sources(path: &Path) -> FewsResult<Vec<Source>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| FewsError::ConfigError(format!("cannot read {}: {}", path.display(), e)))?;
    serde_yaml::from_str(&text).map_err(|e| {
        FewsError::ConfigError(format!("invalid source config {}: {}", path.display(), e))
    })
}

impl SourceProvider for YamlSourceProvider {
    fn source(&self, slug: &str) -> FewsResult<Source> {
        self.by_slug
            .get(slug)
            .cloned()
            .ok_or_else(|| FewsError::NotFound(format!("source '{}'", slug)))
    }

    fn sources(&self) -> Vec<Source> {
        self.order
            .iter()
            .filter_map(|slug| self.by_slug.get(slug).cloned())
            .collect()
    }
}
