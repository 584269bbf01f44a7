//! Catalog loading from TOML or JSON documents

use super::{Catalog, CatalogDocument};
use crate::error::{CatalogError, Result, ResultExt};
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../catalog/default.toml");

/// On-disk catalog format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Toml,
    Json,
}

impl CatalogFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> std::result::Result<Self, CatalogError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            other => Err(CatalogError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Parse a catalog document without validating it
pub fn parse_catalog(text: &str, format: CatalogFormat) -> Result<CatalogDocument> {
    let document = match format {
        CatalogFormat::Toml => toml::from_str(text)?,
        CatalogFormat::Json => serde_json::from_str(text)?,
    };
    Ok(document)
}

/// Read, parse and validate a catalog file
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    let format = CatalogFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let document =
        parse_catalog(&text, format).with_context(|| format!("parsing catalog {}", path.display()))?;
    let catalog = Catalog::from_document(document)
        .with_context(|| format!("validating catalog {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        rules = catalog.rule_count(),
        conflicts = catalog.conflict_graph().conflict_count(),
        "catalog loaded"
    );
    Ok(catalog)
}

impl Catalog {
    /// The catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        let document = parse_catalog(BUILTIN_CATALOG, CatalogFormat::Toml)
            .context("parsing built-in catalog")?;
        let catalog = Catalog::from_document(document).context("validating built-in catalog")?;
        tracing::debug!(rules = catalog.rule_count(), "built-in catalog loaded");
        Ok(catalog)
    }
}
