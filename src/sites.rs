//! Site registry: which sites to crawl and how to read them.
//!
//! Sites are described in YAML (see `sites.yaml` at the repository root,
//! which is also compiled in as the default list). Descriptors are validated
//! once at startup and turned into [`Site`] values holding a parsed base URL
//! and compiled selectors, so a typo in a selector fails the run before any
//! page is fetched.

use crate::errors::ConfigError;
use scraper::Selector;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

/// The site list shipped with the binary.
const DEFAULT_SITES: &str = include_str!("../sites.yaml");

/// A site entry as written in the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteDescriptor {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub article_selector: ArticleSelectors,
}

/// Raw selector strings. Empty strings count as "not configured".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleSelectors {
    #[serde(default)]
    pub list: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Compiled selectors for one site.
#[derive(Debug, Clone, Default)]
pub struct SelectorSet {
    pub list: Option<Selector>,
    pub title: Option<Selector>,
    pub link: Option<Selector>,
    pub content: Option<Selector>,
}

/// A validated site, ready to crawl.
#[derive(Debug, Clone)]
pub struct Site {
    pub name: String,
    pub base_url: Url,
    pub selectors: SelectorSet,
}

impl SiteDescriptor {
    /// Validate the descriptor and compile its selectors.
    pub fn compile(&self, index: usize) -> Result<Site, ConfigError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyName { index });
        }
        let base_url = Url::parse(self.url.trim()).map_err(|e| ConfigError::InvalidUrl {
            site: name.to_string(),
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        let raw = &self.article_selector;
        let selectors = SelectorSet {
            list: compile_selector(name, "list", raw.list.as_deref())?,
            title: compile_selector(name, "title", raw.title.as_deref())?,
            link: compile_selector(name, "link", raw.link.as_deref())?,
            content: compile_selector(name, "content", raw.content.as_deref())?,
        };

        Ok(Site {
            name: name.to_string(),
            base_url,
            selectors,
        })
    }
}

fn compile_selector(
    site: &str,
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<Selector>, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    Selector::parse(raw)
        .map(Some)
        .map_err(|e| ConfigError::InvalidSelector {
            site: site.to_string(),
            field,
            selector: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Parse and validate a YAML site list.
pub fn parse_sites(yaml: &str) -> Result<Vec<Site>, ConfigError> {
    let descriptors: Vec<SiteDescriptor> = serde_yaml::from_str(yaml)?;
    descriptors
        .iter()
        .enumerate()
        .map(|(i, d)| d.compile(i))
        .collect()
}

/// Load the site list from `path`, or the built-in list when `None`.
#[instrument(level = "info")]
pub fn load_sites(path: Option<&Path>) -> Result<Vec<Site>, ConfigError> {
    let sites = match path {
        Some(path) => {
            let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            parse_sites(&yaml)?
        }
        None => parse_sites(DEFAULT_SITES)?,
    };
    info!(count = sites.len(), "Loaded site registry");
    Ok(sites)
}
