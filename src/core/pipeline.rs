/// The skill text engine: descriptor → localized text.
///
/// Owns the lookup provider and render configuration; every `render` call
/// gets its own `RenderContext`, so one engine can be shared across threads.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::context::{RenderContext, DEFAULT_MAX_DEPTH};
use crate::core::lookup::{LookupError, LookupProvider, TableLookup};
use crate::core::render::{EffectRenderer, RenderError};
use crate::schema::action::{ActionDescriptor, NamedDescriptor};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_fallback_glyph() -> String {
    "???".to_string()
}

/// Render settings, loadable from RON. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Composite nesting limit.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Shown for unresolved awakening names and unknown team targets.
    #[serde(default = "default_fallback_glyph")]
    pub fallback_glyph: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            fallback_glyph: default_fallback_glyph(),
        }
    }
}

impl RenderConfig {
    pub fn load_from_ron(path: &Path) -> Result<RenderConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<RenderConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }
}

/// The top-level engine. Built via `SkillTextEngine::builder()`.
pub struct SkillTextEngine {
    lookup: Box<dyn LookupProvider + Send + Sync>,
    config: RenderConfig,
}

/// Builder for constructing a `SkillTextEngine`.
#[derive(Default)]
pub struct SkillTextEngineBuilder {
    lookup: Option<Box<dyn LookupProvider + Send + Sync>>,
    lookup_path: Option<PathBuf>,
    config: Option<RenderConfig>,
    config_path: Option<PathBuf>,
}

impl SkillTextEngine {
    pub fn builder() -> SkillTextEngineBuilder {
        SkillTextEngineBuilder::default()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render one descriptor to text.
    pub fn render(&self, action: &ActionDescriptor) -> Result<String, RenderError> {
        let renderer = EffectRenderer::new(self.lookup.as_ref(), &self.config.fallback_glyph);
        let mut ctx = RenderContext::new(self.config.max_depth);
        let text = renderer.render(action, &mut ctx)?;
        debug!(kind = action.kind_name(), chars = text.chars().count(), "rendered skill text");
        Ok(text)
    }

    /// Render a batch of named descriptors. One failure does not stop the rest.
    pub fn render_named<'a>(
        &self,
        descriptors: &'a [NamedDescriptor],
    ) -> Vec<(&'a str, Result<String, RenderError>)> {
        descriptors
            .iter()
            .map(|named| (named.name.as_str(), self.render(&named.action)))
            .collect()
    }
}

impl SkillTextEngineBuilder {
    /// Use an already constructed lookup provider.
    pub fn lookup(mut self, lookup: impl LookupProvider + Send + Sync + 'static) -> Self {
        self.lookup = Some(Box::new(lookup));
        self
    }

    /// Load a `TableLookup` from a RON file at build time.
    pub fn lookup_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lookup_path = Some(path.into());
        self
    }

    pub fn config(mut self, config: RenderConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the render config from a RON file at build time.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Explicit values win over paths; with neither, the bundled Japanese
    /// table and default config are used.
    pub fn build(self) -> Result<SkillTextEngine, EngineError> {
        let lookup: Box<dyn LookupProvider + Send + Sync> = match (self.lookup, self.lookup_path) {
            (Some(lookup), _) => lookup,
            (None, Some(path)) => Box::new(TableLookup::load_from_ron(&path)?),
            (None, None) => Box::new(TableLookup::ja()?),
        };

        let config = match (self.config, self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => RenderConfig::load_from_ron(&path)?,
            (None, None) => RenderConfig::default(),
        };

        debug!(max_depth = config.max_depth, "built skill text engine");
        Ok(SkillTextEngine { lookup, config })
    }
}
