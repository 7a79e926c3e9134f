//! Gallery configuration.
//!
//! Loaded from a single `gallery.toml` (default path, overridable with
//! `--config`). A missing file means stock defaults. User files are sparse:
//! they are merged key-by-key over the stock defaults, then deserialized with
//! unknown keys rejected, then validated.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [sources]
//! base_url = "http://localhost:8080"        # Relative locations are joined onto this
//! github = "/proxy/github"
//! boardgamegeek = "/proxy/boardgamegeek"
//! cults3d = "/proxy/cults3d"
//! boardgamegeek_detail = "/xmlapi/boardgamegeek/{id}"
//!
//! [assets]
//! placeholder = "/images/default.png"
//! github_logo = "/images/github.png"
//! github_logo_alt = "Github Logo"
//!
//! [page]
//! title = "Projects"
//! # template = "card.html"                 # Relative to this config file
//!
//! [http]
//! user_agent = "project-gallery/<version>"
//! # timeout_secs = 30                       # Omit for no timeout
//!
//! [colors.light]
//! background = "#ffffff"
//! # ...
//! ```

use crate::fetch;
use crate::gallery::SourceLocations;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Placeholder in `sources.boardgamegeek_detail` replaced by the game id.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Where each source page is fetched from.
    pub sources: SourcesConfig,
    /// Local images used by the cards.
    pub assets: AssetsConfig,
    /// Page shell settings.
    pub page: PageConfig,
    /// HTTP client settings.
    pub http: HttpConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl GalleryConfig {
    /// Validate values that deserialization alone cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = Url::parse(&self.sources.base_url).map_err(|e| {
            ConfigError::Validation(format!(
                "sources.base_url {:?} is not a valid URL: {e}",
                self.sources.base_url
            ))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(
                "sources.base_url must be an http:// or https:// address".into(),
            ));
        }
        if !self.sources.boardgamegeek_detail.contains(ID_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "sources.boardgamegeek_detail must contain {ID_PLACEHOLDER}"
            )));
        }
        if self.http.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.assets.placeholder.trim().is_empty() {
            return Err(ConfigError::Validation(
                "assets.placeholder must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Source page locations.
///
/// Each location is either an absolute `http(s)://` address or a path joined
/// onto `base_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesConfig {
    pub base_url: String,
    pub github: String,
    pub boardgamegeek: String,
    pub cults3d: String,
    /// Per-game XML detail document; `{id}` is replaced with the game id.
    pub boardgamegeek_detail: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            github: "/proxy/github".to_string(),
            boardgamegeek: "/proxy/boardgamegeek".to_string(),
            cults3d: "/proxy/cults3d".to_string(),
            boardgamegeek_detail: "/xmlapi/boardgamegeek/{id}".to_string(),
        }
    }
}

impl SourcesConfig {
    /// Absolute location for `location`.
    ///
    /// Plain string joining rather than URL resolution, so the `{id}`
    /// placeholder survives unencoded.
    pub fn resolve(&self, location: &str) -> String {
        if fetch::is_network_location(location) {
            location.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                location.trim_start_matches('/')
            )
        }
    }

    /// Resolved locations for the assembler.
    pub fn locations(&self) -> SourceLocations {
        SourceLocations {
            github: self.resolve(&self.github),
            boardgamegeek: self.resolve(&self.boardgamegeek),
            cults3d: self.resolve(&self.cults3d),
            boardgamegeek_detail: self.resolve(&self.boardgamegeek_detail),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Image every feature image shows before its real sources load.
    pub placeholder: String,
    /// Branding image used for every GitHub project.
    pub github_logo: String,
    pub github_logo_alt: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            placeholder: "/images/default.png".to_string(),
            github_logo: "/images/github.png".to_string(),
            github_logo_alt: "Github Logo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub title: String,
    /// Custom card template (HTML). Relative paths are resolved against the
    /// directory holding the config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Projects".to_string(),
            template: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Per-request timeout. Absent means requests may wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("project-gallery/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Descriptions and footer text.
    pub text_muted: String,
    /// Card background.
    pub card: String,
    pub border: String,
    pub link: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f6f6f4".to_string(),
            text: "#1b1b1b".to_string(),
            text_muted: "#5f5f5f".to_string(),
            card: "#ffffff".to_string(),
            border: "#dddddd".to_string(),
            link: "#2a5db0".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#111214".to_string(),
            text: "#ececec".to_string(),
            text_muted: "#a0a0a0".to_string(),
            card: "#1c1d21".to_string(),
            border: "#2e3036".to_string(),
            link: "#8ab4f8".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Loading and merging
// =============================================================================

/// Stock defaults as a TOML table, the base layer for user overrides.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, deserialize, validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(stock_defaults_value(), ov),
        None => stock_defaults_value(),
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path`, falling back to defaults when it does not
/// exist. A relative `page.template` is anchored to the file's directory.
pub fn load_config(path: &Path) -> Result<GalleryConfig, ConfigError> {
    if !path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    let mut config = resolve_config(Some(overlay))?;

    if let Some(template) = config.page.template.as_mut() {
        if template.is_relative() {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            *template = dir.join(&*template);
        }
    }
    Ok(config)
}

/// Fully commented stock config, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Project Gallery Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Sources
# ---------------------------------------------------------------------------
[sources]
# Relative locations below are joined onto this address.
base_url = "http://localhost:8080"

# Listing pages, one per site. Absolute http(s):// addresses are used as is.
github = "/proxy/github"
boardgamegeek = "/proxy/boardgamegeek"
cults3d = "/proxy/cults3d"

# Per-game XML document holding the full-size image. {id} is replaced with
# the numeric id taken from the game's link.
boardgamegeek_detail = "/xmlapi/boardgamegeek/{id}"

# ---------------------------------------------------------------------------
# Assets
# ---------------------------------------------------------------------------
[assets]
# Shown in every card until the real image has loaded.
placeholder = "/images/default.png"

# GitHub projects always show this logo instead of page imagery.
github_logo = "/images/github.png"
github_logo_alt = "Github Logo"

# ---------------------------------------------------------------------------
# Page
# ---------------------------------------------------------------------------
[page]
title = "Projects"

# Custom card template (HTML), relative to this file. Slots are found by
# class: card-heading, card-description, card-link, card-language,
# card-language-colour, card-logo, card-feature-image.
# template = "card.html"

# ---------------------------------------------------------------------------
# HTTP
# ---------------------------------------------------------------------------
[http]
# Defaults to "project-gallery/<version>".
# user_agent = "my-portfolio-bot"

# Per-request timeout in seconds. Omit to wait indefinitely.
# timeout_secs = 30

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#f6f6f4"
text = "#1b1b1b"
text_muted = "#5f5f5f"
card = "#ffffff"
border = "#dddddd"
link = "#2a5db0"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#111214"
text = "#ececec"
text_muted = "#a0a0a0"
card = "#1c1d21"
border = "#2e3036"
link = "#8ab4f8"
"##
}

/// CSS custom properties from the color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    let vars = |scheme: &ColorScheme| {
        format!(
            "--color-bg: {}; --color-text: {}; --color-text-muted: {}; \
             --color-card: {}; --color-border: {}; --color-link: {};",
            scheme.background, scheme.text, scheme.text_muted, scheme.card, scheme.border, scheme.link
        )
    };
    format!(
        ":root {{ {} }}\n@media (prefers-color-scheme: dark) {{ :root {{ {} }} }}",
        vars(&colors.light),
        vars(&colors.dark)
    )
}
