//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`APP_SEARCH__MAX_HITS=50`). Provides helpers to expand
//! `~` and `${VAR}` and to resolve relative paths against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_HITS: usize = 10;
pub const MAX_HITS: usize = 100;
pub const DEFAULT_WINDOW_CHARS: usize = 700;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub search: SearchSettings,
    pub snippet: SnippetSettings,
    pub provider: ProviderSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub corpus_dir: String,
    pub index_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { corpus_dir: "./tdt3".to_string(), index_dir: "./indexdir".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_hits: usize,
    pub max_hits: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { default_hits: DEFAULT_HITS, max_hits: MAX_HITS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetSettings {
    /// Target window length in characters.
    pub window_chars: usize,
}

impl Default for SnippetSettings {
    fn default() -> Self {
        Self { window_chars: DEFAULT_WINDOW_CHARS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Join bare terms of native queries with AND instead of OR.
    pub conjunction_by_default: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self { conjunction_by_default: true }
    }
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.search.max_hits == 0 {
            anyhow::bail!("search.max_hits must be at least 1");
        }
        if !(1..=self.search.max_hits).contains(&self.search.default_hits) {
            anyhow::bail!(
                "search.default_hits must be within 1..={}, got {}",
                self.search.max_hits,
                self.search.default_hits
            );
        }
        if self.snippet.window_chars == 0 {
            anyhow::bail!("snippet.window_chars must be positive");
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self::from_figment(figment);
        config.settings()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    /// Extract and validate the typed settings tree.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(toml: &str) -> Config {
        Config::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Settings::default()))
                .merge(Toml::string(toml)),
        )
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let settings = config_from("").settings().expect("settings");
        assert_eq!(settings.search.default_hits, 10);
        assert_eq!(settings.search.max_hits, 100);
        assert_eq!(settings.snippet.window_chars, 700);
        assert!(settings.provider.conjunction_by_default);
    }

    #[test]
    fn toml_overrides_single_keys() {
        let config = config_from("[snippet]\nwindow_chars = 300\n[data]\nindex_dir = \"/srv/idx\"\n");
        let settings = config.settings().expect("settings");
        assert_eq!(settings.snippet.window_chars, 300);
        assert_eq!(settings.data.index_dir, "/srv/idx");
        assert_eq!(settings.data.corpus_dir, "./tdt3");
    }

    #[test]
    fn default_hits_outside_max_is_rejected() {
        let config = config_from("[search]\ndefault_hits = 20\nmax_hits = 5\n");
        assert!(config.settings().is_err());
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(config_from("[snippet]\nwindow_chars = 0\n").settings().is_err());
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let base = Path::new("/opt/quarry");
        assert_eq!(resolve_with_base(base, "indexdir"), PathBuf::from("/opt/quarry/indexdir"));
        assert_eq!(resolve_with_base(base, "/abs/idx"), PathBuf::from("/abs/idx"));
    }
}
