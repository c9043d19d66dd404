//! Loader for `folio.yaml` with environment overlays.
//!
//! Sources are merged in the order they are added, with `FOLIO_`-prefixed
//! environment variables (nested keys separated by `__`) applied on top.
//! String values may reference other variables as `${VAR}`; references are
//! expanded recursively up to a fixed depth after merging.
//!
//! Every section is optional. An empty document yields the built-in
//! portfolio with the default typing speed.
use config::{Config, ConfigError, Environment, File, FileFormat};
use folio_common::observability::LogFormat;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// File name looked up by [`FolioConfigLoader::with_default_locations`].
pub const DEFAULT_FILE_NAME: &str = "folio.yaml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub version: Option<String>,
    pub profile: ProfileConfig,
    pub typing: TypingConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Overrides for the identity and canned content of the terminal.
/// `None` keeps the built-in value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub username: Option<String>,
    pub hostname: Option<String>,
    pub cwd: Option<String>,
    pub links: LinksConfig,
    pub welcome: Option<Vec<String>>,
    pub about: Option<Vec<String>>,
    pub projects: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub contact: Option<Vec<String>>,
    pub listing: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub cv: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Delay between revealed characters.
    pub char_delay_ms: u64,
    /// The pause after a finished line is `char_delay_ms * line_pause_factor`.
    pub line_pause_factor: u32,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            char_delay_ms: 40,
            line_pause_factor: 20,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Redraw cadence of the terminal surface.
    pub frame_ms: u64,
    /// Mailbox capacity of the UI actor.
    pub mailbox: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            frame_ms: 80,
            mailbox: 256,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub filter: String,
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            filter: "info".into(),
            stderr: false,
        }
    }
}

impl FolioConfig {
    /// Reject values that would stall or spin the UI.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.typing.char_delay_ms == 0 {
            return Err(ConfigError::Message(
                "typing.char_delay_ms must be greater than zero".into(),
            ));
        }
        if self.ui.frame_ms == 0 {
            return Err(ConfigError::Message(
                "ui.frame_ms must be greater than zero".into(),
            ));
        }
        if self.ui.mailbox == 0 {
            return Err(ConfigError::Message(
                "ui.mailbox must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) if s.contains('$') => {
            let mut cur = std::mem::take(s);
            for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                let expanded = match shellexpand::env(&cur) {
                    Ok(cow) => cow.into_owned(),
                    Err(_) => break,
                };
                if expanded == cur {
                    break;
                }
                cur = expanded;
            }
            *s = cur;
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder over the `config` crate (YAML sources + env overrides).
pub struct FolioConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    // Environment overrides must be added last so they win over every file.
    env: Environment,
}

impl Default for FolioConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FolioConfigLoader {
    /// Start with no files and `FOLIO_` environment overrides.
    ///
    /// ```
    /// use folio_config::FolioConfigLoader;
    ///
    /// let config = FolioConfigLoader::new()
    ///     .with_yaml_str("version: '1'\ntyping:\n  char_delay_ms: 10")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.typing.char_delay_ms, 10);
    /// assert_eq!(config.typing.line_pause_factor, 20);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env: Environment::with_prefix("FOLIO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        }
    }

    /// Attach a file that must exist; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Look for `folio.yaml` in the user config directory and then the
    /// working directory. Both are optional; the later one wins.
    pub fn with_default_locations(mut self) -> Self {
        if let Some(dir) = dirs::config_dir() {
            self = self.with_optional_file(dir.join("folio").join(DEFAULT_FILE_NAME));
        }
        self.with_optional_file(DEFAULT_FILE_NAME)
    }

    /// Merge an inline YAML snippet (tests and `--exec` presets).
    ///
    /// ```
    /// use folio_config::FolioConfigLoader;
    ///
    /// let cfg = FolioConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// profile:
    ///   username: "ada"
    ///   links:
    ///     github: "https://github.com/ada"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.profile.username.as_deref(), Some("ada"));
    /// assert_eq!(cfg.profile.links.github.as_deref(), Some("https://github.com/ada"));
    /// assert!(cfg.profile.links.cv.is_none());
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` references, and deserialize.
    ///
    /// ```
    /// use folio_config::FolioConfigLoader;
    ///
    /// unsafe { std::env::set_var("FOLIO_DOC_HANDLE", "octocat"); }
    ///
    /// let config = FolioConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// profile:
    ///   links:
    ///     github: "https://github.com/${FOLIO_DOC_HANDLE}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(
    ///     config.profile.links.github.as_deref(),
    ///     Some("https://github.com/octocat")
    /// );
    ///
    /// unsafe { std::env::remove_var("FOLIO_DOC_HANDLE"); }
    /// ```
    pub fn load(self) -> Result<FolioConfig, ConfigError> {
        let cfg = self.builder.add_source(self.env).build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: FolioConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;
        Ok(typed)
    }
}
