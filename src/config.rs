use crate::app_dirs::AppDirs;
use crate::content::{CodeLanguage, Difficulty};
use crate::error::ConfigResult;
use crate::mode::{Completion, ModeFlag, ModeSet};
use crate::typing_policy::OvertypePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_WORDS: usize = 25;
pub const DEFAULT_SECS: u32 = 30;
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// User-facing settings, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub modes: ModeSet,
    pub words: usize,
    pub time: u32,
    pub language: String,
    pub difficulty: Difficulty,
    pub code_language: CodeLanguage,
    pub include_numbers: bool,
    pub include_punctuation: bool,
    pub overtype: OvertypePolicy,
    pub debounce_ms: u64,
    pub custom_text: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modes: ModeSet::from_flags([ModeFlag::Words]),
            words: DEFAULT_WORDS,
            time: DEFAULT_SECS,
            language: "english".to_string(),
            difficulty: Difficulty::Easy,
            code_language: CodeLanguage::Python,
            include_numbers: false,
            include_punctuation: false,
            overtype: OvertypePolicy::Reject,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            custom_text: None,
        }
    }
}

/// Settings the engine is constructed with. Owned by the engine; nothing
/// reads configuration from ambient state.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub modes: ModeSet,
    pub words: usize,
    pub time: u32,
    pub language: String,
    pub difficulty: Difficulty,
    pub code_language: CodeLanguage,
    pub include_numbers: bool,
    pub include_punctuation: bool,
    pub overtype: OvertypePolicy,
    pub debounce_ms: u64,
    pub custom_text: Option<String>,
}

impl EngineConfig {
    /// Countdown length in seconds, `None` when the mode has no limit.
    pub fn duration_limit(&self) -> Option<u32> {
        match self.modes.completion() {
            Completion::Countdown => Some(self.time),
            Completion::Length | Completion::Never => None,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EngineConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            modes: cfg.modes.clone(),
            words: cfg.words.max(1),
            time: cfg.time.max(1),
            language: cfg.language.clone(),
            difficulty: cfg.difficulty,
            code_language: cfg.code_language,
            include_numbers: cfg.include_numbers,
            include_punctuation: cfg.include_punctuation,
            overtype: cfg.overtype,
            debounce_ms: cfg.debounce_ms,
            custom_text: cfg.custom_text.clone(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> ConfigResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files fall back to defaults.
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|err| {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring invalid config");
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
