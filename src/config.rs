//! Runtime configuration
//!
//! Settings come from the environment; command-line flags layer on top in
//! the binary.

use std::env;
use std::path::PathBuf;

use crate::executor::SpawnOptions;

/// Prompt printed before each line in interactive mode
pub const DEFAULT_PROMPT: &str = ": ";

pub const PROMPT_VAR: &str = "FORKSH_PROMPT";
pub const BG_INTERRUPTIBLE_VAR: &str = "FORKSH_BG_INTERRUPTIBLE";
pub const LOG_VAR: &str = "FORKSH_LOG";

/// Name of the startup file in the home directory
pub const RC_FILE: &str = ".forkshrc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    /// Reset SIGINT to default in background children as well
    pub interruptible_background: bool,
    /// Startup file run before the first prompt
    pub rc_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: DEFAULT_PROMPT.to_string(),
            interruptible_background: false,
            rc_file: None,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Home directory from `$HOME`
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").filter(|h| !h.is_empty()).map(PathBuf::from)
}

impl Config {
    /// Build from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(prompt) = lookup(PROMPT_VAR) {
            config.prompt = prompt;
        }
        if let Some(flag) = lookup(BG_INTERRUPTIBLE_VAR) {
            config.interruptible_background = is_truthy(&flag);
        }
        config.rc_file = home_dir().map(|home| home.join(RC_FILE));
        config
    }

    pub fn spawn_options(&self) -> SpawnOptions {
        SpawnOptions {
            interruptible_background: self.interruptible_background,
        }
    }
}
