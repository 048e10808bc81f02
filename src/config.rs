use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prompt: String,
    pub log_level: String,
    pub on_resource_error: ResourceErrorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        ConfigLoader::default_config()
    }
}

/// What the interpreter does when a pipe or child process cannot be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceErrorPolicy {
    /// Stop the interpreter with a failure status.
    Fatal,
    /// Report the error and prompt again.
    Recover,
}

impl FromStr for ResourceErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fatal" => Ok(ResourceErrorPolicy::Fatal),
            "recover" => Ok(ResourceErrorPolicy::Recover),
            other => Err(format!("expected 'fatal' or 'recover', got '{}'", other)),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn default_config() -> Config {
        Config {
            prompt: "osh> ".to_string(),
            log_level: "warn".to_string(),
            on_resource_error: ResourceErrorPolicy::Fatal,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let src = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::load_from_str(&src)
    }

    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut config = Self::default_config();

        for (lineno, line) in src.lines().enumerate() {
            let lineno = lineno + 1;
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse { line: lineno, msg: format!("no '=' found: {}", line) });
            };

            match key.trim() {
                // Taken verbatim so a trailing space survives
                "prompt" => config.prompt = value.to_string(),
                "log_level" => config.log_level = value.trim().to_string(),
                "on_resource_error" => {
                    config.on_resource_error = value
                        .trim()
                        .parse()
                        .map_err(|msg| ConfigError::Parse { line: lineno, msg })?;
                }
                k => {
                    return Err(ConfigError::Parse { line: lineno, msg: format!("unknown key: {}", k) });
                }
            }
        }

        Ok(config)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("config line {line}: {msg}")]
    Parse { line: usize, msg: String },
}
