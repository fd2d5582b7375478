use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DESIRED_TOTAL: usize = 7000;
pub const DEFAULT_MAX_PER_REQUEST: usize = 5000;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "users_desired")]
    pub desired_total: Option<usize>,
    #[serde(alias = "max_users_per_fetch")]
    pub max_per_request: Option<usize>,
    pub seed: Option<String>,
    pub fields: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<usize>,
    pub workers: Option<usize>,
    pub proxy: Option<String>,
    pub filter: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub detail_dir: Option<String>,
    pub width: Option<usize>,
    pub no_color: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write config '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .into_iter()
        .filter_map(env::var_os)
        .find(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".userbook").join("config.yml"))
}

/// Resolves a leading `~` against the home directory. `~user` forms are
/// left alone.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(path),
    };
    match home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).display().to_string()
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if allow_missing {
                return Ok(ConfigFile::default());
            }
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn default_config_yaml() -> String {
    r#"# Userbook config
#
# Location (default):
#   ~/.userbook/config.yml

# How many users to collect, and the most the API hands out per request
desired_total: 7000
max_per_request: 5000

# API
base_url: https://randomuser.me/api/
fields: name,email,location,picture,phone,cell,dob
seed: abc
timeout: 30
# proxy: http://127.0.0.1:8080

# Runtime
workers: 4

# Listing
# filter: ann
width: 100

# Output (optional)
# output: ./users.html
# output_format: html
# detail_dir: ./details

# Output styling
no_color: false
"#
    .to_string()
}

/// Writes the commented default config unless `path` already exists.
/// Returns whether a file was written.
pub fn ensure_default_config_file(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, default_config_yaml()).map_err(write_err)?;
    Ok(true)
}
