// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./casebook.toml` > `~/.config/casebook/casebook.toml` > `/etc/casebook/casebook.toml`
//! with environment variable overrides via `CASEBOOK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CasebookConfig;

/// System-wide config file location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/casebook/casebook.toml";

/// Local config file name, resolved against the working directory.
pub const LOCAL_CONFIG_FILE: &str = "casebook.toml";

/// Section prefixes recognized in `CASEBOOK_*` variable names.
///
/// Ordered so that no prefix shadows a longer one.
const ENV_SECTIONS: &[&str] = &[
    "channel_talk",
    "prometheus",
    "gateway",
    "storage",
    "server",
    "openai",
    "notion",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/casebook/casebook.toml` (system-wide)
/// 3. `~/.config/casebook/casebook.toml` (user XDG config)
/// 4. `./casebook.toml` (local directory)
/// 5. `CASEBOOK_*` environment variables
pub fn load_config() -> Result<CasebookConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used by tests and by `--config`.
pub fn load_config_from_str(toml_content: &str) -> Result<CasebookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CasebookConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CasebookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CasebookConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CasebookConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `~/.config/casebook/casebook.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("casebook").join(LOCAL_CONFIG_FILE))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because both section and key
/// names contain underscores: `CASEBOOK_CHANNEL_TALK_API_KEY` must map to
/// `channel_talk.api_key`, not `channel.talk.api.key`.
fn env_provider() -> Env {
    Env::prefixed("CASEBOOK_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
