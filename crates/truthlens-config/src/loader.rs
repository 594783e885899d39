// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/truthlens/truthlens.toml`, then
//! `~/.config/truthlens/truthlens.toml`, then `./truthlens.toml`, then
//! `TRUTHLENS_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TruthlensConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/truthlens/truthlens.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "truthlens.toml";

/// Sections whose keys may be overridden from the environment.
const ENV_SECTIONS: [&str; 6] = [
    "client",
    "api",
    "storage",
    "analysis",
    "notifications",
    "security",
];

/// Per-user config file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("truthlens").join("truthlens.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<TruthlensConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TruthlensConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TruthlensConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TruthlensConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TruthlensConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TruthlensConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Environment provider mapping `TRUTHLENS_<SECTION>_<KEY>` to `section.key`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `TRUTHLENS_API_BASE_URL` maps to `api.base_url`.
fn env_provider() -> Env {
    Env::prefixed("TRUTHLENS_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("api_base_url"), "api.base_url");
        assert_eq!(map_env_key("notifications_ttl_secs"), "notifications.ttl_secs");
        assert_eq!(map_env_key("security_require_tls"), "security.require_tls");
        assert_eq!(map_env_key("client_log_level"), "client.log_level");
    }

    #[test]
    fn unknown_section_passes_through() {
        assert_eq!(map_env_key("bogus_key"), "bogus_key");
    }
}
