//! Environment variable handling for the cantacal service.
//!
//! Regular settings use the `CANTACAL__SECTION__KEY` pattern and are picked up
//! by the `config` crate. Secrets keep the names the deployments already use:
//! `CANTAMEN_API_KEY` for the shared key and `CANTAMEN_PWD_<encoded user>` for
//! each user password. Those are merged into [`AppConfig`] by
//! [`apply_env_overrides`] after the layered config has been built.

use std::env;

use tracing::debug;

use crate::models::{AppConfig, UserCredential};

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "CANTACAL";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Environment variable holding the shared Cantamen API key
pub const API_KEY_ENV_VAR: &str = "CANTAMEN_API_KEY";

/// Prefix of the per-user password variables
pub const USER_SECRET_PREFIX: &str = "CANTAMEN_PWD_";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Picks the per-user passwords out of a set of environment variables.
///
/// Empty ids and empty secrets are skipped.
pub fn collect_user_secrets<I>(vars: I) -> Vec<UserCredential>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            let id = key.strip_prefix(USER_SECRET_PREFIX)?;
            if id.is_empty() || value.is_empty() {
                return None;
            }
            Some(UserCredential {
                id: id.to_string(),
                secret: value,
            })
        })
        .collect()
}

/// Merges secrets from the given variables into the config.
///
/// A user present both in the config files and the environment keeps the
/// environment secret.
pub fn merge_env_secrets<I>(mut config: AppConfig, vars: I) -> AppConfig
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: Vec<(String, String)> = vars.into_iter().collect();

    if let Some((_, api_key)) = vars
        .iter()
        .find(|(key, value)| key == API_KEY_ENV_VAR && !value.is_empty())
    {
        config.cantamen.api_key = Some(api_key.clone());
    }

    for user in collect_user_secrets(vars) {
        debug!("Found password variable for user {}", user.id);
        match config.cantamen.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => existing.secret = user.secret,
            None => config.cantamen.users.push(user),
        }
    }

    config
}

/// Applies `CANTAMEN_API_KEY` and `CANTAMEN_PWD_*` from the process environment.
pub fn apply_env_overrides(config: AppConfig) -> AppConfig {
    merge_env_secrets(config, env::vars())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_collect_user_secrets() {
        let users = collect_user_secrets(vars(&[
            ("CANTAMEN_PWD_dXNlcg", "hunter2"),
            ("CANTAMEN_PWD_", "orphan"),
            ("CANTAMEN_PWD_ZW1wdHk", ""),
            ("CANTAMEN_API_KEY", "key"),
            ("PATH", "/usr/bin"),
        ]));

        assert_eq!(
            users,
            vec![UserCredential {
                id: "dXNlcg".to_string(),
                secret: "hunter2".to_string(),
            }]
        );
    }

    #[test]
    fn test_merge_env_secrets_overrides_file_values() {
        let mut config = AppConfig::default();
        config.cantamen.api_key = Some("from-file".to_string());
        config.cantamen.users.push(UserCredential {
            id: "dXNlcg".to_string(),
            secret: "old".to_string(),
        });

        let merged = merge_env_secrets(
            config,
            vars(&[
                ("CANTAMEN_API_KEY", "from-env"),
                ("CANTAMEN_PWD_dXNlcg", "new"),
                ("CANTAMEN_PWD_b3RoZXI", "other"),
            ]),
        );

        assert_eq!(merged.cantamen.api_key.as_deref(), Some("from-env"));
        assert_eq!(merged.cantamen.users.len(), 2);
        assert_eq!(merged.cantamen.users[0].secret, "new");
        assert_eq!(merged.cantamen.users[1].id, "b3RoZXI");
    }

    #[test]
    fn test_empty_api_key_is_ignored() {
        let mut config = AppConfig::default();
        config.cantamen.api_key = Some("from-file".to_string());

        let merged = merge_env_secrets(config, vars(&[("CANTAMEN_API_KEY", "")]));

        assert_eq!(merged.cantamen.api_key.as_deref(), Some("from-file"));
    }
}
