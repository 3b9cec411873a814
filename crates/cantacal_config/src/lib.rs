use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;

pub mod env_vars;
pub mod models;
pub use models::*;

/// Loads the layered configuration:
/// `config/default`, then `config/{RUN_ENV}`, then `CANTACAL__*` variables,
/// and finally the Cantamen secrets from the environment.
///
/// `CONFIG_DIR` points the loader at a different directory.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    tracing::debug!("config default_path: {}", default_path.display());
    tracing::debug!("config env_path: {}", env_path.display());

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    Ok(env_vars::apply_env_overrides(raw_config))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// `DOTENV_OVERRIDE` selects another file than `.env`. A missing file is not
/// an error.
pub fn ensure_dotenv_loaded() {
    INIT_DOTENV.get_or_init(|| {
        let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());
        if dotenv::from_filename(&dotenv_path).is_ok() {
            tracing::debug!("Loaded environment from {}", dotenv_path);
        }
    });
}
