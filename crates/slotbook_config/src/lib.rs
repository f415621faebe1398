// --- File: crates/slotbook_config/src/lib.rs ---
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub mod env_vars;
pub mod models;

pub use models::*;

/// Loads the layered application configuration.
///
/// Sources, later ones winning:
/// 1. `config/default.{toml,yaml,json}` (optional)
/// 2. `config/<RUN_ENV>.*` with `RUN_ENV` defaulting to `debug` (optional)
/// 3. `SLOTBOOK__SECTION__KEY` environment variables
///
/// `CONFIG_DIR` replaces the `config` directory. `"secret_from_env"` markers are
/// resolved afterwards, then the booking section is validated.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    let dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    load_config_from(Path::new(&dir))
}

/// Same as [`load_config`] with an explicit configuration directory.
pub fn load_config_from(dir: &Path) -> Result<AppConfig, ConfigError> {
    let raw_config: AppConfig = layered(dir)?.try_deserialize()?;
    let config = apply_env_overrides_from_marker(raw_config)?;
    config.booking.validate()?;
    Ok(config)
}

/// Reads only the `logging` section, from the same sources as [`load_config`].
///
/// Meant to run before the subscriber is installed so that whatever
/// [`load_config`] reports afterwards is not lost. A missing section yields the
/// defaults.
pub fn load_logging_config() -> Result<LoggingConfig, ConfigError> {
    ensure_dotenv_loaded();
    let dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    load_logging_config_from(Path::new(&dir))
}

/// Same as [`load_logging_config`] with an explicit configuration directory.
pub fn load_logging_config_from(dir: &Path) -> Result<LoggingConfig, ConfigError> {
    match layered(dir)?.get::<LoggingConfig>("logging") {
        Ok(logging) => Ok(logging),
        Err(ConfigError::NotFound(_)) => Ok(LoggingConfig::default()),
        Err(err) => Err(err),
    }
}

fn layered(dir: &Path) -> Result<Config, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();

    let default_path: PathBuf = dir.join("default");
    let env_path: PathBuf = dir.join(&run_env);
    debug!(
        "Loading config from {} and {} (prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .prefix_separator(env_vars::CONFIG_SEPARATOR)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        )
        .build()
}

/// Applies environment values to every `"secret_from_env"` marker in the config.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialise config: {err}")))?;
    let missing = env_vars::inject_env_vars(&mut json);
    if !missing.is_empty() {
        warn!("Unresolved secrets in configuration: {:?}", missing);
    }
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment once.
///
/// `DOTENV_OVERRIDE` names the file; otherwise a first command-line argument starting
/// with `.env` is used, and finally `.env`. Returns the path that was tried.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
