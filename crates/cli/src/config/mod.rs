use std::time::Duration;

use clap::Args;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/finman.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub session_path: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            timeout_secs: 30,
            session_path: "config/finman_session.json".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8000/api).
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override where the session tokens are kept.
    #[arg(long, global = true)]
    pub session_path: Option<String>,
    /// Override request timeout, in seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
    /// Override log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

/// Defaults, then the TOML file, then `FINMAN_*` variables, then flags.
pub fn load(args: &GlobalArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("FINMAN"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(session_path) = &args.session_path {
        settings.session_path = session_path.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.timeout_secs = timeout_secs;
    }
    if let Some(log_level) = &args.log_level {
        settings.log_level = log_level.clone();
    }

    Ok(settings)
}
