use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use clap::Parser;
use std::fs;
use tracing::{info, warn};

/// Configuration for the job marketplace server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Directory where uploaded photos and logos are stored
    pub media_root: String,
    /// URL prefix under which uploaded media is served
    pub media_url: String,
    /// Directory for rolling log files; logs only go to stdout when unset
    pub log_dir: Option<String>,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    /// Optional update for database URL
    #[serde(default)]
    pub database_url: Option<String>,
    /// Optional update for the listening port
    #[serde(default)]
    pub port: Option<u16>,
    /// Optional update for the media directory
    #[serde(default)]
    pub media_root: Option<String>,
    /// Optional update for the media URL prefix
    #[serde(default)]
    pub media_url: Option<String>,
    /// Optional update for the log directory
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Server URL used by the CLI client (ignored by the server)
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug)]
#[clap(name = "jobmarket", about = "Job marketplace API server")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Port to listen on
    #[clap(long, env = "JOBMARKET_PORT")]
    pub port: Option<u16>,

    /// Directory for uploaded media
    #[clap(long, env = "MEDIA_ROOT")]
    pub media_root: Option<String>,

    /// Directory for log files
    #[clap(long, env = "JOBMARKET_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Debug mode
    #[clap(long, env = "JOBMARKET_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[clap(long, env = "JOBMARKET_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            port: update.port.unwrap_or(self.port),
            media_root: update.media_root.unwrap_or(self.media_root),
            media_url: update.media_url.unwrap_or(self.media_url),
            log_dir: update.log_dir.or(self.log_dir),
        }
    }

    /// Returns the media URL prefix normalised to start and end with `/`
    pub fn media_url_prefix(&self) -> String {
        let trimmed = self.media_url.trim_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        }
    }
}

/// Returns the base (default) configuration
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let (database_url, media_root) = match config_path {
        Some(path) => (
            path.join("jobmarket.db").to_string_lossy().to_string(),
            path.join("media").to_string_lossy().to_string(),
        ),
        None => ("jobmarket.db".to_string(), "media".to_string()),
    };

    Config {
        database_url,
        port: 8000,
        media_root,
        media_url: "/media/".to_string(),
        log_dir: None,
    }
}

/// Loads configuration from a TOML file
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            },
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        port: args.port,
        media_root: args.media_root,
        media_url: None,
        log_dir: args.log_dir,
        server_url: None,
    }
}

/// Returns the XDG config directory for the application, if it exists
pub fn get_config_dir_path() -> Option<PathBuf> {
    let Some(proj_dirs) = ProjectDirs::from("com", "jobmarket", "jobmarket") else {
        warn!("Could not determine XDG config directory, skipping config file");
        return None;
    };

    let path = proj_dirs.config_dir().to_path_buf();
    if !path.exists() {
        info!("Config path not found at {:?}, using defaults", path);
        return None;
    }
    Some(path)
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: CliArgs) -> Config {
    let config_path = get_config_dir_path();

    let base = base_config(config_path.clone());

    let config = base
        .apply_update(config_from_file(config_path.map(|p| p.join("config.toml"))).unwrap_or_default())
        .apply_update(config_from_args(args));

    info!("Final configuration: database_url={}, port={}, media_root={}",
          config.database_url, config.port, config.media_root);

    config
}

#[cfg(test)]
mod tests;
