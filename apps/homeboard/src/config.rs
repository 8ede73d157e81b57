//! Server configuration, resolved from CLI flags and `HOMEBOARD_*`
//! environment variables.

use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 7575;
pub const DEFAULT_RATE_LIMIT: u32 = 50;

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to bind.
    #[arg(long, env = "HOMEBOARD_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, short, env = "HOMEBOARD_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Bearer key required for mutations and private boards. Without it the
    /// server runs in open mode.
    #[arg(long, env = "HOMEBOARD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Global request budget per second. Zero disables rate limiting.
    #[arg(long, env = "HOMEBOARD_RATE_LIMIT", default_value_t = DEFAULT_RATE_LIMIT)]
    pub rate_limit: u32,

    /// Allowed CORS origins, comma separated. Empty allows none.
    #[arg(long, env = "HOMEBOARD_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Directory of legacy `<name>.json` board configs.
    #[arg(long, env = "HOMEBOARD_CONFIGS_DIR", default_value = "data/configs")]
    pub configs_dir: PathBuf,

    /// Create the example board when the database has no boards.
    #[arg(long, env = "HOMEBOARD_SEED_EXAMPLE")]
    pub seed_example: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: Vec::new(),
            configs_dir: PathBuf::from("data/configs"),
            seed_example: false,
        }
    }
}
