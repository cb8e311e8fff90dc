//! Server configuration read from environment variables.
//!
//! - `EMIGRAPH_DB_PATH`: SQLite database file path (default: "emigraph.db");
//!   `:memory:` keeps graphs in process memory
//! - `EMIGRAPH_PORT`: server listen port (default: "5000")
//! - `EMIGRAPH_REVALIDATE_ON_READ`: re-run the validator on loads
//!   (default: "true")

/// Database path that selects the in-memory store.
pub const IN_MEMORY: &str = ":memory:";

/// Settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: String,
    pub port: u16,
    pub revalidate_on_read: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            db_path: "emigraph.db".to_string(),
            port: 5000,
            revalidate_on_read: true,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    /// for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut config = ServerConfig::default();
        if let Some(path) = lookup("EMIGRAPH_DB_PATH") {
            config.db_path = path;
        }
        if let Some(port) = lookup("EMIGRAPH_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| format!("EMIGRAPH_PORT is not a port number: {port}"))?;
        }
        if let Some(flag) = lookup("EMIGRAPH_REVALIDATE_ON_READ") {
            config.revalidate_on_read = parse_flag(&flag)
                .ok_or_else(|| format!("EMIGRAPH_REVALIDATE_ON_READ must be true or false: {flag}"))?;
        }
        Ok(config)
    }

    pub fn in_memory(&self) -> bool {
        self.db_path == IN_MEMORY
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
