//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default bind address (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: u16 = 8609;

/// Default audit log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "servidor_logs.txt";

/// Default entropy backend for measurements
pub const DEFAULT_BACKEND: &str = "pseudo";

/// Default server URL used by the client
pub const DEFAULT_CLIENT_URL: &str = "http://127.0.0.1:8609";

/// Default client request timeout in milliseconds
pub const DEFAULT_CLIENT_TIMEOUT_MS: u64 = 2000;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "qbit-server";
