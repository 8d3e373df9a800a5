use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ServerError, ServerResult};
use crate::server::auth::PasswordHash;

pub const DEFAULT_PORT: u16 = 1111;
pub const DEFAULT_INDEX_FILENAME: &str = "media_index.json";
pub const DEFAULT_COOKIE_NAME: &str = "media_session";
pub const ENV_PREFIX: &str = "MEDIASERVER_";

/// Runtime configuration.
///
/// Sources are layered: built-in defaults, then an optional JSON file, then
/// `MEDIASERVER_*` environment variables, then command line flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory that is walked and served.
    pub media_root: PathBuf,
    /// Location of the persisted index.
    pub index_file: PathBuf,
    /// Directory holding `index.html` and the other front-end assets.
    pub static_dir: PathBuf,
    /// Shared secret in plain text; hashed once at startup.
    pub password: Option<String>,
    /// Hex SHA-256 of the shared secret. Takes precedence over `password`.
    pub password_sha256: Option<String>,
    pub session_ttl_secs: u64,
    pub cookie_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            media_root: PathBuf::from("."),
            index_file: PathBuf::from(DEFAULT_INDEX_FILENAME),
            static_dir: PathBuf::from("static"),
            password: None,
            password_sha256: None,
            session_ttl_secs: 86_400,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

impl ServerConfig {
    /// Reads a JSON config file. Fields absent from the file keep their defaults.
    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let data = std::fs::read_to_string(path).map_err(|error| {
            ServerError::Config(format!(
                "failed to read config file {}: {error}",
                path.display()
            ))
        })?;
        serde_json::from_str(&data).map_err(|error| {
            ServerError::Config(format!(
                "failed to parse config file {}: {error}",
                path.display()
            ))
        })
    }

    /// Overrides fields from the process environment.
    pub fn apply_env(&mut self) -> ServerResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overrides fields from `lookup`, which maps variable names to values.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> ServerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(port) = var("PORT") {
            self.port = port.trim().parse().map_err(|_| {
                ServerError::Config(format!("invalid {ENV_PREFIX}PORT: {port}"))
            })?;
        }
        if let Some(root) = var("MEDIA_ROOT") {
            self.media_root = PathBuf::from(root);
        }
        if let Some(index_file) = var("INDEX_FILE") {
            self.index_file = PathBuf::from(index_file);
        }
        if let Some(static_dir) = var("STATIC_DIR") {
            self.static_dir = PathBuf::from(static_dir);
        }
        if let Some(password) = var("PASSWORD") {
            self.password = Some(password);
        }
        if let Some(hash) = var("PASSWORD_SHA256") {
            self.password_sha256 = Some(hash);
        }
        if let Some(ttl) = var("SESSION_TTL_SECS") {
            self.session_ttl_secs = ttl.trim().parse().map_err(|_| {
                ServerError::Config(format!("invalid {ENV_PREFIX}SESSION_TTL_SECS: {ttl}"))
            })?;
        }
        Ok(())
    }

    /// Hash of the shared secret.
    pub fn credential(&self) -> ServerResult<PasswordHash> {
        if let Some(hex) = self.password_sha256.as_deref() {
            return PasswordHash::from_hex(hex).ok_or_else(|| {
                ServerError::Config("password_sha256 must be 64 hex characters".to_string())
            });
        }
        match self.password.as_deref() {
            Some(password) => Ok(PasswordHash::from_password(password)),
            None => Err(ServerError::Config(format!(
                "no password configured; set {ENV_PREFIX}PASSWORD or password_sha256"
            ))),
        }
    }

    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                ServerError::Config(format!("invalid listen address {}:{}", self.host, self.port))
            })
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
