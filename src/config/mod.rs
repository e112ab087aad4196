use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 4800;
const DEFAULT_API_BASE_URL: &str = "https://ai.advisord.io";
const DEFAULT_MODEL: &str = "apex-text-2";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_ATTEMPTS: u32 = 2;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── AiConfig ─────────────────────────────────────────────────────────────────

/// Hosted-model gateway configuration (`[ai]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AiConfig {
    /// Gateway base URL. Override with `ADVISORD_AI_URL`.
    pub api_base_url: String,
    /// Model identifier sent with every generate request.
    pub model: String,
    /// Upper bound on generated tokens per request.
    pub max_tokens: u32,
    /// Request timeout in seconds. A hung upstream must not pin a handler.
    pub timeout_secs: u64,
    /// Total attempts per flow invocation. Attempt 2 only happens when the
    /// model replied but the reply failed the declared output schema;
    /// service failures are never retried. Minimum 1.
    pub max_attempts: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

// ─── AppConfig ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    /// Log level filter string, e.g. "debug" or "info,advisord=trace".
    pub log: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
    /// Bind address for the REST server (default: "127.0.0.1").
    pub bind_address: String,
    /// API key for the hosted model gateway (`ADVISORD_AI_KEY` env var).
    /// None means AI flow endpoints answer with a service-call error.
    pub ai_api_key: Option<String>,
    /// Hosted model gateway settings.
    pub ai: AiConfig,
}

impl AppConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let log_format = std::env::var("ADVISORD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let bind_address = bind_address
            .or(std::env::var("ADVISORD_BIND").ok().filter(|s| !s.is_empty()))
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let ai_api_key = std::env::var("ADVISORD_AI_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.ai_api_key);

        let mut ai = toml.ai.unwrap_or_default();
        if let Ok(url) = std::env::var("ADVISORD_AI_URL") {
            if !url.is_empty() {
                ai.api_base_url = url;
            }
        }
        if ai.max_attempts == 0 {
            warn!("[ai] max_attempts = 0 is invalid — using 1");
            ai.max_attempts = 1;
        }

        Self {
            port,
            data_dir,
            log,
            log_format,
            bind_address,
            ai_api_key,
            ai,
        }
    }
}

// ─── TOML file layer ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    /// REST server port (default: 4800).
    port: Option<u16>,
    /// Log level filter string, e.g. "debug", "info,advisord=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json".
    log_format: Option<String>,
    /// Bind address for the REST server (default: "127.0.0.1"; use "0.0.0.0" for LAN access).
    bind_address: Option<String>,
    /// Gateway API key. Prefer the `ADVISORD_AI_KEY` env var over the file.
    ai_api_key: Option<String>,
    /// Hosted model gateway configuration (`[ai]`).
    ai: Option<AiConfig>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let content = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(path = %path.display(), "config.toml is invalid, ignoring: {e}");
            None
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/advisord
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("advisord");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/advisord or ~/.local/share/advisord
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("advisord");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("advisord");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\advisord
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("advisord");
        }
    }
    // Fallback
    PathBuf::from(".advisord")
}

// ─── Tests ────────────────────────────────────────────────────────────────────
