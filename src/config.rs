use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "incident_extractor";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    format!("info,{APP_NAME}=debug")
}

/// Runtime settings for the extractor and its HTTP front.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    pub ollama_host: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub bind_addr: SocketAddr,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            bind_addr: default_bind_addr(),
        }
    }
}

impl ExtractorConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset;
    /// values that fail to parse fall back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            ollama_host: get("OLLAMA_HOST").unwrap_or(defaults.ollama_host),
            model: get("INCIDENT_MODEL").unwrap_or(defaults.model),
            temperature: parse_or(
                "INCIDENT_TEMPERATURE",
                get("INCIDENT_TEMPERATURE"),
                defaults.temperature,
            ),
            timeout_secs: parse_or(
                "OLLAMA_TIMEOUT_SECS",
                get("OLLAMA_TIMEOUT_SECS"),
                defaults.timeout_secs,
            ),
            bind_addr: parse_or(
                "INCIDENT_BIND_ADDR",
                get("INCIDENT_BIND_ADDR"),
                defaults.bind_addr,
            ),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Debug,
{
    match raw {
        None => default,
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    fallback = ?default,
                    "Invalid setting, using default"
                );
                default
            }
        },
    }
}
