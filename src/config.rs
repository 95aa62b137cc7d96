//! Configuration management for DocQA Server

use std::env;
use std::path::PathBuf;

use serde::Deserialize;

use crate::chat::{ChatProvider, ChatServiceConfig};
use crate::ocr::{OcrProvider, OcrServiceConfig};

/// Default maximum upload size: 25MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub raster: RasterConfig,
    pub ocr: OcrServiceConfig,
    pub chat: ChatServiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin; any origin when unset
    pub client_url: Option<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Session store file
    pub session_store_path: PathBuf,
    /// Where multipart uploads are written before ingestion
    pub upload_dir: PathBuf,
    /// Parent of per-ingestion work directories
    pub work_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RasterConfig {
    /// PDF render scale (1.0 = 72 DPI)
    pub scale: f32,
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = PathBuf::from("./data");
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                client_url: None,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            storage: StorageConfig {
                session_store_path: data_dir.join("extracted_data.json"),
                upload_dir: PathBuf::from("./uploads"),
                work_dir: env::temp_dir().join("docqa"),
            },
            raster: RasterConfig { scale: 2.0 },
            ocr: OcrServiceConfig::default(),
            chat: ChatServiceConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port)?,
                client_url: env::var("CLIENT_URL").ok().filter(|v| !v.is_empty()),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.server.max_upload_bytes)?,
            },
            storage: StorageConfig {
                session_store_path: env::var("SESSION_STORE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| data_dir.join("extracted_data.json")),
                upload_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.upload_dir),
                work_dir: env::var("WORK_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.work_dir),
            },
            raster: RasterConfig {
                scale: parse_var("RENDER_SCALE", defaults.raster.scale)?,
            },
            ocr: OcrServiceConfig {
                provider: parse_var::<OcrProvider>("OCR_PROVIDER", defaults.ocr.provider)?,
                tesseract_bin: env::var("TESSERACT_BIN").unwrap_or(defaults.ocr.tesseract_bin),
                ollama_url: env::var("OLLAMA_URL").unwrap_or(defaults.ocr.ollama_url),
                ollama_model: env::var("OLLAMA_OCR_MODEL").unwrap_or(defaults.ocr.ollama_model),
                language: env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr.language),
            },
            chat: ChatServiceConfig {
                provider: parse_var::<ChatProvider>("CHAT_PROVIDER", defaults.chat.provider)?,
                gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|v| !v.is_empty()),
                gemini_model: env::var("GEMINI_MODEL").unwrap_or(defaults.chat.gemini_model),
                ollama_url: env::var("OLLAMA_URL").unwrap_or(defaults.chat.ollama_url),
                ollama_model: env::var("OLLAMA_CHAT_MODEL").unwrap_or(defaults.chat.ollama_model),
            },
        })
    }
}

/// Parse an optional environment variable, falling back to `default`
fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                message: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}
