use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub llm: LLMConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub endpoint: Option<String>,
    /// Base URL under which stored objects are publicly reachable.
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: String,
    pub model: String,
    pub openai_api_key: String,
    pub google_api_key: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl LLMConfig {
    pub fn active_api_key(&self) -> Option<String> {
        let key = match self.provider.as_str() {
            "google" => &self.google_api_key,
            _ => &self.openai_api_key,
        };
        if key.is_empty() {
            None
        } else {
            Some(key.clone())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Directory holding tesseract's trained data files.
    pub tessdata_dir: String,
    pub language: String,
    /// Longest edge of a rasterized page in pixels.
    pub max_rendered_pixels: u32,
    /// Pages recognized concurrently during the OCR fan-out.
    pub concurrency: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
                min_connections: env::var("DB_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
            },
            storage: StorageConfig {
                bucket: env::var("S3_BUCKET").expect("S3_BUCKET must be set"),
                region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
                secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
                endpoint: env::var("S3_ENDPOINT").ok(),
                public_base_url: env::var("S3_PUBLIC_BASE_URL")
                    .expect("S3_PUBLIC_BASE_URL must be set"),
            },
            llm: LLMConfig {
                provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "openai".to_string()),
                model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                google_api_key: env::var("GOOGLE_API_KEY").unwrap_or_default(),
                max_tokens: env::var("LLM_MAX_TOKENS")
                    .unwrap_or_else(|_| "1024".to_string())
                    .parse()?,
                temperature: env::var("LLM_TEMPERATURE")
                    .unwrap_or_else(|_| "0.2".to_string())
                    .parse()?,
            },
            ocr: OcrConfig {
                tessdata_dir: env::var("TESSDATA_DIR")
                    .unwrap_or_else(|_| "/usr/share/tesseract-ocr/5/tessdata".to_string()),
                language: env::var("OCR_LANGUAGE").unwrap_or_else(|_| "eng".to_string()),
                max_rendered_pixels: env::var("OCR_MAX_PIXELS")
                    .unwrap_or_else(|_| "2048".to_string())
                    .parse()?,
                concurrency: env::var("OCR_CONCURRENCY")
                    .unwrap_or_else(|_| "4".to_string())
                    .parse()?,
            },
        })
    }
}
