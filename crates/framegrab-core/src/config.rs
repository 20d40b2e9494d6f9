//! Configuration module
//!
//! Everything is read from the environment (optionally seeded from a `.env` file)
//! once at startup. Media-store and spreadsheet credentials are optional here:
//! extraction endpoints work without them and only `/save-selection` needs them.

use std::env;
use std::path::PathBuf;

use crate::constants::FALLBACK_DURATION_SECS;
use crate::storage_types::MediaStoreBackend;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_BODY_MB: usize = 50;
const MAX_PROCESS_OUTPUT_MB: usize = 50;
const SEGMENT_LENGTH_SECS: u64 = 5;
const SHEET_NAME: &str = "Sheet1";

/// HTTP-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_body_bytes: usize,
    pub log_format: String,
}

/// External tools and scratch storage
#[derive(Clone, Debug)]
pub struct ToolConfig {
    pub ytdlp_path: String,
    pub ffmpeg_path: String,
    pub scratch_dir: PathBuf,
    pub fallback_duration_secs: f64,
    pub max_process_output_bytes: usize,
    pub segment_downloads: bool,
    pub segment_length_secs: u64,
}

/// Service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    pub tools: ToolConfig,
    // Media store configuration
    pub media_store_backend: MediaStoreBackend,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    pub cloudinary_folder: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Spreadsheet configuration
    pub spreadsheet_id: Option<String>,
    pub google_credentials: Option<String>,
    pub sheet_name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig {
                server_port: SERVER_PORT,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
                max_body_bytes: MAX_BODY_MB * 1024 * 1024,
                log_format: "text".to_string(),
            },
            tools: ToolConfig {
                ytdlp_path: "yt-dlp".to_string(),
                ffmpeg_path: "ffmpeg".to_string(),
                scratch_dir: env::temp_dir().join("framegrab"),
                fallback_duration_secs: FALLBACK_DURATION_SECS,
                max_process_output_bytes: MAX_PROCESS_OUTPUT_MB * 1024 * 1024,
                segment_downloads: false,
                segment_length_secs: SEGMENT_LENGTH_SECS,
            },
            media_store_backend: MediaStoreBackend::Cloudinary,
            cloudinary_cloud_name: None,
            cloudinary_api_key: None,
            cloudinary_api_secret: None,
            cloudinary_folder: None,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: None,
            local_storage_base_url: None,
            spreadsheet_id: None,
            google_credentials: None,
            sheet_name: SHEET_NAME.to_string(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn max_body_bytes(&self) -> usize {
        self.inner().base.max_body_bytes
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn tools(&self) -> &ToolConfig {
        &self.inner().tools
    }

    pub fn media_store_backend(&self) -> MediaStoreBackend {
        self.inner().media_store_backend
    }

    pub fn cloudinary_cloud_name(&self) -> Option<&str> {
        self.inner().cloudinary_cloud_name.as_deref()
    }

    pub fn cloudinary_api_key(&self) -> Option<&str> {
        self.inner().cloudinary_api_key.as_deref()
    }

    pub fn cloudinary_api_secret(&self) -> Option<&str> {
        self.inner().cloudinary_api_secret.as_deref()
    }

    pub fn cloudinary_folder(&self) -> Option<&str> {
        self.inner().cloudinary_folder.as_deref()
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn spreadsheet_id(&self) -> Option<&str> {
        self.inner().spreadsheet_id.as_deref()
    }

    pub fn google_credentials(&self) -> Option<&str> {
        self.inner().google_credentials.as_deref()
    }

    pub fn sheet_name(&self) -> &str {
        &self.inner().sheet_name
    }
}

impl From<ServiceConfig> for Config {
    fn from(config: ServiceConfig) -> Self {
        Config(Box::new(config))
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = ServiceConfig::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            max_body_bytes: env::var("MAX_BODY_MB")
                .unwrap_or_else(|_| MAX_BODY_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_BODY_MB)
                * 1024
                * 1024,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "text".to_string())
                .to_lowercase(),
        };

        let tools = ToolConfig {
            ytdlp_path: env::var("YTDLP_PATH").unwrap_or_else(|_| "yt-dlp".to_string()),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            scratch_dir: non_empty_var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.tools.scratch_dir),
            fallback_duration_secs: env::var("FALLBACK_DURATION_SECS")
                .unwrap_or_else(|_| FALLBACK_DURATION_SECS.to_string())
                .parse()
                .unwrap_or(FALLBACK_DURATION_SECS),
            max_process_output_bytes: env::var("MAX_PROCESS_OUTPUT_MB")
                .unwrap_or_else(|_| MAX_PROCESS_OUTPUT_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_PROCESS_OUTPUT_MB)
                * 1024
                * 1024,
            segment_downloads: env::var("SEGMENT_DOWNLOADS")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(false),
            segment_length_secs: env::var("SEGMENT_LENGTH_SECS")
                .unwrap_or_else(|_| SEGMENT_LENGTH_SECS.to_string())
                .parse()
                .unwrap_or(SEGMENT_LENGTH_SECS),
        };

        let media_store_backend = match env::var("MEDIA_STORE_BACKEND") {
            Ok(value) => MediaStoreBackend::parse(&value).ok_or_else(|| {
                anyhow::anyhow!(
                    "MEDIA_STORE_BACKEND must be one of cloudinary, s3, local (got '{}')",
                    value
                )
            })?,
            Err(_) => MediaStoreBackend::Cloudinary,
        };

        let config = ServiceConfig {
            base,
            tools,
            media_store_backend,
            cloudinary_cloud_name: non_empty_var("CLOUDINARY_CLOUD_NAME"),
            cloudinary_api_key: non_empty_var("CLOUDINARY_API_KEY"),
            cloudinary_api_secret: non_empty_var("CLOUDINARY_API_SECRET"),
            cloudinary_folder: non_empty_var("CLOUDINARY_FOLDER"),
            s3_bucket: non_empty_var("S3_BUCKET"),
            s3_region: non_empty_var("S3_REGION"),
            s3_endpoint: non_empty_var("S3_ENDPOINT"),
            aws_region: non_empty_var("AWS_REGION"),
            local_storage_path: non_empty_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty_var("LOCAL_STORAGE_BASE_URL"),
            spreadsheet_id: non_empty_var("SPREADSHEET_ID"),
            google_credentials: non_empty_var("GOOGLE_CREDENTIALS"),
            sheet_name: env::var("SHEET_NAME").unwrap_or_else(|_| SHEET_NAME.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.tools.fallback_duration_secs <= 0.0 {
            return Err(anyhow::anyhow!(
                "FALLBACK_DURATION_SECS must be a positive number of seconds"
            ));
        }

        if self.tools.max_process_output_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_PROCESS_OUTPUT_MB must be greater than 0"));
        }

        if self.tools.segment_downloads && self.tools.segment_length_secs == 0 {
            return Err(anyhow::anyhow!(
                "SEGMENT_LENGTH_SECS must be greater than 0 when SEGMENT_DOWNLOADS=true"
            ));
        }

        if is_production_name(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS must list explicit origins in production"
            ));
        }

        if self.base.max_body_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_BODY_MB must be greater than 0"));
        }

        if self.sheet_name.trim().is_empty() {
            return Err(anyhow::anyhow!("SHEET_NAME cannot be empty"));
        }

        if self.spreadsheet_id.is_some() && self.google_credentials.is_none() {
            return Err(anyhow::anyhow!(
                "GOOGLE_CREDENTIALS must be set when SPREADSHEET_ID is set"
            ));
        }

        Ok(())
    }
}
