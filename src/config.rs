use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "VOICEDROP_DATABASE_URL")]
    pub database_url: String,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub upload: UploadConfig,

    #[command(flatten)]
    pub health: HealthConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "VOICEDROP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "VOICEDROP_PORT", default_value_t = 3000)]
    pub port: u16,
}

#[derive(Clone, Debug, Args)]
pub struct UploadConfig {
    /// Max audio upload size in bytes (Default: 5MB)
    #[arg(long, env = "VOICEDROP_UPLOAD_MAX_SIZE_BYTES", default_value_t = 5_242_880)]
    pub max_size_bytes: usize,

    /// Comma-separated list of accepted audio content types
    #[arg(
        long,
        env = "VOICEDROP_ACCEPTED_AUDIO_TYPES",
        default_value = "audio/wav,audio/x-wav,audio/wave,audio/mpeg,audio/mp4,audio/m4a,audio/ogg,audio/webm,audio/flac,audio/aac",
        value_delimiter = ','
    )]
    pub accepted_types: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    /// Timeout for the store ping issued by the health check, in milliseconds
    #[arg(long, env = "VOICEDROP_HEALTH_STORE_TIMEOUT_MS", default_value_t = 2000)]
    pub store_timeout_ms: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "VOICEDROP_LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl Config {
    pub fn load() -> Self {
        Self::parse()
    }
}
