use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Address the HTTP API binds to
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8080")]
    pub server_addr: String,

    /// Enable TLS for the HTTP API
    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    /// Path to the TLS certificate (PEM)
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Path to the TLS private key (PEM)
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    // --- Generation Backend Args ---
    /// API key for the generation backend; when empty the service answers
    /// every message with a fixed apology instead of calling out
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Model name for chat completion (e.g., gemini-1.5-flash-latest)
    #[arg(long, env = "CHAT_MODEL")]
    pub chat_model: Option<String>,

    /// Base URL for the generation backend API
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// Sampling temperature for generation
    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "0.7")]
    pub chat_temperature: f32,

    /// Output token cap for generation
    #[arg(long, env = "CHAT_MAX_TOKENS", default_value = "800")]
    pub chat_max_tokens: u32,

    /// Per-call timeout for outbound backend requests, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    // --- History Store Args ---
    /// Conversation store type (memory, redis)
    #[arg(long, env = "HISTORY_TYPE", default_value = "memory")]
    pub history_type: String,

    /// Conversation store host endpoint (e.g., redis://127.0.0.1:6379)
    #[arg(long, env = "HISTORY_HOST", default_value = "redis://127.0.0.1:6379")]
    pub history_host: String,

    /// Prefix for Redis history keys.
    #[arg(long, env = "HISTORY_REDIS_PREFIX", default_value = "chat:history:")]
    pub history_redis_prefix: String,

    /// Number of prior turns fed back into the prompt
    #[arg(long, env = "HISTORY_WINDOW", default_value = "10")]
    pub history_window: usize,
}
