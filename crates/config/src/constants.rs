//! Default values shared by the settings and the binary

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// Ollama chat endpoint base URL
    pub const OLLAMA_DEFAULT: &str = "http://localhost:11434";
}

/// Chat gateway defaults
pub mod chat {
    /// Model used when none is configured
    pub const DEFAULT_MODEL: &str = "qwen3:4b";

    /// Chat calls may take minutes on local hardware
    pub const TIMEOUT_SECS: u64 = 300;

    /// Fixed instruction sent as the first message of every conversation
    pub const SYSTEM_PROMPT: &str =
        "You are a helpful customer support agent for a SaaS product. Be concise and human.";
}

/// Event log defaults
pub mod storage {
    pub const DATA_FILE: &str = "data.json";
}

/// HTTP read API defaults
pub mod server {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 8501;
}
