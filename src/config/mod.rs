use std::env;

// Container for everything the client reads from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the ticketing backend, without a trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            api: ApiConfig {
                base_url: env::var("CINEMA_API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080".to_string())
                    .trim_end_matches('/')
                    .to_string(),
                timeout_secs: env::var("CINEMA_API_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("CINEMA_API_TIMEOUT_SECS must be a valid number"),
            },
            rust_log: env::var("RUST_LOG")
                .unwrap_or_else(|_| "cinema_booking=info".to_string()),
        }
    }
}
