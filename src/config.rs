use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expires_in_hours: i64,
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub generation_timeout_secs: u64,
    pub stuck_session_deadline_secs: i64,
    pub sweep_interval_secs: u64,
    pub register_rate_max: i64,
    pub register_rate_window_secs: i64,
    pub resend_api_key: Option<String>,
    pub email_from: String,
    pub app_base_url: String,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a number"),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expires_in_hours: env::var("JWT_EXPIRES_IN_HOURS")
                .unwrap_or_else(|_| "168".to_string())
                .parse()
                .expect("JWT_EXPIRES_IN_HOURS must be a number"),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "claude-sonnet-4-5".to_string()),
            llm_max_tokens: env::var("LLM_MAX_TOKENS")
                .unwrap_or_else(|_| "8192".to_string())
                .parse()
                .expect("LLM_MAX_TOKENS must be a number"),
            generation_timeout_secs: env::var("GENERATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .expect("GENERATION_TIMEOUT_SECS must be a number"),
            stuck_session_deadline_secs: env::var("STUCK_SESSION_DEADLINE_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .expect("STUCK_SESSION_DEADLINE_SECS must be a number"),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("SWEEP_INTERVAL_SECS must be a number"),
            register_rate_max: env::var("REGISTER_RATE_MAX")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("REGISTER_RATE_MAX must be a number"),
            register_rate_window_secs: env::var("REGISTER_RATE_WINDOW_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("REGISTER_RATE_WINDOW_SECS must be a number"),
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "reports@example.com".to_string()),
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "life-audit-api".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
