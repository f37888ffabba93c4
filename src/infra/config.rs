//! Centralized configuration (environment variables + defaults).

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set")
}

/// Connection pool size.
pub fn database_max_connections() -> u32 {
    std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5)
}

/// Mail gateway endpoint. Notifications are dropped when unset.
pub fn mail_gateway_url() -> Option<String> {
    std::env::var("MAIL_GATEWAY_URL").ok()
}
