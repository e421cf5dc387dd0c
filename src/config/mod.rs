/// Token secret, token lifetime and admin credentials
pub mod auth;

/// Budget seed loading from config.toml
pub mod budgets;

/// Database configuration and connection management
pub mod database;

/// Listener, CORS and timeout settings
pub mod server;
