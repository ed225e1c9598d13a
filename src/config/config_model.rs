use crate::config::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub provider: Provider,
    pub stage: Stage,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

/// Connection settings for the payment provider's API. Per-organization
/// merchant credentials live in the store, not here.
#[derive(Debug, Clone)]
pub struct Provider {
    pub api_base_url: String,
    pub auth_header: String,
}
