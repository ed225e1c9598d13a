use anyhow::Result;

use crate::config::stage::Stage;

use super::config_model::{Database, DotEnvyConfig, Provider, Server};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let provider = Provider {
        api_base_url: std::env::var("PROVIDER_API_BASE_URL")
            .expect("PROVIDER_API_BASE_URL is invalid"),
        auth_header: std::env::var("PROVIDER_AUTH_HEADER")
            .expect("PROVIDER_AUTH_HEADER is invalid"),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        provider,
        stage: get_stage(),
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or_default();
    Stage::try_from(stage_str.as_str()).unwrap_or_default()
}
