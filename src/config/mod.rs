use std::env;
use std::net::SocketAddr;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::apply_security_headers;

pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/suyay".to_string());
        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3001)));
        Self {
            database_url,
            bind_addr,
        }
    }
}
