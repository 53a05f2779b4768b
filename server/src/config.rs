//! Process configuration, read once at startup (§6 Process configuration, §10.3).
//!
//! Grounded on the teacher's `PlayerProfiles::new(storage_dir)` pattern of
//! taking configuration as an explicit constructor argument rather than
//! scattering `env::var` calls through the codebase; an unparsable override
//! is fatal, matching §7 ("unreadable config terminates the process").

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub client_url: String,
    pub admin_password: String,
    pub hub_base_url: String,
    pub hosted_game_key: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(v) => v.parse::<u16>().with_context(|| format!("PORT={v:?} is not a valid port"))?,
            Err(_) => 3000,
        };
        let client_url = std::env::var("CLIENT_URL").unwrap_or_else(|_| "*".to_string());
        let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
        let hub_base_url =
            std::env::var("HUB_BASE_URL").unwrap_or_else(|_| "https://hub.example.invalid".to_string());
        let hosted_game_key = std::env::var("HOSTED_GAME_KEY").unwrap_or_else(|_| "local-dev".to_string());

        Ok(Self { port, client_url, admin_password, hub_base_url, hosted_game_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_port_is_rejected() {
        std::env::set_var("PORT", "not-a-number");
        let result = ServerConfig::from_env();
        std::env::remove_var("PORT");
        assert!(result.is_err());
    }
}
