use std::net::IpAddr;
use std::time::Duration;

use crate::form::FormKind;
use crate::gateway::GatewayTarget;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub target: GatewayTarget,
    pub host: IpAddr,
    pub port: u16,
    pub form_kind: FormKind,
    pub granted_scopes: Vec<String>,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let api_url = env_required("ENDPOINT_CONSOLE_API_URL")?;

        let target = match (
            std::env::var("ENDPOINT_CONSOLE_PROJECT_ID").ok(),
            std::env::var("ENDPOINT_CONSOLE_PORTAL_TOKEN").ok(),
        ) {
            (Some(project_id), _) => GatewayTarget::Project {
                project_id,
                api_key: std::env::var("ENDPOINT_CONSOLE_API_KEY").ok(),
            },
            (None, Some(token)) => GatewayTarget::Portal { token },
            (None, None) => {
                return Err(
                    "Either ENDPOINT_CONSOLE_PROJECT_ID or ENDPOINT_CONSOLE_PORTAL_TOKEN must be set"
                        .to_string(),
                );
            }
        };

        let host: IpAddr = env_or("ENDPOINT_CONSOLE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid ENDPOINT_CONSOLE_HOST: {e}"))?;

        let port: u16 = env_or("ENDPOINT_CONSOLE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid ENDPOINT_CONSOLE_PORT: {e}"))?;

        let form_kind: FormKind = env_or("ENDPOINT_CONSOLE_FORM_KIND", "in-app")
            .parse()
            .map_err(|e| format!("Invalid ENDPOINT_CONSOLE_FORM_KIND: {e}"))?;

        let granted_scopes: Vec<String> = env_or("ENDPOINT_CONSOLE_SCOPES", "Endpoints|MANAGE")
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let timeout_secs: u64 = env_or("ENDPOINT_CONSOLE_REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid ENDPOINT_CONSOLE_REQUEST_TIMEOUT_SECS: {e}"))?;

        let log_level = env_or("ENDPOINT_CONSOLE_LOG_LEVEL", "info");

        Ok(Config {
            api_url,
            target,
            host,
            port,
            form_kind,
            granted_scopes,
            request_timeout: Duration::from_secs(timeout_secs),
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
