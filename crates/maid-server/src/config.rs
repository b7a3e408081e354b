//! Server Configuration

use chrono::Duration;
use maid_payments::FlowConfig;

/// Settings read from the environment at startup
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Deployment environment; anything but `production` runs the gateway sandbox
    pub app_env: String,

    /// Public origin of the site, used when a request has no `Origin`
    pub public_url: String,

    /// Minutes an unverified payment stays resumable
    pub order_ttl_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            app_env: "development".into(),
            public_url: "http://localhost:3000".into(),
            order_ttl_minutes: 30,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            app_env: std::env::var("APP_ENV").unwrap_or(defaults.app_env),
            public_url: std::env::var("APP_URL").unwrap_or(defaults.public_url),
            order_ttl_minutes: std::env::var("PENDING_ORDER_TTL_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .filter(|m| *m > 0)
                .unwrap_or(defaults.order_ttl_minutes),
        }
    }

    pub fn test_mode(&self) -> bool {
        self.app_env != "production"
    }

    pub fn flow_config(&self) -> FlowConfig {
        FlowConfig {
            test_mode: self.test_mode(),
            public_url: self.public_url.clone(),
            order_ttl: Duration::minutes(self.order_ttl_minutes),
        }
    }
}
