use std::sync::Arc;

use campusnav_core::CampusModel;
use reqwest::Client;

use crate::config::OutdoorConfig;

/// Shared, read-only handler state
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<CampusModel>,
    pub http: Client,
    pub outdoor: Arc<OutdoorConfig>,
}

impl AppState {
    /// # Errors
    ///
    /// Fails when the HTTP client for the outdoor router cannot be built.
    pub fn new(model: Arc<CampusModel>, outdoor: OutdoorConfig) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(outdoor.timeout())
            .user_agent(concat!("campusnav-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            model,
            http,
            outdoor: Arc::new(outdoor),
        })
    }
}
