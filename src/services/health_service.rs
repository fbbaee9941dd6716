use crate::config::HealthConfig;
use crate::storage::MessageStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug)]
pub struct HealthService {
    store: Arc<dyn MessageStore>,
    config: HealthConfig,
}

impl HealthService {
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>, config: HealthConfig) -> Self {
        Self { store, config }
    }

    /// Probes the message store with a bounded ping.
    ///
    /// # Errors
    /// Returns a description of the failure if the ping errors or times out.
    pub async fn check_store(&self) -> Result<(), String> {
        let store_timeout = Duration::from_millis(self.config.store_timeout_ms);

        match timeout(store_timeout, self.store.ping()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(format!("Store ping failed: {e}")),
            Err(_) => Err("Store ping timed out".to_string()),
        }
    }
}
