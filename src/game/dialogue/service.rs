use crate::browser;
use crate::config::MagicWordsConfig;
use log::{debug, error};
use once_cell::unsync::OnceCell;
use serde_json::Value;

/// Remote source of the magic-words conversation. The first good response is
/// kept for the rest of the session.
pub struct MagicWordsService {
    endpoint: String,
    cached: OnceCell<Value>,
}

impl Default for MagicWordsService {
    fn default() -> Self {
        MagicWordsService::new(&MagicWordsConfig::default().endpoint)
    }
}

impl MagicWordsService {
    pub fn new(endpoint: &str) -> Self {
        MagicWordsService {
            endpoint: endpoint.to_string(),
            cached: OnceCell::new(),
        }
    }

    /// `None` when the request or the body fails, the reason is logged.
    pub async fn fetch(&self) -> Option<Value> {
        if let Some(data) = self.cached.get() {
            debug!("MagicWordsService: using cached response");
            return Some(data.clone());
        }
        match browser::fetch_json::<Value>(&self.endpoint).await {
            Ok(data) => {
                let _ = self.cached.set(data.clone());
                Some(data)
            }
            Err(err) => {
                error!("MagicWordsService: failed to fetch data : {:#}", err);
                None
            }
        }
    }

    pub fn cached(&self) -> Option<&Value> {
        self.cached.get()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_the_configured_endpoint() {
        let service = MagicWordsService::default();
        assert_eq!(service.endpoint(), MagicWordsConfig::default().endpoint);
        assert!(service.cached().is_none());
    }
}
