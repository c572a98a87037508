//! Process-wide model handle — loaded at most once, shared by every
//! consumer.
//!
//! The slot is guarded by an async mutex held across the load itself, so
//! concurrent first accesses serialize and exactly one load happens. After
//! initialization, callers clone the `Arc` out of the lock and invoke the
//! model without holding it; `TextModel` implementations are reentrant.

use std::sync::Arc;
use tokio::sync::Mutex;

use super::{RemoteModel, TextModel};
use crate::config::ModelConfig;
use crate::error::ModelError;

pub struct ModelGateway {
    config: ModelConfig,
    slot: Mutex<Option<Arc<dyn TextModel>>>,
}

impl ModelGateway {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
        }
    }

    /// Gateway with a pre-installed backend. Used by tests and by hosts
    /// that construct the model themselves.
    pub fn with_model(model: Arc<dyn TextModel>) -> Self {
        Self {
            config: ModelConfig::default(),
            slot: Mutex::new(Some(model)),
        }
    }

    /// Return the shared handle, connecting to the inference server on
    /// first use. Never torn down during normal operation.
    pub async fn get_or_load(&self) -> Result<Arc<dyn TextModel>, ModelError> {
        let mut slot = self.slot.lock().await;
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        log::info!("[MODEL] Loading model (first request)");
        let model: Arc<dyn TextModel> = Arc::new(RemoteModel::connect(&self.config).await?);
        *slot = Some(Arc::clone(&model));
        log::info!("[MODEL] Model ready");
        Ok(model)
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DemoModel;

    #[tokio::test]
    async fn preinstalled_model_is_shared_not_reloaded() {
        let gateway = ModelGateway::with_model(Arc::new(DemoModel));
        assert!(gateway.is_loaded().await);

        let a = gateway.get_or_load().await.unwrap();
        let b = gateway.get_or_load().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b), "both callers must share one handle");
    }

    #[tokio::test]
    async fn concurrent_access_yields_one_handle() {
        let gateway = Arc::new(ModelGateway::with_model(Arc::new(DemoModel)));
        let g1 = Arc::clone(&gateway);
        let g2 = Arc::clone(&gateway);

        let (a, b) = tokio::join!(
            async move { g1.get_or_load().await.unwrap() },
            async move { g2.get_or_load().await.unwrap() },
        );
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_load_error() {
        // Nothing listens on this port; connect must fail as Load, and the
        // slot must stay empty so a later attempt can retry.
        let gateway = ModelGateway::new(ModelConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        });
        let err = gateway.get_or_load().await.unwrap_err();
        assert!(matches!(err, ModelError::Load(_)));
        assert!(!gateway.is_loaded().await);
    }
}
