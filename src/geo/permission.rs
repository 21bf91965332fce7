use std::future::Future;

use tokio::sync::OnceCell;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Granted,
    Denied,
}

/// Platform side of the foreground location permission prompt.
pub trait PermissionProvider: Send + Sync + 'static {
    fn request_foreground_authorization(&self) -> impl Future<Output = anyhow::Result<Authorization>> + Send;
}

/// Asks the platform for location permission at most once per session and
/// remembers the answer. Denial is final; nothing here retries.
pub struct GeoPermissionGate<P> {
    provider: P,
    decision: OnceCell<Authorization>,
}

impl<P: PermissionProvider> GeoPermissionGate<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            decision: OnceCell::new(),
        }
    }

    pub async fn request_authorization(&self) -> Authorization {
        *self
            .decision
            .get_or_init(|| async {
                let decision = match self.provider.request_foreground_authorization().await {
                    Ok(decision) => decision,
                    Err(e) => {
                        warn!("location permission request failed: {e:#}");
                        Authorization::Denied
                    }
                };
                info!("location permission: {:?}", decision);
                decision
            })
            .await
    }

    /// The remembered decision, if the prompt has already been answered.
    pub fn decision(&self) -> Option<Authorization> {
        self.decision.get().copied()
    }
}
