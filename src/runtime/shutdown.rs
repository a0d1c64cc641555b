use std::sync::Arc;
use tracing::{error, warn};

use crate::loading::LoadingCoordinator;

/// 等待 Ctrl+C，然后重置加载指示器，保证不会残留进行中的计数
pub async fn listen_for_shutdown(loading: Arc<LoadingCoordinator>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    warn!(
        "Shutdown signal received, {} request(s) still in flight",
        loading.active()
    );

    loading.force_hide();
    warn!("Loading state reset, shutting down...");
}
