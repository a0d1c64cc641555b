use std::sync::Arc;

use super::LoadingCoordinator;

/// RAII 句柄：drop 时调用 `stop()`
///
/// 请求 future 被中途丢弃（客户端断开）时也能释放计数。
#[must_use = "dropping the guard immediately ends the tracked operation"]
pub struct LoadingGuard {
    coordinator: Arc<LoadingCoordinator>,
}

impl LoadingGuard {
    pub(super) fn new(coordinator: Arc<LoadingCoordinator>) -> Self {
        Self { coordinator }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.coordinator.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Duration;

    #[tokio::test]
    async fn test_guard_releases_on_drop() {
        let coordinator = LoadingCoordinator::with_delay(Duration::from_millis(120));
        {
            let _first = coordinator.track(true);
            let _second = coordinator.track(false);
            assert_eq!(coordinator.active(), 2);
            assert!(coordinator.is_shown());
        }
        assert_eq!(coordinator.active(), 0);
        assert!(!coordinator.is_shown());
    }

    #[tokio::test]
    async fn test_guard_after_force_hide_does_not_underflow() {
        let coordinator = LoadingCoordinator::with_delay(Duration::from_millis(120));
        let guard = coordinator.track(false);
        coordinator.force_hide();
        drop(guard);
        assert_eq!(coordinator.active(), 0);
    }
}
