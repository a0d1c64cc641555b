use parking_lot::Mutex;
use serde::Serialize;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, trace};

use super::LoadingGuard;
use crate::config::LoadingConfig;

/// 默认防抖时长
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(120);

/// 对外暴露的状态快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadingSnapshot {
    pub active: u32,
    pub show: bool,
}

/// 内部可变状态，所有字段只在持锁时修改
struct LoadingState {
    active: u32,
    show: bool,
    /// 每次取消或重新调度定时器时递增，已过期的定时器据此失效
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl LoadingState {
    fn cancel_timer(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}

/// Global loading coordinator
///
/// `active` 为进行中操作的数量，永远不会小于 0；`show` 只在 `active > 0`
/// 时为 true（防抖窗口内 `show` 可能滞后于 `active`）。
pub struct LoadingCoordinator {
    delay: Duration,
    state: Mutex<LoadingState>,
    show_tx: watch::Sender<bool>,
}

impl LoadingCoordinator {
    pub fn new() -> Arc<Self> {
        Self::with_delay(DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        let (show_tx, _) = watch::channel(false);
        Arc::new(Self {
            delay,
            state: Mutex::new(LoadingState {
                active: 0,
                show: false,
                generation: 0,
                timer: None,
            }),
            show_tx,
        })
    }

    pub fn from_config(config: &LoadingConfig) -> Arc<Self> {
        Self::with_delay(Duration::from_millis(config.debounce_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 开始一个操作
    ///
    /// `active` 从 0 变为 1 时，清除旧定时器并在 `delay` 后显示；
    /// `immediate` 为 true 时同步显示，不经过防抖。
    pub fn start(self: &Arc<Self>, immediate: bool) {
        let mut state = self.state.lock();
        state.active = state.active.saturating_add(1);
        trace!("LoadingCoordinator: start, active = {}", state.active);

        if immediate {
            state.cancel_timer();
            self.set_show(&mut state, true);
            return;
        }

        if state.active == 1 {
            state.cancel_timer();
            if self.delay.is_zero() {
                self.set_show(&mut state, true);
            } else {
                self.schedule_show(&mut state);
            }
        }
    }

    /// 结束一个操作，`active` 归零时立即隐藏
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if state.active == 0 {
            trace!("LoadingCoordinator: stop with no active operations, ignored");
            return;
        }

        state.active -= 1;
        trace!("LoadingCoordinator: stop, active = {}", state.active);

        if state.active == 0 {
            state.cancel_timer();
            self.set_show(&mut state, false);
        }
    }

    /// 无条件重置：`active = 0`、`show = false`，并清除定时器
    pub fn force_hide(&self) {
        let mut state = self.state.lock();
        if state.active > 0 {
            debug!(
                "LoadingCoordinator: force hide with {} active operations",
                state.active
            );
        }
        state.active = 0;
        state.cancel_timer();
        self.set_show(&mut state, false);
    }

    /// 开始一个操作，并在返回的 guard 被 drop 时自动结束
    pub fn track(self: &Arc<Self>, immediate: bool) -> LoadingGuard {
        self.start(immediate);
        LoadingGuard::new(Arc::clone(self))
    }

    pub fn active(&self) -> u32 {
        self.state.lock().active
    }

    pub fn is_shown(&self) -> bool {
        self.state.lock().show
    }

    pub fn snapshot(&self) -> LoadingSnapshot {
        let state = self.state.lock();
        LoadingSnapshot {
            active: state.active,
            show: state.show,
        }
    }

    /// 订阅 `show` 的变化
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.show_tx.subscribe()
    }

    fn set_show(&self, state: &mut LoadingState, show: bool) {
        state.show = show;
        self.show_tx.send_if_modified(|current| {
            if *current != show {
                *current = show;
                true
            } else {
                false
            }
        });
    }

    fn schedule_show(self: &Arc<Self>, state: &mut LoadingState) {
        // 没有 tokio runtime 时无法调度定时器，直接显示
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("LoadingCoordinator: no runtime available, showing immediately");
            self.set_show(state, true);
            return;
        };

        let generation = state.generation;
        let delay = self.delay;
        let weak: Weak<Self> = Arc::downgrade(self);

        state.timer = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(coordinator) = weak.upgrade() {
                coordinator.fire(generation);
            }
        }));
    }

    fn fire(&self, generation: u64) {
        let mut state = self.state.lock();
        // 定时器触发后、获得锁之前可能已经被取消或替换
        if state.generation != generation || state.active == 0 {
            trace!("LoadingCoordinator: stale timer ignored");
            return;
        }
        state.timer = None;
        self.set_show(&mut state, true);
    }
}

impl Drop for LoadingCoordinator {
    fn drop(&mut self) {
        self.state.get_mut().cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(120);

    #[tokio::test(start_paused = true)]
    async fn test_show_after_debounce() {
        let coordinator = LoadingCoordinator::with_delay(DELAY);
        coordinator.start(false);
        assert_eq!(coordinator.active(), 1);
        assert!(!coordinator.is_shown());

        tokio::time::sleep(Duration::from_millis(119)).await;
        assert!(!coordinator.is_shown());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(coordinator.is_shown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_operation_never_shows() {
        let coordinator = LoadingCoordinator::with_delay(DELAY);
        let mut rx = coordinator.subscribe();

        coordinator.start(false);
        tokio::time::sleep(Duration::from_millis(50)).await;
        coordinator.stop();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!coordinator.is_shown());
        assert_eq!(coordinator.active(), 0);
        assert!(!rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_starts_one_stop_stays_shown() {
        let coordinator = LoadingCoordinator::with_delay(DELAY);
        coordinator.start(false);
        coordinator.start(false);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(coordinator.is_shown());

        coordinator.stop();
        assert_eq!(coordinator.active(), 1);
        assert!(coordinator.is_shown());

        coordinator.stop();
        assert_eq!(coordinator.active(), 0);
        assert!(!coordinator.is_shown());
    }

    #[tokio::test]
    async fn test_immediate_shows_synchronously() {
        let coordinator = LoadingCoordinator::with_delay(DELAY);
        coordinator.start(true);
        assert!(coordinator.is_shown());
        assert_eq!(
            coordinator.snapshot(),
            LoadingSnapshot {
                active: 1,
                show: true
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_during_debounce_window() {
        let coordinator = LoadingCoordinator::with_delay(DELAY);
        coordinator.start(false);
        tokio::time::sleep(Duration::from_millis(10)).await;
        coordinator.start(true);
        assert!(coordinator.is_shown());
        assert_eq!(coordinator.active(), 2);
    }

    #[tokio::test]
    async fn test_stop_is_floored_at_zero() {
        let coordinator = LoadingCoordinator::with_delay(DELAY);
        coordinator.stop();
        coordinator.stop();
        assert_eq!(coordinator.active(), 0);

        coordinator.start(true);
        coordinator.stop();
        coordinator.stop();
        assert_eq!(coordinator.active(), 0);
        assert!(!coordinator.is_shown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_force_hide_resets_everything() {
        let coordinator = LoadingCoordinator::with_delay(DELAY);
        coordinator.start(false);
        coordinator.start(false);
        coordinator.start(false);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(coordinator.is_shown());

        coordinator.force_hide();
        assert_eq!(coordinator.active(), 0);
        assert!(!coordinator.is_shown());

        // 之前的调用方稍后 stop，不能变成负数
        coordinator.stop();
        coordinator.stop();
        assert_eq!(coordinator.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_force_hide_cancels_pending_timer() {
        let coordinator = LoadingCoordinator::with_delay(DELAY);
        coordinator.start(false);
        coordinator.force_hide();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!coordinator.is_shown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop_reschedules() {
        let coordinator = LoadingCoordinator::with_delay(DELAY);
        coordinator.start(false);
        tokio::time::sleep(Duration::from_millis(100)).await;
        coordinator.stop();

        // 新一轮从 0 开始计时，旧定时器不应在 20ms 后触发
        coordinator.start(false);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!coordinator.is_shown());

        tokio::time::sleep(Duration::from_millis(70)).await;
        assert!(coordinator.is_shown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_transitions() {
        let coordinator = LoadingCoordinator::with_delay(DELAY);
        let mut rx = coordinator.subscribe();

        coordinator.start(false);
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());

        coordinator.stop();
        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_sequences_keep_invariants() {
        let coordinator = LoadingCoordinator::with_delay(DELAY);
        let mut expected: u32 = 0;
        // 固定的伪随机序列：start / stop / sleep 交错
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..200 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            match seed % 4 {
                0 | 1 => {
                    coordinator.start(false);
                    expected += 1;
                }
                2 => {
                    coordinator.stop();
                    expected = expected.saturating_sub(1);
                }
                _ => tokio::time::sleep(Duration::from_millis((seed % 200) as u64)).await,
            }
            let snapshot = coordinator.snapshot();
            assert_eq!(snapshot.active, expected);
            if snapshot.active == 0 {
                assert!(!snapshot.show);
            }
        }
    }

    #[test]
    fn test_without_runtime_shows_immediately() {
        let coordinator = LoadingCoordinator::with_delay(DELAY);
        coordinator.start(false);
        assert!(coordinator.is_shown());
        coordinator.stop();
        assert!(!coordinator.is_shown());
    }

    #[tokio::test]
    async fn test_zero_delay_shows_immediately() {
        let coordinator = LoadingCoordinator::with_delay(Duration::ZERO);
        coordinator.start(false);
        assert!(coordinator.is_shown());
    }
}
