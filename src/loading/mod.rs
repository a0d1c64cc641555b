//! 全局加载指示器
//!
//! 对所有进行中的异步操作做引用计数，对外暴露单一的 "show spinner" 信号。
//! 第一个操作开始后延迟一小段时间才显示，避免快速响应造成的闪烁。

mod coordinator;
mod guard;

pub use coordinator::{DEFAULT_DEBOUNCE, LoadingCoordinator, LoadingSnapshot};
pub use guard::LoadingGuard;
