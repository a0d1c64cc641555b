pub mod guard;
pub mod request_id;

pub use guard::{AuthGuard, GuardDecision, GuardSettings};
pub use request_id::{RequestId, RequestIdMiddleware};
