//! Authentication: session renewal, presence checks, route guarding, and the
//! OAuth redirect flow.

pub mod coordinator;
pub mod guard;
pub mod oauth;
pub mod presence;
pub mod refresh;

pub use coordinator::{Attempt, RefreshCoordinator};
pub use guard::{RouteDecision, RouteRequirement};
pub use oauth::CallbackOutcome;
