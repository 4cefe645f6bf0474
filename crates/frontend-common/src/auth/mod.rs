//! Authentication module

pub mod clock;
pub mod guard;
pub mod navigation;
pub mod roles;
pub mod session;
pub mod storage;
pub mod store;

// Re-export commonly used items
pub use clock::{Clock, ManualClock, SystemClock};
pub use guard::{GuardOutcome, auth_guard, role_guard};
#[cfg(target_arch = "wasm32")]
pub use navigation::BrowserNavigator;
pub use navigation::{MemoryNavigator, Navigator};
pub use session::{AuthPhase, Session};
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;
pub use storage::{MemoryStorage, SessionStorage};
pub use store::{Credentials, SessionStore, SessionStoreBuilder};
