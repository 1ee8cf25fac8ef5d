//! Live reload notification subsystem.
//!
//! ```text
//! ChangeDetector (notify) --+
//!                           +--> ReloadSession --[{"r": millis}]--> WebSocket
//! Heartbeat (1s) -----------+
//! ```
//!
//! Every WebSocket connection on [`RELOAD_PATH`] runs one [`ReloadSession`]
//! with its own detector and heartbeat. A session sends at most one reload
//! message; the page reloads and reconnects.
//!
//! # Modules
//!
//! - `detector` - non-recursive directory watch filtered by a name pattern
//! - `heartbeat` - fixed-interval ticks that pace reload delivery
//! - `message` - wire format of the reload instruction
//! - `session` - per-connection state machine

pub mod detector;
pub mod heartbeat;
pub mod message;
pub mod session;

pub use heartbeat::HEARTBEAT_INTERVAL;
pub use session::{ReloadSession, SessionIds};

/// URL path of the notification endpoint.
pub const RELOAD_PATH: &str = "/.hotserve/reload";
