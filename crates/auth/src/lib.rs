//! `ninjabot-auth` - staff role policy for bot commands.
//!
//! Knows roles and channels only; resolving them from a chat member is the
//! caller's job.

pub mod authorize;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, authorize, in_commands_channel};
pub use principal::Principal;
pub use roles::{Access, StaffPolicy};
