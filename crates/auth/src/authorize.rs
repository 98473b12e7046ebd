use thiserror::Error;

use crate::{Access, Principal, StaffPolicy};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: requires {0} access")]
    Forbidden(Access),

    #[error("command not allowed in this channel")]
    WrongChannel,
}

/// Check that a principal holds one of the roles granting `required`.
///
/// - No IO
/// - No panics
pub fn authorize(policy: &StaffPolicy, principal: &Principal, required: Access) -> Result<(), AuthzError> {
    let roles = policy.roles_for(required);
    if roles.is_empty() || principal.has_any_role(&roles) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required))
    }
}

/// Check that a member command was issued in a commands channel.
///
/// With `staff_bypass`, holders of a bypass role may use the command anywhere.
pub fn in_commands_channel(
    policy: &StaffPolicy,
    principal: &Principal,
    staff_bypass: bool,
) -> Result<(), AuthzError> {
    if policy.commands_channels.contains(&principal.channel_id) {
        return Ok(());
    }

    if staff_bypass && principal.has_any_role(&policy.bypass_roles) {
        return Ok(());
    }

    Err(AuthzError::WrongChannel)
}
