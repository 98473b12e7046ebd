use std::collections::HashSet;

use ninjabot_core::{ChannelId, RoleId, UserId};

/// The member invoking a command, resolved by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    /// Channel the command was sent in.
    pub channel_id: ChannelId,
    pub roles: HashSet<RoleId>,
}

impl Principal {
    pub fn new(user_id: UserId, channel_id: ChannelId, roles: impl IntoIterator<Item = RoleId>) -> Self {
        Self {
            user_id,
            channel_id,
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_any_role<'a>(&self, roles: impl IntoIterator<Item = &'a RoleId>) -> bool {
        roles.into_iter().any(|r| self.roles.contains(r))
    }
}
