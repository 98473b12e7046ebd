use std::collections::HashSet;

use ninjabot_core::{ChannelId, RoleId};

/// Access level a command requires.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Access {
    /// Any guild member.
    Member,
    /// Moderators and admins.
    Moderator,
    /// Admins only.
    Admin,
}

impl core::fmt::Display for Access {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Access::Member => "member",
            Access::Moderator => "moderator",
            Access::Admin => "admin",
        })
    }
}

/// Which roles and channels grant what.
///
/// Built once from guild settings; role ids are opaque at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffPolicy {
    pub admin_role: RoleId,
    pub moderator_role: RoleId,
    /// Roles allowed to use member commands outside the commands channels.
    pub bypass_roles: HashSet<RoleId>,
    pub commands_channels: HashSet<ChannelId>,
}

impl StaffPolicy {
    pub fn new(
        admin_role: RoleId,
        moderator_role: RoleId,
        bypass_roles: impl IntoIterator<Item = RoleId>,
        commands_channels: impl IntoIterator<Item = ChannelId>,
    ) -> Self {
        Self {
            admin_role,
            moderator_role,
            bypass_roles: bypass_roles.into_iter().collect(),
            commands_channels: commands_channels.into_iter().collect(),
        }
    }

    /// Roles that satisfy `access` (empty means "no role needed").
    pub fn roles_for(&self, access: Access) -> Vec<RoleId> {
        match access {
            Access::Member => Vec::new(),
            Access::Moderator => vec![self.admin_role, self.moderator_role],
            Access::Admin => vec![self.admin_role],
        }
    }
}
