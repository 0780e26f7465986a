//! Permission oracle
//!
//! Answers whether a guild participant holds a named moderation capability.
//! The guild-backed oracle works from a snapshot of the guild's role table,
//! so capability questions never suspend.

use std::collections::HashMap;

use poise::serenity_prelude::{PartialGuild, Permissions, RoleId, UserId};

use crate::moderation::ActorProfile;

/// Named capabilities the moderation commands gate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Permanently remove a user from the guild
    Ban,
}

impl Capability {
    /// The Discord permission bits this capability requires.
    #[must_use]
    pub fn required_permissions(self) -> Permissions {
        match self {
            Self::Ban => Permissions::BAN_MEMBERS,
        }
    }
}

/// Answers capability questions for a single guild.
#[cfg_attr(test, mockall::automock)]
pub trait PermissionOracle: Send + Sync {
    /// Whether the given participant holds the capability in this guild.
    fn has_capability(&self, actor: &ActorProfile, capability: Capability) -> bool;
}

/// Permission oracle backed by a guild's role table.
///
/// A participant qualifies when any of the following hold: they own the
/// guild, they hold the guild's configured moderator role, or the union of
/// their role permissions (including `@everyone`) carries `ADMINISTRATOR`
/// or the capability's required bits.
pub struct GuildPermissionOracle {
    owner_id: UserId,
    everyone_permissions: Permissions,
    role_permissions: HashMap<RoleId, Permissions>,
    moderator_role: Option<RoleId>,
}

impl GuildPermissionOracle {
    /// Build an oracle from a fetched guild and the configured moderator
    /// role, if any.
    #[must_use]
    pub fn from_guild(guild: &PartialGuild, moderator_role: Option<RoleId>) -> Self {
        // The @everyone role shares the guild's ID and is not listed on
        // member role lists.
        let everyone_permissions = guild
            .roles
            .get(&RoleId::new(guild.id.get()))
            .map_or_else(Permissions::empty, |role| role.permissions);

        Self {
            owner_id: guild.owner_id,
            everyone_permissions,
            role_permissions: guild
                .roles
                .iter()
                .map(|(id, role)| (*id, role.permissions))
                .collect(),
            moderator_role,
        }
    }

    fn held_permissions(&self, role_ids: &[RoleId]) -> Permissions {
        role_ids
            .iter()
            .filter_map(|id| self.role_permissions.get(id))
            .fold(self.everyone_permissions, |held, perms| held | *perms)
    }
}

impl PermissionOracle for GuildPermissionOracle {
    fn has_capability(&self, actor: &ActorProfile, capability: Capability) -> bool {
        if actor.user_id == self.owner_id {
            return true;
        }

        if let Some(role) = self.moderator_role {
            if actor.role_ids.contains(&role) {
                return true;
            }
        }

        let held = self.held_permissions(&actor.role_ids);
        held.contains(Permissions::ADMINISTRATOR)
            || held.contains(capability.required_permissions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: u64 = 10;
    const MOD_ROLE: u64 = 500;
    const BAN_ROLE: u64 = 501;
    const ADMIN_ROLE: u64 = 502;
    const PLAIN_ROLE: u64 = 503;

    fn oracle(moderator_role: Option<RoleId>) -> GuildPermissionOracle {
        let role_permissions = [
            (RoleId::new(BAN_ROLE), Permissions::BAN_MEMBERS),
            (RoleId::new(ADMIN_ROLE), Permissions::ADMINISTRATOR),
            (RoleId::new(MOD_ROLE), Permissions::empty()),
            (RoleId::new(PLAIN_ROLE), Permissions::SEND_MESSAGES),
        ]
        .into_iter()
        .collect();

        GuildPermissionOracle {
            owner_id: UserId::new(OWNER),
            everyone_permissions: Permissions::VIEW_CHANNEL,
            role_permissions,
            moderator_role,
        }
    }

    fn actor(user_id: u64, roles: &[u64]) -> ActorProfile {
        ActorProfile::new(
            UserId::new(user_id),
            1,
            roles.iter().copied().map(RoleId::new).collect(),
        )
    }

    #[test]
    fn test_owner_always_qualifies() {
        let oracle = oracle(None);
        assert!(oracle.has_capability(&actor(OWNER, &[]), Capability::Ban));
    }

    #[test]
    fn test_ban_permission_qualifies() {
        let oracle = oracle(None);
        assert!(oracle.has_capability(&actor(20, &[BAN_ROLE]), Capability::Ban));
    }

    #[test]
    fn test_administrator_qualifies() {
        let oracle = oracle(None);
        assert!(oracle.has_capability(&actor(20, &[ADMIN_ROLE]), Capability::Ban));
    }

    #[test]
    fn test_moderator_role_qualifies_without_permissions() {
        let oracle = oracle(Some(RoleId::new(MOD_ROLE)));
        assert!(oracle.has_capability(&actor(20, &[MOD_ROLE]), Capability::Ban));
    }

    #[test]
    fn test_plain_member_does_not_qualify() {
        let oracle = oracle(Some(RoleId::new(MOD_ROLE)));
        assert!(!oracle.has_capability(&actor(20, &[PLAIN_ROLE]), Capability::Ban));
        assert!(!oracle.has_capability(&actor(20, &[]), Capability::Ban));
    }

    #[test]
    fn test_permissions_union_across_roles() {
        let oracle = oracle(None);
        // Neither role alone grants ban, but the union check still only
        // passes when some role actually carries the bits.
        assert!(!oracle.has_capability(&actor(20, &[PLAIN_ROLE, MOD_ROLE]), Capability::Ban));
        assert!(oracle.has_capability(&actor(20, &[PLAIN_ROLE, BAN_ROLE]), Capability::Ban));
    }
}
