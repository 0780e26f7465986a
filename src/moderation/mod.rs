//! Moderation subsystem
//!
//! The guarded ban flow: the request/outcome data model, the validation
//! pipeline that decides whether a ban may proceed, and the collaborators
//! the pipeline reads from (permission oracle, target resolver, ban list)
//! plus the executor that performs the action once allowed.

mod banlist;
mod error;
mod executor;
mod guard;
mod oracle;
mod request;
mod resolver;

pub use banlist::{BanListReader, HttpBanListReader};
pub use error::{ModerationError, ModerationResult};
pub use executor::{BanExecutor, HttpBanExecutor, audit_reason};
pub use guard::{BanGuard, GuardPolicy};
pub use oracle::{Capability, GuildPermissionOracle, PermissionOracle};
pub use request::{
    ActorProfile, BanRequest, DEFAULT_REASON, GuardOutcome, RejectionReason, ResolvedTarget,
    SelfTarget,
};
pub use resolver::{HttpTargetResolver, TargetResolver, member_rank, parse_target_token};
