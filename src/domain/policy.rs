//! Authorization gate consulted before every reservation operation

use super::actor::Actor;
use crate::support::errors::{DomainError, DomainResult};

/// Operations guarded by the access policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Show,
    Edit,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Show => "show",
            Self::Edit => "edit",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

pub trait AccessPolicy: Send + Sync {
    /// `Err(DomainError::Unauthorized)` when the actor may not perform `operation`.
    fn authorize(&self, actor: &Actor, operation: Operation) -> DomainResult<()>;

    /// Second gate for operations on one stored reservation, once its
    /// owner is known.
    fn authorize_owned(
        &self,
        actor: &Actor,
        operation: Operation,
        owner_id: &str,
    ) -> DomainResult<()>;
}

/// Role based policy: staff may do everything. Customers may not delete,
/// and may only read or change reservations they own.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePolicy;

impl AccessPolicy for RolePolicy {
    fn authorize(&self, actor: &Actor, operation: Operation) -> DomainResult<()> {
        let allowed = actor.role.is_staff() || operation != Operation::Delete;

        if allowed {
            Ok(())
        } else {
            Err(DomainError::Unauthorized(format!(
                "role '{}' may not {} reservations",
                actor.role,
                operation.as_str()
            )))
        }
    }

    fn authorize_owned(
        &self,
        actor: &Actor,
        operation: Operation,
        owner_id: &str,
    ) -> DomainResult<()> {
        if actor.role.is_staff() || actor.user_id == owner_id {
            return Ok(());
        }
        Err(DomainError::Unauthorized(format!(
            "user '{}' may not {} another guest's reservation",
            actor.username,
            operation.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::Role;

    fn actor(role: Role) -> Actor {
        Actor::new("u-1", "alice", "alice@example.com", role)
    }

    #[test]
    fn staff_may_delete() {
        assert!(RolePolicy.authorize(&actor(Role::Staff), Operation::Delete).is_ok());
        assert!(RolePolicy.authorize(&actor(Role::Admin), Operation::Delete).is_ok());
    }

    #[test]
    fn customer_cannot_delete() {
        let err = RolePolicy
            .authorize(&actor(Role::Customer), Operation::Delete)
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
        assert!(RolePolicy.authorize(&actor(Role::Customer), Operation::Update).is_ok());
    }

    #[test]
    fn customers_only_touch_their_own_reservations() {
        let customer = actor(Role::Customer);
        assert!(RolePolicy
            .authorize_owned(&customer, Operation::Show, "u-1")
            .is_ok());

        let err = RolePolicy
            .authorize_owned(&customer, Operation::Update, "u-2")
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
        assert!(RolePolicy
            .authorize_owned(&actor(Role::Staff), Operation::Edit, "u-2")
            .is_ok());
    }
}
