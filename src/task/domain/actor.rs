//! Caller identity and role capabilities.
//!
//! Authentication and role resolution happen outside the engine; every
//! operation receives an [`Actor`] describing who is calling and with which
//! role. Capability decisions are consolidated here so mutating operations
//! never branch on role strings themselves.

use super::{ParseRoleError, StaffId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Organisational role attached to a caller identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// May assign and reassign tasks across staff.
    Manager,
    /// Executes tasks assigned to them.
    Staff,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }

    /// Whether this role may create, reassign, delete, and approve retries
    /// for tasks.
    #[must_use]
    pub const fn can_assign(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Authenticated caller identity, resolved by the external identity
/// collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: StaffId,
    role: Role,
}

impl Actor {
    /// Creates an actor from a resolved identity and role.
    #[must_use]
    pub const fn new(id: StaffId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns the staff identifier.
    #[must_use]
    pub const fn id(&self) -> StaffId {
        self.id
    }

    /// Returns the caller's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}
