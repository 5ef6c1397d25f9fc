//! User roles and role-specific profiles.
//!
//! A user is one record with a `role` discriminator. The role-specific
//! payload is modelled as [`UserKind`] so callers pattern-match instead of
//! probing nullable columns.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_CITIZEN: &str = "citizen";
pub const ROLE_OFFICER: &str = "officer";
pub const ROLE_ADMIN: &str = "admin";

/// The discriminator stored in `users.role` and carried in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Officer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Citizen => ROLE_CITIZEN,
            Role::Officer => ROLE_OFFICER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            ROLE_CITIZEN => Ok(Role::Citizen),
            ROLE_OFFICER => Ok(Role::Officer),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!("Unknown role '{other}'"))),
        }
    }
}

/// Officer department. Only approvers receive new applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Approver,
    Support,
}

impl Department {
    pub fn as_str(self) -> &'static str {
        match self {
            Department::Approver => "approver",
            Department::Support => "support",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "approver" => Ok(Department::Approver),
            "support" => Ok(Department::Support),
            other => Err(CoreError::Validation(format!(
                "Unknown department '{other}'"
            ))),
        }
    }
}

/// Officer-only attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfficerProfile {
    pub department: Department,
    pub subcity: String,
    pub on_leave: bool,
    /// Count of unresolved assigned requests. Advisory only.
    pub workload: i32,
}

/// Citizen-only attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CitizenProfile {
    pub id_document_front: Option<String>,
    pub id_document_back: Option<String>,
}

impl CitizenProfile {
    /// Identity gate: both sides of the ID must be on file.
    pub fn has_complete_identity(&self) -> bool {
        let present = |doc: &Option<String>| doc.as_deref().is_some_and(|d| !d.trim().is_empty());
        present(&self.id_document_front) && present(&self.id_document_back)
    }
}

/// Role-tagged user payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum UserKind {
    Citizen(CitizenProfile),
    Officer(OfficerProfile),
    Admin,
}

impl UserKind {
    pub fn role(&self) -> Role {
        match self {
            UserKind::Citizen(_) => Role::Citizen,
            UserKind::Officer(_) => Role::Officer,
            UserKind::Admin => Role::Admin,
        }
    }
}
