//! User entity model and DTOs.

use civic_core::error::CoreError;
use civic_core::roles::{CitizenProfile, Department, OfficerProfile, Role, UserKind};
use civic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Role-specific columns are nullable; use [`User::kind`] to get the typed
/// payload instead of reading them directly.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub department: Option<String>,
    pub subcity: Option<String>,
    pub on_leave: bool,
    pub workload: i32,
    pub id_document_front: Option<String>,
    pub id_document_back: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Build the role-tagged view of this row.
    pub fn kind(&self) -> Result<UserKind, CoreError> {
        match Role::parse(&self.role)? {
            Role::Citizen => Ok(UserKind::Citizen(CitizenProfile {
                id_document_front: self.id_document_front.clone(),
                id_document_back: self.id_document_back.clone(),
            })),
            Role::Officer => {
                let department = self.department.as_deref().ok_or_else(|| {
                    CoreError::Internal(format!("Officer {} has no department", self.id))
                })?;
                let subcity = self.subcity.clone().ok_or_else(|| {
                    CoreError::Internal(format!("Officer {} has no subcity", self.id))
                })?;
                Ok(UserKind::Officer(OfficerProfile {
                    department: Department::parse(department)?,
                    subcity,
                    on_leave: self.on_leave,
                    workload: self.workload,
                }))
            }
            Role::Admin => Ok(UserKind::Admin),
        }
    }
}

/// DTO for creating a new user. Accounts are provisioned by administration.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<Department>,
    pub subcity: Option<String>,
}
