//! Officer selection for new applications.
//!
//! Eligible officers are approvers in the requested subcity who are not on
//! leave. Among those, the one with the lowest workload wins; ties go to the
//! lowest id. Workload is a routing hint, not a hard resource, so no locking
//! is required around it.

use crate::error::CoreError;
use crate::roles::{Department, OfficerProfile};
use crate::types::DbId;

/// Message returned when no eligible officer exists.
pub const NO_OFFICER_AVAILABLE: &str = "No officers are currently available for this subcity";

/// Form key that carries the applicant's subcity.
pub const SUBCITY_FIELD: &str = "subcity";

/// An officer considered for assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficerCandidate {
    pub officer_id: DbId,
    pub profile: OfficerProfile,
}

/// Whether an officer may receive new applications for `subcity`.
pub fn is_eligible(profile: &OfficerProfile, subcity: &str) -> bool {
    !profile.on_leave && profile.department == Department::Approver && profile.subcity == subcity
}

/// Pick the least-loaded eligible officer.
pub fn select_least_loaded<'a>(
    candidates: &'a [OfficerCandidate],
    subcity: &str,
) -> Option<&'a OfficerCandidate> {
    candidates
        .iter()
        .filter(|c| is_eligible(&c.profile, subcity))
        .min_by_key(|c| (c.profile.workload, c.officer_id))
}

/// Pull the subcity out of a submitted form.
///
/// Missing or blank is a caller error.
pub fn subcity_from_form(form: &serde_json::Value) -> Result<String, CoreError> {
    form.get(SUBCITY_FIELD)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CoreError::Validation("Subcity is required.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn officer(id: DbId, subcity: &str, workload: i32) -> OfficerCandidate {
        OfficerCandidate {
            officer_id: id,
            profile: OfficerProfile {
                department: Department::Approver,
                subcity: subcity.to_string(),
                on_leave: false,
                workload,
            },
        }
    }

    #[test]
    fn picks_lowest_workload_in_subcity() {
        let pool = vec![
            officer(1, "Bole", 4),
            officer(2, "Bole", 1),
            officer(3, "Arada", 0),
        ];
        let chosen = select_least_loaded(&pool, "Bole").unwrap();
        assert_eq!(chosen.officer_id, 2);
    }

    #[test]
    fn skips_officers_on_leave_and_support_staff() {
        let mut on_leave = officer(1, "Bole", 0);
        on_leave.profile.on_leave = true;
        let mut support = officer(2, "Bole", 0);
        support.profile.department = Department::Support;
        let pool = vec![on_leave, support, officer(3, "Bole", 9)];

        let chosen = select_least_loaded(&pool, "Bole").unwrap();
        assert_eq!(chosen.officer_id, 3);
    }

    #[test]
    fn ties_break_on_lowest_id() {
        let pool = vec![officer(8, "Bole", 2), officer(5, "Bole", 2)];
        assert_eq!(select_least_loaded(&pool, "Bole").unwrap().officer_id, 5);
    }

    #[test]
    fn no_eligible_officer_yields_none() {
        let pool = vec![officer(1, "Arada", 0)];
        assert!(select_least_loaded(&pool, "Bole").is_none());
        assert!(select_least_loaded(&[], "Bole").is_none());
    }

    #[test]
    fn subcity_is_required_in_form() {
        let form = serde_json::json!({ "subcity": "  Bole " });
        assert_eq!(subcity_from_form(&form).unwrap(), "Bole");

        assert!(subcity_from_form(&serde_json::json!({})).is_err());
        assert!(subcity_from_form(&serde_json::json!({ "subcity": "" })).is_err());
        assert!(subcity_from_form(&serde_json::json!({ "subcity": 12 })).is_err());
    }
}
