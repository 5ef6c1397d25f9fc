//! Certificate document rendering.
//!
//! The issued document is a plain-text summary of the application and, for
//! vital records, the reserved appointment. Only its storage reference and
//! SHA-256 digest are persisted alongside the certificate record.

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use crate::application::{ApplicationCategory, VitalSubtype};
use crate::appointment::Appointment;
use crate::types::{DbId, Timestamp};

/// Everything the renderer needs to know about an approval.
#[derive(Debug, Clone)]
pub struct CertificateContent<'a> {
    pub application_id: DbId,
    pub applicant_name: &'a str,
    pub category: ApplicationCategory,
    pub subtype: Option<VitalSubtype>,
    pub form: &'a serde_json::Value,
    pub appointment: Option<&'a Appointment>,
    pub approved_by: DbId,
    pub issued_at: Timestamp,
}

/// A rendered document ready to hand to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub sha256: String,
}

fn title(category: ApplicationCategory, subtype: Option<VitalSubtype>) -> &'static str {
    match (category, subtype) {
        (ApplicationCategory::TaxId, _) => "TAX IDENTIFICATION APPROVAL",
        (ApplicationCategory::VitalRecord, Some(VitalSubtype::Birth)) => {
            "BIRTH REGISTRATION APPROVAL"
        }
        (ApplicationCategory::VitalRecord, Some(VitalSubtype::Marriage)) => {
            "MARRIAGE REGISTRATION APPROVAL"
        }
        (ApplicationCategory::VitalRecord, None) => "VITAL RECORD APPROVAL",
    }
}

fn field_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Render the document. Form fields are listed in key order so identical
/// input produces identical bytes.
pub fn render(content: &CertificateContent<'_>) -> RenderedDocument {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", title(content.category, content.subtype));
    let _ = writeln!(out, "Reference: APP-{:08}", content.application_id);
    let _ = writeln!(out, "Applicant: {}", content.applicant_name);
    let _ = writeln!(out, "Category: {}", content.category.as_str());
    if let Some(subtype) = content.subtype {
        let _ = writeln!(out, "Type: {}", subtype.as_str());
    }
    let _ = writeln!(out, "Approved by officer: {}", content.approved_by);
    let _ = writeln!(out, "Issued at: {}", content.issued_at.to_rfc3339());

    let _ = writeln!(out);
    let _ = writeln!(out, "Details");
    if let Some(fields) = content.form.as_object() {
        let mut keys: Vec<&String> = fields.keys().collect();
        keys.sort();
        for key in keys {
            let _ = writeln!(out, "  {key}: {}", field_value(&fields[key]));
        }
    }

    if let Some(appt) = content.appointment {
        let _ = writeln!(out);
        let _ = writeln!(out, "Appointment for document collection");
        let _ = writeln!(out, "  Date: {}", appt.date.format("%Y-%m-%d (%A)"));
        let _ = writeln!(out, "  Period: {}", appt.period);
        let _ = writeln!(out, "  Time: {}", appt.time_range);
    }

    let bytes = out.into_bytes();
    let sha256 = format!("{:x}", Sha256::digest(&bytes));
    RenderedDocument { bytes, sha256 }
}
