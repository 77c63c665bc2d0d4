//! Attendance form validation.
//!
//! Every field is checked and every failure collected, so the form can mark
//! all offending inputs at once. Messages are the ones shown under each
//! input.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::collections::BTreeMap;

use serde::Deserialize;
use signature::artifact::SignatureArtifact;

use super::attendance::NewAttendance;
use super::catalog;

pub const MSG_NAME_REQUIRED: &str = "Nama harus diisi";
pub const MSG_NIP_REQUIRED: &str = "NIP harus diisi";
pub const MSG_NIP_DIGITS: &str = "NIP hanya boleh berisi angka";
pub const MSG_POSITION_REQUIRED: &str = "Jabatan harus diisi";
pub const MSG_INSTITUTION_REQUIRED: &str = "Instansi harus diisi";
pub const MSG_REGION_REQUIRED: &str = "Wilayah harus dipilih";
pub const MSG_DEPARTMENT_REQUIRED: &str = "Bidang/Urusan harus dipilih";
pub const MSG_SIGNATURE_REQUIRED: &str = "Tanda tangan harus diisi";
pub const MSG_SIGNATURE_INVALID: &str = "Tanda tangan tidak valid";

/// Field name → message, in field-name order.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

#[derive(Debug, thiserror::Error)]
#[error("form has {} invalid field(s)", .0.len())]
pub struct ValidationError(pub FieldErrors);

impl crate::routes::ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        "E_VALIDATION"
    }
}

/// Raw form body as submitted. Missing fields deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AttendanceForm {
    pub name: String,
    pub nip: String,
    pub position: String,
    pub institution: String,
    pub region: String,
    pub department: String,
    pub signature: String,
}

/// Check a submission and produce the record to store.
///
/// # Errors
///
/// Returns [`ValidationError`] carrying one message per invalid field.
pub fn validate(form: AttendanceForm) -> Result<NewAttendance, ValidationError> {
    let mut errors = FieldErrors::new();

    let name = required(&form.name, "name", MSG_NAME_REQUIRED, &mut errors);
    let position = required(&form.position, "position", MSG_POSITION_REQUIRED, &mut errors);
    let institution = required(&form.institution, "institution", MSG_INSTITUTION_REQUIRED, &mut errors);

    let nip = form.nip.trim();
    if nip.is_empty() {
        errors.insert("nip", MSG_NIP_REQUIRED);
    } else if !nip.chars().all(|c| c.is_ascii_digit()) {
        errors.insert("nip", MSG_NIP_DIGITS);
    }

    let region = form.region.trim();
    if !catalog::is_region(region) {
        errors.insert("region", MSG_REGION_REQUIRED);
    }
    let department = form.department.trim();
    if !catalog::is_department(department) {
        errors.insert("department", MSG_DEPARTMENT_REQUIRED);
    }

    let signature = SignatureArtifact::from_stored(form.signature.trim());
    if signature.is_empty() {
        errors.insert("signature", MSG_SIGNATURE_REQUIRED);
    } else {
        match signature.decode() {
            Ok(image) if image.pixels().iter().any(|p| p.alpha() > 0) => {}
            Ok(_) => {
                tracing::debug!("rejecting signature without ink");
                errors.insert("signature", MSG_SIGNATURE_INVALID);
            }
            Err(e) => {
                tracing::debug!(error = %e, "rejecting undecodable signature");
                errors.insert("signature", MSG_SIGNATURE_INVALID);
            }
        }
    }

    if !errors.is_empty() {
        return Err(ValidationError(errors));
    }

    Ok(NewAttendance {
        name,
        nip: nip.to_owned(),
        position,
        institution,
        region: region.to_owned(),
        department: department.to_owned(),
        signature,
    })
}

fn required(value: &str, field: &'static str, message: &'static str, errors: &mut FieldErrors) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.insert(field, message);
    }
    trimmed.to_owned()
}
