//! Validator registry and submission validation.
//!
//! Each field kind maps to a `{mandatory, optional}` pair of pure rules,
//! looked up once per visible field. Validation evaluates the whole
//! submission without short-circuiting and reports every failing field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::forms::fields::{FormConfig, ProfileField};
use crate::forms::rules::{self, FieldRule};

/// One failing field with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// The `{mandatory, optional}` rule pair for one field kind.
#[derive(Clone, Copy)]
pub struct FieldRules {
    pub mandatory: FieldRule,
    pub optional: FieldRule,
}

/// Closed registry over the 8 known field kinds.
///
/// Gender deliberately carries the same enum rule in both slots: the field
/// has no optional relaxation, even when an admin marks it optional.
pub fn rules_for(field: ProfileField) -> FieldRules {
    match field {
        ProfileField::FullName => FieldRules {
            mandatory: rules::full_name_mandatory,
            optional: rules::any_string,
        },
        ProfileField::Email => FieldRules {
            mandatory: rules::email_mandatory,
            optional: rules::email_optional,
        },
        ProfileField::PhoneNumber => FieldRules {
            mandatory: rules::phone_mandatory,
            optional: rules::any_string,
        },
        ProfileField::LinkedinLink => FieldRules {
            mandatory: rules::linkedin_mandatory,
            optional: rules::linkedin_optional,
        },
        ProfileField::Gender => FieldRules {
            mandatory: rules::gender_rule,
            optional: rules::gender_rule,
        },
        ProfileField::Domicile => FieldRules {
            mandatory: rules::domicile_mandatory,
            optional: rules::any_string,
        },
        ProfileField::DateOfBirth => FieldRules {
            mandatory: rules::date_of_birth_mandatory,
            optional: rules::any_string,
        },
        ProfileField::PhotoProfile => FieldRules {
            mandatory: rules::photo_profile_mandatory,
            optional: rules::any_string,
        },
    }
}

/// A validator bound to one visible field of a snapshot.
struct BoundValidator {
    field: ProfileField,
    rule: FieldRule,
}

/// Builds the validator set for a stored snapshot. Only fields present in
/// the snapshot (state was not `off`) appear; the mandatory or optional
/// rule is selected per field from the snapshot's `required` flag.
fn build_validators(config: &FormConfig) -> Vec<BoundValidator> {
    config
        .fields()
        .filter_map(|form_field| {
            let field = ProfileField::from_key(&form_field.key)?;
            let rules = rules_for(field);
            let rule = if form_field.validation.required {
                rules.mandatory
            } else {
                rules.optional
            };
            Some(BoundValidator { field, rule })
        })
        .collect()
}

/// Validates a submission against a job's snapshot. Missing keys are
/// treated as empty values so required-field messages still surface.
/// Returns the complete set of violations, never only the first.
pub fn validate_submission(
    config: &FormConfig,
    data: &BTreeMap<String, String>,
) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    for validator in build_validators(config) {
        let value = data
            .get(validator.field.key())
            .map(String::as_str)
            .unwrap_or("");
        if let Err(message) = (validator.rule)(value) {
            violations.push(FieldViolation {
                field: validator.field.key().to_string(),
                message,
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Validates only the keys present in `data`, for partial edits of an
/// already-stored application. Absent fields are left alone instead of
/// being re-required.
pub fn validate_partial(
    config: &FormConfig,
    data: &BTreeMap<String, String>,
) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    for validator in build_validators(config) {
        let Some(value) = data.get(validator.field.key()) else {
            continue;
        };
        if let Err(message) = (validator.rule)(value) {
            violations.push(FieldViolation {
                field: validator.field.key().to_string(),
                message,
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Restricts a submission to the fields visible in the snapshot. Off
/// fields and unknown keys are dropped entirely, never null-padded.
pub fn filter_payload(
    config: &FormConfig,
    data: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    data.iter()
        .filter(|(key, _)| config.fields().any(|f| &f.key == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
