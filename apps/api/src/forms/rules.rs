//! Pure per-field validators. Each returns the user-facing message on
//! failure so the engine can aggregate violations verbatim.

use url::Url;

pub type FieldRule = fn(&str) -> Result<(), String>;

pub fn full_name_mandatory(value: &str) -> Result<(), String> {
    non_empty(value, "Full name is required")
}

pub fn email_mandatory(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Email is required".to_string());
    }
    if !is_email(value) {
        return Err("Please enter your email in the format: name@example.com".to_string());
    }
    Ok(())
}

pub fn email_optional(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    if !is_email(value) {
        return Err("Invalid email address".to_string());
    }
    Ok(())
}

pub fn phone_mandatory(value: &str) -> Result<(), String> {
    if value.len() < 8 {
        return Err("Phone number must be at least 8 digits".to_string());
    }
    Ok(())
}

pub fn linkedin_mandatory(value: &str) -> Result<(), String> {
    if value.is_empty() || Url::parse(value).is_err() {
        return Err(
            "Please copy paste your Linkedin URL, example: https://www.linkedin.com/in/username"
                .to_string(),
        );
    }
    Ok(())
}

pub fn linkedin_optional(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    if Url::parse(value).is_err() {
        return Err("Invalid LinkedIn URL".to_string());
    }
    Ok(())
}

/// Gender is enum-enforced whenever the field is visible, regardless of
/// its configured state. The engine wires this into both registry slots.
pub fn gender_rule(value: &str) -> Result<(), String> {
    match value {
        "male" | "female" => Ok(()),
        _ => Err("Please select a gender".to_string()),
    }
}

pub fn domicile_mandatory(value: &str) -> Result<(), String> {
    non_empty(value, "Domicile is required")
}

pub fn date_of_birth_mandatory(value: &str) -> Result<(), String> {
    non_empty(value, "Date of birth is required")
}

pub fn photo_profile_mandatory(value: &str) -> Result<(), String> {
    non_empty(value, "Profile photo is required")
}

/// Optional text fields accept any string, including empty.
pub fn any_string(_value: &str) -> Result<(), String> {
    Ok(())
}

fn non_empty(value: &str, message: &str) -> Result<(), String> {
    if value.is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// Structural email check: exactly one `@`, a non-empty local part, and a
/// dotted domain without whitespace.
fn is_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if value.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
