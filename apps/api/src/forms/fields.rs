use serde::{Deserialize, Serialize};

/// The closed set of candidate-profile fields a job posting may collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    FullName,
    PhotoProfile,
    Gender,
    Domicile,
    Email,
    PhoneNumber,
    LinkedinLink,
    DateOfBirth,
}

/// All fields, in the order the admin configuration screen lists them.
pub const ALL_FIELDS: [ProfileField; 8] = [
    ProfileField::FullName,
    ProfileField::PhotoProfile,
    ProfileField::Gender,
    ProfileField::Domicile,
    ProfileField::Email,
    ProfileField::PhoneNumber,
    ProfileField::LinkedinLink,
    ProfileField::DateOfBirth,
];

/// Fields pinned to `mandatory` by system policy. The configuring admin
/// cannot relax these.
pub const LOCKED_FIELDS: [ProfileField; 3] = [
    ProfileField::FullName,
    ProfileField::Email,
    ProfileField::PhotoProfile,
];

impl ProfileField {
    pub fn key(&self) -> &'static str {
        match self {
            ProfileField::FullName => "full_name",
            ProfileField::PhotoProfile => "photo_profile",
            ProfileField::Gender => "gender",
            ProfileField::Domicile => "domicile",
            ProfileField::Email => "email",
            ProfileField::PhoneNumber => "phone_number",
            ProfileField::LinkedinLink => "linkedin_link",
            ProfileField::DateOfBirth => "date_of_birth",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ALL_FIELDS.iter().copied().find(|f| f.key() == key)
    }

    pub fn is_locked(&self) -> bool {
        LOCKED_FIELDS.contains(self)
    }
}

/// Configuration state of a single field on a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldState {
    Mandatory,
    Optional,
    Off,
}

/// One state per profile field, as submitted from the job-creation screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileFieldStates {
    pub full_name: FieldState,
    pub photo_profile: FieldState,
    pub gender: FieldState,
    pub domicile: FieldState,
    pub email: FieldState,
    pub phone_number: FieldState,
    pub linkedin_link: FieldState,
    pub date_of_birth: FieldState,
}

impl ProfileFieldStates {
    /// Everything mandatory — the job-creation screen's starting point.
    pub fn all_mandatory() -> Self {
        Self {
            full_name: FieldState::Mandatory,
            photo_profile: FieldState::Mandatory,
            gender: FieldState::Mandatory,
            domicile: FieldState::Mandatory,
            email: FieldState::Mandatory,
            phone_number: FieldState::Mandatory,
            linkedin_link: FieldState::Mandatory,
            date_of_birth: FieldState::Mandatory,
        }
    }

    pub fn state_of(&self, field: ProfileField) -> FieldState {
        match field {
            ProfileField::FullName => self.full_name,
            ProfileField::PhotoProfile => self.photo_profile,
            ProfileField::Gender => self.gender,
            ProfileField::Domicile => self.domicile,
            ProfileField::Email => self.email,
            ProfileField::PhoneNumber => self.phone_number,
            ProfileField::LinkedinLink => self.linkedin_link,
            ProfileField::DateOfBirth => self.date_of_birth,
        }
    }

    /// Rejects any attempt to configure a policy-locked field below
    /// `mandatory`. Returns every offending field, not just the first.
    pub fn check_policy(&self) -> Result<(), Vec<ProfileField>> {
        let offending: Vec<ProfileField> = LOCKED_FIELDS
            .iter()
            .copied()
            .filter(|f| self.state_of(*f) != FieldState::Mandatory)
            .collect();
        if offending.is_empty() {
            Ok(())
        } else {
            Err(offending)
        }
    }
}

/// A single field entry inside a stored form-config snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    pub key: String,
    pub validation: FieldValidation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValidation {
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSection {
    pub title: String,
    pub fields: Vec<FormField>,
}

/// The form-config snapshot stored on a job row at creation time.
/// Fields configured `off` are omitted entirely, never carried as null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub sections: Vec<FormSection>,
}

impl FormConfig {
    /// Builds the applicant-facing snapshot from the configured states.
    pub fn from_states(states: &ProfileFieldStates) -> Self {
        let fields = ALL_FIELDS
            .iter()
            .filter_map(|field| match states.state_of(*field) {
                FieldState::Off => None,
                state => Some(FormField {
                    key: field.key().to_string(),
                    validation: FieldValidation {
                        required: state == FieldState::Mandatory,
                    },
                }),
            })
            .collect();

        FormConfig {
            sections: vec![FormSection {
                title: "Minimum Profile Information Required".to_string(),
                fields,
            }],
        }
    }

    /// Flat view over all sections.
    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn contains(&self, field: ProfileField) -> bool {
        self.fields().any(|f| f.key == field.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for field in ALL_FIELDS {
            assert_eq!(ProfileField::from_key(field.key()), Some(field));
        }
        assert_eq!(ProfileField::from_key("favorite_color"), None);
    }

    #[test]
    fn test_locked_fields_are_the_policy_trio() {
        assert!(ProfileField::FullName.is_locked());
        assert!(ProfileField::Email.is_locked());
        assert!(ProfileField::PhotoProfile.is_locked());
        assert!(!ProfileField::Gender.is_locked());
        assert!(!ProfileField::DateOfBirth.is_locked());
    }

    #[test]
    fn test_policy_rejects_relaxed_locked_field() {
        let mut states = ProfileFieldStates::all_mandatory();
        states.email = FieldState::Optional;
        states.photo_profile = FieldState::Off;
        let offending = states.check_policy().unwrap_err();
        assert_eq!(
            offending,
            vec![ProfileField::Email, ProfileField::PhotoProfile]
        );
    }

    #[test]
    fn test_policy_allows_unlocked_fields_any_state() {
        let mut states = ProfileFieldStates::all_mandatory();
        states.gender = FieldState::Optional;
        states.domicile = FieldState::Off;
        states.linkedin_link = FieldState::Off;
        assert!(states.check_policy().is_ok());
    }

    #[test]
    fn test_snapshot_omits_off_fields() {
        let mut states = ProfileFieldStates::all_mandatory();
        states.domicile = FieldState::Off;
        states.linkedin_link = FieldState::Off;
        let config = FormConfig::from_states(&states);
        assert!(!config.contains(ProfileField::Domicile));
        assert!(!config.contains(ProfileField::LinkedinLink));
        assert_eq!(config.fields().count(), 6);
    }

    #[test]
    fn test_snapshot_marks_optional_fields_not_required() {
        let mut states = ProfileFieldStates::all_mandatory();
        states.phone_number = FieldState::Optional;
        let config = FormConfig::from_states(&states);
        let phone = config
            .fields()
            .find(|f| f.key == "phone_number")
            .expect("phone present");
        assert!(!phone.validation.required);
        let name = config.fields().find(|f| f.key == "full_name").unwrap();
        assert!(name.validation.required);
    }

    #[test]
    fn test_snapshot_is_detached_from_later_state_edits() {
        let mut states = ProfileFieldStates::all_mandatory();
        let config = FormConfig::from_states(&states);
        states.domicile = FieldState::Off;
        // The snapshot built before the edit still carries domicile.
        assert!(config.contains(ProfileField::Domicile));
    }

    #[test]
    fn test_snapshot_serializes_with_stable_keys() {
        let config = FormConfig::from_states(&ProfileFieldStates::all_mandatory());
        let json = serde_json::to_value(&config).unwrap();
        let fields = json["sections"][0]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[0]["key"], "full_name");
        assert_eq!(fields[0]["validation"]["required"], true);
    }
}
