//! Participant intake: consent and the baseline demographic record.
//!
//! Every categorical field is a closed enum whose serialized form is the label
//! shown to the participant, so an unknown label is rejected at deserialization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AgeCategory {
    #[default]
    #[serde(rename = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    From26To35,
    #[serde(rename = "36-45")]
    From36To45,
    #[serde(rename = "46-55")]
    From46To55,
    #[serde(rename = "56+")]
    Over56,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotherLanguage {
    #[default]
    Hindi,
    English,
    Bengali,
    Tamil,
    Telugu,
    Marathi,
    Gujarati,
    Kannada,
    Malayalam,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AcademicStatus {
    #[default]
    #[serde(rename = "Pursuing UG")]
    PursuingUg,
    #[serde(rename = "Pursuing PG")]
    PursuingPg,
    #[serde(rename = "Completed UG")]
    CompletedUg,
    #[serde(rename = "Completed PG")]
    CompletedPg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[default]
    Employed,
    #[serde(rename = "Not Employed")]
    NotEmployed,
    Retired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Handedness {
    #[default]
    Right,
    Left,
    Ambidextrous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Device {
    #[default]
    Laptop,
    Desktop,
    Mobile,
    Tablet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisionStatus {
    #[default]
    Normal,
    #[serde(rename = "Corrected to Normal")]
    CorrectedToNormal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriorExposure {
    Yes,
    #[default]
    No,
}

/// Validated demographic record, captured once when the participant starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub name: String,
    pub age_category: AgeCategory,
    pub gender: Gender,
    pub hometown: String,
    pub current_city: String,
    pub mother_language: MotherLanguage,
    pub academic_status: AcademicStatus,
    pub service_status: ServiceStatus,
    pub handedness: Handedness,
    pub device: Device,
    pub vision_status: VisionStatus,
    pub prior_exposure: PriorExposure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConsentError {
    #[error("You must provide consent to proceed.")]
    MissingConsent,
    #[error("Please enter your name.")]
    EmptyName,
}

/// Raw intake form as submitted; missing fields take the form's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentForm {
    pub consent: bool,
    pub name: String,
    pub age_category: AgeCategory,
    pub gender: Gender,
    pub hometown: String,
    pub current_city: String,
    pub mother_language: MotherLanguage,
    pub academic_status: AcademicStatus,
    pub service_status: ServiceStatus,
    pub handedness: Handedness,
    pub device: Device,
    pub vision_status: VisionStatus,
    pub prior_exposure: PriorExposure,
}

impl ConsentForm {
    /// Consent is checked before the name.
    pub fn validate(self) -> Result<Demographics, ConsentError> {
        if !self.consent {
            return Err(ConsentError::MissingConsent);
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ConsentError::EmptyName);
        }
        Ok(Demographics {
            name: name.to_string(),
            age_category: self.age_category,
            gender: self.gender,
            hometown: self.hometown,
            current_city: self.current_city,
            mother_language: self.mother_language,
            academic_status: self.academic_status,
            service_status: self.service_status,
            handedness: self.handedness,
            device: self.device,
            vision_status: self.vision_status,
            prior_exposure: self.prior_exposure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn consent_is_checked_before_name() {
        let form = ConsentForm::default();
        assert_eq!(form.validate(), Err(ConsentError::MissingConsent));
    }

    #[test]
    fn blank_name_is_rejected() {
        let form = ConsentForm {
            consent: true,
            name: "   ".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ConsentError::EmptyName));
    }

    #[test]
    fn labels_deserialize_into_closed_enums() {
        let form: ConsentForm = serde_json::from_str(
            r#"{
                "consent": true,
                "name": " A ",
                "age_category": "56+",
                "academic_status": "Completed PG",
                "service_status": "Not Employed",
                "vision_status": "Corrected to Normal",
                "prior_exposure": "Yes"
            }"#,
        )
        .unwrap();
        let d = form.validate().unwrap();
        assert_eq!(d.name, "A");
        assert_eq!(d.age_category, AgeCategory::Over56);
        assert_eq!(d.academic_status, AcademicStatus::CompletedPg);
        assert_eq!(d.service_status, ServiceStatus::NotEmployed);
        assert_eq!(d.vision_status, VisionStatus::CorrectedToNormal);
        assert_eq!(d.prior_exposure, PriorExposure::Yes);
        assert_eq!(d.handedness, Handedness::Right);
    }

    #[test]
    fn unknown_label_fails_to_parse() {
        let res: Result<ConsentForm, _> =
            serde_json::from_str(r#"{"consent": true, "name": "A", "device": "Watch"}"#);
        assert!(res.is_err());
    }
}
