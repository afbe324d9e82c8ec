//! crates/prepwise_core/src/onboarding.rs
//!
//! The three-step onboarding wizard: form state, per-step presence checks and
//! the conversion into a complete `UserProfile`.

use std::fmt;

use crate::domain::UserProfile;

pub const EXAMS: &[&str] = &["NEET", "JEE", "UPSC", "CAT", "GATE", "SSC", "Banking", "Other"];
pub const SUBJECTS: &[&str] = &[
    "Biology",
    "Physics",
    "Chemistry",
    "Mathematics",
    "English",
    "Computer Science",
];
pub const UNDERSTANDING_LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced"];
pub const SCHOOL_YEARS: &[&str] = &[
    "Class 9",
    "Class 10",
    "Class 11",
    "Class 12",
    "Undergraduate",
    "Postgraduate",
];
pub const TARGET_YEARS: &[&str] = &["2025", "2026", "2027", "2028", "2029", "2030"];
pub const STUDY_TIMES: &[&str] = &[
    "1 hour", "2 hours", "3 hours", "4 hours", "6 hours", "8 hours", "12 hours", "14+ hours",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Basics,
    Preferences,
    Schedule,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Basics, WizardStep::Preferences, WizardStep::Schedule];

    pub fn next(self) -> Option<Self> {
        match self {
            WizardStep::Basics => Some(WizardStep::Preferences),
            WizardStep::Preferences => Some(WizardStep::Schedule),
            WizardStep::Schedule => None,
        }
    }

    /// One-based step number as shown in the step indicator.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Basics => 1,
            WizardStep::Preferences => 2,
            WizardStep::Schedule => 3,
        }
    }
}

/// A form field that failed its presence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Exam,
    Subjects,
    UnderstandingLevel,
    SchoolYear,
    TargetYear,
    DailyStudyTime,
}

impl FormField {
    pub fn message(self) -> &'static str {
        match self {
            FormField::Name => "Name is required",
            FormField::Exam => "Please select an exam",
            FormField::Subjects => "Please select at least one subject",
            FormField::UnderstandingLevel => "Please select your understanding level",
            FormField::SchoolYear => "Please select your current school year",
            FormField::TargetYear => "Please select your target year",
            FormField::DailyStudyTime => "Please select your daily study time",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Step {} is incomplete: {}", .step.number(), join_messages(.missing))]
pub struct OnboardingError {
    pub step: WizardStep,
    pub missing: Vec<FormField>,
}

fn join_messages(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|f| f.message())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The in-progress answers of the onboarding wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingForm {
    pub name: String,
    pub exam: String,
    pub subjects: Vec<String>,
    pub understanding_level: String,
    pub school_year: String,
    pub target_year: String,
    pub daily_study_time: String,
}

impl OnboardingForm {
    /// Adds the subject if absent, removes it if present.
    pub fn toggle_subject(&mut self, subject: &str) {
        if let Some(pos) = self.subjects.iter().position(|s| s == subject) {
            self.subjects.remove(pos);
        } else {
            self.subjects.push(subject.to_string());
        }
    }

    /// Returns every field of `step` that is still missing.
    pub fn validate_step(&self, step: WizardStep) -> Result<(), OnboardingError> {
        let mut missing = Vec::new();
        match step {
            WizardStep::Basics => {
                if self.name.trim().is_empty() {
                    missing.push(FormField::Name);
                }
                if self.exam.is_empty() {
                    missing.push(FormField::Exam);
                }
            }
            WizardStep::Preferences => {
                if self.subjects.is_empty() {
                    missing.push(FormField::Subjects);
                }
                if self.understanding_level.is_empty() {
                    missing.push(FormField::UnderstandingLevel);
                }
            }
            WizardStep::Schedule => {
                if self.school_year.is_empty() {
                    missing.push(FormField::SchoolYear);
                }
                if self.target_year.is_empty() {
                    missing.push(FormField::TargetYear);
                }
                if self.daily_study_time.is_empty() {
                    missing.push(FormField::DailyStudyTime);
                }
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(OnboardingError { step, missing })
        }
    }

    /// Validates the steps in order and stops at the first incomplete one.
    pub fn validate_all(&self) -> Result<(), OnboardingError> {
        WizardStep::ALL
            .iter()
            .try_for_each(|&step| self.validate_step(step))
    }

    /// Builds the complete profile for `session_id`, validating every step first.
    pub fn into_profile(self, session_id: impl Into<String>) -> Result<UserProfile, OnboardingError> {
        self.validate_all()?;
        Ok(UserProfile {
            session_id: session_id.into(),
            name: self.name,
            exam: self.exam,
            subjects: self.subjects,
            understanding_level: self.understanding_level,
            school_year: self.school_year,
            target_year: self.target_year,
            daily_study_time: self.daily_study_time,
            is_profile_complete: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> OnboardingForm {
        OnboardingForm {
            name: "Asha".into(),
            exam: "NEET".into(),
            subjects: vec!["Biology".into()],
            understanding_level: "Beginner".into(),
            school_year: "Class 11".into(),
            target_year: "2027".into(),
            daily_study_time: "2 hours".into(),
        }
    }

    #[test]
    fn blank_name_fails_basics() {
        let form = OnboardingForm {
            name: "   ".into(),
            ..filled_form()
        };
        let err = form.validate_step(WizardStep::Basics).unwrap_err();
        assert_eq!(err.missing, vec![FormField::Name]);
        assert!(form.validate_step(WizardStep::Preferences).is_ok());
    }

    #[test]
    fn empty_form_reports_every_field_of_the_step() {
        let form = OnboardingForm::default();
        let err = form.validate_step(WizardStep::Schedule).unwrap_err();
        assert_eq!(
            err.missing,
            vec![FormField::SchoolYear, FormField::TargetYear, FormField::DailyStudyTime]
        );
        assert_eq!(
            form.validate_all().unwrap_err().step,
            WizardStep::Basics
        );
    }

    #[test]
    fn error_message_lists_missing_fields() {
        let err = OnboardingForm::default()
            .validate_step(WizardStep::Preferences)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Step 2 is incomplete: Please select at least one subject; Please select your understanding level"
        );
    }

    #[test]
    fn toggle_subject_adds_then_removes() {
        let mut form = OnboardingForm::default();
        form.toggle_subject("Physics");
        form.toggle_subject("Biology");
        form.toggle_subject("Physics");
        assert_eq!(form.subjects, vec!["Biology".to_string()]);
    }

    #[test]
    fn complete_form_becomes_complete_profile() {
        let profile = filled_form().into_profile("s1").unwrap();
        assert_eq!(profile.session_id, "s1");
        assert_eq!(profile.exam, "NEET");
        assert!(profile.is_profile_complete);
    }

    #[test]
    fn steps_walk_forward() {
        assert_eq!(WizardStep::Basics.next(), Some(WizardStep::Preferences));
        assert_eq!(WizardStep::Schedule.next(), None);
    }
}
