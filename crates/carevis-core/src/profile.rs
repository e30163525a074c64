//! Personal info, validation, and the assembled user profile.
//!
//! `PersonalInfoForm` is what the form submits; `PersonalInfo` is what
//! validation produces; `UserProfile` is the terminal aggregate that gates
//! the rest of the application.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::goal::GoalId;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Self-reported activity level. Exactly these five values are recognised.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ActivityLevel {
  Sedentary,
  LightlyActive,
  ModeratelyActive,
  VeryActive,
  ExtremelyActive,
}

/// Optional self-reported gender. No validation is applied beyond parsing.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Gender {
  Male,
  Female,
  NonBinary,
  PreferNotToSay,
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Valid age range, inclusive.
pub const AGE_RANGE: std::ops::RangeInclusive<i64> = 13..=120;

/// Field → message mapping reported back to the caller on validation
/// failure. Keys are the camelCase form-field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl ValidationErrors {
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn get(&self, field: &str) -> Option<&str> {
    self.0.get(field).map(String::as_str)
  }

  fn insert(&mut self, field: &str, message: &str) {
    self.0.insert(field.to_string(), message.to_string());
  }
}

// ─── PersonalInfoForm ────────────────────────────────────────────────────────

/// Raw form input for the personal-info step, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfoForm {
  pub age:            Option<i64>,
  pub activity_level: Option<String>,
  pub gender:         Option<String>,
}

impl PersonalInfoForm {
  /// Validate on submit, per the step contract:
  /// age must be present and in [13, 120]; activity level must be present
  /// and one of the five recognised values; gender is optional and an
  /// unparseable value is treated as absent rather than rejected.
  pub fn validate(&self) -> Result<PersonalInfo, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let age = match self.age {
      Some(age) if AGE_RANGE.contains(&age) => Some(age as u8),
      _ => {
        errors.insert("age", "Please enter a valid age between 13 and 120");
        None
      }
    };

    let activity_level = match &self.activity_level {
      Some(s) => s.parse::<ActivityLevel>().ok(),
      None => None,
    };
    if activity_level.is_none() {
      errors.insert("activityLevel", "Please select your activity level");
    }

    match (age, activity_level) {
      (Some(age), Some(activity_level)) if errors.is_empty() => {
        Ok(PersonalInfo {
          age,
          activity_level,
          gender: self.gender.as_deref().and_then(|g| g.parse().ok()),
        })
      }
      _ => Err(errors),
    }
  }
}

// ─── PersonalInfo ────────────────────────────────────────────────────────────

/// Validated personal info, persisted by the personal-info step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
  pub age:            u8,
  pub activity_level: ActivityLevel,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gender:         Option<Gender>,
}

// ─── ResolvedGoals ───────────────────────────────────────────────────────────

/// The goal fields that flow into profile assembly, after the resolution
/// order (canonical record → legacy record → default) has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGoals {
  pub goals:        Vec<GoalId>,
  pub primary_goal: GoalId,
}

impl Default for ResolvedGoals {
  fn default() -> Self {
    Self {
      goals:        vec![GoalId::DEFAULT],
      primary_goal: GoalId::DEFAULT,
    }
  }
}

impl ResolvedGoals {
  pub fn single(id: GoalId) -> Self {
    Self { goals: vec![id], primary_goal: id }
  }
}

// ─── UserProfile ─────────────────────────────────────────────────────────────

/// The terminal aggregate: all personal-info fields merged with the resolved
/// goals. `onboarding_completed` is `true` on every value of this type —
/// its existence is the authoritative signal that onboarding is done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  pub age:                  u8,
  pub activity_level:       ActivityLevel,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gender:               Option<Gender>,
  pub goals:                Vec<GoalId>,
  pub primary_goal:         GoalId,
  pub created_at:           DateTime<Utc>,
  pub onboarding_completed: bool,
}

/// Pure merge of validated personal info and resolved goals.
///
/// Deterministic given identical inputs and `now`; never fails — missing or
/// malformed goal data must be resolved to [`ResolvedGoals::default`] by the
/// caller before this point.
pub fn assemble(
  info: &PersonalInfo,
  goals: &ResolvedGoals,
  now: DateTime<Utc>,
) -> UserProfile {
  UserProfile {
    age:                  info.age,
    activity_level:       info.activity_level,
    gender:               info.gender,
    goals:                goals.goals.clone(),
    primary_goal:         goals.primary_goal,
    created_at:           now,
    onboarding_completed: true,
  }
}

impl UserProfile {
  /// The fixed profile written by the skip-setup shortcut.
  pub fn skip_defaults(now: DateTime<Utc>) -> Self {
    Self {
      age:                  25,
      activity_level:       ActivityLevel::ModeratelyActive,
      gender:               Some(Gender::PreferNotToSay),
      goals:                vec![GoalId::DEFAULT],
      primary_goal:         GoalId::DEFAULT,
      created_at:           now,
      onboarding_completed: true,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid_form() -> PersonalInfoForm {
    PersonalInfoForm {
      age:            Some(30),
      activity_level: Some("very-active".to_string()),
      gender:         Some("male".to_string()),
    }
  }

  #[test]
  fn valid_form_passes() {
    let info = valid_form().validate().unwrap();
    assert_eq!(info.age, 30);
    assert_eq!(info.activity_level, ActivityLevel::VeryActive);
    assert_eq!(info.gender, Some(Gender::Male));
  }

  #[test]
  fn age_bounds_are_inclusive() {
    for age in [13, 120] {
      let form = PersonalInfoForm { age: Some(age), ..valid_form() };
      assert_eq!(form.validate().unwrap().age, age as u8);
    }
    for age in [12, 121, -1, 0] {
      let form = PersonalInfoForm { age: Some(age), ..valid_form() };
      let errors = form.validate().unwrap_err();
      assert_eq!(
        errors.get("age"),
        Some("Please enter a valid age between 13 and 120")
      );
    }
  }

  #[test]
  fn missing_age_fails() {
    let form = PersonalInfoForm { age: None, ..valid_form() };
    assert!(form.validate().unwrap_err().get("age").is_some());
  }

  #[test]
  fn missing_or_unknown_activity_level_fails() {
    for level in [None, Some("couch-potato".to_string())] {
      let form = PersonalInfoForm { activity_level: level, ..valid_form() };
      let errors = form.validate().unwrap_err();
      assert_eq!(
        errors.get("activityLevel"),
        Some("Please select your activity level")
      );
    }
  }

  #[test]
  fn gender_is_optional_and_lenient() {
    let form = PersonalInfoForm { gender: None, ..valid_form() };
    assert_eq!(form.validate().unwrap().gender, None);

    let form = PersonalInfoForm {
      gender: Some("unrecognised".to_string()),
      ..valid_form()
    };
    assert_eq!(form.validate().unwrap().gender, None);
  }

  #[test]
  fn both_failures_are_reported_together() {
    let form = PersonalInfoForm::default();
    let errors = form.validate().unwrap_err();
    assert!(errors.get("age").is_some());
    assert!(errors.get("activityLevel").is_some());
    assert_eq!(errors.0.len(), 2);
  }

  #[test]
  fn assemble_is_deterministic_modulo_timestamp() {
    let info = valid_form().validate().unwrap();
    let goals = ResolvedGoals::single(GoalId::PostureImprovement);
    let now = Utc::now();

    let a = assemble(&info, &goals, now);
    let b = assemble(&info, &goals, now);
    assert_eq!(a, b);
    assert!(a.onboarding_completed);
    assert_eq!(a.primary_goal, GoalId::PostureImprovement);
  }

  #[test]
  fn skip_defaults_match_shortcut_contract() {
    let profile = UserProfile::skip_defaults(Utc::now());
    assert_eq!(profile.age, 25);
    assert_eq!(profile.activity_level, ActivityLevel::ModeratelyActive);
    assert_eq!(profile.gender, Some(Gender::PreferNotToSay));
    assert_eq!(profile.goals, vec![GoalId::StressRelief]);
    assert!(profile.onboarding_completed);
  }

  #[test]
  fn profile_serialises_with_camel_case_keys() {
    let profile = UserProfile::skip_defaults(Utc::now());
    let json = serde_json::to_value(&profile).unwrap();
    assert_eq!(json["activityLevel"], "moderately-active");
    assert_eq!(json["primaryGoal"], "stress-relief");
    assert_eq!(json["gender"], "prefer-not-to-say");
    assert_eq!(json["onboardingCompleted"], true);
  }
}
