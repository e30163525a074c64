//! The wellness-goal catalog and the goal-selection record.
//!
//! The catalog is static: four goals, defined here, never created or mutated
//! at runtime. A selection snapshots the chosen catalog entry at selection
//! time so historical consumers keep working even if display copy changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

// ─── GoalId ──────────────────────────────────────────────────────────────────

/// Stable catalog key for a wellness goal.
///
/// The kebab-case string forms (`stress-relief`, …) are the persisted ids;
/// unrecognised strings do not parse.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GoalId {
  StressRelief,
  PostureImprovement,
  SleepBetter,
  MuscleTension,
}

impl GoalId {
  /// The id every fallback path resolves to.
  pub const DEFAULT: Self = Self::StressRelief;

  /// The persisted kebab-case form of this id.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Parse a persisted id. Returns `None` for anything outside the catalog.
  pub fn parse(s: &str) -> Option<Self> { s.parse().ok() }
}

// ─── WellnessGoal ────────────────────────────────────────────────────────────

/// A catalog entry. `title`, `icon`, `description`, and `features` are
/// display copy; the core logic only ever keys on `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessGoal {
  pub id:          GoalId,
  pub title:       String,
  pub icon:        String,
  pub description: String,
  pub features:    Vec<String>,
}

impl WellnessGoal {
  /// Build the catalog entry for `id`.
  pub fn from_id(id: GoalId) -> Self {
    let (title, icon, description, features): (_, _, _, &[&str]) = match id {
      GoalId::StressRelief => (
        "Stress Relief",
        "Brain",
        "Reduce daily stress and anxiety through guided breathing exercises \
         and mindfulness techniques.",
        &[
          "5-minute breathing sessions",
          "Stress level tracking",
          "Calming background sounds",
        ],
      ),
      GoalId::PostureImprovement => (
        "Posture Improvement",
        "User",
        "Strengthen your core and improve posture with targeted exercises \
         designed for desk workers.",
        &[
          "Desk-friendly stretches",
          "Posture reminders",
          "Core strengthening routines",
        ],
      ),
      GoalId::SleepBetter => (
        "Sleep Better",
        "Moon",
        "Develop healthy sleep habits with evening routines and relaxation \
         techniques.",
        &[
          "Evening wind-down routines",
          "Sleep quality tracking",
          "Bedtime meditation guides",
        ],
      ),
      GoalId::MuscleTension => (
        "Muscle Tension Relief",
        "Zap",
        "Target specific muscle groups with therapeutic stretches and \
         tension release exercises.",
        &[
          "Targeted muscle stretches",
          "Pain level monitoring",
          "Progressive muscle relaxation",
        ],
      ),
    };
    Self {
      id,
      title: title.to_string(),
      icon: icon.to_string(),
      description: description.to_string(),
      features: features.iter().map(|f| f.to_string()).collect(),
    }
  }

  /// The full static catalog, in presentation order.
  pub fn catalog() -> Vec<Self> { GoalId::iter().map(Self::from_id).collect() }
}

// ─── GoalSelection ───────────────────────────────────────────────────────────

/// The canonical record of a completed goal-selection step.
///
/// Invariant: `goals` holds exactly one element and `primary_goal` equals it.
/// The constructor is the only way to build one, so the invariant holds for
/// every value of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSelection {
  pub goals:         Vec<GoalId>,
  pub primary_goal:  GoalId,
  pub selected_goal: WellnessGoal,
  pub timestamp:     DateTime<Utc>,
}

impl GoalSelection {
  /// Record the selection of `id` at `timestamp`, snapshotting the catalog
  /// entry.
  pub fn new(id: GoalId, timestamp: DateTime<Utc>) -> Self {
    Self {
      goals: vec![id],
      primary_goal: id,
      selected_goal: WellnessGoal::from_id(id),
      timestamp,
    }
  }
}
