//! The onboarding workflow: goal selection → personal info → profile
//! assembly, plus the skip-setup shortcut.
//!
//! Every operation is generic over a [`ProfileRepository`] backend and is
//! safe to re-run with existing persisted data (re-loads and overwrites,
//! never duplicates). Malformed stored goal data is absorbed by the default
//! fallback and never reaches the caller; storage failures are surfaced as
//! [`Error::Storage`].

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
  Error, Result,
  goal::{GoalId, GoalSelection, WellnessGoal},
  guard::Route,
  profile::{
    PersonalInfo, PersonalInfoForm, ResolvedGoals, UserProfile,
    ValidationErrors, assemble,
  },
  repository::{ProfileRepository, StorageKey},
};

/// The bare string persisted under [`StorageKey::OnboardingCompleted`].
pub const COMPLETED_FLAG: &str = "true";

// ─── Storage helpers ─────────────────────────────────────────────────────────

async fn get_raw<R: ProfileRepository>(
  repo: &R,
  key: StorageKey,
) -> Result<Option<String>> {
  repo.get(key).await.map_err(Error::storage)
}

async fn set_json<R: ProfileRepository, T: Serialize>(
  repo: &R,
  key: StorageKey,
  value: &T,
) -> Result<()> {
  let json = serde_json::to_string(value)?;
  repo.set(key, json).await.map_err(Error::storage)
}

/// Parse a stored JSON record, treating malformed data as absent.
fn parse_lenient<T: DeserializeOwned>(
  key: StorageKey,
  raw: Option<String>,
) -> Option<T> {
  let raw = raw?;
  match serde_json::from_str(&raw) {
    Ok(value) => Some(value),
    Err(err) => {
      tracing::warn!(key = key.as_str(), %err, "ignoring malformed record");
      None
    }
  }
}

// ─── Onboarding state ────────────────────────────────────────────────────────

/// Whether onboarding has been completed — the single authoritative gate
/// consulted by the navigation guard.
pub async fn onboarding_completed<R: ProfileRepository>(
  repo: &R,
) -> Result<bool> {
  let flag = get_raw(repo, StorageKey::OnboardingCompleted).await?;
  Ok(flag.as_deref() == Some(COMPLETED_FLAG))
}

async fn mark_completed<R: ProfileRepository>(repo: &R) -> Result<()> {
  repo
    .set(StorageKey::OnboardingCompleted, COMPLETED_FLAG.to_string())
    .await
    .map_err(Error::storage)
}

// ─── Goal selection step ─────────────────────────────────────────────────────

/// Select a goal by id.
///
/// An unrecognised `goal_id` is a silent no-op: nothing is written and
/// `Ok(None)` is returned. A recognised id overwrites any previous selection
/// entirely (last-write-wins), writing the canonical record and the legacy
/// shim together.
pub async fn select_goal<R: ProfileRepository>(
  repo: &R,
  goal_id: &str,
) -> Result<Option<GoalSelection>> {
  let Some(id) = GoalId::parse(goal_id) else {
    tracing::debug!(goal_id, "ignoring unknown goal id");
    return Ok(None);
  };

  let selection = GoalSelection::new(id, Utc::now());
  persist_selection(repo, &selection).await?;
  Ok(Some(selection))
}

/// Write the canonical `GoalSelection` and its legacy `WellnessGoal` shim.
/// The two keys are only ever written here, together.
async fn persist_selection<R: ProfileRepository>(
  repo: &R,
  selection: &GoalSelection,
) -> Result<()> {
  set_json(repo, StorageKey::GoalSelection, selection).await?;
  set_json(repo, StorageKey::SelectedGoal, &selection.selected_goal).await
}

/// Whether the goal-selection step has been completed, i.e. either goal
/// record is present.
pub async fn goal_step_complete<R: ProfileRepository>(
  repo: &R,
) -> Result<bool> {
  Ok(
    get_raw(repo, StorageKey::GoalSelection).await?.is_some()
      || get_raw(repo, StorageKey::SelectedGoal).await?.is_some(),
  )
}

/// Outcome of a step's `continue` affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTransition {
  /// Move on to the given route.
  Advance(Route),
  /// Prerequisites unmet; remain on the current step with no side effect.
  Stay,
}

/// The goal-selection step's continue button: advances to the personal-info
/// step only once a selection exists.
pub async fn continue_to_personal_info<R: ProfileRepository>(
  repo: &R,
) -> Result<StepTransition> {
  if goal_step_complete(repo).await? {
    Ok(StepTransition::Advance(Route::PersonalInfoInput))
  } else {
    Ok(StepTransition::Stay)
  }
}

// ─── Personal info step ──────────────────────────────────────────────────────

/// Result of a personal-info submission that did not hit a storage failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
  /// Validation failed; nothing was persisted.
  Invalid(ValidationErrors),
  /// Onboarding is complete and this profile is persisted.
  Completed(UserProfile),
}

/// Load previously saved personal info to pre-populate the form on re-entry.
/// Malformed stored data reads as `None`.
pub async fn load_personal_info<R: ProfileRepository>(
  repo: &R,
) -> Result<Option<PersonalInfo>> {
  let raw = get_raw(repo, StorageKey::PersonalInfo).await?;
  Ok(parse_lenient(StorageKey::PersonalInfo, raw))
}

/// Submit the personal-info form.
///
/// On validation failure nothing is persisted and the failing fields are
/// reported as [`SubmitOutcome::Invalid`]. On success the validated info is
/// persisted, the profile is assembled (falling back to the default goal if
/// the stored goal data is missing or unreadable), and onboarding is marked
/// complete. Only a storage failure while writing the profile or flag
/// surfaces as an error.
pub async fn submit_personal_info<R: ProfileRepository>(
  repo: &R,
  form: &PersonalInfoForm,
) -> Result<SubmitOutcome> {
  let info = match form.validate() {
    Ok(info) => info,
    Err(errors) => return Ok(SubmitOutcome::Invalid(errors)),
  };

  set_json(repo, StorageKey::PersonalInfo, &info).await?;

  // The info is saved at this point; assembly must not be abandoned. A
  // failed goal read degrades to the default rather than erroring.
  let goals = match resolve_goals(repo).await {
    Ok(goals) => goals,
    Err(err) => {
      tracing::warn!(%err, "goal resolution failed; assembling with default");
      ResolvedGoals::default()
    }
  };

  let profile = assemble(&info, &goals, Utc::now());
  set_json(repo, StorageKey::UserProfile, &profile).await?;
  mark_completed(repo).await?;

  Ok(SubmitOutcome::Completed(profile))
}

// ─── Profile assembly ────────────────────────────────────────────────────────

/// Resolve the goal fields for profile assembly.
///
/// Resolution order: canonical `GoalSelection` record, else a synthesised
/// selection from the legacy single-goal record, else the `stress-relief`
/// default. Malformed records fall through to the next source; this function
/// only fails if the store itself does.
pub async fn resolve_goals<R: ProfileRepository>(
  repo: &R,
) -> Result<ResolvedGoals> {
  let raw = get_raw(repo, StorageKey::GoalSelection).await?;
  if let Some(selection) =
    parse_lenient::<GoalSelection>(StorageKey::GoalSelection, raw)
  {
    return Ok(ResolvedGoals {
      goals:        selection.goals,
      primary_goal: selection.primary_goal,
    });
  }

  let raw = get_raw(repo, StorageKey::SelectedGoal).await?;
  if let Some(goal) = parse_lenient::<WellnessGoal>(StorageKey::SelectedGoal, raw)
  {
    return Ok(ResolvedGoals::single(goal.id));
  }

  Ok(ResolvedGoals::default())
}

// ─── Skip-setup shortcut ─────────────────────────────────────────────────────

/// Bypass both steps: write a profile with fixed defaults, set the completion
/// flag, and return the profile. Available from either onboarding step.
pub async fn skip_setup<R: ProfileRepository>(repo: &R) -> Result<UserProfile> {
  let profile = UserProfile::skip_defaults(Utc::now());
  set_json(repo, StorageKey::UserProfile, &profile).await?;
  mark_completed(repo).await?;
  Ok(profile)
}

/// Read the assembled profile, if onboarding has produced one. Malformed
/// stored data reads as `None`.
pub async fn load_profile<R: ProfileRepository>(
  repo: &R,
) -> Result<Option<UserProfile>> {
  let raw = get_raw(repo, StorageKey::UserProfile).await?;
  Ok(parse_lenient(StorageKey::UserProfile, raw))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    memory::MemoryRepository,
    profile::{ActivityLevel, Gender},
  };

  fn valid_form() -> PersonalInfoForm {
    PersonalInfoForm {
      age:            Some(30),
      activity_level: Some("very-active".to_string()),
      gender:         Some("male".to_string()),
    }
  }

  // ── Goal selection ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn select_goal_writes_both_records() {
    let repo = MemoryRepository::new();
    let selection = select_goal(&repo, "sleep-better").await.unwrap().unwrap();
    assert_eq!(selection.primary_goal, GoalId::SleepBetter);

    let canonical = repo.get(StorageKey::GoalSelection).await.unwrap().unwrap();
    let stored: GoalSelection = serde_json::from_str(&canonical).unwrap();
    assert_eq!(stored, selection);

    let legacy = repo.get(StorageKey::SelectedGoal).await.unwrap().unwrap();
    let goal: WellnessGoal = serde_json::from_str(&legacy).unwrap();
    assert_eq!(goal, selection.selected_goal);
  }

  #[tokio::test]
  async fn unknown_goal_id_is_a_silent_noop() {
    let repo = MemoryRepository::new();
    let outcome = select_goal(&repo, "weight-loss").await.unwrap();
    assert_eq!(outcome, None);
    assert_eq!(repo.get(StorageKey::GoalSelection).await.unwrap(), None);
    assert_eq!(repo.get(StorageKey::SelectedGoal).await.unwrap(), None);
  }

  #[tokio::test]
  async fn reselection_is_last_write_wins() {
    let repo = MemoryRepository::new();
    select_goal(&repo, "stress-relief").await.unwrap();
    select_goal(&repo, "muscle-tension").await.unwrap();

    let goals = resolve_goals(&repo).await.unwrap();
    assert_eq!(goals.goals, vec![GoalId::MuscleTension]);
    assert_eq!(goals.primary_goal, GoalId::MuscleTension);
  }

  #[tokio::test]
  async fn continue_requires_a_selection() {
    let repo = MemoryRepository::new();
    assert_eq!(
      continue_to_personal_info(&repo).await.unwrap(),
      StepTransition::Stay
    );

    select_goal(&repo, "posture-improvement").await.unwrap();
    assert_eq!(
      continue_to_personal_info(&repo).await.unwrap(),
      StepTransition::Advance(Route::PersonalInfoInput)
    );
  }

  #[tokio::test]
  async fn legacy_record_alone_satisfies_the_goal_step() {
    let repo = MemoryRepository::new();
    let goal = WellnessGoal::from_id(GoalId::SleepBetter);
    repo
      .set(
        StorageKey::SelectedGoal,
        serde_json::to_string(&goal).unwrap(),
      )
      .await
      .unwrap();

    assert!(goal_step_complete(&repo).await.unwrap());
    let goals = resolve_goals(&repo).await.unwrap();
    assert_eq!(goals, ResolvedGoals::single(GoalId::SleepBetter));
  }

  // ── Personal info submission ────────────────────────────────────────────

  #[tokio::test]
  async fn valid_submission_produces_matching_profile() {
    let repo = MemoryRepository::new();
    select_goal(&repo, "posture-improvement").await.unwrap();

    let outcome = submit_personal_info(&repo, &valid_form()).await.unwrap();
    let SubmitOutcome::Completed(profile) = outcome else {
      panic!("expected completion, got {outcome:?}");
    };

    assert_eq!(profile.age, 30);
    assert_eq!(profile.activity_level, ActivityLevel::VeryActive);
    assert_eq!(profile.gender, Some(Gender::Male));
    assert_eq!(profile.goals, vec![GoalId::PostureImprovement]);
    assert_eq!(profile.primary_goal, GoalId::PostureImprovement);
    assert!(profile.onboarding_completed);

    assert!(onboarding_completed(&repo).await.unwrap());
    assert_eq!(load_profile(&repo).await.unwrap(), Some(profile));
  }

  #[tokio::test]
  async fn invalid_submission_persists_nothing() {
    let repo = MemoryRepository::new();
    select_goal(&repo, "stress-relief").await.unwrap();

    let form = PersonalInfoForm { age: Some(12), ..valid_form() };
    let outcome = submit_personal_info(&repo, &form).await.unwrap();
    let SubmitOutcome::Invalid(errors) = outcome else {
      panic!("expected validation failure, got {outcome:?}");
    };
    assert!(errors.get("age").is_some());

    assert_eq!(repo.get(StorageKey::PersonalInfo).await.unwrap(), None);
    assert_eq!(repo.get(StorageKey::UserProfile).await.unwrap(), None);
    assert!(!onboarding_completed(&repo).await.unwrap());
  }

  #[tokio::test]
  async fn submission_without_goal_data_falls_back_to_default() {
    let repo = MemoryRepository::new();

    let outcome = submit_personal_info(&repo, &valid_form()).await.unwrap();
    let SubmitOutcome::Completed(profile) = outcome else {
      panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(profile.goals, vec![GoalId::StressRelief]);
    assert_eq!(profile.primary_goal, GoalId::StressRelief);
  }

  #[tokio::test]
  async fn corrupted_goal_records_fall_back_to_default() {
    let repo = MemoryRepository::new();
    repo
      .set(StorageKey::GoalSelection, "{not json".to_string())
      .await
      .unwrap();
    repo
      .set(StorageKey::SelectedGoal, "[]".to_string())
      .await
      .unwrap();

    let goals = resolve_goals(&repo).await.unwrap();
    assert_eq!(goals, ResolvedGoals::default());

    let outcome = submit_personal_info(&repo, &valid_form()).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Completed(p)
      if p.primary_goal == GoalId::StressRelief));
  }

  #[tokio::test]
  async fn corrupted_canonical_record_falls_back_to_legacy() {
    let repo = MemoryRepository::new();
    repo
      .set(StorageKey::GoalSelection, "??".to_string())
      .await
      .unwrap();
    let goal = WellnessGoal::from_id(GoalId::MuscleTension);
    repo
      .set(
        StorageKey::SelectedGoal,
        serde_json::to_string(&goal).unwrap(),
      )
      .await
      .unwrap();

    let goals = resolve_goals(&repo).await.unwrap();
    assert_eq!(goals, ResolvedGoals::single(GoalId::MuscleTension));
  }

  // ── Re-entry ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn personal_info_prepopulates_on_reentry() {
    let repo = MemoryRepository::new();
    assert_eq!(load_personal_info(&repo).await.unwrap(), None);

    select_goal(&repo, "stress-relief").await.unwrap();
    submit_personal_info(&repo, &valid_form()).await.unwrap();

    let saved = load_personal_info(&repo).await.unwrap().unwrap();
    assert_eq!(saved.age, 30);
    assert_eq!(saved.activity_level, ActivityLevel::VeryActive);
  }

  #[tokio::test]
  async fn corrupted_personal_info_reads_as_none() {
    let repo = MemoryRepository::new();
    repo
      .set(StorageKey::PersonalInfo, "<html>".to_string())
      .await
      .unwrap();
    assert_eq!(load_personal_info(&repo).await.unwrap(), None);
  }

  #[tokio::test]
  async fn resubmission_overwrites_instead_of_duplicating() {
    let repo = MemoryRepository::new();
    select_goal(&repo, "sleep-better").await.unwrap();
    submit_personal_info(&repo, &valid_form()).await.unwrap();

    let form = PersonalInfoForm { age: Some(45), ..valid_form() };
    let outcome = submit_personal_info(&repo, &form).await.unwrap();
    let SubmitOutcome::Completed(profile) = outcome else {
      panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(profile.age, 45);
    assert_eq!(load_profile(&repo).await.unwrap().unwrap().age, 45);
  }

  // ── Skip-setup ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn skip_setup_writes_defaults_and_flag() {
    let repo = MemoryRepository::new();
    let profile = skip_setup(&repo).await.unwrap();

    assert_eq!(profile.age, 25);
    assert!(profile.onboarding_completed);
    assert!(onboarding_completed(&repo).await.unwrap());

    let flag = repo
      .get(StorageKey::OnboardingCompleted)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(flag, "true");
  }

  #[tokio::test]
  async fn storage_reset_reopens_onboarding() {
    let repo = MemoryRepository::new();
    skip_setup(&repo).await.unwrap();
    assert!(onboarding_completed(&repo).await.unwrap());

    repo.clear().await.unwrap();
    assert!(!onboarding_completed(&repo).await.unwrap());
    assert_eq!(load_profile(&repo).await.unwrap(), None);
  }
}
