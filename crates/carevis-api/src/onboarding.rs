//! Handlers for `/onboarding` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/onboarding/goals` | Static catalog |
//! | `POST` | `/onboarding/goals/select` | Body: `{"goalId":"sleep-better"}`; unknown ids answer `null` |
//! | `GET`  | `/onboarding/status` | `{"completed": bool}` |
//! | `GET`  | `/onboarding/personal-info` | Saved info or `null` |
//! | `POST` | `/onboarding/personal-info` | 200 profile, 422 on validation failure |
//! | `POST` | `/onboarding/skip` | Skip-setup shortcut |

use std::sync::Arc;

use axum::{Json, extract::State};
use carevis_core::{
  goal::{GoalSelection, WellnessGoal},
  onboarding::{
    SubmitOutcome, load_personal_info, onboarding_completed, select_goal,
    skip_setup, submit_personal_info,
  },
  profile::{PersonalInfo, PersonalInfoForm, UserProfile},
  repository::ProfileRepository,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// `GET /onboarding/goals`
pub async fn goals<R>(State(_repo): State<Arc<R>>) -> Json<Vec<WellnessGoal>>
where
  R: ProfileRepository,
{
  Json(WellnessGoal::catalog())
}

// ─── Goal selection ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectBody {
  pub goal_id: String,
}

/// `POST /onboarding/goals/select` — body: `{"goalId":"stress-relief"}`.
///
/// An id outside the catalog is not an error: the body answers `null` and
/// nothing is persisted, matching the step's silent-ignore contract.
pub async fn select<R>(
  State(repo): State<Arc<R>>,
  Json(body): Json<SelectBody>,
) -> Result<Json<Option<GoalSelection>>, ApiError>
where
  R: ProfileRepository,
{
  let selection = select_goal(repo.as_ref(), &body.goal_id).await?;
  Ok(Json(selection))
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatusBody {
  pub completed: bool,
}

/// `GET /onboarding/status`
pub async fn status<R>(
  State(repo): State<Arc<R>>,
) -> Result<Json<StatusBody>, ApiError>
where
  R: ProfileRepository,
{
  let completed = onboarding_completed(repo.as_ref()).await?;
  Ok(Json(StatusBody { completed }))
}

// ─── Personal info ───────────────────────────────────────────────────────────

/// `GET /onboarding/personal-info` — pre-populates the form on re-entry.
pub async fn personal_info<R>(
  State(repo): State<Arc<R>>,
) -> Result<Json<Option<PersonalInfo>>, ApiError>
where
  R: ProfileRepository,
{
  let info = load_personal_info(repo.as_ref()).await?;
  Ok(Json(info))
}

/// `POST /onboarding/personal-info` — submit the form.
pub async fn submit<R>(
  State(repo): State<Arc<R>>,
  Json(form): Json<PersonalInfoForm>,
) -> Result<Json<UserProfile>, ApiError>
where
  R: ProfileRepository,
{
  match submit_personal_info(repo.as_ref(), &form).await? {
    SubmitOutcome::Completed(profile) => Ok(Json(profile)),
    SubmitOutcome::Invalid(errors) => Err(ApiError::Validation(errors)),
  }
}

// ─── Skip-setup ──────────────────────────────────────────────────────────────

/// `POST /onboarding/skip`
pub async fn skip<R>(
  State(repo): State<Arc<R>>,
) -> Result<Json<UserProfile>, ApiError>
where
  R: ProfileRepository,
{
  let profile = skip_setup(repo.as_ref()).await?;
  Ok(Json(profile))
}
