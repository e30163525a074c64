//! Handlers for `/profile` endpoints.
//!
//! The role endpoints are the write path used by the profile/settings
//! surface; the onboarding flow itself never touches the role.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use carevis_core::{
  guard::{UserRole, load_role, store_role},
  onboarding::load_profile,
  profile::UserProfile,
  repository::ProfileRepository,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// `GET /profile` — 404 until onboarding has assembled one.
pub async fn get_profile<R>(
  State(repo): State<Arc<R>>,
) -> Result<Json<UserProfile>, ApiError>
where
  R: ProfileRepository,
{
  let profile = load_profile(repo.as_ref())
    .await?
    .ok_or_else(|| ApiError::NotFound("no user profile yet".to_string()))?;
  Ok(Json(profile))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoleBody {
  pub role: UserRole,
}

/// `GET /profile/role` — defaults to `user` when nothing is stored.
pub async fn get_role<R>(
  State(repo): State<Arc<R>>,
) -> Result<Json<RoleBody>, ApiError>
where
  R: ProfileRepository,
{
  let role = load_role(repo.as_ref()).await?;
  Ok(Json(RoleBody { role }))
}

/// `PUT /profile/role` — body: `{"role":"leader"}`.
pub async fn put_role<R>(
  State(repo): State<Arc<R>>,
  Json(body): Json<RoleBody>,
) -> Result<StatusCode, ApiError>
where
  R: ProfileRepository,
{
  store_role(repo.as_ref(), body.role).await?;
  Ok(StatusCode::NO_CONTENT)
}
