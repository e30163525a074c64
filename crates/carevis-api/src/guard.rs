//! Handler for `/guard` — the navigation guard over HTTP.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use carevis_core::{
  guard::{Route, RouteDecision, decide},
  repository::ProfileRepository,
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct GuardParams {
  /// URL path of the route being activated, e.g. `/home-dashboard`.
  pub route: String,
}

/// `GET /guard?route=<path>`
pub async fn handler<R>(
  State(repo): State<Arc<R>>,
  Query(params): Query<GuardParams>,
) -> Result<Json<RouteDecision>, ApiError>
where
  R: ProfileRepository,
{
  let route = Route::from_path(&params.route).ok_or_else(|| {
    ApiError::BadRequest(format!("unknown route: {}", params.route))
  })?;
  let decision = decide(repo.as_ref(), route).await?;
  Ok(Json(decision))
}
