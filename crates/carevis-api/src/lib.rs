//! JSON API for the CareVis onboarding flow.
//!
//! Exposes an axum [`Router`] backed by any
//! [`carevis_core::repository::ProfileRepository`]. Rendering, auth, and
//! transport concerns are the caller's responsibility: the dashboard pages
//! are pure readers of whatever profile this workflow produces.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", carevis_api::api_router(repo.clone()))
//! ```

pub mod error;
pub mod guard;
pub mod onboarding;
pub mod profile;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use carevis_core::repository::ProfileRepository;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` (with a
/// `CAREVIS_` environment override layer).
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `repo`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R>(repo: Arc<R>) -> Router<()>
where
  R: ProfileRepository + 'static,
{
  Router::new()
    // Onboarding flow
    .route("/onboarding/goals", get(onboarding::goals::<R>))
    .route("/onboarding/goals/select", post(onboarding::select::<R>))
    .route("/onboarding/status", get(onboarding::status::<R>))
    .route(
      "/onboarding/personal-info",
      get(onboarding::personal_info::<R>).post(onboarding::submit::<R>),
    )
    .route("/onboarding/skip", post(onboarding::skip::<R>))
    // Profile
    .route("/profile", get(profile::get_profile::<R>))
    .route(
      "/profile/role",
      get(profile::get_role::<R>).put(profile::put_role::<R>),
    )
    // Navigation guard
    .route("/guard", get(guard::handler::<R>))
    .with_state(repo)
}

// ─── Integration tests ───────────────────────────────────────────────────────
