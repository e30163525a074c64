//! The navigation guard: a synchronous, once-per-activation route check.
//!
//! Redirects are modelled as an explicit [`RouteDecision`] result rather
//! than side-effecting navigation, so the guard is independently testable.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::{
  Error, Result,
  onboarding::{goal_step_complete, onboarding_completed},
  repository::{ProfileRepository, StorageKey},
};

// ─── Routes ──────────────────────────────────────────────────────────────────

/// The application's routes, as the guard sees them.
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
pub enum Route {
  WelcomeOnboarding,
  PersonalInfoInput,
  HomeDashboard,
  ProgressAnalytics,
  TeamDashboard,
  ProfileSettings,
  Settings,
  Community,
  ContactUs,
}

impl Route {
  /// The URL path for this route.
  pub fn path(self) -> String {
    format!("/{}", <&'static str>::from(self))
  }

  /// Parse a URL path. The root path maps to the goal-selection step.
  pub fn from_path(path: &str) -> Option<Self> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
      return Some(Self::WelcomeOnboarding);
    }
    trimmed.parse().ok()
  }
}

// ─── Roles ───────────────────────────────────────────────────────────────────

/// Persisted role flag. Anything unrecognised or absent reads as `User`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
  #[default]
  User,
  Leader,
  Admin,
}

impl UserRole {
  /// Whether this role may enter the team-management view.
  pub fn is_privileged(self) -> bool {
    matches!(self, Self::Leader | Self::Admin)
  }
}

/// Read the persisted role, defaulting to `User`.
pub async fn load_role<R: ProfileRepository>(repo: &R) -> Result<UserRole> {
  let raw = repo
    .get(StorageKey::UserRole)
    .await
    .map_err(Error::storage)?;
  Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
}

/// Persist the role as a bare string. Written by the profile/settings
/// surface, not by the onboarding flow.
pub async fn store_role<R: ProfileRepository>(
  repo: &R,
  role: UserRole,
) -> Result<()> {
  repo
    .set(StorageKey::UserRole, <&'static str>::from(role).to_string())
    .await
    .map_err(Error::storage)
}

// ─── Decisions ───────────────────────────────────────────────────────────────

/// The guard's verdict for one route activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RouteDecision {
  Allow,
  RedirectTo { to: Route },
}

impl RouteDecision {
  fn redirect(to: Route) -> Self { Self::RedirectTo { to } }
}

/// Evaluate the guard for an activation of `route`.
///
/// - Onboarding entry points redirect completed users straight to the
///   dashboard (prevents re-onboarding).
/// - The personal-info step requires a goal record; without one it sends
///   the user back to goal selection, completion flag notwithstanding.
/// - Every other route requires completed onboarding; the team dashboard
///   additionally requires a privileged role.
pub async fn decide<R: ProfileRepository>(
  repo: &R,
  route: Route,
) -> Result<RouteDecision> {
  match route {
    Route::WelcomeOnboarding => {
      if onboarding_completed(repo).await? {
        Ok(RouteDecision::redirect(Route::HomeDashboard))
      } else {
        Ok(RouteDecision::Allow)
      }
    }
    Route::PersonalInfoInput => {
      if goal_step_complete(repo).await? {
        Ok(RouteDecision::Allow)
      } else {
        Ok(RouteDecision::redirect(Route::WelcomeOnboarding))
      }
    }
    Route::TeamDashboard => {
      if !onboarding_completed(repo).await? {
        Ok(RouteDecision::redirect(Route::WelcomeOnboarding))
      } else if !load_role(repo).await?.is_privileged() {
        Ok(RouteDecision::redirect(Route::HomeDashboard))
      } else {
        Ok(RouteDecision::Allow)
      }
    }
    Route::HomeDashboard
    | Route::ProgressAnalytics
    | Route::ProfileSettings
    | Route::Settings
    | Route::Community
    | Route::ContactUs => {
      if onboarding_completed(repo).await? {
        Ok(RouteDecision::Allow)
      } else {
        Ok(RouteDecision::redirect(Route::WelcomeOnboarding))
      }
    }
  }
}
