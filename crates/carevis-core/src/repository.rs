//! The `ProfileRepository` trait and the persisted key space.
//!
//! The trait is implemented by storage backends (e.g.
//! `carevis-store-sqlite`). Higher layers (`carevis-api`, the workflow in
//! [`crate::onboarding`]) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use strum::{EnumIter, IntoStaticStr};

// ─── Keys ────────────────────────────────────────────────────────────────────

/// The complete persisted key space. String forms are the historical
/// `carevis-*` keys and must never change while compatibility with existing
/// stored data matters.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr,
)]
pub enum StorageKey {
  /// Bare string `"true"` once onboarding is done; absent before.
  /// Kept in sync with `UserProfile.onboardingCompleted` (legacy duplicate
  /// signal).
  #[strum(serialize = "carevis-onboarding-completed")]
  OnboardingCompleted,

  /// Canonical [`GoalSelection`](crate::goal::GoalSelection) record, JSON.
  #[strum(serialize = "carevis-goal-selection")]
  GoalSelection,

  /// Legacy bare [`WellnessGoal`](crate::goal::WellnessGoal) copy, JSON.
  /// A read-compatibility shim: always written together with
  /// [`StorageKey::GoalSelection`], never independently.
  #[strum(serialize = "carevis-selected-goal")]
  SelectedGoal,

  /// Validated [`PersonalInfo`](crate::profile::PersonalInfo), JSON.
  #[strum(serialize = "carevis-personal-info")]
  PersonalInfo,

  /// Assembled [`UserProfile`](crate::profile::UserProfile), JSON.
  #[strum(serialize = "carevis-user-profile")]
  UserProfile,

  /// Bare role string (`user` | `leader` | `admin`); written by the
  /// profile/settings surface, read by the navigation guard.
  #[strum(serialize = "carevis-user-role")]
  UserRole,
}

impl StorageKey {
  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the durable key-value store that is the system of record
/// between steps and sessions.
///
/// Values are strings: JSON for structured records, bare strings for the
/// completion flag and the role. Writes are last-write-wins; there is no
/// merge and only one logical session writes at a time.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ProfileRepository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value stored under `key`. Returns `None` if absent.
  fn get(
    &self,
    key: StorageKey,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// Store `value` under `key`, replacing any previous value entirely.
  fn set(
    &self,
    key: StorageKey,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete the value stored under `key`, if any.
  fn remove(
    &self,
    key: StorageKey,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Explicit storage reset: delete every key. The only way any onboarding
  /// record is ever destroyed.
  fn clear(&self)
  -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
