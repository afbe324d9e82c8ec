//! crates/prepwise_core/src/store/profile.rs
//!
//! The Profile Store: written once at setup, reset on logout.

use crate::domain::UserProfile;

/// A mutation of the profile store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
    /// Replaces the whole stored profile.
    SetUserProfile(UserProfile),
    /// Restores the empty defaults.
    ResetProfile,
}

/// Holds the user's onboarding answers. No validation happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    profile: UserProfile,
}

impl ProfileState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn session_id(&self) -> &str {
        &self.profile.session_id
    }

    pub fn is_profile_complete(&self) -> bool {
        self.profile.is_profile_complete
    }

    /// Replaces the entire stored profile with `profile`.
    pub fn set_user_profile(&mut self, profile: UserProfile) {
        self.profile = profile;
    }

    /// Restores every field to its default and clears the completion flag.
    pub fn reset_profile(&mut self) {
        self.profile = UserProfile::default();
    }

    pub fn apply(&mut self, action: ProfileAction) {
        match action {
            ProfileAction::SetUserProfile(profile) => self.set_user_profile(profile),
            ProfileAction::ResetProfile => self.reset_profile(),
        }
    }
}
