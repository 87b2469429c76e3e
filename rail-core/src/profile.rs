use std::sync::Arc;

use chrono::Utc;
use rail_shared::{ProfileUpdate, UserProfile};
use tracing::error;

use crate::identity::SessionPrincipal;
use crate::repository::{ProfileRepository, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: RepoError,
    },

    #[error("Profile not found: {0}")]
    NotFound(String),
}

/// Profile store adapter over the `profiles` collection.
#[derive(Clone)]
pub struct ProfileService {
    repo: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(repo: Arc<dyn ProfileRepository>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, uid: &str) -> Result<Option<UserProfile>, ProfileError> {
        self.repo.get_profile(uid).await.map_err(|source| {
            error!("Error getting profile {}: {}", uid, source);
            ProfileError::Store {
                message: "Failed to load profile.",
                source,
            }
        })
    }

    pub async fn save(&self, profile: &UserProfile) -> Result<(), ProfileError> {
        self.repo.save_profile(profile).await.map_err(|source| {
            error!("Error saving profile {}: {}", profile.uid, source);
            ProfileError::Store {
                message: "Failed to save profile. Please try again.",
                source,
            }
        })
    }

    /// Write the default profile for an account.
    pub async fn create_initial(&self, principal: &SessionPrincipal) -> Result<UserProfile, ProfileError> {
        let profile = UserProfile::initial(
            &principal.uid,
            &principal.email,
            &principal.display_name,
            Utc::now(),
        );
        self.save(&profile).await?;
        tracing::info!("Initial profile created for {}", principal.uid);
        Ok(profile)
    }

    /// Existing profile, or a freshly provisioned one. Never overwrites.
    pub async fn load_or_create(&self, principal: &SessionPrincipal) -> Result<UserProfile, ProfileError> {
        match self.get(&principal.uid).await? {
            Some(profile) => Ok(profile),
            None => self.create_initial(principal).await,
        }
    }

    pub async fn update(&self, uid: &str, update: ProfileUpdate) -> Result<UserProfile, ProfileError> {
        let mut profile = self
            .get(uid)
            .await?
            .ok_or_else(|| ProfileError::NotFound(uid.to_string()))?;
        update.apply(&mut profile, Utc::now());
        self.save(&profile).await?;
        Ok(profile)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use rail_shared::models::profile::{MealPreference, SeatPreference};
    use rail_shared::TravelPreferences;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct MemoryProfiles {
        pub(crate) docs: Mutex<HashMap<String, UserProfile>>,
    }

    #[async_trait]
    impl ProfileRepository for MemoryProfiles {
        async fn get_profile(&self, uid: &str) -> crate::repository::RepoResult<Option<UserProfile>> {
            Ok(self.docs.lock().await.get(uid).cloned())
        }

        async fn save_profile(&self, profile: &UserProfile) -> crate::repository::RepoResult<()> {
            self.docs.lock().await.insert(profile.uid.clone(), profile.clone());
            Ok(())
        }
    }

    struct BrokenProfiles;

    #[async_trait]
    impl ProfileRepository for BrokenProfiles {
        async fn get_profile(&self, _uid: &str) -> crate::repository::RepoResult<Option<UserProfile>> {
            Err("connection reset".into())
        }

        async fn save_profile(&self, _profile: &UserProfile) -> crate::repository::RepoResult<()> {
            Err("connection reset".into())
        }
    }

    fn principal() -> SessionPrincipal {
        SessionPrincipal {
            uid: "uid-1".to_string(),
            email: "asha@example.com".to_string(),
            display_name: "Asha".to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_or_create_provisions_once() {
        let service = ProfileService::new(Arc::new(MemoryProfiles::default()));
        let first = service.load_or_create(&principal()).await.unwrap();

        let prefs = TravelPreferences {
            seat_preference: SeatPreference::Lower,
            meal_preference: MealPreference::Vegetarian,
            notification_enabled: false,
        };
        service
            .update(
                "uid-1",
                ProfileUpdate {
                    preferences: Some(prefs.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let again = service.load_or_create(&principal()).await.unwrap();
        assert_eq!(again.created_at, first.created_at);
        assert_eq!(again.preferences, prefs);
    }

    #[tokio::test]
    async fn test_preferences_round_trip() {
        let service = ProfileService::new(Arc::new(MemoryProfiles::default()));
        let mut profile = UserProfile::initial("uid-2", "ravi@example.com", "Ravi", Utc::now());
        profile.preferences = TravelPreferences {
            seat_preference: SeatPreference::SideLower,
            meal_preference: MealPreference::NonVegetarian,
            notification_enabled: false,
        };
        service.save(&profile).await.unwrap();

        let read = service.get("uid-2").await.unwrap().unwrap();
        assert_eq!(read.preferences, profile.preferences);
    }

    #[tokio::test]
    async fn test_update_missing_profile() {
        let service = ProfileService::new(Arc::new(MemoryProfiles::default()));
        let result = service.update("ghost", ProfileUpdate::default()).await;
        assert!(matches!(result, Err(ProfileError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_failure_is_rewrapped() {
        let service = ProfileService::new(Arc::new(BrokenProfiles));
        let err = service.get("uid-1").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load profile.");
    }
}
