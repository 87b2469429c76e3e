use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::pii::Masked;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SeatPreference {
    Lower,
    Middle,
    Upper,
    #[serde(rename = "Side Lower")]
    SideLower,
    #[serde(rename = "Side Upper")]
    SideUpper,
    #[default]
    #[serde(rename = "No Preference")]
    NoPreference,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MealPreference {
    Vegetarian,
    #[serde(rename = "Non-Vegetarian")]
    NonVegetarian,
    #[default]
    #[serde(rename = "No Preference")]
    NoPreference,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TravelPreferences {
    pub seat_preference: SeatPreference,
    pub meal_preference: MealPreference,
    pub notification_enabled: bool,
}

impl Default for TravelPreferences {
    fn default() -> Self {
        Self {
            seat_preference: SeatPreference::NoPreference,
            meal_preference: MealPreference::NoPreference,
            notification_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "pincode")]
    pub postal_code: String,
    pub country: String,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            street: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: "India".to_string(),
        }
    }
}

/// One profile document per uid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub phone_number: Option<Masked<String>>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<Address>,
    #[serde(default)]
    pub preferences: TravelPreferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// The profile provisioned for a newly seen account.
    pub fn initial(uid: &str, email: &str, display_name: &str, now: DateTime<Utc>) -> Self {
        Self {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            phone_number: None,
            date_of_birth: None,
            gender: Some(Gender::Male),
            address: Some(Address::default()),
            preferences: TravelPreferences::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields a user may change on their profile. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub phone_number: Option<Masked<String>>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<Address>,
    pub preferences: Option<TravelPreferences>,
}

impl ProfileUpdate {
    pub fn apply(self, profile: &mut UserProfile, now: DateTime<Utc>) {
        if let Some(name) = self.display_name {
            profile.display_name = name;
        }
        if let Some(phone) = self.phone_number {
            profile.phone_number = Some(phone);
        }
        if let Some(dob) = self.date_of_birth {
            profile.date_of_birth = Some(dob);
        }
        if let Some(gender) = self.gender {
            profile.gender = Some(gender);
        }
        if let Some(address) = self.address {
            profile.address = Some(address);
        }
        if let Some(preferences) = self.preferences {
            profile.preferences = preferences;
        }
        profile.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_profile_defaults() {
        let profile = UserProfile::initial("uid-1", "a@example.com", "Asha", Utc::now());
        assert_eq!(profile.gender, Some(Gender::Male));
        assert_eq!(profile.address.as_ref().unwrap().country, "India");
        assert_eq!(profile.preferences.seat_preference, SeatPreference::NoPreference);
        assert!(profile.preferences.notification_enabled);
    }

    #[test]
    fn test_update_leaves_absent_fields() {
        let mut profile = UserProfile::initial("uid-1", "a@example.com", "Asha", Utc::now());
        let update = ProfileUpdate {
            display_name: Some("Asha K".to_string()),
            ..Default::default()
        };
        update.apply(&mut profile, Utc::now());
        assert_eq!(profile.display_name, "Asha K");
        assert_eq!(profile.email, "a@example.com");
        assert_eq!(profile.preferences, TravelPreferences::default());
    }

    #[test]
    fn test_preference_labels() {
        let prefs = TravelPreferences {
            seat_preference: SeatPreference::SideUpper,
            meal_preference: MealPreference::NonVegetarian,
            notification_enabled: false,
        };
        let value = serde_json::to_value(&prefs).unwrap();
        assert_eq!(value["seatPreference"], "Side Upper");
        assert_eq!(value["mealPreference"], "Non-Vegetarian");
        assert_eq!(value["notificationEnabled"], false);
    }
}
