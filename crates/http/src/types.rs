//! Wire types exchanged with the auth and irrigation backends

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<BTreeSet<String>>,
}

/// Profile of the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Login and registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in milliseconds
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Token refresh request (also the logout body)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefreshRequest {
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

/// Plain message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Irrigated field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcelle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nom: String,
    /// Surface in m²
    pub superficie: f64,
    pub culture: String,
}

/// Create/update payload for a parcelle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelleInput {
    pub nom: String,
    pub superficie: f64,
    pub culture: String,
}

/// Lifecycle of a watering programme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatutProgramme {
    Planifie,
    EnCours,
    Termine,
    Annule,
}

impl StatutProgramme {
    pub const ALL: [Self; 4] = [Self::Planifie, Self::EnCours, Self::Termine, Self::Annule];

    /// Wire value, as used in path segments
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planifie => "PLANIFIE",
            Self::EnCours => "EN_COURS",
            Self::Termine => "TERMINE",
            Self::Annule => "ANNULE",
        }
    }

    /// Display label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planifie => "Planifié",
            Self::EnCours => "En cours",
            Self::Termine => "Terminé",
            Self::Annule => "Annulé",
        }
    }
}

impl fmt::Display for StatutProgramme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Watering programme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgrammeArrosage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub parcelle_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parcelle_nom: Option<String>,
    pub date_planifiee: NaiveDateTime,
    /// Minutes
    pub duree: u32,
    /// m³
    pub volume_prevu: f64,
    pub statut: StatutProgramme,
}

/// Create/update payload for a programme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgrammeInput {
    pub parcelle_id: i64,
    pub date_planifiee: NaiveDateTime,
    pub duree: u32,
    pub volume_prevu: f64,
    pub statut: StatutProgramme,
}

/// Execution journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalArrosage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub programme_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parcelle_nom: Option<String>,
    pub date_execution: NaiveDateTime,
    /// m³
    pub volume_reel: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarque: Option<String>,
}

/// Create/update payload for a journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalInput {
    pub programme_id: i64,
    pub date_execution: NaiveDateTime,
    pub volume_reel: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarque: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_profile_accepts_backend_shape() {
        let user: UserProfile = serde_json::from_value(json!({
            "id": 7,
            "username": "amina",
            "email": "amina@example.com",
            "firstName": "Amina",
            "lastName": null,
            "roles": ["ROLE_MANAGER"],
            "farmId": 3,
            "enabled": true,
            "createdAt": "2024-03-01T08:30:00",
            "updatedAt": null
        }))
        .unwrap();

        assert_eq!(user.first_name.as_deref(), Some("Amina"));
        assert!(user.last_name.is_none());
        assert_eq!(user.farm_id, Some(3));
        assert!(user.roles.contains("ROLE_MANAGER"));
    }

    #[test]
    fn test_statut_wire_format() {
        let value = serde_json::to_value(StatutProgramme::EnCours).unwrap();
        assert_eq!(value, json!("EN_COURS"));
        assert_eq!(StatutProgramme::EnCours.as_str(), "EN_COURS");
        assert_eq!(StatutProgramme::Termine.to_string(), "Terminé");
    }

    #[test]
    fn test_auth_response_defaults_token_type() {
        let response: AuthResponse = serde_json::from_value(json!({
            "accessToken": "a",
            "refreshToken": "r",
            "expiresIn": 3_600_000,
            "user": {"id": 1, "username": "admin", "roles": ["ROLE_ADMIN"]}
        }))
        .unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3_600_000);
    }
}
