use chrono::{DateTime, Utc};
use lettre::Address;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

use super::Statut;

/// Fields shared by both demande kinds. Serialized flattened into the
/// record, with the camelCase names the submission forms send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemandeBase {
    /// Opaque unique identifier, assigned at creation and never changed
    #[schema(example = "3f1e9c2a-7b44-4c58-9f0d-2a6f8f5f2f10")]
    pub id: String,
    #[schema(example = "Ben Salah")]
    pub nom: String,
    #[schema(example = "Ali")]
    pub prenom: String,
    /// Employee badge number, exactly 4 digits
    #[schema(example = "1234")]
    pub matricule: String,
    #[schema(example = "ali.bensalah@example.com")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "rh", nullable = true)]
    pub departement: Option<String>,
    pub status: Statut,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl DemandeBase {
    pub(crate) fn new(
        nom: String,
        prenom: String,
        matricule: String,
        email: String,
        departement: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, ApiError> {
        let nom = require(nom, "Nom requis")?;
        let prenom = require(prenom, "Prénom requis")?;

        if matricule.len() != 4 || !matricule.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::Validation(
                "Matricule doit être 4 chiffres".to_string(),
            ));
        }

        let email = require(email, "Email invalide")?;
        email
            .parse::<Address>()
            .map_err(|_| ApiError::Validation("Email invalide".to_string()))?;

        let departement = departement
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            nom,
            prenom,
            matricule,
            email,
            departement,
            status: Statut::EnCours,
            created_at: now,
            updated_at: now,
        })
    }

    /// Enforces the one-way lifecycle: a demande "traité" cannot go
    /// back to "en cours". Re-asserting "traité" is allowed.
    pub fn set_statut(&mut self, statut: Statut) -> Result<(), ApiError> {
        if self.status == Statut::Traite && statut == Statut::EnCours {
            return Err(ApiError::Validation(
                "Une demande traitée ne peut pas repasser en cours.".to_string(),
            ));
        }
        self.status = statut;
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn require(value: String, message: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Admin PATCH payload for one demande kind.
pub trait DemandePatch {
    fn id(&self) -> &str;
    fn statut(&self) -> Option<Statut>;
    /// True when the payload carries no update at all.
    fn is_empty(&self) -> bool;
}

/// One of the two request kinds handled by the portal. Implementations
/// carry the kind-specific fields and tell the storage layer where
/// records of this kind live.
pub trait Demande: Serialize + DeserializeOwned + Clone + Unpin + Send + Sync + 'static {
    /// Payload accepted from the public submission form.
    type Create: DeserializeOwned + Send + 'static;
    /// Payload accepted from the admin PATCH endpoint.
    type Patch: DemandePatch + DeserializeOwned + Send + 'static;

    /// MySQL table backing this kind.
    const TABLE: &'static str;
    /// Array key in the JSON data file.
    const COLLECTION: &'static str;

    /// Validates a submission and builds the record, assigning id,
    /// timestamps and the default status.
    fn build(payload: Self::Create, now: DateTime<Utc>) -> Result<Self, ApiError>;

    fn base(&self) -> &DemandeBase;
    fn base_mut(&mut self) -> &mut DemandeBase;

    /// Applies an admin patch and refreshes `updatedAt`. Returns true
    /// when the patch set the status to "traité" (the notification
    /// trigger).
    fn apply_patch(&mut self, patch: &Self::Patch) -> Result<bool, ApiError>;

    fn email_subject() -> &'static str;
    fn email_body(&self) -> String;
}
