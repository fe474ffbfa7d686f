use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

use super::{Demande, DemandeBase, DemandePatch, Statut};

/// Request to change the assigned transport pickup/drop-off stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemandeChangementParada {
    #[serde(flatten)]
    pub base: DemandeBase,
    #[schema(example = "Parada Centre Ville")]
    pub ancienne_parada: String,
    /// Editable in place by an administrator
    #[schema(example = "Parada Zone Industrielle")]
    pub nouvelle_parada: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateParada {
    #[schema(example = "Trabelsi")]
    pub nom: String,
    #[schema(example = "Sana")]
    pub prenom: String,
    #[schema(example = "sana.trabelsi@example.com", format = "email")]
    pub email: String,
    #[schema(example = "5678")]
    pub matricule: String,
    #[schema(example = "Parada Centre Ville")]
    pub ancienne_parada: String,
    #[schema(example = "Parada Zone Industrielle")]
    pub nouvelle_parada: String,
    #[serde(default)]
    #[schema(example = "extrusion", nullable = true)]
    pub departement: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchParada {
    #[schema(example = "3f1e9c2a-7b44-4c58-9f0d-2a6f8f5f2f10")]
    pub id: String,
    pub status: Option<Statut>,
    #[schema(example = "Parada Stade")]
    pub nouvelle_parada: Option<String>,
}

impl DemandePatch for PatchParada {
    fn id(&self) -> &str {
        &self.id
    }

    fn statut(&self) -> Option<Statut> {
        self.status
    }

    fn is_empty(&self) -> bool {
        self.status.is_none() && self.nouvelle_parada.is_none()
    }
}

impl Demande for DemandeChangementParada {
    type Create = CreateParada;
    type Patch = PatchParada;

    const TABLE: &'static str = "demande_changement_parada";
    const COLLECTION: &'static str = "DemandeChangementParada";

    fn build(payload: Self::Create, now: DateTime<Utc>) -> Result<Self, ApiError> {
        let base = DemandeBase::new(
            payload.nom,
            payload.prenom,
            payload.matricule,
            payload.email,
            payload.departement,
            now,
        )?;

        let ancienne_parada = payload.ancienne_parada.trim().to_string();
        if ancienne_parada.is_empty() {
            return Err(ApiError::Validation("Ancienne parada requise".to_string()));
        }

        let nouvelle_parada = payload.nouvelle_parada.trim().to_string();
        if nouvelle_parada.is_empty() {
            return Err(ApiError::Validation("Nouvelle parada requise".to_string()));
        }

        Ok(Self {
            base,
            ancienne_parada,
            nouvelle_parada,
        })
    }

    fn base(&self) -> &DemandeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DemandeBase {
        &mut self.base
    }

    fn apply_patch(&mut self, patch: &Self::Patch) -> Result<bool, ApiError> {
        let mut processed = false;
        if let Some(statut) = patch.status {
            self.base.set_statut(statut)?;
            processed = statut == Statut::Traite;
        }
        if let Some(nouvelle) = &patch.nouvelle_parada {
            let nouvelle = nouvelle.trim();
            if nouvelle.is_empty() {
                return Err(ApiError::Validation("Nouvelle parada requise".to_string()));
            }
            self.nouvelle_parada = nouvelle.to_string();
        }
        self.base.touch();
        Ok(processed)
    }

    fn email_subject() -> &'static str {
        "Mise à jour de votre demande"
    }

    fn email_body(&self) -> String {
        format!(
            "Bonjour {} {},\nVotre demande a été {}\nVotre ancienne parada est : {}.\n\
             Votre nouvelle parada est : {}.\n\nCordialement,\nService RH",
            self.base.prenom,
            self.base.nom,
            self.base.status,
            self.ancienne_parada,
            self.nouvelle_parada
        )
    }
}
