use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

use super::{Demande, DemandeBase, DemandePatch, Statut};

/// Request for HR-issued documents (work certificate, salary
/// certificate, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemandeAttestation {
    #[serde(flatten)]
    pub base: DemandeBase,
    /// Free-text purpose of the request
    #[schema(example = "Dossier bancaire")]
    pub objet: String,
    /// Requested document types, at least one
    #[schema(example = json!(["Attestation de travail", "Bulletin de paie"]))]
    pub attestations: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttestation {
    #[schema(example = "Ben Salah")]
    pub nom: String,
    #[schema(example = "Ali")]
    pub prenom: String,
    #[schema(example = "ali.bensalah@example.com", format = "email")]
    pub email: String,
    #[schema(example = "1234")]
    pub matricule: String,
    #[schema(example = "Dossier bancaire")]
    pub objet: String,
    #[serde(default)]
    #[schema(example = "rh", nullable = true)]
    pub departement: Option<String>,
    #[schema(example = json!(["Bulletin de paie"]))]
    pub attestations: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchAttestation {
    #[schema(example = "3f1e9c2a-7b44-4c58-9f0d-2a6f8f5f2f10")]
    pub id: String,
    pub status: Option<Statut>,
}

impl DemandePatch for PatchAttestation {
    fn id(&self) -> &str {
        &self.id
    }

    fn statut(&self) -> Option<Statut> {
        self.status
    }

    fn is_empty(&self) -> bool {
        self.status.is_none()
    }
}

impl Demande for DemandeAttestation {
    type Create = CreateAttestation;
    type Patch = PatchAttestation;

    const TABLE: &'static str = "demande_attestation";
    const COLLECTION: &'static str = "DemandeAttestation";

    fn build(payload: Self::Create, now: DateTime<Utc>) -> Result<Self, ApiError> {
        let base = DemandeBase::new(
            payload.nom,
            payload.prenom,
            payload.matricule,
            payload.email,
            payload.departement,
            now,
        )?;

        let objet = payload.objet.trim().to_string();
        if objet.is_empty() {
            return Err(ApiError::Validation("Objet requis".to_string()));
        }

        let attestations: Vec<String> = payload
            .attestations
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if attestations.is_empty() {
            return Err(ApiError::Validation(
                "Au moins une attestation requise".to_string(),
            ));
        }

        Ok(Self {
            base,
            objet,
            attestations,
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
        self.base.touch();
        Ok(processed)
    }

    fn email_subject() -> &'static str {
        "Mise à jour de votre demande d'attestation"
    }

    fn email_body(&self) -> String {
        format!(
            "Bonjour {} {},\n\nVotre demande a été mise à jour au statut : {}. \
             Vous pouvez récupérer vos documents.\n\nCordialement,\nService RH",
            self.base.prenom, self.base.nom, self.base.status
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::error::ApiError;
    use crate::model::{Demande, DemandePatch, Statut};

    use super::{CreateAttestation, DemandeAttestation, PatchAttestation};

    fn payload() -> CreateAttestation {
        CreateAttestation {
            nom: "Ben Salah".to_string(),
            prenom: "Ali".to_string(),
            email: "ali@example.com".to_string(),
            matricule: "1234".to_string(),
            objet: "Dossier bancaire".to_string(),
            departement: Some("rh".to_string()),
            attestations: vec!["Bulletin de paie".to_string()],
        }
    }

    #[test]
    fn build_assigns_id_timestamps_and_default_status() {
        let now = Utc::now();
        let first = DemandeAttestation::build(payload(), now).unwrap();
        let second = DemandeAttestation::build(payload(), now).unwrap();

        assert_eq!(first.base.status, Statut::EnCours);
        assert_eq!(first.base.created_at, now);
        assert_eq!(first.base.updated_at, now);
        assert!(!first.base.id.is_empty());
        assert_ne!(first.base.id, second.base.id);
    }

    #[test]
    fn build_rejects_bad_matricule() {
        for bad in ["123", "12345", "12a4", ""] {
            let mut p = payload();
            p.matricule = bad.to_string();
            assert!(matches!(
                DemandeAttestation::build(p, Utc::now()),
                Err(ApiError::Validation(_))
            ));
        }
    }

    #[test]
    fn build_rejects_bad_email_and_empty_fields() {
        let mut p = payload();
        p.email = "pas-un-email".to_string();
        assert!(DemandeAttestation::build(p, Utc::now()).is_err());

        let mut p = payload();
        p.nom = "   ".to_string();
        assert!(DemandeAttestation::build(p, Utc::now()).is_err());

        let mut p = payload();
        p.attestations = vec!["  ".to_string()];
        assert!(DemandeAttestation::build(p, Utc::now()).is_err());
    }

    #[test]
    fn patch_moves_to_traite_but_never_back() {
        let mut demande = DemandeAttestation::build(payload(), Utc::now()).unwrap();

        let patch = PatchAttestation {
            id: demande.base.id.clone(),
            status: Some(Statut::Traite),
        };
        assert!(demande.apply_patch(&patch).unwrap());
        assert_eq!(demande.base.status, Statut::Traite);

        // re-asserting "traité" is allowed and re-triggers notification
        assert!(demande.apply_patch(&patch).unwrap());

        let back = PatchAttestation {
            id: demande.base.id.clone(),
            status: Some(Statut::EnCours),
        };
        assert!(demande.apply_patch(&back).is_err());
        assert_eq!(demande.base.status, Statut::Traite);
    }

    #[test]
    fn empty_patch_is_detected() {
        let patch = PatchAttestation {
            id: "x".to_string(),
            status: None,
        };
        assert!(patch.is_empty());
    }

    #[test]
    fn wire_format_is_camel_case_and_flattened() {
        let demande = DemandeAttestation::build(payload(), Utc::now()).unwrap();
        let value = serde_json::to_value(&demande).unwrap();

        assert!(value.get("id").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["status"], "en cours");
        assert!(value.get("base").is_none());
    }
}
