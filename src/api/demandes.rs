//! Generic request-management core shared by both demande kinds. The
//! per-kind modules only carry payload schemas and OpenAPI annotations.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::model::{
    Demande, DemandeAttestation, DemandeChangementParada, DemandePatch, Statut,
};
use crate::notify::Mailer;
use crate::store::{DemandeFilter, MySqlRecord, Page, Store};

/// Filter + pagination query string shared by both list endpoints.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DemandeQuery {
    /// Case-insensitive substring filter on the surname
    pub nom: Option<String>,
    /// Case-insensitive substring filter on the first name
    pub prenom: Option<String>,
    /// Case-insensitive substring filter on the badge number
    pub matricule: Option<String>,
    /// Inclusive lower bound on the creation date
    #[param(example = "2026-01-01", format = "date", value_type = String)]
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the creation date
    #[param(example = "2026-01-31", format = "date", value_type = String)]
    pub date_to: Option<NaiveDate>,
    /// Pagination page number (1-based)
    #[param(example = 1)]
    pub page: Option<u32>,
    /// Items per page (default 10, max 100)
    #[param(example = 10)]
    pub per_page: Option<u32>,
}

impl DemandeQuery {
    pub fn filter(&self) -> DemandeFilter {
        DemandeFilter {
            nom: self.nom.clone(),
            prenom: self.prenom.clone(),
            matricule: self.matricule.clone(),
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }

    pub fn page(&self) -> Page {
        Page::new(self.page, self.per_page)
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(
    AttestationListResponse = ListResponse<DemandeAttestation>,
    ParadaListResponse = ListResponse<DemandeChangementParada>
)]
pub struct ListResponse<R> {
    /// Total records matching the filter, across all pages
    #[schema(example = 42)]
    pub total: i64,
    /// The requested page, newest first
    pub demandes: Vec<R>,
    /// Matching records still "en cours"
    #[schema(example = 30)]
    pub en_cours: i64,
    /// Matching records already "traité"
    #[schema(example = 12)]
    pub traite: i64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(
    AttestationPatchResponse = PatchResponse<DemandeAttestation>,
    ParadaPatchResponse = PatchResponse<DemandeChangementParada>
)]
pub struct PatchResponse<R> {
    #[schema(example = "Mise à jour réussie.")]
    pub message: String,
    /// Best-effort notification outcome, informational only
    #[schema(example = "Email envoyé avec succès !")]
    pub email_status: String,
    pub updated: R,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteReq {
    #[schema(example = "3f1e9c2a-7b44-4c58-9f0d-2a6f8f5f2f10")]
    pub id: String,
}

pub async fn create<R>(store: &Store, payload: R::Create) -> Result<R, ApiError>
where
    R: Demande + MySqlRecord,
{
    let record = R::build(payload, Utc::now())?;
    store.insert(&record).await?;
    info!(id = %record.base().id, collection = R::COLLECTION, "Demande created");
    Ok(record)
}

pub async fn list<R>(store: &Store, query: &DemandeQuery) -> Result<ListResponse<R>, ApiError>
where
    R: Demande + MySqlRecord,
{
    let filter = query.filter();
    let (total, demandes) = store.list::<R>(&filter, query.page()).await?;
    let en_cours = store.count::<R>(&filter, Some(Statut::EnCours)).await?;
    let traite = store.count::<R>(&filter, Some(Statut::Traite)).await?;

    Ok(ListResponse {
        total,
        demandes,
        en_cours,
        traite,
    })
}

/// Applies an admin patch, then fires the notification hook when the
/// patch set the status to "traité". The mutation commits regardless of
/// the email outcome.
pub async fn patch<R>(
    store: &Store,
    mailer: &Mailer,
    patch: R::Patch,
) -> Result<PatchResponse<R>, ApiError>
where
    R: Demande + MySqlRecord,
{
    if patch.is_empty() {
        return Err(ApiError::Validation(
            "ID et au moins une mise à jour requise.".to_string(),
        ));
    }

    let mut record: R = store.get(patch.id()).await?.ok_or(ApiError::NotFound)?;
    let processed = record.apply_patch(&patch)?;

    if !store.save(&record).await? {
        // record vanished between get and save
        return Err(ApiError::NotFound);
    }

    let email_status = if processed {
        mailer.notify(&record).await.message()
    } else {
        "Aucun email envoyé."
    };

    Ok(PatchResponse {
        message: "Mise à jour réussie.".to_string(),
        email_status: email_status.to_string(),
        updated: record,
    })
}

pub async fn delete<R>(store: &Store, id: &str) -> Result<(), ApiError>
where
    R: Demande + MySqlRecord,
{
    if store.delete::<R>(id).await? {
        info!(id, collection = R::COLLECTION, "Demande deleted");
        Ok(())
    } else {
        Err(ApiError::NotFound)
    }
}
