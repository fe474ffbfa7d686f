use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::api::demandes::{self, AttestationListResponse, AttestationPatchResponse, DeleteReq, DemandeQuery};
use crate::auth::auth::AdminUser;
use crate::model::{CreateAttestation, DemandeAttestation, PatchAttestation};
use crate::notify::Mailer;
use crate::store::Store;

/* =========================
Submit attestation request (public)
========================= */
/// Swagger doc for create_demande endpoint
#[utoipa::path(
    post,
    path = "/api/demande-attestation",
    request_body(
        content = CreateAttestation,
        description = "Soumission d'une demande d'attestation",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Demande enregistrée", body = DemandeAttestation),
        (status = 400, description = "Soumission invalide"),
        (status = 500, description = "Erreur interne")
    ),
    tag = "Attestation"
)]
pub async fn create_demande(
    store: web::Data<Store>,
    payload: web::Json<CreateAttestation>,
) -> actix_web::Result<impl Responder> {
    let created: DemandeAttestation =
        demandes::create(store.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(created))
}

/* =========================
List / filter / paginate (admin)
========================= */
/// Swagger doc for list_demandes endpoint
#[utoipa::path(
    get,
    path = "/api/demande-attestation",
    params(DemandeQuery),
    responses(
        (status = 200, description = "Liste paginée avec compteurs de statut", body = AttestationListResponse),
        (status = 401, description = "Cookie admin manquant ou invalide")
    ),
    security(
        ("admin_cookie" = [])
    ),
    tag = "Attestation"
)]
pub async fn list_demandes(
    _admin: AdminUser,
    store: web::Data<Store>,
    query: web::Query<DemandeQuery>,
) -> actix_web::Result<impl Responder> {
    let response = demandes::list::<DemandeAttestation>(store.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(response))
}

/* =========================
Update status (admin)
========================= */
/// Swagger doc for update_demande endpoint
#[utoipa::path(
    patch,
    path = "/api/demande-attestation",
    request_body = PatchAttestation,
    responses(
        (status = 200, description = "Demande mise à jour", body = AttestationPatchResponse),
        (status = 400, description = "Patch vide ou transition interdite"),
        (status = 401, description = "Cookie admin manquant ou invalide"),
        (status = 404, description = "Demande introuvable")
    ),
    security(
        ("admin_cookie" = [])
    ),
    tag = "Attestation"
)]
pub async fn update_demande(
    _admin: AdminUser,
    store: web::Data<Store>,
    mailer: web::Data<Mailer>,
    payload: web::Json<PatchAttestation>,
) -> actix_web::Result<impl Responder> {
    let response = demandes::patch::<DemandeAttestation>(
        store.get_ref(),
        mailer.get_ref(),
        payload.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(response))
}

/* =========================
Delete (admin)
========================= */
/// Swagger doc for delete_demande endpoint
#[utoipa::path(
    delete,
    path = "/api/demande-attestation",
    request_body = DeleteReq,
    responses(
        (status = 200, description = "Demande supprimée", body = Object, example = json!({
            "message": "Demande supprimée avec succès."
        })),
        (status = 401, description = "Cookie admin manquant ou invalide"),
        (status = 404, description = "Demande introuvable")
    ),
    security(
        ("admin_cookie" = [])
    ),
    tag = "Attestation"
)]
pub async fn delete_demande(
    _admin: AdminUser,
    store: web::Data<Store>,
    payload: web::Json<DeleteReq>,
) -> actix_web::Result<impl Responder> {
    demandes::delete::<DemandeAttestation>(store.get_ref(), &payload.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Demande supprimée avec succès."
    })))
}
