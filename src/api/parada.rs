use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::api::demandes::{self, DeleteReq, DemandeQuery, ParadaListResponse, ParadaPatchResponse};
use crate::auth::auth::AdminUser;
use crate::model::{CreateParada, DemandeChangementParada, PatchParada};
use crate::notify::Mailer;
use crate::store::Store;

/* =========================
Submit parada change request (public)
========================= */
/// Swagger doc for create_demande endpoint
#[utoipa::path(
    post,
    path = "/api/demande-changement-parada",
    request_body(
        content = CreateParada,
        description = "Soumission d'une demande de changement de parada",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Demande enregistrée", body = DemandeChangementParada),
        (status = 400, description = "Soumission invalide"),
        (status = 500, description = "Erreur interne")
    ),
    tag = "Parada"
)]
pub async fn create_demande(
    store: web::Data<Store>,
    payload: web::Json<CreateParada>,
) -> actix_web::Result<impl Responder> {
    let created: DemandeChangementParada =
        demandes::create(store.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(created))
}

/* =========================
List / filter / paginate (admin)
========================= */
/// Swagger doc for list_demandes endpoint
#[utoipa::path(
    get,
    path = "/api/demande-changement-parada",
    params(DemandeQuery),
    responses(
        (status = 200, description = "Liste paginée avec compteurs de statut", body = ParadaListResponse),
        (status = 401, description = "Cookie admin manquant ou invalide")
    ),
    security(
        ("admin_cookie" = [])
    ),
    tag = "Parada"
)]
pub async fn list_demandes(
    _admin: AdminUser,
    store: web::Data<Store>,
    query: web::Query<DemandeQuery>,
) -> actix_web::Result<impl Responder> {
    let response = demandes::list::<DemandeChangementParada>(store.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(response))
}

/* =========================
Update status or edit the new parada (admin)
========================= */
/// Swagger doc for update_demande endpoint
#[utoipa::path(
    patch,
    path = "/api/demande-changement-parada",
    request_body = PatchParada,
    responses(
        (status = 200, description = "Demande mise à jour", body = ParadaPatchResponse),
        (status = 400, description = "Patch vide ou transition interdite"),
        (status = 401, description = "Cookie admin manquant ou invalide"),
        (status = 404, description = "Demande introuvable")
    ),
    security(
        ("admin_cookie" = [])
    ),
    tag = "Parada"
)]
pub async fn update_demande(
    _admin: AdminUser,
    store: web::Data<Store>,
    mailer: web::Data<Mailer>,
    payload: web::Json<PatchParada>,
) -> actix_web::Result<impl Responder> {
    let response = demandes::patch::<DemandeChangementParada>(
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
    path = "/api/demande-changement-parada",
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
    tag = "Parada"
)]
pub async fn delete_demande(
    _admin: AdminUser,
    store: web::Data<Store>,
    payload: web::Json<DeleteReq>,
) -> actix_web::Result<impl Responder> {
    demandes::delete::<DemandeChangementParada>(store.get_ref(), &payload.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Demande supprimée avec succès."
    })))
}
