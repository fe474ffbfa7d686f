use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::auth::AdminUser;
use crate::error::ApiError;
use crate::model::DemandeAttestation;
use crate::notify::{EmailStatus, Mailer};
use crate::store::Store;

#[derive(Deserialize, ToSchema)]
pub struct SendEmailReq {
    #[schema(example = "3f1e9c2a-7b44-4c58-9f0d-2a6f8f5f2f10")]
    pub id: String,
}

/* =========================
Re-send the status notification for an attestation request (admin)
========================= */
/// Swagger doc for send_email endpoint
#[utoipa::path(
    post,
    path = "/api/send-email",
    request_body = SendEmailReq,
    responses(
        (status = 200, description = "Email envoyé", body = Object, example = json!({
            "message": "Email envoyé avec succès !"
        })),
        (status = 400, description = "Pas d'adresse email sur la demande"),
        (status = 401, description = "Cookie admin manquant ou invalide"),
        (status = 404, description = "Demande introuvable"),
        (status = 500, description = "Échec de l'envoi")
    ),
    security(
        ("admin_cookie" = [])
    ),
    tag = "Notification"
)]
pub async fn send_email(
    _admin: AdminUser,
    store: web::Data<Store>,
    mailer: web::Data<Mailer>,
    payload: web::Json<SendEmailReq>,
) -> actix_web::Result<impl Responder> {
    let demande: DemandeAttestation = store
        .get(&payload.id)
        .await
        .map_err(ApiError::from)?
        .ok_or(ApiError::NotFound)?;

    match mailer.notify(&demande).await {
        EmailStatus::Envoye => Ok(HttpResponse::Ok().json(json!({
            "message": EmailStatus::Envoye.message()
        }))),
        EmailStatus::PasDAdresse => {
            Err(ApiError::Validation("Pas d'email pour cette demande.".to_string()).into())
        }
        EmailStatus::Echec => Ok(HttpResponse::InternalServerError().json(json!({
            "error": EmailStatus::Echec.message()
        }))),
    }
}
