use actix_web::cookie::Cookie;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::config::Config;

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    pub password: String,
}

/// Swagger doc for login endpoint
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Connexion réussie, cookie admin posé", body = Object, example = json!({
            "message": "Connexion réussie."
        })),
        (status = 401, description = "Mot de passe invalide")
    ),
    tag = "Auth"
)]
pub async fn login(config: web::Data<Config>, payload: web::Json<LoginReq>) -> impl Responder {
    if payload.password != config.admin_password {
        warn!("Admin login rejected");
        return HttpResponse::Unauthorized().json(json!({
            "error": "Mot de passe invalide."
        }));
    }

    let cookie = Cookie::build("admin-password", payload.password.clone())
        .path("/")
        .http_only(true)
        .finish();

    info!("Administrator logged in");
    HttpResponse::Ok().cookie(cookie).json(json!({
        "message": "Connexion réussie."
    }))
}

/// Swagger doc for logout endpoint
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Cookie admin effacé", body = Object, example = json!({
            "message": "Déconnexion réussie."
        }))
    ),
    tag = "Auth"
)]
pub async fn logout() -> impl Responder {
    let mut cookie = Cookie::new("admin-password", "");
    cookie.set_path("/");
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(json!({
        "message": "Déconnexion réussie."
    }))
}
