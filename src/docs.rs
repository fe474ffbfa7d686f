use crate::api::demandes::{
    AttestationListResponse, AttestationPatchResponse, DeleteReq, ParadaListResponse,
    ParadaPatchResponse,
};
use crate::api::send_email::SendEmailReq;
use crate::auth::handlers::LoginReq;
use crate::model::{
    CreateAttestation, CreateParada, DemandeAttestation, DemandeBase, DemandeChangementParada,
    PatchAttestation, PatchParada, Statut,
};
use utoipa::Modify;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portail RH API",
        version = "1.0.0",
        description = r#"
## Portail RH : demandes d'attestation & changement de parada

This API powers the internal HR request portal.

### 🔹 Key Features
- **Demandes d'attestation**
  - Public submission, admin review, processing with email notification
- **Demandes de changement de parada**
  - Public submission, in-place edit of the new stop, processing
- **Filtering & Pagination**
  - Case-insensitive name/badge filters, inclusive date range, status counters

### 🔐 Security
Admin operations require the `admin-password` cookie set by `/auth/login`.
Submissions are public and rate limited.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attestation::create_demande,
        crate::api::attestation::list_demandes,
        crate::api::attestation::update_demande,
        crate::api::attestation::delete_demande,

        crate::api::parada::create_demande,
        crate::api::parada::list_demandes,
        crate::api::parada::update_demande,
        crate::api::parada::delete_demande,

        crate::api::send_email::send_email,

        crate::auth::handlers::login,
        crate::auth::handlers::logout
    ),
    components(
        schemas(
            Statut,
            DemandeBase,
            DemandeAttestation,
            CreateAttestation,
            PatchAttestation,
            DemandeChangementParada,
            CreateParada,
            PatchParada,
            AttestationListResponse,
            ParadaListResponse,
            AttestationPatchResponse,
            ParadaPatchResponse,
            DeleteReq,
            SendEmailReq,
            LoginReq
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attestation", description = "Demandes d'attestation"),
        (name = "Parada", description = "Demandes de changement de parada"),
        (name = "Notification", description = "Renvoi de notification email"),
        (name = "Auth", description = "Session administrateur"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("admin-password"))),
            );
        }
    }
}
