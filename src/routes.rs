use crate::{
    api::{attestation, parada, send_email},
    auth::handlers,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    // Admin session cookie
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(build_limiter(config.rate_login_per_min))
                    .route(web::post().to(handlers::login)),
            )
            .service(web::resource("/logout").route(web::post().to(handlers::logout))),
    );

    // Demande endpoints. POST is the public submission; GET/PATCH/DELETE
    // require the admin cookie (enforced by the AdminUser extractor).
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/demande-attestation").service(
                    web::resource("")
                        .wrap(build_limiter(config.rate_submit_per_min))
                        .route(web::post().to(attestation::create_demande))
                        .route(web::get().to(attestation::list_demandes))
                        .route(web::patch().to(attestation::update_demande))
                        .route(web::delete().to(attestation::delete_demande)),
                ),
            )
            .service(
                web::scope("/demande-changement-parada").service(
                    web::resource("")
                        .wrap(build_limiter(config.rate_submit_per_min))
                        .route(web::post().to(parada::create_demande))
                        .route(web::get().to(parada::list_demandes))
                        .route(web::patch().to(parada::update_demande))
                        .route(web::delete().to(parada::delete_demande)),
                ),
            )
            .service(web::resource("/send-email").route(web::post().to(send_email::send_email))),
    );
}
