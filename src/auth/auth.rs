use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use futures::future::{Ready, ready};

use crate::config::Config;

/// Marker extracted from the `admin-password` cookie. The check is a
/// plain string comparison against the configured password; there is no
/// session state.
pub struct AdminUser;

impl FromRequest for AdminUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        match req.cookie("admin-password") {
            Some(cookie) if cookie.value() == config.admin_password => ready(Ok(AdminUser)),
            _ => ready(Err(ErrorUnauthorized("Accès administrateur requis"))),
        }
    }
}
