use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};

use crate::errors::ApiError;
use crate::middleware::auth::Claims;

/// Explicit authenticated identity for handlers. Core operations take the
/// user id as a parameter rather than reading ambient session state.
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<Claims>() {
            ready(Ok(AuthenticatedUser {
                user_id: claims.user_id.clone(),
                email: claims.sub.clone(),
            }))
        } else {
            ready(Err(ApiError::AuthRequired))
        }
    }
}
