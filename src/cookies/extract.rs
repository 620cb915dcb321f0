use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

use crate::cookies::Cookies;

impl<S> FromRequestParts<S> for Cookies
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(cookies) = parts.extensions.get::<Cookies>() {
            Ok(cookies.clone())
        } else {
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "missing CookieLayer on this route",
            ))
        }
    }
}
