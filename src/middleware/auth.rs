//! Authenticated-user extraction
//!
//! Explicit bearer-token guard: pulls the Authorization header, resolves the
//! principal, and hands it to the handler as a parameter. Every failure mode
//! answers the same generic 401.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::auth::PrincipalResolver;
use crate::error::ApiError;
use crate::models::User;

/// Authenticated principal for the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<PrincipalResolver>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ApiError::Unauthorized("Could not validate credentials".to_string())
                })?;

        let resolver = Arc::<PrincipalResolver>::from_ref(state);

        let user = resolver
            .resolve(bearer.token())
            .await
            .map_err(ApiError::from)?;

        Ok(CurrentUser(user))
    }
}
