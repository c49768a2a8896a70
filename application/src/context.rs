//! Authentication extractors of the REST API.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use secrecy::{ExposeSecret as _, SecretString};
use subtle::ConstantTimeEq as _;
use tracing as log;

use crate::{config, define_error, AsError as _, Error};

/// Name of the header carrying the publishable API key of the storefront.
pub const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

/// Secrets the REST API requests are authenticated against.
#[derive(Debug)]
pub struct Credentials {
    /// Bearer token of the admin routes.
    admin_token: SecretString,

    /// Publishable API key of the storefront routes.
    publishable_key: SecretString,
}

impl From<config::Auth> for Credentials {
    fn from(auth: config::Auth) -> Self {
        let config::Auth {
            admin_token,
            publishable_key,
        } = auth;
        Self {
            admin_token,
            publishable_key,
        }
    }
}

/// Checks whether the `provided` value matches the configured `secret` in
/// constant time.
///
/// An empty `secret` matches nothing.
fn matches(secret: &SecretString, provided: &str) -> bool {
    let secret = secret.expose_secret().as_bytes();
    !secret.is_empty() && bool::from(secret.ct_eq(provided.as_bytes()))
}

/// Returns the [`Credentials`] installed into the request extensions.
fn credentials(
    parts: &http::request::Parts,
) -> Result<Arc<Credentials>, Error> {
    parts.extensions.get::<Arc<Credentials>>().cloned().ok_or_else(|| {
        log::error!("missing `Credentials` extension");
        Error::internal()
    })
}

/// Proof of the request being authenticated as an administrator.
#[derive(Clone, Copy, Debug)]
pub struct Admin;

#[async_trait]
impl<S> FromRequestParts<S> for Admin
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let credentials = credentials(parts)?;

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|e| {
                if e.is_missing() {
                    AuthError::AuthorizationRequired.into()
                } else {
                    e.into_error()
                }
            })?;

        if matches(&credentials.admin_token, bearer.token()) {
            Ok(Self)
        } else {
            Err(AuthError::InvalidCredentials.into())
        }
    }
}

/// Proof of the request coming from the storefront.
#[derive(Clone, Copy, Debug)]
pub struct Storefront;

#[async_trait]
impl<S> FromRequestParts<S> for Storefront
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let credentials = credentials(parts)?;

        let key = parts
            .headers
            .get(PUBLISHABLE_KEY_HEADER)
            .ok_or(AuthError::AuthorizationRequired)?
            .to_str()
            .map_err(|_| AuthError::InvalidCredentials)?;

        if matches(&credentials.publishable_key, key) {
            Ok(Self)
        } else {
            Err(AuthError::InvalidCredentials.into())
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,

        #[code = "INVALID_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Provided credentials are not valid"]
        InvalidCredentials,
    }
}
