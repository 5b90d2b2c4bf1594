//! Identity claims extractor.
//!
//! The service sits behind an authenticating gateway that forwards the
//! verified token claims as request headers. Claims are trusted as-is;
//! missing headers become missing claims, never errors, so each use case
//! decides what it requires.

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::{CallerIdentity, Error};

/// Display name claim header.
pub const CLAIM_NAME_HEADER: &str = "x-claim-name";
/// Email claim header.
pub const CLAIM_EMAIL_HEADER: &str = "x-claim-email";
/// Department claim header.
pub const CLAIM_DEPARTMENT_HEADER: &str = "x-claim-department";
/// Comma-separated group memberships header.
pub const CLAIM_GROUPS_HEADER: &str = "x-claim-groups";

/// Caller identity extracted from gateway claim headers.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::inbound::http::identity::Claims;
///
/// async fn whoami(claims: Claims) -> HttpResponse {
///     HttpResponse::Ok().body(claims.into_inner().department().to_owned())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Claims(CallerIdentity);

impl Claims {
    /// Consume the wrapper.
    #[must_use]
    pub fn into_inner(self) -> CallerIdentity {
        self.0
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

fn split_groups(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Read the caller identity from `headers`.
#[must_use]
pub fn caller_from_headers(headers: &HeaderMap) -> CallerIdentity {
    CallerIdentity::new(
        header(headers, CLAIM_NAME_HEADER),
        header(headers, CLAIM_EMAIL_HEADER),
        header(headers, CLAIM_DEPARTMENT_HEADER),
        header(headers, CLAIM_GROUPS_HEADER)
            .as_deref()
            .map(split_groups)
            .unwrap_or_default(),
    )
}

impl FromRequest for Claims {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self(caller_from_headers(req.headers()))))
    }
}
