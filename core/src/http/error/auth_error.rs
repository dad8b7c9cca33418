use actix_web::{error, http::header, http::StatusCode, HttpResponse, HttpResponseBuilder};
use derive_more::{Display, Error};
use serde::Serialize;

/// Error returned by extractors when a handler needs a principal the request
/// does not carry.
#[derive(Debug, Display, Error)]
pub enum AuthError {
    #[display("unauthorized")]
    Unauthorized,
}

impl error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponseBuilder::new(self.status_code())
            .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
            .json(UnauthorizedBody::new(None))
    }
}

/// Body of every `401 Unauthorized` response.
///
/// The payload is the same whatever check failed, so a caller cannot tell an
/// unknown principal from a bad credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnauthorizedBody<'a> {
    pub status: u16,
    pub error: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'a str>,
}

impl<'a> UnauthorizedBody<'a> {
    pub fn new(path: Option<&'a str>) -> Self {
        UnauthorizedBody {
            status: StatusCode::UNAUTHORIZED.as_u16(),
            error: "Unauthorized",
            message: "Full authentication is required to access this resource",
            path,
        }
    }
}
