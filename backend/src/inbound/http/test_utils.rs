//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::test::TestRequest;
use actix_web::{App, web};

use crate::inbound::http::identity::{
    CLAIM_DEPARTMENT_HEADER, CLAIM_EMAIL_HEADER, CLAIM_GROUPS_HEADER, CLAIM_NAME_HEADER,
};
use crate::inbound::http::state::HttpState;

/// Gateway claims attached to a test request.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestClaims<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub department: Option<&'a str>,
    pub groups: Option<&'a str>,
}

impl<'a> TestClaims<'a> {
    /// Claims for a named caller with an email and department.
    pub fn person(name: &'a str, email: &'a str, department: &'a str) -> Self {
        Self {
            name: Some(name),
            email: Some(email),
            department: Some(department),
            groups: None,
        }
    }

    /// Add a comma-separated groups claim.
    pub fn in_groups(mut self, groups: &'a str) -> Self {
        self.groups = Some(groups);
        self
    }

    /// Attach the claims as gateway headers.
    pub fn apply(self, mut req: TestRequest) -> TestRequest {
        for (header, value) in [
            (CLAIM_NAME_HEADER, self.name),
            (CLAIM_EMAIL_HEADER, self.email),
            (CLAIM_DEPARTMENT_HEADER, self.department),
            (CLAIM_GROUPS_HEADER, self.groups),
        ] {
            if let Some(value) = value {
                req = req.insert_header((header, value));
            }
        }
        req
    }
}

/// Build an app exposing every API route over `state`.
pub fn api_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(crate::inbound::http::configure_api)
}
