//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers take a [`CurrentUser`] argument; extraction reads
//! `Authorization: Bearer <token>` and resolves it through the
//! [`IdentityResolver`](crate::domain::ports::IdentityResolver) held in
//! [`HttpState`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, UserAccount, UserId};

use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; an empty token is rejected.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// The authenticated account making the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(UserAccount);

impl CurrentUser {
    /// Owner key for contact operations.
    pub fn id(&self) -> &UserId {
        &self.0.id
    }

    /// The full account record.
    pub fn account(&self) -> &UserAccount {
        &self.0
    }

    /// Consume the extractor, returning the account.
    pub fn into_account(self) -> UserAccount {
        self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_owned);
        let state = req.app_data::<web::Data<HttpState>>().cloned();

        Box::pin(async move {
            let Some(token) = token else {
                return Err(Error::unauthorized("missing bearer token"));
            };
            let Some(state) = state else {
                return Err(Error::internal("HTTP state is not configured"));
            };
            match state.identity.resolve(&token).await? {
                Some(account) => Ok(Self(account)),
                None => {
                    debug!("bearer token did not resolve to an account");
                    Err(Error::unauthorized("invalid bearer token"))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;

    use super::*;
    use crate::inbound::http::test_utils::{TEST_TOKEN, bearer, state_with_identity};

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer   abc  ", Some("abc"))]
    #[case("BEARER abc", Some("abc"))]
    #[case("Basic abc", None)]
    #[case("Bearer", None)]
    #[case("Bearer    ", None)]
    fn parses_bearer_header(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(header), expected);
    }

    async fn call_with(header: Option<String>, confirmed: bool) -> StatusCode {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_identity(confirmed)))
                .route(
                    "/whoami",
                    web::get().to(|user: CurrentUser| async move {
                        HttpResponse::Ok().body(user.id().to_string())
                    }),
                ),
        )
        .await;
        let mut req = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        actix_test::call_service(&app, req.to_request()).await.status()
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_token_is_accepted() {
        assert_eq!(call_with(Some(bearer(TEST_TOKEN)), true).await, StatusCode::OK);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Bearer wrong-token".to_owned()))]
    #[case(Some(format!("Basic {TEST_TOKEN}")))]
    #[actix_web::test]
    async fn missing_or_unknown_token_is_unauthorised(#[case] header: Option<String>) {
        assert_eq!(call_with(header, true).await, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn unconfirmed_account_is_unauthorised() {
        assert_eq!(
            call_with(Some(bearer(TEST_TOKEN)), false).await,
            StatusCode::UNAUTHORIZED
        );
    }
}
