//! Tests for contacts API handlers.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use chrono::NaiveDate;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockContactsCommand, MockContactsQuery};
use crate::domain::{ContactFields, UserId};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::test_utils::{TEST_TOKEN, bearer, state_with, test_account};

fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(web::scope("/api").configure(configure))
}

fn owner() -> UserId {
    test_account().id
}

fn born(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("fixture date")
}

fn fields(name: &str, email: &str, born_date: NaiveDateTime) -> ContactFields {
    ContactDraft {
        name: Some(name.to_owned()),
        surname: Some("Lovelace".to_owned()),
        email: email.to_owned(),
        phone: None,
        born_date,
        done: None,
    }
    .validate()
    .expect("fixture contact")
}

fn stored(id: i64, name: &str) -> Contact {
    Contact::new(
        ContactId::new(id),
        owner(),
        fields(name, "ada@example.com", born(1815, 12, 10)),
    )
}

#[fixture]
fn request_body() -> Value {
    json!({
        "name": "Ada",
        "surname": "Lovelace",
        "email": "ada@example.com",
        "born_date": "1815-12-10",
        "done": true
    })
}

async fn send(state: HttpState, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(state)).await;
    let response = actix_test::call_service(
        &app,
        request
            .insert_header((AUTHORIZATION, bearer(TEST_TOKEN)))
            .to_request(),
    )
    .await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

fn error_code(body: &Value) -> Option<&str> {
    body.get("code").and_then(Value::as_str)
}

#[rstest]
#[actix_web::test]
async fn list_uses_default_page_and_caller_as_owner() {
    let mut query = MockContactsQuery::new();
    query
        .expect_list()
        .withf(|owner_id, page| *owner_id == owner() && page.skip() == 0 && page.limit() == 100)
        .times(1)
        .return_once(|_, _| Ok(vec![stored(1, "Ada"), stored(2, "Grace")]));

    let (status, body) = send(
        state_with(MockContactsCommand::new(), query),
        actix_test::TestRequest::get().uri("/api/contacts"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|contact| contact.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, ["Ada", "Grace"]);
}

#[rstest]
#[actix_web::test]
async fn list_forwards_explicit_page() {
    let mut query = MockContactsQuery::new();
    query
        .expect_list()
        .withf(|_, page| page.skip() == 5 && page.limit() == 2)
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let (status, body) = send(
        state_with(MockContactsCommand::new(), query),
        actix_test::TestRequest::get().uri("/api/contacts?skip=5&limit=2"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[rstest]
#[case("/api/contacts?skip=-1", "skip")]
#[case("/api/contacts?limit=0", "limit")]
#[case("/api/contacts?limit=1001", "limit")]
#[actix_web::test]
async fn list_rejects_out_of_range_pagination(#[case] uri: &str, #[case] field: &str) {
    let mut query = MockContactsQuery::new();
    query.expect_list().times(0);

    let (status, body) = send(
        state_with(MockContactsCommand::new(), query),
        actix_test::TestRequest::get().uri(uri),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some(field)
    );
}

#[rstest]
#[actix_web::test]
async fn create_returns_created_contact(request_body: Value) {
    let mut command = MockContactsCommand::new();
    command
        .expect_create()
        .withf(|owner_id, draft| {
            *owner_id == owner()
                && draft.name.as_deref() == Some("Ada")
                && draft.born_date == born(1815, 12, 10)
                && draft.done == Some(true)
        })
        .times(1)
        .return_once(|_, _| Ok(stored(7, "Ada")));

    let (status, body) = send(
        state_with(command, MockContactsQuery::new()),
        actix_test::TestRequest::post()
            .uri("/api/contacts")
            .set_json(&request_body),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "id": 7,
            "name": "Ada",
            "surname": "Lovelace",
            "email": "ada@example.com",
            "phone": "+421000000000",
            "born_date": "1815-12-10T00:00:00"
        })
    );
}

#[rstest]
#[actix_web::test]
async fn create_rejects_unparseable_born_date(mut request_body: Value) {
    request_body["born_date"] = json!("10/12/1815");
    let mut command = MockContactsCommand::new();
    command.expect_create().times(0);

    let (status, body) = send(
        state_with(command, MockContactsQuery::new()),
        actix_test::TestRequest::post()
            .uri("/api/contacts")
            .set_json(&request_body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.pointer("/details/code").and_then(Value::as_str),
        Some("invalid_date")
    );
}

#[rstest]
#[actix_web::test]
async fn create_surfaces_service_validation_failure(request_body: Value) {
    let mut command = MockContactsCommand::new();
    command.expect_create().times(1).return_once(|_, _| {
        Err(Error::invalid_request("email is malformed")
            .with_details(json!({"field": "email", "code": "invalid_email"})))
    });

    let (status, body) = send(
        state_with(command, MockContactsQuery::new()),
        actix_test::TestRequest::post()
            .uri("/api/contacts")
            .set_json(&request_body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some("invalid_request"));
}

#[rstest]
#[actix_web::test]
async fn create_rejects_body_without_email() {
    let mut command = MockContactsCommand::new();
    command.expect_create().times(0);

    let (status, body) = send(
        state_with(command, MockContactsQuery::new()),
        actix_test::TestRequest::post()
            .uri("/api/contacts")
            .set_json(json!({"name": "Ada", "born_date": "1815-12-10"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.pointer("/details/source").and_then(Value::as_str),
        Some("body")
    );
}

#[rstest]
#[actix_web::test]
async fn get_returns_contact() {
    let mut query = MockContactsQuery::new();
    query
        .expect_get()
        .withf(|_, id| *id == ContactId::new(4))
        .times(1)
        .return_once(|_, _| Ok(Some(stored(4, "Ada"))));

    let (status, body) = send(
        state_with(MockContactsCommand::new(), query),
        actix_test::TestRequest::get().uri("/api/contacts/4"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("id").and_then(Value::as_i64), Some(4));
}

#[rstest]
#[actix_web::test]
async fn get_missing_contact_is_not_found() {
    let mut query = MockContactsQuery::new();
    query.expect_get().times(1).return_once(|_, _| Ok(None));

    let (status, body) = send(
        state_with(MockContactsCommand::new(), query),
        actix_test::TestRequest::get().uri("/api/contacts/99"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), Some("not_found"));
}

#[rstest]
#[actix_web::test]
async fn update_replaces_contact(request_body: Value) {
    let mut command = MockContactsCommand::new();
    command
        .expect_update()
        .withf(|_, id, draft| *id == ContactId::new(3) && draft.email == "ada@example.com")
        .times(1)
        .return_once(|_, _, _| Ok(Some(stored(3, "Ada"))));

    let (status, body) = send(
        state_with(command, MockContactsQuery::new()),
        actix_test::TestRequest::put()
            .uri("/api/contacts/3")
            .set_json(&request_body),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("id").and_then(Value::as_i64), Some(3));
}

#[rstest]
#[actix_web::test]
async fn update_missing_contact_is_not_found(request_body: Value) {
    let mut command = MockContactsCommand::new();
    command
        .expect_update()
        .times(1)
        .return_once(|_, _, _| Ok(None));

    let (status, _) = send(
        state_with(command, MockContactsQuery::new()),
        actix_test::TestRequest::put()
            .uri("/api/contacts/3")
            .set_json(&request_body),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case(Some(2), StatusCode::OK)]
#[case(None, StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn delete_reports_removed_contact(#[case] existing: Option<i64>, #[case] status: StatusCode) {
    let mut command = MockContactsCommand::new();
    command
        .expect_delete()
        .times(1)
        .return_once(move |_, _| Ok(existing.map(|id| stored(id, "Ada"))));

    let (actual, _) = send(
        state_with(command, MockContactsQuery::new()),
        actix_test::TestRequest::delete().uri("/api/contacts/2"),
    )
    .await;

    assert_eq!(actual, status);
}

#[rstest]
#[actix_web::test]
async fn search_passes_raw_credentials() {
    let mut query = MockContactsQuery::new();
    query
        .expect_search()
        .withf(|_, token| token.as_str() == "Lov")
        .times(1)
        .return_once(|_, _| Ok(vec![stored(1, "Ada")]));

    let (status, body) = send(
        state_with(MockContactsCommand::new(), query),
        actix_test::TestRequest::get().uri("/api/contacts/search/Lov"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn search_without_matches_is_not_found() {
    let mut query = MockContactsQuery::new();
    query
        .expect_search()
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let (status, _) = send(
        state_with(MockContactsCommand::new(), query),
        actix_test::TestRequest::get().uri("/api/contacts/search/nobody"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn overlong_credentials_are_searched_not_rejected() {
    let long = "x".repeat(300);
    let expected = long.clone();
    let mut query = MockContactsQuery::new();
    query
        .expect_search()
        .withf(move |_, token| token.as_str() == expected)
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let (status, body) = send(
        state_with(MockContactsCommand::new(), query),
        actix_test::TestRequest::get().uri(&format!("/api/contacts/search/{long}")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), Some("not_found"));
}

#[rstest]
#[actix_web::test]
async fn birthday_route_is_not_captured_by_contact_id() {
    let mut query = MockContactsQuery::new();
    query
        .expect_upcoming_birthdays()
        .times(1)
        .return_once(|_| Ok(vec![stored(5, "Ada")]));
    query.expect_get().times(0);

    let (status, body) = send(
        state_with(MockContactsCommand::new(), query),
        actix_test::TestRequest::get().uri("/api/contacts/birthday/"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn no_upcoming_birthdays_is_not_found() {
    let mut query = MockContactsQuery::new();
    query
        .expect_upcoming_birthdays()
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let (status, _) = send(
        state_with(MockContactsCommand::new(), query),
        actix_test::TestRequest::get().uri("/api/contacts/birthday/"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn storage_outage_maps_to_service_unavailable() {
    let mut query = MockContactsQuery::new();
    query
        .expect_list()
        .times(1)
        .return_once(|_, _| Err(Error::service_unavailable("contact repository unavailable")));

    let (status, body) = send(
        state_with(MockContactsCommand::new(), query),
        actix_test::TestRequest::get().uri("/api/contacts"),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_code(&body), Some("service_unavailable"));
}

#[rstest]
#[actix_web::test]
async fn requests_without_token_are_unauthorised() {
    let mut query = MockContactsQuery::new();
    query.expect_list().times(0);
    let app = actix_test::init_service(test_app(state_with(MockContactsCommand::new(), query))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/contacts").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
