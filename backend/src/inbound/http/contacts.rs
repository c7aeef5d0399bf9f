//! Contacts API handlers.
//!
//! ```text
//! GET    /api/contacts?skip=0&limit=100
//! POST   /api/contacts
//! GET    /api/contacts/birthday/
//! GET    /api/contacts/search/{credentials}
//! GET    /api/contacts/{contact_id}
//! PUT    /api/contacts/{contact_id}
//! DELETE /api/contacts/{contact_id}
//! ```
//!
//! Bodies use snake_case keys. Every route requires a bearer token and only
//! ever touches the caller's own contacts.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Contact, ContactDraft, ContactId, Error, Pagination, SearchToken};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, pagination_error, parse_born_date, search_token_error,
};

/// Request body for creating or replacing a contact.
///
/// Example JSON:
/// `{"name":"Ada","surname":"Lovelace","email":"ada@example.com","born_date":"1815-12-10"}`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ContactRequest {
    /// Given name; defaults to `Default`.
    #[schema(example = "Ada", max_length = 50)]
    pub name: Option<String>,
    /// Family name; defaults to `Contact`.
    #[schema(example = "Lovelace", max_length = 50)]
    pub surname: Option<String>,
    /// Email address.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Phone number; defaults to `+421000000000`.
    #[schema(example = "+441234567890", max_length = 50)]
    pub phone: Option<String>,
    /// `YYYY-MM-DD`, RFC 3339, or naive ISO 8601 timestamp.
    #[schema(example = "1815-12-10")]
    pub born_date: String,
    /// Accepted for compatibility; has no effect.
    pub done: Option<bool>,
}

impl TryFrom<ContactRequest> for ContactDraft {
    type Error = Error;

    fn try_from(value: ContactRequest) -> Result<Self, Self::Error> {
        let ContactRequest {
            name,
            surname,
            email,
            phone,
            born_date,
            done,
        } = value;
        Ok(Self {
            name,
            surname,
            email,
            phone,
            born_date: parse_born_date(FieldName::new("born_date"), &born_date)?,
            done,
        })
    }
}

/// Contact as returned by every contacts endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ContactResponse {
    /// Identifier assigned on creation.
    #[schema(example = 1)]
    pub id: i64,
    /// Given name.
    #[schema(example = "Ada")]
    pub name: String,
    /// Family name.
    #[schema(example = "Lovelace")]
    pub surname: String,
    /// Contact email address.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Phone number as entered.
    #[schema(example = "+421000000000")]
    pub phone: String,
    /// Birth date and time without zone.
    #[schema(value_type = String, example = "1815-12-10T00:00:00")]
    pub born_date: NaiveDateTime,
}

impl From<Contact> for ContactResponse {
    fn from(value: Contact) -> Self {
        Self {
            id: value.id().get(),
            name: value.name().to_owned(),
            surname: value.surname().to_owned(),
            email: value.email().to_string(),
            phone: value.phone().to_owned(),
            born_date: value.born_date(),
        }
    }
}

fn to_responses(contacts: Vec<Contact>) -> Vec<ContactResponse> {
    contacts.into_iter().map(ContactResponse::from).collect()
}

fn contact_not_found(id: ContactId) -> Error {
    Error::not_found(format!("contact {id} not found"))
}

/// Query parameters for `GET /api/contacts`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListContactsQuery {
    /// Records to skip; defaults to 0.
    pub skip: Option<i64>,
    /// Page size between 1 and 1000; defaults to 100.
    pub limit: Option<i64>,
}

/// List the caller's contacts in id order.
#[utoipa::path(
    get,
    path = "/api/contacts",
    params(ListContactsQuery),
    responses(
        (status = 200, description = "Contacts", body = [ContactResponse]),
        (status = 400, description = "Invalid pagination", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "listContacts"
)]
#[get("/contacts")]
pub async fn list_contacts(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<ListContactsQuery>,
) -> ApiResult<web::Json<Vec<ContactResponse>>> {
    let ListContactsQuery { skip, limit } = query.into_inner();
    let page = Pagination::new(skip, limit).map_err(pagination_error)?;
    let contacts = state.contacts_query.list(user.id(), page).await?;
    Ok(web::Json(to_responses(contacts)))
}

/// Create a contact owned by the caller.
#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Contact created", body = ContactResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "createContact"
)]
#[post("/contacts")]
pub async fn create_contact(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<ContactRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ContactDraft::try_from(payload.into_inner())?;
    let contact = state.contacts.create(user.id(), draft).await?;
    Ok(HttpResponse::Created().json(ContactResponse::from(contact)))
}

/// Contacts whose birthday falls in the upcoming window.
#[utoipa::path(
    get,
    path = "/api/contacts/birthday/",
    responses(
        (status = 200, description = "Contacts with upcoming birthdays", body = [ContactResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No upcoming birthdays", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "upcomingBirthdays"
)]
#[get("/contacts/birthday/")]
pub async fn upcoming_birthdays(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<ContactResponse>>> {
    let contacts = state.contacts_query.upcoming_birthdays(user.id()).await?;
    if contacts.is_empty() {
        return Err(Error::not_found("no upcoming birthdays"));
    }
    Ok(web::Json(to_responses(contacts)))
}

/// Search by name, then surname, then email; the first field with a match
/// wins.
#[utoipa::path(
    get,
    path = "/api/contacts/search/{credentials}",
    params(("credentials" = String, Path, description = "Case-sensitive substring")),
    responses(
        (status = 200, description = "Matching contacts", body = [ContactResponse]),
        (status = 400, description = "Invalid search token", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No contact matches", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "searchContacts"
)]
#[get("/contacts/search/{credentials}")]
pub async fn search_contacts(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ContactResponse>>> {
    let token = SearchToken::new(path.into_inner()).map_err(search_token_error)?;
    let contacts = state.contacts_query.search(user.id(), &token).await?;
    if contacts.is_empty() {
        return Err(Error::not_found("no contact matches the search"));
    }
    Ok(web::Json(to_responses(contacts)))
}

/// Fetch one contact.
#[utoipa::path(
    get,
    path = "/api/contacts/{contact_id}",
    params(("contact_id" = i64, Path, description = "Contact identifier")),
    responses(
        (status = 200, description = "Contact", body = ContactResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Contact not found", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "getContact"
)]
#[get("/contacts/{contact_id}")]
pub async fn get_contact(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ContactResponse>> {
    let id = ContactId::new(path.into_inner());
    let contact = state
        .contacts_query
        .get(user.id(), id)
        .await?
        .ok_or_else(|| contact_not_found(id))?;
    Ok(web::Json(contact.into()))
}

/// Replace every field of an existing contact.
#[utoipa::path(
    put,
    path = "/api/contacts/{contact_id}",
    params(("contact_id" = i64, Path, description = "Contact identifier")),
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Updated contact", body = ContactResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Contact not found", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "updateContact"
)]
#[put("/contacts/{contact_id}")]
pub async fn update_contact(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<web::Json<ContactResponse>> {
    let id = ContactId::new(path.into_inner());
    let draft = ContactDraft::try_from(payload.into_inner())?;
    let contact = state
        .contacts
        .update(user.id(), id, draft)
        .await?
        .ok_or_else(|| contact_not_found(id))?;
    Ok(web::Json(contact.into()))
}

/// Delete a contact and return it.
#[utoipa::path(
    delete,
    path = "/api/contacts/{contact_id}",
    params(("contact_id" = i64, Path, description = "Contact identifier")),
    responses(
        (status = 200, description = "Deleted contact", body = ContactResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Contact not found", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "deleteContact"
)]
#[delete("/contacts/{contact_id}")]
pub async fn delete_contact(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ContactResponse>> {
    let id = ContactId::new(path.into_inner());
    let contact = state
        .contacts
        .delete(user.id(), id)
        .await?
        .ok_or_else(|| contact_not_found(id))?;
    Ok(web::Json(contact.into()))
}

/// Register the contacts routes. Fixed paths come before `{contact_id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_contacts)
        .service(create_contact)
        .service(upcoming_birthdays)
        .service(search_contacts)
        .service(get_contact)
        .service(update_contact)
        .service(delete_contact);
}

#[cfg(test)]
#[path = "contacts_tests.rs"]
mod tests;
