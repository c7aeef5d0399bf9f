//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, ContactsCommand, ContactsQuery, IdentityResolver};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Contact writes.
    pub contacts: Arc<dyn ContactsCommand>,
    /// Contact reads, search, and birthdays.
    pub contacts_query: Arc<dyn ContactsQuery>,
    /// Account writes.
    pub accounts: Arc<dyn AccountCommand>,
    /// Bearer token resolution for [`super::auth::CurrentUser`].
    pub identity: Arc<dyn IdentityResolver>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        contacts: Arc<dyn ContactsCommand>,
        contacts_query: Arc<dyn ContactsQuery>,
        accounts: Arc<dyn AccountCommand>,
        identity: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            contacts,
            contacts_query,
            accounts,
            identity,
        }
    }
}
