//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters. Driving
//! ports (`ContactsQuery`, `ContactsCommand`, `AccountCommand`,
//! `IdentityResolver`) are implemented by domain services and consumed by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod contact_repository;
mod contacts_command;
mod contacts_query;
mod identity_resolver;
mod user_repository;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use contact_repository::{
    ContactRepository, ContactRepositoryError, FixtureContactRepository,
};
#[cfg(test)]
pub use contact_repository::MockContactRepository;
pub use contacts_command::ContactsCommand;
#[cfg(test)]
pub use contacts_command::MockContactsCommand;
pub use contacts_query::ContactsQuery;
#[cfg(test)]
pub use contacts_query::MockContactsQuery;
pub use identity_resolver::IdentityResolver;
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
