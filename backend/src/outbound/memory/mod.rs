//! Process-local adapters for running without PostgreSQL.
//!
//! State lives behind a mutex and is lost on restart. These adapters back
//! local development and the HTTP integration tests.

mod contact_repository;
mod user_repository;

pub use contact_repository::InMemoryContactRepository;
pub use user_repository::InMemoryUserRepository;

fn poisoned(store: &str) -> String {
    format!("{store} store lock poisoned")
}
