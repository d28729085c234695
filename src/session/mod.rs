//! Session module - identità dell'utente, login e controllo delle rotte

pub mod auth;
pub mod guard;
pub mod store;
pub mod token;

pub use auth::AuthService;
pub use guard::{GuardDecision, LOGIN_ROUTE, RouteGuard, check_access, required_role_for};
pub use store::{SessionEvent, SessionStore};
pub use token::token_expiry;
