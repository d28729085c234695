//! Entities module - Entità del dominio scolastico
//!
//! Questo modulo contiene tutte le entità (models) che il client riceve dal backend
//! o tiene in memoria. Ogni entity corrisponde a una collezione REST.

#[macro_use]
mod record;

pub mod enums;
pub mod message;
pub mod people;
pub mod school;
pub mod session;

// Re-exports per facilitare l'import
pub use enums::{DateBucket, MessageView, Role, StatusFilter};
pub use message::Message;
pub use people::{Admin, Eleve, Named, Parent, Professeur};
pub use school::{Classe, Cours, Exercice, Note, Paiement};
pub use session::Session;
