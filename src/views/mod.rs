//! Views module - stato delle schermate di gestione
//!
//! Nessun rendering: ogni schermata è un oggetto con gli elementi mostrati,
//! il banner d'errore e le azioni possibili.

pub mod bulletin;
pub mod resource;
pub mod roster;
pub mod tuition;

pub use bulletin::{Bulletin, SubjectAverage};
pub use resource::{Confirm, DeleteOutcome, Form, ResourceView};
pub use roster::{ClassGroup, ClassRoster};
pub use tuition::TuitionBalance;
