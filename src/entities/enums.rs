//! Enumerazioni - Tipi enumerati utilizzati nelle entità

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ********************* ENUMERAZIONI UTILI **********************//

/// Ruolo dell'utente loggato, determina la dashboard e le rotte accessibili
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Professeur,
    #[serde(alias = "élève")]
    Eleve,
    Parent,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Professeur, Role::Eleve, Role::Parent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Professeur => "professeur",
            Role::Eleve => "eleve",
            Role::Parent => "parent",
        }
    }

    /// Rotta della dashboard del ruolo
    pub fn home_route(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Professeur => "/professeur",
            Role::Eleve => "/eleve",
            Role::Parent => "/parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "professeur" => Ok(Role::Professeur),
            // il backend a volte scrive il ruolo con l'accento
            "eleve" | "élève" => Ok(Role::Eleve),
            "parent" => Ok(Role::Parent),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Vista della casella messaggi
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageView {
    #[default]
    All,
    Inbox,
    Sent,
    Starred,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Read,
    Unread,
}

/// Finestra temporale del filtro per data
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateBucket {
    #[default]
    All,
    Today,
    Week,
    Month,
}
