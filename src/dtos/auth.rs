//! Auth DTOs - Data Transfer Objects per il login

use crate::entities::Role;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Credenziali inviate a `POST /login`
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct LoginDTO {
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    #[validate(length(min = 1, message = "Le mot de passe est obligatoire"))]
    pub password: String,
}

/// Utente restituito dal login
#[derive(Deserialize, Debug, Clone)]
#[serde(try_from = "LoggedUserWire")]
pub struct LoggedUserDTO {
    pub id: String,
    pub role: Role,
    pub name: String,
    pub classe_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoggedUserWire {
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    role: Role,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    nom: Option<String>,
    #[serde(default)]
    classe_id: Option<String>,
}

impl TryFrom<LoggedUserWire> for LoggedUserDTO {
    type Error = String;

    fn try_from(wire: LoggedUserWire) -> Result<Self, Self::Error> {
        let id = wire
            .mongo_id
            .or(wire.id)
            .ok_or_else(|| "missing field `_id`".to_string())?;
        let name = wire
            .name
            .or(wire.nom)
            .ok_or_else(|| "missing field `name`".to_string())?;
        Ok(Self {
            id,
            role: wire.role,
            name,
            classe_id: wire.classe_id,
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct LoginResponseDTO {
    #[serde(default)]
    pub token: Option<String>,
    pub user: LoggedUserDTO,
}
