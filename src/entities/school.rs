//! Entità didattiche e amministrative: classi, corsi, esercizi, voti, pagamenti

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

record_serde!(Classe, Cours, Exercice, Note, Paiement);

fn default_coefficient() -> f64 {
    1.0
}

fn default_bareme() -> f64 {
    20.0
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Classe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Le nom de la classe est obligatoire"))]
    pub nom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub niveau: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professeur_principal_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Cours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Le titre est obligatoire"))]
    pub titre: String,
    #[validate(length(min = 1, message = "La matière est obligatoire"))]
    pub matiere: String,
    pub classe_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professeur_id: Option<String>,
    #[serde(default = "default_coefficient")]
    #[validate(range(min = 0.0, message = "Le coefficient doit être positif"))]
    pub coefficient: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Exercice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Le titre est obligatoire"))]
    pub titre: String,
    pub cours_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consigne: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_limite: Option<DateTime<Utc>>,
}

/// Voto di un élève in un corso, espresso su `sur` punti
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub eleve_id: String,
    pub cours_id: String,
    #[validate(range(min = 0.0, message = "La note doit être positive"))]
    pub valeur: f64,
    #[serde(default = "default_bareme")]
    #[validate(range(exclusive_min = 0.0, message = "Le barème doit être positif"))]
    pub sur: f64,
    #[serde(default = "default_coefficient")]
    #[validate(range(min = 0.0, message = "Le coefficient doit être positif"))]
    pub coefficient: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentaire: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Paiement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub eleve_id: String,
    #[validate(range(exclusive_min = 0.0, message = "Le montant doit être positif"))]
    pub montant: f64,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}
