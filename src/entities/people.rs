//! Persone della scuola - professeurs, élèves, parents, admins

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

record_serde!(Professeur, Eleve, Parent, Admin);

lazy_static! {
    static ref RE_TELEPHONE: Regex = Regex::new(r"^\+?[0-9][0-9 .-]{7,19}$").unwrap();
}

/// Qualsiasi persona che compare nella rubrica dei messaggi
pub trait Named {
    fn id(&self) -> Option<&str>;
    fn display_name(&self) -> String;
}

fn full_name(prenom: &str, nom: &str) -> String {
    format!("{} {}", prenom.trim(), nom.trim()).trim().to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Professeur {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matiere: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *RE_TELEPHONE, message = "Numéro de téléphone invalide"))]
    pub telephone: Option<String>,
}

impl Named for Professeur {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> String {
        full_name(&self.prenom, &self.nom)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Eleve {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub nom: String,
    #[validate(length(min = 1, message = "Le prénom est obligatoire"))]
    pub prenom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Adresse email invalide"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classe_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Named for Eleve {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> String {
        full_name(&self.prenom, &self.nom)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Parent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *RE_TELEPHONE, message = "Numéro de téléphone invalide"))]
    pub telephone: Option<String>,
    /// Id degli élèves collegati
    #[serde(default)]
    pub enfants: Vec<String>,
}

impl Named for Parent {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> String {
        full_name(&self.prenom, &self.nom)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Admin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
}

impl Named for Admin {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> String {
        full_name(&self.prenom, &self.nom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_without_prenom() {
        let admin = Admin {
            id: Some("a1".into()),
            nom: "Direction".into(),
            prenom: String::new(),
            email: "direction@ecole.fr".into(),
        };
        assert_eq!(admin.display_name(), "Direction");
    }

    #[test]
    fn test_validation_rejects_bad_phone_and_email() {
        let parent = Parent {
            id: None,
            nom: "Martin".into(),
            prenom: "Claire".into(),
            email: "pas-un-email".into(),
            telephone: Some("abc".into()),
            enfants: vec![],
        };
        let errors = parent.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("telephone"));
    }

    #[test]
    fn test_validation_accepts_complete_eleve() {
        let eleve = Eleve {
            id: None,
            nom: "Durand".into(),
            prenom: "Léa".into(),
            email: None,
            classe_id: Some("c1".into()),
            parent_id: None,
        };
        assert!(eleve.validate().is_ok());
    }

    #[test]
    fn test_list_with_mongo_and_virtual_ids_decodes() {
        let body = r#"[
            {"_id": "42", "id": "42", "nom": "Durand", "prenom": "Léa", "classeId": "c1"},
            {"id": "43", "nom": "Petit", "prenom": "Hugo"}
        ]"#;
        let eleves: Vec<Eleve> = serde_json::from_str(body).unwrap();
        assert_eq!(eleves[0].id.as_deref(), Some("42"));
        assert_eq!(eleves[1].id.as_deref(), Some("43"));

        // in uscita resta solo `id`
        let out = serde_json::to_value(&eleves[0]).unwrap();
        assert_eq!(out["id"], "42");
        assert!(out.get("_id").is_none());
    }
}
