//! ClassRoster - élèves raggruppati per classe

use crate::api::ApiClient;
use crate::core::ClientError;
use crate::entities::{Classe, Eleve};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ClassGroup {
    pub classe: Classe,
    pub eleves: Vec<Eleve>,
}

#[derive(Debug, Clone, Default)]
pub struct ClassRoster {
    groups: Vec<ClassGroup>,
    /// Élèves senza classe o con una classe sconosciuta
    unassigned: Vec<Eleve>,
    banner: Option<String>,
}

impl ClassRoster {
    pub fn group(classes: Vec<Classe>, eleves: Vec<Eleve>) -> Self {
        let mut by_classe: HashMap<String, Vec<Eleve>> = HashMap::new();
        let known: Vec<&str> = classes.iter().filter_map(|c| c.id.as_deref()).collect();
        let mut unassigned = Vec::new();

        for eleve in eleves {
            match eleve.classe_id.as_deref() {
                Some(id) if known.contains(&id) => {
                    by_classe.entry(id.to_string()).or_default().push(eleve)
                }
                _ => unassigned.push(eleve),
            }
        }

        let mut groups: Vec<ClassGroup> = classes
            .into_iter()
            .map(|classe| {
                let mut eleves = classe
                    .id
                    .as_ref()
                    .and_then(|id| by_classe.remove(id))
                    .unwrap_or_default();
                eleves.sort_by(|a, b| (&a.nom, &a.prenom).cmp(&(&b.nom, &b.prenom)));
                ClassGroup { classe, eleves }
            })
            .collect();
        groups.sort_by(|a, b| a.classe.nom.cmp(&b.classe.nom));

        Self {
            groups,
            unassigned,
            banner: None,
        }
    }

    /// Carica classi ed élèves in parallelo
    #[instrument(skip(api))]
    pub async fn mount(api: &ApiClient) -> Result<Self, ClientError> {
        let (classes, eleves) = tokio::join!(api.list::<Classe>(), api.list::<Eleve>());
        match (classes, eleves) {
            (Ok(classes), Ok(eleves)) => {
                let roster = Self::group(classes, eleves);
                info!(classes = roster.groups.len(), "Roster loaded");
                Ok(roster)
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Unable to load roster: {}", e);
                Err(e)
            }
        }
    }

    /// Come `mount`, ma un errore diventa un banner su un roster vuoto
    pub async fn mount_or_banner(api: &ApiClient) -> Self {
        match Self::mount(api).await {
            Ok(roster) => roster,
            Err(e) => Self {
                banner: Some(e.user_message()),
                ..Self::default()
            },
        }
    }

    pub fn groups(&self) -> &[ClassGroup] {
        &self.groups
    }

    pub fn unassigned(&self) -> &[Eleve] {
        &self.unassigned
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }
}
