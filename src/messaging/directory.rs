//! Directory - risoluzione id -> nome per mittenti e destinatari
//!
//! Le quattro liste sono scaricate separatamente e scandite linearmente;
//! un id sconosciuto diventa "Unknown user".

use crate::api::ApiClient;
use crate::entities::{Admin, Eleve, Message, Named, Parent, Professeur, Role};
use futures::future::join4;
use tracing::{info, instrument, warn};

pub const UNKNOWN_USER: &str = "Unknown user";

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    professeurs: Vec<DirectoryEntry>,
    eleves: Vec<DirectoryEntry>,
    admins: Vec<DirectoryEntry>,
    parents: Vec<DirectoryEntry>,
}

fn entries<T: Named>(items: &[T]) -> Vec<DirectoryEntry> {
    items
        .iter()
        .filter_map(|item| {
            item.id().map(|id| DirectoryEntry {
                id: id.to_string(),
                name: item.display_name(),
            })
        })
        .collect()
}

impl Directory {
    pub fn from_lists(
        professeurs: &[Professeur],
        eleves: &[Eleve],
        admins: &[Admin],
        parents: &[Parent],
    ) -> Self {
        Self {
            professeurs: entries(professeurs),
            eleves: entries(eleves),
            admins: entries(admins),
            parents: entries(parents),
        }
    }

    /// Scarica le quattro liste in parallelo. Una lista che fallisce resta vuota:
    /// la rubrica serve solo a mostrare nomi.
    #[instrument(skip(api))]
    pub async fn load(api: &ApiClient) -> Self {
        let (professeurs, eleves, admins, parents) = join4(
            api.list::<Professeur>(),
            api.list::<Eleve>(),
            api.list::<Admin>(),
            api.list::<Parent>(),
        )
        .await;

        fn or_empty<T>(label: &str, result: Result<Vec<T>, crate::core::ClientError>) -> Vec<T> {
            result.unwrap_or_else(|e| {
                warn!(list = label, "Directory list unavailable: {}", e);
                Vec::new()
            })
        }

        let directory = Self::from_lists(
            &or_empty("professeurs", professeurs),
            &or_empty("eleves", eleves),
            &or_empty("admins", admins),
            &or_empty("parents", parents),
        );
        info!(entries = directory.len(), "Directory loaded");
        directory
    }

    fn list_for(&self, role: Role) -> &[DirectoryEntry] {
        match role {
            Role::Admin => &self.admins,
            Role::Professeur => &self.professeurs,
            Role::Eleve => &self.eleves,
            Role::Parent => &self.parents,
        }
    }

    pub fn len(&self) -> usize {
        self.professeurs.len() + self.eleves.len() + self.admins.len() + self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Con il ruolo noto si cerca solo nella lista di quel ruolo,
    /// altrimenti in tutte e quattro
    pub fn resolve(&self, id: &str, role: Option<Role>) -> String {
        let found = match role {
            Some(role) => self.list_for(role).iter().find(|e| e.id == id),
            None => Role::ALL
                .into_iter()
                .flat_map(|r| self.list_for(r).iter())
                .find(|e| e.id == id),
        };
        found
            .map(|e| e.name.clone())
            .unwrap_or_else(|| UNKNOWN_USER.to_string())
    }

    /// Completa i nomi mancanti; quelli già forniti dal backend restano
    pub fn enrich(&self, message: &mut Message) {
        if message.sender_name.is_none() {
            message.sender_name = Some(self.resolve(&message.sender_id, Some(message.sender_role)));
        }
        if message.receiver_name.is_none() {
            if let Some(receiver_id) = &message.receiver_id {
                message.receiver_name = Some(self.resolve(receiver_id, message.receiver_role));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Directory {
        Directory::from_lists(
            &[Professeur {
                id: Some("p1".into()),
                nom: "Curie".into(),
                prenom: "Marie".into(),
                email: "curie@ecole.fr".into(),
                matiere: Some("Physique".into()),
                telephone: None,
            }],
            &[Eleve {
                id: Some("42".into()),
                nom: "Durand".into(),
                prenom: "Léa".into(),
                email: None,
                classe_id: None,
                parent_id: None,
            }],
            &[],
            &[],
        )
    }

    #[test]
    fn test_resolve_by_role_and_fallback() {
        let dir = directory();
        assert_eq!(dir.resolve("p1", Some(Role::Professeur)), "Marie Curie");
        assert_eq!(dir.resolve("p1", Some(Role::Eleve)), UNKNOWN_USER);
        assert_eq!(dir.resolve("42", None), "Léa Durand");
        assert_eq!(dir.resolve("nobody", None), UNKNOWN_USER);
    }
}
