//! Resource endpoints - CRUD tipizzato sulle collezioni REST
//!
//! Ogni entità dichiara il proprio path; le operazioni sono le stesse per tutte:
//! `GET /{path}`, `POST /{path}`, `PUT /{path}/{id}`, `DELETE /{path}/{id}`.

use super::ApiClient;
use crate::core::ClientError;
use crate::entities::{Admin, Classe, Cours, Eleve, Exercice, Note, Paiement, Parent, Professeur};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{info, instrument};
use validator::Validate;

/// Entità gestita con le operazioni CRUD standard
pub trait Resource: Serialize + DeserializeOwned + Validate + Clone + Send + Sync {
    /// Path della collezione, senza `/` finale
    const PATH: &'static str;
    /// Etichetta mostrata nei messaggi all'utente
    const LABEL: &'static str;

    fn id(&self) -> Option<&str>;

    /// Path usato per la lista; coincide con `PATH` salvo eccezioni del backend
    fn list_path() -> String {
        Self::PATH.to_string()
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", Self::PATH, id)
    }
}

macro_rules! resource {
    ($entity:ty, $path:expr, $label:expr) => {
        impl Resource for $entity {
            const PATH: &'static str = $path;
            const LABEL: &'static str = $label;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }
        }
    };
}

resource!(Professeur, "/professeurs", "professeur");
resource!(Eleve, "/eleves", "élève");
resource!(Classe, "/classes", "classe");
resource!(Parent, "/parents", "parent");
resource!(Cours, "/cours", "cours");
resource!(Exercice, "/exercices", "exercice");
resource!(Note, "/notes", "note");
resource!(Paiement, "/paiements", "paiement");

impl Resource for Admin {
    const PATH: &'static str = "/api/admins";
    const LABEL: &'static str = "administrateur";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn list_path() -> String {
        "/api/admins/list".to_string()
    }
}

impl ApiClient {
    #[instrument(skip(self), fields(resource = T::LABEL))]
    pub async fn list<T: Resource>(&self) -> Result<Vec<T>, ClientError> {
        let items = self.get_list::<T>(&T::list_path()).await?;
        info!(count = items.len(), "Resources loaded");
        Ok(items)
    }

    /// Valida e crea; il backend risponde con l'entità creata o con un corpo qualsiasi
    #[instrument(skip(self, item), fields(resource = T::LABEL))]
    pub async fn create<T: Resource>(&self, item: &T) -> Result<(), ClientError> {
        item.validate()?;
        self.post_unit(T::PATH, item).await?;
        info!("Resource created");
        Ok(())
    }

    #[instrument(skip(self, item), fields(resource = T::LABEL))]
    pub async fn update<T: Resource>(&self, id: &str, item: &T) -> Result<(), ClientError> {
        item.validate()?;
        self.put_unit(&T::item_path(id), item).await?;
        info!("Resource updated");
        Ok(())
    }

    #[instrument(skip(self), fields(resource = T::LABEL))]
    pub async fn remove<T: Resource>(&self, id: &str) -> Result<(), ClientError> {
        self.delete(&T::item_path(id)).await?;
        info!("Resource deleted");
        Ok(())
    }
}
