//! ResourceView - schermata CRUD generica
//!
//! `mount` carica la collezione, `submit` crea o aggiorna e poi ricarica,
//! `delete` chiede conferma, cancella e ricarica. Un errore lascia la lista
//! com'era e imposta il banner.

use crate::api::{ApiClient, Resource};
use crate::core::ClientError;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Contenuto del form di una risorsa
#[derive(Debug, Clone)]
pub enum Form<T> {
    Create(T),
    Update(String, T),
}

/// Conferma bloccante prima di una cancellazione
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Esito di una cancellazione riuscita o annullata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

pub struct ResourceView<T: Resource> {
    api: Arc<ApiClient>,
    items: Vec<T>,
    banner: Option<String>,
    loading: bool,
}

impl<T: Resource> ResourceView<T> {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            items: Vec::new(),
            banner: None,
            loading: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    #[instrument(skip(self), fields(resource = T::LABEL))]
    pub async fn mount(&mut self) -> Result<(), ClientError> {
        self.refresh().await
    }

    async fn refresh(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        let result = self.api.list::<T>().await;
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    #[instrument(skip(self, form), fields(resource = T::LABEL))]
    pub async fn submit(&mut self, form: Form<T>) -> Result<(), ClientError> {
        let outcome = match &form {
            Form::Create(item) => self.api.create(item).await,
            Form::Update(id, item) => self.api.update(id, item).await,
        };
        if let Err(e) = outcome {
            return Err(self.fail(e));
        }
        self.banner = None;
        self.refresh().await
    }

    #[instrument(skip(self, confirm), fields(resource = T::LABEL))]
    pub async fn delete(
        &mut self,
        id: &str,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, ClientError> {
        let prompt = format!("Supprimer ce {} ?", T::LABEL);
        if !confirm.confirm(&prompt) {
            return Ok(DeleteOutcome::Cancelled);
        }
        if let Err(e) = self.api.remove::<T>(id).await {
            return Err(self.fail(e));
        }
        self.banner = None;
        self.refresh().await?;
        Ok(DeleteOutcome::Deleted)
    }

    fn fail(&mut self, error: ClientError) -> ClientError {
        warn!(resource = T::LABEL, "Operation failed: {}", error);
        self.banner = Some(error.user_message());
        error
    }
}
