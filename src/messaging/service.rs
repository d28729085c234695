//! MessagingService - stato della vista messaggi di un utente loggato
//!
//! Possiede la lista, i filtri, il form di composizione e i toast. Le chiamate
//! di rete passano dal [`Dispatcher`]; gli eventi del canale realtime arrivano
//! da [`MessagingService::handle_event`].

use super::{
    DeliveryReport, Directory, Dispatcher, MessageCache, MessageFilter, MessageList, Notice,
    Transport,
};
use crate::api::ApiClient;
use crate::core::ClientError;
use crate::dtos::{ClassMessageDTO, ComposeDraft, OutgoingMessageDTO, Recipient, ServerEvent};
use crate::entities::{Message, Session};
use crate::realtime::LiveChannel;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

pub const SENDING_NOTICE: &str = "Message en cours d'envoi...";
pub const SENT_NOTICE: &str = "Message envoyé avec succès";

pub struct MessagingService {
    session: Session,
    api: Arc<ApiClient>,
    dispatcher: Dispatcher,
    cache: MessageCache,
    directory: Directory,
    list: MessageList,
    filter: MessageFilter,
    /// Messaggio aperto nel pannello di dettaglio
    selected: Option<String>,
    compose_open: bool,
    notices: Vec<Notice>,
    last_synced: Option<DateTime<Utc>>,
    stale: bool,
}

impl MessagingService {
    pub fn new(session: Session, api: Arc<ApiClient>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            session,
            dispatcher: Dispatcher::new(api.clone()),
            api,
            cache: MessageCache::new(store),
            directory: Directory::default(),
            list: MessageList::new(),
            filter: MessageFilter::inbox(),
            selected: None,
            compose_open: false,
            notices: Vec::new(),
            last_synced: None,
            stale: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn attach_channel(&mut self, live: Arc<dyn LiveChannel>) {
        self.dispatcher.attach(live);
    }

    pub fn detach_channel(&mut self) {
        self.dispatcher.detach();
    }

    pub fn is_live(&self) -> bool {
        self.dispatcher.is_live()
    }

    #[instrument(skip(self))]
    pub async fn load_directory(&mut self) {
        self.directory = Directory::load(&self.api).await;
        let mut messages = self.list.as_slice().to_vec();
        messages.iter_mut().for_each(|m| self.directory.enrich(m));
        self.list.replace(messages);
    }

    /// Scarica i messaggi dell'utente. Se il backend non risponde la lista viene
    /// dall'ultima copia locale e la vista è marcata come non aggiornata.
    #[instrument(skip(self), fields(user_id = %self.session.user_id, role = %self.session.role))]
    pub async fn load(&mut self) {
        let path = format!(
            "/messages/details/{}/{}",
            self.session.user_id, self.session.role
        );

        match self.api.get_with_retry::<Vec<Message>>(&path).await {
            Ok(mut messages) => {
                messages.iter_mut().for_each(|m| self.directory.enrich(m));
                let now = Utc::now();
                if let Err(e) = self.cache.save(&messages, now) {
                    warn!("Unable to write message cache: {}", e);
                }
                info!(count = messages.len(), "Messages loaded");
                self.list.replace(messages);
                self.last_synced = Some(now);
                self.stale = false;
            }
            Err(e) => {
                warn!("Message fetch failed, using local cache: {}", e);
                let snapshot = self.cache.load();
                info!(count = snapshot.messages.len(), "Messages restored from cache");
                self.list.replace(snapshot.messages);
                self.last_synced = snapshot.synced_at;
                self.stale = true;
            }
        }
    }

    #[instrument(skip(self, event), fields(user_id = %self.session.user_id))]
    pub fn handle_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::NewMessage(mut message) => {
                self.directory.enrich(&mut message);
                let sender = message
                    .sender_name
                    .clone()
                    .unwrap_or_else(|| message.sender_id.clone());
                if self.list.insert_incoming(message) {
                    info!("New message received");
                    self.notices
                        .push(Notice::info(format!("Nouveau message de {}", sender)));
                } else {
                    debug!("Duplicate message ignored");
                }
            }
            ServerEvent::MessageSent(ack) => {
                info!(message_id = ?ack.id, "Message acknowledged by server");
            }
            ServerEvent::MessageError { message } => {
                warn!("Server reported a messaging error: {}", message);
                self.notices.push(Notice::error(message));
            }
            ServerEvent::MessageRead {
                message_id,
                read_at,
            } => {
                if self.list.apply_read_receipt(&message_id, read_at) {
                    debug!(message_id = %message_id, "Read receipt applied");
                }
            }
        }
    }

    pub fn open_compose(&mut self) {
        self.compose_open = true;
    }

    pub fn close_compose(&mut self) {
        self.compose_open = false;
    }

    pub fn is_compose_open(&self) -> bool {
        self.compose_open
    }

    /// Invia il contenuto del form di composizione.
    ///
    /// Con il canale connesso il messaggio parte solo in realtime; altrimenti
    /// con `POST /messages` e la lista viene riscaricata. Gli errori diventano
    /// un toast e il form resta aperto.
    #[instrument(skip(self, draft), fields(user_id = %self.session.user_id))]
    pub async fn send(&mut self, draft: ComposeDraft) -> Result<Transport, ClientError> {
        if let Err(e) = draft.validate() {
            return Err(self.fail(e.into()));
        }

        match draft.recipient {
            Recipient::User { id, role } => {
                let message = OutgoingMessageDTO {
                    sender_id: self.session.user_id.clone(),
                    sender_role: self.session.role,
                    receiver_id: id,
                    receiver_role: role,
                    subject: draft.subject,
                    content: draft.content,
                    date: Utc::now(),
                };
                let report = self.dispatcher.send_message(message).await;

                if report.via().contains(&Transport::Live) {
                    self.compose_open = false;
                    self.notices.push(Notice::info(SENDING_NOTICE));
                    return Ok(Transport::Live);
                }
                match report.into_result() {
                    Ok(_) => {
                        self.load().await;
                        self.compose_open = false;
                        self.notices.push(Notice::success(SENT_NOTICE));
                        Ok(Transport::Http)
                    }
                    Err(e) => Err(self.fail(e)),
                }
            }
            Recipient::Class { classe_id } => {
                let message = ClassMessageDTO {
                    sender_id: self.session.user_id.clone(),
                    sender_role: self.session.role,
                    classe_id,
                    subject: draft.subject,
                    content: draft.content,
                };
                match self.dispatcher.send_to_class(&message).await.into_result() {
                    Ok(ack) => {
                        let count = ack.map(|a| a.count).unwrap_or_default();
                        self.compose_open = false;
                        self.notices.push(Notice::success(format!(
                            "Message envoyé à {} élève(s)",
                            count
                        )));
                        Ok(Transport::Http)
                    }
                    Err(e) => Err(self.fail(e)),
                }
            }
        }
    }

    fn fail(&mut self, error: ClientError) -> ClientError {
        warn!("Send failed: {}", error);
        self.notices.push(Notice::error(error.user_message()));
        error
    }

    /// Segna come letto in locale subito, poi avvisa il server su entrambi i
    /// trasporti. `None` se il messaggio era già letto o non esiste.
    #[instrument(skip(self))]
    pub async fn mark_as_read(&mut self, message_id: &str) -> Option<DeliveryReport<()>> {
        if !self.list.mark_read(message_id, Utc::now()) {
            return None;
        }
        Some(
            self.dispatcher
                .mark_read(message_id, &self.session.user_id)
                .await,
        )
    }

    /// Apre il dettaglio; un messaggio ricevuto e non letto viene segnato come letto
    pub async fn open_message(&mut self, message_id: &str) -> Option<Message> {
        let message = self.list.get(message_id)?.clone();
        self.selected = Some(message.id.clone());
        if !message.read && message.is_received_by(&self.session.user_id) {
            self.mark_as_read(message_id).await;
        }
        self.list.get(message_id).cloned()
    }

    pub fn close_message(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Message> {
        self.selected.as_deref().and_then(|id| self.list.get(id))
    }

    #[instrument(skip(self))]
    pub async fn delete(&mut self, message_id: &str) -> Result<(), ClientError> {
        if let Err(e) = self
            .api
            .delete(&format!("/messages/{}", message_id))
            .await
        {
            self.notices.push(Notice::error(e.user_message()));
            return Err(e);
        }
        self.list.remove(message_id);
        if self.selected.as_deref() == Some(message_id) {
            self.selected = None;
        }
        info!("Message deleted");
        Ok(())
    }

    pub fn toggle_star(&mut self, message_id: &str) -> bool {
        self.list.toggle_star(message_id)
    }

    pub fn is_starred(&self, message_id: &str) -> bool {
        self.list.is_starred(message_id)
    }

    pub fn filter(&self) -> &MessageFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: MessageFilter) {
        self.filter = filter;
    }

    pub fn visible(&self, now: DateTime<Utc>) -> Vec<Message> {
        self.filter.apply(&self.list, &self.session.user_id, now)
    }

    pub fn messages(&self) -> &[Message] {
        self.list.as_slice()
    }

    pub fn unread_count(&self) -> usize {
        self.list.unread_count(&self.session.user_id)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }
}
