//! Dispatcher - comandi in uscita su canale realtime e REST
//!
//! Ogni comando ha una politica di consegna:
//! - `PreferLive`: canale realtime se connesso, REST altrimenti (invio messaggi)
//! - `Both`: entrambi in parallelo (conferme di lettura)
//! - `HttpOnly`: solo REST (broadcast alla classe)
//!
//! L'esito di ogni trasporto tentato finisce nel [`DeliveryReport`].

use crate::api::ApiClient;
use crate::core::ClientError;
use crate::dtos::{ClassBroadcastDTO, ClassMessageDTO, ClientEvent, OutgoingMessageDTO};
use crate::realtime::LiveChannel;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPolicy {
    PreferLive,
    Both,
    HttpOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Live,
    Http,
}

#[derive(Debug)]
pub struct DeliveryReport<T> {
    pub policy: DeliveryPolicy,
    /// `None` se il trasporto non è stato tentato
    pub live: Option<Result<(), ClientError>>,
    pub http: Option<Result<T, ClientError>>,
}

impl<T> DeliveryReport<T> {
    fn new(policy: DeliveryPolicy) -> Self {
        Self {
            policy,
            live: None,
            http: None,
        }
    }

    pub fn delivered(&self) -> bool {
        !self.via().is_empty()
    }

    /// Trasporti che hanno accettato il comando
    pub fn via(&self) -> Vec<Transport> {
        let mut via = Vec::new();
        if matches!(self.live, Some(Ok(()))) {
            via.push(Transport::Live);
        }
        if matches!(self.http, Some(Ok(_))) {
            via.push(Transport::Http);
        }
        via
    }

    /// Errore più significativo: quello REST se tentato, poi quello realtime
    pub fn error(&self) -> Option<&ClientError> {
        match (&self.http, &self.live) {
            (Some(Err(e)), _) => Some(e),
            (_, Some(Err(e))) => Some(e),
            _ => None,
        }
    }

    pub fn into_result(self) -> Result<Option<T>, ClientError> {
        match (self.http, self.live) {
            (Some(Ok(value)), _) => Ok(Some(value)),
            (_, Some(Ok(()))) => Ok(None),
            (Some(Err(e)), _) => Err(e),
            (None, Some(Err(e))) => Err(e),
            (None, None) => Err(ClientError::channel("No transport available")),
        }
    }
}

pub struct Dispatcher {
    api: Arc<ApiClient>,
    live: Option<Arc<dyn LiveChannel>>,
}

impl Dispatcher {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api, live: None }
    }

    pub fn attach(&mut self, live: Arc<dyn LiveChannel>) {
        self.live = Some(live);
    }

    pub fn detach(&mut self) {
        self.live = None;
    }

    pub fn is_live(&self) -> bool {
        self.live.as_ref().is_some_and(|l| l.is_connected())
    }

    fn connected_channel(&self) -> Option<&Arc<dyn LiveChannel>> {
        self.live.as_ref().filter(|l| l.is_connected())
    }

    /// Invio di un messaggio. Se l'emit realtime fallisce si ripiega su `POST /messages`.
    #[instrument(skip(self, message), fields(receiver = %message.receiver_id))]
    pub async fn send_message(&self, message: OutgoingMessageDTO) -> DeliveryReport<()> {
        let mut report = DeliveryReport::new(DeliveryPolicy::PreferLive);

        if let Some(live) = self.connected_channel() {
            let outcome = live.emit(ClientEvent::SendMessage(message.clone()));
            let ok = outcome.is_ok();
            if let Err(e) = &outcome {
                warn!("Live send failed, falling back to HTTP: {}", e);
            }
            report.live = Some(outcome);
            if ok {
                debug!("Message queued on live channel");
                return report;
            }
        }

        let outcome = self.api.post_unit("/messages", &message).await;
        if outcome.is_ok() {
            info!("Message sent over HTTP");
        }
        report.http = Some(outcome);
        report
    }

    /// Conferma di lettura su entrambi i trasporti; gli errori restano nel report
    #[instrument(skip(self))]
    pub async fn mark_read(&self, message_id: &str, user_id: &str) -> DeliveryReport<()> {
        let mut report = DeliveryReport::new(DeliveryPolicy::Both);
        let path = format!("/messages/{}/read", message_id);

        let live = async {
            self.connected_channel().map(|live| {
                live.emit(ClientEvent::MarkAsRead {
                    message_id: message_id.to_string(),
                    user_id: user_id.to_string(),
                })
            })
        };
        let (live, http) = tokio::join!(live, self.api.put_empty(&path));

        if let Some(Err(e)) = &live {
            debug!("markAsRead emit failed: {}", e);
        }
        if let Err(e) = &http {
            debug!("Read receipt over HTTP failed: {}", e);
        }
        report.live = live;
        report.http = Some(http);
        report
    }

    #[instrument(skip(self, message), fields(classe_id = %message.classe_id))]
    pub async fn send_to_class(&self, message: &ClassMessageDTO) -> DeliveryReport<ClassBroadcastDTO> {
        let mut report = DeliveryReport::new(DeliveryPolicy::HttpOnly);
        let outcome = self
            .api
            .post::<_, ClassBroadcastDTO>("/api/messages/class", message)
            .await;
        if let Ok(ack) = &outcome {
            info!(count = ack.count, "Class broadcast delivered");
        }
        report.http = Some(outcome);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_via_and_result() {
        let mut report: DeliveryReport<()> = DeliveryReport::new(DeliveryPolicy::Both);
        report.live = Some(Err(ClientError::channel("closed")));
        report.http = Some(Ok(()));

        assert!(report.delivered());
        assert_eq!(report.via(), vec![Transport::Http]);
        assert!(report.error().is_some());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_empty_report_is_not_delivered() {
        let report: DeliveryReport<()> = DeliveryReport::new(DeliveryPolicy::PreferLive);
        assert!(!report.delivered());
        assert!(report.into_result().is_err());
    }
}
