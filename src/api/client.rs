//! ApiClient - richieste JSON verso il backend REST

use super::retry::with_backoff;
use crate::core::{ClientError, Config};
use crate::storage::{self, KeyValueStore};
use reqwest::{Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Lo storage da cui leggere il token ad ogni richiesta
    store: Arc<dyn KeyValueStore>,
    retries: u32,
    retry_base_delay: Duration,
}

impl ApiClient {
    pub fn new(config: &Config, store: Arc<dyn KeyValueStore>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::config("Unable to build HTTP client").with_details(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            store,
            retries: config.request_retries,
            retry_base_delay: config.retry_base_delay(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `path` è sempre relativo alla base, con o senza `/` iniziale
    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&joined)?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let builder = self.http.request(method, self.url(path)?);
        Ok(match self.store.get(storage::TOKEN)? {
            Some(token) if !token.is_empty() => builder.bearer_auth(token),
            _ => builder,
        })
    }

    /// Invia la richiesta e converte gli status non 2xx in errore
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_response(status, &body);
        warn!(status = status.as_u16(), "Request rejected: {}", err.message());
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        debug!("GET");
        let response = self.execute(self.request(Method::GET, path)?).await?;
        Self::decode(response).await
    }

    /// GET di una collezione. Un corpo non decodificabile diventa una lista vuota,
    /// gli errori HTTP restano errori.
    #[instrument(skip(self))]
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        debug!("GET list");
        let response = self.execute(self.request(Method::GET, path)?).await?;
        let body = response.text().await?;
        match serde_json::from_str::<Vec<T>>(&body) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!("Unable to decode list, falling back to empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// GET con nuovi tentativi e backoff esponenziale
    #[instrument(skip(self))]
    pub async fn get_with_retry<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        with_backoff(self.retries, self.retry_base_delay, move || self.get::<T>(path)).await
    }

    #[instrument(skip(self, body))]
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST");
        let response = self
            .execute(self.request(Method::POST, path)?.json(body))
            .await?;
        Self::decode(response).await
    }

    /// POST di cui interessa solo l'esito
    #[instrument(skip(self, body))]
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        debug!("POST");
        self.execute(self.request(Method::POST, path)?.json(body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, body))]
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("PUT");
        let response = self
            .execute(self.request(Method::PUT, path)?.json(body))
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, body))]
    pub async fn put_unit<B>(&self, path: &str, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        debug!("PUT");
        self.execute(self.request(Method::PUT, path)?.json(body))
            .await?;
        Ok(())
    }

    /// PUT senza corpo, es. `PUT /messages/{id}/read`
    #[instrument(skip(self))]
    pub async fn put_empty(&self, path: &str) -> Result<(), ClientError> {
        debug!("PUT");
        self.execute(self.request(Method::PUT, path)?).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        debug!("DELETE");
        self.execute(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }
}
