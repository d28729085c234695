use chrono::TimeDelta;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Limite di `SESSION_TTL_HOURS`: un anno
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub ws_url: Url,
    pub storage_path: PathBuf,
    pub request_timeout_secs: u64,
    pub request_retries: u32,
    pub retry_base_delay_ms: u64,
    pub session_ttl_hours: i64,
    pub app_env: String,
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Costruisce la configurazione a partire da una funzione di lookup,
    /// così i test non devono toccare l'ambiente del processo
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("API_BASE_URL")
            .unwrap_or_else(|| "http://localhost:5000".to_string());
        let api_base_url = Url::parse(&api_base_url)
            .map_err(|e| format!("Invalid API_BASE_URL: {}", e))?;

        let ws_url = match lookup("WS_URL") {
            Some(raw) => Url::parse(&raw).map_err(|e| format!("Invalid WS_URL: {}", e))?,
            None => Self::derive_ws_url(&api_base_url)?,
        };

        if !matches!(ws_url.scheme(), "ws" | "wss") {
            return Err("Invalid WS_URL: scheme must be ws or wss".to_string());
        }

        let storage_path = lookup("STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ecole-storage.json"));

        let request_timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "15".to_string())
            .parse::<u64>()
            .map_err(|_| "Invalid REQUEST_TIMEOUT_SECS: must be a positive number".to_string())?;

        if request_timeout_secs == 0 {
            return Err("Invalid REQUEST_TIMEOUT_SECS: must be at least 1 second".to_string());
        }

        let request_retries = lookup("REQUEST_RETRIES")
            .unwrap_or_else(|| "3".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid REQUEST_RETRIES: must be a positive number".to_string())?;

        if request_retries == 0 {
            return Err("Invalid REQUEST_RETRIES: at least one attempt is required".to_string());
        }

        let retry_base_delay_ms = lookup("RETRY_BASE_DELAY_MS")
            .unwrap_or_else(|| "500".to_string())
            .parse::<u64>()
            .map_err(|_| "Invalid RETRY_BASE_DELAY_MS: must be a positive number".to_string())?;

        let session_ttl_hours = lookup("SESSION_TTL_HOURS")
            .unwrap_or_else(|| "24".to_string())
            .parse::<i64>()
            .map_err(|_| "Invalid SESSION_TTL_HOURS: must be a number".to_string())?;

        if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
            return Err(format!(
                "Invalid SESSION_TTL_HOURS: must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            ));
        }

        let app_env = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());

        Ok(Config {
            api_base_url,
            ws_url,
            storage_path,
            request_timeout_secs,
            request_retries,
            retry_base_delay_ms,
            session_ttl_hours,
            app_env,
        })
    }

    /// http://host:port/base -> ws://host:port/base/ws
    fn derive_ws_url(api_base_url: &Url) -> Result<Url, String> {
        let mut ws_url = api_base_url.clone();
        let scheme = if api_base_url.scheme() == "https" { "wss" } else { "ws" };
        ws_url
            .set_scheme(scheme)
            .map_err(|_| "Unable to derive WS_URL from API_BASE_URL".to_string())?;
        let path = format!("{}/ws", api_base_url.path().trim_end_matches('/'));
        ws_url.set_path(&path);
        ws_url.set_query(None);
        ws_url.set_fragment(None);
        Ok(ws_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// TTL delle sessioni senza `exp`; satura invece di andare in overflow
    pub fn session_ttl(&self) -> TimeDelta {
        TimeDelta::try_hours(self.session_ttl_hours).unwrap_or(TimeDelta::MAX)
    }

    /// Logga la configurazione (nascondendo le credenziali negli URL)
    pub fn print_info(&self) {
        info!("Client Configuration:");
        info!("   Environment: {}", self.app_env);
        info!("   API: {}", Self::mask_url(&self.api_base_url));
        info!("   Realtime: {}", Self::mask_url(&self.ws_url));
        info!("   Storage: {}", self.storage_path.display());
        info!(
            "   Requests: timeout {}s, {} attempts, base backoff {}ms",
            self.request_timeout_secs, self.request_retries, self.retry_base_delay_ms
        );
        info!("   Session TTL: {}h", self.session_ttl_hours);
    }

    /// Maschera user e password eventualmente presenti nell'URL
    fn mask_url(url: &Url) -> String {
        if url.username().is_empty() && url.password().is_none() {
            return url.to_string();
        }
        let mut masked = url.clone();
        let _ = masked.set_username("***");
        let _ = masked.set_password(None);
        masked.to_string()
    }
}
