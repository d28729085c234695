//! Inizializzazione del subscriber di tracing

use tracing_subscriber::{EnvFilter, fmt};

/// Installa il subscriber globale. Il filtro si legge da `RUST_LOG`,
/// con default `ecole=info`. Chiamarla più volte non è un errore.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ecole=info"));

    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
