use ecole::core::init_tracing;
use ecole::{ClientState, Config, GuardDecision};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Inizializza il logging e la configurazione
    init_tracing();
    let config = Config::from_env()?;
    config.print_info();

    let state = ClientState::new(config)?;

    // Sessione salvata, altrimenti login con le credenziali d'ambiente
    let session = match state.sessions.current()? {
        Some(session) => {
            info!(user_id = %session.user_id, "Resuming stored session");
            session
        }
        None => {
            let email = std::env::var("ECOLE_EMAIL")
                .map_err(|_| "ECOLE_EMAIL must be set when no session is stored")?;
            let password = std::env::var("ECOLE_PASSWORD")
                .map_err(|_| "ECOLE_PASSWORD must be set when no session is stored")?;
            state.auth.login(&email, &password).await?
        }
    };

    let home = session.role.home_route();
    if let GuardDecision::Redirect(to) = state.guard().visit(home)? {
        warn!(redirect = to, "Home route not accessible");
        return Ok(());
    }

    let mut messaging = state.messaging(session.clone());
    messaging.load_directory().await;
    messaging.load().await;
    info!(
        total = messaging.messages().len(),
        unread = messaging.unread_count(),
        stale = messaging.is_stale(),
        "Inbox ready"
    );

    let (channel, mut events) = match state.connect_realtime(&session).await {
        Ok(pair) => pair,
        Err(e) => {
            error!("Realtime channel unavailable: {}", e);
            return Ok(());
        }
    };
    let channel = Arc::new(channel);
    messaging.attach_channel(channel.clone());

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    warn!("Realtime channel closed by server");
                    break;
                };
                messaging.handle_event(event);
                for notice in messaging.drain_notices() {
                    info!(level = ?notice.level, "{}", notice.text);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                channel.disconnect();
                break;
            }
        }
    }

    messaging.detach_channel();
    Ok(())
}
