//! LiveChannel - interfaccia del canale realtime vista dai servizi

use crate::core::ClientError;
use crate::dtos::ClientEvent;

/// Trasporto realtime in uscita.
///
/// `emit` non aspetta la consegna: accoda l'evento al task di scrittura e
/// fallisce solo se il canale è già chiuso.
pub trait LiveChannel: Send + Sync {
    fn is_connected(&self) -> bool;

    fn emit(&self, event: ClientEvent) -> Result<(), ClientError>;
}
