//! Señal de cancelación cooperativa.
//!
//! Los adapters la consultan antes de producir cada fila y el ensamblador
//! antes de entregar cada combinación. Clonar el token comparte la señal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::DataSourceError;

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) { self.cancelled.store(true, Ordering::SeqCst); }

    pub fn is_cancelled(&self) -> bool { self.cancelled.load(Ordering::SeqCst) }

    /// Devuelve `Err(Cancelled)` si la señal ya fue activada.
    pub fn check(&self) -> Result<(), DataSourceError> {
        if self.is_cancelled() {
            Err(DataSourceError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_signal() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(token.check().is_ok());
        other.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(DataSourceError::Cancelled));
    }
}
