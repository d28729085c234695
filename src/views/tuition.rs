//! TuitionBalance - situazione dei pagamenti di un élève

use crate::entities::Paiement;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct TuitionBalance {
    pub eleve_id: String,
    pub due: f64,
    pub paid: f64,
    /// Mai negativo, anche con pagamenti in eccesso
    pub remaining: f64,
    pub settled: bool,
    pub last_payment: Option<DateTime<Utc>>,
}

impl TuitionBalance {
    pub fn compute(eleve_id: &str, due: f64, paiements: &[Paiement]) -> Self {
        let own = paiements.iter().filter(|p| p.eleve_id == eleve_id);
        let paid: f64 = own.clone().map(|p| p.montant).sum();
        let last_payment = own.map(|p| p.date).max();
        let remaining = ((due - paid) * 100.0).round().max(0.0) / 100.0;

        Self {
            eleve_id: eleve_id.to_string(),
            due,
            paid,
            remaining,
            settled: remaining == 0.0,
            last_payment,
        }
    }
}
