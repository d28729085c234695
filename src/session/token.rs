//! Lettura della scadenza dal token JWT restituito dal login.
//!
//! Il client non possiede la chiave del backend: la firma non viene verificata,
//! si legge solo il claim `exp` per dare una scadenza esplicita alla sessione.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

#[instrument(skip(token))]
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    match decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => data.claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0)),
        Err(e) => {
            debug!("Token is not a readable JWT: {:?}", e);
            None
        }
    }
}
