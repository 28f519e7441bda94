use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown bill policy '{0}', expected 'available' or 'unavailable'")]
    UnknownBillPolicy(String),
}
