//! Failure classification
//!
//! Both functions are pure and total: every transport failure and every
//! non-2xx status maps to exactly one [`ErrorKind`].

use crate::outcome::ErrorKind;
use crate::transport::TransportError;

/// Map a low-level attempt failure to its error kind
pub fn classify(cause: &TransportError) -> ErrorKind {
    match cause {
        TransportError::Cancelled => ErrorKind::Cancel,
        TransportError::Timeout(_) => ErrorKind::Timeout,
        TransportError::Connect(_) | TransportError::Io(_) => ErrorKind::NoInternet,
        TransportError::Decode(_) | TransportError::Other(_) => ErrorKind::Unknown,
    }
}

/// Map a received non-2xx status to its error kind
///
/// 1xx/3xx responses that reach the executor are `Unknown`. A 2xx passed
/// here means the body failed to decode, which is also `Unknown`.
pub fn classify_status(status: u16) -> ErrorKind {
    match status {
        400..=499 => ErrorKind::Http4xx,
        500..=599 => ErrorKind::Http5xx,
        _ => ErrorKind::Unknown,
    }
}
