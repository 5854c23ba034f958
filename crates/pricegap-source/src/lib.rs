//! Price source adapters for pricegap.
//!
//! An adapter wraps normalize → transport → extract for one venue. The
//! transport is injected (`PriceTransport`) so the adapters never build
//! HTTP clients themselves; `HttpTransport` is the reqwest-backed
//! implementation used by the binary.

pub mod adapter;
pub mod client;
pub mod error;
pub mod transport;

pub use adapter::{FetchOutcome, SourceAdapter};
pub use client::{HttpTransport, SourceEndpoints};
pub use error::{SourceError, SourceResult, TransportError};
pub use transport::{PriceTransport, QuoteRequest};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Install the ring crypto provider for rustls.
///
/// Call once at startup, before the first HTTPS request. Safe to call more
/// than once.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
