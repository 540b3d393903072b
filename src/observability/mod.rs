//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! controller, admin client, clipboard
//!     → tracing events (action, request_id, status, error fields)
//!     → logging.rs subscriber (stderr, filtered)
//! ```
//!
//! # Design Decisions
//! - Structured fields over formatted strings
//! - Request ID on every admin call so server and console logs line up

pub mod logging;
