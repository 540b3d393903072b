//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! console.toml
//!     → loader.rs (parse, environment overrides)
//!     → validation.rs (semantic checks)
//!     → ConsoleConfig (validated, immutable)
//!
//! settings form
//!     → form::collect_form_data (validation.rs parses numeric fields)
//!     → Configuration (owned value, sent to the admin API)
//! ```
//!
//! # Design Decisions
//! - All console fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ClientAuthSettings;
pub use schema::Configuration;
pub use schema::ConsoleConfig;
pub use schema::LoggingSettings;
pub use schema::ServerSettings;
pub use schema::TimeoutSettings;
pub use validation::ValidationError;
