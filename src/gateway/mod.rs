//! Player lookup gateway.
//!
//! # Data Flow
//! ```text
//! handler (uid, raw identifier)
//!     → identifier.rs (per-game format rules)
//!     → service.rs (cache → upstream → cache write)
//!     → error.rs (uniform failure classification)
//! ```

pub mod error;
pub mod game;
pub mod identifier;
pub mod service;

pub use error::{classify_upstream_failure, GatewayError};
pub use game::Game;
pub use identifier::IdentifierError;
pub use service::{Lookup, PlayerService};
