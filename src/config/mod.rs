//! Scan inputs: envelope addresses and the list of hosts to probe.

mod envelope;
mod error;
mod targets;

pub use envelope::{Envelope, sender_domain};
pub use error::ConfigError;
pub use targets::TargetList;
