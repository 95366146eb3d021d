//! Open relay probing.
//!
//! [`RelayProber`] opens an SMTP session with each target (plaintext, or
//! upgraded with STARTTLS), submits a proof-of-concept message from the
//! configured sender to the configured receiver and reports whether the host
//! accepted it. A host that does is an open relay.

mod error;
mod message;
mod options;
mod probe;
mod session;
mod types;

pub use error::RelayError;
pub use message::{build_message, html_body, subject};
pub use options::{ProbeOptions, TlsVerification};
pub use probe::RelayProber;
pub use types::{ProbeOutcome, ProbeResult, SmtpStage};
