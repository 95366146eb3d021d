#![forbid(unsafe_code)]
//! relaycheck_lib — open mail relay probing and sender domain posture

pub mod auth;
pub mod config;
pub mod relay;

pub use auth::{
    AuthError, Classification, PostureReport, PostureTier, RecordCheck, RecordKind,
    check_domain_posture,
};
pub use config::{ConfigError, Envelope, TargetList, sender_domain};
pub use relay::{
    ProbeOptions, ProbeOutcome, ProbeResult, RelayError, RelayProber, SmtpStage, TlsVerification,
    build_message, html_body,
};
