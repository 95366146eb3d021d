use thiserror::Error;

use super::types::SmtpStage;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("cannot resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no address found for {host}")]
    NoAddress { host: String },
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
    #[error("TLS setup failed: {source}")]
    TlsInit {
        #[source]
        source: native_tls::Error,
    },
    #[error("TLS handshake failed: {source}")]
    Tls {
        #[source]
        source: native_tls::Error,
    },
    #[error("STARTTLS extension not supported by {host}")]
    StartTlsUnavailable { host: String },
    #[error("invalid address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("cannot compose message: {source}")]
    Compose {
        #[source]
        source: lettre::error::Error,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("{stage} rejected: {code} {text}")]
    Rejected {
        stage: SmtpStage,
        code: u16,
        text: String,
    },
}

impl RelayError {
    pub(crate) fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }

    pub(crate) fn compose(source: lettre::error::Error) -> Self {
        Self::Compose { source }
    }

    pub(crate) fn rejected(stage: SmtpStage, code: u16, text: impl Into<String>) -> Self {
        Self::Rejected {
            stage,
            code,
            text: text.into(),
        }
    }

    /// True when the server answered with a negative reply, i.e. the
    /// connection is still usable for `QUIT`.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::StartTlsUnavailable { .. })
    }
}
