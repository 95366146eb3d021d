use std::time::Duration;

/// Certificate policy for the session upgraded with STARTTLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsVerification {
    /// Validate the certificate chain and hostname.
    #[default]
    Enabled,
    /// Accept any certificate and hostname. Scanning arbitrary hosts means
    /// most targets present self-signed or mismatched certificates.
    Disabled,
}

/// Configuration knobs for [`RelayProber`](super::RelayProber).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    pub port: u16,
    pub starttls: bool,
    pub tls_verification: TlsVerification,
    pub timeout_ms: u64,
    pub helo_domain: Option<String>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            starttls: false,
            tls_verification: TlsVerification::Enabled,
            timeout_ms: 30_000,
            helo_domain: None,
        }
    }
}

impl ProbeOptions {
    /// Return the timeout as a [`Duration`]. A zero timeout disables the
    /// connection/read deadline.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }

    /// Name announced in `EHLO`/`HELO`, `fallback` when none is configured.
    pub fn helo_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.helo_domain
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(fallback)
    }
}
