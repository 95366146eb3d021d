use native_tls::TlsConnector;
use tracing::{debug, info};

use crate::config::Envelope;

use super::error::RelayError;
use super::message::build_message;
use super::options::{ProbeOptions, TlsVerification};
use super::session::SmtpSession;
use super::types::{ProbeOutcome, ProbeResult, SmtpStage};

/// Attempts to relay a proof-of-concept message through SMTP hosts.
///
/// Every failure is folded into the returned [`ProbeResult`]; probing a host
/// never aborts a scan.
pub struct RelayProber {
    options: ProbeOptions,
    connector: TlsConnector,
}

impl RelayProber {
    pub fn new(options: ProbeOptions) -> Result<Self, RelayError> {
        let mut builder = TlsConnector::builder();
        if options.tls_verification == TlsVerification::Disabled {
            builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }
        let connector = builder
            .build()
            .map_err(|source| RelayError::TlsInit { source })?;
        Ok(Self { options, connector })
    }

    /// Probes every host in order, one after the other.
    pub fn scan<I, S>(&self, hosts: I, envelope: &Envelope) -> Vec<ProbeResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        hosts
            .into_iter()
            .map(|host| self.probe(host.as_ref(), envelope))
            .collect()
    }

    pub fn probe(&self, host: &str, envelope: &Envelope) -> ProbeResult {
        info!(host, port = self.options.port, starttls = self.options.starttls, "probing");
        let message = match build_message(host, envelope) {
            Ok(message) => message,
            Err(err) => {
                debug!(host, error = %err, "message not built");
                return unreached(host, SmtpStage::Message, &err);
            }
        };

        let mut session = match SmtpSession::connect(host, self.options.port, self.options.timeout())
        {
            Ok(session) => session,
            Err(err) => {
                debug!(host, error = %err, "connection failed");
                return unreached(host, SmtpStage::Connect, &err);
            }
        };

        let result = self.relay(&mut session, envelope, &message);
        let stage = session.stage();

        let connection_usable = match &result {
            Ok(()) => true,
            Err(err) => err.is_rejection(),
        };
        if connection_usable {
            if let Err(err) = session.quit() {
                debug!(host, error = %err, "QUIT failed");
            }
        }

        let outcome = match result {
            Ok(()) => ProbeOutcome::Relayed,
            Err(err) => {
                debug!(host, %stage, error = %err, "relay attempt failed");
                ProbeOutcome::Failed {
                    stage,
                    reason: err.to_string(),
                }
            }
        };

        ProbeResult {
            host: host.to_string(),
            outcome,
            transcript: session.take_transcript(),
        }
    }

    fn relay(
        &self,
        session: &mut SmtpSession,
        envelope: &Envelope,
        message: &[u8],
    ) -> Result<(), RelayError> {
        let greeting = session.read_greeting()?;
        if !greeting.is_positive_completion() {
            return Err(greeting.into_rejection(SmtpStage::Greeting));
        }

        let helo = self.options.helo_name(envelope.sender_domain());
        let ehlo_cmd = format!("EHLO {helo}");
        let ehlo = session.command(SmtpStage::Ehlo, &ehlo_cmd)?;

        if self.options.starttls {
            if !ehlo.is_positive_completion() {
                return Err(ehlo.into_rejection(SmtpStage::Ehlo));
            }
            if !ehlo.has_capability("STARTTLS") {
                return Err(RelayError::StartTlsUnavailable {
                    host: session.host().to_string(),
                });
            }
            session.starttls(&self.connector)?;
            debug!(tls = session.is_tls(), "STARTTLS upgrade complete");
            let again = session.command(SmtpStage::Ehlo, &ehlo_cmd)?;
            if !again.is_positive_completion() {
                return Err(again.into_rejection(SmtpStage::Ehlo));
            }
        } else if !ehlo.is_positive_completion() {
            let helo_reply = session.command(SmtpStage::Ehlo, &format!("HELO {helo}"))?;
            if !helo_reply.is_positive_completion() {
                return Err(helo_reply.into_rejection(SmtpStage::Ehlo));
            }
        }

        let mail = session.command(
            SmtpStage::MailFrom,
            &format!("MAIL FROM:<{}>", envelope.sender()),
        )?;
        if !mail.is_positive_completion() {
            return Err(mail.into_rejection(SmtpStage::MailFrom));
        }

        let rcpt = session.command(
            SmtpStage::RcptTo,
            &format!("RCPT TO:<{}>", envelope.receiver()),
        )?;
        if !rcpt.is_positive_completion() {
            return Err(rcpt.into_rejection(SmtpStage::RcptTo));
        }

        let data = session.command(SmtpStage::Data, "DATA")?;
        if !data.is_positive_intermediate() {
            return Err(data.into_rejection(SmtpStage::Data));
        }

        let accepted = session.send_message(message)?;
        if !accepted.is_positive_completion() {
            return Err(accepted.into_rejection(SmtpStage::Message));
        }
        Ok(())
    }
}

/// Result for a host that was never talked to.
fn unreached(host: &str, stage: SmtpStage, err: &RelayError) -> ProbeResult {
    ProbeResult {
        host: host.to_string(),
        outcome: ProbeOutcome::Failed {
            stage,
            reason: err.to_string(),
        },
        transcript: Vec::new(),
    }
}
