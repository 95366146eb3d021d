use std::fmt;

/// Step of the SMTP dialogue a probe reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpStage {
    Connect,
    Greeting,
    Ehlo,
    StartTls,
    MailFrom,
    RcptTo,
    Data,
    Message,
    Quit,
}

impl fmt::Display for SmtpStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Greeting => "greeting",
            Self::Ehlo => "EHLO",
            Self::StartTls => "STARTTLS",
            Self::MailFrom => "MAIL FROM",
            Self::RcptTo => "RCPT TO",
            Self::Data => "DATA",
            Self::Message => "message",
            Self::Quit => "QUIT",
        })
    }
}

/// Whether a host relayed the proof-of-concept message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server accepted mail from an arbitrary sender to an arbitrary
    /// recipient: it is an open relay.
    Relayed,
    /// The attempt failed at `stage`; `reason` is the captured error text.
    Failed { stage: SmtpStage, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub host: String,
    pub outcome: ProbeOutcome,
    pub transcript: Vec<String>,
}

impl ProbeResult {
    pub fn is_open_relay(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Relayed)
    }
}
