use super::ConfigError;

/// Addresses used for every relay attempt of a scan.
///
/// `sender` and `receiver` go on the SMTP envelope and in the message headers;
/// `contact` only appears in the message body so that whoever receives the
/// proof-of-concept knows where to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    sender: String,
    receiver: String,
    contact: String,
}

impl Envelope {
    /// Builds an envelope, rejecting a sender that has no domain part.
    ///
    /// Beyond that, no syntax validation is performed: a malformed receiver
    /// surfaces as a failure of each probe.
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        contact: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let sender = sender.into().trim().to_string();
        let receiver = receiver.into().trim().to_string();
        let contact = contact.into().trim().to_string();

        if sender.is_empty() {
            return Err(ConfigError::EmptyAddress { field: "sender" });
        }
        if receiver.is_empty() {
            return Err(ConfigError::EmptyAddress { field: "receiver" });
        }
        sender_domain(&sender)?;

        Ok(Self {
            sender,
            receiver,
            contact,
        })
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn sender_domain(&self) -> &str {
        // validated in `new`
        sender_domain(&self.sender).unwrap_or_default()
    }
}

/// Returns the part of `address` after its last `@`.
pub fn sender_domain(address: &str) -> Result<&str, ConfigError> {
    match address.rsplit_once('@') {
        Some((_, domain)) if !domain.trim().is_empty() => Ok(domain.trim()),
        _ => Err(ConfigError::missing_domain(address)),
    }
}
