use lettre::message::header::{ContentTransferEncoding, ContentType};
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::{Address, Message};

use crate::config::Envelope;

use super::error::RelayError;

/// Subject line of the proof-of-concept message sent through `host`.
pub fn subject(host: &str) -> String {
    format!("Proof-of-Concept // Open Mail Relay on {host}")
}

/// HTML body naming the probed host and who to report the finding to. Both
/// values are HTML-escaped.
pub fn html_body(host: &str, contact: &str) -> String {
    let host = escape_html(host);
    let contact = escape_html(contact);
    format!(
        r#"<html>
  <style>
    .content {{
      font-family: Calibri, sans-serif;
    }}
  </style>
  <body>
    <div class="content">
      <p>Dears,</p>
      <p>if you receive this email, your SMTP server is vulnerable to <strong>Open Mail Relay</strong>:
      it accepted a message from an arbitrary sender to an arbitrary recipient.
      The sending domain may also lack an enforcing SPF or DMARC record.</p>
      <p>Affected SMTP Server: {host}</p>
      <p>Please forward this email to {contact}</p>
      <p>Have a good day</p>
      <br>
    </div>
  </body>
</html>
"#
    )
}

/// Builds the message relayed through `host`: a `multipart/alternative`
/// container with one base64 encoded HTML part. Returns the formatted bytes
/// ready for `DATA`.
///
/// `Date` and `Message-ID` are generated per call; non-ASCII header values
/// are RFC 2047 encoded.
pub fn build_message(host: &str, envelope: &Envelope) -> Result<Vec<u8>, RelayError> {
    let html = SinglePart::builder()
        .header(ContentType::TEXT_HTML)
        .header(ContentTransferEncoding::Base64)
        .body(html_body(host, envelope.contact()));

    let message = Message::builder()
        .from(mailbox(envelope.sender())?)
        .to(mailbox(envelope.receiver())?)
        .subject(subject(host))
        .multipart(MultiPart::alternative().singlepart(html))
        .map_err(RelayError::compose)?;
    Ok(message.formatted())
}

fn mailbox(address: &str) -> Result<Mailbox, RelayError> {
    let address: Address = address.parse().map_err(|source| RelayError::Address {
        address: address.to_string(),
        source,
    })?;
    Ok(Mailbox::new(None, address))
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
