use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use native_tls::{HandshakeError, TlsConnector, TlsStream};
use tracing::trace;

use super::error::RelayError;
use super::types::SmtpStage;

/// Longest reply line accepted, CRLF included.
pub(crate) const MAX_REPLY_LINE: usize = 4096;

#[derive(Debug, Clone)]
pub(crate) struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_positive_intermediate(&self) -> bool {
        (300..400).contains(&self.code)
    }

    pub fn has_capability(&self, cap: &str) -> bool {
        self.lines.iter().any(|line| {
            line.split_whitespace()
                .next()
                .map(|token| token.eq_ignore_ascii_case(cap))
                .unwrap_or(false)
        })
    }

    pub fn text(&self) -> String {
        self.lines.join(" ")
    }

    pub fn into_rejection(self, stage: SmtpStage) -> RelayError {
        let text = self.text();
        RelayError::rejected(stage, self.code, text)
    }
}

#[derive(Debug)]
enum StreamState {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
    Invalid,
}

#[derive(Debug)]
pub(crate) struct SmtpStream {
    state: StreamState,
    buffer: Vec<u8>,
    // bytes of `buffer` already searched for a line feed
    scanned: usize,
    timeout: Option<Duration>,
}

impl SmtpStream {
    pub fn connect(addr: &SocketAddr, timeout: Option<Duration>) -> io::Result<Self> {
        let stream = match timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout)?,
            None => TcpStream::connect(addr)?,
        };
        // the deadlines stay on the socket after a TLS upgrade
        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;
        Ok(Self {
            state: StreamState::Plain(stream),
            buffer: Vec::new(),
            scanned: 0,
            timeout,
        })
    }

    pub fn is_tls(&self) -> bool {
        matches!(self.state, StreamState::Tls(_))
    }

    pub fn upgrade_tls(&mut self, domain: &str, connector: &TlsConnector) -> Result<(), RelayError> {
        let state = std::mem::replace(&mut self.state, StreamState::Invalid);
        let plain = match state {
            StreamState::Plain(stream) => stream,
            StreamState::Tls(stream) => {
                self.state = StreamState::Tls(stream);
                return Ok(());
            }
            StreamState::Invalid => {
                return Err(RelayError::Protocol("invalid stream state".into()));
            }
        };

        // bytes read before the upgrade must not leak into the TLS session
        self.buffer.clear();
        self.scanned = 0;
        let tls = complete_handshake(connector, domain, plain)?;
        self.state = StreamState::Tls(Box::new(tls));
        Ok(())
    }

    pub fn send_line(&mut self, line: &str) -> Result<(), RelayError> {
        let mut data = line.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        self.write_all(&data)
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), RelayError> {
        let result = match &mut self.state {
            StreamState::Plain(stream) => stream.write_all(data).and_then(|_| stream.flush()),
            StreamState::Tls(stream) => stream.write_all(data).and_then(|_| stream.flush()),
            StreamState::Invalid => {
                return Err(RelayError::Protocol("invalid stream state".into()));
            }
        };
        result.map_err(RelayError::io)
    }

    /// Reads one possibly multi-line reply. The socket timeout bounds each
    /// read; the whole reply must also arrive within that same timeout.
    pub fn read_reply(&mut self) -> Result<SmtpReply, RelayError> {
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        let mut lines = Vec::new();
        let mut code: Option<u16> = None;
        loop {
            let line = self.read_line(deadline)?;
            let parsed_code = line
                .get(..3)
                .and_then(|head| head.parse::<u16>().ok())
                .ok_or_else(|| RelayError::Protocol(format!("invalid reply: {line}")))?;
            match code {
                Some(existing) if existing != parsed_code => {
                    return Err(RelayError::Protocol(format!(
                        "inconsistent reply codes: {existing} vs {parsed_code}"
                    )));
                }
                Some(_) => {}
                None => code = Some(parsed_code),
            }
            let is_last = line.as_bytes().get(3) != Some(&b'-');
            lines.push(line.get(4..).unwrap_or_default().to_string());
            if is_last {
                break;
            }
        }
        Ok(SmtpReply {
            code: code.unwrap_or(0),
            lines,
        })
    }

    fn read_line(&mut self, deadline: Option<Instant>) -> Result<String, RelayError> {
        loop {
            if let Some(offset) = self.buffer[self.scanned..]
                .iter()
                .position(|byte| *byte == b'\n')
            {
                let pos = self.scanned + offset;
                let mut line = self.buffer.drain(..=pos).collect::<Vec<_>>();
                self.scanned = 0;
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(String::from_utf8_lossy(&line).into_owned());
            }
            self.scanned = self.buffer.len();

            if self.buffer.len() > MAX_REPLY_LINE {
                return Err(RelayError::Protocol(format!(
                    "reply line longer than {MAX_REPLY_LINE} bytes"
                )));
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(RelayError::io(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "reply not completed in time",
                )));
            }

            let mut buf = [0u8; 512];
            let read = match &mut self.state {
                StreamState::Plain(stream) => stream.read(&mut buf),
                StreamState::Tls(stream) => stream.read(&mut buf),
                StreamState::Invalid => {
                    return Err(RelayError::Protocol("invalid stream state".into()));
                }
            };
            let read = read.map_err(RelayError::io)?;
            if read == 0 {
                return Err(RelayError::io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed by server",
                )));
            }
            self.buffer.extend_from_slice(&buf[..read]);
        }
    }
}

fn complete_handshake(
    connector: &TlsConnector,
    domain: &str,
    stream: TcpStream,
) -> Result<TlsStream<TcpStream>, RelayError> {
    match connector.connect(domain, stream) {
        Ok(tls) => Ok(tls),
        Err(HandshakeError::Failure(err)) => Err(RelayError::Tls { source: err }),
        Err(HandshakeError::WouldBlock(mut mid)) => loop {
            match mid.handshake() {
                Ok(tls) => break Ok(tls),
                Err(HandshakeError::Failure(err)) => {
                    break Err(RelayError::Tls { source: err });
                }
                Err(HandshakeError::WouldBlock(next)) => mid = next,
            }
        },
    }
}

/// One SMTP conversation with a probed host, recording a transcript and the
/// stage reached so far.
pub(crate) struct SmtpSession {
    host: String,
    stream: SmtpStream,
    stage: SmtpStage,
    transcript: Vec<String>,
}

impl SmtpSession {
    pub fn connect(host: &str, port: u16, timeout: Option<Duration>) -> Result<Self, RelayError> {
        let addresses: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|source| RelayError::Resolve {
                host: host.to_string(),
                source,
            })?
            .collect();

        let mut last_err = None;
        for addr in &addresses {
            match SmtpStream::connect(addr, timeout) {
                Ok(stream) => {
                    return Ok(Self {
                        host: host.to_string(),
                        stream,
                        stage: SmtpStage::Greeting,
                        transcript: Vec::new(),
                    });
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(match last_err {
            Some(source) => RelayError::Connect {
                host: format!("{host}:{port}"),
                source,
            },
            None => RelayError::NoAddress {
                host: host.to_string(),
            },
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn stage(&self) -> SmtpStage {
        self.stage
    }

    pub fn is_tls(&self) -> bool {
        self.stream.is_tls()
    }

    pub fn take_transcript(&mut self) -> Vec<String> {
        std::mem::take(&mut self.transcript)
    }

    fn record(&mut self, direction: &str, message: &str) {
        trace!(host = %self.host, "{direction}: {message}");
        self.transcript
            .push(format!("[{}] {direction}: {message}", self.host));
    }

    fn record_reply(&mut self, reply: &SmtpReply) {
        if reply.lines.is_empty() {
            self.record("S", &reply.code.to_string());
        } else {
            for line in &reply.lines {
                self.record("S", &format!("{} {}", reply.code, line));
            }
        }
    }

    pub fn read_greeting(&mut self) -> Result<SmtpReply, RelayError> {
        self.stage = SmtpStage::Greeting;
        let reply = self.stream.read_reply()?;
        self.record_reply(&reply);
        Ok(reply)
    }

    pub fn command(&mut self, stage: SmtpStage, command: &str) -> Result<SmtpReply, RelayError> {
        self.stage = stage;
        self.record("C", command);
        self.stream.send_line(command)?;
        let reply = self.stream.read_reply()?;
        self.record_reply(&reply);
        Ok(reply)
    }

    /// Sends `STARTTLS` and, on a 2xx reply, upgrades the stream.
    pub fn starttls(&mut self, connector: &TlsConnector) -> Result<(), RelayError> {
        let reply = self.command(SmtpStage::StartTls, "STARTTLS")?;
        if !reply.is_positive_completion() {
            return Err(reply.into_rejection(SmtpStage::StartTls));
        }
        let host = self.host.clone();
        self.stream.upgrade_tls(&host, connector)?;
        self.record("*", "TLS established");
        Ok(())
    }

    /// Transmits a message body after a `354`, applying dot-stuffing and CRLF
    /// line endings, followed by the terminating `.` line.
    pub fn send_message(&mut self, message: &[u8]) -> Result<SmtpReply, RelayError> {
        self.stage = SmtpStage::Message;
        let payload = encode_data(message);
        self.record("C", &format!("<message, {} bytes>", payload.len()));
        self.stream.write_all(&payload)?;
        let reply = self.stream.read_reply()?;
        self.record_reply(&reply);
        Ok(reply)
    }

    pub fn quit(&mut self) -> Result<(), RelayError> {
        self.command(SmtpStage::Quit, "QUIT").map(|_| ())
    }
}

pub(crate) fn encode_data(message: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(message.len() + 8);
    let mut lines: Vec<&[u8]> = message.split(|byte| *byte == b'\n').collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    for line in lines {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.first() == Some(&b'.') {
            out.push(b'.');
        }
        out.extend_from_slice(line);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b".\r\n");
    out
}
