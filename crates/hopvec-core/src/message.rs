//! DV exchange message codec
//!
//! The wire format is a newline-separated list of `address/prefix/hop`
//! triples terminated by a sentinel line `x<cmd>`:
//!
//! ```text
//! 10.0.0.0/8/1
//! 192.168.1.0/24/3
//! x0
//! ```
//!
//! `<cmd>` is a single ASCII digit: `0` advertises reachability, `1`
//! withdraws it after a link breakage. Nothing may follow the sentinel.
//!
//! Decoding is a line-oriented tokenizer over validated line boundaries:
//! every failure is a typed [`CodecError`], and a message with zero entries
//! (a withdrawal with no matching local entry, for instance) is valid.

use std::fmt::Write as _;
use std::net::Ipv4Addr;

use bytes::Bytes;

use crate::error::CodecError;
use crate::subnet::Subnet;

/// The two DV message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DvCommand {
    /// Periodic reachability announcement.
    Advertise,
    /// Withdrawal of now-unreachable destinations.
    Breakage,
}

impl DvCommand {
    fn digit(self) -> char {
        match self {
            Self::Advertise => '0',
            Self::Breakage => '1',
        }
    }

    fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(Self::Advertise),
            '1' => Some(Self::Breakage),
            _ => None,
        }
    }
}

/// One reachability claim: a destination subnet and its advertised hop
/// count. Transient; exists only between decode and table update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DvEntry {
    pub subnet: Subnet,
    pub hop: u32,
}

/// A complete DV exchange message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DvMessage {
    pub command: DvCommand,
    pub entries: Vec<DvEntry>,
}

impl DvMessage {
    /// Create an advertisement message.
    pub fn advertise(entries: Vec<DvEntry>) -> Self {
        Self {
            command: DvCommand::Advertise,
            entries,
        }
    }

    /// Create a breakage (withdrawal) message.
    pub fn breakage(entries: Vec<DvEntry>) -> Self {
        Self {
            command: DvCommand::Breakage,
            entries,
        }
    }

    /// Render the message in its wire form.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(
                out,
                "{}/{}/{}",
                entry.subnet.network(),
                entry.subnet.prefix_len(),
                entry.hop
            );
        }
        out.push('x');
        out.push(self.command.digit());
        out
    }

    /// Render the message as a wire payload buffer.
    pub fn encode_bytes(&self) -> Bytes {
        Bytes::from(self.encode().into_bytes())
    }

    /// Parse a wire payload.
    pub fn decode(input: &[u8]) -> Result<Self, CodecError> {
        let text = std::str::from_utf8(input).map_err(|_| CodecError::InvalidUtf8)?;

        // The sentinel is the final line; everything before it is entries.
        let (body, sentinel) = match text.rsplit_once('\n') {
            Some((body, sentinel)) => (body, sentinel),
            None => ("", text),
        };
        let command = parse_sentinel(sentinel)?;

        let mut entries = Vec::new();
        if !body.is_empty() {
            for (index, line) in body.split('\n').enumerate() {
                entries.push(parse_entry(index + 1, line)?);
            }
        }

        Ok(Self { command, entries })
    }
}

fn parse_sentinel(line: &str) -> Result<DvCommand, CodecError> {
    let Some(rest) = line.strip_prefix('x') else {
        return Err(CodecError::MissingSentinel);
    };
    let mut chars = rest.chars();
    let digit = chars.next().ok_or(CodecError::MissingSentinel)?;
    if chars.next().is_some() {
        return Err(CodecError::TrailingData);
    }
    DvCommand::from_digit(digit).ok_or(CodecError::UnknownCommand(digit))
}

fn parse_entry(line: usize, text: &str) -> Result<DvEntry, CodecError> {
    let malformed = |reason| CodecError::MalformedEntry { line, reason };

    let mut fields = text.split('/');
    let addr = fields.next().unwrap_or_default();
    let prefix = fields.next().ok_or_else(|| malformed("missing separator"))?;
    let hop = fields.next().ok_or_else(|| malformed("missing separator"))?;
    if fields.next().is_some() {
        return Err(malformed("too many fields"));
    }

    let addr: Ipv4Addr = addr
        .parse()
        .map_err(|_| malformed("invalid network address"))?;
    let prefix: u8 = prefix
        .parse()
        .map_err(|_| malformed("invalid prefix length"))?;
    let subnet = Subnet::new(addr, prefix).ok_or_else(|| malformed("invalid prefix length"))?;
    let hop: u32 = hop.parse().map_err(|_| malformed("invalid hop count"))?;

    Ok(DvEntry { subnet, hop })
}
