// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! NDEF Message Codec
//!
//! Binary layout of NFC Data Exchange Format messages and the Well-Known
//! Text record type used to carry exchange payloads.
//!
//! Record layout:
//!
//! ```text
//! flags|tnf (1) | type_len (1) | payload_len (1 or 4, BE) | [id_len (1)]
//! | type | [id] | payload
//! ```

use thiserror::Error;

const FLAG_MB: u8 = 0x80;
const FLAG_ME: u8 = 0x40;
const FLAG_CF: u8 = 0x20;
const FLAG_SR: u8 = 0x10;
const FLAG_IL: u8 = 0x08;
const TNF_MASK: u8 = 0x07;

/// Well-Known record type of a text record.
pub const TEXT_RECORD_TYPE: &[u8] = b"T";

const TEXT_UTF16_FLAG: u8 = 0x80;
const TEXT_LANG_LEN_MASK: u8 = 0x3F;

/// NDEF decoding errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NdefError {
    #[error("Empty NDEF message")]
    Empty,

    #[error("Truncated record at byte {0}")]
    Truncated(usize),

    #[error("First record is missing the message-begin flag")]
    MissingMessageBegin,

    #[error("Unexpected message-begin flag at record {0}")]
    UnexpectedMessageBegin(usize),

    #[error("Trailing bytes after message end")]
    TrailingBytes,

    #[error("Malformed chunk sequence at record {0}")]
    MalformedChunk(usize),

    #[error("Reserved type name format")]
    ReservedTnf,

    #[error("Not a text record")]
    NotText,

    #[error("Invalid text encoding")]
    InvalidText,

    #[error("Language code too long")]
    LanguageCodeTooLong,
}

/// Type Name Format of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tnf {
    Empty,
    WellKnown,
    Media,
    AbsoluteUri,
    External,
    Unknown,
    Unchanged,
}

impl Tnf {
    fn bits(self) -> u8 {
        match self {
            Tnf::Empty => 0x00,
            Tnf::WellKnown => 0x01,
            Tnf::Media => 0x02,
            Tnf::AbsoluteUri => 0x03,
            Tnf::External => 0x04,
            Tnf::Unknown => 0x05,
            Tnf::Unchanged => 0x06,
        }
    }

    fn from_bits(bits: u8) -> Result<Self, NdefError> {
        match bits & TNF_MASK {
            0x00 => Ok(Tnf::Empty),
            0x01 => Ok(Tnf::WellKnown),
            0x02 => Ok(Tnf::Media),
            0x03 => Ok(Tnf::AbsoluteUri),
            0x04 => Ok(Tnf::External),
            0x05 => Ok(Tnf::Unknown),
            0x06 => Ok(Tnf::Unchanged),
            _ => Err(NdefError::ReservedTnf),
        }
    }
}

/// A single NDEF record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    pub tnf: Tnf,
    pub record_type: Vec<u8>,
    pub id: Vec<u8>,
    pub payload: Vec<u8>,
}

impl NdefRecord {
    /// Creates a record.
    pub fn new(tnf: Tnf, record_type: &[u8], payload: Vec<u8>) -> Self {
        NdefRecord {
            tnf,
            record_type: record_type.to_vec(),
            id: Vec::new(),
            payload,
        }
    }

    /// Creates a UTF-8 Well-Known Text record.
    pub fn text(language_code: &str, text: &str) -> Result<Self, NdefError> {
        let lang = language_code.as_bytes();
        if lang.len() > TEXT_LANG_LEN_MASK as usize {
            return Err(NdefError::LanguageCodeTooLong);
        }

        let mut payload = Vec::with_capacity(1 + lang.len() + text.len());
        payload.push(lang.len() as u8);
        payload.extend_from_slice(lang);
        payload.extend_from_slice(text.as_bytes());

        Ok(NdefRecord::new(Tnf::WellKnown, TEXT_RECORD_TYPE, payload))
    }

    /// Creates a MIME media record.
    pub fn mime(media_type: &str, payload: Vec<u8>) -> Self {
        NdefRecord::new(Tnf::Media, media_type.as_bytes(), payload)
    }

    /// Returns true if this is a Well-Known Text record.
    pub fn is_text(&self) -> bool {
        self.tnf == Tnf::WellKnown && self.record_type == TEXT_RECORD_TYPE
    }

    /// Decodes the payload of a text record.
    pub fn text_content(&self) -> Result<TextContent, NdefError> {
        if !self.is_text() {
            return Err(NdefError::NotText);
        }

        let status = *self.payload.first().ok_or(NdefError::InvalidText)?;
        let lang_len = (status & TEXT_LANG_LEN_MASK) as usize;
        if self.payload.len() < 1 + lang_len {
            return Err(NdefError::InvalidText);
        }

        let language_code = std::str::from_utf8(&self.payload[1..1 + lang_len])
            .map_err(|_| NdefError::InvalidText)?
            .to_string();
        let body = &self.payload[1 + lang_len..];

        let text = if status & TEXT_UTF16_FLAG != 0 {
            decode_utf16(body)?
        } else {
            String::from_utf8(body.to_vec()).map_err(|_| NdefError::InvalidText)?
        };

        Ok(TextContent {
            language_code,
            text,
        })
    }

    fn encode_into(&self, out: &mut Vec<u8>, first: bool, last: bool) {
        let short = self.payload.len() <= u8::MAX as usize;

        let mut header = self.tnf.bits();
        if first {
            header |= FLAG_MB;
        }
        if last {
            header |= FLAG_ME;
        }
        if short {
            header |= FLAG_SR;
        }
        if !self.id.is_empty() {
            header |= FLAG_IL;
        }

        out.push(header);
        out.push(self.record_type.len() as u8);
        if short {
            out.push(self.payload.len() as u8);
        } else {
            out.extend_from_slice(&(self.payload.len() as u32).to_be_bytes());
        }
        if !self.id.is_empty() {
            out.push(self.id.len() as u8);
        }
        out.extend_from_slice(&self.record_type);
        out.extend_from_slice(&self.id);
        out.extend_from_slice(&self.payload);
    }
}

/// Decoded content of a text record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextContent {
    pub language_code: String,
    pub text: String,
}

/// An ordered sequence of NDEF records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NdefMessage {
    pub records: Vec<NdefRecord>,
}

impl NdefMessage {
    /// Creates a message from records.
    pub fn new(records: Vec<NdefRecord>) -> Self {
        NdefMessage { records }
    }

    /// Serializes to bytes.
    ///
    /// An empty message encodes as a single empty record.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        if self.records.is_empty() {
            NdefRecord::new(Tnf::Empty, &[], Vec::new()).encode_into(&mut bytes, true, true);
            return bytes;
        }

        let last = self.records.len() - 1;
        for (i, record) in self.records.iter().enumerate() {
            record.encode_into(&mut bytes, i == 0, i == last);
        }
        bytes
    }

    /// Parses a message from bytes.
    ///
    /// Chunked records are reassembled into one record carrying the type of
    /// the first chunk. A chunk sequence cut short by the message end is
    /// kept as it stands.
    pub fn parse(bytes: &[u8]) -> Result<Self, NdefError> {
        if bytes.is_empty() {
            return Err(NdefError::Empty);
        }

        let mut records = Vec::new();
        let mut chunked: Option<NdefRecord> = None;
        let mut offset = 0;
        let mut index = 0;

        loop {
            let (record, header, next) = parse_record(bytes, offset)?;

            if index == 0 && header & FLAG_MB == 0 {
                return Err(NdefError::MissingMessageBegin);
            }
            if index > 0 && header & FLAG_MB != 0 {
                return Err(NdefError::UnexpectedMessageBegin(index));
            }

            let more_chunks = header & FLAG_CF != 0;
            match chunked.take() {
                Some(mut head) => {
                    if record.tnf != Tnf::Unchanged || !record.record_type.is_empty() {
                        return Err(NdefError::MalformedChunk(index));
                    }
                    head.payload.extend_from_slice(&record.payload);
                    if more_chunks {
                        chunked = Some(head);
                    } else {
                        records.push(head);
                    }
                }
                None if record.tnf == Tnf::Unchanged => {
                    return Err(NdefError::MalformedChunk(index));
                }
                None if more_chunks => chunked = Some(record),
                None => records.push(record),
            }

            index += 1;
            offset = next;

            if header & FLAG_ME != 0 {
                records.extend(chunked.take());
                break;
            }
            if offset >= bytes.len() {
                return Err(NdefError::Truncated(offset));
            }
        }

        if offset != bytes.len() {
            return Err(NdefError::TrailingBytes);
        }

        Ok(NdefMessage { records })
    }
}

fn parse_record(bytes: &[u8], start: usize) -> Result<(NdefRecord, u8, usize), NdefError> {
    let mut cursor = Cursor { bytes, offset: start };

    let header = cursor.byte()?;
    let tnf = Tnf::from_bits(header)?;

    let type_len = cursor.byte()? as usize;
    let payload_len = if header & FLAG_SR != 0 {
        cursor.byte()? as usize
    } else {
        let len = cursor.take(4)?;
        u32::from_be_bytes([len[0], len[1], len[2], len[3]]) as usize
    };
    let id_len = if header & FLAG_IL != 0 {
        cursor.byte()? as usize
    } else {
        0
    };

    let record_type = cursor.take(type_len)?.to_vec();
    let id = cursor.take(id_len)?.to_vec();
    let payload = cursor.take(payload_len)?.to_vec();

    Ok((
        NdefRecord {
            tnf,
            record_type,
            id,
            payload,
        },
        header,
        cursor.offset,
    ))
}

struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn byte(&mut self) -> Result<u8, NdefError> {
        Ok(self.take(1)?[0])
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], NdefError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(NdefError::Truncated(self.offset))?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }
}

/// UTF-16 text, big-endian unless a byte order mark says otherwise.
fn decode_utf16(body: &[u8]) -> Result<String, NdefError> {
    if body.len() % 2 != 0 {
        return Err(NdefError::InvalidText);
    }

    let (little_endian, body) = match body {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, body),
    };

    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            if little_endian {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        })
        .collect();

    String::from_utf16(&units).map_err(|_| NdefError::InvalidText)
}
