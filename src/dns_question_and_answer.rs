use bytes::Bytes;

use crate::error::QueryError;

/// Mask selecting the two top bits of a label length byte
pub const COMPRESSION_MASK: u8 = 0xC0;

/// Capacity of the decoded-name scratch buffer
pub const NAME_CAPACITY: usize = 1024;

/// Room kept free in the name buffer beyond each label
const NAME_MARGIN: usize = 2;

/// Length of the prebuilt answer record:
/// NAME pointer (2) + TYPE (2) + CLASS (2) + TTL (4) + RDLENGTH (2) + RDATA (4)
pub const ANSWER_LEN: usize = 16;

/// The only record type we answer with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    A = 1, // IPv4 address
}

impl RecordType {
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordClass {
    IN = 1, // Internet
}

impl RecordClass {
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// Fixed A record sent in every reply.
/// Built once at startup, then only ever copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    bytes: Bytes,
}

impl AnswerRecord {
    pub(crate) fn from_bytes(bytes: Bytes) -> Self {
        debug_assert_eq!(bytes.len(), ANSWER_LEN);
        AnswerRecord { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Letters, digits and hyphens pass through to the log; everything else
/// becomes '?'.
fn sanitize(byte: u8) -> char {
    if byte.is_ascii_alphanumeric() || byte == b'-' {
        byte as char
    } else {
        '?'
    }
}

/// Decode the first question's name starting at `offset` into `name`.
///
/// `msg` is exactly the received datagram. The decoded name is dot-joined,
/// sanitized, and always ends with a trailing '.'. Returns the offset just
/// past the question's type and class fields.
pub fn decode_question_name(
    msg: &[u8],
    mut offset: usize,
    name: &mut String,
    capacity: usize,
) -> Result<usize, QueryError> {
    name.clear();

    loop {
        // Ran off the end without a terminating zero label
        let Some(&length) = msg.get(offset) else {
            return Err(QueryError::NameOverrun);
        };

        // Compression shouldn't happen in the first name
        if length & COMPRESSION_MASK != 0 {
            return Err(QueryError::CompressedName);
        }

        if length == 0 {
            name.push('.');
            offset += 1;
            break;
        }

        let label_len = length as usize;
        if label_len + NAME_MARGIN >= capacity.saturating_sub(1).saturating_sub(name.len()) {
            return Err(QueryError::NameBufferFull {
                label_len: length,
                partial: name.clone(),
            });
        }

        let start = offset + 1;
        let label = msg
            .get(start..start + label_len)
            .ok_or(QueryError::NameOverrun)?;

        if !name.is_empty() {
            name.push('.');
        }
        name.extend(label.iter().copied().map(sanitize));
        offset = start + label_len;
    }

    // Leave the type and class intact as well
    offset += 4;
    if offset > msg.len() {
        return Err(QueryError::MissingTypeClass);
    }

    Ok(offset)
}
