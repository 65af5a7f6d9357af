use crate::dns_header::{DnsHeader, HEADER_LEN};
use crate::dns_question_and_answer::{decode_question_name, AnswerRecord};
use crate::error::QueryError;

/// Size of the shared request/response buffer
pub const MAX_MESSAGE_LEN: usize = 1024;

/// A query that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedQuery {
    pub id: u16,
    /// Cursor just past the first question; the answer goes here
    pub question_end: usize,
}

/// Parse the DNS request in `msg` (exactly the received bytes), decoding the
/// first question's name into `name`.
pub fn parse_request(
    msg: &[u8],
    name: &mut String,
    name_capacity: usize,
) -> Result<ParsedQuery, QueryError> {
    let header = DnsHeader::from_bytes(msg)?;
    header.check_query()?;

    let question_end = decode_question_name(msg, HEADER_LEN, name, name_capacity)?;

    Ok(ParsedQuery {
        id: header.id,
        question_end,
    })
}

/// Build the response in place: the answer is written at the cursor,
/// everything past it is dropped, and the header is rewritten.
///
/// `buf` is the whole receive buffer and `name` is only used for the
/// diagnostic. Returns the response length.
pub fn build_response(
    buf: &mut [u8],
    question_end: usize,
    name: &str,
    answer: &AnswerRecord,
) -> Result<usize, QueryError> {
    let record = answer.as_bytes();
    let response_len = question_end + record.len();
    if response_len > buf.len() {
        return Err(QueryError::TooLongForReply {
            name: name.to_string(),
            len: question_end,
        });
    }

    buf[question_end..response_len].copy_from_slice(record);

    let header = DnsHeader::from_bytes(buf)?.into_response();
    buf[..HEADER_LEN].copy_from_slice(&header.to_bytes());

    Ok(response_len)
}
