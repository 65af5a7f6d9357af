use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};

use bytes::{BufMut, BytesMut};

use crate::dns_header::HEADER_LEN;
use crate::dns_question_and_answer::{AnswerRecord, RecordClass, RecordType, ANSWER_LEN};
use crate::error::StartupError;

/// Compression pointer to the first question's name, right after the header
const NAME_POINTER: u16 = 0xC000 | HEADER_LEN as u16;

/// Build the A record served for every query.
/// `address` may be an IPv4 literal or a hostname resolved once, here.
pub fn build_answer(address: &str, ttl: &str) -> Result<AnswerRecord, StartupError> {
    let ttl = parse_ttl(ttl)?;
    let ip = resolve_ipv4(address)?;

    Ok(encode_a_record(ip, ttl))
}

fn parse_ttl(ttl: &str) -> Result<u32, StartupError> {
    ttl.parse::<u32>().map_err(|e| StartupError::Ttl {
        value: ttl.to_string(),
        reason: e.to_string(),
    })
}

fn resolve_ipv4(address: &str) -> Result<Ipv4Addr, StartupError> {
    if let Ok(ip) = address.parse::<Ipv4Addr>() {
        return Ok(ip);
    }

    let resolved: Vec<IpAddr> = (address, 0)
        .to_socket_addrs()
        .map_err(|source| StartupError::Resolve {
            address: address.to_string(),
            source,
        })?
        .map(|addr| addr.ip())
        .collect();

    match resolved.iter().find_map(|ip| match ip {
        IpAddr::V4(v4) => Some(*v4),
        IpAddr::V6(_) => None,
    }) {
        Some(ip) => Ok(ip),
        None => match resolved.first() {
            Some(other) => Err(StartupError::NotIpv4 {
                address: address.to_string(),
                found: other.to_string(),
            }),
            None => Err(StartupError::NoAddress(address.to_string())),
        },
    }
}

/// NAME pointer, TYPE, CLASS, TTL, RDLENGTH, RDATA; all network byte order
pub fn encode_a_record(ip: Ipv4Addr, ttl: u32) -> AnswerRecord {
    let mut record = BytesMut::with_capacity(ANSWER_LEN);

    record.put_u16(NAME_POINTER);
    record.put_u16(RecordType::A.to_u16());
    record.put_u16(RecordClass::IN.to_u16());
    record.put_u32(ttl);
    record.put_u16(4);
    record.put_slice(&ip.octets());

    AnswerRecord::from_bytes(record.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_answer_layout() {
        let answer = build_answer("192.0.2.7", "300").unwrap();
        assert_eq!(
            answer.as_bytes(),
            &[0xC0, 0x0C, 0, 1, 0, 1, 0, 0, 0x01, 0x2C, 0, 4, 192, 0, 2, 7]
        );
    }

    #[test]
    fn test_build_answer_full_ttl_range() {
        let answer = build_answer("10.0.0.1", "4294967295").unwrap();
        assert_eq!(&answer.as_bytes()[6..10], &[0xFF, 0xFF, 0xFF, 0xFF]);

        let answer = build_answer("10.0.0.1", "0").unwrap();
        assert_eq!(&answer.as_bytes()[6..10], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_build_answer_rejects_bad_ttl() {
        for ttl in ["4294967296", "-1", "ten", ""] {
            let err = build_answer("10.0.0.1", ttl).unwrap_err();
            assert!(matches!(err, StartupError::Ttl { .. }), "ttl {ttl:?}");
            assert_eq!(err.exit_code(), 5);
        }
    }

    #[test]
    fn test_build_answer_resolves_localhost() {
        let answer = build_answer("localhost", "60").unwrap();
        assert_eq!(&answer.as_bytes()[10..12], &[0, 4]);
        assert_eq!(answer.as_bytes()[12], 127);
    }

    #[test]
    fn test_build_answer_rejects_ipv6_literal() {
        let err = build_answer("::1", "60").unwrap_err();
        assert!(matches!(err, StartupError::NotIpv4 { .. }));
    }

    #[test]
    fn test_build_answer_rejects_unresolvable_host() {
        let err = build_answer("no such host!", "60").unwrap_err();
        assert!(matches!(
            err,
            StartupError::Resolve { .. } | StartupError::NoAddress(_)
        ));
    }
}
