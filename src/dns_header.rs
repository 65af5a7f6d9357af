use crate::error::QueryError;

/// Length of the fixed DNS header
pub const HEADER_LEN: usize = 12;

/// Standard query opcode
pub const OPCODE_QUERY: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsHeader {
    pub id: u16,
    pub flags: u16,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsFlags {
    /// Set on responses
    pub qr: bool,
    pub opcode: u8,
    /// Authoritative answer
    pub aa: bool,
    /// Truncated
    pub tc: bool,
    /// Recursion desired
    pub rd: bool,
    /// Recursion available
    pub ra: bool,
    pub z: u8,
    pub rcode: u8,
}

impl DnsFlags {
    pub fn to_u16(&self) -> u16 {
        let mut flags: u16 = 0;

        if self.qr {
            flags |= 1 << 15;
        }
        flags |= (self.opcode as u16 & 0xF) << 11;
        if self.aa {
            flags |= 1 << 10;
        }
        if self.tc {
            flags |= 1 << 9;
        }
        if self.rd {
            flags |= 1 << 8;
        }
        if self.ra {
            flags |= 1 << 7;
        }
        flags |= (self.z as u16 & 0x7) << 4;
        flags |= self.rcode as u16 & 0xF;

        flags
    }

    pub fn from_u16(flags: u16) -> Self {
        DnsFlags {
            qr: (flags & (1 << 15)) != 0,
            opcode: ((flags >> 11) & 0xF) as u8,
            aa: (flags & (1 << 10)) != 0,
            tc: (flags & (1 << 9)) != 0,
            rd: (flags & (1 << 8)) != 0,
            ra: (flags & (1 << 7)) != 0,
            z: ((flags >> 4) & 0x7) as u8,
            rcode: (flags & 0xF) as u8,
        }
    }
}

impl DnsHeader {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, QueryError> {
        if bytes.len() < HEADER_LEN {
            return Err(QueryError::ShortHeader(bytes.len()));
        }

        Ok(DnsHeader {
            id: u16::from_be_bytes([bytes[0], bytes[1]]),
            flags: u16::from_be_bytes([bytes[2], bytes[3]]),
            question_count: u16::from_be_bytes([bytes[4], bytes[5]]),
            answer_count: u16::from_be_bytes([bytes[6], bytes[7]]),
            authority_count: u16::from_be_bytes([bytes[8], bytes[9]]),
            additional_count: u16::from_be_bytes([bytes[10], bytes[11]]),
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];

        bytes[0..2].copy_from_slice(&self.id.to_be_bytes());
        bytes[2..4].copy_from_slice(&self.flags.to_be_bytes());
        bytes[4..6].copy_from_slice(&self.question_count.to_be_bytes());
        bytes[6..8].copy_from_slice(&self.answer_count.to_be_bytes());
        bytes[8..10].copy_from_slice(&self.authority_count.to_be_bytes());
        bytes[10..12].copy_from_slice(&self.additional_count.to_be_bytes());

        bytes
    }

    pub fn dns_flags(&self) -> DnsFlags {
        DnsFlags::from_u16(self.flags)
    }

    /// Reject anything that is not a plain, untruncated standard query with
    /// at least one question.
    pub fn check_query(&self) -> Result<(), QueryError> {
        let flags = self.dns_flags();

        if flags.qr {
            return Err(QueryError::NotAQuery);
        }
        if flags.opcode != OPCODE_QUERY {
            return Err(QueryError::InvalidOpcode(flags.opcode));
        }
        if flags.tc {
            return Err(QueryError::Truncated);
        }
        if self.question_count == 0 {
            return Err(QueryError::NoQuestions);
        }

        Ok(())
    }

    /// Turn a query header into the header of our single-answer reply.
    /// Opcode, RD, Z and RCODE are left as received.
    pub fn into_response(self) -> Self {
        let mut flags = self.dns_flags();
        flags.qr = true;
        flags.aa = true;
        flags.ra = true;

        DnsHeader {
            id: self.id,
            flags: flags.to_u16(),
            question_count: 1,
            answer_count: 1,
            authority_count: 0,
            additional_count: 0,
        }
    }
}
