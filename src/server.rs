use std::io;
use std::net::{SocketAddr, UdpSocket};

use tracing::{info, warn};

use crate::dns_message::{build_response, parse_request, MAX_MESSAGE_LEN};
use crate::dns_question_and_answer::{AnswerRecord, NAME_CAPACITY};
use crate::error::{QueryError, ServeError};

/// Datagram socket the server reads queries from and answers on
pub trait Transport {
    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;
    fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize>;
}

impl Transport for UdpSocket {
    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        UdpSocket::recv_from(self, buf)
    }

    fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, target)
    }
}

/// DNS Server answering every query with the same A record.
/// Handles one query at a time and reuses its buffers between them.
pub struct DnsServer<T = UdpSocket> {
    transport: T,
    answer: AnswerRecord,
    buf: Box<[u8; MAX_MESSAGE_LEN]>,
    name: String,
}

impl<T: Transport> DnsServer<T> {
    pub fn new(transport: T, answer: AnswerRecord) -> Self {
        Self {
            transport,
            answer,
            buf: Box::new([0u8; MAX_MESSAGE_LEN]),
            name: String::with_capacity(NAME_CAPACITY),
        }
    }

    /// Run the DNS server main loop.
    /// Only returns if receiving fails.
    pub fn run(&mut self) -> ServeError {
        loop {
            if let Err(e) = self.handle_one() {
                return e;
            }
        }
    }

    /// Receive one query and answer it, or log why it was dropped.
    pub fn handle_one(&mut self) -> Result<(), ServeError> {
        let (size, source) = self
            .transport
            .recv_from(&mut self.buf[..])
            .map_err(ServeError::Receive)?;

        match self.handle_request(size, source) {
            Ok(id) => info!(client = %source, id, name = %self.name, "answered"),
            Err(e) => warn!(client = %source, "{e}"),
        }

        Ok(())
    }

    /// Validate the first `size` bytes of the buffer, turn them into a
    /// response in place and send it back to `source`.
    fn handle_request(&mut self, size: usize, source: SocketAddr) -> Result<u16, QueryError> {
        let query = parse_request(&self.buf[..size], &mut self.name, NAME_CAPACITY)?;
        let response_len =
            build_response(&mut self.buf[..], query.question_end, &self.name, &self.answer)?;

        let sent = self
            .transport
            .send_to(&self.buf[..response_len], source)
            .map_err(QueryError::Send)?;
        if sent != response_len {
            return Err(QueryError::ShortSend {
                sent,
                expected: response_len,
            });
        }

        Ok(query.id)
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
