use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::{Duration, Instant};
use bytes::BytesMut;
use dns::{DecodeError, EncodeError, Question, ResponseMessage};
use domain_name_query_types::NameQuery;
use thiserror::Error;
use tokio::net::UdpSocket;

// https://datatracker.ietf.org/doc/html/rfc1035#section-4.2.1
//
// Messages carried by UDP are restricted to 512 bytes (not counting the IP
// or UDP headers).
pub const MAX_RESPONSE_SIZE: usize = 512;

#[derive(Clone, Debug)]
pub struct ResolverConfig {
    pub server_addr: SocketAddr,
    /// Deadline of a single attempt.
    pub timeout: Duration,
    /// Retransmissions after the first attempt.
    pub max_retries: u32,
}

#[derive(Debug)]
pub struct Resolution {
    pub response: ResponseMessage,
    /// Time from the last transmission to its reply.
    pub elapsed: Duration,
    pub retries: u32,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("socket error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        retries: u32,
    },
    #[error("{source}")]
    Decode {
        #[source]
        source: DecodeError,
        retries: u32,
    },
    #[error("maximum number of retries {retries} exceeded")]
    RetriesExhausted { retries: u32 },
}

impl ResolveError {
    /// Retransmissions made before the query failed.
    pub fn retries(&self) -> u32 {
        match self {
            ResolveError::Encode(_) => 0,
            ResolveError::Io { retries, .. }
            | ResolveError::Decode { retries, .. }
            | ResolveError::RetriesExhausted { retries } => *retries,
        }
    }
}

enum State {
    Sending,
    AwaitingReply { started: Instant },
    Retrying,
}

/// Sends one query over UDP and retransmits it on timeout.
///
/// Only a timeout leads to a retransmission, always of the same datagram.
/// A reply that fails to decode ends the query. The socket lives inside the
/// future, so dropping the future releases it too.
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub async fn resolve(&self, name_query: &NameQuery) -> Result<Resolution, ResolveError> {
        self.resolve_with_id(name_query, rand::random::<u16>()).await
    }

    pub async fn resolve_with_id(
        &self,
        name_query: &NameQuery,
        id: u16,
    ) -> Result<Resolution, ResolveError> {
        tracing::debug!(
            "resolving {} {} via {}, id {:#06x}",
            name_query.q_type,
            name_query.name,
            self.config.server_addr,
            id
        );

        let question = Question::new(&name_query.name, name_query.q_type)?;
        let request_bytes = dns::encode_request(&question, id);

        let local_addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0);
        let sock = UdpSocket::bind(local_addr)
            .await
            .map_err(|source| ResolveError::Io { source, retries: 0 })?;
        sock.connect(self.config.server_addr)
            .await
            .map_err(|source| ResolveError::Io { source, retries: 0 })?;

        let mut retries: u32 = 0;
        let mut state = State::Sending;

        loop {
            state = match state {
                State::Sending => {
                    let send_size = sock
                        .send(&request_bytes)
                        .await
                        .map_err(|source| ResolveError::Io { source, retries })?;
                    tracing::debug!("sent udp request, length: {}", send_size);

                    State::AwaitingReply {
                        started: Instant::now(),
                    }
                }
                State::AwaitingReply { started } => {
                    let mut resp_buf = BytesMut::with_capacity(MAX_RESPONSE_SIZE);
                    let received =
                        tokio::time::timeout(self.config.timeout, sock.recv_buf(&mut resp_buf)).await;

                    match received {
                        Ok(Ok(response_size)) => {
                            let elapsed = started.elapsed();
                            let response_bytes = &resp_buf[0..response_size];
                            tracing::debug!(
                                "received udp response, length: {}, {:?}",
                                response_size,
                                response_bytes
                            );

                            let response = dns::decode_response(response_bytes, &question, id)
                                .map_err(|source| ResolveError::Decode { source, retries })?;
                            if response.is_truncated() {
                                tracing::warn!("response is truncated, TCP fallback is not supported");
                            }

                            return Ok(Resolution {
                                response,
                                elapsed,
                                retries,
                            });
                        }
                        Ok(Err(source)) => return Err(ResolveError::Io { source, retries }),
                        Err(_) if retries < self.config.max_retries => State::Retrying,
                        Err(_) => return Err(ResolveError::RetriesExhausted { retries }),
                    }
                }
                State::Retrying => {
                    retries += 1;
                    tracing::warn!(
                        "no reply from {} within {:?}, retransmitting ({}/{})",
                        self.config.server_addr,
                        self.config.timeout,
                        retries,
                        self.config.max_retries
                    );

                    State::Sending
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dns::{ProtocolError, RecordData};
    use domain_name_query_types::QType;
    use std::sync::Arc;
    use tokio::task::JoinHandle;

    const ID: u16 = 0x827a;

    async fn mock_server() -> (Arc<UdpSocket>, SocketAddr) {
        let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = sock.local_addr().unwrap();
        (Arc::new(sock), addr)
    }

    fn resolver(server_addr: SocketAddr, timeout_ms: u64, max_retries: u32) -> Resolver {
        Resolver::new(ResolverConfig {
            server_addr,
            timeout: Duration::from_millis(timeout_ms),
            max_retries,
        })
    }

    // Echoes the query back as a recursive answer with the given id and
    // rcode; a clean answer carries one A record.
    fn reply(query: &[u8], id: u16, rcode: u8) -> Vec<u8> {
        let mut bytes = query.to_vec();
        bytes[0..2].copy_from_slice(&id.to_be_bytes());
        bytes[2] = 0x81;
        bytes[3] = 0x80 | rcode;
        if rcode == 0 {
            bytes[7] = 1;
            bytes.extend_from_slice(&[0xc0, 0x0c, 0, 1, 0, 1, 0, 0, 0, 60, 0, 4, 127, 0, 0, 1]);
        }
        bytes
    }

    // Ignores the first `ignored` datagrams, answers the next one and
    // returns every datagram it saw.
    fn spawn_responder<F>(sock: Arc<UdpSocket>, ignored: usize, make_reply: F) -> JoinHandle<Vec<Vec<u8>>>
    where
        F: Fn(&[u8]) -> Vec<u8> + Send + 'static,
    {
        tokio::spawn(async move {
            let mut seen = Vec::new();
            let mut buf = [0u8; MAX_RESPONSE_SIZE];
            loop {
                let (n, peer) = sock.recv_from(&mut buf).await.unwrap();
                seen.push(buf[..n].to_vec());
                if seen.len() > ignored {
                    sock.send_to(&make_reply(&buf[..n]), peer).await.unwrap();
                    return seen;
                }
            }
        })
    }

    // Collects whatever is still queued at the mock server.
    async fn drain(sock: &UdpSocket) -> Vec<Vec<u8>> {
        let mut datagrams = Vec::new();
        let mut buf = [0u8; MAX_RESPONSE_SIZE];
        while let Ok(received) =
            tokio::time::timeout(Duration::from_millis(50), sock.recv_from(&mut buf)).await
        {
            let (n, _) = received.unwrap();
            datagrams.push(buf[..n].to_vec());
        }
        datagrams
    }

    #[tokio::test]
    async fn test_answer() {
        let (sock, addr) = mock_server().await;
        let server = spawn_responder(sock, 0, |query| reply(query, ID, 0));

        let resolution = resolver(addr, 1000, 3)
            .resolve_with_id(&NameQuery::a_record("www.mcgill.ca"), ID)
            .await
            .unwrap();

        assert_eq!(resolution.retries, 0);
        assert!(resolution.elapsed < Duration::from_millis(1000));
        let answers = resolution.response.answers();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].data(), &RecordData::A(Ipv4Addr::LOCALHOST));

        let seen = server.await.unwrap();
        assert_eq!(seen, vec![dns::encode_query("www.mcgill.ca", QType::A, ID).unwrap()]);
    }

    #[tokio::test]
    async fn test_retry_after_lost_datagram() {
        let (sock, addr) = mock_server().await;
        let server = spawn_responder(sock, 1, |query| reply(query, ID, 0));

        let resolution = resolver(addr, 200, 3)
            .resolve_with_id(&NameQuery::mx_record("mcgill.ca"), ID)
            .await
            .unwrap();
        assert_eq!(resolution.retries, 1);

        let seen = server.await.unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let (sock, addr) = mock_server().await;
        let timeout_ms = 100;
        let max_retries = 3;

        let started = Instant::now();
        let err = resolver(addr, timeout_ms, max_retries)
            .resolve_with_id(&NameQuery::ns_record("mcgill.ca"), ID)
            .await
            .unwrap_err();

        assert!(started.elapsed() >= Duration::from_millis(timeout_ms * u64::from(max_retries)));
        assert!(matches!(err, ResolveError::RetriesExhausted { retries: 3 }));
        assert_eq!(err.retries(), 3);

        // initial transmission plus three retries, all with the same id
        let datagrams = drain(&sock).await;
        assert_eq!(datagrams.len(), 4);
        for datagram in datagrams.iter() {
            assert_eq!(&datagram[0..2], &ID.to_be_bytes());
            assert_eq!(datagram, &datagrams[0]);
        }
    }

    #[tokio::test]
    async fn test_no_retries() {
        let (sock, addr) = mock_server().await;

        let err = resolver(addr, 50, 0)
            .resolve_with_id(&NameQuery::a_record("mcgill.ca"), ID)
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::RetriesExhausted { retries: 0 }));
        assert_eq!(drain(&sock).await.len(), 1);
    }

    #[tokio::test]
    async fn test_id_mismatch_is_not_retried() {
        let (sock, addr) = mock_server().await;
        let server = spawn_responder(sock.clone(), 0, |query| reply(query, ID ^ 0xffff, 0));

        let err = resolver(addr, 200, 3)
            .resolve_with_id(&NameQuery::a_record("mcgill.ca"), ID)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ResolveError::Decode {
                source: DecodeError::Protocol(ProtocolError::IdMismatch { .. }),
                retries: 0,
            }
        ));
        assert_eq!(server.await.unwrap().len(), 1);
        assert!(drain(&sock).await.is_empty());
    }

    #[tokio::test]
    async fn test_name_error() {
        let (sock, addr) = mock_server().await;
        let server = spawn_responder(sock, 0, |query| reply(query, ID, 3));

        let resolution = resolver(addr, 1000, 3)
            .resolve_with_id(&NameQuery::a_record("does-not-exist.mcgill.ca"), ID)
            .await
            .unwrap();

        assert!(resolution.response.is_not_found());
        assert!(resolution.response.answers().is_empty());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_failure() {
        let (sock, addr) = mock_server().await;
        let server = spawn_responder(sock, 0, |query| reply(query, ID, 2));

        let err = resolver(addr, 1000, 3)
            .resolve_with_id(&NameQuery::a_record("mcgill.ca"), ID)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ResolveError::Decode {
                source: DecodeError::Server(dns::ServerError::ServerFailure),
                ..
            }
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_name() {
        let addr = "127.0.0.1:53".parse().unwrap();
        let name = format!("{}.com", "a".repeat(64));

        let err = resolver(addr, 100, 0)
            .resolve(&NameQuery::a_record(&name))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Encode(_)));
        assert_eq!(err.retries(), 0);
    }

    #[tokio::test]
    #[ignore = "needs a reachable recursive resolver"]
    async fn test_resolve_live() {
        let server_addr = "8.8.8.8:53".parse().unwrap();
        let resolution = resolver(server_addr, 5000, 3)
            .resolve(&NameQuery::a_record("www.mcgill.ca"))
            .await
            .unwrap();

        let addresses = resolution.response.addresses();
        assert!(!addresses.is_empty());
        for addr in addresses {
            let octets: Vec<u16> = addr
                .to_string()
                .split('.')
                .map(|o| o.parse().unwrap())
                .collect();
            assert_eq!(octets.len(), 4);
            assert!(octets.iter().all(|o| *o <= 255));
        }
    }
}
