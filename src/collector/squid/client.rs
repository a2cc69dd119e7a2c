//! Client for the proxy manager interface.
//!
//! The request is a bare HTTP/1.0 GET written on a raw socket. The response
//! is read until the proxy closes the connection. The cleartext port is
//! tried first and the TLS port second; the first attempt that yields any
//! bytes wins.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use native_tls::TlsConnector;
use tracing::debug;

use crate::collector::error::CollectError;
use crate::config::MonitorConfig;
use crate::model::ProxyStatus;

use super::parser::{decode_response, parse_manager_info};

/// Server name sent during the TLS handshake. Certificates are not checked.
const TLS_SERVER_NAME: &str = "localhost";

/// How bytes are carried to the manager port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Plain,
    Tls,
}

/// One step of the fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub transport: Transport,
    pub port: u16,
    /// Applied to connect, handshake, each write and each read.
    pub timeout: Duration,
}

/// Fetches operational counters from the proxy manager.
#[derive(Debug, Clone)]
pub struct SquidClient {
    host: String,
    path: String,
    attempts: Vec<Attempt>,
}

impl SquidClient {
    /// Creates a client with an explicit attempt sequence.
    pub fn new(host: impl Into<String>, path: impl Into<String>, attempts: Vec<Attempt>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            attempts,
        }
    }

    /// Cleartext on the HTTP port, then TLS on the HTTPS port.
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(
            config.manager_host.clone(),
            config.manager_path.clone(),
            vec![
                Attempt {
                    transport: Transport::Plain,
                    port: config.http_port,
                    timeout: config.plain_timeout,
                },
                Attempt {
                    transport: Transport::Tls,
                    port: config.https_port,
                    timeout: config.tls_timeout,
                },
            ],
        )
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// The request sent to the manager port.
    pub fn request(&self) -> Vec<u8> {
        format!(
            "GET {} HTTP/1.0\r\nHost: localhost\r\nAccept: */*\r\n\r\n",
            self.path
        )
        .into_bytes()
    }

    /// Counters reported by the proxy, all zero when it cannot be reached.
    pub fn status(&self) -> ProxyStatus {
        match self.fetch() {
            Some(body) => parse_manager_info(&decode_response(&body)),
            None => ProxyStatus::default(),
        }
    }

    /// Raw response of the first attempt that returned any bytes.
    pub fn fetch(&self) -> Option<Vec<u8>> {
        let request = self.request();

        for attempt in &self.attempts {
            match self.try_attempt(attempt, &request) {
                Ok(body) => {
                    debug!(
                        "manager responded on port {} ({:?}, {} bytes)",
                        attempt.port,
                        attempt.transport,
                        body.len()
                    );
                    return Some(body);
                }
                Err(e) => {
                    debug!(
                        "manager attempt on port {} ({:?}) failed: {}",
                        attempt.port, attempt.transport, e
                    );
                }
            }
        }

        None
    }

    fn try_attempt(&self, attempt: &Attempt, request: &[u8]) -> Result<Vec<u8>, CollectError> {
        let stream = self.connect(attempt.port, attempt.timeout)?;

        let body = match attempt.transport {
            Transport::Plain => exchange(stream, request)?,
            Transport::Tls => {
                let connector = TlsConnector::builder()
                    .danger_accept_invalid_certs(true)
                    .danger_accept_invalid_hostnames(true)
                    .build()
                    .map_err(|e| CollectError::Tls(e.to_string()))?;
                let tls = connector
                    .connect(TLS_SERVER_NAME, stream)
                    .map_err(|e| CollectError::Tls(e.to_string()))?;
                exchange(tls, request)?
            }
        };

        if body.is_empty() {
            return Err(CollectError::EmptyResponse);
        }
        Ok(body)
    }

    fn connect(&self, port: u16, timeout: Duration) -> Result<TcpStream, CollectError> {
        let addr = self.resolve(port)?;
        let stream = TcpStream::connect_timeout(&addr, timeout)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        Ok(stream)
    }

    fn resolve(&self, port: u16) -> Result<SocketAddr, CollectError> {
        (self.host.as_str(), port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| CollectError::parse(format!("no address for {}", self.host)))
    }
}

/// Writes the request and reads until the peer closes.
///
/// A read error after some bytes arrived keeps what was received.
fn exchange<S: Read + Write>(mut stream: S, request: &[u8]) -> Result<Vec<u8>, CollectError> {
    stream.write_all(request)?;
    stream.flush()?;

    let mut body = Vec::new();
    if let Err(e) = stream.read_to_end(&mut body) {
        if body.is_empty() {
            return Err(e.into());
        }
        debug!("manager read ended early after {} bytes: {}", body.len(), e);
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serves one connection: reads the request head, answers with `response`
    /// and closes. The received request is sent back over the channel.
    fn fake_manager(response: &'static str) -> (u16, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request = String::new();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    request.push_str(&line);
                    break;
                }
                request.push_str(&line);
            }
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send(request);
        });

        (port, rx)
    }

    /// Writes `bytes` as soon as a connection arrives, without reading.
    fn blurting_server(bytes: &'static [u8]) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let _ = stream.write_all(bytes);
            }
        });
        port
    }

    /// Serves one TLS connection with a throwaway self-signed certificate.
    fn tls_manager(response: &'static str) -> u16 {
        let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let identity = native_tls::Identity::from_pkcs8(
            cert.cert.pem().as_bytes(),
            cert.key_pair.serialize_pem().as_bytes(),
        )
        .unwrap();
        let acceptor = native_tls::TlsAcceptor::new(identity).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let Ok(mut tls) = acceptor.accept(stream) else {
                return;
            };
            let mut head = Vec::new();
            let mut byte = [0u8; 1];
            while !head.ends_with(b"\r\n\r\n") {
                match tls.read(&mut byte) {
                    Ok(1) => head.push(byte[0]),
                    _ => return,
                }
            }
            let _ = tls.write_all(response.as_bytes());
            let _ = tls.shutdown();
        });
        port
    }

    /// A port with nothing listening on it.
    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    fn plain(port: u16) -> Attempt {
        Attempt {
            transport: Transport::Plain,
            port,
            timeout: Duration::from_millis(500),
        }
    }

    fn tls(port: u16) -> Attempt {
        Attempt {
            transport: Transport::Tls,
            port,
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_request_line() {
        let client = SquidClient::from_config(&MonitorConfig::default());
        assert_eq!(
            client.request(),
            b"GET /squid-internal-mgr/info HTTP/1.0\r\nHost: localhost\r\nAccept: */*\r\n\r\n"
                .to_vec()
        );
    }

    #[test]
    fn test_from_config_attempt_order() {
        let client = SquidClient::from_config(&MonitorConfig::default());
        assert_eq!(
            client.attempts(),
            &[
                Attempt {
                    transport: Transport::Plain,
                    port: 3128,
                    timeout: Duration::from_millis(500),
                },
                Attempt {
                    transport: Transport::Tls,
                    port: 3129,
                    timeout: Duration::from_secs(1),
                },
            ]
        );
    }

    #[test]
    fn test_status_over_plaintext() {
        let (port, rx) = fake_manager(
            "HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n\tNumber of HTTP requests received:\t42\n\tCache Hits:          120 ( 40%)\n",
        );
        let client = SquidClient::new("127.0.0.1", "/squid-internal-mgr/info", vec![plain(port)]);

        let status = client.status();
        assert_eq!(status.requests_total, 42);
        assert_eq!(status.cache_hits, 120);

        let request = rx.recv().unwrap();
        assert!(request.starts_with("GET /squid-internal-mgr/info HTTP/1.0\r\n"));
        assert!(request.contains("Host: localhost\r\n"));
        assert!(request.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_unreachable_proxy_gives_defaults() {
        let client = SquidClient::new(
            "127.0.0.1",
            "/squid-internal-mgr/info",
            vec![plain(closed_port()), tls(closed_port())],
        );
        assert_eq!(client.fetch(), None);
        assert_eq!(client.status(), ProxyStatus::default());
    }

    #[test]
    fn test_empty_plaintext_response_falls_through() {
        let (empty_port, _rx) = fake_manager("");
        let (good_port, _rx2) = fake_manager("Number of HTTP requests received: 7\n");
        // The second attempt is plain as well so the test needs no TLS server.
        let client = SquidClient::new(
            "127.0.0.1",
            "/squid-internal-mgr/info",
            vec![plain(empty_port), plain(good_port)],
        );
        assert_eq!(client.status().requests_total, 7);
    }

    #[test]
    fn test_first_success_short_circuits() {
        let (port, _rx) = fake_manager("Cache Misses: 9 (100%)\n");
        let client = SquidClient::new(
            "127.0.0.1",
            "/squid-internal-mgr/info",
            vec![plain(port), plain(closed_port())],
        );
        assert_eq!(client.status().cache_misses, 9);
    }

    #[test]
    fn test_tls_against_plaintext_server_fails_cleanly() {
        let port = blurting_server(b"HTTP/1.0 400 Bad Request\r\n\r\n");
        let client = SquidClient::new("127.0.0.1", "/squid-internal-mgr/info", vec![tls(port)]);
        assert_eq!(client.status(), ProxyStatus::default());
    }

    #[test]
    fn test_tls_fallback_reads_counters() {
        let port = tls_manager(
            "HTTP/1.1 200 OK\r\n\r\n\tNumber of HTTP requests received:\t77\n\tByte Hit Ratio:       12.5%  30.0%\n",
        );
        let client = SquidClient::new(
            "127.0.0.1",
            "/squid-internal-mgr/info",
            vec![plain(closed_port()), tls(port)],
        );

        let status = client.status();
        assert_eq!(status.requests_total, 77);
        assert_eq!(status.byte_hit_ratio, 12.5);
        assert_eq!(status.cache_hits, 0);
    }

    #[test]
    fn test_unresolvable_host() {
        let client = SquidClient::new(
            "host.invalid",
            "/squid-internal-mgr/info",
            vec![plain(3128)],
        );
        assert_eq!(client.status(), ProxyStatus::default());
    }
}
