use std::sync::Arc;
use std::time::Duration;

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use url::Url;
use xerror::resolver::HttpError;

use crate::guard;
use crate::ClientSettings;

pub const ACCEPT_JSON: &str = "application/json";
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct HttpRequest<'a> {
    pub url: &'a Url,
    pub accept: &'static str,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound GET used by the resolver. Implementations are shared between
/// threads and must not keep per-request state.
pub trait HttpTransport: Send + Sync {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Dns resolver that only hands out addresses the host guard accepts, so the
/// connection goes to exactly the addresses that were checked.
pub struct GuardedResolver;

impl Resolve for GuardedResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let host = name.as_str().to_string();
        Box::pin(async move {
            let lookup = tokio::task::spawn_blocking(move || guard::resolve_checked(&host)).await?;
            let addresses: Addrs = Box::new(lookup?.into_iter());
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(addresses)
        })
    }
}

/// One pooled reqwest client driven by a runtime owned by the transport.
/// Redirects are not followed since the target of a redirect never went
/// through the guard.
pub struct ReqwestTransport {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

fn transport_error(err: impl std::fmt::Display) -> HttpError {
    HttpError::Transport(err.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout
    } else {
        transport_error(err)
    }
}

fn body_too_large() -> HttpError {
    HttpError::Transport(String::from("response body too large"))
}

impl ReqwestTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, HttpError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("lnurl-transport")
            .enable_all()
            .build()
            .map_err(transport_error)?;

        let client = {
            let _context = runtime.enter();
            let mut builder = reqwest::Client::builder()
                .user_agent(settings.user_agent.as_str())
                .redirect(reqwest::redirect::Policy::none());
            if settings.pin_resolved_hosts {
                builder = builder.dns_resolver(Arc::new(GuardedResolver));
            }
            builder.build().map_err(transport_error)?
        };

        Ok(Self { client, runtime })
    }

    async fn fetch(&self, request: &HttpRequest<'_>) -> Result<HttpResponse, HttpError> {
        let mut response = self
            .client
            .get(request.url.as_str())
            .header(reqwest::header::ACCEPT, request.accept)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        if response.content_length().unwrap_or(0) > MAX_BODY_BYTES {
            return Err(body_too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(map_reqwest_error)? {
            if (body.len() + chunk.len()) as u64 > MAX_BODY_BYTES {
                return Err(body_too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(HttpResponse { status, body })
    }
}

impl HttpTransport for ReqwestTransport {
    /// The deadline covers the lookup, the connection and the whole body.
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.runtime.block_on(async {
            tokio::time::timeout(request.timeout, self.fetch(request))
                .await
                .unwrap_or(Err(HttpError::Timeout))
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct TestServer {
        address: SocketAddr,
        connections: Arc<AtomicUsize>,
        requests: Arc<AtomicUsize>,
    }

    impl TestServer {
        fn url(&self, host: &str) -> Url {
            Url::parse(&format!("http://{}:{}/lnurlp/alice", host, self.address.port())).unwrap()
        }
    }

    fn header_end(buffer: &[u8]) -> Option<usize> {
        buffer.windows(4).position(|window| window == b"\r\n\r\n")
    }

    /// Answers every request on every connection with `reply` after `delay`.
    /// With `close` the connection is shut after the first answer.
    fn serve(reply: Vec<u8>, delay: Duration, close: bool) -> TestServer {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let server = TestServer {
            address: listener.local_addr().unwrap(),
            connections: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(AtomicUsize::new(0)),
        };
        let (connections, requests) = (server.connections.clone(), server.requests.clone());
        let reply = Arc::new(reply);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let mut stream = match stream {
                    Ok(stream) => stream,
                    Err(_) => return,
                };
                connections.fetch_add(1, Ordering::SeqCst);
                let (requests, reply) = (requests.clone(), reply.clone());
                thread::spawn(move || {
                    let mut buffer = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        let read = match stream.read(&mut chunk) {
                            Ok(0) | Err(_) => return,
                            Ok(read) => read,
                        };
                        buffer.extend_from_slice(&chunk[..read]);
                        while let Some(end) = header_end(&buffer) {
                            buffer.drain(..end + 4);
                            requests.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(delay);
                            if stream.write_all(&reply).is_err() || close {
                                return;
                            }
                        }
                    }
                });
            }
        });
        server
    }

    fn json_reply(body: &str) -> Vec<u8> {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        )
        .into_bytes()
    }

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(&ClientSettings::default()).unwrap()
    }

    fn get(transport: &ReqwestTransport, url: &Url, timeout: Duration) -> Result<HttpResponse, HttpError> {
        transport.get(&HttpRequest {
            url,
            accept: ACCEPT_JSON,
            timeout,
        })
    }

    #[test]
    fn test_success_range() {
        let response = HttpResponse {
            status: 204,
            body: vec![],
        };
        assert!(response.is_success());
        let response = HttpResponse {
            status: 302,
            body: vec![],
        };
        assert!(!response.is_success());
    }

    #[test]
    fn test_requests_share_one_connection() {
        let server = serve(json_reply("{\"tag\":\"payRequest\"}"), Duration::ZERO, false);
        let transport = transport();
        let url = server.url("127.0.0.1");

        for _ in 0..3 {
            let response = get(&transport, &url, Duration::from_secs(5)).unwrap();
            assert_eq!(response.status, 200);
            assert_eq!(response.body, b"{\"tag\":\"payRequest\"}".to_vec());
        }
        assert_eq!(server.requests.load(Ordering::SeqCst), 3);
        assert_eq!(server.connections.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_redirect_is_not_followed() {
        let reply = "HTTP/1.1 302 Found\r\nLocation: http://169.254.169.254/latest\r\nContent-Length: 0\r\n\r\n";
        let server = serve(reply.as_bytes().to_vec(), Duration::ZERO, false);

        let response = get(&transport(), &server.url("127.0.0.1"), Duration::from_secs(5)).unwrap();
        assert_eq!(response.status, 302);
        assert!(!response.is_success());
        assert_eq!(server.requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_oversized_body_is_rejected() {
        let body = "a".repeat(MAX_BODY_BYTES as usize + 1);
        let server = serve(json_reply(&body), Duration::ZERO, false);
        assert_eq!(
            get(&transport(), &server.url("127.0.0.1"), Duration::from_secs(5)).unwrap_err(),
            body_too_large()
        );

        // no content length, the limit applies while streaming
        let mut reply = b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n".to_vec();
        reply.extend_from_slice(body.as_bytes());
        let server = serve(reply, Duration::ZERO, true);
        assert_eq!(
            get(&transport(), &server.url("127.0.0.1"), Duration::from_secs(5)).unwrap_err(),
            body_too_large()
        );
    }

    #[test]
    fn test_slow_server_times_out() {
        let server = serve(json_reply("{}"), Duration::from_secs(3), false);
        assert_eq!(
            get(&transport(), &server.url("127.0.0.1"), Duration::from_millis(200)).unwrap_err(),
            HttpError::Timeout
        );
    }

    #[test]
    fn test_private_hostname_is_never_connected() {
        let server = serve(json_reply("{}"), Duration::ZERO, false);
        let result = get(&transport(), &server.url("localhost"), Duration::from_secs(5));
        assert!(matches!(result, Err(HttpError::Transport(_))));
        assert_eq!(server.connections.load(Ordering::SeqCst), 0);
    }
}
