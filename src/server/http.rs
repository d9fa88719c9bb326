use std::fmt::{self, Display};
use std::io;
use std::net::{SocketAddr, SocketAddrV4};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, Semaphore};

use crate::bridge::Bridge;
use crate::error::{ApiError, ApiResult};
use crate::routes::{Request, Response};
use crate::server::Service;

/// Requests larger than this are dropped unanswered
const MAX_REQUEST_SIZE: usize = 64 * 1024;

const READ_CHUNK: usize = 1024;

/// Pause after a failed accept, so fd exhaustion does not spin the loop
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Per-connection context, owned by the connection task
#[derive(Debug, Clone, Copy)]
pub struct ClientContext {
    pub seq: u64,
    pub peer: SocketAddr,
}

impl Display for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client #{} ({})", self.seq, self.peer)
    }
}

pub struct HttpService {
    addr: SocketAddrV4,
    bridge: Arc<Mutex<Bridge>>,
    slots: Arc<Semaphore>,
    rx_timeout: Duration,
    listener: Option<TcpListener>,
}

impl HttpService {
    #[must_use]
    pub fn new(
        addr: SocketAddrV4,
        bridge: Arc<Mutex<Bridge>>,
        max_clients: usize,
        rx_timeout: Duration,
    ) -> Self {
        Self {
            addr,
            bridge,
            slots: Arc::new(Semaphore::new(max_clients)),
            rx_timeout,
            listener: None,
        }
    }

    /// Local address, once started
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref()?.local_addr().ok()
    }
}

#[async_trait]
impl Service for HttpService {
    async fn start(&mut self) -> ApiResult<()> {
        let listener = TcpListener::bind(self.addr).await?;
        log::info!("Http server listening on {}", listener.local_addr()?);
        self.listener = Some(listener);
        Ok(())
    }

    async fn run(&mut self) -> ApiResult<()> {
        let Some(listener) = &self.listener else {
            return Err(ApiError::service_error("Http server not started"));
        };

        let mut seq = 0;
        loop {
            let Some((stream, peer)) = accepted(listener.accept().await).await else {
                continue;
            };
            seq += 1;
            let ctx = ClientContext { seq, peer };

            let Ok(permit) = self.slots.clone().try_acquire_owned() else {
                log::warn!("[{ctx}] Too many clients, closing connection");
                continue;
            };

            let bridge = self.bridge.clone();
            let rx_timeout = self.rx_timeout;

            tokio::spawn(async move {
                if let Err(err) = handle_client(stream, ctx, &bridge, rx_timeout).await {
                    log::debug!("[{ctx}] Connection error: {err}");
                }
                drop(permit);
            });
        }
    }

    async fn stop(&mut self) -> ApiResult<()> {
        self.listener = None;
        Ok(())
    }
}

/// Accept errors concern a single client and never stop the listener
async fn accepted(res: io::Result<(TcpStream, SocketAddr)>) -> Option<(TcpStream, SocketAddr)> {
    match res {
        Ok(conn) => Some(conn),
        Err(err) => {
            log::warn!("Failed to accept connection: {err}");
            tokio::time::sleep(ACCEPT_BACKOFF).await;
            None
        }
    }
}

/// Read one complete request, or `None` when the client hangs up, idles for
/// longer than `rx_timeout` before finishing the headers, or sends too much.
async fn read_request(
    stream: &mut TcpStream,
    ctx: ClientContext,
    rx_timeout: Duration,
) -> ApiResult<Option<Vec<u8>>> {
    let mut buf = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        if let Some(len) = Request::complete_len(&buf) {
            buf.truncate(len);
            return Ok(Some(buf));
        }

        let Ok(res) = tokio::time::timeout(rx_timeout, stream.read(&mut chunk)).await else {
            if Request::header_len(&buf).is_some() {
                // no length and no body: answer what we have
                return Ok(Some(buf));
            }
            log::debug!("[{ctx}] Idle for {rx_timeout:?}, closing connection");
            return Ok(None);
        };

        let n = res?;
        if n == 0 {
            // eof: a client closing its write half still gets an answer
            return Ok((!buf.is_empty()).then_some(buf));
        }

        buf.extend_from_slice(&chunk[..n]);

        if buf.len() > MAX_REQUEST_SIZE {
            log::warn!("[{ctx}] Request too large, closing connection");
            return Ok(None);
        }
    }
}

async fn handle_client(
    mut stream: TcpStream,
    ctx: ClientContext,
    bridge: &Mutex<Bridge>,
    rx_timeout: Duration,
) -> ApiResult<()> {
    let Some(data) = read_request(&mut stream, ctx, rx_timeout).await? else {
        return Ok(());
    };

    let req = Request::parse(&data);
    log::debug!("[{ctx}] {} {}", req.method, req.path);

    let result = bridge.lock().await.handle_request(&req);

    let res = match result {
        Ok(Some(res)) => res,
        Ok(None) => Response::not_found(),
        Err(err) => {
            log::error!("[{ctx}] Request failed: {err}");
            Response::internal_error()
        }
    };

    stream.write_all(&res.to_bytes()).await?;
    stream.shutdown().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::net::{Ipv4Addr, SocketAddrV4};
    use std::sync::Arc;
    use std::time::Duration;

    use mac_address::MacAddress;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::Mutex;

    use crate::bridge::Bridge;
    use crate::model::identity::HostIdentity;
    use crate::server::Service;
    use crate::server::http::{HttpService, accepted};

    async fn service(max_clients: usize) -> (HttpService, Arc<Mutex<Bridge>>) {
        let identity = HostIdentity::new(
            Ipv4Addr::LOCALHOST,
            80,
            MacAddress::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
        );
        let mut bridge = Bridge::new(identity);
        bridge.lights.add("Kitchen");
        let bridge = Arc::new(Mutex::new(bridge));

        let mut svc = HttpService::new(
            SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0),
            bridge.clone(),
            max_clients,
            Duration::from_millis(200),
        );
        svc.start().await.unwrap();
        (svc, bridge)
    }

    async fn exchange(stream: &mut TcpStream, request: &[u8]) -> String {
        stream.write_all(request).await.unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).await.unwrap();
        reply
    }

    #[tokio::test]
    async fn serves_requests() {
        let (mut svc, bridge) = service(10).await;
        let addr = svc.local_addr().unwrap();
        tokio::spawn(async move { svc.run().await });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let reply = exchange(
            &mut stream,
            b"PUT /api/user/lights/1/state HTTP/1.1\r\nContent-Length: 11\r\n\r\n{\"bri\":120}",
        )
        .await;

        assert!(reply.starts_with("HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n"));
        assert!(reply.contains(r#"{"success":{"/lights/1/state/bri":120}}"#));
        assert_eq!(bridge.lock().await.lights.state(0_usize).unwrap().bri, 120);
    }

    #[tokio::test]
    async fn accept_errors_are_skipped() {
        let emfile = io::Error::from_raw_os_error(24);
        assert!(accepted(Err(emfile)).await.is_none());

        let aborted = io::Error::from(io::ErrorKind::ConnectionAborted);
        assert!(accepted(Err(aborted)).await.is_none());
    }

    #[tokio::test]
    async fn body_without_content_length() {
        let (mut svc, bridge) = service(10).await;
        let addr = svc.local_addr().unwrap();
        tokio::spawn(async move { svc.run().await });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let reply = exchange(
            &mut stream,
            b"PUT /api/user/lights/1/state HTTP/1.1\r\nHost: bridge\r\n\r\n{\"bri\":80}",
        )
        .await;
        assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"));
        assert_eq!(bridge.lock().await.lights.state(0_usize).unwrap().bri, 80);

        // body in a later segment
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"PUT /api/user/lights/1/state HTTP/1.1\r\n\r\n")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let reply = exchange(&mut stream, b"{\"bri\":90}").await;
        assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"));
        assert_eq!(bridge.lock().await.lights.state(0_usize).unwrap().bri, 90);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let (mut svc, _bridge) = service(10).await;
        let addr = svc.local_addr().unwrap();
        tokio::spawn(async move { svc.run().await });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let reply = exchange(&mut stream, b"GET /index.html HTTP/1.1\r\n\r\n").await;
        assert!(reply.starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[tokio::test]
    async fn idle_connection_is_closed() {
        let (mut svc, _bridge) = service(10).await;
        let addr = svc.local_addr().unwrap();
        tokio::spawn(async move { svc.run().await });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET /descr").await.unwrap();

        let mut reply = vec![];
        let n = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut reply))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn excess_clients_are_rejected() {
        let (mut svc, _bridge) = service(1).await;
        let addr = svc.local_addr().unwrap();
        tokio::spawn(async move { svc.run().await });

        // holds the only slot until it times out
        let _first = TcpStream::connect(addr).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let mut second = TcpStream::connect(addr).await.unwrap();
        let mut reply = vec![];
        let n = tokio::time::timeout(Duration::from_secs(5), second.read_to_end(&mut reply))
            .await
            .unwrap()
            .unwrap_or(0);
        assert_eq!(n, 0);
    }
}
