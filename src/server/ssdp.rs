use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;

use crate::bridge::Bridge;
use crate::config::SsdpConfig;
use crate::error::{ApiError, ApiResult};
use crate::server::Service;

/// Probes are small; anything past this is cut off
const MAX_DATAGRAM: usize = 1500;

pub struct SsdpService {
    conf: SsdpConfig,
    ip: Ipv4Addr,
    bridge: Arc<Mutex<Bridge>>,
    socket: Option<UdpSocket>,
}

impl SsdpService {
    #[must_use]
    pub const fn new(conf: SsdpConfig, ip: Ipv4Addr, bridge: Arc<Mutex<Bridge>>) -> Self {
        Self {
            conf,
            ip,
            bridge,
            socket: None,
        }
    }
}

#[async_trait]
impl Service for SsdpService {
    async fn start(&mut self) -> ApiResult<()> {
        let addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, self.conf.port);
        let socket = UdpSocket::bind(addr).await?;
        socket.join_multicast_v4(self.conf.multicast_address, self.ip)?;

        log::info!(
            "Ssdp responder listening on {}:{} (interface {})",
            self.conf.multicast_address,
            self.conf.port,
            self.ip
        );

        self.socket = Some(socket);
        Ok(())
    }

    async fn run(&mut self) -> ApiResult<()> {
        let Some(socket) = &self.socket else {
            return Err(ApiError::service_error("Ssdp responder not started"));
        };

        let mut buf = vec![0u8; MAX_DATAGRAM];
        loop {
            let (len, peer) = match socket.recv_from(&mut buf).await {
                Ok(res) => res,
                Err(err) => {
                    log::warn!("Ssdp receive failed: {err}");
                    continue;
                }
            };

            answer_datagram(socket, &self.bridge, &buf[..len], peer).await;
        }
    }

    async fn stop(&mut self) -> ApiResult<()> {
        if let Some(socket) = self.socket.take() {
            log::debug!("Leaving multicast group {}", self.conf.multicast_address);
            socket.leave_multicast_v4(self.conf.multicast_address, self.ip)?;
        }
        Ok(())
    }
}

/// Answer one datagram. A failed reply only concerns that peer, so it is
/// logged and dropped.
async fn answer_datagram(
    socket: &UdpSocket,
    bridge: &Mutex<Bridge>,
    payload: &[u8],
    peer: SocketAddr,
) {
    let reply = bridge.lock().await.handle_probe(payload);
    let Some(reply) = reply else {
        return;
    };

    log::debug!("Discovery probe from {peer}, replying");
    if let Err(err) = socket.send_to(reply.as_bytes(), peer).await {
        log::warn!("Discovery reply to {peer} failed: {err}");
    }
}
