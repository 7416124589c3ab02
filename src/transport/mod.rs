//! Synchronous peer transport (spec.md §4.A): `Broadcast` and `AllToAll`,
//! each followed by an implicit empty-payload barrier, over HTTP with a
//! per-peer monotonic clock gating stale or early deliveries.
//!
//! Grounded on the teacher's `src/server/bootstrap.rs` (axum server
//! lifecycle) and `src/server/error.rs` (status-code error boundary); the
//! round-collection handshake itself has no direct teacher analog and is
//! built fresh in the same idiom (see DESIGN.md).

pub mod clock;
pub mod codec;
pub mod logging;
pub mod server;
pub mod tls;

mod client;

use std::collections::{BTreeMap, BTreeSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use clock::PeerClock;
use codec::{RoundEnvelope, RoundKind};
use server::{build_router, ListenerState, RoundSlot};
use tls::TlsConfig;

const LOG_TARGET: &str = "transport";

/// Default deadline for a Broadcast/AllToAll call that doesn't specify one
/// explicitly. spec.md leaves this ambient; the teacher's HTTP client calls
/// size timeouts in the tens of seconds, so the same order of magnitude is
/// used here.
pub const DEFAULT_ROUND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport call timed out and the listener has been closed")]
    Timeout,
    #[error("transport has already been closed")]
    Closed,
    #[error("unknown peer rank {0}")]
    UnknownPeer(usize),
    #[error("peer request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),
    #[error("tls configuration error: {0}")]
    Tls(#[source] anyhow::Error),
}

/// Group-wide addressing and identity for one peer's transport instance.
pub struct PeerTransportConfig {
    pub rank: usize,
    /// Base URL (e.g. `https://10.0.0.4:7000`) for every rank in the group,
    /// including this peer's own rank.
    pub addresses: BTreeMap<usize, String>,
    pub listen_addr: SocketAddr,
    pub tls: Option<TlsConfig>,
}

/// spec.md §4.A's peer-to-peer primitive. `Broadcast`/`AllToAll` and their
/// `*WithTimeout` variants all drive an implicit empty-payload barrier after
/// the data phase completes, so every peer leaves the call only once the
/// whole group has caught up.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn broadcast(&self, data: Vec<u8>, root: usize) -> Result<Vec<u8>, TransportError>;
    async fn broadcast_with_timeout(
        &self,
        data: Vec<u8>,
        root: usize,
        deadline: Duration,
    ) -> Result<Vec<u8>, TransportError>;
    async fn all_to_all(&self, data: Vec<u8>) -> Result<BTreeMap<usize, Vec<u8>>, TransportError>;
    async fn all_to_all_with_timeout(
        &self,
        data: Vec<u8>,
        deadline: Duration,
    ) -> Result<BTreeMap<usize, Vec<u8>>, TransportError>;
    fn rank(&self) -> usize;
    fn peer_count(&self) -> usize;
    fn addresses(&self) -> &BTreeMap<usize, String>;
    async fn close(&self);
}

/// HTTP-backed `PeerTransport`. One axum server listens for this peer's
/// incoming rounds; one shared `reqwest::Client` drives outgoing sends.
pub struct HttpPeerTransport {
    rank: usize,
    addresses: BTreeMap<usize, String>,
    clock: Arc<PeerClock>,
    slot: Arc<RoundSlot>,
    http: reqwest::Client,
    server: JoinHandle<()>,
    closed: AtomicBool,
}

impl HttpPeerTransport {
    pub async fn bind(config: PeerTransportConfig) -> Result<Self, TransportError> {
        let slot = Arc::new(RoundSlot::new());
        let listener_state = Arc::new(ListenerState {
            rank: config.rank,
            slot: slot.clone(),
        });
        let router = build_router(listener_state);

        let http = match &config.tls {
            Some(tls) => tls.build_client().map_err(TransportError::Tls)?,
            None => reqwest::Client::new(),
        };

        let listen_addr = config.listen_addr;
        let tls = config.tls.clone();
        let server: JoinHandle<()> = match tls {
            Some(tls) => {
                let server_config = tls.into_server_config().await.map_err(TransportError::Tls)?;
                tokio::spawn(async move {
                    if let Err(err) = axum_server::bind_rustls(listen_addr, server_config)
                        .serve(router.into_make_service())
                        .await
                    {
                        warn!(target: LOG_TARGET, %err, "tls listener exited");
                    }
                })
            }
            None => tokio::spawn(async move {
                match tokio::net::TcpListener::bind(listen_addr).await {
                    Ok(listener) => {
                        if let Err(err) = axum::serve(listener, router.into_make_service()).await {
                            warn!(target: LOG_TARGET, %err, "listener exited");
                        }
                    }
                    Err(err) => warn!(target: LOG_TARGET, %err, "failed to bind listener"),
                }
            }),
        };

        info!(target: LOG_TARGET, rank = config.rank, %listen_addr, "peer transport listening");

        Ok(HttpPeerTransport {
            rank: config.rank,
            addresses: config.addresses,
            clock: Arc::new(PeerClock::new()),
            slot,
            http,
            server,
            closed: AtomicBool::new(false),
        })
    }

    fn other_ranks(&self) -> BTreeSet<usize> {
        self.addresses
            .keys()
            .copied()
            .filter(|&r| r != self.rank)
            .collect()
    }

    fn ensure_open(&self) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(TransportError::Closed)
        } else {
            Ok(())
        }
    }

    async fn destination(&self, rank: usize) -> Result<&str, TransportError> {
        self.addresses
            .get(&rank)
            .map(String::as_str)
            .ok_or(TransportError::UnknownPeer(rank))
    }

    /// Runs the implicit empty-payload barrier: every peer sends an empty
    /// payload to every other peer and waits to collect one from each.
    async fn barrier(&self, clock: u64, deadline: Duration) -> Result<(), TransportError> {
        let expected = self.other_ranks();
        self.slot.arm(clock, expected.clone()).await;

        for &peer in &expected {
            let destination = self.destination(peer).await?;
            let envelope = RoundEnvelope {
                sender_rank: self.rank,
                clock,
                kind: RoundKind::Barrier,
                payload: Vec::new(),
            };
            client::send_round(&self.http, destination, peer, &envelope, deadline).await?;
        }

        tokio::time::timeout(deadline, self.slot.wait_for_completion())
            .await
            .map(|_| ())
            .map_err(|_| TransportError::Timeout)
    }

    async fn fail_timeout(&self) -> TransportError {
        self.slot.disarm().await;
        self.server.abort();
        self.closed.store(true, Ordering::SeqCst);
        TransportError::Timeout
    }
}

#[async_trait]
impl PeerTransport for HttpPeerTransport {
    async fn broadcast(&self, data: Vec<u8>, root: usize) -> Result<Vec<u8>, TransportError> {
        self.broadcast_with_timeout(data, root, DEFAULT_ROUND_TIMEOUT)
            .await
    }

    async fn broadcast_with_timeout(
        &self,
        data: Vec<u8>,
        root: usize,
        deadline: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        self.ensure_open()?;
        let clock = self.clock.current();
        let result = self.run_broadcast(&data, root, clock, deadline).await;
        match result {
            Ok(received) => {
                self.clock.advance();
                Ok(received)
            }
            Err(_) => Err(self.fail_timeout().await),
        }
    }

    async fn all_to_all(&self, data: Vec<u8>) -> Result<BTreeMap<usize, Vec<u8>>, TransportError> {
        self.all_to_all_with_timeout(data, DEFAULT_ROUND_TIMEOUT)
            .await
    }

    async fn all_to_all_with_timeout(
        &self,
        data: Vec<u8>,
        deadline: Duration,
    ) -> Result<BTreeMap<usize, Vec<u8>>, TransportError> {
        self.ensure_open()?;
        let clock = self.clock.current();
        let result = self.run_all_to_all(&data, clock, deadline).await;
        match result {
            Ok(received) => {
                self.clock.advance();
                Ok(received)
            }
            Err(_) => Err(self.fail_timeout().await),
        }
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn peer_count(&self) -> usize {
        self.addresses.len()
    }

    fn addresses(&self) -> &BTreeMap<usize, String> {
        &self.addresses
    }

    async fn close(&self) {
        self.slot.disarm().await;
        self.server.abort();
        self.closed.store(true, Ordering::SeqCst);
        info!(target: LOG_TARGET, rank = self.rank, "peer transport closed");
    }
}

impl HttpPeerTransport {
    async fn run_broadcast(
        &self,
        data: &[u8],
        root: usize,
        clock: u64,
        deadline: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let received = if root == self.rank {
            for &peer in &self.other_ranks() {
                let destination = self.destination(peer).await?;
                let envelope = RoundEnvelope {
                    sender_rank: self.rank,
                    clock,
                    kind: RoundKind::Data,
                    payload: data.to_vec(),
                };
                client::send_round(&self.http, destination, peer, &envelope, deadline).await?;
            }
            data.to_vec()
        } else {
            self.slot.arm(clock, BTreeSet::from([root])).await;
            let mut collected = tokio::time::timeout(deadline, self.slot.wait_for_completion())
                .await
                .map_err(|_| TransportError::Timeout)?;
            collected.remove(&root).unwrap_or_default()
        };

        self.barrier(clock, deadline).await?;
        Ok(received)
    }

    async fn run_all_to_all(
        &self,
        data: &[u8],
        clock: u64,
        deadline: Duration,
    ) -> Result<BTreeMap<usize, Vec<u8>>, TransportError> {
        let others = self.other_ranks();
        self.slot.arm(clock, others.clone()).await;

        for &peer in &others {
            let destination = self.destination(peer).await?;
            let envelope = RoundEnvelope {
                sender_rank: self.rank,
                clock,
                kind: RoundKind::Data,
                payload: data.to_vec(),
            };
            client::send_round(&self.http, destination, peer, &envelope, deadline).await?;
        }

        let mut collected = tokio::time::timeout(deadline, self.slot.wait_for_completion())
            .await
            .map_err(|_| TransportError::Timeout)?;
        collected.insert(self.rank, data.to_vec());

        self.barrier(clock, deadline).await?;
        Ok(collected)
    }
}
