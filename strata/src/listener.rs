//! The TCP accept loop: binds a socket, owns the per-listener RSA keypair
//! and verify token, and publishes fully-logged-in connections to callers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use strata_crypto::KeyPair;
use tokio::net::TcpListener as TokioTcpListener;
use tokio::sync::{Mutex as AsyncMutex, RwLock, mpsc};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::ServerConfig;
use crate::connection::{Connection, run_pre_login};
use crate::status::Status;

/// State every pre-login and play connection needs a reference to.
pub struct ListenerShared {
    pub key_pair: KeyPair,
    pub verify_token: [u8; 4],
    pub config: ServerConfig,
    pub status: RwLock<Status>,
    pub cancel_token: CancellationToken,
}

/// Accepts inbound TCP connections, drives each one through the
/// handshake/status/login sub-protocol, and hands fully authenticated Play
/// connections to the embedding application through [`Self::accept`].
pub struct Listener {
    shared: Arc<ListenerShared>,
    incoming: AsyncMutex<mpsc::Receiver<Connection>>,
    task_tracker: TaskTracker,
    local_addr: std::net::SocketAddr,
}

impl Listener {
    /// Binds `config.server_address`, generates a fresh RSA keypair and
    /// verify token, and starts the accept loop.
    ///
    /// # Errors
    /// Returns the `std::io::Error` from binding the socket.
    pub async fn listen(config: ServerConfig, initial_status: Status) -> std::io::Result<Self> {
        let tcp_listener = TokioTcpListener::bind(config.server_address).await?;
        let local_addr = tcp_listener.local_addr()?;
        tracing::info!(addr = %local_addr, "listening");

        let shared = Arc::new(ListenerShared {
            key_pair: KeyPair::generate(),
            verify_token: rand::random(),
            config,
            status: RwLock::new(initial_status),
            cancel_token: CancellationToken::new(),
        });

        let (incoming_tx, incoming_rx) = mpsc::channel(64);
        let task_tracker = TaskTracker::new();
        let client_id = Arc::new(AtomicU64::new(0));

        let accept_shared = shared.clone();
        let accept_tracker = task_tracker.clone();
        task_tracker.spawn(async move {
            loop {
                tokio::select! {
                    () = accept_shared.cancel_token.cancelled() => break,
                    accepted = tcp_listener.accept() => {
                        let Ok((stream, address)) = accepted else { continue };
                        if let Err(err) = stream.set_nodelay(true) {
                            tracing::warn!(%err, "failed to set TCP_NODELAY");
                        }
                        let id = client_id.fetch_add(1, Ordering::Relaxed);
                        tracing::info!(%address, id, "accepted connection");

                        let shared = accept_shared.clone();
                        let incoming_tx = incoming_tx.clone();
                        let tracker = accept_tracker.clone();
                        accept_tracker.spawn(async move {
                            if let Some(connection) = run_pre_login(stream, address, id, shared, tracker).await {
                                let _ = incoming_tx.send(connection).await;
                            }
                        });
                    }
                }
            }
        });

        Ok(Self {
            shared,
            incoming: AsyncMutex::new(incoming_rx),
            task_tracker,
            local_addr,
        })
    }

    /// The socket address this listener actually bound to — useful when
    /// `config.server_address` asked for an OS-assigned ephemeral port.
    #[must_use]
    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.local_addr
    }

    /// Waits for the next connection to finish logging in and enter Play.
    pub async fn accept(&self) -> Option<Connection> {
        self.incoming.lock().await.recv().await
    }

    /// Stops the accept loop and cancels every connection descended from it.
    pub async fn close(&self) {
        self.shared.cancel_token.cancel();
        self.task_tracker.close();
        self.task_tracker.wait().await;
    }

    #[must_use]
    pub async fn status(&self) -> Status {
        self.shared.status.read().await.clone()
    }

    pub async fn update_status(&self, status: Status) {
        *self.shared.status.write().await = status;
    }
}
