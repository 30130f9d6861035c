//! The handshake/status/login state machine, and the Play-state connection
//! object handed to the embedding application once login completes.

use std::io::Cursor;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam::atomic::AtomicCell;
use strata_login::{is_valid_player_name, offline_uuid};
use strata_protocol::packets::handshake::{Handshake, NextState};
use strata_protocol::packets::login::{
    EncryptionRequest, EncryptionResponse, LoginDisconnect, LoginStart, LoginSuccess, SetCompression,
};
use strata_protocol::packets::play::{Disconnect, KeepAliveServer};
use strata_protocol::packets::status::{StatusPing, StatusPong, StatusRequest, StatusResponse};
use strata_protocol::{
    ClientPacket, CompressionInfo, ConnectionProtocol, EncodedPacket, PacketError, RawPacket, ServerPacket,
    TCPNetworkDecoder, TCPNetworkEncoder,
};
use strata_utils::text::TextComponent;
use tokio::io::{AsyncRead, AsyncWrite, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex as AsyncMutex, mpsc};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use crate::error::ConnectionError;
use crate::listener::ListenerShared;
use crate::status::MC_PROTOCOL;

/// An inbound Play-state packet this library doesn't interpret itself and
/// hands to the embedding application verbatim.
pub type PlayPacket = RawPacket;

const KEEP_ALIVE_CLIENT_ID: i32 = 0x0F;
const KEEP_ALIVE_INTERVAL_SECS: u64 = 1;
const KEEP_ALIVE_TIMEOUT_MILLIS: i64 = 30_000;

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Drives one accepted socket through handshake, then status or login;
/// returns a Play-state [`Connection`] on a successful login, `None`
/// otherwise (status pings and rejected logins both end with the socket
/// closed rather than a value to publish).
pub async fn run_pre_login(
    stream: TcpStream,
    address: std::net::SocketAddr,
    id: u64,
    shared: Arc<ListenerShared>,
    task_tracker: TaskTracker,
) -> Option<Connection> {
    let (read_half, write_half) = stream.into_split();
    let mut decoder = TCPNetworkDecoder::new(BufReader::new(read_half));
    let mut writer = TCPNetworkEncoder::new(BufWriter::new(write_half));

    let handshake = match read_packet::<Handshake>(&mut decoder).await {
        Ok(handshake) => handshake,
        Err(err) => {
            tracing::debug!(id, %err, "dropped connection before handshake completed");
            return None;
        }
    };

    match handshake.next_state {
        NextState::Status => {
            handle_status(&mut decoder, &mut writer, &shared).await;
            None
        }
        NextState::Login => {
            if handshake.protocol_version != MC_PROTOCOL {
                let message = format!(
                    "This server is on protocol {MC_PROTOCOL}, but you connected with {}",
                    handshake.protocol_version
                );
                let _ = send(&mut writer, LoginDisconnect { reason: message.into() }, ConnectionProtocol::Login).await;
                return None;
            }
            handle_login(decoder, writer, address, id, shared, task_tracker).await
        }
    }
}

async fn handle_status(
    decoder: &mut TCPNetworkDecoder<BufReader<OwnedReadHalf>>,
    writer: &mut TCPNetworkEncoder<BufWriter<OwnedWriteHalf>>,
    shared: &ListenerShared,
) {
    if read_packet::<StatusRequest>(decoder).await.is_err() {
        return;
    }
    let json = shared.status.read().await.to_json();
    if send(writer, StatusResponse { json }, ConnectionProtocol::Status).await.is_err() {
        return;
    }

    let Ok(ping) = read_packet::<StatusPing>(decoder).await else {
        return;
    };
    let _ = send(writer, StatusPong { payload: ping.payload }, ConnectionProtocol::Status).await;
}

async fn handle_login(
    mut decoder: TCPNetworkDecoder<BufReader<OwnedReadHalf>>,
    mut writer: TCPNetworkEncoder<BufWriter<OwnedWriteHalf>>,
    address: std::net::SocketAddr,
    id: u64,
    shared: Arc<ListenerShared>,
    task_tracker: TaskTracker,
) -> Option<Connection> {
    let login_start = read_packet::<LoginStart>(&mut decoder).await.ok()?;
    if !is_valid_player_name(&login_start.username) {
        let _ = send(&mut writer, LoginDisconnect { reason: "Invalid player name".into() }, ConnectionProtocol::Login).await;
        return None;
    }

    let verify_token = shared.verify_token;
    let request = EncryptionRequest {
        server_id: String::new(),
        public_key_der: shared.key_pair.public_key_der().to_vec(),
        verify_token: verify_token.to_vec(),
    };
    if send(&mut writer, request, ConnectionProtocol::Login).await.is_err() {
        return None;
    }

    let response = read_packet::<EncryptionResponse>(&mut decoder).await.ok()?;

    let echoed_token = shared.key_pair.decrypt(&response.encrypted_verify_token).ok()?;
    if echoed_token != verify_token {
        let _ = send(&mut writer, LoginDisconnect { reason: "Invalid verify token".into() }, ConnectionProtocol::Login).await;
        return None;
    }

    let shared_secret = shared.key_pair.decrypt_shared_secret(&response.encrypted_shared_secret).ok()?;

    let (uuid, username) = if shared.config.online_mode {
        let server_hash = strata_crypto::yggdrasil::server_hash("", &shared_secret, shared.key_pair.public_key_der());
        match strata_crypto::session::has_joined(&login_start.username, &server_hash).await {
            Ok(profile) => (profile.uuid, profile.username),
            Err(err) => {
                tracing::warn!(id, %err, "online-mode authentication failed");
                let _ = send(&mut writer, LoginDisconnect { reason: "Failed to verify username".into() }, ConnectionProtocol::Login).await;
                return None;
            }
        }
    } else {
        let uuid = offline_uuid(&login_start.username).ok()?;
        (uuid, login_start.username)
    };

    decoder.set_encryption(&shared_secret);
    writer.set_encryption(&shared_secret);

    let compression = shared.config.compression();
    if let Some(info) = compression {
        let _ = send(&mut writer, SetCompression { threshold: info.threshold.get() as i32 }, ConnectionProtocol::Login).await;
        decoder.set_compression(info.threshold);
    }

    // Unlike the packets above, this one goes out after compression (if any)
    // was just activated, so it has to carry that threshold itself rather
    // than going through `send`'s hardcoded "always plain" framing.
    let login_success = LoginSuccess { uuid, username: username.clone() };
    let encoded = EncodedPacket::from_bare(login_success, compression, ConnectionProtocol::Login).ok()?;
    if writer.write_packet(&encoded).await.is_err() {
        return None;
    }

    Some(Connection::spawn(id, address, uuid, username, decoder, writer, compression, task_tracker))
}

async fn read_packet<P: ServerPacket>(decoder: &mut TCPNetworkDecoder<impl AsyncRead + Unpin>) -> Result<P, PacketError> {
    let raw = decoder.get_raw_packet().await?;
    P::read_packet(&mut Cursor::new(raw.payload.as_slice()))
}

async fn send<P: ClientPacket>(
    writer: &mut TCPNetworkEncoder<impl AsyncWrite + Unpin>,
    packet: P,
    protocol: ConnectionProtocol,
) -> Result<(), PacketError> {
    let encoded = EncodedPacket::from_bare(packet, None, protocol)?;
    writer.write_packet(&encoded).await
}

/// An authenticated, framed, bidirectional packet channel in the Play
/// state, handed to the embedding application by [`crate::Listener::accept`].
pub struct Connection {
    pub id: u64,
    pub address: std::net::SocketAddr,
    pub uuid: Uuid,
    pub username: String,
    protocol: AtomicCell<ConnectionProtocol>,
    compression: Arc<AtomicCell<Option<CompressionInfo>>>,
    writer: Arc<AsyncMutex<TCPNetworkEncoder<BufWriter<OwnedWriteHalf>>>>,
    inbound: AsyncMutex<mpsc::UnboundedReceiver<RawPacket>>,
    control: mpsc::UnboundedSender<ControlMessage>,
    cancel_token: CancellationToken,
}

enum ControlMessage {
    SetCompressionThreshold(NonZeroU32),
}

impl Connection {
    #[allow(clippy::too_many_arguments)]
    fn spawn(
        id: u64,
        address: std::net::SocketAddr,
        uuid: Uuid,
        username: String,
        decoder: TCPNetworkDecoder<BufReader<OwnedReadHalf>>,
        writer: TCPNetworkEncoder<BufWriter<OwnedWriteHalf>>,
        compression: Option<CompressionInfo>,
        task_tracker: TaskTracker,
    ) -> Self {
        let cancel_token = CancellationToken::new();
        let compression = Arc::new(AtomicCell::new(compression));
        let writer = Arc::new(AsyncMutex::new(writer));
        let last_keep_alive = Arc::new(AtomicCell::new(unix_millis()));
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (control_tx, control_rx) = mpsc::unbounded_channel();

        task_tracker.spawn(reader_loop(decoder, inbound_tx, control_rx, last_keep_alive.clone(), cancel_token.clone()));
        task_tracker.spawn(keep_alive_loop(writer.clone(), compression.clone(), last_keep_alive.clone(), cancel_token.clone()));

        Self {
            id,
            address,
            uuid,
            username,
            protocol: AtomicCell::new(ConnectionProtocol::Play),
            compression,
            writer,
            inbound: AsyncMutex::new(inbound_rx),
            control: control_tx,
            cancel_token,
        }
    }

    /// Writes a Play-state packet, serializing and flushing it under the
    /// connection's writer lock.
    pub async fn write_packet<P: ClientPacket>(&self, packet: P) -> Result<(), ConnectionError> {
        if self.cancel_token.is_cancelled() {
            return Err(ConnectionError::Closed);
        }
        let encoded = EncodedPacket::from_bare(packet, self.compression.load(), self.protocol.load())?;
        self.writer.lock().await.write_packet(&encoded).await?;
        Ok(())
    }

    /// Waits for the next inbound Play packet this library didn't consume
    /// internally (i.e. anything other than keep-alive).
    pub async fn read_packet(&self) -> Result<PlayPacket, ConnectionError> {
        self.inbound.lock().await.recv().await.ok_or(ConnectionError::Closed)
    }

    /// Sends a disconnect message and closes the connection.
    pub async fn disconnect(&self, reason: TextComponent) {
        let _ = self.write_packet(Disconnect { reason }).await;
        self.close();
    }

    pub fn close(&self) {
        self.cancel_token.cancel();
    }

    /// Re-thresholds compression for both directions of this connection,
    /// notifying the client so its own decoder matches.
    pub async fn update_compression_threshold(&self, threshold: u32) -> Result<(), ConnectionError> {
        let Some(threshold) = NonZeroU32::new(threshold) else {
            return Ok(());
        };
        self.compression.store(Some(CompressionInfo { threshold, level: 4 }));
        let _ = self.control.send(ControlMessage::SetCompressionThreshold(threshold));
        self.write_packet(SetCompression { threshold: threshold.get() as i32 }).await
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn reader_loop(
    mut decoder: TCPNetworkDecoder<BufReader<OwnedReadHalf>>,
    inbound_tx: mpsc::UnboundedSender<RawPacket>,
    mut control_rx: mpsc::UnboundedReceiver<ControlMessage>,
    last_keep_alive: Arc<AtomicCell<i64>>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            () = cancel_token.cancelled() => break,
            control = control_rx.recv() => match control {
                Some(ControlMessage::SetCompressionThreshold(threshold)) => decoder.set_compression(threshold),
                None => break,
            },
            packet = decoder.get_raw_packet() => match packet {
                Ok(raw) if raw.id == KEEP_ALIVE_CLIENT_ID => {
                    last_keep_alive.store(unix_millis());
                }
                Ok(raw) => {
                    if inbound_tx.send(raw).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::debug!(%err, "connection read failed, closing");
                    cancel_token.cancel();
                    break;
                }
            }
        }
    }
}

async fn keep_alive_loop(
    writer: Arc<AsyncMutex<TCPNetworkEncoder<BufWriter<OwnedWriteHalf>>>>,
    compression: Arc<AtomicCell<Option<CompressionInfo>>>,
    last_keep_alive: Arc<AtomicCell<i64>>,
    cancel_token: CancellationToken,
) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(KEEP_ALIVE_INTERVAL_SECS));
    loop {
        tokio::select! {
            () = cancel_token.cancelled() => break,
            _ = interval.tick() => {
                let now = unix_millis();
                if now - last_keep_alive.load() > KEEP_ALIVE_TIMEOUT_MILLIS {
                    let encoded = EncodedPacket::from_bare(
                        Disconnect { reason: "Timed out".into() },
                        compression.load(),
                        ConnectionProtocol::Play,
                    );
                    if let Ok(encoded) = encoded {
                        let _ = writer.lock().await.write_packet(&encoded).await;
                    }
                    cancel_token.cancel();
                    break;
                }

                let encoded = EncodedPacket::from_bare(KeepAliveServer { id: now }, compression.load(), ConnectionProtocol::Play);
                let Ok(encoded) = encoded else { continue };
                if writer.lock().await.write_packet(&encoded).await.is_err() {
                    cancel_token.cancel();
                    break;
                }
            }
        }
    }
}
