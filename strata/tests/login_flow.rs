//! Drives a listener over a real loopback socket, speaking the wire
//! protocol by hand from the client side (there's no client-side codec in
//! this workspace to reuse) to exercise status pings, protocol-version
//! rejection, and a full encrypted offline-mode login.

use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
use strata::config::ServerConfig;
use strata::listener::Listener;
use strata::status::{MC_PROTOCOL, MC_VERSION, Status, Version};
use strata_protocol::TCPNetworkDecoder;
use strata_protocol::packets::handshake::NextState;
use strata_utils::codec::VarInt;
use strata_utils::serial::{ReadFrom, WriteTo, write_string};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

fn test_config(online_mode: bool, compression_threshold: Option<u32>) -> ServerConfig {
    ServerConfig {
        server_address: "127.0.0.1:0".parse().unwrap(),
        online_mode,
        encryption: true,
        motd: "a test server".to_owned(),
        max_players: 20,
        view_distance: 10,
        simulation_distance: 10,
        enforce_secure_chat: false,
        compression_threshold,
        favicon_path: None,
    }
}

fn test_status() -> Status {
    Status {
        version: Version { name: MC_VERSION, protocol: MC_PROTOCOL },
        players: None,
        description: "a test server".into(),
        favicon: None,
        enforce_secure_chat: false,
    }
}

async fn write_frame(stream: &mut TcpStream, id: i32, payload: &[u8]) {
    let mut inner = Vec::new();
    VarInt(id).write(&mut inner).unwrap();
    inner.extend_from_slice(payload);
    let mut framed = Vec::new();
    VarInt(inner.len() as i32).write(&mut framed).unwrap();
    framed.extend_from_slice(&inner);
    stream.write_all(&framed).await.unwrap();
}

fn handshake_payload(protocol_version: i32, next_state: NextState) -> Vec<u8> {
    let mut buf = Vec::new();
    VarInt(protocol_version).write(&mut buf).unwrap();
    write_string("localhost", &mut buf).unwrap();
    25565u16.write(&mut buf).unwrap();
    let state = match next_state {
        NextState::Status => 1,
        NextState::Login => 2,
    };
    VarInt(state).write(&mut buf).unwrap();
    buf
}

fn login_start_payload(username: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    write_string(username, &mut buf).unwrap();
    buf
}

/// Parses the server's SPKI DER public key and RSA-encrypts `data` under
/// it, matching what a real client does with `EncryptionRequest`.
fn rsa_encrypt(public_key_der: &[u8], data: &[u8]) -> Vec<u8> {
    let public_key = RsaPublicKey::from_public_key_der(public_key_der).unwrap();
    let mut rng = rand::rng();
    public_key.encrypt(&mut rng, Pkcs1v15Encrypt, data).unwrap()
}

fn encryption_response_payload(encrypted_secret: &[u8], encrypted_token: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    strata_utils::serial::write_byte_slice(encrypted_secret, &mut buf).unwrap();
    strata_utils::serial::write_byte_slice(encrypted_token, &mut buf).unwrap();
    buf
}

#[tokio::test]
async fn status_ping_round_trips_and_closes() {
    let listener = Listener::listen(test_config(false, None), test_status()).await.unwrap();
    let addr = listener.local_addr();

    let mut client = TcpStream::connect(addr).await.unwrap();
    write_frame(&mut client, 0x00, &handshake_payload(MC_PROTOCOL, NextState::Status)).await;
    write_frame(&mut client, 0x00, &[]).await;

    let (read_half, mut write_half) = client.into_split();
    let mut decoder = TCPNetworkDecoder::new(read_half);

    let response = decoder.get_raw_packet().await.unwrap();
    assert_eq!(response.id, 0x00);
    let json = strata_utils::serial::read_string(&mut std::io::Cursor::new(response.payload)).unwrap();
    assert!(json.contains("a test server"));

    let mut ping_payload = Vec::new();
    42i64.write(&mut ping_payload).unwrap();
    write_frame(&mut write_half, 0x01, &ping_payload).await;

    let pong = decoder.get_raw_packet().await.unwrap();
    assert_eq!(pong.id, 0x01);
    let payload = i64::read(&mut std::io::Cursor::new(pong.payload)).unwrap();
    assert_eq!(payload, 42);
}

#[tokio::test]
async fn mismatched_protocol_version_is_rejected() {
    let listener = Listener::listen(test_config(false, None), test_status()).await.unwrap();
    let addr = listener.local_addr();

    let mut client = TcpStream::connect(addr).await.unwrap();
    write_frame(&mut client, 0x00, &handshake_payload(MC_PROTOCOL + 1, NextState::Login)).await;
    write_frame(&mut client, 0x00, &login_start_payload("Steve")).await;

    let (read_half, _write_half) = client.into_split();
    let mut decoder = TCPNetworkDecoder::new(read_half);
    let packet = decoder.get_raw_packet().await.unwrap();
    assert_eq!(packet.id, 0x00); // LoginDisconnect

    assert!(tokio::time::timeout(std::time::Duration::from_millis(200), listener.accept()).await.is_err());
}

#[tokio::test]
async fn offline_mode_login_completes_and_reaches_play() {
    let listener = Listener::listen(test_config(false, None), test_status()).await.unwrap();
    let addr = listener.local_addr();

    let mut client = TcpStream::connect(addr).await.unwrap();
    write_frame(&mut client, 0x00, &handshake_payload(MC_PROTOCOL, NextState::Login)).await;
    write_frame(&mut client, 0x00, &login_start_payload("Steve")).await;

    let (read_half, mut write_half) = client.into_split();
    let mut decoder = TCPNetworkDecoder::new(read_half);

    let request = decoder.get_raw_packet().await.unwrap();
    assert_eq!(request.id, 0x01); // EncryptionRequest
    let mut cursor = std::io::Cursor::new(request.payload);
    let _server_id = strata_utils::serial::read_string(&mut cursor).unwrap();
    let public_key_der = strata_utils::serial::read_byte_vec(&mut cursor).unwrap();
    let verify_token = strata_utils::serial::read_byte_vec(&mut cursor).unwrap();

    let shared_secret = [0x11u8; 16];
    let encrypted_secret = rsa_encrypt(&public_key_der, &shared_secret);
    let encrypted_token = rsa_encrypt(&public_key_der, &verify_token);

    write_frame(&mut write_half, 0x01, &encryption_response_payload(&encrypted_secret, &encrypted_token)).await;

    decoder.set_encryption(&shared_secret);
    let success = decoder.get_raw_packet().await.unwrap();
    assert_eq!(success.id, 0x02); // LoginSuccess

    let connection = tokio::time::timeout(std::time::Duration::from_secs(2), listener.accept())
        .await
        .expect("login should have completed")
        .expect("listener closed unexpectedly");
    assert_eq!(connection.username, "Steve");
}

#[tokio::test]
async fn compression_is_announced_before_login_success() {
    let listener = Listener::listen(test_config(false, Some(256)), test_status()).await.unwrap();
    let addr = listener.local_addr();

    let mut client = TcpStream::connect(addr).await.unwrap();
    write_frame(&mut client, 0x00, &handshake_payload(MC_PROTOCOL, NextState::Login)).await;
    write_frame(&mut client, 0x00, &login_start_payload("Alex")).await;

    let (read_half, mut write_half) = client.into_split();
    let mut decoder = TCPNetworkDecoder::new(read_half);

    let request = decoder.get_raw_packet().await.unwrap();
    let mut cursor = std::io::Cursor::new(request.payload);
    let _server_id = strata_utils::serial::read_string(&mut cursor).unwrap();
    let public_key_der = strata_utils::serial::read_byte_vec(&mut cursor).unwrap();
    let verify_token = strata_utils::serial::read_byte_vec(&mut cursor).unwrap();

    let shared_secret = [0x22u8; 16];
    let encrypted_secret = rsa_encrypt(&public_key_der, &shared_secret);
    let encrypted_token = rsa_encrypt(&public_key_der, &verify_token);
    write_frame(&mut write_half, 0x01, &encryption_response_payload(&encrypted_secret, &encrypted_token)).await;

    decoder.set_encryption(&shared_secret);

    let set_compression = decoder.get_raw_packet().await.unwrap();
    assert_eq!(set_compression.id, 0x03);
    decoder.set_compression(std::num::NonZeroU32::new(256).unwrap());

    let success = decoder.get_raw_packet().await.unwrap();
    assert_eq!(success.id, 0x02);
}
