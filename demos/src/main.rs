//! Exercises the listener end to end: accepts one login, sends it into a
//! flat Play state (join, a ring of chunks around the origin, a teleport),
//! and echoes back whatever Play packets the client sends afterward.
//!
//! Not a supported server launcher — just a smoke path for the library.

use std::path::Path;

use simdnbt::owned::NbtCompound;
use strata::config::ServerConfig;
use strata::listener::Listener;
use strata::status::{Players, Status, Version, MC_PROTOCOL, MC_VERSION};
use strata_protocol::packets::play::{ChunkData, JoinGame, PositionAndLook, UpdateViewPosition};
use strata_world::Column;

const VIEW_RADIUS: i32 = 2;
const STONE_STATE: i32 = 1;
const AIR_STATE: i32 = 0;
const PLAINS_BIOME: i32 = 1;

fn demo_status(config: &ServerConfig) -> Status {
    Status {
        version: Version { name: MC_VERSION, protocol: MC_PROTOCOL },
        players: Some(Players { max: config.max_players as i32, online: 0, sample: vec![] }),
        description: config.motd.as_str().into(),
        favicon: config.load_favicon(),
        enforce_secure_chat: config.enforce_secure_chat,
    }
}

/// Builds a single flat chunk column: solid stone in the bottom quarter of
/// the world, air above.
fn flat_column(chunk_x: i32, chunk_z: i32) -> Column {
    let mut column = Column::new(chunk_x, chunk_z, AIR_STATE, PLAINS_BIOME);
    for x in 0..16usize {
        for z in 0..16usize {
            for y in 0..64i32 {
                column.set_block(x, y, z, STONE_STATE).expect("y within world height");
            }
        }
    }
    column
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::load_or_create(Path::new("config/server.json5"));
    let status = demo_status(&config);

    let listener = Listener::listen(config, status).await.expect("failed to bind listener");
    tracing::info!("demo listener ready, waiting for a login");

    loop {
        let Some(connection) = listener.accept().await else {
            break;
        };
        tracing::info!(id = connection.id, username = %connection.username, "player logged in");

        tokio::spawn(async move {
            if let Err(err) = connection
                .write_packet(JoinGame {
                    entity_id: 1,
                    is_hardcore: false,
                    dimension_names: vec!["minecraft:overworld".to_owned()],
                    view_distance: VIEW_RADIUS,
                    simulation_distance: VIEW_RADIUS,
                    reduced_debug_info: false,
                    enable_respawn_screen: true,
                    is_debug: false,
                    is_flat: true,
                    dimension_type: "minecraft:overworld".to_owned(),
                    dimension_name: "minecraft:overworld".to_owned(),
                    hashed_seed: 0,
                    game_mode: 0,
                    previous_game_mode: -1,
                    is_death_location_present: false,
                    portal_cooldown: 0,
                })
                .await
            {
                tracing::warn!(%err, "failed to send join packet");
                return;
            }

            for cx in -VIEW_RADIUS..=VIEW_RADIUS {
                for cz in -VIEW_RADIUS..=VIEW_RADIUS {
                    let chunk = ChunkData {
                        column: flat_column(cx, cz),
                        heightmaps: NbtCompound::new(),
                        tile_entities: vec![],
                    };
                    if let Err(err) = connection.write_packet(chunk).await {
                        tracing::warn!(%err, "failed to send chunk");
                        return;
                    }
                }
            }

            let _ = connection.write_packet(UpdateViewPosition { chunk_x: 0, chunk_z: 0 }).await;
            let _ = connection
                .write_packet(PositionAndLook {
                    x: 8.0,
                    y: 1.0,
                    z: 8.0,
                    yaw: 0.0,
                    pitch: 0.0,
                    flags: 0,
                    teleport_id: 1,
                    dismount: false,
                })
                .await;

            loop {
                match connection.read_packet().await {
                    Ok(packet) => tracing::debug!(id = packet.id, len = packet.payload.len(), "play packet from client"),
                    Err(_) => break,
                }
            }
        });
    }
}
