//! Pairline Gateway
//!
//! Random one-to-one matchmaking and WebRTC signaling over WebSocket.

pub mod health_api;
pub mod lobby;
pub mod matchmaker;
pub mod moderation;
pub mod relay;
pub mod server;
pub mod session_registry;
pub mod ws_protocol;
pub mod ws_server;

pub use lobby::{Lobby, LobbyPolicy, LobbyStats, SharedLobby};
pub use moderation::{MemoryModerationSink, TracingModerationSink};
pub use server::{build_router, serve, start_server, GatewayState};
