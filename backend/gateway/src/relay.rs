//! Signaling Relay.
//!
//! Forwards opaque handshake and chat payloads from a sender to a named
//! recipient. The relay does not check pairings: any live target gets the
//! frame, anything else is dropped without telling the sender.

use pairline_core::ConnId;
use serde_json::Value;
use tracing::debug;

use crate::session_registry::ConnectionRegistry;
use crate::ws_protocol::{ClientMessage, ServerMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    HandshakeOffer,
    HandshakeAnswer,
    NetworkCandidate,
    ChatMessage,
    TypingHint,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::HandshakeOffer => "handshake-offer",
            SignalKind::HandshakeAnswer => "handshake-answer",
            SignalKind::NetworkCandidate => "network-candidate",
            SignalKind::ChatMessage => "chat-message",
            SignalKind::TypingHint => "typing-hint",
        }
    }
}

/// Payload of one relayed frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Offer(Value),
    Answer(Value),
    Candidate(Value),
    Chat(String),
    Typing,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::Offer(_) => SignalKind::HandshakeOffer,
            Signal::Answer(_) => SignalKind::HandshakeAnswer,
            Signal::Candidate(_) => SignalKind::NetworkCandidate,
            Signal::Chat(_) => SignalKind::ChatMessage,
            Signal::Typing => SignalKind::TypingHint,
        }
    }

    /// Split a relayable client frame into its target and payload.
    pub fn from_client(msg: ClientMessage) -> Option<(ConnId, Signal)> {
        match msg {
            ClientMessage::HandshakeOffer { to, sdp } => Some((to, Signal::Offer(sdp))),
            ClientMessage::HandshakeAnswer { to, sdp } => Some((to, Signal::Answer(sdp))),
            ClientMessage::NetworkCandidate { to, candidate } => Some((to, Signal::Candidate(candidate))),
            ClientMessage::ChatMessage { to, text } => Some((to, Signal::Chat(text))),
            ClientMessage::TypingHint { to } => Some((to, Signal::Typing)),
            _ => None,
        }
    }

    fn into_message(self, from: ConnId, from_name: &str) -> ServerMessage {
        match self {
            Signal::Offer(sdp) => ServerMessage::HandshakeOffer { from, sdp },
            Signal::Answer(sdp) => ServerMessage::HandshakeAnswer { from, sdp },
            Signal::Candidate(candidate) => ServerMessage::NetworkCandidate { from, candidate },
            Signal::Chat(text) => ServerMessage::ChatMessage {
                from,
                from_name: from_name.to_string(),
                text,
            },
            Signal::Typing => ServerMessage::TypingHint {
                from,
                from_name: from_name.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Dropped,
}

/// Deliver `signal` from `from` to `to`, attaching the sender's stored
/// display name to chat and typing frames.
pub fn relay(registry: &ConnectionRegistry, from: ConnId, to: ConnId, signal: Signal) -> Delivery {
    let kind = signal.kind();
    if !registry.is_live(&to) {
        debug!(%from, %to, kind = kind.as_str(), "Relay target gone; dropping");
        return Delivery::Dropped;
    }

    let message = signal.into_message(from, registry.display_name(&from));
    if registry.send_to(&to, message) {
        debug!(%from, %to, kind = kind.as_str(), "Relayed");
        Delivery::Delivered
    } else {
        debug!(%from, %to, kind = kind.as_str(), "Relay target outbox closed; dropping");
        Delivery::Dropped
    }
}
