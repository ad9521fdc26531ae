//! Live Connection Registry.
//!
//! Tracks connected clients, their declared profiles and block lists, and
//! routes messages to them. Owned by the [`crate::lobby::Lobby`], which
//! serializes access, so the registry itself holds no locks.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use pairline_core::{ConnId, Profile, FALLBACK_SENDER_NAME};

use crate::ws_protocol::ServerMessage;

pub type ClientSender = mpsc::UnboundedSender<ServerMessage>;

struct ConnectionEntry {
    sender: ClientSender,
    profile: Option<Profile>,
    /// Block list sent with the latest join.
    blocked: HashSet<ConnId>,
    /// Partners this connection reported. Only live ids are kept.
    reported: HashSet<ConnId>,
    cooldown_until: Option<Instant>,
}

/// Manages live WebSocket connections.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnId, ConnectionEntry>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly accepted connection with an empty profile.
    pub fn register(&mut self, id: ConnId, sender: ClientSender) {
        self.connections.insert(
            id,
            ConnectionEntry {
                sender,
                profile: None,
                blocked: HashSet::new(),
                reported: HashSet::new(),
                cooldown_until: None,
            },
        );
    }

    /// Forget a closed connection. Returns false if it was not registered.
    pub fn deregister(&mut self, id: &ConnId) -> bool {
        self.connections.remove(id).is_some()
    }

    pub fn is_live(&self, id: &ConnId) -> bool {
        self.connections.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Store or replace the profile. Returns false for unknown ids.
    pub fn set_profile(&mut self, id: &ConnId, profile: Profile) -> bool {
        match self.connections.get_mut(id) {
            Some(entry) => {
                entry.profile = Some(profile);
                true
            }
            None => false,
        }
    }

    pub fn clear_profile(&mut self, id: &ConnId) {
        if let Some(entry) = self.connections.get_mut(id) {
            entry.profile = None;
        }
    }

    pub fn profile(&self, id: &ConnId) -> Option<&Profile> {
        self.connections.get(id).and_then(|e| e.profile.as_ref())
    }

    /// Name attached to chat relayed on behalf of `id`.
    pub fn display_name(&self, id: &ConnId) -> &str {
        self.profile(id)
            .map(|p| p.display_name.as_str())
            .unwrap_or(FALLBACK_SENDER_NAME)
    }

    /// Replace the join-supplied block list of `id`, keeping at most
    /// `limit` ids. Self-blocks are ignored.
    pub fn replace_blocked<I>(&mut self, id: &ConnId, others: I, limit: usize)
    where
        I: IntoIterator<Item = ConnId>,
    {
        if let Some(entry) = self.connections.get_mut(id) {
            entry.blocked = others.into_iter().filter(|o| o != id).take(limit).collect();
        }
    }

    /// Remember that `id` reported `other`. Dead ids are pruned first.
    pub fn add_reported(&mut self, id: &ConnId, other: ConnId) {
        if *id == other || !self.is_live(&other) {
            return;
        }
        let stale: Vec<ConnId> = match self.connections.get(id) {
            Some(entry) => entry
                .reported
                .iter()
                .filter(|o| !self.connections.contains_key(o))
                .copied()
                .collect(),
            None => return,
        };
        if let Some(entry) = self.connections.get_mut(id) {
            for gone in &stale {
                entry.reported.remove(gone);
            }
            entry.reported.insert(other);
        }
    }

    /// Every id that must not be matched with `id`: the ones it blocked or
    /// reported and the ones that blocked or reported it.
    pub fn exclusions_for(&self, id: &ConnId) -> HashSet<ConnId> {
        let mut excluded: HashSet<ConnId> = self
            .connections
            .get(id)
            .map(|e| e.blocked.union(&e.reported).copied().collect())
            .unwrap_or_default();
        excluded.extend(
            self.connections
                .iter()
                .filter(|(other, entry)| {
                    *other != id && (entry.blocked.contains(id) || entry.reported.contains(id))
                })
                .map(|(other, _)| *other),
        );
        excluded
    }

    pub fn start_cooldown(&mut self, id: &ConnId, until: Instant) {
        if let Some(entry) = self.connections.get_mut(id) {
            entry.cooldown_until = Some(until);
        }
    }

    /// Time left on the cooldown of `id`, if any is still running at `now`.
    pub fn cooldown_remaining(&self, id: &ConnId, now: Instant) -> Option<Duration> {
        self.connections
            .get(id)
            .and_then(|e| e.cooldown_until)
            .and_then(|until| until.checked_duration_since(now))
            .filter(|left| !left.is_zero())
    }

    /// Send a message to a specific connection.
    pub fn send_to(&self, id: &ConnId, msg: ServerMessage) -> bool {
        match self.connections.get(id) {
            Some(entry) => entry.sender.send(msg).is_ok(),
            None => false,
        }
    }

    /// Send a message to every connection. Returns how many accepted it.
    pub fn broadcast(&self, msg: &ServerMessage) -> usize {
        self.connections
            .values()
            .filter(|entry| entry.sender.send(msg.clone()).is_ok())
            .count()
    }
}
