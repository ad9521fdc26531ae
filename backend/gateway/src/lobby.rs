//! The Lobby owns every piece of matchmaking state.
//!
//! Registry, wait pool and pairing map live in one struct behind one lock,
//! and each inbound frame is handled to completion under it. Outbound
//! delivery only pushes onto unbounded outboxes, so nothing here awaits.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pairline_config::{defaults, PairlineConfig};
use pairline_core::{ConnId, GenderTag, ModerationSink, PairlineError, Profile, ReportReason, ReportRecord};
use pairline_logging::{EventLogger, MatchEvent};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::matchmaker::{MatchOutcome, Matchmaker, ReleaseOutcome};
use crate::relay::{self, Delivery, Signal};
use crate::session_registry::{ClientSender, ConnectionRegistry};
use crate::ws_protocol::{ClientMessage, ServerMessage};

pub type SharedLobby = Arc<Mutex<Lobby>>;

/// Matchmaking policy knobs.
#[derive(Debug, Clone)]
pub struct LobbyPolicy {
    /// Re-run matchmaking for the survivor of a torn-down pairing.
    pub requeue_survivor: bool,
    /// How long a reported partner is refused. Zero disables.
    pub report_cooldown: Duration,
    pub max_display_name_len: usize,
    pub max_chat_len: usize,
    /// Ids kept from the block list of each join.
    pub max_blocked: usize,
}

impl Default for LobbyPolicy {
    fn default() -> Self {
        Self {
            requeue_survivor: false,
            report_cooldown: Duration::from_secs(defaults::DEFAULT_REPORT_COOLDOWN_SECS),
            max_display_name_len: defaults::DEFAULT_MAX_DISPLAY_NAME_LEN,
            max_chat_len: defaults::DEFAULT_MAX_CHAT_LEN,
            max_blocked: defaults::DEFAULT_MAX_BLOCKED,
        }
    }
}

impl From<&PairlineConfig> for LobbyPolicy {
    fn from(config: &PairlineConfig) -> Self {
        Self {
            requeue_survivor: config.requeue_survivor(),
            report_cooldown: Duration::from_secs(config.report_cooldown_secs()),
            max_display_name_len: config.max_display_name_len(),
            max_chat_len: config.max_chat_len(),
            max_blocked: config.max_blocked(),
        }
    }
}

/// Point-in-time counters for the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobbyStats {
    pub online: usize,
    pub waiting: usize,
    pub paired: usize,
}

pub struct Lobby {
    registry: ConnectionRegistry,
    matchmaker: Matchmaker,
    policy: LobbyPolicy,
    moderation: Arc<dyn ModerationSink>,
}

impl Lobby {
    pub fn new(policy: LobbyPolicy, moderation: Arc<dyn ModerationSink>) -> Self {
        info!(sink = moderation.name(), requeue_survivor = policy.requeue_survivor, "Lobby initialized");
        Self {
            registry: ConnectionRegistry::new(),
            matchmaker: Matchmaker::new(),
            policy,
            moderation,
        }
    }

    pub fn into_shared(self) -> SharedLobby {
        Arc::new(Mutex::new(self))
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn matchmaker(&self) -> &Matchmaker {
        &self.matchmaker
    }

    pub fn stats(&self) -> LobbyStats {
        LobbyStats {
            online: self.registry.len(),
            waiting: self.matchmaker.waiting_len(),
            paired: self.matchmaker.pair_count(),
        }
    }

    /// Register a freshly accepted transport and greet it with its id.
    pub fn connect(&mut self, sender: ClientSender) -> ConnId {
        let id = ConnId::new();
        self.registry.register(id, sender);
        self.registry.send_to(&id, ServerMessage::Welcome { id });
        EventLogger::log_event(
            &id.to_string(),
            MatchEvent::Connected {
                online: self.registry.len(),
            },
        );
        self.broadcast_online_count();
        id
    }

    /// Transport closed: release, then purge everything known about `id`.
    pub fn disconnect(&mut self, id: ConnId) {
        if !self.registry.is_live(&id) {
            return;
        }
        self.release(id);
        self.registry.deregister(&id);
        EventLogger::log_event(
            &id.to_string(),
            MatchEvent::Disconnected {
                online: self.registry.len(),
            },
        );
        self.broadcast_online_count();
    }

    /// Dispatch one parsed client frame.
    pub fn handle(&mut self, id: ConnId, msg: ClientMessage) {
        match msg {
            ClientMessage::Join {
                display_name,
                gender_tag,
                blocked,
            } => {
                self.join(id, display_name.as_deref(), gender_tag, blocked);
            }
            ClientMessage::Report { partner_id, reason } => self.report(id, partner_id, reason),
            ClientMessage::Leave => self.leave(id),
            ClientMessage::Ping => {
                self.registry.send_to(&id, ServerMessage::Pong);
            }
            other => {
                if let Some((to, signal)) = Signal::from_client(other) {
                    self.relay(id, to, signal);
                }
            }
        }
    }

    /// Answer a frame that could not be parsed.
    pub fn reject(&self, id: ConnId, err: &PairlineError) {
        self.registry.send_to(&id, ServerMessage::error(err));
    }

    /// Store the caller's profile and block list, then ask for a match.
    ///
    /// Returns `None` when the join was refused (unknown id or cooldown).
    pub fn join(
        &mut self,
        id: ConnId,
        display_name: Option<&str>,
        gender_tag: Option<GenderTag>,
        blocked: Vec<ConnId>,
    ) -> Option<MatchOutcome> {
        if !self.registry.is_live(&id) {
            return None;
        }

        if let Some(left) = self.registry.cooldown_remaining(&id, Instant::now()) {
            let remaining_secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
            self.registry.send_to(&id, ServerMessage::CoolingDown { remaining_secs });
            EventLogger::log_event(&id.to_string(), MatchEvent::CooldownRefused { remaining_secs });
            return None;
        }

        let profile = Profile::sanitized(display_name, gender_tag, self.policy.max_display_name_len);
        self.registry.set_profile(&id, profile);
        self.registry.replace_blocked(&id, blocked, self.policy.max_blocked);
        Some(self.request_match(id))
    }

    /// Forward a handshake or chat frame. Chat is capped and blank chat dropped.
    pub fn relay(&self, from: ConnId, to: ConnId, signal: Signal) -> Delivery {
        let signal = match signal {
            Signal::Chat(text) => {
                let text: String = text.chars().take(self.policy.max_chat_len).collect();
                if text.trim().is_empty() {
                    return Delivery::Dropped;
                }
                Signal::Chat(text)
            }
            other => other,
        };
        relay::relay(&self.registry, from, to, signal)
    }

    /// Record a manual report, then release the reporter.
    ///
    /// The reporter is never matched with the reported id again, whatever
    /// later joins send. If it was the reporter's partner it is also told
    /// and put on cooldown.
    pub fn report(&mut self, reporter: ConnId, reported: ConnId, reason: ReportReason) {
        if reporter == reported || !self.registry.is_live(&reporter) {
            return;
        }

        let was_partner = self.matchmaker.partner_of(&reporter) == Some(reported);
        self.moderation
            .submit(ReportRecord::new(reporter, reported, reason, was_partner));
        self.registry.add_reported(&reporter, reported);

        let cooldown = self.policy.report_cooldown;
        if was_partner && !cooldown.is_zero() {
            match Instant::now().checked_add(cooldown) {
                Some(until) => {
                    self.registry.start_cooldown(&reported, until);
                    self.registry.send_to(
                        &reported,
                        ServerMessage::Reported {
                            cooldown_secs: cooldown.as_secs(),
                        },
                    );
                }
                None => warn!(%reported, ?cooldown, "Cooldown out of range; not applied"),
            }
        }

        self.leave(reporter);
    }

    /// Explicit leave: end the pairing or leave the wait pool.
    pub fn leave(&mut self, id: ConnId) {
        self.release(id);
        self.broadcast_online_count();
    }

    fn request_match(&mut self, id: ConnId) -> MatchOutcome {
        let excluded = self.registry.exclusions_for(&id);
        let registry = &self.registry;
        let outcome = self
            .matchmaker
            .request_match(id, &excluded, |candidate| registry.is_live(candidate));

        match outcome {
            MatchOutcome::AlreadyPaired => debug!(%id, "Join ignored; already paired"),
            MatchOutcome::Waiting => {
                self.registry.send_to(&id, ServerMessage::Waiting);
                EventLogger::log_event(
                    &id.to_string(),
                    MatchEvent::Waiting {
                        queue_len: self.matchmaker.waiting_len(),
                    },
                );
            }
            MatchOutcome::Paired { waiting_peer } => self.announce_pairing(waiting_peer, id),
        }

        self.broadcast_online_count();
        outcome
    }

    /// The peer that was already waiting drives the offer.
    fn announce_pairing(&self, initiator: ConnId, arrival: ConnId) {
        let initiator_profile = self.registry.profile(&initiator).cloned().unwrap_or_default();
        let arrival_profile = self.registry.profile(&arrival).cloned().unwrap_or_default();

        self.registry.send_to(
            &initiator,
            ServerMessage::Paired {
                partner_id: arrival,
                initiator: true,
                partner_profile: arrival_profile,
            },
        );
        self.registry.send_to(
            &arrival,
            ServerMessage::Paired {
                partner_id: initiator,
                initiator: false,
                partner_profile: initiator_profile,
            },
        );

        for (me, partner, initiator) in [(initiator, arrival, true), (arrival, initiator, false)] {
            EventLogger::log_event(
                &me.to_string(),
                MatchEvent::Paired {
                    partner: partner.to_string(),
                    initiator,
                },
            );
        }
        info!(%initiator, %arrival, "Paired");
    }

    fn release(&mut self, id: ConnId) -> ReleaseOutcome {
        let outcome = self.matchmaker.release(id);
        self.registry.clear_profile(&id);

        if let ReleaseOutcome::Unpaired { partner } = outcome {
            self.registry.send_to(&partner, ServerMessage::PartnerLeft);
            EventLogger::log_event(
                &partner.to_string(),
                MatchEvent::PartnerLeft {
                    partner: id.to_string(),
                },
            );
            info!(%id, %partner, "Pairing ended");
            if self.policy.requeue_survivor {
                self.requeue(partner);
            }
        }
        outcome
    }

    fn requeue(&mut self, survivor: ConnId) {
        if self.registry.profile(&survivor).is_none()
            || self.registry.cooldown_remaining(&survivor, Instant::now()).is_some()
        {
            return;
        }
        debug!(%survivor, "Requeueing survivor");
        self.request_match(survivor);
    }

    fn broadcast_online_count(&self) {
        let count = self.registry.len();
        self.registry.broadcast(&ServerMessage::OnlineCount { count });
    }
}
