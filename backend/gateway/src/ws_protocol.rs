//! WebSocket Protocol for the Pairline gateway.
//!
//! One JSON text frame per message, discriminated by `"type"`. Variant names
//! are kebab-case on the wire, field names camelCase.

use pairline_core::{ConnId, GenderTag, PairlineError, Profile, ReportReason};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages a client sends to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Declare a profile and ask to be matched.
    Join {
        #[serde(default, alias = "name")]
        display_name: Option<String>,
        #[serde(default, alias = "gender")]
        gender_tag: Option<GenderTag>,
        /// Connections this client refuses to be matched with.
        #[serde(default)]
        blocked: Vec<ConnId>,
    },
    HandshakeOffer {
        to: ConnId,
        sdp: Value,
    },
    HandshakeAnswer {
        to: ConnId,
        sdp: Value,
    },
    NetworkCandidate {
        to: ConnId,
        candidate: Value,
    },
    ChatMessage {
        to: ConnId,
        #[serde(alias = "message")]
        text: String,
    },
    TypingHint {
        to: ConnId,
    },
    Report {
        partner_id: ConnId,
        reason: ReportReason,
    },
    /// End the current pairing or leave the wait pool.
    Leave,
    Ping,
}

/// Messages the gateway sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// First frame on every connection.
    Welcome {
        id: ConnId,
    },
    Waiting,
    Paired {
        partner_id: ConnId,
        /// Exactly one side of a pairing gets `true` and sends the offer.
        initiator: bool,
        partner_profile: Profile,
    },
    HandshakeOffer {
        from: ConnId,
        sdp: Value,
    },
    HandshakeAnswer {
        from: ConnId,
        sdp: Value,
    },
    NetworkCandidate {
        from: ConnId,
        candidate: Value,
    },
    ChatMessage {
        from: ConnId,
        from_name: String,
        text: String,
    },
    TypingHint {
        from: ConnId,
        from_name: String,
    },
    /// Sent to a connection somebody reported.
    Reported {
        cooldown_secs: u64,
    },
    /// A join was refused because the connection is still cooling down.
    CoolingDown {
        remaining_secs: u64,
    },
    PartnerLeft,
    OnlineCount {
        count: usize,
    },
    Pong,
    Error {
        code: String,
        message: String,
    },
}

impl ServerMessage {
    pub fn error(err: &PairlineError) -> Self {
        ServerMessage::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Parse one inbound text frame.
pub fn parse_client_message(text: &str) -> Result<ClientMessage, PairlineError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_accepts_legacy_field_names() {
        let msg = parse_client_message(r#"{"type":"join","name":"Ann","gender":"female"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Join {
                display_name: Some("Ann".into()),
                gender_tag: Some(GenderTag::Female),
                blocked: vec![],
            }
        );
    }

    #[test]
    fn bare_join_has_no_profile_fields() {
        let msg = parse_client_message(r#"{"type":"join"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Join { display_name: None, gender_tag: None, ref blocked } if blocked.is_empty()
        ));
    }

    #[test]
    fn offer_payload_is_opaque() {
        let to = ConnId::new();
        let raw = json!({"type": "handshake-offer", "to": to, "sdp": {"type": "offer", "sdp": "v=0"}});
        let msg: ClientMessage = serde_json::from_value(raw).unwrap();
        match msg {
            ClientMessage::HandshakeOffer { to: got, sdp } => {
                assert_eq!(got, to);
                assert_eq!(sdp["sdp"], "v=0");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn report_uses_camel_case_partner_id() {
        let id = ConnId::new();
        let raw = json!({"type": "report", "partnerId": id, "reason": "spam"});
        let msg: ClientMessage = serde_json::from_value(raw).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Report {
                partner_id: id,
                reason: ReportReason::Spam
            }
        );
    }

    #[test]
    fn relay_without_target_is_rejected() {
        let err = parse_client_message(r#"{"type":"chat-message","text":"hi"}"#).unwrap_err();
        assert_eq!(err.code(), "bad_message");
    }

    #[test]
    fn paired_wire_shape() {
        let partner = ConnId::new();
        let msg = ServerMessage::Paired {
            partner_id: partner,
            initiator: true,
            partner_profile: Profile::default(),
        };
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            v,
            json!({
                "type": "paired",
                "partnerId": partner,
                "initiator": true,
                "partnerProfile": {"displayName": "Anonymous", "genderTag": "other"}
            })
        );
    }

    #[test]
    fn unit_and_count_frames() {
        assert_eq!(
            serde_json::to_value(ServerMessage::PartnerLeft).unwrap(),
            json!({"type": "partner-left"})
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::OnlineCount { count: 3 }).unwrap(),
            json!({"type": "online-count", "count": 3})
        );
    }
}
