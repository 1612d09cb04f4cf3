//! Topic naming and inbound command parsing
//!
//! All knowledge of topic strings lives here: the logical topic names, the
//! optional per-device prefix, the per-slot status topics, and the single
//! parse step that turns an incoming topic into a typed [`Command`].

use core::fmt::Write;

/// Logical topic: log the payload
pub const TOPIC_PRINT: &str = "/print";
/// Logical topic: request an uptime reply
pub const TOPIC_PING: &str = "/ping";
/// Logical topic: shut the client down
pub const TOPIC_EXIT: &str = "/exit";
/// Uptime replies are published here
pub const TOPIC_UPTIME: &str = "/uptime";
/// Will/status topic carrying "1" online (retained) and "0" on ungraceful
/// disconnect
pub const TOPIC_WILL: &str = "/online";
/// Subscription filter matching every slot's reservation topic
pub const FILTER_RESERVATION: &str = "/parking/+/reservation";

const RESERVATION_PREFIX: &str = "/parking/";
const RESERVATION_SUFFIX: &str = "/reservation";
const STATUS_PREFIX: &str = "/parking/status/";

/// Maximum client identifier length
pub const MAX_CLIENT_ID_LENGTH: usize = 23;

/// Maximum length of a fully prefixed topic
pub const MAX_TOPIC_LENGTH: usize = 64;

/// Owned topic string
pub type TopicBuf = heapless::String<MAX_TOPIC_LENGTH>;

/// Client identifier string
pub type ClientId = heapless::String<MAX_CLIENT_ID_LENGTH>;

/// Typed inbound command, produced by [`TopicSpace::parse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Log the payload; observability only
    Print,
    /// Publish current uptime to the uptime topic
    Ping,
    /// Unsubscribe everything and close the session
    Exit,
    /// Reserve the slot with the given 1-based id
    Reserve { id: u16 },
}

/// The device's view of the topic namespace
///
/// When the unique-topic flag is set, every subscribe and publish topic is
/// prefixed with `/{client_id}` so several devices can share one broker, and
/// the same prefix is stripped from incoming topics before command parsing.
#[derive(Debug, Clone)]
pub struct TopicSpace {
    client_id: ClientId,
    unique: bool,
}

impl TopicSpace {
    /// Create a topic space for `client_id`
    ///
    /// The identifier is truncated to [`MAX_CLIENT_ID_LENGTH`] bytes.
    pub fn new(client_id: &str, unique: bool) -> Self {
        let mut id = ClientId::new();
        for ch in client_id.chars() {
            if id.push(ch).is_err() {
                break;
            }
        }
        Self { client_id: id, unique }
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    /// Expand a logical topic name into the wire topic
    pub fn full_topic(&self, name: &str) -> TopicBuf {
        let mut topic = TopicBuf::new();
        if self.unique {
            let _ = write!(topic, "/{}", self.client_id);
        }
        let _ = topic.push_str(name);
        topic
    }

    /// Wire topic carrying the status of the slot with 1-based `id`
    pub fn status_topic(&self, id: u8) -> TopicBuf {
        let mut topic = self.full_topic(STATUS_PREFIX);
        let _ = write!(topic, "{}", id);
        topic
    }

    /// Wire topic for the online/will announcement
    pub fn will_topic(&self) -> TopicBuf {
        self.full_topic(TOPIC_WILL)
    }

    /// Strip this device's prefix from an incoming wire topic
    ///
    /// Returns `None` when unique-topic mode is on and the topic does not
    /// carry this device's prefix; such messages are not addressed to us.
    /// The prefix must be the entire first segment, so another client id
    /// that merely starts with ours does not match.
    pub fn strip<'a>(&self, topic: &'a str) -> Option<&'a str> {
        if !self.unique {
            return Some(topic);
        }
        let rest = topic.strip_prefix('/')?;
        let rest = rest.strip_prefix(self.client_id.as_str())?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        Some(rest)
    }

    /// Parse an incoming wire topic into a typed command
    ///
    /// Prefix stripping and pattern matching happen in this one place;
    /// unrecognized topics yield `None`.
    pub fn parse(&self, topic: &str) -> Option<Command> {
        let logical = self.strip(topic)?;
        match logical {
            TOPIC_PRINT => Some(Command::Print),
            TOPIC_PING => Some(Command::Ping),
            TOPIC_EXIT => Some(Command::Exit),
            _ => {
                let rest = logical.strip_prefix(RESERVATION_PREFIX)?;
                let digits = rest.strip_suffix(RESERVATION_SUFFIX)?;
                let id: u16 = digits.parse().ok()?;
                Some(Command::Reserve { id })
            }
        }
    }
}
