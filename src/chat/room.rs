//! The messaging page's room: a message log fed by the transport.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Duration as ChronoDuration;

use super::{ChatTransport, Inbound, Outbound, SubscriptionId, Topic};
use crate::clock::Clock;
use crate::errors::AppError;
use crate::models::{ChatMessage, Identity, OutgoingMessage};

/// Display name of the only room the front end opens.
pub const DEFAULT_ROOM: &str = "Beach Cleanup Volunteers";

struct Membership {
    subscription: Option<SubscriptionId>,
    log: Arc<Mutex<Vec<ChatMessage>>>,
}

/// Keeps the room's messages while joined.
pub struct ChatRoom {
    name: String,
    transport: ChatTransport,
    clock: Arc<dyn Clock>,
    membership: Mutex<Membership>,
}

impl ChatRoom {
    pub fn new(name: impl Into<String>, transport: ChatTransport, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            transport,
            clock,
            membership: Mutex::new(Membership {
                subscription: None,
                log: Arc::new(Mutex::new(Vec::new())),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_joined(&self) -> bool {
        self.membership().subscription.is_some()
    }

    /// Connect, reset the log to the welcome messages and start listening.
    /// Joining an already joined room just returns the current log.
    pub fn join(&self) -> Vec<ChatMessage> {
        let mut membership = self.membership();
        if membership.subscription.is_some() {
            return snapshot(&membership.log);
        }

        self.transport.connect();
        *lock(&membership.log) = self.welcome_messages();

        let sink = membership.log.clone();
        let id = self.transport.on(Topic::ChatMessage, move |event| {
            let Inbound::ChatMessage(message) = event;
            lock(&sink).push(message.clone());
        });
        membership.subscription = Some(id);

        tracing::info!("Joined chat room {}", self.name);
        snapshot(&membership.log)
    }

    /// Stop listening and disconnect. The log is kept until the next join.
    pub fn leave(&self) {
        let mut membership = self.membership();
        if let Some(id) = membership.subscription.take() {
            self.transport.off(Topic::ChatMessage, Some(id));
            tracing::info!("Left chat room {}", self.name);
        }
        self.transport.disconnect();
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        snapshot(&self.membership().log)
    }

    /// Post `content` as `sender`, or as "Anonymous" without a session. The
    /// message shows up in the log once the transport echoes it.
    pub fn send(&self, content: &str, sender: Option<&Identity>) -> Result<OutgoingMessage, AppError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("Message cannot be empty".to_string()));
        }
        if !self.is_joined() {
            return Err(AppError::Validation(
                "Join the chat room before sending".to_string(),
            ));
        }

        let message = OutgoingMessage {
            sender: sender.map_or_else(|| "Anonymous".to_string(), |s| s.name.clone()),
            sender_id: sender.map(|s| s.id.clone()),
            sender_avatar: sender.and_then(|s| s.profile_image.clone()),
            content: content.to_string(),
        };
        self.transport.emit(Outbound::SendMessage(message.clone()));
        Ok(message)
    }

    fn membership(&self) -> MutexGuard<'_, Membership> {
        lock(&self.membership)
    }

    fn welcome_messages(&self) -> Vec<ChatMessage> {
        let now = self.clock.now();
        let at = |minutes_ago: i64| (now - ChronoDuration::minutes(minutes_ago)).to_rfc3339();

        vec![
            ChatMessage {
                id: "msg-1".to_string(),
                sender: "System".to_string(),
                sender_id: None,
                sender_avatar: None,
                content: format!("Welcome to the {} chat room!", self.name),
                timestamp: at(60),
            },
            ChatMessage {
                id: "msg-2".to_string(),
                sender: "Jane Smith".to_string(),
                sender_id: Some("user-2".to_string()),
                sender_avatar: Some("https://randomuser.me/api/portraits/women/33.jpg".to_string()),
                content: "Hey everyone! Looking forward to the cleanup on Saturday!".to_string(),
                timestamp: at(30),
            },
            ChatMessage {
                id: "msg-3".to_string(),
                sender: "Robert Chen".to_string(),
                sender_id: Some("user-5".to_string()),
                sender_avatar: Some("https://randomuser.me/api/portraits/men/76.jpg".to_string()),
                content: "I'll bring extra trash bags just in case.".to_string(),
                timestamp: at(15),
            },
        ]
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn snapshot(log: &Mutex<Vec<ChatMessage>>) -> Vec<ChatMessage> {
    lock(log).clone()
}
