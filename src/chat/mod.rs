//! In-process stand-in for the chat socket.
//!
//! A [`ChatTransport`] is an isolated pub/sub channel: while connected it
//! broadcasts a system message every `broadcast_interval`, and every
//! `send-message` emit is echoed back on `chat-message` after `echo_delay`.
//! Nothing is delivered while disconnected.

mod room;

pub use room::*;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::clock::{Clock, IdSequence};
use crate::errors::AppError;
use crate::models::{ChatMessage, OutgoingMessage};

/// Channel names understood by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Inbound messages for the room
    ChatMessage,
    /// Outbound messages from the local user
    SendMessage,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::ChatMessage => "chat-message",
            Topic::SendMessage => "send-message",
        }
    }
}

impl FromStr for Topic {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat-message" => Ok(Topic::ChatMessage),
            "send-message" => Ok(Topic::SendMessage),
            other => Err(AppError::BadRequest(format!("Unknown chat topic {}", other))),
        }
    }
}

/// Payloads the local side can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    SendMessage(OutgoingMessage),
    /// Any other topic; logged and dropped
    Custom {
        topic: String,
        payload: serde_json::Value,
    },
}

/// Payloads delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    ChatMessage(ChatMessage),
}

impl Inbound {
    pub fn topic(&self) -> Topic {
        match self {
            Inbound::ChatMessage(_) => Topic::ChatMessage,
        }
    }
}

/// Handle returned by [`ChatTransport::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&Inbound) + Send + Sync>;

/// Timing of the synthetic traffic.
#[derive(Debug, Clone, Copy)]
pub struct ChatSettings {
    /// Zero disables the periodic broadcast
    pub broadcast_interval: Duration,
    pub echo_delay: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            broadcast_interval: Duration::from_secs(15),
            echo_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Default)]
struct State {
    connected: bool,
    next_subscription: u64,
    subscribers: HashMap<Topic, Vec<(SubscriptionId, Handler)>>,
    broadcast: Option<JoinHandle<()>>,
}

struct Inner {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
    ids: IdSequence,
    settings: ChatSettings,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Hand `event` to its topic's subscribers, in subscription order.
    /// Handlers run after the lock is released.
    fn deliver(&self, event: Inbound) {
        let handlers: Vec<Handler> = {
            let state = self.state();
            if !state.connected {
                tracing::debug!("Dropping {} delivery while disconnected", event.topic().as_str());
                return;
            }
            state
                .subscribers
                .get(&event.topic())
                .map(|subs| subs.iter().map(|(_, handler)| handler.clone()).collect())
                .unwrap_or_default()
        };

        tracing::debug!(
            "Delivering {} to {} subscriber(s)",
            event.topic().as_str(),
            handlers.len()
        );
        for handler in handlers {
            handler(&event);
        }
    }

    fn stamp(&self, message: OutgoingMessage) -> ChatMessage {
        let now = self.clock.now();
        message.stamp(self.ids.next("msg", now), now.to_rfc3339())
    }

    fn system_message(&self) -> ChatMessage {
        let now = self.clock.now();
        let content = format!(
            "Automated update from the chat service at {}",
            now.format("%H:%M:%S")
        );
        self.stamp(OutgoingMessage {
            sender: "System".to_string(),
            sender_id: None,
            sender_avatar: None,
            content,
        })
    }
}

/// Fake real-time channel. Clones share the same connection.
#[derive(Clone)]
pub struct ChatTransport {
    inner: Arc<Inner>,
}

impl ChatTransport {
    pub fn new(clock: Arc<dyn Clock>, settings: ChatSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                clock,
                ids: IdSequence::new(),
                settings,
            }),
        }
    }

    /// Mark the channel active and start the periodic broadcast. Must be
    /// called from within a tokio runtime. No-op when already connected.
    pub fn connect(&self) {
        let mut state = self.inner.state();
        if state.connected {
            return;
        }
        state.connected = true;

        let period = self.inner.settings.broadcast_interval;
        if !period.is_zero() {
            let inner = Arc::downgrade(&self.inner);
            state.broadcast = Some(tokio::spawn(run_broadcast(inner, period)));
        }
        tracing::info!("Chat transport connected");
    }

    /// Mark the channel inactive and cancel the broadcast. No-op when
    /// already disconnected.
    pub fn disconnect(&self) {
        let mut state = self.inner.state();
        if !state.connected {
            return;
        }
        state.connected = false;

        if let Some(task) = state.broadcast.take() {
            task.abort();
        }
        tracing::info!("Chat transport disconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.inner.state().connected
    }

    pub fn on<F>(&self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: Fn(&Inbound) + Send + Sync + 'static,
    {
        let mut state = self.inner.state();
        let id = SubscriptionId(state.next_subscription);
        state.next_subscription += 1;
        state
            .subscribers
            .entry(topic)
            .or_default()
            .push((id, Arc::new(handler)));

        tracing::trace!("New {} subscription: {:?}", topic.as_str(), id);
        id
    }

    /// Remove one subscription, or every subscription on `topic` when `id`
    /// is `None`.
    pub fn off(&self, topic: Topic, id: Option<SubscriptionId>) {
        let mut state = self.inner.state();
        match id {
            None => {
                state.subscribers.remove(&topic);
            }
            Some(id) => {
                if let Some(subs) = state.subscribers.get_mut(&topic) {
                    subs.retain(|(sub, _)| *sub != id);
                }
            }
        }
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner
            .state()
            .subscribers
            .get(&topic)
            .map_or(0, Vec::len)
    }

    /// Send a payload. A `send-message` is echoed to `chat-message`
    /// subscribers after the echo delay; the echo cannot be retracted.
    pub fn emit(&self, outbound: Outbound) {
        match outbound {
            Outbound::SendMessage(message) => {
                tracing::debug!("Emitting send-message from {}", message.sender);
                let inner = Arc::downgrade(&self.inner);
                let delay = self.inner.settings.echo_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Some(inner) = inner.upgrade() {
                        let echoed = inner.stamp(message);
                        inner.deliver(Inbound::ChatMessage(echoed));
                    }
                });
            }
            Outbound::Custom { topic, payload } => {
                tracing::debug!("Emitting {} (no delivery): {}", topic, payload);
            }
        }
    }
}

async fn run_broadcast(inner: Weak<Inner>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        // Transport dropped without a disconnect
        let Some(transport) = inner.upgrade() else {
            break;
        };
        let message = transport.system_message();
        transport.deliver(Inbound::ChatMessage(message));
    }
}
