// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound bus: one ordered stream per job, demultiplexed by channel tag

use crate::message::{ChannelKind, OutboundMessage};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Sender for outbound delivery
pub type OutboundSender = mpsc::UnboundedSender<OutboundMessage>;
/// Receiver for outbound delivery
pub type OutboundReceiver = mpsc::UnboundedReceiver<OutboundMessage>;

/// Which part of the outbound stream a subscriber wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelFilter {
    All,
    /// Primary output messages only
    Output,
    Channel(ChannelKind),
}

impl ChannelFilter {
    pub fn matches(&self, message: &OutboundMessage) -> bool {
        match self {
            Self::All => true,
            Self::Output => message.channel().is_none(),
            Self::Channel(kind) => message.channel() == Some(*kind),
        }
    }
}

#[derive(Default)]
struct BusState {
    subscribers: Vec<(ChannelFilter, OutboundSender)>,
    closed: bool,
}

/// The outbound bus of a single job.
///
/// Publishing is serialized, so every subscriber observes messages in the
/// order they were published.
pub struct OutboundBus {
    state: Arc<Mutex<BusState>>,
}

impl OutboundBus {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BusState::default())),
        }
    }

    /// Subscribe to messages matching `filter`.
    ///
    /// Only messages published after subscribing are delivered. Subscribing
    /// to a closed bus yields a receiver that ends immediately.
    pub fn subscribe(&self, filter: ChannelFilter) -> OutboundReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.closed {
            state.subscribers.push((filter, tx));
        }
        rx
    }

    pub fn subscribe_channel(&self, kind: ChannelKind) -> OutboundReceiver {
        self.subscribe(ChannelFilter::Channel(kind))
    }

    /// Publish a message to all matching subscribers.
    ///
    /// Returns false if the bus is already closed. Subscribers whose receiver
    /// was dropped are forgotten.
    pub fn publish(&self, message: OutboundMessage) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.closed {
            return false;
        }
        state.subscribers.retain(|(filter, tx)| {
            if filter.matches(&message) {
                tx.send(message.clone()).is_ok()
            } else {
                !tx.is_closed()
            }
        });
        true
    }

    /// Complete every subscriber stream; later publishes are dropped.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.closed = true;
        state.subscribers.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).closed
    }

    pub fn subscriber_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .subscribers
            .len()
    }
}

impl Default for OutboundBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for OutboundBus {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
