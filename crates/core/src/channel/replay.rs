// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streams that replay their most recent value to new subscribers

use futures::Stream;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::sync::mpsc;

struct ReplayState<T> {
    latest: Option<T>,
    subscribers: Vec<mpsc::UnboundedSender<T>>,
    closed: bool,
}

/// A multicast stream that hands the latest value to late subscribers.
///
/// Subscribers see the latest value published before they subscribed (not
/// the history before it) followed by everything published afterwards.
/// Once closed, new subscribers still receive the final value and then end.
pub struct Replay<T> {
    state: Arc<Mutex<ReplayState<T>>>,
}

impl<T: Clone> Replay<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ReplayState {
                latest: None,
                subscribers: Vec::new(),
                closed: false,
            })),
        }
    }

    /// Publish a value; ignored once closed.
    pub fn publish(&self, value: T) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.closed {
            return;
        }
        state
            .subscribers
            .retain(|tx| tx.send(value.clone()).is_ok());
        state.latest = Some(value);
    }

    pub fn subscribe(&self) -> ReplayReceiver<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(latest) = &state.latest {
            let _ = tx.send(latest.clone());
        }
        if !state.closed {
            state.subscribers.push(tx);
        }
        ReplayReceiver { rx }
    }

    /// Complete the stream for all current subscribers.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.closed = true;
        state.subscribers.clear();
    }

    pub fn latest(&self) -> Option<T> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .latest
            .clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).closed
    }
}

impl<T: Clone> Default for Replay<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Replay<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

/// Subscription handle returned by [`Replay::subscribe`].
pub struct ReplayReceiver<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> ReplayReceiver<T> {
    /// Next value, or `None` once the stream is complete.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Next value if one is already buffered.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl<T> Stream for ReplayReceiver<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
