// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel multiplexing and replayed streams

mod bus;
mod replay;

pub use bus::{ChannelFilter, OutboundBus, OutboundReceiver, OutboundSender};
pub use replay::{Replay, ReplayReceiver};
