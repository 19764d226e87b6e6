// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::LoadEvent;
use std::time::Duration;

/// The receiving side of the settle channel, owned by the coordinator.
///
/// Loader jobs hold a [`SettleSender`] and publish into it from any thread.
/// Only the owner drains the channel, which keeps every state mutation on a
/// single thread.
#[derive(Debug)]
pub struct SettleChannel {
    sender: flume::Sender<LoadEvent>,
    receiver: flume::Receiver<LoadEvent>,
}

impl SettleChannel {
    /// Creates a new channel backed by an unbounded flume queue.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::trace!("Settle channel initialized.");
        Self { sender, receiver }
    }

    /// Returns a sender that loader jobs use to publish outcomes.
    pub fn sender(&self) -> SettleSender {
        SettleSender {
            inner: self.sender.clone(),
        }
    }

    /// Takes the oldest queued event without blocking.
    ///
    /// Events are handed out one at a time, so anything not yet taken stays
    /// queued if the caller unwinds while applying an earlier one.
    pub fn try_next(&self) -> Option<LoadEvent> {
        self.receiver.try_recv().ok()
    }

    /// Blocks until an event arrives or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> Option<LoadEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Number of events waiting to be drained.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` if no event is waiting.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for SettleChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// The publishing side of the settle channel.
#[derive(Debug, Clone)]
pub struct SettleSender {
    inner: flume::Sender<LoadEvent>,
}

impl SettleSender {
    /// Publishes an outcome. Logs if the coordinator has been dropped.
    pub fn publish(&self, event: LoadEvent) {
        let key = event.key.clone();
        if self.inner.send(event).is_err() {
            log::error!("Dropping settle event for '{key}': coordinator is gone");
        }
    }
}
