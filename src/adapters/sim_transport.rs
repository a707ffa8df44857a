//! Loopback pub/sub transport adapter.
//!
//! Implements [`TelemetryTransport`] as an in-process broker: test code
//! and the simulator publish with [`SimTransport::publish`], and only
//! messages matching a live subscription reach the inbox — exactly the
//! filtering a real broker performs.

use std::collections::{BTreeSet, VecDeque};

use log::debug;

use crate::app::ports::{TelemetryTransport, TransportError};

/// In-memory broker stand-in.
#[derive(Default)]
pub struct SimTransport {
    subscribed: BTreeSet<String>,
    inbox: VecDeque<(String, Vec<u8>)>,
    /// Every subscribe/unsubscribe call, for assertions and the sim log.
    pub subscription_log: Vec<String>,
}

impl SimTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a message into the broker. Dropped unless some live
    /// subscription matches the topic.
    pub fn publish(&mut self, topic: &str, payload: &[u8]) {
        if self.subscribed.contains(topic) {
            self.inbox.push_back((topic.to_string(), payload.to_vec()));
        } else {
            debug!("sim broker: no subscriber for '{topic}', dropping");
        }
    }

    /// Topics with a live subscription, ordered.
    pub fn subscriptions(&self) -> Vec<String> {
        self.subscribed.iter().cloned().collect()
    }

    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.subscribed.contains(topic)
    }
}

impl TelemetryTransport for SimTransport {
    fn subscribe(&mut self, topics: &[String]) -> Result<(), TransportError> {
        for topic in topics {
            self.subscribed.insert(topic.clone());
            self.subscription_log.push(format!("+{topic}"));
        }
        Ok(())
    }

    fn unsubscribe(&mut self, topics: &[String]) -> Result<(), TransportError> {
        for topic in topics {
            self.subscribed.remove(topic);
            self.subscription_log.push(format!("-{topic}"));
        }
        Ok(())
    }

    fn poll(&mut self) -> Option<(String, Vec<u8>)> {
        self.inbox.pop_front()
    }
}
