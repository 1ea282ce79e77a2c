//! ---
//! tdg_section: "03-correlation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Request/response correlation over a TdLib stream."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
use std::collections::VecDeque;

use tdgram_schema::Response;

/// Packets received while a different token was awaited, in arrival order.
#[derive(Debug, Default)]
pub struct Backlog {
    packets: VecDeque<Response>,
}

impl Backlog {
    /// Create an empty backlog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a packet behind everything already queued.
    pub fn push(&mut self, packet: Response) {
        self.packets.push_back(packet);
    }

    /// Take the oldest parked packet.
    pub fn pop(&mut self) -> Option<Response> {
        self.packets.pop_front()
    }

    /// Number of parked packets.
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    /// Whether nothing is parked.
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Iterate parked packets oldest first without removing them.
    pub fn iter(&self) -> impl Iterator<Item = &Response> {
        self.packets.iter()
    }

    /// Remove and return every parked packet, oldest first.
    pub fn drain(&mut self) -> Vec<Response> {
        self.packets.drain(..).collect()
    }
}
