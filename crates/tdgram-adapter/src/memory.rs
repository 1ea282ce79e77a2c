//! ---
//! tdg_section: "02-transport"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Transport contract and loopback transport."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use serde_json::Value as JsonValue;
use tdgram_schema::{encode, Request, TdType};

use crate::{Adapter, AdapterError, Result};

type Responder = Box<dyn FnMut(&Request) -> Vec<JsonValue> + Send>;

/// Loopback transport backed by a condvar-guarded queue.
///
/// Inbound payloads are scripted with [`push_incoming`](Self::push_incoming) and
/// [`push_timeout`](Self::push_timeout), or produced per sent request by a
/// [`respond_with`](Self::respond_with) hook. Clones share the same queue, so one
/// handle can feed a client while another inspects what was sent.
#[derive(Clone, Default)]
pub struct InMemoryAdapter {
    shared: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    arrived: Condvar,
}

#[derive(Default)]
struct State {
    inbound: VecDeque<Inbound>,
    sent: Vec<Request>,
    executed: Vec<Request>,
    receive_timeouts: Vec<Duration>,
    responder: Option<Responder>,
    closed: bool,
}

enum Inbound {
    Packet(JsonValue),
    Timeout,
}

impl InMemoryAdapter {
    /// Create an empty loopback transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw payload for a future [`Adapter::receive`].
    pub fn push_incoming(&self, raw: JsonValue) {
        self.push(Inbound::Packet(raw));
    }

    /// Queue an explicit "nothing arrived" result, consumed by exactly one receive.
    pub fn push_timeout(&self) {
        self.push(Inbound::Timeout);
    }

    /// Install a hook producing inbound payloads for every sent request.
    pub fn respond_with<F>(&self, responder: F)
    where
        F: FnMut(&Request) -> Vec<JsonValue> + Send + 'static,
    {
        self.shared.state.lock().responder = Some(Box::new(responder));
    }

    /// Requests handed to [`Adapter::send`], in order.
    pub fn sent(&self) -> Vec<Request> {
        self.shared.state.lock().sent.clone()
    }

    /// Requests handed to [`Adapter::execute`], in order.
    pub fn executed(&self) -> Vec<Request> {
        self.shared.state.lock().executed.clone()
    }

    /// Timeouts passed to every [`Adapter::receive`] call, in order.
    pub fn receive_timeouts(&self) -> Vec<Duration> {
        self.shared.state.lock().receive_timeouts.clone()
    }

    /// Number of queued inbound entries not yet received.
    pub fn pending(&self) -> usize {
        self.shared.state.lock().inbound.len()
    }

    /// Shut the transport down; every later call fails with [`AdapterError::Closed`].
    pub fn close(&self) {
        self.shared.state.lock().closed = true;
        self.shared.arrived.notify_all();
    }

    fn push(&self, entry: Inbound) {
        self.shared.state.lock().inbound.push_back(entry);
        self.shared.arrived.notify_all();
    }
}

impl Adapter for InMemoryAdapter {
    fn send(&self, request: &Request) -> Result<()> {
        let raw = encode(request)?;
        let mut guard = self.shared.state.lock();
        if guard.closed {
            return Err(AdapterError::Closed);
        }
        tracing::trace!(packet = %raw, "loopback send");

        let state = &mut *guard;
        state.sent.push(request.clone());
        if let Some(responder) = state.responder.as_mut() {
            let replies = responder(request);
            state
                .inbound
                .extend(replies.into_iter().map(Inbound::Packet));
            self.shared.arrived.notify_all();
        }
        Ok(())
    }

    fn receive(&self, timeout: Duration) -> Result<Option<JsonValue>> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.shared.state.lock();
        state.receive_timeouts.push(timeout);

        loop {
            if state.closed {
                return Err(AdapterError::Closed);
            }
            match state.inbound.pop_front() {
                Some(Inbound::Packet(raw)) => return Ok(Some(raw)),
                Some(Inbound::Timeout) => return Ok(None),
                None => {}
            }
            match deadline {
                Some(deadline) if Instant::now() >= deadline => return Ok(None),
                Some(deadline) => {
                    let _ = self.shared.arrived.wait_until(&mut state, deadline);
                }
                None => self.shared.arrived.wait(&mut state),
            }
        }
    }

    fn execute(&self, request: &Request) -> Result<()> {
        encode(request)?;
        let mut state = self.shared.state.lock();
        if state.closed {
            return Err(AdapterError::Closed);
        }
        tracing::trace!(kind = request.type_name(), "loopback execute");
        state.executed.push(request.clone());
        Ok(())
    }
}
