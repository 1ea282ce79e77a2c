//! ---
//! tdg_section: "03-correlation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Request/response correlation over a TdLib stream."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
use std::time::{Duration, Instant};

use tdgram_adapter::Adapter;
use tdgram_schema::{
    decode, Function, LogStream, Object, Packet, Request, Response, TdType, SCHEMA_VERSION,
};
use tracing::trace;

use crate::backlog::Backlog;
use crate::config::{ClientConfig, TdLibLogConfig};
use crate::handshake::verify_handshake;
use crate::logging::{log_packet, PacketDirection};
use crate::tagging::ExtraGenerator;
use crate::{ClientError, Result};

/// Synchronous TdLib client correlating responses to requests over one stream.
///
/// Every correlating call takes `&mut self`: one client serves one caller at a
/// time. Wrap it in a mutex to share it.
pub struct TdClient<A> {
    adapter: A,
    backlog: Backlog,
    extras: ExtraGenerator,
    config: ClientConfig,
}

impl<A: Adapter> TdClient<A> {
    /// Create a client with default deadlines.
    pub fn new(adapter: A) -> Self {
        Self::with_config(adapter, ClientConfig::default())
    }

    /// Create a client using the deadlines from `config`.
    pub fn with_config(adapter: A, config: ClientConfig) -> Self {
        Self {
            adapter,
            backlog: Backlog::new(),
            extras: ExtraGenerator::new(),
            config,
        }
    }

    /// Borrow the underlying transport.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Borrow the active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Consume TdLib's first packet and check it announces [`SCHEMA_VERSION`].
    ///
    /// Must run before any [`query`](Self::query); the backlog is bypassed.
    pub fn verify_version(&mut self) -> Result<()> {
        let timeout = self.config.handshake.timeout;
        let first = self.receive_live(timeout)?;
        verify_handshake(first.as_ref(), SCHEMA_VERSION, timeout)?;
        Ok(())
    }

    /// Return the next packet, or `None` if nothing arrived within `timeout`.
    ///
    /// With `process_backlog` set, packets parked by earlier queries are
    /// returned first, oldest first, without touching the transport.
    pub fn receive(&mut self, timeout: Duration, process_backlog: bool) -> Result<Option<Response>> {
        if process_backlog {
            if let Some(packet) = self.backlog.pop() {
                return Ok(Some(packet));
            }
        }
        self.receive_live(timeout)
    }

    fn receive_live(&mut self, timeout: Duration) -> Result<Option<Response>> {
        let Some(raw) = self.adapter.receive(timeout)? else {
            return Ok(None);
        };

        let packet = decode(raw)?;
        log_packet(PacketDirection::Inbound, &packet);

        let Packet { extra, body } = packet;
        match body {
            Object::Error(error) => Err(ClientError::ErrorReceived { error, extra }),
            body => Ok(Some(Packet { extra, body })),
        }
    }

    /// Send a request as-is, without assigning a correlation token.
    pub fn send(&self, request: &Request) -> Result<()> {
        log_packet(PacketDirection::Outbound, request);
        self.adapter.send(request)?;
        Ok(())
    }

    /// Send `request` and wait for the response carrying its `@extra` token.
    ///
    /// The stream is polled in `receive_timeout` slices. Packets with other
    /// tokens are parked in the backlog in arrival order. The deadline is
    /// checked after every poll, so a query gives up at most one poll interval
    /// after `timeout` has passed. An `error` packet aborts the query whatever
    /// token it carries.
    pub fn query(
        &mut self,
        mut request: Request,
        timeout: Duration,
        receive_timeout: Duration,
    ) -> Result<Response> {
        let extra = self.extras.tag(&mut request).to_owned();
        self.send(&request)?;

        let started = Instant::now();
        loop {
            if let Some(packet) = self.receive_live(receive_timeout)? {
                if packet.extra() == Some(extra.as_str()) {
                    return Ok(packet);
                }
                trace!(
                    kind = packet.type_name(),
                    awaiting = %extra,
                    backlog = self.backlog.len() + 1,
                    "parking unrelated packet"
                );
                self.backlog.push(packet);
            }

            if started.elapsed() > timeout {
                return Err(ClientError::QueryTimeout {
                    request: Box::new(request),
                });
            }
        }
    }

    /// [`query`](Self::query) with the deadlines from the client configuration.
    pub fn query_default(&mut self, request: Request) -> Result<Response> {
        let timeout = self.config.query.timeout;
        let receive_timeout = self.config.query.receive_timeout;
        self.query(request, timeout, receive_timeout)
    }

    /// Number of packets parked by queries and not yet received.
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Take every parked packet, oldest first.
    pub fn drain_backlog(&mut self) -> Vec<Response> {
        self.backlog.drain()
    }

    /// Set the verbosity of TdLib's internal log.
    ///
    /// 0 = fatal errors, 1 = errors, 2 = warnings, 3 = info, 4 = debug,
    /// 5 = verbose debug; up to 1023 for even more output.
    pub fn set_log_verbosity_level(&self, level: i32) -> Result<&Self> {
        self.execute(Function::SetLogVerbosityLevel {
            new_verbosity_level: level,
        })
    }

    /// Write TdLib's internal log to `path`, rotating after `max_file_size` bytes.
    pub fn set_log_to_file(&self, path: impl Into<String>, max_file_size: i64) -> Result<&Self> {
        self.set_log_stream(LogStream::File {
            path: path.into(),
            max_file_size,
            redirect_stderr: false,
        })
    }

    /// Send TdLib's internal log to stderr.
    pub fn set_log_to_stderr(&self) -> Result<&Self> {
        self.set_log_stream(LogStream::Default)
    }

    /// Discard TdLib's internal log.
    pub fn set_log_to_none(&self) -> Result<&Self> {
        self.set_log_stream(LogStream::Empty)
    }

    /// Forward the configured TdLib log settings; unset fields are left alone.
    pub fn apply_tdlib_log(&self, log: &TdLibLogConfig) -> Result<()> {
        if let Some(level) = log.verbosity {
            self.set_log_verbosity_level(level)?;
        }
        if let Some(stream) = &log.stream {
            self.set_log_stream(stream.to_log_stream())?;
        }
        Ok(())
    }

    fn set_log_stream(&self, log_stream: LogStream) -> Result<&Self> {
        self.execute(Function::SetLogStream { log_stream })
    }

    fn execute(&self, function: Function) -> Result<&Self> {
        let request = Request::new(function);
        log_packet(PacketDirection::Execute, &request);
        self.adapter.execute(&request)?;
        Ok(self)
    }
}
