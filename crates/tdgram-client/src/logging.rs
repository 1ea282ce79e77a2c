//! ---
//! tdg_section: "03-correlation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Request/response correlation over a TdLib stream."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
use std::fmt::Debug;

use tdgram_schema::{Packet, TdType};
use tracing::debug;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

const LOG_ENV: &str = "TDGRAM_LOG";

/// Install a baseline tracing subscriber.
///
/// `TDGRAM_LOG` takes precedence over `RUST_LOG`; without either only `info`
/// and above is shown. Safe to call more than once.
pub fn init() {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let _ = Registry::default()
        .with(filter)
        .with(subscriber_fmt::layer())
        .try_init();
}

/// Which way a packet moved relative to TdLib.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketDirection {
    /// Handed to the asynchronous send path.
    Outbound,
    /// Taken off the receive stream.
    Inbound,
    /// Handed to the synchronous execute path.
    Execute,
}

/// Emit the debug event for a packet crossing the transport.
pub fn log_packet<T>(direction: PacketDirection, packet: &Packet<T>)
where
    T: TdType + Debug,
{
    let kind = packet.type_name();
    let extra = packet.extra().unwrap_or_default();
    match direction {
        PacketDirection::Outbound => {
            debug!(packet = ?packet, extra, "Sending packet \"{}\" to TdLib", kind)
        }
        PacketDirection::Inbound => {
            debug!(packet = ?packet, extra, "Received packet \"{}\" from TdLib", kind)
        }
        PacketDirection::Execute => {
            debug!(packet = ?packet, extra, "Executing packet \"{}\" in TdLib", kind)
        }
    }
}
