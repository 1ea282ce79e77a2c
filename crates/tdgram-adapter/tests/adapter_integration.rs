//! ---
//! tdg_section: "02-transport"
//! tdg_subsection: "tests"
//! tdg_type: "source"
//! tdg_scope: "test"
//! tdg_description: "Loopback transport driven through the trait object."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
use std::time::Duration;

use serde_json::json;
use tdgram_adapter::{Adapter, InMemoryAdapter};
use tdgram_schema::{decode, Function, Object, Request};

#[test]
fn boxed_adapter_round_trips_through_the_registry() -> anyhow::Result<()> {
    let loopback = InMemoryAdapter::new();
    loopback.respond_with(|request| match &request.body {
        Function::GetLogVerbosityLevel => vec![json!({
            "@type": "logVerbosityLevel",
            "verbosity_level": 3,
            "@extra": request.extra,
        })],
        _ => vec![json!({"@type": "ok", "@extra": request.extra})],
    });
    let adapter: Box<dyn Adapter> = Box::new(loopback.clone());

    adapter.send(&Request::with_extra(Function::GetLogVerbosityLevel, "v"))?;
    adapter.send(&Request::with_extra(Function::Close, "c"))?;

    let first = decode(adapter.receive(Duration::ZERO)?.expect("first reply"))?;
    let second = decode(adapter.receive(Duration::ZERO)?.expect("second reply"))?;
    assert_eq!(first.extra(), Some("v"));
    assert!(matches!(first.body, Object::LogVerbosityLevel(level) if level.verbosity_level == 3));
    assert_eq!(second.extra(), Some("c"));
    assert_eq!(second.body, Object::Ok);
    assert_eq!(loopback.pending(), 0);
    Ok(())
}
