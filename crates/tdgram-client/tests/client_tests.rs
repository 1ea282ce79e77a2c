//! ---
//! tdg_section: "03-correlation"
//! tdg_subsection: "tests"
//! tdg_type: "source"
//! tdg_scope: "test"
//! tdg_description: "Client behaviour against a mocked transport."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Duration;

use mockall::predicate::eq;
use mockall::{mock, Sequence};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tdgram_adapter::Adapter;
use tdgram_client::{ClientError, HandshakeMismatch, TdClient};
use tdgram_schema::{Function, LogStream, Object, OptionValue, Request, UpdateOption};

mock! {
    pub Transport {}

    impl Adapter for Transport {
        fn send(&self, request: &Request) -> tdgram_adapter::Result<()>;
        fn receive(&self, timeout: Duration) -> tdgram_adapter::Result<Option<Value>>;
        fn execute(&self, request: &Request) -> tdgram_adapter::Result<()>;
    }
}

const HANDSHAKE_WAIT: Duration = Duration::from_secs(10);
const POLL: Duration = Duration::from_millis(100);

fn version_update(version: &str) -> Value {
    json!({
        "@type": "updateOption",
        "name": "version",
        "value": {"@type": "optionValueString", "value": version}
    })
}

fn empty_update(name: &str) -> Value {
    json!({
        "@type": "updateOption",
        "name": name,
        "value": {"@type": "optionValueEmpty"}
    })
}

fn get_option(name: &str) -> Request {
    Request::new(Function::GetOption { name: name.into() })
}

fn transport_with_first_packet(packet: Value) -> MockTransport {
    let mut transport = MockTransport::new();
    transport
        .expect_receive()
        .with(eq(HANDSHAKE_WAIT))
        .times(1)
        .return_once(move |_| Ok(Some(packet)));
    transport
}

#[test]
fn verify_version_accepts_matching_schema() {
    let mut client = TdClient::new(transport_with_first_packet(version_update("1.6.0")));
    client.verify_version().expect("versions match");
}

#[test]
fn verify_version_rejects_wrong_first_packet() {
    let mut client = TdClient::new(transport_with_first_packet(json!({"@type": "ok"})));

    let err = client.verify_version().expect_err("ok is not a handshake");
    assert!(matches!(
        &err,
        ClientError::HandshakeMismatch(HandshakeMismatch::UnexpectedPacket { received }) if received == "ok"
    ));
    assert_eq!(
        err.to_string(),
        "First packet supposed to be \"UpdateOption\" received \"ok\""
    );
}

#[test]
fn verify_version_rejects_other_version() {
    let mut client = TdClient::new(transport_with_first_packet(version_update("1.5.0")));

    let err = client.verify_version().expect_err("old TdLib");
    assert_eq!(
        err.to_string(),
        "Client TdLib version \"1.5.0\" doesn't match Schema version \"1.6.0\""
    );
}

#[test]
fn verify_version_fails_when_tdlib_stays_silent() {
    let mut transport = MockTransport::new();
    transport
        .expect_receive()
        .with(eq(HANDSHAKE_WAIT))
        .times(1)
        .returning(|_| Ok(None));
    let mut client = TdClient::new(transport);

    assert!(matches!(
        client.verify_version(),
        Err(ClientError::HandshakeMismatch(HandshakeMismatch::NoPacket { .. }))
    ));
}

#[test]
fn receive_returns_packets_nothing_and_errors_in_turn() {
    let wait = Duration::from_secs(10);
    let mut seq = Sequence::new();
    let mut transport = MockTransport::new();
    transport
        .expect_receive()
        .with(eq(wait))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(Some(empty_update("a"))));
    transport
        .expect_receive()
        .with(eq(wait))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(None));
    transport
        .expect_receive()
        .with(eq(wait))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(Some(json!({"@type": "error", "code": 1, "message": "2"}))));
    let mut client = TdClient::new(transport);

    let first = client.receive(wait, true).expect("first").expect("packet");
    assert_eq!(
        first.body,
        Object::UpdateOption(UpdateOption::new("a", OptionValue::Empty))
    );

    assert!(client.receive(wait, true).expect("second").is_none());

    let err = client.receive(wait, true).expect_err("error packet");
    assert_eq!(err.to_string(), "Received Error Packet 1: \"2\"");
}

#[test]
fn send_forwards_request_untouched() {
    let mut transport = MockTransport::new();
    transport
        .expect_send()
        .withf(|request: &Request| {
            request.extra.is_none()
                && request.body
                    == Function::GetOption {
                        name: "foo".into(),
                    }
        })
        .times(1)
        .returning(|_| Ok(()));

    let client = TdClient::new(transport);
    client.send(&get_option("foo")).expect("send");
}

#[test]
fn query_returns_tagged_response_and_parks_the_rest() {
    let token: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let mut seq = Sequence::new();
    let mut transport = MockTransport::new();

    let captured = Arc::clone(&token);
    transport
        .expect_send()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |request: &Request| {
            assert_eq!(
                request.body,
                Function::GetOption {
                    name: "foo".into()
                }
            );
            *captured.lock() = request.extra.clone();
            Ok(())
        });
    transport
        .expect_receive()
        .with(eq(POLL))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(Some(empty_update("a"))));
    transport
        .expect_receive()
        .with(eq(POLL))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(None));
    let echoed = Arc::clone(&token);
    transport
        .expect_receive()
        .with(eq(POLL))
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(Some(json!({"@type": "ok", "@extra": echoed.lock().clone()}))));

    let mut client = TdClient::new(transport);
    let response = client.query_default(get_option("foo")).expect("query");

    let assigned = token.lock().clone().expect("token assigned on send");
    assert!(!assigned.is_empty());
    assert_eq!(response.extra(), Some(assigned.as_str()));
    assert_eq!(response.body, Object::Ok);

    let parked = client
        .receive(Duration::from_secs(1), true)
        .expect("backlog")
        .expect("parked packet");
    assert_eq!(
        parked.body,
        Object::UpdateOption(UpdateOption::new("a", OptionValue::Empty))
    );
}

#[test]
fn query_times_out_on_silence() {
    let mut transport = MockTransport::new();
    transport.expect_send().times(1).returning(|_| Ok(()));
    transport
        .expect_receive()
        .with(eq(POLL))
        .returning(|_| Ok(None));
    let mut client = TdClient::new(transport);

    let err = client
        .query(get_option("foo"), Duration::ZERO, POLL)
        .expect_err("nothing ever arrives");
    assert!(err.is_timeout());
    assert_eq!(err.to_string(), "Query for \"getOption\" packet received timeout");
}

#[test]
fn query_times_out_on_endless_unrelated_traffic() {
    let mut transport = MockTransport::new();
    transport.expect_send().times(1).returning(|_| Ok(()));
    transport
        .expect_receive()
        .with(eq(POLL))
        .returning(|_| Ok(Some(empty_update("a"))));
    let mut client = TdClient::new(transport);

    let err = client
        .query(get_option("foo"), Duration::ZERO, POLL)
        .expect_err("no match ever arrives");
    match err {
        ClientError::QueryTimeout { request } => {
            assert!(request.extra.is_some());
            assert_eq!(
                request.body,
                Function::GetOption {
                    name: "foo".into()
                }
            );
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
    assert!(client.backlog_len() >= 1);
}

#[test]
fn log_settings_are_executed_in_order() {
    let mut seq = Sequence::new();
    let mut transport = MockTransport::new();
    transport
        .expect_execute()
        .withf(|request: &Request| {
            request.body
                == Function::SetLogVerbosityLevel {
                    new_verbosity_level: 1,
                }
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    transport
        .expect_execute()
        .withf(|request: &Request| {
            request.body
                == Function::SetLogStream {
                    log_stream: LogStream::Default,
                }
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    transport
        .expect_execute()
        .withf(|request: &Request| {
            request.body
                == Function::SetLogStream {
                    log_stream: LogStream::Empty,
                }
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    transport
        .expect_execute()
        .withf(|request: &Request| {
            matches!(
                &request.body,
                Function::SetLogStream {
                    log_stream: LogStream::File { path, max_file_size, .. },
                } if path == "foo" && *max_file_size == i64::MAX
            )
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let client = TdClient::new(transport);
    client
        .set_log_verbosity_level(1)
        .and_then(|c| c.set_log_to_stderr())
        .and_then(|c| c.set_log_to_none())
        .and_then(|c| c.set_log_to_file("foo", i64::MAX))
        .expect("log settings");
}
