use rustydebug::breakpoint::BreakpointState;
use rustydebug::config::DebuggerConfig;
use rustydebug::model::{Number, Value};
use rustydebug::protocol::{encode_register, frame};
use rustydebug::session::{DebugSession, LinkStatus};
use rustydebug::transport::{ReplayTransport, Transport};
use std::collections::VecDeque;
use std::io;
use std::io::Write;
use tempfile::NamedTempFile;

/// Hands out one queued chunk per read and records writes.
#[derive(Default)]
struct MemTransport {
    chunks: VecDeque<Vec<u8>>,
    written: Vec<u8>,
}

impl MemTransport {
    fn chunk(mut self, bytes: &[u8]) -> Self {
        self.chunks.push_back(bytes.to_vec());
        self
    }
}

impl Transport for MemTransport {
    fn read_available(&mut self) -> io::Result<Vec<u8>> {
        Ok(self.chunks.pop_front().unwrap_or_default())
    }
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.written.extend_from_slice(bytes);
        Ok(())
    }
}

#[test]
fn breakpoint_split_across_ticks() {
    let transport = MemTransport::default()
        .chunk(b"log variable x 1\r\nlog bre")
        .chunk(b"akpoint 9\r\n");
    let mut session = DebugSession::with_transport(transport, DebuggerConfig::default());

    let first = session.tick();
    assert_eq!(first.status, LinkStatus::Open);
    assert_eq!(first.updates.len(), 1);
    assert_eq!(first.updates[0].name, "x");
    assert_eq!(first.updates[0].value, Value::Scalar(Number::Int(1)));
    assert_eq!(first.halted, None);
    assert_eq!(session.breakpoint_state(), &BreakpointState::Idle);

    let second = session.tick();
    assert_eq!(second.halted.as_deref(), Some("9"));
    assert_eq!(
        session.breakpoint_state(),
        &BreakpointState::Halted("9".into())
    );
    assert_eq!(
        session.tracker().get("x").unwrap().history,
        vec![Value::Scalar(Number::Int(1))]
    );

    assert_eq!(session.tick().status, LinkStatus::NoMessages);

    session.skip_breakpoint().unwrap();
    assert_eq!(session.breakpoint_state(), &BreakpointState::Idle);
    assert_eq!(session.transport().unwrap().written, b"ok");
}

#[test]
fn auto_skip_never_exposes_halt() {
    let transport = MemTransport::default().chunk(b"log breakpoint 7\r\nlog breakpoint 8\r\n");
    let config = DebuggerConfig {
        auto_skip: true,
        ..Default::default()
    };
    let mut session = DebugSession::with_transport(transport, config);
    let report = session.tick();
    assert_eq!(report.halted, None);
    assert_eq!(report.skipped, vec!["7".to_string(), "8".to_string()]);
    assert_eq!(session.breakpoint_state(), &BreakpointState::Idle);
    assert_eq!(session.transport().unwrap().written, b"okok");
}

#[test]
fn corrupt_chunk_is_skipped_and_stream_recovers() {
    let transport = MemTransport::default()
        .chunk(b"log variable a 1\r\nlog var")
        .chunk(b"iable b \xff\xfe\r\n")
        .chunk(b"iable c 3\r\n");
    let mut session = DebugSession::with_transport(transport, DebuggerConfig::default());

    assert_eq!(session.tick().updates.len(), 1);
    let dropped = session.tick();
    assert!(dropped.dropped_chunk);
    assert!(dropped.updates.is_empty());

    // The pending "log var" survived the bad chunk.
    let recovered = session.tick();
    assert_eq!(recovered.updates.len(), 1);
    assert_eq!(recovered.updates[0].name, "c");
}

#[test]
fn noise_byte_at_end_of_read_does_not_stall_the_session() {
    let transport = MemTransport::default()
        .chunk(b"log variable a 1\r\n\xc3")
        .chunk(b"log variable a 2\r\n")
        .chunk(b"log variable a 3\r\nlog breakpoint 7\r\n");
    let mut session = DebugSession::with_transport(transport, DebuggerConfig::default());

    assert_eq!(session.tick().updates.len(), 1);
    let second = session.tick();
    assert!(!second.dropped_chunk);
    assert_eq!(second.updates.len(), 1);
    let third = session.tick();
    assert_eq!(third.updates.len(), 1);
    assert_eq!(third.halted.as_deref(), Some("7"));

    let series = session.tracker().get("a").unwrap();
    assert_eq!(series.history.len(), 3);
}

#[test]
fn register_log_becomes_bit_vector() {
    let mut session: DebugSession<MemTransport> = DebugSession::new(DebuggerConfig::default());
    let report = session.process_chunk(&frame(&encode_register("PORTD", &[0x81])));
    let expected: Vec<Number> = [1, 0, 0, 0, 0, 0, 0, 1].into_iter().map(Number::Int).collect();
    assert_eq!(report.updates[0].value, Value::Vector(expected));
    assert_eq!(session.plot("PORTD"), None);
}

#[test]
fn reset_all_then_record_starts_fresh() {
    let mut session: DebugSession<MemTransport> = DebugSession::new(DebuggerConfig::default());
    session.process_chunk(b"log variable x 10\r\nlog variable x 20\r\n");
    session.reset_all();
    assert!(session.tracker().is_empty());
    session.process_chunk(b"log variable x 15\r\n");
    let s = session.tracker().get("x").unwrap();
    assert_eq!(s.min, Some(Number::Int(15)));
    assert_eq!(s.max, Some(Number::Int(15)));
}

#[test]
fn replay_capture_file() -> anyhow::Result<()> {
    let mut capture = NamedTempFile::new()?;
    for i in 0..50 {
        capture.write_all(format!("log variable ramp {}\r\n", i).as_bytes())?;
    }
    capture.write_all(b"log breakpoint 1\r\nlog variable temp 21.50000\r\n")?;
    capture.flush()?;

    let path = camino::Utf8Path::from_path(capture.path()).expect("utf-8 temp path");
    let transport = ReplayTransport::from_file(path, 7)?;
    let config = DebuggerConfig {
        plot_length: 10,
        auto_skip: true,
        ..Default::default()
    };
    let mut session = DebugSession::with_transport(transport, config);
    let mut skipped = Vec::new();
    while !session.transport().unwrap().is_exhausted() {
        skipped.extend(session.tick().skipped);
    }

    assert_eq!(skipped, vec!["1".to_string()]);
    assert_eq!(session.transport().unwrap().written(), b"ok");
    let ramp = session.plot("ramp").unwrap();
    assert_eq!(ramp.len(), 10);
    assert_eq!(ramp.first(), Some(&0.0));
    assert_eq!(ramp.last(), Some(&49.0));
    let temp = session.tracker().get("temp").unwrap();
    assert_eq!(temp.latest(), Some(&Value::Scalar(Number::Float(21.5))));
    Ok(())
}
