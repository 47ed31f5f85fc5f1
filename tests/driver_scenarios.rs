//! End-to-end runs of the synthesis loop against a scripted engine.
//!
//! These cover the fail-stop policy, ledger accounting and archive contents
//! without any network access.

use std::collections::VecDeque;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use voiceover_rs::{
    dictionary::PronunciationDict,
    driver::{LineEvent, SynthesisDriver},
    error::RunError,
    ledger::{Credential, CredentialLedger, FileLedger, MemoryLedger, DEFAULT_QUOTA},
    ProviderError, SynthesisEngine,
};

/// Engine that replays canned responses and records what it was sent.
#[derive(Default)]
struct ScriptedEngine {
    responses: VecDeque<Result<Vec<u8>, ProviderError>>,
    calls: Vec<(String, String)>,
}

impl ScriptedEngine {
    fn new(responses: Vec<Result<Vec<u8>, ProviderError>>) -> Self {
        Self {
            responses: responses.into(),
            calls: Vec::new(),
        }
    }
}

impl SynthesisEngine for ScriptedEngine {
    type SynthesisParams = ();

    fn synthesize(
        &mut self,
        text: &str,
        api_key: &str,
        _params: Option<()>,
    ) -> Result<Vec<u8>, ProviderError> {
        self.calls.push((text.to_string(), api_key.to_string()));
        self.responses
            .pop_front()
            .unwrap_or_else(|| Ok(format!("audio:{text}").into_bytes()))
    }
}

#[derive(Debug, PartialEq)]
enum Seen {
    Started(usize, String),
    Synthesized(usize),
    Failed(usize),
}

fn record(events: &mut Vec<Seen>) -> impl FnMut(&LineEvent<'_>) + '_ {
    move |event| {
        events.push(match event {
            LineEvent::Started { index, text } => Seen::Started(*index, text.to_string()),
            LineEvent::Synthesized { result } => Seen::Synthesized(result.index),
            LineEvent::Failed { index, .. } => Seen::Failed(*index),
        })
    }
}

fn write_ledger(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("api_keys.json");
    fs::write(&path, json).unwrap();
    path
}

fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut entry = zip.by_index(i).unwrap();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            (entry.name().to_string(), data)
        })
        .collect()
}

#[test]
fn single_line_success_charges_words_and_archives_clip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_ledger(dir.path(), r#"[{"key": "k1", "used": 0}]"#);

    let engine = ScriptedEngine::new(vec![Ok(b"mp3-bytes".to_vec())]);
    let mut driver = SynthesisDriver::new(engine, FileLedger::new(&path), PronunciationDict::default());

    let mut events = Vec::new();
    let report = driver.run(&["Hello world"], record(&mut events)).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.results[0].text, "Hello world.");
    assert_eq!(report.words_charged(), 2);
    assert_eq!(
        zip_entries(&report.archive),
        [("1.mp3".to_string(), b"mp3-bytes".to_vec())]
    );
    assert_eq!(
        events,
        [Seen::Started(1, "Hello world.".to_string()), Seen::Synthesized(1)]
    );

    let (engine, mut ledger) = driver.into_parts();
    assert_eq!(engine.calls, [("Hello world.".to_string(), "k1".to_string())]);
    assert_eq!(ledger.credentials().unwrap()[0].used, 2);
}

#[test]
fn provider_failure_stops_before_next_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_ledger(dir.path(), r#"[{"key": "k1", "used": 0}]"#);

    let engine = ScriptedEngine::new(vec![Err(ProviderError::Status {
        status: 500,
        message: "boom".to_string(),
    })]);
    let mut driver = SynthesisDriver::new(engine, FileLedger::new(&path), PronunciationDict::default());

    let mut events = Vec::new();
    let report = driver
        .run(&["First line", "Second line"], record(&mut events))
        .unwrap();

    assert!(!report.is_complete());
    assert!(report.results.is_empty());
    assert!(zip_entries(&report.archive).is_empty());
    assert!(matches!(
        report.stopped,
        Some(RunError::Provider(ProviderError::Status { status: 500, .. }))
    ));
    assert_eq!(
        events,
        [Seen::Started(1, "First line.".to_string()), Seen::Failed(1)]
    );

    let (engine, mut ledger) = driver.into_parts();
    assert_eq!(engine.calls.len(), 1);
    assert_eq!(ledger.credentials().unwrap()[0].used, 0);
}

#[test]
fn quota_is_checked_before_the_call_only() {
    let ledger = MemoryLedger::new(vec![Credential::new("k1", 9_999)], DEFAULT_QUOTA);
    let mut driver = SynthesisDriver::new(ScriptedEngine::default(), ledger, PronunciationDict::default());

    let report = driver.run(&["one two three four five"], |_| {}).unwrap();

    assert!(report.is_complete());
    assert_eq!(driver.ledger_mut().credentials().unwrap()[0].used, 10_004);
}

#[test]
fn keys_rotate_in_ledger_order() {
    let ledger = MemoryLedger::new(
        vec![Credential::new("first", 0), Credential::new("second", 0)],
        2,
    );
    let mut driver = SynthesisDriver::new(ScriptedEngine::default(), ledger, PronunciationDict::default());

    let report = driver.run(&["Good morning", "Good night"], |_| {}).unwrap();
    assert!(report.is_complete());

    let (engine, mut ledger) = driver.into_parts();
    let keys: Vec<&str> = engine.calls.iter().map(|(_, k)| k.as_str()).collect();
    assert_eq!(keys, ["first", "second"]);

    let used: Vec<u64> = ledger.credentials().unwrap().iter().map(|c| c.used).collect();
    assert_eq!(used, [2, 2]);
}

#[test]
fn exhaustion_mid_run_keeps_earlier_clips() {
    let ledger = MemoryLedger::new(vec![Credential::new("only", 0)], 3);
    let mut driver = SynthesisDriver::new(ScriptedEngine::default(), ledger, PronunciationDict::default());

    let mut events = Vec::new();
    let report = driver
        .run(&["a b c", "d e", "f"], record(&mut events))
        .unwrap();

    assert!(matches!(report.stopped, Some(RunError::CredentialsExhausted)));
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.total_lines, 3);

    let names: Vec<String> = zip_entries(&report.archive).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["1.mp3"]);
    assert_eq!(events.last(), Some(&Seen::Failed(2)));

    let (engine, _) = driver.into_parts();
    assert_eq!(engine.calls.len(), 1);
}

#[test]
fn exhausted_ledger_never_calls_engine() {
    let ledger = MemoryLedger::new(vec![Credential::new("spent", 10)], 10);
    let mut driver = SynthesisDriver::new(ScriptedEngine::default(), ledger, PronunciationDict::default());

    let report = driver.run(&["Anything"], |_| {}).unwrap();

    assert!(matches!(report.stopped, Some(RunError::CredentialsExhausted)));
    let (engine, _) = driver.into_parts();
    assert!(engine.calls.is_empty());
}

#[test]
fn empty_input_does_not_start() {
    let ledger = MemoryLedger::new(vec![Credential::new("k", 0)], DEFAULT_QUOTA);
    let mut driver = SynthesisDriver::new(ScriptedEngine::default(), ledger, PronunciationDict::default());

    let lines: Vec<String> = vec!["".into(), "   ".into()];
    assert!(matches!(
        driver.run(&lines, |_| {}),
        Err(RunError::EmptyInput)
    ));

    let (engine, mut ledger) = driver.into_parts();
    assert!(engine.calls.is_empty());
    assert_eq!(ledger.credentials().unwrap()[0].used, 0);
}

#[test]
fn pronunciations_apply_after_normalizing_and_count_toward_usage() {
    let dict = PronunciationDict::from_pairs([("AI".to_string(), "ay eye".to_string())]);
    let ledger = MemoryLedger::new(vec![Credential::new("k", 0)], DEFAULT_QUOTA);
    let mut driver = SynthesisDriver::new(ScriptedEngine::default(), ledger, dict);

    let report = driver.run(&["  AI   rocks "], |_| {}).unwrap();

    assert_eq!(report.results[0].text, "ay eye rocks.");
    assert_eq!(report.results[0].source_line, "  AI   rocks ");
    assert_eq!(driver.ledger_mut().credentials().unwrap()[0].used, 3);
}

#[test]
fn blank_lines_do_not_consume_indices() {
    let ledger = MemoryLedger::new(vec![Credential::new("k", 0)], DEFAULT_QUOTA);
    let mut driver = SynthesisDriver::new(ScriptedEngine::default(), ledger, PronunciationDict::default());

    let report = driver.run(&["one", "", "two"], |_| {}).unwrap();

    let names: Vec<String> = zip_entries(&report.archive).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["1.mp3", "2.mp3"]);
}

#[test]
fn transport_failure_is_fail_stop() {
    let engine = ScriptedEngine::new(vec![
        Ok(b"first".to_vec()),
        Err(ProviderError::Transport("connection reset".to_string())),
    ]);
    let ledger = MemoryLedger::new(vec![Credential::new("k", 0)], DEFAULT_QUOTA);
    let mut driver = SynthesisDriver::new(engine, ledger, PronunciationDict::default())
        .with_archive_extension("wav");

    let report = driver.run(&["one", "two", "three"], |_| {}).unwrap();

    assert!(matches!(
        report.stopped,
        Some(RunError::Provider(ProviderError::Transport(_)))
    ));
    let names: Vec<String> = zip_entries(&report.archive).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["1.wav"]);
    assert_eq!(driver.ledger_mut().credentials().unwrap()[0].used, 1);
}

#[test]
fn missing_ledger_file_stops_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = FileLedger::new(dir.path().join("missing.json"));
    let mut driver = SynthesisDriver::new(ScriptedEngine::default(), ledger, PronunciationDict::default());

    let report = driver.run(&["hello"], |_| {}).unwrap();

    assert!(matches!(report.stopped, Some(RunError::Ledger(_))));
    assert!(report.results.is_empty());
}
