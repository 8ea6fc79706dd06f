//! Keystroke scripts replayed through the engine into an in-memory terminal.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use super::*;
use crate::console::{CharSource, ScriptedSource, chars};
use crate::error::Result;

const OPTIONS: [&str; 8] = [
    "test",
    "testing",
    "auto",
    "autocomplete",
    "foo",
    "bar",
    "aurora",
    "auras",
];

/// Flat vocabulary that logs every context it is asked about.
fn recording_provider() -> (Arc<dyn CandidateProvider>, Arc<Mutex<Vec<String>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&calls);
    let provider: Arc<dyn CandidateProvider> = Arc::new(move |context: &str| -> Vec<String> {
        log.lock().unwrap().push(context.to_string());
        OPTIONS.iter().map(|s| s.to_string()).collect()
    });
    (provider, calls)
}

fn completer() -> AutoCompleter<Vec<u8>> {
    AutoCompleter::new(Arc::new(StaticOptions::new(OPTIONS)), Vec::new())
}

/// Single-shot session: outcome, terminal output and unread input.
fn complete_with(engine: &mut AutoCompleter<Vec<u8>>, script: &str) -> (Completion, String, String) {
    let mut source = ScriptedSource::new(script);
    let outcome = engine.complete(&mut source).unwrap();
    let output = String::from_utf8(engine.output().clone()).unwrap();
    (outcome, output, source.remaining())
}

fn complete(script: &str) -> (Completion, String, String) {
    complete_with(&mut completer(), script)
}

fn line(text: &str) -> Completion {
    Completion::Line(text.to_string())
}

/// Stops the loop from outside once the script is used up, so the screen is
/// left exactly as the last keystroke drew it.
struct StopAtEnd {
    inner: ScriptedSource,
    token: CancellationToken,
}

impl CharSource for StopAtEnd {
    fn read_char(&mut self) -> Result<char> {
        let c = self.inner.read_char()?;
        if c == chars::END_OF_INPUT {
            self.token.cancel();
        }
        Ok(c)
    }
}

/// Continuous session stopped after `script`: committed lines and output.
fn replay_with(mut engine: AutoCompleter<Vec<u8>>, script: &str) -> (Vec<Completion>, String) {
    let token = CancellationToken::new();
    let source = StopAtEnd {
        inner: ScriptedSource::new(script),
        token: token.clone(),
    };
    let mut lines = Vec::new();
    engine
        .run_blocking(
            source,
            |completion| {
                lines.push(completion);
                true
            },
            &token,
        )
        .unwrap();
    (lines, String::from_utf8(engine.into_output()).unwrap())
}

fn replay(script: &str) -> (Vec<Completion>, String) {
    replay_with(completer(), script)
}

/// Reads from a channel so tests decide when each keystroke arrives.
struct ChannelSource(mpsc::Receiver<char>);

impl CharSource for ChannelSource {
    fn read_char(&mut self) -> Result<char> {
        Ok(self.0.recv().unwrap_or(chars::END_OF_INPUT))
    }
}

#[test]
fn test_empty_input_commits_empty_line() {
    let (provider, calls) = recording_provider();
    let mut engine = AutoCompleter::new(provider, Vec::new());
    let (outcome, output, rest) = complete_with(&mut engine, "");

    assert_eq!(outcome, line(""));
    assert!(!outcome.is_cancelled());
    assert_eq!(output, "");
    assert_eq!(rest, "");
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_shows_completion() {
    let (lines, output) = replay("f");
    assert!(lines.is_empty());
    assert_eq!(output, "foo\u{8}\u{8}");
}

#[test]
fn test_newline_submits() {
    let (provider, calls) = recording_provider();
    let mut engine = AutoCompleter::new(provider, Vec::new());
    let (outcome, output, rest) = complete_with(&mut engine, "x\nnope");

    assert_eq!(outcome.line(), Some("x"));
    assert_eq!(output, "x");
    assert_eq!(rest, "nope");
    assert_eq!(*calls.lock().unwrap(), vec![""]);
}

#[test]
fn test_newline_clears_suggestion() {
    let (outcome, output, rest) = complete("f\nnope");
    assert_eq!(outcome, line("f"));
    assert_eq!(output, "foo\u{8}\u{8}  \u{8}\u{8}");
    assert_eq!(rest, "nope");
}

#[test]
fn test_tab_completes() {
    let (outcome, output, rest) = complete("f\t\nnope");
    assert_eq!(outcome, line("foo"));
    assert_eq!(output, "foo\u{8}\u{8}oo");
    assert_eq!(rest, "nope");
}

#[test]
fn test_space_clears_completion() {
    let (outcome, output, _) = complete("f \nnope");
    assert_eq!(outcome, line("f "));
    assert_eq!(output, "foo\u{8}\u{8}  \u{8}");
}

#[test]
fn test_backspace_clears_completion() {
    let (outcome, output, _) = complete("f\u{8}\nnope");
    assert_eq!(outcome, line(""));
    // backspace blanks the 'f', then the whole three-column ghost goes
    assert_eq!(output, "foo\u{8}\u{8}\u{8} \u{8}   \u{8}\u{8}\u{8}");
}

#[test]
fn test_incompatible_char_clears_completion() {
    let (outcome, output, _) = complete("fr\nnope");
    assert_eq!(outcome, line("fr"));
    assert_eq!(output, "foo\u{8}\u{8}r \u{8}");
}

#[test]
fn test_switches_to_next_completion_after_tab() {
    let (lines, output) = replay("t\t");
    assert!(lines.is_empty());
    assert_eq!(output, "test\u{8}\u{8}\u{8}esting\u{8}\u{8}\u{8}");
}

#[test]
fn test_ambiguous_prefix_resolves_later() {
    let (_, output) = replay("auro");
    assert_eq!(output, "au\u{8}urora\u{8}\u{8}");
}

#[test]
fn test_switches_branch_after_divergence() {
    let (_, output) = replay("aura");
    assert_eq!(output, "au\u{8}uras\u{8}");
}

#[test]
fn test_mismatch_erases_remaining_ghost() {
    let (_, output) = replay("aurox");
    assert_eq!(output, "au\u{8}urora\u{8}\u{8}x \u{8}");
}

#[test]
fn test_typing_through_ghost_keeps_it() {
    let (_, output) = replay("fo");
    assert_eq!(output, "foo\u{8}\u{8}o");
}

#[test]
fn test_shorter_suggestion_blanks_surplus() {
    let (_, output) = replay("test\u{8}");
    let expected = [
        "test\u{8}\u{8}\u{8}",   // 't' suggests "test"
        "est",                   // typed over the ghost
        "ing\u{8}\u{8}\u{8}",    // "test" is complete, now "testing"
        "\u{8} \u{8}",           // backspace
        "t",                     // back to "test"
        "   \u{8}\u{8}\u{8}",    // blank the old "ing" columns
        "\u{8}",                 // cursor after "tes"
    ]
    .concat();
    assert_eq!(output, expected);
}

#[test]
fn test_backspace_repaints_same_suggestion() {
    let (_, output) = replay("testi\u{8}");
    let expected = [
        "test\u{8}\u{8}\u{8}",
        "est",
        "ing\u{8}\u{8}\u{8}",
        "i",
        "\u{8} \u{8}",
        "ing\u{8}\u{8}\u{8}",
    ]
    .concat();
    assert_eq!(output, expected);
}

#[test]
fn test_cancel_erases_ghost() {
    let (outcome, output, rest) = complete("f\u{3}rest");
    assert_eq!(outcome, Completion::Cancelled);
    assert_eq!(outcome.line(), None);
    assert_eq!(output, "foo\u{8}\u{8}  \u{8}\u{8}");
    assert_eq!(rest, "rest");
}

#[test]
fn test_every_cancel_key() {
    for key in [chars::CTRL_C, chars::CTRL_D, chars::CTRL_Z] {
        let (outcome, _, _) = complete(&format!("ba{key}r\n"));
        assert!(outcome.is_cancelled(), "key {key:?}");
    }
}

#[test]
fn test_end_of_input_commits_and_erases() {
    let (outcome, output, _) = complete("t\t");
    assert_eq!(outcome, line("test"));
    assert_eq!(
        output,
        "test\u{8}\u{8}\u{8}esting\u{8}\u{8}\u{8}   \u{8}\u{8}\u{8}"
    );
}

#[test]
fn test_context_tree_line() {
    let mut tree = ContextTree::new();
    {
        let node = tree.child("node");
        node.child("i").options(["express", "evernode", "react"]);
        node.child("u").options(["forever", "underscore"]);
    }
    tree.child("notepad");

    let mut engine = AutoCompleter::new(Arc::new(tree), Vec::new());
    let (outcome, _, _) = complete_with(&mut engine, "node i ex\t r\t\n");
    assert_eq!(outcome, line("node i express react"));
}

#[test]
fn test_context_tree_closed_branch() {
    let mut tree = ContextTree::new();
    tree.child("node").child("i").options(["express"]);
    tree.child("notepad");

    let mut engine = AutoCompleter::new(Arc::new(tree), Vec::new());
    // nothing may follow "notepad", so "e" stays as typed
    let (outcome, output, _) = complete_with(&mut engine, "notepad e\n");
    assert_eq!(outcome, line("notepad e"));
    assert!(output.ends_with(" e"));
}

#[test]
fn test_provider_called_once_per_context() {
    let (provider, calls) = recording_provider();
    let mut engine = AutoCompleter::new(provider, Vec::new());
    complete_with(&mut engine, "aurora tes\u{8}st  b\n");

    assert_eq!(*calls.lock().unwrap(), vec!["", "aurora", "aurora test"]);
}

/// Answers `foo` the first time it is asked and `fig` from then on.
fn changing_provider() -> (Arc<dyn CandidateProvider>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let provider: Arc<dyn CandidateProvider> = Arc::new(move |_: &str| -> Vec<String> {
        let word = if counter.fetch_add(1, Ordering::SeqCst) == 0 { "foo" } else { "fig" };
        vec![word.to_string()]
    });
    (provider, calls)
}

#[test]
fn test_each_session_resolves_afresh() {
    let (provider, calls) = changing_provider();
    let mut engine = AutoCompleter::new(provider, Vec::new());

    let (first, _, _) = complete_with(&mut engine, "f\t\n");
    let (second, _, _) = complete_with(&mut engine, "f\t\n");
    assert_eq!(first, line("foo"));
    assert_eq!(second, line("fig"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_each_continuous_line_resolves_afresh() {
    let (provider, calls) = changing_provider();
    let engine = AutoCompleter::new(provider, Vec::new());

    let (lines, _) = replay_with(engine, "f\t\nf\t\n");
    assert_eq!(lines, vec![line("foo"), line("fig")]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_tab_accepts_exact_suggestion() {
    let trie = PrefixTrie::from_candidates(OPTIONS);
    for candidate in OPTIONS {
        for end in 1..=candidate.len() {
            let prefix = &candidate[..end];
            let expected = trie.longest_unambiguous_extension(prefix).unwrap();
            let (outcome, _, _) = complete(&format!("{prefix}\t\n"));
            assert_eq!(outcome, Completion::Line(expected), "prefix {prefix:?}");
        }
    }
}

#[test]
fn test_tab_without_suggestion_is_silent() {
    let (provider, calls) = recording_provider();
    let mut engine = AutoCompleter::new(provider, Vec::new());
    let (outcome, output, _) = complete_with(&mut engine, "\txy\t\t\n");
    assert_eq!(outcome, line("xy"));
    assert_eq!(output, "xy");
    assert_eq!(*calls.lock().unwrap(), vec![""]);
}

#[test]
fn test_same_keystrokes_same_output() {
    let script = "aut\u{8}r\tx \u{8}\u{8}te\t\t";
    let (_, first) = replay(script);
    let (_, second) = replay(script);
    assert_eq!(first, second);
}

#[test]
fn test_continuous_commits_every_line() {
    let (lines, output) = replay("f\tx\nb\t\n");
    assert_eq!(lines, vec![line("foox"), line("bar")]);
    assert_eq!(output, "foo\u{8}\u{8}oox".to_string() + "bar\u{8}\u{8}ar");
}

#[test]
fn test_continuous_stops_when_callback_declines() {
    let mut source = ScriptedSource::new("one\ntwo\n");
    let mut seen = Vec::new();
    completer()
        .run_blocking(
            &mut source,
            |completion| {
                seen.push(completion);
                false
            },
            &CancellationToken::new(),
        )
        .unwrap();

    assert_eq!(seen, vec![line("one")]);
    assert_eq!(source.remaining(), "two\n");
}

#[test]
fn test_continuous_reports_cancel() {
    let mut seen = Vec::new();
    completer()
        .run_blocking(
            ScriptedSource::new("one\nt\u{3}two\n"),
            |completion| {
                seen.push(completion);
                true
            },
            &CancellationToken::new(),
        )
        .unwrap();

    assert_eq!(seen, vec![line("one"), Completion::Cancelled]);
}

#[test]
fn test_continuous_end_of_input_ends_loop() {
    let mut seen = Vec::new();
    completer()
        .run_blocking(
            ScriptedSource::new("one\ntw"),
            |completion| {
                seen.push(completion);
                true
            },
            &CancellationToken::new(),
        )
        .unwrap();

    assert_eq!(seen, vec![line("one"), line("tw")]);
}

#[tokio::test]
async fn test_worker_loop_delivers_lines() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let handle = completer().run(ScriptedSource::new("f\t\nau\t\n"), move |completion| {
        log.lock().unwrap().push(completion);
        true
    });

    handle.join().await.unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![line("foo"), line("au"), line("")]
    );
}

#[tokio::test]
async fn test_stop_takes_effect_after_pending_read() {
    let (tx, rx) = mpsc::channel();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let handle = completer().run(ChannelSource(rx), move |completion| {
        log.lock().unwrap().push(completion);
        true
    });

    tx.send('a').unwrap();
    tx.send('\n').unwrap();
    while seen.lock().unwrap().is_empty() {
        tokio::task::yield_now().await;
    }

    handle.stop();
    // unblocks the read in progress; the character itself is dropped
    tx.send('\n').unwrap();
    handle.join().await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![line("a")]);
}

#[test]
fn test_worker_loop_with_block_on() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    let result = tokio_test::block_on(async move {
        let handle = completer().run(ScriptedSource::new("bar\n\u{4}"), move |completion| {
            log.lock().unwrap().push(completion);
            true
        });
        let token = handle.cancel_token();
        let result = handle.join().await;
        assert!(!token.is_cancelled());
        result
    });

    tokio_test::assert_ok!(result);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![line("bar"), Completion::Cancelled]
    );
}
