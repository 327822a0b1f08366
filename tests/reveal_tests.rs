//! Reveal engine integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use story_graph::core::RevealConfig;
use story_graph::reveal::{RevealEngine, RevealState};

const LINE: &str = "He said <b>hi</b>.";

fn recording(engine: &mut RevealEngine, text: &str) -> (Rc<RefCell<Vec<String>>>, Rc<RefCell<u32>>) {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let done = Rc::new(RefCell::new(0));

    let frames_sink = Rc::clone(&frames);
    let done_sink = Rc::clone(&done);
    engine.start(
        text,
        move |prefix: &str| frames_sink.borrow_mut().push(prefix.to_string()),
        move || *done_sink.borrow_mut() += 1,
    );

    (frames, done)
}

fn inside_tag(prefix: &str) -> bool {
    matches!((prefix.rfind('<'), prefix.rfind('>')), (Some(open), close) if close.map_or(true, |c| c < open))
}

/// No prefix ends inside a tag; the last one is the full text.
#[test]
fn test_markup_never_split() {
    for chars_per_tick in 1..=4 {
        let mut engine = RevealEngine::new(RevealConfig::new(5, chars_per_tick));
        let (frames, done) = recording(&mut engine, LINE);

        engine.run_to_end(|_| {});

        let frames = frames.borrow();
        for frame in frames.iter() {
            assert!(!inside_tag(frame), "prefix {:?} ends inside a tag", frame);
            assert!(LINE.starts_with(frame.as_str()));
        }
        assert_eq!(frames.last().map(String::as_str), Some(LINE));
        assert_eq!(*done.borrow(), 1);
    }
}

/// Prefixes only ever grow.
#[test]
fn test_prefixes_grow() {
    let mut engine = RevealEngine::default();
    let (frames, _) = recording(&mut engine, LINE);

    engine.run_to_end(|_| {});

    let frames = frames.borrow();
    assert!(frames.windows(2).all(|w| w[0].len() < w[1].len()));
    // "He said " (8) + "<b>" + "hi" (2) + "</b>" + "." (1)
    assert_eq!(frames.len(), 8 + 1 + 2 + 1 + 1);
}

/// Skipping mid-reveal shows the full text and completes once.
#[test]
fn test_skip_mid_reveal() {
    let mut engine = RevealEngine::default();
    let (frames, done) = recording(&mut engine, LINE);
    let handle = engine.current().unwrap();

    for _ in 0..9 {
        engine.tick();
    }
    assert_eq!(engine.displayed(), "He said <b>");

    assert!(engine.skip(handle));
    assert_eq!(engine.displayed(), LINE);
    assert_eq!(engine.state(), RevealState::Done);

    engine.tick();
    engine.skip(handle);
    assert_eq!(*done.borrow(), 1);
    assert_eq!(frames.borrow().last().map(String::as_str), Some(LINE));
}

/// A new reveal cancels the old one silently.
#[test]
fn test_new_reveal_cancels_old() {
    let mut engine = RevealEngine::default();
    let (old_frames, old_done) = recording(&mut engine, "first text");
    let old = engine.current().unwrap();
    engine.tick();

    let (_, new_done) = recording(&mut engine, "second");
    engine.run_to_end(|_| {});

    assert_eq!(old_frames.borrow().len(), 1);
    assert_eq!(*old_done.borrow(), 0);
    assert_eq!(*new_done.borrow(), 1);
    assert!(!engine.cancel(old));
}

/// The blocking driver paces itself with the configured interval.
#[test]
fn test_run_to_end_cadence() {
    let mut engine = RevealEngine::new(RevealConfig::new(30, 2));
    let (_, done) = recording(&mut engine, "abcdef");
    let mut total = std::time::Duration::ZERO;

    let state = engine.run_to_end(|d| total += d);

    assert_eq!(state, RevealState::Done);
    assert_eq!(total, std::time::Duration::from_millis(90));
    assert_eq!(*done.borrow(), 1);
}
