use std::sync::mpsc;

use assert_matches::assert_matches;
use keyrace::clock::ManualClock;
use keyrace::config::EngineConfig;
use keyrace::content::{ContentProvider, LocalContentProvider, StaticContent};
use keyrace::engine::{Engine, FinishOutcome, InputOutcome, Phase, TickOutcome};
use keyrace::mode::{ModeFlag, ModeSet};
use keyrace::reconciler::CharCounts;
use keyrace::typing_policy::OvertypePolicy;
use keyrace::TestResult;

fn engine(
    flags: &[ModeFlag],
    tweak: impl FnOnce(&mut EngineConfig),
) -> (Engine, ManualClock, mpsc::Receiver<TestResult>) {
    let mut config = EngineConfig {
        modes: ModeSet::from_flags(flags.iter().copied()),
        ..EngineConfig::default()
    };
    tweak(&mut config);
    let clock = ManualClock::new();
    let (tx, rx) = mpsc::channel();
    (Engine::new(config, clock.clone(), tx), clock, rx)
}

fn type_text(engine: &mut Engine, clock: &ManualClock, text: &str, gap_ms: u64) {
    for c in text.chars() {
        engine.type_char(c);
        clock.advance(gap_ms);
    }
}

#[test]
fn words_mode_completes_on_full_length() {
    let (mut engine, clock, rx) = engine(&[ModeFlag::Words], |cfg| cfg.words = 10);
    let provider = LocalContentProvider::with_seed(11);
    assert!(engine.load(&provider));

    let target = engine.session().target_text().to_string();
    assert_eq!(target.split_whitespace().count(), 10);
    type_text(&mut engine, &clock, &target, 120);

    assert_eq!(engine.phase(), Phase::Finished);
    let result = rx.try_recv().expect("one result");
    assert_eq!(result.chars.correct as usize, target.chars().count());
    assert_eq!(result.chars.incorrect, 0);
    assert_eq!(result.accuracy, 100.0);
    assert_eq!(result.test_type, "words");
    assert!(rx.try_recv().is_err());
}

#[test]
fn time_mode_finishes_after_countdown() {
    let (mut engine, clock, rx) = engine(&[ModeFlag::Time], |cfg| cfg.time = 15);
    engine.load(&LocalContentProvider::with_seed(5));
    type_text(&mut engine, &clock, "the", 200);

    for _ in 0..14 {
        assert_matches!(engine.on_tick(), TickOutcome::Counted { .. });
        clock.advance(1_000);
    }
    assert_eq!(engine.on_tick(), TickOutcome::Expired);
    assert_eq!(engine.phase(), Phase::Finished);
    assert_eq!(engine.timer_remaining(), Some(0));
    assert_eq!(engine.on_tick(), TickOutcome::Ignored);

    let result = rx.try_recv().unwrap();
    assert_eq!(result.duration, 15);
    assert_eq!(result.test_type, "time");
    assert!(rx.try_recv().is_err());
}

#[test]
fn expired_countdown_counts_unreached_text_as_missed() {
    let (mut engine, clock, rx) = engine(&[ModeFlag::Time], |cfg| cfg.time = 2);
    engine.load(&StaticContent::new("hello world again"));
    type_text(&mut engine, &clock, "he", 100);

    assert_eq!(engine.on_tick(), TickOutcome::Counted { remaining: 1 });
    assert_eq!(engine.on_tick(), TickOutcome::Expired);

    let result = rx.try_recv().unwrap();
    assert_eq!(
        result.chars,
        CharCounts {
            correct: 2,
            incorrect: 0,
            extra: 0,
            missed: 15
        }
    );
    assert_eq!(result.duration, 2);
}

#[test]
fn zen_never_completes_on_its_own() {
    let (mut engine, clock, rx) = engine(&[ModeFlag::Zen], |_| {});
    engine.load(&LocalContentProvider::with_seed(2));
    let target = engine.session().target_text().to_string();
    type_text(&mut engine, &clock, &target, 100);

    assert_eq!(engine.phase(), Phase::Active);
    assert!(rx.try_recv().is_err());

    assert_eq!(engine.finish(), FinishOutcome::Emitted);
    assert_eq!(engine.finish(), FinishOutcome::AlreadyFinished);
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn three_resets_are_counted_in_result() {
    let (mut engine, clock, rx) = engine(&[ModeFlag::Custom], |cfg| {
        cfg.custom_text = Some("ok".to_string())
    });
    let provider = LocalContentProvider::with_seed(1);
    engine.load(&provider);

    for _ in 0..3 {
        engine.type_char('o');
        engine.reset_with(&provider);
    }
    type_text(&mut engine, &clock, "ok", 100);

    let result = rx.try_recv().unwrap();
    assert_eq!(result.restarts, 3);

    engine.reset_with(&provider);
    assert_eq!(engine.restarts(), 4);
}

#[test]
fn backspace_restores_counters_but_not_log() {
    let (mut engine, clock, _rx) = engine(&[ModeFlag::Words], |_| {});
    engine.load(&StaticContent::new("abcdef"));
    type_text(&mut engine, &clock, "ab", 50);
    let before = *engine.session().counters();
    let attempts_before = engine.session().char_log().get('c').map_or(0, |e| e.attempts);

    type_text(&mut engine, &clock, "cxz", 50);
    for _ in 0..3 {
        engine.backspace();
    }

    assert_eq!(*engine.session().counters(), before);
    let c = engine.session().char_log().get('c').unwrap();
    assert_eq!(c.attempts, attempts_before + 1);
    assert!(c.errors <= c.attempts);
}

#[test]
fn overtype_is_counted_as_extra_when_allowed() {
    let (mut engine, clock, rx) = engine(&[ModeFlag::Zen], |cfg| {
        cfg.overtype = OvertypePolicy::Allow
    });
    engine.load(&StaticContent::new("cat"));
    type_text(&mut engine, &clock, "cats!", 100);
    engine.finish();

    let result = rx.try_recv().unwrap();
    assert_eq!(
        result.chars,
        CharCounts {
            correct: 3,
            incorrect: 0,
            extra: 2,
            missed: 0
        }
    );
}

#[test]
fn overtype_rejected_by_default() {
    let (mut engine, clock, _rx) = engine(&[ModeFlag::Zen], |_| {});
    engine.load(&StaticContent::new("cat"));
    type_text(&mut engine, &clock, "cat", 100);
    assert_matches!(engine.type_char('s'), InputOutcome::Rejected(_));
    assert_eq!(engine.session().input_string(), "cat");
}

#[test]
fn gross_wpm_over_one_minute() {
    let (mut engine, clock, _rx) = engine(&[ModeFlag::Zen], |_| {});
    engine.load(&StaticContent::new("a".repeat(80)));
    engine.on_input(&"a".repeat(50));
    clock.set(60_000);
    assert_eq!(engine.metrics().gross_wpm, 10.0);
}

#[test]
fn accuracy_stays_in_bounds() {
    let (mut engine, clock, _rx) = engine(&[ModeFlag::Words], |_| {});
    engine.load(&StaticContent::new("abcdefghij"));
    for input in ["x", "xy", "xyc", "xy", "", "ab", "abzz"] {
        engine.on_input(input);
        clock.advance(30);
        let acc = engine.metrics().accuracy;
        assert!((0.0..=100.0).contains(&acc), "accuracy {acc} for {input:?}");
    }
    assert_eq!(engine.metrics().accuracy, 50.0);
}

#[test]
fn late_content_after_mode_change_is_dropped() {
    let (mut engine, _clock, _rx) = engine(&[ModeFlag::Words], |_| {});
    let stale = engine.request_content();
    let fresh = engine.change_modes(ModeSet::from_flags([ModeFlag::Zen]));

    let provider = LocalContentProvider::with_seed(3);
    let late = provider.fetch(&stale);
    assert!(!engine.resolve_content(stale.id, late));
    assert!(engine.resolve_content(fresh.id, provider.fetch(&fresh)));
    assert_eq!(engine.session().modes, ModeSet::from_flags([ModeFlag::Zen]));
}

#[test]
fn persist_failure_leaves_test_finished() {
    let (mut engine, clock, rx) = engine(&[ModeFlag::Words], |_| {});
    drop(rx);
    engine.load(&StaticContent::new("go"));
    type_text(&mut engine, &clock, "go", 100);

    assert_eq!(engine.phase(), Phase::Finished);
    assert!(engine.last_persist_error().is_some());
    assert!(engine.last_result().is_some());
}
