//! Lifecycle of a typing test.
//!
//! The engine is a command object: keystrokes, timer ticks, resets and mode
//! changes are method calls, and each recomputes only what it touches.
//! Content arrives asynchronously through [`Engine::request_content`] and
//! [`Engine::resolve_content`]; finished results go to the [`ResultSink`]
//! the engine was built with.

use crate::char_log::TimingLog;
use crate::clock::{Clock, Millis};
use crate::config::EngineConfig;
use crate::content::{ContentProvider, ContentRequest, RequestId};
use crate::debounce::Debounced;
use crate::error::ContentResult;
use crate::metrics::Metrics;
use crate::mode::{Completion, ModeFlag, ModeSet};
use crate::persistence::ResultSink;
use crate::result::TestResult;
use crate::session::TestSession;
use crate::typing_policy;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentState {
    Unrequested,
    Pending(RequestId),
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No target text yet.
    NoContent,
    /// The test is over.
    Finished,
    /// The candidate runs past the target and overtyping is not allowed.
    PastEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Applied,
    Unchanged,
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishOutcome {
    Emitted,
    AlreadyFinished,
    NotStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown is running.
    Ignored,
    /// The tick belongs to a countdown that no longer exists.
    Stale,
    Counted { remaining: u32 },
    Expired,
}

/// Handle identifying one armed countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy)]
struct Countdown {
    token: TimerToken,
    remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FinishCause {
    Completed,
    Expired,
    Requested,
}

/// Read-only state for the presentation layer.
#[derive(Debug, Clone)]
pub struct EngineView<'a> {
    pub phase: Phase,
    pub content: &'a ContentState,
    pub target_text: &'a str,
    pub user_input: String,
    pub is_active: bool,
    pub finished: bool,
    /// Debounced gross WPM.
    pub gross_wpm: f64,
    pub net_wpm: f64,
    pub accuracy: f64,
    pub char_log: &'a TimingLog,
    /// Seconds left, `None` when the mode has no limit.
    pub timer_remaining: Option<u32>,
    pub written_words: usize,
    pub total_words: usize,
    pub restarts: u32,
}

pub struct Engine {
    config: EngineConfig,
    phase: Phase,
    session: TestSession,
    content: ContentState,
    next_request: u64,
    next_timer: u64,
    countdown: Option<Countdown>,
    display_wpm: Debounced<f64>,
    clock: Box<dyn Clock>,
    sink: Box<dyn ResultSink>,
    last_persist_error: Option<String>,
    last_result: Option<TestResult>,
    results_emitted: u32,
}

impl Engine {
    pub fn new<C, S>(config: EngineConfig, clock: C, sink: S) -> Self
    where
        C: Clock + 'static,
        S: ResultSink + 'static,
    {
        let session = TestSession::pending(config.modes.clone(), config.duration_limit(), 0);
        let display_wpm = Debounced::new(config.debounce_ms);
        Self {
            config,
            phase: Phase::Idle,
            session,
            content: ContentState::Unrequested,
            next_request: 0,
            next_timer: 0,
            countdown: None,
            display_wpm,
            clock: Box::new(clock),
            sink: Box::new(sink),
            last_persist_error: None,
            last_result: None,
            results_emitted: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &TestSession {
        &self.session
    }

    pub fn content_state(&self) -> &ContentState {
        &self.content
    }

    pub fn restarts(&self) -> u32 {
        self.session.restarts
    }

    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Result of the attempt that just finished, until the next reset.
    pub fn last_result(&self) -> Option<&TestResult> {
        self.last_result.as_ref()
    }

    /// Results handed to the sink over the engine's lifetime.
    pub fn results_emitted(&self) -> u32 {
        self.results_emitted
    }

    pub fn now_ms(&self) -> Millis {
        self.clock.now_ms()
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Issue a new content request. Any earlier outstanding request becomes
    /// stale.
    pub fn request_content(&mut self) -> ContentRequest {
        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.content = ContentState::Pending(id);
        debug!(request = id.0, modes = %self.config.modes.test_type(), "requesting content");

        let cfg = &self.config;
        ContentRequest {
            id,
            modes: cfg.modes.clone(),
            words: cfg.words,
            duration: cfg.duration_limit(),
            difficulty: cfg.difficulty,
            include_numbers: cfg.include_numbers || cfg.modes.contains(ModeFlag::Numbers),
            include_punctuation: cfg.include_punctuation
                || cfg.modes.contains(ModeFlag::Punctuation),
            language: cfg.language.clone(),
            code_language: cfg.code_language,
            custom_text: cfg.custom_text.clone(),
        }
    }

    /// Accept the response to request `id`. Returns `false` when the
    /// response is stale and was dropped.
    pub fn resolve_content(&mut self, id: RequestId, response: ContentResult<String>) -> bool {
        if self.content != ContentState::Pending(id) {
            debug!(request = id.0, "dropping stale content response");
            return false;
        }

        match response {
            Ok(text) if !text.trim().is_empty() => {
                self.seed(text);
                self.content = ContentState::Ready;
                debug!(request = id.0, chars = self.session.target().len(), "content ready");
            }
            Ok(_) => {
                warn!(request = id.0, "content provider returned empty text");
                self.content = ContentState::Failed("empty text".to_string());
            }
            Err(err) => {
                warn!(request = id.0, error = %err, "content fetch failed");
                self.content = ContentState::Failed(err.to_string());
            }
        }
        true
    }

    /// Request and resolve in one step against a synchronous provider.
    pub fn load(&mut self, provider: &dyn ContentProvider) -> bool {
        let request = self.request_content();
        let response = provider.fetch(&request);
        self.resolve_content(request.id, response)
    }

    fn seed(&mut self, text: String) {
        self.stop_timer();
        self.display_wpm.clear();
        self.last_result = None;
        self.session = TestSession::new(
            self.config.modes.clone(),
            text,
            self.config.duration_limit(),
            self.session.restarts,
        );
        self.phase = Phase::Idle;
    }

    /// Activate the test without a keystroke (focus/click).
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle || self.content != ContentState::Ready {
            return false;
        }
        let now = self.clock.now_ms();
        self.activate(now);
        true
    }

    fn activate(&mut self, now: Millis) {
        self.phase = Phase::Active;
        self.session.started_at = Some(now);
        if let Some(limit) = self.session.duration_limit {
            self.next_timer += 1;
            self.countdown = Some(Countdown {
                token: TimerToken(self.next_timer),
                remaining: limit,
            });
        }
        info!(modes = %self.session.modes.test_type(), "test started");
    }

    /// Replace the input buffer with `candidate`, as a text field would.
    pub fn on_input(&mut self, candidate: &str) -> InputOutcome {
        if self.content != ContentState::Ready {
            return InputOutcome::Rejected(RejectReason::NoContent);
        }
        if self.phase == Phase::Finished {
            return InputOutcome::Rejected(RejectReason::Finished);
        }

        let candidate: Vec<char> = candidate.chars().collect();
        if candidate.as_slice() == self.session.input() {
            return InputOutcome::Unchanged;
        }

        let completion = self.session.modes.completion();
        if !typing_policy::admits(
            self.config.overtype,
            completion,
            candidate.len(),
            self.session.target().len(),
        ) {
            trace!(len = candidate.len(), "ignoring keystroke past end of text");
            return InputOutcome::Rejected(RejectReason::PastEnd);
        }

        let now = self.clock.now_ms();
        if self.phase == Phase::Idle {
            self.activate(now);
        }

        self.session.apply(candidate, now);

        let live = self.session.metrics(now);
        self.display_wpm.schedule(live.gross_wpm, now);
        self.display_wpm.poll(now);

        if completion == Completion::Length && self.session.is_fully_typed() {
            self.complete(now, FinishCause::Completed);
        }
        InputOutcome::Applied
    }

    pub fn type_char(&mut self, c: char) -> InputOutcome {
        let mut candidate = self.session.input_string();
        candidate.push(c);
        self.on_input(&candidate)
    }

    pub fn backspace(&mut self) -> InputOutcome {
        let mut candidate = self.session.input_string();
        if candidate.pop().is_none() {
            return InputOutcome::Unchanged;
        }
        self.on_input(&candidate)
    }

    pub fn timer_token(&self) -> Option<TimerToken> {
        self.countdown.map(|c| c.token)
    }

    /// One second of the running countdown has passed.
    pub fn on_tick(&mut self) -> TickOutcome {
        match self.countdown {
            Some(countdown) => self.on_timer_tick(countdown.token),
            None => TickOutcome::Ignored,
        }
    }

    /// Like [`Engine::on_tick`], but only counts if `token` names the
    /// countdown that is currently running.
    pub fn on_timer_tick(&mut self, token: TimerToken) -> TickOutcome {
        let now = self.clock.now_ms();
        self.display_wpm.poll(now);

        let Some(countdown) = self.countdown.as_mut() else {
            debug!("tick with no running countdown");
            return TickOutcome::Stale;
        };
        if countdown.token != token || self.phase != Phase::Active {
            debug!("dropping stale timer tick");
            return TickOutcome::Stale;
        }

        countdown.remaining = countdown.remaining.saturating_sub(1);
        let remaining = countdown.remaining;
        if remaining == 0 {
            self.complete(now, FinishCause::Expired);
            TickOutcome::Expired
        } else {
            TickOutcome::Counted { remaining }
        }
    }

    /// Let the debounced display value catch up. Cheap; call it often.
    pub fn poll(&mut self) {
        let now = self.clock.now_ms();
        self.display_wpm.poll(now);
    }

    /// End an active test on request.
    pub fn finish(&mut self) -> FinishOutcome {
        match self.phase {
            Phase::Idle => FinishOutcome::NotStarted,
            Phase::Finished => FinishOutcome::AlreadyFinished,
            Phase::Active => {
                let now = self.clock.now_ms();
                self.complete(now, FinishCause::Requested)
            }
        }
    }

    fn complete(&mut self, now: Millis, cause: FinishCause) -> FinishOutcome {
        if self.phase != Phase::Active {
            return FinishOutcome::AlreadyFinished;
        }
        self.phase = Phase::Finished;
        self.stop_timer();
        self.session.finished_at = Some(now);

        let (elapsed_ms, duration) = match (cause, self.session.duration_limit) {
            (FinishCause::Expired, Some(limit)) => (limit as u64 * 1_000, limit),
            _ => {
                let elapsed = self.session.elapsed_ms(now);
                (elapsed, ((elapsed as f64) / 1_000.0).round() as u32)
            }
        };
        let metrics = self.session.metrics_over(elapsed_ms);
        self.display_wpm.set(metrics.gross_wpm);

        let result =
            TestResult::from_session(&self.session, &metrics, duration, self.clock.wall());
        info!(
            ?cause,
            wpm = result.wpm,
            raw_wpm = result.raw_wpm,
            accuracy = result.accuracy,
            consistency = result.consistency,
            duration = result.duration,
            "test finished"
        );

        self.results_emitted += 1;
        self.last_result = Some(result.clone());
        self.last_persist_error = None;
        if let Err(err) = self.sink.persist(result) {
            warn!(error = %err, "failed to persist result");
            self.last_persist_error = Some(err.to_string());
        }
        FinishOutcome::Emitted
    }

    fn stop_timer(&mut self) {
        self.countdown = None;
    }

    /// Abandon the current attempt and start a fresh one.
    ///
    /// Always counts as a restart. Custom and code tests reuse their text;
    /// other modes need new content, in which case the request to fulfil is
    /// returned.
    pub fn reset(&mut self) -> Option<ContentRequest> {
        let restarts = self.session.restarts + 1;
        info!(restarts, "test reset");
        self.reseed(restarts, self.config.modes.reuses_text())
    }

    /// Reset and fetch new content from `provider` if needed.
    pub fn reset_with(&mut self, provider: &dyn ContentProvider) {
        if let Some(request) = self.reset() {
            let response = provider.fetch(&request);
            self.resolve_content(request.id, response);
        }
    }

    /// Switch the active mode set. Not a restart; always asks for new content.
    pub fn change_modes(&mut self, modes: ModeSet) -> ContentRequest {
        info!(from = %self.config.modes.test_type(), to = %modes.test_type(), "mode change");
        self.config.modes = modes;
        let restarts = self.session.restarts;
        self.clear_session(restarts);
        self.request_content()
    }

    /// Option-bar toggle of one flag.
    pub fn toggle_mode(&mut self, flag: ModeFlag) -> ContentRequest {
        let mut modes = self.config.modes.clone();
        modes.toggle(flag);
        self.change_modes(modes)
    }

    /// Replace the custom text. In custom mode this re-seeds the test.
    pub fn set_custom_text(&mut self, text: String) -> Option<ContentRequest> {
        self.config.custom_text = Some(text);
        if self.config.modes.contains(ModeFlag::Custom) {
            let restarts = self.session.restarts;
            self.clear_session(restarts);
            Some(self.request_content())
        } else {
            None
        }
    }

    fn reseed(&mut self, restarts: u32, reuse_text: bool) -> Option<ContentRequest> {
        if reuse_text && self.content == ContentState::Ready {
            let text = self.session.target_text().to_string();
            self.session.restarts = restarts;
            self.seed(text);
            None
        } else {
            self.clear_session(restarts);
            Some(self.request_content())
        }
    }

    fn clear_session(&mut self, restarts: u32) {
        self.stop_timer();
        self.display_wpm.clear();
        self.last_result = None;
        self.phase = Phase::Idle;
        self.session = TestSession::pending(
            self.config.modes.clone(),
            self.config.duration_limit(),
            restarts,
        );
    }

    /// Authoritative metrics as of now, not debounced.
    pub fn metrics(&self) -> Metrics {
        self.session.metrics(self.clock.now_ms())
    }

    pub fn timer_remaining(&self) -> Option<u32> {
        match self.countdown {
            Some(countdown) => Some(countdown.remaining),
            None => match self.phase {
                Phase::Finished => self.session.duration_limit.map(|_| 0),
                _ => self.session.duration_limit,
            },
        }
    }

    pub fn view(&self) -> EngineView<'_> {
        let metrics = self.metrics();
        EngineView {
            phase: self.phase,
            content: &self.content,
            target_text: self.session.target_text(),
            user_input: self.session.input_string(),
            is_active: self.phase == Phase::Active,
            finished: self.phase == Phase::Finished,
            gross_wpm: self.display_wpm.value(),
            net_wpm: metrics.net_wpm,
            accuracy: metrics.accuracy,
            char_log: self.session.char_log(),
            timer_remaining: self.timer_remaining(),
            written_words: self.session.written_words(),
            total_words: self.session.total_words(),
            restarts: self.session.restarts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::content::StaticContent;
    use crate::error::ContentError;
    use crate::persistence::NullSink;
    use assert_matches::assert_matches;
    use std::sync::mpsc;

    fn config(flags: &[ModeFlag]) -> EngineConfig {
        EngineConfig {
            modes: ModeSet::from_flags(flags.iter().copied()),
            ..EngineConfig::default()
        }
    }

    fn engine_with(text: &str, flags: &[ModeFlag]) -> (Engine, ManualClock) {
        let clock = ManualClock::new();
        let mut engine = Engine::new(config(flags), clock.clone(), NullSink);
        assert!(engine.load(&StaticContent::new(text)));
        (engine, clock)
    }

    #[test]
    fn test_idle_until_first_keystroke() {
        let (mut engine, clock) = engine_with("hello", &[ModeFlag::Words]);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.session().started_at, None);

        clock.set(500);
        assert_eq!(engine.type_char('h'), InputOutcome::Applied);
        assert_eq!(engine.phase(), Phase::Active);
        assert_eq!(engine.session().started_at, Some(500));
    }

    #[test]
    fn test_keystrokes_rejected_without_content() {
        let clock = ManualClock::new();
        let mut engine = Engine::new(config(&[ModeFlag::Words]), clock, NullSink);
        assert_eq!(
            engine.type_char('a'),
            InputOutcome::Rejected(RejectReason::NoContent)
        );

        let request = engine.request_content();
        assert_eq!(
            engine.type_char('a'),
            InputOutcome::Rejected(RejectReason::NoContent)
        );
        engine.resolve_content(request.id, Err(ContentError::Provider("offline".into())));
        assert_matches!(engine.content_state(), ContentState::Failed(msg) if msg.contains("offline"));
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(!engine.start());
    }

    #[test]
    fn test_stale_content_response_is_dropped() {
        let clock = ManualClock::new();
        let mut engine = Engine::new(config(&[ModeFlag::Words]), clock, NullSink);
        let first = engine.request_content();
        let second = engine.request_content();

        assert!(!engine.resolve_content(first.id, Ok("old text".into())));
        assert_eq!(engine.content_state(), &ContentState::Pending(second.id));
        assert!(engine.resolve_content(second.id, Ok("new text".into())));
        assert_eq!(engine.session().target_text(), "new text");
    }

    #[test]
    fn test_overtype_rejected_in_length_modes() {
        let (mut engine, _clock) = engine_with("ab", &[ModeFlag::Custom]);
        assert_eq!(
            engine.on_input("abc"),
            InputOutcome::Rejected(RejectReason::PastEnd)
        );
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_length_completion_and_idempotent_finish() {
        let (tx, rx) = mpsc::channel();
        let clock = ManualClock::new();
        let mut engine = Engine::new(config(&[ModeFlag::Words]), clock.clone(), tx);
        engine.load(&StaticContent::new("hi"));

        engine.type_char('h');
        clock.advance(200);
        engine.type_char('i');

        assert_eq!(engine.phase(), Phase::Finished);
        assert_eq!(engine.finish(), FinishOutcome::AlreadyFinished);
        assert_eq!(
            engine.type_char('x'),
            InputOutcome::Rejected(RejectReason::Finished)
        );
        assert_eq!(rx.try_iter().count(), 1);
        assert_eq!(engine.results_emitted(), 1);
    }

    #[test]
    fn test_explicit_start_arms_countdown() {
        let (mut engine, _clock) = engine_with("some words here", &[ModeFlag::Time]);
        assert_eq!(engine.timer_remaining(), Some(30));
        assert_eq!(engine.on_tick(), TickOutcome::Ignored);

        assert!(engine.start());
        assert!(!engine.start());
        assert_eq!(engine.on_tick(), TickOutcome::Counted { remaining: 29 });
    }

    #[test]
    fn test_stale_timer_token_after_reset() {
        let (mut engine, _clock) = engine_with("some words here", &[ModeFlag::Time]);
        engine.start();
        let old = engine.timer_token().unwrap();

        engine.reset_with(&StaticContent::new("other words"));
        engine.start();
        assert_ne!(engine.timer_token(), Some(old));
        assert_eq!(engine.on_timer_tick(old), TickOutcome::Stale);
        assert_eq!(engine.timer_remaining(), Some(30));
    }

    #[test]
    fn test_zen_has_no_timer() {
        let (mut engine, _clock) = engine_with("calm", &[ModeFlag::Zen]);
        engine.type_char('c');
        assert_eq!(engine.timer_token(), None);
        assert_eq!(engine.timer_remaining(), None);
        assert_eq!(engine.on_tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_reset_reuses_custom_text() {
        let (mut engine, _clock) = engine_with("my text", &[ModeFlag::Custom]);
        engine.type_char('m');
        assert!(engine.reset().is_none());
        assert_eq!(engine.session().target_text(), "my text");
        assert!(engine.session().input().is_empty());
        assert_eq!(engine.restarts(), 1);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_reset_requests_new_words() {
        let (mut engine, _clock) = engine_with("alpha beta", &[ModeFlag::Words]);
        engine.type_char('a');
        let request = engine.reset().expect("words mode needs new content");
        assert_eq!(engine.content_state(), &ContentState::Pending(request.id));
        assert_eq!(request.words, engine.config().words);
    }

    #[test]
    fn test_mode_change_keeps_restarts() {
        let (mut engine, _clock) = engine_with("alpha beta", &[ModeFlag::Words]);
        engine.reset_with(&StaticContent::new("gamma"));
        let request = engine.toggle_mode(ModeFlag::Time);
        assert_eq!(request.duration, Some(30));
        assert_eq!(engine.restarts(), 1);
        assert!(request.modes.contains(ModeFlag::Words));
        assert!(request.modes.contains(ModeFlag::Time));
    }

    #[test]
    fn test_restarts_carry_over_a_finished_attempt() {
        let (mut engine, _clock) = engine_with("ok", &[ModeFlag::Custom]);
        engine.type_char('o');
        engine.reset();
        engine.on_input("ok");
        assert_eq!(engine.phase(), Phase::Finished);
        assert_eq!(engine.last_result().map(|r| r.restarts), Some(1));

        engine.reset();
        assert_eq!(engine.restarts(), 2);

        engine.on_input("ok");
        assert_eq!(engine.phase(), Phase::Finished);
        engine.change_modes(ModeSet::from_flags([ModeFlag::Zen]));
        assert_eq!(engine.restarts(), 2);
    }

    #[test]
    fn test_whitespace_only_content_is_not_ready() {
        let clock = ManualClock::new();
        let mut engine = Engine::new(config(&[ModeFlag::Custom]), clock, NullSink);
        let request = engine.request_content();
        assert!(engine.resolve_content(request.id, Ok(" \n\t ".into())));
        assert_matches!(engine.content_state(), ContentState::Failed(_));
        assert_eq!(
            engine.type_char(' '),
            InputOutcome::Rejected(RejectReason::NoContent)
        );
    }

    #[test]
    fn test_request_carries_mode_content_flags() {
        let clock = ManualClock::new();
        let mut engine = Engine::new(
            config(&[ModeFlag::Words, ModeFlag::Numbers]),
            clock,
            NullSink,
        );
        let request = engine.request_content();
        assert!(request.include_numbers);
        assert!(!request.include_punctuation);
    }

    #[test]
    fn test_set_custom_text_reseeds_custom_mode() {
        let (mut engine, _clock) = engine_with("first", &[ModeFlag::Custom]);
        let request = engine.set_custom_text("second".into()).unwrap();
        assert_eq!(request.custom_text.as_deref(), Some("second"));
    }

    #[test]
    fn test_display_wpm_is_debounced() {
        let (mut engine, clock) = engine_with("hello world", &[ModeFlag::Words]);
        engine.type_char('h');
        clock.advance(1_000);
        engine.type_char('e');
        assert_eq!(engine.view().gross_wpm, 0.0);

        clock.advance(250);
        engine.poll();
        assert!(engine.view().gross_wpm > 0.0);
    }

    #[test]
    fn test_view_reports_progress() {
        let (mut engine, _clock) = engine_with("one two three", &[ModeFlag::Words]);
        engine.on_input("one tw");
        let view = engine.view();
        assert!(view.is_active);
        assert_eq!(view.user_input, "one tw");
        assert_eq!(view.written_words, 2);
        assert_eq!(view.total_words, 3);
        assert_eq!(view.accuracy, 100.0);
        assert_eq!(view.timer_remaining, None);
    }
}
