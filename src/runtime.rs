use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::clock::Millis;
use crate::content::ContentProvider;
use crate::engine::{Engine, TickOutcome, TimerToken};

/// Poll interval of the terminal loop.
pub const TICK_RATE_MS: u64 = 100;

const SECOND_MS: Millis = 1_000;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum EngineEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<EngineEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => EngineEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => EngineEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    debug!(error = %err, "terminal event reader stopped");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed event source for tests
pub struct TestEventSource {
    rx: Receiver<EngineEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<EngineEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> EngineEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                EngineEvent::Tick
            }
        }
    }
}

/// What a key press asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Type(char),
    Backspace,
    Reset,
    Finish,
    Quit,
    None,
}

pub fn command_for(key: KeyEvent) -> Command {
    if key.kind == KeyEventKind::Release {
        return Command::None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Command::Quit,
        KeyCode::Char('c') if ctrl => Command::Quit,
        KeyCode::Char('d') if ctrl => Command::Finish,
        KeyCode::Char(_) if ctrl => Command::None,
        KeyCode::Char(c) => Command::Type(c),
        KeyCode::Enter => Command::Type('\n'),
        KeyCode::Backspace => Command::Backspace,
        KeyCode::Tab => Command::Reset,
        _ => Command::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply one command to the engine. Resets pull fresh text from `provider`.
pub fn dispatch(engine: &mut Engine, command: Command, provider: &dyn ContentProvider) -> Flow {
    match command {
        Command::Type(c) => {
            engine.type_char(c);
        }
        Command::Backspace => {
            engine.backspace();
        }
        Command::Reset => engine.reset_with(provider),
        Command::Finish => {
            engine.finish();
        }
        Command::Quit => return Flow::Quit,
        Command::None => {}
    }
    Flow::Continue
}

/// Turns the runner's sub-second ticks into whole-second countdown ticks.
///
/// Seconds are counted from the moment the test started, and each armed
/// countdown is tracked by its token so a reset mid-second starts over.
#[derive(Debug, Default)]
pub struct CountdownDriver {
    armed: Option<(TimerToken, Millis)>,
}

impl CountdownDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drive(&mut self, engine: &mut Engine) -> Vec<TickOutcome> {
        let now = engine.now_ms();
        engine.poll();

        let Some(token) = engine.timer_token() else {
            self.armed = None;
            return Vec::new();
        };
        let next_due = match self.armed {
            Some((armed, due)) if armed == token => due,
            _ => engine.session().started_at.unwrap_or(now) + SECOND_MS,
        };

        let mut due = next_due;
        let mut outcomes = Vec::new();
        while now >= due {
            let outcome = engine.on_timer_tick(token);
            outcomes.push(outcome);
            due += SECOND_MS;
            if !matches!(outcome, TickOutcome::Counted { .. }) {
                break;
            }
        }
        self.armed = Some((token, due));
        outcomes
    }
}
