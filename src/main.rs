use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    tty::IsTty,
};
use keyrace::{
    app_dirs::AppDirs,
    clock::SystemClock,
    config::{Config, ConfigStore, EngineConfig, FileConfigStore},
    content::{CodeLanguage, ContentProvider, Difficulty, LocalContentProvider},
    engine::{ContentState, Engine},
    logging,
    mode::{ModeFlag, ModeSet},
    persistence::{CsvResultLog, Fanout, NullSink, ResultDb},
    reconciler::{classify, CharOutcome},
    runtime::{
        command_for, dispatch, CountdownDriver, CrosstermEventSource, EngineEvent, FixedTicker,
        Flow, Runner,
    },
    typing_policy::OvertypePolicy,
    TestResult,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
};
use tracing::warn;

/// terminal typing test with per-character timing and result history
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing test. Mix word, time, punctuation and number modes, or type code, free-form zen passages or your own text. Results are kept in a local SQLite database and CSV log."
)]
pub struct Cli {
    /// test mode, repeatable (punctuation, numbers, time and words mix; code, zen and custom stand alone)
    #[clap(short = 'm', long = "mode", value_enum)]
    modes: Vec<ModeFlag>,

    /// number of words to use in test
    #[clap(short = 'w', long)]
    words: Option<usize>,

    /// number of seconds to run a time test
    #[clap(short = 's', long = "time")]
    secs: Option<u32>,

    /// custom prompt to use (implies custom mode unless a mode is given)
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// language to pull words from
    #[clap(short = 'l', long)]
    language: Option<String>,

    /// word length band for generated words
    #[clap(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// language of the code sample in code mode
    #[clap(long, value_enum)]
    code_language: Option<CodeLanguage>,

    /// sprinkle numbers into generated words
    #[clap(long)]
    numbers: bool,

    /// sprinkle punctuation into generated words
    #[clap(long)]
    punctuation: bool,

    /// what to do with keystrokes past the end of the text
    #[clap(long, value_enum)]
    overtype: Option<OvertypePolicy>,

    /// seed for word generation
    #[clap(long)]
    seed: Option<u64>,

    /// do not record results
    #[clap(long)]
    no_save: bool,

    /// print the generated prompt and exit
    #[clap(long)]
    print_prompt: bool,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,

    /// log filter used when KEYRACE_LOG is unset
    #[clap(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Layer command line overrides on top of the stored config.
    fn apply(&self, cfg: &mut Config) {
        if !self.modes.is_empty() {
            cfg.modes = self.modes.iter().copied().collect();
        } else if self.prompt.is_some() {
            cfg.modes = ModeSet::from_flags([ModeFlag::Custom]);
        }
        if let Some(words) = self.words {
            cfg.words = words;
        }
        if let Some(secs) = self.secs {
            cfg.time = secs;
        }
        if let Some(prompt) = &self.prompt {
            cfg.custom_text = Some(prompt.clone());
        }
        if let Some(language) = &self.language {
            cfg.language = language.clone();
        }
        if let Some(difficulty) = self.difficulty {
            cfg.difficulty = difficulty;
        }
        if let Some(code_language) = self.code_language {
            cfg.code_language = code_language;
        }
        if let Some(overtype) = self.overtype {
            cfg.overtype = overtype;
        }
        cfg.include_numbers |= self.numbers;
        cfg.include_punctuation |= self.punctuation;
    }

    fn provider(&self) -> LocalContentProvider {
        match self.seed {
            Some(seed) => LocalContentProvider::with_seed(seed),
            None => LocalContentProvider::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply(&mut config);
    if cli.save_config {
        store.save(&config)?;
    }

    if let Some(path) = AppDirs::trace_log_path() {
        if let Err(err) = logging::init(&cli.log_level, &path) {
            eprintln!("logging disabled: {err}");
        }
    }

    let provider = cli.provider();
    let engine_config = EngineConfig::from(&config);

    if cli.print_prompt {
        let mut engine = Engine::new(engine_config, SystemClock::new(), NullSink);
        engine.load(&provider);
        ensure_content(&engine);
        println!("{}", engine.session().target_text());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut engine = Engine::new(engine_config, SystemClock::new(), result_sink(cli.no_save));
    engine.load(&provider);
    ensure_content(&engine);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let outcome = start_tui(&mut stdout, &mut engine, &provider);

    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, Show)?;
    outcome?;

    if let Some(result) = engine.last_result() {
        println!("{}", summary(result));
    }
    if let Some(err) = engine.last_persist_error() {
        eprintln!("result not saved: {err}");
    }

    Ok(())
}

fn ensure_content(engine: &Engine) {
    if let ContentState::Failed(msg) = engine.content_state() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, format!("no text to type: {msg}"))
            .exit();
    }
}

/// SQLite history plus the CSV log. A store that cannot be opened is
/// skipped.
fn result_sink(no_save: bool) -> Fanout {
    let mut sink = Fanout::new();
    if no_save {
        return sink;
    }
    if let Some(path) = AppDirs::db_path() {
        match ResultDb::open(&path) {
            Ok(db) => sink = sink.with(db),
            Err(err) => warn!(path = %path.display(), error = %err, "results database unavailable"),
        }
    }
    if let Some(path) = AppDirs::csv_path() {
        sink = sink.with(CsvResultLog::new(path));
    }
    sink
}

fn start_tui<W: Write>(
    out: &mut W,
    engine: &mut Engine,
    provider: &dyn ContentProvider,
) -> io::Result<()> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let mut countdown = CountdownDriver::new();

    draw(out, engine)?;
    loop {
        match runner.step() {
            EngineEvent::Key(key) => {
                if dispatch(engine, command_for(key), provider) == Flow::Quit {
                    break;
                }
            }
            EngineEvent::Resize => {}
            EngineEvent::Tick => {
                countdown.drive(engine);
            }
        }
        draw(out, engine)?;
    }
    Ok(())
}

fn draw<W: Write>(out: &mut W, engine: &Engine) -> io::Result<()> {
    let view = engine.view();
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    let progress = match view.timer_remaining {
        Some(secs) => format!("{secs}s"),
        None => format!("{}/{} words", view.written_words, view.total_words),
    };
    queue!(
        out,
        SetForegroundColor(Color::DarkGrey),
        Print(format!(
            "{}  {}  restarts {}\r\n\r\n",
            engine.config().modes.test_type(),
            progress,
            view.restarts
        )),
        ResetColor
    )?;

    if let ContentState::Failed(msg) = view.content {
        queue!(
            out,
            SetForegroundColor(Color::Red),
            Print(format!("no text: {msg}\r\n")),
            ResetColor
        )?;
        return out.flush();
    }

    let target = engine.session().target();
    let input = engine.session().input();
    for (idx, &expected) in target.iter().enumerate() {
        let color = match classify(target, input, idx) {
            Some(CharOutcome::Correct) => Color::Green,
            Some(CharOutcome::Incorrect) => Color::Red,
            _ => Color::Grey,
        };
        let wrong = color == Color::Red;
        let cursor = idx == input.len() && !view.finished;
        if cursor {
            queue!(out, SetAttribute(Attribute::Underlined))?;
        }
        queue!(out, SetForegroundColor(color))?;
        match expected {
            '\n' if wrong => queue!(out, Print("\u{21b5}\r\n"))?,
            '\n' => queue!(out, Print("\r\n"))?,
            ' ' if wrong => queue!(out, Print('_'))?,
            c => queue!(out, Print(c))?,
        }
        queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    }
    if input.len() > target.len() {
        let extra: String = input[target.len()..].iter().collect();
        queue!(
            out,
            SetForegroundColor(Color::DarkRed),
            Print(extra),
            ResetColor
        )?;
    }

    queue!(out, Print("\r\n\r\n"))?;
    match engine.last_result() {
        Some(result) => {
            queue!(out, Print(summary(result).replace('\n', "\r\n")))?;
            if let Some(err) = engine.last_persist_error() {
                queue!(
                    out,
                    SetForegroundColor(Color::Yellow),
                    Print(format!("\r\nresult not saved: {err}")),
                    ResetColor
                )?;
            }
            queue!(
                out,
                SetForegroundColor(Color::DarkGrey),
                Print("\r\n\r\n(tab) retry  (esc) quit"),
                ResetColor
            )?;
        }
        None => {
            queue!(
                out,
                Print(format!(
                    "{:.0} wpm  {:.0}% acc\r\n\r\n",
                    view.gross_wpm, view.accuracy
                )),
                SetForegroundColor(Color::DarkGrey),
                Print("(tab) restart  (ctrl+d) finish  (esc) quit"),
                ResetColor
            )?;
        }
    }
    out.flush()
}

fn summary(result: &TestResult) -> String {
    format!(
        "{} wpm  {} raw  {}% acc  {}% consistency  {}s\n\
         {} correct  {} incorrect  {} extra  {} missed",
        result.wpm,
        result.raw_wpm,
        result.accuracy,
        result.consistency,
        result.duration,
        result.chars.correct,
        result.chars.incorrect,
        result.chars.extra,
        result.chars.missed,
    )
}
