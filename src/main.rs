mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{error, info, warn};
use rand::thread_rng;

use galaga_shooter::compute::Game;
use galaga_shooter::config::GameConfig;
use galaga_shooter::input::InputMapper;
use galaga_shooter::persistence::{FileHighScoreStore, HighScoreStore};

const CONFIG_FILE: &str = "galaga.json";
const LOG_FILE: &str = "galaga_shooter.log";

// ── Configuration ─────────────────────────────────────────────────────────────

/// `galaga.json` in the working directory when present, defaults otherwise.
/// An unreadable or invalid file aborts startup.
fn load_config() -> galaga_shooter::error::Result<GameConfig> {
    if Path::new(CONFIG_FILE).exists() {
        info!("loading configuration from {}", CONFIG_FILE);
        GameConfig::load(CONFIG_FILE)
    } else {
        Ok(GameConfig::default())
    }
}

// ── Quit keys ─────────────────────────────────────────────────────────────────

fn is_quit(event: &Event) -> bool {
    match event {
        Event::Key(KeyEvent {
            code, kind: KeyEventKind::Press, modifiers, ..
        }) => match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => true,
            KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        },
        _ => false,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Fixed-rate scheduler.  Each frame drains pending terminal events into the
/// mapper, takes one intent snapshot, runs exactly one simulation tick and
/// renders the resulting snapshot.  A slow frame is never followed by
/// catch-up ticks.
fn game_loop<W: Write, S: HighScoreStore>(
    out: &mut W,
    game: &mut Game<S>,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut mapper = InputMapper::new();
    let frame_time = Duration::from_millis(game.config.game.tick_ms);
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if is_quit(&ev) {
                return Ok(());
            }
            mapper.handle_event(&ev, frame);
        }

        let intents = mapper.snapshot(frame);
        game.step(intents, &mut rng);

        display::render(out, &game.snapshot())?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    if let Err(err) = simple_logging::log_to_file(LOG_FILE, log::LevelFilter::Info) {
        eprintln!("logging disabled: {}", err);
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {}", err);
            eprintln!("invalid configuration: {}", err);
            std::process::exit(2);
        }
    };
    let mut game = match Game::new(config, FileHighScoreStore::in_home()) {
        Ok(game) => game,
        Err(err) => {
            error!("could not start: {}", err);
            eprintln!("could not start: {}", err);
            std::process::exit(2);
        }
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads; the game loop
    // only consumes them at the start of a tick.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(err) => {
                warn!("input reader stopped: {}", err);
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut game, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        error!("game aborted: {}", err);
        eprintln!("The game stopped unexpectedly. See {} for details.", LOG_FILE);
    }
    info!("exiting with high score {}", game.state.high_score);
    result
}
