mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

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

use chicken_shooter::assets::SpriteSheet;
use chicken_shooter::compute::{handle_input, init_state, tick};
use chicken_shooter::config::{GameConfig, DEFAULT_CONFIG_FILE};
use chicken_shooter::entities::{Flow, GameSession, Key};
use chicken_shooter::error::StartupError;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms at
/// 60 FPS) is always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if a key last seen on frame `last_seen` still counts as held.
fn is_held(last_seen: u64, frame: u64) -> bool {
    frame.saturating_sub(last_seen) <= HOLD_WINDOW
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char('1') => Some(Key::Num1),
        KeyCode::Char('2') => Some(Key::Num2),
        KeyCode::Char('3') => Some(Key::Num3),
        KeyCode::Char('4') => Some(Key::Num4),
        KeyCode::Char('5') => Some(Key::Num5),
        KeyCode::Char('6') => Some(Key::Num6),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Key::R),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Key::M),
        _ => None,
    }
}

/// The terminal's stand-in for a window close button.
fn is_close_request(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the menu's exit option or a close request.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the keys that are still
/// "fresh" are handed to `handle_input` together, so Space and the arrows
/// can be held at the same time.  Terminals with keyboard enhancement
/// report releases and drop keys immediately; classic terminals let keys
/// expire after `HOLD_WINDOW` frames of silence.
fn game_loop<W: Write>(
    out: &mut W,
    mut state: GameSession,
    sprites: &SpriteSheet,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let frame_len = state.timing.frame();
    let started = Instant::now();

    let mut key_frame: HashMap<Key, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            if kind == KeyEventKind::Press && is_close_request(code, modifiers) {
                info!("Close requested");
                return Ok(());
            }
            let Some(key) = map_key(code) else {
                continue;
            };
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    key_frame.insert(key, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&key);
                }
            }
        }

        let keys: Vec<Key> = key_frame
            .iter()
            .filter(|&(_, &last)| is_held(last, frame))
            .map(|(key, _)| *key)
            .collect();

        let now = started.elapsed();
        let (next, flow) = handle_input(&state, &keys, now);
        if flow == Flow::Exit {
            return Ok(());
        }
        state = tick(&next, now, &mut rng);

        display::render(out, &state, sprites)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal: {}", e);
            eprintln!("chicken_shooter: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    // Everything fallible is loaded before the terminal switches to raw
    // mode, so a diagnostic lands on a normal screen.
    let config = GameConfig::load(Path::new(DEFAULT_CONFIG_FILE))?;
    simple_logging::log_to_file(&config.logging.file, config.logging.level_filter()?)
        .map_err(StartupError::Logging)?;
    info!("Starting Chicken Shooter");

    let sprites = SpriteSheet::load(config.assets.dir.as_deref())?;
    let state = init_state(&config, sprites.sizes());
    info!(
        "Playfield {}x{}, {} FPS",
        config.playfield.width, config.playfield.height, config.timing.frame_rate
    );

    let mut out = BufWriter::new(stdout());

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
    info!("Keyboard enhancement: {}", keyboard_enhanced);

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                warn!("Input thread stopped: {}", e);
                break;
            }
        }
    });

    let result = game_loop(&mut out, state, &sprites, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("Shutting down");
    result.map_err(StartupError::Terminal)
}
