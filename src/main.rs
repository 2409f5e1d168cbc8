//! PostureGuard CLI
//!
//! Usage:
//!   postureguard                              # Interactive session
//!   postureguard --tracker angle              # Neck-angle variant
//!   postureguard --replay session.txt         # Replay recorded readings
//!   postureguard -b 300 -m 350                # Single-shot evaluation
//!   postureguard --json                       # JSON output per tick
//!
//! Interactive input: a number per line is one frame's raw reading, `x` is a
//! frame with no detection, `c` calibrates, `quit` ends the session.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use postureguard::core::{
    BlankSource, Command, DisplaySink, FaceDropExtractor, NeckAngleExtractor, Notifier,
    PostureMonitor, ScriptedFaceLocator, ScriptedPoseLocator, Session, SessionSummary,
    SignalExtractor, Status,
};
use postureguard::types::{AppConfig, Evaluation, Frame, TrackerKind, Verdict};
use postureguard::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "postureguard",
    version = VERSION,
    about = "PostureGuard - calibrate a posture baseline and get told when you slouch",
    long_about = "PostureGuard watches a per-frame posture reading, compares it against a\n\
                  calibrated baseline and alerts after a debounced run of bad frames.\n\n\
                  Trackers:\n  \
                  face   Vertical face position, only dropping down counts (signed)\n  \
                  angle  Ear-shoulder angle, any drift counts (unsigned)\n\n\
                  Verdicts:\n  \
                  UNKNOWN       - Not calibrated, or no subject this frame\n  \
                  GOOD          - Within tolerance\n  \
                  TRANSITIONING - Out of tolerance, debouncing\n  \
                  SLOUCHING     - Bad for longer than the alert threshold"
)]
struct Args {
    /// Replay a file of recorded readings instead of reading stdin
    #[arg(short, long)]
    replay: Option<String>,

    /// Evaluate a single reading and exit (see --baseline)
    #[arg(short, long)]
    measurement: Option<f32>,

    /// Baseline to calibrate against in single-shot mode
    #[arg(short, long)]
    baseline: Option<f32>,

    /// Tracker variant: face (signed) or angle (unsigned)
    #[arg(short, long)]
    tracker: Option<TrackerKindArg>,

    /// Config file (TOML); missing file falls back to defaults
    #[arg(long)]
    config: Option<String>,

    /// Override the deviation threshold for the chosen tracker
    #[arg(long)]
    threshold: Option<f32>,

    /// Override consecutive bad frames before the alert
    #[arg(long)]
    alert_after: Option<u32>,

    /// Calibrate automatically after this many replay ticks
    #[arg(long, default_value_t = 0)]
    calibrate_after: u64,

    /// Pace replay at the configured tick interval instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show the full evaluation breakdown per tick
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum TrackerKindArg {
    Face,
    Angle,
}

impl From<TrackerKindArg> for TrackerKind {
    fn from(arg: TrackerKindArg) -> Self {
        match arg {
            TrackerKindArg::Face => TrackerKind::Face,
            TrackerKindArg::Angle => TrackerKind::Angle,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path).with_context(|| format!("loading config {}", path))?,
        None => AppConfig::default(),
    };
    if let Some(tracker) = args.tracker {
        config.tracker = tracker.into();
    }
    if let Some(threshold) = args.threshold {
        match config.tracker {
            TrackerKind::Face => config.pixel_threshold = threshold,
            TrackerKind::Angle => config.angle_threshold = threshold,
        }
    }
    if let Some(alert_after) = args.alert_after {
        config.alert_after = alert_after;
    }
    if args.measurement.is_some() {
        // Single-shot readings are exact, not smoothed
        config.smoothing_window = 1;
    }

    match config.tracker {
        TrackerKind::Face => {
            let locator = ScriptedFaceLocator::new();
            let feeder = locator.clone();
            let extractor = FaceDropExtractor::new(locator, config.smoothing_window);
            run(&args, &config, extractor, move |r| feeder.feed(r))
        }
        TrackerKind::Angle => {
            let locator = ScriptedPoseLocator::new();
            let feeder = locator.clone();
            let extractor = NeckAngleExtractor::new(locator, config.smoothing_window);
            run(&args, &config, extractor, move |r| feeder.feed(r))
        }
    }
}

/// Build the session for the chosen extractor and dispatch to a driver
fn run<E: SignalExtractor>(
    args: &Args,
    config: &AppConfig,
    extractor: E,
    feed: impl Fn(Option<f32>),
) -> Result<()> {
    let session = Session::new(
        BlankSource::new(640, 480),
        extractor,
        PostureMonitor::new(config.monitor_config()),
        TerminalNotifier {
            no_color: args.no_color,
        },
        TerminalDisplay {
            no_color: args.no_color,
            last: None,
        },
    );

    let summary = if let Some(measurement) = args.measurement {
        run_single(args, session, feed, measurement)
    } else if let Some(path) = &args.replay {
        run_replay(args, config, session, feed, path)?
    } else {
        run_interactive(args, config, session, feed)?
    };

    println!(
        "\nSession ended. Ticks: {} | Skipped: {} | Alerts: {} | Notifications: {}",
        summary.ticks, summary.skipped, summary.alerts, summary.notifications
    );
    Ok(())
}

type CliSession<E> = Session<BlankSource, E, TerminalNotifier, TerminalDisplay>;

/// Interactive driver: one stdin line per frame
fn run_interactive<E: SignalExtractor>(
    args: &Args,
    config: &AppConfig,
    mut session: CliSession<E>,
    feed: impl Fn(Option<f32>),
) -> Result<SessionSummary> {
    print_header(&format!("{} tracker", config.tracker), args.no_color);
    println!("One raw reading per line ('x' for a dropped detection).");
    println!("Commands: 'c' calibrate, 'quit' exit.");
    println!(
        "Threshold: {:.1} | Alert after: {} bad frames",
        config.monitor_config().threshold,
        config.alert_after
    );
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", format_prompt(session.status(), args.no_color));
        stdout.flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("c") || line.eq_ignore_ascii_case("calibrate") {
            session.handle(Command::Calibrate);
            continue;
        }

        let reading = match parse_reading(line) {
            Some(reading) => reading,
            None => {
                println!("Not a reading: '{}' (number, 'x', 'c' or 'quit')", line);
                continue;
            }
        };

        feed(reading);
        if let Some(eval) = session.tick() {
            print_evaluation(&eval, &session, args);
        }
    }

    Ok(session.summary())
}

/// Single-shot driver: calibrate against --baseline, evaluate one reading
fn run_single<E: SignalExtractor>(
    args: &Args,
    mut session: CliSession<E>,
    feed: impl Fn(Option<f32>),
    measurement: f32,
) -> SessionSummary {
    if let Some(baseline) = args.baseline {
        feed(Some(baseline));
        session.tick();
        session.handle(Command::Calibrate);
    }

    feed(Some(measurement));
    if let Some(eval) = session.tick() {
        print_evaluation(&eval, &session, args);
    }
    session.summary()
}

/// Replay driver: one script entry per tick
fn run_replay<E: SignalExtractor>(
    args: &Args,
    config: &AppConfig,
    mut session: CliSession<E>,
    feed: impl Fn(Option<f32>),
    path: &str,
) -> Result<SessionSummary> {
    let script = std::fs::read_to_string(path).with_context(|| format!("reading replay {}", path))?;
    print_header(&format!("replay: {}", path), args.no_color);

    let mut tick = 0u64;
    for (lineno, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.eq_ignore_ascii_case("calibrate") {
            session.handle(Command::Calibrate);
            continue;
        }
        let reading = parse_reading(line)
            .with_context(|| format!("{}:{}: not a reading: '{}'", path, lineno + 1, line))?;

        feed(reading);
        tick += 1;
        if let Some(eval) = session.tick() {
            print_evaluation(&eval, &session, args);
        }
        if args.calibrate_after > 0 && tick == args.calibrate_after {
            session.handle(Command::Calibrate);
        }
        if args.realtime {
            thread::sleep(Duration::from_millis(config.tick_interval_ms));
        }
    }

    Ok(session.summary())
}

/// Parse one raw reading: a float, or 'x'/'none' for a dropped detection
fn parse_reading(text: &str) -> Option<Option<f32>> {
    if text.eq_ignore_ascii_case("x") || text.eq_ignore_ascii_case("none") {
        return Some(None);
    }
    text.parse::<f32>().ok().map(Some)
}

/// Print header
fn print_header(mode: &str, no_color: bool) {
    if no_color {
        println!("========================================");
        println!("  PostureGuard v{} - {}", VERSION, mode);
        println!("========================================");
    } else {
        println!("\x1b[1m========================================\x1b[0m");
        println!("\x1b[1m  PostureGuard v{} - {}\x1b[0m", VERSION, mode);
        println!("\x1b[1m========================================\x1b[0m");
    }
    println!();
}

/// Format the interactive prompt from the current status line
fn format_prompt(status: &Status, no_color: bool) -> String {
    if no_color {
        format!("[{}] > ", status.text)
    } else {
        format!(
            "{}[{}]{} > ",
            status.urgency.color_code(),
            status.text,
            Verdict::color_reset()
        )
    }
}

/// Print one tick's evaluation in the selected format
fn print_evaluation<E: SignalExtractor>(eval: &Evaluation, session: &CliSession<E>, args: &Args) {
    if args.json {
        println!("{}", serde_json::to_string(eval).expect("evaluation serializes"));
    } else if args.verbose {
        print_verbose(eval, session, args.no_color);
    } else if args.no_color {
        println!("{}", eval.to_parseable_string());
    } else {
        println!("{}", eval.to_terminal_string());
    }
}

/// Print the full evaluation breakdown
fn print_verbose<E: SignalExtractor>(eval: &Evaluation, session: &CliSession<E>, no_color: bool) {
    let color = if no_color { "" } else { eval.verdict.color_code() };
    let reset = if no_color { "" } else { Verdict::color_reset() };
    let config = session.monitor().config();

    println!("{}+---------------------------------------+{}", color, reset);
    match eval.measurement {
        Some(m) => println!("{}| measurement: {:>8.2}                 |{}", color, m, reset),
        None => println!("{}| measurement:     none                 |{}", color, reset),
    }
    match session.monitor().baseline() {
        Some(b) => println!("{}| baseline:    {:>8.2}                 |{}", color, b, reset),
        None => println!("{}| baseline:        none                 |{}", color, reset),
    }
    println!(
        "{}| deviation:   {:>8} (limit {:>6.1}) |{}",
        color,
        eval.display_deviation(),
        config.threshold,
        reset
    );
    println!(
        "{}| bad frames:  {:>8} (alert {:>6}) |{}",
        color, eval.bad_frames, config.alert_after, reset
    );
    println!("{}| verdict: {} | {}{}", color, eval.verdict, eval.reason.code(), reset);
    println!("{}+---------------------------------------+{}", color, reset);
}

/// Terminal bell plus a colored line, best-effort
struct TerminalNotifier {
    no_color: bool,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, message: &str) {
        print!("\x07"); // Terminal bell
        if self.no_color {
            println!("  [{}] {}", title, message);
        } else {
            println!("\x1b[31m  [{}] {}\x1b[0m", title, message);
        }
    }
}

/// Terminal display sink: prints the status line when it changes
///
/// Frames are dropped on the floor, a terminal has nowhere to render them.
struct TerminalDisplay {
    no_color: bool,
    last: Option<Status>,
}

impl DisplaySink for TerminalDisplay {
    fn present(&mut self, _frame: &Frame, status: &Status) {
        if self.last.as_ref() == Some(status) {
            return;
        }
        if self.no_color {
            println!("  status: {}", status.text);
        } else {
            println!(
                "  {}status: {}{}",
                status.urgency.color_code(),
                status.text,
                Verdict::color_reset()
            );
        }
        self.last = Some(status.clone());
    }
}
