/// Riff Player - play audio files from the terminal
use anyhow::Context;
use clap::Parser;
use crossbeam_channel::{bounded, never, select, tick, Receiver};
use riff_audio::SymphoniaDecoder;
use riff_audio_desktop::CpalOutput;
use riff_core::TrackRef;
use riff_player::{
    command::HELP, playable_tracks, Command, Flow, PlayerSettings, Session, StatusSnapshot,
};
use riff_playback::{ClipLoader, Player};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "riff-player")]
#[command(about = "Play audio files with playlist navigation", long_about = None)]
struct Cli {
    /// Audio files to play, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Configuration file path (default: ./riff.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Status refresh interval in milliseconds
    #[arg(long, env = "RIFF_TICK_MS")]
    tick_ms: Option<u64>,

    /// Stay on a finished track instead of moving to the next one
    #[arg(long)]
    no_auto_advance: bool,

    /// Load the first track without starting playback
    #[arg(long)]
    paused: bool,

    /// Print status lines as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = PlayerSettings::load(cli.config.as_deref())?;
    if let Some(tick_ms) = cli.tick_ms {
        settings.tick_interval_ms = tick_ms;
    }
    if cli.no_auto_advance {
        settings.auto_advance = false;
    }
    if cli.paused {
        settings.autoplay = false;
    }
    settings.validate()?;

    // Initialize tracing
    let filter = settings
        .log_filter
        .clone()
        .map(tracing_subscriber::EnvFilter::new)
        .unwrap_or_else(|| {
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "riff_player=info,riff_playback=info".into())
        });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let output = CpalOutput::new().context("opening audio output")?;
    let loader = ClipLoader::new(SymphoniaDecoder::new(), output);
    let mut player = Player::new(loader, settings.player_config());

    let json = cli.json;
    let mut last_line = String::new();
    player.subscribe(move |p: &Player| {
        let snapshot = StatusSnapshot::from_player(p);
        let line = if json {
            snapshot.to_json()
        } else {
            snapshot.to_line()
        };
        if line != last_line {
            println!("{}", line);
            last_line = line;
        }
    });

    let tracks = playable_tracks(&player, cli.files.into_iter().map(TrackRef::from));
    if tracks.is_empty() {
        anyhow::bail!("no playable files");
    }
    tracing::info!(tracks = tracks.len(), "Starting Riff Player");
    player.set_playlist(tracks);

    let mut session = Session::new();
    if let Err(e) = session.start(&mut player, settings.autoplay) {
        tracing::warn!(error = %e, "First track failed to load");
    }

    run(&mut session, &mut player, &settings)
}

/// Control loop: serializes the periodic tick and user commands on one thread
///
/// Once stdin is closed the loop keeps ticking and exits when playback stops
/// or the playlist has played through.
fn run(
    session: &mut Session,
    player: &mut Player,
    settings: &PlayerSettings,
) -> anyhow::Result<()> {
    let mut commands = spawn_stdin_reader()?;
    let ticker = tick(Duration::from_millis(settings.tick_interval_ms));

    loop {
        let mut stdin_closed = false;
        select! {
            recv(ticker) -> _ => {
                if session.tick(player) == Flow::Exit {
                    break;
                }
            }
            recv(commands) -> line => {
                match line {
                    Ok(line) => {
                        if handle_line(session, player, &line) == Flow::Exit {
                            break;
                        }
                    }
                    Err(_) => stdin_closed = true,
                }
            }
        }

        if stdin_closed {
            tracing::debug!("stdin closed");
            commands = never();
            session.end_input();
        }
    }

    player.stop();
    io::stdout().flush()?;
    tracing::info!("Exiting");
    Ok(())
}

fn handle_line(session: &mut Session, player: &mut Player, line: &str) -> Flow {
    if line.trim().is_empty() {
        return Flow::Continue;
    }
    match line.parse::<Command>() {
        Ok(Command::Help) => eprintln!("{}", HELP),
        Ok(Command::Status) => {
            println!("{}", StatusSnapshot::from_player(player).to_line());
        }
        Ok(command) => match session.apply(command, player) {
            Ok(flow) => return flow,
            Err(e) => eprintln!("{}", e),
        },
        Err(e) => eprintln!("{}", e),
    }
    Flow::Continue
}

/// Read stdin lines on a separate thread
fn spawn_stdin_reader() -> anyhow::Result<Receiver<String>> {
    let (tx, rx) = bounded::<String>(16);
    thread::Builder::new()
        .name("riff-stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("spawning stdin reader")?;
    Ok(rx)
}
