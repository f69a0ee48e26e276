use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use bounce_core::{AnimationController, AnimationState};
use host::config::load_config;
use host::{BoxError, ClientConfig, EventLogger, FileStore, FrameClock, HttpTransport, Session};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Options shared by every command
struct Options {
    config: Option<PathBuf>,
    frames: Option<u64>,
    seed: Option<u64>,
    unpaced: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let command = args[1].as_str();
    if command == "--help" || command == "-h" {
        print_usage(&args[0]);
        std::process::exit(0);
    }

    let options = parse_options(&args[2..]).unwrap_or_else(|e| {
        eprintln!("❌ Error: {}", e);
        print_usage(&args[0]);
        std::process::exit(1);
    });

    let mut config = load_config(options.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("❌ Error loading configuration: {}", e);
        std::process::exit(1);
    });
    if options.seed.is_some() {
        config.seed = options.seed;
    }

    let result = match command {
        "play" => play_command(&config, &options).await,
        "send" => send_command(&config).await,
        "review" => review_command(&config).await,
        _ => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  play      Start a new game and animate until the square hits the bottom");
    eprintln!("  send      Send the stored events to the event sink in one batch");
    eprintln!("  review    Show stored events next to the events held by the sink");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <file>   JSON settings file (defaults apply to missing keys)");
    eprintln!("  --frames <n>      Stop the animation after n frames (play only)");
    eprintln!("  --seed <n>        Fixed random seed (play only)");
    eprintln!("  --fast            Do not pace frames to the configured fps (play only)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  BOUNCE_URL, BOUNCE_STORAGE_DIR, BOUNCE_FPS, BOUNCE_SEED,");
    eprintln!("  BOUNCE_WIDTH, BOUNCE_HEIGHT, BOUNCE_MAX_FRAMES, RUST_LOG");
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        config: None,
        frames: None,
        seed: None,
        unpaced: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let v = iter.next().ok_or("--config requires a file path")?;
                options.config = Some(PathBuf::from(v));
            }
            "--frames" => {
                let v = iter.next().ok_or("--frames requires a number")?;
                options.frames = Some(v.parse().map_err(|e| format!("Invalid --frames '{}': {}", v, e))?);
            }
            "--seed" => {
                let v = iter.next().ok_or("--seed requires a number")?;
                options.seed = Some(v.parse().map_err(|e| format!("Invalid --seed '{}': {}", v, e))?);
            }
            "--fast" => options.unpaced = true,
            other => return Err(format!("Unknown option: {}", other)),
        }
    }
    Ok(options)
}

fn open_session(config: &ClientConfig) -> Result<Session<FileStore, StdRng>, BoxError> {
    let store = FileStore::open(&config.storage_dir)?;
    let transport = Arc::new(HttpTransport::new(&config.base_url, config.endpoints()));
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let controller = AnimationController::new(config.container(), rng);
    Ok(Session::new(controller, EventLogger::new(store, transport)))
}

async fn play_command(config: &ClientConfig, options: &Options) -> Result<(), BoxError> {
    let mut session = open_session(config)?;

    println!("🎮 Bouncing square");
    println!("{}", "=".repeat(70));
    println!("  Container: {}x{}", config.width, config.height);
    println!("  Event sink: {}", config.base_url);
    println!();

    session.new_game()?;
    session.start()?;
    if let Some(v) = session.controller().velocity() {
        println!("▶️  Started with dx={:.3}, dy={:.3}", v.dx, v.dy);
    }

    let mut clock = if options.unpaced {
        FrameClock::unpaced()
    } else {
        FrameClock::paced(config.fps)
    };
    let max_frames = options.frames.unwrap_or(config.max_frames);
    let summary = session.animate(&mut clock, Some(max_frames)).await;

    if summary.state == AnimationState::Running {
        session.stop()?;
        println!("⏸️  Stopped after {} frames", summary.frames);
    } else {
        println!("🧱 Reached the bottom wall after {} frames", summary.frames);
    }

    let (delivered, failed) = session.settle().await;
    let stored = session.logger().events();

    println!();
    println!("📋 Events");
    for event in &stored {
        println!("  #{:<3} {}", event.id, event.kind);
    }
    println!();
    println!("💾 {} events stored locally in {}", stored.len(), config.storage_dir.display());
    println!("📡 Remote writes: {} delivered, {} failed", delivered, failed);
    println!("{}", "=".repeat(70));
    Ok(())
}

async fn send_command(config: &ClientConfig) -> Result<(), BoxError> {
    let mut session = open_session(config)?;
    let count = session.logger().events().len();

    if !session.send_stored_events()? {
        println!("Nothing stored; no events sent.");
        return Ok(());
    }

    let (_, failed) = session.settle().await;
    if failed > 0 {
        // the local batch is gone either way
        eprintln!("⚠️  Batch of {} events was not accepted by {}", count, config.base_url);
    } else {
        println!("✅ Sent {} stored events to {}", count, config.base_url);
    }
    Ok(())
}

async fn review_command(config: &ClientConfig) -> Result<(), BoxError> {
    let session = open_session(config)?;
    let comparison = session.review().await;

    println!("📦 Local storage");
    println!("{}", "-".repeat(70));
    println!("{}", comparison.local);
    println!("🌐 Server");
    println!("{}", "-".repeat(70));
    match comparison.remote {
        Some(text) => println!("{}", text),
        None => println!("(server data unavailable)"),
    }
    Ok(())
}
