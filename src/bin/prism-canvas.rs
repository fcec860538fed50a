use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "prism-canvas", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drive the demo page headlessly and write every rendered frame as a PNG.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Demo config JSON. Defaults to a single 320x180 widget.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for `<widget>-<tick>.png` files.
    #[arg(long)]
    out: PathBuf,

    /// Override the number of ticks to pump.
    #[arg(long)]
    frames: Option<u32>,

    /// Override the simulated refresh rate.
    #[arg(long)]
    fps: Option<f64>,

    /// Hide the page from this tick onward.
    #[arg(long)]
    hidden_at: Option<u32>,

    /// Start with the reduced-motion preference set.
    #[arg(long)]
    reduced_motion: bool,

    /// Font file for captions (overrides `label_font` in the config).
    #[arg(long)]
    label_font: Option<PathBuf>,

    /// Draw the caption on every widget.
    #[arg(long)]
    show_label: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
    }
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => prism_canvas::DemoConfig::load(path)
            .with_context(|| format!("load demo config '{}'", path.display()))?,
        None => prism_canvas::DemoConfig::default(),
    };
    if let Some(frames) = args.frames {
        config.frames = frames;
    }
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    if args.hidden_at.is_some() {
        config.hidden_from_frame = args.hidden_at;
    }
    if args.reduced_motion {
        config.reduced_motion = true;
    }
    if args.label_font.is_some() {
        config.label_font = args.label_font.clone();
    }
    if args.show_label {
        for widget in &mut config.widgets {
            widget.show_label = true;
        }
    }

    let mut session = prism_canvas::HeadlessSession::new(config)?;
    let mut sink = prism_canvas::PngSequenceSink::new(args.out.clone())?;
    let stats = session.run(&mut sink)?;

    eprintln!(
        "wrote {} frames to {} ({} of {} ticks active)",
        stats.frames_emitted,
        sink.dir().display(),
        stats.active_ticks,
        stats.ticks
    );
    Ok(())
}
