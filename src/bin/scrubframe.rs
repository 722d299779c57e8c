use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use scrubframe::{
    DirFetcherOpts, GateState, Player, PlayerConfig, PlayerSession, Rect, ScrollHost, Size,
};

const CONTAINER: &str = "hero";
const TICK_SECS: f64 = 1.0 / 60.0;
// Ten minutes of frame ticks.
const MAX_SETTLE_TICKS: u32 = 36_000;

#[derive(Parser, Debug)]
#[command(name = "scrubframe", version)]
struct Cli {
    /// Player config JSON; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the asset path of every frame.
    Paths,
    /// Render the frame shown at one scroll position as a PNG.
    Frame(FrameArgs),
    /// Scroll from top to bottom and write every newly shown frame as a PNG.
    Sweep(SweepArgs),
}

#[derive(Parser, Debug)]
struct LoadArgs {
    /// Directory the frame and poster paths are relative to.
    #[arg(long)]
    root: PathBuf,

    /// Override fetch worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    load: LoadArgs,

    /// Scroll progress through the container, 0..=1.
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    #[command(flatten)]
    load: LoadArgs,

    /// Number of evenly spaced scroll positions.
    #[arg(long, default_value_t = 60)]
    steps: u32,

    /// Frame ticks between scroll positions.
    #[arg(long, default_value_t = 4)]
    ticks_per_step: u32,

    /// Output directory for PNGs.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(p) => PlayerConfig::from_path(p)?,
        None => PlayerConfig::default(),
    };
    match cli.cmd {
        Command::Paths => cmd_paths(&cfg),
        Command::Frame(args) => cmd_frame(cfg, args),
        Command::Sweep(args) => cmd_sweep(cfg, args),
    }
}

fn cmd_paths(cfg: &PlayerConfig) -> anyhow::Result<()> {
    for p in cfg.frame_paths() {
        println!("{p}");
    }
    Ok(())
}

struct Stage {
    session: PlayerSession<scrubframe::DirFetcher>,
    host: ScrollHost,
    container: Rect,
}

impl Stage {
    fn open(cfg: PlayerConfig, load: &LoadArgs) -> anyhow::Result<Self> {
        let host = ScrollHost::new(Size::new(
            f64::from(cfg.canvas.width),
            f64::from(cfg.canvas.height),
        ));
        let container = host.add_pinned_container(CONTAINER, 0.0, cfg.container_viewports);
        let session = PlayerSession::open_dir(
            cfg,
            &load.root,
            DirFetcherOpts {
                threads: load.threads,
            },
        )?;
        Ok(Self {
            session,
            host,
            container,
        })
    }

    fn scroll_to_progress(&self, progress: f64) {
        let extent = self.container.height() - self.host.viewport().height;
        self.host
            .scroll_to(self.container.y0 + progress.clamp(0.0, 1.0) * extent);
    }

    fn settle(&self) {
        let secs = self.session.config().timeline.scrub_secs * 8.0 + TICK_SECS;
        let ticks = ((secs / TICK_SECS).ceil() as u32).min(MAX_SETTLE_TICKS);
        for _ in 0..ticks {
            self.host.tick(TICK_SECS);
        }
    }
}

fn cmd_frame(cfg: PlayerConfig, args: FrameArgs) -> anyhow::Result<()> {
    let mut stage = Stage::open(cfg, &args.load)?;
    let player = stage.session.mount(&stage.host, CONTAINER);
    stage.session.wait_idle();

    stage.scroll_to_progress(args.progress);
    stage.settle();

    report(&stage, &player);
    write_png(&player, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sweep(cfg: PlayerConfig, args: SweepArgs) -> anyhow::Result<()> {
    let mut stage = Stage::open(cfg, &args.load)?;
    let player = stage.session.mount(&stage.host, CONTAINER);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut gate = player.gate_state();
    {
        let store = stage.session.store();
        eprintln!(
            "gate {gate:?} at resolved={}/{}",
            store.resolved_count(),
            store.len()
        );
    }
    while stage.session.wait_any() > 0 {
        note_gate(&stage, &player, &mut gate);
    }

    let steps = args.steps.max(1);
    let mut last_written = None;
    let mut written = 0usize;
    for step in 0..=steps {
        stage.session.pump();
        note_gate(&stage, &player, &mut gate);

        stage.scroll_to_progress(f64::from(step) / f64::from(steps));
        for _ in 0..args.ticks_per_step {
            stage.host.tick(TICK_SECS);
        }
        if step == steps {
            stage.settle();
        }
        let shown = player.shown_frame();
        if shown.is_some() && shown != last_written {
            let idx = shown.unwrap_or_default();
            write_png(&player, &args.out_dir.join(format!("frame_{idx:04}.png")))?;
            last_written = shown;
            written += 1;
        }
    }

    report(&stage, &player);
    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

fn note_gate(stage: &Stage, player: &Player, last: &mut GateState) {
    let now = player.gate_state();
    if now == *last {
        return;
    }
    let store = stage.session.store();
    eprintln!(
        "gate {last:?} -> {now:?} at resolved={}/{}",
        store.resolved_count(),
        store.len()
    );
    *last = now;
}

fn report(stage: &Stage, player: &Player) {
    let store = stage.session.store();
    eprintln!(
        "gate={:?} resolved={}/{} loaded={} target={:?} shown={:?}",
        player.gate_state(),
        store.resolved_count(),
        store.len(),
        store.loaded_count(),
        player.target_frame(),
        player.shown_frame(),
    );
}

fn write_png(player: &Player, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    player
        .with_surface(|s| {
            image::save_buffer_with_format(
                out,
                &s.to_rgba8_straight(),
                s.width(),
                s.height(),
                image::ColorType::Rgba8,
                image::ImageFormat::Png,
            )
        })
        .context("drawing surface unavailable")?
        .with_context(|| format!("write png '{}'", out.display()))
}
