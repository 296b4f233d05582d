use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use arabsub::{
    Canvas, FfmpegOverlayOpts, FfmpegOverlaySink, FontRegistry, Fps, FrameSink, MarkupParser,
    MonospaceShaper, ParleyShaper, PngSequenceSink, RunConfig, Segment, SegmentSource,
    SubtitleRun,
};

#[derive(Parser, Debug)]
#[command(name = "arabsub", version, about = "Arabic RTL subtitle overlays with word timing")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the clean text and highlighted words of a marked-up string.
    Parse {
        /// Text with `[[y]]..[[/y]]`, `<y>..</y>` or `{y}..{/y}` markup.
        text: String,
    },
    /// Render a preview card PNG for a line of text.
    Preview(PreviewArgs),
    /// Render subtitle overlays onto a video (MP4 via `ffmpeg`) or as a PNG sequence.
    Render(RenderArgs),
    /// Compute highlight timing and write CSV/JSON exports without rendering.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct FontArgs {
    /// Font file to shape with.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Directory of `.ttf`/`.otf` files; the configured `font_family` is looked up by file stem.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Caption file (`.srt`, or plain text read as one 10 s segment).
    #[arg(long, conflicts_with = "text")]
    captions: Option<PathBuf>,

    /// Free text, split into sentences on `.`.
    #[arg(long)]
    text: Option<String>,

    /// Run configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Text to preview (markup is stripped).
    text: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Run configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    font: FontArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    font: FontArgs,

    /// Base video to overlay onto. Its size, rate and duration drive the render.
    #[arg(long)]
    video: Option<PathBuf>,

    /// Output MP4 path (requires `--video`).
    #[arg(long, requires = "video")]
    out: Option<PathBuf>,

    /// Write overlay frames as PNGs into this directory instead of encoding.
    #[arg(long, conflicts_with = "out")]
    png_dir: Option<PathBuf>,

    /// Canvas width when no video is given.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Canvas height when no video is given.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Frame rate when no video is given.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Duration in seconds when no video is given (defaults to the end of the last segment).
    #[arg(long)]
    duration: Option<f64>,

    /// libx264 preset.
    #[arg(long, default_value = "medium")]
    preset: String,

    /// Also write the timing CSV here.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Also write the structured timing JSON here.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the run summary JSON here.
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Duration in seconds for `--text` input.
    #[arg(long, default_value_t = arabsub::source::DEFAULT_TEXT_DURATION_SECS)]
    duration: f64,

    /// CSV output path.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Structured JSON output path.
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Parse { text } => cmd_parse(&text),
        Command::Preview(args) => cmd_preview(args),
        Command::Render(args) => cmd_render(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RunConfig> {
    match path {
        Some(p) => Ok(RunConfig::from_path(p)?),
        None => Ok(RunConfig::default()),
    }
}

fn load_segments(input: &InputArgs, duration: f64) -> anyhow::Result<Vec<Segment>> {
    let source = match (&input.captions, &input.text) {
        (Some(path), _) => Some(SegmentSource::Captions(path)),
        (None, Some(text)) => Some(SegmentSource::Text { text, duration }),
        (None, None) => None,
    };
    Ok(arabsub::source::resolve_segments(source)?)
}

fn make_shaper(font: &FontArgs, cfg: &RunConfig) -> anyhow::Result<ParleyShaper> {
    let shaper = if let Some(path) = &font.font {
        ParleyShaper::from_path(path, cfg.font_size)
            .with_context(|| format!("load font '{}'", path.display()))?
    } else if let Some(dir) = &font.fonts_dir {
        let mut registry = FontRegistry::new();
        registry.scan_dir(dir)?;
        registry
            .shaper(&cfg.font_family, cfg.font_size)
            .with_context(|| format!("font family '{}' in '{}'", cfg.font_family, dir.display()))?
    } else {
        anyhow::bail!("a font is required: pass --font or --fonts-dir")
    };
    tracing::info!(family = shaper.family_name(), size_px = cfg.font_size, "using font");
    Ok(shaper)
}

fn cmd_parse(text: &str) -> anyhow::Result<()> {
    let parser = MarkupParser::new();
    println!("clean: {}", parser.remove_markup(text));
    for w in parser.parse_text(text) {
        println!("{}\t{}\t{}", w.sequence(), w.word(), w.original_markup());
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let mut shaper = make_shaper(&args.font, &cfg)?;
    let clean = MarkupParser::new().remove_markup(&args.text);
    let frame = arabsub::render_preview(
        &clean,
        &mut shaper,
        cfg.max_words_per_line,
        Canvas::new(800, 200)?,
    )?;
    frame.save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.input.config.as_deref())?;
    let mut shaper = make_shaper(&args.font, &cfg)?;

    let video = match &args.video {
        Some(path) => Some(arabsub::probe_video(path)?),
        None => None,
    };
    let (canvas, fps) = match &video {
        Some(v) => (Canvas::new(v.width, v.height)?, v.fps),
        None => (Canvas::new(args.width, args.height)?, Fps::new(args.fps, 1)?),
    };

    let text_duration = video
        .as_ref()
        .map(|v| v.duration)
        .or(args.duration)
        .unwrap_or(arabsub::source::DEFAULT_TEXT_DURATION_SECS);
    let segments = load_segments(&args.input, text_duration)?;

    let mut run = SubtitleRun::new(cfg)?;
    run.prepare(&segments, canvas, &mut shaper);
    if let Some(v) = video.clone() {
        run.set_video_info(v);
    }

    let duration = match (&video, args.duration) {
        (Some(v), _) => v.duration,
        (None, Some(d)) => d,
        (None, None) => segments.iter().map(|s| s.end).fold(0.0, f64::max),
    };

    let mut sink: Box<dyn FrameSink> = match (&args.out, &args.png_dir, &args.video) {
        (Some(out), _, Some(base)) => Box::new(FfmpegOverlaySink::new(
            FfmpegOverlayOpts::new(base, out).with_preset(&args.preset),
        )),
        (None, Some(dir), _) => Box::new(PngSequenceSink::new(dir)),
        _ => anyhow::bail!("choose an output: --out (with --video) or --png-dir"),
    };
    let stats = run.render_range(fps, duration, canvas, &mut shaper, sink.as_mut())?;
    eprintln!(
        "rendered {} frames ({} rasterized)",
        stats.frames_total, stats.frames_rendered
    );

    write_exports(&run, args.csv.as_deref(), args.json.as_deref())?;
    if let Some(path) = &args.summary {
        let f = std::fs::File::create(path)
            .with_context(|| format!("create summary '{}'", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(f), &run.summary())
            .with_context(|| "write summary JSON")?;
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.input.config.as_deref())?;
    let segments = load_segments(&args.input, args.duration)?;

    // Timing does not depend on glyph metrics, so no font is needed here.
    let mut shaper = MonospaceShaper::new(cfg.font_size);
    let mut run = SubtitleRun::new(cfg)?;
    run.prepare(&segments, Canvas::new(1920, 1080)?, &mut shaper);

    let stats = run.summary().statistics;
    println!(
        "{} highlighted words, {} timed, average duration {:.3}s",
        stats.total_words, stats.words_with_timing, stats.average_duration
    );
    write_exports(&run, args.csv.as_deref(), args.json.as_deref())
}

fn write_exports(run: &SubtitleRun, csv: Option<&Path>, json: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = csv
        && !run.export_csv(path)
    {
        anyhow::bail!("csv export to '{}' failed", path.display());
    }
    if let Some(path) = json
        && !run.export_json(path)
    {
        anyhow::bail!("json export to '{}' failed", path.display());
    }
    Ok(())
}
