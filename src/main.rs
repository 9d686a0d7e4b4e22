mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, DemoArgs, PatchArgs, RenderArgs};
use facechoir::audio::{OutputGuardMode, WavOutput};
use facechoir::config::AppConfig;
use facechoir::face::VowelClassifier;
use facechoir::face::synthetic::SyntheticFace;
use facechoir::patch::PatchSettings;
use facechoir::render::OfflineRenderer;
use facechoir::session::{SessionCursor, load_session};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config);
    match cli.command {
        Command::Render(args) => run_render(&config, &args),
        Command::Demo(args) => run_demo(&config, &args),
    }
}

fn load_patch(args: &PatchArgs) -> Result<PatchSettings> {
    let mut patch = match &args.patch {
        Some(path) => PatchSettings::load_file(path)
            .with_context(|| format!("loading patch {}", path.display()))?,
        None => PatchSettings::default(),
    };
    if let Some(voices) = args.voices {
        patch.num_of_voices = voices;
        patch.validate().context("voice count override")?;
    }
    Ok(patch)
}

fn build_renderer(config: &AppConfig, patch_args: &PatchArgs) -> Result<OfflineRenderer> {
    let patch = load_patch(patch_args)?;
    let classifier = VowelClassifier::load(
        config.classifier.model_path.as_deref(),
        config.classifier.stats_path.as_deref(),
    );
    if !classifier.has_model() {
        warn!("running without a vowel model; timbre follows jaw opening only");
    }
    OfflineRenderer::new(config, &patch, classifier).context("building renderer")
}

fn open_wav(config: &AppConfig, path: &std::path::Path) -> Result<WavOutput> {
    WavOutput::create(
        path,
        config.audio.sample_rate,
        OutputGuardMode::from(config.audio.output_guard),
    )
    .with_context(|| format!("creating {}", path.display()))
}

fn finish(mut renderer: OfflineRenderer, mut wav: WavOutput) -> Result<()> {
    let tail = renderer.finish();
    wav.write_block(&tail)?;
    let samples = wav.samples_written();
    let guard = wav.finalize().context("finalizing wav")?;
    let fs = renderer.timebase().fs as f64;
    info!(
        seconds = samples as f64 / fs,
        peak_in = guard.max_abs_in,
        clipped = guard.num_over,
        non_finite = guard.num_non_finite,
        "render finished"
    );
    Ok(())
}

fn run_render(config: &AppConfig, args: &RenderArgs) -> Result<()> {
    let frames = load_session(&args.session)
        .with_context(|| format!("loading session {}", args.session.display()))?;
    let mut cursor = SessionCursor::new(&frames);
    let Some(end) = cursor.end_time() else {
        bail!("session {} has no frames", args.session.display());
    };

    let mut renderer = build_renderer(config, &args.patch)?;
    let mut wav = open_wav(config, &args.out)?;
    info!(
        session = %args.session.display(),
        frames = frames.len(),
        seconds = end,
        out = %args.out.display(),
        "rendering session"
    );

    while renderer.now() <= end {
        let sample = cursor.sample_at(renderer.now()).copied();
        let block = renderer.render_frame(sample.as_ref());
        wav.write_block(block)?;
    }
    finish(renderer, wav)
}

fn run_demo(config: &AppConfig, args: &DemoArgs) -> Result<()> {
    if !args.seconds.is_finite() || args.seconds <= 0.0 {
        bail!("--seconds must be positive, got {}", args.seconds);
    }
    let mut renderer = build_renderer(config, &args.patch)?;
    let mut wav = open_wav(config, &args.out)?;
    let mut face = SyntheticFace::new(args.seed);
    info!(seconds = args.seconds, seed = args.seed, out = %args.out.display(), "rendering demo");

    while renderer.now() < args.seconds {
        let sample = face.sample_at(renderer.now());
        let block = renderer.render_frame(Some(&sample));
        wav.write_block(block)?;
    }
    finish(renderer, wav)
}
