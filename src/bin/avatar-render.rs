use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use avatar_render::{
    AvatarRenderRequest, Capabilities, FfprobeAudioProbe, HeuristicAnalyzer, JobId,
    JobOrchestrator, JobStatus, LocalPublisher, RenderConfig, RenderJob, SpeechAnalyzer,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "avatar-render", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the speech analysis of a transcript as JSON.
    Analyze(AnalyzeArgs),
    /// Render an avatar clip (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Transcript to analyze.
    #[arg(long)]
    text: String,

    /// Reference audio (URL or path) probed for duration and sample rate.
    #[arg(long, default_value = "")]
    audio: String,

    /// Render config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Render request JSON.
    #[arg(long)]
    request: PathBuf,

    /// Directory receiving the published video and thumbnail.
    #[arg(long)]
    out_dir: PathBuf,

    /// Render config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Public URL prefix for published artifacts; `file://<out-dir>` when unset.
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Analyze(args) => cmd_analyze(args).await,
        Command::Render(args) => cmd_render(args).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RenderConfig> {
    match path {
        Some(p) => Ok(RenderConfig::from_path(p)?),
        None => Ok(RenderConfig::default()),
    }
}

fn read_request_json(path: &Path) -> anyhow::Result<AvatarRenderRequest> {
    let f = File::open(path).with_context(|| format!("open request '{}'", path.display()))?;
    let req: AvatarRenderRequest = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse request JSON '{}'", path.display()))?;
    Ok(req)
}

async fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let analyzer = HeuristicAnalyzer::from_config(Arc::new(FfprobeAudioProbe::default()), &cfg);
    let analysis = analyzer.analyze(&args.audio, &args.text).await?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let request = read_request_json(&args.request)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    let publisher = match args.base_url {
        Some(base) => LocalPublisher::new(&args.out_dir, base)?,
        None => LocalPublisher::file_urls(&args.out_dir)?,
    };

    let caps = Capabilities::with_defaults(&cfg, Arc::new(publisher));
    let orchestrator = JobOrchestrator::new(cfg, caps)?;
    let submitted = orchestrator.submit(request).await?;
    tracing::info!(job_id = %submitted.id, "submitted");

    let reporter = tokio::spawn(report_progress(orchestrator.clone(), submitted.id.clone()));
    let job = orchestrator.wait_until_terminal(&submitted.id).await;
    reporter.abort();
    let job = job?;

    println!("{}", serde_json::to_string_pretty(&summary(&job))?);
    if job.status == JobStatus::Failed {
        anyhow::bail!(
            "job {} failed: {}",
            job.id,
            job.error_message.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

async fn report_progress(orchestrator: JobOrchestrator, id: JobId) {
    let every = orchestrator.config().poll_interval();
    let mut last = None;
    loop {
        if let Ok(Some(job)) = orchestrator.get(&id).await {
            let now = (job.status, job.progress);
            if last != Some(now) {
                tracing::info!(
                    status = ?job.status,
                    progress = job.progress,
                    stage = %job.current_stage,
                    "progress"
                );
                last = Some(now);
            }
        }
        tokio::time::sleep(every).await;
    }
}

fn summary(job: &RenderJob) -> serde_json::Value {
    serde_json::json!({
        "id": job.id,
        "status": job.status,
        "progress": job.progress,
        "currentStage": job.current_stage,
        "outputUrl": job.output_url,
        "thumbnailUrl": job.thumbnail_url,
        "errorMessage": job.error_message,
        "createdAt": job.created_at,
        "completedAt": job.completed_at,
    })
}
