use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use curtain_browser::{BrowserConfig, BrowserSession};
use curtain_core::{Document, ImageFetcher, TokioTimer};
use curtain_gate::TransitionConfig;
use curtain_page::{ParticleBuffer, Startup, StartupOutcome};
use curtain_parser::{HttpImageFetcher, PageMarkup, StaticDocument, fetch_document};
use curtain_storage::{FolderStorage, ReportStorage};
use reqwest::Url;
use tracing_subscriber::EnvFilter;

mod init;

use init::{MusicSlot, PageAudio, PageParticles, PageWiring, SilentTrack};

#[derive(Parser, Debug)]
#[command(name = "curtain", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the preload gate against static HTML, fetching images over HTTP.
    Static(StaticArgs),
    /// Run the preload gate inside a Chromium page.
    Browse(BrowseArgs),
}

#[derive(Args, Debug)]
struct StaticArgs {
    /// HTML file path or http(s) URL.
    source: String,

    /// Base URL for relative image sources.
    #[arg(long)]
    base_url: Option<Url>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct BrowseArgs {
    /// Page URL.
    url: Url,

    /// Show the browser window.
    #[arg(long, default_value_t = false)]
    headed: bool,

    /// Give up if the DOM is not parsed within this many ms.
    #[arg(long)]
    dom_ready_ms: Option<u64>,

    /// Press the music toggle once the page is initialized.
    #[arg(long, default_value_t = false)]
    toggle_music: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    Default,
    Fast,
    Patient,
    /// No transition delays.
    Instant,
}

impl Preset {
    fn transition(self) -> TransitionConfig {
        match self {
            Preset::Default => TransitionConfig::default(),
            Preset::Fast => TransitionConfig::fast(),
            Preset::Patient => TransitionConfig::patient(),
            Preset::Instant => TransitionConfig::instant(),
        }
    }

    fn browser(self) -> BrowserConfig {
        match self {
            Preset::Default => BrowserConfig::default(),
            Preset::Fast | Preset::Instant => BrowserConfig::fast(),
            Preset::Patient => BrowserConfig::patient(),
        }
    }
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Timing preset; `--config` and the `*-ms` flags refine it.
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,

    /// Transition config JSON (`post_settlement` / `post_hide` in ms).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the delay between the last settlement and hiding the loader.
    #[arg(long)]
    post_settlement_ms: Option<u64>,

    /// Override the delay between hiding and removing the loader.
    #[arg(long)]
    post_hide_ms: Option<u64>,

    /// Folder for the JSON report and downloaded QR codes.
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Download every QR code on the page into the report folder.
    #[arg(long, default_value_t = false, requires = "report_dir")]
    download_qr: bool,
}

impl CommonArgs {
    fn transition(&self) -> anyhow::Result<TransitionConfig> {
        let mut config = match &self.config {
            Some(path) => TransitionConfig::from_json_file(path)?,
            None => self.preset.transition(),
        };
        if let Some(ms) = self.post_settlement_ms {
            config = config.with_post_settlement(ms);
        }
        if let Some(ms) = self.post_hide_ms {
            config = config.with_post_hide(ms);
        }
        Ok(config)
    }

    fn storage(&self) -> anyhow::Result<Option<Arc<FolderStorage>>> {
        self.report_dir
            .as_ref()
            .map(|dir| FolderStorage::new(dir).map(Arc::new))
            .transpose()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Static(args) => cmd_static(args).await,
        Command::Browse(args) => cmd_browse(args).await,
    }
}

async fn cmd_static(args: StaticArgs) -> anyhow::Result<()> {
    let config = args.common.transition()?;
    let storage = args.common.storage()?;
    let client = reqwest::Client::new();

    let document = if args.source.starts_with("http://") || args.source.starts_with("https://") {
        let document = fetch_document(&client, &args.source).await?;
        match args.base_url {
            Some(base) => StaticDocument::new(
                document.markup().clone(),
                HttpImageFetcher::new(client.clone(), Some(base)),
            ),
            None => document,
        }
    } else {
        let html = tokio::fs::read_to_string(&args.source)
            .await
            .with_context(|| format!("failed to read {}", args.source))?;
        StaticDocument::parse(&html, HttpImageFetcher::new(client.clone(), args.base_url))?
    };
    let particles = Arc::new(ParticleBuffer::default());

    let wiring = PageWiring {
        markup: document.markup().clone(),
        resolver: document.fetcher().clone(),
        client,
        storage: if args.common.download_qr { storage.clone() } else { None },
        audio: Arc::new(SilentTrack),
        particles: particles.clone(),
    };
    let fetcher: Arc<dyn ImageFetcher> = Arc::new(document.fetcher().clone());
    let (outcome, _) = run(&document, fetcher, config, wiring).await;

    if let Some(loader) = document.loader() {
        tracing::debug!(hidden = loader.is_hidden(), present = loader.is_present(), "loader after run");
    }
    tracing::debug!(particles = particles.particles().len(), "particle container");
    finish(outcome, storage.as_deref()).await
}

async fn cmd_browse(args: BrowseArgs) -> anyhow::Result<()> {
    let config = args.common.transition()?;
    let storage = args.common.storage()?;
    let client = reqwest::Client::new();

    let mut browser_config = args.common.preset.browser();
    if args.headed {
        browser_config = browser_config.headed();
    }
    if let Some(ms) = args.dom_ready_ms {
        browser_config = browser_config.with_dom_ready(ms);
    }
    let session = BrowserSession::open(args.url.as_str(), &browser_config).await?;

    // Markup is read before the gate runs so it still contains the loader.
    let html = session
        .page()
        .content()
        .await
        .context("failed to read page content")?;
    let wiring = PageWiring {
        markup: PageMarkup::parse(&html)?,
        resolver: HttpImageFetcher::new(client.clone(), Some(args.url.clone())),
        client,
        storage: if args.common.download_qr { storage.clone() } else { None },
        audio: Arc::new(PageAudio(session.audio())),
        particles: Arc::new(PageParticles(session.particles())),
    };

    let fetcher: Arc<dyn ImageFetcher> = Arc::new(session.fetcher());
    let (outcome, music) = run(&session.document(), fetcher, config, wiring).await;

    if args.toggle_music {
        match music.lock().await.as_mut() {
            Some(player) => match player.toggle().await {
                Ok(playing) => tracing::info!(playing, "music toggled"),
                Err(e) => tracing::warn!(error = %e, "music toggle refused"),
            },
            None => tracing::warn!("page has no music toggle"),
        }
    }

    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "browser did not close cleanly");
    }
    finish(outcome, storage.as_deref()).await
}

async fn run(
    document: &dyn Document,
    fetcher: Arc<dyn ImageFetcher>,
    config: TransitionConfig,
    wiring: PageWiring,
) -> (StartupOutcome, MusicSlot) {
    let (sequence, music) = wiring.into_sequence();
    let outcome = Startup::new(fetcher, Arc::new(TokioTimer), config)
        .run(document, &sequence)
        .await;
    for result in sequence.results() {
        tracing::debug!(?result, "init step");
    }
    (outcome, music)
}

async fn finish(outcome: StartupOutcome, storage: Option<&FolderStorage>) -> anyhow::Result<()> {
    let output = match &outcome {
        StartupOutcome::Preloaded(report) => {
            if let Some(storage) = storage {
                let run_id = uuid::Uuid::new_v4().to_string();
                let path = storage.save_report(&run_id, report).await?;
                tracing::info!(path = %path.display(), "report saved");
            }
            serde_json::json!({ "outcome": "preloaded", "report": report })
        }
        StartupOutcome::Fallback(error) => {
            serde_json::json!({ "outcome": "fallback", "error": error })
        }
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn common(args: &[&str]) -> CommonArgs {
        let argv = ["curtain", "static", "page.html"].into_iter().chain(args.iter().copied());
        match Cli::try_parse_from(argv).unwrap().cmd {
            Command::Static(args) => args.common,
            Command::Browse(_) => unreachable!(),
        }
    }

    #[test]
    fn preset_picks_the_transition() {
        assert_eq!(common(&[]).transition().unwrap(), TransitionConfig::default());
        assert_eq!(
            common(&["--preset", "fast"]).transition().unwrap(),
            TransitionConfig::fast()
        );
        assert_eq!(
            common(&["--preset", "patient"]).transition().unwrap(),
            TransitionConfig::patient()
        );
    }

    #[test]
    fn millisecond_flags_refine_the_preset() {
        let config = common(&["--preset", "instant", "--post-hide-ms", "250"])
            .transition()
            .unwrap();
        assert_eq!(config.post_settlement, Duration::ZERO);
        assert_eq!(config.post_hide, Duration::from_millis(250));
    }

    #[test]
    fn browser_timeouts_follow_the_preset() {
        assert_eq!(Preset::Patient.browser().dom_ready, BrowserConfig::patient().dom_ready);
        assert_eq!(Preset::Instant.browser().dom_ready, BrowserConfig::fast().dom_ready);
    }

    #[test]
    fn qr_download_needs_a_report_dir() {
        let argv = ["curtain", "static", "page.html", "--download-qr"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
