//! Page initialization run once the gate lets go.

use std::sync::Arc;

use async_trait::async_trait;
use curtain_browser::{ChromiumAudio, ChromiumParticles};
use curtain_core::{DocumentError, TokioTimer};
use curtain_page::{
    AudioTrack, ButtonState, DownloadButton, FnStep, InitSequence, MusicPlayer, Particle,
    ParticleField, ParticleHost, QrDownloader, StepFuture,
};
use curtain_parser::{HttpImageFetcher, PageMarkup};
use curtain_storage::FolderStorage;
use tokio::sync::Mutex;

/// Entrance timelines, in the order the page starts them.
const TIMELINES: [&str; 6] = [
    "animations",
    "intro-panel",
    "title",
    "sec-img",
    "wedding-ceremony",
    "engagement-ceremony",
];

/// What the init steps need from the page they run against.
pub struct PageWiring {
    pub markup: PageMarkup,
    /// Resolves relative `data-qr` paths
    pub resolver: HttpImageFetcher,
    pub client: reqwest::Client,
    /// Set when QR codes should actually be downloaded
    pub storage: Option<Arc<FolderStorage>>,
    pub audio: Arc<dyn AudioTrack>,
    pub particles: Arc<dyn ParticleHost>,
}

/// The music player once the "music" step has created it.
pub type MusicSlot = Arc<Mutex<Option<MusicPlayer>>>;

impl PageWiring {
    pub fn into_sequence(self) -> (InitSequence, MusicSlot) {
        let mut sequence = InitSequence::new();
        for name in TIMELINES {
            sequence = sequence.step(
                name,
                FnStep(move || {
                    Box::pin(async move {
                        tracing::info!(timeline = name, "timeline started");
                        Ok::<(), DocumentError>(())
                    }) as StepFuture
                }),
            );
        }

        let buttons: Vec<DownloadButton> = self
            .markup
            .download_buttons
            .iter()
            .map(|b| DownloadButton {
                qr: b.qr.clone(),
                name: b.name.clone(),
            })
            .collect();
        let downloader = self.storage.map(|storage| {
            Arc::new(QrDownloader::new(
                Arc::new(self.client.clone()),
                storage,
                Arc::new(TokioTimer),
            ))
        });
        let resolver = self.resolver;
        sequence = sequence.step(
            "qr-download",
            FnStep(move || {
                let buttons = buttons.clone();
                let downloader = downloader.clone();
                let resolver = resolver.clone();
                Box::pin(async move {
                    tracing::info!(buttons = buttons.len(), "download buttons wired");
                    let Some(downloader) = downloader else {
                        return Ok(());
                    };
                    let mut last_error = None;
                    for button in &buttons {
                        let qr = match button.qr.as_deref().filter(|q| !q.is_empty()) {
                            Some(q) => match resolver.resolve(q) {
                                Ok(url) => Some(url.to_string()),
                                Err(e) => {
                                    tracing::error!(qr = q, error = %e, "unresolvable QR path");
                                    last_error = Some(e);
                                    continue;
                                }
                            },
                            None => None,
                        };
                        let resolved = DownloadButton {
                            qr,
                            name: button.name.clone(),
                        };
                        let on_state = |state: ButtonState| tracing::debug!(?state, "download button");
                        if let Err(e) = downloader.download(&resolved, &on_state).await {
                            last_error = Some(e);
                        }
                    }
                    match last_error {
                        Some(e) => Err(e),
                        None => Ok::<(), DocumentError>(()),
                    }
                }) as StepFuture
            }),
        );

        let audio = self.audio;
        let toggle = self.markup.music_toggle;
        let music: MusicSlot = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&music);
        sequence = sequence.step(
            "music",
            FnStep(move || {
                let audio = Arc::clone(&audio);
                let slot = Arc::clone(&slot);
                Box::pin(async move {
                    match toggle {
                        Some(playing) => {
                            let player = MusicPlayer::init(audio, playing).await;
                            tracing::info!(playing = player.is_playing(), "music player ready");
                            *slot.lock().await = Some(player);
                        }
                        None => tracing::debug!("no music toggle on page"),
                    }
                    Ok::<(), DocumentError>(())
                }) as StepFuture
            }),
        );

        let has_particles = self.markup.has_particles;
        let host = self.particles;
        let sequence = sequence.step(
            "particles",
            FnStep(move || {
                let host = Arc::clone(&host);
                Box::pin(async move {
                    if !has_particles {
                        tracing::debug!("no particle container on page");
                        return Ok(());
                    }
                    ParticleField::default()
                        .populate(host.as_ref())
                        .await
                        .map(|_| ())
                }) as StepFuture
            }),
        );
        (sequence, music)
    }
}

/// Static pages have nothing to play.
pub struct SilentTrack;

#[async_trait]
impl AudioTrack for SilentTrack {
    async fn play(&self) -> Result<(), DocumentError> {
        tracing::debug!("play requested on a static page");
        Ok(())
    }

    async fn pause(&self) -> Result<(), DocumentError> {
        Ok(())
    }
}

pub struct PageAudio(pub ChromiumAudio);

#[async_trait]
impl AudioTrack for PageAudio {
    async fn play(&self) -> Result<(), DocumentError> {
        self.0.play().await
    }

    async fn pause(&self) -> Result<(), DocumentError> {
        self.0.pause().await
    }
}

pub struct PageParticles(pub ChromiumParticles);

#[async_trait]
impl ParticleHost for PageParticles {
    async fn append_particles(&self, particles: &[Particle]) -> Result<(), DocumentError> {
        let styles: Vec<String> = particles.iter().map(Particle::style).collect();
        self.0.append_styles(&styles).await
    }
}
