//! Everything that waits for the preload gate before touching the page.

pub mod music;
pub mod particles;
pub mod qr;
pub mod sequence;
pub mod startup;

pub use music::{AudioTrack, MusicPlayer};
pub use particles::{Particle, ParticleBuffer, ParticleField, ParticleHost};
pub use qr::{BlobFetcher, ButtonState, DownloadButton, QrDownloader};
pub use sequence::{FnStep, InitSequence, InitStep, StepFuture, StepResult};
pub use startup::{PageInitializer, Startup, StartupOutcome};
