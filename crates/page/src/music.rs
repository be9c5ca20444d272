use async_trait::async_trait;
use curtain_core::DocumentError;
use std::sync::Arc;

#[async_trait]
pub trait AudioTrack: Send + Sync {
    async fn play(&self) -> Result<(), DocumentError>;
    async fn pause(&self) -> Result<(), DocumentError>;
}

/// Background music behind the `#musicToggle` button. The toggle's
/// `playing` class in the markup decides whether playback starts at init.
pub struct MusicPlayer {
    track: Arc<dyn AudioTrack>,
    playing: bool,
}

impl MusicPlayer {
    pub async fn init(track: Arc<dyn AudioTrack>, initially_playing: bool) -> Self {
        if initially_playing {
            // Autoplay is often blocked; the button still reflects the intent.
            if let Err(e) = track.play().await {
                tracing::warn!(error = %e, "autoplay refused");
            }
        }
        Self {
            track,
            playing: initially_playing,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Flips playback. State only changes when the track accepted the command.
    pub async fn toggle(&mut self) -> Result<bool, DocumentError> {
        if self.playing {
            self.track.pause().await?;
        } else {
            self.track.play().await?;
        }
        self.playing = !self.playing;
        tracing::debug!(playing = self.playing, "music toggled");
        Ok(self.playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTrack {
        calls: Mutex<Vec<&'static str>>,
        refuse_play: bool,
    }

    #[async_trait]
    impl AudioTrack for RecordingTrack {
        async fn play(&self) -> Result<(), DocumentError> {
            self.calls.lock().unwrap().push("play");
            if self.refuse_play {
                return Err(DocumentError::browser_error("NotAllowedError"));
            }
            Ok(())
        }

        async fn pause(&self) -> Result<(), DocumentError> {
            self.calls.lock().unwrap().push("pause");
            Ok(())
        }
    }

    #[tokio::test]
    async fn starts_playing_when_marked_playing() {
        let track = Arc::new(RecordingTrack::default());
        let mut player = MusicPlayer::init(track.clone(), true).await;
        assert!(player.is_playing());

        assert!(!player.toggle().await.unwrap());
        assert!(player.toggle().await.unwrap());
        assert_eq!(*track.calls.lock().unwrap(), vec!["play", "pause", "play"]);
    }

    #[tokio::test]
    async fn stays_silent_until_toggled() {
        let track = Arc::new(RecordingTrack::default());
        let mut player = MusicPlayer::init(track.clone(), false).await;
        assert!(track.calls.lock().unwrap().is_empty());
        assert!(player.toggle().await.unwrap());
    }

    #[tokio::test]
    async fn refused_play_keeps_state() {
        let track = Arc::new(RecordingTrack {
            refuse_play: true,
            ..Default::default()
        });
        let mut player = MusicPlayer::init(track, false).await;
        assert!(player.toggle().await.is_err());
        assert!(!player.is_playing());
    }
}
