use async_trait::async_trait;
use curtain_core::{DelayStep, DocumentError, Timer};
use curtain_storage::DownloadSink;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_FILE_STEM: &str = "QR_Code";
pub const RESET_AFTER: Duration = Duration::from_secs(2);

/// Source of the raw QR image bytes.
#[async_trait]
pub trait BlobFetcher: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DocumentError>;
}

#[async_trait]
impl BlobFetcher for reqwest::Client {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DocumentError> {
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| DocumentError::fetch_error(url, e.to_string()))?;
        if !response.status().is_success() {
            return Err(DocumentError::fetch_error(
                url,
                format!("HTTP error! status: {}", response.status()),
            ));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| DocumentError::fetch_error(url, e.to_string()))?;
        Ok(body.to_vec())
    }
}

/// Label state of a download button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Loading,
    Done,
    Failed,
}

/// A `.download-btn`, as read from `data-qr` / `data-name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadButton {
    pub qr: Option<String>,
    pub name: Option<String>,
}

impl DownloadButton {
    pub fn file_name(&self) -> String {
        let stem = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_FILE_STEM);
        format!("{}.jpg", stem)
    }
}

pub struct QrDownloader {
    fetcher: Arc<dyn BlobFetcher>,
    sink: Arc<dyn DownloadSink>,
    timer: Arc<dyn Timer>,
    reset_after: Duration,
}

impl QrDownloader {
    pub fn new(fetcher: Arc<dyn BlobFetcher>, sink: Arc<dyn DownloadSink>, timer: Arc<dyn Timer>) -> Self {
        Self {
            fetcher,
            sink,
            timer,
            reset_after: RESET_AFTER,
        }
    }

    pub fn with_reset_after(mut self, reset_after: Duration) -> Self {
        self.reset_after = reset_after;
        self
    }

    /// Runs one click: Loading, then Done or Failed, then back to Idle after
    /// the reset delay. `on_state` sees every label change.
    pub async fn download(
        &self,
        button: &DownloadButton,
        on_state: &(dyn Fn(ButtonState) + Send + Sync),
    ) -> Result<PathBuf, DocumentError> {
        let Some(qr) = button.qr.as_deref().filter(|q| !q.is_empty()) else {
            tracing::error!("QR image path not found");
            return Err(DocumentError::parsing_error("download button has no data-qr"));
        };

        on_state(ButtonState::Loading);
        let file_name = button.file_name();
        tracing::info!(%file_name, qr, "starting download");

        let result = match self.fetcher.fetch_bytes(qr).await {
            Ok(bytes) => self
                .sink
                .save(&file_name, &bytes)
                .await
                .map_err(|e| DocumentError::storage_error(format!("{:#}", e))),
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => on_state(ButtonState::Done),
            Err(e) => {
                tracing::error!(error = %e, "download failed");
                on_state(ButtonState::Failed);
            }
        }
        self.timer.delay(DelayStep::ButtonReset, self.reset_after).await;
        on_state(ButtonState::Idle);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curtain_test_support::RecordingTimer;
    use std::sync::Mutex;

    struct StaticBlob(Result<Vec<u8>, DocumentError>);

    #[async_trait]
    impl BlobFetcher for StaticBlob {
        async fn fetch_bytes(&self, _url: &str) -> Result<Vec<u8>, DocumentError> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct MemorySink(Mutex<Vec<(String, Vec<u8>)>>);

    #[async_trait]
    impl DownloadSink for MemorySink {
        async fn save(&self, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
            self.0.lock().unwrap().push((file_name.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(file_name))
        }
    }

    fn button(qr: Option<&str>, name: Option<&str>) -> DownloadButton {
        DownloadButton {
            qr: qr.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn successful_download_cycles_back_to_idle() {
        let sink = Arc::new(MemorySink::default());
        let timer = Arc::new(RecordingTimer::new());
        let downloader = QrDownloader::new(Arc::new(StaticBlob(Ok(vec![1, 2, 3]))), sink.clone(), timer.clone());
        let states = Mutex::new(Vec::new());

        let path = downloader
            .download(&button(Some("/qr/bride.jpg"), Some("QR_Bride")), &|s: ButtonState| {
                states.lock().unwrap().push(s)
            })
            .await
            .unwrap();

        assert_eq!(path, PathBuf::from("QR_Bride.jpg"));
        assert_eq!(
            *states.lock().unwrap(),
            vec![ButtonState::Loading, ButtonState::Done, ButtonState::Idle]
        );
        assert_eq!(sink.0.lock().unwrap()[0], ("QR_Bride.jpg".to_string(), vec![1, 2, 3]));
        assert_eq!(timer.steps(), vec![DelayStep::ButtonReset]);
        assert_eq!(timer.total(), RESET_AFTER);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_shows_error_then_resets() {
        let sink = Arc::new(MemorySink::default());
        let downloader = QrDownloader::new(
            Arc::new(StaticBlob(Err(DocumentError::fetch_error("/qr/x.jpg", "HTTP error! status: 404")))),
            sink.clone(),
            Arc::new(RecordingTimer::new()),
        );
        let states = Mutex::new(Vec::new());

        let result = downloader
            .download(&button(Some("/qr/x.jpg"), None), &|s: ButtonState| states.lock().unwrap().push(s))
            .await;

        assert!(result.is_err());
        assert_eq!(
            *states.lock().unwrap(),
            vec![ButtonState::Loading, ButtonState::Failed, ButtonState::Idle]
        );
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_qr_path_changes_nothing() {
        let downloader = QrDownloader::new(
            Arc::new(StaticBlob(Ok(Vec::new()))),
            Arc::new(MemorySink::default()),
            Arc::new(RecordingTimer::new()),
        );
        let states = Mutex::new(Vec::new());

        let result = downloader
            .download(&button(None, Some("QR_Groom")), &|s: ButtonState| states.lock().unwrap().push(s))
            .await;

        assert!(result.is_err());
        assert!(states.lock().unwrap().is_empty());
    }

    #[test]
    fn file_name_defaults_when_unnamed() {
        assert_eq!(button(Some("/qr/a.jpg"), None).file_name(), "QR_Code.jpg");
        assert_eq!(button(Some("/qr/a.jpg"), Some("")).file_name(), "QR_Code.jpg");
    }
}
