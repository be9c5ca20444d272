use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use curtain_core::DocumentError;
use std::path::PathBuf;
use tokio::task::JoinHandle;

use super::launch::launch_browser;
use super::{ChromiumAudio, ChromiumDocument, ChromiumFetcher, ChromiumParticles, WaitStrategy};
use crate::shared::{BrowserConfig, to_document_error};

/// One browser with one page open on the target URL.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    profile_dir: PathBuf,
}

impl BrowserSession {
    /// Launches, navigates and waits until the DOM is parsed.
    pub async fn open(url: &str, config: &BrowserConfig) -> Result<Self, DocumentError> {
        let (mut browser, handler, profile_dir) = launch_browser(config).await?;

        let page = match browser.new_page(url).await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler.abort();
                return Err(to_document_error(e, "Navigate"));
            }
        };
        tracing::info!(url, "page opened");

        let session = Self {
            browser,
            page,
            handler,
            profile_dir,
        };
        WaitStrategy::new(config.clone())
            .wait_for_dom_ready(&session.page)
            .await?;
        Ok(session)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn document(&self) -> ChromiumDocument {
        ChromiumDocument::new(self.page.clone())
    }

    pub fn fetcher(&self) -> ChromiumFetcher {
        ChromiumFetcher::new(self.page.clone())
    }

    pub fn audio(&self) -> ChromiumAudio {
        ChromiumAudio::new(self.page.clone())
    }

    pub fn particles(&self) -> ChromiumParticles {
        ChromiumParticles::new(self.page.clone())
    }

    pub async fn close(mut self) -> Result<(), DocumentError> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| to_document_error(e, "CloseBrowser"));
        self.handler.abort();
        if let Err(e) = std::fs::remove_dir_all(&self.profile_dir) {
            tracing::debug!(error = %e, "profile dir left behind");
        }
        closed
    }
}
