use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig, HeadlessMode};
use curtain_core::DocumentError;
use futures::StreamExt;
use std::path::PathBuf;
use tokio::task::JoinHandle;

use crate::shared::BrowserConfig;

/// Launches Chromium and drives its CDP handler on a background task.
pub async fn launch_browser(
    config: &BrowserConfig,
) -> Result<(Browser, JoinHandle<()>, PathBuf), DocumentError> {
    let headless_mode = if config.headless { HeadlessMode::True } else { HeadlessMode::False };

    // Each instance gets its own profile to avoid SingletonLock conflicts
    let profile_dir = std::env::temp_dir().join(format!("curtain-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&profile_dir)
        .map_err(|e| DocumentError::browser_error(format!("Failed to create profile dir: {}", e)))?;

    let chromium_cfg = ChromeConfig::builder()
        .headless_mode(headless_mode)
        .user_data_dir(&profile_dir)
        .request_timeout(config.navigation)
        .build()
        .map_err(|e| DocumentError::browser_error(format!("Browser launch failed: {}", e)))?;

    let (browser, mut handler) = Browser::launch(chromium_cfg)
        .await
        .map_err(|e| DocumentError::browser_error(format!("Browser launch failed: {}", e)))?;

    let handler_task = tokio::spawn(async move {
        while handler.next().await.is_some() {}
    });

    tracing::info!(headless = config.headless, profile = %profile_dir.display(), "browser launched");
    Ok((browser, handler_task, profile_dir))
}
