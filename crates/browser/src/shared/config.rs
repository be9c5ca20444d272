use std::time::Duration;

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub navigation: Duration,
    pub dom_ready: Duration,
    pub check_interval: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            navigation: Duration::from_millis(30000),
            dom_ready: Duration::from_millis(15000),
            check_interval: Duration::from_millis(100),
        }
    }
}

impl BrowserConfig {
    pub fn headed(mut self) -> Self {
        self.headless = false;
        self
    }

    pub fn with_dom_ready(mut self, ms: u64) -> Self {
        self.dom_ready = Duration::from_millis(ms);
        self
    }

    pub fn fast() -> Self {
        Self {
            navigation: Duration::from_millis(15000),
            dom_ready: Duration::from_millis(8000),
            check_interval: Duration::from_millis(50),
            ..Self::default()
        }
    }

    pub fn patient() -> Self {
        Self {
            navigation: Duration::from_millis(60000),
            dom_ready: Duration::from_millis(30000),
            check_interval: Duration::from_millis(250),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_keep_headless() {
        assert!(BrowserConfig::fast().headless);
        assert!(BrowserConfig::patient().headless);
        assert!(!BrowserConfig::default().headed().headless);
    }

    #[test]
    fn dom_ready_override_in_millis() {
        let config = BrowserConfig::fast().with_dom_ready(250);
        assert_eq!(config.dom_ready, Duration::from_millis(250));
        assert_eq!(config.check_interval, Duration::from_millis(50));
    }
}
