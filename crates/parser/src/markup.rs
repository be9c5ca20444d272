use curtain_core::DocumentError;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

pub const IMAGE_SELECTOR: &str = "img";
pub const BACKGROUND_SELECTOR: &str = "[data-bg]";
pub const LOADER_SELECTOR: &str = "#loader";
pub const DOWNLOAD_BUTTON_SELECTOR: &str = ".download-btn";
pub const MUSIC_TOGGLE_SELECTOR: &str = "#musicToggle";
pub const AUDIO_SELECTOR: &str = "#bgMusic";
pub const PARTICLES_SELECTOR: &str = "#particles";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadButtonMarkup {
    /// `data-qr`: path of the QR image to download
    pub qr: Option<String>,
    /// `data-name`: file name stem for the saved image
    pub name: Option<String>,
}

/// Everything the page script cares about, read from static HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMarkup {
    /// `src` of every `<img>`, empty when the attribute is missing
    pub images: Vec<String>,
    /// `data-bg` of every element carrying one
    pub backgrounds: Vec<Option<String>>,
    pub has_loader: bool,
    pub download_buttons: Vec<DownloadButtonMarkup>,
    /// `Some(playing)` when a music toggle exists
    pub music_toggle: Option<bool>,
    pub audio_source: Option<String>,
    pub has_particles: bool,
}

impl PageMarkup {
    pub fn parse(html: &str) -> Result<Self, DocumentError> {
        let document = Html::parse_document(html);

        let images = select_all(&document, IMAGE_SELECTOR)?
            .map(|el| el.value().attr("src").unwrap_or("").to_string())
            .collect();

        let backgrounds = select_all(&document, BACKGROUND_SELECTOR)?
            .map(|el| el.value().attr("data-bg").map(str::to_string))
            .collect();

        let download_buttons = select_all(&document, DOWNLOAD_BUTTON_SELECTOR)?
            .map(|el| DownloadButtonMarkup {
                qr: el.value().attr("data-qr").map(str::to_string),
                name: el.value().attr("data-name").map(str::to_string),
            })
            .collect();

        let music_toggle = select_all(&document, MUSIC_TOGGLE_SELECTOR)?
            .next()
            .map(|el| el.value().classes().any(|class| class == "playing"));

        let audio_source = select_all(&document, AUDIO_SELECTOR)?.next().and_then(|el| {
            el.value()
                .attr("src")
                .map(str::to_string)
                .or_else(|| nested_source(&el))
        });

        Ok(Self {
            images,
            backgrounds,
            has_loader: select_all(&document, LOADER_SELECTOR)?.next().is_some(),
            download_buttons,
            music_toggle,
            audio_source,
            has_particles: select_all(&document, PARTICLES_SELECTOR)?.next().is_some(),
        })
    }

    pub fn expected(&self) -> usize {
        self.images.len() + self.backgrounds.len()
    }
}

fn select_all<'a>(
    document: &'a Html,
    css: &str,
) -> Result<std::vec::IntoIter<ElementRef<'a>>, DocumentError> {
    let selector = Selector::parse(css)
        .map_err(|e| DocumentError::parsing_error(format!("{}: {}", css, e)))?;
    Ok(document.select(&selector).collect::<Vec<_>>().into_iter())
}

fn nested_source(audio: &ElementRef<'_>) -> Option<String> {
    let selector = Selector::parse("source").ok()?;
    audio
        .select(&selector)
        .next()
        .and_then(|s| s.value().attr("src"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div id="loader" class="loader"><span>Loading</span></div>
          <section class="hero" data-bg="/images/hero.jpg">
            <div id="particles"></div>
            <img src="/images/couple.jpg" alt="">
            <img alt="no source">
          </section>
          <div class="sec-img" data-bg=""></div>
          <div class="mask" data-bg></div>
          <button class="download-btn" data-qr="/qr/bride.jpg" data-name="QR_Bride">Download</button>
          <button class="download-btn">Broken</button>
          <button id="musicToggle" class="music-toggle playing"></button>
          <audio id="bgMusic" loop><source src="/audio/theme.mp3"></audio>
        </body></html>
    "#;

    #[test]
    fn finds_every_tracked_resource() {
        let markup = PageMarkup::parse(PAGE).unwrap();
        assert_eq!(markup.images, vec!["/images/couple.jpg".to_string(), String::new()]);
        assert_eq!(
            markup.backgrounds,
            vec![
                Some("/images/hero.jpg".to_string()),
                Some(String::new()),
                Some(String::new())
            ]
        );
        assert_eq!(markup.expected(), 5);
        assert!(markup.has_loader);
    }

    #[test]
    fn reads_collaborator_wiring() {
        let markup = PageMarkup::parse(PAGE).unwrap();
        assert_eq!(markup.download_buttons.len(), 2);
        assert_eq!(markup.download_buttons[0].qr.as_deref(), Some("/qr/bride.jpg"));
        assert_eq!(markup.download_buttons[0].name.as_deref(), Some("QR_Bride"));
        assert_eq!(markup.download_buttons[1].qr, None);
        assert_eq!(markup.music_toggle, Some(true));
        assert_eq!(markup.audio_source.as_deref(), Some("/audio/theme.mp3"));
        assert!(markup.has_particles);
    }

    #[test]
    fn bare_page_has_nothing_to_track() {
        let markup = PageMarkup::parse("<html><body><p>hi</p></body></html>").unwrap();
        assert_eq!(markup.expected(), 0);
        assert!(!markup.has_loader);
        assert_eq!(markup.music_toggle, None);
    }
}
