pub mod document;
pub mod launch;
pub mod script;
pub mod session;
pub mod wait;

pub use document::{
    ChromiumAudio, ChromiumBackground, ChromiumDocument, ChromiumFetcher, ChromiumImage,
    ChromiumLoader, ChromiumParticles,
};
pub use session::BrowserSession;
pub use wait::WaitStrategy;
