pub mod config;
pub mod gate;
pub mod loader;
pub mod state;

pub use config::{ConfigError, TransitionConfig};
pub use gate::{AssetPreloadGate, GateHandle};
pub use loader::LoaderController;
pub use state::{GateState, Transition};
