//! Document host abstraction: the browser-side collaborator of the monitor

pub mod fullscreen;
pub mod listeners;
pub mod simulated;
pub mod traits;

pub use fullscreen::FullscreenApi;
pub use listeners::ListenerSet;
pub use simulated::{
    Delivered, FullscreenCall, FullscreenCallKind, FullscreenPolicy, SimulatedDocument,
};
pub use traits::{Document, Listener, TimerTask};
