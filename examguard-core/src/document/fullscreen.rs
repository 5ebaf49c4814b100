//! Fullscreen capability probing
//!
//! Browsers expose fullscreen through a standard API and three
//! vendor-prefixed variants. The monitor resolves one of them when it is
//! built and uses it for every later call.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::traits::Document;

/// One flavour of the fullscreen API
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FullscreenApi {
    Standard,
    Webkit,
    Moz,
    Ms,
}

impl FullscreenApi {
    /// Detection order: standard first, then the prefixed variants
    pub const DETECTION_ORDER: [FullscreenApi; 4] = [
        FullscreenApi::Standard,
        FullscreenApi::Webkit,
        FullscreenApi::Moz,
        FullscreenApi::Ms,
    ];

    /// Pick the first API the document supports
    pub fn resolve<D: Document + ?Sized>(document: &D) -> Option<Self> {
        let api = Self::DETECTION_ORDER
            .into_iter()
            .find(|api| document.supports(*api));
        match api {
            Some(api) => tracing::debug!(api = %api, "Resolved fullscreen API"),
            None => tracing::warn!("No fullscreen API available; lockdown will run windowed"),
        }
        api
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Webkit => "webkit",
            Self::Moz => "moz",
            Self::Ms => "ms",
        }
    }

    /// Element method that requests fullscreen
    pub fn request_method(&self) -> &'static str {
        match self {
            Self::Standard => "requestFullscreen",
            Self::Webkit => "webkitRequestFullscreen",
            Self::Moz => "mozRequestFullScreen",
            Self::Ms => "msRequestFullscreen",
        }
    }

    /// Document method that leaves fullscreen
    pub fn exit_method(&self) -> &'static str {
        match self {
            Self::Standard => "exitFullscreen",
            Self::Webkit => "webkitExitFullscreen",
            Self::Moz => "mozCancelFullScreen",
            Self::Ms => "msExitFullscreen",
        }
    }

    /// Document property holding the current fullscreen element
    pub fn element_property(&self) -> &'static str {
        match self {
            Self::Standard => "fullscreenElement",
            Self::Webkit => "webkitFullscreenElement",
            Self::Moz => "mozFullScreenElement",
            Self::Ms => "msFullscreenElement",
        }
    }

    /// Name of the change event
    pub fn change_event(&self) -> &'static str {
        match self {
            Self::Standard => "fullscreenchange",
            Self::Webkit => "webkitfullscreenchange",
            Self::Moz => "mozfullscreenchange",
            Self::Ms => "MSFullscreenChange",
        }
    }
}

impl fmt::Display for FullscreenApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
