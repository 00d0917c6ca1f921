//! Error taxonomy of the portal scene.
//!
//! Only [`SceneError::Surface`] is fatal. Everything else degrades the scene
//! (missing geometry, placeholder texture) or is handed back to the caller of
//! a debug-panel edit.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// Fetching or decoding an asset failed.
    #[error("failed to load asset `{path}`: {reason}")]
    AssetLoad { path: String, reason: String },

    /// An asset did not arrive within the configured timeout.
    #[error("asset `{path}` did not finish loading within {after:?}")]
    LoadTimeout { path: String, after: Duration },

    /// A node the material table relies on is absent from the loaded model.
    #[error("required node `{0}` is missing from the loaded model")]
    MissingNode(String),

    /// No canvas, adapter or device could be acquired.
    #[error("cannot acquire a render surface: {0}")]
    Surface(String),

    #[error("no debug control named `{0}`")]
    UnknownControl(String),

    #[error("value does not fit debug control `{name}`")]
    ControlMismatch { name: String },

    #[error("`{0}` is not a #rrggbb colour")]
    InvalidColour(String),
}

impl SceneError {
    pub(crate) fn asset(path: &str, err: anyhow::Error) -> Self {
        Self::AssetLoad {
            path: path.to_string(),
            reason: format!("{err:#}"),
        }
    }

    /// Whether the error must stop the application.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Surface(_))
    }
}
