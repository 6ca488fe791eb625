use gsr_tray_core::hook::PostSaveHook;

use serde::{Deserialize, Serialize};

/// Script run after a replay is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessingConfig {
    /// Run the script after each save.
    pub enabled: bool,
    /// Script path.
    pub script: String,
}

impl PostProcessingConfig {
    /// The configured hook, if enabled with a script.
    pub fn hook(&self) -> Option<PostSaveHook> {
        PostSaveHook::configured(self.enabled, &self.script)
    }
}
