//! Cloud assembly output.

use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use condapipe_core::template::Template;

use crate::SynthResult;
use crate::assets::AssetManifest;

/// File name of the emitted template.
pub const TEMPLATE_FILE: &str = "template.json";
/// File name of the emitted asset manifest.
pub const ASSETS_FILE: &str = "assets.json";

/// Everything synthesis produces: the stack description and the assets the
/// external builder must materialize before deploying it.
#[derive(Debug, Clone, Serialize)]
pub struct CloudAssembly {
    pub template: Template,
    pub assets: AssetManifest,
}

impl CloudAssembly {
    /// Write the assembly to a directory, creating it if needed.
    ///
    /// Returns the paths written.
    pub fn write(&self, out_dir: impl AsRef<Path>) -> SynthResult<Vec<PathBuf>> {
        let out_dir = out_dir.as_ref();
        fs::create_dir_all(out_dir)?;

        let template_path = out_dir.join(TEMPLATE_FILE);
        write_json(&template_path, &self.template)?;

        let assets_path = out_dir.join(ASSETS_FILE);
        write_json(&assets_path, &self.assets)?;

        info!(dir = %out_dir.display(), "wrote cloud assembly");
        Ok(vec![template_path, assets_path])
    }

    /// Pretty-printed template JSON.
    pub fn template_json(&self) -> SynthResult<String> {
        Ok(serde_json::to_string_pretty(&self.template)?)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> SynthResult<()> {
    let mut file = fs::File::create(path)?;
    let json = serde_json::to_string_pretty(value)?;
    writeln!(file, "{json}")?;
    Ok(())
}
