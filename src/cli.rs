use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-editor")]
#[command(about = "3D scene viewer with picking and transform editing", long_about = None)]
pub struct Cli {
    /// Display only: clicks never select and transforms cannot be edited
    #[arg(long = "view-only", default_value = "false")]
    pub view_only: bool,

    /// glTF/GLB model to import at start-up (repeatable)
    #[arg(long = "model", value_name = "PATH")]
    pub models: Vec<PathBuf>,

    /// JSON viewer config
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directional light intensity, overrides the config file
    #[arg(long = "light-intensity", value_parser = parse_intensity)]
    pub light_intensity: Option<f32>,

    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    #[arg(long, default_value_t = 800)]
    pub height: u32,
}

fn parse_intensity(text: &str) -> Result<f32, String> {
    let value: f32 = text.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=crate::scenes::MAX_LIGHT_INTENSITY).contains(&value) {
        Ok(value)
    } else {
        Err(format!("must be between 0 and {}", crate::scenes::MAX_LIGHT_INTENSITY))
    }
}
