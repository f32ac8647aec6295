use anyhow::Result;
use clap::Parser;
use winit::event_loop::EventLoop;

use scene_editor::app::App;
use scene_editor::cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("scene_editor=info")).init();

    let cli = Cli::parse();
    let mut app = App::new(&cli)?;

    let event_loop = EventLoop::new()?;
    log::info!("Scene Editor - click to select, drag to orbit, T/R/S gizmo modes, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
