mod app;
mod builtin;
mod cli;

use anyhow::Result;
use assets::Engine;
use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::{app::App, cli::Cli};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    log::info!("Démarrage du moteur..");
    let engine = Engine::init(&cli.vfs_config(builtin::source()))?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(engine);

    log::info!("Entrée dans la boucle principale...");
    event_loop.run_app(&mut app)?;

    Ok(())
}
