//! terragen - procedural terrain with background regeneration and weather effects

mod app;
mod commands;
mod config;
mod preview;
mod weather;

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use anyhow::{Context, Result};
use engine_core::Time;
use renderer::DirectoryAssets;

use app::{App, Flow};
use commands::{Command, HELP};
use config::AppConfig;

/// Forward stdin lines to the tick loop. The channel closes on EOF.
fn spawn_stdin_reader() -> Result<Receiver<String>> {
    let (tx, rx) = mpsc::channel();
    std::thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("spawning stdin reader")?;
    Ok(rx)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("terragen");
    println!("{HELP}");

    let config = AppConfig::load();
    log::info!(
        "Starting terragen: {}x{} terrain, assets in {:?}",
        config.terrain.width,
        config.terrain.height,
        config.asset_root
    );

    let assets = DirectoryAssets::new(config.asset_root.clone());
    let mut app = App::new(&config, Box::new(assets))?;
    let input = spawn_stdin_reader()?;
    let mut time = Time::new(config.tick_rate);
    let mut input_closed = false;

    loop {
        time.update();

        loop {
            match input.try_recv() {
                Ok(line) => match line.parse::<Command>() {
                    Ok(command) => {
                        if app.handle(command) == Flow::Quit {
                            log::info!("Shutting down after {} tick(s)", time.tick_count());
                            return Ok(());
                        }
                    }
                    Err(e) => log::warn!("{}", e),
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    input_closed = true;
                    break;
                }
            }
        }

        app.update(time.delta());

        // Piped input: let the last requested generation land before exiting.
        if input_closed && !app.is_generating() {
            app.update(Duration::ZERO);
            app.handle(Command::Quit);
            log::info!("Input closed after {:.1}s", time.elapsed_seconds());
            return Ok(());
        }

        std::thread::sleep(time.remaining_in_tick());
    }
}
