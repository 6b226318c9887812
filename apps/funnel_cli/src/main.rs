use std::{
    io::{self, Write},
    path::PathBuf,
};

mod config;
mod input;
mod render;

use anyhow::Result;
use clap::Parser;
use funnel_core::{FunnelController, FunnelError, FunnelEvent, StepId};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::TryRecvError},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "funnel", about = "Walk through the funnel in a terminal")]
struct Args {
    /// TOML settings file (defaults to ./funnel.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Speed-up factor applied to every loading timer
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
    /// Keep previous screens instead of clearing on each step
    #[arg(long)]
    no_clear: bool,
}

/// Applies pending controller events to the terminal; returns whether a redraw is due.
fn apply_events(
    events: &mut broadcast::Receiver<FunnelEvent>,
    clear_screen: bool,
    out: &mut impl Write,
) -> io::Result<bool> {
    let mut redraw = false;
    loop {
        match events.try_recv() {
            Ok(FunnelEvent::ScrollReset) => {
                if clear_screen {
                    write!(out, "{}", render::CLEAR_SCREEN)?;
                }
                redraw = true;
            }
            Ok(_) => redraw = true,
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "renderer fell behind controller events");
                redraw = true;
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    Ok(redraw)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref())?;
    if args.no_clear {
        settings.clear_screen = false;
    }

    let filter =
        EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let timings = settings.timings.scaled(args.speed);
    let mut controller = FunnelController::new(timings)?;
    let mut events = controller.subscribe_events();
    info!(session_id = %controller.session_id(), ?timings, "funnel ready");

    let mut stdout = io::stdout();
    if settings.clear_screen {
        write!(stdout, "{}", render::CLEAR_SCREEN)?;
    }
    render::render_view(&controller.view(), &mut stdout)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while !controller.is_complete() {
        if controller.current_step() == StepId::Loading {
            if controller.process_next_tick().await.is_none() {
                warn!("loading step without a running sequence");
                break;
            }
        } else {
            let Some(line) = lines.next_line().await? else {
                info!(step = %controller.current_step(), "input closed before the funnel ended");
                break;
            };
            if let Err(err) = input::handle_input(&mut controller, &line) {
                let code = err.downcast_ref::<FunnelError>().map(FunnelError::code);
                warn!(step = %controller.current_step(), ?code, error = %err, "input ignored");
                writeln!(stdout, "{err}")?;
                continue;
            }
        }

        if apply_events(&mut events, settings.clear_screen, &mut stdout)? {
            render::redraw(&controller.view(), settings.clear_screen, &mut stdout)?;
        }
    }

    Ok(())
}
