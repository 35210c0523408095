use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::{
    session::{slot::SlotStorage, store::SessionStore},
    stats::aggregator::stats_available,
    timer::{
        controller::{SessionController, SessionStop},
        duration::SessionMinutes,
        notify::{Notifier, SilentNotifier, TerminalNotifier},
        runner::run_session,
        shutdown::cancel_on_interrupt,
        state::StopReason,
    },
    utils::{clock::DefaultClock, time::format_duration},
};

#[derive(Debug, Parser)]
pub struct StartCommand {
    #[arg(help = "Length of the session in whole minutes, from 1 to 240")]
    minutes: SessionMinutes,
    #[arg(long, help = "Don't ring the terminal bell when the session completes")]
    quiet: bool,
}

/// Runs a session in the foreground, redrawing the countdown every second.
pub async fn process_start_command<S: SlotStorage>(
    StartCommand { minutes, quiet }: StartCommand,
    store: SessionStore<S>,
) -> Result<()> {
    let notifier: Box<dyn Notifier> = if quiet {
        Box::new(SilentNotifier)
    } else {
        Box::new(TerminalNotifier)
    };
    let mut controller = SessionController::new(store, notifier, Box::new(DefaultClock));

    let shutdown = CancellationToken::new();
    let interrupt_listener = tokio::spawn(cancel_on_interrupt(shutdown.clone()));

    let result = run_session(&mut controller, minutes, shutdown.clone(), print_remaining).await;

    shutdown.cancel();
    if let Err(e) = interrupt_listener.await {
        warn!("Interrupt listener failed {e:?}");
    }

    let stop = result?;
    println!();
    println!("{}", stop_summary(&stop));

    if stats_available(controller.store().count().await) {
        println!("Run `deepwork stats` to review your sessions.");
    }
    Ok(())
}

fn print_remaining(remaining: u32) {
    let mut stdout = std::io::stdout().lock();
    // A failed redraw is not worth ending the session over.
    let _ = write!(stdout, "\r{}", format_duration(remaining.into()));
    let _ = stdout.flush();
}

fn stop_summary(stop: &SessionStop) -> String {
    let message = match stop.reason {
        StopReason::Completed => "Time's up!",
        StopReason::UserEnded => "User ended the session!",
    };
    match &stop.record {
        Some(record) => format!(
            "{message} Recorded {} of deep work.",
            format_duration(record.duration_seconds)
        ),
        None => format!("{message} Nothing was recorded."),
    }
}
