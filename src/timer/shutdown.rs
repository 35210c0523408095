use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels `cancellation` on Ctrl-C, which ends the running session early. Returns without
/// cancelling once the token is cancelled elsewhere, for example when the session completed.
pub async fn cancel_on_interrupt(cancellation: CancellationToken) {
    select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => {
                    info!("Interrupt received, ending the session");
                    cancellation.cancel();
                }
                // Without a signal handler the session simply runs until it completes.
                Err(e) => warn!("Can't listen for interrupts {e:?}"),
            }
        },
        _ = cancellation.cancelled() => (),
    };
}
