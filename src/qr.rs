//! QR payloads describing the wallet, and the timer regenerating them.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use rust_decimal::{Decimal, RoundingStrategy};

const PAYLOAD_PREFIX: &str = "WaveWeb";

/// The text encoded in the wallet QR code
///
/// Renders as `WaveWeb|Solde:<balance>|ID:<user id>|<unix millis>`. The
/// timestamp makes every regenerated payload distinct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrPayload {
    balance: Decimal,
    user_id: String,
    issued_at_millis: i64,
}

impl QrPayload {
    /// Creates the payload for `balance`, rounded to the cent
    pub fn new(balance: Decimal, user_id: impl Into<String>, issued_at_millis: i64) -> Self {
        let mut balance = balance.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        balance.rescale(2);

        Self {
            balance,
            user_id: user_id.into(),
            issued_at_millis,
        }
    }

    /// The balance, to the cent
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// The account the payload identifies
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// When the payload was generated, in milliseconds since the Unix epoch
    pub fn issued_at_millis(&self) -> i64 {
        self.issued_at_millis
    }
}

impl fmt::Display for QrPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|Solde:{}|ID:{}|{}",
            PAYLOAD_PREFIX, self.balance, self.user_id, self.issued_at_millis,
        )
    }
}

/// Runs a callback right away and then periodically on a background thread
///
/// At most one timer is active per refresher: starting it again stops the
/// previous timer first. Dropping the refresher stops the timer.
#[derive(Debug)]
pub struct QrRefresher {
    interval: Duration,
    handle: Option<RefresherHandle>,
}

#[derive(Debug)]
struct RefresherHandle {
    shutdown: mpsc::Sender<()>,
    join: thread::JoinHandle<()>,
}

impl QrRefresher {
    /// Creates a stopped refresher ticking every `interval` once started
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            handle: None,
        }
    }

    /// The time between two refreshes
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a timer is active
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// (Re)starts the timer with `refresh` as callback
    ///
    /// `refresh` runs once immediately, then every interval until the timer
    /// is stopped or restarted.
    pub fn start<F>(&mut self, mut refresh: F) -> std::io::Result<()>
        where F: FnMut() + Send + 'static
    {
        self.stop();

        let interval = self.interval;
        let (shutdown, shutdown_rx) = mpsc::channel::<()>();
        let join = thread::Builder::new()
            .name("qr-refresh".to_owned())
            .spawn(move || {
                tracing::debug!(?interval, "qr refresh timer started");
                loop {
                    refresh();
                    match shutdown_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        // an explicit stop or the refresher went away
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::debug!("qr refresh timer stopped");
            })?;

        self.handle = Some(RefresherHandle { shutdown, join });
        Ok(())
    }

    /// Stops the timer and waits for a running callback to finish
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.shutdown.send(());
            if handle.join.join().is_err() {
                tracing::warn!("qr refresh callback panicked");
            }
        }
    }
}

impl Drop for QrRefresher {
    fn drop(&mut self) {
        self.stop();
    }
}
