//! Manual refresh from the terminal.
//!
//! Each line read on stdin becomes one `()` on the scheduler's refresh channel.

use crossbeam_channel::Sender;
use log::{debug, error};
use std::io::{self, BufRead};
use std::thread;

/// Lightweight stdin listener that turns every entered line into a manual
/// refresh request for the scheduler.
pub struct StdinRefreshListener;

impl StdinRefreshListener {
    /// Spawn a background thread that reads lines from stdin and sends one `()`
    /// on `refresh_tx` per line. The thread ends on EOF, on a read error, or
    /// once the scheduler has dropped its receiver.
    pub fn start(refresh_tx: Sender<()>) {
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(_) => {
                        debug!("Manual refresh requested");
                        if refresh_tx.send(()).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
            debug!("Refresh listener stopping");
        });
    }
}
