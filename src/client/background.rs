//! Background execution for blocking backend calls.
//!
//! The TUI event loop must keep handling keystrokes while a fetch is in
//! flight, and the transliterator must tolerate running before the first
//! mapping fetch resolves. Each call runs on a short-lived worker thread and
//! delivers its result over a one-shot channel that the event loop polls each
//! tick. Results are applied wholesale on the event-loop thread, so there is
//! no shared mutable state to lock. When two fetches race (the user triggers
//! a reload twice), the caller keeps only the newest receiver: last write
//! wins.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Runs `job` on a worker thread, returning the receiving end of a one-shot
/// channel carrying its result.
///
/// If the receiver is dropped before the job finishes, the result is
/// discarded; the worker thread exits either way.
pub fn spawn_fetch<T, F>(job: F) -> Receiver<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver may be gone; nothing useful to do about it.
        let _ = tx.send(job());
    });
    rx
}

/// Polls a pending fetch without blocking.
///
/// Returns the result once it arrives and clears the slot. A disconnected
/// channel (worker died) also clears the slot and yields nothing.
pub fn poll<T>(pending: &mut Option<Receiver<T>>) -> Option<T> {
    let received = match pending.as_ref() {
        Some(rx) => rx.try_recv(),
        None => return None,
    };

    match received {
        Ok(value) => {
            *pending = None;
            Some(value)
        }
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => {
            *pending = None;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_spawn_fetch_delivers_result() {
        let rx = spawn_fetch(|| 2 + 2);
        let value = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(value, 4);
    }

    #[test]
    fn test_poll_empty_slot() {
        let mut pending: Option<Receiver<i32>> = None;
        assert_eq!(poll(&mut pending), None);
    }

    #[test]
    fn test_poll_consumes_result_once() {
        let rx = spawn_fetch(|| "done".to_string());
        let mut pending = Some(rx);

        // Wait for the worker to finish, then poll.
        let mut result = None;
        for _ in 0..100 {
            result = poll(&mut pending);
            if result.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(result.as_deref(), Some("done"));
        assert!(pending.is_none());
    }
}
