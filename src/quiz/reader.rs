use std::io::{BufRead, BufReader, Stdin};
use std::sync::{Arc, Mutex};
use std::thread;

use log::{debug, warn};
use tokio::sync::oneshot;

/// Reads one line of user input per request on a detached thread, so the
/// caller can keep waiting on the clock while the user types.
pub struct AnswerReader<R> {
    input: Arc<Mutex<R>>,
}

impl AnswerReader<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(std::io::stdin()))
    }
}

impl<R> AnswerReader<R>
where
    R: BufRead + Send + 'static,
{
    pub fn new(input: R) -> Self {
        Self {
            input: Arc::new(Mutex::new(input)),
        }
    }

    /// Starts reading the next line and returns immediately. End of input or
    /// a read error means the answer never arrives.
    pub fn request_answer(&self) -> PendingAnswer {
        let (tx, rx) = oneshot::channel();
        let input = self.input.clone();

        let spawned = thread::Builder::new()
            .name("answer-reader".to_string())
            .spawn(move || {
                let mut line = String::new();
                let read = match input.lock() {
                    Ok(mut input) => input.read_line(&mut line),
                    Err(_) => return,
                };
                match read {
                    Ok(0) => debug!("Input closed, no answer will arrive"),
                    Ok(_) => {
                        // the receiver is gone once the session has ended
                        let _ = tx.send(line);
                    }
                    Err(err) => warn!("Failed to read answer: {err}"),
                }
            });
        if let Err(err) = spawned {
            warn!("Failed to start answer reader: {err}");
        }

        PendingAnswer { rx }
    }
}

/// A single answer that may or may not arrive.
#[derive(Debug)]
pub struct PendingAnswer {
    rx: oneshot::Receiver<String>,
}

impl PendingAnswer {
    /// An answer that has already arrived.
    #[cfg(test)]
    pub fn ready(line: &str) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(line.to_string());
        Self { rx }
    }

    /// Resolves with the raw line, newline included. Never resolves if the
    /// read produced nothing.
    pub async fn recv(self) -> String {
        match self.rx.await {
            Ok(line) => line,
            Err(_) => std::future::pending().await,
        }
    }
}
