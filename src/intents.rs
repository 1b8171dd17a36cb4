//! Commands from outside the tick loop
//!
//! Other threads (a remote control channel, a file watcher) never touch the
//! session directly. They push intents through an [`IntentSender`]; the tick
//! loop drains the queue once per frame before sampling the pointer.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, SendError, Sender};

use crate::sim::RodGroup;

/// A request for the session to act on at the start of the next tick
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Load a puzzle layout from disk and swap it in
    LoadPuzzle(PathBuf),
    /// Swap in an already built puzzle
    ReplacePuzzle(RodGroup),
    /// Write the current rod positions to disk
    SavePuzzle(PathBuf),
    /// Ping the actuator
    Ping,
}

/// Cloneable handle for pushing intents from any thread
#[derive(Debug, Clone)]
pub struct IntentSender {
    sender: Sender<Intent>,
}

impl IntentSender {
    /// Queue an intent; fails only once the session is gone
    pub fn send(&self, intent: Intent) -> Result<(), SendError<Intent>> {
        self.sender.send(intent)
    }
}

/// Receiving end, owned by the tick loop
#[derive(Debug)]
pub struct IntentQueue {
    sender: Sender<Intent>,
    receiver: Receiver<Intent>,
}

impl Default for IntentQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> IntentSender {
        IntentSender {
            sender: self.sender.clone(),
        }
    }

    /// Everything queued so far, in arrival order
    pub fn drain(&self) -> Vec<Intent> {
        self.receiver.try_iter().collect()
    }
}
