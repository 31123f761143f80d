// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Channel-backed host promise for embedders without a JS-style runtime.

use idvbridge_core::codes;
use tokio::sync::oneshot;

use crate::traits::{HostPromise, ResultMap};

/// A rejected launch, as the host would see it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct Rejection {
    pub code: String,
    pub message: String,
}

pub type Settlement = std::result::Result<ResultMap, Rejection>;

/// Sending half, handed to the bridge.
#[derive(Debug)]
pub struct ChannelPromise {
    sender: oneshot::Sender<Settlement>,
}

/// Receiving half, kept by the caller.
#[derive(Debug)]
pub struct PromiseReceiver {
    receiver: oneshot::Receiver<Settlement>,
}

impl ChannelPromise {
    pub fn new() -> (Self, PromiseReceiver) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, PromiseReceiver { receiver })
    }

    fn settle(self, settlement: Settlement) {
        // The caller may have given up on the receiver; nothing to do then.
        let _ = self.sender.send(settlement);
    }
}

impl HostPromise for ChannelPromise {
    fn resolve(self: Box<Self>, result: ResultMap) {
        self.settle(Ok(result));
    }

    fn reject(self: Box<Self>, code: &str, message: &str) {
        self.settle(Err(Rejection {
            code: code.to_owned(),
            message: message.to_owned(),
        }));
    }
}

impl PromiseReceiver {
    /// Block the current thread until the promise settles. Must not be called
    /// from inside an async context.
    pub fn blocking_wait(self) -> Settlement {
        self.receiver.blocking_recv().unwrap_or_else(|_| Err(abandoned()))
    }

    pub async fn wait(self) -> Settlement {
        self.receiver.await.unwrap_or_else(|_| Err(abandoned()))
    }
}

fn abandoned() -> Rejection {
    Rejection {
        code: codes::ERROR_LAUNCH_FAILED.to_owned(),
        message: "verification ended without a result".to_owned(),
    }
}
