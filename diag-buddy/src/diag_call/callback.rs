use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use diag_models::PingResult;

/// Receives the outcome of a ping run started through
/// [NetDiagWrapper::ping_host](super::NetDiagWrapper::ping_host).
///
/// Called from the ping worker thread, at most once per run. Runs that fail
/// (unresolvable host, binary missing, ...) never reach the callback.
pub trait NetDiagCallback: Send + Sync {
    fn on_notify_ping_result(&self, result: PingResult) -> Result<()>;
}

/// Forwards ping results into a channel.
///
/// Once the worker thread is done with a run that produced no result, it drops its
/// handle to the callback. If that was the last one, the receiver observes a
/// disconnect instead of waiting out its timeout.
#[derive(Debug)]
pub struct ChannelCallback {
    tx: Sender<PingResult>,
}

impl ChannelCallback {
    pub fn new() -> (Self, Receiver<PingResult>) {
        let (tx, rx) = mpsc::channel();
        (ChannelCallback { tx }, rx)
    }
}

impl NetDiagCallback for ChannelCallback {
    fn on_notify_ping_result(&self, result: PingResult) -> Result<()> {
        self.tx.send(result)
            .with_context(|| "Ping result receiver hung up")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::TryRecvError;

    use assertor::*;

    use super::*;

    #[test]
    fn forwards_result() {
        // given
        let (callback, rx) = ChannelCallback::new();
        let result = PingResult { host: "localhost".to_string(), ..Default::default() };

        // when
        callback.on_notify_ping_result(result.clone()).unwrap();

        // then
        assert_that!(rx.try_recv().unwrap()).is_equal_to(result);
    }

    #[test]
    fn dropped_callback_disconnects() {
        // given
        let (callback, rx) = ChannelCallback::new();

        // when
        drop(callback);

        // then
        assert_that!(rx.try_recv()).is_equal_to(Err(TryRecvError::Disconnected));
    }

    #[test]
    fn send_without_receiver_fails() {
        // given
        let (callback, rx) = ChannelCallback::new();
        drop(rx);

        // when
        let res = callback.on_notify_ping_result(PingResult::default());

        // then
        assert_that!(res).is_err();
    }
}
