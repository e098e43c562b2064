//! Read a single tag and hand back its messages
//!
//! A session is created that invalidates itself after the first read. The first of
//! "messages received" or "error occurred" settles the read, later events are ignored.
//! Whichever settles it removes both listeners and releases the session.

use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Weak},
    task::{Context, Poll},
};

use ndef_record::NdefMessage;
use parking_lot::Mutex;
use tap::TapFallible as _;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::{
    error::ReadError,
    event::{EventType, Listener, SessionEvent, listener},
    router::EventRouter,
    session::{NdefReaderSession, SessionId, SessionOptions},
};

type ReadResult = Result<Vec<NdefMessage>, ReadError>;

impl NdefReaderSession {
    /// Begin a one shot read, the returned future resolves once with the first outcome
    ///
    /// Dropping the future before it resolves cancels the read
    pub fn read_tag(router: &EventRouter, alert_message: Option<String>) -> ReadTag {
        let options = SessionOptions { alert_message, invalidate_after_first_read: true };
        let session = NdefReaderSession::new(router, options);

        let (sender, receiver) = oneshot::channel();
        let shared = Arc::new(ReadTagShared {
            session: session.clone(),
            sender: Mutex::new(Some(sender)),
            listeners: Mutex::new(None),
        });

        let on_messages = {
            let shared = Arc::downgrade(&shared);
            listener(move |event| {
                if let SessionEvent::MessagesReceived(messages) = event {
                    settle(&shared, Ok(messages.clone()));
                }
            })
        };

        let on_error = {
            let shared = Arc::downgrade(&shared);
            listener(move |event| {
                if let SessionEvent::ErrorOccurred(error) = event {
                    settle(&shared, Err(error.clone()));
                }
            })
        };

        *shared.listeners.lock() = Some((on_messages.clone(), on_error.clone()));
        session.add_event_listener(EventType::MessagesReceived, on_messages);
        session.add_event_listener(EventType::ErrorOccurred, on_error);

        if let Err(error) = session.begin() {
            shared.settle(Err(error.into()));
        }

        ReadTag { shared, receiver }
    }
}

/// Future returned by [`NdefReaderSession::read_tag`]
#[derive(Debug)]
pub struct ReadTag {
    shared: Arc<ReadTagShared>,
    receiver: oneshot::Receiver<ReadResult>,
}

impl ReadTag {
    pub fn session_id(&self) -> SessionId {
        self.shared.session.id()
    }
}

impl Future for ReadTag {
    type Output = ReadResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(ReadError::Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for ReadTag {
    fn drop(&mut self) {
        self.shared.cancel();
    }
}

struct ReadTagShared {
    session: NdefReaderSession,

    /// Taken by whoever settles the read first
    sender: Mutex<Option<oneshot::Sender<ReadResult>>>,
    listeners: Mutex<Option<(Listener, Listener)>>,
}

impl std::fmt::Debug for ReadTagShared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadTagShared")
            .field("session", &self.session.id())
            .field("settled", &self.sender.lock().is_none())
            .finish()
    }
}

fn settle(shared: &Weak<ReadTagShared>, result: ReadResult) {
    let Some(shared) = shared.upgrade() else {
        return;
    };

    shared.settle(result);
}

impl ReadTagShared {
    /// Returns false if the read was already settled
    fn settle(&self, result: ReadResult) -> bool {
        let Some(sender) = self.sender.lock().take() else {
            debug!("read on session {} already settled, ignoring", self.session.id());
            return false;
        };

        // the caller may have stopped waiting, cleanup still happens
        if sender.send(result).is_err() {
            debug!("read on session {} settled after the receiver was dropped", self.session.id());
        }

        self.cleanup();
        true
    }

    fn cancel(&self) {
        if self.sender.lock().take().is_none() {
            return;
        }

        debug!("read on session {} cancelled", self.session.id());
        if self.session.exists() {
            let _ = self.session.invalidate().tap_err(|error| {
                warn!("unable to invalidate cancelled read: {error}");
            });
        }

        self.cleanup();
    }

    fn cleanup(&self) {
        if let Some((on_messages, on_error)) = self.listeners.lock().take() {
            let _ = self
                .session
                .remove_event_listener(EventType::MessagesReceived, &on_messages)
                .tap_err(|error| warn!("unable to remove messages listener: {error}"));

            let _ = self
                .session
                .remove_event_listener(EventType::ErrorOccurred, &on_error)
                .tap_err(|error| warn!("unable to remove error listener: {error}"));
        }

        // teardown may have released the session already
        if self.session.exists() {
            self.session.release();
        }
    }
}
