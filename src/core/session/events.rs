//! Session lifecycle notifications.
//!
//! The coordinator never touches the router; it emits events and the host
//! application decides the navigation or toast that follows. Listeners are
//! plain callbacks, which is all a single-threaded event loop needs.

use std::cell::RefCell;
use std::rc::Rc;

/// Events emitted by the `SessionCoordinator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A sign-in or verification completed; navigate to the protected area.
    SignedIn,
    /// The user signed out of this device.
    SignedOut,
    /// Recovery failed; session state was cleared, route to sign-in.
    SessionExpired,
    /// Registration accepted; a verification code was sent by email.
    VerificationPending,
}

type Listener = Box<dyn Fn(SessionEvent)>;

/// Subscription list shared between the coordinator and the UI.
#[derive(Clone, Default)]
pub struct SessionEvents {
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for every future event.
    ///
    /// Callbacks must not subscribe from inside the callback.
    pub fn subscribe(&self, listener: impl Fn(SessionEvent) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        for listener in self.listeners.borrow().iter() {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_listeners_receive_events() {
        let events = SessionEvents::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for _ in 0..2 {
            let seen = seen.clone();
            events.subscribe(move |event| seen.borrow_mut().push(event));
        }

        events.emit(SessionEvent::SignedIn);
        events.emit(SessionEvent::SessionExpired);

        assert_eq!(
            *seen.borrow(),
            vec![
                SessionEvent::SignedIn,
                SessionEvent::SignedIn,
                SessionEvent::SessionExpired,
                SessionEvent::SessionExpired,
            ]
        );
    }

    #[test]
    fn test_clones_share_listeners() {
        let events = SessionEvents::new();
        let other = events.clone();
        let seen = Rc::new(RefCell::new(0));

        let counter = seen.clone();
        events.subscribe(move |_| *counter.borrow_mut() += 1);

        other.emit(SessionEvent::SignedOut);
        assert_eq!(*seen.borrow(), 1);
    }
}
