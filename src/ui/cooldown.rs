//! Resend-code cooldown ticker.
//!
//! The verification flow throttles "resend code" clicks in the UI, not in
//! the session core. A component hands a signal to `start_cooldown` and
//! disables its button while the countdown is nonzero; dropping the
//! returned handle cancels the ticker.

use leptos::prelude::*;

/// Default resend cooldown, in seconds.
pub const DEFAULT_COOLDOWN_SECS: u32 = 60;

/// Keeps the ticker alive; dropping it stops the countdown.
pub struct CooldownHandle {
    #[cfg(not(feature = "ssr"))]
    _interval: gloo_timers::callback::Interval,
}

impl CooldownHandle {
    /// Stop the countdown early.
    pub fn cancel(self) {}
}

/// Start a one-second countdown ticker on the given signal.
#[cfg(not(feature = "ssr"))]
pub fn start_cooldown(remaining: RwSignal<u32>, duration_secs: u32) -> CooldownHandle {
    remaining.set(duration_secs);

    let interval = gloo_timers::callback::Interval::new(1_000, move || {
        let current = remaining.get_untracked();
        if current <= 1 {
            remaining.set(0);
        } else {
            remaining.set(current - 1);
        }
    });

    CooldownHandle {
        _interval: interval,
    }
}

/// Server-side stub: seeds the signal, never ticks.
#[cfg(feature = "ssr")]
pub fn start_cooldown(remaining: RwSignal<u32>, duration_secs: u32) -> CooldownHandle {
    remaining.set(duration_secs);
    CooldownHandle {}
}
