//! Button gesture classification with hold suppression.
//!
//! ## Signal flow
//!
//! The button capability reports raw edge signals: `Pressed`, `Released`,
//! and `Held` (fired once, a configurable hold time after the press, while
//! the button is still down).  The detector turns them into gestures:
//!
//! | Signal    | Gesture   | Notes                              |
//! |-----------|-----------|------------------------------------|
//! | Pressed   | `Press`   | clears the suppression flag        |
//! | Held      | `Held`    | sets the suppression flag          |
//! | Released  | `Release` | swallowed once after a `Held`      |
//!
//! The release that terminates a hold is never delivered as a gesture —
//! the hold already consumed that interaction.
//!
//! For hardware that only reports down/up edges, [`HoldTimer`] synthesizes
//! the `Held` signal from a monotonic millisecond clock.

/// Raw edge signal from the button capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonSignal {
    Pressed,
    Released,
    /// Fired once per press, after the hold threshold elapses.
    Held,
}

/// Classified gesture delivered to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    Press,
    Release,
    Held,
}

/// Classifies raw button signals into gestures.
///
/// At most one outstanding gesture per signal; no buffering.  A missed
/// hardware callback is a silent loss, accepted from the capability.
#[derive(Debug, Default)]
pub struct GestureDetector {
    /// True from the moment `Held` fires until the next `Released` is
    /// consumed.  Exactly one release is discarded per hold.
    holding: bool,
}

impl GestureDetector {
    pub fn new() -> Self {
        Self { holding: false }
    }

    /// Feed one raw signal; returns the classified gesture, if any.
    pub fn on_signal(&mut self, signal: ButtonSignal) -> Option<GestureEvent> {
        match signal {
            ButtonSignal::Pressed => {
                self.holding = false;
                Some(GestureEvent::Press)
            }
            ButtonSignal::Held => {
                self.holding = true;
                Some(GestureEvent::Held)
            }
            ButtonSignal::Released => {
                if self.holding {
                    self.holding = false;
                    None
                } else {
                    Some(GestureEvent::Release)
                }
            }
        }
    }

    /// Whether the next release will be suppressed.
    pub fn is_holding(&self) -> bool {
        self.holding
    }
}

/// Synthesizes the `Held` signal for edge-only button hardware.
///
/// Call [`on_down`](Self::on_down) / [`on_up`](Self::on_up) on raw edges
/// and [`poll`](Self::poll) from the main loop; `poll` returns `true`
/// exactly once per press when the hold threshold has elapsed.
#[derive(Debug)]
pub struct HoldTimer {
    hold_ms: u32,
    pressed_at: Option<u32>,
    fired: bool,
}

impl HoldTimer {
    pub fn new(hold_ms: u32) -> Self {
        Self {
            hold_ms,
            pressed_at: None,
            fired: false,
        }
    }

    /// Record a down edge at `now_ms` (monotonic, wrapping).
    pub fn on_down(&mut self, now_ms: u32) {
        self.pressed_at = Some(now_ms);
        self.fired = false;
    }

    /// Record an up edge; disarms the timer.
    pub fn on_up(&mut self) {
        self.pressed_at = None;
        self.fired = false;
    }

    /// Check whether the hold threshold elapsed.  Fires at most once
    /// per press.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        let Some(t0) = self.pressed_at else {
            return false;
        };
        if !self.fired && now_ms.wrapping_sub(t0) >= self.hold_ms {
            self.fired = true;
            return true;
        }
        false
    }
}
