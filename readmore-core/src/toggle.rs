//! Expand/collapse state for one widget instance.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Expanded or collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ToggleState {
    pub expanded: bool,
}

/// Easing curve for the expand/collapse transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Curve {
    /// Map linear progress `t` in `[0, 1]` to eased progress.
    ///
    /// Values outside the unit interval are clamped.
    pub fn transform(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Linear => t,
            Curve::EaseIn => t * t * t,
            Curve::EaseOut => 1.0 - (1.0 - t).powi(3),
            Curve::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Duration and easing of the size transition, consumed by the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSpec {
    /// Transition length in milliseconds.
    pub duration_ms: u64,
    pub curve: Curve,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration_ms: 200,
            curve: Curve::default(),
        }
    }
}

impl AnimationSpec {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Eased progress after `elapsed`; 1.0 once the duration has passed.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let t = elapsed.as_secs_f32() / self.duration().as_secs_f32();
        self.curve.transform(t)
    }
}

/// Observer notified with the new `expanded` value after each flip.
pub type ToggleObserver = Box<dyn FnMut(bool)>;

/// Owns the expanded flag and notifies a single observer on change.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use readmore_core::toggle::ToggleController;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// let mut toggle = ToggleController::new()
///     .with_observer(Box::new(move |expanded| sink.borrow_mut().push(expanded)));
///
/// assert!(toggle.toggle());
/// assert!(!toggle.toggle());
/// assert_eq!(*seen.borrow(), vec![true, false]);
/// ```
#[derive(Default)]
pub struct ToggleController {
    state: ToggleState,
    observer: Option<ToggleObserver>,
}

impl fmt::Debug for ToggleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleController")
            .field("state", &self.state)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl ToggleController {
    /// A collapsed controller with no observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in the given state.
    #[must_use]
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.state.expanded = expanded;
        self
    }

    /// Register the observer, replacing any previous one.
    #[must_use]
    pub fn with_observer(mut self, observer: ToggleObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Option<ToggleObserver>) {
        self.observer = observer;
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state.expanded
    }

    /// Flip the state, notify the observer, and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.state.expanded = !self.state.expanded;
        tracing::debug!(expanded = self.state.expanded, "toggled");
        if let Some(observer) = self.observer.as_mut() {
            observer(self.state.expanded);
        }
        self.state.expanded
    }
}
