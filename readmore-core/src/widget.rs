//! Widget-instance state tying the core components together.
//!
//! [`ReadMore`] owns one widget's configuration, toggle state and truncation
//! cache. The host calls [`ReadMore::layout`] whenever it lays out (first
//! show, width change, config change, toggle) and routes taps through
//! [`ReadMore::tap`].

use std::fmt;

use crate::assembler::{Presentation, PresentationAssembler};
use crate::cache::{CacheKey, TruncationCache};
use crate::config::WidgetConfig;
use crate::layout::{LayoutConstraints, LayoutOracle};
use crate::span::{Span, TapAction};
use crate::style::{Color, TextStyle, resolve_style};
use crate::toggle::{ToggleController, ToggleObserver};
use crate::truncation::TruncationEngine;

/// Host context for one layout pass, passed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEnv {
    /// Available width in oracle units.
    pub max_width: f32,
    /// Style inherited from the surrounding view when the config sets none.
    pub ambient_style: TextStyle,
    /// Theme accent used to tint links when no link style is configured.
    pub accent: Color,
}

impl LayoutEnv {
    pub fn new(max_width: f32) -> Self {
        Self {
            max_width,
            ambient_style: TextStyle::default(),
            accent: Color::Blue,
        }
    }
}

/// A presentation together with the resolved styles it should be drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledPresentation {
    pub presentation: Presentation,
    pub text_style: TextStyle,
    pub link_style: TextStyle,
}

/// Callback receiving the text of a tapped token.
pub type TokenCallback = Box<dyn FnMut(&str)>;

/// Optional handlers for token taps.
#[derive(Default)]
pub struct Callbacks {
    pub on_url_tap: Option<TokenCallback>,
    pub on_hashtag_tap: Option<TokenCallback>,
    pub on_mention_tap: Option<TokenCallback>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_url_tap", &self.on_url_tap.is_some())
            .field("on_hashtag_tap", &self.on_hashtag_tap.is_some())
            .field("on_mention_tap", &self.on_mention_tap.is_some())
            .finish()
    }
}

/// What a tap did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    Url(String),
    Hashtag(String),
    Mention(String),
    /// The expanded state flipped to the contained value.
    Toggled(bool),
    /// The tap landed on inert text.
    Ignored,
}

/// State of one collapsible text widget.
pub struct ReadMore {
    config: WidgetConfig,
    engine: TruncationEngine,
    toggle: ToggleController,
    cache: TruncationCache,
    callbacks: Callbacks,
    overflowing: bool,
    needs_layout: bool,
}

impl fmt::Debug for ReadMore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadMore")
            .field("config", &self.config)
            .field("toggle", &self.toggle)
            .field("overflowing", &self.overflowing)
            .field("needs_layout", &self.needs_layout)
            .finish()
    }
}

impl ReadMore {
    /// Create a collapsed widget for `config`.
    pub fn new(config: WidgetConfig) -> Self {
        let engine = engine_for(&config);
        Self {
            config,
            engine,
            toggle: ToggleController::new(),
            cache: TruncationCache::new(),
            callbacks: Callbacks::default(),
            overflowing: false,
            needs_layout: true,
        }
    }

    #[must_use]
    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Register the `on_toggle` observer.
    #[must_use]
    pub fn with_toggle_observer(mut self, observer: ToggleObserver) -> Self {
        self.toggle.set_observer(Some(observer));
        self
    }

    /// Start expanded or collapsed.
    #[must_use]
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.toggle = std::mem::take(&mut self.toggle).with_expanded(expanded);
        self
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Replace the configuration. A structurally equal config is a no-op.
    pub fn set_config(&mut self, config: WidgetConfig) {
        if config == self.config {
            return;
        }
        self.engine = engine_for(&config);
        self.config = config;
        self.cache.invalidate();
        self.needs_layout = true;
        tracing::debug!(strategy = ?self.config.strategy, "widget config replaced");
    }

    pub fn is_expanded(&self) -> bool {
        self.toggle.is_expanded()
    }

    /// Whether the last layout found the text overflowing.
    pub fn is_overflowing(&self) -> bool {
        self.overflowing
    }

    /// Whether state changed since the last [`layout`](Self::layout).
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn cache(&self) -> &TruncationCache {
        &self.cache
    }

    /// Compute the presentation for the current state at `env.max_width`.
    pub fn layout(&mut self, oracle: &dyn LayoutOracle, env: &LayoutEnv) -> StyledPresentation {
        let config = &self.config;
        let text_style = resolve_style(config.text_style.as_ref(), &env.ambient_style, None);
        let link_style = resolve_style(config.link_style.as_ref(), &text_style, Some(env.accent));

        let constraints = LayoutConstraints::new(env.max_width, Some(config.max_lines))
            .with_direction(config.direction)
            .with_align(config.text_align);
        let key = CacheKey::new(
            &config.text,
            &text_style,
            env.max_width,
            config.max_lines,
            config.direction,
            &config.see_more_label,
            &config.ellipsis,
            config.strategy,
        );
        let engine = &self.engine;
        let truncation = self.cache.get_or_compute(key, || {
            engine.compute(
                oracle,
                &config.text,
                &text_style,
                &constraints,
                &config.see_more_label,
            )
        });

        let presentation = PresentationAssembler::new(config).assemble(
            &config.text,
            truncation.as_ref(),
            self.toggle.state(),
        );
        self.overflowing = presentation.overflowing;
        self.needs_layout = false;

        StyledPresentation {
            presentation,
            text_style,
            link_style,
        }
    }

    /// Flip the expanded state directly.
    pub fn toggle(&mut self) -> bool {
        self.needs_layout = true;
        self.toggle.toggle()
    }

    /// Route a tap that landed on `hit` (or on no span at all).
    ///
    /// Token spans only invoke their own callback, never the toggle. The
    /// affordance always toggles. Plain text toggles only when
    /// `enable_text_tap_toggle` is set and the text overflows.
    pub fn tap(&mut self, hit: Option<&Span>) -> TapOutcome {
        match hit.and_then(Span::action) {
            Some(TapAction::Url) => {
                let text = hit.map(|s| s.text.clone()).unwrap_or_default();
                invoke(&mut self.callbacks.on_url_tap, &text);
                TapOutcome::Url(text)
            }
            Some(TapAction::Hashtag) => {
                let text = hit.map(|s| s.text.clone()).unwrap_or_default();
                invoke(&mut self.callbacks.on_hashtag_tap, &text);
                TapOutcome::Hashtag(text)
            }
            Some(TapAction::Mention) => {
                let text = hit.map(|s| s.text.clone()).unwrap_or_default();
                invoke(&mut self.callbacks.on_mention_tap, &text);
                TapOutcome::Mention(text)
            }
            Some(TapAction::Toggle) => TapOutcome::Toggled(self.toggle()),
            None if self.config.enable_text_tap_toggle && self.overflowing => {
                TapOutcome::Toggled(self.toggle())
            }
            None => TapOutcome::Ignored,
        }
    }
}

fn engine_for(config: &WidgetConfig) -> TruncationEngine {
    TruncationEngine::new(config.strategy).with_ellipsis(config.ellipsis.clone())
}

fn invoke(callback: &mut Option<TokenCallback>, text: &str) {
    if let Some(cb) = callback.as_mut() {
        cb(text);
    }
}

#[cfg(test)]
mod tests;
