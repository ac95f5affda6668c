//! Readmore core library.
//!
//! Collapsible "see more / see less" text: token scanning, layout-driven
//! truncation behind a host-supplied [`LayoutOracle`], presentation assembly
//! and toggle state. Rendering is left to the host.

pub mod assembler;
pub mod cache;
pub mod config;
pub mod html;
pub mod layout;
pub mod scanner;
pub mod span;
pub mod style;
pub mod text;
pub mod toggle;
pub mod truncation;
pub mod widget;

pub use assembler::{LinePolicy, Presentation, PresentationAssembler};
pub use config::{Config, ConfigError, WidgetConfig};
pub use layout::{LayoutConstraints, LayoutOracle, Measurement, MockOracle, Point, TextDirection};
pub use span::{Span, SpanKind, TapAction};
pub use style::{Color, TextStyle};
pub use toggle::{AnimationSpec, ToggleController, ToggleState};
pub use truncation::{TruncationEngine, TruncationResult, TruncationStrategy};
pub use widget::{Callbacks, LayoutEnv, ReadMore, StyledPresentation, TapOutcome};
