use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::layout::MockOracle;
use crate::span::SpanKind;

fn widget(text: &str, max_lines: usize) -> ReadMore {
    ReadMore::new(WidgetConfig {
        max_lines,
        see_more_label: "More".to_string(),
        ..WidgetConfig::with_text(text)
    })
}

#[test]
fn test_layout_short_text_not_overflowing() {
    let oracle = MockOracle::new();
    let mut w = widget("short", 1);
    assert!(w.needs_layout());
    let styled = w.layout(&oracle, &LayoutEnv::new(20.0));
    assert_eq!(styled.presentation.display_text(), "short");
    assert!(!w.is_overflowing());
    assert!(!w.needs_layout());
}

#[test]
fn test_layout_collapsed_then_expanded() {
    let oracle = MockOracle::new();
    let mut w = widget("AAAAAAAAAA", 1);
    let env = LayoutEnv::new(8.0);

    let collapsed = w.layout(&oracle, &env).presentation;
    assert_eq!(collapsed.display_text(), "AAA…More");
    assert_eq!(collapsed.line_cap, Some(1));
    assert!(w.is_overflowing());

    assert!(w.toggle());
    assert!(w.needs_layout());
    let expanded = w.layout(&oracle, &env).presentation;
    assert_eq!(expanded.display_text(), "AAAAAAAAAA  See less");
    assert_eq!(expanded.line_cap, None);
}

#[test]
fn test_layout_reuses_cached_truncation() {
    let oracle = MockOracle::new();
    let mut w = widget("AAAAAAAAAA", 1);
    let env = LayoutEnv::new(8.0);
    w.layout(&oracle, &env);
    let calls = oracle.calls();

    w.toggle();
    w.layout(&oracle, &env);
    w.toggle();
    w.layout(&oracle, &env);
    assert_eq!(oracle.calls(), calls);
    assert_eq!(w.cache().hits(), 2);

    w.layout(&oracle, &LayoutEnv::new(5.0));
    assert!(oracle.calls() > calls);
    assert_eq!(w.cache().misses(), 2);
}

#[test]
fn test_set_config_equal_is_noop() {
    let oracle = MockOracle::new();
    let mut w = widget("AAAAAAAAAA", 1);
    w.layout(&oracle, &LayoutEnv::new(8.0));
    w.set_config(w.config().clone());
    assert!(!w.needs_layout());
}

#[test]
fn test_set_config_change_recomputes() {
    let oracle = MockOracle::new();
    let mut w = widget("AAAAAAAAAA", 1);
    let env = LayoutEnv::new(8.0);
    w.layout(&oracle, &env);

    let config = WidgetConfig {
        ellipsis: "...".to_string(),
        ..w.config().clone()
    };
    w.set_config(config);
    assert!(w.needs_layout());
    let p = w.layout(&oracle, &env).presentation;
    assert_eq!(p.display_text(), "A...More");
}

#[test]
fn test_resolved_styles() {
    let oracle = MockOracle::new();
    let mut w = widget("text", 1);
    let env = LayoutEnv {
        ambient_style: TextStyle {
            italic: true,
            ..TextStyle::default()
        },
        accent: Color::Magenta,
        ..LayoutEnv::new(20.0)
    };
    let styled = w.layout(&oracle, &env);
    assert!(styled.text_style.italic);
    assert_eq!(styled.link_style.color, Some(Color::Magenta));
    assert!(styled.link_style.italic);
}

#[test]
fn test_tap_url_invokes_only_url_callback() {
    let urls = Rc::new(RefCell::new(Vec::new()));
    let toggles = Rc::new(RefCell::new(Vec::new()));
    let (u, t) = (Rc::clone(&urls), Rc::clone(&toggles));
    let mut w = widget("Visit https://x.io now", 1)
        .with_callbacks(Callbacks {
            on_url_tap: Some(Box::new(move |url: &str| u.borrow_mut().push(url.to_string()))),
            ..Callbacks::default()
        })
        .with_toggle_observer(Box::new(move |expanded| t.borrow_mut().push(expanded)));

    let oracle = MockOracle::new();
    let p = w.layout(&oracle, &LayoutEnv::new(8.0)).presentation;
    assert!(w.is_overflowing());

    let url = Span::new("https://x.io", SpanKind::Url, 0..12);
    assert_eq!(w.tap(Some(&url)), TapOutcome::Url("https://x.io".to_string()));
    assert_eq!(*urls.borrow(), vec!["https://x.io".to_string()]);
    assert!(toggles.borrow().is_empty());
    assert!(!w.is_expanded());

    let label = p.spans.last().unwrap();
    assert_eq!(label.kind, SpanKind::ToggleLabel);
    assert_eq!(w.tap(Some(label)), TapOutcome::Toggled(true));
    assert_eq!(*toggles.borrow(), vec![true]);
}

#[test]
fn test_tap_hashtag_and_mention_without_callbacks() {
    let mut w = widget("#tag @me", 3);
    let hashtag = Span::new("#tag", SpanKind::Hashtag, 0..4);
    let mention = Span::new("@me", SpanKind::Mention, 0..3);
    assert_eq!(w.tap(Some(&hashtag)), TapOutcome::Hashtag("#tag".to_string()));
    assert_eq!(w.tap(Some(&mention)), TapOutcome::Mention("@me".to_string()));
    assert!(!w.is_expanded());
}

#[test]
fn test_tap_plain_toggles_only_when_overflowing() {
    let oracle = MockOracle::new();
    let plain = Span::new("x", SpanKind::Plain, 0..1);

    let mut fits = widget("short", 1);
    fits.layout(&oracle, &LayoutEnv::new(20.0));
    assert_eq!(fits.tap(Some(&plain)), TapOutcome::Ignored);
    assert_eq!(fits.tap(None), TapOutcome::Ignored);

    let mut long = widget("AAAAAAAAAA", 1);
    long.layout(&oracle, &LayoutEnv::new(8.0));
    assert_eq!(long.tap(Some(&plain)), TapOutcome::Toggled(true));
    assert_eq!(long.tap(None), TapOutcome::Toggled(false));
}

#[test]
fn test_tap_plain_respects_disabled_text_toggle() {
    let oracle = MockOracle::new();
    let mut w = ReadMore::new(WidgetConfig {
        max_lines: 1,
        enable_text_tap_toggle: false,
        ..WidgetConfig::with_text("AAAAAAAAAA")
    });
    let p = w.layout(&oracle, &LayoutEnv::new(8.0)).presentation;
    let plain = p.spans.first().unwrap();
    assert_eq!(w.tap(Some(plain)), TapOutcome::Ignored);
    assert_eq!(w.tap(p.spans.last()), TapOutcome::Toggled(true));
}

#[test]
fn test_with_expanded_starts_expanded() {
    let oracle = MockOracle::new();
    let mut w = widget("AAAAAAAAAA", 1).with_expanded(true);
    assert!(w.is_expanded());
    let p = w.layout(&oracle, &LayoutEnv::new(8.0)).presentation;
    assert!(p.expanded);
    assert!(p.display_text().ends_with("See less"));
}
