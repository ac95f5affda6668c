//! Token scanner for URLs, hashtags and mentions.
//!
//! [`scan`] splits text into an ordered sequence of [`Span`]s that partition
//! the input exactly: plain runs interleaved with classified tokens.

use std::sync::LazyLock;

use regex::Regex;

use crate::span::{Span, SpanKind};

/// `http(s)://` followed by URL-safe ASCII characters.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=%]+").expect("valid URL regex")
});

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("valid hashtag regex"));

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("valid mention regex"));

/// A raw pattern match before gap filling.
#[derive(Debug, Clone, Copy)]
struct TokenMatch {
    start: usize,
    end: usize,
    kind: SpanKind,
}

fn collect_matches(text: &str) -> Vec<TokenMatch> {
    let patterns: [(&Regex, SpanKind); 3] = [
        (&*URL_RE, SpanKind::Url),
        (&*HASHTAG_RE, SpanKind::Hashtag),
        (&*MENTION_RE, SpanKind::Mention),
    ];

    let mut matches: Vec<TokenMatch> = patterns
        .iter()
        .flat_map(|(re, kind)| {
            re.find_iter(text).map(move |m| TokenMatch {
                start: m.start(),
                end: m.end(),
                kind: *kind,
            })
        })
        .collect();
    // Leading characters differ per pattern, so starts never tie.
    matches.sort_by_key(|m| m.start);
    matches
}

/// Scan `text` into plain and token spans.
///
/// The returned spans are ordered, never overlap, leave no gaps, and their
/// text concatenates back to `text`. Text without tokens (including the empty
/// string) yields a single plain span.
///
/// A candidate that starts inside an earlier token, such as the `#frag` of
/// `https://a.b/#frag`, belongs to that token and is not emitted separately.
///
/// # Examples
///
/// ```
/// use readmore_core::scanner::scan;
/// use readmore_core::span::SpanKind;
///
/// let spans = scan("hi @ana");
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[1].kind, SpanKind::Mention);
/// assert_eq!(spans[1].text, "@ana");
/// ```
pub fn scan(text: &str) -> Vec<Span> {
    let matches = collect_matches(text);
    if matches.is_empty() {
        return vec![Span::new(text, SpanKind::Plain, 0..text.len())];
    }

    let mut spans = Vec::with_capacity(matches.len() * 2 + 1);
    let mut cursor = 0;
    for m in matches {
        if m.start < cursor {
            continue;
        }
        if m.start > cursor {
            spans.push(Span::new(text, SpanKind::Plain, cursor..m.start));
        }
        spans.push(Span::new(text, m.kind, m.start..m.end));
        cursor = m.end;
    }
    if cursor < text.len() {
        spans.push(Span::new(text, SpanKind::Plain, cursor..text.len()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::join_spans;

    fn kinds(spans: &[Span]) -> Vec<SpanKind> {
        spans.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_scan_mixed_tokens() {
        let text = "Check https://ex.am/p #tag @user";
        let spans = scan(text);
        assert_eq!(
            kinds(&spans),
            vec![
                SpanKind::Plain,
                SpanKind::Url,
                SpanKind::Plain,
                SpanKind::Hashtag,
                SpanKind::Plain,
                SpanKind::Mention,
            ]
        );
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Check ", "https://ex.am/p", " ", "#tag", " ", "@user"]
        );
        assert_eq!(join_spans(&spans), text);
    }

    #[test]
    fn test_scan_plain_only() {
        let spans = scan("nothing to see here");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, SpanKind::Plain);
        assert_eq!(spans[0].range, 0..19);
    }

    #[test]
    fn test_scan_empty_text_yields_empty_plain_span() {
        let spans = scan("");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, SpanKind::Plain);
        assert_eq!(spans[0].text, "");
        assert_eq!(spans[0].range, 0..0);
    }

    #[test]
    fn test_scan_token_at_start_and_end() {
        let spans = scan("#start middle @end");
        assert_eq!(
            kinds(&spans),
            vec![SpanKind::Hashtag, SpanKind::Plain, SpanKind::Mention]
        );
    }

    #[test]
    fn test_scan_abutting_tokens_are_not_merged() {
        let spans = scan("#a@b");
        assert_eq!(kinds(&spans), vec![SpanKind::Hashtag, SpanKind::Mention]);
        assert_eq!(spans[0].range, 0..2);
        assert_eq!(spans[1].range, 2..4);
    }

    #[test]
    fn test_scan_fragment_inside_url_stays_in_url() {
        let text = "see https://a.io/x#frag now";
        let spans = scan(text);
        assert_eq!(
            kinds(&spans),
            vec![SpanKind::Plain, SpanKind::Url, SpanKind::Plain]
        );
        assert_eq!(spans[1].text, "https://a.io/x#frag");
        assert_eq!(join_spans(&spans), text);
    }

    #[test]
    fn test_scan_url_stops_at_whitespace_and_quotes() {
        let spans = scan("<a href=\"http://x.y/z\">");
        let url = spans.iter().find(|s| s.kind == SpanKind::Url).unwrap();
        assert_eq!(url.text, "http://x.y/z");
    }

    #[test]
    fn test_scan_unicode_word_characters() {
        let text = "привет #тег и @имя!";
        let spans = scan(text);
        assert_eq!(spans[1].text, "#тег");
        assert_eq!(spans[3].text, "@имя");
        assert_eq!(join_spans(&spans), text);
    }

    #[test]
    fn test_scan_bare_symbols_are_plain() {
        let spans = scan("# @ http:// 100%");
        assert_eq!(kinds(&spans), vec![SpanKind::Plain]);
    }

    #[test]
    fn test_scan_partitions_input() {
        let samples = [
            "a",
            "@",
            "mail me at a@b.com #now",
            "https://x.org https://y.org",
            "🦀 #rust 🦀",
            "line one\n#two\n@three",
        ];
        for text in samples {
            let spans = scan(text);
            assert_eq!(join_spans(&spans), text, "input: {text:?}");
            let mut expected_start = 0;
            for span in &spans {
                assert_eq!(span.range.start, expected_start, "gap in {text:?}");
                expected_start = span.range.end;
            }
            assert_eq!(expected_start, text.len());
        }
    }
}
