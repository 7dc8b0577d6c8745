//! Integration tests for the shared link extraction functions.

use linkspan::*;

#[test]
fn test_text_without_links() {
    let texts = vec![
        "",
        "just some words here",
        "no links here.",
        "version 1.2 is out",
        "ping 192.168.0.1 now",
        "web+",
        "web+123 not a link",
        "unknown foo://example.com scheme",
        "snake_case.notarealtld",
    ];

    for text in texts {
        assert!(find_links(text).is_empty(), "Unexpected link in: {:?}", text);
        assert!(find_links_with_schema(text).is_empty(), "Unexpected link in: {:?}", text);
    }
}

#[test]
fn test_bare_domain() {
    let text = "example.com";

    assert_eq!(find_links(text), vec![LinkSpan::new(0, 11, "http://example.com")]);
    assert!(find_links_with_schema(text).is_empty());
}

#[test]
fn test_protocol_relative_link() {
    let text = "//example.com";

    assert_eq!(find_links(text), vec![LinkSpan::new(0, 13, "http://example.com")]);
    assert!(find_links_with_schema(text).is_empty());
}

#[test]
fn test_ssh_link_is_unchanged() {
    let text = "ssh://user@host";
    let expected = vec![LinkSpan::new(0, 15, "ssh://user@host")];

    assert_eq!(find_links(text), expected);
    assert_eq!(find_links_with_schema(text), expected);
}

#[test]
fn test_fuzzy_email() {
    let text = "contact me at foo@bar.com";
    let expected = vec![LinkSpan::new(14, 25, "mailto:foo@bar.com")];

    assert_eq!(find_links(text), expected);
    // The mailto rule does not mark the schema as synthesized
    assert_eq!(find_links_with_schema(text), expected);
}

#[test]
fn test_explicit_mailto() {
    let spans = find_links("write to mailto:Foo@Bar.com");
    assert_eq!(spans, vec![LinkSpan::new(9, 27, "mailto:Foo@Bar.com")]);

    let spans = find_links("MAILTO:foo@bar.com");
    assert_eq!(spans[0].link, "MAILTO:foo@bar.com");
}

#[test]
fn test_web_plus_schema() {
    let text = "web+music://track/42";
    let expected = vec![LinkSpan::new(0, 20, "web+music://track/42")];

    assert_eq!(find_links(text), expected);
    assert_eq!(find_links_with_schema(text), expected);

    let matches = link_matcher().match_links(text);
    assert_eq!(matches[0].schema, "web+music:");
}

#[test]
fn test_common_schemes() {
    for scheme in COMMON_SCHEMES {
        let link = format!("{}://example.org/path", scheme);
        let text = format!("open {} please", link);

        let spans = find_links_with_schema(&text);
        assert_eq!(spans.len(), 1, "Scheme not detected: {}", scheme);
        assert_eq!(spans[0].link, link);
        assert_eq!(spans[0].start, 5);
        assert_eq!(&text[spans[0].range()], link);
    }
}

#[test]
fn test_common_schemes_require_slashes() {
    assert!(find_links("ssh:host").is_empty());
    assert!(find_links("file:///etc/hosts").is_empty());
}

#[test]
fn test_links_in_sentence_order() {
    let text = "first example.com then https://rust-lang.org/learn and //docs.rs too";
    let spans = find_links(text);

    let links: Vec<&str> = spans.iter().map(|s| s.link.as_str()).collect();
    assert_eq!(
        links,
        vec!["http://example.com", "https://rust-lang.org/learn", "http://docs.rs"]
    );
    assert_eq!(spans[0].start, 6);
    assert!(spans.windows(2).all(|w| w[0].end <= w[1].start));

    let explicit = find_links_with_schema(text);
    assert_eq!(explicit.len(), 1);
    assert_eq!(explicit[0].link, "https://rust-lang.org/learn");
}

#[test]
fn test_trailing_punctuation_is_excluded() {
    let text = "Visit https://example.com/docs, then reply.";
    let spans = find_links(text);
    assert_eq!(spans, vec![LinkSpan::new(6, 30, "https://example.com/docs")]);

    let spans = find_links("See example.com.");
    assert_eq!(spans, vec![LinkSpan::new(4, 15, "http://example.com")]);

    let spans = find_links("Really? https://example.com/faq?!");
    assert_eq!(spans[0].link, "https://example.com/faq?");
}

#[test]
fn test_balanced_parentheses_in_path() {
    let text = "(see https://en.wikipedia.org/wiki/Rust_(programming_language))";
    let spans = find_links(text);

    assert_eq!(spans.len(), 1);
    assert_eq!(
        spans[0].link,
        "https://en.wikipedia.org/wiki/Rust_(programming_language)"
    );
}

#[test]
fn test_ports_and_queries() {
    let spans = find_links("api at http://localhost:8080/status?verbose=1#top");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].link, "http://localhost:8080/status?verbose=1#top");
}

#[test]
fn test_uppercase_schema_keeps_text() {
    let spans = find_links("HTTPS://EXAMPLE.COM");
    assert_eq!(spans, vec![LinkSpan::new(0, 19, "HTTPS://EXAMPLE.COM")]);
}

#[test]
fn test_onion_domains() {
    let text = "mirror: exampleonionaddr.onion";
    let spans = find_links(text);

    assert_eq!(spans, vec![LinkSpan::new(8, 30, "http://exampleonionaddr.onion")]);
    assert!(find_links_with_schema(text).is_empty());
}

#[test]
fn test_span_bounds() {
    let texts = vec![
        "example.com",
        "//example.com and ssh://user@host",
        "Grüße an info@example.de und https://beispiel.de/straße",
        "<https://example.com/a> (mailto:x@y.org) [web+chat://room/1]",
        "a.com b.org c.net",
    ];

    for text in texts {
        let spans = find_links(text);
        assert!(!spans.is_empty(), "No links found in: {:?}", text);
        for span in spans {
            assert!(span.start < span.end, "Empty span in: {:?}", text);
            assert!(span.end <= text.len(), "Span out of bounds in: {:?}", text);
            assert!(text.get(span.range()).is_some(), "Span not on char boundary in: {:?}", text);
            assert!(span.link.contains(':'), "Link without schema: {}", span.link);
        }
    }
}

#[test]
fn test_unicode_offsets_are_bytes() {
    let text = "Grüße an info@example.de";
    let spans = find_links(text);

    assert_eq!(spans.len(), 1);
    assert_eq!(&text[spans[0].range()], "info@example.de");
    assert_eq!(spans[0].link, "mailto:info@example.de");
}

#[test]
fn test_span_serialization() {
    let spans = find_links("example.com");
    let json = serde_json::to_string(&spans).unwrap();
    assert_eq!(json, r#"[{"start":0,"end":11,"link":"http://example.com"}]"#);

    let parsed: Vec<LinkSpan> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, spans);
}

#[test]
fn test_span_to_url() {
    let spans = find_links("ssh://git@example.org:2222/repo");
    let url = spans[0].to_url().unwrap();

    assert_eq!(url.scheme(), "ssh");
    assert_eq!(url.username(), "git");
    assert_eq!(url.host_str(), Some("example.org"));
    assert_eq!(url.port(), Some(2222));
}

#[test]
fn test_shared_matcher_queries() {
    let matcher = link_matcher();

    assert!(matcher.test("see example.com"));
    assert!(!matcher.test("nothing to see"));
    assert!(matcher.pretest("see example.com"));
    assert!(matcher.match_at_start("gemini://example.org rest").is_some());
    assert!(matcher.match_at_start("see gemini://example.org").is_none());
}

#[test]
fn test_long_inputs_scan_in_linear_time() {
    let started = std::time::Instant::now();

    let noise = vec![
        "+a".repeat(50_000),
        "+a.".repeat(35_000),
        "\"a".repeat(50_000),
        "mailto:a;".repeat(12_000),
    ];
    for text in &noise {
        assert!(find_links(text).is_empty(), "Unexpected link in {} bytes of noise", text.len());
    }

    let text = "a.com ".repeat(17_000);
    let spans = find_links(&text);
    assert_eq!(spans.len(), 17_000);
    assert_eq!(spans[16_999], LinkSpan::new(101_994, 101_999, "http://a.com"));

    let elapsed = started.elapsed();
    assert!(
        elapsed < std::time::Duration::from_secs(20),
        "Scanning long inputs took {:?}",
        elapsed
    );
}

#[test]
fn test_schema_at_out_of_range_positions() {
    let matcher = link_matcher();

    assert_eq!(matcher.test_schema_at("é", "web+", 1), 0);
    assert_eq!(matcher.test_schema_at("ab", "web+", 5), 0);
    assert_eq!(matcher.test_schema_at("ab", "http:", 5), 0);
}
