//! Character classes and link-body scanners.
//!
//! All positions are byte offsets into the scanned text and always sit on
//! `char` boundaries. Scanners return the offset where the recognised piece
//! ends, or `None` when nothing matches at the given position.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::LinkifyOptions;
use crate::url::psl::TldList;

static UNICODE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{P}$").expect("punctuation class is a valid regex"));

const FULLWIDTH_VERTICAL_LINE: char = '\u{ff5c}';

const MAX_LABEL_CHARS: usize = 63;

const MAX_HOST_BYTES: usize = 253;

const MAX_EMAIL_NAME_CHARS: usize = 64;

/// Whitespace or control character.
pub(crate) fn is_space_or_control(c: char) -> bool {
    c.is_whitespace() || c.is_control()
}

/// Unicode punctuation (general category `P`).
///
/// Note that ASCII symbols such as `$`, `+`, `=`, `|` and `~` are not
/// punctuation.
pub(crate) fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return matches!(
            c,
            '!' | '"' | '#' | '%' | '&' | '\'' | '(' | ')' | '*' | ',' | '-' | '.' | '/' | ':'
                | ';' | '?' | '@' | '[' | '\\' | ']' | '_' | '{' | '}'
        );
    }
    let mut buf = [0u8; 4];
    UNICODE_PUNCTUATION.is_match(c.encode_utf8(&mut buf))
}

/// Whitespace, punctuation or control character.
pub(crate) fn is_delimiter(c: char) -> bool {
    is_space_or_control(c) || is_punctuation(c)
}

/// Characters that separate links from surrounding markup.
pub(crate) fn is_text_separator(c: char) -> bool {
    matches!(c, '<' | '>' | FULLWIDTH_VERTICAL_LINE)
}

/// Anything that may appear inside a host label.
pub(crate) fn is_pseudo_letter(c: char) -> bool {
    !is_text_separator(c) && !is_delimiter(c)
}

/// Characters that may precede a fuzzy link but never start one.
fn is_fuzzy_link_separator(c: char) -> bool {
    matches!(c, '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | FULLWIDTH_VERTICAL_LINE)
}

fn is_email_name_start(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '-' | ';' | ':' | '&' | '=' | '+' | '$' | ',' | '.' | '_')
}

fn is_email_name_char(c: char) -> bool {
    is_email_name_start(c) || c == '"'
}

/// Whether a link without a schema may start at `c` when preceded by `prev`.
pub(crate) fn is_fuzzy_link_start(prev: Option<char>, c: char) -> bool {
    let boundary = match prev {
        None => true,
        Some(p) => {
            !matches!(p, '.' | ':' | '/' | '-' | '_' | '@')
                && (is_fuzzy_link_separator(p) || is_delimiter(p))
        }
    };
    boundary && !is_fuzzy_link_separator(c)
}

/// Whether an e-mail address without `mailto:` may start after `prev`.
pub(crate) fn is_fuzzy_email_start(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(p) => is_text_separator(p) || matches!(p, '"' | '(') || is_space_or_control(p),
    }
}

/// Character at `pos`, if any.
pub(crate) fn char_at(text: &str, pos: usize) -> Option<char> {
    text.get(pos..)?.chars().next()
}

/// Character ending at `pos`, if any.
pub(crate) fn char_before(text: &str, pos: usize) -> Option<char> {
    text.get(..pos)?.chars().next_back()
}

/// ASCII case-insensitive prefix test.
pub(crate) fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.as_bytes()
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
        .unwrap_or(false)
}

/// Which hosts a scanner accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostRule {
    /// Any sequence of labels, including a single label (`http://intranet`)
    Any,
    /// `localhost` or at least two labels with a hyphen-free last label
    Rooted,
    /// At least two labels ending in a known top-level domain, or an IPv4
    /// address when `allow_ip` is set
    Fuzzy { allow_ip: bool },
}

/// Link grammar bound to a TLD list and matcher options.
#[derive(Debug, Clone)]
pub(crate) struct Grammar {
    tlds: TldList,
    options: LinkifyOptions,
}

impl Grammar {
    pub(crate) fn new(tlds: TldList, options: LinkifyOptions) -> Self {
        Self { tlds, options }
    }

    pub(crate) fn tlds(&self) -> &TldList {
        &self.tlds
    }

    pub(crate) fn options(&self) -> LinkifyOptions {
        self.options
    }

    /// Length of an http-style body (`//`, optional `user@`, host, port, path)
    /// starting at `pos`, or 0.
    pub(crate) fn http_body(&self, text: &str, pos: usize) -> usize {
        if !text.get(pos..).is_some_and(|tail| tail.starts_with("//")) {
            return 0;
        }
        let start = pos + 2;
        self.authority_end(text, start, HostRule::Any)
            .map(|end| self.path_end(text, end) - pos)
            .unwrap_or(0)
    }

    /// Length of a protocol-relative body starting right after `//`, or 0.
    ///
    /// `://` and `///` are rejected, which protects against unknown or
    /// misspelled schemas.
    pub(crate) fn protocol_relative_body(&self, text: &str, pos: usize) -> usize {
        let Some(end) = self.authority_end(text, pos, HostRule::Rooted) else {
            return 0;
        };
        let before_slashes = pos.checked_sub(2).and_then(|slashes| char_before(text, slashes));
        if matches!(before_slashes, Some(':') | Some('/')) {
            return 0;
        }
        self.path_end(text, end) - pos
    }

    /// Length of an e-mail address (`name@host`) starting at `pos`, or 0.
    pub(crate) fn mailto_body(&self, text: &str, pos: usize) -> usize {
        self.email_end(text, pos, HostRule::Any)
            .map(|end| end - pos)
            .unwrap_or(0)
    }

    /// End of a link without a schema starting at `pos`.
    pub(crate) fn fuzzy_link_at(&self, text: &str, pos: usize) -> Option<usize> {
        let rule = HostRule::Fuzzy {
            allow_ip: self.options.fuzzy_ip,
        };
        self.host_port_end(text, pos, rule, true)
            .map(|end| self.path_end(text, end))
    }

    /// End of an e-mail address without `mailto:` starting at `pos`.
    pub(crate) fn fuzzy_email_at(&self, text: &str, pos: usize) -> Option<usize> {
        self.email_end(text, pos, HostRule::Fuzzy { allow_ip: true })
    }

    /// Optional `user@` followed by a strictly terminated host and port.
    /// The variant with credentials is preferred.
    fn authority_end(&self, text: &str, pos: usize, rule: HostRule) -> Option<usize> {
        if let Some(host_start) = credentials_end(text, pos) {
            if let Some(end) = self.host_port_end(text, host_start, rule, true) {
                return Some(end);
            }
        }
        self.host_port_end(text, pos, rule, true)
    }

    /// `name@host` with a name of at most 64 characters.
    fn email_end(&self, text: &str, pos: usize, rule: HostRule) -> Option<usize> {
        let tail = text.get(pos..)?;
        if !tail.chars().next().is_some_and(is_email_name_start) {
            return None;
        }
        let mut name_end = text.len();
        for (count, (offset, c)) in tail.char_indices().enumerate() {
            if count > 0 && !is_email_name_char(c) {
                name_end = pos + offset;
                break;
            }
            if count == MAX_EMAIL_NAME_CHARS {
                return None;
            }
        }
        if char_at(text, name_end) != Some('@') {
            return None;
        }
        self.host_port_end(text, name_end + 1, rule, false)
    }

    /// Host, optional port, then the host terminator check.
    fn host_port_end(
        &self,
        text: &str,
        pos: usize,
        rule: HostRule,
        with_port: bool,
    ) -> Option<usize> {
        let mut end = self.host_end(text, pos, rule)?;
        if with_port {
            end = port_end(text, end);
        }
        self.is_host_terminated(text, end).then_some(end)
    }

    fn host_end(&self, text: &str, pos: usize, rule: HostRule) -> Option<usize> {
        let labels = scan_labels(text, pos)?;
        let (last_start, end) = *labels.last()?;
        let last = &text[last_start..end];
        let accepted = match rule {
            HostRule::Any => true,
            HostRule::Rooted => {
                (labels.len() == 1 && last.eq_ignore_ascii_case("localhost"))
                    || (labels.len() >= 2 && is_root_label(last))
            }
            HostRule::Fuzzy { allow_ip } => {
                (allow_ip && is_ipv4(text, &labels))
                    || (labels.len() >= 2 && self.tlds.contains(last))
            }
        };
        accepted.then_some(end)
    }

    /// A host must be followed by the end of text, a separator, whitespace
    /// or punctuation, but not by `-`, `_`, `:<digit>`, `.-` or a dot that
    /// continues into more text.
    fn is_host_terminated(&self, text: &str, pos: usize) -> bool {
        let Some(c) = char_at(text, pos) else {
            return true;
        };
        if !is_text_separator(c) && !is_delimiter(c) {
            return false;
        }
        let next = char_at(text, pos + c.len_utf8());
        match c {
            '-' => self.options.triple_dash && text[pos + 1..].starts_with("--"),
            '_' => false,
            ':' => !next.is_some_and(|n| n.is_ascii_digit()),
            '.' => match next {
                None => true,
                Some('-') => false,
                Some(n) => is_delimiter(n),
            },
            _ => true,
        }
    }

    /// End of the optional path, query and fragment starting at `pos`.
    ///
    /// Trailing punctuation is left out, and brackets or quotes are only
    /// taken when they are balanced.
    pub(crate) fn path_end(&self, text: &str, pos: usize) -> usize {
        let Some(lead) = char_at(text, pos) else {
            return pos;
        };
        if !matches!(lead, '/' | '?' | '#') {
            return pos;
        }
        let start = pos + 1;
        let mut end = start;
        while let Some(next) = self.path_token_end(text, end) {
            end = next;
        }
        if end > start {
            end
        } else if lead == '/' {
            start
        } else {
            pos
        }
    }

    fn path_token_end(&self, text: &str, pos: usize) -> Option<usize> {
        let c = char_at(text, pos)?;
        let after = pos + c.len_utf8();
        let next = char_at(text, after);
        let not_space = |n: Option<char>| n.is_some_and(|n| !is_space_or_control(n));

        if is_space_or_control(c) || is_text_separator(c) {
            return None;
        }
        match c {
            '[' => closing_end(text, after, ']', false),
            '(' => closing_end(text, after, ')', false),
            '{' => closing_end(text, after, '}', false),
            '"' => closing_end(text, after, '"', true),
            '\'' => closing_end(text, after, '\'', true).or_else(|| {
                next.filter(|&n| n == '-' || is_pseudo_letter(n)).map(|_| after)
            }),
            ']' | ')' | '}' => None,
            '.' => {
                let dots = run_len(text, pos, '.');
                if dots >= 2 {
                    if let Some(n) = char_at(text, pos + dots) {
                        if n.is_ascii_alphanumeric() || matches!(n, '%' | '/' | '&') {
                            return Some(pos + dots + n.len_utf8());
                        }
                    }
                }
                (not_space(next) && next != Some('.')).then_some(after)
            }
            '-' => {
                if self.options.triple_dash && is_long_dash(text, after) {
                    return None;
                }
                Some(pos + run_len(text, pos, '-'))
            }
            ',' | ';' => not_space(next).then_some(after),
            '!' => {
                let end = pos + run_len(text, pos, '!');
                not_space(char_at(text, end)).then_some(end)
            }
            '?' => (not_space(next) && next != Some('?')).then_some(after),
            _ => Some(after),
        }
    }
}

/// `user:password@` prefix, returning where the host starts.
fn credentials_end(text: &str, pos: usize) -> Option<usize> {
    for (offset, c) in text.get(pos..)?.char_indices() {
        if c == '@' {
            return (offset > 0).then_some(pos + offset + 1);
        }
        if is_space_or_control(c) || matches!(c, '/' | '[' | ']' | '(' | ')') {
            return None;
        }
    }
    None
}

/// Dot-separated labels starting at `pos` as `(start, end)` pairs. A dot
/// that is not followed by a valid label is not consumed. Hosts longer than
/// 253 bytes are rejected.
fn scan_labels(text: &str, pos: usize) -> Option<Vec<(usize, usize)>> {
    let mut labels = vec![(pos, label_end(text, pos)?)];
    loop {
        let (_, end) = labels[labels.len() - 1];
        if end - pos > MAX_HOST_BYTES {
            return None;
        }
        if char_at(text, end) != Some('.') {
            break;
        }
        match label_end(text, end + 1) {
            Some(next) => labels.push((end + 1, next)),
            None => break,
        }
    }
    Some(labels)
}

/// One host label: pseudo letters and inner hyphens, at most 63 characters.
/// Punycode labels (`xn--`) may also end with a hyphen.
fn label_end(text: &str, pos: usize) -> Option<usize> {
    let tail = text.get(pos..)?;
    let mut end = pos;
    let mut count = 0;
    let mut last = None;
    for (offset, c) in tail.char_indices() {
        if c != '-' && !is_pseudo_letter(c) {
            break;
        }
        if offset == 0 && c == '-' {
            return None;
        }
        count += 1;
        if count > MAX_LABEL_CHARS {
            return None;
        }
        last = Some(c);
        end = pos + offset + c.len_utf8();
    }
    let last = last?;
    if last == '-' && !starts_with_ignore_case(tail, "xn--") {
        return None;
    }
    Some(end)
}

fn is_root_label(label: &str) -> bool {
    starts_with_ignore_case(label, "xn--") || label.chars().all(is_pseudo_letter)
}

fn is_ipv4(text: &str, labels: &[(usize, usize)]) -> bool {
    labels.len() == 4
        && labels.iter().all(|&(start, end)| {
            let octet = &text[start..end];
            octet.len() <= 3
                && octet.bytes().all(|b| b.is_ascii_digit())
                && octet.parse::<u16>().is_ok_and(|value| value <= 255)
        })
}

/// `:port` with a value up to 65535; anything else is left unconsumed.
fn port_end(text: &str, pos: usize) -> usize {
    let Some(rest) = text.get(pos..).and_then(|tail| tail.strip_prefix(':')) else {
        return pos;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let valid = match digits {
        1..=4 => true,
        5 => !rest.starts_with('0') && rest[..5].parse::<u32>().is_ok_and(|port| port <= 65535),
        _ => false,
    };
    if valid {
        pos + 1 + digits
    } else {
        pos
    }
}

/// End of a bracketed or quoted section whose opening character sits right
/// before `pos`. Whitespace inside ends the search.
fn closing_end(text: &str, pos: usize, close: char, non_empty: bool) -> Option<usize> {
    for (offset, c) in text.get(pos..)?.char_indices() {
        if c == close {
            return (!non_empty || offset > 0).then_some(pos + offset + c.len_utf8());
        }
        if is_space_or_control(c) {
            return None;
        }
    }
    None
}

fn run_len(text: &str, pos: usize, c: char) -> usize {
    text[pos..].chars().take_while(|&x| x == c).count() * c.len_utf8()
}

/// `--` right after a dash, followed by the end of text or a non-dash.
fn is_long_dash(text: &str, pos: usize) -> bool {
    let tail = &text[pos..];
    tail.starts_with("--") && tail[2..].chars().next() != Some('-')
}
