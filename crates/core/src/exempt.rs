// ABOUTME: Locates markup regions (pre/code blocks) that must pass through unmodified.
// ABOUTME: Produces half-open byte ranges and reports protected tags that never close.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tags whose contents are never rewritten by default.
pub const DEFAULT_PROTECTED_TAGS: &[&str] = &["pre", "code"];

/// A half-open `[start, end)` byte span of the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExemptRange {
    pub start: usize,
    pub end: usize,
}

impl ExemptRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns true if `pos` lies inside the range.
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// All exempt ranges of one document. Ranges may overlap and are not sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExemptRanges {
    ranges: Vec<ExemptRange>,
}

impl ExemptRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, range: ExemptRange) {
        self.ranges.push(range);
    }

    /// Returns true if `pos` falls inside any range.
    pub fn contains(&self, pos: usize) -> bool {
        self.ranges.iter().any(|r| r.contains(pos))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExemptRange> {
        self.ranges.iter()
    }
}

impl FromIterator<ExemptRange> for ExemptRanges {
    fn from_iter<I: IntoIterator<Item = ExemptRange>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}

/// An opening protected tag with no matching close tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnterminatedTag {
    pub tag: String,
    pub offset: usize,
}

// Tag names are interpolated into patterns, so keep them to plain identifiers.
static TAG_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").unwrap());

/// Returns true if `tag` can be used as a protected tag name.
pub fn is_valid_tag_name(tag: &str) -> bool {
    TAG_NAME_RE.is_match(tag)
}

fn block_pattern(tag: &str) -> Regex {
    let tag = regex::escape(tag);
    Regex::new(&format!(r"(?is)<{tag}[^>]*>.*?</{tag}>")).unwrap()
}

fn open_pattern(tag: &str) -> Regex {
    let tag = regex::escape(tag);
    Regex::new(&format!(r"(?i)<{tag}[^>]*>")).unwrap()
}

/// Finds every protected block in `html`.
///
/// For each tag the shortest `<tag ...> ... </tag>` matches are taken,
/// case-insensitively and across lines. Each match covers both tags. Nested
/// blocks of the same tag end at the first close tag, and an opening tag with
/// no close tag yields no range at all (see [`find_unterminated`]).
pub fn locate_exempt_ranges<S: AsRef<str>>(html: &str, tags: &[S]) -> ExemptRanges {
    let mut ranges = ExemptRanges::new();
    for tag in tags {
        let re = block_pattern(tag.as_ref());
        for m in re.find_iter(html) {
            ranges.push(ExemptRange::new(m.start(), m.end()));
        }
    }
    tracing::debug!(count = ranges.len(), "located exempt ranges");
    ranges
}

/// Lists opening protected tags that are not covered by any exempt range.
///
/// Their content is rewritten like ordinary markup, which is usually not what
/// the author of the document meant.
pub fn find_unterminated<S: AsRef<str>>(
    html: &str,
    tags: &[S],
    ranges: &ExemptRanges,
) -> Vec<UnterminatedTag> {
    let mut found = Vec::new();
    for tag in tags {
        let tag = tag.as_ref();
        let re = open_pattern(tag);
        for m in re.find_iter(html) {
            if !ranges.contains(m.start()) {
                found.push(UnterminatedTag {
                    tag: tag.to_string(),
                    offset: m.start(),
                });
            }
        }
    }
    found.sort_by_key(|t| t.offset);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_block_covers_both_tags() {
        let html = r#"<p>a</p><pre class="x">code</pre><p>b</p>"#;
        let ranges = locate_exempt_ranges(html, DEFAULT_PROTECTED_TAGS);
        assert_eq!(ranges.len(), 1);
        let r = ranges.iter().next().unwrap();
        assert_eq!(&html[r.start..r.end], r#"<pre class="x">code</pre>"#);
    }

    #[test]
    fn matches_case_insensitively_across_lines() {
        let html = "<CODE>\nline one\nline two\n</code>";
        let ranges = locate_exempt_ranges(html, DEFAULT_PROTECTED_TAGS);
        assert_eq!(ranges.len(), 1);
        assert!(ranges.contains(0));
        assert!(ranges.contains(html.len() - 1));
        assert!(!ranges.contains(html.len()));
    }

    #[test]
    fn shortest_match_per_block() {
        let html = "<pre>a</pre> gap <pre>b</pre>";
        let ranges = locate_exempt_ranges(html, &["pre"]);
        assert_eq!(ranges.len(), 2);
        let gap = html.find("gap").unwrap();
        assert!(!ranges.contains(gap));
    }

    #[test]
    fn code_inside_pre_overlaps() {
        let html = "<pre><code>x</code></pre>";
        let ranges = locate_exempt_ranges(html, DEFAULT_PROTECTED_TAGS);
        assert_eq!(ranges.len(), 2);
    }

    #[test]
    fn unterminated_tag_is_not_protected() {
        let html = r#"<pre><div class="a">never closed"#;
        let ranges = locate_exempt_ranges(html, DEFAULT_PROTECTED_TAGS);
        assert!(ranges.is_empty());
        let open = find_unterminated(html, DEFAULT_PROTECTED_TAGS, &ranges);
        assert_eq!(
            open,
            vec![UnterminatedTag {
                tag: "pre".into(),
                offset: 0
            }]
        );
    }

    #[test]
    fn terminated_tags_are_not_reported() {
        let html = "<p><code>x</code></p>";
        let ranges = locate_exempt_ranges(html, DEFAULT_PROTECTED_TAGS);
        assert!(find_unterminated(html, DEFAULT_PROTECTED_TAGS, &ranges).is_empty());
    }

    #[test]
    fn half_open_bounds() {
        let r = ExemptRange::new(3, 7);
        assert!(!r.contains(2));
        assert!(r.contains(3));
        assert!(r.contains(6));
        assert!(!r.contains(7));
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn tag_name_validation() {
        assert!(is_valid_tag_name("pre"));
        assert!(is_valid_tag_name("my-widget"));
        assert!(!is_valid_tag_name(""));
        assert!(!is_valid_tag_name("pre>"));
        assert!(!is_valid_tag_name("1st"));
    }
}
