/*!
 * Tests for markup scanning
 */

use playmark::scanner::{
    find_enclosed, has_bold, has_delimiter_enclosed_text, has_inline_direction,
    has_overline_direction, strip_parentheses, BARE_SLUG_REGEX, CONTD_REGEX, UNKNOWN_TAG_REGEX,
};

#[test]
fn test_has_delimiter_enclosed_text_withEnclosedSpan_shouldReturnTrue() {
    assert!(has_delimiter_enclosed_text("[[a direction]] rest", "[[", "]]", false));
    assert!(has_delimiter_enclosed_text("a *bold* word", "*", "*", false));
}

#[test]
fn test_has_delimiter_enclosed_text_withUnclosedSpan_shouldReturnFalse() {
    assert!(!has_delimiter_enclosed_text("[[a direction rest", "[[", "]]", false));
    assert!(!has_delimiter_enclosed_text("a direction]] rest", "[[", "]]", false));
    assert!(!has_delimiter_enclosed_text("", "[[", "]]", false));
}

#[test]
fn test_has_delimiter_enclosed_text_withCloseBeforeOpen_shouldReturnFalse() {
    assert!(!has_delimiter_enclosed_text("]]backwards[[", "[[", "]]", false));
}

#[test]
fn test_find_enclosed_withMarkup_shouldReportOffsetsAndText() {
    let span = find_enclosed("a *bold* word", "*", "*").unwrap();
    assert_eq!(span.start, 2);
    assert_eq!(span.end, 8);
    assert_eq!(span.enclosed_text, "bold");
    assert_eq!(span.open_tag, "*");

    assert!(find_enclosed("no markup here", "*", "*").is_none());
}

#[test]
fn test_direction_helpers_withDelimiters_shouldMatch() {
    assert!(has_overline_direction("[[crosses left]] She sits."));
    assert!(!has_overline_direction("just a line"));
    assert!(has_inline_direction("Wait (beat) here."));
    assert!(!has_inline_direction("Wait here."));
}

#[test]
fn test_has_bold_withConfiguredDelimiters_shouldMatch() {
    assert!(has_bold("say it *louder* please", "*", "*"));
    assert!(!has_bold("no emphasis here", "*", "*"));
    assert!(has_bold("say it !louder! please", "!", "!"));
}

#[test]
fn test_strip_parentheses_withWrappedText_shouldUnwrapOnce() {
    assert_eq!(strip_parentheses(" (crosses left) "), "crosses left");
    assert_eq!(strip_parentheses("(a (b))"), "a (b)");
    assert_eq!(strip_parentheses("plain"), "plain");
    assert_eq!(strip_parentheses("(unbalanced"), "(unbalanced");
}

#[test]
fn test_unknown_tag_regex_withTagShapes_shouldMatchOnlyValid() {
    assert!(UNKNOWN_TAG_REGEX.is_match("/JN/ Hello"));
    assert!(UNKNOWN_TAG_REGEX.is_match("/a-b_1/ x"));
    // Too long, missing trailing space, not at start
    assert!(!UNKNOWN_TAG_REGEX.is_match("/TOOLONGTAG/ x"));
    assert!(!UNKNOWN_TAG_REGEX.is_match("/JN/Hello"));
    assert!(!UNKNOWN_TAG_REGEX.is_match(" /JN/ Hello"));
}

#[test]
fn test_contd_regex_withSuffix_shouldMatchAnyCase() {
    assert!(CONTD_REGEX.is_match("JOHN (CONT'D)"));
    assert!(CONTD_REGEX.is_match("john (cont'd)"));
    assert!(!CONTD_REGEX.is_match("JOHN (CONT'D) extra"));
}

#[test]
fn test_bare_slug_regex_withSlugShapes_shouldMatchOnlyValid() {
    assert!(BARE_SLUG_REGEX.is_match("JOHN"));
    assert!(BARE_SLUG_REGEX.is_match("GUARD #2"));
    assert!(!BARE_SLUG_REGEX.is_match("JOHN!"));
    assert!(!BARE_SLUG_REGEX.is_match(""));
}
