/*!
 * Tests for page-boundary speech splitting
 */

use playmark::document::{PageLayout, ParaStyle, Paragraph, ScriptDocument};
use playmark::splitter::break_up_long_speeches;
use crate::common::para;

/// Document with a slug followed by `lines` one-line dialogue
/// paragraphs, preceded by `intro` one-line default paragraphs.
fn speech_doc(intro: usize, lines: usize, lines_per_page: usize) -> ScriptDocument {
    let mut paragraphs = Vec::new();
    for i in 0..intro {
        paragraphs.push(para(ParaStyle::Default, &format!("intro {}", i)));
    }
    paragraphs.push(para(ParaStyle::CharacterName, "JOHN"));
    for i in 0..lines {
        paragraphs.push(para(ParaStyle::Line, &format!("line {}", i)));
    }
    let page = PageLayout { wrap_width: 60, lines_per_page };
    ScriptDocument::from_paragraphs(paragraphs, page)
}

#[test]
fn test_break_up_withShortSpeech_shouldNotSplit() {
    // 10 lines is at the threshold, not over it
    let mut doc = speech_doc(0, 10, 8);
    let before = doc.para_count();

    break_up_long_speeches(&mut doc);
    assert_eq!(doc.para_count(), before);
}

#[test]
fn test_break_up_withLongSpeech_shouldInsertContinuation() {
    // Slug on line 0 of an 8-line page: 7 lines of room
    let mut doc = speech_doc(0, 12, 8);

    break_up_long_speeches(&mut doc);

    let contd: Vec<usize> = (0..doc.para_count())
        .filter(|&i| doc.paragraph(i).text == "JOHN (CONT'D)")
        .collect();
    assert_eq!(contd.len(), 1);

    let at = contd[0];
    assert_eq!(doc.paragraph(at).style, ParaStyle::CharacterName);
    // Page-break padding above the continuation slug
    assert_eq!(doc.paragraph(at - 1).text, "");
    assert_eq!(doc.paragraph(at - 1).style, ParaStyle::Default);
    // The continuation body keeps the dialogue style
    assert_eq!(doc.paragraph(at + 1).style, ParaStyle::Line);
}

#[test]
fn test_break_up_withSixLinesOfRoom_shouldSplit() {
    // Slug on line 1 of an 8-line page leaves 6 lines of room, just
    // over the minimum of 5
    let mut doc = speech_doc(1, 12, 8);

    break_up_long_speeches(&mut doc);

    let contd = (0..doc.para_count())
        .filter(|&i| doc.paragraph(i).text == "JOHN (CONT'D)")
        .count();
    assert_eq!(contd, 1);
}

#[test]
fn test_break_up_withFourLinesOfRoom_shouldNotSplit() {
    // Slug on line 3 of an 8-line page leaves 4 lines of room, just
    // under the minimum of 5
    let mut doc = speech_doc(3, 12, 8);
    let before = doc.para_count();

    break_up_long_speeches(&mut doc);
    assert_eq!(doc.para_count(), before);
}

#[test]
fn test_break_up_withLittleRoomLeft_shouldNotSplit() {
    // Slug on line 5 of an 8-line page leaves only 2 lines of room
    let mut doc = speech_doc(5, 12, 8);
    let before = doc.para_count();

    break_up_long_speeches(&mut doc);
    assert_eq!(doc.para_count(), before);
}

#[test]
fn test_break_up_withWholePageOfRoom_shouldNotSplitFittingSpeech() {
    // 12-line speech fits comfortably in a 46-line page
    let mut doc = speech_doc(0, 12, 46);
    let before = doc.para_count();

    break_up_long_speeches(&mut doc);
    assert_eq!(doc.para_count(), before);
}

#[test]
fn test_break_up_withExistingContinuation_shouldCollapseFirst() {
    let paragraphs = vec![
        para(ParaStyle::CharacterName, "JOHN"),
        para(ParaStyle::Line, "first half"),
        para(ParaStyle::Default, ""),
        para(ParaStyle::CharacterName, "JOHN (CONT'D)"),
        para(ParaStyle::Line, "second half"),
    ];
    let page = PageLayout { wrap_width: 60, lines_per_page: 46 };
    let mut doc = ScriptDocument::from_paragraphs(paragraphs, page);

    break_up_long_speeches(&mut doc);

    assert_eq!(doc.para_count(), 2);
    assert_eq!(doc.paragraph(0).text, "JOHN");
    assert_eq!(doc.paragraph(1).text, "first half second half");
    assert_eq!(doc.paragraph(1).style, ParaStyle::Line);
}

#[test]
fn test_break_up_withWrappedSpeech_shouldSplitAtLineBoundary() {
    // One long paragraph wrapping to 12 visual lines of width 10
    let body = "word ".repeat(24);
    let paragraphs = vec![
        para(ParaStyle::CharacterName, "JOHN"),
        Paragraph::new(ParaStyle::Line, body.trim_end()),
    ];
    let page = PageLayout { wrap_width: 10, lines_per_page: 10 };
    let mut doc = ScriptDocument::from_paragraphs(paragraphs, page);

    break_up_long_speeches(&mut doc);

    // Speech of 12 lines with 9 lines of room: split after line 7 of
    // the speech body, leaving both halves styled as dialogue
    let contd: Vec<usize> = (0..doc.para_count())
        .filter(|&i| doc.paragraph(i).text == "JOHN (CONT'D)")
        .collect();
    assert_eq!(contd.len(), 1);

    let at = contd[0];
    assert_eq!(doc.paragraph(at - 2).style, ParaStyle::Line);
    assert!(doc.paragraph(at - 2).text.starts_with("word"));
    assert!(!doc.paragraph(at - 2).text.ends_with(' '));
    assert_eq!(doc.paragraph(at + 1).style, ParaStyle::Line);
    assert!(doc.paragraph(at + 1).text.starts_with("word"));
}
