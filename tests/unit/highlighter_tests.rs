/*!
 * Tests for read-through highlighting
 */

use playmark::document::ParaStyle;
use playmark::highlighter::{
    clear_highlights, highlight_character, highlight_stage_directions, HIGHLIGHT_YELLOW,
};
use crate::common::{doc_from, para};

#[test]
fn test_clear_highlights_withMarkedParagraphs_shouldRemoveAll() {
    let mut doc = doc_from(vec![
        para(ParaStyle::Line, "one"),
        para(ParaStyle::Line, "two"),
    ]);
    doc.set_highlight(0, Some(HIGHLIGHT_YELLOW));
    doc.set_highlight(1, Some(0x00FF00));

    clear_highlights(&mut doc);
    assert_eq!(doc.paragraph(0).highlight, None);
    assert_eq!(doc.paragraph(1).highlight, None);
}

#[test]
fn test_highlight_stage_directions_shouldMarkOnlyBlocks() {
    let mut doc = doc_from(vec![
        para(ParaStyle::Default, "intro"),
        para(ParaStyle::StageDirectionBlock, "The lights dim."),
        para(ParaStyle::Line, "Hello."),
    ]);
    doc.set_highlight(2, Some(HIGHLIGHT_YELLOW));

    highlight_stage_directions(&mut doc);
    assert_eq!(doc.paragraph(0).highlight, None);
    assert_eq!(doc.paragraph(1).highlight, Some(HIGHLIGHT_YELLOW));
    assert_eq!(doc.paragraph(2).highlight, None);
}

#[test]
fn test_highlight_character_withMatchingSlug_shouldMarkSpeeches() {
    let mut doc = doc_from(vec![
        para(ParaStyle::CharacterName, "JOHN"),
        para(ParaStyle::Line, "Hi there."),
        para(ParaStyle::CharacterName, "MARY"),
        para(ParaStyle::StageDirectionOverline, "(waving)"),
        para(ParaStyle::Line, "Hello John."),
    ]);

    highlight_character(&mut doc, "john");

    assert_eq!(doc.paragraph(0).highlight, Some(HIGHLIGHT_YELLOW));
    assert_eq!(doc.paragraph(1).highlight, Some(HIGHLIGHT_YELLOW));
    assert_eq!(doc.paragraph(2).highlight, None);
    assert_eq!(doc.paragraph(3).highlight, None);
    assert_eq!(doc.paragraph(4).highlight, None);
}

#[test]
fn test_highlight_character_withSubstringMatch_shouldCatchVariants() {
    let mut doc = doc_from(vec![
        para(ParaStyle::CharacterName, "JOHN'S VOICE"),
        para(ParaStyle::Line, "From offstage."),
    ]);

    highlight_character(&mut doc, "JOHN");
    assert_eq!(doc.paragraph(0).highlight, Some(HIGHLIGHT_YELLOW));
    assert_eq!(doc.paragraph(1).highlight, Some(HIGHLIGHT_YELLOW));
}

#[test]
fn test_highlight_character_withOtherParagraphs_shouldLeaveThemUntouched() {
    let mut doc = doc_from(vec![
        para(ParaStyle::Default, "scene note"),
        para(ParaStyle::CharacterName, "JOHN"),
        para(ParaStyle::Line, "Hi."),
        para(ParaStyle::StageDirectionBlock, "A pause."),
    ]);
    doc.set_highlight(0, Some(0x00FF00));
    doc.set_highlight(3, Some(0x00FF00));

    highlight_character(&mut doc, "JOHN");

    // Default paragraphs keep earlier marks; block directions always lose theirs
    assert_eq!(doc.paragraph(0).highlight, Some(0x00FF00));
    assert_eq!(doc.paragraph(3).highlight, None);
}
