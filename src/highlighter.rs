use log::info;

use crate::document::{ParaStyle, ScriptDocument};

// @module: Paragraph highlighting for read-throughs

/// Highlight color for marked paragraphs (RGB yellow)
pub const HIGHLIGHT_YELLOW: u32 = 0xFFFF00;

/// Remove highlighting from every paragraph
pub fn clear_highlights(doc: &mut ScriptDocument) {
    for i in 0..doc.para_count() {
        doc.set_highlight(i, None);
    }
    info!("Cleared highlighting on {} paragraphs", doc.para_count());
}

/// Highlight all block stage directions, clearing everything else
pub fn highlight_stage_directions(doc: &mut ScriptDocument) {
    clear_highlights(doc);

    let mut count = 0;
    for i in 0..doc.para_count() {
        if doc.paragraph(i).style == ParaStyle::StageDirectionBlock {
            doc.set_highlight(i, Some(HIGHLIGHT_YELLOW));
            count += 1;
        }
    }
    info!("Highlighted {} stage direction blocks", count);
}

/// Highlight one character's speeches.
///
/// A slug matches when the given name appears in it, ignoring case, so
/// "JOHN" also catches "JOHN'S VOICE". Dialogue and overline
/// paragraphs follow the most recent slug; stage direction blocks
/// always lose their highlight; other paragraphs are left as they are,
/// so repeated runs accumulate one character per run.
pub fn highlight_character(doc: &mut ScriptDocument, name: &str) {
    let needle = name.trim().to_uppercase();
    let mut in_speech = false;
    let mut count = 0;

    for i in 0..doc.para_count() {
        match doc.paragraph(i).style {
            ParaStyle::CharacterName => {
                in_speech = !needle.is_empty()
                    && doc.paragraph(i).text.trim().to_uppercase().contains(&needle);
                doc.set_highlight(i, if in_speech { Some(HIGHLIGHT_YELLOW) } else { None });
                if in_speech {
                    count += 1;
                }
            }
            ParaStyle::Line | ParaStyle::StageDirectionOverline => {
                doc.set_highlight(i, if in_speech { Some(HIGHLIGHT_YELLOW) } else { None });
            }
            ParaStyle::StageDirectionBlock => {
                doc.set_highlight(i, None);
            }
            // Blank and centered paragraphs neither carry nor end a
            // speech; the flag rides across them.
            ParaStyle::Default | ParaStyle::CenteredBlock => {}
        }
    }
    info!("Highlighted {} speeches of {}", count, needle);
}
