use log::{debug, info};

use crate::converter::collapse_contd_slugs;
use crate::document::{DocPos, DocSpan, ParaStyle, ScriptDocument};

// @module: Page-boundary speech splitting
//
// Walks every character slug, measures the speech below it in visual
// lines, and splits speeches that would cross a page boundary. The
// continuation is re-introduced with a `NAME (CONT'D)` slug so the
// split survives later strip/collapse round trips.

/// Minimum speech length (visual lines) worth splitting
const MIN_SPLIT_LENGTH: usize = 10;

/// Minimum room left on the page for a split to pay off
const MIN_LINES_LEFT: usize = 5;

/// Split speeches that run over a page boundary.
///
/// Existing `(CONT'D)` continuations are collapsed first so the pass
/// always measures whole speeches. Page room is tracked slug to slug:
/// the first slug estimates it from its own line position, each
/// following slug from where the previous speech ended.
pub fn break_up_long_speeches(doc: &mut ScriptDocument) {
    collapse_contd_slugs(doc);

    let capacity = doc.page.lines_per_page;
    let mut doc = doc.begin_batch();
    let mut lines_left: Option<usize> = None;
    let mut from_para = 0;
    let mut split_count = 0usize;

    while let Some(span) = doc.find_next_styled(ParaStyle::CharacterName, from_para) {
        let i = span.para;
        from_para = i + 1;

        let mut name = doc.paragraph(i).text.trim().to_string();
        while name.to_uppercase().ends_with(" (CONT'D)") {
            name.truncate(name.len() - 9);
        }

        let slug_line = doc.line_index_of(DocPos::new(i, 0));
        let slug_line_on_page = slug_line % capacity;
        let speech_len = speech_line_count(&doc, i);

        let left = lines_left
            .unwrap_or_else(|| capacity.saturating_sub(slug_line_on_page + 1));

        if speech_len > MIN_SPLIT_LENGTH && speech_len > left && left > MIN_LINES_LEFT {
            debug!(
                "Splitting speech of {} at paragraph {} ({} lines, {} left on page)",
                name, i, speech_len, left
            );
            split_speech_at(&mut doc, slug_line + left - 2, &name);
            split_count += 1;
        }

        // Room left after the slug, its speech, and a blank line
        lines_left = Some(
            match (capacity as i64) - (slug_line_on_page as i64) - (speech_len as i64) - 2 {
                n if n <= 0 => capacity,
                n => n as usize,
            },
        );
    }

    info!("Split {} long speeches", split_count);
}

/// Visual lines of speech hanging under the slug at `slug_para`:
/// consecutive lines styled as dialogue or overline direction.
fn speech_line_count(doc: &ScriptDocument, slug_para: usize) -> usize {
    let mut line = doc.line_index_of(DocPos::new(slug_para, 0)) + doc.para_line_count(slug_para);
    let mut count = 0;

    while let Some(span) = doc.line_span(line) {
        match doc.paragraph(span.para).style {
            ParaStyle::Line | ParaStyle::StageDirectionOverline => {
                count += 1;
                line += 1;
            }
            _ => break,
        }
    }
    count
}

/// Break the speech at the end of the given global visual line and
/// re-open it below with a continuation slug.
fn split_speech_at(doc: &mut ScriptDocument, target_line: usize, name: &str) {
    let Some(line) = doc.line_span(target_line) else {
        return;
    };

    doc.split_paragraph(DocPos::new(line.para, line.end));
    trim_paragraph_end(doc, line.para);

    let rem = line.para + 1;
    doc.set_style(rem, ParaStyle::Default);
    doc.split_paragraph(DocPos::new(rem, 0));

    doc.set_style(rem + 1, ParaStyle::CharacterName);
    let contd = format!("{} (CONT'D)", name);
    doc.insert_text(DocPos::new(rem + 1, 0), &contd);
    doc.split_paragraph(DocPos::new(rem + 1, contd.len()));

    doc.set_style(rem + 2, ParaStyle::Line);
    trim_paragraph_start(doc, rem + 2);
}

fn trim_paragraph_end(doc: &mut ScriptDocument, index: usize) {
    let text = &doc.paragraph(index).text;
    let trimmed_len = text.trim_end().len();
    let full_len = text.len();
    if trimmed_len < full_len {
        doc.replace_range(DocSpan::new(index, trimmed_len, full_len), "");
    }
}

fn trim_paragraph_start(doc: &mut ScriptDocument, index: usize) {
    let text = &doc.paragraph(index).text;
    let lead = text.len() - text.trim_start().len();
    if lead > 0 {
        doc.replace_range(DocSpan::new(index, 0, lead), "");
    }
}
