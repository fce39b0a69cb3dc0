use anyhow::Result;
use log::{debug, info};

use crate::app_config::MarkupTags;
use crate::document::{
    CharStyle, Decoration, DocPos, DocSpan, ParaStyle, ScriptDocument, MANUAL_DIRECTION_MARGIN,
};
use crate::errors::MarkupError;
use crate::registry::TagRegistry;
use crate::resolver::{self, ResolverPrompt};
use crate::scanner::{
    self, strip_parentheses, CONTD_REGEX, INLINE_DIRECTION_REGEX,
};

// @module: Bidirectional markup/style conversion passes
//
// `apply_formatting` turns a plain marked-up script into a styled one;
// `strip_formatting` is its inverse. Both run as ordered pass
// pipelines over the whole document inside one batch update. Pass
// order is part of the contract: slugs before paragraph prefixes,
// prefixes before character decorations, and on the way back
// decorations before prefixes before slugs.

/// Convert markup to styles across the whole document.
///
/// Unknown tag-shaped spans are offered to `prompt` for registration;
/// if any are accepted, the slug pass runs a second time so the new
/// entries take effect in the same run.
pub fn apply_formatting(
    doc: &mut ScriptDocument,
    registry: &mut TagRegistry,
    markup: &MarkupTags,
    prompt: &mut dyn ResolverPrompt,
) -> Result<()> {
    registry.ensure_loaded();
    let mut doc = doc.begin_batch();

    apply_character_slugs(&mut doc, registry);

    let changed = resolver::resolve_unknown_tags(&doc, registry, prompt)?;
    if changed {
        debug!("Registry grew during resolution, re-running slug pass");
        apply_character_slugs(&mut doc, registry);
    }

    format_centered_text(&mut doc, &markup.centered_tag);
    format_overline_directions(&mut doc, markup);
    format_stage_direction_blocks(&mut doc, &markup.stage_direction_tag);
    format_inline_directions(&mut doc);

    apply_decoration_from_markup(&mut doc, &markup.bold_tag, Decoration::Bold);
    apply_decoration_from_markup(&mut doc, &markup.underline_tag, Decoration::Underline);
    apply_decoration_from_markup(&mut doc, &markup.italic_tag, Decoration::Italic);
    // Strikethrough markup is recognized in configuration but not
    // applied; struck text stays as typed.

    info!("Applied formatting across {} paragraphs", doc.para_count());
    Ok(())
}

/// Convert styles back to markup across the whole document
pub fn strip_formatting(
    doc: &mut ScriptDocument,
    registry: &mut TagRegistry,
    markup: &MarkupTags,
) -> Result<()> {
    registry.ensure_loaded();

    // Continuation slugs have to be folded back into single speeches
    // before any other pass sees the paragraphs.
    collapse_contd_slugs(doc);

    let mut doc = doc.begin_batch();

    replace_decoration_with_markup(&mut doc, markup, false, false, false, true)?;
    replace_decoration_with_markup(&mut doc, markup, true, false, false, false)?;
    replace_decoration_with_markup(&mut doc, markup, false, true, false, false)?;
    replace_decoration_with_markup(&mut doc, markup, false, false, true, false)?;

    unformat_inline_directions(&mut doc);
    unformat_stage_direction_blocks(&mut doc, &markup.stage_direction_tag);
    unformat_overline_directions(&mut doc, markup);
    unformat_manual_block_directions(&mut doc, &markup.stage_direction_tag);
    unformat_centered_text(&mut doc, &markup.centered_tag);
    replace_slug_with_tag(&mut doc, registry);

    info!("Stripped formatting across {} paragraphs", doc.para_count());
    Ok(())
}

/// Replace registered tags with their character slugs.
///
/// Each hit becomes a CharacterName paragraph holding the slug, with
/// the rest of the original paragraph split off below it as a Line.
/// A following paragraph already styled as an overline direction keeps
/// that style.
pub fn apply_character_slugs(doc: &mut ScriptDocument, registry: &mut TagRegistry) {
    registry.ensure_loaded();

    let pairs: Vec<(String, String)> = registry
        .entries()
        .map(|(s, t)| (s.to_string(), t.to_string()))
        .collect();

    for (slug, tag) in pairs {
        let mut from = DocPos::start();
        while let Some(span) = doc.find_next_literal(&tag, true, from) {
            let para = span.para;
            doc.replace_range(span, &slug);

            let slug_span = DocSpan::new(para, span.start, span.start + slug.len());
            doc.set_decoration(slug_span, Decoration::Bold, false);
            doc.set_decoration(slug_span, Decoration::Italic, false);
            doc.set_decoration(slug_span, Decoration::Underline, false);

            doc.split_paragraph(slug_span.end_pos());
            if doc.paragraph(para + 1).style != ParaStyle::StageDirectionOverline {
                doc.set_style(para + 1, ParaStyle::Line);
            }
            doc.set_style(para, ParaStyle::CharacterName);

            from = DocPos::new(para + 1, 0);
        }
    }
}

/// Strip the centered prefix and style those paragraphs as centered
/// blocks. The prefix match ignores case.
fn format_centered_text(doc: &mut ScriptDocument, tag: &str) {
    for i in 0..doc.para_count() {
        if starts_with_ignore_ascii_case(&doc.paragraph(i).text, tag) {
            doc.replace_range(DocSpan::new(i, 0, tag.len()), "");
            doc.set_style(i, ParaStyle::CenteredBlock);
        }
    }
}

/// Convert `[[direction]]resumed line` into an overline direction
/// paragraph `(direction)` above a Line paragraph.
fn format_overline_directions(doc: &mut ScriptDocument, markup: &MarkupTags) {
    let open = &markup.overline_open;
    let close = &markup.overline_close;

    let mut from = DocPos::start();
    while let Some(open_span) = doc.find_next_literal(open, true, from) {
        let para = open_span.para;
        let rest = &doc.paragraph(para).text[open_span.start..];
        if !scanner::has_delimiter_enclosed_text(rest, open, close, false) {
            from = open_span.end_pos();
            continue;
        }

        doc.replace_range(open_span, "(");
        let after_open = DocPos::new(para, open_span.start + 1);
        let Some(close_span) = doc.find_next_literal(close, true, after_open) else {
            from = after_open;
            continue;
        };
        if close_span.para != para {
            from = after_open;
            continue;
        }

        doc.replace_range(close_span, ")");
        doc.split_paragraph(DocPos::new(para, close_span.start + 1));

        let remainder = doc.paragraph(para + 1).text.trim().to_string();
        let remainder_len = doc.paragraph(para + 1).text.len();
        doc.replace_range(DocSpan::new(para + 1, 0, remainder_len), &remainder);
        doc.set_style(para + 1, ParaStyle::Line);
        doc.set_style(para, ParaStyle::StageDirectionOverline);

        from = DocPos::new(para + 1, 0);
    }
}

/// Strip the stage-direction prefix and style those paragraphs as
/// block directions.
fn format_stage_direction_blocks(doc: &mut ScriptDocument, tag: &str) {
    for i in 0..doc.para_count() {
        if doc.paragraph(i).text.starts_with(tag) {
            doc.replace_range(DocSpan::new(i, 0, tag.len()), "");
            doc.set_style(i, ParaStyle::StageDirectionBlock);
        }
    }
}

/// Mark parentheticals inside dialogue lines with the inline direction
/// character style.
fn format_inline_directions(doc: &mut ScriptDocument) {
    for i in 0..doc.para_count() {
        if doc.paragraph(i).style != ParaStyle::Line {
            continue;
        }
        let text = doc.paragraph(i).text.clone();
        for m in INLINE_DIRECTION_REGEX.find_iter(&text) {
            doc.set_char_style(DocSpan::new(i, m.start(), m.end()), CharStyle::StageDirectionInline);
        }
    }
}

/// Replace `tag`-delimited spans with the given character decoration.
/// The closing delimiter must fall in the same paragraph.
fn apply_decoration_from_markup(doc: &mut ScriptDocument, tag: &str, deco: Decoration) {
    if tag.is_empty() {
        return;
    }

    let mut from = DocPos::start();
    while let Some(open_span) = doc.find_next_literal(tag, true, from) {
        let para = open_span.para;
        let close = doc.find_next_literal(tag, true, open_span.end_pos());
        let Some(close_span) = close else {
            from = open_span.end_pos();
            continue;
        };
        if close_span.para != para {
            from = open_span.end_pos();
            continue;
        }

        // Delete the higher-offset delimiter first so the lower span
        // stays valid.
        doc.replace_range(close_span, "");
        doc.replace_range(open_span, "");

        let enclosed = DocSpan::new(para, open_span.start, close_span.start - tag.len());
        doc.set_decoration(enclosed, deco, true);
        from = enclosed.end_pos();
    }
}

/// Replace runs of exactly one decoration kind with delimiter markup.
///
/// Exactly one of the four selection flags must be set; anything else
/// is rejected before the document is touched.
pub fn replace_decoration_with_markup(
    doc: &mut ScriptDocument,
    markup: &MarkupTags,
    bold: bool,
    italic: bool,
    underline: bool,
    strikeout: bool,
) -> Result<(), MarkupError> {
    let selected = [bold, italic, underline, strikeout]
        .iter()
        .filter(|&&f| f)
        .count();
    if selected != 1 {
        return Err(MarkupError::WrongDecorationCount(selected));
    }

    let (deco, tag) = if bold {
        (Decoration::Bold, markup.bold_tag.as_str())
    } else if italic {
        (Decoration::Italic, markup.italic_tag.as_str())
    } else if underline {
        (Decoration::Underline, markup.underline_tag.as_str())
    } else {
        (Decoration::Strikeout, markup.strikethrough_tag.as_str())
    };

    let mut from = DocPos::start();
    while let Some(run) = doc.find_next_decorated_run(deco, from) {
        let replacement = format!("{}{}{}", tag, doc.span_text(run), tag);
        doc.replace_range(run, &replacement);

        let wrapped = DocSpan::new(run.para, run.start, run.start + replacement.len());
        doc.set_decoration(wrapped, deco, false);
        from = wrapped.end_pos();
    }
    Ok(())
}

/// Drop the inline direction character style from dialogue lines
fn unformat_inline_directions(doc: &mut ScriptDocument) {
    for i in 0..doc.para_count() {
        if doc.paragraph(i).style != ParaStyle::Line {
            continue;
        }
        let text = doc.paragraph(i).text.clone();
        for m in INLINE_DIRECTION_REGEX.find_iter(&text) {
            doc.set_char_style(DocSpan::new(i, m.start(), m.end()), CharStyle::Default);
        }
    }
}

/// Turn block direction paragraphs back into prefixed default ones
fn unformat_stage_direction_blocks(doc: &mut ScriptDocument, tag: &str) {
    for i in 0..doc.para_count() {
        if doc.paragraph(i).style != ParaStyle::StageDirectionBlock {
            continue;
        }
        doc.insert_text(DocPos::new(i, 0), tag);
        doc.set_style(i, ParaStyle::Default);
    }
}

/// Turn overline direction paragraphs back into `[[...]] ` prefixes on
/// the line below them.
fn unformat_overline_directions(doc: &mut ScriptDocument, markup: &MarkupTags) {
    let mut from_para = 0;
    while let Some(span) = doc.find_next_styled(ParaStyle::StageDirectionOverline, from_para) {
        let para = span.para;
        let inner = strip_parentheses(doc.span_text(span));
        let replacement = format!("{}{}{} ", markup.overline_open, inner, markup.overline_close);

        doc.replace_range(DocSpan::new(para, 0, span.end), &replacement);
        doc.join_with_next(para, "");
        doc.set_style(para, ParaStyle::Default);

        from_para = para + 1;
    }
}

/// Prefix manually indented paragraphs as block directions. Catches
/// directions the author indented by margin instead of using the
/// prefix or the block style.
fn unformat_manual_block_directions(doc: &mut ScriptDocument, tag: &str) {
    for i in 0..doc.para_count() {
        let para = doc.paragraph(i);
        if para.style == ParaStyle::StageDirectionBlock
            || para.text.is_empty()
            || para.left_margin < MANUAL_DIRECTION_MARGIN
        {
            continue;
        }
        doc.insert_text(DocPos::new(i, 0), tag);
        doc.set_style(i, ParaStyle::Default);
        doc.set_left_margin(i, 0);
    }
}

/// Turn centered block paragraphs back into prefixed default ones
fn unformat_centered_text(doc: &mut ScriptDocument, tag: &str) {
    for i in 0..doc.para_count() {
        if doc.paragraph(i).style != ParaStyle::CenteredBlock {
            continue;
        }
        doc.insert_text(DocPos::new(i, 0), tag);
        doc.set_style(i, ParaStyle::Default);
    }
}

/// Replace slug paragraphs with their tags and pull the speech back up
/// onto the tag's line.
fn replace_slug_with_tag(doc: &mut ScriptDocument, registry: &TagRegistry) {
    let pairs: Vec<(String, String)> = registry
        .entries()
        .map(|(s, t)| (s.to_string(), t.to_string()))
        .collect();

    let mut i = 0;
    while i < doc.para_count() {
        let text = doc.paragraph(i).text.trim().to_string();
        let matched = pairs
            .iter()
            .find(|(slug, _)| text.eq_ignore_ascii_case(slug))
            .map(|(_, tag)| tag.clone());

        if let Some(tag) = matched {
            let len = doc.paragraph(i).text.len();
            doc.replace_range(DocSpan::new(i, 0, len), &tag);
            doc.join_with_next(i, "");
            doc.set_style(i, ParaStyle::Default);
        }
        i += 1;
    }
}

/// Fold `NAME (CONT'D)` slug paragraphs back into the speech they
/// continue: the slug and the page-break padding around it are removed
/// and the two speech halves are rejoined with a space.
pub fn collapse_contd_slugs(doc: &mut ScriptDocument) {
    let mut i = 0;
    while i < doc.para_count() {
        let para = doc.paragraph(i);
        if para.style != ParaStyle::CharacterName || !CONTD_REGEX.is_match(&para.text) {
            i += 1;
            continue;
        }

        let len = para.text.len();
        doc.replace_range(DocSpan::new(i, 0, len), "");
        doc.join_with_next(i, "");

        if i > 0 {
            let prev_empty = doc.paragraph(i - 1).text.is_empty();
            doc.join_with_next(i - 1, "");
            if prev_empty && i >= 2 {
                doc.join_with_next(i - 2, " ");
            }
        }
        // The joins pulled following paragraphs up by as many as three
        // indices; back up so a continuation slug that landed before
        // this index is still seen.
        i = i.saturating_sub(2);
    }
}

fn starts_with_ignore_ascii_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}
