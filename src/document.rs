use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use regex::Regex;
use serde::{Deserialize, Serialize};

// @module: In-memory styled document model
//
// Stands in for the host word-processor document: linear text with
// paragraph boundaries, a mutable style name and left margin per
// paragraph, character-level decoration over spans, forward search,
// and visual-line/page queries under a configured page geometry.
//
// Spans returned by the search methods are valid only until the next
// mutation; callers re-run their search after every edit rather than
// reusing stale positions.

/// Left margin threshold (1/100 mm) above which a paragraph is treated
/// as a manually indented stage direction when stripping formatting.
pub const MANUAL_DIRECTION_MARGIN: i32 = 5080;

/// Closed set of paragraph roles recognized by the conversion passes.
/// No other role is ever assigned or matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ParaStyle {
    /// The document's default paragraph style
    #[default]
    Default,
    /// A character slug above a speech
    CharacterName,
    /// A line of dialogue
    Line,
    /// A parenthesized direction above a resumed line
    StageDirectionOverline,
    /// A block stage direction paragraph
    StageDirectionBlock,
    /// A centered block (act/scene headings)
    CenteredBlock,
}

/// Character style applied over runs within a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CharStyle {
    /// No character style
    #[default]
    Default,
    /// Inline parenthetical stage direction within a dialogue line
    StageDirectionInline,
}

/// Character-run decoration kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    Bold,
    Italic,
    Underline,
    Strikeout,
}

/// Per-character formatting flags. Held per byte of paragraph text;
/// edits always happen at character boundaries so the bytes of one
/// character never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CharAttrs {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strikeout: bool,
    #[serde(default)]
    pub style: CharStyle,
}

impl CharAttrs {
    /// Read one decoration flag
    pub fn has(&self, deco: Decoration) -> bool {
        match deco {
            Decoration::Bold => self.bold,
            Decoration::Italic => self.italic,
            Decoration::Underline => self.underline,
            Decoration::Strikeout => self.strikeout,
        }
    }

    fn set(&mut self, deco: Decoration, on: bool) {
        match deco {
            Decoration::Bold => self.bold = on,
            Decoration::Italic => self.italic = on,
            Decoration::Underline => self.underline = on,
            Decoration::Strikeout => self.strikeout = on,
        }
    }
}

/// A position in the document: paragraph index plus byte offset into
/// that paragraph's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocPos {
    pub para: usize,
    pub ch: usize,
}

impl DocPos {
    pub fn start() -> Self {
        DocPos { para: 0, ch: 0 }
    }

    pub fn new(para: usize, ch: usize) -> Self {
        DocPos { para, ch }
    }
}

/// A contiguous span within one paragraph, as returned by the search
/// methods. Byte offsets into the paragraph text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocSpan {
    pub para: usize,
    pub start: usize,
    pub end: usize,
}

impl DocSpan {
    pub fn new(para: usize, start: usize, end: usize) -> Self {
        DocSpan { para, start, end }
    }

    /// Position just past the end of the span
    pub fn end_pos(&self) -> DocPos {
        DocPos::new(self.para, self.end)
    }
}

/// Page geometry used for visual-line and page-number queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Characters per visual line before wrapping
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,

    /// Visual lines per page
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,
}

fn default_wrap_width() -> usize {
    60
}

fn default_lines_per_page() -> usize {
    46
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            wrap_width: default_wrap_width(),
            lines_per_page: default_lines_per_page(),
        }
    }
}

/// One paragraph of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParagraphRepr", into = "ParagraphRepr")]
pub struct Paragraph {
    /// Paragraph style, the authoritative classification of its role
    pub style: ParaStyle,

    /// Paragraph text, without the terminating paragraph break
    pub text: String,

    /// Left margin in 1/100 mm
    pub left_margin: i32,

    /// Background highlight color (RGB), None for transparent
    pub highlight: Option<u32>,

    /// Per-byte character formatting, parallel to `text`
    attrs: Vec<CharAttrs>,
}

impl Paragraph {
    pub fn new<S: Into<String>>(style: ParaStyle, text: S) -> Self {
        let text = text.into();
        let attrs = vec![CharAttrs::default(); text.len()];
        Paragraph {
            style,
            text,
            left_margin: 0,
            highlight: None,
            attrs,
        }
    }

    /// Formatting flags at a byte offset
    pub fn attrs_at(&self, offset: usize) -> CharAttrs {
        self.attrs.get(offset).copied().unwrap_or_default()
    }
}

/// Serialized form of a paragraph: character formatting run-length
/// encoded instead of stored per byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ParagraphRepr {
    style: ParaStyle,
    text: String,
    #[serde(default)]
    left_margin: i32,
    #[serde(default)]
    highlight: Option<u32>,
    #[serde(default)]
    runs: Vec<AttrRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AttrRun {
    start: usize,
    end: usize,
    attrs: CharAttrs,
}

impl From<Paragraph> for ParagraphRepr {
    fn from(p: Paragraph) -> Self {
        let mut runs = Vec::new();
        let mut i = 0;
        while i < p.attrs.len() {
            let attrs = p.attrs[i];
            let mut j = i + 1;
            while j < p.attrs.len() && p.attrs[j] == attrs {
                j += 1;
            }
            if attrs != CharAttrs::default() {
                runs.push(AttrRun { start: i, end: j, attrs });
            }
            i = j;
        }

        ParagraphRepr {
            style: p.style,
            text: p.text,
            left_margin: p.left_margin,
            highlight: p.highlight,
            runs,
        }
    }
}

impl From<ParagraphRepr> for Paragraph {
    fn from(r: ParagraphRepr) -> Self {
        let mut attrs = vec![CharAttrs::default(); r.text.len()];
        for run in &r.runs {
            let start = run.start.min(attrs.len());
            let end = run.end.min(attrs.len());
            for a in &mut attrs[start..end] {
                *a = run.attrs;
            }
        }

        Paragraph {
            style: r.style,
            text: r.text,
            left_margin: r.left_margin,
            highlight: r.highlight,
            attrs,
        }
    }
}

/// One wrapped visual line: paragraph index and byte range
#[derive(Debug, Clone, Copy)]
struct VisualLine {
    para: usize,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, Default)]
struct Layout {
    lines: Vec<VisualLine>,
}

/// The in-memory styled document
#[derive(Debug, Serialize, Deserialize)]
pub struct ScriptDocument {
    /// Page geometry for layout queries
    pub page: PageLayout,

    paragraphs: Vec<Paragraph>,

    #[serde(skip)]
    revision: u64,

    #[serde(skip)]
    batch_depth: u32,

    #[serde(skip)]
    layout_cache: RefCell<Option<Layout>>,
}

impl Clone for ScriptDocument {
    fn clone(&self) -> Self {
        ScriptDocument {
            page: self.page,
            paragraphs: self.paragraphs.clone(),
            revision: self.revision,
            batch_depth: 0,
            layout_cache: RefCell::new(None),
        }
    }
}

impl PartialEq for ScriptDocument {
    fn eq(&self, other: &Self) -> bool {
        self.page == other.page && self.paragraphs == other.paragraphs
    }
}

impl ScriptDocument {
    /// Create a document from paragraphs
    pub fn from_paragraphs(paragraphs: Vec<Paragraph>, page: PageLayout) -> Self {
        ScriptDocument {
            page,
            paragraphs,
            revision: 0,
            batch_depth: 0,
            layout_cache: RefCell::new(None),
        }
    }

    /// Build a document from plain text: one paragraph per line, all
    /// default style.
    pub fn from_plain_text(text: &str, page: PageLayout) -> Self {
        let paragraphs = text
            .split('\n')
            .map(|line| Paragraph::new(ParaStyle::Default, line.trim_end_matches('\r')))
            .collect();
        Self::from_paragraphs(paragraphs, page)
    }

    /// Render the document back to plain text, one line per paragraph
    pub fn to_plain_text(&self) -> String {
        let texts: Vec<&str> = self.paragraphs.iter().map(|p| p.text.as_str()).collect();
        texts.join("\n")
    }

    /// Number of paragraphs
    pub fn para_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Borrow a paragraph
    pub fn paragraph(&self, index: usize) -> &Paragraph {
        &self.paragraphs[index]
    }

    /// All paragraphs in order
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Text of a span
    pub fn span_text(&self, span: DocSpan) -> &str {
        &self.paragraphs[span.para].text[span.start..span.end]
    }

    /// Monotonic edit counter, bumped on every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- mutation -------------------------------------------------------

    /// Mark a text mutation. Outside a batch update the visual layout
    /// is rebuilt eagerly, emulating the host's live re-layout;
    /// batching defers the rebuild until the next query.
    fn touch_text(&mut self) {
        self.revision += 1;
        *self.layout_cache.borrow_mut() = None;
        if self.batch_depth == 0 {
            self.with_layout(|_| {});
        }
    }

    /// Mark a metadata mutation (style, margin, highlight); these do
    /// not move text so the layout survives.
    fn touch_meta(&mut self) {
        self.revision += 1;
    }

    /// Set a paragraph's style
    pub fn set_style(&mut self, index: usize, style: ParaStyle) {
        self.paragraphs[index].style = style;
        self.touch_meta();
    }

    /// Set a paragraph's left margin (1/100 mm)
    pub fn set_left_margin(&mut self, index: usize, margin: i32) {
        self.paragraphs[index].left_margin = margin;
        self.touch_meta();
    }

    /// Set or clear a paragraph's background highlight
    pub fn set_highlight(&mut self, index: usize, color: Option<u32>) {
        self.paragraphs[index].highlight = color;
        self.touch_meta();
    }

    /// Replace the text of a span. The replacement inherits the
    /// formatting of the first replaced character (or of the character
    /// before a pure insertion point), matching host editor behavior.
    pub fn replace_range(&mut self, span: DocSpan, replacement: &str) {
        let para = &mut self.paragraphs[span.para];
        let inherit = if span.end > span.start {
            para.attrs.get(span.start).copied().unwrap_or_default()
        } else if span.start > 0 {
            para.attrs.get(span.start - 1).copied().unwrap_or_default()
        } else {
            CharAttrs::default()
        };

        para.text.replace_range(span.start..span.end, replacement);
        para.attrs.splice(
            span.start..span.end,
            std::iter::repeat(inherit).take(replacement.len()),
        );
        self.touch_text();
    }

    /// Insert text at a position
    pub fn insert_text(&mut self, pos: DocPos, text: &str) {
        self.replace_range(DocSpan::new(pos.para, pos.ch, pos.ch), text);
    }

    /// Insert a paragraph break at a position. The new paragraph
    /// inherits style, margin and highlight from the one it was split
    /// from.
    pub fn split_paragraph(&mut self, pos: DocPos) {
        let para = &mut self.paragraphs[pos.para];
        let tail_text = para.text.split_off(pos.ch);
        let tail_attrs = para.attrs.split_off(pos.ch);

        let tail = Paragraph {
            style: para.style,
            text: tail_text,
            left_margin: para.left_margin,
            highlight: para.highlight,
            attrs: tail_attrs,
        };
        self.paragraphs.insert(pos.para + 1, tail);
        self.touch_text();
    }

    /// Delete the paragraph break after `index`, merging the next
    /// paragraph into it with `separator` between the two texts. The
    /// merged paragraph keeps the first paragraph's style.
    pub fn join_with_next(&mut self, index: usize, separator: &str) {
        if index + 1 >= self.paragraphs.len() {
            return;
        }
        let next = self.paragraphs.remove(index + 1);
        let para = &mut self.paragraphs[index];
        para.text.push_str(separator);
        para.attrs
            .extend(std::iter::repeat(CharAttrs::default()).take(separator.len()));
        para.text.push_str(&next.text);
        para.attrs.extend(next.attrs);
        self.touch_text();
    }

    /// Turn one decoration flag on or off over a span
    pub fn set_decoration(&mut self, span: DocSpan, deco: Decoration, on: bool) {
        let para = &mut self.paragraphs[span.para];
        let end = span.end.min(para.attrs.len());
        for a in &mut para.attrs[span.start..end] {
            a.set(deco, on);
        }
        self.touch_meta();
    }

    /// Set the character style over a span
    pub fn set_char_style(&mut self, span: DocSpan, style: CharStyle) {
        let para = &mut self.paragraphs[span.para];
        let end = span.end.min(para.attrs.len());
        for a in &mut para.attrs[span.start..end] {
            a.style = style;
        }
        self.touch_meta();
    }

    // --- search ---------------------------------------------------------
    //
    // All searches run forward from `from` in document order and return
    // the first match. Results are positions into the current text and
    // are invalidated by any mutation.

    /// Find the next literal occurrence of `needle`
    pub fn find_next_literal(
        &self,
        needle: &str,
        case_sensitive: bool,
        from: DocPos,
    ) -> Option<DocSpan> {
        if needle.is_empty() {
            return None;
        }
        for (i, para) in self.paragraphs.iter().enumerate().skip(from.para) {
            let offset = if i == from.para { from.ch } else { 0 };
            if offset > para.text.len() {
                continue;
            }
            let hay = &para.text[offset..];
            let found = if case_sensitive {
                hay.find(needle)
            } else {
                find_ignore_ascii_case(hay, needle)
            };
            if let Some(rel) = found {
                let start = offset + rel;
                return Some(DocSpan::new(i, start, start + needle.len()));
            }
        }
        None
    }

    /// Find the next regex match. Patterns anchored with `^`/`$` bind
    /// to paragraph boundaries, as in the host's paragraph-scoped
    /// search.
    pub fn find_next_regex(&self, re: &Regex, from: DocPos) -> Option<DocSpan> {
        for (i, para) in self.paragraphs.iter().enumerate().skip(from.para) {
            let offset = if i == from.para { from.ch } else { 0 };
            if offset > para.text.len() {
                continue;
            }
            if let Some(m) = re.find_at(&para.text, offset) {
                return Some(DocSpan::new(i, m.start(), m.end()));
            }
        }
        None
    }

    /// Find the next paragraph with the given style, starting at
    /// paragraph `from_para`. Returns the whole paragraph as a span.
    pub fn find_next_styled(&self, style: ParaStyle, from_para: usize) -> Option<DocSpan> {
        self.paragraphs
            .iter()
            .enumerate()
            .skip(from_para)
            .find(|(_, p)| p.style == style)
            .map(|(i, p)| DocSpan::new(i, 0, p.text.len()))
    }

    /// Find the next maximal run of characters carrying the given
    /// decoration flag.
    pub fn find_next_decorated_run(&self, deco: Decoration, from: DocPos) -> Option<DocSpan> {
        for (i, para) in self.paragraphs.iter().enumerate().skip(from.para) {
            let offset = if i == from.para { from.ch } else { 0 };
            if offset >= para.attrs.len() {
                continue;
            }
            let start = (offset..para.attrs.len()).find(|&b| para.attrs[b].has(deco));
            if let Some(start) = start {
                let mut end = start;
                while end < para.attrs.len() && para.attrs[end].has(deco) {
                    end += 1;
                }
                return Some(DocSpan::new(i, start, end));
            }
        }
        None
    }

    // --- layout ---------------------------------------------------------

    fn with_layout<R>(&self, f: impl FnOnce(&Layout) -> R) -> R {
        let mut cache = self.layout_cache.borrow_mut();
        let layout = cache.get_or_insert_with(|| self.compute_layout());
        f(layout)
    }

    fn compute_layout(&self) -> Layout {
        let width = self.page.wrap_width.max(1);
        let mut lines = Vec::new();
        for (i, para) in self.paragraphs.iter().enumerate() {
            for (start, end) in wrap_ranges(&para.text, width) {
                lines.push(VisualLine { para: i, start, end });
            }
        }
        Layout { lines }
    }

    /// Total number of visual lines
    pub fn line_count(&self) -> usize {
        self.with_layout(|l| l.lines.len())
    }

    /// Number of visual lines a paragraph occupies
    pub fn para_line_count(&self, index: usize) -> usize {
        self.with_layout(|l| l.lines.iter().filter(|line| line.para == index).count())
    }

    /// Global visual-line index containing a position
    pub fn line_index_of(&self, pos: DocPos) -> usize {
        self.with_layout(|l| {
            let mut last_of_para = 0;
            for (idx, line) in l.lines.iter().enumerate() {
                if line.para == pos.para {
                    last_of_para = idx;
                    if pos.ch >= line.start && pos.ch < line.end {
                        return idx;
                    }
                }
            }
            last_of_para
        })
    }

    /// Span of a global visual line
    pub fn line_span(&self, line_index: usize) -> Option<DocSpan> {
        self.with_layout(|l| {
            l.lines
                .get(line_index)
                .map(|line| DocSpan::new(line.para, line.start, line.end))
        })
    }

    /// Zero-based visual line number of a position on its page
    pub fn line_on_page(&self, pos: DocPos) -> usize {
        self.line_index_of(pos) % self.page.lines_per_page
    }

    /// One-based page number of a position
    pub fn page_number(&self, pos: DocPos) -> usize {
        self.line_index_of(pos) / self.page.lines_per_page + 1
    }

    // --- batch updates --------------------------------------------------

    /// Enter a scoped batch update. While the guard lives, per-edit
    /// re-layout is suppressed; the guard releases unconditionally on
    /// drop.
    pub fn begin_batch(&mut self) -> BatchGuard<'_> {
        self.batch_depth += 1;
        BatchGuard { doc: self }
    }
}

/// Scoped batch-update lock over a document
pub struct BatchGuard<'a> {
    doc: &'a mut ScriptDocument,
}

impl Deref for BatchGuard<'_> {
    type Target = ScriptDocument;

    fn deref(&self) -> &ScriptDocument {
        self.doc
    }
}

impl DerefMut for BatchGuard<'_> {
    fn deref_mut(&mut self) -> &mut ScriptDocument {
        self.doc
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.doc.batch_depth = self.doc.batch_depth.saturating_sub(1);
    }
}

/// Case-insensitive (ASCII) substring search returning a byte offset
fn find_ignore_ascii_case(hay: &str, needle: &str) -> Option<usize> {
    let n = needle.len();
    if n > hay.len() {
        return None;
    }
    let hb = hay.as_bytes();
    let nb = needle.as_bytes();
    (0..=hay.len() - n)
        .find(|&i| hay.is_char_boundary(i) && hb[i..i + n].eq_ignore_ascii_case(nb))
}

/// Greedy word wrap: byte ranges of the visual lines of `text` at
/// `width` characters. The ranges are contiguous and cover the whole
/// text; an empty paragraph still occupies one line.
fn wrap_ranges(text: &str, width: usize) -> Vec<(usize, usize)> {
    if text.is_empty() {
        return vec![(0, 0)];
    }

    let mut lines = Vec::new();
    let mut line_start = 0usize;
    let mut count = 0usize;
    // Byte offset just past the last whitespace on the current line,
    // with the character count consumed up to it
    let mut break_at: Option<(usize, usize)> = None;

    for (bi, ch) in text.char_indices() {
        count += 1;
        if ch.is_whitespace() {
            break_at = Some((bi + ch.len_utf8(), count));
        }
        if count > width {
            match break_at {
                Some((b, c)) if b > line_start => {
                    lines.push((line_start, b));
                    line_start = b;
                    count -= c;
                }
                _ => {
                    // Unbreakable run longer than the line: hard break
                    lines.push((line_start, bi));
                    line_start = bi;
                    count = 1;
                }
            }
            break_at = None;
        }
    }
    lines.push((line_start, text.len()));
    lines
}
