use std::io::{self, BufRead, Write};
use anyhow::Result;
use log::{info, warn};

use crate::document::{DocPos, ScriptDocument};
use crate::registry::TagRegistry;
use crate::scanner::{BARE_SLUG_REGEX, UNKNOWN_TAG_REGEX};

// @module: Resolution of unregistered tags and slugs
//
// Scans the document for tag-shaped or slug-shaped paragraphs the
// registry does not know, and asks a prompt implementation what to do
// with each. The scan mutates nothing in the document; accepted pairs
// are appended to the registry and persisted once at the end.

/// Decision for one unregistered candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverChoice {
    /// Register the candidate with a paired value
    Accept,
    /// Leave this candidate alone and keep scanning
    Skip,
    /// Stop scanning entirely
    Abort,
}

/// Something found in the document that the registry does not know
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// A tag-shaped span in wrapped form, e.g. `/JN/ `
    UnknownTag { tag: String },
    /// A slug-shaped paragraph, e.g. `JOHN`
    UnknownSlug { slug: String },
}

/// Decision source for resolution runs. The console implementation
/// asks the user; tests script the answers.
pub trait ResolverPrompt {
    /// Decide what to do with a candidate
    fn resolve_candidate(&mut self, candidate: &Candidate) -> ResolverChoice;

    /// The paired value for an accepted candidate: the slug for an
    /// unknown tag, the bare tag code for an unknown slug. None or
    /// empty means skip after all.
    fn paired_value(&mut self, candidate: &Candidate) -> Option<String>;

    /// Report that the paired value is already registered
    fn warn_duplicate(&mut self, value: &str);
}

/// Walk the document for tag-shaped spans the registry does not know
/// and offer each to the prompt. Returns whether the registry changed.
pub fn resolve_unknown_tags(
    doc: &ScriptDocument,
    registry: &mut TagRegistry,
    prompt: &mut dyn ResolverPrompt,
) -> Result<bool> {
    registry.ensure_loaded();

    let mut changed = false;
    let mut from = DocPos::start();

    while let Some(span) = doc.find_next_regex(&UNKNOWN_TAG_REGEX, from) {
        let tag = doc.span_text(span).to_string();
        from = DocPos::new(span.para + 1, 0);

        if registry.tag_exists(&tag) {
            continue;
        }

        let candidate = Candidate::UnknownTag { tag: tag.clone() };
        match prompt.resolve_candidate(&candidate) {
            ResolverChoice::Abort => break,
            ResolverChoice::Skip => continue,
            ResolverChoice::Accept => {}
        }

        let Some(slug) = prompt.paired_value(&candidate) else {
            continue;
        };
        let slug = slug.trim().to_uppercase();
        if slug.is_empty() {
            continue;
        }
        if registry.slug_exists(&slug) {
            prompt.warn_duplicate(&slug);
            continue;
        }

        info!("Registering tag {} as {}", tag.trim(), slug);
        registry.add_entry(slug, tag);
        changed = true;
    }

    if changed && !registry.save() {
        warn!("Registry changes could not be persisted");
    }
    Ok(changed)
}

/// Walk the document for slug-shaped paragraphs the registry does not
/// know and offer each to the prompt. The paired value is the bare tag
/// code, stored in wrapped form. Returns whether the registry changed.
pub fn resolve_unknown_slugs(
    doc: &ScriptDocument,
    registry: &mut TagRegistry,
    prompt: &mut dyn ResolverPrompt,
) -> Result<bool> {
    registry.ensure_loaded();

    let mut changed = false;

    for (i, para) in doc.paragraphs().iter().enumerate() {
        let text = para.text.trim();
        if text.is_empty() || !BARE_SLUG_REGEX.is_match(text) {
            continue;
        }

        let slug = text.to_uppercase();
        if registry.slug_exists(&slug) {
            continue;
        }

        let candidate = Candidate::UnknownSlug { slug: slug.clone() };
        match prompt.resolve_candidate(&candidate) {
            ResolverChoice::Abort => break,
            ResolverChoice::Skip => continue,
            ResolverChoice::Accept => {}
        }

        let Some(code) = prompt.paired_value(&candidate) else {
            continue;
        };
        let code = code.trim().to_string();
        if code.is_empty() {
            continue;
        }
        let tag = TagRegistry::wrap_tag(&code);
        if registry.tag_exists(&tag) {
            prompt.warn_duplicate(&tag);
            continue;
        }

        info!("Registering slug {} (paragraph {}) as {}", slug, i, tag.trim());
        registry.add_entry(slug, tag);
        changed = true;
    }

    if changed && !registry.save() {
        warn!("Registry changes could not be persisted");
    }
    Ok(changed)
}

/// Interactive prompt reading decisions from stdin
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!("Failed to read from stdin: {}", e);
                None
            }
        }
    }
}

impl ResolverPrompt for ConsolePrompt {
    fn resolve_candidate(&mut self, candidate: &Candidate) -> ResolverChoice {
        match candidate {
            Candidate::UnknownTag { tag } => {
                print!("Unknown tag {} found. Register it? [y/N/q] ", tag.trim());
            }
            Candidate::UnknownSlug { slug } => {
                print!("Unknown character {} found. Register it? [y/N/q] ", slug);
            }
        }
        let _ = io::stdout().flush();

        match self.read_line().as_deref() {
            Some("y") | Some("Y") => ResolverChoice::Accept,
            Some("q") | Some("Q") | None => ResolverChoice::Abort,
            _ => ResolverChoice::Skip,
        }
    }

    fn paired_value(&mut self, candidate: &Candidate) -> Option<String> {
        match candidate {
            Candidate::UnknownTag { tag } => {
                print!("Character name for tag {}: ", tag.trim());
            }
            Candidate::UnknownSlug { slug } => {
                print!("Tag code for character {}: ", slug);
            }
        }
        let _ = io::stdout().flush();
        self.read_line().filter(|v| !v.is_empty())
    }

    fn warn_duplicate(&mut self, value: &str) {
        println!("{} is already registered, skipping", value);
    }
}

/// Non-interactive prompt that skips every candidate. Used when
/// formatting runs unattended.
#[derive(Debug, Default)]
pub struct AutoSkipPrompt;

impl ResolverPrompt for AutoSkipPrompt {
    fn resolve_candidate(&mut self, _candidate: &Candidate) -> ResolverChoice {
        ResolverChoice::Skip
    }

    fn paired_value(&mut self, _candidate: &Candidate) -> Option<String> {
        None
    }

    fn warn_duplicate(&mut self, _value: &str) {}
}
