/*!
 * Common test utilities for the playmark test suite
 */

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use playmark::document::{PageLayout, ParaStyle, Paragraph, ScriptDocument};
use playmark::registry::TagRegistry;
use playmark::resolver::{Candidate, ResolverChoice, ResolverPrompt};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a registry backed by a file holding the given entries
pub fn registry_with(dir: &Path, entries: &[(&str, &str)]) -> Result<TagRegistry> {
    let mut content = String::new();
    for (slug, code) in entries {
        content.push_str(&format!("{},{}\n", slug, code));
    }
    let path = create_test_file(dir, "tags.txt", &content)?;
    Ok(TagRegistry::new(path))
}

/// Builds a paragraph with the given style
pub fn para(style: ParaStyle, text: &str) -> Paragraph {
    Paragraph::new(style, text)
}

/// Builds a document with the default page geometry
pub fn doc_from(paragraphs: Vec<Paragraph>) -> ScriptDocument {
    ScriptDocument::from_paragraphs(paragraphs, PageLayout::default())
}

/// Prompt with pre-scripted answers for resolver tests
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    choices: VecDeque<ResolverChoice>,
    values: VecDeque<Option<String>>,
    pending: Option<String>,
    pub seen: Vec<Candidate>,
    pub duplicates: Vec<String>,
}

impl ScriptedPrompt {
    /// Script one decision and, for accepts, its paired value
    pub fn then(mut self, choice: ResolverChoice, value: Option<&str>) -> Self {
        self.choices.push_back(choice);
        self.values.push_back(value.map(str::to_string));
        self
    }
}

impl ResolverPrompt for ScriptedPrompt {
    fn resolve_candidate(&mut self, candidate: &Candidate) -> ResolverChoice {
        self.seen.push(candidate.clone());
        self.pending = self.values.pop_front().flatten();
        self.choices.pop_front().unwrap_or(ResolverChoice::Skip)
    }

    fn paired_value(&mut self, _candidate: &Candidate) -> Option<String> {
        self.pending.take()
    }

    fn warn_duplicate(&mut self, value: &str) {
        self.duplicates.push(value.to_string());
    }
}
