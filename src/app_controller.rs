/*!
 * Application controller for playmark.
 *
 * Wires the conversion passes to files on disk: plain marked-up text
 * on one side, the styled document serialized as JSON on the other.
 * Each entry point maps to one CLI subcommand.
 */

use std::path::{Path, PathBuf};
use std::process::Command;
use anyhow::{anyhow, Context, Result};
use log::info;

use crate::app_config::Config;
use crate::converter;
use crate::document::ScriptDocument;
use crate::file_utils::FileManager;
use crate::highlighter;
use crate::registry::TagRegistry;
use crate::resolver::{AutoSkipPrompt, ConsolePrompt, ResolverPrompt};
use crate::splitter;

/// Default extension of styled-document output files
const STYLED_EXTENSION: &str = "play.json";

/// Default extension of stripped plain-text output files
const PLAIN_EXTENSION: &str = "play.txt";

/// Derive a default output path next to the input.
///
/// A `.play` marker already present in the stem is replaced rather
/// than stacked, so `script.play.json` strips to `script.play.txt`
/// instead of `script.play.play.txt`.
fn derive_output_path(input: &Path, extension: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    match stem.strip_suffix(".play") {
        Some(base) if !base.is_empty() => {
            input.with_file_name(format!("{}.{}", base, extension))
        }
        _ => FileManager::generate_output_path(input, extension),
    }
}

/// Highlighting variants selectable from the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightMode {
    /// Remove all highlighting
    Clear,
    /// Highlight block stage directions only
    StageDirections,
    /// Highlight one character's speeches
    Character(String),
}

/// Orchestrates the conversion workflows over files
pub struct Controller {
    config: Config,
}

impl Controller {
    /// Create a controller with the given configuration
    pub fn new(config: Config) -> Self {
        Controller { config }
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn registry(&self) -> TagRegistry {
        TagRegistry::new(&self.config.registry_file)
    }

    fn load_styled(&self, path: &Path) -> Result<ScriptDocument> {
        let content = FileManager::read_to_string(path)?;
        let mut doc: ScriptDocument = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse styled document: {:?}", path))?;
        doc.page = self.config.page_layout();
        Ok(doc)
    }

    fn save_styled(&self, doc: &ScriptDocument, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(doc).context("Failed to serialize styled document")?;
        FileManager::write_to_file(path, &content)
    }

    /// Convert a marked-up plain-text script into a styled document.
    ///
    /// With `interactive` set, unknown tags are offered on the console
    /// for registration; otherwise they are left in place.
    pub fn run_apply(
        &self,
        input: &Path,
        output: Option<PathBuf>,
        interactive: bool,
    ) -> Result<PathBuf> {
        let text = FileManager::read_to_string(input)?;
        let mut doc = ScriptDocument::from_plain_text(&text, self.config.page_layout());
        let mut registry = self.registry();

        let mut console = ConsolePrompt;
        let mut auto = AutoSkipPrompt;
        let prompt: &mut dyn ResolverPrompt =
            if interactive { &mut console } else { &mut auto };

        converter::apply_formatting(&mut doc, &mut registry, &self.config.markup, prompt)?;

        let output = output.unwrap_or_else(|| derive_output_path(input, STYLED_EXTENSION));
        self.save_styled(&doc, &output)?;
        info!("Wrote styled document to {:?}", output);
        Ok(output)
    }

    /// Convert a styled document back into marked-up plain text
    pub fn run_strip(&self, input: &Path, output: Option<PathBuf>) -> Result<PathBuf> {
        let mut doc = self.load_styled(input)?;
        let mut registry = self.registry();

        converter::strip_formatting(&mut doc, &mut registry, &self.config.markup)?;

        let output = output.unwrap_or_else(|| derive_output_path(input, PLAIN_EXTENSION));
        let mut text = doc.to_plain_text();
        text.push('\n');
        FileManager::write_to_file(&output, &text)?;
        info!("Wrote plain text to {:?}", output);
        Ok(output)
    }

    /// Split long speeches in a styled document. Rewrites the input
    /// file in place unless an output path is given.
    pub fn run_split(&self, input: &Path, output: Option<PathBuf>) -> Result<PathBuf> {
        let mut doc = self.load_styled(input)?;
        splitter::break_up_long_speeches(&mut doc);

        let output = output.unwrap_or_else(|| input.to_path_buf());
        self.save_styled(&doc, &output)?;
        info!("Wrote split document to {:?}", output);
        Ok(output)
    }

    /// Apply a highlighting variant to a styled document. Rewrites the
    /// input file in place unless an output path is given.
    pub fn run_highlight(
        &self,
        input: &Path,
        output: Option<PathBuf>,
        mode: &HighlightMode,
    ) -> Result<PathBuf> {
        let mut doc = self.load_styled(input)?;

        match mode {
            HighlightMode::Clear => highlighter::clear_highlights(&mut doc),
            HighlightMode::StageDirections => highlighter::highlight_stage_directions(&mut doc),
            HighlightMode::Character(name) => highlighter::highlight_character(&mut doc, name),
        }

        let output = output.unwrap_or_else(|| input.to_path_buf());
        self.save_styled(&doc, &output)?;
        info!("Wrote highlighted document to {:?}", output);
        Ok(output)
    }

    /// Character slugs known to the registry, for prompt listings
    pub fn registry_slugs(&self) -> Vec<String> {
        let mut registry = self.registry();
        registry.ensure_loaded();
        registry.slugs().to_vec()
    }

    /// Human-readable listing of the tag registry
    pub fn run_list_registry(&self) -> Result<String> {
        let mut registry = self.registry();
        registry.ensure_loaded();
        Ok(registry.table_display())
    }

    /// Open the registry file in the user's editor
    pub fn run_edit_registry(&self) -> Result<()> {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
        let path = &self.config.registry_file;

        info!("Opening {} with {}", path, editor);
        let status = Command::new(&editor)
            .arg(path)
            .status()
            .with_context(|| format!("Failed to launch editor: {}", editor))?;

        if !status.success() {
            return Err(anyhow!("Editor exited with status {}", status));
        }
        Ok(())
    }
}
