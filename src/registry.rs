use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, warn};

// @module: Character slug/tag registry with file persistence

/// Persistent mapping between character slugs (canonical names) and
/// short markup tags.
///
/// Slugs and tags are held as parallel lists with 1:1 index
/// correspondence, mirroring the on-disk order. A slug is stored
/// upper-cased; a tag is stored in its in-document form `/code/ `
/// (leading slash, trailing slash plus space). The registry loads
/// lazily and reloads on request; load and save failures are recovered
/// silently so a missing file behaves as an empty registry.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    /// Path of the backing registry file
    path: PathBuf,

    /// Canonical character names, upper-cased
    slugs: Vec<String>,

    /// Markup tags in wrapped form, parallel to `slugs`
    tags: Vec<String>,

    /// Whether the backing file has been read this session
    initialized: bool,
}

impl TagRegistry {
    /// Create a registry backed by the given file. Nothing is read
    /// until the first access.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        TagRegistry {
            path: path.as_ref().to_path_buf(),
            slugs: Vec::new(),
            tags: Vec::new(),
            initialized: false,
        }
    }

    /// Path of the backing registry file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wrap a bare tag code in its in-document form
    pub fn wrap_tag(code: &str) -> String {
        format!("/{}/ ", code)
    }

    /// Read the registry file, replacing the current tables.
    ///
    /// Each line holds `SLUG,tagcode`. Blank and malformed lines are
    /// skipped. Returns false when the file is absent or unreadable;
    /// the caller proceeds with empty tables.
    pub fn load(&mut self) -> bool {
        self.slugs.clear();
        self.tags.clear();

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Registry file not readable at {:?}: {}", self.path, e);
                return false;
            }
        };

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut parts = line.splitn(2, ',');
            let slug = parts.next().map(str::trim).unwrap_or_default();
            let code = parts.next().map(str::trim).unwrap_or_default();
            if slug.is_empty() || code.is_empty() {
                warn!("Skipping malformed registry line: {}", line);
                continue;
            }

            self.slugs.push(slug.to_uppercase());
            self.tags.push(Self::wrap_tag(code));
        }

        true
    }

    /// Write the current tables back to the registry file, stripping
    /// the tag wrapper. Returns false on I/O error.
    pub fn save(&self) -> bool {
        let mut out = String::new();
        for (slug, tag) in self.slugs.iter().zip(&self.tags) {
            // Undo wrap_tag: drop the slashes and the trailing space
            let code = tag
                .strip_prefix('/')
                .and_then(|t| t.strip_suffix("/ "))
                .unwrap_or(tag);
            out.push_str(slug);
            out.push(',');
            out.push_str(code);
            out.push('\n');
        }

        match fs::write(&self.path, out) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write registry file {:?}: {}", self.path, e);
                false
            }
        }
    }

    /// Load the registry file on first access
    pub fn ensure_loaded(&mut self) {
        if !self.initialized {
            self.load();
            self.initialized = true;
        }
    }

    /// Drop the tables and the initialized flag, then reload
    pub fn reload(&mut self) {
        self.initialized = false;
        self.ensure_loaded();
    }

    /// Exact-match membership test for a wrapped tag
    pub fn tag_exists(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Exact-match membership test for a slug
    pub fn slug_exists(&self, slug: &str) -> bool {
        self.slugs.iter().any(|s| s == slug)
    }

    /// Append an entry. Duplicate checking is the caller's
    /// responsibility (the resolver rejects duplicates before commit).
    pub fn add_entry(&mut self, slug: String, tag: String) {
        self.slugs.push(slug);
        self.tags.push(tag);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    /// Whether the registry holds no entries
    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }

    /// Iterate over `(slug, tag)` pairs in file order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slugs
            .iter()
            .zip(&self.tags)
            .map(|(s, t)| (s.as_str(), t.as_str()))
    }

    /// Slugs in file order
    pub fn slugs(&self) -> &[String] {
        &self.slugs
    }

    /// Human-readable table listing for the registry entry point
    pub fn table_display(&self) -> String {
        let mut out = format!("Number of Tags: {}\n\n", self.len());
        for (slug, tag) in self.entries() {
            out.push_str(&format!("Tag: {} Slug: {}\n", tag, slug));
        }
        out
    }
}
