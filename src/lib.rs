/*!
 * # Playmark - Stage-Play Markup Converter
 *
 * A Rust library for converting stage-play scripts between lightweight
 * plain-text markup and a styled document representation.
 *
 * ## Features
 *
 * - Replace short character tags (e.g. `/JN/ `) with styled slugs
 * - Recognize stage direction, overline and centered-block markup
 * - Apply and strip bold/italic/underline character decorations
 * - Interactive registration of unknown tags and characters
 * - Split speeches that run across page boundaries
 * - Highlight stage directions or one character's speeches
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: In-memory styled document model and layout queries
 * - `registry`: Persistent slug/tag registry
 * - `scanner`: Markup scanning over paragraph text
 * - `converter`: Bidirectional markup/style conversion passes
 * - `splitter`: Page-boundary speech splitting
 * - `highlighter`: Paragraph highlighting for read-throughs
 * - `resolver`: Resolution of unregistered tags and slugs
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod converter;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod highlighter;
pub mod registry;
pub mod resolver;
pub mod scanner;
pub mod splitter;

// Re-export main types for easier usage
pub use app_config::{Config, MarkupTags};
pub use app_controller::{Controller, HighlightMode};
pub use document::{DocPos, DocSpan, PageLayout, ParaStyle, Paragraph, ScriptDocument};
pub use errors::{AppError, DocumentError, MarkupError, RegistryError};
pub use registry::TagRegistry;
pub use resolver::{Candidate, ResolverChoice, ResolverPrompt};
