/*!
 * Tests for the tag registry
 */

use std::fs;
use anyhow::Result;
use playmark::registry::TagRegistry;
use crate::common;

#[test]
fn test_wrap_tag_withCode_shouldAddDelimiters() {
    assert_eq!(TagRegistry::wrap_tag("JN"), "/JN/ ");
}

#[test]
fn test_load_withValidFile_shouldPopulateTables() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let mut registry = common::registry_with(dir.path(), &[("JOHN", "JN"), ("mary", "MR")])?;

    assert!(registry.load());
    assert_eq!(registry.len(), 2);
    assert!(registry.tag_exists("/JN/ "));
    assert!(registry.tag_exists("/MR/ "));
    assert!(registry.slug_exists("JOHN"));
    // Slugs are upper-cased on load
    assert!(registry.slug_exists("MARY"));
    Ok(())
}

#[test]
fn test_load_withMissingFile_shouldReturnFalseAndStayEmpty() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let mut registry = TagRegistry::new(dir.path().join("absent.txt"));

    assert!(!registry.load());
    assert!(registry.is_empty());
    Ok(())
}

#[test]
fn test_load_withMalformedLines_shouldSkipThem() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "tags.txt",
        "JOHN,JN\n\nno-comma-here\n,MISSINGSLUG\nMARY,MR\n",
    )?;
    let mut registry = TagRegistry::new(path);

    assert!(registry.load());
    assert_eq!(registry.len(), 2);
    assert!(registry.slug_exists("JOHN"));
    assert!(registry.slug_exists("MARY"));
    Ok(())
}

#[test]
fn test_save_withEntries_shouldWriteLoadableFile() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("tags.txt");
    let mut registry = TagRegistry::new(&path);
    registry.ensure_loaded();
    registry.add_entry("JOHN".to_string(), TagRegistry::wrap_tag("JN"));
    registry.add_entry("MARY".to_string(), TagRegistry::wrap_tag("MR"));

    assert!(registry.save());
    assert_eq!(fs::read_to_string(&path)?, "JOHN,JN\nMARY,MR\n");

    let mut reloaded = TagRegistry::new(&path);
    assert!(reloaded.load());
    assert_eq!(reloaded.len(), 2);
    assert!(reloaded.tag_exists("/MR/ "));
    Ok(())
}

#[test]
fn test_reload_withChangedFile_shouldPickUpNewEntries() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let mut registry = common::registry_with(dir.path(), &[("JOHN", "JN")])?;
    registry.ensure_loaded();
    assert_eq!(registry.len(), 1);

    fs::write(registry.path(), "JOHN,JN\nMARY,MR\n")?;
    registry.reload();
    assert_eq!(registry.len(), 2);
    Ok(())
}

#[test]
fn test_table_display_withEntries_shouldListAll() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let mut registry = common::registry_with(dir.path(), &[("JOHN", "JN")])?;
    registry.ensure_loaded();

    let display = registry.table_display();
    assert!(display.contains("Number of Tags: 1"));
    assert!(display.contains("Tag: /JN/  Slug: JOHN"));
    Ok(())
}
