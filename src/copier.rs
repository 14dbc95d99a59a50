//! Mirrors a template's source tree into the destination directory.
//!
//! Every file and directory name is expanded against the template data, so
//! names like `{{ project.name }}` become data-driven paths. Existing
//! destination files are never overwritten.

use indexmap::IndexSet;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::{CONFIG_FILE, DEFAULTS_FILE};
use crate::data::DataContext;
use crate::error::{Error, Result};
use crate::pattern::{normalize_path, resolve};
use crate::renderer::TemplateRenderer;

/// Destination paths written by one copy, in the order they were written.
pub type CopiedFileSet = IndexSet<PathBuf>;

/// Copies template trees with name expansion and exclusion.
pub struct TreeCopier<'a> {
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> TreeCopier<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer) -> Self {
        Self { renderer }
    }

    /// Copies `source_dir` into `dest_dir`.
    ///
    /// # Arguments
    /// * `source_dir` - Template directory
    /// * `dest_dir` - Destination root
    /// * `data` - Data used to expand entry names
    /// * `exclude` - Patterns, rooted at `source_dir`, of files that are not copied
    ///
    /// # Returns
    /// * `Result<CopiedFileSet>` - Exactly the destination files created by this call
    pub fn copy(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        data: &DataContext,
        exclude: &[String],
    ) -> Result<CopiedFileSet> {
        let excluded = excluded_files(source_dir, exclude)?;
        let mut copied = CopiedFileSet::new();

        // Destination directory for every source directory that survived expansion.
        let mut targets: HashMap<PathBuf, PathBuf> = HashMap::new();
        targets.insert(source_dir.to_path_buf(), dest_dir.to_path_buf());

        let mut walker = WalkDir::new(source_dir).min_depth(1).sort_by_file_name().into_iter();
        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            let path = entry.path();
            let is_dir = entry.file_type().is_dir();

            let Some(parent_target) = path.parent().and_then(|parent| targets.get(parent)).cloned()
            else {
                continue;
            };

            let name = entry.file_name().to_string_lossy();
            let expanded = match self.renderer.render(&name, data, &path.display().to_string()) {
                Ok(expanded) if !expanded.trim().is_empty() => expanded,
                Ok(_) => {
                    debug!("Skipping {} as its name expands to nothing", path.display());
                    if is_dir {
                        walker.skip_current_dir();
                    }
                    continue;
                }
                Err(e) => {
                    warn!("{e}");
                    if is_dir {
                        walker.skip_current_dir();
                    }
                    continue;
                }
            };
            let target = parent_target.join(expanded);

            if is_dir {
                fs::create_dir_all(&target)?;
                targets.insert(path.to_path_buf(), target);
                continue;
            }

            if excluded.contains(&normalize_path(path)) {
                debug!("Excluding {}", path.display());
                continue;
            }

            if target.symlink_metadata().is_ok() {
                warn!("'{}' already exists, not overwriting.", target.display());
                continue;
            }

            copy_with_metadata(path, &target)?;
            println!("Copied: '{}'", target.display());
            copied.insert(target);
        }

        Ok(copied)
    }
}

/// Files of `source_dir` that must not be copied: the template's own documents
/// plus everything the exclude patterns resolve to.
pub fn excluded_files(source_dir: &Path, exclude: &[String]) -> Result<HashSet<PathBuf>> {
    let mut excluded: HashSet<PathBuf> = [CONFIG_FILE, DEFAULTS_FILE]
        .iter()
        .map(|file| normalize_path(&source_dir.join(file)))
        .collect();
    for pattern in exclude {
        excluded.extend(resolve(pattern, source_dir)?.iter().map(|path| normalize_path(path)));
    }
    Ok(excluded)
}

/// Copies content and permissions, then carries over the modification time.
fn copy_with_metadata(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target)?;
    let modified = fs::metadata(source)?.modified()?;
    match File::options().write(true).open(target) {
        Ok(file) => file.set_modified(modified)?,
        Err(e) => debug!("Keeping copy time on {}: {e}", target.display()),
    }
    Ok(())
}
