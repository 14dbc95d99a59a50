//! Core template application orchestration.
//! Combines data loading, hooks, parent resolution, tree copying and content
//! expansion into the full application of one template.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::composition::{apply_parents, AncestorStack};
use crate::config::load_config;
use crate::constants::{DEFAULT_TEMPLATES_DIR, RESERVED_CHARS};
use crate::copier::{CopiedFileSet, TreeCopier};
use crate::data::{DataContext, DataLayer};
use crate::error::{Error, Result};
use crate::hooks::{run_hooks, Hook};
use crate::pattern::{normalize_path, resolve};
use crate::prompt::Prompter;
use crate::renderer::TemplateRenderer;

/// Applies templates from a template root into destination directories.
pub struct TemplateApplier<'a> {
    template_root: PathBuf,
    renderer: &'a dyn TemplateRenderer,
    data_layer: DataLayer<'a>,
    run_hooks: bool,
}

impl<'a> TemplateApplier<'a> {
    /// Creates a new applier.
    ///
    /// # Arguments
    /// * `template_root` - Directory holding one subdirectory per template
    /// * `renderer` - Expansion engine for names and contents
    /// * `prompter` - Interactive collaborator for missing data
    /// * `user_data_dir` - Directory searched for the user data document
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(
        template_root: P,
        renderer: &'a dyn TemplateRenderer,
        prompter: &'a dyn Prompter,
        user_data_dir: Q,
    ) -> Self {
        Self {
            template_root: template_root.into(),
            renderer,
            data_layer: DataLayer::new(prompter, user_data_dir),
            run_hooks: true,
        }
    }

    /// Enables or disables `pre`/`post` hook execution.
    pub fn with_hooks(mut self, enabled: bool) -> Self {
        self.run_hooks = enabled;
        self
    }

    pub fn template_root(&self) -> &Path {
        &self.template_root
    }

    /// Resolves a template name to its source directory.
    ///
    /// # Errors
    /// * `Error::TemplateNotFound` if there is no such directory
    /// * `Error::ReservedCharacter` if the path contains expansion syntax characters
    pub fn template_dir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.template_root.join(name);
        if !dir.is_dir() {
            return Err(Error::TemplateNotFound {
                name: name.to_string(),
                template_root: self.template_root.display().to_string(),
                available: list_templates(&self.template_root).unwrap_or_default(),
            });
        }
        let display = dir.display().to_string();
        if let Some(character) = display.chars().find(|c| RESERVED_CHARS.contains(c)) {
            return Err(Error::ReservedCharacter { path: display, character });
        }
        Ok(dir)
    }

    /// Applies `templates` in order, each with a fresh ancestor stack.
    ///
    /// Templates that cannot be found are reported and skipped.
    pub fn apply_all(&self, templates: &[String], dest_dir: &Path) -> Result<()> {
        fs::create_dir_all(dest_dir)?;
        for template in templates {
            let mut stack = AncestorStack::new();
            match self.apply(template, dest_dir, &mut stack) {
                Err(e) if !e.is_fatal() => warn!("{e}"),
                other => other?,
            }
        }
        Ok(())
    }

    /// Fully applies one template: parents first, then its own files.
    ///
    /// `stack` holds the templates on the current call path; `name` is on it
    /// for the whole duration of this call.
    pub fn apply(&self, name: &str, dest_dir: &Path, stack: &mut AncestorStack) -> Result<()> {
        let source_dir = self.template_dir(name)?;
        stack.push(name);
        let result = self.apply_pushed(name, &source_dir, dest_dir, stack);
        stack.pop();
        result
    }

    fn apply_pushed(
        &self,
        name: &str,
        source_dir: &Path,
        dest_dir: &Path,
        stack: &mut AncestorStack,
    ) -> Result<()> {
        info!("Applying template '{name}'.");
        let data = self.data_layer.load(source_dir, dest_dir)?;
        let config = load_config(source_dir)?;

        self.hooks(&config.pre, dest_dir);
        apply_parents(self, &config.parents, dest_dir, stack)?;

        let copied = TreeCopier::new(self.renderer).copy(
            source_dir,
            dest_dir,
            &data,
            &config.exclude,
        )?;
        debug!("Template '{}' copied {} file(s)", name, copied.len());

        self.expand_contents(&config.parse, dest_dir, &copied, &data)?;
        self.hooks(&config.post, dest_dir);
        Ok(())
    }

    fn hooks(&self, hooks: &[Hook], dest_dir: &Path) {
        if self.run_hooks {
            run_hooks(hooks, dest_dir);
        } else {
            for hook in hooks {
                debug!("Hooks disabled, not running '{}'", hook.shell);
            }
        }
    }

    /// Rewrites, in place, every freshly copied file matched by a `parse` pattern.
    ///
    /// Files that failed to expand are reported and left as copied.
    ///
    /// # Returns
    /// * `Result<Vec<PathBuf>>` - Files that were expanded
    pub fn expand_contents(
        &self,
        parse: &[String],
        dest_dir: &Path,
        copied: &CopiedFileSet,
        data: &DataContext,
    ) -> Result<Vec<PathBuf>> {
        let fresh: HashSet<PathBuf> = copied.iter().map(|path| normalize_path(path)).collect();
        let mut visited = HashSet::new();
        let mut expanded = Vec::new();

        for pattern in parse {
            for path in resolve(pattern, dest_dir)? {
                let key = normalize_path(&path);
                if !fresh.contains(&key) {
                    debug!("Not expanding {}, it was not copied by this template", path.display());
                    continue;
                }
                if !visited.insert(key) {
                    continue;
                }
                match self.expand_file(&path, data) {
                    Ok(()) => {
                        println!("Expanded: '{}'", path.display());
                        expanded.push(path);
                    }
                    Err(e) => warn!("{e}"),
                }
            }
        }
        Ok(expanded)
    }

    fn expand_file(&self, path: &Path, data: &DataContext) -> Result<()> {
        let content = fs::read_to_string(path)?;
        let rendered = self.renderer.render(&content, data, &path.display().to_string())?;
        fs::write(path, rendered)?;
        Ok(())
    }
}

/// Names of the templates under `template_root`, hidden directories excluded, sorted.
pub fn list_templates<P: AsRef<Path>>(template_root: P) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(template_root.as_ref())? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !entry.path().is_dir() {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Template root used when neither the command line nor the environment names one.
pub fn default_template_root() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_TEMPLATES_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATES_DIR))
}
