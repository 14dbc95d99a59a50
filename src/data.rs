//! Substitution data available to filename and content expansion.
//!
//! A template's default data is combined with an optional user data document
//! found in the current working directory. The combination is a shallow merge:
//! every top-level key of the user document replaces the default key as a whole,
//! nested mappings included.

use log::{debug, info};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULTS_FILE, USER_DATA_FILE};
use crate::error::{Error, Result};
use crate::prompt::Prompter;

/// Merged, read-only substitution data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataContext {
    root: Map<String, Value>,
}

impl DataContext {
    pub fn new(root: Map<String, Value>) -> Self {
        Self { root }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    /// Top-level key lookup.
    pub fn get(&self, key: &str) -> Option<DataView<'_>> {
        self.root.get(key).map(DataView::new)
    }

    /// Dotted path lookup, e.g. `project.author.name`.
    pub fn lookup(&self, path: &str) -> Option<DataView<'_>> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let view = self.get(head)?;
        match rest {
            Some(rest) => view.lookup(rest),
            None => Some(view),
        }
    }
}

/// Borrowed view over one value of a [`DataContext`].
///
/// Nested mappings are reached through the same `get`/`lookup` accessors, one
/// level at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataView<'a> {
    value: &'a Value,
}

impl<'a> DataView<'a> {
    fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn get(&self, key: &str) -> Option<DataView<'a>> {
        self.value.as_object()?.get(key).map(DataView::new)
    }

    pub fn lookup(&self, path: &str) -> Option<DataView<'a>> {
        path.split('.').try_fold(*self, |view, key| view.get(key))
    }

    pub fn is_mapping(&self) -> bool {
        self.value.is_object()
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.value.as_str()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_i64()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }
}

impl fmt::Display for DataView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// Loads data for one template application.
pub struct DataLayer<'a> {
    prompter: &'a dyn Prompter,
    user_data_dir: PathBuf,
}

impl<'a> DataLayer<'a> {
    /// # Arguments
    /// * `prompter` - Interactive collaborator used when no user data document exists
    /// * `user_data_dir` - Directory holding the user data document (the working directory)
    pub fn new<P: Into<PathBuf>>(prompter: &'a dyn Prompter, user_data_dir: P) -> Self {
        Self { prompter, user_data_dir: user_data_dir.into() }
    }

    /// Builds the [`DataContext`] for the template stored in `template_dir`.
    ///
    /// A template without default data gets an empty context and no user data
    /// is looked up or asked for.
    pub fn load(&self, template_dir: &Path, dest_dir: &Path) -> Result<DataContext> {
        let defaults_path = template_dir.join(DEFAULTS_FILE);
        let Some(defaults) = read_mapping(&defaults_path)? else {
            info!("No default data provided by '{}'.", template_dir.display());
            return Ok(DataContext::default());
        };

        let user_path = self.user_data_dir.join(USER_DATA_FILE);
        let overrides = match read_mapping(&user_path)? {
            Some(overrides) => {
                debug!("Using data from {}", user_path.display());
                overrides
            }
            None => self.collect(&defaults, dest_dir, &user_path)?,
        };

        Ok(DataContext::new(merge_shallow(defaults, overrides)))
    }

    /// Asks for every leaf of `defaults` and optionally saves the answers.
    fn collect(
        &self,
        defaults: &Map<String, Value>,
        dest_dir: &Path,
        user_path: &Path,
    ) -> Result<Map<String, Value>> {
        info!(
            "No {} found, collecting data for '{}'.",
            USER_DATA_FILE,
            dest_dir.display()
        );

        let mut answers = Map::new();
        for (path, default) in leaf_paths(defaults) {
            let answer = self.prompter.input(&path.join("."), &display_default(default))?;
            set_path(&mut answers, &path, coerce_answer(answer, default));
        }

        let save = self.prompter.confirm(
            &format!("Save these answers to {} for future runs?", user_path.display()),
            false,
        )?;
        if save {
            let content = serde_yaml::to_string(&answers).map_err(|source| Error::YamlError {
                path: user_path.display().to_string(),
                source,
            })?;
            fs::write(user_path, content)?;
            info!("Saved answers to '{}'.", user_path.display());
        }

        Ok(answers)
    }
}

/// Reads a YAML mapping document. A missing file gives `None`, an empty one an
/// empty mapping.
pub fn read_mapping(path: &Path) -> Result<Option<Map<String, Value>>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Some(Map::new()));
    }
    let value: Value = serde_yaml::from_str(&content)
        .map_err(|source| Error::YamlError { path: path.display().to_string(), source })?;
    match value {
        Value::Null => Ok(Some(Map::new())),
        Value::Object(map) => Ok(Some(map)),
        _ => Err(Error::ConfigError(format!(
            "top level of '{}' must be a mapping",
            path.display()
        ))),
    }
}

/// Top-level merge: keys of `overrides` replace keys of `defaults` wholesale.
pub fn merge_shallow(
    mut defaults: Map<String, Value>,
    overrides: Map<String, Value>,
) -> Map<String, Value> {
    for (key, value) in overrides {
        defaults.insert(key, value);
    }
    defaults
}

/// Depth-first list of leaf values with their key paths.
pub fn leaf_paths(map: &Map<String, Value>) -> Vec<(Vec<String>, &Value)> {
    fn walk<'v>(
        map: &'v Map<String, Value>,
        prefix: &mut Vec<String>,
        out: &mut Vec<(Vec<String>, &'v Value)>,
    ) {
        for (key, value) in map {
            prefix.push(key.clone());
            match value {
                Value::Object(nested) => walk(nested, prefix, out),
                leaf => out.push((prefix.clone(), leaf)),
            }
            prefix.pop();
        }
    }

    let mut out = Vec::new();
    walk(map, &mut Vec::new(), &mut out);
    out
}

/// Stores `value` under the nested key `path`, creating mappings on the way.
pub fn set_path(map: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = map;
    for key in parents {
        let entry = current.entry(key.clone()).or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(nested) => nested,
            _ => unreachable!("entry was just made a mapping"),
        };
    }
    current.insert(last.clone(), value);
}

fn display_default(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Keeps numbers and booleans typed when the default was typed, and an
/// accepted empty answer to a null default null.
fn coerce_answer(answer: String, default: &Value) -> Value {
    match default {
        Value::Null if answer.trim().is_empty() => return Value::Null,
        Value::Number(_) => {
            if let Ok(int) = answer.trim().parse::<i64>() {
                return Value::Number(int.into());
            }
            if let Some(number) = answer.trim().parse::<f64>().ok().and_then(Number::from_f64) {
                return Value::Number(number);
            }
        }
        Value::Bool(_) => {
            if let Ok(flag) = answer.trim().parse::<bool>() {
                return Value::Bool(flag);
            }
        }
        _ => {}
    }
    Value::String(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_set_path_creates_nested_mappings() {
        let mut map = Map::new();
        set_path(&mut map, &["a".into(), "b".into()], json!(1));
        set_path(&mut map, &["a".into(), "c".into()], json!("x"));
        assert_eq!(Value::Object(map), json!({"a": {"b": 1, "c": "x"}}));
    }

    #[test]
    fn test_leaf_paths_depth_first() {
        let map = object(json!({"a": 1, "b": {"x": 2, "y": {"z": 3}}}));
        let paths: Vec<String> = leaf_paths(&map).into_iter().map(|(p, _)| p.join(".")).collect();
        assert_eq!(paths, vec!["a", "b.x", "b.y.z"]);
    }

    #[test]
    fn test_coerce_answer() {
        assert_eq!(coerce_answer("42".into(), &json!(1)), json!(42));
        assert_eq!(coerce_answer("1.5".into(), &json!(1)), json!(1.5));
        assert_eq!(coerce_answer("abc".into(), &json!(1)), json!("abc"));
        assert_eq!(coerce_answer("true".into(), &json!(false)), json!(true));
        assert_eq!(coerce_answer("7".into(), &json!("s")), json!("7"));
        assert_eq!(coerce_answer("".into(), &Value::Null), Value::Null);
        assert_eq!(coerce_answer("set".into(), &Value::Null), json!("set"));
    }
}
