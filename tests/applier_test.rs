mod common;

use common::{read, write, ScriptedPrompter};
use std::path::Path;
use strata::applier::{list_templates, TemplateApplier};
use strata::composition::AncestorStack;
use strata::constants::{CONFIG_FILE, DEFAULTS_FILE, USER_DATA_FILE};
use strata::error::Error;
use strata::renderer::MiniJinjaRenderer;
use tempfile::TempDir;

/// Creates template `name` under `root` with the given config and files.
fn template(root: &Path, name: &str, config: &str, files: &[(&str, &str)]) {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    if !config.is_empty() {
        write(&dir, CONFIG_FILE, config);
    }
    for (path, content) in files {
        write(&dir, path, content);
    }
}

struct Fixture {
    templates: TempDir,
    cwd: TempDir,
    dest: TempDir,
    renderer: MiniJinjaRenderer,
    prompter: ScriptedPrompter,
}

impl Fixture {
    fn new() -> Self {
        Self {
            templates: TempDir::new().unwrap(),
            cwd: TempDir::new().unwrap(),
            dest: TempDir::new().unwrap(),
            renderer: MiniJinjaRenderer::new(),
            prompter: ScriptedPrompter::silent(),
        }
    }

    fn root(&self) -> &Path {
        self.templates.path()
    }

    fn applier(&self) -> TemplateApplier<'_> {
        TemplateApplier::new(self.root(), &self.renderer, &self.prompter, self.cwd.path())
    }

    fn apply(&self, names: &[&str]) -> strata::error::Result<()> {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        self.applier().apply_all(&names, self.dest.path())
    }
}

#[test_log::test]
fn test_template_without_parents() {
    let fx = Fixture::new();
    template(fx.root(), "solo", "", &[("solo.txt", "solo")]);

    fx.apply(&["solo"]).unwrap();

    assert_eq!(read(&fx.dest, "solo.txt"), "solo");
    assert_eq!(std::fs::read_dir(fx.dest.path()).unwrap().count(), 1);
}

#[test_log::test]
fn test_ancestors_before_descendants() {
    let fx = Fixture::new();
    template(fx.root(), "a", "parents: [b]\n", &[("first.txt", "a"), ("ab.txt", "a"), ("a.txt", "")]);
    template(fx.root(), "b", "parents: [c]\n", &[("first.txt", "b"), ("ab.txt", "b"), ("b.txt", "")]);
    template(fx.root(), "c", "", &[("first.txt", "c"), ("c.txt", "")]);

    fx.apply(&["a"]).unwrap();

    assert_eq!(read(&fx.dest, "first.txt"), "c");
    assert_eq!(read(&fx.dest, "ab.txt"), "b");
    for name in ["a.txt", "b.txt", "c.txt"] {
        assert!(fx.dest.path().join(name).exists());
    }
}

#[test_log::test]
fn test_cycles_are_skipped() {
    let fx = Fixture::new();
    template(fx.root(), "a", "parents: [b]\n", &[("a.txt", "a")]);
    template(fx.root(), "b", "parents: [a]\n", &[("b.txt", "b")]);

    fx.apply(&["a"]).unwrap();

    assert_eq!(read(&fx.dest, "a.txt"), "a");
    assert_eq!(read(&fx.dest, "b.txt"), "b");
}

#[test_log::test]
fn test_stack_is_restored_after_apply() {
    let fx = Fixture::new();
    template(fx.root(), "a", "parents: [b]\n", &[]);
    template(fx.root(), "b", "", &[]);
    let mut stack = AncestorStack::new();

    fx.applier().apply("a", fx.dest.path(), &mut stack).unwrap();

    assert!(stack.is_empty());
}

#[test_log::test]
fn test_diamond_ancestor_copies_once() {
    let fx = Fixture::new();
    template(fx.root(), "app", "parents: [left, right]\n", &[]);
    template(fx.root(), "left", "parents: [core]\n", &[("left.txt", "")]);
    template(fx.root(), "right", "parents: [core]\n", &[("right.txt", "")]);
    template(fx.root(), "core", "", &[("core.txt", "core")]);

    fx.apply(&["app"]).unwrap();

    assert_eq!(read(&fx.dest, "core.txt"), "core");
    assert!(fx.dest.path().join("left.txt").exists());
    assert!(fx.dest.path().join("right.txt").exists());
}

#[test_log::test]
fn test_parse_only_touches_copied_files() {
    let fx = Fixture::new();
    template(
        fx.root(),
        "docs",
        "parse: ['*.md']\n",
        &[
            (DEFAULTS_FILE, "name: demo\n"),
            ("README.md", "# {{ name }}\n"),
            ("NOTES.md", "Notes for {{ name }}\n"),
        ],
    );
    write(&fx.cwd, USER_DATA_FILE, "name: mine\n");
    write(&fx.dest, "README.md", "# {{ name }} by hand\n");

    fx.apply(&["docs"]).unwrap();

    assert_eq!(read(&fx.dest, "README.md"), "# {{ name }} by hand\n");
    assert_eq!(read(&fx.dest, "NOTES.md"), "Notes for mine\n");
}

#[test_log::test]
fn test_expansion_failure_does_not_stop_others() {
    let fx = Fixture::new();
    template(
        fx.root(),
        "t",
        "parse: ['*.txt', 'sub/**/*.txt']\n",
        &[
            (DEFAULTS_FILE, "name: demo\n"),
            ("a.txt", "{{ missing }}"),
            ("b.txt", "{{ name"),
            ("c.txt", "{{ name }}"),
            ("sub/deep/d.txt", "{{ name | upper }}"),
        ],
    );
    write(&fx.cwd, USER_DATA_FILE, "");

    fx.apply(&["t"]).unwrap();

    assert_eq!(read(&fx.dest, "a.txt"), "{{ missing }}");
    assert_eq!(read(&fx.dest, "b.txt"), "{{ name");
    assert_eq!(read(&fx.dest, "c.txt"), "demo");
    assert_eq!(read(&fx.dest, "sub/deep/d.txt"), "DEMO");
}

#[test_log::test]
fn test_parent_sees_its_own_data() {
    let fx = Fixture::new();
    template(
        fx.root(),
        "child",
        "parents: [parent]\nparse: [child.txt]\n",
        &[(DEFAULTS_FILE, "who: child\n"), ("child.txt", "{{ who }}")],
    );
    template(
        fx.root(),
        "parent",
        "parse: [parent.txt]\n",
        &[(DEFAULTS_FILE, "who: parent\n"), ("parent.txt", "{{ who }}")],
    );
    write(&fx.cwd, USER_DATA_FILE, "");

    fx.apply(&["child"]).unwrap();

    assert_eq!(read(&fx.dest, "child.txt"), "child");
    assert_eq!(read(&fx.dest, "parent.txt"), "parent");
}

#[test_log::test]
fn test_missing_template_is_reported() {
    let fx = Fixture::new();
    template(fx.root(), "known", "parents: [ghost]\n", &[("known.txt", "")]);

    match fx.applier().apply("nope", fx.dest.path(), &mut AncestorStack::new()) {
        Err(Error::TemplateNotFound { available, .. }) => assert_eq!(available, vec!["known"]),
        other => panic!("Expected TemplateNotFound, got {other:?}"),
    }

    fx.apply(&["nope", "known"]).unwrap();
    assert!(fx.dest.path().join("known.txt").exists());
}

#[test_log::test]
fn test_reserved_character_is_fatal() {
    let fx = Fixture::new();
    template(fx.root(), "{{bad}}", "", &[("x.txt", "")]);

    let err = fx.apply(&["{{bad}}"]).unwrap_err();
    assert!(matches!(err, Error::ReservedCharacter { character: '{', .. }));
}

#[test]
fn test_list_templates() {
    let root = TempDir::new().unwrap();
    template(root.path(), "python", "", &[]);
    template(root.path(), "docker", "", &[]);
    template(root.path(), ".git", "", &[]);
    write(root.path(), "notes.txt", "");

    assert_eq!(list_templates(root.path()).unwrap(), vec!["docker", "python"]);
}

#[cfg(unix)]
#[test_log::test]
fn test_hook_sequence() {
    let fx = Fixture::new();
    template(
        fx.root(),
        "a",
        "parents: [b]\npre:\n  - sh: echo pre-a >> log\npost:\n  - sh: echo post-a >> log\n",
        &[],
    );
    template(
        fx.root(),
        "b",
        "pre:\n  - sh: echo pre-b >> log\npost:\n  - sh: test -f b.txt && echo post-b >> log\n",
        &[("b.txt", "")],
    );

    fx.apply(&["a"]).unwrap();

    assert_eq!(read(&fx.dest, "log"), "pre-a\npre-b\npost-b\npost-a\n");
}

#[cfg(unix)]
#[test_log::test]
fn test_self_parent_applied_once() {
    let fx = Fixture::new();
    template(fx.root(), "a", "parents: [a]\npost:\n  - sh: echo a >> applied\n", &[("a.txt", "")]);

    fx.apply(&["a"]).unwrap();

    assert_eq!(read(&fx.dest, "applied"), "a\n");
}

#[cfg(unix)]
#[test_log::test]
fn test_hooks_can_be_disabled() {
    let fx = Fixture::new();
    template(fx.root(), "a", "post:\n  - sh: touch ran\n", &[]);
    let names = vec!["a".to_string()];

    fx.applier().with_hooks(false).apply_all(&names, fx.dest.path()).unwrap();

    assert!(!fx.dest.path().join("ran").exists());
}
