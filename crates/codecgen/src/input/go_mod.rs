//! go.mod parsing, used to derive a package's import path.

use std::path::{Path, PathBuf};

/// The module declared by a go.mod file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    /// Module path (e.g., "github.com/user/project")
    pub path: String,
}

/// Parse go.mod content string.
pub fn parse_go_mod_content(content: &str) -> Option<GoModule> {
    let mut module_path = None;

    for line in content.lines() {
        let line = strip_comment(line).trim();

        // module github.com/user/project
        if let Some(rest) = line.strip_prefix("module ") {
            let rest = rest.trim();
            module_path = Some(rest.trim_matches('"').to_string());
        }
    }

    module_path
        .filter(|path| !path.is_empty())
        .map(|path| GoModule { path })
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(i) => &line[..i],
        None => line,
    }
}

/// Find go.mod by walking up from a directory.
pub fn find_go_mod(start: &Path) -> Option<PathBuf> {
    let mut current = if start.is_file() {
        start.parent()?.to_path_buf()
    } else {
        start.to_path_buf()
    };

    loop {
        let go_mod = current.join("go.mod");
        if go_mod.is_file() {
            return Some(go_mod);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Import path of the package in `dir`, from the nearest enclosing module.
///
/// Returns None when no go.mod is found or it declares no module.
pub fn import_path_for(dir: &Path) -> Option<String> {
    let dir = dir.canonicalize().ok()?;
    let go_mod = find_go_mod(&dir)?;
    let content = std::fs::read_to_string(&go_mod).ok()?;
    let module = parse_go_mod_content(&content)?;
    let root = go_mod.parent()?;
    let rel = dir.strip_prefix(root).ok()?;
    Some(join_import_path(&module.path, rel))
}

fn join_import_path(module: &str, rel: &Path) -> String {
    let mut path = module.to_string();
    for component in rel.components() {
        path.push('/');
        path.push_str(&component.as_os_str().to_string_lossy());
    }
    path
}
