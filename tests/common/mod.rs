// tests/common/mod.rs

//! Shared fixture builders for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

/// Write a package manifest at `root`, creating the directory as needed.
pub fn write_manifest(root: &Path, group: &str, name: &str, version: &str, deps: &[&str]) {
    fs::create_dir_all(root).unwrap();
    let deps = deps
        .iter()
        .map(|d| format!("\"{}\"", d))
        .collect::<Vec<_>>()
        .join(", ");
    let manifest = format!(
        "[package]\ngroup = \"{}\"\nname = \"{}\"\nversion = \"{}\"\ndependencies = [{}]\n",
        group, name, version, deps
    );
    fs::write(root.join("package.toml"), manifest).unwrap();
}

/// Write one content entry below the package's `content/` directory.
pub fn write_entry(root: &Path, entry: &str, content: &str) {
    let target = root.join("content").join(entry);
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(target, content).unwrap();
}

/// Create a package directory with a manifest and entries under `base`.
///
/// Returns the package root path.
pub fn build_package(
    base: &Path,
    dir: &str,
    group: &str,
    name: &str,
    version: &str,
    deps: &[&str],
    entries: &[(&str, &str)],
) -> PathBuf {
    let root = base.join(dir);
    write_manifest(&root, group, name, version, deps);
    for (entry, content) in entries {
        write_entry(&root, entry, content);
    }
    root
}
