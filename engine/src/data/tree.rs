// Text rendering of a folder tree, for eyeballing what a data folder holds.
use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;

/// Renders `root` and everything under it. Entries are sorted by name, names
/// in `ignore` are left out, directories end with '/', and hidden entries use
/// dotted markers. Failures below the root are rendered in place.
///
/// ```text
/// data/
/// ├── dataset-menu2160/
/// │   └── dataset-nav-at20240102-save202401021800.csv
/// └·· .cache
/// ```
pub fn render_tree(root: &Path, ignore: &[String]) -> Result<String> {
    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let mut out = format!("{}/\n", root_name);
    let entries = sorted_entries(root, ignore)?;
    render_entries(root, entries, "", ignore, &mut out);
    Ok(out)
}

fn sorted_entries(dir: &Path, ignore: &[String]) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if !ignore.iter().any(|i| i == &name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn render_entries(dir: &Path, names: Vec<String>, prefix: &str, ignore: &[String], out: &mut String) {
    let count = names.len();
    for (idx, name) in names.into_iter().enumerate() {
        let is_last = idx + 1 == count;
        let hidden = name.starts_with('.');
        let marker = match (is_last, hidden) {
            (true, true) => "└··",
            (true, false) => "└──",
            (false, true) => "├··",
            (false, false) => "├──",
        };
        let next_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

        let path = dir.join(&name);
        let is_dir = path.is_dir();
        let suffix = if is_dir { "/" } else { "" };
        out.push_str(&format!("{}{} {}{}\n", prefix, marker, name, suffix));

        if is_dir {
            match sorted_entries(&path, ignore) {
                Ok(children) => render_entries(&path, children, &next_prefix, ignore, out),
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                    out.push_str(&format!("{}[Permission Denied]\n", next_prefix));
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Could not list directory");
                    out.push_str(&format!("{}[Error: {}]\n", next_prefix, e));
                }
            }
        }
    }
}
