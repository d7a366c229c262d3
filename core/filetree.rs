//! ASCII tree rendering of a flat path list.
//!
//! Paths are split into segments and folded into a nested map, which is then
//! rendered with box-drawing connectors. Directories sort before files at
//! every level; within each group names sort lexicographically.

use std::collections::BTreeMap;

/// One level of the transient tree. A node with no children renders as a
/// file; a node with children renders as a directory. A name used both as a
/// file and as a directory prefix collapses into the directory form.
#[derive(Debug, Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn insert(&mut self, path: &str) {
        let mut current = self;
        // Both separators are accepted so Windows-style input renders the
        // same structure; empty segments from duplicate or leading slashes
        // are dropped.
        for segment in path.split(['/', '\\']).filter(|s| !s.is_empty()) {
            current = current.children.entry(segment.to_string()).or_default();
        }
    }

    fn render_into(&self, prefix: &str, lines: &mut Vec<String>) {
        let dirs: Vec<(&String, &TreeNode)> = self
            .children
            .iter()
            .filter(|(_, node)| !node.children.is_empty())
            .collect();
        let files: Vec<&String> = self
            .children
            .iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(name, _)| name)
            .collect();

        let total = dirs.len() + files.len();
        for (i, (name, node)) in dirs.iter().enumerate() {
            let is_last = i == total - 1;
            let connector = if is_last { "└── " } else { "├── " };
            lines.push(format!("{prefix}{connector}{name}/"));

            let child_prefix = if is_last {
                format!("{prefix}    ")
            } else {
                format!("{prefix}│   ")
            };
            node.render_into(&child_prefix, lines);
        }
        for (i, name) in files.iter().enumerate() {
            let is_last = dirs.len() + i == total - 1;
            let connector = if is_last { "└── " } else { "├── " };
            lines.push(format!("{prefix}{connector}{name}"));
        }
    }
}

/// Renders `paths` as an ASCII tree. The root line is `/` suffixed with
/// `root_label`; empty input yields just the root line.
pub fn render(paths: &[&str], root_label: &str) -> String {
    let mut root = TreeNode::default();
    for path in paths {
        root.insert(path);
    }

    let mut lines = vec![format!("/{root_label}")];
    root.render_into("", &mut lines);
    lines.join("\n")
}
