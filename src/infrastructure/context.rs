//! Workspace context assembly for engine prompts.
//!
//! Finds the workspace root (an explicitly registered root containing the
//! current directory, else the nearest ancestor with an `AGENTS.md`) and
//! collects `AGENTS.md` plus any `.skills/**/SKILL.md` files into a single
//! context block.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Load prompt context for the workspace containing `start`.
pub fn load(start: &Path, registered: &[String]) -> String {
    let root = find_workspace_root(start, registered);

    let agents = std::fs::read_to_string(root.join("AGENTS.md")).unwrap_or_default();

    let mut skills = String::new();
    collect_skill_files(&root.join(".skills"), &mut skills);

    format!("Workspace Root: {}\n{}\n{}", root.display(), agents, skills)
}

/// Registered workspaces win; otherwise walk up looking for `AGENTS.md`,
/// defaulting to `start` when nothing matches.
pub fn find_workspace_root(start: &Path, registered: &[String]) -> PathBuf {
    for workspace in registered {
        if start.starts_with(workspace) {
            return PathBuf::from(workspace);
        }
    }

    let mut current = start;
    loop {
        if current.join("AGENTS.md").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return start.to_path_buf(),
        }
    }
}

fn collect_skill_files(dir: &Path, out: &mut String) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_skill_files(&path, out);
        } else if path.file_name().is_some_and(|name| name == "SKILL.md") {
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    out.push_str(&content);
                    out.push('\n');
                }
                Err(err) => debug!(path = %path.display(), error = %err, "skipping unreadable skill file"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_workspace_wins() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let registered = vec![dir.path().to_string_lossy().into_owned()];
        assert_eq!(find_workspace_root(&nested, &registered), dir.path());
    }

    #[test]
    fn test_walks_up_to_agents_md() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("AGENTS.md"), "# notes").unwrap();
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_workspace_root(&nested, &[]), dir.path());
    }

    #[test]
    fn test_defaults_to_start_when_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_workspace_root(dir.path(), &[]), dir.path());
    }

    #[test]
    fn test_load_includes_agents_and_skills() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("AGENTS.md"), "agent notes").unwrap();
        let skill_dir = dir.path().join(".skills/review");
        std::fs::create_dir_all(&skill_dir).unwrap();
        std::fs::write(skill_dir.join("SKILL.md"), "review skill").unwrap();

        let context = load(dir.path(), &[]);
        assert!(context.contains("Workspace Root:"));
        assert!(context.contains("agent notes"));
        assert!(context.contains("review skill"));
    }
}
