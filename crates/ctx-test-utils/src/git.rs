//! Local upstream repositories.
//!
//! The CLI can fetch configuration trees with git. These fixtures build a real
//! repository on disk so that path can be exercised without a network.

use git2::{IndexAddOption, Repository, Signature};
use std::path::Path;

/// Initialise a repository at `path` and commit everything already in it to
/// `branch`.
///
/// Realism level: **REAL WITH HISTORY**, one commit on `branch`.
///
/// # Panics
/// Panics if any git operation fails.
pub fn upstream_repo(path: &Path, branch: &str) -> Repository {
    let repo = Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "upstream_repo: failed to init repository at {}: {e}",
            path.display()
        )
    });
    commit_all(&repo, branch, "Initial commit");
    repo
}

/// Stage the whole work tree and commit it on `branch`, which becomes HEAD.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_all(repo: &Repository, branch: &str, message: &str) {
    let refname = format!("refs/heads/{branch}");

    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap_or_else(|e| panic!("commit_all: failed to stage files: {e}"));
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let signature = Signature::now("Test User", "test@test.com").unwrap();
    let parent = repo
        .refname_to_id(&refname)
        .ok()
        .and_then(|id| repo.find_commit(id).ok());
    let parents: Vec<_> = parent.iter().collect();

    repo.commit(Some(&refname), &signature, &signature, message, &tree, &parents)
        .unwrap_or_else(|e| panic!("commit_all: failed to commit: {e}"));
    repo.set_head(&refname).unwrap();
}
