//! File system access for detectors and artifact scanning
//!
//! Detectors only ever see a [`FileSet`] of root-relative paths. Reading
//! descriptor content goes through the [`FileSystem`] trait so heuristics can be
//! exercised against an in-memory tree.

mod listing;
mod mock;
mod real;
mod r#trait;

pub use listing::{list_files, list_files_lossy, FileSet};
pub use mock::MockFileSystem;
pub use r#trait::FileSystem;
pub use real::RealFileSystem;

/// Nests directories under `dir` until the full path passes PATH_MAX, then
/// buries `buried.o` below that depth. Walking there fails even for root.
#[cfg(all(test, target_os = "linux"))]
pub(crate) fn nest_beyond_path_max(dir: &std::path::Path) {
    use std::fs;
    use std::os::unix::fs::symlink;

    let name = "d".repeat(200);
    let mut deepest = dir.to_path_buf();
    while deepest.as_os_str().len() + name.len() + 1 < 4095 {
        deepest.push(&name);
    }
    fs::create_dir_all(&deepest).unwrap();

    // Short detour so the final levels can be created at all
    let link = dir.join("deep-link");
    symlink(&deepest, &link).unwrap();
    let buried = link.join(&name).join(&name);
    fs::create_dir_all(&buried).unwrap();
    fs::write(buried.join("buried.o"), "").unwrap();
    fs::remove_file(&link).unwrap();
}
