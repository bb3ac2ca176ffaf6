use dupescan::config::Config;
use dupescan::scanner::{FileId, SymlinkPolicy};
use dupescan::RunSummary;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn config(symlinks: SymlinkPolicy, physical: bool) -> Config {
    Config {
        recursive: true,
        symlinks,
        physical,
        header_format: String::new(),
        ..Default::default()
    }
}

fn scan(paths: &[&Path], config: &Config) -> (String, RunSummary) {
    let mut out = Vec::new();
    let inputs = paths.iter().map(|p| Ok(p.to_path_buf()));
    let summary = dupescan::run(inputs, config, &mut out).unwrap();
    (String::from_utf8(out).unwrap(), summary)
}

#[test]
fn test_hardlinks_cluster_unless_physical() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    let hardlink = dir.path().join("hardlink.txt");

    File::create(&original)
        .unwrap()
        .write_all(b"identical content")
        .unwrap();

    if let Err(e) = fs::hard_link(&original, &hardlink) {
        eprintln!("Skipping hardlink test: failed to create hardlink: {}", e);
        return;
    }

    let (out, summary) = scan(&[dir.path()], &config(SymlinkPolicy::None, false));
    assert_eq!(summary.finder.clusters, 1);
    assert_eq!(out.lines().count(), 2);

    let (out, summary) = scan(&[dir.path()], &config(SymlinkPolicy::None, true));
    if FileId::is_supported() {
        assert!(out.is_empty(), "physical mode must collapse hardlinks");
        assert_eq!(summary.walk.files_admitted, 1);
        assert_eq!(summary.walk.links_collapsed, 1);
    } else {
        assert_eq!(summary.finder.clusters, 1);
    }
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::unix::fs::symlink;

    fn setup() -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let original = dir.path().join("original.txt");
        let link = dir.path().join("link.txt");
        fs::write(&original, b"content").unwrap();
        symlink(&original, &link).unwrap();
        (dir, original, link)
    }

    #[test]
    fn test_symlinks_not_followed_by_default() {
        let (dir, _, _) = setup();
        let (out, summary) = scan(&[dir.path()], &config(SymlinkPolicy::None, false));

        assert!(out.is_empty());
        assert_eq!(summary.walk.files_admitted, 1);
        assert_eq!(summary.walk.skipped, 1);
    }

    #[test]
    fn test_args_only_follows_top_level_links() {
        let (dir, original, link) = setup();

        // Inside a recursed directory the link is below the top level.
        let (out, _) = scan(&[dir.path()], &config(SymlinkPolicy::ArgsOnly, false));
        assert!(out.is_empty());

        // Given directly, it is followed.
        let (out, summary) = scan(
            &[original.as_path(), link.as_path()],
            &config(SymlinkPolicy::ArgsOnly, false),
        );
        assert_eq!(summary.walk.files_admitted, 2);
        assert_eq!(summary.finder.clusters, 1);
        assert!(out.contains("link.txt"));
    }

    #[test]
    fn test_follow_all_links() {
        let (dir, _, _) = setup();

        let (out, summary) = scan(&[dir.path()], &config(SymlinkPolicy::Always, false));
        assert_eq!(summary.finder.clusters, 1);
        assert!(out.contains("link.txt"));
        assert!(out.contains("original.txt"));

        // The link resolves to the same inode, so physical mode keeps one path.
        let (out, summary) = scan(&[dir.path()], &config(SymlinkPolicy::Always, true));
        assert!(out.is_empty());
        assert_eq!(summary.walk.links_collapsed, 1);
    }

    #[test]
    fn test_directory_links_never_recursed() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("a"), b"x").unwrap();
        symlink(&real, dir.path().join("alias")).unwrap();

        let (out, summary) = scan(&[dir.path()], &config(SymlinkPolicy::Always, false));
        assert!(out.is_empty());
        assert_eq!(summary.walk.files_admitted, 1);
    }

    #[test]
    fn test_dangling_link_is_an_error_when_followed() {
        let dir = tempdir().unwrap();
        symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();

        let (_, summary) = scan(&[dir.path()], &config(SymlinkPolicy::Always, false));
        assert_eq!(summary.walk.errors, 1);

        let (_, summary) = scan(&[dir.path()], &config(SymlinkPolicy::None, false));
        assert_eq!(summary.walk.errors, 0);
    }

    #[test]
    fn test_same_directory_twice_is_walked_once() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a"), b"one").unwrap();
        fs::write(dir.path().join("b"), b"two").unwrap();

        let (out, summary) = scan(&[dir.path(), dir.path()], &config(SymlinkPolicy::None, false));
        assert!(out.is_empty());
        assert_eq!(summary.walk.directories_recursed, 1);
        assert_eq!(summary.walk.files_admitted, 2);
    }

    #[test]
    fn test_nested_directory_given_again_is_not_rescanned() {
        // A directory reachable under two names must only be scanned once.
        let dir = tempdir().unwrap();
        let inner = dir.path().join("inner");
        fs::create_dir(&inner).unwrap();
        fs::write(inner.join("f"), b"cycle").unwrap();

        let (_, summary) = scan(
            &[dir.path(), inner.as_path(), dir.path()],
            &config(SymlinkPolicy::Always, false),
        );
        assert_eq!(summary.walk.directories_recursed, 2);
        assert_eq!(summary.walk.files_admitted, 1);
    }
}
