use dupescan::config::Config;
use dupescan::RunSummary;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn recursive_config() -> Config {
    Config {
        recursive: true,
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

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let (out, summary) = scan(&[dir.path()], &recursive_config());

    assert!(out.is_empty());
    assert_eq!(summary.walk.files_admitted, 0);
    assert_eq!(summary.walk.directories_recursed, 1);
    assert_eq!(summary.finder.clusters, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"content a");
    write(&dir.path().join("b.txt"), b"content b");
    write(&dir.path().join("c.txt"), b"content c");

    let (out, summary) = scan(&[dir.path()], &recursive_config());

    assert!(out.is_empty());
    assert_eq!(summary.walk.files_admitted, 3);
    assert_eq!(summary.finder.clusters, 0);
}

#[test]
fn test_scan_duplicate_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"duplicate");
    write(&dir.path().join("b.txt"), b"duplicate");
    write(&dir.path().join("c.txt"), b"unique!!!");

    let (out, summary) = scan(&[dir.path()], &recursive_config());

    let expected = format!(
        "{}\n{}\n",
        dir.path().join("a.txt").display(),
        dir.path().join("b.txt").display()
    );
    assert_eq!(out, expected);
    assert_eq!(summary.finder.clusters, 1);
    assert_eq!(summary.finder.reported, 2);
}

#[test]
fn test_each_content_group_is_one_cluster() {
    let dir = tempdir().unwrap();
    for i in 0..3 {
        write(&dir.path().join(format!("x{i}")), b"group x");
        write(&dir.path().join(format!("y{i}")), b"group y");
    }

    let config = Config {
        header_format: "#%i".to_string(),
        ..recursive_config()
    };
    let (out, summary) = scan(&[dir.path()], &config);

    assert_eq!(summary.finder.clusters, 2);
    let headers: Vec<&str> = out.lines().filter(|l| l.starts_with('#')).collect();
    assert_eq!(headers, vec!["#1", "#2"]);

    // Every path appears exactly once.
    let paths: Vec<&str> = out.lines().filter(|l| !l.starts_with('#')).collect();
    let unique: HashSet<&str> = paths.iter().copied().collect();
    assert_eq!(paths.len(), 6);
    assert_eq!(unique.len(), 6);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b").join("c");
    fs::create_dir_all(&nested).unwrap();
    write(&dir.path().join("top.txt"), b"deep copy");
    write(&nested.join("bottom.txt"), b"deep copy");

    let (out, summary) = scan(&[dir.path()], &recursive_config());

    assert_eq!(summary.walk.directories_recursed, 4);
    assert_eq!(summary.finder.clusters, 1);
    assert!(out.contains("bottom.txt"));
    assert!(out.contains("top.txt"));
}

#[test]
fn test_non_recursive_skips_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    write(&sub.join("a"), b"same");
    write(&sub.join("b"), b"same");

    let config = Config {
        recursive: false,
        ..recursive_config()
    };
    let (out, summary) = scan(&[dir.path()], &config);

    assert!(out.is_empty());
    assert_eq!(summary.walk.files_admitted, 0);
    assert_eq!(summary.walk.skipped, 1);
}

#[test]
fn test_hidden_files_need_all_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("visible"), b"hidden twin");
    write(&dir.path().join(".hidden"), b"hidden twin");
    fs::create_dir(dir.path().join(".git")).unwrap();
    write(&dir.path().join(".git").join("blob"), b"hidden twin");

    let (out, _) = scan(&[dir.path()], &recursive_config());
    assert!(out.is_empty());

    let config = Config {
        all_files: true,
        ..recursive_config()
    };
    let (out, summary) = scan(&[dir.path()], &config);
    assert_eq!(summary.finder.reported, 3);
    assert!(out.contains(".hidden"));
    assert!(out.contains("blob"));
}

#[test]
fn test_hidden_file_given_directly_is_admitted() {
    let dir = tempdir().unwrap();
    let hidden = dir.path().join(".dotfile");
    let plain = dir.path().join("plain");
    write(&hidden, b"x");
    write(&plain, b"x");

    let (_, summary) = scan(&[hidden.as_path(), plain.as_path()], &recursive_config());
    assert_eq!(summary.finder.reported, 2);
}

#[test]
fn test_empty_files_cluster_unless_ignored() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("e1"), b"");
    write(&dir.path().join("e2"), b"");
    write(&dir.path().join("full"), b"data");

    let (_, summary) = scan(&[dir.path()], &recursive_config());
    assert_eq!(summary.finder.clusters, 1);
    assert_eq!(summary.finder.reported, 2);

    let config = Config {
        ignore_empty: true,
        ..recursive_config()
    };
    let (out, summary) = scan(&[dir.path()], &config);
    assert!(out.is_empty());
    assert_eq!(summary.walk.files_admitted, 1);
}

#[test]
fn test_different_sizes_never_compared() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"1");
    write(&dir.path().join("b"), b"22");
    write(&dir.path().join("c"), b"333");

    let (_, summary) = scan(&[dir.path()], &recursive_config());
    assert_eq!(summary.finder.comparisons, 0);
}

#[test]
fn test_thorough_and_digest_modes_agree() {
    let dir = tempdir().unwrap();
    let big = vec![7u8; 20_000];
    let mut other = big.clone();
    other[19_999] = 8;
    write(&dir.path().join("a"), &big);
    write(&dir.path().join("b"), &big);
    write(&dir.path().join("c"), &other);

    let mut outputs = Vec::new();
    for (thorough, digest) in [
        (false, dupescan::scanner::DigestFunction::Blake3),
        (false, dupescan::scanner::DigestFunction::Sha512),
        (true, dupescan::scanner::DigestFunction::Blake3),
    ] {
        let config = Config {
            thorough,
            digest,
            ..recursive_config()
        };
        let (out, summary) = scan(&[dir.path()], &config);
        assert_eq!(summary.finder.reported, 2);
        outputs.push(out);
    }
    assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn test_trailing_slashes_stripped() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"same");
    write(&dir.path().join("b"), b"same");

    let with_slashes = PathBuf::from(format!("{}///", dir.path().display()));
    let (out, _) = scan(&[with_slashes.as_path()], &recursive_config());

    assert!(!out.contains("//"));
    assert!(out.contains(&format!("{}/a", dir.path().display())));
}

#[test]
fn test_missing_path_counted_as_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let (out, summary) = scan(&[missing.as_path()], &recursive_config());
    assert!(out.is_empty());
    assert_eq!(summary.walk.errors, 1);
    assert_eq!(
        dupescan::error::ExitCode::from_error_count(summary.walk.errors),
        dupescan::error::ExitCode::PartialSuccess
    );
}

#[test]
fn test_same_file_twice_on_command_line() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("once");
    write(&file, b"only one");

    for physical in [false, true] {
        let config = Config {
            physical,
            ..recursive_config()
        };
        let (out, summary) = scan(&[file.as_path(), file.as_path()], &config);
        assert!(out.is_empty());
        assert_eq!(summary.walk.files_admitted, 1);
        assert_eq!(summary.walk.skipped, 1);
        assert_eq!(summary.walk.links_collapsed, 0);
        assert_eq!(summary.finder.clusters, 0);
    }
}

#[test]
fn test_file_given_and_reached_by_recursion_reported_once() {
    let dir = tempdir().unwrap();
    let parent = dir.path().join("d");
    fs::create_dir(&parent).unwrap();
    let file = parent.join("a");
    write(&file, b"unique");

    let (out, summary) = scan(&[file.as_path(), parent.as_path()], &recursive_config());
    assert!(out.is_empty());
    assert_eq!(summary.walk.files_admitted, 1);
    assert_eq!(summary.finder.clusters, 0);
}

#[test]
fn test_path_reached_twice_printed_once_among_duplicates() {
    let dir = tempdir().unwrap();
    let parent = dir.path().join("d");
    fs::create_dir(&parent).unwrap();
    write(&parent.join("a"), b"twin");
    write(&parent.join("b"), b"twin");

    let (out, summary) = scan(
        &[parent.join("b").as_path(), parent.as_path()],
        &recursive_config(),
    );
    let lines: Vec<&str> = out.lines().collect();
    let unique: HashSet<&str> = lines.iter().copied().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(unique.len(), 2);
    assert_eq!(summary.finder.clusters, 1);
}
