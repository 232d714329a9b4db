//! Edge case and error handling tests for dutally


use harness::{TestTree, field, run_bytes, run_dutally};
use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};

// ============================================================================
// Empty Trees
// ============================================================================

#[test]
fn test_empty_root() {
    let tree = TestTree::new();

    let stdout = run_bytes(tree.path(), &[]);

    let expected = format!("{}  .\n{}\n{}\n", field("0"), "-".repeat(15), field("0"));
    assert_eq!(stdout, expected);
}

#[test]
fn test_empty_subfolder_is_listed() {
    let tree = TestTree::new();
    tree.add_dir("empty");

    let stdout = run_bytes(tree.path(), &[]);
    assert!(stdout.starts_with(&format!("{}  empty\n", field("0"))));
}

#[test]
fn test_empty_subfolder_hidden_with_hide_zero() {
    let tree = TestTree::new();
    tree.add_dir("empty");
    tree.add_file("full/f", 10);

    let stdout = run_bytes(tree.path(), &["-z"]);
    assert!(!stdout.contains("empty"));
    // Loose size of zero is suppressed too
    assert!(!stdout.contains("  .\n"));
    assert!(stdout.contains("  full\n"));
}

// ============================================================================
// Symlink Edge Cases
// ============================================================================

#[test]
fn test_symlinked_directory_is_followed_and_bracketed() {
    let tree = TestTree::new();
    tree.add_file("realdir/file.bin", 100);
    symlink(tree.path().join("realdir"), tree.path().join("linkdir"))
        .expect("Failed to create dir symlink");

    let stdout = run_bytes(tree.path(), &[]);

    assert!(stdout.contains(&format!("{}  [linkdir]\n", field("100"))));
    assert!(stdout.contains(&format!("{}  realdir\n", field("100"))));
    assert!(stdout.ends_with(&format!("{}\n", field("200"))));
}

#[test]
fn test_no_links_skips_symlinks() {
    let tree = TestTree::new();
    tree.add_file("realdir/file.bin", 100);
    symlink(tree.path().join("realdir"), tree.path().join("linkdir"))
        .expect("Failed to create dir symlink");
    symlink(tree.path().join("realdir/file.bin"), tree.path().join("linkfile"))
        .expect("Failed to create file symlink");

    let stdout = run_bytes(tree.path(), &["--no-links"]);

    assert!(!stdout.contains("linkdir"));
    assert!(stdout.ends_with(&format!("{}\n", field("100"))));
}

#[test]
fn test_symlinked_file_counts_target_size() {
    let tree = TestTree::new();
    tree.add_file("data/blob", 4000);
    symlink(tree.path().join("data/blob"), tree.path().join("alias"))
        .expect("Failed to create file symlink");

    let stdout = run_bytes(tree.path(), &[]);
    assert!(stdout.contains(&format!("{}  .\n", field("4,000"))));
}

#[test]
fn test_symlink_to_parent_no_infinite_loop() {
    let tree = TestTree::new();
    tree.add_file("subdir/file.bin", 10);
    symlink("..", tree.path().join("subdir").join("parent"))
        .expect("Failed to create parent symlink");

    let stdout = run_bytes(tree.path(), &["-d", "max"]);
    assert!(stdout.contains("  subdir\n"));
    assert!(!stdout.contains("[parent]"), "cycle should be skipped: {}", stdout);
    assert!(stdout.ends_with(&format!("{}\n", field("10"))));
}

#[test]
fn test_mutual_symlinks_no_infinite_loop() {
    let tree = TestTree::new();
    tree.add_file("a/x", 1);
    tree.add_file("b/y", 2);
    symlink("../b", tree.path().join("a").join("to_b")).expect("Failed to create symlink");
    symlink("../a", tree.path().join("b").join("to_a")).expect("Failed to create symlink");

    let (_stdout, stderr, success) = run_dutally(tree.path(), &["-u", "b", "--no-free"]);
    assert!(success, "should terminate on mutual links: {}", stderr);
}

#[test]
fn test_broken_symlink_ignored() {
    let tree = TestTree::new();
    tree.add_file("f", 7);
    symlink("does-not-exist", tree.path().join("dangling")).expect("Failed to create symlink");

    let stdout = run_bytes(tree.path(), &[]);
    assert!(stdout.ends_with(&format!("{}\n", field("7"))));
}

// ============================================================================
// Unreadable Folders
// ============================================================================

#[test]
fn test_unreadable_folder_shows_question_mark() {
    let tree = TestTree::new();
    tree.add_file("open/f", 10);
    let locked = tree.add_file("locked/secret", 1000);
    let locked_dir = locked.parent().unwrap().to_path_buf();

    fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users can still list the directory
    if fs::read_dir(&locked_dir).is_ok() {
        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let (stdout, stderr, success) = run_dutally(tree.path(), &["-u", "b", "--no-free"]);
    fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(success, "unreadable folders are not fatal: {}", stderr);
    assert!(stdout.contains(&format!("{}  locked\n", field("?"))));
    assert!(stdout.ends_with(&format!("{}\n", field("10"))));
}

#[test]
fn test_unlistable_root_reported_as_unknown() {
    let tree = TestTree::new();
    let root = tree.add_dir("root");
    fs::write(root.join("f"), vec![b'x'; 10]).unwrap();

    fs::set_permissions(&root, fs::Permissions::from_mode(0o311)).unwrap();
    if fs::read_dir(&root).is_ok() {
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let (stdout, stderr, success) = run_dutally(tree.path(), &["root", "-u", "b", "--no-free"]);
    fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(success, "an unlistable root is not fatal: {}", stderr);
    let expected = format!("{}  .\n{}\n{}\n", field("?"), "-".repeat(15), field("?"));
    assert_eq!(stdout, expected);
    assert!(stderr.contains("cannot list the scan root"));
}

// ============================================================================
// Special Files
// ============================================================================

#[test]
fn test_fifo_is_skipped() {
    let tree = TestTree::new();
    tree.add_file("dir/f", 25);
    nix::unistd::mkfifo(
        &tree.path().join("dir").join("pipe"),
        nix::sys::stat::Mode::S_IRWXU,
    )
    .expect("Failed to create fifo");

    let stdout = run_bytes(tree.path(), &[]);
    assert!(stdout.contains(&format!("{}  dir\n", field("25"))));
}

#[test]
fn test_unicode_names() {
    let tree = TestTree::new();
    tree.add_file("données/日本語.txt", 42);
    tree.add_file("émoji 🦀/x", 8);

    let stdout = run_bytes(tree.path(), &[]);
    assert!(stdout.contains(&format!("{}  données\n", field("42"))));
    assert!(stdout.contains(&format!("{}  émoji 🦀\n", field("8"))));
}

#[test]
fn test_names_with_spaces() {
    let tree = TestTree::new();
    tree.add_file("my folder/file name.txt", 3);

    let stdout = run_bytes(tree.path(), &[]);
    assert!(stdout.contains("  my folder\n"));
}

// ============================================================================
// Scale
// ============================================================================

#[test]
fn test_deep_nesting() {
    let tree = TestTree::new();
    let parts: Vec<String> = (0..30).map(|i| format!("n{}", i)).collect();
    tree.add_file(&format!("{}/leaf", parts.join("/")), 9);

    let stdout = run_bytes(tree.path(), &["-d", "max"]);

    let deepest = format!("{}{}n29\n", field("9"), "  ".repeat(30));
    assert!(stdout.contains(&deepest), "deepest folder indented: {}", stdout);
    assert!(stdout.ends_with(&format!("{}\n", field("9"))));
}

#[test]
fn test_many_files() {
    let tree = TestTree::new();
    for i in 0..500 {
        tree.add_file(&format!("bulk/file_{:04}.bin", i), 2);
    }

    let stdout = run_bytes(tree.path(), &[]);
    assert!(stdout.contains(&format!("{}  bulk\n", field("1,000"))));
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_hidden_included_by_default() {
    let tree = TestTree::new();
    tree.add_file(".cache/x", 100);
    tree.add_file("visible/y", 50);

    let stdout = run_bytes(tree.path(), &[]);
    assert!(stdout.contains("  .cache\n"));
    assert!(stdout.ends_with(&format!("{}\n", field("150"))));
}

#[test]
fn test_skip_hidden() {
    let tree = TestTree::new();
    tree.add_file(".cache/x", 100);
    tree.add_file(".hidden_file", 30);
    tree.add_file("visible/y", 50);

    let stdout = run_bytes(tree.path(), &["-H"]);
    assert!(!stdout.contains(".cache"));
    assert!(stdout.ends_with(&format!("{}\n", field("50"))));
}

#[test]
fn test_ignore_patterns() {
    let tree = TestTree::new();
    tree.add_file("app.log", 100);
    tree.add_file("notes.txt", 10);
    tree.add_file("node_modules/pkg/index.js", 5000);
    tree.add_file("src/main.rs", 20);

    let stdout = run_bytes(tree.path(), &["-I", "*.log", "--ignore", "node_modules"]);
    assert!(!stdout.contains("node_modules"));
    assert!(stdout.contains(&format!("{}  .\n", field("10"))));
    assert!(stdout.ends_with(&format!("{}\n", field("30"))));
}
