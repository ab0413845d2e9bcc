use std::fs::Permissions;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use rfs_tree::rank::{by_dir, by_name, by_perm, by_size, by_time, less, ByContent, Rank};
use rfs_tree::{collect_entries, temp_create_dir, tree_diff, Difference, FileEntry, FsTreeError};

const TREE: &str = r#"
- !file
    name: aaa
    content: !inline_text "aaa"
- !file
    name: aaaa
    content: !inline_text "aaaa"
- !file
    name: ab
    content: !inline_text "ab"
- !file
    name: a
    content: !inline_text "a"
- !file
    name: locked.txt
    mode: "0600"
    content: !inline_text "ab"
- !directory
    name: zdir
    content: []
"#;

fn entry(root: &Path, name: &str) -> FileEntry {
    FileEntry::from_path(root.join(name)).unwrap()
}

#[test]
fn content_order_ignores_length() -> Result<(), FsTreeError> {
    let (root, teardown) = temp_create_dir(TREE.as_bytes())?;
    let content: ByContent = ByContent::default();

    assert!(content.less(&entry(&root, "aaa"), &entry(&root, "ab")));
    assert!(content.less(&entry(&root, "aaaa"), &entry(&root, "ab")));
    // right side runs out first
    assert!(!content.less(&entry(&root, "ab"), &entry(&root, "a")));
    assert!(content.less(&entry(&root, "a"), &entry(&root, "ab")));

    teardown.run();
    Ok(())
}

#[test]
fn size_before_content_reverses_the_verdict() -> Result<(), FsTreeError> {
    let (root, teardown) = temp_create_dir(TREE.as_bytes())?;
    let content: ByContent = ByContent::default();
    let aaa = entry(&root, "aaa");
    let ab = entry(&root, "ab");

    let size_first: [&dyn Rank; 2] = [&by_size, &content];
    assert!(less(&ab, &aaa, &size_first));
    // by_size says nothing for ab > aaa, content then decides aaa < ab
    assert!(less(&aaa, &ab, &size_first));

    let size_only: [&dyn Rank; 1] = [&by_size];
    assert!(!less(&aaa, &ab, &size_only));

    teardown.run();
    Ok(())
}

#[test]
fn directories_first_then_names() -> Result<(), FsTreeError> {
    let (root, teardown) = temp_create_dir(TREE.as_bytes())?;
    let zdir = entry(&root, "zdir");
    let a = entry(&root, "a");
    let chain: [&dyn Rank; 2] = [&by_dir, &by_name];

    assert!(less(&zdir, &a, &chain));
    assert!(!less(&a, &zdir, &chain));
    assert!(less(&a, &entry(&root, "ab"), &chain));
    assert!(!less(&a, &a, &chain));

    teardown.run();
    Ok(())
}

#[test]
fn permissions_and_times_of_real_files() -> Result<(), FsTreeError> {
    let (root, teardown) = temp_create_dir(TREE.as_bytes())?;
    let locked = entry(&root, "locked.txt");
    let ab = entry(&root, "ab");

    std::fs::set_permissions(root.join("ab"), Permissions::from_mode(0o644))?;
    let ab = FileEntry::from_path(ab.path())?;
    assert!(by_perm(&locked, &ab));
    assert!(!by_perm(&ab, &locked));

    // same file, same timestamp: never less in either direction
    assert!(!by_time(&ab, &ab));

    teardown.run();
    Ok(())
}

#[test]
fn cloned_tree_has_no_differences() -> Result<(), FsTreeError> {
    let (root, teardown) = temp_create_dir(TREE.as_bytes())?;
    let (clone, clone_teardown) = rfs_tree::temp_clone_dir(&root)?;
    let content: ByContent = ByContent::default();
    let chain: [&dyn Rank; 4] = [&by_dir, &by_perm, &by_size, &content];

    assert!(tree_diff(&root, &clone, &chain)?.is_empty());

    std::fs::write(clone.join("aaa"), "aab")?;
    std::fs::remove_file(clone.join("a"))?;
    assert_eq!(
        tree_diff(&root, &clone, &chain)?,
        vec![
            Difference::OnlyLeft("a".into()),
            Difference::Mismatch("aaa".into()),
        ]
    );
    assert_eq!(collect_entries(&clone)?.len(), 5);

    clone_teardown.run();
    teardown.run();
    Ok(())
}

#[test]
#[should_panic(expected = "content comparison failed")]
fn content_of_vanished_file_is_fatal() {
    let (root, _teardown) = temp_create_dir(TREE.as_bytes()).unwrap();
    let a = entry(&root, "a");
    let ab = entry(&root, "ab");
    std::fs::remove_file(root.join("ab")).unwrap();

    let content: ByContent = ByContent::default();
    content.less(&a, &ab);
}
