use meditree_scan::{BuildConfig, Classifier, Classify, TreeBuilder, TreeNode, WarningKind};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn video_only() -> Classifier {
    Classifier::new([("*.mp4", "video")]).unwrap()
}

fn assert_no_empty_dirs(node: &TreeNode) {
    if let Some(children) = node.children() {
        for child in children.values() {
            if child.is_dir() {
                assert!(child.child_count() > 0, "empty dir {}", child.relative_path);
                assert_no_empty_dirs(child);
            }
        }
    }
}

#[test]
fn test_nested_media_keeps_ancestors() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("a/b")).unwrap();
    fs::write(temp.path().join("a/b/movie.mp4"), b"12345").unwrap();
    fs::write(temp.path().join("a/notes.txt"), b"notes").unwrap();

    let tree = TreeBuilder::new()
        .build(&BuildConfig::new(temp.path()), &video_only())
        .unwrap();

    assert_eq!(
        tree.root.to_json(),
        json!({
            "a": { "b": { "movie.mp4": { "type": "video", "size": 5, "path": "a/b/movie.mp4" } } }
        })
    );
    let a = tree.root.child("a").unwrap();
    assert!(a.child("notes.txt").is_none());
}

#[test]
fn test_empty_directory_is_absent() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("empty/deeper/still")).unwrap();
    fs::write(temp.path().join("empty/deeper/readme.txt"), b"x").unwrap();
    fs::write(temp.path().join("clip.mp4"), b"x").unwrap();

    let tree = TreeBuilder::new()
        .build(&BuildConfig::new(temp.path()), &video_only())
        .unwrap();

    let listing = tree.root.to_json();
    assert!(listing.get("empty").is_none());
    assert!(listing.get("clip.mp4").is_some());
    assert_no_empty_dirs(&tree.root);
}

#[test]
fn test_root_without_media_is_empty_tree() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("docs")).unwrap();
    fs::write(temp.path().join("docs/a.txt"), b"x").unwrap();

    let tree = TreeBuilder::new()
        .build(&BuildConfig::new(temp.path()), &video_only())
        .unwrap();

    assert!(tree.root.is_dir());
    assert_eq!(tree.root.child_count(), 0);
    assert_eq!(tree.root.to_json(), json!({}));
}

#[test]
fn test_only_classified_files_appear() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("mix")).unwrap();
    for name in ["a.mp4", "b.mkv", "c.png", "d.txt", "e"] {
        fs::write(temp.path().join("mix").join(name), b"x").unwrap();
    }
    let classifier = Classifier::new([("*.mp4", "video"), ("*.mkv", "video"), ("*.png", "image")])
        .unwrap();

    let tree = TreeBuilder::new()
        .build(&BuildConfig::new(temp.path()), &classifier)
        .unwrap();

    let mut seen = Vec::new();
    tree.root.for_each_file(&mut |file: &TreeNode| {
        let tag = Classify::classify(&classifier, &file.name).unwrap();
        assert_eq!(file.type_tag(), Some(tag.as_str()));
        seen.push(file.name.to_string());
    });
    assert_eq!(seen, vec!["a.mp4", "b.mkv", "c.png"]);
    assert_eq!(tree.stats.excluded_files, 2);
}

#[test]
fn test_ambiguous_patterns_pick_a_configured_tag() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("movie.mp4"), b"x").unwrap();
    let classifier = Classifier::new([("*.mp4", "video"), ("movie.*", "feature")]).unwrap();

    let tree = TreeBuilder::new()
        .build(&BuildConfig::new(temp.path()), &classifier)
        .unwrap();

    let tag = tree.resolve(["movie.mp4"]).unwrap().type_tag().unwrap();
    assert!(["video", "feature"].contains(&tag));
}

#[test]
fn test_closure_classifier() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("track.ogg"), b"x").unwrap();
    fs::write(temp.path().join("track.txt"), b"x").unwrap();

    let classify = |name: &str| name.ends_with(".ogg").then(|| "audio".to_string());
    let tree = TreeBuilder::new()
        .build(&BuildConfig::new(temp.path()), &classify)
        .unwrap();

    assert_eq!(tree.total_files(), 1);
    assert_eq!(tree.resolve(["track.ogg"]).unwrap().type_tag(), Some("audio"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_omitted() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let locked = temp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("secret.mp4"), b"x").unwrap();
    fs::write(temp.path().join("open.mp4"), b"x").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read the directory anyway
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = TreeBuilder::new().build(&BuildConfig::new(temp.path()), &video_only());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let tree = result.unwrap();

    assert!(tree.resolve(["open.mp4"]).is_some());
    assert!(tree.root.child("locked").is_none());
    assert!(tree.has_omissions());
    assert!(tree.omissions.iter().any(|w| matches!(
        w.kind,
        WarningKind::PermissionDenied | WarningKind::ReadError
    )));
}

#[cfg(unix)]
#[test]
fn test_symlink_cycle_is_recorded_and_skipped() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("a")).unwrap();
    fs::write(temp.path().join("a/movie.mp4"), b"x").unwrap();
    std::os::unix::fs::symlink(temp.path(), temp.path().join("a/loop")).unwrap();

    let config = BuildConfig::builder()
        .root(temp.path())
        .follow_symlinks(true)
        .build()
        .unwrap();
    let tree = TreeBuilder::new().build(&config, &video_only()).unwrap();

    assert!(tree.resolve(["a", "movie.mp4"]).is_some());
    assert!(tree.resolve(["a", "loop", "a", "movie.mp4"]).is_none());
    assert_eq!(tree.total_files(), 1);
    assert!(
        tree.omissions
            .iter()
            .any(|w| w.kind == WarningKind::SymlinkLoop)
    );
}

#[cfg(unix)]
#[test]
fn test_dangling_media_link_is_omitted() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("kept.mp4"), b"x").unwrap();
    std::os::unix::fs::symlink(temp.path().join("gone.mp4"), temp.path().join("broken.mp4"))
        .unwrap();

    let tree = TreeBuilder::new()
        .build(&BuildConfig::new(temp.path()), &video_only())
        .unwrap();

    assert!(tree.resolve(["kept.mp4"]).is_some());
    assert!(tree.resolve(["broken.mp4"]).is_none());
    assert_eq!(tree.omissions.len(), 1);
    assert_eq!(tree.omissions[0].kind, WarningKind::MetadataError);
    assert!(tree.omissions[0].path.ends_with("broken.mp4"));
}

#[cfg(unix)]
#[test]
fn test_link_to_media_file_is_indexed() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("store")).unwrap();
    fs::write(temp.path().join("store/real.mp4"), b"0123456").unwrap();
    std::os::unix::fs::symlink(temp.path().join("store/real.mp4"), temp.path().join("link.mp4"))
        .unwrap();

    let tree = TreeBuilder::new()
        .build(&BuildConfig::new(temp.path()), &video_only())
        .unwrap();

    let link = tree.resolve(["link.mp4"]).unwrap();
    assert_eq!(link.type_tag(), Some("video"));
    assert_eq!(link.size(), Some(7));
    assert_eq!(link.relative_path, "link.mp4");
    assert!(tree.resolve(["store", "real.mp4"]).is_some());
    assert_eq!(tree.total_files(), 2);
    assert!(tree.omissions.is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlinks_skipped_when_not_followed() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("real")).unwrap();
    fs::write(temp.path().join("real/movie.mp4"), b"x").unwrap();
    std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("alias")).unwrap();

    let tree = TreeBuilder::new()
        .build(&BuildConfig::new(temp.path()), &video_only())
        .unwrap();

    assert!(tree.resolve(["real", "movie.mp4"]).is_some());
    assert!(tree.root.child("alias").is_none());
}
