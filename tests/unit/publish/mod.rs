use super::*;

#[test]
fn keys_are_checked() {
    validate_key("avatars/avatar_s1_avatar_abc.mp4").unwrap();
    for bad in [
        "",
        "  ",
        "../escape.mp4",
        "avatars/../../x",
        "avatars//x.mp4",
        "/abs.mp4",
        "avatars\\x.mp4",
        "avatars/./x.mp4",
    ] {
        assert!(validate_key(bad).is_err(), "{bad:?} should be rejected");
    }
}

#[tokio::test]
async fn local_publisher_writes_and_returns_url() {
    let dir = tempfile::tempdir().unwrap();
    let p = LocalPublisher::new(dir.path(), "https://cdn.example.test/").unwrap();
    let url = p
        .publish("avatars/a.mp4", b"mp4 bytes".to_vec(), "video/mp4")
        .await
        .unwrap();
    assert_eq!(url, "https://cdn.example.test/avatars/a.mp4");
    let stored = std::fs::read(dir.path().join("avatars/a.mp4")).unwrap();
    assert_eq!(stored, b"mp4 bytes");
    assert!(!dir.path().join("avatars/a.part").exists());
}

#[tokio::test]
async fn local_publisher_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let p = LocalPublisher::file_urls(dir.path()).unwrap();
    p.publish("x.png", vec![1], "image/png").await.unwrap();
    let url = p.publish("x.png", vec![2, 3], "image/png").await.unwrap();
    assert!(url.starts_with("file://"));
    assert!(url.ends_with("/x.png"));
    assert_eq!(std::fs::read(p.path_for("x.png")).unwrap(), vec![2, 3]);
}

#[tokio::test]
async fn local_publisher_rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let p = LocalPublisher::new(dir.path(), "http://h").unwrap();
    let err = p
        .publish("../outside.mp4", vec![0], "video/mp4")
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("publish error:"));
}

#[test]
fn empty_root_is_rejected() {
    assert!(LocalPublisher::new("", "http://h").is_err());
}
