use super::*;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use vivarium_core::{ChannelIndex, Checksum, Dist, IndexEntry};

static TEST_STORE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn test_store() -> StoreLayout {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let sequence = TEST_STORE_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut path = std::env::temp_dir();
    path.push(format!(
        "vivarium-store-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        sequence
    ));
    let store = StoreLayout::new(path);
    store.ensure_base_dirs().expect("must create dirs");
    store
}

fn entry(name: &str, version: &str, build: &str) -> IndexEntry {
    IndexEntry {
        name: name.to_string(),
        version: version.to_string(),
        build: build.to_string(),
        channel: None,
        md5: None,
        sha256: None,
        depends: Vec::new(),
    }
}

#[test]
fn md5_of_empty_file() {
    let store = test_store();
    let path = store.root().join("empty");
    fs::write(&path, b"").expect("must write");
    assert_eq!(
        md5_hex_file(&path).expect("must hash"),
        "d41d8cd98f00b204e9800998ecf8427e"
    );
}

#[test]
fn sha256_of_known_content() {
    let store = test_store();
    let path = store.root().join("hello");
    fs::write(&path, b"hello").expect("must write");
    assert_eq!(
        sha256_hex_file(&path).expect("must hash"),
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}

#[test]
fn verify_checksum_detects_mismatch() {
    let store = test_store();
    let path = store.root().join("data");
    fs::write(&path, b"hello").expect("must write");

    let expected = Checksum::parse("5d41402abc4b2a76b9719d911017c592").expect("must parse");
    assert!(verify_file_checksum(&path, &expected).expect("must verify"));

    let wrong = Checksum::parse("d41d8cd98f00b204e9800998ecf8427e").expect("must parse");
    assert!(!verify_file_checksum(&path, &wrong).expect("must verify"));
}

#[test]
fn default_channel_gets_empty_qualifier() {
    let config = ChannelConfig::default();
    assert_eq!(
        config.qualifier_for_url("https://pkgs.example.test/main"),
        ""
    );
    assert_eq!(
        config.qualifier_for_url("https://pkgs.example.test/extras/"),
        "extras::"
    );
}

#[test]
fn file_urls_map_to_local_channel() {
    let config = ChannelConfig::default();
    assert_eq!(config.qualifier_for_url("file:///tmp/pkgs"), "local::");
}

#[test]
fn configured_channel_url_wins_over_derivation() {
    let config = parse_channel_config(
        r#"
default = "main"

[channels]
internal = "https://mirror.example.test/odd-name"
"#,
    )
    .expect("must parse");
    assert_eq!(
        config.qualifier_for_url("https://mirror.example.test/odd-name/"),
        "internal::"
    );
}

#[test]
fn configured_default_suppresses_qualifier() {
    let config = parse_channel_config(
        r#"
default = "internal"

[channels]
internal = "https://mirror.example.test/pkgs"
"#,
    )
    .expect("must parse");
    assert_eq!(
        config.qualifier_for_url("https://mirror.example.test/pkgs"),
        ""
    );
}

#[test]
fn missing_channel_config_falls_back_to_default() {
    let store = test_store();
    let config = ChannelConfig::load(&store.channels_path()).expect("must load");
    assert_eq!(config, ChannelConfig::default());
}

#[test]
fn is_url_recognizes_schemes_only() {
    assert!(is_url("https://pkgs.example.test/main/foo-1.0-0.tar.bz2"));
    assert!(is_url("file:///tmp/foo-1.0-0.tar.bz2"));
    assert!(!is_url("/tmp/foo-1.0-0.tar.bz2"));
    assert!(!is_url("C:\\pkgs\\foo-1.0-0.tar.bz2"));
}

#[test]
fn split_location_yields_parent_and_file_name() {
    let (parent, file_name) =
        split_location("https://pkgs.example.test/main/foo-1.0-0.tar.bz2").expect("must split");
    assert_eq!(parent, "https://pkgs.example.test/main");
    assert_eq!(file_name, "foo-1.0-0.tar.bz2");

    assert!(split_location("no-slashes").is_err());
}

#[test]
fn file_url_round_trip() {
    let store = test_store();
    let path = store.root().join("foo-1.0-0.tar.bz2");
    fs::write(&path, b"archive").expect("must write");

    let url = file_url_from_path(&path).expect("must convert");
    assert!(url.starts_with("file://"));
    let back: PathBuf = path_from_file_url(&url).expect("must convert back");
    assert_eq!(
        back.file_name().and_then(|v| v.to_str()),
        Some("foo-1.0-0.tar.bz2")
    );
}

#[test]
fn url_records_round_trip() {
    let store = test_store();
    let url = "https://pkgs.example.test/extras/bar-2.0-1.tar.bz2";
    record_fetched_url(&store, url, "extras::").expect("must record");
    record_fetched_url(&store, url, "extras::").expect("must dedupe");

    let recorded = recorded_qualifier_for_url(&store, url).expect("must read");
    assert_eq!(recorded.as_deref(), Some("extras::"));
    assert_eq!(
        recorded_qualifier_for_url(&store, "https://other.example.test/x.tar.bz2")
            .expect("must read"),
        None
    );

    let content = fs::read_to_string(store.urls_path()).expect("must read file");
    assert_eq!(content.lines().count(), 1);
}

#[test]
fn is_fetched_requires_matching_qualifier() {
    let store = test_store();
    let dist = Dist::new("foo-1.0-0");
    assert!(is_fetched(&store, &dist).expect("must query").is_none());

    fs::write(store.archive_path(&dist), b"archive").expect("must write");
    assert!(is_fetched(&store, &dist).expect("must query").is_some());

    let qualified = Dist::new("extras::foo-1.0-0");
    assert!(is_fetched(&store, &qualified).expect("must query").is_none());
}

#[test]
fn cache_conflict_reports_other_owner() {
    let store = test_store();
    let dist = Dist::new("extras::foo-1.0-0");
    assert!(find_cache_conflict(&store, &dist)
        .expect("must query")
        .is_none());

    fs::write(store.archive_path(&dist), b"archive").expect("must write");
    record_fetched_url(
        &store,
        "https://pkgs.example.test/main/foo-1.0-0.tar.bz2",
        "",
    )
    .expect("must record");

    let conflict = find_cache_conflict(&store, &dist)
        .expect("must query")
        .expect("must conflict");
    assert_eq!(conflict.as_str(), "foo-1.0-0");

    assert!(is_fetched(&store, &Dist::new("foo-1.0-0"))
        .expect("must query")
        .is_some());
}

#[test]
fn index_cache_fetches_each_collection_once() {
    let mut cache = IndexCache::new();
    let mut calls = 0;
    let mut fetch = |_: &str| {
        calls += 1;
        let mut index = ChannelIndex::default();
        index
            .packages
            .insert("foo-1.0-0.tar.bz2".to_string(), entry("foo", "1.0", "0"));
        Ok(index)
    };

    cache
        .ensure_channel("https://pkgs.example.test/extras/", "extras::", &mut fetch)
        .expect("must fetch");
    cache
        .ensure_channel("https://pkgs.example.test/extras", "extras::", &mut fetch)
        .expect("must not refetch");

    assert_eq!(calls, 1);
    assert!(cache.lookup("extras::foo-1.0-0.tar.bz2").is_some());
    assert!(cache.lookup("foo-1.0-0.tar.bz2").is_none());
    assert!(cache.has_fetched("https://pkgs.example.test/extras"));
}

#[test]
fn local_channel_index_missing_file_is_empty() {
    let store = test_store();
    let index = read_local_channel_index(store.root()).expect("must read");
    assert!(index.packages.is_empty());
}

#[test]
fn local_channel_index_parses_entries() {
    let store = test_store();
    fs::write(
        store.root().join(INDEX_FILE_NAME),
        r#"{
  "packages": {
    "foo-1.0-0.tar.bz2": {
      "name": "foo",
      "version": "1.0",
      "build": "0",
      "md5": "d41d8cd98f00b204e9800998ecf8427e",
      "depends": ["bar"]
    }
  }
}"#,
    )
    .expect("must write");

    let index = read_local_channel_index(store.root()).expect("must read");
    let entry = index
        .packages
        .get("foo-1.0-0.tar.bz2")
        .expect("must contain entry");
    assert_eq!(entry.name, "foo");
    assert_eq!(entry.depends, vec!["bar"]);
    assert_eq!(
        entry.md5.as_deref(),
        Some("d41d8cd98f00b204e9800998ecf8427e")
    );
}
