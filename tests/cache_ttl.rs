// tests/cache_ttl.rs
use std::fs;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use lm_scrape::config::options::CacheOptions;
use lm_scrape::core::clock::ManualClock;
use lm_scrape::model::{GuildRecord, PlayerRecord};
use lm_scrape::store::{KindRegistry, TtlCache};

const TTL: Duration = Duration::from_secs(6 * 60 * 60);

fn guild() -> GuildRecord {
    GuildRecord {
        kingdom: 140,
        name: "Iron Wolves".into(),
        tag: "IWF".into(),
        might: 1_260_000_000,
        language: "Russian".into(),
        member_count: 2,
        members: vec![PlayerRecord { name: "Ann".into(), might: 90_000_000, ..Default::default() }],
        ..Default::default()
    }
}

#[test]
fn round_trip_inside_ttl_then_miss() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(SystemTime::now()));
    let cache = TtlCache::with_clock(dir.path(), TTL, KindRegistry::standard(), Box::new(clock.clone())).unwrap();

    cache.store("Iron Wolves", &guild()).unwrap();
    assert_eq!(cache.try_load::<GuildRecord>("Iron Wolves").unwrap(), Some(guild()));

    clock.advance(TTL - Duration::from_secs(5));
    assert!(cache.try_load::<GuildRecord>("Iron Wolves").unwrap().is_some());

    clock.advance(Duration::from_secs(10));
    assert_eq!(cache.try_load::<GuildRecord>("Iron Wolves").unwrap(), None);
}

#[test]
fn missing_and_corrupt_entries_are_misses() {
    let dir = tempfile::tempdir().unwrap();
    let cache = TtlCache::open(&CacheOptions { root: dir.path().to_path_buf(), ttl: TTL }).unwrap();

    assert_eq!(cache.try_load::<PlayerRecord>("nobody").unwrap(), None);

    let path = cache.entry_path::<PlayerRecord>("broken").unwrap();
    fs::write(&path, "{\"name\": \"broken\", \"might\": ").unwrap();
    assert_eq!(cache.try_load::<PlayerRecord>("broken").unwrap(), None);

    cache.store("broken", &PlayerRecord { name: "broken".into(), might: 3, ..Default::default() }).unwrap();
    assert_eq!(cache.try_load::<PlayerRecord>("broken").unwrap().map(|p| p.might), Some(3));
}

#[test]
fn names_map_to_safe_file_stems() {
    let dir = tempfile::tempdir().unwrap();
    let cache = TtlCache::open(&CacheOptions { root: dir.path().to_path_buf(), ttl: TTL }).unwrap();

    cache.store("../../etc/passwd", &PlayerRecord::default()).unwrap();
    let path = cache.entry_path::<PlayerRecord>("../../etc/passwd").unwrap();
    assert!(path.starts_with(dir.path().join("cache").join("players")));
    assert!(path.exists());
}
