// tests/scan_e2e.rs
//
// Whole scan against a scripted site: no network, temp store root.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use lm_scrape::ScrapeError;
use lm_scrape::accumulator::{ResultAccumulator, load_snapshot};
use lm_scrape::config::options::{CacheOptions, ScanOptions};
use lm_scrape::core::CancelToken;
use lm_scrape::core::clock::RecordingSleeper;
use lm_scrape::core::net::Transport;
use lm_scrape::fetch::{PageFetcher, RetryPolicy, Retrying};
use lm_scrape::ledger::Ledger;
use lm_scrape::progress::Progress;
use lm_scrape::quota::QuotaTable;
use lm_scrape::scan::{KingdomOutcome, Scanner};
use lm_scrape::store::TtlCache;

const BASE: &str = "https://lm.test/en/";

/// URL → page. Unknown URLs answer like a 404. Requesting `trip` cancels `cancel`.
struct Site {
    pages: HashMap<String, String>,
    requested: RefCell<Vec<String>>,
    trip: Option<(String, CancelToken)>,
}

impl Site {
    fn new() -> Self {
        let mut pages = HashMap::new();
        let mut page = |path: &str, html: String| {
            pages.insert(format!("{BASE}{path}"), html);
        };

        page("player/Bob", s(r#"<div class="playerdesc">Bob has a might of 500 and kills of 3.</div>"#));
        page(
            "kingdom",
            s(r#"<div class="mosaicview1"><div class="col-md-3 kingdom"><div>
                <div><a href="/en/kingdom/10-Alpha">10</a></div>
                <div><a href="/en/kingdom/20-Beta">20</a></div>
                <div><a href="/en/kingdom/30-Gamma">30</a></div>
                <div><a href="/en/kingdom/40-Delta">40</a></div>
            </div></div></div>"#),
        );

        page("kingdom/Alpha/ranking/player/power/", ranking(&[900, 700, 400]));
        page("kingdom/Alpha/ranking/player/power/2", ranking(&[]));
        page(
            "kingdom/Alpha/ranking/alliance/power",
            listing(&[("Wolves", "WLF", 2_000_000), ("Eagles", "EGL", 1_500_000)]),
        );
        page("alliance/Wolves", detail(3, "Russian"));
        page("alliance/Eagles", detail(5, "English"));

        // Beta has no ranking pages at all.

        page("kingdom/Gamma/ranking/player/power/", ranking(&[300, 200]));
        page("kingdom/Gamma/ranking/player/power/2", ranking(&[100]));

        // Delta ranks the player third but has no alliance listing.
        page("kingdom/Delta/ranking/player/power/", ranking(&[900, 700, 400]));
        page("kingdom/Delta/ranking/player/power/2", ranking(&[]));

        Self { pages, requested: RefCell::new(Vec::new()), trip: None }
    }

    fn cancel_on(mut self, path: &str, token: CancelToken) -> Self {
        self.trip = Some((format!("{BASE}{path}"), token));
        self
    }
}

impl Transport for Site {
    fn get(&self, url: &str) -> lm_scrape::Result<String> {
        self.requested.borrow_mut().push(url.to_string());
        if let Some((trip, token)) = &self.trip {
            if trip == url {
                token.cancel();
            }
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::parse(format!("HTTP 404 Not Found from {url}")))
    }
}

fn s(x: &str) -> String {
    x.to_string()
}

fn ranking(mights: &[u64]) -> String {
    let mut html = s(r#"<div class="detaildedbody"><div class="toptab">"#);
    html.push_str("<div class=\"toptabrow\"><div>#</div><div>Name</div><div>Tag</div><div>Alliance</div><div>Might</div></div>");
    for (i, m) in mights.iter().enumerate() {
        html.push_str(&format!(
            r#"<div class="toptabrow"><div>{n}</div><div><a href="/en/player/P{n}">P{n}</a></div><div>T</div><div>G</div><div>{m}</div></div>"#,
            n = i + 1
        ));
    }
    html.push_str("</div></div>");
    html
}

fn listing(guilds: &[(&str, &str, u64)]) -> String {
    let mut html = s(r#"<div class="detaildedbody"><div class="toptab">"#);
    for (i, (name, tag, might)) in guilds.iter().enumerate() {
        html.push_str(&format!(
            r#"<div class="toptabrow"><div>{}</div><div><a href="/en/alliance/{name}">{name}</a></div><div>{tag}</div><div>{might}</div><div>0</div></div>"#,
            i + 1
        ));
    }
    html.push_str("</div></div>");
    html
}

fn detail(members: u32, language: &str) -> String {
    format!(
        r#"<div class="allidesc">This alliance has {members} members. The alliance language is {language}.</div>
        <div class="section"><div class="title">Alliance members</div><div><div class="toptab">
          <div class="toptabrow"><div>1</div><div><a href="/en/player/Ann">Ann</a></div><div>R5</div><div></div><div>90,000,000</div><div>12</div></div>
        </div></div></div>"#
    )
}

#[derive(Default)]
struct Recorder {
    done: Vec<u32>,
    failed: Vec<u32>,
    finished: bool,
}

impl Progress for Recorder {
    fn item_done(&mut self, kingdom: u32) {
        self.done.push(kingdom);
    }
    fn item_failed(&mut self, kingdom: u32, _error: &str) {
        self.failed.push(kingdom);
    }
    fn finish(&mut self) {
        self.finished = true;
    }
}

struct Store {
    cache: TtlCache,
    ledger: Ledger,
    acc: ResultAccumulator,
}

fn store(root: &Path) -> Store {
    let cache = TtlCache::open(&CacheOptions { root: root.to_path_buf(), ttl: Duration::from_secs(3600) }).unwrap();
    let ledger = Ledger::load(root.join("migration.txt")).unwrap();
    let acc = ResultAccumulator::new(cache.path_for("matches.json"), root.join("List.txt"));
    Store { cache, ledger, acc }
}

fn options(kingdoms: Vec<u32>) -> ScanOptions {
    ScanOptions { player: s("Bob"), kingdoms, threshold: 50, ..Default::default() }
}

#[test]
fn failing_kingdom_does_not_abort_the_scan() {
    let dir = tempfile::tempdir().unwrap();
    let mut st = store(dir.path());
    let site = Site::new();
    let fetcher = Retrying::with_sleeper(PageFetcher::new(&site), RetryPolicy::default(), RecordingSleeper::default());
    let quota = QuotaTable::canonical().unwrap();
    let scanner = Scanner::new(&fetcher, &st.cache, &quota, BASE, CancelToken::new());
    let mut progress = Recorder::default();

    let report = scanner
        .run(&options(vec![10, 20, 30, 99]), &dir.path().join("kingdoms.json"), &mut st.ledger, &mut st.acc, &mut progress)
        .unwrap();

    assert_eq!(
        report.scan.kingdoms,
        vec![
            KingdomOutcome { kingdom: 10, rank: 3, quota: 50, matched: 1 },
            KingdomOutcome { kingdom: 30, rank: 1, quota: 90, matched: 0 },
        ]
    );
    assert_eq!(report.scan.failed.len(), 1);
    assert_eq!(report.scan.failed[0].0, 20);
    assert_eq!(report.scan.skipped, vec![99]);
    assert!(!report.scan.cancelled);
    assert_eq!(progress.done, vec![10, 30]);
    assert_eq!(progress.failed, vec![20]);
    assert!(progress.finished);

    assert_eq!(fs::read_to_string(dir.path().join("migration.txt")).unwrap(), "10; 50\n30; 90\n");
    assert_eq!(
        fs::read_to_string(dir.path().join("List.txt")).unwrap(),
        "#10; Wolves / WLF; 2 M; 3 members\n"
    );
    let snapshot = load_snapshot(&dir.path().join("cache").join("matches.json")).unwrap();
    assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["WLF"]);
    assert_eq!(snapshot["WLF"].members[0].name, "Ann");

    // Profile, kingdom index and guild pages are now cached.
    assert!(dir.path().join("kingdoms.json").exists());
    assert!(dir.path().join("cache/players/Bob.json").exists());
    assert!(dir.path().join("cache/guilds/Wolves.json").exists());
    assert!(dir.path().join("cache/guilds/Eagles.json").exists());
}

#[test]
fn kingdom_failing_after_its_quota_is_left_out_of_the_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let mut st = store(dir.path());
    let site = Site::new();
    let fetcher = PageFetcher::new(&site);
    let quota = QuotaTable::canonical().unwrap();
    let scanner = Scanner::new(&fetcher, &st.cache, &quota, BASE, CancelToken::new());
    let mut progress = Recorder::default();

    let report = scanner
        .run(&options(vec![40, 30]), &dir.path().join("kingdoms.json"), &mut st.ledger, &mut st.acc, &mut progress)
        .unwrap();

    assert!(site.requested.borrow().iter().any(|u| u.ends_with("kingdom/Delta/ranking/alliance/power")));
    assert_eq!(report.scan.failed.len(), 1);
    assert_eq!(report.scan.failed[0].0, 40);
    assert_eq!(report.scan.kingdoms, vec![KingdomOutcome { kingdom: 30, rank: 1, quota: 90, matched: 0 }]);
    assert_eq!(progress.failed, vec![40]);
    assert_eq!(fs::read_to_string(dir.path().join("migration.txt")).unwrap(), "30; 90\n");
    assert_eq!(st.ledger.get(40), None);
}

#[test]
fn second_run_uses_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let quota = QuotaTable::canonical().unwrap();

    for _ in 0..2 {
        let mut st = store(dir.path());
        let site = Site::new();
        let fetcher = PageFetcher::new(&site);
        let scanner = Scanner::new(&fetcher, &st.cache, &quota, BASE, CancelToken::new());
        scanner
            .run(&options(vec![10]), &dir.path().join("kingdoms.json"), &mut st.ledger, &mut st.acc, &mut Recorder::default())
            .unwrap();

        let requested = site.requested.borrow();
        if requested.iter().any(|u| u.ends_with("/kingdom")) {
            // First run: everything comes from the site.
            assert!(requested.iter().any(|u| u.ends_with("alliance/Wolves")));
        } else {
            assert!(!requested.iter().any(|u| u.contains("/player/Bob")));
            assert!(!requested.iter().any(|u| u.contains("/alliance/Wolves")));
            assert!(!requested.iter().any(|u| u.contains("/alliance/Eagles")));
        }
    }

    let snapshot = load_snapshot(&dir.path().join("cache").join("matches.json")).unwrap();
    assert_eq!(snapshot.len(), 1);
}

#[test]
fn cancellation_stops_the_loop_and_still_flushes() {
    let dir = tempfile::tempdir().unwrap();
    let mut st = store(dir.path());
    let cancel = CancelToken::new();
    let site = Site::new().cancel_on("kingdom/Gamma/ranking/player/power/", cancel.clone());
    let fetcher = Retrying::with_sleeper(PageFetcher::new(&site), RetryPolicy::default(), RecordingSleeper::default());
    let quota = QuotaTable::canonical().unwrap();
    let scanner = Scanner::new(&fetcher, &st.cache, &quota, BASE, cancel.clone());
    let mut progress = Recorder::default();

    let report = scanner
        .run(&options(vec![10, 30, 20]), &dir.path().join("kingdoms.json"), &mut st.ledger, &mut st.acc, &mut progress)
        .unwrap();

    assert!(report.scan.cancelled);
    assert_eq!(progress.done, vec![10]);
    assert!(progress.failed.is_empty());
    assert_eq!(report.flush.added, 1);
    assert!(fs::read_to_string(dir.path().join("List.txt")).unwrap().contains("Wolves / WLF"));
    assert!(!site.requested.borrow().iter().any(|u| u.contains("Beta")));
}

#[test]
fn unknown_player_fails_the_run_but_keeps_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let mut st = store(dir.path());
    let site = Site::new();
    let fetcher = PageFetcher::new(&site);
    let quota = QuotaTable::canonical().unwrap();
    let scanner = Scanner::new(&fetcher, &st.cache, &quota, BASE, CancelToken::new());

    let opts = ScanOptions { player: s("Nobody"), ..options(vec![10]) };
    let res = scanner.run(&opts, &dir.path().join("kingdoms.json"), &mut st.ledger, &mut st.acc, &mut Recorder::default());

    assert!(matches!(res, Err(ScrapeError::ContentParse(_))));
    assert_eq!(fs::read_to_string(dir.path().join("cache").join("matches.json")).unwrap(), "{}");
}
