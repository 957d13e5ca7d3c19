//! Integration tests for `blocklist-pruner`.
//!
//! The DoH transport and HTTP prober are replaced by in-memory fakes, so
//! these tests exercise classification, resolution, caching and decisions
//! end to end without touching the network.

use blocklist_pruner::doh::DohRecord;
use blocklist_pruner::{
    DohResolver, DohResponse, DohTransport, LivenessEngine, Probe, Pruner, PrunerConfig,
    RecordType, Resolve, files,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Zone data shared by every configured endpoint.
#[derive(Default)]
struct Zone {
    records: HashMap<(String, RecordType), DohResponse>,
    queries: RefCell<Vec<String>>,
}

impl Zone {
    fn record(mut self, name: &str, record_type: RecordType, data: &str) -> Self {
        self.records.insert(
            (name.to_string(), record_type),
            DohResponse {
                status: 0,
                answer: Some(vec![DohRecord {
                    record_type: record_type.code(),
                    data: Some(data.to_string()),
                }]),
                authority: None,
            },
        );
        self
    }

    /// Delegated name with no address: every query answers with an SOA.
    fn soa_only(mut self, name: &str) -> Self {
        for record_type in RecordType::QUERIED {
            self.records.insert(
                (name.to_string(), record_type),
                DohResponse {
                    status: 0,
                    answer: None,
                    authority: Some(vec![DohRecord {
                        record_type: RecordType::Soa.code(),
                        data: Some(format!("ns1.{name}. hostmaster.{name}. 1 7200 900 1209600 86400")),
                    }]),
                },
            );
        }
        self
    }

    fn queries_for(&self, name: &str) -> usize {
        self.queries.borrow().iter().filter(|q| *q == name).count()
    }
}

impl DohTransport for Zone {
    fn query(&self, _endpoint: &str, name: &str, record_type: RecordType) -> Option<DohResponse> {
        self.queries.borrow_mut().push(name.to_string());
        Some(
            self.records
                .get(&(name.to_string(), record_type))
                .cloned()
                .unwrap_or(DohResponse {
                    status: 3,
                    answer: None,
                    authority: None,
                }),
        )
    }
}

#[derive(Default)]
struct Web {
    up: HashSet<String>,
    probes: RefCell<Vec<String>>,
}

impl Web {
    fn serving(urls: &[&str]) -> Self {
        Self {
            up: urls.iter().map(ToString::to_string).collect(),
            probes: RefCell::default(),
        }
    }
}

impl Probe for Web {
    fn responds(&self, url: &str) -> bool {
        self.probes.borrow_mut().push(url.to_string());
        self.up.contains(url)
    }
}

fn config() -> PrunerConfig {
    PrunerConfig::new().with_endpoints(["https://doh.test/dns-query"])
}

fn pruner<'a>(zone: &'a Zone, web: &'a Web) -> Pruner<DohResolver<&'a Zone>, &'a Web> {
    let config = config();
    Pruner::new(LivenessEngine::new(DohResolver::new(zone, &config), web))
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn end_to_end_scenario() {
    let zone = Zone::default().record("live.example.com", RecordType::A, "93.184.216.34");
    let web = Web::serving(&["http://full.example.com/path"]);

    let report = pruner(&zone, &web).run([
        "# comment",
        "",
        "live.example.com",
        "dead.example.invalid",
        "http://full.example.com/path",
    ]);

    assert_eq!(
        report.kept,
        ["# comment", "", "live.example.com", "http://full.example.com/path"]
    );
    assert_eq!(report.removed, ["dead.example.invalid"]);
    assert!(report.skipped.is_empty());
    assert_eq!(report.checked, 3);
}

#[test]
fn regex_rule_is_skipped_and_preserved() {
    let zone = Zone::default();
    let web = Web::default();

    let report = pruner(&zone, &web).run(["/ads-.*\\.js$"]);

    assert_eq!(report.kept, ["/ads-.*\\.js$"]);
    assert_eq!(report.skipped, ["/ads-.*\\.js$"]);
    assert!(report.removed.is_empty());
    assert!(zone.queries.borrow().is_empty());
    assert!(web.probes.borrow().is_empty());
}

#[test]
fn sinkholed_domain_is_kept() {
    let zone = Zone::default().record("tracker.example.com", RecordType::A, "0.0.0.0");
    let web = Web::default();

    let report = pruner(&zone, &web).run(["tracker.example.com"]);

    assert_eq!(report.kept, ["tracker.example.com"]);
    assert!(web.probes.borrow().is_empty());
}

#[test]
fn delegated_domain_with_serving_www_is_kept() {
    let zone = Zone::default().soa_only("example.org");
    let web = Web::serving(&["https://www.example.org"]);

    let report = pruner(&zone, &web).run(["example.org"]);

    assert_eq!(report.kept, ["example.org"]);
    assert!(report.removed.is_empty());
}

#[test]
fn cname_cycle_terminates() {
    let zone = Zone::default()
        .record("a.example", RecordType::Cname, "b.example.")
        .record("b.example", RecordType::Cname, "a.example.");
    let resolver = DohResolver::new(&zone, &config());

    let result = resolver.resolve("a.example");

    assert!(result.addresses.is_empty());
    assert!(!result.has_authority);
}

#[test]
fn domain_is_resolved_once_across_entries() {
    let zone = Zone::default()
        .record("shared.example.com", RecordType::A, "198.51.100.20")
        .record("alias.example.com", RecordType::Cname, "shared.example.com.");
    let web = Web::default();

    let report = pruner(&zone, &web).run([
        "shared.example.com",
        "Shared.Example.com.",
        "alias.example.com",
        "shared.example.com",
    ]);

    assert_eq!(report.kept.len(), 4);
    // One endpoint, three record types.
    assert_eq!(zone.queries_for("shared.example.com"), 3);
    assert_eq!(zone.queries_for("alias.example.com"), 3);
}

#[test]
fn runs_are_idempotent() {
    let lines = [
        "# header",
        "live.example.com",
        "dead.example.invalid",
        "||rule.example.com^",
        "https://gone.example.net/x.js",
    ];
    let zone = Zone::default().record("live.example.com", RecordType::Aaaa, "2001:db8::1");
    let web = Web::default();

    let first = pruner(&zone, &web).run(lines);
    let second = pruner(&zone, &web).run(lines);

    assert_eq!(first, second);
    assert_eq!(first.removed, ["dead.example.invalid", "https://gone.example.net/x.js"]);
    assert_eq!(first.skipped, ["||rule.example.com^"]);
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("domains").join("blocklist.txt");
    let output = dir.path().join("cleaned").join("blocklist.txt");
    std::fs::create_dir_all(input.parent().unwrap()).unwrap();
    std::fs::write(&input, "# ads\n  live.example.com  \ndead.example.invalid\n").unwrap();

    let zone = Zone::default().record("live.example.com", RecordType::A, "192.0.2.10");
    let web = Web::default();

    let lines = files::read_lines(&input).unwrap();
    let report = pruner(&zone, &web).run(&lines);
    files::write_lines(&report.kept, &output).unwrap();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "# ads\nlive.example.com\n"
    );
    assert_eq!(report.removed, ["dead.example.invalid"]);
}

#[test]
fn missing_input_is_reported() {
    let err = files::read_lines(Path::new("/nonexistent/domains/blocklist.txt")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn folder_mode_cleans_every_list_with_one_cache() {
    let dir = tempfile::tempdir().unwrap();
    let domains = dir.path().join("domains");
    let cleaned = dir.path().join("cleaned");
    std::fs::create_dir_all(&domains).unwrap();
    std::fs::write(domains.join("ads.txt"), "# ads\nshared.example.com\ndead.example.invalid\n").unwrap();
    std::fs::write(domains.join("trackers.txt"), "shared.example.com\n||rule.example.com^\n").unwrap();
    std::fs::write(domains.join("notes.md"), "dead.example.invalid\n").unwrap();

    let zone = Zone::default().record("shared.example.com", RecordType::A, "192.0.2.30");
    let web = Web::default();

    let reports = pruner(&zone, &web).prune_dir(&domains, &cleaned).unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(
        std::fs::read_to_string(cleaned.join("ads.txt")).unwrap(),
        "# ads\nshared.example.com\n"
    );
    assert_eq!(
        std::fs::read_to_string(cleaned.join("trackers.txt")).unwrap(),
        "shared.example.com\n||rule.example.com^\n"
    );
    assert!(!cleaned.join("notes.md").exists());
    // Resolved for the first list only.
    assert_eq!(zone.queries_for("shared.example.com"), 3);
}

#[test]
fn folder_mode_requires_input_folder() {
    let dir = tempfile::tempdir().unwrap();
    let zone = Zone::default();
    let web = Web::default();

    let err = pruner(&zone, &web)
        .prune_dir(&dir.path().join("domains"), &dir.path().join("cleaned"))
        .unwrap_err();
    assert!(err.is_not_found());
}
