//! Whole-list runs.
//!
//! A [`Pruner`] walks the lines of a blocklist in order, decides each
//! checkable entry once and partitions the lines into kept, removed and
//! skipped.

use crate::config::PrunerConfig;
use crate::doh::HttpDohTransport;
use crate::entry::Entry;
use crate::error::Result;
use crate::files;
use crate::liveness::LivenessEngine;
use crate::probe::{HttpProber, Probe};
use crate::resolver::{DohResolver, Resolve};
use moka::sync::Cache;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Outcome of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Output lines in input order: inert and skipped lines verbatim, live
    /// entries trimmed.
    pub kept: Vec<String>,
    /// Trimmed text of entries judged dead, in input order.
    pub removed: Vec<String>,
    /// Trimmed text of lines that could not be checked, in input order.
    pub skipped: Vec<String>,
    /// Number of distinct entries decided (cache misses).
    pub checked: usize,
}

impl RunReport {
    /// Human-readable summary of the run.
    ///
    /// Skipped entries are listed sorted and de-duplicated; removed entries
    /// in input order.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Checks performed for {} entries; removed {} unreachable domains.\n",
            self.checked,
            self.removed.len()
        );
        if !self.skipped.is_empty() {
            out.push_str("Skipped checks for entries that do not look like plain domains or URLs:\n");
            for entry in self.skipped.iter().collect::<BTreeSet<_>>() {
                out.push_str(&format!("  - {entry}\n"));
            }
        }
        if !self.removed.is_empty() {
            out.push_str("Removed entries:\n");
            for entry in &self.removed {
                out.push_str(&format!("  - {entry}\n"));
            }
        }
        out
    }
}

/// Drives a [`LivenessEngine`] over blocklist lines.
#[derive(Debug)]
pub struct Pruner<R, P> {
    engine: LivenessEngine<R, P>,
}

impl Pruner<DohResolver<HttpDohTransport>, HttpProber> {
    /// Builds a pruner that resolves over DoH and probes over HTTP, sharing
    /// one HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PrunerError::InvalidConfig`] if the config does not
    /// validate, or [`crate::PrunerError::HttpClient`] if the client cannot
    /// be built.
    pub fn from_config(config: &PrunerConfig) -> Result<Self> {
        config.validate()?;
        let client = config.http_client()?;
        let resolver = DohResolver::new(HttpDohTransport::new(client.clone()), config);
        let prober = HttpProber::new(client);
        Ok(Self::new(LivenessEngine::new(resolver, prober)))
    }
}

impl<R: Resolve, P: Probe> Pruner<R, P> {
    #[must_use]
    pub const fn new(engine: LivenessEngine<R, P>) -> Self {
        Self { engine }
    }

    pub const fn engine(&self) -> &LivenessEngine<R, P> {
        &self.engine
    }

    /// Classifies and checks every line, in order.
    ///
    /// Entries are cached by lower-cased trimmed text for the duration of
    /// this call, so duplicates cost nothing. A single entry can never fail
    /// the run.
    pub fn run<I, S>(&self, lines: I) -> RunReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let verdicts: Cache<String, bool> = Cache::builder().build();
        let mut report = RunReport::default();

        for raw in lines {
            let raw = raw.as_ref();
            let entry = match Entry::classify(raw) {
                Entry::Inert => {
                    report.kept.push(raw.to_string());
                    continue;
                }
                Entry::Skipped(text) => {
                    tracing::debug!(entry = %text, "Skipping entry that is not a plain domain or URL");
                    report.kept.push(raw.to_string());
                    report.skipped.push(text);
                    continue;
                }
                Entry::Checkable(entry) => entry,
            };

            let key = entry.key();
            let live = if let Some(live) = verdicts.get(&key) {
                live
            } else {
                let decision = self.engine.decide(&entry);
                tracing::debug!(
                    entry = %entry.text(),
                    verdict = ?decision.verdict,
                    evidence = ?decision.evidence,
                    "Checked entry"
                );
                report.checked += 1;
                verdicts.insert(key, decision.is_live());
                decision.is_live()
            };

            if live {
                report.kept.push(entry.text().to_string());
            } else {
                report.removed.push(entry.text().to_string());
            }
        }

        tracing::info!(
            checked = report.checked,
            removed = report.removed.len(),
            skipped = report.skipped.len(),
            "Run complete"
        );
        report
    }

    /// Prunes every `*.txt` list in `input`, writing each cleaned list to
    /// `output` under the same file name.
    ///
    /// Lists are processed in path order through this one pruner, so a domain
    /// shared by several lists is resolved once. Returns the written paths
    /// with their reports.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PrunerError::SourceNotFound`] if `input` is not a
    /// directory, or [`crate::PrunerError::Io`] if a list cannot be read or
    /// written.
    pub fn prune_dir(&self, input: &Path, output: &Path) -> Result<Vec<(PathBuf, RunReport)>> {
        let mut reports = Vec::new();
        for source in files::list_blocklists(input)? {
            let Some(name) = source.file_name() else {
                continue;
            };
            let target = output.join(name);
            let lines = files::read_lines(&source)?;
            tracing::info!(source = %source.display(), lines = lines.len(), "Pruning blocklist");
            let report = self.run(&lines);
            files::write_lines(&report.kept, &target)?;
            reports.push((target, report));
        }
        Ok(reports)
    }
}
