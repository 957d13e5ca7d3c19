//! # blocklist-pruner
//!
//! Prune dead entries from domain/URL blocklists without dropping domains
//! that are merely sinkholed.
//!
//! Each non-comment line is classified as a bare domain, a full URL, or a
//! rule that cannot be checked. Domains are resolved over several
//! DNS-over-HTTPS endpoints (following CNAME chains), and any resolved
//! address, including null routes like `0.0.0.0`, keeps the entry. Domains
//! that are delegated but have no address fall back to their `www.` host;
//! everything else falls back to plain HTTP probing. Full URLs are only
//! probed.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use blocklist_pruner::{Pruner, PrunerConfig, files};
//! use std::path::Path;
//!
//! let pruner = Pruner::from_config(&PrunerConfig::new())?;
//!
//! let lines = files::read_lines(Path::new("domains/blocklist.txt"))?;
//! let report = pruner.run(&lines);
//! files::write_lines(&report.kept, Path::new("cleaned/blocklist.txt"))?;
//!
//! print!("{}", report.summary());
//! ```
//!
//! ## Testing without the network
//!
//! [`LivenessEngine`] is generic over [`Resolve`] and [`Probe`], and
//! [`DohResolver`] over [`DohTransport`]. Swap any of them for an in-memory
//! fake to exercise the decision logic deterministically.
//!
//! ## Caching
//!
//! Resolutions are cached per normalized domain inside a [`DohResolver`],
//! and verdicts per normalized entry inside one [`Pruner::run`] call.
//! Neither cache outlives the values that own them.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod doh;
pub mod entry;
pub mod error;
pub mod files;
pub mod liveness;
pub mod probe;
pub mod resolver;
pub mod run;
pub mod sinkhole;
pub mod util;

pub use config::PrunerConfig;
pub use doh::{DohResponse, DohTransport, HttpDohTransport, RecordType};
pub use entry::{CheckableEntry, Entry, EntryKind};
pub use error::{PrunerError, Result};
pub use liveness::{Decision, Evidence, LivenessEngine, Verdict};
pub use probe::{HttpProber, Probe};
pub use resolver::{DohResolver, Resolve};
pub use run::{Pruner, RunReport};
pub use sinkhole::{ResolutionResult, SINKHOLE_IPS};
