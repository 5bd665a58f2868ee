//! drift_power — simulation study of trend detectability in rare-event counts.
//!
//! Purpose
//! -------
//! Answer, by Monte Carlo experiment, how many periods of observation are
//! needed before a slow multiplicative drift in the rate of a rare
//! counting process becomes statistically recoverable. The crate builds a
//! grid of drift scenarios, simulates Poisson count series under each,
//! fits a Poisson log-linear trend to every replicate, and summarizes the
//! fitted slopes on the interpretable total-change scale.
//!
//! Key behaviors
//! -------------
//! - [`config::StudyConfig`] validates all study inputs up front; the rest
//!   of the pipeline assumes consistency.
//! - [`scenario`] expands the configuration into the Cartesian scenario
//!   grid, normalizing every total change to one fixed reference horizon.
//! - [`simulate`] draws reproducible, parallel Poisson replicates under a
//!   compounding mean schedule.
//! - [`trend`] fits the log-linear model by L-BFGS maximum likelihood
//!   (through the generic [`fit`] layer) and treats a failed fit as an
//!   ordinary tagged outcome, never a crash.
//! - [`results`] and [`report`] collapse outcomes into rows, grouped
//!   summaries, and delimited-text exports; [`study::run_study`] drives
//!   the whole pipeline end to end.
//!
//! Conventions
//! -----------
//! - Periods are 1-based; period 1 carries no compounding, so its expected
//!   count is the baseline rate exactly.
//! - Errors are split into two tiers: configuration errors
//!   ([`errors::StudyError`]) abort a run, per-replicate fit errors
//!   ([`fit::FitError`]) are recorded in the outcome and excluded from
//!   summaries with an explicit count.
//!
//! Testing notes
//! -------------
//! - Each module carries unit tests for its own invariants; end-to-end
//!   statistical behavior (null calibration, power at long durations) is
//!   covered by the integration tests.

pub mod config;
pub mod errors;
pub mod fit;
pub mod inference;
pub mod report;
pub mod results;
pub mod scenario;
pub mod simulate;
pub mod study;
pub mod trend;

pub use config::StudyConfig;
pub use errors::{StudyError, StudyResult};
pub use fit::{FitError, FitOptions, LineSearcher, Tolerances};
pub use results::{GroupSummary, ResultRow};
pub use scenario::Scenario;
pub use study::{run_study, StudyOutcome};
pub use trend::{fit_trend, TrendEstimates, TrendFit};
