//! # poker_session
//!
//! Turns a poker hand-history log into per-player time series (chip stacks,
//! win/loss/fold outcomes, all-ins, busts and rebuys) and per-hand series
//! (pot size, rake, family pots), then reduces those into session
//! summaries.
//!
//! - [`hand_history`] classifies lines and tracks state hand by hand.
//! - [`stats`] aggregates the series and merges aliases of one person.
//! - [`report`] renders summaries and hands them to external sinks.
//!
//! ```
//! use poker_session::SessionConfig;
//! use poker_session::report::SessionReport;
//!
//! let log = "\
//! PokerStars Hand #1: Hold'em No Limit (50/100) - 2020/04/01 20:00:00 ET
//! Seat 1: Alice (10000 in chips)
//! Seat 2: Bob (10000 in chips)
//! *** SUMMARY ***
//! Total pot 150 | Rake 0
//! Seat 1: Alice collected (150)
//! Seat 2: Bob folded before Flop (didn't bet)";
//!
//! let report = SessionReport::from_lines(log.lines(), &SessionConfig::default()).unwrap();
//! let bob = report.summary.player("Bob").unwrap();
//! assert_eq!(bob.fold_rate, Some(1.0));
//! ```
pub mod config;
pub mod errors;
pub mod hand_history;
pub mod io;
pub mod report;
pub mod stats;

#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub use config::{AliasTable, SessionConfig};
pub use errors::{ConfigError, ParseError, SessionError, SinkError};
