//! # Hand history parsing
//!
//! Turns a line oriented poker hand-history log into per-player chip,
//! outcome and all-in series plus per-hand pot, rake and family pot
//! series.
//!
//! Parsing is split in two:
//!
//! - [`LogDialect::classify`] maps a single line to a [`TaggedEvent`] from
//!   positional token heuristics. It is pure and knows nothing of earlier
//!   lines.
//! - [`HandTracker`] consumes those events in file order and infers the
//!   things the log never states outright: busts, rebuys, reversed all-ins
//!   and family pots.
//!
//! ```
//! use poker_session::SessionConfig;
//! use poker_session::hand_history::parse_session;
//!
//! let log = [
//!     "PokerStars Hand #1: Hold'em No Limit (50/100) - 2020/04/01 20:00:00 ET",
//!     "Seat 1: Alice (10000 in chips)",
//!     "Seat 1: Alice collected (150)",
//! ];
//! let session = parse_session(log, &SessionConfig::default()).unwrap();
//! let alice = session.player("Alice").unwrap();
//! assert_eq!(alice.outcomes().won_without_showdown, vec![true]);
//! ```
mod dialect;
mod event;
mod ledger;
mod tracker;

pub use dialect::LogDialect;
pub use event::{EventKind, Malformed, TaggedEvent, classify};
pub use ledger::{AllInFlags, ChipHistory, HandAggregate, NEGLIGIBLE, OutcomeFlags, PlayerLedger};
pub use tracker::{HandTracker, ParsedSession, parse_session};
