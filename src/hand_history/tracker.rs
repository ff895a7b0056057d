use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use crate::config::SessionConfig;
use crate::errors::ParseError;

use super::dialect::LogDialect;
use super::event::{EventKind, TaggedEvent};
use super::ledger::{HandAggregate, PlayerLedger};

/// The structures produced by one pass over a log.
///
/// Players iterate in the order they were first seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSession {
    starting_stack: u64,
    hands: HandAggregate,
    players: Vec<(String, PlayerLedger)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ParsedSession {
    fn new(starting_stack: u64) -> Self {
        Self {
            starting_stack,
            hands: HandAggregate::default(),
            players: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Parse a complete log held in memory. Lines are trimmed first.
    pub fn parse(text: &str, config: &SessionConfig) -> Result<Self, ParseError> {
        parse_session(text.lines().map(str::trim), config)
    }

    pub fn starting_stack(&self) -> u64 {
        self.starting_stack
    }

    pub fn hands(&self) -> &HandAggregate {
        &self.hands
    }

    pub fn player(&self, name: &str) -> Option<&PlayerLedger> {
        self.index.get(name).map(|idx| &self.players[*idx].1)
    }

    pub fn players(&self) -> impl Iterator<Item = (&str, &PlayerLedger)> {
        self.players.iter().map(|(name, ledger)| (name.as_str(), ledger))
    }

    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(|(name, _)| name.as_str())
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    fn ledger_mut(&mut self, name: &str) -> Option<&mut PlayerLedger> {
        let idx = *self.index.get(name)?;
        Some(&mut self.players[idx].1)
    }

    fn ledger_or_insert(&mut self, name: &str) -> &mut PlayerLedger {
        let idx = match self.index.get(name) {
            Some(idx) => *idx,
            None => {
                debug!(player = name, hand = self.hands.current_hand(), "First sighting of player");
                let idx = self.players.len();
                self.players
                    .push((name.to_string(), PlayerLedger::new(self.starting_stack)));
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.players[idx].1
    }
}

/// Consumes a log one line at a time, strictly in file order.
///
/// Bust, rebuy and family pot inference depend on seeing lines in their
/// original order; there is no look-ahead.
#[derive(Debug)]
pub struct HandTracker {
    dialect: LogDialect,
    session: ParsedSession,
    line_number: usize,
}

impl HandTracker {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_dialect(config.dialect.clone(), config.starting_stack)
    }

    pub fn with_dialect(dialect: LogDialect, starting_stack: u64) -> Self {
        Self {
            dialect,
            session: ParsedSession::new(starting_stack),
            line_number: 0,
        }
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    /// Classify and apply the next line.
    pub fn feed(&mut self, line: &str) -> Result<EventKind, ParseError> {
        self.line_number += 1;
        let line_number = self.line_number;
        let event = self
            .dialect
            .classify(line)
            .map_err(|malformed| ParseError::MalformedLine {
                line_number,
                kind: malformed.0,
                line: line.to_string(),
            })?;
        self.apply(event, line_number)?;
        Ok(event.kind())
    }

    /// Apply an already classified event.
    pub fn apply(&mut self, event: TaggedEvent<'_>, line_number: usize) -> Result<(), ParseError> {
        if event != TaggedEvent::Noise {
            trace!(line_number, ?event, "Applying event");
        }
        let session = &mut self.session;
        match event {
            TaggedEvent::Noise => {}
            TaggedEvent::HandStart => {
                session.hands.start_hand();
            }
            TaggedEvent::SeatChipCount { player, chips } => {
                let hand = session.hands.current_hand();
                if session.ledger_or_insert(player).record_chip_count(chips, hand) {
                    debug!(player, hand, "Player rebought after a bust");
                }
            }
            TaggedEvent::AllInDeclared { player } => {
                known(session, player, event, line_number)?.mark_all_in();
            }
            TaggedEvent::UncalledReturn { player } => {
                if known(session, player, event, line_number)?.reverse_all_in() {
                    debug!(player, "All-in reversed by uncalled bet");
                }
            }
            TaggedEvent::ShowdownWin { player } => {
                known(session, player, event, line_number)?.mark_showdown_win();
            }
            TaggedEvent::LossOrMuck { player } => {
                let hand = session.hands.current_hand();
                if known(session, player, event, line_number)?.mark_loss() {
                    debug!(player, hand, "Player went bust");
                }
            }
            TaggedEvent::UncontestedWin { player } => {
                known(session, player, event, line_number)?.mark_uncontested_win();
            }
            TaggedEvent::PotSummary { pot, rake } => {
                if !session.hands.record_pot(pot, rake) {
                    warn!(line_number, pot, rake, "Pot summary before any hand start, ignoring");
                }
            }
            TaggedEvent::PreflopFold { player } => {
                known(session, player, event, line_number)?.mark_preflop_fold();
                session.hands.clear_family_pot();
            }
        }
        Ok(())
    }

    pub fn finish(self) -> ParsedSession {
        self.session
    }
}

fn known<'s>(
    session: &'s mut ParsedSession,
    player: &str,
    event: TaggedEvent<'_>,
    line_number: usize,
) -> Result<&'s mut PlayerLedger, ParseError> {
    session
        .ledger_mut(player)
        .ok_or_else(|| ParseError::UnknownPlayerReference {
            player: player.to_string(),
            line_number,
            kind: event.kind(),
        })
}

/// Run a single forward pass over a log.
///
/// Every call starts from empty ledgers, so re-running against a log that
/// grew, shrank or rotated is always safe.
#[instrument(level = "debug", skip_all, fields(starting_stack = config.starting_stack))]
pub fn parse_session<I, S>(lines: I, config: &SessionConfig) -> Result<ParsedSession, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tracker = HandTracker::new(config);
    for line in lines {
        tracker.feed(line.as_ref())?;
    }
    let lines_read = tracker.lines_read();
    let session = tracker.finish();
    debug!(
        lines_read,
        hands = session.hands().total_hands(),
        players = session.num_players(),
        "Finished parsing session"
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand_history::NEGLIGIBLE;
    use crate::test_util::{LogBuilder, generate_session};

    fn parse(log: LogBuilder) -> ParsedSession {
        parse_session(log.build(), &SessionConfig::default()).unwrap()
    }

    #[test_log::test]
    fn test_single_uncontested_win() {
        let session = parse(
            LogBuilder::new()
                .hand_start()
                .seat("Alice", 10_000)
                .summary()
                .pot(150, 0)
                .collected("Alice", 150),
        );

        let alice = session.player("Alice").unwrap();
        assert_eq!(alice.chip_history().chips(), &[10_000, 10_000]);
        assert_eq!(alice.chip_history().hands(), &[0, 1]);
        assert_eq!(alice.outcomes().won_without_showdown, vec![true]);
        assert_eq!(alice.outcomes().won_at_showdown, vec![false]);
        assert_eq!(session.hands().hand_count(), &[0, 1]);
        assert_eq!(session.hands().pot_size(), &[NEGLIGIBLE, 150.0]);
        assert_eq!(session.hands().rake(), &[NEGLIGIBLE, NEGLIGIBLE]);
    }

    #[test_log::test]
    fn test_all_in_loss_then_rebuy() {
        let session = parse(
            LogBuilder::new()
                .hand_start()
                .seat("A", 10_000)
                .seat("B", 10_000)
                .summary()
                .pot(200, 0)
                .showdown_win("B", 200)
                .showdown_loss("A")
                .hand_start()
                .seat("A", 9_900)
                .seat("B", 10_100)
                .all_in("A")
                .summary()
                .pot(19_800, 0)
                .showdown_win("B", 19_800)
                .showdown_loss("A")
                .hand_start()
                .seat("A", 10_000)
                .seat("B", 20_000),
        );

        let a = session.player("A").unwrap();
        assert_eq!(a.all_ins().went_all_in, vec![false, true, false]);
        assert_eq!(a.all_ins().went_bust, vec![false, true, false]);
        assert_eq!(a.all_ins().rebought, vec![false, false, true]);
        assert_eq!(a.chip_history().hands(), &[0, 1, 2, 3]);

        let b = session.player("B").unwrap();
        assert_eq!(b.outcomes().won_at_showdown, vec![true, true, false]);
        assert_eq!(b.all_ins().rebought, vec![false, false, false]);
    }

    #[test]
    fn test_uncalled_return_prevents_bust() {
        let mut log = LogBuilder::new();
        for _ in 0..4 {
            log = log
                .hand_start()
                .seat("B", 10_000)
                .seat("C", 3_000)
                .summary()
                .collected("C", 150)
                .preflop_fold("B");
        }
        let session = parse(
            log.hand_start()
                .seat("B", 10_000)
                .seat("C", 3_000)
                .all_in("B")
                .uncalled("B", 7_000)
                .summary()
                .pot(6_000, 0)
                .showdown_loss("B")
                .showdown_win("C", 6_000),
        );

        let b = session.player("B").unwrap();
        assert_eq!(session.hands().current_hand(), 5);
        assert_eq!(b.participations(), 5);
        assert!(b.all_ins().went_all_in.iter().all(|f| !f));
        assert!(b.all_ins().went_bust.iter().all(|f| !f));
        assert_eq!(b.outcomes().lost_or_mucked[4], true);
    }

    #[test]
    fn test_family_pot_cleared_by_preflop_fold() {
        let session = parse(
            LogBuilder::new()
                .hand_start()
                .seat("A", 10_000)
                .seat("B", 10_000)
                .summary()
                .pot(400, 0)
                .showdown_win("A", 400)
                .muck("B")
                .hand_start()
                .seat("A", 10_200)
                .seat("B", 9_800)
                .summary()
                .pot(150, 0)
                .collected("A", 150)
                .preflop_fold("B"),
        );

        assert_eq!(session.hands().family_pot(), &[false, true, false]);
        let b = session.player("B").unwrap();
        assert_eq!(b.outcomes().folded_preflop, vec![false, true]);
        assert_eq!(b.outcomes().lost_or_mucked, vec![true, false]);
    }

    #[test]
    fn test_late_arrival_has_shorter_history() {
        let session = parse(
            LogBuilder::new()
                .hand_start()
                .seat("A", 10_000)
                .hand_start()
                .seat("A", 10_000)
                .seat("Late", 10_000),
        );

        assert_eq!(session.player("A").unwrap().participations(), 2);
        let late = session.player("Late").unwrap();
        assert_eq!(late.participations(), 1);
        assert_eq!(late.chip_history().hands(), &[0, 2]);
        assert_eq!(session.player_names().collect::<Vec<_>>(), vec!["A", "Late"]);
    }

    #[test]
    fn test_unknown_player_is_typed_error() {
        let log = LogBuilder::new()
            .hand_start()
            .seat("A", 10_000)
            .all_in("Ghost");
        let err = parse_session(log.build(), &SessionConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownPlayerReference {
                player: "Ghost".to_string(),
                line_number: 4,
                kind: EventKind::AllInDeclared,
            }
        );
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let log = LogBuilder::new()
            .hand_start()
            .line("Seat 1: Alice (many in chips)");
        let err = parse_session(log.build(), &SessionConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedLine {
                line_number: 3,
                kind: EventKind::SeatChipCount,
                line: "Seat 1: Alice (many in chips)".to_string(),
            }
        );
    }

    #[test]
    fn test_unvalidated_stack_position_fails_without_panicking() {
        let mut config = SessionConfig::default();
        config.dialect.chips_index_from_end = 0;
        let err = parse_session(["Seat 1: Alice (10000 in chips)"], &config).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedLine {
                line_number: 1,
                kind: EventKind::SeatChipCount,
                ..
            }
        ));
    }

    #[test]
    fn test_pot_before_hand_is_ignored() {
        let session = parse(LogBuilder::new().pot(100, 5));
        assert_eq!(session.hands().rake(), &[NEGLIGIBLE]);
        assert_eq!(session.hands().total_hands(), 0);
    }

    #[test]
    fn test_parse_text_trims_lines() {
        let text = "  PokerStars Hand #1: Hold'em No Limit (50/100) - 2020/04/01 20:00:00 ET  \r\n\
                    \tSeat 1: Alice (10000 in chips)\r\n";
        let session = ParsedSession::parse(text, &SessionConfig::default()).unwrap();
        assert_eq!(session.hands().total_hands(), 1);
        assert_eq!(session.player("Alice").unwrap().participations(), 1);
    }

    #[test]
    fn test_reparse_is_independent() {
        let lines = generate_session(30, &["A", "B", "C"], 10_000);
        let config = SessionConfig::default();
        let first = parse_session(&lines, &config).unwrap();
        let second = parse_session(&lines, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generated_session_invariants() {
        let lines = generate_session(200, &["A", "B", "C", "D"], 10_000);
        let session = parse_session(&lines, &SessionConfig::default()).unwrap();
        let hands = session.hands();

        assert_eq!(hands.total_hands(), 200);
        assert_eq!(hands.rake().len(), hands.hand_count().len());
        assert_eq!(hands.pot_size().len(), hands.hand_count().len());
        assert_eq!(hands.family_pot().len(), hands.hand_count().len());
        assert!(hands.rake().iter().all(|r| *r >= 0.0));
        assert!(hands.pot_size().iter().all(|p| *p >= 0.0));
        assert!(
            hands
                .hand_count()
                .windows(2)
                .all(|w| w[1] == w[0] + 1)
        );

        for (_, ledger) in session.players() {
            let slots = ledger.chip_history().len() - 1;
            let outcomes = ledger.outcomes();
            assert_eq!(outcomes.won_at_showdown.len(), slots);
            assert_eq!(outcomes.lost_or_mucked.len(), slots);
            assert_eq!(outcomes.won_without_showdown.len(), slots);
            assert_eq!(outcomes.folded_preflop.len(), slots);
            assert_eq!(ledger.all_ins().len(), slots);

            for i in 0..slots {
                let set = [
                    outcomes.won_at_showdown[i],
                    outcomes.lost_or_mucked[i],
                    outcomes.won_without_showdown[i],
                    outcomes.folded_preflop[i],
                ]
                .iter()
                .filter(|f| **f)
                .count();
                assert!(set <= 1);
            }

            let busts = &ledger.all_ins().went_bust;
            let rebuys = &ledger.all_ins().rebought;
            for i in 1..slots {
                assert_eq!(busts[i - 1], rebuys[i]);
            }
        }
    }
}
