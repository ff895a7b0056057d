use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

use super::dialect::LogDialect;
use super::ledger::NEGLIGIBLE;

/// The category a single log line was classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    Noise,
    HandStart,
    SeatChipCount,
    AllInDeclared,
    UncalledReturn,
    ShowdownWin,
    LossOrMuck,
    UncontestedWin,
    PotSummary,
    PreflopFold,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Noise => "noise",
            EventKind::HandStart => "hand start",
            EventKind::SeatChipCount => "seat chip count",
            EventKind::AllInDeclared => "all-in",
            EventKind::UncalledReturn => "uncalled return",
            EventKind::ShowdownWin => "showdown win",
            EventKind::LossOrMuck => "loss or muck",
            EventKind::UncontestedWin => "uncontested win",
            EventKind::PotSummary => "pot summary",
            EventKind::PreflopFold => "preflop fold",
        };
        f.write_str(name)
    }
}

/// A classified log line, with the values extracted from it.
///
/// Player names borrow from the line they were read from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaggedEvent<'a> {
    Noise,
    HandStart,
    SeatChipCount { player: &'a str, chips: u64 },
    AllInDeclared { player: &'a str },
    UncalledReturn { player: &'a str },
    ShowdownWin { player: &'a str },
    LossOrMuck { player: &'a str },
    UncontestedWin { player: &'a str },
    /// Rake of zero is already replaced by [`NEGLIGIBLE`].
    PotSummary { pot: f64, rake: f64 },
    PreflopFold { player: &'a str },
}

impl TaggedEvent<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            TaggedEvent::Noise => EventKind::Noise,
            TaggedEvent::HandStart => EventKind::HandStart,
            TaggedEvent::SeatChipCount { .. } => EventKind::SeatChipCount,
            TaggedEvent::AllInDeclared { .. } => EventKind::AllInDeclared,
            TaggedEvent::UncalledReturn { .. } => EventKind::UncalledReturn,
            TaggedEvent::ShowdownWin { .. } => EventKind::ShowdownWin,
            TaggedEvent::LossOrMuck { .. } => EventKind::LossOrMuck,
            TaggedEvent::UncontestedWin { .. } => EventKind::UncontestedWin,
            TaggedEvent::PotSummary { .. } => EventKind::PotSummary,
            TaggedEvent::PreflopFold { .. } => EventKind::PreflopFold,
        }
    }

    /// The player this event is about, if any.
    pub fn player(&self) -> Option<&str> {
        match *self {
            TaggedEvent::SeatChipCount { player, .. }
            | TaggedEvent::AllInDeclared { player }
            | TaggedEvent::UncalledReturn { player }
            | TaggedEvent::ShowdownWin { player }
            | TaggedEvent::LossOrMuck { player }
            | TaggedEvent::UncontestedWin { player }
            | TaggedEvent::PreflopFold { player } => Some(player),
            _ => None,
        }
    }
}

/// A line matched a category but did not carry the tokens needed to
/// extract its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Malformed(pub EventKind);

static DEFAULT_DIALECT: LazyLock<LogDialect> = LazyLock::new(LogDialect::default);

/// Classify a single trimmed line using the default dialect.
pub fn classify(line: &str) -> Result<TaggedEvent<'_>, Malformed> {
    DEFAULT_DIALECT.classify(line)
}

impl LogDialect {
    /// Classify a single trimmed line.
    ///
    /// The checks run in a fixed priority order and the first match wins.
    /// Anything unrecognised is [`TaggedEvent::Noise`].
    pub fn classify<'a>(&self, line: &'a str) -> Result<TaggedEvent<'a>, Malformed> {
        let words: Vec<&'a str> = line.split_whitespace().collect();
        if words.len() < self.min_tokens.max(2) || self.is_structural(words[0]) {
            return Ok(TaggedEvent::Noise);
        }

        let first = words[0];
        let last = words[words.len() - 1];
        let contains = |marker: &str| words.iter().any(|w| *w == marker);

        if last == self.hand_start_marker {
            return Ok(TaggedEvent::HandStart);
        }

        if last == self.chips_marker {
            let kind = EventKind::SeatChipCount;
            let player = self.token(&words, self.player_index, kind)?;
            let chips_token = words
                .len()
                .checked_sub(self.chips_index_from_end)
                .and_then(|idx| words.get(idx).copied())
                .ok_or(Malformed(kind))?;
            let chips = self
                .numeric(chips_token)
                .parse::<u64>()
                .map_err(|_| Malformed(kind))?;
            return Ok(TaggedEvent::SeatChipCount { player, chips });
        }

        if last == self.all_in_marker {
            let player = first.trim_end_matches(':');
            if player.is_empty() {
                return Err(Malformed(EventKind::AllInDeclared));
            }
            return Ok(TaggedEvent::AllInDeclared { player });
        }

        if first == self.uncalled_marker {
            let player = self.token(&words, self.uncalled_player_index, EventKind::UncalledReturn)?;
            return Ok(TaggedEvent::UncalledReturn { player });
        }

        if contains(&self.won_marker) {
            let player = self.token(&words, self.player_index, EventKind::ShowdownWin)?;
            return Ok(TaggedEvent::ShowdownWin { player });
        }

        if contains(&self.lost_marker) || contains(&self.mucked_marker) {
            let player = self.token(&words, self.player_index, EventKind::LossOrMuck)?;
            return Ok(TaggedEvent::LossOrMuck { player });
        }

        if words[words.len() - 2] == self.collected_marker {
            let player = self.token(&words, self.player_index, EventKind::UncontestedWin)?;
            return Ok(TaggedEvent::UncontestedWin { player });
        }

        if words[1] == self.pot_marker {
            let kind = EventKind::PotSummary;
            let pot = self.amount(self.token(&words, self.pot_size_index, kind)?, kind)?;
            let rake = self.amount(last, kind)?;
            let rake = if rake == 0.0 { NEGLIGIBLE } else { rake };
            return Ok(TaggedEvent::PotSummary { pot, rake });
        }

        if contains(&self.preflop_fold_marker) {
            let player = self.token(&words, self.player_index, EventKind::PreflopFold)?;
            return Ok(TaggedEvent::PreflopFold { player });
        }

        Ok(TaggedEvent::Noise)
    }

    fn token<'a>(&self, words: &[&'a str], idx: usize, kind: EventKind) -> Result<&'a str, Malformed> {
        words.get(idx).copied().ok_or(Malformed(kind))
    }

    fn amount(&self, token: &str, kind: EventKind) -> Result<f64, Malformed> {
        match self.numeric(token).parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
            _ => Err(Malformed(kind)),
        }
    }
}
