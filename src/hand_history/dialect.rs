use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// The fixed tokens that identify each line category of a hand-history log.
///
/// The defaults describe the PokerStars text export, e.g.
///
/// ```text
/// PokerStars Hand #1: Hold'em No Limit (50/100) - 2020/04/01 20:00:00 ET
/// Seat 1: Alice (10000 in chips)
/// Alice: raises 200 to 10000 and is all-in
/// Uncalled bet (500) returned to Bob
/// Total pot 3000 | Rake 0
/// Seat 1: Alice (button) showed [Ah Kh] and won (3000) with a pair of Aces
/// Seat 2: Bob (big blind) showed [7c 2d] and lost with high card Seven
/// Seat 3: Carol collected (150)
/// Seat 4: Dave folded before Flop (didn't bet)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogDialect {
    /// Lines with fewer tokens than this are noise.
    pub min_tokens: usize,
    /// First tokens of banner, board and table-info lines.
    pub structural_markers: Vec<String>,
    /// Last token of a hand start line (the timestamp zone).
    pub hand_start_marker: String,
    /// Last token of a seat stack announcement.
    pub chips_marker: String,
    /// Last token of an all-in declaration.
    pub all_in_marker: String,
    /// First token of an uncalled bet return.
    pub uncalled_marker: String,
    /// Token index of the player name on an uncalled bet return.
    pub uncalled_player_index: usize,
    pub won_marker: String,
    pub lost_marker: String,
    pub mucked_marker: String,
    /// Second to last token of a win without showdown.
    pub collected_marker: String,
    /// Second token of a pot summary.
    pub pot_marker: String,
    /// Token index of the pot size on a pot summary.
    pub pot_size_index: usize,
    pub preflop_fold_marker: String,
    /// Token index of the player name on seat and summary lines.
    pub player_index: usize,
    /// Token position, counted from the end, of the stack on a seat line.
    pub chips_index_from_end: usize,
    /// Characters stripped from the front of numeric tokens.
    pub numeric_prefixes: Vec<char>,
}

impl Default for LogDialect {
    fn default() -> Self {
        Self {
            min_tokens: 5,
            structural_markers: vec!["***".to_string(), "Board".to_string(), "Table".to_string()],
            hand_start_marker: "ET".to_string(),
            chips_marker: "chips)".to_string(),
            all_in_marker: "all-in".to_string(),
            uncalled_marker: "Uncalled".to_string(),
            uncalled_player_index: 5,
            won_marker: "won".to_string(),
            lost_marker: "lost".to_string(),
            mucked_marker: "mucked".to_string(),
            collected_marker: "collected".to_string(),
            pot_marker: "pot".to_string(),
            pot_size_index: 2,
            preflop_fold_marker: "before".to_string(),
            player_index: 2,
            chips_index_from_end: 3,
            numeric_prefixes: vec!['(', '$', '€', '£'],
        }
    }
}

impl LogDialect {
    /// Reject layouts that can never match a line or that point outside it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let markers = [
            ("hand_start_marker", &self.hand_start_marker),
            ("chips_marker", &self.chips_marker),
            ("all_in_marker", &self.all_in_marker),
            ("uncalled_marker", &self.uncalled_marker),
            ("won_marker", &self.won_marker),
            ("lost_marker", &self.lost_marker),
            ("mucked_marker", &self.mucked_marker),
            ("collected_marker", &self.collected_marker),
            ("pot_marker", &self.pot_marker),
            ("preflop_fold_marker", &self.preflop_fold_marker),
        ];
        if let Some((field, _)) = markers.iter().find(|(_, marker)| marker.trim().is_empty()) {
            return Err(ConfigError::InvalidDialect {
                field: *field,
                reason: "must not be empty",
            });
        }
        if self.structural_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::InvalidDialect {
                field: "structural_markers",
                reason: "must not contain empty markers",
            });
        }
        if self.chips_index_from_end == 0 {
            return Err(ConfigError::InvalidDialect {
                field: "chips_index_from_end",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    pub(crate) fn is_structural(&self, token: &str) -> bool {
        self.structural_markers.iter().any(|m| m == token)
    }

    /// Strip the configured prefixes and any thousands separators from a
    /// numeric token. `(1,500` becomes `1500`.
    pub(crate) fn numeric<'a>(&self, token: &'a str) -> std::borrow::Cow<'a, str> {
        let trimmed = token.trim_start_matches(|c| self.numeric_prefixes.contains(&c));
        if trimmed.contains(',') {
            std::borrow::Cow::Owned(trimmed.replace(',', ""))
        } else {
            std::borrow::Cow::Borrowed(trimmed)
        }
    }
}
