use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hand_history::{ParsedSession, PlayerLedger};

fn count(channel: &[bool]) -> usize {
    channel.iter().filter(|f| **f).count()
}

/// A ratio that is `None` when the denominator is zero.
pub(crate) fn rate(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

/// Totals for one log name over a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    /// Hands dealt into
    pub participations: usize,
    pub showdown_wins: usize,
    pub uncontested_wins: usize,
    pub losses: usize,
    pub preflop_folds: usize,
    /// Preflop folds per participation. `None` for a player with no
    /// participations, never NaN.
    pub fold_rate: Option<f64>,
    /// All-ins that were called. Reversed all-ins are not counted.
    pub all_ins: usize,
    pub all_ins_won: usize,
    pub busts: usize,
    pub rebuys: usize,
    /// Rebuys plus the initial buy-in, zero for a player never seen
    pub buy_ins: usize,
    pub starting_chips: u64,
    pub final_chips: u64,
    /// Global hand index of the last chip count seen
    pub last_hand: usize,
}

impl PlayerSummary {
    pub fn from_ledger(name: &str, ledger: &PlayerLedger) -> Self {
        let outcomes = ledger.outcomes();
        let all_ins = ledger.all_ins();
        let participations = ledger.participations();
        let preflop_folds = count(&outcomes.folded_preflop);
        let rebuys = count(&all_ins.rebought);

        Self {
            name: name.to_string(),
            participations,
            showdown_wins: count(&outcomes.won_at_showdown),
            uncontested_wins: count(&outcomes.won_without_showdown),
            losses: count(&outcomes.lost_or_mucked),
            preflop_folds,
            fold_rate: rate(preflop_folds, participations),
            all_ins: count(&all_ins.went_all_in),
            all_ins_won: count(&all_ins.all_in_and_won),
            busts: count(&all_ins.went_bust),
            rebuys,
            buy_ins: rebuys + 1,
            starting_chips: ledger.starting_chips(),
            final_chips: ledger.final_chips(),
            last_hand: ledger.last_hand(),
        }
    }

    /// A name that never showed up in the log.
    #[cfg(test)]
    pub(crate) fn absent(name: &str, starting_stack: u64) -> Self {
        Self {
            name: name.to_string(),
            participations: 0,
            showdown_wins: 0,
            uncontested_wins: 0,
            losses: 0,
            preflop_folds: 0,
            fold_rate: None,
            all_ins: 0,
            all_ins_won: 0,
            busts: 0,
            rebuys: 0,
            buy_ins: 0,
            starting_chips: starting_stack,
            final_chips: 0,
            last_hand: 0,
        }
    }

    pub fn wins(&self) -> usize {
        self.showdown_wins + self.uncontested_wins
    }

    /// Final chips minus the starting stack.
    pub fn net_result(&self) -> i64 {
        self.final_chips as i64 - self.starting_chips as i64
    }

    /// Final chips minus everything bought in for.
    pub fn net_after_buy_ins(&self) -> i64 {
        self.final_chips as i64 - (self.starting_chips * self.buy_ins as u64) as i64
    }
}

/// Everything the reporting side needs from one parsed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub starting_stack: u64,
    pub total_hands: usize,
    pub total_family_pots: usize,
    pub total_rake: f64,
    /// In order of first appearance
    pub players: Vec<PlayerSummary>,
    /// Hand index to the players that busted in it
    pub bust_timeline: BTreeMap<usize, Vec<String>>,
    /// Largest chip count any player ever held, seeds included
    pub max_chips: Option<u64>,
}

impl SessionSummary {
    pub fn from_session(session: &ParsedSession) -> Self {
        let hands = session.hands();
        let mut bust_timeline: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        let mut max_chips: Option<u64> = None;

        for (name, ledger) in session.players() {
            let history = ledger.chip_history();
            // Slot i belongs to the chip count at i + 1, after the seed.
            for (slot, busted) in ledger.all_ins().went_bust.iter().enumerate() {
                if *busted {
                    if let Some(hand) = history.hands().get(slot + 1) {
                        bust_timeline
                            .entry(*hand)
                            .or_default()
                            .push(name.to_string());
                    }
                }
            }
            if let Some(most) = history.chips().iter().max() {
                max_chips = Some(max_chips.map_or(*most, |m| m.max(*most)));
            }
        }

        Self {
            starting_stack: session.starting_stack(),
            total_hands: hands.total_hands(),
            total_family_pots: hands.total_family_pots(),
            total_rake: hands.total_rake(),
            players: session
                .players()
                .map(|(name, ledger)| PlayerSummary::from_ledger(name, ledger))
                .collect(),
            bust_timeline,
            max_chips,
        }
    }

    pub fn player(&self, name: &str) -> Option<&PlayerSummary> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Share of hands played without a single preflop fold.
    pub fn family_pot_rate(&self) -> Option<f64> {
        rate(self.total_family_pots, self.total_hands)
    }

    /// Top of the chip axis: the largest stack plus one big blind.
    pub fn chip_ceiling(&self, big_blind: u64) -> Option<u64> {
        self.max_chips.map(|m| m + big_blind)
    }

    /// Top of the win/loss count axis. `None` when nobody has a single
    /// participation, e.g. everyone folded to the big blind.
    pub fn outcome_ceiling(&self) -> Option<usize> {
        self.players
            .iter()
            .filter(|p| p.participations > 0)
            .map(|p| p.showdown_wins.max(p.uncontested_wins).max(p.losses))
            .max()
            .map(|m| m + 1)
    }

    /// Top of the all-in/rebuy count axis.
    pub fn all_in_ceiling(&self) -> Option<usize> {
        self.players
            .iter()
            .filter(|p| p.participations > 0)
            .map(|p| p.rebuys.max(p.all_ins_won).max(p.busts))
            .max()
            .map(|m| m + 1)
    }

    /// Players ranked by final chip count, largest first.
    pub fn rankings(&self) -> Vec<&PlayerSummary> {
        let mut ranked: Vec<_> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.final_chips.cmp(&a.final_chips).then(a.name.cmp(&b.name)));
        ranked
    }
}

impl From<&ParsedSession> for SessionSummary {
    fn from(session: &ParsedSession) -> Self {
        SessionSummary::from_session(session)
    }
}
