use serde::Serialize;

/// Stand-in for a zero rake or an empty pot so downstream ratio and log
/// scale computations never see a literal zero.
pub const NEGLIGIBLE: f64 = 1e-22;

/// Chip counts and the global hand index each one was observed at.
///
/// The first entry is always the synthetic seed `(starting_stack, 0)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChipHistory {
    chips: Vec<u64>,
    hands: Vec<usize>,
}

impl ChipHistory {
    fn seeded(starting_stack: u64) -> Self {
        Self {
            chips: vec![starting_stack],
            hands: vec![0],
        }
    }

    pub fn chips(&self) -> &[u64] {
        &self.chips
    }

    pub fn hands(&self) -> &[usize] {
        &self.hands
    }

    /// Number of entries, the seed included.
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.chips.iter().copied().zip(self.hands.iter().copied())
    }

    fn push(&mut self, chips: u64, hand: usize) {
        self.chips.push(chips);
        self.hands.push(hand);
    }
}

/// How each hand a player took part in ended for them. One slot per
/// participation, at most one channel set per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeFlags {
    pub won_at_showdown: Vec<bool>,
    pub lost_or_mucked: Vec<bool>,
    pub won_without_showdown: Vec<bool>,
    pub folded_preflop: Vec<bool>,
}

impl OutcomeFlags {
    fn reserve_slot(&mut self) {
        self.won_at_showdown.push(false);
        self.lost_or_mucked.push(false);
        self.won_without_showdown.push(false);
        self.folded_preflop.push(false);
    }

    pub fn len(&self) -> usize {
        self.won_at_showdown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.won_at_showdown.is_empty()
    }
}

/// All-in, bust and rebuy channels, parallel to [`OutcomeFlags`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllInFlags {
    pub went_all_in: Vec<bool>,
    pub all_in_and_won: Vec<bool>,
    pub went_bust: Vec<bool>,
    pub rebought: Vec<bool>,
}

impl AllInFlags {
    fn reserve_slot(&mut self) {
        self.went_all_in.push(false);
        self.all_in_and_won.push(false);
        self.went_bust.push(false);
        self.rebought.push(false);
    }

    pub fn len(&self) -> usize {
        self.went_all_in.len()
    }

    pub fn is_empty(&self) -> bool {
        self.went_all_in.is_empty()
    }
}

fn set_last(channel: &mut [bool], value: bool) {
    if let Some(slot) = channel.last_mut() {
        *slot = value;
    }
}

fn last(channel: &[bool]) -> bool {
    channel.last().copied().unwrap_or(false)
}

/// Everything recorded about one player name over a session.
///
/// Created on the first seat chip count seen for the name and only ever
/// appended to afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerLedger {
    chip_history: ChipHistory,
    outcomes: OutcomeFlags,
    all_ins: AllInFlags,
}

impl PlayerLedger {
    pub fn new(starting_stack: u64) -> Self {
        Self {
            chip_history: ChipHistory::seeded(starting_stack),
            outcomes: OutcomeFlags::default(),
            all_ins: AllInFlags::default(),
        }
    }

    pub fn chip_history(&self) -> &ChipHistory {
        &self.chip_history
    }

    pub fn outcomes(&self) -> &OutcomeFlags {
        &self.outcomes
    }

    pub fn all_ins(&self) -> &AllInFlags {
        &self.all_ins
    }

    /// Number of hands this player was dealt into.
    pub fn participations(&self) -> usize {
        self.outcomes.len()
    }

    /// The most recent chip count, or the seed when the player was never
    /// dealt in.
    pub fn final_chips(&self) -> u64 {
        self.chip_history.chips.last().copied().unwrap_or_default()
    }

    pub fn starting_chips(&self) -> u64 {
        self.chip_history.chips.first().copied().unwrap_or_default()
    }

    /// Global hand index of the last chip count observed.
    pub fn last_hand(&self) -> usize {
        self.chip_history.hands.last().copied().unwrap_or_default()
    }

    /// Record a seat chip count and open a new participation slot.
    ///
    /// Returns true when the slot was marked as a rebuy because the
    /// previous participation ended in a bust.
    pub(crate) fn record_chip_count(&mut self, chips: u64, hand: usize) -> bool {
        self.chip_history.push(chips, hand);
        self.outcomes.reserve_slot();
        self.all_ins.reserve_slot();

        let slots = self.all_ins.went_bust.len();
        let rebought = slots >= 2 && self.all_ins.went_bust[slots - 2];
        if rebought {
            set_last(&mut self.all_ins.rebought, true);
        }
        rebought
    }

    pub(crate) fn is_all_in(&self) -> bool {
        last(&self.all_ins.went_all_in)
    }

    pub(crate) fn mark_all_in(&mut self) {
        set_last(&mut self.all_ins.went_all_in, true);
    }

    /// Returns true if there was an all-in to reverse.
    pub(crate) fn reverse_all_in(&mut self) -> bool {
        let was_all_in = self.is_all_in();
        set_last(&mut self.all_ins.went_all_in, false);
        was_all_in
    }

    pub(crate) fn mark_showdown_win(&mut self) {
        set_last(&mut self.outcomes.won_at_showdown, true);
        if self.is_all_in() {
            set_last(&mut self.all_ins.all_in_and_won, true);
        }
    }

    pub(crate) fn mark_uncontested_win(&mut self) {
        set_last(&mut self.outcomes.won_without_showdown, true);
        if self.is_all_in() {
            set_last(&mut self.all_ins.all_in_and_won, true);
        }
    }

    /// Returns true when the loss busted the player.
    pub(crate) fn mark_loss(&mut self) -> bool {
        set_last(&mut self.outcomes.lost_or_mucked, true);
        let busted = self.is_all_in();
        if busted {
            set_last(&mut self.all_ins.went_bust, true);
        }
        busted
    }

    pub(crate) fn mark_preflop_fold(&mut self) {
        set_last(&mut self.outcomes.folded_preflop, true);
    }
}

/// Per-hand series, aligned with the hand counter. Index 0 is the sentinel
/// that exists before any hand started.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandAggregate {
    hand_count: Vec<usize>,
    rake: Vec<f64>,
    pot_size: Vec<f64>,
    family_pot: Vec<bool>,
}

impl Default for HandAggregate {
    fn default() -> Self {
        Self {
            hand_count: vec![0],
            rake: vec![NEGLIGIBLE],
            pot_size: vec![NEGLIGIBLE],
            family_pot: vec![false],
        }
    }
}

impl HandAggregate {
    pub fn hand_count(&self) -> &[usize] {
        &self.hand_count
    }

    pub fn rake(&self) -> &[f64] {
        &self.rake
    }

    pub fn pot_size(&self) -> &[f64] {
        &self.pot_size
    }

    pub fn family_pot(&self) -> &[bool] {
        &self.family_pot
    }

    /// Index of the hand currently being played, 0 before the first one.
    pub fn current_hand(&self) -> usize {
        self.hand_count.last().copied().unwrap_or_default()
    }

    /// Number of hands started, the sentinel excluded.
    pub fn total_hands(&self) -> usize {
        self.hand_count.len() - 1
    }

    /// Number of hands with no preflop fold.
    pub fn total_family_pots(&self) -> usize {
        self.family_pot.iter().skip(1).filter(|f| **f).count()
    }

    pub fn total_rake(&self) -> f64 {
        self.rake.iter().skip(1).filter(|r| **r > NEGLIGIBLE).sum()
    }

    /// Open a new hand. Its pot and rake stay at the sentinel until the
    /// pot summary fills them in.
    pub(crate) fn start_hand(&mut self) -> usize {
        let next = self.current_hand() + 1;
        self.hand_count.push(next);
        self.rake.push(NEGLIGIBLE);
        self.pot_size.push(NEGLIGIBLE);
        self.family_pot.push(true);
        next
    }

    /// Fill in the current hand's pot summary. Returns false when no hand
    /// has started yet.
    pub(crate) fn record_pot(&mut self, pot: f64, rake: f64) -> bool {
        if self.total_hands() == 0 {
            return false;
        }
        if let Some(slot) = self.pot_size.last_mut() {
            *slot = if pot == 0.0 { NEGLIGIBLE } else { pot };
        }
        if let Some(slot) = self.rake.last_mut() {
            *slot = rake;
        }
        true
    }

    pub(crate) fn clear_family_pot(&mut self) {
        if self.total_hands() > 0 {
            set_last(&mut self.family_pot, false);
        }
    }
}
