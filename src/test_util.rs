//! Builders for synthetic hand-history logs in the default dialect.

use std::fmt::Write;

/// Fluent builder for a hand-history log.
///
/// Seat numbers on stack announcements are assigned in order within each
/// hand; summary lines always use seat 1 since only the name is read.
#[derive(Debug, Clone, Default)]
pub struct LogBuilder {
    lines: Vec<String>,
    hand: usize,
    seat: usize,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw line.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn hand_start(mut self) -> Self {
        self.hand += 1;
        self.seat = 0;
        let banner = format!(
            "PokerStars Hand #{}: Hold'em No Limit (50/100) - 2020/04/01 20:{:02}:00 ET",
            20_000 + self.hand,
            self.hand % 60
        );
        self.line(banner)
            .line("Table 'Home Game' 9-max (Play Money) Seat #1 is the button")
    }

    pub fn seat(mut self, player: &str, chips: u64) -> Self {
        self.seat += 1;
        let line = format!("Seat {}: {} ({} in chips)", self.seat, player, chips);
        self.line(line)
    }

    pub fn all_in(self, player: &str) -> Self {
        self.line(format!("{player}: raises 400 to 10000 and is all-in"))
    }

    pub fn uncalled(self, player: &str, amount: u64) -> Self {
        self.line(format!("Uncalled bet ({amount}) returned to {player}"))
    }

    pub fn summary(self) -> Self {
        self.line("*** SUMMARY ***")
    }

    pub fn pot(self, total: u64, rake: u64) -> Self {
        self.line(format!("Total pot {total} | Rake {rake}"))
    }

    pub fn showdown_win(self, player: &str, amount: u64) -> Self {
        self.line(format!(
            "Seat 1: {player} showed [Ah Kh] and won ({amount}) with a pair of Aces"
        ))
    }

    pub fn showdown_loss(self, player: &str) -> Self {
        self.line(format!(
            "Seat 1: {player} showed [7c 2d] and lost with high card Seven"
        ))
    }

    pub fn muck(self, player: &str) -> Self {
        self.line(format!("Seat 1: {player} mucked [Qs Jd]"))
    }

    pub fn collected(self, player: &str, amount: u64) -> Self {
        self.line(format!("Seat 1: {player} collected ({amount})"))
    }

    pub fn preflop_fold(self, player: &str) -> Self {
        self.line(format!("Seat 1: {player} folded before Flop (didn't bet)"))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn build(self) -> Vec<String> {
        self.lines
    }

    pub fn text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            // Writing into a String cannot fail.
            let _ = writeln!(text, "{line}");
        }
        text
    }
}

/// Generate a long deterministic session where players take turns winning,
/// folding, and going all-in.
pub fn generate_session(num_hands: usize, players: &[&str], starting_stack: u64) -> Vec<String> {
    let mut log = LogBuilder::new();
    if players.is_empty() {
        return log.build();
    }
    let mut stacks = vec![starting_stack; players.len()];
    for hand in 0..num_hands {
        log = log.hand_start();
        for (idx, player) in players.iter().enumerate() {
            log = log.seat(player, stacks[idx]);
        }
        let winner = hand % players.len();
        let loser = (hand + 1) % players.len();
        for (idx, player) in players.iter().enumerate() {
            if idx != winner && idx != loser {
                log = log.preflop_fold(player);
            }
        }
        let shove = hand % 7 == 0;
        if shove {
            log = log.all_in(players[loser]);
        }
        let amount = if shove { stacks[loser] } else { 200.min(stacks[loser]) };
        stacks[loser] -= amount;
        stacks[winner] += amount;
        if stacks[loser] == 0 {
            stacks[loser] = starting_stack;
        }
        log = log
            .summary()
            .pot(amount * 2, 0)
            .showdown_win(players[winner], amount * 2)
            .showdown_loss(players[loser]);
    }
    log.build()
}
