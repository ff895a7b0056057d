use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AliasTable;

use super::summary::{PlayerSummary, SessionSummary, rate};

/// What one alias brought into a merged identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasContribution {
    pub alias: String,
    pub buy_ins: usize,
    pub final_chips: u64,
    pub last_hand: usize,
}

/// More than one alias of the same identity played in the session.
///
/// The merge is still made (buy-ins summed, chips taken from the alias
/// seen last) but the inputs are kept so a human can check it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConflict {
    pub identity: String,
    pub contributions: Vec<AliasContribution>,
    /// The alias whose chip count was kept
    pub chosen: String,
}

impl fmt::Display for ReconcileConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} played as", self.identity)?;
        for (idx, c) in self.contributions.iter().enumerate() {
            let sep = if idx == 0 { " " } else { ", " };
            write!(
                f,
                "{}{} ({} buy-ins, {} chips, last hand #{})",
                sep, c.alias, c.buy_ins, c.final_chips, c.last_hand
            )?;
        }
        write!(f, "; kept chips of {}", self.chosen)
    }
}

/// Merged totals for one canonical identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentitySummary {
    pub identity: String,
    /// Aliases that appeared in the log, in alias table order
    pub aliases_seen: Vec<String>,
    pub participations: usize,
    pub buy_ins: usize,
    pub final_chips: u64,
    /// `None` when the identity never played a hand.
    pub fold_rate: Option<f64>,
    pub conflict: Option<ReconcileConflict>,
}

impl IdentitySummary {
    pub fn played(&self) -> bool {
        !self.aliases_seen.is_empty()
    }
}

/// The outcome of merging a session's players onto their identities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub identities: Vec<IdentitySummary>,
    /// Log names that no identity claims
    pub unmatched: Vec<String>,
}

impl Reconciliation {
    pub fn conflicts(&self) -> impl Iterator<Item = &ReconcileConflict> {
        self.identities.iter().filter_map(|i| i.conflict.as_ref())
    }

    pub fn identity(&self, identity: &str) -> Option<&IdentitySummary> {
        self.identities.iter().find(|i| i.identity == identity)
    }
}

fn merge(identity: &str, seen: &[&PlayerSummary]) -> IdentitySummary {
    let participations = seen.iter().map(|p| p.participations).sum();
    let folds = seen.iter().map(|p| p.preflop_folds).sum();
    let buy_ins = seen.iter().map(|p| p.buy_ins).sum();
    // Latest sighting wins, ties go to the later alias in the table.
    let latest = seen.iter().copied().max_by_key(|p| p.last_hand);

    let conflict = match latest {
        Some(latest) if seen.len() > 1 => Some(ReconcileConflict {
            identity: identity.to_string(),
            contributions: seen
                .iter()
                .map(|p| AliasContribution {
                    alias: p.name.clone(),
                    buy_ins: p.buy_ins,
                    final_chips: p.final_chips,
                    last_hand: p.last_hand,
                })
                .collect(),
            chosen: latest.name.clone(),
        }),
        _ => None,
    };

    IdentitySummary {
        identity: identity.to_string(),
        aliases_seen: seen.iter().map(|p| p.name.clone()).collect(),
        participations,
        buy_ins,
        final_chips: latest.map_or(0, |p| p.final_chips),
        fold_rate: rate(folds, participations),
        conflict,
    }
}

/// Merge per-alias summaries into one summary per identity.
///
/// Pure and deterministic: identities come out in alias table order and
/// an identity that never played gets zero buy-ins, zero chips and an
/// undefined fold rate.
pub fn reconcile(summary: &SessionSummary, aliases: &AliasTable) -> Reconciliation {
    let identities: Vec<IdentitySummary> = aliases
        .iter()
        .map(|(identity, names)| {
            let seen: Vec<&PlayerSummary> =
                names.iter().filter_map(|n| summary.player(n)).collect();
            let merged = merge(identity, &seen);
            if let Some(conflict) = &merged.conflict {
                warn!(%conflict, "Identity played under several aliases");
            }
            merged
        })
        .collect();

    let unmatched: Vec<String> = summary
        .players
        .iter()
        .filter(|p| aliases.identity_for(&p.name).is_none())
        .map(|p| p.name.clone())
        .collect();
    if !unmatched.is_empty() {
        debug!(?unmatched, "Players without an identity");
    }

    Reconciliation {
        identities,
        unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, participations: usize, folds: usize, rebuys: usize, chips: u64, last: usize) -> PlayerSummary {
        PlayerSummary {
            participations,
            preflop_folds: folds,
            fold_rate: rate(folds, participations),
            rebuys,
            buy_ins: rebuys + 1,
            final_chips: chips,
            last_hand: last,
            ..PlayerSummary::absent(name, 10_000)
        }
    }

    fn session(players: Vec<PlayerSummary>) -> SessionSummary {
        SessionSummary {
            starting_stack: 10_000,
            total_hands: 40,
            total_family_pots: 0,
            total_rake: 0.0,
            players,
            bust_timeline: Default::default(),
            max_chips: None,
        }
    }

    #[test]
    fn test_single_alias_has_no_conflict() {
        let summary = session(vec![player("Duke", 40, 10, 1, 14_000, 40)]);
        let aliases = AliasTable::new().with("Michel", ["Duke"]);

        let result = reconcile(&summary, &aliases);
        let michel = result.identity("Michel").unwrap();
        assert_eq!(michel.buy_ins, 2);
        assert_eq!(michel.final_chips, 14_000);
        assert_eq!(michel.fold_rate, Some(0.25));
        assert!(michel.conflict.is_none());
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_two_aliases_merge_and_surface_conflict() {
        let summary = session(vec![
            player("Jackall23", 20, 5, 0, 0, 20),
            player("FragileMemory", 20, 5, 1, 8_000, 40),
        ]);
        let aliases = AliasTable::new().with("Ilja", ["Jackall23", "FragileMemory"]);

        let result = reconcile(&summary, &aliases);
        let ilja = result.identity("Ilja").unwrap();
        assert_eq!(ilja.buy_ins, 3);
        assert_eq!(ilja.final_chips, 8_000);
        assert_eq!(ilja.participations, 40);
        assert_eq!(ilja.fold_rate, Some(0.25));

        let conflict = ilja.conflict.as_ref().unwrap();
        assert_eq!(conflict.chosen, "FragileMemory");
        assert_eq!(conflict.contributions.len(), 2);
        assert_eq!(result.conflicts().count(), 1);
        let text = conflict.to_string();
        assert!(text.contains("Jackall23 (1 buy-ins"));
        assert!(text.contains("kept chips of FragileMemory"));
    }

    #[test]
    fn test_identity_that_never_played() {
        let summary = session(vec![player("Duke", 40, 10, 0, 9_000, 40)]);
        let aliases = AliasTable::new()
            .with("Michel", ["Duke"])
            .with("Ruben", ["Rubeneero"]);

        let result = reconcile(&summary, &aliases);
        let ruben = result.identity("Ruben").unwrap();
        assert!(!ruben.played());
        assert_eq!(ruben.fold_rate, None);
        assert_eq!(ruben.buy_ins, 0);
        assert_eq!(ruben.final_chips, 0);
    }

    #[test]
    fn test_unmatched_players_are_listed() {
        let summary = session(vec![
            player("Duke", 40, 10, 0, 9_000, 40),
            player("Stranger", 3, 1, 0, 11_000, 3),
        ]);
        let aliases = AliasTable::new().with("Michel", ["Duke"]);

        let result = reconcile(&summary, &aliases);
        assert_eq!(result.unmatched, vec!["Stranger".to_string()]);
    }
}
