use crate::stats::{Reconciliation, SessionSummary};

fn percent(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.1}%", r * 100.0),
        None => "n/a".to_string(),
    }
}

/// Format a session as a Markdown report.
///
/// This is also the body used for notifications.
pub fn render_markdown(
    summary: &SessionSummary,
    reconciliation: Option<&Reconciliation>,
    big_blind: u64,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", "=".repeat(80)));
    output.push_str("# Poker Session Summary\n");
    output.push_str(&format!("{}\n\n", "=".repeat(80)));

    output.push_str("## Session\n\n");
    output.push_str(&format!(
        "- **Blinds**: {}/{}\n",
        big_blind / 2,
        big_blind
    ));
    output.push_str(&format!("- **Starting Stack**: {}\n", summary.starting_stack));
    output.push_str(&format!("- **Hands Played**: {}\n", summary.total_hands));
    output.push_str(&format!(
        "- **Family Pots**: {} ({})\n",
        summary.total_family_pots,
        percent(summary.family_pot_rate())
    ));
    output.push_str(&format!("- **Total Rake**: {:.2}\n", summary.total_rake));
    output.push('\n');

    output.push_str("## Players\n\n");
    if summary.players.is_empty() {
        output.push_str("No players seen.\n\n");
    } else {
        output.push_str(
            "| Player | Hands | Chips | Net | SD Wins | Non-SD Wins | Losses | Preflop Fold | All-ins | All-ins Won | Busts | Rebuys |\n",
        );
        output.push_str(
            "|--------|------:|------:|----:|--------:|------------:|-------:|-------------:|--------:|------------:|------:|-------:|\n",
        );
        for p in summary.rankings() {
            output.push_str(&format!(
                "| {} | {} | {} | {:+} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
                p.name,
                p.participations,
                p.final_chips,
                p.net_result(),
                p.showdown_wins,
                p.uncontested_wins,
                p.losses,
                percent(p.fold_rate),
                p.all_ins,
                p.all_ins_won,
                p.busts,
                p.rebuys,
            ));
        }
        output.push('\n');
    }

    if !summary.bust_timeline.is_empty() {
        output.push_str("## Busts\n\n");
        for (hand, players) in &summary.bust_timeline {
            output.push_str(&format!("- Hand #{}: {}\n", hand, players.join(", ")));
        }
        output.push('\n');
    }

    if let Some(reconciliation) = reconciliation {
        output.push_str("## Buy-ins\n\n");
        output.push_str("| Identity | Buy-ins | Final Chips | Preflop Fold |\n");
        output.push_str("|----------|--------:|------------:|-------------:|\n");
        for identity in &reconciliation.identities {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                identity.identity,
                identity.buy_ins,
                identity.final_chips,
                percent(identity.fold_rate),
            ));
        }
        output.push('\n');

        let conflicts: Vec<_> = reconciliation.conflicts().collect();
        if !conflicts.is_empty() {
            output.push_str("### Needs Review\n\n");
            for conflict in conflicts {
                output.push_str(&format!("- {}\n", conflict));
            }
            output.push('\n');
        }

        if !reconciliation.unmatched.is_empty() {
            output.push_str(&format!(
                "Unmatched players: {}\n\n",
                reconciliation.unmatched.join(", ")
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AliasTable, SessionConfig};
    use crate::hand_history::parse_session;
    use crate::stats::reconcile;
    use crate::test_util::LogBuilder;

    fn sample() -> SessionSummary {
        let log = LogBuilder::new()
            .hand_start()
            .seat("A", 10_000)
            .seat("B", 10_000)
            .all_in("A")
            .summary()
            .pot(20_000, 0)
            .showdown_win("B", 20_000)
            .showdown_loss("A")
            .hand_start()
            .seat("A", 10_000)
            .seat("B", 20_000)
            .summary()
            .collected("B", 150)
            .preflop_fold("A");
        let session = parse_session(log.build(), &SessionConfig::default()).unwrap();
        SessionSummary::from_session(&session)
    }

    #[test]
    fn test_markdown_has_players_and_busts() {
        let markdown = render_markdown(&sample(), None, 100);
        assert!(markdown.contains("# Poker Session Summary"));
        assert!(markdown.contains("- **Blinds**: 50/100"));
        assert!(markdown.contains("- **Hands Played**: 2"));
        assert!(markdown.contains("| B | 2 | 20000 | +10000 |"));
        assert!(markdown.contains("- Hand #1: A"));
        assert!(!markdown.contains("## Buy-ins"));
    }

    #[test]
    fn test_markdown_with_reconciliation() {
        let summary = sample();
        let aliases = AliasTable::new()
            .with("Anna", ["A"])
            .with("Bert", ["B"])
            .with("Ghost", ["Nobody"]);
        let reconciliation = reconcile(&summary, &aliases);

        let markdown = render_markdown(&summary, Some(&reconciliation), 100);
        assert!(markdown.contains("| Anna | 2 | 10000 | 50.0% |"));
        assert!(markdown.contains("| Ghost | 0 | 0 | n/a |"));
        assert!(!markdown.contains("Needs Review"));
    }

    #[test]
    fn test_markdown_empty_session() {
        let summary = SessionSummary::from_session(
            &parse_session(Vec::<String>::new(), &SessionConfig::default()).unwrap(),
        );
        let markdown = render_markdown(&summary, None, 100);
        assert!(markdown.contains("No players seen."));
        assert!(markdown.contains("- **Family Pots**: 0 (n/a)"));
    }
}
