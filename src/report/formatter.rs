use crate::validator::{AutomatonStats, ContractReport, ValidationReport};

/// Formats validation diagnostics into human-readable text
pub struct ReportFormatter;

impl ReportFormatter {
    /// One line per issue, prefixed with the automaton name.
    pub fn format_validation(name: &str, report: &ValidationReport) -> String {
        if report.valid {
            return format!("{}: ok", name);
        }
        report
            .errors
            .iter()
            .map(|issue| format!("{}: {}", name, issue))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_stats(stats: &AutomatonStats) -> String {
        format!(
            "{} states, {} transitions ({} initial, {} final, {} isolated)",
            stats.states,
            stats.transitions,
            stats.initial_states,
            stats.final_states,
            stats.isolated_states
        )
    }

    /// Every problem that blocks deployment, or a single success line.
    pub fn format_contract(report: &ContractReport) -> String {
        let mut lines: Vec<String> = report
            .automata
            .iter()
            .filter(|a| !a.report.valid)
            .map(|a| Self::format_validation(&a.automaton_name, &a.report))
            .collect();

        for id in &report.duplicate_ids {
            lines.push(format!("Duplicate automaton id: {}", id));
        }
        for name in &report.duplicate_names {
            lines.push(format!("Duplicate automaton name: {}", name));
        }
        if report.dependency_cycle.cyclic {
            lines.push(format!(
                "Dependency cycle: {}",
                report.dependency_cycle.path.join(" -> ")
            ));
        }
        if !report.all_have_final_state {
            lines.push("Some automata have no final state".to_string());
        }

        if lines.is_empty() {
            "Contract is ready for deployment".to_string()
        } else {
            lines.join("\n")
        }
    }
}
