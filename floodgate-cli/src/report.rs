//! Text rendering of scenario reports.

use floodgate_sim::ScenarioReport;

/// Renders the per-scenario results as an aligned text table.
pub fn render_table(reports: &[ScenarioReport]) -> String {
    let headers = ["Scenario", "Attack TPS", "Legit p99", "Drop rate"];

    let rows: Vec<[String; 4]> = reports
        .iter()
        .map(|report| {
            [
                report.scenario.name.clone(),
                group_thousands(report.attack_offered_tps),
                format!("{:.0}ms", report.legitimate_p99_latency_ms),
                format!("{:.0}%", report.drop_rate() * 100.0),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut table = String::new();

    // Header, separator, then rows: scenario name left-aligned, numbers right.
    table.push_str(&format!(
        "{:<w0$}  {:>w1$}  {:>w2$}  {:>w3$}\n",
        headers[0],
        headers[1],
        headers[2],
        headers[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    ));
    table.push_str(&format!(
        "{}  {}  {}  {}\n",
        "-".repeat(widths[0]),
        "-".repeat(widths[1]),
        "-".repeat(widths[2]),
        "-".repeat(widths[3]),
    ));
    for row in &rows {
        table.push_str(&format!(
            "{:<w0$}  {:>w1$}  {:>w2$}  {:>w3$}\n",
            row[0],
            row[1],
            row[2],
            row[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        ));
    }

    table
}

/// Renders the attack-filtering-efficiency section for attack scenarios.
pub fn render_filtering_efficiency(reports: &[ScenarioReport]) -> String {
    let mut section = String::from("Attack filtering efficiency:\n");

    let mut any = false;
    for report in reports.iter().filter(|r| r.attack_offered_tps > 0) {
        any = true;
        section.push_str(&format!(
            "  {}: {:.1}% of attack traffic filtered\n",
            report.scenario.name,
            report.filter_rate() * 100.0
        ));
    }
    if !any {
        section.push_str("  (no attack scenarios)\n");
    }

    section
}

/// Formats an integer with comma separators every three digits.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}
