//! Output formatting for CLI

use crate::{app::RunSummary, pipeline::MetricsSummary};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, String)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Print the results of a finished run
pub fn print_run_summary(summary: &RunSummary) {
    print_section(&format!("{} on {}", summary.agent, summary.environment));
    print_stats_table(&[
        ("Episodes", format_number(summary.episodes_run)),
        ("Successes", format_number(summary.successes)),
        ("Stopped early", summary.stopped_early.to_string()),
        ("Mean return", format!("{:.3}", summary.mean_return)),
        (
            "Final return",
            summary
                .final_return
                .map_or_else(|| "-".to_string(), |r| format!("{r:.3}")),
        ),
    ]);

    print_subsection("Evaluation");
    print_stats_table(&[
        ("Return", format!("{:.3}", summary.evaluation_return)),
        ("Steps", format_number(summary.evaluation_steps)),
        ("Success", summary.evaluation_success.to_string()),
    ]);

    if let Some(metrics) = &summary.metrics {
        print_metrics(metrics);
    }
}

fn print_metrics(metrics: &MetricsSummary) {
    print_subsection("Training returns");
    print_stats_table(&[
        ("Mean", format!("{:.3}", metrics.mean_return)),
        ("Std dev", format!("{:.3}", metrics.std_dev_return)),
        ("Min", format!("{:.3}", metrics.min_return)),
        ("Max", format!("{:.3}", metrics.max_return)),
        ("Recent mean", format!("{:.3}", metrics.recent_mean_return)),
        ("Avg length", format!("{:.1}", metrics.avg_episode_length)),
        ("Success rate", format!("{:.1}%", metrics.success_rate * 100.0)),
    ]);
}
