//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::{Evaluation, SessionReport};
use crate::statistics::UNCROPPED;
use crate::types::Verdict;

/// Format an Evaluation for human-readable terminal output.
pub fn format_evaluation(evaluation: &Evaluation) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);

    output.push_str(&format!("ct-oracle: {}\n", evaluation.dut));
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    let meta = &evaluation.metadata;
    output.push_str(&format!(
        "  Rounds of {} samples ({} dropped at each end), timer: {}\n",
        meta.n_measures, meta.drop_size, meta.timer
    ));
    output.push_str(&format!(
        "  Sessions: {} of {} tries\n",
        evaluation.sessions.len(),
        meta.test_tries
    ));
    output.push('\n');

    for session in &evaluation.sessions {
        output.push_str(&format_session(session));
    }
    output.push('\n');

    if evaluation.constant_time {
        output.push_str(&format!(
            "  {}\n",
            "\u{2713} Probably constant time".green().bold()
        ));
    } else {
        output.push_str(&format!(
            "  {}\n",
            "\u{26A0} Probably not constant time".yellow().bold()
        ));
    }
    output.push_str(&format!("    Max |t|: {:.2}\n", evaluation.max_t()));
    output.push('\n');

    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!(
        "Note: finished in {:.2}s. A pass is absence of evidence, not proof.\n",
        meta.runtime_secs
    ));

    output
}

fn format_session(session: &SessionReport) -> String {
    let context = match session.context {
        Some(UNCROPPED) => "uncropped".to_string(),
        Some(i) => format!("crop {i}"),
        None => "-".to_string(),
    };
    format!(
        "  #{:<2} {:<28} |t| = {:>8.2}  ({}, {} samples, {} rounds)\n",
        session.attempt + 1,
        format_verdict(session.verdict),
        session.max_t,
        context,
        session.winning_samples,
        session.rounds
    )
}

fn format_verdict(verdict: Verdict) -> String {
    match verdict {
        Verdict::NoLeakageEvidenceYet => "no leakage evidence yet".green().to_string(),
        Verdict::LeakageFound => "leakage found".red().to_string(),
        Verdict::NotEnoughMeasure => "not enough measurements".yellow().to_string(),
    }
}
