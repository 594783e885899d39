// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering of notifications, analysis results, and history.
//!
//! Every function returns a `String` so output can be checked in tests; the
//! callers decide between stdout and stderr.

use colored::{Color, Colorize};

use truthlens_app::history::recent;
use truthlens_app::{Notification, UiEvent};
use truthlens_core::{AnalysisResult, RiskLevel, Severity, UserProfile};

/// Symbol, plain-mode tag, and colour per severity, indexed by
/// [`Severity::index`].
const SEVERITY_STYLES: [(&str, &str, Color); Severity::ALL.len()] = [
    ("✓", "[OK]", Color::Green),
    ("✗", "[ERROR]", Color::Red),
    ("i", "[INFO]", Color::Blue),
];

fn risk_style(risk: RiskLevel) -> (&'static str, Color) {
    match risk {
        RiskLevel::High => ("HIGH RISK", Color::Red),
        RiskLevel::Medium => ("MEDIUM RISK", Color::Yellow),
        RiskLevel::Low => ("LOW RISK", Color::Green),
    }
}

/// One-line rendering of a notification.
pub fn notification_line(notification: &Notification, use_color: bool) -> String {
    let (symbol, tag, color) = SEVERITY_STYLES[notification.severity.index()];
    if use_color {
        format!("{} {}", symbol.color(color), notification.message)
    } else {
        format!("{tag} {}", notification.message)
    }
}

/// Follow-up hint for events that ask the user to do something.
pub fn event_hint(event: &UiEvent, in_shell: bool) -> Option<&'static str> {
    match (event, in_shell) {
        (UiEvent::LoginRequested, false) => Some("Sign in with `truthlens login <email>`."),
        (UiEvent::LoginRequested, true) => Some("Sign in with `/login <email>`."),
        (UiEvent::ShowLogin, false) => Some("You can now sign in with `truthlens login <email>`."),
        (UiEvent::ShowLogin, true) => Some("You can now sign in with `/login <email>`."),
        _ => None,
    }
}

/// Lines to print for one UI event.
pub fn event_lines(event: &UiEvent, in_shell: bool, use_color: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if let UiEvent::Notified(notification) = event {
        lines.push(notification_line(notification, use_color));
    }
    if let Some(hint) = event_hint(event, in_shell) {
        if use_color {
            lines.push(hint.dimmed().to_string());
        } else {
            lines.push(hint.to_string());
        }
    }
    lines
}

pub fn user_line(user: Option<&UserProfile>) -> String {
    match user {
        Some(user) => format!("Signed in as {} <{}>", user.name, user.email),
        None => "Not signed in".to_string(),
    }
}

/// Full result panel: verdict, scores, advice, narrative, and recommendations.
pub fn result_panel(result: &AnalysisResult, use_color: bool) -> String {
    let (verdict, color) = risk_style(result.risk_level);
    let verdict = if use_color {
        verdict.color(color).bold().to_string()
    } else {
        verdict.to_string()
    };
    let narrative = &result.analysis_narrative;

    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!(
        "  {verdict}  fake {}% / real {}%  (confidence {}%)\n",
        result.fake_score, result.real_score, result.confidence
    ));
    out.push_str(&format!("  {}\n", result.risk_level.advice()));
    out.push_str(&format!("  {}\n", "-".repeat(50)));
    out.push_str(&format!(
        "    {:<12}{} \"{}\"\n",
        "Input", result.input_type, result.content_preview
    ));
    out.push_str(&format!("    {:<12}{}\n", "Source", narrative.source));
    out.push_str(&format!("    {:<12}{}\n", "Content", narrative.content));
    out.push_str(&format!("    {:<12}{}\n", "Structure", narrative.structure));
    out.push_str(&format!("    {:<12}{}\n", "Language", narrative.language));
    out.push_str(&format!(
        "    {:<12}{}\n",
        "Keywords",
        result.details.keywords.join(", ")
    ));
    out.push_str(&format!(
        "    {:<12}{}\n",
        "Classifier", result.details.source_analysis
    ));
    out.push_str("\n  Recommendations\n");
    for recommendation in &result.recommendations {
        out.push_str(&format!("    - {recommendation}\n"));
    }
    out
}

/// History listing, newest first. Shows the recent window unless `all`.
pub fn history_list(entries: &[AnalysisResult], all: bool, use_color: bool) -> String {
    if entries.is_empty() {
        return "  No analyses yet.\n".to_string();
    }
    let shown = if all { entries } else { recent(entries) };

    let mut out = String::new();
    for entry in shown {
        let (label, color) = risk_style(entry.risk_level);
        let label = format!("{label:<11}");
        let label = if use_color {
            label.color(color).to_string()
        } else {
            label
        };
        let when = entry
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M");
        out.push_str(&format!(
            "  {when}  {label} {:>3}%  [{}] {}\n",
            entry.fake_score, entry.input_type, entry.content_preview
        ));
    }
    if shown.len() < entries.len() {
        out.push_str(&format!(
            "  ({} older, use --all to show)\n",
            entries.len() - shown.len()
        ));
    }
    out
}
