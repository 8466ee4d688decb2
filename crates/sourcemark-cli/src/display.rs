//! Terminal output for highlighted text, parameter cards, and audits.
//!
//! Colour follows the confidence tier; job-scope highlights are underlined
//! where the graphical surface would draw a dashed border.

use sourcemark_core::{BorderStyle, DataIssue, StatusIcon, Tier};
use sourcemark_review::{Card, ContextPreview, PanelSummary, Segment, ValidationReport};

const RESET: &str = "\x1b[0m";
const UNDERLINE: &str = "\x1b[4m";
const DIM: &str = "\x1b[2m";

fn ansi(tier: Tier) -> &'static str {
    match tier {
        Tier::High => "\x1b[32m",
        Tier::Medium => "\x1b[34m",
        Tier::Low => "\x1b[33m",
        Tier::VeryLow => "\x1b[31m",
    }
}

fn glyph(icon: StatusIcon) -> &'static str {
    match icon {
        StatusIcon::Check => "✓",
        StatusIcon::Info => "i",
        StatusIcon::Alert => "!",
    }
}

pub fn print_highlighted(segments: &[Segment<'_>]) {
    let mut out = String::new();
    let mut legend = Vec::new();
    for seg in segments {
        match seg {
            Segment::Plain { text, .. } => out.push_str(text),
            Segment::Highlighted {
                text,
                labels,
                style,
                ..
            } => {
                out.push_str(ansi(style.tier));
                if style.border == BorderStyle::Dashed {
                    out.push_str(UNDERLINE);
                }
                out.push_str(text);
                out.push_str(RESET);
                legend.push((seg.span(), labels.join(", "), *style));
            }
        }
    }
    println!("{out}");
    println!();

    if legend.is_empty() {
        println!("(no highlights)");
        return;
    }
    for (n, (span, labels, style)) in legend.into_iter().enumerate() {
        println!(
            "  {:>2}. {}{} {:<26}{} {:<8} {:>5.0}%  {}",
            n + 1,
            ansi(style.tier),
            glyph(style.icon),
            labels,
            RESET,
            style.tier.as_str(),
            style.opacity * 100.0,
            span,
        );
    }
}

pub fn print_cards(cards: &[Card<'_>]) {
    if cards.is_empty() {
        println!("No parameters match.");
        return;
    }
    for card in cards {
        let p = card.parameter;
        let flag = if p.user_confirmed {
            "confirmed"
        } else if card.needs_review {
            "needs review"
        } else {
            ""
        };
        println!(
            "{}{}{} {}  {}",
            ansi(card.tier),
            glyph(card.tier.icon()),
            RESET,
            p.name,
            flag
        );
        println!("  {:<26} {}", "value", p.value);
        println!("  {:<26} {:.2} ({})", "confidence", p.confidence, card.tier.as_str());
        println!("  {:<26} {}", "scope", p.scope.as_str());
        println!("  {:<26} {}", "method", p.extraction_method);
        println!("  {:<26} {}", "span", p.span);
        println!("  {:<26} {}", "context", preview_line(&card.preview, card.tier));
        if !p.choices.is_empty() {
            println!("  {:<26} {}", "choices", p.choices.join(", "));
        }
        println!();
    }
}

fn preview_line(preview: &ContextPreview<'_>, tier: Tier) -> String {
    format!(
        "{}{DIM}{}{RESET}{}{}{RESET}{DIM}{}{RESET}{}",
        if preview.clipped_start { "…" } else { "" },
        preview.before,
        ansi(tier),
        preview.highlighted,
        preview.after,
        if preview.clipped_end { "…" } else { "" },
    )
}

pub fn print_summary(summary: &PanelSummary, completion: f64) {
    println!(
        "{} parameters, {} confirmed, {} need review ({:.0}% complete)",
        summary.total,
        summary.confirmed,
        summary.needs_review,
        completion * 100.0
    );
    let tiers: Vec<String> = Tier::ALL
        .iter()
        .zip(summary.by_tier)
        .map(|(t, n)| format!("{}: {n}", t.as_str()))
        .collect();
    println!("  {}", tiers.join("  "));
    if let Some(mean) = summary.mean_confidence {
        println!("  mean confidence {mean:.2}");
    }
}

pub fn print_issues(issues: &[DataIssue]) {
    if issues.is_empty() {
        println!("No data issues.");
        return;
    }
    println!("{} issue(s):", issues.len());
    for issue in issues {
        println!("  - {issue}");
    }
}

pub fn print_validation(report: &ValidationReport) {
    for e in &report.errors {
        eprintln!("error: {e}");
    }
    for w in &report.warnings {
        eprintln!("warning: {w}");
    }
}
