//! Report renderers

use std::fmt::{Display, Write as FmtWrite};

use aiolens_core::aio::AioCategory;
use aiolens_core::{AnalysisReport, ConsistencyReport, ReportRenderer, SeoItem};
use anyhow::{Context, Result};
use clap::ValueEnum;

const DIVIDER: &str = "─────────────────────────────────────────────────────────────";
const LABEL_WIDTH: usize = 20;

/// Output flavours offered on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn renderer(self) -> Box<dyn ReportRenderer> {
        match self {
            Self::Text => Box::new(TextRenderer),
            Self::Json => Box::new(JsonRenderer),
        }
    }
}

/// Pretty-printed JSON, loadable again with `aiolens validate`
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, report: &AnalysisReport) -> Result<String> {
        let mut json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
        json.push('\n');
        Ok(json)
    }
}

/// Sectioned plain-text report for the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &AnalysisReport) -> Result<String> {
        let mut out = String::new();
        render_overview(&mut out, report);
        render_seo(&mut out, report);
        render_aio(&mut out, report);
        render_improvements(&mut out, report);
        render_actions(&mut out, report);
        render_signals(&mut out, report);
        render_consistency(&mut out, &report.consistency);
        Ok(out)
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = write!(out, "{DIVIDER}\n{title}\n{DIVIDER}\n");
}

/// Bulleted `label : value` line; empty values are left out
fn field(out: &mut String, label: &str, value: impl Display) {
    let value = value.to_string();
    if !value.is_empty() {
        let _ = writeln!(out, "• {label:<width$} : {value}", width = LABEL_WIDTH);
    }
}

fn detail(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "    {label}: {value}");
    }
}

fn split(seo: u8, aio: u8) -> String {
    format!("SEO {seo}% / AIO {aio}%")
}

fn render_overview(out: &mut String, report: &AnalysisReport) {
    let integrated = &report.integrated;
    let industry = &report.industry;
    heading(out, &format!("🔎 Analysis: {}", report.url));
    field(out, "Industry", format_args!("{} ({})", industry.primary, industry.resolution));
    field(out, "Confidence", format_args!("{:.1}%", industry.confidence));
    if industry.is_undetermined() {
        field(out, "Hint", "pass --industry to tailor the AIO assessment");
    }
    let aio_percent = report.balance.aio_percent();
    field(out, "Balance", split(100 - aio_percent, aio_percent));
    field(out, "Integrated score", format_args!("{:.1}/100", integrated.integrated_score));
    field(out, "SEO score", format_args!("{:.1}/100", integrated.seo_score));
    field(out, "AIO score", format_args!("{:.1}/100", integrated.aio_score));
    field(out, "Primary focus", integrated.primary_focus);
    let recommended = integrated.recommended;
    field(out, "Recommended split", split(recommended.seo_focus, recommended.aio_focus));
    out.push('\n');
}

fn render_seo(out: &mut String, report: &AnalysisReport) {
    heading(out, "🧱 SEO Sub-scores");
    for item in SeoItem::ALL {
        field(out, item.label(), format_args!("{:.1}/10", report.seo.get(item)));
    }
    out.push('\n');
}

fn render_aio(out: &mut String, report: &AnalysisReport) {
    let aio = &report.aio;
    heading(out, "🤖 AIO Assessment");
    for category in AioCategory::ALL {
        let _ = writeln!(
            out,
            "{} ({:.1}/100)",
            category.label(),
            aio.category_scores.get(category)
        );
        for (item, scored) in aio.scores.iter().filter(|(item, _)| item.category() == category) {
            let _ = writeln!(
                out,
                "  • {:<width$} : {:>4.1}/10  {}",
                item.label(),
                scored.score,
                scored.advice,
                width = LABEL_WIDTH - 2
            );
        }
    }
    out.push('\n');
}

fn render_improvements(out: &mut String, report: &AnalysisReport) {
    let improvements = &report.integrated.improvements;
    if improvements.is_empty() {
        return;
    }
    heading(out, "🛠️ Priority Improvements");
    for (rank, improvement) in improvements.iter().enumerate() {
        let _ = writeln!(out, "{}. {improvement}", rank + 1);
    }
    out.push('\n');
}

fn render_actions(out: &mut String, report: &AnalysisReport) {
    let aio = &report.aio;

    if !aio.immediate_actions.is_empty() {
        heading(out, "🚀 Immediate Actions");
        for entry in &aio.immediate_actions {
            let _ = writeln!(out, "• {}", entry.action);
            detail(out, "How", &entry.method);
            detail(out, "Impact", &entry.expected_impact);
        }
        out.push('\n');
    }

    if !aio.medium_term_strategies.is_empty() {
        heading(out, "📈 Medium-Term Strategies");
        for entry in &aio.medium_term_strategies {
            let _ = writeln!(out, "• {}", entry.strategy);
            detail(out, "Timeline", &entry.timeline);
            detail(out, "Outcome", &entry.expected_outcome);
        }
        out.push('\n');
    }

    if !aio.competitive_advantages.is_empty() {
        heading(out, "🏁 Competitive Advantages");
        for entry in &aio.competitive_advantages {
            let _ = writeln!(out, "• {}", entry.advantage);
            detail(out, "How", &entry.implementation);
        }
        out.push('\n');
    }

    if !aio.market_trend_strategies.is_empty() {
        heading(out, "🌐 Market Trends");
        for entry in &aio.market_trend_strategies {
            let _ = writeln!(out, "• {}", entry.trend);
            detail(out, "Strategy", &entry.strategy);
            detail(out, "Priority", &entry.priority);
        }
        out.push('\n');
    }

    let analysis = &aio.industry_analysis;
    let narrative = [
        ("Industry fit", &analysis.industry_fit),
        ("Specialized", &analysis.specialized_improvements),
        ("Compliance", &analysis.compliance_check),
        ("Market trends", &analysis.market_trends),
    ];
    if narrative.iter().any(|(_, text)| !text.is_empty()) {
        heading(out, "🏭 Industry Analysis");
        for (label, text) in narrative {
            field(out, label, text);
        }
        out.push('\n');
    }
}

fn render_signals(out: &mut String, report: &AnalysisReport) {
    let signals = &report.signals;
    heading(out, "📄 Page Signals");
    field(out, "Title", &signals.title);
    field(out, "Meta description", &signals.meta_description);
    field(out, "Canonical", &signals.canonical_url);
    let headings: Vec<String> = (1..=6)
        .map(|level| format!("h{level}:{}", signals.headings(level)))
        .collect();
    field(out, "Headings", headings.join(" "));
    field(out, "Words", signals.word_count);
    field(
        out,
        "Links",
        format_args!("{} internal / {} external", signals.internal_links, signals.external_links),
    );
    field(
        out,
        "Images with alt",
        format_args!("{}/{}", signals.images_with_alt, signals.images_total),
    );
    field(out, "Structured data", signals.structured_data_types.join(", "));
    field(out, "Tech stack", signals.tech_stack.join(", "));
    let keywords: Vec<String> = signals
        .top_keywords
        .iter()
        .map(|k| format!("{} ({})", k.word, k.count))
        .collect();
    field(out, "Top keywords", keywords.join(", "));
    field(out, "Text/markup ratio", format_args!("{:.1}%", signals.text_html_ratio));
    field(out, "Page size", format_args!("{:.1} KiB", signals.page_size_kb));
    if signals.garbled.title || signals.garbled.meta_description {
        field(out, "Encoding", "title or description looks garbled");
    }
    out.push('\n');
}

/// Expected/reported/delta lines for the three aggregates
pub fn render_consistency(out: &mut String, report: &ConsistencyReport) {
    heading(out, "✅ Score Consistency");
    for (label, check) in [
        ("SEO total", &report.seo),
        ("AIO total", &report.aio),
        ("Integrated score", &report.integrated),
    ] {
        field(
            out,
            label,
            format_args!(
                "expected {:.2}, reported {:.2}, delta {:+.2}",
                check.expected, check.reported, check.delta
            ),
        );
    }
}
