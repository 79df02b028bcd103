//! Markup for loaded sections
//!
//! All third-party text is escaped here, and only http(s) URLs are emitted
//! into `href`/`src` attributes.

use content_sources::SourceRecord;

use crate::locker::LockerRedirect;
use crate::orchestrator::{PageReport, SectionOutcome};
use crate::section::Section;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn safe_url(url: Option<&str>) -> Option<String> {
    url.filter(|u| u.starts_with("https://") || u.starts_with("http://"))
        .map(escape_html)
}

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

fn card(section: Section, record: &SourceRecord) -> String {
    let title = escape_html(&record.title);
    let image = safe_url(record.image.as_deref());
    let link = safe_url(record.link.as_deref());

    let heading = format!("<h2>{title}</h2>");
    let body = record
        .body
        .as_deref()
        .map(|body| format!("<p>{}</p>", escape_html(body)));
    let date = record
        .published_at
        .map(|at| format!("<div class=\"date\">{}</div>", at.format(DATE_FORMAT)));
    let img = |attrs: &str| {
        image
            .as_ref()
            .map(|src| format!("<img src=\"{src}\" alt=\"{title}\"{attrs}>"))
    };
    let external = |label: &str| {
        link.as_ref().map(|href| {
            format!("<a href=\"{href}\" target=\"_blank\" rel=\"noopener\">{label}</a>")
        })
    };

    let (class, parts) = match section {
        Section::News | Section::BattleRoyaleNews => (
            "news-item",
            vec![Some(heading), body, date, external("Read more")],
        ),
        Section::Memes => (
            "meme-card",
            vec![img(" loading=\"lazy\""), Some(format!("<p>{title}</p>"))],
        ),
        Section::Profiles => ("profile-card", vec![img(""), Some(heading), body]),
        Section::Giveaways => {
            let cta = link.as_ref().map(|href| {
                format!("<a class=\"btn\" href=\"{href}\">{}</a>", LockerRedirect::CTA_LABEL)
            });
            ("giveaway-card", vec![Some(heading), body, cta])
        }
        Section::Trending | Section::Esports => (
            "game-card",
            vec![img(" loading=\"lazy\""), Some(heading), body, date, external("View")],
        ),
    };

    let inner: String = parts.into_iter().flatten().collect();
    format!("<div class=\"{class}\">{inner}</div>")
}

/// Container markup for one section outcome
pub fn render_section(section: Section, outcome: &SectionOutcome) -> String {
    let inner = match outcome {
        SectionOutcome::Ready { records, .. } => {
            records.iter().map(|r| card(section, r)).collect::<String>()
        }
        SectionOutcome::Failed { message, .. } => {
            format!("<p class=\"error\">{}</p>", escape_html(message))
        }
    };
    format!("<div class=\"{}\">{inner}</div>", section.marker())
}

pub fn render_page(report: &PageReport) -> String {
    report
        .sections
        .iter()
        .map(|r| render_section(r.section, &r.outcome))
        .collect::<Vec<_>>()
        .join("\n")
}
