use chrono::NaiveDate;
use itertools::Itertools;

use crate::model::{ContentType, Insight};

pub const CSV_HEADERS: [&str; 12] = [
    "ID",
    "Status",
    "Priority",
    "Type",
    "Content",
    "Dynamic Variables",
    "CTA Text",
    "CTA URL",
    "Required Context",
    "Requires Primary User",
    "Requires Profile Complete",
    "Has CTA",
];

pub const LIST_SEPARATOR: &str = "; ";

fn yes_no(value: bool) -> String {
    if value {
        "Yes".to_string()
    } else {
        "No".to_string()
    }
}

/// Quotes a field only when it holds a comma, a double quote or a newline.
pub fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn flatten_content(content: &str) -> String {
    content.replace('\n', " ").replace('\r', "")
}

/// Raw (unescaped) cells for one insight, in `CSV_HEADERS` order.
pub fn csv_row(insight: &Insight) -> Vec<String> {
    let (cta_text, cta_url) = match insight.cta.as_ref() {
        Some(cta) => (cta.text.clone(), cta.url.clone()),
        None => (String::new(), String::new()),
    };
    vec![
        insight.id.clone(),
        insight.status.as_str().to_string(),
        insight.priority.to_string(),
        ContentType::of(insight).label().to_string(),
        flatten_content(&insight.content),
        insight.template_keys.iter().join(LIST_SEPARATOR),
        cta_text,
        cta_url,
        insight.required_context.iter().join(LIST_SEPARATOR),
        yes_no(insight.requires_primary_user),
        yes_no(insight.requires_profile_complete),
        yes_no(insight.has_cta),
    ]
}

/// Serializes the given rows. Returns `None` for an empty slice: there is no
/// header-only export.
pub fn render_csv(insights: &[&Insight]) -> Option<String> {
    if insights.is_empty() {
        return None;
    }
    let header = CSV_HEADERS.join(",");
    let rows = insights
        .iter()
        .map(|insight| csv_row(insight).iter().map(|v| escape_field(v)).join(","));
    Some(std::iter::once(header).chain(rows).join("\n"))
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("smart_facts_export_{}.csv", date.format("%Y-%m-%d"))
}
