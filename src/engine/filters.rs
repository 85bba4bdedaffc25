use crate::model::{ContentType, Insight, Status, ViewMode};

/// Session filter inputs. `None`/empty means "match all".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_query: String,
    pub status_filter: Option<Status>,
    pub type_filter: Option<ContentType>,
    pub view_mode: ViewMode,
}

impl FilterState {
    pub fn is_unfiltered(&self) -> bool {
        self.search_query.is_empty() && self.status_filter.is_none() && self.type_filter.is_none()
    }
}

pub(in crate::engine) fn matches_search(insight: &Insight, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    insight.id.to_lowercase().contains(&needle) || insight.content.to_lowercase().contains(&needle)
}

pub(in crate::engine) fn matches_status(insight: &Insight, status: Option<Status>) -> bool {
    match status {
        Some(s) => insight.status == s,
        None => true,
    }
}

pub(in crate::engine) fn matches_type(insight: &Insight, kind: Option<ContentType>) -> bool {
    match kind {
        Some(ContentType::Static) => !insight.is_dynamic,
        Some(ContentType::Dynamic) => insight.is_dynamic,
        None => true,
    }
}

/// Conjunction of the search, status and type predicates. View mode is ignored.
pub fn matches(insight: &Insight, filter: &FilterState) -> bool {
    matches_search(insight, &filter.search_query)
        && matches_status(insight, filter.status_filter)
        && matches_type(insight, filter.type_filter)
}
