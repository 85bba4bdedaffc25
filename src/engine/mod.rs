mod filters;

use chrono::NaiveDate;
use tracing::debug;

use crate::model::{ContentType, Insight, Status, ViewMode};
use crate::output::csv;

pub use filters::{matches, FilterState};

/// Aggregate counters over the full insight sequence. Draft and archived
/// records only show up in `total`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub live: usize,
    pub review: usize,
    pub dynamic: usize,
    pub with_cta: usize,
    pub retired: usize,
}

impl Stats {
    pub fn collect(insights: &[Insight]) -> Self {
        let mut stats = Stats {
            total: insights.len(),
            ..Stats::default()
        };
        for insight in insights {
            match insight.status {
                Status::Live => stats.live += 1,
                Status::Review => stats.review += 1,
                Status::Retired => stats.retired += 1,
                Status::Draft | Status::Archived => {}
            }
            if insight.is_dynamic {
                stats.dynamic += 1;
            }
            if insight.has_cta {
                stats.with_cta += 1;
            }
        }
        stats
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub contents: String,
    pub rows: usize,
}

/// Holds the immutable insight sequence plus the mutable filter state.
///
/// Every filter mutation recomputes the matching indices once; reads are
/// served from that cache.
#[derive(Clone, Debug)]
pub struct Dashboard {
    insights: Vec<Insight>,
    filter: FilterState,
    stats: Stats,
    visible: Vec<usize>,
}

impl Dashboard {
    pub fn new(insights: Vec<Insight>) -> Self {
        let stats = Stats::collect(&insights);
        let visible = (0..insights.len()).collect();
        Self {
            insights,
            filter: FilterState::default(),
            stats,
            visible,
        }
    }

    pub fn insights(&self) -> &[Insight] {
        &self.insights
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn view_mode(&self) -> ViewMode {
        self.filter.view_mode
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filter.search_query = query.into();
        self.refresh();
    }

    pub fn set_status_filter(&mut self, status: Option<Status>) {
        self.filter.status_filter = status;
        self.refresh();
    }

    pub fn set_type_filter(&mut self, kind: Option<ContentType>) {
        self.filter.type_filter = kind;
        self.refresh();
    }

    /// Presentation only; the filtered set is untouched.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.filter.view_mode = mode;
    }

    pub fn apply_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.refresh();
    }

    pub fn reset_filters(&mut self) {
        let view_mode = self.filter.view_mode;
        self.filter = FilterState {
            view_mode,
            ..FilterState::default()
        };
        self.refresh();
    }

    fn refresh(&mut self) {
        self.visible = self
            .insights
            .iter()
            .enumerate()
            .filter(|(_, insight)| matches(insight, &self.filter))
            .map(|(idx, _)| idx)
            .collect();
        debug!(
            visible = self.visible.len(),
            total = self.insights.len(),
            "filters applied"
        );
    }

    /// Matching insights in their original order.
    pub fn filtered_insights(&self) -> Vec<&Insight> {
        self.visible.iter().map(|&idx| &self.insights[idx]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty_view(&self) -> bool {
        self.visible.is_empty()
    }

    /// CSV of the currently filtered insights, or `None` when nothing matches.
    pub fn export_to_csv(&self, date: NaiveDate) -> Option<CsvExport> {
        let selected = self.filtered_insights();
        let contents = csv::render_csv(&selected)?;
        Some(CsvExport {
            file_name: csv::export_file_name(date),
            contents,
            rows: selected.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cta;

    fn sample() -> Vec<Insight> {
        let mut a = Insight::new("SMRT1", "Interest rates can be unpredictable.", Status::Live);
        a.priority = 1;
        a.has_cta = true;
        a.cta = Some(Cta {
            text: "See ways".to_string(),
            url: "https://example.com".to_string(),
        });

        let mut b = Insight::new("SMRT2", "Your home gained {{ value }} this year", Status::Review);
        b.is_dynamic = true;
        b.template_keys = vec!["value".to_string()];

        let c = Insight::new("smrt3", "Draft copy about RATES", Status::Draft);

        let mut d = Insight::new("OLD1", "Retired fact", Status::Retired);
        d.is_dynamic = true;

        let e = Insight::new("ARCH1", "Archived fact", Status::Archived);
        vec![a, b, c, d, e]
    }

    fn ids(dashboard: &Dashboard) -> Vec<&str> {
        dashboard
            .filtered_insights()
            .iter()
            .map(|i| i.id.as_str())
            .collect()
    }

    #[test]
    fn empty_filters_return_everything_in_order() {
        let dashboard = Dashboard::new(sample());
        assert_eq!(ids(&dashboard), vec!["SMRT1", "SMRT2", "smrt3", "OLD1", "ARCH1"]);
    }

    #[test]
    fn search_is_case_insensitive_over_id_and_content() {
        let mut dashboard = Dashboard::new(sample());
        dashboard.set_search_query("rates");
        assert_eq!(ids(&dashboard), vec!["SMRT1", "smrt3"]);
        dashboard.set_search_query("SmRt");
        assert_eq!(ids(&dashboard), vec!["SMRT1", "SMRT2", "smrt3"]);
    }

    #[test]
    fn filters_are_conjunctive() {
        let mut dashboard = Dashboard::new(sample());
        dashboard.set_type_filter(Some(ContentType::Dynamic));
        assert_eq!(ids(&dashboard), vec!["SMRT2", "OLD1"]);
        dashboard.set_status_filter(Some(Status::Retired));
        assert_eq!(ids(&dashboard), vec!["OLD1"]);
        dashboard.set_search_query("smrt");
        assert!(dashboard.is_empty_view());
    }

    #[test]
    fn static_type_excludes_dynamic() {
        let mut dashboard = Dashboard::new(sample());
        dashboard.set_type_filter(Some(ContentType::Static));
        assert_eq!(ids(&dashboard), vec!["SMRT1", "smrt3", "ARCH1"]);
    }

    #[test]
    fn reset_restores_full_sequence_and_keeps_view_mode() {
        let mut dashboard = Dashboard::new(sample());
        dashboard.set_view_mode(ViewMode::List);
        dashboard.set_status_filter(Some(Status::Live));
        dashboard.reset_filters();
        assert_eq!(dashboard.filtered_len(), 5);
        assert_eq!(dashboard.view_mode(), ViewMode::List);
    }

    #[test]
    fn view_mode_does_not_change_selection() {
        let mut dashboard = Dashboard::new(sample());
        dashboard.set_status_filter(Some(Status::Live));
        let before = ids(&dashboard).len();
        dashboard.set_view_mode(ViewMode::List);
        assert_eq!(ids(&dashboard).len(), before);
    }

    #[test]
    fn stats_ignore_filters() {
        let mut dashboard = Dashboard::new(sample());
        let before = dashboard.stats();
        dashboard.set_search_query("nothing matches this");
        assert_eq!(dashboard.stats(), before);
        assert_eq!(
            before,
            Stats {
                total: 5,
                live: 1,
                review: 1,
                dynamic: 2,
                with_cta: 1,
                retired: 1,
            }
        );
    }

    #[test]
    fn stats_for_two_records() {
        let a = Insight::new("A", "", Status::Live);
        let mut b = Insight::new("B", "", Status::Retired);
        b.is_dynamic = true;
        b.has_cta = true;
        let stats = Stats::collect(&[a, b]);
        assert_eq!(
            stats,
            Stats {
                total: 2,
                live: 1,
                review: 0,
                dynamic: 1,
                with_cta: 1,
                retired: 1,
            }
        );
    }

    #[test]
    fn export_uses_filtered_subset() {
        let mut dashboard = Dashboard::new(sample());
        dashboard.set_status_filter(Some(Status::Live));
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let export = dashboard.export_to_csv(date).unwrap();
        assert_eq!(export.rows, 1);
        assert_eq!(export.file_name, "smart_facts_export_2025-01-31.csv");
        assert_eq!(export.contents.lines().count(), 2);
        assert!(export.contents.lines().nth(1).unwrap().starts_with("SMRT1,live,1,Static,"));
    }

    #[test]
    fn export_of_empty_view_is_none() {
        let mut dashboard = Dashboard::new(sample());
        dashboard.set_search_query("zzz");
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert!(dashboard.export_to_csv(date).is_none());
        assert!(Dashboard::new(Vec::new()).export_to_csv(date).is_none());
    }
}
