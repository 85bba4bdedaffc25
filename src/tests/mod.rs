use std::path::Path;

use chrono::{Local, TimeZone};

use crate::engine::{Dashboard, FilterState};
use crate::generator::{Generator, Options};
use crate::model::{ContentType, Insight, Status};
use crate::output::OutputFormat;
use crate::resolver::{FallbackReason, Origin};

const SOURCE_JSON: &str = r#"[
  {"id": "SMRT1", "content": "Rates, explained", "status": "live", "priority": 1, "hasCta": true,
   "cta": {"text": "Learn more", "url": "https://example.com/rates"}, "requiredContext": ["SYSTEM"]},
  {"id": "SMRT2", "content": "Your home in {{ city }}", "status": "review", "priority": 2,
   "isDynamic": true, "templateKeys": ["city"]},
  {"id": "SMRT3", "content": "Old news", "status": "retired", "priority": 3}
]"#;

fn write_source(dir: &Path) -> String {
    let path = dir.join("insights.json");
    std::fs::write(&path, SOURCE_JSON).unwrap();
    path.display().to_string()
}

fn options(output: &Path) -> Options {
    Options {
        output: output.display().to_string(),
        source_paths: Vec::new(),
        ..Options::default()
    }
}

fn fixed_now() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap()
}

#[test]
fn filtered_view_is_ordered_subset_for_every_combination() {
    let insights: Vec<Insight> = serde_json::from_str(SOURCE_JSON).unwrap();
    let mut dashboard = Dashboard::new(insights.clone());
    let statuses = std::iter::once(None).chain(Status::ALL.iter().copied().map(Some));
    for status in statuses {
        for kind in [None, Some(ContentType::Static), Some(ContentType::Dynamic)] {
            for query in ["", "smrt", "RATES", "zzz"] {
                dashboard.apply_filter(FilterState {
                    search_query: query.to_string(),
                    status_filter: status,
                    type_filter: kind,
                    ..FilterState::default()
                });
                let positions: Vec<usize> = dashboard
                    .filtered_insights()
                    .iter()
                    .map(|f| insights.iter().position(|i| i.id == f.id).unwrap())
                    .collect();
                assert!(positions.windows(2).all(|w| w[0] < w[1]));
                assert_eq!(dashboard.stats().total, insights.len());
            }
        }
    }
}

#[tokio::test]
async fn html_without_source_embeds_builtin_data() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site").join("index.html");
    let generator = Generator::new(options(&out)).unwrap();
    assert_eq!(generator.format(), OutputFormat::Html);

    let report = generator.run_at(fixed_now()).await.unwrap();
    assert_eq!(report.origin, Origin::Fallback(FallbackReason::SourceUnavailable));
    assert_eq!(report.total, 1);

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("\"id\":\"SMRT1\""));
    assert!(html.contains("Last updated: March 07, 2024 at 12:00 PM"));
}

#[tokio::test]
async fn html_ignores_filters() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let out = dir.path().join("index.html");
    let mut opts = options(&out);
    opts.source = Some(source);
    opts.filter.status_filter = Some(Status::Retired);

    let report = Generator::new(opts).unwrap().run_at(fixed_now()).await.unwrap();
    assert_eq!(report.rows, 3);
    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("SMRT2"));
}

#[tokio::test]
async fn csv_export_writes_filtered_rows() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let out = dir.path().join("facts.csv");
    let mut opts = options(&out);
    opts.source = Some(source.clone());
    opts.filter.type_filter = Some(ContentType::Static);

    let report = Generator::new(opts).unwrap().run_at(fixed_now()).await.unwrap();
    assert_eq!(report.origin, Origin::Source(source.into()));
    assert_eq!(report.rows, 2);

    let csv = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        "SMRT1,live,1,Static,\"Rates, explained\",,Learn more,https://example.com/rates,SYSTEM,No,No,Yes"
    );
    assert!(lines[2].starts_with("SMRT3,retired,3,Static,Old news,"));
}

#[tokio::test]
async fn csv_into_directory_uses_dated_name() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let exports = dir.path().join("exports");
    std::fs::create_dir_all(&exports).unwrap();
    let mut opts = options(&exports);
    opts.source = Some(source);
    opts.output_format = Some(OutputFormat::Csv);

    let now = fixed_now();
    let report = Generator::new(opts).unwrap().run_at(now).await.unwrap();
    let expected = exports.join(format!(
        "smart_facts_export_{}.csv",
        now.naive_utc().date().format("%Y-%m-%d")
    ));
    assert_eq!(report.path.as_deref(), Some(expected.as_path()));
    assert!(expected.is_file());
}

#[tokio::test]
async fn empty_csv_export_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let out = dir.path().join("facts.csv");
    let mut opts = options(&out);
    opts.source = Some(source);
    opts.filter.search_query = "no such insight".to_string();

    let report = Generator::new(opts).unwrap().run_at(fixed_now()).await.unwrap();
    assert!(report.path.is_none());
    assert_eq!(report.rows, 0);
    assert!(!out.exists());
}

#[tokio::test]
async fn json_output_honours_filters() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let out = dir.path().join("facts.json");
    let mut opts = options(&out);
    opts.source = Some(source);
    opts.filter.search_query = "CITY".to_string();

    Generator::new(opts).unwrap().run_at(fixed_now()).await.unwrap();
    let written: Vec<Insight> =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].id, "SMRT2");
}

#[tokio::test]
async fn broken_source_falls_back_and_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("insights.yml");
    std::fs::write(&bad, "not: [a, list").unwrap();
    let out = dir.path().join("index.html");
    let mut opts = options(&out);
    opts.source = Some(bad.display().to_string());
    opts.fallback = Vec::new();

    let report = Generator::new(opts).unwrap().run_at(fixed_now()).await.unwrap();
    assert!(matches!(
        report.origin,
        Origin::Fallback(FallbackReason::ExtractionFailure(_))
    ));
    assert_eq!(report.total, 0);
    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("No insights found"));
}

#[test]
fn empty_output_path_is_rejected() {
    let opts = Options {
        output: "  ".to_string(),
        ..Options::default()
    };
    assert!(Generator::new(opts).is_err());
}
