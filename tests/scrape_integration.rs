//! Integration tests for the project list walk against a mock tracker.

use std::time::Duration;

use tracker_core::address::{ADDRESS_SHEET, MemoryNormalizer, NORMALIZED_COLUMN, address_sheet};
use tracker_core::export::{FINANCIAL_SHEET, PROJECT_LIST_SHEET, TECHNICAL_SHEET};
use tracker_core::project::{DetailField, Indicator, IndicatorField};
use tracker_core::scrape::SkipReason;
use tracker_core::{ScrapeError, Scraper, ScraperConfig, build_workbook, write_json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::pages::{
    base_url, list_page, mount_list, mount_project, project_row, summary_page,
};
use support::socket_guard::start_mock_server_or_skip;

macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mock_server
    }};
}

const CERTIFIED: &str = "#5-Certification & Close of File";

fn scraper_for(server: &MockServer) -> Scraper {
    let mut config = ScraperConfig::with_base_url(base_url(server));
    config.fetch.backoff_base = Duration::from_millis(10);
    Scraper::new(&config).unwrap()
}

#[tokio::test]
async fn test_walk_collects_summaries_and_details() {
    let server = require_mock_server!();
    mount_list(
        &server,
        "36-67",
        list_page(&[project_row("101", "Gym"), project_row("102", "Library")]),
    )
    .await;
    mount_project(&server, "101", "61234-56", "Gym Retrofit", CERTIFIED).await;
    mount_project(&server, "102", "61234-57", "Library Annex", "1 YR VOID").await;

    let scraper = scraper_for(&server);
    let outcome = scraper.walk("36-67").await.unwrap();

    assert_eq!(outcome.total_rows, 2);
    assert_eq!(outcome.summaries.len(), 2);
    assert_eq!(outcome.details.len(), 2);
    assert!(outcome.skipped.is_empty());
    assert!(outcome.incomplete.is_empty());

    let first = &outcome.summaries[0];
    assert_eq!(first.app_id, "01 101");
    assert_eq!(first.ptn, "61234-56");
    assert_eq!(first.name, "Gym Retrofit");
    assert_eq!(first.scope, "Modernization of classrooms");
    assert_eq!(first.cert_type, CERTIFIED);
    assert!(first.link.starts_with(&base_url(&server)));
    assert!(first.link.contains("ApplicationSummary.aspx"));
    assert_eq!(outcome.summaries[1].cert_type, "1 YR VOID");

    let detail = &outcome.details[0];
    assert_eq!(detail.summary, *first);
    assert_eq!(detail.field(DetailField::OfficeId), Some("04"));
    assert_eq!(detail.field(DetailField::FinalProjectCost), Some("$1,350,000"));
    assert_eq!(detail.field(DetailField::ClosedDate), None);
    assert_eq!(detail.summary.zip.as_deref(), Some("93701"));
    assert_eq!(
        detail.indicator(IndicatorField::AccessCompliance),
        Some(Indicator::Yes)
    );
    assert_eq!(detail.indicator(IndicatorField::Hps), Some(Indicator::No));
    assert_eq!(detail.indicator(IndicatorField::Sb575), None);

    // list + 2 * (summary + closeout)
    assert_eq!(scraper.stats().total_requests, 5);
}

#[tokio::test]
async fn test_walk_reports_progress_after_every_row() {
    let server = require_mock_server!();
    mount_list(
        &server,
        "36-67",
        list_page(&[
            project_row("101", "Gym"),
            "<tr><td>no link</td></tr>".to_string(),
            project_row("102", "Library"),
        ]),
    )
    .await;
    mount_project(&server, "101", "1", "Gym", CERTIFIED).await;
    mount_project(&server, "102", "2", "Library", CERTIFIED).await;

    let scraper = scraper_for(&server);
    let mut calls = Vec::new();
    let outcome = scraper
        .walk_with_progress("36-67", |done, total| calls.push((done, total)))
        .await
        .unwrap();

    assert_eq!(calls, vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!(outcome.summaries.len(), 2);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].index, 2);
    assert_eq!(outcome.skipped[0].reason, SkipReason::TooFewCells { found: 1 });
}

#[tokio::test]
async fn test_failed_summary_keeps_partial_project() {
    let server = require_mock_server!();
    let rows: Vec<String> = (1..=5)
        .map(|n| project_row(&format!("20{n}"), &format!("Project {n}")))
        .collect();
    mount_list(&server, "36-67", list_page(&rows)).await;
    for n in [1, 2, 4, 5] {
        mount_project(&server, &format!("20{n}"), &format!("P-{n}"), &format!("Full {n}"), CERTIFIED)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/tracker/ApplicationSummary.aspx"))
        .and(query_param("AppId", "203"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = scraper_for(&server);
    let outcome = scraper.walk("36-67").await.unwrap();

    assert_eq!(outcome.summaries.len(), 5);
    assert_eq!(outcome.details.len(), 4);
    assert_eq!(outcome.incomplete.len(), 1);
    assert_eq!(outcome.incomplete[0].index, 3);

    let partial = &outcome.summaries[2];
    assert_eq!(partial.app_id, "01 203");
    assert_eq!(partial.name, "Project 3");
    assert_eq!(partial.ptn, "");
    assert_eq!(partial.cert_type, "");

    let names: Vec<&str> = outcome.summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Full 1", "Full 2", "Project 3", "Full 4", "Full 5"]);
    assert_eq!(scraper.stats().failed_requests, 1);
}

#[tokio::test]
async fn test_missing_closeout_leaves_certification_empty() {
    let server = require_mock_server!();
    mount_list(&server, "36-67", list_page(&[project_row("301", "Gym")])).await;
    Mock::given(method("GET"))
        .and(path("/tracker/ApplicationSummary.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(summary_page("9", "Gym")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tracker/ProjectCloseout.aspx"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = scraper_for(&server).walk("36-67").await.unwrap();

    assert_eq!(outcome.details.len(), 1);
    assert!(outcome.incomplete.is_empty());
    assert_eq!(outcome.summaries[0].cert_type, "");
    assert_eq!(outcome.summaries[0].ptn, "9");
}

#[tokio::test]
async fn test_certification_falls_back_to_page_text() {
    let server = require_mock_server!();
    mount_list(&server, "36-67", list_page(&[project_row("401", "Gym")])).await;
    Mock::given(method("GET"))
        .and(path("/tracker/ApplicationSummary.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(summary_page("9", "Gym")))
        .mount(&server)
        .await;
    let closeout = "<html><body><p>Letters issued:</p>\
        <p>DSA 301P Notification of Requirement for Certification</p></body></html>";
    Mock::given(method("GET"))
        .and(path("/tracker/ProjectCloseout.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(closeout))
        .mount(&server)
        .await;

    let outcome = scraper_for(&server).walk("36-67").await.unwrap();

    assert_eq!(
        outcome.summaries[0].cert_type,
        "DSA 301P Notification of Requirement for Certification"
    );
}

#[tokio::test]
async fn test_missing_table_yields_empty_outcome() {
    let server = require_mock_server!();
    mount_list(
        &server,
        "36-67",
        "<html><body><p>No projects for this client.</p></body></html>".to_string(),
    )
    .await;

    let scraper = scraper_for(&server);
    let outcome = scraper.walk("36-67").await.unwrap();

    assert!(outcome.is_empty());
    assert_eq!(outcome.total_rows, 0);
    assert_eq!(scraper.stats().total_requests, 1);
}

#[tokio::test]
async fn test_list_fetch_failure_is_fatal() {
    let server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/tracker/ProjectList.aspx"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let result = scraper_for(&server).walk("36-67").await;

    match result {
        Err(ScrapeError::ListFetch { url, .. }) => {
            assert!(url.ends_with("ProjectList.aspx?ClientId=36-67"));
        }
        other => panic!("expected list fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_walk_exports_workbook() {
    let server = require_mock_server!();
    mount_list(&server, "36-67", list_page(&[project_row("501", "Gym")])).await;
    mount_project(&server, "501", "61234-56", "Gym Retrofit", CERTIFIED).await;

    let scraper = scraper_for(&server);
    let outcome = scraper.walk("36-67").await.unwrap();

    let mut workbook = build_workbook("36-67", &outcome.summaries, &outcome.details)
        .with_stats(scraper.stats());
    let normalizer = MemoryNormalizer::new();
    workbook.push_sheet(address_sheet(&normalizer, &outcome.details).await.unwrap());

    let list = workbook.sheet(PROJECT_LIST_SHEET).unwrap();
    assert_eq!(list.cell(0, "Project Cert Type"), Some(CERTIFIED));
    let financial = workbook.sheet(FINANCIAL_SHEET).unwrap();
    assert_eq!(financial.cell(0, "Estimated Amount"), Some("$1,200,000"));
    assert!(!financial.columns.iter().any(|c| c == "Closed Date"));
    let technical = workbook.sheet(TECHNICAL_SHEET).unwrap();
    assert_eq!(technical.cell(0, "Access Compliance"), Some("Yes"));
    let addresses = workbook.sheet(ADDRESS_SHEET).unwrap();
    assert_eq!(
        addresses.cell(0, NORMALIZED_COLUMN),
        Some("100 SCHOOL RD, FRESNO 93701")
    );

    let dir = tempfile::tempdir().unwrap();
    let path = write_json(&workbook, dir.path()).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(value["stats"]["total_requests"], 3);
    assert_eq!(value["sheets"].as_array().unwrap().len(), 4);
}
