//! HTML fixtures shaped like the tracker's pages.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TABLE_ID: &str = "ctl00_MainContent_gdvsch";

/// Tracker root under the mock server.
pub fn base_url(server: &MockServer) -> String {
    format!("{}/tracker/", server.uri())
}

/// A list page row linking to project `app_id`.
pub fn project_row(app_id: &str, name: &str) -> String {
    format!(
        "<tr><td><a href=\"ApplicationSummary.aspx?OriginId=01&amp;AppId={app_id}\">01-{app_id}</a></td>\
         <td>Active</td><td>{name}</td></tr>"
    )
}

/// A list page with the project table, a header row and `rows`.
pub fn list_page(rows: &[String]) -> String {
    format!(
        "<html><body><form><table id=\"{TABLE_ID}\">\
         <tr><th>Application</th><th>Status</th><th>Project Name</th></tr>{}\
         </table></form></body></html>",
        rows.concat()
    )
}

/// A summary page carrying the identity fields, a few mapped fields and two
/// indicator checkboxes.
pub fn summary_page(ptn: &str, name: &str) -> String {
    format!(
        r#"<html><body><table>
        <tr><td>PTN #:</td><td>{ptn}</td><td>Office ID:</td><td>04</td></tr>
        <tr><td>Project Name:</td><td>{name}</td></tr>
        <tr><td>Project Scope:</td><td>Modernization of classrooms</td></tr>
        <tr><td>Project Type:</td><td>Alteration</td></tr>
        <tr><td>Address:</td><td>100 School Rd</td><td>City:</td><td>Fresno</td><td>Zip:</td><td>93701</td></tr>
        <tr><td>Estimated Amt:</td><td>$1,200,000</td></tr>
        <tr><td>Final Project Cost:</td><td>$1,350,000</td></tr>
        <tr><td>Closed Date:</td><td></td></tr>
        <tr><td><input type="checkbox" checked="checked" disabled></td><td>Access Compliance</td>
            <td><input type="checkbox" disabled></td><td>HPS</td></tr>
        </table></body></html>"#
    )
}

/// A closeout page naming the last certification letter.
pub fn closeout_page(letter: &str) -> String {
    format!(
        "<html><body><table>\
         <tr><td>Last Certification Letter Type:</td><td>{letter}</td></tr>\
         </table></body></html>"
    )
}

/// Serves the list page for `client_id`.
pub async fn mount_list(server: &MockServer, client_id: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/tracker/ProjectList.aspx"))
        .and(query_param("ClientId", client_id))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serves project `app_id`'s summary and closeout pages.
pub async fn mount_project(server: &MockServer, app_id: &str, ptn: &str, name: &str, letter: &str) {
    Mock::given(method("GET"))
        .and(path("/tracker/ApplicationSummary.aspx"))
        .and(query_param("AppId", app_id))
        .respond_with(ResponseTemplate::new(200).set_body_string(summary_page(ptn, name)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tracker/ProjectCloseout.aspx"))
        .and(query_param("AppId", app_id))
        .respond_with(ResponseTemplate::new(200).set_body_string(closeout_page(letter)))
        .mount(server)
        .await;
}
