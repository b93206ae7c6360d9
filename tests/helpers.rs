// Shared test helpers for sessions against a local mock portal.
//
// This module provides the session builder and HTML fixtures used across the
// integration test files.

use std::sync::Arc;

use httptest::Server;
use reqwest::Url;

use schoolloop::initialization::init_client;
use schoolloop::{Config, HttpTransport, RedirectInterceptor, Session};

pub const DAY_MS: i64 = 86_400_000;
/// 2012-10-01, local midnight in US Pacific daylight time.
pub const OCT_2012: i64 = 1_349_074_800_000;

/// Creates a session whose origin is the mock server, wired exactly like
/// `Session::new` wires the real portal.
pub fn create_test_session(server: &Server) -> Session {
    let origin = Url::parse(&server.url("/").to_string()).expect("Invalid mock server URL");
    let interceptor = Arc::new(RedirectInterceptor::new());
    let client = init_client(&Config::default(), Arc::clone(&interceptor))
        .expect("Failed to build HTTP client");
    let transport = HttpTransport::new(client, Arc::clone(&interceptor));
    Session::with_transport(origin, transport, interceptor)
}

/// Student home page with two classes and one current assignment.
#[allow(dead_code)] // Used by other test files
pub fn student_home() -> String {
    r#"<html><body>
    <table class="hub_general"><tbody class="hub_general_body">
      <tr><td class="left"><a href="/portal/course?group_id=4821">Algebra II</a></td><td class="list_text">B+</td></tr>
      <tr><td class="left"><a href="/portal/course?group_id=17">Chemistry</a></td><td class="list_text"></td></tr>
    </tbody></table>
    <div class="title">Current Assignments</div>
    <table class="general_list"><tbody>
      <tr><td><img src="/images/due.gif"></td><td><div><a href="/assignment?id=31">Problem Set 4</a></div></td><td></td>
          <td><div>Algebra II Period 3</div></td><td><div>10/15/12</div></td><td></td></tr>
    </tbody></table>
    </body></html>"#
        .to_string()
}

/// October 2012 month grid with one event on the 15th.
#[allow(dead_code)] // Used by other test files
pub fn october_calendar() -> String {
    let mut cells = String::new();
    for day in 1..=31u32 {
        let day_id = OCT_2012 + i64::from(day - 1) * DAY_MS;
        let event = if day == 15 {
            r#"<div style="font-size: 10px; font-weight: bold;"><b>Biology</b> <a id="ev_91" href="/calendar/event?id=91">Lab 3 due</a></div>"#
        } else {
            ""
        };
        cells.push_str(&format!(
            r#"<td class="cal_td"><a href="/calendar/day?day_id={day_id}">+</a><span>{day}</span>{event}</td>"#
        ));
    }
    format!(
        r#"<html><body>
        <a href="/calendar/month?month_id={}">&lt;</a>
        <a href="/calendar/month?month_id={}">&gt;</a>
        <table class="cal_table"><tr>{cells}</tr></table>
        </body></html>"#,
        OCT_2012 - 3_600_000,
        OCT_2012 + 3_600_000
    )
}
