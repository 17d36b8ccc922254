//! Console API coverage: auth gate, listing, editing, bulk actions, export.

mod support;

use actix_web::cookie::{Cookie, Key};
use actix_web::http::{header, StatusCode};
use actix_web::{test, App};
use serde_json::{json, Value};

use landing_backend::domain::export::UTF8_BOM;
use landing_backend::domain::{City, Role};
use landing_backend::server::app_config;
use support::{seeded_state, STAFF, SUPERUSER};

use landing_backend::test_support::seeded_sign_up;

macro_rules! console_app {
    ($state:expr) => {
        test::init_service(
            App::new().configure(app_config($state, Key::generate(), false)),
        )
        .await
    };
}

async fn login<S>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets the session cookie")
        .to_str()
        .expect("ascii header")
        .to_owned();
    Cookie::parse_encoded(set_cookie)
        .expect("valid cookie")
        .into_owned()
}

fn assert_minute_precision_date(field: &str) {
    // YYYY-MM-DD HH:MM
    assert_eq!(field.len(), 16, "unexpected date shape: {field}");
    let bytes = field.as_bytes();
    assert_eq!(bytes[4], b'-');
    assert_eq!(bytes[7], b'-');
    assert_eq!(bytes[10], b' ');
    assert_eq!(bytes[13], b':');
}

#[actix_web::test]
async fn console_routes_require_authentication() {
    let (state, _) = seeded_state(vec![]);
    let app = console_app!(state);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/signups")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn wrong_credentials_are_rejected() {
    let (state, _) = seeded_state(vec![]);
    let app = console_app!(state);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": STAFF.0, "password": "wrong" }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let (state, _) = seeded_state(vec![]);
    let app = console_app!(state);
    let cookie = login(&app, STAFF.0, STAFF.1).await;

    let logout = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    // The purge instructs the browser to drop the cookie; a client that
    // kept it presents an emptied session and is rejected.
    let cleared = logout
        .response()
        .cookies()
        .find(|candidate| candidate.name() == "session")
        .map(|candidate| candidate.into_owned());
    let after = match cleared {
        Some(cleared) => {
            test::call_service(
                &app,
                test::TestRequest::get()
                    .uri("/api/v1/admin/signups")
                    .cookie(cleared)
                    .to_request(),
            )
            .await
        }
        None => {
            test::call_service(
                &app,
                test::TestRequest::get()
                    .uri("/api/v1/admin/signups")
                    .to_request(),
            )
            .await
        }
    };
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn listing_is_filtered_searched_and_paginated() {
    let mut records = Vec::new();
    for i in 1..=4 {
        let mut record = seeded_sign_up(&format!("Tehran User {i}"), &format!("0912000010{i}"));
        record.city = City::Tehran;
        records.push(record);
    }
    let mut coach = seeded_sign_up("Shiraz Coach", "09120000201");
    coach.city = City::Shiraz;
    coach.role = Role::Coach;
    coach.email = Some("coach@example.com".to_owned());
    records.push(coach);

    let (state, _) = seeded_state(records);
    let app = console_app!(state);
    let cookie = login(&app, STAFF.0, STAFF.1).await;

    // Unfiltered: everything, newest first.
    let all: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/signups")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(all["total"], 5);
    assert_eq!(all["items"][0]["full_name"], "Shiraz Coach");
    assert_eq!(all["items"][0]["city_label"], "شیراز");

    // City filter.
    let tehran: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/signups?city=TEHRAN")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(tehran["total"], 4);

    // Search across email.
    let searched: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/signups?search=coach%40example")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(searched["total"], 1);
    assert_eq!(searched["items"][0]["full_name"], "Shiraz Coach");

    // Pagination: page two of two-per-page still reports the full total.
    let paged: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/signups?page=2&per_page=2")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(paged["total"], 5);
    assert_eq!(paged["page"], 2);
    assert_eq!(paged["items"].as_array().expect("items array").len(), 2);

    // Unknown filter values are a client error.
    let bad = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/signups?city=GOTHAM")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn inline_edit_updates_review_fields() {
    let record = seeded_sign_up("Ali Rezaei", "09123456789");
    let id = record.id;
    let (state, repos) = seeded_state(vec![record]);
    let app = console_app!(state);
    let cookie = login(&app, STAFF.0, STAFF.1).await;

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/admin/signups/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({ "is_valid": false, "notes": "wrong number" }))
            .to_request(),
    )
    .await;

    assert_eq!(updated["is_valid"], false);
    assert_eq!(updated["is_contacted"], false);
    assert_eq!(updated["notes"], "wrong number");

    let stored = repos.sign_ups.snapshot();
    assert!(!stored[0].is_valid);
    assert_eq!(stored[0].notes, "wrong number");

    // Unknown ids are a 404, not a silent no-op.
    let missing = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/admin/signups/{}", uuid::Uuid::new_v4()))
            .cookie(cookie)
            .set_json(json!({ "is_valid": true }))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn bulk_contacted_touches_exactly_the_selection() {
    let records: Vec<_> = (1..=5)
        .map(|i| seeded_sign_up(&format!("Person {i}"), &format!("0912000030{i}")))
        .collect();
    let selected: Vec<_> = records.iter().take(3).map(|record| record.id).collect();
    let (state, repos) = seeded_state(records);
    let app = console_app!(state);
    let cookie = login(&app, STAFF.0, STAFF.1).await;

    let result: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/signups/contacted")
            .cookie(cookie)
            .set_json(json!({ "ids": selected }))
            .to_request(),
    )
    .await;

    assert_eq!(result["affected"], 3);
    for record in repos.sign_ups.snapshot() {
        assert_eq!(record.is_contacted, selected.contains(&record.id));
    }
}

#[actix_web::test]
async fn export_produces_bom_persian_header_and_ordered_rows() {
    let first = seeded_sign_up("Ali Rezaei", "09123456789");
    let mut second = seeded_sign_up("Sara Ahmadi", "09351112233");
    second.email = Some("sara@example.com".to_owned());
    let selection = vec![second.id, first.id];
    let (state, _) = seeded_state(vec![first, second]);
    let app = console_app!(state);
    let cookie = login(&app, STAFF.0, STAFF.1).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/signups/export")
            .cookie(cookie)
            .set_json(json!({ "ids": selection }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("content type")
        .to_str()
        .expect("ascii header")
        .to_owned();
    assert!(content_type.starts_with("text/csv"));
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .expect("attachment header")
        .to_str()
        .expect("ascii header")
        .to_owned();
    assert!(disposition.contains("signups.csv"));

    let bytes = test::read_body(response).await;
    assert_eq!(&bytes[..3], UTF8_BOM);

    let text = String::from_utf8(bytes[3..].to_vec()).expect("utf-8 body");
    let lines: Vec<&str> = text.split("\r\n").collect();
    assert_eq!(
        lines[0],
        "نام کامل,شماره تماس,ایمیل,شهر,هدف,نقش,تاریخ ثبت‌نام"
    );
    // Exactly two data rows, in the selected order.
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("Sara Ahmadi,09351112233,sara@example.com,"));
    assert!(lines[2].starts_with("Ali Rezaei,09123456789,,"));
    for line in &lines[1..3] {
        let date = line.rsplit(',').next().expect("date column");
        assert_minute_precision_date(date);
    }
}

#[actix_web::test]
async fn deletion_is_superuser_only() {
    let record = seeded_sign_up("Ali Rezaei", "09123456789");
    let id = record.id;
    let (state, repos) = seeded_state(vec![record]);
    let app = console_app!(state);

    let staff_cookie = login(&app, STAFF.0, STAFF.1).await;
    let forbidden = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/v1/admin/signups")
            .cookie(staff_cookie)
            .set_json(json!({ "ids": [id] }))
            .to_request(),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(repos.sign_ups.snapshot().len(), 1, "nothing was deleted");

    let root_cookie = login(&app, SUPERUSER.0, SUPERUSER.1).await;
    let removed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::delete()
            .uri("/api/v1/admin/signups")
            .cookie(root_cookie)
            .set_json(json!({ "ids": [id] }))
            .to_request(),
    )
    .await;
    assert_eq!(removed["affected"], 1);
    assert!(repos.sign_ups.snapshot().is_empty());
}

#[actix_web::test]
async fn page_views_are_listable_and_filterable_but_read_only() {
    let (state, _) = seeded_state(vec![]);
    let app = console_app!(state);

    // Generate traffic through the public page.
    for uri in [
        "/?utm_source=instagram&utm_medium=social",
        "/?utm_source=telegram",
        "/",
    ] {
        let response =
            test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let cookie = login(&app, STAFF.0, STAFF.1).await;

    let all: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/page-views")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(all["total"], 3);

    let filtered: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/page-views?utm_source=instagram&utm_medium=social")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(filtered["total"], 1);
    assert_eq!(filtered["items"][0]["utm"]["source"], "instagram");

    // No write surface exists for page views.
    let create_attempt = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/page-views")
            .cookie(cookie)
            .set_json(json!({ "utm_source": "forged" }))
            .to_request(),
    )
    .await;
    assert_eq!(create_attempt.status(), StatusCode::NOT_FOUND);
}
