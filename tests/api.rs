mod common;

use common::{body, seeded, spawn_app};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_and_docs_are_public() {
    let app = spawn_app().await;
    let live = app.http.get(app.url("/health/live")).send().await.unwrap();
    assert_eq!(live.status(), StatusCode::OK);
    let ready = app.http.get(app.url("/health/ready")).send().await.unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
    let doc = app.http.get(app.url("/api-docs/openapi.json")).send().await.unwrap();
    assert_eq!(doc.status(), StatusCode::OK);
    let doc = body(doc).await;
    assert!(doc["paths"]["/api/service-requests/{id}/approve"].is_object());
}

#[tokio::test]
async fn private_routes_require_a_bearer_token() {
    let app = spawn_app().await;
    let response = app.http.get(app.url("/api/projects")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.get("not-a-jwt", "/api/projects").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let envelope = body(response).await;
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["status_code"], 401);
}

#[tokio::test]
async fn service_type_list_is_public_but_writes_are_not() {
    let agency = seeded().await;
    let app = &agency.app;

    let created = app
        .post(&agency.admin, "/api/service-types", json!({ "name": "Web", "status": "active" }))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let list = app.http.get(app.url("/api/service-types?status=active")).send().await.unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    assert_eq!(body(list).await["data"].as_array().unwrap().len(), 1);

    let anonymous = app
        .http
        .post(app.url("/api/service-types"))
        .json(&json!({ "name": "Sneaky", "status": "active" }))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let as_client = app
        .post(&agency.client, "/api/service-types", json!({ "name": "Sneaky", "status": "active" }))
        .await;
    assert_eq!(as_client.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn approving_a_request_creates_its_project() {
    let agency = seeded().await;
    let app = &agency.app;

    let created = app
        .post(&agency.client, "/api/service-requests", json!({ "title": "Mobile app", "description": "iOS" }))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(body(created).await["data"]["id"], "SERVICE01");

    let approved = app
        .post(&agency.admin, "/api/service-requests/SERVICE01/approve", json!({ "employee_ids": ["USER05"] }))
        .await;
    assert_eq!(approved.status(), StatusCode::CREATED);
    let project = body(approved).await["data"].clone();
    assert_eq!(project["id"], "PROJECT01");
    assert_eq!(project["client_id"], "USER02");
    assert_eq!(project["status"], "active");
    assert_eq!(project["employee_ids"], json!(["USER05"]));

    let request = body(app.get(&agency.client, "/api/service-requests/SERVICE01").await).await;
    assert_eq!(request["data"]["status"], "active");
    assert_eq!(request["data"]["project_id"], "PROJECT01");

    let again = app
        .post(&agency.admin, "/api/service-requests/SERVICE01/reject", json!({}))
        .await;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn employees_only_touch_assigned_projects() {
    let agency = seeded().await;
    let app = &agency.app;
    let usr05 = &agency.employees[2];

    for (name, members) in [("Assigned", json!(["USER05"])), ("Other", json!(["USER03"]))] {
        let response = app
            .post(
                &agency.admin,
                "/api/projects",
                json!({ "name": name, "client_id": "USER02", "employee_ids": members }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let denied = app.put(usr05, "/api/projects/PROJECT02", json!({ "progress": 50 })).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    assert_eq!(body(denied).await["message"], "access denied: employee not assigned to this project");

    let renamed = app.put(usr05, "/api/projects/PROJECT01", json!({ "name": "Mine now" })).await;
    assert_eq!(renamed.status(), StatusCode::FORBIDDEN);

    let progressed = app
        .put(usr05, "/api/projects/PROJECT01", json!({ "status": "in_progress", "progress": 30 }))
        .await;
    assert_eq!(progressed.status(), StatusCode::OK);
    assert_eq!(body(progressed).await["data"]["progress"], 30);

    let listed = body(app.get(usr05, "/api/projects").await).await;
    assert_eq!(listed["data"]["total"], 1);
    assert_eq!(listed["data"]["items"][0]["id"], "PROJECT01");
}

#[tokio::test]
async fn clients_cannot_set_project_status() {
    let agency = seeded().await;
    let app = &agency.app;
    app.post(&agency.admin, "/api/projects", json!({ "name": "Site", "client_id": "USER02" })).await;

    let response = app.put(&agency.client, "/api/projects/PROJECT01", json!({ "status": "completed" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body(response).await["message"], "access denied: clients cannot update project status");

    let response = app
        .patch(&agency.client, "/api/projects/PROJECT01/progress", json!({ "progress": 75 }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn client_project_listing_paginates() {
    let agency = seeded().await;
    let app = &agency.app;
    for n in 0..13 {
        app.post(&agency.admin, "/api/projects", json!({ "name": format!("P{n}"), "client_id": "USER02" }))
            .await;
    }

    let page = body(app.get(&agency.client, "/api/projects?page=2&page_size=10").await).await;
    assert_eq!(page["data"]["total"], 13);
    assert_eq!(page["data"]["total_pages"], 2);
    assert_eq!(page["data"]["items"].as_array().unwrap().len(), 3);

    let bad = app.get(&agency.client, "/api/projects?page_size=101").await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn project_messages_are_members_only() {
    let agency = seeded().await;
    let app = &agency.app;
    app.post(
        &agency.admin,
        "/api/projects",
        json!({ "name": "Site", "client_id": "USER02", "employee_ids": ["USER03"] }),
    )
    .await;

    let sent = app
        .post(&agency.employees[0], "/api/messages", json!({ "project_id": "PROJECT01", "content": "Kickoff" }))
        .await;
    assert_eq!(sent.status(), StatusCode::CREATED);

    let outsider = app.get(&agency.employees[1], "/api/projects/PROJECT01/messages").await;
    assert_eq!(outsider.status(), StatusCode::FORBIDDEN);

    let thread = body(app.get(&agency.client, "/api/projects/PROJECT01/messages").await).await;
    assert_eq!(thread["data"]["items"][0]["content"], "Kickoff");

    let not_mine = app.delete(&agency.client, "/api/messages/MESSAGE01").await;
    assert_eq!(not_mine.status(), StatusCode::FORBIDDEN);
    let mine = app.delete(&agency.employees[0], "/api/messages/MESSAGE01").await;
    assert_eq!(mine.status(), StatusCode::OK);
}

#[tokio::test]
async fn deactivated_users_are_locked_out_immediately() {
    let agency = seeded().await;
    let app = &agency.app;
    let token = &agency.employees[0];
    assert_eq!(app.get(token, "/api/auth/me").await.status(), StatusCode::OK);

    let response = app.patch(&agency.admin, "/api/employees/USER03", json!({ "status": "inactive" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(app.get(token, "/api/auth/me").await.status(), StatusCode::FORBIDDEN);

    let deleted = app.delete(&agency.admin, "/api/users/USER04").await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(app.get(&agency.employees[1], "/api/auth/me").await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn employee_and_client_surfaces_are_admin_only() {
    let agency = seeded().await;
    let app = &agency.app;

    let created = app
        .post(
            &agency.admin,
            "/api/clients",
            json!({
                "name": "Acme",
                "email": "ops@acme.io",
                "company": "Acme",
                "address": "1 Main St",
                "password": "secret1"
            }),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(body(created).await["data"]["id"], "USER06");

    let clients = body(app.get(&agency.admin, "/api/clients").await).await;
    assert_eq!(clients["data"]["total"], 2);

    let wrong_kind = app.get(&agency.admin, "/api/employees/USER02").await;
    assert_eq!(wrong_kind.status(), StatusCode::NOT_FOUND);

    let as_employee = app.get(&agency.employees[0], "/api/clients").await;
    assert_eq!(as_employee.status(), StatusCode::FORBIDDEN);

    let duplicate = app
        .post(
            &agency.admin,
            "/api/employees",
            json!({
                "name": "Dup",
                "email": "dev3@agency.io",
                "department": "Eng",
                "salary": 0,
                "password": "secret1"
            }),
        )
        .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn dashboard_counts_are_scoped() {
    let agency = seeded().await;
    let app = &agency.app;
    app.post(&agency.client, "/api/service-requests", json!({ "title": "One" })).await;
    app.post(&agency.client, "/api/service-requests", json!({ "title": "Two" })).await;
    app.post(&agency.admin, "/api/service-requests/SERVICE01/approve", json!({})).await;

    let stats = body(app.get(&agency.admin, "/api/users/dashboard/stats").await).await;
    assert_eq!(stats["data"]["total_projects"], 1);
    assert_eq!(stats["data"]["active_projects"], 1);
    assert_eq!(stats["data"]["pending_service_requests"], 1);
    assert_eq!(stats["data"]["employees"], 3);
    assert_eq!(stats["data"]["clients"], 1);

    let stats = body(app.get(&agency.employees[0], "/api/users/dashboard/stats").await).await;
    assert_eq!(stats["data"]["total_projects"], 0);
    assert!(stats["data"].get("employees").is_none());
}

#[tokio::test]
async fn malformed_payloads_are_bad_requests_in_the_envelope() {
    let agency = seeded().await;
    let app = &agency.app;

    let missing_field = app.post(&agency.admin, "/api/projects", json!({ "name": "x" })).await;
    assert_eq!(missing_field.status(), StatusCode::BAD_REQUEST);
    let envelope = body(missing_field).await;
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["status_code"], 400);
    assert!(envelope["message"].as_str().unwrap().contains("client_id"));

    app.post(&agency.admin, "/api/projects", json!({ "name": "Site", "client_id": "USER02" })).await;
    let bad_variant = app.put(&agency.admin, "/api/projects/PROJECT01", json!({ "status": "bogus" })).await;
    assert_eq!(bad_variant.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(bad_variant).await["success"], false);

    let bad_query = app.get(&agency.admin, "/api/projects?page=-1").await;
    assert_eq!(bad_query.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(bad_query).await["success"], false);

    app.post(&agency.client, "/api/service-requests", json!({ "title": "Shop" })).await;
    let broken_approval = app
        .http
        .post(app.url("/api/service-requests/SERVICE01/approve"))
        .bearer_auth(&agency.admin)
        .header("content-type", "application/json")
        .body("{\"employee_ids\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(broken_approval.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(broken_approval).await["success"], false);

    let no_body = app
        .http
        .post(app.url("/api/service-requests/SERVICE01/approve"))
        .bearer_auth(&agency.admin)
        .send()
        .await
        .unwrap();
    assert_eq!(no_body.status(), StatusCode::CREATED);
}
