//! Project handler round trips against a mock server.

mod common;

use common::{TEST_JWT, ok_body, signed_client};
use elestio_client::{CreateProjectRequest, Error, UpdateProjectRequest};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn project_list_body() -> serde_json::Value {
    json!({
        "status": "OK",
        "data": {
            "projects": [
                {
                    "id": 1851,
                    "project_name": "prod",
                    "description": "production",
                    "technical_emails": "ops@example.com",
                    "networkCIDR": "10.0.0.0/16",
                    "creation_date": "2023-01-15"
                },
                {
                    "id": "2003",
                    "project_name": "staging",
                    "description": "",
                    "technical_emails": "",
                    "networkCIDR": "",
                    "creation_date": "2023-02-01"
                }
            ]
        }
    })
}

#[tokio::test]
async fn list_normalizes_numeric_and_string_ids() {
    let server = MockServer::start().await;
    let client = signed_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/projects/getList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_list_body()))
        .mount(&server)
        .await;

    let projects = client.project().list().await.expect("list should succeed");
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].id.as_str(), "1851");
    assert_eq!(projects[1].id.as_str(), "2003");
}

#[tokio::test]
async fn get_finds_project_by_id() {
    let server = MockServer::start().await;
    let client = signed_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/projects/getList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_list_body()))
        .mount(&server)
        .await;

    let project = client.project().get("2003").await.expect("should be found");
    assert_eq!(project.name, "staging");
}

#[tokio::test]
async fn get_unknown_id_is_not_found_not_empty_success() {
    let server = MockServer::start().await;
    let client = signed_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/projects/getList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_list_body()))
        .mount(&server)
        .await;

    let result = client.project().get("9999").await;
    assert!(
        matches!(
            &result,
            Err(Error::NotFound { resource, id })
                if resource == "project" && id.as_deref() == Some("9999")
        ),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn create_reflects_submitted_fields() {
    let server = MockServer::start().await;
    let client = signed_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/projects/addProject"))
        .and(body_partial_json(json!({
            "name": "test-project",
            "description": "test project",
            "technicalEmails": "dev@example.com",
            "jwt": TEST_JWT,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "data": {
                "id": 2003,
                "project_name": "test-project",
                "description": "test project",
                "technical_emails": "dev@example.com",
                "networkCIDR": "10.0.0.0/16",
                "creation_date": "2024-06-01"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let project = client
        .project()
        .create(&CreateProjectRequest {
            name: "test-project".to_string(),
            description: "test project".to_string(),
            technical_email: "dev@example.com".to_string(),
        })
        .await
        .expect("create should succeed");

    assert_eq!(project.id.as_str(), "2003");
    assert_eq!(project.name, "test-project");
    assert_eq!(project.technical_email, "dev@example.com");

    server.verify().await;
}

#[tokio::test]
async fn update_goes_through_put() {
    let server = MockServer::start().await;
    let client = signed_client(&server).await;

    Mock::given(method("PUT"))
        .and(path("/api/projects/editProject"))
        .and(body_partial_json(json!({
            "projectId": "2003",
            "name": "test-project-updated",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "data": {
                "id": "2003",
                "project_name": "test-project-updated",
                "description": "updated",
                "technical_emails": "dev@example.com",
                "networkCIDR": "",
                "creation_date": "2024-06-01"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let project = client
        .project()
        .update(
            "2003",
            &UpdateProjectRequest {
                name: "test-project-updated".to_string(),
                description: "updated".to_string(),
                technical_email: "dev@example.com".to_string(),
            },
        )
        .await
        .expect("update should succeed");

    assert_eq!(project.name, "test-project-updated");

    server.verify().await;
}

#[tokio::test]
async fn delete_goes_through_delete_with_body() {
    let server = MockServer::start().await;
    let client = signed_client(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/api/projects/deleteProject"))
        .and(body_partial_json(json!({
            "projectId": "2003",
            "jwt": TEST_JWT,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    client
        .project()
        .delete("2003")
        .await
        .expect("delete should succeed");

    server.verify().await;
}
