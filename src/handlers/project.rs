//! Project endpoints.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::http::parse_json;
use crate::types::FlexString;

/// Client handler for project endpoints.
pub struct ProjectHandler<'a> {
    pub(crate) client: &'a Client,
}

/// A project, the top-level grouping for services and load balancers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: FlexString,
    #[serde(rename = "project_name", default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "technical_emails", default)]
    pub technical_email: String,
    #[serde(rename = "networkCIDR", default)]
    pub network_cidr: String,
    #[serde(rename = "creation_date", default)]
    pub creation_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    #[serde(rename = "technicalEmails")]
    pub technical_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProjectRequest {
    pub name: String,
    pub description: String,
    #[serde(rename = "technicalEmails")]
    pub technical_email: String,
}

impl ProjectHandler<'_> {
    /// Get a single project by id.
    ///
    /// The upstream API has no per-project endpoint; the list is fetched
    /// and filtered. An id with no match is [`Error::NotFound`], never an
    /// empty success.
    pub async fn get(&self, project_id: &str) -> Result<Project> {
        let projects = self.list().await?;

        projects
            .into_iter()
            .find(|p| p.id.as_str() == project_id)
            .ok_or_else(|| Error::NotFound {
                resource: "project".to_string(),
                id: Some(project_id.to_string()),
            })
    }

    /// List all projects of the account. An empty list is a valid result.
    pub async fn list(&self) -> Result<Vec<Project>> {
        #[derive(Serialize)]
        struct ListRequest<'a> {
            jwt: &'a str,
        }

        #[derive(Default, Deserialize)]
        struct ListData {
            #[serde(default)]
            projects: Vec<Project>,
        }

        #[derive(Deserialize)]
        struct ListResponse {
            #[serde(default)]
            data: ListData,
        }

        let url = format!("{}/api/projects/getList", self.client.base_url);
        let text = self
            .client
            .send_post(
                &url,
                &ListRequest {
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        let res: ListResponse = parse_json(&text)?;
        Ok(res.data.projects)
    }

    /// Create a new project.
    pub async fn create(&self, req: &CreateProjectRequest) -> Result<Project> {
        #[derive(Serialize)]
        struct FullRequest<'a> {
            #[serde(flatten)]
            req: &'a CreateProjectRequest,
            jwt: &'a str,
        }

        #[derive(Deserialize)]
        struct CreateResponse {
            data: Project,
        }

        let url = format!("{}/api/projects/addProject", self.client.base_url);
        let text = self
            .client
            .send_post(
                &url,
                &FullRequest {
                    req,
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        let res: CreateResponse = parse_json(&text)?;
        Ok(res.data)
    }

    /// Update an existing project.
    pub async fn update(&self, project_id: &str, req: &UpdateProjectRequest) -> Result<Project> {
        #[derive(Serialize)]
        struct FullRequest<'a> {
            #[serde(flatten)]
            req: &'a UpdateProjectRequest,
            #[serde(rename = "projectId")]
            project_id: &'a str,
            jwt: &'a str,
        }

        #[derive(Deserialize)]
        struct UpdateResponse {
            data: Project,
        }

        let url = format!("{}/api/projects/editProject", self.client.base_url);
        let text = self
            .client
            .send_put(
                &url,
                &FullRequest {
                    req,
                    project_id,
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        let res: UpdateResponse = parse_json(&text)?;
        Ok(res.data)
    }

    /// Delete a project.
    pub async fn delete(&self, project_id: &str) -> Result<()> {
        #[derive(Serialize)]
        struct DeleteRequest<'a> {
            #[serde(rename = "projectId")]
            project_id: &'a str,
            jwt: &'a str,
        }

        let url = format!("{}/api/projects/deleteProject", self.client.base_url);
        self.client
            .send_delete(
                &url,
                &DeleteRequest {
                    project_id,
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        Ok(())
    }
}
