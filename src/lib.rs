//! # elestio-client
//!
//! A typed Rust client for the [Elestio](https://elest.io) REST API,
//! covering projects, services (VMs and managed apps) and load balancers.
//!
//! ## TLS Backend
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS
//!   implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation and musl
//!   targets.
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! elestio-client = "0.1"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use elestio_client::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Sign in once; the session token lives as long as the client.
//!     let client = Client::new("you@example.com", "your-api-key").await?;
//!
//!     // 2. List projects
//!     for project in client.project().list().await? {
//!         println!("{} ({})", project.name, project.id);
//!     }
//!
//!     // 3. Fetch a service with its ancillary data resolved
//!     let service = client.service().get("1234", "42438730").await?;
//!     println!("{} -> {}", service.server_name, service.cname);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Error). The API reports
//! failures at two levels and both surface as distinct variants:
//!
//! - [`Error::RequestFailed`] — the HTTP status was outside `200..300`
//! - [`Error::Api`] — a 2xx response whose body carried `status: "KO"`
//! - [`Error::NotFound`] — a single-entity lookup matched nothing
//! - [`Error::Transport`] — network-level failure (never retried)
//!
//! GET requests answering 408 or 5xx are transparently retried up to two
//! extra times; mutating requests never are.

mod auth;
mod client;
mod error;
mod handlers;
mod http;
mod types;
mod utils;

pub use client::{BASE_URL, Client};
pub use error::{Error, Result};
pub use types::{FlexString, NumberAsBool};

pub use handlers::project::{CreateProjectRequest, Project, ProjectHandler, UpdateProjectRequest};

pub use handlers::service::{
    CreateServiceRequest, SERVICE_DEPLOYMENT_STATUS_DEPLOYED,
    SERVICE_DEPLOYMENT_STATUS_IN_PROGRESS, SERVICE_FIREWALL_RULE_PROTOCOL_TCP,
    SERVICE_FIREWALL_RULE_PROTOCOL_UDP, SERVICE_FIREWALL_RULE_TYPE_INPUT,
    SERVICE_FIREWALL_RULE_TYPE_OUTPUT, SERVICE_STATUS_DELETING, SERVICE_STATUS_MIGRATING,
    SERVICE_STATUS_RUNNING, SERVICE_STATUS_STOPPED, Service, ServiceAdmin, ServiceDatabaseAdmin,
    ServiceFirewallRule, ServiceHandler, ServiceSshPublicKey, Template, ValidateConfigRequest,
};

pub use handlers::load_balancer::{
    CreateLoadBalancerRequest, CreateLoadBalancerRequestConfig,
    LOAD_BALANCER_DEPLOYMENT_STATUS_DEPLOYED, LOAD_BALANCER_DEPLOYMENT_STATUS_IN_PROGRESS,
    LoadBalancer, LoadBalancerConfig, LoadBalancerConfigForwardRule,
    LoadBalancerConfigOutputHeader, LoadBalancerHandler, UpdateLoadBalancerConfigRequest,
};
