//! Web form handlers.
//!
//! Every action runs one manager operation and re-renders its section with a
//! notice; guardrail refusals and provider errors become error notices with a
//! matching status code.

use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, Path as AxumPath, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use minijinja::context;
use serde::Deserialize;

use super::error::{Notice, WebError, WebResult};
use super::state::AppState;
use crate::compute::{ALLOWED_INSTANCE_TYPES, DEFAULT_INSTANCE_NAME};
use crate::dns::RECORD_TYPE;
use crate::error::Error;
use crate::provider::{HostedZone, ObjectBody, RecordSet};
use crate::storage::{object_key, BucketAccess};

// ============================================================================
// Forms
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LaunchForm {
    pub name: String,
    pub key_name: String,
    pub instance_type: String,
}

#[derive(Debug, Deserialize)]
pub struct BucketForm {
    pub name: String,
    /// Checkbox, present when ticked
    pub public: Option<String>,
    /// "I understand the risks" checkbox
    pub confirm: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ZoneForm {
    pub domain: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordForm {
    pub zone_id: String,
    pub subdomain: String,
    pub ip: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRecordForm {
    pub zone_id: String,
    pub name: String,
    pub ttl: i64,
    /// Every value of the record set, comma separated
    pub values: String,
}

impl DeleteRecordForm {
    /// The record set exactly as it was listed.
    fn record_set(&self) -> RecordSet {
        RecordSet {
            name: self.name.clone(),
            record_type: RECORD_TYPE.to_string(),
            ttl: self.ttl,
            values: self
                .values
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DnsQuery {
    pub zone: Option<String>,
}

fn required(value: &str, message: &str) -> crate::error::Result<()> {
    if value.trim().is_empty() {
        Err(Error::InvalidInput(message.to_string()))
    } else {
        Ok(())
    }
}

// ============================================================================
// Health & Navigation
// ============================================================================

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": crate::version(),
        "uptime_secs": state.uptime_secs(),
        "owner": state.platform.governance().owner(),
        "region": state.platform.region(),
    }))
}

pub async fn index() -> Redirect {
    Redirect::to("/compute")
}

// ============================================================================
// Compute
// ============================================================================

pub async fn compute_page(State(state): State<Arc<AppState>>) -> WebResult<Response> {
    render_compute(&state, None).await
}

pub async fn launch_instance(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LaunchForm>,
) -> WebResult<Response> {
    let result = async {
        required(&form.key_name, "Enter an SSH key name!")?;
        let name = if form.name.trim().is_empty() {
            DEFAULT_INSTANCE_NAME
        } else {
            form.name.trim()
        };

        let launched = state
            .platform
            .compute
            .create(name, form.key_name.trim(), &form.instance_type)
            .await?;
        Ok::<_, Error>(format!(
            "Instance '{}' is launching ({})",
            name, launched.instance_id
        ))
    }
    .await;

    render_compute(&state, Some(Notice::from_result(result))).await
}

pub async fn start_instance(
    State(state): State<Arc<AppState>>,
    AxumPath(id): AxumPath<String>,
) -> WebResult<Response> {
    let result = state
        .platform
        .compute
        .start(&id)
        .await
        .map(|()| format!("Starting {}...", id));
    render_compute(&state, Some(Notice::from_result(result))).await
}

pub async fn stop_instance(
    State(state): State<Arc<AppState>>,
    AxumPath(id): AxumPath<String>,
) -> WebResult<Response> {
    let result = state
        .platform
        .compute
        .stop(&id)
        .await
        .map(|()| format!("Stopping {}...", id));
    render_compute(&state, Some(Notice::from_result(result))).await
}

pub async fn terminate_instance(
    State(state): State<Arc<AppState>>,
    AxumPath(id): AxumPath<String>,
) -> WebResult<Response> {
    let notice = match state.platform.compute.terminate(&id).await {
        Ok(()) => Notice::warning(format!("Instance {} is being terminated.", id)),
        Err(err) => Notice::error(&err),
    };
    render_compute(&state, Some(notice)).await
}

async fn render_compute(state: &AppState, notice: Option<Notice>) -> WebResult<Response> {
    let (instances, list_error) = match state.platform.compute.list().await {
        Ok(instances) => (instances, None),
        Err(err) => (Vec::new(), Some(err.to_string())),
    };

    let status = notice.as_ref().map_or(StatusCode::OK, |n| n.status);
    let html = state.templates.render(
        "compute.html",
        context! {
            title => "Virtual Machines (EC2)",
            section => "compute",
            owner => state.platform.governance().owner(),
            region => state.platform.region(),
            notice,
            list_error,
            instances,
            allowed_types => ALLOWED_INSTANCE_TYPES,
            default_name => DEFAULT_INSTANCE_NAME,
        },
    )?;

    Ok((status, Html(html)).into_response())
}

// ============================================================================
// Storage
// ============================================================================

pub async fn storage_page(State(state): State<Arc<AppState>>) -> WebResult<Response> {
    render_storage(&state, None).await
}

pub async fn create_bucket(
    State(state): State<Arc<AppState>>,
    Form(form): Form<BucketForm>,
) -> WebResult<Response> {
    let access = BucketAccess::from_public_flag(form.public.is_some());

    let result = async {
        required(&form.name, "Enter a name!")?;
        if access == BucketAccess::Public && form.confirm.is_none() {
            return Err(Error::InvalidInput(
                "Confirm public bucket creation.".to_string(),
            ));
        }

        let name = state.platform.storage.create_bucket(&form.name, access).await?;
        Ok::<_, Error>(format!("Bucket {} created!", name))
    }
    .await;

    render_storage(&state, Some(Notice::from_result(result))).await
}

pub async fn upload_object(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> WebResult<Response> {
    let mut bucket = String::new();
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "bucket" => {
                bucket = field
                    .text()
                    .await
                    .map_err(|e| WebError::BadRequest(e.to_string()))?;
            }
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| WebError::BadRequest(e.to_string()))?;
                file = Some((file_name, data));
            }
            _ => {}
        }
    }

    let result = async {
        required(&bucket, "Select a bucket!")?;
        let (file_name, data) = file
            .ok_or_else(|| Error::InvalidInput("Choose a file to upload!".to_string()))?;
        let key = object_key(Path::new(&file_name))
            .ok_or_else(|| Error::InvalidInput("Choose a file to upload!".to_string()))?;

        state
            .platform
            .storage
            .upload(bucket.trim(), &key, ObjectBody::Bytes(data))
            .await?;
        Ok::<_, Error>(format!("File {} uploaded!", key))
    }
    .await;

    render_storage(&state, Some(Notice::from_result(result))).await
}

async fn render_storage(state: &AppState, notice: Option<Notice>) -> WebResult<Response> {
    let (buckets, list_error) = match state.platform.storage.list_buckets().await {
        Ok(buckets) => (buckets, None),
        Err(err) => (Vec::new(), Some(err.to_string())),
    };

    let status = notice.as_ref().map_or(StatusCode::OK, |n| n.status);
    let html = state.templates.render(
        "storage.html",
        context! {
            title => "File Storage (S3)",
            section => "storage",
            owner => state.platform.governance().owner(),
            region => state.platform.region(),
            notice,
            list_error,
            buckets,
        },
    )?;

    Ok((status, Html(html)).into_response())
}

// ============================================================================
// DNS
// ============================================================================

pub async fn dns_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DnsQuery>,
) -> WebResult<Response> {
    render_dns(&state, query.zone.as_deref(), None).await
}

pub async fn create_zone(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ZoneForm>,
) -> WebResult<Response> {
    let mut created = None;
    let result = async {
        required(&form.domain, "Enter a domain!")?;
        let zone = state.platform.dns.create_zone(&form.domain).await?;
        let message = format!("Zone {} created! ID: {}", form.domain.trim(), zone.id);
        created = Some(zone.id);
        Ok::<_, Error>(message)
    }
    .await;

    render_dns(&state, created.as_deref(), Some(Notice::from_result(result))).await
}

pub async fn add_record(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RecordForm>,
) -> WebResult<Response> {
    let result = async {
        required(&form.ip, "Enter an IP address!")?;
        let name = state
            .platform
            .dns
            .add_record(&form.zone_id, &form.subdomain, &form.ip)
            .await?;
        Ok::<_, Error>(format!("Added {} -> {}", name, form.ip.trim()))
    }
    .await;

    render_dns(&state, Some(form.zone_id.as_str()), Some(Notice::from_result(result))).await
}

pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DeleteRecordForm>,
) -> WebResult<Response> {
    let result = state
        .platform
        .dns
        .delete_record_named(&form.zone_id, &form.record_set())
        .await
        .map(|name| format!("Deleted {}", name));

    render_dns(&state, Some(form.zone_id.as_str()), Some(Notice::from_result(result))).await
}

async fn render_dns(
    state: &AppState,
    selected_id: Option<&str>,
    notice: Option<Notice>,
) -> WebResult<Response> {
    let mut list_error = None;

    let zones: Vec<HostedZone> = match state.platform.dns.list_zones().await {
        Ok(zones) => zones,
        Err(err) => {
            list_error = Some(err.to_string());
            Vec::new()
        }
    };

    let selected = selected_id
        .and_then(|id| zones.iter().find(|z| z.id == id))
        .or_else(|| zones.first())
        .cloned();

    let records: Vec<RecordSet> = match &selected {
        Some(zone) => match state.platform.dns.list_records(&zone.id).await {
            Ok(records) => records,
            Err(err) => {
                list_error = Some(err.to_string());
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let status = notice.as_ref().map_or(StatusCode::OK, |n| n.status);
    let html = state.templates.render(
        "dns.html",
        context! {
            title => "DNS Management (Route53)",
            section => "dns",
            owner => state.platform.governance().owner(),
            region => state.platform.region(),
            notice,
            list_error,
            zones,
            selected,
            records,
        },
    )?;

    Ok((status, Html(html)).into_response())
}
