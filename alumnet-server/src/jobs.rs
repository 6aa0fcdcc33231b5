use alumnet_common::resources::{CreateJob, Job, JobId};
use axum::{http::StatusCode, Extension, Json};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::{
    auth::AuthUser,
    error::Result,
    state::State,
    utils::{new_id, parse_payload, require},
};

pub async fn add_job(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Job>)> {
    let request: CreateJob = parse_payload(payload)?;
    require("title", &request.title)?;
    require("description", &request.description)?;
    require("company", &request.company)?;
    require("location", &request.location)?;

    let now = Utc::now();
    let job = Job {
        id: JobId(new_id()),
        user: auth.id,
        title: request.title,
        description: request.description,
        company: request.company,
        location: request.location,
        created_at: now,
        updated_at: now,
    };
    state.jobs.insert(&job)?;
    info!("job {} posted by {}", job.id.0, job.user);
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn list_jobs(Extension(state): Extension<State>) -> Result<Json<Vec<Job>>> {
    let mut jobs = state.jobs.all()?;
    jobs.sort_by_key(|job| job.created_at);
    Ok(Json(jobs))
}
