//! Async client for the alumnet HTTP API.
//!
//! Every call returns `anyhow::Result`. A non-2xx answer from the server is
//! surfaced as an [`ApiError`] inside the `anyhow::Error`; see [`api_error`].

use alumnet_common::{ApiError, AuthResponse, UserId};
use anyhow::{anyhow, Result};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// A logged-in user against one server.
#[derive(Clone, Debug)]
pub struct Session {
    pub base: String,
    pub user: UserId,
    pub token: String,
}

impl Session {
    pub fn new(base: impl Into<String>, auth: &AuthResponse) -> Self {
        Self {
            base: base.into(),
            user: auth.id.clone(),
            token: auth.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        self.base.clone() + path
    }
}

/// The structured error the server answered with, if that is what failed.
pub fn api_error(err: &anyhow::Error) -> Option<&ApiError> {
    err.downcast_ref::<ApiError>()
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    decode(request.send().await?).await
}

async fn send_authed<T: DeserializeOwned>(request: RequestBuilder, session: &Session) -> Result<T> {
    send(request.bearer_auth(&session.token)).await
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let body = response.text().await?;
    match serde_json::from_str::<ApiError>(&body) {
        Ok(err) => Err(err.into()),
        Err(_) => Err(anyhow!("{status}: {body}")),
    }
}

pub mod client {
    use alumnet_common::{
        resources::{
            CreateEvent, CreateJob, CreateLocation, CreatePost, Event, EventCategory,
            EventRegistration, FeedPost, IsRegistered, Job, Location, Post, PostId,
        },
        AuthResponse, ConnectionsOverview, LoginRequest, Message, Profile, RegisterRequest,
        UpdatePasswordRequest, UpdateProfileRequest, UserId, UserSummary,
    };
    use anyhow::Result;
    use reqwest::Client;

    use crate::{send, send_authed, Session};

    pub async fn register(client: &Client, base: &str, request: &RegisterRequest) -> Result<AuthResponse> {
        send(client.post(format!("{base}/api/users")).json(request)).await
    }
    pub async fn login(client: &Client, base: &str, request: &LoginRequest) -> Result<AuthResponse> {
        send(client.post(format!("{base}/api/users/login")).json(request)).await
    }
    pub async fn logout(client: &Client, session: &Session) -> Result<Message> {
        send_authed(client.post(session.url("/api/users/logout")), session).await
    }
    pub async fn get_profile(client: &Client, session: &Session) -> Result<Profile> {
        send_authed(client.get(session.url("/api/users/profile")), session).await
    }
    pub async fn update_profile(client: &Client, session: &Session, update: &UpdateProfileRequest) -> Result<Profile> {
        send_authed(client.put(session.url("/api/users/profile")).json(update), session).await
    }
    pub async fn update_password(client: &Client, session: &Session, update: &UpdatePasswordRequest) -> Result<Message> {
        send_authed(client.put(session.url("/api/users/profile/password")).json(update), session).await
    }
    pub async fn get_profile_by_id(client: &Client, base: &str, id: &str) -> Result<Profile> {
        send(client.get(format!("{base}/api/users/profile/{id}"))).await
    }
    pub async fn explore_connect(client: &Client, session: &Session) -> Result<Vec<Profile>> {
        send_authed(client.get(session.url("/api/users/explore-connect")), session).await
    }
    pub async fn alumni_connect(client: &Client, session: &Session) -> Result<Vec<Profile>> {
        send_authed(client.get(session.url("/api/users/alumni-connect")), session).await
    }
    pub async fn students_connect(client: &Client, session: &Session) -> Result<Vec<Profile>> {
        send_authed(client.get(session.url("/api/users/students-connect")), session).await
    }

    async fn connect(client: &Client, session: &Session, action: &str, target: &str) -> Result<Message> {
        let url = session.url(&format!("/api/users/connect/{action}/{target}"));
        send_authed(client.put(url), session).await
    }
    pub async fn send_connection_request(client: &Client, session: &Session, target: &UserId) -> Result<Message> {
        connect(client, session, "request", &target.0).await
    }
    pub async fn accept_connection_request(client: &Client, session: &Session, target: &UserId) -> Result<Message> {
        connect(client, session, "accept", &target.0).await
    }
    pub async fn cancel_connection_request(client: &Client, session: &Session, target: &UserId) -> Result<Message> {
        connect(client, session, "cancel", &target.0).await
    }
    pub async fn decline_connection_request(client: &Client, session: &Session, target: &UserId) -> Result<Message> {
        connect(client, session, "decline", &target.0).await
    }
    /// Sends `action` against a raw path segment, for ids that are not valid user ids.
    pub async fn connect_raw(client: &Client, session: &Session, action: &str, target: &str) -> Result<Message> {
        connect(client, session, action, target).await
    }
    pub async fn get_connections(client: &Client, session: &Session) -> Result<ConnectionsOverview> {
        send_authed(client.get(session.url("/api/users/connections")), session).await
    }
    pub async fn get_connections_list(client: &Client, session: &Session, user: &UserId) -> Result<Vec<UserSummary>> {
        let url = session.url(&format!("/api/users/connections-list/{}", user.0));
        send_authed(client.get(url), session).await
    }
    pub async fn registered_events(client: &Client, session: &Session) -> Result<Vec<Event>> {
        send_authed(client.get(session.url("/api/users/registered-events")), session).await
    }

    pub async fn create_post(client: &Client, session: &Session, post: &CreatePost) -> Result<Post> {
        send_authed(client.post(session.url("/api/posts")).json(post), session).await
    }
    pub async fn list_posts(client: &Client, base: &str) -> Result<Vec<FeedPost>> {
        send(client.get(format!("{base}/api/posts"))).await
    }
    pub async fn delete_post(client: &Client, session: &Session, id: &PostId) -> Result<Message> {
        let url = session.url(&format!("/api/posts/delete/{}", id.0));
        send_authed(client.delete(url), session).await
    }

    pub async fn add_job(client: &Client, session: &Session, job: &CreateJob) -> Result<Job> {
        send_authed(client.post(session.url("/api/jobs/addjob")).json(job), session).await
    }
    pub async fn list_jobs(client: &Client, base: &str) -> Result<Vec<Job>> {
        send(client.get(format!("{base}/api/jobs"))).await
    }

    pub async fn create_event(client: &Client, session: &Session, event: &CreateEvent) -> Result<Event> {
        send_authed(client.post(session.url("/api/events")).json(event), session).await
    }
    pub async fn list_events(client: &Client, base: &str, category: Option<EventCategory>) -> Result<Vec<Event>> {
        let mut request = client.get(format!("{base}/api/events"));
        if let Some(category) = category {
            let name = serde_json::to_value(category)?;
            request = request.query(&[("category", name.as_str().unwrap_or_default())]);
        }
        send(request).await
    }
    pub async fn register_event(client: &Client, session: &Session, event: &Event) -> Result<EventRegistration> {
        let url = session.url(&format!("/api/events/{}/register", event.id.0));
        send_authed(client.put(url), session).await
    }
    pub async fn unregister_event(client: &Client, session: &Session, event: &Event) -> Result<EventRegistration> {
        let url = session.url(&format!("/api/events/{}/unregister", event.id.0));
        send_authed(client.put(url), session).await
    }
    pub async fn is_registered(client: &Client, session: &Session, event: &Event) -> Result<bool> {
        let url = session.url(&format!("/api/events/{}/is-registered", event.id.0));
        let answer: IsRegistered = send_authed(client.get(url), session).await?;
        Ok(answer.is_registered)
    }

    pub async fn list_locations(client: &Client, base: &str) -> Result<Vec<Location>> {
        send(client.get(format!("{base}/api/locations"))).await
    }
    pub async fn add_location(client: &Client, base: &str, location: &CreateLocation) -> Result<Location> {
        send(client.post(format!("{base}/api/locations")).json(location)).await
    }
}
