#![allow(dead_code)]

use std::net::SocketAddr;

use alumnet_client::{client, Session};
use alumnet_common::{RegisterRequest, UserType};
use alumnet_server::{app, State};
use anyhow::Result;
use reqwest::Client;

/// Boots a server on an ephemeral port over a temporary database.
pub async fn spawn_server() -> Result<String> {
    let state = State::temporary()?;
    let server = axum::Server::try_bind(&SocketAddr::from(([127, 0, 0, 1], 0)))?
        .serve(app(state).into_make_service());
    let addr = server.local_addr();
    tokio::spawn(server);
    Ok(format!("http://{addr}"))
}

pub async fn register(client: &Client, base: &str, name: &str, user_type: UserType) -> Result<Session> {
    let auth = client::register(
        client,
        base,
        &RegisterRequest {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password: format!("{name}-password"),
            user_type: Some(user_type),
            access_code: None,
        },
    )
    .await?;
    Ok(Session::new(base, &auth))
}
