//! Mutual connection requests between two users.
//!
//! Every operation is a transition on the relation lists of exactly two user
//! records, computed by [`apply`] and committed through
//! [`Users::update_pair`](crate::users::Users::update_pair), so both records
//! change together or not at all. The following hold after each commit:
//!
//! - `B ∈ A.connection_requests_sent ⇔ A ∈ B.connection_requests`
//! - `B ∈ A.connections ⇔ A ∈ B.connections`
//! - a pair is either unrelated, pending in one direction, or connected
//! - nobody relates to themselves

use std::{collections::BTreeSet, fmt};

use alumnet_common::{ConnectionsOverview, Message, UserId};
use axum::{extract::Path, Extension, Json};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    state::State,
    users::UserData,
    utils::parse_user_id,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectAction {
    Send,
    Cancel,
    Accept,
    Decline,
}

impl ConnectAction {
    fn success_message(self) -> &'static str {
        match self {
            ConnectAction::Send => "Connection request sent successfully",
            ConnectAction::Cancel => "Connection request canceled successfully",
            ConnectAction::Accept => "Connection request accepted successfully",
            ConnectAction::Decline => "Connection request declined successfully",
        }
    }
}

impl fmt::Display for ConnectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectAction::Send => "send",
            ConnectAction::Cancel => "cancel",
            ConnectAction::Accept => "accept",
            ConnectAction::Decline => "decline",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Cannot connect to yourself")]
    SelfTarget,

    #[error("Connection request already sent")]
    AlreadySent,

    #[error("Already connected")]
    AlreadyConnected,

    #[error("This user has already sent you a connection request")]
    CrossedRequest,

    #[error("No connection request found")]
    NoRequest,
}

impl From<ConnectError> for AppError {
    fn from(err: ConnectError) -> Self {
        match err {
            ConnectError::SelfTarget | ConnectError::NoRequest => {
                AppError::InvalidState(err.to_string())
            }
            ConnectError::AlreadySent
            | ConnectError::AlreadyConnected
            | ConnectError::CrossedRequest => AppError::Conflict(err.to_string()),
        }
    }
}

/// Computes `action` by `actor` against `target`. On error neither record
/// has been modified.
pub fn apply(
    action: ConnectAction,
    actor: &mut UserData,
    target: &mut UserData,
) -> std::result::Result<(), ConnectError> {
    if actor.id == target.id {
        return Err(ConnectError::SelfTarget);
    }

    match action {
        ConnectAction::Send => {
            if connected(actor, target) {
                return Err(ConnectError::AlreadyConnected);
            }
            if pending(actor, target) {
                return Err(ConnectError::AlreadySent);
            }
            if pending(target, actor) {
                return Err(ConnectError::CrossedRequest);
            }
            actor.connection_requests_sent.insert(target.id.clone());
            target.connection_requests.insert(actor.id.clone());
        }
        ConnectAction::Cancel => {
            if !actor.connection_requests_sent.contains(&target.id) {
                return Err(ConnectError::NoRequest);
            }
            clear_pending(actor, target);
        }
        ConnectAction::Accept => {
            if !actor.connection_requests.contains(&target.id) {
                return Err(if connected(actor, target) {
                    ConnectError::AlreadyConnected
                } else {
                    ConnectError::NoRequest
                });
            }
            clear_pending(target, actor);
            clear_pending(actor, target);
            actor.connections.insert(target.id.clone());
            target.connections.insert(actor.id.clone());
        }
        ConnectAction::Decline => {
            if !actor.connection_requests.contains(&target.id) {
                return Err(ConnectError::NoRequest);
            }
            clear_pending(target, actor);
        }
    }

    actor.touch();
    target.touch();
    Ok(())
}

fn connected(a: &UserData, b: &UserData) -> bool {
    a.connections.contains(&b.id) || b.connections.contains(&a.id)
}

/// A request from `from` to `to`, seen from either side.
fn pending(from: &UserData, to: &UserData) -> bool {
    from.connection_requests_sent.contains(&to.id) || to.connection_requests.contains(&from.id)
}

// Removes both halves, repairing a record whose mirror entry had gone missing.
fn clear_pending(from: &mut UserData, to: &mut UserData) {
    from.connection_requests_sent.remove(&to.id);
    to.connection_requests.remove(&from.id);
}

/// Users hidden from directory browsing: everyone already related, and self.
pub fn excluded_user_ids(user: &UserData) -> BTreeSet<UserId> {
    user.connections
        .iter()
        .chain(&user.connection_requests)
        .chain(&user.connection_requests_sent)
        .chain(std::iter::once(&user.id))
        .cloned()
        .collect()
}

pub fn connect(state: &State, action: ConnectAction, actor: &UserId, target: &UserId) -> Result<Message> {
    if actor == target {
        return Err(ConnectError::SelfTarget.into());
    }
    match state
        .users
        .update_pair(actor, target, |a, t| Ok(apply(action, a, t)?))
    {
        Ok(()) => {
            info!("connect {action}: {actor} -> {target}");
            Ok(Message::new(action.success_message()))
        }
        Err(err) => {
            warn!("connect {action}: {actor} -> {target} rejected: {err}");
            Err(err)
        }
    }
}

pub async fn send_request(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    let target = parse_user_id(&id)?;
    Ok(Json(connect(&state, ConnectAction::Send, &auth.id, &target)?))
}

pub async fn accept_request(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    let target = parse_user_id(&id)?;
    Ok(Json(connect(&state, ConnectAction::Accept, &auth.id, &target)?))
}

pub async fn cancel_request(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    let target = parse_user_id(&id)?;
    Ok(Json(connect(&state, ConnectAction::Cancel, &auth.id, &target)?))
}

pub async fn decline_request(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    let target = parse_user_id(&id)?;
    Ok(Json(connect(&state, ConnectAction::Decline, &auth.id, &target)?))
}

pub async fn list_connections(
    Extension(state): Extension<State>,
    auth: AuthUser,
) -> Result<Json<ConnectionsOverview>> {
    let user = state.users.get(&auth.id)?;
    let profiles = |ids: &BTreeSet<UserId>| -> Result<Vec<_>> {
        let mut profiles = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(peer) = state.users.find_by_id(id)? {
                profiles.push(peer.profile());
            }
        }
        Ok(profiles)
    };

    Ok(Json(ConnectionsOverview {
        connections: profiles(&user.connections)?,
        connection_requests_received: profiles(&user.connection_requests)?,
        connection_requests_sent: profiles(&user.connection_requests_sent)?,
    }))
}
