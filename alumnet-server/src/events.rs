use alumnet_common::{
    resources::{CreateEvent, Event, EventCategory, EventId, EventRegistration, IsRegistered},
    UserId,
};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use sled::{transaction::abort, Transactional};
use tracing::info;

use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    state::State,
    store::{tx_get, tx_put},
    users::UserData,
    utils::{new_id, parse_id, parse_payload, require},
};

#[derive(Deserialize)]
pub struct EventFilter {
    category: Option<String>,
}

pub async fn create_event(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Event>)> {
    let request: CreateEvent = parse_payload(payload)?;
    for (field, value) in [
        ("title", &request.title),
        ("date", &request.date),
        ("time", &request.time),
        ("location", &request.location),
        ("description", &request.description),
    ] {
        require(field, value)?;
    }

    let now = Utc::now();
    let event = Event {
        id: EventId(new_id()),
        title: request.title,
        date: request.date,
        time: request.time,
        location: request.location,
        description: request.description,
        image_url: request.image_url,
        category: request.category,
        posted_by: auth.id,
        registered_users: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    state.events.insert(&event)?;
    info!("event {} posted by {}", event.id.0, event.posted_by);
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list_events(
    Extension(state): Extension<State>,
    Query(filter): Query<EventFilter>,
) -> Result<Json<Vec<Event>>> {
    let category = filter
        .category
        .map(|c| parse_payload::<EventCategory>(Value::String(c)))
        .transpose()?;

    let mut events: Vec<Event> = state
        .events
        .all()?
        .into_iter()
        .filter(|event| category.map_or(true, |c| event.category == c))
        .collect();
    events.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(events))
}

/// Adds or removes `user` on the event and the event on the user, in one
/// transaction over both trees.
fn set_registration(state: &State, user: &UserId, event_id: &EventId, register: bool) -> Result<Event> {
    let event = (state.users.tree(), state.events.tree()).transaction(|(users, events)| {
        let Some(mut event) = tx_get::<Event>(events, &event_id.0)? else {
            return abort(AppError::NotFound("Event not found"));
        };
        let Some(mut attendee) = tx_get::<UserData>(users, user.as_ref())? else {
            return abort(AppError::NotFound("User not found"));
        };

        if register {
            if event.registered_users.contains(user) {
                return abort(AppError::Conflict("Already registered".to_string()));
            }
            event.registered_users.push(user.clone());
            attendee.registered_events.insert(event.id.clone());
        } else {
            event.registered_users.retain(|id| id != user);
            attendee.registered_events.remove(&event.id);
        }

        event.updated_at = Utc::now();
        attendee.touch();
        tx_put(events, &event_id.0, &event)?;
        tx_put(users, user.as_ref(), &attendee)?;
        Ok(event)
    })?;
    Ok(event)
}

pub async fn register_event(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<Json<EventRegistration>> {
    let event_id = EventId(parse_id(&event_id, "event")?);
    let event = set_registration(&state, &auth.id, &event_id, true)?;
    info!("{} registered for event {}", auth.id, event_id.0);
    Ok(Json(EventRegistration {
        message: "Registered successfully".to_string(),
        event,
    }))
}

pub async fn unregister_event(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<Json<EventRegistration>> {
    let event_id = EventId(parse_id(&event_id, "event")?);
    let event = set_registration(&state, &auth.id, &event_id, false)?;
    info!("{} unregistered from event {}", auth.id, event_id.0);
    Ok(Json(EventRegistration {
        message: "Unregistered successfully".to_string(),
        event,
    }))
}

pub async fn is_registered(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<Json<IsRegistered>> {
    let event_id = parse_id(&event_id, "event")?;
    let event = state
        .events
        .get(&event_id)?
        .ok_or(AppError::NotFound("Event not found"))?;
    Ok(Json(IsRegistered {
        is_registered: event.registered_users.contains(&auth.id),
    }))
}

pub async fn registered_events(
    Extension(state): Extension<State>,
    auth: AuthUser,
) -> Result<Json<Vec<Event>>> {
    let user = state.users.get(&auth.id)?;
    let mut events = Vec::with_capacity(user.registered_events.len());
    for id in &user.registered_events {
        if let Some(event) = state.events.get(&id.0)? {
            events.push(event);
        }
    }
    Ok(Json(events))
}
