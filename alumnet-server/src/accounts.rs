//! Registration, login, profiles and directory browsing.

use alumnet_common::{
    AuthResponse, Education, Experience, LoginRequest, Message, Profile, RegisterRequest,
    UpdatePasswordRequest, UpdateProfileRequest, UserId, UserSummary, UserType,
};
use axum::{extract::Path, http::StatusCode, Extension, Json};
use serde_json::Value;
use tracing::info;

use crate::{
    auth::{hash_password, verify_password, AuthUser},
    connections::excluded_user_ids,
    error::{AppError, Result},
    state::State,
    users::UserData,
    utils::{new_id, non_blank, parse_payload, parse_user_id, require},
};

pub async fn register(
    Extension(state): Extension<State>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let request: RegisterRequest = parse_payload(payload)?;
    require("name", &request.name)?;
    require("email", &request.email)?;
    require("password", &request.password)?;
    if !request.email.contains('@') {
        return Err(AppError::BadRequest("Invalid user data".to_string()));
    }

    let user = UserData::new(
        UserId(new_id()),
        request.name.trim().to_string(),
        request.email,
        hash_password(&request.password)?,
        request.user_type.unwrap_or_default(),
        request.access_code.unwrap_or_default(),
    );
    state.users.create(&user)?;
    let token = state.sessions.issue(&user.id)?;
    info!("registered user {} ({:?})", user.id, user.user_type);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            user_type: Some(user.user_type),
            access_code: Some(user.access_code),
            token,
        }),
    ))
}

pub async fn login(
    Extension(state): Extension<State>,
    Json(payload): Json<Value>,
) -> Result<Json<AuthResponse>> {
    let request: LoginRequest = parse_payload(payload)?;
    let user = state
        .users
        .find_by_email(&request.email)?
        .filter(|user| verify_password(&request.password, &user.password_hash))
        .ok_or(AppError::Unauthorized("Invalid email or password"))?;

    let token = state.sessions.issue(&user.id)?;
    info!("login {}", user.id);
    Ok(Json(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        user_type: None,
        access_code: None,
        token,
    }))
}

pub async fn logout(Extension(state): Extension<State>, auth: AuthUser) -> Result<Json<Message>> {
    state.sessions.revoke(&auth.token)?;
    Ok(Json(Message::new("Logged out successfully")))
}

pub async fn get_profile(Extension(state): Extension<State>, auth: AuthUser) -> Result<Json<Profile>> {
    Ok(Json(state.users.get(&auth.id)?.profile()))
}

pub async fn update_profile(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Json(payload): Json<Value>,
) -> Result<Json<Profile>> {
    let request: UpdateProfileRequest = parse_payload(payload)?;
    if let Some(email) = non_blank(request.email.clone()) {
        if !email.contains('@') {
            return Err(AppError::BadRequest("Invalid email".to_string()));
        }
    }

    state.users.update(&auth.id, |user| {
        apply_profile_update(user, request.clone());
        Ok(())
    })?;
    Ok(Json(state.users.get(&auth.id)?.profile()))
}

pub fn apply_profile_update(user: &mut UserData, request: UpdateProfileRequest) {
    if let Some(name) = non_blank(request.name) {
        user.name = name;
    }
    if let Some(email) = non_blank(request.email) {
        user.email = email;
    }
    if let Some(contact_number) = non_blank(request.contact_number) {
        user.contact_number = Some(contact_number);
    }
    if let Some(bio) = non_blank(request.bio) {
        user.bio = Some(bio);
    }
    for (index, update) in request.education.into_iter().flatten().enumerate() {
        match user.education.get_mut(index) {
            Some(existing) => merge_education(existing, update),
            None => user.education.push(update),
        }
    }
    for (index, update) in request.experience.into_iter().flatten().enumerate() {
        match user.experience.get_mut(index) {
            Some(existing) => merge_experience(existing, update),
            None => user.experience.push(update),
        }
    }
}

fn overwrite<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn merge_education(existing: &mut Education, update: Education) {
    overwrite(&mut existing.degree, non_blank(update.degree));
    overwrite(&mut existing.university, non_blank(update.university));
    overwrite(&mut existing.institution, non_blank(update.institution));
    overwrite(&mut existing.year, update.year);
    overwrite(&mut existing.description, non_blank(update.description));
    if !update.images.is_empty() {
        existing.images = update.images;
    }
}

fn merge_experience(existing: &mut Experience, update: Experience) {
    overwrite(&mut existing.position, non_blank(update.position));
    overwrite(&mut existing.company, non_blank(update.company));
    overwrite(&mut existing.start_date, update.start_date);
    overwrite(&mut existing.end_date, update.end_date);
    overwrite(&mut existing.description, non_blank(update.description));
}

pub async fn update_password(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Json(payload): Json<Value>,
) -> Result<Json<Message>> {
    let request: UpdatePasswordRequest = parse_payload(payload)?;
    require("newPassword", &request.new_password)?;

    let user = state.users.get(&auth.id)?;
    if !verify_password(&request.current_password, &user.password_hash) {
        return Err(AppError::BadRequest("Current password is incorrect".to_string()));
    }

    let password_hash = hash_password(&request.new_password)?;
    state.users.update(&auth.id, |user| {
        user.password_hash = password_hash.clone();
        Ok(())
    })?;
    info!("password changed for {}", auth.id);
    Ok(Json(Message::new("Password updated successfully")))
}

pub async fn get_profile_by_id(
    Extension(state): Extension<State>,
    Path(id): Path<String>,
) -> Result<Json<Profile>> {
    let id = parse_user_id(&id)?;
    Ok(Json(state.users.get(&id)?.profile()))
}

fn directory(state: &State, caller: &UserId, user_type: Option<UserType>) -> Result<Vec<Profile>> {
    let excluded = excluded_user_ids(&state.users.get(caller)?);
    Ok(state
        .users
        .all()?
        .into_iter()
        .filter(|user| !excluded.contains(&user.id))
        .filter(|user| user_type.map_or(true, |t| user.user_type == t))
        .map(|user| user.profile())
        .collect())
}

pub async fn explore_connect(
    Extension(state): Extension<State>,
    auth: AuthUser,
) -> Result<Json<Vec<Profile>>> {
    Ok(Json(directory(&state, &auth.id, None)?))
}

pub async fn alumni_connect(
    Extension(state): Extension<State>,
    auth: AuthUser,
) -> Result<Json<Vec<Profile>>> {
    Ok(Json(directory(&state, &auth.id, Some(UserType::Alumni))?))
}

pub async fn students_connect(
    Extension(state): Extension<State>,
    auth: AuthUser,
) -> Result<Json<Vec<Profile>>> {
    Ok(Json(directory(&state, &auth.id, Some(UserType::Student))?))
}

pub async fn connections_list(
    Extension(state): Extension<State>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserSummary>>> {
    let user = state.users.get(&parse_user_id(&user_id)?)?;
    let mut summaries = Vec::with_capacity(user.connections.len());
    for id in &user.connections {
        if let Some(peer) = state.users.find_by_id(id)? {
            summaries.push(peer.summary());
        }
    }
    Ok(Json(summaries))
}
