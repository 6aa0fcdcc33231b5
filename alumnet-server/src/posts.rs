use std::cmp::Reverse;

use alumnet_common::{
    resources::{CreatePost, FeedPost, Post, PostId},
    Message,
};
use axum::{extract::Path, http::StatusCode, Extension, Json};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    state::State,
    utils::{new_id, parse_id, parse_payload, require},
};

pub async fn create_post(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Post>)> {
    let request: CreatePost = parse_payload(payload)?;
    require("content", &request.content)?;
    let author = state.users.get(&auth.id)?;

    let now = Utc::now();
    let post = Post {
        id: PostId(new_id()),
        author: author.id,
        content: request.content,
        media: request.media,
        post_type: request.post_type,
        title: request.title,
        link: request.link,
        size: request.size,
        created_at: now,
        updated_at: now,
    };
    state.posts.insert(&post)?;
    info!("post {} created by {}", post.id.0, post.author);
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list_posts(Extension(state): Extension<State>) -> Result<Json<Vec<FeedPost>>> {
    let mut posts = state.posts.all()?;
    posts.sort_by_key(|post| Reverse(post.created_at));

    let mut feed = Vec::with_capacity(posts.len());
    for post in posts {
        let author_profile = state.users.find_by_id(&post.author)?.map(|u| u.summary());
        feed.push(FeedPost { post, author_profile });
    }
    Ok(Json(feed))
}

pub async fn delete_post(
    Extension(state): Extension<State>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    let id = parse_id(&id, "post")?;
    let post = state.posts.get(&id)?.ok_or(AppError::NotFound("Post not found"))?;
    if post.author != auth.id {
        return Err(AppError::Unauthorized("User not authorized"));
    }

    state.posts.remove(&id)?;
    info!("post {id} deleted by {}", auth.id);
    Ok(Json(Message::new("Post deleted")))
}
