mod common;

use alumnet_client::{api_error, client, Session};
use alumnet_common::{
    Education, ErrorKind, LoginRequest, RegisterRequest, UpdatePasswordRequest,
    UpdateProfileRequest, UserType,
};
use anyhow::Result;
use reqwest::Client;

use common::{register, spawn_server};

fn kind<T>(result: Result<T>) -> Option<ErrorKind> {
    result.err().and_then(|err| api_error(&err).map(|e| e.kind))
}

#[tokio::test]
async fn register_login_logout() -> Result<()> {
    let client = Client::new();
    let base = spawn_server().await?;

    let auth = client::register(
        &client,
        &base,
        &RegisterRequest {
            name: "Ada".to_string(),
            email: "Ada@Example.com".to_string(),
            password: "analytical".to_string(),
            user_type: Some(UserType::Alumni),
            access_code: Some("1843".to_string()),
        },
    )
    .await?;
    assert_eq!(auth.email, "ada@example.com");
    assert_eq!(auth.user_type, Some(UserType::Alumni));
    assert_eq!(auth.access_code.as_deref(), Some("1843"));

    let duplicate = client::register(
        &client,
        &base,
        &RegisterRequest {
            name: "Imposter".to_string(),
            email: "ada@example.com".to_string(),
            password: "x".to_string(),
            user_type: None,
            access_code: None,
        },
    )
    .await;
    assert_eq!(kind(duplicate), Some(ErrorKind::Conflict));

    let wrong = client::login(
        &client,
        &base,
        &LoginRequest {
            email: "ada@example.com".to_string(),
            password: "difference".to_string(),
        },
    )
    .await;
    assert_eq!(kind(wrong), Some(ErrorKind::Unauthorized));

    let login = client::login(
        &client,
        &base,
        &LoginRequest {
            email: "ADA@example.com".to_string(),
            password: "analytical".to_string(),
        },
    )
    .await?;
    assert_eq!(login.id, auth.id);
    assert_ne!(login.token, auth.token);

    let session = Session::new(&base, &login);
    assert_eq!(client::get_profile(&client, &session).await?.name, "Ada");
    client::logout(&client, &session).await?;
    assert_eq!(kind(client::get_profile(&client, &session).await), Some(ErrorKind::Unauthorized));

    // The registration token is a separate session and still valid.
    let first = Session::new(&base, &auth);
    assert_eq!(client::get_profile(&client, &first).await?.id, auth.id);
    Ok(())
}

#[tokio::test]
async fn registration_requires_fields() -> Result<()> {
    let client = Client::new();
    let base = spawn_server().await?;

    let response = client
        .post(format!("{base}/api/users"))
        .json(&serde_json::json!({ "name": "NoEmail", "password": "pw" }))
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let blank = client::register(
        &client,
        &base,
        &RegisterRequest {
            name: " ".to_string(),
            email: "blank@example.com".to_string(),
            password: "pw".to_string(),
            user_type: None,
            access_code: None,
        },
    )
    .await;
    assert_eq!(kind(blank), Some(ErrorKind::BadRequest));
    Ok(())
}

#[tokio::test]
async fn profile_update_and_public_lookup() -> Result<()> {
    let client = Client::new();
    let base = spawn_server().await?;
    let ada = register(&client, &base, "Ada", UserType::Alumni).await?;
    register(&client, &base, "Grace", UserType::Student).await?;

    let updated = client::update_profile(
        &client,
        &ada,
        &UpdateProfileRequest {
            bio: Some("First programmer".to_string()),
            email: Some("countess@example.com".to_string()),
            education: Some(vec![Education {
                degree: Some("Mathematics".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(updated.bio.as_deref(), Some("First programmer"));
    assert_eq!(updated.email, "countess@example.com");
    assert_eq!(updated.education.len(), 1);
    assert_eq!(updated.name, "Ada");

    let taken = client::update_profile(
        &client,
        &ada,
        &UpdateProfileRequest {
            email: Some("grace@example.com".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(kind(taken), Some(ErrorKind::Conflict));

    let public = client::get_profile_by_id(&client, &base, &ada.user.0).await?;
    assert_eq!(public.bio.as_deref(), Some("First programmer"));
    assert_eq!(
        kind(client::get_profile_by_id(&client, &base, "nope").await),
        Some(ErrorKind::BadRequest)
    );
    assert_eq!(
        kind(client::get_profile_by_id(&client, &base, "00000000-0000-4000-8000-000000000000").await),
        Some(ErrorKind::NotFound)
    );

    let raw = client.get(format!("{base}/api/users/profile/{}", ada.user.0)).send().await?.text().await?;
    assert!(!raw.contains("password"));
    Ok(())
}

#[tokio::test]
async fn password_change() -> Result<()> {
    let client = Client::new();
    let base = spawn_server().await?;
    let ada = register(&client, &base, "Ada", UserType::Alumni).await?;

    let wrong = client::update_password(
        &client,
        &ada,
        &UpdatePasswordRequest {
            current_password: "guess".to_string(),
            new_password: "engine".to_string(),
        },
    )
    .await;
    assert_eq!(kind(wrong), Some(ErrorKind::BadRequest));

    client::update_password(
        &client,
        &ada,
        &UpdatePasswordRequest {
            current_password: "Ada-password".to_string(),
            new_password: "engine".to_string(),
        },
    )
    .await?;

    let login = client::login(
        &client,
        &base,
        &LoginRequest {
            email: "ada@example.com".to_string(),
            password: "engine".to_string(),
        },
    )
    .await?;
    assert_eq!(login.id, ada.user);
    Ok(())
}

#[tokio::test]
async fn directory_hides_related_users() -> Result<()> {
    let client = Client::new();
    let base = spawn_server().await?;
    let ada = register(&client, &base, "Ada", UserType::Alumni).await?;
    let grace = register(&client, &base, "Grace", UserType::Alumni).await?;
    let linus = register(&client, &base, "Linus", UserType::Student).await?;
    let barbara = register(&client, &base, "Barbara", UserType::Student).await?;

    let everyone = client::explore_connect(&client, &ada).await?;
    assert_eq!(everyone.len(), 3);
    assert!(everyone.iter().all(|p| p.id != ada.user));

    client::send_connection_request(&client, &ada, &grace.user).await?;
    client::send_connection_request(&client, &linus, &ada.user).await?;

    let remaining = client::explore_connect(&client, &ada).await?;
    assert_eq!(remaining.iter().map(|p| p.id.clone()).collect::<Vec<_>>(), vec![barbara.user.clone()]);

    assert!(client::alumni_connect(&client, &ada).await?.is_empty());
    let students = client::students_connect(&client, &grace).await?;
    let mut names: Vec<_> = students.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["Barbara", "Linus"]);
    Ok(())
}
