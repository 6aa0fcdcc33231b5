mod common;

use alumnet_client::{api_error, client};
use alumnet_common::{
    resources::{
        CreateEvent, CreateJob, CreateLocation, CreatePost, EventCategory, PostId, PostType,
        SurveyType,
    },
    ErrorKind, UserType,
};
use anyhow::Result;
use reqwest::Client;

use common::{register, spawn_server};

fn kind<T>(result: Result<T>) -> Option<ErrorKind> {
    result.err().and_then(|err| api_error(&err).map(|e| e.kind))
}

fn text_post(content: &str) -> CreatePost {
    CreatePost {
        content: content.to_string(),
        post_type: PostType::Discussion,
        media: None,
        title: None,
        link: None,
        size: None,
    }
}

fn event(title: &str, date: &str, category: EventCategory) -> CreateEvent {
    CreateEvent {
        title: title.to_string(),
        date: date.to_string(),
        time: "18:00".to_string(),
        location: "Main hall".to_string(),
        description: "Evening session".to_string(),
        image_url: None,
        category,
    }
}

#[tokio::test]
async fn posts_feed_and_deletion() -> Result<()> {
    let client = Client::new();
    let base = spawn_server().await?;
    let ada = register(&client, &base, "Ada", UserType::Alumni).await?;
    let grace = register(&client, &base, "Grace", UserType::Student).await?;

    let first = client::create_post(&client, &ada, &text_post("Hello alumni")).await?;
    let second = client::create_post(&client, &grace, &text_post("Hello back")).await?;
    assert_eq!(first.author, ada.user);

    let feed = client::list_posts(&client, &base).await?;
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].post.id, second.id);
    assert_eq!(feed[1].post.id, first.id);
    assert_eq!(feed[1].author_profile.as_ref().map(|a| a.name.as_str()), Some("Ada"));

    assert_eq!(kind(client::create_post(&client, &ada, &text_post("  ")).await), Some(ErrorKind::BadRequest));
    assert_eq!(kind(client::delete_post(&client, &grace, &first.id).await), Some(ErrorKind::Unauthorized));

    client::delete_post(&client, &ada, &first.id).await?;
    assert_eq!(kind(client::delete_post(&client, &ada, &first.id).await), Some(ErrorKind::NotFound));
    let missing = PostId("not-a-post".to_string());
    assert_eq!(kind(client::delete_post(&client, &ada, &missing).await), Some(ErrorKind::BadRequest));
    assert_eq!(client::list_posts(&client, &base).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn jobs_are_listed() -> Result<()> {
    let client = Client::new();
    let base = spawn_server().await?;
    let ada = register(&client, &base, "Ada", UserType::Alumni).await?;

    let job = client::add_job(
        &client,
        &ada,
        &CreateJob {
            title: "Compiler engineer".to_string(),
            description: "Work on the optimiser".to_string(),
            company: "Engines Ltd".to_string(),
            location: "London".to_string(),
        },
    )
    .await?;
    assert_eq!(job.user, ada.user);

    let incomplete = client::add_job(
        &client,
        &ada,
        &CreateJob {
            title: "Intern".to_string(),
            description: String::new(),
            company: "Engines Ltd".to_string(),
            location: "London".to_string(),
        },
    )
    .await;
    assert_eq!(kind(incomplete), Some(ErrorKind::BadRequest));

    let jobs = client::list_jobs(&client, &base).await?;
    assert_eq!(jobs, vec![job]);
    Ok(())
}

#[tokio::test]
async fn event_registration_round() -> Result<()> {
    let client = Client::new();
    let base = spawn_server().await?;
    let ada = register(&client, &base, "Ada", UserType::Alumni).await?;
    let grace = register(&client, &base, "Grace", UserType::Student).await?;

    let meetup = client::create_event(&client, &ada, &event("Reunion", "2026-01-10", EventCategory::AlumniMeetups)).await?;
    let talk = client::create_event(&client, &ada, &event("Rust talk", "2026-03-02", EventCategory::TechSessions)).await?;

    let all = client::list_events(&client, &base, None).await?;
    assert_eq!(all.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(), ["Rust talk", "Reunion"]);
    let tech = client::list_events(&client, &base, Some(EventCategory::TechSessions)).await?;
    assert_eq!(tech.len(), 1);
    assert_eq!(tech[0].id, talk.id);

    assert!(!client::is_registered(&client, &grace, &meetup).await?);
    let registered = client::register_event(&client, &grace, &meetup).await?;
    assert_eq!(registered.event.registered_users, vec![grace.user.clone()]);
    assert!(client::is_registered(&client, &grace, &meetup).await?);
    assert_eq!(kind(client::register_event(&client, &grace, &meetup).await), Some(ErrorKind::Conflict));

    let mine = client::registered_events(&client, &grace).await?;
    assert_eq!(mine.iter().map(|e| e.id.clone()).collect::<Vec<_>>(), vec![meetup.id.clone()]);
    let profile = client::get_profile(&client, &grace).await?;
    assert_eq!(profile.registered_events, vec![meetup.id.clone()]);

    let left = client::unregister_event(&client, &grace, &meetup).await?;
    assert!(left.event.registered_users.is_empty());
    assert!(client::registered_events(&client, &grace).await?.is_empty());
    assert!(!client::is_registered(&client, &grace, &meetup).await?);
    Ok(())
}

#[tokio::test]
async fn locations_are_validated() -> Result<()> {
    let client = Client::new();
    let base = spawn_server().await?;

    let request = CreateLocation {
        latitude: 18.52,
        longitude: 73.85,
        address: "Shivajinagar".to_string(),
        file_number: "F-101".to_string(),
        survey_date: "2024-05-01".parse()?,
        category: "Residential".to_string(),
        survey_type: SurveyType::Two,
    };
    let location = client::add_location(&client, &base, &request).await?;
    assert_eq!(location.lat_long_combined, "18.52,73.85");

    let invalid = CreateLocation {
        latitude: 120.0,
        ..request
    };
    assert_eq!(kind(client::add_location(&client, &base, &invalid).await), Some(ErrorKind::BadRequest));

    assert_eq!(client::list_locations(&client, &base).await?, vec![location]);
    Ok(())
}
