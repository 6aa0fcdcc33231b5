use alumnet_common::resources::{Event, Job, Location, Post};
use anyhow::Context;
use sled::Db;

use crate::{auth::Sessions, config::Config, store::Collection, users::Users};

#[derive(Clone)]
pub struct State {
    pub users: Users,
    pub sessions: Sessions,
    pub posts: Collection<Post>,
    pub jobs: Collection<Job>,
    pub events: Collection<Event>,
    pub locations: Collection<Location>,
}

impl State {
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let db = sled::open(&config.db_path)
            .with_context(|| format!("Error opening database at {}", config.db_path))?;
        Self::from_db(&db, config.session_ttl_days)
    }

    /// In-memory database, removed on drop. Used by tests.
    pub fn temporary() -> anyhow::Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(&db, Config::default().session_ttl_days)
    }

    fn from_db(db: &Db, session_ttl_days: i64) -> anyhow::Result<Self> {
        Ok(Self {
            users: Users::new(db)?,
            sessions: Sessions::new(db, session_ttl_days)?,
            posts: Collection::open(db, "posts")?,
            jobs: Collection::open(db, "jobs")?,
            events: Collection::open(db, "events")?,
            locations: Collection::open(db, "locations")?,
        })
    }
}
