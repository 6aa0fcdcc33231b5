use std::collections::BTreeSet;

use alumnet_common::{
    resources::EventId, Education, Experience, Profile, UserId, UserSummary, UserType,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::{transaction::abort, Db, Transactional, Tree};

use crate::{
    error::{AppError, Result},
    store::{decode, encode, tx_get, tx_put},
};

pub const DEFAULT_PROFILE_IMG: &str = "https://img.freepik.com/free-vector/blue-circle-with-white-user_78370-4707.jpg";

/// A user record as stored. Never leaves the server directly; see [`UserData::profile`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub contact_number: Option<String>,
    pub bio: Option<String>,
    pub user_type: UserType,
    pub access_code: String,
    pub profile_img: String,
    pub university_name: Option<String>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub areas_of_interest: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub connections: BTreeSet<UserId>,
    #[serde(default)]
    pub connection_requests: BTreeSet<UserId>,
    #[serde(default)]
    pub connection_requests_sent: BTreeSet<UserId>,
    #[serde(default)]
    pub registered_events: BTreeSet<EventId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserData {
    pub fn new(
        id: UserId,
        name: String,
        email: String,
        password_hash: String,
        user_type: UserType,
        access_code: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email: normalize_email(&email),
            password_hash,
            contact_number: None,
            bio: None,
            user_type,
            access_code,
            profile_img: DEFAULT_PROFILE_IMG.to_string(),
            university_name: None,
            education: Vec::new(),
            experience: Vec::new(),
            skills: Vec::new(),
            areas_of_interest: Vec::new(),
            languages: Vec::new(),
            connections: BTreeSet::new(),
            connection_requests: BTreeSet::new(),
            connection_requests_sent: BTreeSet::new(),
            registered_events: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            contact_number: self.contact_number.clone(),
            bio: self.bio.clone(),
            user_type: self.user_type,
            access_code: self.access_code.clone(),
            profile_img: self.profile_img.clone(),
            university_name: self.university_name.clone(),
            education: self.education.clone(),
            experience: self.experience.clone(),
            skills: self.skills.clone(),
            areas_of_interest: self.areas_of_interest.clone(),
            languages: self.languages.clone(),
            connections: self.connections.iter().cloned().collect(),
            connection_requests: self.connection_requests.iter().cloned().collect(),
            connection_requests_sent: self.connection_requests_sent.iter().cloned().collect(),
            registered_events: self.registered_events.iter().cloned().collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            profile_img: self.profile_img.clone(),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User records plus the unique email index.
#[derive(Clone)]
pub struct Users {
    tree: Tree,
    emails: Tree,
}

impl Users {
    pub fn new(db: &Db) -> Result<Self> {
        Ok(Self {
            tree: db.open_tree("users")?,
            emails: db.open_tree("emails")?,
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn find_by_id(&self, id: &UserId) -> Result<Option<UserData>> {
        self.tree.get(id.as_ref())?.map(|bytes| decode(&bytes)).transpose()
    }

    pub fn get(&self, id: &UserId) -> Result<UserData> {
        self.find_by_id(id)?.ok_or(AppError::NotFound("User not found"))
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<UserData>> {
        match self.emails.get(normalize_email(email))? {
            Some(id) => self.find_by_id(&UserId(String::from_utf8_lossy(&id).into_owned())),
            None => Ok(None),
        }
    }

    pub fn all(&self) -> Result<Vec<UserData>> {
        self.tree.iter().values().map(|bytes| decode(&bytes?)).collect()
    }

    /// Inserts a new user and claims its email in one transaction.
    pub fn create(&self, user: &UserData) -> Result<()> {
        (&self.tree, &self.emails).transaction(|(users, emails)| {
            if emails.get(user.email.as_str())?.is_some() {
                return abort(AppError::Conflict("User already exists".to_string()));
            }
            emails.insert(user.email.as_str(), user.id.as_ref())?;
            tx_put(users, user.id.as_ref(), user)
        })?;
        Ok(())
    }

    /// Point write without touching the email index.
    pub fn save(&self, user: &UserData) -> Result<()> {
        self.tree.insert(user.id.as_ref(), encode(user)?)?;
        Ok(())
    }

    /// Read-modify-write of one user. An email change moves the index entry
    /// in the same transaction.
    pub fn update<T>(&self, id: &UserId, f: impl Fn(&mut UserData) -> Result<T>) -> Result<T> {
        let out = (&self.tree, &self.emails).transaction(|(users, emails)| {
            let Some(mut user) = tx_get::<UserData>(users, id.as_ref())? else {
                return abort(AppError::NotFound("User not found"));
            };
            let old_email = user.email.clone();
            let out = match f(&mut user) {
                Ok(out) => out,
                Err(err) => return abort(err),
            };
            user.email = normalize_email(&user.email);
            if user.email != old_email {
                if let Some(owner) = emails.get(user.email.as_str())? {
                    if &owner[..] != id.0.as_bytes() {
                        return abort(AppError::Conflict("Email already in use".to_string()));
                    }
                }
                emails.remove(old_email.as_str())?;
                emails.insert(user.email.as_str(), id.as_ref())?;
            }
            user.touch();
            tx_put(users, id.as_ref(), &user)?;
            Ok(out)
        })?;
        Ok(out)
    }

    /// Read-modify-write of two distinct users as one serializable
    /// transaction. Either both records are written or neither is; sled
    /// reruns `f` if a concurrent transaction touched either record.
    pub fn update_pair<T>(
        &self,
        first: &UserId,
        second: &UserId,
        f: impl Fn(&mut UserData, &mut UserData) -> Result<T>,
    ) -> Result<T> {
        if first == second {
            return Err(AppError::InvalidState(
                "Cannot connect to yourself".to_string(),
            ));
        }
        let out = self.tree.transaction(|users| {
            let Some(mut a) = tx_get::<UserData>(users, first.as_ref())? else {
                return abort(AppError::NotFound("User not found"));
            };
            let Some(mut b) = tx_get::<UserData>(users, second.as_ref())? else {
                return abort(AppError::NotFound("User not found"));
            };
            let out = match f(&mut a, &mut b) {
                Ok(out) => out,
                Err(err) => return abort(err),
            };
            tx_put(users, first.as_ref(), &a)?;
            tx_put(users, second.as_ref(), &b)?;
            Ok(out)
        })?;
        Ok(out)
    }
}
