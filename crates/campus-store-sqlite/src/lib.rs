//! SQLite implementation of the [`Store`] trait.
//!
//! Runs on a single-connection pool, so writes serialize. The capacity check
//! for `add_member` happens in the same statement as the insert, which keeps
//! concurrent joins from overfilling a group.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use uuid::Uuid;

use campus_storage::{
    CreateEventParams, CreateGroupParams, CreateMessageParams, CreateResourceParams,
    CreateUserParams, Event, EventId, GroupId, GroupMember, Message, MessageId, Resource,
    ResourceId, ResourceKind, Store, StoreError, StudyGroup, User, UserId,
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// `~/.campus-connect/store.db` (creates the directory if missing)
    pub async fn open_default() -> Result<Self, StoreError> {
        let dir = dirs::home_dir()
            .ok_or_else(|| StoreError::Backend("no home dir".into()))?
            .join(".campus-connect");
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Backend(e.to_string()))?;
        let path = dir.join("store.db");
        let url = format!("sqlite://{}?mode=rwc", path.to_string_lossy());
        Self::open(&url).await
    }

    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { pool })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, StoreError> {
    Uuid::try_parse(s).map_err(|e| StoreError::Backend(e.to_string()))
}

fn parse_millis(ms: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Backend(format!("bad timestamp {ms}")))
}

fn parse_date(s: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| StoreError::Backend(e.to_string()))
}

type GroupRow = (
    String,
    String,
    String,
    Option<String>,
    i64,
    Option<String>,
    Option<String>,
    String,
    i64,
    i64,
);

const GROUP_COLS: &str =
    "id,name,subject,description,max_members,meeting_time,location,creator_id,created_at,is_active";

fn group_from_row(row: GroupRow) -> Result<StudyGroup, StoreError> {
    let (id, name, subject, description, max_members, meeting_time, location, creator, ts, active) =
        row;
    Ok(StudyGroup {
        id: GroupId(parse_uuid(&id)?),
        name,
        subject,
        description,
        max_members: max_members as u32,
        meeting_time,
        location,
        creator_id: UserId(parse_uuid(&creator)?),
        created_at: parse_millis(ts)?,
        is_active: active != 0,
    })
}

type UserRow = (
    String,
    String,
    String,
    String,
    Option<String>,
    Option<i64>,
    Option<String>,
    i64,
);

const USER_COLS: &str = "id,username,email,full_name,course,year_of_study,bio,created_at";

fn user_from_row(row: UserRow) -> Result<User, StoreError> {
    let (id, username, email, full_name, course, year, bio, ts) = row;
    Ok(User {
        id: UserId(parse_uuid(&id)?),
        username,
        email,
        full_name,
        course,
        year_of_study: year.map(|y| y as u32),
        bio,
        created_at: parse_millis(ts)?,
    })
}

fn message_from_row(row: (String, String, String, String, i64)) -> Result<Message, StoreError> {
    let (id, group_id, sender_id, content, ts) = row;
    Ok(Message {
        id: MessageId(parse_uuid(&id)?),
        group_id: GroupId(parse_uuid(&group_id)?),
        sender_id: UserId(parse_uuid(&sender_id)?),
        content,
        created_at: parse_millis(ts)?,
    })
}

type ResourceRow = (
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    i64,
);

fn resource_from_row(row: ResourceRow) -> Result<Resource, StoreError> {
    let (id, group_id, creator_id, title, kind, description, content, file_url, ts) = row;
    let kind = ResourceKind::parse(&kind)
        .ok_or_else(|| StoreError::Backend(format!("unknown resource kind {kind}")))?;
    Ok(Resource {
        id: ResourceId(parse_uuid(&id)?),
        group_id: GroupId(parse_uuid(&group_id)?),
        creator_id: UserId(parse_uuid(&creator_id)?),
        title,
        kind,
        description,
        content,
        file_url,
        created_at: parse_millis(ts)?,
    })
}

type EventRow = (
    String,
    String,
    Option<String>,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
    i64,
    i64,
);

fn event_from_row(row: EventRow) -> Result<Event, StoreError> {
    let (id, title, description, date, time, location, category, creator, ts, active) = row;
    Ok(Event {
        id: EventId(parse_uuid(&id)?),
        title,
        description,
        date: parse_date(&date)?,
        time,
        location,
        category,
        creator_id: UserId(parse_uuid(&creator)?),
        created_at: parse_millis(ts)?,
        is_active: active != 0,
    })
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    // ───────────────────────────── Users ─────────────────────────────

    async fn create_user(&self, p: &CreateUserParams) -> Result<UserId, StoreError> {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO users(id,username,email,full_name,course,year_of_study,created_at)
             VALUES(?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(&p.username)
        .bind(&p.email)
        .bind(&p.full_name)
        .bind(&p.course)
        .bind(p.year_of_study.map(|y| y as i64))
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                StoreError::AlreadyExists
            } else {
                StoreError::Backend(e.to_string())
            }
        })?;
        Ok(UserId(id))
    }

    async fn get_user(&self, user_id: &UserId) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLS} FROM users WHERE id=?"
        ))
        .bind(user_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        match row {
            None => Err(StoreError::NotFound),
            Some(row) => user_from_row(row),
        }
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLS} FROM users WHERE username=?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        match row {
            None => Err(StoreError::NotFound),
            Some(row) => user_from_row(row),
        }
    }

    // ───────────────────────────── Groups ─────────────────────────────

    async fn create_group(&self, p: &CreateGroupParams) -> Result<GroupId, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now().timestamp_millis();

        // Group row and creator membership commit together.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        sqlx::query(
            "INSERT INTO study_groups(id,name,subject,description,max_members,meeting_time,location,creator_id,created_at,is_active)
             VALUES(?,?,?,?,?,?,?,?,?,1)",
        )
        .bind(id.to_string())
        .bind(&p.name)
        .bind(&p.subject)
        .bind(&p.description)
        .bind(p.max_members as i64)
        .bind(&p.meeting_time)
        .bind(&p.location)
        .bind(p.creator_id.0.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        sqlx::query("INSERT INTO group_members(group_id,user_id,created_at) VALUES(?,?,?)")
            .bind(id.to_string())
            .bind(p.creator_id.0.to_string())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(GroupId(id))
    }

    async fn get_group(&self, group_id: &GroupId) -> Result<StudyGroup, StoreError> {
        let row = sqlx::query_as::<_, GroupRow>(&format!(
            "SELECT {GROUP_COLS} FROM study_groups WHERE id=?"
        ))
        .bind(group_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        match row {
            None => Err(StoreError::NotFound),
            Some(row) => group_from_row(row),
        }
    }

    async fn list_groups(
        &self,
        subject_filter: Option<String>,
    ) -> Result<Vec<StudyGroup>, StoreError> {
        // instr() keeps the substring match case-sensitive.
        let rows = match subject_filter {
            Some(subject) => {
                sqlx::query_as::<_, GroupRow>(&format!(
                    "SELECT {GROUP_COLS} FROM study_groups
                     WHERE is_active=1 AND instr(subject, ?) > 0
                     ORDER BY created_at, rowid"
                ))
                .bind(subject)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, GroupRow>(&format!(
                    "SELECT {GROUP_COLS} FROM study_groups WHERE is_active=1
                     ORDER BY created_at, rowid"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(group_from_row).collect()
    }

    async fn deactivate_group(&self, group_id: &GroupId) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE study_groups SET is_active=0 WHERE id=?")
            .bind(group_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ─────────────────────────── Membership ───────────────────────────

    async fn add_member(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
        max_members: u32,
    ) -> Result<(), StoreError> {
        // Capacity check and insert in one statement; with the serialized
        // write connection this is the atomicity the invariant needs. An
        // existing member passes the guard even at capacity so the duplicate
        // surfaces as a key violation, not as "group full".
        let result = sqlx::query(
            "INSERT INTO group_members(group_id,user_id,created_at)
             SELECT ?,?,?
             WHERE (SELECT COUNT(*) FROM group_members WHERE group_id=?) < ?
                OR EXISTS(SELECT 1 FROM group_members WHERE group_id=? AND user_id=?)",
        )
        .bind(group_id.0.to_string())
        .bind(user_id.0.to_string())
        .bind(Utc::now().timestamp_millis())
        .bind(group_id.0.to_string())
        .bind(max_members as i64)
        .bind(group_id.0.to_string())
        .bind(user_id.0.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                StoreError::AlreadyExists
            } else {
                StoreError::Backend(e.to_string())
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict);
        }
        Ok(())
    }

    async fn remove_member(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM group_members WHERE group_id=? AND user_id=?")
            .bind(group_id.0.to_string())
            .bind(user_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn is_member(&self, group_id: &GroupId, user_id: &UserId) -> Result<bool, StoreError> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM group_members WHERE group_id=? AND user_id=?",
        )
        .bind(group_id.0.to_string())
        .bind(user_id.0.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(row.0 > 0)
    }

    async fn member_count(&self, group_id: &GroupId) -> Result<u32, StoreError> {
        let row =
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM group_members WHERE group_id=?")
                .bind(group_id.0.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(row.0 as u32)
    }

    async fn list_members(&self, group_id: &GroupId) -> Result<Vec<GroupMember>, StoreError> {
        let rows = sqlx::query_as::<_, (String, String, i64)>(
            "SELECT group_id,user_id,created_at FROM group_members WHERE group_id=?
             ORDER BY created_at, user_id",
        )
        .bind(group_id.0.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for (gid, uid, ts) in rows {
            out.push(GroupMember {
                group_id: GroupId(parse_uuid(&gid)?),
                user_id: UserId(parse_uuid(&uid)?),
                created_at: parse_millis(ts)?,
            });
        }
        Ok(out)
    }

    // ───────────────────────────── Messages ─────────────────────────────

    async fn append_message(&self, p: &CreateMessageParams) -> Result<Message, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO messages(id,group_id,sender_id,content,created_at) VALUES(?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(p.group_id.0.to_string())
        .bind(p.sender_id.0.to_string())
        .bind(&p.content)
        .bind(now.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Message {
            id: MessageId(id),
            group_id: p.group_id.clone(),
            sender_id: p.sender_id.clone(),
            content: p.content.clone(),
            created_at: parse_millis(now.timestamp_millis())?,
        })
    }

    async fn recent_messages(
        &self,
        group_id: &GroupId,
        limit: u32,
    ) -> Result<Vec<Message>, StoreError> {
        // Newest first; ties on created_at break by rowid, i.e. insertion
        // order.
        let rows = sqlx::query_as::<_, (String, String, String, String, i64)>(
            "SELECT id,group_id,sender_id,content,created_at FROM messages
             WHERE group_id=? ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(group_id.0.to_string())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(message_from_row).collect()
    }

    async fn count_messages(&self, group_id: &GroupId) -> Result<u64, StoreError> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM messages WHERE group_id=?")
            .bind(group_id.0.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(row.0 as u64)
    }

    // ───────────────────────────── Resources ─────────────────────────────

    async fn add_resource(&self, p: &CreateResourceParams) -> Result<Resource, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO resources(id,group_id,creator_id,title,kind,description,content,file_url,created_at)
             VALUES(?,?,?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(p.group_id.0.to_string())
        .bind(p.creator_id.0.to_string())
        .bind(&p.title)
        .bind(p.kind.as_str())
        .bind(&p.description)
        .bind(&p.content)
        .bind(&p.file_url)
        .bind(now.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Resource {
            id: ResourceId(id),
            group_id: p.group_id.clone(),
            creator_id: p.creator_id.clone(),
            title: p.title.clone(),
            kind: p.kind,
            description: p.description.clone(),
            content: p.content.clone(),
            file_url: p.file_url.clone(),
            created_at: parse_millis(now.timestamp_millis())?,
        })
    }

    async fn list_resources(&self, group_id: &GroupId) -> Result<Vec<Resource>, StoreError> {
        let rows = sqlx::query_as::<_, ResourceRow>(
            "SELECT id,group_id,creator_id,title,kind,description,content,file_url,created_at
             FROM resources WHERE group_id=? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(group_id.0.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(resource_from_row).collect()
    }

    async fn count_resources(&self, group_id: &GroupId) -> Result<u64, StoreError> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM resources WHERE group_id=?")
            .bind(group_id.0.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(row.0 as u64)
    }

    // ───────────────────────────── Events ─────────────────────────────

    async fn create_event(&self, p: &CreateEventParams) -> Result<EventId, StoreError> {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO events(id,title,description,date,time,location,category,creator_id,created_at,is_active)
             VALUES(?,?,?,?,?,?,?,?,?,1)",
        )
        .bind(id.to_string())
        .bind(&p.title)
        .bind(&p.description)
        .bind(p.date.format("%Y-%m-%d").to_string())
        .bind(&p.time)
        .bind(&p.location)
        .bind(&p.category)
        .bind(p.creator_id.0.to_string())
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(EventId(id))
    }

    async fn list_events(&self, category: Option<String>) -> Result<Vec<Event>, StoreError> {
        const EVENT_COLS: &str =
            "id,title,description,date,time,location,category,creator_id,created_at,is_active";
        let rows = match category {
            Some(category) => {
                sqlx::query_as::<_, EventRow>(&format!(
                    "SELECT {EVENT_COLS} FROM events WHERE is_active=1 AND category=?
                     ORDER BY date DESC, rowid DESC"
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, EventRow>(&format!(
                    "SELECT {EVENT_COLS} FROM events WHERE is_active=1
                     ORDER BY date DESC, rowid DESC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(event_from_row).collect()
    }
}
