//! Unit tests for core services using a real SQLite in-memory database.

use std::sync::Arc;

use campus_storage::{
    CreateUserParams, GroupId, MockStore, ResourceKind, Store, StoreError, StudyGroup, UserId,
};
use campus_store_sqlite::SqliteStore;
use chrono::{NaiveDate, Utc};

use crate::{
    CollaborationLog, CoreError, DashboardService, EventBoard, GroupRegistry, JoinOutcome,
    LeaveOutcome, MembershipController, NewEvent, NewGroup, NewResource, ResourceLedger,
    DEFAULT_MESSAGE_LIMIT,
};

async fn create_test_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
}

async fn create_test_user(store: &SqliteStore, username: &str) -> UserId {
    store
        .create_user(&CreateUserParams {
            username: username.to_string(),
            email: format!("{username}@campus.test"),
            full_name: format!("{username} surname"),
            course: None,
            year_of_study: None,
        })
        .await
        .unwrap()
}

fn day_to_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_group(name: &str, subject: &str, max_members: u32) -> NewGroup {
    NewGroup {
        name: name.to_string(),
        subject: subject.to_string(),
        description: None,
        max_members,
        meeting_time: None,
        location: None,
    }
}

async fn create_test_group(
    store: &Arc<SqliteStore>,
    creator: &UserId,
    max_members: u32,
) -> GroupId {
    GroupRegistry::new(store.clone())
        .create_group(creator, new_group("Rust study circle", "Systems", max_members))
        .await
        .unwrap()
}

// ───────────────────────────── Group Registry ─────────────────────────────

#[tokio::test]
async fn create_group_rejects_bad_input() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let registry = GroupRegistry::new(store.clone());

    for group in [
        new_group("  ", "Maths", 5),
        new_group("Algebra", "   ", 5),
        new_group("Algebra", "Maths", 0),
    ] {
        let err = registry.create_group(&creator, group).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)), "got {err:?}");
    }

    assert!(registry.list_groups(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn creator_is_first_member() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let registry = GroupRegistry::new(store.clone());

    let group_id = create_test_group(&store, &creator, 5).await;

    assert!(registry.is_member(&group_id, &creator).await.unwrap());
    assert_eq!(registry.member_count(&group_id).await.unwrap(), 1);

    let group = registry.get_group(&group_id).await.unwrap();
    assert_eq!(group.creator_id, creator);
    assert!(group.is_active);
}

#[tokio::test]
async fn get_unknown_group_is_not_found() {
    let store = create_test_store().await;
    let registry = GroupRegistry::new(store.clone());

    let missing = GroupId(uuid::Uuid::now_v7());
    assert!(matches!(
        registry.get_group(&missing).await.unwrap_err(),
        CoreError::NotFound
    ));
}

#[tokio::test]
async fn list_groups_filters_by_subject_substring() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let registry = GroupRegistry::new(store.clone());

    registry
        .create_group(&creator, new_group("Calc crew", "Mathematics", 5))
        .await
        .unwrap();
    registry
        .create_group(&creator, new_group("Compilers", "Computer Science", 5))
        .await
        .unwrap();

    let all = registry.list_groups(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let math = registry.list_groups(Some("Math")).await.unwrap();
    assert_eq!(math.len(), 1);
    assert_eq!(math[0].subject, "Mathematics");

    // Substring match is case-sensitive.
    assert!(registry.list_groups(Some("math")).await.unwrap().is_empty());
}

#[tokio::test]
async fn deactivated_group_leaves_discovery_but_stays_resolvable() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let registry = GroupRegistry::new(store.clone());

    let group_id = create_test_group(&store, &creator, 5).await;
    registry.deactivate(&group_id).await.unwrap();

    assert!(registry.list_groups(None).await.unwrap().is_empty());

    let group = registry.get_group(&group_id).await.unwrap();
    assert!(!group.is_active);
}

#[tokio::test]
async fn deactivated_group_keeps_collaboration_access_for_members() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let member = create_test_user(&store, "bob").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let registry = GroupRegistry::new(store.clone());
    let membership = MembershipController::new(store.clone());
    let chat = CollaborationLog::new(store.clone());
    let ledger = ResourceLedger::new(store.clone());
    let dashboards = DashboardService::new(store.clone());

    membership.join(&group_id, &member).await.unwrap();
    chat.post_message(&group_id, &creator, "archived but not gone")
        .await
        .unwrap();
    ledger
        .add_resource(
            &group_id,
            &creator,
            NewResource {
                title: "Final summary".into(),
                kind: ResourceKind::Note,
                description: None,
                content: Some("wrap-up".into()),
                file_url: None,
            },
        )
        .await
        .unwrap();

    registry.deactivate(&group_id).await.unwrap();

    // Deactivation removes the group from discovery only; members keep
    // their history.
    let window = chat
        .recent_messages(&group_id, &member, DEFAULT_MESSAGE_LIMIT)
        .await
        .unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].message.content, "archived but not gone");

    let resources = ledger.list_resources(&group_id, &member).await.unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].title, "Final summary");

    let dashboard = dashboards.get_dashboard(&group_id, &member).await.unwrap();
    assert!(!dashboard.group.is_active);
    assert_eq!(dashboard.messages.len(), 1);
    assert_eq!(dashboard.resources.len(), 1);

    // Non-members stay locked out after deactivation too.
    let outsider = create_test_user(&store, "carol").await;
    assert!(matches!(
        dashboards.get_dashboard(&group_id, &outsider).await.unwrap_err(),
        CoreError::Forbidden
    ));
}

// ─────────────────────────── Membership Controller ───────────────────────────

#[tokio::test]
async fn join_is_idempotent() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let joiner = create_test_user(&store, "bob").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let membership = MembershipController::new(store.clone());

    assert_eq!(
        membership.join(&group_id, &joiner).await.unwrap(),
        JoinOutcome::Joined
    );
    assert_eq!(
        membership.join(&group_id, &joiner).await.unwrap(),
        JoinOutcome::AlreadyMember
    );
    // Count went up by exactly one, not two.
    assert_eq!(store.member_count(&group_id).await.unwrap(), 2);
}

#[tokio::test]
async fn leave_of_non_member_is_a_no_op() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let outsider = create_test_user(&store, "bob").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let membership = MembershipController::new(store.clone());

    assert_eq!(
        membership.leave(&group_id, &outsider).await.unwrap(),
        LeaveOutcome::NotMember
    );
    assert_eq!(store.member_count(&group_id).await.unwrap(), 1);
}

#[tokio::test]
async fn join_and_leave_on_unknown_group_are_not_found() {
    let store = create_test_store().await;
    let user = create_test_user(&store, "alice").await;
    let membership = MembershipController::new(store.clone());
    let missing = GroupId(uuid::Uuid::now_v7());

    assert!(matches!(
        membership.join(&missing, &user).await.unwrap_err(),
        CoreError::NotFound
    ));
    assert!(matches!(
        membership.leave(&missing, &user).await.unwrap_err(),
        CoreError::NotFound
    ));
}

#[tokio::test]
async fn capacity_lifecycle_scenario() {
    // create (max 2) → u1 auto-member → u2 joins → u3 bounced → u1 leaves →
    // u3 joins.
    let store = create_test_store().await;
    let u1 = create_test_user(&store, "u1").await;
    let u2 = create_test_user(&store, "u2").await;
    let u3 = create_test_user(&store, "u3").await;
    let group_id = create_test_group(&store, &u1, 2).await;
    let membership = MembershipController::new(store.clone());

    assert_eq!(store.member_count(&group_id).await.unwrap(), 1);

    assert_eq!(
        membership.join(&group_id, &u2).await.unwrap(),
        JoinOutcome::Joined
    );
    assert_eq!(store.member_count(&group_id).await.unwrap(), 2);

    assert_eq!(
        membership.join(&group_id, &u3).await.unwrap(),
        JoinOutcome::GroupFull
    );
    assert_eq!(store.member_count(&group_id).await.unwrap(), 2);

    assert_eq!(
        membership.leave(&group_id, &u1).await.unwrap(),
        LeaveOutcome::Left
    );
    assert_eq!(store.member_count(&group_id).await.unwrap(), 1);

    assert_eq!(
        membership.join(&group_id, &u3).await.unwrap(),
        JoinOutcome::Joined
    );
    assert_eq!(store.member_count(&group_id).await.unwrap(), 2);

    // The departed creator stays recorded for attribution.
    let group = store.get_group(&group_id).await.unwrap();
    assert_eq!(group.creator_id, u1);
}

#[tokio::test]
async fn concurrent_joins_never_overfill() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "creator").await;
    // One free slot beyond the creator.
    let group_id = create_test_group(&store, &creator, 2).await;

    let mut joiners = Vec::new();
    for i in 0..5 {
        joiners.push(create_test_user(&store, &format!("joiner{i}")).await);
    }

    let membership = Arc::new(MembershipController::new(store.clone()));
    let mut handles = Vec::new();
    for user in joiners {
        let membership = membership.clone();
        let group_id = group_id.clone();
        handles.push(tokio::spawn(async move {
            membership.join(&group_id, &user).await.unwrap()
        }));
    }

    let mut joined = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            JoinOutcome::Joined => joined += 1,
            JoinOutcome::GroupFull => full += 1,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    assert_eq!(joined, 1);
    assert_eq!(full, 4);
    assert_eq!(store.member_count(&group_id).await.unwrap(), 2);
}

#[tokio::test]
async fn join_race_against_self_reports_already_member() {
    // A duplicate insert that slips past the is_member pre-check must come
    // back as AlreadyMember, not an error.
    let mut store = MockStore::new();
    let user = UserId(uuid::Uuid::now_v7());
    let group_id = GroupId(uuid::Uuid::now_v7());
    let group = StudyGroup {
        id: group_id.clone(),
        name: "Rust study circle".into(),
        subject: "Systems".into(),
        description: None,
        max_members: 5,
        meeting_time: None,
        location: None,
        creator_id: user.clone(),
        created_at: Utc::now(),
        is_active: true,
    };

    store
        .expect_get_group()
        .returning(move |_| Ok(group.clone()));
    store.expect_is_member().returning(|_, _| Ok(false));
    store
        .expect_add_member()
        .returning(|_, _, _| Err(StoreError::AlreadyExists));

    let membership = MembershipController::new(Arc::new(store));
    assert_eq!(
        membership.join(&group_id, &user).await.unwrap(),
        JoinOutcome::AlreadyMember
    );
}

// ─────────────────────────── Collaboration Log ───────────────────────────

#[tokio::test]
async fn non_member_cannot_post() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let outsider = create_test_user(&store, "bob").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let chat = CollaborationLog::new(store.clone());

    let err = chat
        .post_message(&group_id, &outsider, "let me in")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden));
    assert_eq!(store.count_messages(&group_id).await.unwrap(), 0);
}

#[tokio::test]
async fn post_rejects_blank_content() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let chat = CollaborationLog::new(store.clone());

    let err = chat
        .post_message(&group_id, &creator, "  \n\t ")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(store.count_messages(&group_id).await.unwrap(), 0);
}

#[tokio::test]
async fn posted_message_is_trimmed_and_labelled() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let chat = CollaborationLog::new(store.clone());

    let posted = chat
        .post_message(&group_id, &creator, "  hello all  ")
        .await
        .unwrap();
    assert_eq!(posted.message.content, "hello all");
    assert_eq!(posted.sender_name, "alice surname");
    assert_eq!(posted.time_label, posted.message.created_at.format("%H:%M").to_string());
}

#[tokio::test]
async fn recent_messages_keeps_newest_window_oldest_first() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let chat = CollaborationLog::new(store.clone());

    for i in 1..=60 {
        chat.post_message(&group_id, &creator, &format!("msg {i}"))
            .await
            .unwrap();
    }

    let window = chat
        .recent_messages(&group_id, &creator, DEFAULT_MESSAGE_LIMIT)
        .await
        .unwrap();
    assert_eq!(window.len(), 50);
    // The 10 oldest fell out of the window; the rest read oldest to newest.
    assert_eq!(window.first().unwrap().message.content, "msg 11");
    assert_eq!(window.last().unwrap().message.content, "msg 60");
    for pair in window.windows(2) {
        assert!(pair[0].message.created_at <= pair[1].message.created_at);
    }
}

#[tokio::test]
async fn message_views_tag_own_messages_per_request() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let member = create_test_user(&store, "bob").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let membership = MembershipController::new(store.clone());
    let chat = CollaborationLog::new(store.clone());

    membership.join(&group_id, &member).await.unwrap();
    chat.post_message(&group_id, &creator, "from alice")
        .await
        .unwrap();
    chat.post_message(&group_id, &member, "from bob")
        .await
        .unwrap();

    let as_bob = chat
        .recent_messages(&group_id, &member, DEFAULT_MESSAGE_LIMIT)
        .await
        .unwrap();
    assert_eq!(as_bob.len(), 2);
    assert!(!as_bob[0].is_own);
    assert!(as_bob[1].is_own);
    assert_eq!(as_bob[0].sender_name, "alice surname");

    let as_alice = chat
        .recent_messages(&group_id, &creator, DEFAULT_MESSAGE_LIMIT)
        .await
        .unwrap();
    assert!(as_alice[0].is_own);
    assert!(!as_alice[1].is_own);
}

#[tokio::test]
async fn non_member_cannot_read_messages() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let outsider = create_test_user(&store, "bob").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let chat = CollaborationLog::new(store.clone());

    let err = chat
        .recent_messages(&group_id, &outsider, DEFAULT_MESSAGE_LIMIT)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden));
}

// ─────────────────────────── Resource Ledger ───────────────────────────

#[tokio::test]
async fn resource_title_is_required() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let ledger = ResourceLedger::new(store.clone());

    let err = ledger
        .add_resource(
            &group_id,
            &creator,
            NewResource {
                title: "   ".into(),
                kind: ResourceKind::Note,
                description: None,
                content: Some("body".into()),
                file_url: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(store.count_resources(&group_id).await.unwrap(), 0);
}

#[tokio::test]
async fn non_member_cannot_touch_resources() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let outsider = create_test_user(&store, "bob").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let ledger = ResourceLedger::new(store.clone());

    let err = ledger
        .add_resource(
            &group_id,
            &outsider,
            NewResource {
                title: "Lecture notes".into(),
                kind: ResourceKind::Note,
                description: None,
                content: Some("body".into()),
                file_url: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden));

    let err = ledger.list_resources(&group_id, &outsider).await.unwrap_err();
    assert!(matches!(err, CoreError::Forbidden));
}

#[tokio::test]
async fn resources_list_newest_first() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let ledger = ResourceLedger::new(store.clone());

    for (title, kind, url) in [
        ("Week 1 notes", ResourceKind::Note, None),
        ("Course page", ResourceKind::Link, Some("https://example.test/course")),
    ] {
        ledger
            .add_resource(
                &group_id,
                &creator,
                NewResource {
                    title: title.into(),
                    kind,
                    description: None,
                    content: None,
                    file_url: url.map(str::to_string),
                },
            )
            .await
            .unwrap();
    }

    let listed = ledger.list_resources(&group_id, &creator).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].title, "Course page");
    assert_eq!(listed[0].kind, ResourceKind::Link);
    assert_eq!(listed[1].title, "Week 1 notes");
}

// ─────────────────────────────── Dashboard ───────────────────────────────

#[tokio::test]
async fn dashboard_bundles_group_chat_and_resources() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let chat = CollaborationLog::new(store.clone());
    let ledger = ResourceLedger::new(store.clone());
    let dashboards = DashboardService::new(store.clone());

    chat.post_message(&group_id, &creator, "kickoff at noon")
        .await
        .unwrap();
    ledger
        .add_resource(
            &group_id,
            &creator,
            NewResource {
                title: "Agenda".into(),
                kind: ResourceKind::Note,
                description: None,
                content: Some("intros, schedule".into()),
                file_url: None,
            },
        )
        .await
        .unwrap();

    let dashboard = dashboards.get_dashboard(&group_id, &creator).await.unwrap();
    assert_eq!(dashboard.group.id, group_id);
    assert_eq!(dashboard.messages.len(), 1);
    assert!(dashboard.messages[0].is_own);
    assert_eq!(dashboard.resources.len(), 1);
    assert_eq!(dashboard.resources[0].title, "Agenda");
}

#[tokio::test]
async fn dashboard_is_membership_gated() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let outsider = create_test_user(&store, "bob").await;
    let group_id = create_test_group(&store, &creator, 5).await;
    let dashboards = DashboardService::new(store.clone());

    assert!(matches!(
        dashboards.get_dashboard(&group_id, &outsider).await.unwrap_err(),
        CoreError::Forbidden
    ));
    assert!(matches!(
        dashboards
            .get_dashboard(&GroupId(uuid::Uuid::now_v7()), &creator)
            .await
            .unwrap_err(),
        CoreError::NotFound
    ));
}

// ─────────────────────────────── Event Board ───────────────────────────────

#[tokio::test]
async fn events_list_by_category_newest_date_first() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let board = EventBoard::new(store.clone());

    for (title, day, category) in [
        ("Hackathon", "2026-03-01", "academic"),
        ("Spring gala", "2026-04-10", "social"),
        ("Guest lecture", "2026-03-20", "academic"),
    ] {
        board
            .create_event(
                &creator,
                NewEvent {
                    title: title.into(),
                    description: None,
                    date: day_to_date(day),
                    time: None,
                    location: None,
                    category: category.into(),
                },
            )
            .await
            .unwrap();
    }

    let all = board.list_events(None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].title, "Spring gala");

    let academic = board.list_events(Some("academic")).await.unwrap();
    assert_eq!(academic.len(), 2);
    assert_eq!(academic[0].title, "Guest lecture");
    assert_eq!(academic[1].title, "Hackathon");
}

#[tokio::test]
async fn event_requires_title_and_category() {
    let store = create_test_store().await;
    let creator = create_test_user(&store, "alice").await;
    let board = EventBoard::new(store.clone());

    let err = board
        .create_event(
            &creator,
            NewEvent {
                title: " ".into(),
                description: None,
                date: day_to_date("2026-05-01"),
                time: None,
                location: None,
                category: "social".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}
