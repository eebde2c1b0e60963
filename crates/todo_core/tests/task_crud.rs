use rusqlite::Connection;
use todo_core::db::open_db_in_memory;
use todo_core::{
    AccountRepository, CategoryId, CategoryRepository, RepoError, Session,
    SqliteAccountRepository, SqliteCategoryRepository, SqliteTaskRepository, TaskId, TaskInput,
    TaskService,
};

fn setup() -> (Connection, Session, CategoryId) {
    let conn = open_db_in_memory().unwrap();
    let (session, category_id) = account_with_category(&conn, "alice", "Inbox");
    (conn, session, category_id)
}

fn account_with_category(conn: &Connection, username: &str, category: &str) -> (Session, CategoryId) {
    let account = SqliteAccountRepository::try_new(conn)
        .unwrap()
        .create_account(username, "digest")
        .unwrap();
    let category = SqliteCategoryRepository::try_new(conn)
        .unwrap()
        .create_category(account.id, category)
        .unwrap();
    (Session::new(account.id), category.id)
}

fn task_service(conn: &Connection) -> TaskService<SqliteTaskRepository<'_>> {
    TaskService::new(SqliteTaskRepository::try_new(conn).unwrap())
}

fn set_created_at(conn: &Connection, id: TaskId, created_at: i64) {
    conn.execute(
        "UPDATE task SET created_at = ?1 WHERE id = ?2;",
        rusqlite::params![created_at, id.to_string()],
    )
    .unwrap();
}

#[test]
fn create_defaults_flags_to_false() {
    let (conn, session, category_id) = setup();
    let task = task_service(&conn)
        .create_task(&session, "  buy milk ", category_id)
        .unwrap();

    assert_eq!(task.content, "buy milk");
    assert!(!task.completed);
    assert!(!task.important);
    assert_eq!(task.category_id, category_id);
    assert_eq!(task.account_id, session.account_id());
}

#[test]
fn list_orders_important_incomplete_first_and_completed_last() {
    let (conn, session, category_id) = setup();
    let service = task_service(&conn);

    let plain_old = service.create_task(&session, "plain old", category_id).unwrap();
    let done = service.create_task(&session, "done", category_id).unwrap();
    let important_new = service
        .create_task(&session, "important new", category_id)
        .unwrap();
    let important_old = service
        .create_task(&session, "important old", category_id)
        .unwrap();
    let important_done = service
        .create_task(&session, "important done", category_id)
        .unwrap();
    let plain_new = service.create_task(&session, "plain new", category_id).unwrap();

    service.set_flags(&session, done.id, Some(true), None).unwrap();
    service
        .set_flags(&session, important_new.id, None, Some(true))
        .unwrap();
    service
        .set_flags(&session, important_old.id, None, Some(true))
        .unwrap();
    service
        .set_flags(&session, important_done.id, Some(true), Some(true))
        .unwrap();

    set_created_at(&conn, plain_old.id, 1_000);
    set_created_at(&conn, done.id, 500);
    set_created_at(&conn, important_new.id, 3_000);
    set_created_at(&conn, important_old.id, 2_000);
    set_created_at(&conn, important_done.id, 100);
    set_created_at(&conn, plain_new.id, 4_000);

    let order: Vec<TaskId> = service
        .list_tasks(&session)
        .unwrap()
        .into_iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(
        order,
        vec![
            important_old.id,
            important_new.id,
            important_done.id,
            plain_old.id,
            plain_new.id,
            done.id,
        ]
    );
}

#[test]
fn equal_timestamps_fall_back_to_insertion_order() {
    let (conn, session, category_id) = setup();
    let service = task_service(&conn);
    let first = service.create_task(&session, "first", category_id).unwrap();
    let second = service.create_task(&session, "second", category_id).unwrap();
    conn.execute("UPDATE task SET created_at = 42;", []).unwrap();

    let listed = service.list_tasks(&session).unwrap();
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);
}

#[test]
fn toggling_completed_preserves_other_fields() {
    let (conn, session, category_id) = setup();
    let service = task_service(&conn);
    let task = service.create_task(&session, "write report", category_id).unwrap();
    service.set_flags(&session, task.id, None, Some(true)).unwrap();

    let toggled = service
        .set_flags(&session, task.id, Some(true), None)
        .unwrap();

    assert!(toggled.completed);
    assert!(toggled.important);
    assert_eq!(toggled.content, "write report");
    assert_eq!(toggled.category_id, category_id);
    assert_eq!(toggled.created_at, task.created_at);
}

#[test]
fn update_overwrites_every_field() {
    let (conn, session, inbox) = setup();
    let other = SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .create_category(session.account_id(), "Later")
        .unwrap();
    let service = task_service(&conn);
    let task = service.create_task(&session, "draft", inbox).unwrap();

    let updated = service
        .update_task(
            &session,
            &TaskInput {
                id: task.id,
                content: "final".to_string(),
                category_id: other.id,
                completed: true,
                important: true,
            },
        )
        .unwrap();

    assert_eq!(updated.id, task.id);
    assert_eq!(updated.content, "final");
    assert_eq!(updated.category_id, other.id);
    assert!(updated.completed && updated.important);
    assert!(service.list_tasks_in_category(&session, inbox).unwrap().is_empty());
}

#[test]
fn update_with_unknown_id_inserts() {
    let (conn, session, category_id) = setup();
    let service = task_service(&conn);
    let input = TaskInput::new("from upsert", category_id);

    let saved = service.update_task(&session, &input).unwrap();
    assert_eq!(saved.id, input.id);
    assert_eq!(service.list_tasks(&session).unwrap().len(), 1);
}

#[test]
fn rename_keeps_flags_and_category() {
    let (conn, session, category_id) = setup();
    let service = task_service(&conn);
    let task = service.create_task(&session, "old", category_id).unwrap();
    service.set_flags(&session, task.id, Some(true), None).unwrap();

    let renamed = service.rename_task(&session, task.id, "new").unwrap();
    assert_eq!(renamed.content, "new");
    assert!(renamed.completed);
    assert_eq!(renamed.category_id, category_id);
}

#[test]
fn create_in_foreign_category_is_rejected() {
    let (conn, alice, alice_inbox) = setup();
    let (bob, _) = account_with_category(&conn, "bob", "Inbox");

    let err = task_service(&conn)
        .create_task(&bob, "sneaky", alice_inbox)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "category", .. }));
    assert!(task_service(&conn).list_tasks(&alice).unwrap().is_empty());
}

#[test]
fn tasks_are_scoped_per_account() {
    let (conn, alice, alice_inbox) = setup();
    let (bob, bob_inbox) = account_with_category(&conn, "bob", "Inbox");
    let service = task_service(&conn);
    let alice_task = service.create_task(&alice, "alice task", alice_inbox).unwrap();
    service.create_task(&bob, "bob task", bob_inbox).unwrap();

    let bob_tasks = service.list_tasks(&bob).unwrap();
    assert_eq!(bob_tasks.len(), 1);
    assert_eq!(bob_tasks[0].content, "bob task");
    assert!(service.get_task(&bob, alice_task.id).unwrap().is_none());
    assert!(matches!(
        service.delete_task(&bob, alice_task.id),
        Err(RepoError::NotFound { entity: "task", .. })
    ));
}

#[test]
fn delete_removes_task() {
    let (conn, session, category_id) = setup();
    let service = task_service(&conn);
    let task = service.create_task(&session, "temp", category_id).unwrap();

    service.delete_task(&session, task.id).unwrap();
    assert!(service.get_task(&session, task.id).unwrap().is_none());
}

#[test]
fn blank_content_is_rejected() {
    let (conn, session, category_id) = setup();
    let err = task_service(&conn)
        .create_task(&session, " ", category_id)
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}
