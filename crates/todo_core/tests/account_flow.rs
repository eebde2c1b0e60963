use todo_core::db::open_db_in_memory;
use todo_core::{
    hash_password, AccountError, AccountRepository, AccountService, LoginRequest,
    MemorySessionStore, RegisterRequest, SessionStore, SqliteAccountRepository,
};

fn register_request(username: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        password: password.to_string(),
        confirm_password: password.to_string(),
    }
}

fn login_request(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[test]
fn register_stores_hashed_password_retrievable_by_username() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let service = AccountService::new(SqliteAccountRepository::try_new(&conn).unwrap(), &sessions);

    let account = service
        .register(&register_request("alice_01", "Secret123"))
        .unwrap();

    let repo = SqliteAccountRepository::try_new(&conn).unwrap();
    let stored = repo.find_by_username("alice_01").unwrap().unwrap();
    assert_eq!(stored.id, account.id);
    assert_ne!(stored.password_hash, "Secret123");
    assert_eq!(stored.password_hash, hash_password("Secret123"));
    assert!(sessions.load().unwrap().is_none(), "register must not log in");
}

#[test]
fn register_duplicate_username_fails() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let service = AccountService::new(SqliteAccountRepository::try_new(&conn).unwrap(), &sessions);

    service
        .register(&register_request("alice", "Secret123"))
        .unwrap();
    let err = service
        .register(&register_request("alice", "Other456x"))
        .unwrap_err();
    assert!(matches!(err, AccountError::DuplicateUsername(ref name) if name == "alice"));
}

#[test]
fn register_invalid_form_never_reaches_store() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let service = AccountService::new(SqliteAccountRepository::try_new(&conn).unwrap(), &sessions);

    let err = service
        .register(&register_request("alice", "password"))
        .unwrap_err();
    match err {
        AccountError::Validation(errors) => assert_eq!(
            errors.password.as_deref(),
            Some("Password must contain at least one uppercase letter")
        ),
        other => panic!("unexpected error: {other}"),
    }

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM account;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn login_with_correct_credentials_sets_session() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let service = AccountService::new(SqliteAccountRepository::try_new(&conn).unwrap(), &sessions);
    let account = service
        .register(&register_request("alice", "Secret123"))
        .unwrap();

    let session = service
        .login(&login_request("alice", "Secret123"))
        .unwrap();

    assert_eq!(session.account_id(), account.id);
    assert_eq!(sessions.load().unwrap(), Some(account.id));
}

#[test]
fn login_failures_report_distinct_errors_and_leave_session_unset() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let service = AccountService::new(SqliteAccountRepository::try_new(&conn).unwrap(), &sessions);
    service
        .register(&register_request("alice", "Secret123"))
        .unwrap();

    let wrong_password = service
        .login(&login_request("alice", "Secret124"))
        .unwrap_err();
    assert!(matches!(wrong_password, AccountError::IncorrectPassword));
    assert_eq!(wrong_password.to_string(), "Password incorrect");

    let unknown = service
        .login(&login_request("bob_the_user", "Secret123"))
        .unwrap_err();
    assert!(matches!(unknown, AccountError::AccountNotFound));
    assert_eq!(unknown.to_string(), "Username not exists");

    assert!(sessions.load().unwrap().is_none());
}

#[test]
fn logout_clears_session() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let service = AccountService::new(SqliteAccountRepository::try_new(&conn).unwrap(), &sessions);
    service
        .register(&register_request("alice", "Secret123"))
        .unwrap();
    service
        .login(&login_request("alice", "Secret123"))
        .unwrap();

    service.logout().unwrap();
    assert!(sessions.load().unwrap().is_none());
    assert!(service.current_session().unwrap().is_none());
}

#[test]
fn current_session_clears_stale_account_id() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    sessions.save(uuid::Uuid::new_v4()).unwrap();
    let service = AccountService::new(SqliteAccountRepository::try_new(&conn).unwrap(), &sessions);

    assert!(service.current_session().unwrap().is_none());
    assert!(sessions.load().unwrap().is_none());
}

#[test]
fn current_session_restores_logged_in_account() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let service = AccountService::new(SqliteAccountRepository::try_new(&conn).unwrap(), &sessions);
    let account = service
        .register(&register_request("alice", "Secret123"))
        .unwrap();
    service
        .login(&login_request("alice", "Secret123"))
        .unwrap();

    let session = service.current_session().unwrap().unwrap();
    let restored = service.current_account(&session).unwrap().unwrap();
    assert_eq!(restored.username, account.username);
}
