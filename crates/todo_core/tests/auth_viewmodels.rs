use todo_core::db::open_db_in_memory;
use todo_core::{
    AccountError, LoginViewModel, MemorySessionStore, RegisterViewModel, SessionStore,
};

fn fill_register<S: SessionStore>(vm: &mut RegisterViewModel<'_, S>, name: &str, password: &str) {
    vm.update_username(name);
    vm.update_password(password);
    vm.update_confirm_password(password);
}

#[test]
fn register_reports_field_errors_without_touching_store() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let mut vm = RegisterViewModel::new(&conn, &sessions);
    vm.update_username("ab");
    vm.update_password("lowercase1");

    let err = vm.register().unwrap_err();

    assert!(matches!(err, AccountError::Validation(_)));
    let errors = vm.errors();
    assert_eq!(
        errors.username.as_deref(),
        Some("Username must be at least 3 characters")
    );
    assert_eq!(
        errors.password.as_deref(),
        Some("Password must contain at least one uppercase letter")
    );
    assert_eq!(
        errors.confirm_password.as_deref(),
        Some("Please confirm your password")
    );
    assert_eq!(vm.general_error(), Some("Please fix the validation errors"));
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM account;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn editing_a_field_clears_only_its_error() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let mut vm = RegisterViewModel::new(&conn, &sessions);
    assert!(!vm.validate_form());
    assert!(vm.errors().username.is_some());
    assert!(vm.errors().password.is_some());

    vm.update_username("alice");

    assert!(vm.errors().username.is_none());
    assert_eq!(vm.errors().password.as_deref(), Some("Password is required"));
}

#[test]
fn password_edit_rechecks_non_empty_confirmation() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let mut vm = RegisterViewModel::new(&conn, &sessions);
    vm.update_password("Secret123");
    vm.update_confirm_password("Secret123");

    vm.update_password("Secret124");
    assert_eq!(
        vm.errors().confirm_password.as_deref(),
        Some("Passwords do not match")
    );

    vm.update_password("Secret123");
    assert!(vm.errors().confirm_password.is_none());
}

#[test]
fn duplicate_registration_sets_general_error() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let mut vm = RegisterViewModel::new(&conn, &sessions);
    fill_register(&mut vm, "alice", "Secret123");
    vm.register().unwrap();

    let err = vm.register().unwrap_err();

    assert!(matches!(err, AccountError::DuplicateUsername(_)));
    assert_eq!(
        vm.general_error(),
        Some("Username already exists: alice")
    );
    assert!(vm.errors().is_empty());

    vm.reset_form();
    assert!(vm.general_error().is_none());
    assert!(vm.form().username.is_empty());
}

#[test]
fn login_after_register_sets_session() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let mut register = RegisterViewModel::new(&conn, &sessions);
    fill_register(&mut register, "alice", "Secret123");
    let account = register.register().unwrap();

    let mut login = LoginViewModel::new(&conn, &sessions);
    login.update_username("alice");
    login.update_password("Secret123");
    assert_eq!(login.username(), "alice");
    assert_eq!(login.password(), "Secret123");
    let session = login.login().unwrap();

    assert_eq!(session.account_id(), account.id);
    assert_eq!(sessions.load().unwrap(), Some(account.id));
    assert!(login.general_error().is_none());
}

#[test]
fn login_failures_land_in_general_error() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let mut register = RegisterViewModel::new(&conn, &sessions);
    fill_register(&mut register, "alice", "Secret123");
    register.register().unwrap();

    let mut login = LoginViewModel::new(&conn, &sessions);
    login.update_username("nobody");
    login.update_password("whatever");
    assert!(matches!(login.login(), Err(AccountError::AccountNotFound)));
    assert_eq!(login.general_error(), Some("Username not exists"));

    login.update_username("alice");
    login.update_password("wrongpass");
    assert!(matches!(login.login(), Err(AccountError::IncorrectPassword)));
    assert_eq!(login.general_error(), Some("Password incorrect"));
    assert!(sessions.load().unwrap().is_none());
}

#[test]
fn login_field_errors_block_store_access() {
    let conn = open_db_in_memory().unwrap();
    let sessions = MemorySessionStore::new();
    let mut login = LoginViewModel::new(&conn, &sessions);
    login.update_username("bad name");
    login.update_password("123");

    assert!(matches!(login.login(), Err(AccountError::Validation(_))));
    assert_eq!(
        login.errors().username.as_deref(),
        Some("Username can only contain letters, numbers, and underscores")
    );
    assert_eq!(
        login.errors().password.as_deref(),
        Some("Password must be at least 6 characters")
    );

    assert_eq!(
        login.general_error(),
        Some("Please fix the validation errors")
    );

    login.update_password("123456");
    assert!(login.errors().password.is_none());
    login.clear_errors();
    assert!(login.errors().is_empty());
    assert!(login.general_error().is_none());

    login.reset_form();
    assert!(login.username().is_empty());
    assert!(login.password().is_empty());
}
