use super::*;

#[test]
fn viewer_minimum_allows_any_role() {
    let admin = Principal { user: "a".to_string(), role: Role::Admin };
    let viewer = Principal { user: "v".to_string(), role: Role::Viewer };
    assert!(require_role(&admin, Role::Viewer).is_ok());
    assert!(require_role(&viewer, Role::Viewer).is_ok());
}

#[test]
fn admin_minimum_rejects_viewer() {
    let viewer = Principal { user: "v".to_string(), role: Role::Viewer };
    assert_eq!(require_role(&viewer, Role::Admin), Err(AuthError::Forbidden));
}

#[test]
fn admin_minimum_allows_admin() {
    let admin = Principal { user: "a".to_string(), role: Role::Admin };
    assert!(require_role(&admin, Role::Admin).is_ok());
}
