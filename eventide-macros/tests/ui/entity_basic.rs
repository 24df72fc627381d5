use eventide_domain::entity::Entity;
use eventide_macros::entity;

#[entity]
struct AccountView {
    owner: String,
    balance: i64,
}

#[entity(debug = false)]
struct AuditView {
    entries: Vec<String>,
}

impl std::fmt::Debug for AuditView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuditView(..)")
    }
}

fn main() {
    let view = AccountView {
        id: "a-1".to_string(),
        version: 2,
        owner: "alice".to_string(),
        balance: 10,
    };
    assert_eq!(view.id(), "a-1");
    assert_eq!(Entity::version(&view), Some(2));
    let _ = format!("{:?}", view.clone());

    let audit = AuditView::default();
    let _ = format!("{:?}", audit);
}
