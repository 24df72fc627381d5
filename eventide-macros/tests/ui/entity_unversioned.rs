use eventide_domain::entity::Entity;
use eventide_macros::entity;

#[entity(versioned = false)]
#[derive(PartialEq)]
struct Tag {
    label: String,
}

fn main() {
    let tag = Tag {
        id: "t-1".to_string(),
        label: "red".to_string(),
    };
    assert_eq!(tag.version(), None);
    assert_eq!(tag.clone(), tag);
}
