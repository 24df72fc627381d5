use eventide_domain::command::Command;
use eventide_macros::command;

#[command(name = "account.open", create)]
struct OpenAccount {
    owner: String,
}

#[command]
struct Deposit {
    aggregate_id: String,
    amount: i64,
}

fn main() {
    let open = OpenAccount {
        aggregate_id: "a-1".to_string(),
        owner: "alice".to_string(),
    };
    assert_eq!(open.command_type(), "account.open");
    assert!(open.creates_aggregate());

    let deposit = Deposit {
        aggregate_id: "a-1".to_string(),
        amount: 5,
    };
    let boxed: Box<dyn Command> = Box::new(deposit.clone());
    assert_eq!(boxed.command_type(), "Deposit");
    assert!(!boxed.creates_aggregate());
    assert_eq!(boxed.downcast_ref::<Deposit>().map(|d| d.amount), Some(5));
}
