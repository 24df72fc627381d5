#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use eventide_application::{AppError, CommandHandler};
use eventide_domain::aggregate::{Aggregate, AggregateBase};
use eventide_domain::command::Command;
use eventide_domain::context::Context;
use eventide_domain::domain_event::Event;
use eventide_domain::error::{DomainError, DomainResult};
use eventide_domain::persist::AggregateStore;
use eventide_macros::command;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const ACCOUNT: &str = "account";

#[command(name = "account.open", create)]
pub struct OpenAccount {
    pub owner: String,
}

#[command(name = "account.deposit")]
pub struct Deposit {
    pub amount: i64,
}

pub fn new_id() -> String {
    ulid::Ulid::new().to_string()
}

pub fn deposit(id: &str, amount: i64) -> Deposit {
    Deposit {
        aggregate_id: id.to_string(),
        amount,
    }
}

#[derive(Debug)]
pub struct Deposited {
    pub amount: i64,
}

/// 记录收到的命令，事件应用为空操作
#[derive(Debug)]
pub struct Account {
    base: AggregateBase,
    log: Arc<Mutex<Vec<String>>>,
    fail: Option<&'static str>,
}

impl Aggregate for Account {
    fn base(&self) -> &AggregateBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AggregateBase {
        &mut self.base
    }

    fn handle_command(&mut self, ctx: &Context, command: &dyn Command) -> DomainResult<()> {
        if let Some(reason) = self.fail {
            return Err(DomainError::invalid_command(reason));
        }
        self.log.lock().unwrap().push(command.command_type().to_string());

        let amount = command.downcast_ref::<Deposit>().map_or(0, |d| d.amount);
        self.base.append_event(
            ctx,
            "Deposited",
            Some(Arc::new(Deposited { amount })),
            Utc::now(),
        );
        Ok(())
    }

    fn apply_event(&mut self, _ctx: &Context, _event: &Event) -> DomainResult<()> {
        Ok(())
    }
}

/// 聚合存储替身：`known` 中的 ID 视为已有历史（版本 1）
#[derive(Clone, Default)]
pub struct SpyStore {
    pub known: Arc<Mutex<HashSet<String>>>,
    pub log: Arc<Mutex<Vec<String>>>,
    pub saved: Arc<Mutex<Vec<(String, usize)>>>,
    pub fail_command: Option<&'static str>,
    pub fail_save: Option<&'static str>,
}

impl SpyStore {
    pub fn with_known(id: &str) -> Self {
        let store = Self::default();
        store.known.lock().unwrap().insert(id.to_string());
        store
    }
}

#[async_trait]
impl AggregateStore for SpyStore {
    async fn load(
        &self,
        _ctx: &Context,
        aggregate_type: &str,
        id: &str,
    ) -> DomainResult<Box<dyn Aggregate>> {
        let mut base = AggregateBase::new(aggregate_type, id);
        if self.known.lock().unwrap().contains(id) {
            base.set_version(1);
        }
        Ok(Box::new(Account {
            base,
            log: self.log.clone(),
            fail: self.fail_command,
        }))
    }

    async fn save(&self, _ctx: &Context, aggregate: &mut dyn Aggregate) -> DomainResult<()> {
        if let Some(reason) = self.fail_save {
            return Err(DomainError::event_store(reason));
        }
        self.saved.lock().unwrap().push((
            aggregate.id().to_string(),
            aggregate.uncommitted_events().len(),
        ));
        aggregate.base_mut().commit();
        Ok(())
    }
}

/// 命令处理器替身：记录收到的命令，可按命令类型注入失败
#[derive(Clone, Default)]
pub struct SpyHandler {
    pub commands: Arc<Mutex<Vec<Box<dyn Command>>>>,
    pub fail_on: Option<&'static str>,
}

impl SpyHandler {
    pub fn handled_types(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.command_type().to_string())
            .collect()
    }
}

#[async_trait]
impl CommandHandler for SpyHandler {
    async fn handle(&self, _ctx: &Context, command: Box<dyn Command>) -> Result<(), AppError> {
        let failed = self.fail_on == Some(command.command_type());
        let aggregate_id = command.aggregate_id().to_string();
        self.commands.lock().unwrap().push(command);
        if failed {
            return Err(AppError::Infra(format!("rejected {aggregate_id}")));
        }
        Ok(())
    }
}
