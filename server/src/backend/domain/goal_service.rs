//! Goal service domain logic.
//!
//! Creating and listing savings goals, and picking the single goal a user
//! should work on next.
//!
//! ## Business Rules
//!
//! - Goal name must not be empty
//! - Target amount must be positive; saving starts at zero
//! - Difficulty is one of easy/medium/hard and defaults to medium
//! - Goals are only completed externally; completed goals never rank

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use crate::backend::domain::commands::goal::{CreateGoalCommand, TopGoalResult};
use crate::backend::domain::errors::{DomainError, DomainResult};
use crate::backend::domain::goal_ranker::select_top_goal;
use crate::backend::domain::ledger_service::account_not_found;
use crate::backend::domain::models::entry::parse_amount;
use crate::backend::domain::models::goal::parse_deadline;
use crate::backend::domain::models::{Difficulty, Goal};
use crate::backend::storage::{AccountRepository, DocumentStore, GoalRepository};

#[derive(Clone)]
pub struct GoalService {
    accounts: AccountRepository,
    goals: GoalRepository,
}

impl GoalService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            accounts: AccountRepository::new(store.clone()),
            goals: GoalRepository::new(store),
        }
    }

    /// Create a new goal
    pub async fn add_goal(&self, command: CreateGoalCommand) -> DomainResult<Goal> {
        info!("Creating goal: {:?}", command);

        let goal_name = command
            .goal_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| DomainError::invalid("goalName is required"))?
            .to_string();

        let target_amount = parse_amount(command.target_amount.as_deref(), "targetAmount")?;
        if target_amount <= Decimal::ZERO {
            return Err(DomainError::invalid("targetAmount must be positive"));
        }

        let difficulty = match command.difficulty.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(token) => token.parse::<Difficulty>()?,
            None => Difficulty::default(),
        };

        let deadline_date = match command.deadline_date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(text) => Some(parse_deadline(text)?),
            None => None,
        };

        self.require_account(&command.uid).await?;

        let goal = Goal {
            id: String::new(),
            goal_name,
            description: command.description.unwrap_or_default(),
            target_amount,
            current_saving: Decimal::ZERO,
            completed: false,
            difficulty,
            created_date: Utc::now(),
            deadline_date,
        };
        let goal = self.goals.add(&command.uid, goal).await?;

        info!("Successfully created goal: {}", goal.id);
        Ok(goal)
    }

    /// All goals of an account in creation order
    pub async fn list_goals(&self, uid: &str) -> DomainResult<Vec<Goal>> {
        info!("Listing goals for {}", uid);
        self.require_account(uid).await?;
        Ok(self.goals.list(uid).await?)
    }

    /// The highest priority incomplete goal
    pub async fn top_goal(&self, uid: &str) -> DomainResult<TopGoalResult> {
        info!("Selecting top goal for {}", uid);
        let goals = self.list_goals(uid).await?;
        let goal = select_top_goal(&goals).cloned();

        match &goal {
            Some(goal) => info!("Top goal for {} is {} ({})", uid, goal.id, goal.difficulty),
            None => info!("No uncompleted goals for {}", uid),
        }
        Ok(TopGoalResult { goal })
    }

    async fn require_account(&self, uid: &str) -> DomainResult<()> {
        if self.accounts.exists(uid).await? {
            Ok(())
        } else {
            Err(account_not_found(uid))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::Account;
    use crate::backend::storage::repositories::account_repository::USERS_COLLECTION;
    use crate::backend::storage::repositories::goal_repository::GOALS_SUBCOLLECTION;
    use crate::backend::test_utils::TestEnvironment;
    use rust_decimal_macros::dec;
    use serde_json::json;

    async fn create_test_service() -> (GoalService, Arc<dyn DocumentStore>) {
        let env = TestEnvironment::new().await;
        AccountRepository::new(env.store.clone())
            .create("u1", &Account::new("ada@example.com", "Ada"))
            .await
            .unwrap();
        (GoalService::new(env.store.clone()), env.store)
    }

    fn create(name: &str, amount: &str, difficulty: Option<&str>) -> CreateGoalCommand {
        CreateGoalCommand {
            uid: "u1".to_string(),
            goal_name: Some(name.to_string()),
            description: None,
            target_amount: Some(amount.to_string()),
            difficulty: difficulty.map(str::to_string),
            deadline_date: None,
        }
    }

    #[tokio::test]
    async fn add_goal_applies_defaults() {
        let (service, _) = create_test_service().await;

        let goal = service.add_goal(create("laptop", "1500", None)).await.unwrap();
        assert!(!goal.id.is_empty());
        assert_eq!(goal.goal_name, "laptop");
        assert_eq!(goal.difficulty, Difficulty::Medium);
        assert_eq!(goal.current_saving, Decimal::ZERO);
        assert!(!goal.completed);
        assert!(goal.deadline_date.is_none());
        assert_eq!(service.list_goals("u1").await.unwrap(), vec![goal]);
    }

    #[tokio::test]
    async fn add_goal_parses_deadline() {
        let (service, _) = create_test_service().await;
        let goal = service
            .add_goal(CreateGoalCommand {
                deadline_date: Some("2026-12-31".to_string()),
                ..create("trip", "800", Some("easy"))
            })
            .await
            .unwrap();
        assert_eq!(goal.deadline_date.unwrap().to_rfc3339(), "2026-12-31T00:00:00+00:00");
    }

    #[tokio::test]
    async fn invalid_goals_are_rejected() {
        let (service, _) = create_test_service().await;

        for bad in [
            create("", "100", None),
            create("x", "0", None),
            create("x", "-1", None),
            create("x", "lots", None),
            create("x", "100", Some("impossible")),
            CreateGoalCommand {
                deadline_date: Some("next week".to_string()),
                ..create("x", "100", None)
            },
        ] {
            let err = service.add_goal(bad).await.unwrap_err();
            assert!(matches!(err, DomainError::InvalidArgument(_)), "{:?}", err);
        }
        assert!(service.list_goals("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn goals_for_unknown_account_are_not_found() {
        let (service, _) = create_test_service().await;
        let command = CreateGoalCommand {
            uid: "ghost".to_string(),
            ..create("x", "100", None)
        };
        assert!(matches!(service.add_goal(command).await, Err(DomainError::NotFound(_))));
        assert!(matches!(service.top_goal("ghost").await, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn top_goal_prefers_hard_then_largest_target() {
        let (service, _) = create_test_service().await;
        service.add_goal(create("a", "100", Some("hard"))).await.unwrap();
        service.add_goal(create("b", "500", Some("medium"))).await.unwrap();
        service.add_goal(create("c", "50", Some("hard"))).await.unwrap();
        service.add_goal(create("d", "900", Some("easy"))).await.unwrap();

        let top = service.top_goal("u1").await.unwrap().goal.unwrap();
        assert_eq!(top.goal_name, "a");
        assert_eq!(top.target_amount, dec!(100));
    }

    #[tokio::test]
    async fn top_goal_without_incomplete_goals_is_none() {
        let (service, store) = create_test_service().await;
        assert!(service.top_goal("u1").await.unwrap().goal.is_none());

        store
            .add_to_subcollection(
                USERS_COLLECTION,
                "u1",
                GOALS_SUBCOLLECTION,
                &json!({
                    "goalName": "done",
                    "targetAmount": "1000",
                    "completed": true,
                    "difficulty": "hard",
                    "createdDate": "2025-01-01T00:00:00Z"
                }),
            )
            .await
            .unwrap();
        assert!(service.top_goal("u1").await.unwrap().goal.is_none());
    }

    #[tokio::test]
    async fn stored_goal_without_difficulty_ranks_as_medium() {
        let (service, store) = create_test_service().await;
        store
            .add_to_subcollection(
                USERS_COLLECTION,
                "u1",
                GOALS_SUBCOLLECTION,
                &json!({
                    "goalName": "legacy",
                    "targetAmount": 700,
                    "createdDate": "2025-01-01T00:00:00Z"
                }),
            )
            .await
            .unwrap();
        service.add_goal(create("easy-big", "5000", Some("easy"))).await.unwrap();
        service.add_goal(create("medium-small", "100", Some("medium"))).await.unwrap();

        let top = service.top_goal("u1").await.unwrap().goal.unwrap();
        assert_eq!(top.goal_name, "legacy");
        assert_eq!(top.difficulty, Difficulty::Medium);
    }
}
