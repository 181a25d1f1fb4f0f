//! # Goal Repository
//!
//! Goals live in the `goals` subcollection of the owning account document
//! (`users/{uid}/goals/{goalId}`), one JSON document per goal, listed in
//! creation order.
//!
//! Records written by older clients may lack `difficulty`, carry a value
//! outside easy/medium/hard, or hold amounts as plain JSON numbers. They
//! still load: amounts are accepted in either form and the difficulty falls
//! back to medium with a warning. Documents that cannot be read at all are
//! skipped and logged.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::domain::models::{Difficulty, Goal};
use crate::backend::storage::repositories::account_repository::USERS_COLLECTION;
use crate::backend::storage::traits::DocumentStore;

pub const GOALS_SUBCOLLECTION: &str = "goals";

/// Stored form of a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalRecord {
    #[serde(skip)]
    id: String,
    #[serde(default)]
    goal_name: String,
    #[serde(default)]
    description: String,
    target_amount: Decimal,
    #[serde(default)]
    current_saving: Decimal,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    difficulty: Option<String>,
    created_date: String,
    #[serde(default)]
    deadline_date: Option<String>,
}

impl From<&Goal> for GoalRecord {
    fn from(goal: &Goal) -> Self {
        GoalRecord {
            id: goal.id.clone(),
            goal_name: goal.goal_name.clone(),
            description: goal.description.clone(),
            target_amount: goal.target_amount,
            current_saving: goal.current_saving,
            completed: goal.completed,
            difficulty: Some(goal.difficulty.as_str().to_string()),
            created_date: goal.created_date.to_rfc3339(),
            deadline_date: goal.deadline_date.map(|d| d.to_rfc3339()),
        }
    }
}

impl TryFrom<GoalRecord> for Goal {
    type Error = anyhow::Error;

    fn try_from(record: GoalRecord) -> Result<Self> {
        let (difficulty, fallback) = Difficulty::from_stored(record.difficulty.as_deref());
        if fallback {
            warn!(
                "Goal {} has unrecognised difficulty {:?}, ranking it as {}",
                record.id, record.difficulty, difficulty
            );
        }

        let created_date = parse_timestamp(&record.created_date)
            .ok_or_else(|| anyhow!("invalid createdDate '{}'", record.created_date))?;
        let deadline_date = match record.deadline_date.as_deref() {
            Some(text) => Some(
                parse_timestamp(text).ok_or_else(|| anyhow!("invalid deadlineDate '{}'", text))?,
            ),
            None => None,
        };

        Ok(Goal {
            id: record.id,
            goal_name: record.goal_name,
            description: record.description,
            target_amount: record.target_amount,
            current_saving: record.current_saving,
            completed: record.completed,
            difficulty,
            created_date,
            deadline_date,
        })
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

#[derive(Clone)]
pub struct GoalRepository {
    store: Arc<dyn DocumentStore>,
}

impl GoalRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Store a new goal and return it with the id the store assigned
    pub async fn add(&self, uid: &str, goal: Goal) -> Result<Goal> {
        let document = serde_json::to_value(GoalRecord::from(&goal))?;
        let id = self
            .store
            .add_to_subcollection(USERS_COLLECTION, uid, GOALS_SUBCOLLECTION, &document)
            .await?;
        debug!("Stored goal {} for {}", id, uid);

        Ok(Goal { id, ..goal })
    }

    /// Every readable goal of `uid` in creation order
    pub async fn list(&self, uid: &str) -> Result<Vec<Goal>> {
        let documents = self
            .store
            .stream_subcollection(USERS_COLLECTION, uid, GOALS_SUBCOLLECTION)
            .await?;

        let mut goals = Vec::with_capacity(documents.len());
        for stored in documents {
            let decoded = serde_json::from_value::<GoalRecord>(stored.data)
                .map_err(anyhow::Error::from)
                .and_then(|mut record| {
                    record.id = stored.id.clone();
                    Goal::try_from(record)
                });
            match decoded {
                Ok(goal) => goals.push(goal),
                Err(e) => warn!("Skipping unreadable goal {} of {}: {:#}", stored.id, uid, e),
            }
        }
        Ok(goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::{DbConnection, SqliteDocumentStore};
    use rust_decimal_macros::dec;
    use serde_json::json;

    async fn repository() -> (GoalRepository, Arc<dyn DocumentStore>) {
        let store: Arc<dyn DocumentStore> =
            Arc::new(SqliteDocumentStore::new(DbConnection::in_memory().await.unwrap()));
        (GoalRepository::new(store.clone()), store)
    }

    fn sample_goal(name: &str, difficulty: Difficulty) -> Goal {
        Goal {
            id: String::new(),
            goal_name: name.to_string(),
            description: "save up".to_string(),
            target_amount: dec!(1500.75),
            current_saving: Decimal::ZERO,
            completed: false,
            difficulty,
            created_date: Utc::now(),
            deadline_date: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn add_assigns_id_and_list_round_trips() {
        let (repo, _) = repository().await;
        let laptop = repo.add("u1", sample_goal("laptop", Difficulty::Hard)).await.unwrap();
        let trip = repo.add("u1", sample_goal("trip", Difficulty::Easy)).await.unwrap();
        assert!(!laptop.id.is_empty());
        assert_ne!(laptop.id, trip.id);

        let goals = repo.list("u1").await.unwrap();
        assert_eq!(goals, vec![laptop, trip]);
        assert!(repo.list("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn legacy_records_fall_back_to_medium() {
        let (repo, store) = repository().await;
        store
            .add_to_subcollection(
                USERS_COLLECTION,
                "u1",
                GOALS_SUBCOLLECTION,
                &json!({
                    "goalName": "bike",
                    "targetAmount": 300,
                    "createdDate": "2025-01-05T10:00:00Z",
                    "difficulty": "extreme"
                }),
            )
            .await
            .unwrap();
        store
            .add_to_subcollection(
                USERS_COLLECTION,
                "u1",
                GOALS_SUBCOLLECTION,
                &json!({
                    "goalName": "phone",
                    "targetAmount": "899.99",
                    "currentSaving": 12.5,
                    "createdDate": "2025-01-06T10:00:00Z"
                }),
            )
            .await
            .unwrap();

        let goals = repo.list("u1").await.unwrap();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].difficulty, Difficulty::Medium);
        assert_eq!(goals[0].target_amount, dec!(300));
        assert_eq!(goals[1].difficulty, Difficulty::Medium);
        assert_eq!(goals[1].current_saving, dec!(12.5));
        assert!(!goals[1].completed);
    }

    #[tokio::test]
    async fn unreadable_records_are_skipped() {
        let (repo, store) = repository().await;
        store
            .add_to_subcollection(USERS_COLLECTION, "u1", GOALS_SUBCOLLECTION, &json!({ "goalName": "broken" }))
            .await
            .unwrap();
        repo.add("u1", sample_goal("ok", Difficulty::Medium)).await.unwrap();

        let goals = repo.list("u1").await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].goal_name, "ok");
    }
}
