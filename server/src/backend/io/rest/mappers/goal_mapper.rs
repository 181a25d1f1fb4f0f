use shared::{CreateGoalRequest, GoalListResponse, TopGoalResponse};

use super::amount_text;
use crate::backend::domain::commands::goal::{CreateGoalCommand, TopGoalResult};
use crate::backend::domain::models::Goal;

pub struct GoalMapper;

impl GoalMapper {
    /// Convert a domain Goal to the shared Goal DTO
    pub fn to_dto(goal: Goal) -> shared::Goal {
        shared::Goal {
            id: goal.id,
            goal_name: goal.goal_name,
            description: goal.description,
            target_amount: goal.target_amount,
            current_saving: goal.current_saving,
            completed: goal.completed,
            difficulty: goal.difficulty.as_str().to_string(),
            created_date: goal.created_date.to_rfc3339(),
            deadline_date: goal.deadline_date.map(|d| d.to_rfc3339()),
        }
    }

    pub fn to_create_command(uid: String, request: CreateGoalRequest) -> CreateGoalCommand {
        CreateGoalCommand {
            uid,
            goal_name: request.goal_name,
            description: request.description,
            target_amount: amount_text(request.target_amount),
            difficulty: request.difficulty,
            deadline_date: request.deadline_date,
        }
    }

    pub fn to_list_response(goals: Vec<Goal>) -> GoalListResponse {
        GoalListResponse {
            goals: goals.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_top_response(result: TopGoalResult) -> TopGoalResponse {
        match result.goal {
            Some(goal) => TopGoalResponse {
                goal: Some(Self::to_dto(goal)),
                message: None,
            },
            None => TopGoalResponse {
                goal: None,
                message: Some("No uncompleted goals".to_string()),
            },
        }
    }
}
