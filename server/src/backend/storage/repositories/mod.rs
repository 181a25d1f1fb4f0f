// Repository modules
pub mod account_repository;
pub mod goal_repository;

// Re-export repository types
pub use account_repository::AccountRepository;
pub use goal_repository::GoalRepository;
