pub mod account;
pub mod chat;
pub mod entry;
pub mod goal;

pub use account::{Account, INITIAL_BALANCE};
pub use chat::{ChatMessage, ChatRole};
pub use entry::{Category, Entry, RecordType};
pub use goal::{Difficulty, Goal};
