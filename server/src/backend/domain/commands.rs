//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs of the `shared`
//! crate to these types. Input fields stay untyped (`Option<String>`) here so
//! that all validation happens in one place, inside the services.

pub mod ledger {
    use rust_decimal::Decimal;

    use crate::backend::domain::models::Entry;
    use crate::backend::domain::period_key::PeriodKey;

    /// Input for recording an income or expenditure entry.
    #[derive(Debug, Clone, Default)]
    pub struct RecordEntryCommand {
        pub uid: String,
        pub record_type: Option<String>,
        /// Amount as received, e.g. `"12.50"` or `"1e3"`
        pub amount: Option<String>,
        pub category: Option<String>,
        pub source: Option<String>,
        pub description: Option<String>,
    }

    /// Result of recording an entry.
    #[derive(Debug, Clone)]
    pub struct RecordEntryResult {
        pub entry: Entry,
        pub period_key: PeriodKey,
        pub balance: Decimal,
    }

    /// Query for one period bucket.
    #[derive(Debug, Clone, Default)]
    pub struct TransactionListQuery {
        pub uid: String,
        pub record_type: Option<String>,
        /// `MM-YYYY`
        pub month_year: Option<String>,
    }

    /// Result of listing a period bucket.
    #[derive(Debug, Clone)]
    pub struct TransactionListResult {
        pub period_key: PeriodKey,
        pub entries: Vec<Entry>,
    }

    /// Query for the totals of one month.
    #[derive(Debug, Clone, Default)]
    pub struct MonthSummaryQuery {
        pub uid: String,
        pub month_year: Option<String>,
    }
}

pub mod goal {
    use crate::backend::domain::models::Goal;

    /// Input for creating a goal.
    #[derive(Debug, Clone, Default)]
    pub struct CreateGoalCommand {
        pub uid: String,
        pub goal_name: Option<String>,
        pub description: Option<String>,
        pub target_amount: Option<String>,
        pub difficulty: Option<String>,
        pub deadline_date: Option<String>,
    }

    /// The goal to work on next. `None` means every goal is completed (or
    /// there are none), which is not an error.
    #[derive(Debug, Clone)]
    pub struct TopGoalResult {
        pub goal: Option<Goal>,
    }
}

pub mod account {
    use rust_decimal::Decimal;

    #[derive(Clone)]
    pub struct RegisterCommand {
        pub email: String,
        pub password: String,
        pub name: Option<String>,
    }

    // Credentials never reach the logs.
    impl std::fmt::Debug for RegisterCommand {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("RegisterCommand")
                .field("email", &self.email)
                .field("name", &self.name)
                .finish_non_exhaustive()
        }
    }

    #[derive(Clone)]
    pub struct LoginCommand {
        pub email: String,
        pub password: String,
    }

    impl std::fmt::Debug for LoginCommand {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("LoginCommand")
                .field("email", &self.email)
                .finish_non_exhaustive()
        }
    }

    /// Identity provider data merged with the ledger balance.
    #[derive(Debug, Clone)]
    pub struct ProfileResult {
        pub uid: String,
        pub email: String,
        pub name: Option<String>,
        pub balance: Decimal,
    }
}

pub mod chat {
    /// One turn of a budgeting conversation.
    #[derive(Debug, Clone)]
    pub struct BudgetChatCommand {
        /// Absent on the first message of a conversation
        pub session_id: Option<String>,
        /// Account whose balance seeds a new conversation
        pub uid: Option<String>,
        pub message: String,
    }

    #[derive(Debug, Clone)]
    pub struct BudgetChatResult {
        pub session_id: String,
        pub reply: String,
    }
}
