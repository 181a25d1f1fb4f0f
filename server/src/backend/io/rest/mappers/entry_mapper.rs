use shared::{
    CategoryTotal, CreateEntryRequest, CreateEntryResponse, MonthSummaryResponse,
    TransactionListRequest, TransactionListResponse,
};

use super::amount_text;
use crate::backend::domain::commands::ledger::{
    MonthSummaryQuery, RecordEntryCommand, RecordEntryResult, TransactionListQuery,
    TransactionListResult,
};
use crate::backend::domain::ledger::MonthSummary;
use crate::backend::domain::models::Entry;

pub struct EntryMapper;

impl EntryMapper {
    /// Convert a domain Entry to the shared Entry DTO
    pub fn to_dto(entry: Entry) -> shared::Entry {
        shared::Entry {
            amount: entry.amount,
            record_type: entry.record_type.as_str().to_string(),
            category: entry.category.map(|c| c.as_str().to_string()),
            source: entry.source,
            description: entry.description,
            recorded_at: entry.recorded_at.to_rfc3339(),
        }
    }

    pub fn to_record_command(uid: String, request: CreateEntryRequest) -> RecordEntryCommand {
        RecordEntryCommand {
            uid,
            record_type: request.record_type,
            amount: amount_text(request.amount),
            category: request.category,
            source: request.source,
            description: request.description,
        }
    }

    pub fn to_create_response(result: RecordEntryResult) -> CreateEntryResponse {
        CreateEntryResponse {
            message: "Transaction recorded".to_string(),
            entry: Self::to_dto(result.entry),
            period_key: result.period_key.as_str().to_string(),
            balance: result.balance,
        }
    }

    pub fn to_list_query(uid: String, request: TransactionListRequest) -> TransactionListQuery {
        TransactionListQuery {
            uid,
            record_type: request.record_type,
            month_year: request.month_year,
        }
    }

    pub fn to_list_response(result: TransactionListResult) -> TransactionListResponse {
        TransactionListResponse {
            period_key: result.period_key.as_str().to_string(),
            transactions: result.entries.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_summary_query(uid: String, month_year: Option<String>) -> MonthSummaryQuery {
        MonthSummaryQuery { uid, month_year }
    }

    pub fn to_summary_response(summary: MonthSummary) -> MonthSummaryResponse {
        MonthSummaryResponse {
            month_year: summary.period.to_string(),
            total_income: summary.total_income,
            total_expenditure: summary.total_expenditure,
            net: summary.net,
            income_count: summary.income_count,
            expenditure_count: summary.expenditure_count,
            expenditure_by_category: summary
                .expenditure_by_category
                .into_iter()
                .map(|(category, total)| CategoryTotal {
                    category: category.as_str().to_string(),
                    total,
                })
                .collect(),
        }
    }
}
