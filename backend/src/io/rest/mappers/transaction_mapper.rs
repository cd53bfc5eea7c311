use anyhow::Result;

use super::{format_date, parse_optional_date, StudentMapper};
use crate::domain::commands::ledger::{
    FinancialSummary as DomainSummary, RecordTransactionCommand, RecordTransactionResult,
    TransactionListQuery,
};
use crate::domain::models::transaction::{Transaction as DomainTransaction, TransactionKind as DomainKind};
use shared::{
    FinancialSummary as SharedSummary, RecordTransactionRequest, RecordTransactionResponse,
    Transaction as SharedTransaction, TransactionKind as SharedKind, TransactionListRequest,
    TransactionListResponse,
};

/// Mapper to convert between shared Transaction DTOs and domain Transaction models.
pub struct TransactionMapper;

impl TransactionMapper {
    fn kind_to_domain(dto: SharedKind) -> DomainKind {
        match dto {
            SharedKind::Payment => DomainKind::Payment,
            SharedKind::Debt => DomainKind::Debt,
        }
    }

    fn kind_to_dto(domain: DomainKind) -> SharedKind {
        match domain {
            DomainKind::Payment => SharedKind::Payment,
            DomainKind::Debt => SharedKind::Debt,
        }
    }

    pub fn to_dto(domain: DomainTransaction) -> SharedTransaction {
        SharedTransaction {
            id: domain.id,
            student_id: domain.student_id,
            student_name: domain.student_name,
            amount: domain.amount,
            kind: Self::kind_to_dto(domain.kind),
            date: format_date(domain.date),
            note: domain.note,
        }
    }

    pub fn to_record_command(request: RecordTransactionRequest) -> Result<RecordTransactionCommand> {
        Ok(RecordTransactionCommand {
            date: parse_optional_date(request.date.as_deref())?,
            student_id: request.student_id,
            amount: request.amount,
            kind: Self::kind_to_domain(request.kind),
            note: request.note,
        })
    }

    pub fn to_list_query(request: TransactionListRequest) -> TransactionListQuery {
        TransactionListQuery {
            search: request.search,
            student_id: request.student_id,
        }
    }

    pub fn to_record_response_dto(result: RecordTransactionResult) -> RecordTransactionResponse {
        let success_message = match result.transaction.kind {
            DomainKind::Payment => format!(
                "Payment of {} received from {}",
                result.transaction.amount, result.transaction.student_name
            ),
            DomainKind::Debt => format!(
                "Debt of {} recorded for {}",
                result.transaction.amount, result.transaction.student_name
            ),
        };
        RecordTransactionResponse {
            transaction: Self::to_dto(result.transaction),
            new_balance: result.new_balance,
            status: StudentMapper::status_to_dto(result.status),
            success_message,
        }
    }

    pub fn to_list_dto(transactions: Vec<DomainTransaction>) -> TransactionListResponse {
        TransactionListResponse {
            transactions: transactions.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_summary_dto(summary: DomainSummary) -> SharedSummary {
        SharedSummary {
            total_income: summary.total_income,
            income_on_day: summary.income_on_day,
            outstanding_debt: summary.outstanding_debt,
            high_debt_students: summary.high_debt_students,
        }
    }
}
