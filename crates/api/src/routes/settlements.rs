//! Settlement routes.
//!
//! Amounts travel as decimal strings in major units (`"150000"` VND,
//! `"12.50"` USD) and are converted to integer minor units before any
//! calculation.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::AppState;
use tripsplit_core::settlement::{
    Balance, Expense, Member, SettlementError, SettlementPolicy, SettlementService,
    SettlementSummary, ShareMap, Transfer, TransferStatus, collect_issues, compute_balances,
    compute_transfers,
};
use tripsplit_core::split::{SplitError, SplitRule, Weight};
use tripsplit_shared::AppError;
use tripsplit_shared::types::{Currency, ExpenseId, MemberId, Money, TransferId};

/// Creates the settlement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settlements", post(settle))
        .route("/settlements/balances", post(balances))
        .route("/settlements/transfers", post(transfers))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A trip member.
#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    /// Member ID.
    pub id: MemberId,
    /// Display name.
    pub name: String,
}

/// How to split an expense when explicit shares are not given.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SplitRequest {
    /// Equal split among participants.
    Equal {
        /// Participants in order.
        participants: Vec<MemberId>,
    },
    /// Split proportional to integer weights.
    Weighted {
        /// Weights in order.
        weights: Vec<Weight>,
    },
}

/// A shared expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    /// Expense ID.
    pub id: ExpenseId,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Total amount in major units.
    pub amount: String,
    /// Member who paid.
    pub paid_by: MemberId,
    /// Explicit shares in major units.
    #[serde(default)]
    pub shares: Option<BTreeMap<MemberId, String>>,
    /// Split rule, used instead of `shares`.
    #[serde(default)]
    pub split: Option<SplitRequest>,
}

/// A trip snapshot to settle.
#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    /// Currency code; defaults to the configured currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Trip members.
    pub members: Vec<MemberRequest>,
    /// Shared expenses.
    #[serde(default)]
    pub expenses: Vec<ExpenseRequest>,
    /// Overrides the configured validation policy.
    #[serde(default)]
    pub strict: Option<bool>,
}

/// A precomputed net balance.
#[derive(Debug, Deserialize)]
pub struct NetBalanceRequest {
    /// The member.
    pub member_id: MemberId,
    /// Net balance in major units; positive means owed money.
    pub net: String,
}

/// Balances to turn into transfers.
#[derive(Debug, Deserialize)]
pub struct TransfersRequest {
    /// Currency code; defaults to the configured currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Net balances.
    pub balances: Vec<NetBalanceRequest>,
}

/// Balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// The member.
    pub member_id: MemberId,
    /// Display name; absent for IDs that are not trip members.
    pub name: Option<String>,
    /// Total paid.
    pub total_paid: String,
    /// Total owed.
    pub total_owed: String,
    /// Net balance.
    pub net: String,
}

/// Transfer response.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// Transfer ID.
    pub id: TransferId,
    /// Debtor.
    pub from: MemberId,
    /// Creditor.
    pub to: MemberId,
    /// Amount.
    pub amount: String,
    /// Status.
    pub status: TransferStatus,
}

/// Validation issue response.
#[derive(Debug, Serialize)]
pub struct IssueResponse {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Summary response.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Balance entries.
    pub participant_count: usize,
    /// Members owed money.
    pub creditor_count: usize,
    /// Members owing money.
    pub debtor_count: usize,
    /// Members already settled.
    pub settled_count: usize,
    /// Transfers in the plan.
    pub transfer_count: usize,
    /// Sum of transfer amounts.
    pub total_volume: String,
    /// Payments needed without netting.
    pub naive_transfer_count: usize,
    /// Payments saved by netting.
    pub transfers_saved: usize,
}

/// Response for `POST /settlements/balances`.
#[derive(Debug, Serialize)]
pub struct BalancesResponse {
    /// Currency of all amounts.
    pub currency: Currency,
    /// Balances in member order.
    pub balances: Vec<BalanceResponse>,
    /// Problems found in the snapshot.
    pub issues: Vec<IssueResponse>,
}

/// Response for `POST /settlements/transfers`.
#[derive(Debug, Serialize)]
pub struct TransfersResponse {
    /// Currency of all amounts.
    pub currency: Currency,
    /// Suggested transfers.
    pub transfers: Vec<TransferResponse>,
}

/// Response for `POST /settlements`.
#[derive(Debug, Serialize)]
pub struct SettlementResponse {
    /// Currency of all amounts.
    pub currency: Currency,
    /// Balances in member order.
    pub balances: Vec<BalanceResponse>,
    /// Suggested transfers.
    pub transfers: Vec<TransferResponse>,
    /// Plan statistics.
    pub summary: SummaryResponse,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message
        })),
    )
        .into_response()
}

fn app_error_response(err: &AppError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    error_response(status, &err.error_code().to_lowercase(), err.to_string())
}

fn settlement_error_response(err: &SettlementError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::UNPROCESSABLE_ENTITY);
    error_response(status, &err.error_code().to_lowercase(), err.to_string())
}

fn split_error_response(expense_id: ExpenseId, err: &SplitError) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        &err.error_code().to_lowercase(),
        format!("Expense {expense_id}: {err}"),
    )
}

fn resolve_currency(requested: Option<&str>, default: Currency) -> Result<Currency, Response> {
    match requested {
        None => Ok(default),
        Some(code) => Currency::from_str(code)
            .map_err(|message| app_error_response(&AppError::BadRequest(message))),
    }
}

fn parse_amount(value: &str, currency: Currency) -> Result<i64, Response> {
    Money::parse_major(value, currency)
        .map(|money| money.amount)
        .map_err(|e| app_error_response(&AppError::from(e)))
}

fn format_amount(amount: i64, currency: Currency) -> String {
    Money::new(amount, currency).to_major().to_string()
}

fn to_expense(request: ExpenseRequest, currency: Currency) -> Result<Expense, Response> {
    let amount = parse_amount(&request.amount, currency)?;

    let shares = match (request.shares, request.split) {
        (Some(_), Some(_)) => {
            return Err(app_error_response(&AppError::BadRequest(format!(
                "Expense {} has both shares and a split rule",
                request.id
            ))));
        }
        (Some(raw), None) => raw
            .into_iter()
            .map(|(member_id, value)| Ok::<_, Response>((member_id, parse_amount(&value, currency)?)))
            .collect::<Result<ShareMap, Response>>()?,
        (None, Some(split)) => {
            let rule = match split {
                SplitRequest::Equal { participants } => SplitRule::Equal { participants },
                SplitRequest::Weighted { weights } => SplitRule::Weighted { weights },
            };
            rule.shares(amount)
                .map_err(|e| split_error_response(request.id, &e))?
        }
        (None, None) => ShareMap::new(),
    };

    Ok(Expense::new(request.id, amount, request.paid_by, shares).with_description(request.description))
}

fn to_snapshot(
    members: Vec<MemberRequest>,
    expenses: Vec<ExpenseRequest>,
    currency: Currency,
) -> Result<(Vec<Member>, Vec<Expense>), Response> {
    let members = members
        .into_iter()
        .map(|m| Member::new(m.id, m.name))
        .collect();
    let expenses = expenses
        .into_iter()
        .map(|e| to_expense(e, currency))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((members, expenses))
}

fn balance_response(balance: &Balance, members: &[Member], currency: Currency) -> BalanceResponse {
    BalanceResponse {
        member_id: balance.member_id,
        name: members
            .iter()
            .find(|m| m.id == balance.member_id)
            .map(|m| m.name.clone()),
        total_paid: format_amount(balance.total_paid, currency),
        total_owed: format_amount(balance.total_owed, currency),
        net: format_amount(balance.net, currency),
    }
}

fn transfer_response(transfer: &Transfer, currency: Currency) -> TransferResponse {
    TransferResponse {
        id: transfer.id,
        from: transfer.from,
        to: transfer.to,
        amount: format_amount(transfer.amount, currency),
        status: transfer.status,
    }
}

fn summary_response(summary: &SettlementSummary, currency: Currency) -> SummaryResponse {
    SummaryResponse {
        participant_count: summary.participant_count,
        creditor_count: summary.creditor_count,
        debtor_count: summary.debtor_count,
        settled_count: summary.settled_count,
        transfer_count: summary.transfer_count,
        total_volume: format_amount(summary.total_volume, currency),
        naive_transfer_count: summary.naive_transfer_count,
        transfers_saved: summary.transfers_saved,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /settlements - Balances, transfers and summary for a trip.
async fn settle(State(state): State<AppState>, Json(request): Json<SettleRequest>) -> Response {
    let currency = match resolve_currency(
        request.currency.as_deref(),
        state.config.settlement.default_currency,
    ) {
        Ok(c) => c,
        Err(response) => return response,
    };

    let (members, expenses) = match to_snapshot(request.members, request.expenses, currency) {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    let service = match request.strict {
        Some(strict) => SettlementService::new(SettlementPolicy::from_strict(strict)),
        None => state.settlement,
    };

    match service.settle(&members, &expenses) {
        Ok(settlement) => {
            debug!(
                currency = %currency,
                transfers = settlement.transfers.len(),
                "Settlement request served"
            );
            (
                StatusCode::OK,
                Json(SettlementResponse {
                    currency,
                    balances: settlement
                        .balances
                        .iter()
                        .map(|b| balance_response(b, &members, currency))
                        .collect(),
                    transfers: settlement
                        .transfers
                        .iter()
                        .map(|t| transfer_response(t, currency))
                        .collect(),
                    summary: summary_response(&settlement.summary, currency),
                }),
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Settlement rejected");
            settlement_error_response(&e)
        }
    }
}

/// POST /settlements/balances - Net balance per member.
///
/// Never rejects a well-formed payload; snapshot problems are reported in
/// `issues` next to the raw balances.
async fn balances(State(state): State<AppState>, Json(request): Json<SettleRequest>) -> Response {
    let currency = match resolve_currency(
        request.currency.as_deref(),
        state.config.settlement.default_currency,
    ) {
        Ok(c) => c,
        Err(response) => return response,
    };

    let (members, expenses) = match to_snapshot(request.members, request.expenses, currency) {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    let issues = collect_issues(&members, &expenses)
        .iter()
        .map(|issue| IssueResponse {
            code: issue.error_code().to_lowercase(),
            message: issue.to_string(),
        })
        .collect();
    let balances = compute_balances(&members, &expenses)
        .iter()
        .map(|b| balance_response(b, &members, currency))
        .collect();

    (
        StatusCode::OK,
        Json(BalancesResponse {
            currency,
            balances,
            issues,
        }),
    )
        .into_response()
}

/// POST /settlements/transfers - Transfers for precomputed net balances.
async fn transfers(
    State(state): State<AppState>,
    Json(request): Json<TransfersRequest>,
) -> Response {
    let currency = match resolve_currency(
        request.currency.as_deref(),
        state.config.settlement.default_currency,
    ) {
        Ok(c) => c,
        Err(response) => return response,
    };

    let mut balances = Vec::with_capacity(request.balances.len());
    for entry in request.balances {
        let net = match parse_amount(&entry.net, currency) {
            Ok(net) => net,
            Err(response) => return response,
        };
        if net == i64::MIN {
            return app_error_response(&AppError::Validation(format!(
                "Net balance for {} is out of range",
                entry.member_id
            )));
        }
        // Only the net matters to the optimizer.
        balances.push(Balance::new(entry.member_id, net.max(0), -net.min(0)));
    }

    let transfers = compute_transfers(&balances)
        .iter()
        .map(|t| transfer_response(t, currency))
        .collect();

    (
        StatusCode::OK,
        Json(TransfersResponse {
            currency,
            transfers,
        }),
    )
        .into_response()
}
