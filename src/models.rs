// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub referral_earnings: Option<Decimal>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferrerInfo {
    #[serde(default)]
    pub referrer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBidRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub maturity_period: u32,
}

/// Lifecycle status as reported by the server. Values the client does not
/// know are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvestmentStatus {
    #[default]
    Pending,
    Paired,
    Matured,
    Completed,
    Other(String),
}

impl InvestmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvestmentStatus::Pending => "pending",
            InvestmentStatus::Paired => "paired",
            InvestmentStatus::Matured => "matured",
            InvestmentStatus::Completed => "completed",
            InvestmentStatus::Other(s) => s,
        }
    }

    /// Badge text shown in tables.
    pub fn label(&self) -> &str {
        match self {
            InvestmentStatus::Pending => "Pending",
            InvestmentStatus::Paired => "Paired",
            InvestmentStatus::Matured => "Matured",
            InvestmentStatus::Completed => "Completed",
            InvestmentStatus::Other(s) => s,
        }
    }
}

impl From<String> for InvestmentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => InvestmentStatus::Pending,
            "paired" => InvestmentStatus::Paired,
            "matured" => InvestmentStatus::Matured,
            "completed" => InvestmentStatus::Completed,
            _ => InvestmentStatus::Other(s),
        }
    }
}

impl From<&str> for InvestmentStatus {
    fn from(s: &str) -> Self {
        InvestmentStatus::from(s.to_string())
    }
}

impl From<InvestmentStatus> for String {
    fn from(s: InvestmentStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loan bid as listed by `/api/my_investments/` or returned from creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: i64,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub return_amount: Decimal,
    #[serde(default)]
    pub maturity_period: Option<u32>,
    #[serde(default)]
    pub status: InvestmentStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub maturity_date: Option<String>,
    #[serde(default, alias = "mature_at")]
    pub matured_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvestmentsEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<Investment>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One side of a pairing awaiting repayment confirmation (`/api/sell-shares/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellShare {
    pub id: i64,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_phone: Option<String>,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub is_matured_investor: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl SellShare {
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SellSharesEnvelope {
    #[serde(default)]
    pub data: Option<Vec<SellShare>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPaymentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub all_confirmed: Option<bool>,
    #[serde(default)]
    pub remaining_amount: Option<Decimal>,
    #[serde(default, alias = "mature_at")]
    pub matured_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStatistics {
    #[serde(default)]
    pub total_investment: Decimal,
    #[serde(default)]
    pub total_returns: Decimal,
    #[serde(default)]
    pub active_investments: u64,
    #[serde(default)]
    pub due_earnings: Decimal,
    #[serde(default)]
    pub pending_payments: u64,
    #[serde(default)]
    pub total_referral_earnings: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingPayment {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default, rename = "from_user__username")]
    pub from_username: Option<String>,
    #[serde(default, rename = "from_user__phone_number")]
    pub from_phone: Option<String>,
}

impl PendingPayment {
    pub fn action(&self) -> &'static str {
        if self.status.as_deref() == Some("Confirmed") {
            "Completed"
        } else {
            "Confirm"
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferredParty {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferralHistoryEntry {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub referred: Option<ReferredParty>,
    #[serde(default, rename = "referred__username")]
    pub referred_username: Option<String>,
    #[serde(default)]
    pub amount_invested: Decimal,
    #[serde(default)]
    pub bonus_earned: Decimal,
    #[serde(default)]
    pub status: String,
}

impl ReferralHistoryEntry {
    pub fn display_username(&self) -> &str {
        self.username
            .as_deref()
            .or(self.referred.as_ref().and_then(|r| r.username.as_deref()))
            .or(self.referred_username.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn display_date(&self) -> &str {
        self.date
            .as_deref()
            .or(self.created_at.as_deref())
            .unwrap_or("")
    }

    /// "No Investment" when nothing was lent yet, otherwise the capitalised status.
    pub fn display_status(&self) -> String {
        if self.amount_invested.is_zero() {
            return "No Investment".to_string();
        }
        capitalize(&self.status)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferredUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub date_joined: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl ReferredUser {
    pub fn display_status(&self) -> &'static str {
        if self.is_active { "Active" } else { "Inactive" }
    }
}

/// Shape shared by `/api/referrals/` and the dashboard's `referral` block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferralSummary {
    #[serde(default)]
    pub total_referrals: u64,
    #[serde(default)]
    pub total_earnings: Decimal,
    #[serde(default)]
    pub available_bonus: Decimal,
    #[serde(default, alias = "referrals")]
    pub referral_history: Vec<ReferralHistoryEntry>,
    #[serde(default)]
    pub referred_users: Vec<ReferredUser>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub statistics: DashboardStatistics,
    #[serde(default)]
    pub referral: ReferralSummary,
    #[serde(default)]
    pub payments: Vec<PendingPayment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountTotal {
    #[serde(default)]
    pub count: u64,
    #[serde(default, alias = "total_amount")]
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusBreakdown {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub avg_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStatistics {
    #[serde(default)]
    pub total_users: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvestmentStatistics {
    #[serde(default)]
    pub total_investments: u64,
    #[serde(default)]
    pub status_breakdown: Vec<StatusBreakdown>,
    #[serde(default)]
    pub matured_investments: Option<CountTotal>,
    #[serde(default)]
    pub waiting_investors: Option<CountTotal>,
    #[serde(default)]
    pub new_investors_pending: Option<CountTotal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentTotals {
    #[serde(default)]
    pub made: CountTotal,
    #[serde(default)]
    pub received: CountTotal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserAuditDetail {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub total_investments: u64,
    #[serde(default)]
    pub investments_by_status: BTreeMap<String, CountTotal>,
    #[serde(default)]
    pub payments: PaymentTotals,
}

impl UserAuditDetail {
    pub fn total_for(&self, status: &InvestmentStatus) -> Decimal {
        self.investments_by_status
            .get(status.as_str())
            .map(|c| c.total)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Admin-only aggregate from `/api/system-overview/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemOverview {
    #[serde(default)]
    pub user_statistics: UserStatistics,
    #[serde(default)]
    pub investment_statistics: InvestmentStatistics,
    #[serde(default)]
    pub user_details: Vec<UserAuditDetail>,
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
