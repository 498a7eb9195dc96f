//! Records exchanged with the finance backend.
//!
//! These are transport-layer shapes, not storage records: the backend owns
//! every entity here except the credential pair, and the client only ever
//! replaces its copy with whatever the server returns.

use serde::{Deserialize, Serialize};

mod money;

pub use money::{Money, MoneyError};

/// Backend-assigned primary key.
pub type Id = i64;

/// Query string pairs, in the order they are sent.
pub type QueryPairs = Vec<(&'static str, String)>;

/// Filters that turn into query parameters.
///
/// Implementations must only emit the filters that were actually supplied:
/// an omitted filter never appears as a key, not even with an empty value.
pub trait QueryFilters {
    fn to_query(&self) -> QueryPairs;
}

fn push_opt<T: ToString>(pairs: &mut QueryPairs, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

fn push_text(pairs: &mut QueryPairs, key: &'static str, value: Option<&String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        pairs.push((key, value.clone()));
    }
}

/// Direction of money: shared by transactions and categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Returns the canonical string used by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

pub mod auth {
    use super::*;

    /// Bearer credential pair issued by the backend.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Tokens {
        pub access: String,
        pub refresh: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct User {
        pub id: Id,
        pub username: String,
        pub email: String,
        #[serde(default)]
        pub first_name: String,
        #[serde(default)]
        pub last_name: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub username: String,
        pub email: String,
        pub password: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub first_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub last_name: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LogoutRequest {
        pub refresh_token: String,
    }

    /// Partial profile update: only supplied fields are sent.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub username: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub first_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub last_name: Option<String>,
    }

    impl ProfileUpdate {
        pub fn is_empty(&self) -> bool {
            self.username.is_none()
                && self.email.is_none()
                && self.first_name.is_none()
                && self.last_name.is_none()
        }
    }

    /// Body returned by `POST /auth/register/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterResponse {
        pub user: User,
        pub tokens: Tokens,
    }

    /// Body returned by `POST /auth/login/`.
    ///
    /// The token endpoint returns the pair at the top level and normally no
    /// user at all.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub access: String,
        pub refresh: String,
        #[serde(default)]
        pub user: Option<User>,
    }

    /// Normalized outcome of login/register.
    ///
    /// `user` is `None` when the server did not send one; callers that need
    /// the profile must fetch it instead of assuming an empty record.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AuthSession {
        pub user: Option<User>,
        pub tokens: Tokens,
    }
}

pub mod transaction {
    use super::*;
    use chrono::{DateTime, FixedOffset, NaiveDate};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: Id,
        pub amount: Money,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub date: NaiveDate,
        #[serde(default)]
        pub description: String,
        pub category: Option<Id>,
        #[serde(default)]
        pub category_name: Option<String>,
        #[serde(default)]
        pub category_color: Option<String>,
        #[serde(default)]
        pub tags: Vec<Id>,
        #[serde(default)]
        pub tags_list: Vec<String>,
        /// RFC3339 timestamp assigned by the server.
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: DateTime<FixedOffset>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        /// Must be > 0; the kind carries the direction.
        pub amount: Money,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub date: NaiveDate,
        #[serde(default)]
        pub description: String,
        pub category: Option<Id>,
        #[serde(default)]
        pub tags: Vec<Id>,
    }

    /// Partial update. `category: Some(None)` clears the category.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct TransactionPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<Money>,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pub kind: Option<TransactionKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub date: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<Option<Id>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub tags: Option<Vec<Id>>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct TransactionFilters {
        pub kind: Option<TransactionKind>,
        pub category: Option<Id>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub search: Option<String>,
    }

    impl QueryFilters for TransactionFilters {
        fn to_query(&self) -> QueryPairs {
            let mut pairs = Vec::new();
            push_opt(&mut pairs, "type", self.kind);
            push_opt(&mut pairs, "category", self.category);
            push_opt(&mut pairs, "start_date", self.start_date);
            push_opt(&mut pairs, "end_date", self.end_date);
            push_text(&mut pairs, "search", self.search.as_ref());
            pairs
        }
    }

    /// Aggregate over a date window. Never persisted.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionSummary {
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub total_income: Money,
        pub total_expenses: Money,
        pub balance: Money,
        pub transaction_count: u64,
    }

    impl TransactionSummary {
        /// Aggregates the transactions dated within `[start_date, end_date]`.
        pub fn compute<'a, I>(start_date: NaiveDate, end_date: NaiveDate, transactions: I) -> Self
        where
            I: IntoIterator<Item = &'a Transaction>,
        {
            let mut total_income = Money::ZERO;
            let mut total_expenses = Money::ZERO;
            let mut transaction_count = 0;

            for tx in transactions
                .into_iter()
                .filter(|tx| tx.date >= start_date && tx.date <= end_date)
            {
                match tx.kind {
                    TransactionKind::Income => total_income += tx.amount,
                    TransactionKind::Expense => total_expenses += tx.amount,
                }
                transaction_count += 1;
            }

            Self {
                start_date,
                end_date,
                total_income,
                total_expenses,
                balance: total_income - total_expenses,
                transaction_count,
            }
        }

        /// `true` when `balance == total_income - total_expenses`.
        pub fn is_balanced(&self) -> bool {
            self.total_income.checked_sub(self.total_expenses) == Some(self.balance)
        }
    }
}

pub mod category {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Category {
        pub id: Id,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        /// Hex color code, e.g. `#1976d2`.
        pub color: String,
        #[serde(default)]
        pub icon: String,
        #[serde(default)]
        pub transaction_count: Option<u64>,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: DateTime<FixedOffset>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        /// Server default applies when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub icon: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct CategoryPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pub kind: Option<TransactionKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub icon: Option<String>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct CategoryFilters {
        pub kind: Option<TransactionKind>,
        pub search: Option<String>,
    }

    impl QueryFilters for CategoryFilters {
        fn to_query(&self) -> QueryPairs {
            let mut pairs = Vec::new();
            push_opt(&mut pairs, "type", self.kind);
            push_text(&mut pairs, "search", self.search.as_ref());
            pairs
        }
    }
}

pub mod tag {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Tag {
        pub id: Id,
        pub name: String,
        #[serde(default)]
        pub transaction_count: Option<u64>,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TagNew {
        pub name: String,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct TagPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct TagFilters {
        pub search: Option<String>,
    }

    impl QueryFilters for TagFilters {
        fn to_query(&self) -> QueryPairs {
            let mut pairs = Vec::new();
            push_text(&mut pairs, "search", self.search.as_ref());
            pairs
        }
    }
}

pub mod budget {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetPeriod {
        #[default]
        Monthly,
        Yearly,
    }

    impl BudgetPeriod {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Monthly => "monthly",
                Self::Yearly => "yearly",
            }
        }
    }

    impl std::fmt::Display for BudgetPeriod {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl std::str::FromStr for BudgetPeriod {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "monthly" => Ok(Self::Monthly),
                "yearly" => Ok(Self::Yearly),
                other => Err(format!("unknown budget period: {other}")),
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Budget {
        pub id: Id,
        /// Expense category this budget caps.
        pub category: Id,
        #[serde(default)]
        pub category_name: Option<String>,
        pub amount: Money,
        pub period: BudgetPeriod,
        pub year: i32,
        /// Only set for monthly budgets (1-12).
        #[serde(default)]
        pub month: Option<u32>,
        #[serde(default)]
        pub spent_amount: Option<Money>,
        #[serde(default)]
        pub remaining_amount: Option<Money>,
        #[serde(default)]
        pub progress_percentage: Option<f64>,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: DateTime<FixedOffset>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category: Id,
        pub amount: Money,
        pub period: BudgetPeriod,
        pub year: i32,
        pub month: Option<u32>,
    }

    impl BudgetNew {
        pub fn monthly(category: Id, amount: Money, year: i32, month: u32) -> Self {
            Self {
                category,
                amount,
                period: BudgetPeriod::Monthly,
                year,
                month: Some(month),
            }
        }

        pub fn yearly(category: Id, amount: Money, year: i32) -> Self {
            Self {
                category,
                amount,
                period: BudgetPeriod::Yearly,
                year,
                month: None,
            }
        }

        /// Checks the period/month pairing before the request leaves.
        pub fn validate(&self) -> Result<(), String> {
            validate_period(self.period, self.month)?;
            if !self.amount.is_positive() {
                return Err("budget amount must be greater than 0".to_string());
            }
            Ok(())
        }
    }

    /// Month must be present (1-12) for monthly budgets and absent otherwise.
    pub fn validate_period(period: BudgetPeriod, month: Option<u32>) -> Result<(), String> {
        match (period, month) {
            (BudgetPeriod::Monthly, Some(month)) if (1..=12).contains(&month) => Ok(()),
            (BudgetPeriod::Monthly, Some(month)) => Err(format!("invalid month: {month}")),
            (BudgetPeriod::Monthly, None) => Err("monthly budgets require a month".to_string()),
            (BudgetPeriod::Yearly, None) => Ok(()),
            (BudgetPeriod::Yearly, Some(_)) => {
                Err("yearly budgets must not carry a month".to_string())
            }
        }
    }

    /// Partial update. `month: Some(None)` clears the month (switching to
    /// yearly requires it).
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct BudgetPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<Id>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<Money>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub period: Option<BudgetPeriod>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub year: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub month: Option<Option<u32>>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct BudgetFilters {
        pub year: Option<i32>,
        pub period: Option<BudgetPeriod>,
    }

    impl QueryFilters for BudgetFilters {
        fn to_query(&self) -> QueryPairs {
            let mut pairs = Vec::new();
            push_opt(&mut pairs, "year", self.year);
            push_opt(&mut pairs, "period", self.period);
            pairs
        }
    }
}

pub mod savings_goal {
    use super::*;
    use chrono::{DateTime, FixedOffset, NaiveDate};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct SavingsGoal {
        pub id: Id,
        pub name: String,
        pub target_amount: Money,
        pub current_amount: Money,
        #[serde(default)]
        pub deadline: Option<NaiveDate>,
        /// Server-computed, capped at 100.
        #[serde(default)]
        pub progress_percentage: Option<f64>,
        #[serde(default)]
        pub remaining_amount: Option<Money>,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: DateTime<FixedOffset>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SavingsGoalNew {
        pub name: String,
        pub target_amount: Money,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub current_amount: Option<Money>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub deadline: Option<NaiveDate>,
    }

    /// Partial update. `deadline: Some(None)` removes the deadline.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct SavingsGoalPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub target_amount: Option<Money>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub current_amount: Option<Money>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub deadline: Option<Option<NaiveDate>>,
    }

    /// Body of `POST /savings-goals/{id}/add_amount/`.
    #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
    pub struct AddAmount {
        pub amount: Money,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct SavingsGoalFilters {
        pub search: Option<String>,
    }

    impl QueryFilters for SavingsGoalFilters {
        fn to_query(&self) -> QueryPairs {
            let mut pairs = Vec::new();
            push_text(&mut pairs, "search", self.search.as_ref());
            pairs
        }
    }
}
