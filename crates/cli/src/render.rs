//! Plain-text views. Everything here is pure so it can be tested without a
//! backend.

use std::fmt::Write;

use api_types::{
    Money, TransactionKind,
    auth::User,
    budget::Budget,
    category::Category,
    savings_goal::SavingsGoal,
    tag::Tag,
    transaction::{Transaction, TransactionSummary},
};

const BAR_WIDTH: usize = 20;

pub fn signed_amount(kind: TransactionKind, amount: Money) -> String {
    match kind {
        TransactionKind::Income => format!("+{amount}"),
        TransactionKind::Expense => format!("-{amount}"),
    }
}

/// `[#####...............]  25%`, clamped to 0..=100.
pub fn progress_bar(percentage: f64) -> String {
    let pct = if percentage.is_finite() {
        percentage.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        pct
    )
}

pub fn user(user: &User) -> String {
    let full_name = format!("{} {}", user.first_name, user.last_name);
    let full_name = full_name.trim();
    let mut out = format!("{} <{}>", user.username, user.email);
    if !full_name.is_empty() {
        let _ = write!(out, " ({full_name})");
    }
    out
}

pub fn transaction(tx: &Transaction) -> String {
    let mut out = format!(
        "#{:<5} {}  {:>12}  {}",
        tx.id,
        tx.date,
        signed_amount(tx.kind, tx.amount),
        tx.category_name.as_deref().unwrap_or("-"),
    );
    if !tx.description.is_empty() {
        let _ = write!(out, "  {}", tx.description);
    }
    if !tx.tags_list.is_empty() {
        let _ = write!(out, "  [{}]", tx.tags_list.join(", "));
    }
    out
}

pub fn transactions(items: &[Transaction]) -> String {
    if items.is_empty() {
        return "no transactions".to_string();
    }
    lines(items.iter().map(transaction))
}

pub fn summary(summary: &TransactionSummary) -> String {
    format!(
        "{} .. {}\n  income:   {:>12}\n  expenses: {:>12}\n  balance:  {:>12}\n  count:    {:>12}",
        summary.start_date,
        summary.end_date,
        summary.total_income,
        summary.total_expenses,
        summary.balance,
        summary.transaction_count,
    )
}

pub fn category(category: &Category) -> String {
    let mut out = format!(
        "#{:<5} {:<24} {:<8} {}",
        category.id, category.name, category.kind, category.color
    );
    if let Some(count) = category.transaction_count {
        let _ = write!(out, "  ({count} transactions)");
    }
    out
}

pub fn categories(items: &[Category]) -> String {
    if items.is_empty() {
        return "no categories".to_string();
    }
    lines(items.iter().map(category))
}

pub fn tag(tag: &Tag) -> String {
    match tag.transaction_count {
        Some(count) => format!("#{:<5} {} ({count})", tag.id, tag.name),
        None => format!("#{:<5} {}", tag.id, tag.name),
    }
}

pub fn tags(items: &[Tag]) -> String {
    if items.is_empty() {
        return "no tags".to_string();
    }
    lines(items.iter().map(tag))
}

pub fn budget(budget: &Budget) -> String {
    let window = match budget.month {
        Some(month) => format!("{}-{month:02}", budget.year),
        None => budget.year.to_string(),
    };
    let category = budget
        .category_name
        .clone()
        .unwrap_or_else(|| format!("category {}", budget.category));

    let mut out = format!(
        "#{:<5} {:<20} {:<8} {:<8} {:>12}",
        budget.id, category, budget.period, window, budget.amount
    );
    if let Some(spent) = budget.spent_amount {
        let _ = write!(out, "  spent {spent}");
    }
    if let Some(remaining) = budget.remaining_amount {
        let _ = write!(out, "  left {remaining}");
    }
    if let Some(progress) = budget.progress_percentage {
        let _ = write!(out, "  {}", progress_bar(progress));
    }
    out
}

pub fn budgets(items: &[Budget]) -> String {
    if items.is_empty() {
        return "no budgets".to_string();
    }
    lines(items.iter().map(budget))
}

pub fn goal(goal: &SavingsGoal) -> String {
    let mut out = format!(
        "#{:<5} {:<24} {:>12} / {:<12}",
        goal.id, goal.name, goal.current_amount, goal.target_amount
    );
    if let Some(deadline) = goal.deadline {
        let _ = write!(out, "  due {deadline}");
    }
    if let Some(progress) = goal.progress_percentage {
        let _ = write!(out, "  {}", progress_bar(progress));
    }
    out
}

pub fn goals(items: &[SavingsGoal]) -> String {
    if items.is_empty() {
        return "no savings goals".to_string();
    }
    lines(items.iter().map(goal))
}

fn lines(rows: impl Iterator<Item = String>) -> String {
    rows.collect::<Vec<_>>().join("\n")
}
