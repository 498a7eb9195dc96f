use api_types::{
    budget::BudgetFilters, savings_goal::SavingsGoalFilters, transaction::TransactionFilters,
};
use chrono::{Datelike, Local};
use client::Client;

use crate::{error::Result, render};

const RECENT: usize = 5;

pub async fn run(client: &Client) -> Result<()> {
    let today = Local::now().date_naive();

    let transactions = client.transactions();
    let budget_client = client.budgets();
    let goal_client = client.savings_goals();
    let budget_filters = BudgetFilters {
        year: Some(today.year()),
        period: None,
    };
    let transaction_filters = TransactionFilters::default();
    let goal_filters = SavingsGoalFilters::default();

    let (summary, recent, budgets, goals) = tokio::try_join!(
        transactions.summary(None, None),
        transactions.list(&transaction_filters),
        budget_client.list(&budget_filters),
        goal_client.list(&goal_filters),
    )?;

    let current: Vec<_> = budgets
        .into_iter()
        .filter(|budget| budget.month.is_none_or(|month| month == today.month()))
        .collect();
    let recent = &recent[..recent.len().min(RECENT)];

    println!("{}", render::summary(&summary));
    println!("\nrecent transactions\n{}", render::transactions(recent));
    println!("\nbudgets\n{}", render::budgets(&current));
    println!("\nsavings goals\n{}", render::goals(&goals));
    Ok(())
}
