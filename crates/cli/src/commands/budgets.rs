use api_types::{
    Id, Money,
    budget::{BudgetFilters, BudgetNew, BudgetPatch, BudgetPeriod},
};
use clap::{Args, Subcommand};
use client::Client;

use crate::{
    error::{AppError, Result},
    render,
};

#[derive(Args, Debug)]
pub struct Budgets {
    #[command(subcommand)]
    pub command: BudgetsCommand,
}

#[derive(Subcommand, Debug)]
pub enum BudgetsCommand {
    List {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        period: Option<BudgetPeriod>,
    },
    /// Monthly when `--month` is given, yearly otherwise.
    Add {
        #[arg(long)]
        category: Id,
        #[arg(long)]
        amount: Money,
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    Edit(EditArgs),
    Delete {
        id: Id,
    },
}

#[derive(Args, Debug)]
pub struct EditArgs {
    id: Id,
    #[arg(long)]
    category: Option<Id>,
    #[arg(long)]
    amount: Option<Money>,
    #[arg(long)]
    year: Option<i32>,
    /// Switches the budget to monthly for this month.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12), conflicts_with = "yearly")]
    month: Option<u32>,
    /// Switches the budget to yearly and drops the month.
    #[arg(long)]
    yearly: bool,
}

pub async fn run(client: &Client, command: BudgetsCommand) -> Result<()> {
    let budgets = client.budgets();
    match command {
        BudgetsCommand::List { year, period } => {
            let items = budgets.list(&BudgetFilters { year, period }).await?;
            println!("{}", render::budgets(&items));
        }
        BudgetsCommand::Add {
            category,
            amount,
            year,
            month,
        } => {
            let new = match month {
                Some(month) => BudgetNew::monthly(category, amount, year, month),
                None => BudgetNew::yearly(category, amount, year),
            };
            let budget = budgets.create(&new).await?;
            println!("created {}", render::budget(&budget));
        }
        BudgetsCommand::Edit(args) => {
            let id = args.id;
            let patch = budget_patch(args)?;
            let budget = budgets.update(id, &patch).await?;
            println!("updated {}", render::budget(&budget));
        }
        BudgetsCommand::Delete { id } => {
            budgets.delete(id).await?;
            println!("deleted budget {id}");
        }
    }
    Ok(())
}

fn budget_patch(args: EditArgs) -> Result<BudgetPatch> {
    if args.amount.is_some_and(|amount| !amount.is_positive()) {
        return Err(AppError::Input("amount must be greater than 0".to_string()));
    }

    let (period, month) = match (args.month, args.yearly) {
        (Some(month), _) => (Some(BudgetPeriod::Monthly), Some(Some(month))),
        (None, true) => (Some(BudgetPeriod::Yearly), Some(None)),
        (None, false) => (None, None),
    };

    Ok(BudgetPatch {
        category: args.category,
        amount: args.amount,
        period,
        year: args.year,
        month,
    })
}
