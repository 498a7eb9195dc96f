use api_types::{
    Id, Money,
    savings_goal::{SavingsGoalFilters, SavingsGoalNew, SavingsGoalPatch},
};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use client::Client;

use crate::{
    error::{AppError, Result},
    render,
};

#[derive(Args, Debug)]
pub struct Goals {
    #[command(subcommand)]
    pub command: GoalsCommand,
}

#[derive(Subcommand, Debug)]
pub enum GoalsCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        target: Money,
        /// Amount already saved.
        #[arg(long)]
        current: Option<Money>,
        #[arg(long)]
        deadline: Option<NaiveDate>,
    },
    Edit {
        id: Id,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        target: Option<Money>,
        #[arg(long)]
        current: Option<Money>,
        #[arg(long, conflicts_with = "no_deadline")]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        no_deadline: bool,
    },
    Delete {
        id: Id,
    },
    /// Add a contribution to the saved amount.
    AddAmount {
        id: Id,
        amount: Money,
    },
}

pub async fn run(client: &Client, command: GoalsCommand) -> Result<()> {
    let goals = client.savings_goals();
    match command {
        GoalsCommand::List { search } => {
            let items = goals.list(&SavingsGoalFilters { search }).await?;
            println!("{}", render::goals(&items));
        }
        GoalsCommand::Add {
            name,
            target,
            current,
            deadline,
        } => {
            if !target.is_positive() {
                return Err(AppError::Input("target must be greater than 0".to_string()));
            }
            let goal = goals
                .create(&SavingsGoalNew {
                    name,
                    target_amount: target,
                    current_amount: current,
                    deadline,
                })
                .await?;
            println!("created {}", render::goal(&goal));
        }
        GoalsCommand::Edit {
            id,
            name,
            target,
            current,
            deadline,
            no_deadline,
        } => {
            let deadline = if no_deadline {
                Some(None)
            } else {
                deadline.map(Some)
            };
            let patch = SavingsGoalPatch {
                name,
                target_amount: target,
                current_amount: current,
                deadline,
            };
            let goal = goals.update(id, &patch).await?;
            println!("updated {}", render::goal(&goal));
        }
        GoalsCommand::Delete { id } => {
            goals.delete(id).await?;
            println!("deleted savings goal {id}");
        }
        GoalsCommand::AddAmount { id, amount } => {
            let goal = goals.add_amount(id, amount).await?;
            println!("{}", render::goal(&goal));
        }
    }
    Ok(())
}
