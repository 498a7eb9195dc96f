use api_types::{
    Id, Money, TransactionKind,
    transaction::{TransactionFilters, TransactionNew, TransactionPatch},
};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use client::Client;

use crate::{
    error::{AppError, Result},
    render,
};

#[derive(Args, Debug)]
pub struct Transactions {
    #[command(subcommand)]
    pub command: TransactionsCommand,
}

#[derive(Subcommand, Debug)]
pub enum TransactionsCommand {
    List(ListArgs),
    Show { id: Id },
    Add(AddArgs),
    Edit(EditArgs),
    Delete { id: Id },
    /// Totals over a window; the server defaults to the current month.
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long = "type")]
    kind: Option<TransactionKind>,
    #[arg(long)]
    category: Option<Id>,
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
    #[arg(long)]
    search: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long = "type")]
    kind: TransactionKind,
    #[arg(long)]
    amount: Money,
    /// Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    category: Option<Id>,
    #[arg(long = "tag")]
    tags: Vec<Id>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    id: Id,
    #[arg(long = "type")]
    kind: Option<TransactionKind>,
    #[arg(long)]
    amount: Option<Money>,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, conflicts_with = "no_category")]
    category: Option<Id>,
    #[arg(long)]
    no_category: bool,
    /// Replaces the tag set; repeat for several.
    #[arg(long = "tag")]
    tags: Option<Vec<Id>>,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
}

pub async fn run(client: &Client, command: TransactionsCommand) -> Result<()> {
    let transactions = client.transactions();
    match command {
        TransactionsCommand::List(args) => {
            let filters = TransactionFilters {
                kind: args.kind,
                category: args.category,
                start_date: args.from,
                end_date: args.to,
                search: args.search,
            };
            let items = transactions.list(&filters).await?;
            println!("{}", render::transactions(&items));
        }
        TransactionsCommand::Show { id } => {
            let tx = transactions.get(id).await?;
            println!("{}", render::transaction(&tx));
        }
        TransactionsCommand::Add(args) => {
            let new = new_transaction(args)?;
            let tx = transactions.create(&new).await?;
            println!("created {}", render::transaction(&tx));
        }
        TransactionsCommand::Edit(args) => {
            let id = args.id;
            let patch = patch_transaction(args);
            let tx = transactions.update(id, &patch).await?;
            println!("updated {}", render::transaction(&tx));
        }
        TransactionsCommand::Delete { id } => {
            transactions.delete(id).await?;
            println!("deleted transaction {id}");
        }
        TransactionsCommand::Summary(args) => {
            let summary = transactions.summary(args.from, args.to).await?;
            println!("{}", render::summary(&summary));
        }
    }
    Ok(())
}

fn new_transaction(args: AddArgs) -> Result<TransactionNew> {
    if !args.amount.is_positive() {
        return Err(AppError::Input("amount must be greater than 0".to_string()));
    }
    Ok(TransactionNew {
        amount: args.amount,
        kind: args.kind,
        date: args
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        description: args.description,
        category: args.category,
        tags: args.tags,
    })
}

fn patch_transaction(args: EditArgs) -> TransactionPatch {
    let category = if args.no_category {
        Some(None)
    } else {
        args.category.map(Some)
    };
    TransactionPatch {
        amount: args.amount,
        kind: args.kind,
        date: args.date,
        description: args.description,
        category,
        tags: args.tags,
    }
}
