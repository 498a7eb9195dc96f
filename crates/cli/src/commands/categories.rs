use api_types::{
    Id, TransactionKind,
    category::{CategoryFilters, CategoryNew, CategoryPatch},
};
use clap::{Args, Subcommand};
use client::Client;

use crate::{error::Result, render};

#[derive(Args, Debug)]
pub struct Categories {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCommand {
    List {
        #[arg(long = "type")]
        kind: Option<TransactionKind>,
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        kind: TransactionKind,
        /// Hex color, the server picks one when omitted.
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    Edit {
        id: Id,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        kind: Option<TransactionKind>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    Delete {
        id: Id,
    },
}

pub async fn run(client: &Client, command: CategoriesCommand) -> Result<()> {
    let categories = client.categories();
    match command {
        CategoriesCommand::List { kind, search } => {
            let items = categories.list(&CategoryFilters { kind, search }).await?;
            println!("{}", render::categories(&items));
        }
        CategoriesCommand::Add {
            name,
            kind,
            color,
            icon,
        } => {
            let category = categories
                .create(&CategoryNew {
                    name,
                    kind,
                    color,
                    icon,
                })
                .await?;
            println!("created {}", render::category(&category));
        }
        CategoriesCommand::Edit {
            id,
            name,
            kind,
            color,
            icon,
        } => {
            let patch = CategoryPatch {
                name,
                kind,
                color,
                icon,
            };
            let category = categories.update(id, &patch).await?;
            println!("updated {}", render::category(&category));
        }
        CategoriesCommand::Delete { id } => {
            categories.delete(id).await?;
            println!("deleted category {id}");
        }
    }
    Ok(())
}
