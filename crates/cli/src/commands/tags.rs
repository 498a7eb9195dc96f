use api_types::{
    Id,
    tag::{TagFilters, TagNew, TagPatch},
};
use clap::{Args, Subcommand};
use client::Client;

use crate::{error::Result, render};

#[derive(Args, Debug)]
pub struct Tags {
    #[command(subcommand)]
    pub command: TagsCommand,
}

#[derive(Subcommand, Debug)]
pub enum TagsCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        name: String,
    },
    Rename {
        id: Id,
        name: String,
    },
    Delete {
        id: Id,
    },
}

pub async fn run(client: &Client, command: TagsCommand) -> Result<()> {
    let tags = client.tags();
    match command {
        TagsCommand::List { search } => {
            let items = tags.list(&TagFilters { search }).await?;
            println!("{}", render::tags(&items));
        }
        TagsCommand::Add { name } => {
            let tag = tags.create(&TagNew { name }).await?;
            println!("created {}", render::tag(&tag));
        }
        TagsCommand::Rename { id, name } => {
            let tag = tags.update(id, &TagPatch { name: Some(name) }).await?;
            println!("updated {}", render::tag(&tag));
        }
        TagsCommand::Delete { id } => {
            tags.delete(id).await?;
            println!("deleted tag {id}");
        }
    }
    Ok(())
}
