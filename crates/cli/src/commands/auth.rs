use api_types::auth::{ProfileUpdate, RegisterRequest};
use clap::{Args, Subcommand};
use client::Client;

use crate::{error::Result, prompt, render};

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long, env = "FINMAN_USERNAME")]
    username: String,
}

#[derive(Args, Debug)]
pub struct Profile {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Show,
    Update(ProfileUpdateArgs),
}

#[derive(Args, Debug)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
}

pub async fn register(client: &Client, args: RegisterArgs) -> Result<()> {
    let password = prompt::prompt_new_password()?;
    let request = RegisterRequest {
        username: args.username,
        email: args.email,
        password,
        first_name: args.first_name,
        last_name: args.last_name,
    };
    let session = client.auth().register(&request).await?;
    if let Some(user) = session.user {
        println!("registered and logged in as {}", render::user(&user));
    }
    Ok(())
}

pub async fn login(client: &Client, args: LoginArgs) -> Result<()> {
    let password = prompt::prompt_password("Password: ")?;
    let session = client.auth().login(&args.username, &password).await?;

    // The token endpoint rarely includes the user; ask for it.
    let user = match session.user {
        Some(user) => user,
        None => client.auth().profile().await?,
    };
    println!("logged in as {}", render::user(&user));
    Ok(())
}

pub async fn logout(client: &Client) -> Result<()> {
    let outcome = client.auth().logout().await;
    if outcome.server_invalidated {
        println!("logged out");
    } else {
        println!("logged out locally (server session was not revoked)");
    }
    Ok(())
}

pub async fn profile(client: &Client, command: ProfileCommand) -> Result<()> {
    let user = match command {
        ProfileCommand::Show => client.auth().profile().await?,
        ProfileCommand::Update(args) => {
            let update = ProfileUpdate {
                username: args.username,
                email: args.email,
                first_name: args.first_name,
                last_name: args.last_name,
            };
            client.auth().update_profile(&update).await?
        }
    };
    println!("{}", render::user(&user));
    Ok(())
}
