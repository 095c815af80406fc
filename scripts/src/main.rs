//! Command line entry point for the recurring payments tooling. Every subcommand runs start to
//! finish on one task; any error is printed and the process exits with code 1.

use std::process::ExitCode;

use clap::Parser;
use recurring_payments_client::logs::log_error;

use crate::{
    cli::{
        Cli,
        Command,
    },
    commands::Environment,
};

pub mod cli;
pub mod commands;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error("Failed", format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let env = Environment::new(&cli);

    match cli.command {
        Command::CreateKeypair => commands::keypair::create_keypair(&env),
        Command::Address => commands::keypair::address(&env).await,
        Command::Airdrop { sol } => commands::transfer::airdrop(&env, sol).await,
        Command::CreateToken {
            decimals,
            mint_authority,
            freeze_authority,
        } => commands::token::create_token(&env, decimals, mint_authority, freeze_authority).await,
        Command::Transfer { to, sol } => commands::transfer::transfer(&env, to, sol).await,
        Command::Deploy {
            program,
            data_space,
            program_id,
        } => commands::deploy::deploy(&env, &program, data_space, program_id).await,
        Command::Playground {
            max_amount,
            timeframe,
            approve,
        } => commands::playground::playground(&env, max_amount, timeframe, approve).await,
    }
}
