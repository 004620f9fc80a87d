//! storecredit-client CLI entry point.

use clap::Parser;

use storecredit_client::cli::{Cli, Commands, OutputFormat};
use storecredit_client::client::StoreCreditClient;
use storecredit_client::output::{format_output, pretty};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = StoreCreditClient::new(&cli.base_url).with_token(cli.token.clone());

    match cli.command {
        Commands::Credits(credits_cmd) => {
            use storecredit_client::cli::credits::CreditsAction;
            match credits_cmd.action {
                CreditsAction::List => {
                    let balances = client.list_balances().await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&balances, cli.format)),
                        OutputFormat::Pretty => println!("{}", pretty::format_summaries(&balances)),
                    }
                }
                CreditsAction::Add(args) => {
                    let response = client.add_credit(&args.into()).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&response, cli.format)),
                        OutputFormat::Pretty => {
                            println!("Added:\n{}", pretty::format_operation(&response))
                        }
                    }
                }
                CreditsAction::Deduct(args) => {
                    let response = client.deduct_credit(&args.into()).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&response, cli.format)),
                        OutputFormat::Pretty => {
                            println!("Deducted:\n{}", pretty::format_operation(&response))
                        }
                    }
                }
                CreditsAction::Balance { customer_id } => {
                    let balance = client.get_balance(customer_id).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&balance, cli.format)),
                        OutputFormat::Pretty => println!("{}", pretty::format_balance(&balance)),
                    }
                }
                CreditsAction::History { id } => {
                    let history = client.history(id).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&history, cli.format)),
                        OutputFormat::Pretty => println!("{}", pretty::format_history(&history)),
                    }
                }
                CreditsAction::Delete { id } => {
                    client.delete_store_credit(id).await?;
                    if !cli.quiet {
                        println!("Deleted store credit {}", id);
                    }
                }
            }
        }
        Commands::Customers(customers_cmd) => {
            use storecredit_client::cli::customers::CustomersAction;
            match customers_cmd.action {
                CustomersAction::List => {
                    let customers = client.list_customers().await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&customers, cli.format)),
                        OutputFormat::Pretty => {
                            println!("{}", pretty::format_customers(&customers))
                        }
                    }
                }
            }
        }
        Commands::Config(config_cmd) => {
            use storecredit_client::cli::config::ConfigAction;
            let config = match config_cmd.action {
                ConfigAction::Get => client.get_config().await?,
                ConfigAction::Set { value } => client.set_default_value_per_credit(value).await?,
            };
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&config, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_config(&config)),
            }
        }
        Commands::Health(health_cmd) => {
            use storecredit_client::cli::health::HealthAction;
            match health_cmd.action {
                HealthAction::Live => {
                    client.livez().await?;
                    if !cli.quiet {
                        println!("Server is live at {}", client.base_url());
                    }
                }
                HealthAction::Ready => {
                    let health = client.healthz().await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&health, cli.format)),
                        OutputFormat::Pretty => println!(
                            "Storage: {}",
                            if health.healthy { "healthy" } else { "unhealthy" }
                        ),
                    }
                }
            }
        }
    }

    Ok(())
}
