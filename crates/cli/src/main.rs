use std::io::{self, Write};

use anyhow::{Context, Result};
use bankdesk_core::{BillPolicy, RuleTable};
use bankdesk_observability::init_tracing;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bankdesk")]
#[command(about = "BankDesk customer-support chatbot CLI")]
struct Cli {
    /// Whether the bill rule answers with payment steps or "not available".
    #[arg(long, env = "CHATBOT_BILL_PAYMENTS", default_value = "unavailable")]
    bill_payments: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify a single message and print the reply.
    Ask {
        message: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Interactive chat loop.
    Chat,
    /// Print the rule catalog as JSON.
    Rules,
}

fn main() -> Result<()> {
    init_tracing("bankdesk_cli");
    let cli = Cli::parse();

    let bill_policy = cli
        .bill_payments
        .parse::<BillPolicy>()
        .context("invalid --bill-payments value")?;
    let rules = RuleTable::new(bill_policy);

    match cli.command {
        Command::Ask { message, json } => {
            let classification = rules.classify(message.as_deref());
            tracing::debug!(intent = %classification.intent, "message classified");
            if json {
                println!("{}", serde_json::to_string_pretty(&classification)?);
            } else {
                println!("{}", classification.reply);
            }
        }
        Command::Chat => run_chat(&rules)?,
        Command::Rules => {
            println!("{}", serde_json::to_string_pretty(&rules.catalog())?);
        }
    }

    Ok(())
}

fn run_chat(rules: &RuleTable) -> Result<()> {
    println!("{}", rules.catalog().welcome_reply);
    println!("type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        println!("\n{}\n", rules.reply(Some(message)));
    }

    Ok(())
}
