use anyhow::Context;
use clap::Parser;
use colored::*;
use github_repo_browser::actors::browser::{current_view, settled_view};
use github_repo_browser::actors::{BrowserMessage, RepositoryBrowser};
use github_repo_browser::cli::{Cli, OutputFormat, PromptCommand, PROMPT_HELP};
use github_repo_browser::github::GitHubClient;
use github_repo_browser::models::{LANGUAGE_CHOICES, STAR_CHOICES, YEAR_CHOICES};
use github_repo_browser::query_form::QueryForm;
use github_repo_browser::render::{render_json, render_text, BrowserView};
use ractor::ActorRef;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const VIEW_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Diagnostics go to stderr so stdout stays clean for --format json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(?cli, "Parsed command line");

    let client = GitHubClient::new(cli.client_config()).context("Failed to build GitHub client")?;
    let client = Arc::new(client);
    let browser = RepositoryBrowser::spawn(client, cli.zone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start repository browser: {}", e))?;

    if let Some(username) = cli.username.clone() {
        show_user(&browser, username).await?;
        apply_initial_filters(&browser, &cli)?;
        print_view(&current_view(&browser, Some(VIEW_TIMEOUT)).await?, cli.format)?;
    }

    if cli.wants_prompt() {
        run_prompt(&browser, cli.format).await?;
    }

    browser.stop(Some("Done".to_string()));
    Ok(())
}

async fn show_user(browser: &ActorRef<BrowserMessage>, username: String) -> anyhow::Result<()> {
    browser
        .send_message(BrowserMessage::ShowUser(username))
        .map_err(|e| anyhow::anyhow!("Failed to send ShowUser: {:?}", e))?;
    // The fetch itself has no deadline, so neither does the wait.
    settled_view(browser, None).await?;
    Ok(())
}

fn apply_initial_filters(browser: &ActorRef<BrowserMessage>, cli: &Cli) -> anyhow::Result<()> {
    let filters = cli.initial_filters();
    let messages = [
        BrowserMessage::SetStars(filters.stars),
        BrowserMessage::SetLanguage(filters.language),
        BrowserMessage::SetYear(filters.year),
        BrowserMessage::GoToPage(cli.page),
    ];
    for message in messages {
        browser
            .send_message(message)
            .map_err(|e| anyhow::anyhow!("Failed to send filter: {:?}", e))?;
    }
    Ok(())
}

fn print_view(view: &BrowserView, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(view)),
        OutputFormat::Json => println!("{}", render_json(view)?),
    }
    Ok(())
}

fn print_options() {
    println!("{} {}", "stars:".bold(), STAR_CHOICES.join(", "));
    println!("{} {}", "languages:".bold(), LANGUAGE_CHOICES.join(", "));
    let years: Vec<String> = YEAR_CHOICES.iter().map(|y| y.to_string()).collect();
    println!("{} {}", "years:".bold(), years.join(", "));
}

async fn run_prompt(
    browser: &ActorRef<BrowserMessage>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    println!("{}", "GitHub Repository Browser".bold().green());
    println!("{}\n", "Type a username, or 'help' for commands.".dimmed());

    let mut form = QueryForm::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match PromptCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                continue;
            }
        };

        let message = match command {
            PromptCommand::User(name) => {
                form.input(&name);
                let username = form.submit();
                if form.should_show_results() {
                    info!(%username, "Browsing user");
                    show_user(browser, username).await?;
                }
                None
            }
            PromptCommand::Stars(stars) => Some(BrowserMessage::SetStars(stars)),
            PromptCommand::Language(language) => Some(BrowserMessage::SetLanguage(language)),
            PromptCommand::Year(year) => Some(BrowserMessage::SetYear(year)),
            PromptCommand::Page(page) => Some(BrowserMessage::GoToPage(page)),
            PromptCommand::Next => Some(BrowserMessage::NextPage),
            PromptCommand::Prev => Some(BrowserMessage::PrevPage),
            PromptCommand::Clear => Some(BrowserMessage::ClearFilters),
            PromptCommand::Show => None,
            PromptCommand::Options => {
                print_options();
                continue;
            }
            PromptCommand::Help => {
                println!("{}", PROMPT_HELP);
                continue;
            }
            PromptCommand::Quit => break,
        };

        if let Some(message) = message {
            browser
                .send_message(message)
                .map_err(|e| anyhow::anyhow!("Failed to send message: {:?}", e))?;
        }

        print_view(&current_view(browser, Some(VIEW_TIMEOUT)).await?, format)?;
    }

    Ok(())
}
