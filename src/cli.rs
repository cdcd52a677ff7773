use crate::error::{RepoBrowserError, Result};
use crate::filter::{parse_language, Filters, StarFilter, YearFilter};
use crate::github::{ClientConfig, API_BASE_URL};
use crate::models::Zone;
use clap::{Parser, ValueEnum};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "github-repo-browser")]
#[command(
    about = "Browse a GitHub user's public repositories by stars, language and creation year"
)]
#[command(version = "0.1.0")]
pub struct Cli {
    /// GitHub username. Omit to start the interactive prompt
    pub username: Option<String>,

    /// Star filter: 1, 2, 3 or +4 (four or more)
    #[arg(long, value_parser = parse_star_arg)]
    pub stars: Option<StarFilter>,

    /// Language filter, matched case-insensitively
    #[arg(long)]
    pub language: Option<String>,

    /// Creation year filter
    #[arg(long)]
    pub year: Option<i32>,

    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Keep the prompt open after showing the first result
    #[arg(short, long)]
    pub interactive: bool,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = API_BASE_URL)]
    pub api_url: String,

    /// Request timeout in seconds. Unset keeps the HTTP client default
    #[arg(long, env = "REPO_BROWSER_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Use UTC instead of the local time zone for years and dates
    #[arg(long, env = "REPO_BROWSER_UTC")]
    pub utc: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_star_arg(s: &str) -> std::result::Result<StarFilter, String> {
    s.parse::<StarFilter>().map_err(|e| e.to_string())
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.api_url.clone(),
            timeout: self.timeout.map(Duration::from_secs),
            ..Default::default()
        }
    }

    pub fn zone(&self) -> Zone {
        if self.utc {
            Zone::utc()
        } else {
            Zone::Local
        }
    }

    pub fn initial_filters(&self) -> Filters {
        Filters {
            stars: self.stars.unwrap_or_default(),
            language: self.language.as_deref().and_then(parse_language),
            year: self.year.map(YearFilter::Year).unwrap_or_default(),
        }
    }

    pub fn wants_prompt(&self) -> bool {
        self.interactive || self.username.is_none()
    }
}

/// One line typed at the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    User(String),
    Stars(StarFilter),
    Language(Option<String>),
    Year(YearFilter),
    Page(usize),
    Next,
    Prev,
    Clear,
    Options,
    Show,
    Help,
    Quit,
}

pub const PROMPT_HELP: &str = "\
commands:
  user <name>    fetch and browse <name>'s repositories
  stars <s>      star filter: 1, 2, 3, +4 or any
  lang <l>       language filter (case-insensitive) or any
  year <y>       creation year filter or any
  page <n>       jump to page n
  next / prev    move one page
  clear          reset all filters
  options        list the suggested filter values
  show           redraw the current page
  quit           exit
any other single word is taken as a username; use `user <name>` for a
user whose name is one of the commands above";

impl PromptCommand {
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "user" => PromptCommand::User(rest.to_string()),
            "stars" => PromptCommand::Stars(rest.parse()?),
            "lang" | "language" => PromptCommand::Language(parse_language(rest)),
            "year" => PromptCommand::Year(rest.parse()?),
            "page" => PromptCommand::Page(rest.parse().map_err(|_| {
                RepoBrowserError::InvalidFilter(format!("page: {:?}", rest))
            })?),
            "next" => PromptCommand::Next,
            "prev" => PromptCommand::Prev,
            "clear" => PromptCommand::Clear,
            "options" => PromptCommand::Options,
            "show" => PromptCommand::Show,
            "help" | "?" => PromptCommand::Help,
            "quit" | "exit" => PromptCommand::Quit,
            // A bare word is taken as a username, like typing into the form.
            _ if rest.is_empty() => PromptCommand::User(word.to_string()),
            other => {
                return Err(RepoBrowserError::InvalidFilter(format!(
                    "unknown command {:?}",
                    other
                )))
            }
        };
        Ok(Some(command))
    }
}
