use std::io::{self, Write};

use crate::config::Config;
use crate::error::{MonitorError, Result};

fn prompt(question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = prompt(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;

        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Buildkite Monitor Configuration");
    println!("===============================\n");

    let token = prompt(
        "Enter your Buildkite API token (create one at https://buildkite.com/user/api-access-tokens): ",
    )?;

    if token.is_empty() {
        return Err(MonitorError::MissingToken);
    }

    let projects = prompt("Projects to watch as org/pipeline, comma separated [optional]: ")?;

    let config = Config {
        token: Some(token),
        projects: parse_project_list(&projects),
        ..Config::default()
    };

    let saved = config.save()?;

    println!("\nConfig saved to {}", saved.display());
    println!("Run 'bkmon pipelines' to see what you can watch.");

    Ok(())
}

fn parse_project_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
