//! Interactive menu
//!
//! Numbered menu loop over the registry and the two passes.

use std::io::{self, BufRead, Write};

use crate::cli::commands::{execute, format_targets, Action, CommandContext};
use crate::core::{Config, Result};

/// Entries of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddTarget,
    ModifyTargets,
    Verify,
    Campaign,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::AddTarget),
            "2" => Some(Self::ModifyTargets),
            "3" => Some(Self::Verify),
            "4" => Some(Self::Campaign),
            "5" | "q" | "exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Interactive menu (Read-Eval-Print Loop)
pub struct Menu {
    ctx: CommandContext,
}

impl Menu {
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx }
    }

    /// Create a menu with the agent-browser stack from configuration
    pub fn with_config(config: &Config) -> Self {
        Self::new(CommandContext::from_config(config))
    }

    /// Run the menu until exit or EOF
    pub async fn run(&mut self) -> Result<()> {
        loop {
            print_menu();
            let Some(input) = prompt("Choose an option: ")? else {
                println!("\nGoodbye!");
                break;
            };

            let action = match MenuChoice::parse(&input) {
                Some(MenuChoice::Exit) => break,
                Some(MenuChoice::AddTarget) => {
                    let Some(url) = prompt("Enter the subscription URL: ")? else {
                        break;
                    };
                    Action::AddTarget { url, schema: None }
                }
                Some(MenuChoice::ModifyTargets) => match self.modify_targets() {
                    Some(action) => action,
                    None => continue,
                },
                Some(MenuChoice::Verify) => Action::Verify,
                Some(MenuChoice::Campaign) => Action::Campaign,
                None => {
                    println!("Invalid choice. Please try again.");
                    continue;
                }
            };

            match execute(action, &self.ctx).await {
                Ok(output) => println!("{}", output),
                Err(e) => eprintln!("Error: {}", e),
            }
        }

        Ok(())
    }

    /// Toggle selection; a failure is reported and the menu keeps running
    fn modify_targets(&self) -> Option<Action> {
        match self.choose_toggle() {
            Ok(action) => action,
            Err(e) => {
                eprintln!("Error: {}", e);
                None
            }
        }
    }

    /// List targets and ask which one to flip
    fn choose_toggle(&self) -> Result<Option<Action>> {
        let records = self.ctx.registry().list()?;
        println!("{}", format_targets(&records));
        if records.is_empty() {
            return Ok(None);
        }

        let Some(choice) =
            prompt("Enter the number to toggle verification status, or 'q' to quit: ")?
        else {
            return Ok(None);
        };
        if choice.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        match choice.parse::<usize>() {
            Ok(position) => Ok(Some(Action::Toggle { position })),
            Err(_) => {
                println!("Invalid selection.");
                Ok(None)
            }
        }
    }
}

fn print_menu() {
    println!("\n=== Subscription Runner ===");
    println!("1. Add Subscription URL");
    println!("2. Modify Subscription List");
    println!("3. Verify Mode (Test Unverified URLs)");
    println!("4. Campaign Mode (Use Verified URLs)");
    println!("5. Exit");
}

/// Print a prompt and read one trimmed line; `None` on EOF
fn prompt(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::AddTarget));
        assert_eq!(MenuChoice::parse(" 3 "), Some(MenuChoice::Verify));
        assert_eq!(MenuChoice::parse("4"), Some(MenuChoice::Campaign));
        assert_eq!(MenuChoice::parse("5"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("9"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn test_malformed_registry_keeps_menu_running() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("email_subscription.json");
        std::fs::write(&path, "[{\"url\": ").unwrap();

        let mut config = Config::default();
        config.registry.path = path;
        let menu = Menu::with_config(&config);

        assert!(menu.choose_toggle().is_err());
        assert!(menu.modify_targets().is_none());
    }
}
