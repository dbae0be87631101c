//! Terminal output and the interactive fuzzy-match prompt.

use authorlist::{
  error::AuthorListError,
  matcher::{Candidate, Resolver},
  report::{Finding, Report},
};
use console::style;
use dialoguer::{theme::ColorfulTheme, Select};

use super::*;

/// Something to tell the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Progress information
  Info(&'a str),
  /// A step finished
  Success(&'a str),
  /// The run failed
  Error(&'a CliError),
  /// End-of-run summary of everything that was worked around
  Report(&'a Report),
}

/// How the CLI talks to its user.
pub trait UserInteraction {
  /// Shows `content` to the user.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// Interaction through the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal {
  /// Decline every fuzzy match instead of prompting
  pub accept_defaults: bool,
}

impl Terminal {
  /// Creates a terminal interaction; with `accept_defaults` no prompt is ever shown.
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults } }
}

impl UserInteraction for Terminal {
  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Info(message) => println!("{} {message}", style(INFO_PREFIX).blue()),
      ResponseContent::Success(message) => println!("{} {message}", style(SUCCESS_PREFIX).green()),
      ResponseContent::Error(error) => {
        eprintln!("{} {}", style(ERROR_PREFIX).red(), style(error).red())
      },
      ResponseContent::Report(report) => {
        let unmatched = report.unmatched_infrastructure();
        if unmatched.is_empty() {
          println!(
            "\n{} All infrastructure authors were successfully matched.",
            style(SUCCESS_PREFIX).green()
          );
        } else {
          println!(
            "\n{} Infrastructure authors not found in author list ({}):",
            style(WARNING_PREFIX).yellow(),
            unmatched.len()
          );
          for (i, name) in unmatched.iter().enumerate() {
            let branch = if i + 1 == unmatched.len() { TREE_LEAF } else { TREE_BRANCH };
            println!("  {branch}─ {}", style(name).yellow());
          }
        }

        let others: Vec<_> = report
          .iter()
          .filter(|finding| !matches!(finding, Finding::UnmatchedInfrastructure { .. }))
          .collect();
        if !others.is_empty() {
          println!("\n{} Other notes ({}):", style(INFO_PREFIX).blue(), others.len());
          for finding in others {
            println!("  {TREE_VERT} {finding}");
          }
        }
      },
    }
    Ok(())
  }
}

impl Resolver for Terminal {
  fn resolve(
    &mut self,
    query: &str,
    candidates: &[Candidate<'_>],
  ) -> authorlist::error::Result<Option<usize>> {
    if self.accept_defaults {
      trace!("Declining fuzzy candidates for '{query}' (--accept-defaults)");
      return Ok(None);
    }
    if !console::user_attended() {
      warn!("Not attached to a terminal, declining fuzzy candidates for '{query}'");
      return Ok(None);
    }

    println!(
      "\n{} Infrastructure author '{}' not found exactly.",
      style(PROMPT_PREFIX).cyan(),
      style(query).bold()
    );
    let mut items: Vec<String> = candidates
      .iter()
      .map(|c| format!("{} (confidence: {}%)", c.record.full_name(), c.confidence))
      .collect();
    items.push("None of the above (skip this author)".to_string());

    let choice = Select::with_theme(&ColorfulTheme::default())
      .with_prompt("Possible matches")
      .items(&items)
      .default(0)
      .interact()
      .map_err(|e| AuthorListError::Prompt(e.to_string()))?;

    if choice < candidates.len() {
      println!(
        "{} Added '{}' as infrastructure author.",
        style(SUCCESS_PREFIX).green(),
        candidates[choice].record.full_name()
      );
      Ok(Some(choice))
    } else {
      println!("{} Skipping '{query}', no match selected.", style(INFO_PREFIX).blue());
      Ok(None)
    }
  }
}
