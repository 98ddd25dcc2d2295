//! gatelog front-desk CLI.

mod client;

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use gatelog_core::record::{RecordKind, VisitorRecord};
use tracing_subscriber::EnvFilter;

use client::{ApiClient, ApiConfig, ListQuery, Registration};

#[derive(Parser)]
#[command(author, version, about = "gatelog front-desk client")]
struct Cli {
  /// Base URL of the gatelog server.
  #[arg(long, default_value = "http://localhost:8080")]
  url: String,

  /// Basic-auth username.
  #[arg(long, default_value = "frontdesk")]
  username: String,

  /// Basic-auth password.
  #[arg(long, default_value = "")]
  password: String,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// List visitors, filtered and sorted like the log screen.
  List {
    /// Restrict to these statuses (repeatable): In, Out, Pending.
    #[arg(long)]
    status: Vec<String>,
    /// Restrict to these departments (repeatable).
    #[arg(long)]
    department: Vec<String>,
    /// Free-text search over name, contact, purpose, and department.
    #[arg(long)]
    search: Option<String>,
    /// Sort key: name, check_in_time, status, department.
    #[arg(long)]
    sort: Option<String>,
    /// Reverse the sort order.
    #[arg(long)]
    descending: bool,
  },
  /// Show one visitor record.
  Show { id: String },
  /// Register a new visitor (status starts as Pending).
  Register {
    #[arg(long)]
    name: String,
    #[arg(long)]
    contact: String,
    #[arg(long)]
    purpose: String,
    #[arg(long)]
    whom_to_meet: Option<String>,
    #[arg(long)]
    department: Option<String>,
    /// Register a cab booking instead of a walk-in visitor.
    #[arg(long)]
    cab: bool,
  },
  /// Check a pending visitor in.
  CheckIn { id: String },
  /// Check a visitor out. Asks for confirmation unless --yes is given.
  CheckOut {
    id: String,
    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
  },
  /// Delete a visitor record. Asks for confirmation unless --yes is given.
  Remove {
    id: String,
    #[arg(long)]
    yes: bool,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let cli = Cli::parse();
  let client = ApiClient::new(ApiConfig {
    base_url: cli.url,
    username: cli.username,
    password: cli.password,
  })?;

  match cli.command {
    Command::List { status, department, search, sort, descending } => {
      let query = ListQuery {
        status: join_nonempty(status),
        department: join_nonempty(department),
        search,
        sort,
        direction: descending.then(|| "descending".to_owned()),
      };
      let visitors = client.list_visitors(&query).await?;
      if visitors.is_empty() {
        println!("No visitors found");
      }
      for v in visitors {
        print_row(&v);
      }
    }

    Command::Show { id } => {
      let visitor = client
        .get_visitor(&id)
        .await?
        .ok_or_else(|| anyhow!("visitor {id} not found"))?;
      println!("{}", serde_json::to_string_pretty(&visitor)?);
    }

    Command::Register { name, contact, purpose, whom_to_meet, department, cab } => {
      let kind =
        if cab { RecordKind::Cab } else { RecordKind::Visitor };
      let visitor = client
        .register(&Registration {
          name,
          contact_number: contact,
          purpose_of_visit: purpose,
          whom_to_meet,
          department,
          kind: kind.as_str().to_owned(),
        })
        .await?;
      println!("registered {} ({})", visitor.name, visitor.id);
    }

    Command::CheckIn { id } => {
      let visitor = client.check_in(&id).await?;
      println!("checked in {} at {}", visitor.name, local_time(visitor.check_in_time));
    }

    Command::CheckOut { id, yes } => {
      let visitor = client
        .get_visitor(&id)
        .await?
        .ok_or_else(|| anyhow!("visitor {id} not found"))?;
      if !yes && !confirm(&format!("Check out {}?", visitor.name))? {
        bail!("cancelled");
      }
      let visitor = client.check_out(&id).await?;
      println!(
        "checked out {} at {}",
        visitor.name,
        local_time(visitor.check_out_time)
      );
    }

    Command::Remove { id, yes } => {
      if !yes && !confirm(&format!("Delete visitor record {id}?"))? {
        bail!("cancelled");
      }
      client.remove(&id).await?;
      println!("removed {id}");
    }
  }

  Ok(())
}

fn join_nonempty(values: Vec<String>) -> Option<String> {
  if values.is_empty() { None } else { Some(values.join(",")) }
}

fn local_time(ts: Option<DateTime<Utc>>) -> String {
  match ts {
    Some(ts) => ts.with_timezone(&Local).format("%H:%M").to_string(),
    None => "—".to_owned(),
  }
}

fn print_row(v: &VisitorRecord) {
  println!(
    "{:<36}  {:<8}  {:<24}  {:<14}  in {:>5}  {}",
    v.id,
    v.status,
    v.name,
    v.contact_number,
    local_time(v.check_in_time),
    v.department,
  );
}

/// Second step of the two-step confirm gesture: nothing destructive happens
/// on a bare command alone.
fn confirm(prompt: &str) -> Result<bool> {
  use std::io::{self, BufRead, Write};
  print!("{prompt} [y/N] ");
  io::stdout().flush()?;
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  let answer = line.trim().to_ascii_lowercase();
  Ok(answer == "y" || answer == "yes")
}
