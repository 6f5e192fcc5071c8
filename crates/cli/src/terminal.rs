use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use awsctx_connection::{ConnectionState, ConnectionStateChange};
use awsctx_core::{CredentialIdentifier, Partition, Region};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const VALID: Color = Color::Green;
    const INVALID: Color = Color::Red;
    const PENDING: Color = Color::Yellow;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

fn state_color(state: &ConnectionState) -> Color {
    match state {
        ConnectionState::Valid { .. } => Colors::VALID,
        ConnectionState::Invalid { .. } => Colors::INVALID,
        ConnectionState::Validating { .. } => Colors::PENDING,
        ConnectionState::NoSelection => Colors::DIM,
    }
}

/// Terminal output, colored text or JSON.
pub struct Terminal {
    json: bool,
}

impl Terminal {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn print_json(&self, value: &serde_json::Value) -> Result<()> {
        let mut stdout = io::stdout();
        writeln!(stdout, "{}", serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    fn print_header(&self, title: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print(format!("{}\n", title)),
            ResetColor,
        )?;
        Ok(())
    }

    /// Print the state plus recently used ids.
    pub fn print_status(
        &self,
        workspace: &str,
        state: &ConnectionState,
        recent_credentials: &[String],
        recent_regions: &[String],
    ) -> Result<()> {
        if self.json {
            return self.print_json(&serde_json::json!({
                "workspace": workspace,
                "connection": state,
                "recentlyUsedProfiles": recent_credentials,
                "recentlyUsedRegions": recent_regions,
            }));
        }

        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("workspace {}\n", workspace)),
            SetForegroundColor(state_color(state)),
            Print(format!("{}\n", state)),
            SetForegroundColor(Colors::DIM),
            Print(format!("recent profiles: {}\n", join_or_dash(recent_credentials))),
            Print(format!("recent regions:  {}\n", join_or_dash(recent_regions))),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// One line per state change.
    pub fn print_change(&self, change: &ConnectionStateChange) -> Result<()> {
        if self.json {
            let mut stdout = io::stdout();
            writeln!(stdout, "{}", serde_json::to_string(change)?)?;
            return Ok(());
        }

        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("[{}] #{} ", change.at.format("%H:%M:%S"), change.sequence)),
            SetForegroundColor(state_color(&change.state)),
            Print(format!("{}\n", change.state)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_credentials(&self, credentials: &[CredentialIdentifier], selected: Option<&str>) -> Result<()> {
        if self.json {
            return self.print_json(&serde_json::to_value(credentials)?);
        }
        let mut stdout = io::stdout();
        for credential in credentials {
            let marker = if Some(credential.id.as_str()) == selected { "*" } else { " " };
            let hint = credential
                .default_region_id
                .as_deref()
                .map(|r| format!(" ({})", r))
                .unwrap_or_default();
            execute!(
                stdout,
                Print(format!("{} {}", marker, credential.id)),
                SetForegroundColor(Colors::DIM),
                Print(format!("{}\n", hint)),
                ResetColor,
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    pub fn print_regions(&self, partitions: &[(Partition, Vec<Region>)], selected: Option<&str>) -> Result<()> {
        if self.json {
            let value: Vec<_> = partitions
                .iter()
                .map(|(p, regions)| serde_json::json!({ "partition": p, "regions": regions }))
                .collect();
            return self.print_json(&serde_json::Value::Array(value));
        }
        let mut stdout = io::stdout();
        for (partition, regions) in partitions {
            self.print_header(&format!("{} ({})", partition.description, partition.id))?;
            for region in regions {
                let marker = if Some(region.id.as_str()) == selected { "*" } else { " " };
                execute!(
                    stdout,
                    Print(format!("{} {:<16}", marker, region.id)),
                    SetForegroundColor(Colors::DIM),
                    Print(format!("{}\n", region.display_name)),
                    ResetColor,
                )?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut stderr = io::stderr();
        execute!(
            stderr,
            SetForegroundColor(Colors::INVALID),
            Print(format!("error: {}\n", msg)),
            ResetColor,
        )?;
        Ok(())
    }

    pub fn print_info(&self, msg: &str) -> Result<()> {
        if self.json {
            return Ok(());
        }
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        Ok(())
    }
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
