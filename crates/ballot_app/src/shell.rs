//! Line-oriented front end: reads commands, runs the matching dashboard
//! action and prints any alerts it raised.

use std::io::Write;

use anyhow::Result;
use ballot_chain::checksum;
use ballot_ui::DashboardService;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::commands::{Command, CommandTable};

const PROMPT: &str = "ballot> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run commands from `input` until `quit` or end of input.
pub async fn run<R, W>(
    service: &mut DashboardService,
    table: &CommandTable,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", service.render())?;
    writeln!(out, "Type `help` for a list of commands.")?;

    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            debug!("end of input");
            break;
        };

        let flow = match table.parse(&line) {
            Ok(Some(command)) => execute(service, table, command, out).await?,
            Ok(None) => Flow::Continue,
            Err(e) => {
                writeln!(out, "{}", e.user_message())?;
                Flow::Continue
            }
        };
        print_alerts(service, out)?;

        if flow == Flow::Quit {
            break;
        }
    }

    service.flush_background().await;
    info!("dashboard closed");
    Ok(())
}

/// Run a single command against the dashboard.
pub async fn execute<W: Write>(
    service: &mut DashboardService,
    table: &CommandTable,
    command: Command,
    out: &mut W,
) -> Result<Flow> {
    debug!(command = command.name(), "executing");
    match command {
        Command::Help(None) => write!(out, "{}", table.generate_help_all())?,
        Command::Help(Some(name)) => match table.generate_help(&name) {
            Ok(text) => write!(out, "{text}")?,
            Err(e) => writeln!(out, "{}", e.user_message())?,
        },
        Command::ToggleImport => {
            service.toggle_import_form();
            let state = if service.data().import_toggle { "open" } else { "closed" };
            writeln!(out, "Import form {state}.")?;
        }
        Command::Key(kind) => {
            if let Some(kind) = service.select_key_kind(&kind) {
                writeln!(out, "Key type: {kind}")?;
            }
        }
        Command::Import { address, material } => {
            if service.import_wallet(&address, &material).await {
                writeln!(out, "{}", service.render())?;
            }
        }
        Command::Create => {
            let address = service.create_wallet().await;
            writeln!(out, "New wallet {}", checksum(address))?;
            if let Some(wallet) = service.wallet() {
                writeln!(
                    out,
                    "Private key: {} (not stored, save it now)",
                    wallet.private_key_hex()
                )?;
            }
            writeln!(out, "{}", service.render())?;
        }
        Command::Claim => {
            service.claim_tokens().await;
            writeln!(out, "{}", service.render())?;
        }
        Command::Ballot(address) => {
            if service.connect_ballot(&address).await {
                writeln!(out, "{}", service.render())?;
            }
        }
        Command::Vote { proposal, amount } => {
            match service.cast_vote(&proposal, &amount).await {
                Some(tx) => writeln!(out, "Vote sent: {tx:?}")?,
                None if !service.has_ballot() => writeln!(out, "No ballot connected.")?,
                None => writeln!(out, "Vote not sent, see the log for details.")?,
            }
        }
        Command::Delegate(target) => match service.delegate(target.as_deref()).await {
            Some(tx) => writeln!(out, "Delegation sent: {tx:?}")?,
            None => writeln!(out, "Delegation not sent, see the log for details.")?,
        },
        Command::Refresh => {
            service.refresh().await;
            writeln!(out, "{}", service.render())?;
        }
        Command::Show => writeln!(out, "{}", service.render())?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Print unread alerts in the order they were raised and mark them read.
fn print_alerts<W: Write>(service: &mut DashboardService, out: &mut W) -> Result<()> {
    for alert in service.notifications().unread().iter().filter(|n| n.is_alert()) {
        writeln!(out, "ALERT:\n{}", alert.message.trim_end())?;
    }
    service.notifications_mut().mark_all_read();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ballot_backend::HttpBackend;
    use ballot_chain::{ContractArtifact, EthersChainClient, Network, RpcConfigStore};

    use super::*;

    /// A dashboard wired to real clients pointing at a closed local port.
    /// Only commands that never reach the network are exercised.
    fn offline_service() -> DashboardService {
        let rpc = RpcConfigStore::with_defaults()
            .resolve(Network::Localhost, Some("http://127.0.0.1:9"))
            .unwrap();
        let chain = EthersChainClient::new(
            &rpc,
            ContractArtifact::token(None).unwrap(),
            ContractArtifact::ballot(None).unwrap(),
        )
        .unwrap();
        let backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        DashboardService::new(Arc::new(chain), Arc::new(backend), 4)
    }

    async fn run_script(script: &str) -> (DashboardService, String) {
        let mut service = offline_service();
        let table = CommandTable::new();
        let mut out = Vec::new();
        run(&mut service, &table, script.as_bytes(), &mut out)
            .await
            .unwrap();
        (service, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn validation_alerts_are_printed() {
        let (_, out) = run_script("import 0x123\nballot nope\nquit\n").await;
        assert!(out.contains(
            "ALERT:\n* A type of key must be selected.\n* Address is invalid.\n* Mnemonic/Private key input should not be empty."
        ));
        assert!(out.contains("ALERT:\nEnter a valid ballot address."));
    }

    #[tokio::test]
    async fn alerts_are_printed_once() {
        let (service, out) = run_script("ballot 0x1\nshow\n").await;
        assert_eq!(out.matches("ALERT:").count(), 1);
        assert_eq!(service.notifications().unread_count(), 0);
    }

    #[tokio::test]
    async fn form_commands_update_state() {
        let (service, out) = run_script("toggle-import\nkey mnemonic\nkey keystore\n").await;
        assert!(out.contains("Import form open."));
        assert!(out.contains("Key type: mnemonic"));
        assert!(out.contains("ALERT:\nunknown key type: keystore"));
        assert!(service.data().key_selected);
    }

    #[tokio::test]
    async fn vote_without_ballot_does_nothing() {
        let (service, out) = run_script("vote 0 1\n").await;
        assert!(out.contains("No ballot connected."));
        assert!(service.data().last_transaction.is_none());
    }

    #[tokio::test]
    async fn bad_input_prints_usage_and_continues() {
        let (_, out) = run_script("vote 1\nfrobnicate\nhelp quit\n").await;
        assert!(out.contains("Usage: vote <proposal> <amount>"));
        assert!(out.contains("Unknown command: frobnicate"));
        assert!(out.contains("quit - Leave the dashboard"));
    }

    #[tokio::test]
    async fn quit_stops_reading() {
        let (_, out) = run_script("quit\nshow\n").await;
        // Initial render only; `show` after `quit` is never run.
        assert_eq!(out.matches("== Tokenized Ballot").count(), 1);
    }
}
