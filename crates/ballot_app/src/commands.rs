use std::collections::HashMap;

use ballot_core::BallotError;
use tracing::debug;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A registered shell command.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    pub usage: String,
    pub aliases: Vec<String>,
}

/// A parsed line of input, one variant per dashboard action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help(Option<String>),
    ToggleImport,
    Key(String),
    Import { address: String, material: String },
    Create,
    Claim,
    Ballot(String),
    Vote { proposal: String, amount: String },
    Delegate(Option<String>),
    Refresh,
    Show,
    Quit,
}

impl Command {
    /// Command name for logging. Never includes arguments, which may hold
    /// key material.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help(_) => "help",
            Command::ToggleImport => "toggle-import",
            Command::Key(_) => "key",
            Command::Import { .. } => "import",
            Command::Create => "create",
            Command::Claim => "claim",
            Command::Ballot(_) => "ballot",
            Command::Vote { .. } => "vote",
            Command::Delegate(_) => "delegate",
            Command::Refresh => "refresh",
            Command::Show => "show",
            Command::Quit => "quit",
        }
    }
}

/// name, description, usage, aliases
const BUILT_INS: &[(&str, &str, &str, &[&str])] = &[
    ("help", "Show help information", "help [command]", &["?"]),
    ("toggle-import", "Show or hide the import form", "toggle-import", &["form"]),
    ("key", "Select the key type for import", "key <mnemonic|private>", &[]),
    (
        "import",
        "Import a wallet from a mnemonic or private key",
        "import <address> <mnemonic words | private key>",
        &[],
    ),
    ("create", "Generate a new random wallet", "create", &["new"]),
    ("claim", "Request tokens from the faucet", "claim", &["faucet"]),
    ("ballot", "Connect to a ballot contract", "ballot <address>", &["connect"]),
    ("vote", "Vote for a proposal", "vote <proposal> <amount>", &[]),
    (
        "delegate",
        "Delegate voting power (to yourself by default)",
        "delegate [address]",
        &[],
    ),
    ("refresh", "Reload balances and ballot state", "refresh", &["reload"]),
    ("show", "Print the dashboard", "show", &["status"]),
    ("quit", "Leave the dashboard", "quit", &["exit", "q"]),
];

// ---------------------------------------------------------------------------
// CommandTable
// ---------------------------------------------------------------------------

/// Command registry with alias resolution, help text and line parsing.
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: HashMap<String, CommandSpec>,
}

impl CommandTable {
    pub fn new() -> Self {
        let commands = BUILT_INS
            .iter()
            .map(|(name, description, usage, aliases)| {
                (
                    name.to_string(),
                    CommandSpec {
                        name: name.to_string(),
                        description: description.to_string(),
                        usage: usage.to_string(),
                        aliases: aliases.iter().map(|a| a.to_string()).collect(),
                    },
                )
            })
            .collect::<HashMap<_, _>>();
        debug!(count = commands.len(), "command table initialised");
        Self { commands }
    }

    /// Find a command by name or alias.
    pub fn get_command(&self, name: &str) -> Option<&CommandSpec> {
        if let Some(cmd) = self.commands.get(name) {
            return Some(cmd);
        }
        self.commands
            .values()
            .find(|cmd| cmd.aliases.iter().any(|a| a == name))
    }

    /// All commands sorted by name.
    pub fn list_commands(&self) -> Vec<&CommandSpec> {
        let mut cmds: Vec<_> = self.commands.values().collect();
        cmds.sort_by_key(|c| &c.name);
        cmds
    }

    pub fn generate_help(&self, command_name: &str) -> Result<String, BallotError> {
        let cmd = self
            .get_command(command_name)
            .ok_or_else(|| BallotError::Validation(format!("Unknown command: {command_name}")))?;

        let mut help = format!("{} - {}\n\nUsage: {}\n", cmd.name, cmd.description, cmd.usage);
        if !cmd.aliases.is_empty() {
            help.push_str(&format!("Aliases: {}\n", cmd.aliases.join(", ")));
        }
        Ok(help)
    }

    pub fn generate_help_all(&self) -> String {
        let mut help = String::from("Available commands:\n\n");
        for cmd in self.list_commands() {
            let aliases = if cmd.aliases.is_empty() {
                String::new()
            } else {
                format!(" ({})", cmd.aliases.join(", "))
            };
            help.push_str(&format!("  {:<16} {}{}\n", cmd.name, cmd.description, aliases));
        }
        help
    }

    // -- Parsing -------------------------------------------------------------

    /// Parse one input line. Blank lines yield `None`.
    ///
    /// Missing form fields are passed through as empty strings so the
    /// dashboard reports them the same way an empty form would.
    pub fn parse(&self, line: &str) -> Result<Option<Command>, BallotError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));
        let spec = self
            .get_command(&word.to_ascii_lowercase())
            .ok_or_else(|| BallotError::Validation(format!("Unknown command: {word}. Type `help`.")))?;
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match spec.name.as_str() {
            "help" => Command::Help(args.first().map(|s| s.to_string())),
            "toggle-import" => Command::ToggleImport,
            "key" => match args.as_slice() {
                [kind] => Command::Key(kind.to_string()),
                _ => return Err(usage(spec)),
            },
            "import" => {
                let (address, material) = rest
                    .split_once(char::is_whitespace)
                    .map(|(a, m)| (a, m.trim()))
                    .unwrap_or((rest, ""));
                Command::Import {
                    address: address.to_string(),
                    material: material.to_string(),
                }
            }
            "create" => Command::Create,
            "claim" => Command::Claim,
            "ballot" => Command::Ballot(rest.to_string()),
            "vote" => match args.as_slice() {
                [proposal, amount] => Command::Vote {
                    proposal: proposal.to_string(),
                    amount: amount.to_string(),
                },
                _ => return Err(usage(spec)),
            },
            "delegate" => match args.as_slice() {
                [] => Command::Delegate(None),
                [address] => Command::Delegate(Some(address.to_string())),
                _ => return Err(usage(spec)),
            },
            "refresh" => Command::Refresh,
            "show" => Command::Show,
            "quit" => Command::Quit,
            other => {
                return Err(BallotError::Internal(format!("command `{other}` has no handler")));
            }
        };
        Ok(Some(command))
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

fn usage(spec: &CommandSpec) -> BallotError {
    BallotError::Validation(format!("Usage: {}", spec.usage))
}
