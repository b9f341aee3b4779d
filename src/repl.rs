//! Interactive REPL and command dispatch.

use crate::commands;
use colored::Colorize;
use ferry_client::Session;
use ferry_protocol::CommandCode;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::io::{AsyncRead, AsyncWrite};

const HELP_TEXT: &str = "\
exit           Exit the program (same as end-of-input)
get <file>     Copy a remote file to the local host
help           Show this help
ls             List the names of files on the server
put <file>     Copy a local file to the server
rm <file>      Remove a file from the server
";

/// One dispatched line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Terminate the session, same path as end-of-input.
    Exit,
    /// Print the help summary.
    Help,
    Ls,
    Get(String),
    Put(String),
    Rm(String),
    /// GET/PUT/RM given no filename operand; carries the command word.
    MissingOperand(&'static str),
    /// First token not present in the command table.
    Invalid,
}

/// Immutable command table, built once at process start.
fn command_table() -> &'static HashMap<&'static str, CommandCode> {
    static TABLE: OnceLock<HashMap<&'static str, CommandCode>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HashMap::from([
            ("exit", CommandCode::Exit),
            ("help", CommandCode::Help),
            ("ls", CommandCode::Ls),
            ("get", CommandCode::Get),
            ("put", CommandCode::Put),
            ("rm", CommandCode::Rm),
        ])
    })
}

/// Tokenizes one input line and maps it onto the command table.
///
/// Tokens are split on the single-space delimiter only, and the first
/// token is matched case-sensitively. An empty second token counts as
/// missing; tokens past the filename operand are ignored.
pub fn dispatch_line(line: &str) -> Dispatch {
    let mut tokens = line.split(' ');
    let word = tokens.next().unwrap_or("");
    let operand = tokens.next().filter(|token| !token.is_empty());

    let Some(&code) = command_table().get(word) else {
        return Dispatch::Invalid;
    };

    match code {
        CommandCode::Exit => Dispatch::Exit,
        CommandCode::Help => Dispatch::Help,
        CommandCode::Ls => Dispatch::Ls,
        CommandCode::Get | CommandCode::Put | CommandCode::Rm => {
            let Some(filename) = operand else {
                let word = match code {
                    CommandCode::Get => "get",
                    CommandCode::Put => "put",
                    _ => "rm",
                };
                return Dispatch::MissingOperand(word);
            };
            let filename = filename.to_string();
            match code {
                CommandCode::Get => Dispatch::Get(filename),
                CommandCode::Put => Dispatch::Put(filename),
                _ => Dispatch::Rm(filename),
            }
        }
        // Server-issued codes never appear in the table.
        _ => Dispatch::Invalid,
    }
}

/// Runs the interactive loop until exit or end-of-input.
///
/// Each iteration reads one line, dispatches it, and fully completes
/// the exchange before the next line is read. Only transport failures
/// escape the loop.
pub async fn run<S>(mut session: Session<S>) -> Result<(), Box<dyn std::error::Error>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();
    let mut rl: Editor<(), DefaultHistory> = Editor::with_config(config)?;

    let history_path = std::env::var("HOME")
        .map(|h| std::path::PathBuf::from(h).join(".ferry_history"))
        .unwrap_or_else(|_| ".ferry_history".into());
    let _ = rl.load_history(&history_path);

    println!("Type 'help' for available commands.\n");

    let result = loop {
        let prompt = format!("{} ", "ferry>".cyan());
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.is_empty() {
                    continue;
                }
                match dispatch_line(&line) {
                    Dispatch::Exit => break Ok(()),
                    Dispatch::Help => print!("{}", HELP_TEXT),
                    Dispatch::Invalid => tracing::error!("{}: invalid command", line),
                    Dispatch::MissingOperand(word) => {
                        tracing::error!("{}: missing filename operand", word)
                    }
                    dispatch => {
                        if let Err(e) = commands::execute(&mut session, dispatch).await {
                            if e.is_fatal() {
                                break Err(e.into());
                            }
                            tracing::error!("{}", e);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break Ok(()),
            Err(err) => break Err(err.into()),
        }
    };

    let _ = rl.save_history(&history_path);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_is_invalid() {
        assert_eq!(dispatch_line("bogus"), Dispatch::Invalid);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(dispatch_line("LS"), Dispatch::Invalid);
        assert_eq!(dispatch_line("Get x"), Dispatch::Invalid);
    }

    #[test]
    fn test_bare_commands() {
        assert_eq!(dispatch_line("exit"), Dispatch::Exit);
        assert_eq!(dispatch_line("help"), Dispatch::Help);
        assert_eq!(dispatch_line("ls"), Dispatch::Ls);
    }

    #[test]
    fn test_commands_with_operand() {
        assert_eq!(
            dispatch_line("get alpha.txt"),
            Dispatch::Get("alpha.txt".to_string())
        );
        assert_eq!(
            dispatch_line("put beta.bin"),
            Dispatch::Put("beta.bin".to_string())
        );
        assert_eq!(
            dispatch_line("rm gamma.log"),
            Dispatch::Rm("gamma.log".to_string())
        );
    }

    #[test]
    fn test_missing_operand_is_a_usage_error() {
        assert_eq!(dispatch_line("get"), Dispatch::MissingOperand("get"));
        assert_eq!(dispatch_line("put"), Dispatch::MissingOperand("put"));
        assert_eq!(dispatch_line("rm"), Dispatch::MissingOperand("rm"));
        // A trailing space yields an empty token, which also counts.
        assert_eq!(dispatch_line("get "), Dispatch::MissingOperand("get"));
    }

    #[test]
    fn test_tokens_past_the_operand_are_ignored() {
        assert_eq!(
            dispatch_line("get alpha.txt extra junk"),
            Dispatch::Get("alpha.txt".to_string())
        );
    }

    #[test]
    fn test_split_is_single_space_only() {
        // A leading space makes the first token empty, which matches
        // nothing in the table.
        assert_eq!(dispatch_line(" ls"), Dispatch::Invalid);
        // A double space makes the operand empty.
        assert_eq!(dispatch_line("get  x"), Dispatch::MissingOperand("get"));
        // Tabs are not delimiters.
        assert_eq!(dispatch_line("ls\textra"), Dispatch::Invalid);
    }
}
