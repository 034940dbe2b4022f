//! Command parser for the : command system

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Form commands
    Submit,
    Address(String),
    Chain(String),

    // Result commands
    Export(Option<String>),
    Clear,

    // App commands
    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.to_lowercase().as_str() {
        "submit" | "go" | "sample" => Command::Submit,
        "address" | "addr" => {
            if let Some(addr) = args {
                Command::Address(addr)
            } else {
                Command::Unknown(input.to_string())
            }
        }
        "chain" => {
            if let Some(chain) = args {
                Command::Chain(chain)
            } else {
                Command::Unknown(input.to_string())
            }
        }
        "export" | "save" => Command::Export(args),
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_commands() {
        assert_eq!(parse_command("submit"), Command::Submit);
        assert_eq!(parse_command("  go "), Command::Submit);
        assert_eq!(
            parse_command("address 0x1234"),
            Command::Address("0x1234".to_string())
        );
        assert_eq!(
            parse_command("chain arbitrum"),
            Command::Chain("arbitrum".to_string())
        );
    }

    #[test]
    fn test_parse_result_commands() {
        assert_eq!(parse_command("export"), Command::Export(None));
        assert_eq!(
            parse_command("export /tmp/out.csv"),
            Command::Export(Some("/tmp/out.csv".to_string()))
        );
        assert_eq!(parse_command("clear"), Command::Clear);
    }

    #[test]
    fn test_parse_missing_arguments() {
        assert_eq!(parse_command("addr"), Command::Unknown("addr".to_string()));
        assert_eq!(parse_command("chain   "), Command::Unknown("chain".to_string()));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse_command("QUIT"), Command::Quit);
        assert_eq!(
            parse_command("notacommand"),
            Command::Unknown("notacommand".to_string())
        );
    }
}
