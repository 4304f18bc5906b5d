use std::process::Command;

use shlex::Shlex;

use crate::utils::errors::{OptionResultTrait as _, ResultWithError};

pub struct ShlexUtils {}

impl ShlexUtils {
    pub fn parse_command(input: &str) -> ResultWithError<Command> {
        let parts = Self::split(input)?;

        let (program, args) = parts
            .split_first()
            .auto_err(format!("Failed to split command: {}", input))?;
        let mut command = Command::new(program);
        command.args(args);
        Ok(command)
    }

    pub fn split(input: &str) -> ResultWithError<Vec<String>> {
        let mut lexer = Shlex::new(input);
        let parts: Vec<_> = lexer.by_ref().collect();
        if lexer.had_error {
            return Err(format!("Unbalanced quotes in command: {}", input).into());
        }
        Ok(parts)
    }

    /// First word of a command line, e.g. `npx` for `npx nx build app`.
    pub fn program(input: &str) -> ResultWithError<String> {
        Self::split(input)?
            .into_iter()
            .next()
            .auto_err(format!("Empty command: {}", input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_quoted_arguments() {
        let parts = ShlexUtils::split("npx nx e2e 'my app-e2e' --headless").unwrap();
        assert_eq!(parts, vec!["npx", "nx", "e2e", "my app-e2e", "--headless"]);
        assert_eq!(ShlexUtils::program("npx nx build").unwrap(), "npx");
    }

    #[test]
    fn rejects_empty_and_unbalanced_commands() {
        assert!(ShlexUtils::parse_command("").is_err());
        assert!(ShlexUtils::split("echo 'oops").is_err());
    }
}
