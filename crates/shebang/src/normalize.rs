//! Command normalization: chase shebang indirection to a runnable command

use crate::shebang;
use crate::{Command, Error, Resolver, Result};
use tracing::{debug, instrument};

impl Resolver {
    /// Normalize a command so its program can be executed directly.
    ///
    /// The program token is resolved, the resolved file's shebang (if any) is
    /// prepended, and the new program token is resolved again. This is a
    /// fixed two-pass resolution: a shebang interpreter that is itself a
    /// script is not followed further.
    #[instrument(skip(self, cmd), fields(command = %cmd), level = "debug")]
    pub fn normalize_command(&self, cmd: &Command) -> Result<Command> {
        let (head, args) = cmd.tokens().split_first().ok_or(Error::EmptyCommand)?;

        let exe = self.normalize_exe(head)?;
        let interpreter = shebang::parse_file(&exe)?;
        if !interpreter.is_empty() {
            debug!(script = %exe, %interpreter, "following shebang");
        }

        let mut tokens = interpreter.into_vec();
        tokens.push(exe);
        tokens.extend(args.iter().cloned());

        // The shebang may name another bare executable
        let exe = self.normalize_exe(&tokens[0])?;
        tokens[0] = exe;
        Ok(Command::from(tokens))
    }
}

/// Resolve an executable reference against the process `PATH`
pub fn normalize_exe(exe: &str) -> Result<String> {
    Resolver::from_env()?.normalize_exe(exe)
}

/// Normalize a command against the process `PATH`
pub fn normalize_command(cmd: &Command) -> Result<Command> {
    Resolver::from_env()?.normalize_command(cmd)
}
