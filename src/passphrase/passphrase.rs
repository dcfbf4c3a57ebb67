use std::process::Command;

use crate::error::{error_codes, KmgrError, KmgrResult};
use crate::secure_memory::SecureBytes;

/// Minimum allowed passphrase length in bytes
pub const MIN_PASSPHRASE_LEN: usize = 64;

/// Maximum passphrase length read from the command; longer output is
/// truncated.
pub const MAX_PASSPHRASE_LEN: usize = 1024;

/// Prompt string substituted for `%p` in the passphrase command
pub const PROMPT_MSG: &str = "Enter database encryption pass phrase:";

/// Expand `%p` and `%%` placeholders in the configured command string
pub fn substitute_prompt(command: &str) -> String {
    let mut out = String::with_capacity(command.len() + PROMPT_MSG.len());
    let mut chars = command.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('p') => {
                chars.next();
                out.push_str(PROMPT_MSG);
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            // Unknown escapes pass through untouched.
            _ => out.push('%'),
        }
    }
    out
}

/// Run the passphrase command and return the passphrase it produced
///
/// Spawning failure, a non-zero exit status, or output below the
/// minimum length are all errors; no derivation or file I/O has
/// happened by the time any of them is reported.
pub fn run_passphrase_command(command: &str) -> KmgrResult<SecureBytes> {
    let expanded = substitute_prompt(command);

    let output = Command::new("sh")
        .arg("-c")
        .arg(&expanded)
        .output()
        .map_err(|e| KmgrError::PassphraseCommand {
            cause: format!("could not execute command \"{}\": {}", expanded, e),
            error_code: error_codes::COMMAND_SPAWN_FAILED,
        })?;

    if !output.status.success() {
        return Err(KmgrError::PassphraseCommand {
            cause: format!("command \"{}\" failed with {}", expanded, output.status),
            error_code: error_codes::COMMAND_EXITED_NONZERO,
        });
    }

    let mut passphrase = SecureBytes::new(output.stdout);
    passphrase.truncate(MAX_PASSPHRASE_LEN);

    if passphrase.len() < MIN_PASSPHRASE_LEN {
        return Err(KmgrError::WeakPassphrase {
            length: passphrase.len(),
            minimum: MIN_PASSPHRASE_LEN,
        });
    }

    Ok(passphrase)
}
