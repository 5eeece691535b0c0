//! Shell completion scripts for platform-cli.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

const BIN_NAME: &str = "platform-cli";

/// Write the completion script for `shell` to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());
}

/// Completion script as a string
pub fn get_completions(shell: Shell) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

/// Where to put the script, and the line that installs it.
fn install_hint(shell: Shell) -> Option<(&'static str, String)> {
    let hint = match shell {
        Shell::Bash => ("~/.bashrc", format!("eval \"$({} completions bash)\"", BIN_NAME)),
        Shell::Zsh => (
            "~/.zshrc (after compinit)",
            format!("source <({} completions zsh)", BIN_NAME),
        ),
        Shell::Fish => (
            "a shell prompt",
            format!(
                "{} completions fish > ~/.config/fish/completions/{}.fish",
                BIN_NAME, BIN_NAME
            ),
        ),
        Shell::PowerShell => (
            "your PowerShell $PROFILE",
            format!("Invoke-Expression (& {} completions powershell | Out-String)", BIN_NAME),
        ),
        Shell::Elvish => (
            "~/.config/elvish/rc.elv",
            format!("eval ({} completions elvish | slurp)", BIN_NAME),
        ),
        _ => return None,
    };
    Some(hint)
}

/// Print installation instructions for completions
pub fn print_installation_instructions(shell: Shell) {
    match install_hint(shell) {
        Some((location, line)) => {
            println!("# Enable {} completions for {}; add to {}:", BIN_NAME, shell, location);
            println!("{}", line);
        }
        None => println!("# No installation recipe for {}; see your shell's documentation.", shell),
    }
}
