//! Shell completions command - Generate shell completion scripts
//!
//! - bash: `ppi completions bash > ~/.local/share/bash-completion/completions/ppi`
//! - zsh: put the output in a directory on `$fpath` as `_ppi`
//! - fish: `ppi completions fish > ~/.config/fish/completions/ppi.fish`

use std::io;

use clap::Command;
use clap_complete::{generate, Shell};

/// Write the completion script for `shell` to stdout.
pub fn run(shell: Shell, cmd: &mut Command) -> anyhow::Result<()> {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, &mut io::stdout());
    Ok(())
}
