//! Shell completion script generation
//!
//! Emits the clap_complete static script for `cluster-complete` itself and,
//! when a program name is given, a dynamic hook that hands that program's
//! command line to `cluster-complete complete` on every TAB.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{ConfigError, Result};

const BIN_NAME: &str = "cluster-complete";

/// Generate shell completion script
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish)
/// * `program` - Program to attach the dynamic hook to
pub fn generate_completion(shell_name: &str, program: Option<&str>) -> Result<()> {
    let shell = parse_shell(shell_name)?;
    print!("{}", completion_script(shell, program));
    Ok(())
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(ConfigError::InvalidValue {
            field: "shell".to_string(),
            value: format!("{} (supported: bash, zsh, fish)", shell_name),
        }
        .into()),
    }
}

/// Static script followed by the dynamic hook, if any
fn completion_script(shell: Shell, program: Option<&str>) -> String {
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);

    let mut script = String::from_utf8_lossy(&buffer).into_owned();
    if let Some(program) = program {
        let hook = match shell {
            Shell::Bash => bash_hook(program),
            Shell::Zsh => zsh_hook(program),
            _ => fish_hook(program),
        };
        script.push('\n');
        script.push_str(&hook);
    }
    script
}

/// Shell function name derived from a program name
fn function_name(program: &str) -> String {
    program
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn bash_hook(program: &str) -> String {
    let func = function_name(program);
    format!(
        r#"# Dynamic completion for {program}
_{func}_cluster_complete() {{
    local IFS=$'\n'
    local words=("${{COMP_WORDS[@]:1:COMP_CWORD}}")
    COMPREPLY=($({bin} complete -- "${{words[@]}}" 2>/dev/null))
}}

complete -o default -F _{func}_cluster_complete {program}
"#,
        bin = BIN_NAME,
    )
}

fn zsh_hook(program: &str) -> String {
    let func = function_name(program);
    format!(
        r#"# Dynamic completion for {program}
_{func}_cluster_complete() {{
    local -a suggestions
    suggestions=(${{(f)"$({bin} complete -- "${{(@)words[2,CURRENT]}}" 2>/dev/null)"}})
    (( ${{#suggestions}} )) && compadd -a suggestions
}}

compdef _{func}_cluster_complete {program}
"#,
        bin = BIN_NAME,
    )
}

fn fish_hook(program: &str) -> String {
    let func = function_name(program);
    format!(
        r#"# Dynamic completion for {program}
function __{func}_cluster_complete
    set -l words (commandline -opc)
    set -e words[1]
    {bin} complete -- $words (commandline -ct) 2>/dev/null
end

complete -c {program} -f -a "(__{func}_cluster_complete)"
"#,
        bin = BIN_NAME,
    )
}
