//! Installing the completion script into a user's bash profile

use crate::completion::{completion_script, shell_quote};
use crate::error::{Result, ToolkitError};
use directories::BaseDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What an installation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The profile now sources the script
    Installed { profile: PathBuf, script: PathBuf },
    /// The script was rewritten; the profile already sourced it
    AlreadyPresent { profile: PathBuf, script: PathBuf },
}

impl InstallOutcome {
    /// Human-readable report lines
    pub fn messages(&self) -> Vec<String> {
        match self {
            InstallOutcome::Installed { profile, script } => vec![
                format!("Completions installed in {}", profile.display()),
                format!("Source {} for immediate availability.", script.display()),
            ],
            InstallOutcome::AlreadyPresent { profile, .. } => {
                vec![format!("Completions already installed in {}", profile.display())]
            }
        }
    }
}

/// Install completions for `program` under the current user's home
pub fn install_completions(program: &str) -> Result<InstallOutcome> {
    let dirs = BaseDirs::new().ok_or_else(|| {
        ToolkitError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "could not determine home directory",
        ))
    })?;
    install_completions_in(dirs.home_dir(), program)
}

/// Install completions for `program` under `home`
///
/// Writes `~/.bash-complete/<program>-completions` and appends a `source`
/// line for it to `~/.bash_profile` unless one is already there.
pub fn install_completions_in(home: &Path, program: &str) -> Result<InstallOutcome> {
    let program = Path::new(program)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.to_string());

    let completions_dir = home.join(".bash-complete");
    let script = completions_dir.join(format!("{}-completions", program));
    let profile = home.join(".bash_profile");

    fs::create_dir_all(&completions_dir)?;
    fs::write(&script, completion_script(&function_name(&program), &program))?;

    let source_line = format!("source {}", shell_quote(&script.to_string_lossy()));
    if profile_sources(&profile, &source_line)? {
        return Ok(InstallOutcome::AlreadyPresent { profile, script });
    }

    let mut out = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&profile)?;
    writeln!(out, "{}", source_line)?;
    Ok(InstallOutcome::Installed { profile, script })
}

/// Shell function name for a program's completions
fn function_name(program: &str) -> String {
    let cleaned: String = program
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("_{}_completions", cleaned)
}

/// Whether `profile` already has `line`, ignoring spacing and comments
fn profile_sources(profile: &Path, line: &str) -> Result<bool> {
    let content = match fs::read_to_string(profile) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    let wanted: Vec<&str> = line.split_whitespace().collect();
    Ok(content.lines().any(|existing| {
        let code = existing.split('#').next().unwrap_or_default();
        code.split_whitespace().collect::<Vec<_>>() == wanted
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_install_writes_script_and_profile() {
        let home = TempDir::new().unwrap();
        let outcome = install_completions_in(home.path(), "/usr/local/bin/demo").unwrap();

        let script = home.path().join(".bash-complete/demo-completions");
        assert_eq!(
            outcome,
            InstallOutcome::Installed {
                profile: home.path().join(".bash_profile"),
                script: script.clone(),
            }
        );
        let body = fs::read_to_string(&script).unwrap();
        assert!(body.contains("complete -F _demo_completions -o bashdefault demo"));

        let profile = fs::read_to_string(home.path().join(".bash_profile")).unwrap();
        assert_eq!(profile, format!("source {}\n", script.display()));
    }

    #[test]
    fn test_install_is_idempotent() {
        let home = TempDir::new().unwrap();
        install_completions_in(home.path(), "demo").unwrap();
        let again = install_completions_in(home.path(), "demo").unwrap();
        assert!(matches!(again, InstallOutcome::AlreadyPresent { .. }));

        let profile = fs::read_to_string(home.path().join(".bash_profile")).unwrap();
        assert_eq!(profile.lines().count(), 1);
    }

    #[test]
    fn test_existing_line_with_comment_counts() {
        let home = TempDir::new().unwrap();
        let script = home.path().join(".bash-complete/demo-completions");
        fs::write(
            home.path().join(".bash_profile"),
            format!("export PATH=$PATH:~/bin\nsource   {}  # demo\n", script.display()),
        )
        .unwrap();
        let outcome = install_completions_in(home.path(), "demo").unwrap();
        assert!(matches!(outcome, InstallOutcome::AlreadyPresent { .. }));
    }

    #[test]
    fn test_home_with_spaces_is_quoted() {
        let base = TempDir::new().unwrap();
        let home = base.path().join("my home");
        fs::create_dir(&home).unwrap();

        install_completions_in(&home, "demo").unwrap();
        let script = home.join(".bash-complete/demo-completions");
        let profile = fs::read_to_string(home.join(".bash_profile")).unwrap();
        assert_eq!(profile, format!("source '{}'\n", script.display()));

        let again = install_completions_in(&home, "demo").unwrap();
        assert!(matches!(again, InstallOutcome::AlreadyPresent { .. }));
    }

    #[test]
    fn test_function_name_is_a_shell_identifier() {
        assert_eq!(function_name("my-tool.sh"), "_my_tool_sh_completions");
    }

    #[test]
    fn test_messages() {
        let outcome = InstallOutcome::AlreadyPresent {
            profile: PathBuf::from("/home/u/.bash_profile"),
            script: PathBuf::from("/home/u/.bash-complete/x-completions"),
        };
        assert_eq!(
            outcome.messages(),
            vec!["Completions already installed in /home/u/.bash_profile"]
        );
    }
}
