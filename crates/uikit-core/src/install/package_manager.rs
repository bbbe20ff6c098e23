//! npm package installation through the project's package manager
//!
//! Detects which package manager a project uses from its lockfile and
//! shells out to it, streaming its output.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for a package install (2 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Lockfiles checked in order; the first one present wins
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("package-lock.json", PackageManager::Npm),
];

/// Supported JavaScript package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Detect the package manager from lockfiles in `dir`; defaults to npm
    pub fn detect(dir: &Path) -> Self {
        LOCKFILES
            .iter()
            .find(|(lockfile, _)| dir.join(lockfile).exists())
            .map(|(_, pm)| *pm)
            .unwrap_or(PackageManager::Npm)
    }

    /// Name of the executable
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Arguments that add `packages` to a project
    pub fn install_args(&self, packages: &[String]) -> Vec<String> {
        let verb = match self {
            PackageManager::Npm => "install",
            PackageManager::Pnpm | PackageManager::Yarn | PackageManager::Bun => "add",
        };
        std::iter::once(verb.to_string())
            .chain(packages.iter().cloned())
            .collect()
    }

    /// The full command line, for display
    pub fn install_command(&self, packages: &[String]) -> String {
        format!("{} {}", self.program(), self.install_args(packages).join(" "))
    }

    /// Check if the package manager is available in PATH
    pub fn is_available(&self) -> bool {
        std::process::Command::new(self.program())
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Install `packages` in `dir`, streaming the package manager's output
    pub async fn install(&self, dir: &Path, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }

        let cmd = self.install_command(packages);
        println!();
        println!("{} {}", "Running:".dimmed(), cmd.yellow());
        println!();

        let mut child = TokioCommand::new(self.program())
            .args(self.install_args(packages))
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program()))?;

        let stdout = child
            .stdout
            .take()
            .context("Failed to capture package manager stdout")?;
        let stderr = child
            .stderr
            .take()
            .context("Failed to capture package manager stderr")?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        // Stream output until both pipes close
        let output_task = async {
            let mut stdout_open = true;
            let mut stderr_open = true;
            while stdout_open || stderr_open {
                tokio::select! {
                    line = stdout_reader.next_line(), if stdout_open => {
                        match line {
                            Ok(Some(line)) => println!("  {}", line),
                            Ok(None) => stdout_open = false,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stdout:".red(), e);
                                stdout_open = false;
                            }
                        }
                    }
                    line = stderr_reader.next_line(), if stderr_open => {
                        match line {
                            Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                            Ok(None) => stderr_open = false,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stderr:".red(), e);
                                stderr_open = false;
                            }
                        }
                    }
                }
            }
        };

        if timeout(INSTALL_TIMEOUT, output_task).await.is_err() {
            let _ = child.kill().await;
            println!();
            anyhow::bail!(
                "Package installation timed out after {} seconds.\n\
                 Please install manually:\n\
                 {}",
                INSTALL_TIMEOUT.as_secs(),
                cmd
            );
        }

        match timeout(Duration::from_secs(5), child.wait()).await {
            Ok(Ok(status)) => {
                println!();
                if status.success() {
                    Ok(())
                } else {
                    anyhow::bail!(
                        "Package installation failed with exit code: {}\n\
                         Please try installing manually: {}",
                        status.code().unwrap_or(-1),
                        cmd
                    );
                }
            }
            Ok(Err(e)) => {
                anyhow::bail!("Failed to wait for {}: {}", self.program(), e);
            }
            Err(_) => {
                let _ = child.kill().await;
                anyhow::bail!(
                    "Package installation hung. Please try installing manually:\n{}",
                    cmd
                );
            }
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for PackageManager {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "pnpm" => Ok(PackageManager::Pnpm),
            "yarn" => Ok(PackageManager::Yarn),
            "bun" => Ok(PackageManager::Bun),
            other => anyhow::bail!(
                "Unknown package manager '{}' (expected npm, pnpm, yarn or bun)",
                other
            ),
        }
    }
}
