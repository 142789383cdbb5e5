// Power, session and touchscreen shortcuts
//
// Thin wrappers over host commands. Command lines are built by pure functions
// so they can be checked without rebooting anything.

use std::fmt;
use std::process::Command;

use crate::error::{Result, SentinelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Sleep,
    Shutdown,
    Reboot,
    Logout,
}

impl PowerAction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sleep" | "suspend" => Some(PowerAction::Sleep),
            "shutdown" | "poweroff" => Some(PowerAction::Shutdown),
            "reboot" | "restart" => Some(PowerAction::Reboot),
            "logout" | "logoff" | "disconnect" => Some(PowerAction::Logout),
            _ => None,
        }
    }

    /// Command line for this action on `os` (as in `std::env::consts::OS`)
    pub fn command_for(&self, os: &str) -> Result<Vec<String>> {
        let argv: &[&str] = match (os, self) {
            ("linux", PowerAction::Sleep) => &["systemctl", "suspend"],
            ("linux", PowerAction::Shutdown) => &["systemctl", "poweroff"],
            ("linux", PowerAction::Reboot) => &["systemctl", "reboot"],
            ("linux", PowerAction::Logout) => {
                let user = current_user()?;
                return Ok(vec![
                    "loginctl".to_string(),
                    "terminate-user".to_string(),
                    user,
                ]);
            }
            ("windows", PowerAction::Sleep) => &["shutdown", "/h"],
            ("windows", PowerAction::Shutdown) => &["shutdown", "/s", "/f", "/t", "0"],
            ("windows", PowerAction::Reboot) => &["shutdown", "/r", "/f", "/t", "0"],
            ("windows", PowerAction::Logout) => &["shutdown", "/l"],
            ("macos", PowerAction::Sleep) => &["pmset", "sleepnow"],
            ("macos", PowerAction::Shutdown) => {
                &["osascript", "-e", "tell app \"System Events\" to shut down"]
            }
            ("macos", PowerAction::Reboot) => {
                &["osascript", "-e", "tell app \"System Events\" to restart"]
            }
            ("macos", PowerAction::Logout) => {
                &["osascript", "-e", "tell app \"System Events\" to log out"]
            }
            _ => return Err(unsupported(&self.to_string(), os)),
        };

        Ok(argv.iter().map(|s| s.to_string()).collect())
    }

    /// Run the action on the current host
    pub fn execute(&self) -> Result<()> {
        let argv = self.command_for(std::env::consts::OS)?;
        run_command(&argv)
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PowerAction::Sleep => "sleep",
            PowerAction::Shutdown => "shutdown",
            PowerAction::Reboot => "reboot",
            PowerAction::Logout => "logout",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchscreenState {
    Enabled,
    Disabled,
}

impl TouchscreenState {
    /// Command line toggling the touchscreen. `device` is the xinput id used
    /// on Linux; Windows matches every PnP device named like a touchscreen.
    pub fn command_for(&self, os: &str, device: &str) -> Result<Vec<String>> {
        match os {
            "linux" => {
                let verb = match self {
                    TouchscreenState::Enabled => "enable",
                    TouchscreenState::Disabled => "disable",
                };
                Ok(vec!["xinput".to_string(), verb.to_string(), device.to_string()])
            }
            "windows" => {
                let cmdlet = match self {
                    TouchscreenState::Enabled => "Enable-PnpDevice",
                    TouchscreenState::Disabled => "Disable-PnpDevice",
                };
                Ok(vec![
                    "powershell.exe".to_string(),
                    "-NoProfile".to_string(),
                    "-Command".to_string(),
                    format!(
                        "Get-PnpDevice | Where-Object {{ $_.FriendlyName -match 'Touchscreen' }} | {} -Confirm:$false",
                        cmdlet
                    ),
                ])
            }
            _ => Err(unsupported("touchscreen toggle", os)),
        }
    }

    pub fn apply(&self, device: &str) -> Result<()> {
        let argv = self.command_for(std::env::consts::OS, device)?;
        run_command(&argv)
    }
}

impl fmt::Display for TouchscreenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TouchscreenState::Enabled => f.write_str("enabled"),
            TouchscreenState::Disabled => f.write_str("disabled"),
        }
    }
}

fn run_command(argv: &[String]) -> Result<()> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| SentinelError::command("empty command line"))?;

    log::info!("Running {}", argv.join(" "));

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| SentinelError::command(format!("failed to start {}: {}", program, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(SentinelError::command(format!(
            "{} exited with {}",
            program, status
        )))
    }
}

fn current_user() -> Result<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .map_err(|_| SentinelError::command("cannot determine the current user"))
}

fn unsupported(what: &str, os: &str) -> SentinelError {
    SentinelError::command(format!("{} is not supported on {}", what, os))
}
