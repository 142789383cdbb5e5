// Desktop notification sinks

use std::process::{Command, Stdio};

use crate::core::system_monitor::{Alert, NotificationSink};

/// Logs alerts at warn level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, alert: &Alert) {
        log::warn!("{}: {}", alert.title, alert.message);
    }
}

/// Shows alerts as desktop notifications through the host's notifier command.
///
/// The command runs on a detached thread so a slow notification daemon never
/// holds up a monitoring tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl NotificationSink for DesktopNotifier {
    fn notify(&self, alert: &Alert) {
        LogNotifier.notify(alert);

        let Some(argv) = notification_command(&alert.title, &alert.message) else {
            log::debug!("No desktop notifier on this platform");
            return;
        };

        std::thread::spawn(move || {
            let status = Command::new(&argv[0])
                .args(&argv[1..])
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();

            match status {
                Ok(status) if status.success() => {}
                Ok(status) => log::warn!("{} exited with {}", argv[0], status),
                Err(e) => log::warn!("Failed to run {}: {}", argv[0], e),
            }
        });
    }
}

/// Host command line that shows a notification, if the platform has one
#[cfg(target_os = "linux")]
pub fn notification_command(title: &str, body: &str) -> Option<Vec<String>> {
    Some(vec![
        "notify-send".to_string(),
        "--urgency=critical".to_string(),
        "--app-name=Sentinel".to_string(),
        title.to_string(),
        body.to_string(),
    ])
}

#[cfg(target_os = "macos")]
pub fn notification_command(title: &str, body: &str) -> Option<Vec<String>> {
    Some(vec![
        "osascript".to_string(),
        "-e".to_string(),
        format!(
            "display notification \"{}\" with title \"{}\"",
            escape_applescript(body),
            escape_applescript(title)
        ),
    ])
}

#[cfg(windows)]
pub fn notification_command(title: &str, body: &str) -> Option<Vec<String>> {
    let script = format!(
        "Add-Type -AssemblyName System.Windows.Forms; \
         $n = New-Object System.Windows.Forms.NotifyIcon; \
         $n.Icon = [System.Drawing.SystemIcons]::Warning; \
         $n.Visible = $true; \
         $n.ShowBalloonTip(5000, '{}', '{}', 'Warning'); \
         Start-Sleep -Seconds 6; $n.Dispose()",
        escape_powershell(title),
        escape_powershell(body)
    );
    Some(vec![
        "powershell.exe".to_string(),
        "-NoProfile".to_string(),
        "-Command".to_string(),
        script,
    ])
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
pub fn notification_command(_title: &str, _body: &str) -> Option<Vec<String>> {
    None
}

#[cfg(target_os = "macos")]
fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(windows)]
fn escape_powershell(text: &str) -> String {
    text.replace('\'', "''")
}
