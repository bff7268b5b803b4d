//! Microsoft Outlook draft sink.
//!
//! Drafts are created through AppleScript (`osascript`), which only the
//! classic Outlook exposes; the script's own preflight produces a readable
//! error on "New Outlook". Each call opens one draft window with recipient,
//! subject, HTML body and optional attachment filled in — nothing is sent.

use crate::engine::generate::{DraftSink, OutgoingDraft};
use log::debug;
use std::process::Command;

pub struct OutlookSink;

impl DraftSink for OutlookSink {
    fn create_draft(&self, draft: &OutgoingDraft) -> Result<(), String> {
        debug!("Creating Outlook draft for {}", draft.to);
        run_osascript(&build_script(draft))
    }
}

/// Backslashes first, then quotes — the other order would double the
/// escapes just added.
fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn build_script(draft: &OutgoingDraft) -> String {
    let to = escape_applescript(&draft.to);
    let subject = escape_applescript(&draft.subject);
    let body = escape_applescript(&draft.html_body);

    let attach_cmd = match &draft.attachment {
        Some(path) => format!(
            "make new attachment with properties {{file:POSIX file \"{}\"}}",
            escape_applescript(path)
        ),
        None => String::new(),
    };

    format!(
        r#"on run
    try
        tell application "Microsoft Outlook" to get name
    on error errMsg number errNum
        error "Outlook AppleScript not available. If you're on 'New Outlook', switch to Classic Outlook. " & errMsg number errNum
    end try

    tell application "Microsoft Outlook"
        set newMessage to make new outgoing message
        tell newMessage
            make new recipient at end of to recipients with properties {{email address:{{address:"{}"}}}}
            set subject to "{}"
            set content to "{}"
            {}
            open
        end tell
        activate
    end tell
end run"#,
        to, subject, body, attach_cmd
    )
}

fn run_osascript(script: &str) -> Result<(), String> {
    let output = Command::new("osascript")
        .arg("-e")
        .arg(script)
        .output()
        .map_err(|e| format!("Failed to run osascript: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("osascript failed: {}", stderr.trim()));
    }
    Ok(())
}
