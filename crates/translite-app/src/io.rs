use std::io::BufRead;
use std::thread;

use kanal::AsyncSender;
use translite_translator::Mode;

use crate::events::AppEvent;

/// Turn one console line into an event. Blank input is a suppressed selection.
pub fn parse_line(line: &str) -> anyhow::Result<Option<AppEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some(command) = line.strip_prefix(':') else {
        return Ok(Some(AppEvent::TextInput(line.to_string())));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    let event = match (name, arg) {
        ("auto", None) => AppEvent::SelectMode(Mode::Auto),
        ("use", Some(mode)) => AppEvent::SelectMode(mode.parse()?),
        ("servers", None) => AppEvent::ListServers,
        ("mode", None) => AppEvent::ShowMode,
        ("test", None) => AppEvent::TestServer(None),
        ("test", Some(index)) => AppEvent::TestServer(Some(index.parse()?)),
        ("quit" | "q", None) => AppEvent::Quit,
        _ => anyhow::bail!("unknown command: {line}"),
    };

    Ok(Some(event))
}

/// Reads stdin on a dedicated thread, like a hotkey hook would, and forwards
/// parsed events to the app. EOF asks the app to quit.
pub fn spawn_console_reader(
    shell_to_app_tx: AsyncSender<AppEvent>,
) -> std::io::Result<thread::JoinHandle<()>> {
    let tx = shell_to_app_tx.to_sync();

    thread::Builder::new()
        .name("console-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::error!("failed to read console input: {e}");
                        break;
                    }
                };

                let event = match parse_line(&line) {
                    Ok(Some(event)) => event,
                    Ok(None) => continue,
                    Err(e) => AppEvent::Notify(format!("Error: {e}")),
                };

                if tx.send(event).is_err() {
                    return;
                }
            }

            tracing::debug!("console input closed");
            let _ = tx.send(AppEvent::Quit);
        })
}
