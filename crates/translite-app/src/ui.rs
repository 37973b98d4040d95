use kanal::AsyncReceiver;
use translite_translator::Mode;

use crate::events::AppEvent;

/// Console stand-in for the popup. Runs until every sender is gone so late
/// translations still get printed.
pub async fn ui_loop(app_to_shell_rx: AsyncReceiver<AppEvent>) -> anyhow::Result<()> {
    while let Ok(event) = app_to_shell_rx.recv().await {
        if let Some(rendered) = render(&event) {
            println!("{rendered}");
        }
    }

    Ok(())
}

pub fn render(event: &AppEvent) -> Option<String> {
    match event {
        AppEvent::TranslationPending { .. } => Some("Translating...".to_string()),
        AppEvent::ShowTranslation { text, source, .. } => Some(format!("{text}\n  [{source}]")),
        AppEvent::ShowServers { endpoints, mode } => {
            let mut lines = vec![format!(
                "{} auto  Automatic",
                if *mode == Mode::Auto { '*' } else { ' ' }
            )];
            for endpoint in endpoints {
                let marker = if *mode == Mode::Pinned(endpoint.index) {
                    '*'
                } else {
                    ' '
                };
                lines.push(format!(
                    "{marker} {:<5} {}  {}",
                    endpoint.index, endpoint.display_name, endpoint.url
                ));
            }
            Some(lines.join("\n"))
        }
        AppEvent::Notify(message) => Some(message.clone()),
        _ => None,
    }
}
