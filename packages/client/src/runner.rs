//! Client execution logic: the single dispatch loop.

use std::sync::Arc;

use calypso_shared::time::SystemClock;
use tokio::sync::mpsc;

use crate::{
    command::Command,
    config::ClientConfig,
    error::ClientError,
    event::SessionEvent,
    formatter::MessageFormatter,
    log::HtmlFileView,
    session::SessionController,
    transport::WebSocketConnector,
    ui::{TerminalView, redisplay_prompt, spawn_input_thread},
};

/// Run the interactive client until the user quits.
///
/// There is no reconnection: a lost connection stays closed until the user
/// runs `connect`.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let settings = config.initial_settings()?;

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let mut controller =
        SessionController::new(config.url.clone(), Arc::new(WebSocketConnector), events_tx.clone())
            .with_convention(config.script_convention)
            .with_settings(settings);
    controller.add_view(Box::new(TerminalView::new(SystemClock)));
    if let Some(path) = &config.log_file {
        controller.add_view(Box::new(HtmlFileView::new(path)));
    }

    tracing::info!(
        "Script uploads use the '{}' convention",
        config.script_convention
    );
    println!("\nType 'help' for commands. Press Ctrl+C to exit.\n");

    controller.initialize();
    let _input_handle = spawn_input_thread(events_tx);

    while let Some(event) = events_rx.recv().await {
        match event {
            SessionEvent::Command(Command::Quit) => break,
            SessionEvent::Command(Command::Help) => {
                print!("{}", MessageFormatter::format_help());
                redisplay_prompt();
            }
            SessionEvent::Command(Command::Show) => {
                print!("{}", MessageFormatter::format_settings(controller.settings()));
                redisplay_prompt();
            }
            SessionEvent::Command(Command::PrintLog) => {
                print!("{}", MessageFormatter::format_rendered_log(controller.log()));
                redisplay_prompt();
            }
            event => {
                if let Err(e) = controller.handle(event).await {
                    tracing::warn!("{}", e);
                }
            }
        }
    }

    tracing::info!("Client session ended");
    Ok(())
}
