//! Live watch command: run the synchronization engine and print alert
//! decisions as they arrive.

use crate::output;
use finboard_core::config::AppConfig;
use finboard_core::error::AppError;
use finboard_entity::{AlertLevel, ConnectionState};
use finboard_sync::engine::AlertDecision;
use finboard_sync::session::SessionController;
use finboard_sync::token::SessionToken;

/// Run the engine until Ctrl-C.
pub async fn execute(config: AppConfig, token: SessionToken) -> Result<(), AppError> {
    let mut controller = SessionController::new(config);
    controller.sign_in(token.get()).await?;

    let mut alerts = controller
        .take_alerts()
        .ok_or_else(|| AppError::internal("alert queue already taken"))?;
    let mut state_rx = controller
        .watch_connection()
        .ok_or_else(|| AppError::session("no active session"))?;

    println!("Watching for notifications (Ctrl-C to stop)...");
    loop {
        tokio::select! {
            alert = alerts.recv() => match alert {
                Some(decision) => print_alert(&decision),
                None => break,
            },
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                match *state_rx.borrow() {
                    ConnectionState::Connected => {
                        output::print_success("Live updates connected");
                    }
                    ConnectionState::Connecting => {
                        println!("Connecting to live updates...");
                    }
                    ConnectionState::Disconnected => {
                        output::print_warning("Live updates unavailable; showing pulled state");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    controller.sign_out().await;
    Ok(())
}

fn print_alert(decision: &AlertDecision) {
    let n = &decision.notification;
    match decision.level {
        AlertLevel::Persistent => {
            println!("[ALERT] {}: {}", n.title, n.message);
            if let Some(url) = &n.action_url {
                println!("        → {url}");
            }
        }
        AlertLevel::Transient => {
            println!("[new] {}: {}", n.title, n.message);
        }
        AlertLevel::None => {}
    }
}
