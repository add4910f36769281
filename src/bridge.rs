use crate::api::Backend;
use crate::error::AppError;
use crate::model::{AnalyticsSummary, Email, KnowledgeItem, NewKnowledgeItem, StatusResponse};
use crate::workflow::{self, ReplyJob, ReplyOutcome};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use tokio::sync::mpsc as tokio_mpsc;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    LoadEmails { limit: u32, generation: u64 },
    FetchAndProcess,
    RunReply(ReplyJob),
    LoadAnalytics,
    LoadKnowledge,
    CreateKnowledge(NewKnowledgeItem),
}

#[derive(Debug)]
pub enum BackgroundEvent {
    EmailsLoaded {
        generation: u64,
        result: Result<Vec<Email>, AppError>,
    },
    FetchFinished(Result<StatusResponse, AppError>),
    ReplyFinished {
        job: ReplyJob,
        outcome: ReplyOutcome,
    },
    AnalyticsLoaded(Result<Option<AnalyticsSummary>, AppError>),
    KnowledgeLoaded(Result<Vec<KnowledgeItem>, AppError>),
    KnowledgeCreated(Result<KnowledgeItem, AppError>),
    /// The background runtime could not start; no command will be served.
    Unavailable(AppError),
}

#[derive(Debug)]
pub struct BridgeChannels {
    pub cmd_tx: tokio_mpsc::UnboundedSender<UiCommand>,
    pub event_rx: std_mpsc::Receiver<BackgroundEvent>,
}

pub fn setup_bridge(ctx: egui::Context, backend: Arc<dyn Backend>) -> BridgeChannels {
    let (cmd_tx, cmd_rx) = tokio_mpsc::unbounded_channel::<UiCommand>();
    let (event_tx, event_rx) = std_mpsc::channel::<BackgroundEvent>();

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to create tokio runtime: {}", e);
                let event = BackgroundEvent::Unavailable(AppError::Runtime(e.to_string()));
                if event_tx.send(event).is_ok() {
                    ctx.request_repaint();
                }
                return;
            }
        };
        rt.block_on(background_loop(cmd_rx, event_tx, ctx, backend));
    });

    BridgeChannels { cmd_tx, event_rx }
}

async fn background_loop(
    mut cmd_rx: tokio_mpsc::UnboundedReceiver<UiCommand>,
    event_tx: std_mpsc::Sender<BackgroundEvent>,
    ctx: egui::Context,
    backend: Arc<dyn Backend>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        let tx = event_tx.clone();
        let ctx2 = ctx.clone();
        let backend = Arc::clone(&backend);
        tokio::spawn(async move {
            let event = handle_command(cmd, backend.as_ref()).await;
            if let Err(e) = tx.send(event) {
                tracing::warn!("Failed to send background event to UI: {}", e);
            }
            ctx2.request_repaint();
        });
    }
    info!("Command channel closed, background loop exiting");
}

async fn handle_command(cmd: UiCommand, backend: &dyn Backend) -> BackgroundEvent {
    match cmd {
        UiCommand::LoadEmails { limit, generation } => BackgroundEvent::EmailsLoaded {
            generation,
            result: backend.list_emails(limit).await,
        },
        UiCommand::FetchAndProcess => {
            BackgroundEvent::FetchFinished(backend.fetch_and_process().await)
        }
        UiCommand::RunReply(job) => {
            let outcome = workflow::execute(backend, &job).await;
            BackgroundEvent::ReplyFinished { job, outcome }
        }
        UiCommand::LoadAnalytics => BackgroundEvent::AnalyticsLoaded(backend.analytics().await),
        UiCommand::LoadKnowledge => {
            BackgroundEvent::KnowledgeLoaded(backend.list_knowledge().await)
        }
        UiCommand::CreateKnowledge(item) => {
            BackgroundEvent::KnowledgeCreated(backend.create_knowledge(item).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackend;
    use crate::model::fixtures::with_reply;
    use crate::model::EmailId;
    use crate::workflow::ReplyAction;
    use std::time::Duration;

    fn job(email_id: i64, save: Option<&str>) -> ReplyJob {
        ReplyJob {
            ticket: 1,
            email_id: EmailId(email_id),
            selection_epoch: 1,
            action: ReplyAction::Send,
            save: save.map(str::to_string),
        }
    }

    #[test]
    fn reply_command_round_trips_through_bridge() {
        let mut backend = MockBackend::new();
        backend
            .expect_update_email()
            .times(1)
            .returning(|id, update| Ok(with_reply(id.0, &update.ai_response)));
        backend.expect_dispatch_response().times(1).returning(|_| {
            Ok(StatusResponse {
                status: "success".to_string(),
                message: "Response sent successfully".to_string(),
                count: None,
            })
        });

        let bridge = setup_bridge(egui::Context::default(), Arc::new(backend));
        bridge
            .cmd_tx
            .send(UiCommand::RunReply(job(4, Some("Edited"))))
            .unwrap();

        let event = bridge
            .event_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("reply event");
        let (job, outcome) = match event {
            BackgroundEvent::ReplyFinished { job, outcome } => (job, outcome),
            other => panic!("unexpected event {other:?}"),
        };
        assert_eq!(job.email_id, EmailId(4));
        assert_eq!(
            outcome,
            ReplyOutcome::Sent {
                saved: true,
                message: "Response sent successfully".to_string()
            }
        );
    }

    #[test]
    fn load_failure_is_reported_not_dropped() {
        let mut backend = MockBackend::new();
        backend
            .expect_list_emails()
            .returning(|_| Err(AppError::Connection("refused".to_string())));

        let bridge = setup_bridge(egui::Context::default(), Arc::new(backend));
        bridge
            .cmd_tx
            .send(UiCommand::LoadEmails {
                limit: 50,
                generation: 3,
            })
            .unwrap();

        let event = bridge
            .event_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("load event");
        assert!(matches!(
            event,
            BackgroundEvent::EmailsLoaded {
                generation: 3,
                result: Err(AppError::Connection(_))
            }
        ));
    }
}
