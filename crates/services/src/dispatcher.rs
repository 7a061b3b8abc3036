use bson::{DateTime, oid::ObjectId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::dao::{CaseDao, DaoResult, OrgScope, ReminderDao};
use crate::email::{EmailMessage, Mailer};
use crate::recorder::Recorder;

/// Sends due reminder emails. Per reminder: `scheduled -> sent` on delivery,
/// `scheduled -> failed` otherwise, both terminal. Reminders are processed
/// independently; one failure never aborts the batch.
pub struct ReminderDispatcher {
    reminders: Arc<ReminderDao>,
    cases: Arc<CaseDao>,
    mailer: Arc<dyn Mailer>,
    recorder: Recorder,
    batch_size: i64,
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct DispatchReport {
    pub processed: u64,
    pub sent: u64,
    pub failed: u64,
}

impl ReminderDispatcher {
    pub fn new(
        reminders: Arc<ReminderDao>,
        cases: Arc<CaseDao>,
        mailer: Arc<dyn Mailer>,
        recorder: Recorder,
        batch_size: i64,
    ) -> Self {
        Self {
            reminders,
            cases,
            mailer,
            recorder,
            batch_size,
        }
    }

    pub async fn dispatch_due(
        &self,
        organization_filter: Option<ObjectId>,
    ) -> DaoResult<DispatchReport> {
        let due = self
            .reminders
            .find_due(organization_filter, DateTime::now(), self.batch_size)
            .await?;

        let mut report = DispatchReport::default();

        for reminder in due {
            let Some(reminder_id) = reminder.id else {
                continue;
            };
            report.processed += 1;

            if reminder.recipients.is_empty() {
                // Local, permanent failure: nothing to deliver to.
                self.reminders
                    .mark_failed(reminder_id, "No recipients resolved".to_string())
                    .await?;
                report.failed += 1;
                continue;
            }

            let message = EmailMessage {
                to: reminder.recipients.clone(),
                subject: reminder.subject.clone(),
                body: reminder.body.clone(),
            };

            match self.mailer.send(&message).await {
                Ok(provider_message_id) => {
                    self.reminders
                        .mark_sent(reminder_id, provider_message_id)
                        .await?;
                    report.sent += 1;
                    self.record_success(&reminder).await;
                }
                Err(error) => {
                    warn!(%error, ?reminder_id, "Reminder delivery failed");
                    self.reminders
                        .mark_failed(reminder_id, error.to_string())
                        .await?;
                    report.failed += 1;
                }
            }
        }

        info!(
            processed = report.processed,
            sent = report.sent,
            failed = report.failed,
            "Reminder dispatch completed"
        );

        Ok(report)
    }

    /// Staff notification + audit row for a delivered reminder, both
    /// best-effort.
    async fn record_success(&self, reminder: &casefolio_db::models::Reminder) {
        let scope = OrgScope::organization(reminder.organization_id);
        let case = match self.cases.find_in_scope(&scope, reminder.case_id).await {
            Ok(case) => case,
            Err(error) => {
                warn!(%error, case_id = ?reminder.case_id, "Reminder sent but its case could not be loaded");
                return;
            }
        };

        self.recorder
            .notify(
                reminder.organization_id,
                case.assigned_staff_id,
                format!("Reminder sent: {}", reminder.key_date_label),
                format!(
                    "Reminder \"{}\" for case {} was delivered",
                    reminder.subject, case.case_number
                ),
                "reminder",
                Some(reminder.case_id),
            )
            .await;

        self.recorder
            .activity(
                reminder.organization_id,
                None,
                "reminder_sent",
                format!(
                    "Reminder \"{}\" sent for case {}",
                    reminder.subject, case.case_number
                ),
                Some(reminder.case_id),
                None,
            )
            .await;
    }
}
