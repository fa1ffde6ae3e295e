use reqwest::Client;

use crate::metrics::SUBMISSIONS_DELIVERED_TOTAL;
use crate::models::SubmissionRecord;

/// Delivers finished submission records to the external persistence
/// collaborator. Fire-and-forget: one spawned POST per record, a warning
/// on failure, no retry policy. The record also travels back to the client
/// in the finish response, so a lost webhook never loses the result.
pub struct SubmissionSink {
    http: Client,
    webhook_url: Option<String>,
}

impl SubmissionSink {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            http: Client::new(),
            webhook_url,
        }
    }

    pub fn deliver(&self, record: &SubmissionRecord) {
        let Some(url) = self.webhook_url.clone() else {
            tracing::debug!(
                "No submission webhook configured, skipping delivery for student {}",
                record.student_id
            );
            return;
        };

        let http = self.http.clone();
        let record = record.clone();
        tokio::spawn(async move {
            let result = http
                .post(&url)
                .json(&record)
                .timeout(std::time::Duration::from_secs(10))
                .send()
                .await
                .and_then(|r| r.error_for_status());

            match result {
                Ok(_) => {
                    SUBMISSIONS_DELIVERED_TOTAL
                        .with_label_values(&["delivered"])
                        .inc();
                    tracing::info!(
                        "Submission delivered: student={}, assessment={}, grade={}",
                        record.student_id,
                        record.assessment_id,
                        record.grade_display
                    );
                }
                Err(e) => {
                    SUBMISSIONS_DELIVERED_TOTAL
                        .with_label_values(&["failed"])
                        .inc();
                    tracing::warn!(
                        "Submission webhook failed for student {}: {e}",
                        record.student_id
                    );
                }
            }
        });
    }
}
