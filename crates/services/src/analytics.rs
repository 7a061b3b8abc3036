use bson::{DateTime, doc, oid::ObjectId};
use casefolio_db::models::{CaseStatus, DocumentStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::dao::{ActivityDao, CaseDao, DaoError, DaoResult, DocumentDao, MessageDao, OrgScope};

/// Read-only aggregates for admin/staff dashboards. Everything goes through
/// the scope filter like any other query.
pub struct AnalyticsService {
    cases: Arc<CaseDao>,
    documents: Arc<DocumentDao>,
    messages: Arc<MessageDao>,
    activity: Arc<ActivityDao>,
}

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub cases_total: u64,
    pub cases_open: u64,
    pub documents_total: u64,
    pub documents_pending: u64,
    pub messages_total: u64,
    pub messages_unread: u64,
}

#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub cases_by_status: BTreeMap<String, u64>,
    pub documents_by_status: BTreeMap<String, u64>,
    pub recent_activity: Vec<ActivityEntry>,
}

#[derive(Debug, Serialize)]
pub struct ActivityEntry {
    pub action: String,
    pub description: String,
    pub actor_id: Option<String>,
    pub case_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct TypedReport {
    pub report_type: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub breakdown: BTreeMap<String, u64>,
}

const OPEN_STATUSES: [CaseStatus; 3] = [CaseStatus::Intake, CaseStatus::InReview, CaseStatus::Filed];

impl AnalyticsService {
    pub fn new(
        cases: Arc<CaseDao>,
        documents: Arc<DocumentDao>,
        messages: Arc<MessageDao>,
        activity: Arc<ActivityDao>,
    ) -> Self {
        Self {
            cases,
            documents,
            messages,
            activity,
        }
    }

    pub async fn stats(&self, scope: &OrgScope, user_id: ObjectId) -> DaoResult<StatsReport> {
        let open_strs: Vec<&str> = OPEN_STATUSES.iter().map(|s| s.as_str()).collect();
        let mut open_filter = scope.filter();
        open_filter.insert("status", doc! { "$in": open_strs });

        let mut pending_filter = scope.filter();
        pending_filter.insert("status", DocumentStatus::Pending.as_str());

        Ok(StatsReport {
            cases_total: self.cases.base.count(scope.filter()).await?,
            cases_open: self.cases.base.count(open_filter).await?,
            documents_total: self.documents.base.count(scope.filter()).await?,
            documents_pending: self.documents.base.count(pending_filter).await?,
            messages_total: self.messages.base.count(scope.filter()).await?,
            messages_unread: self.messages.count_unread(scope, user_id).await?,
        })
    }

    pub async fn dashboard(&self, scope: &OrgScope) -> DaoResult<DashboardReport> {
        let mut cases_by_status = BTreeMap::new();
        for status in [
            CaseStatus::Intake,
            CaseStatus::InReview,
            CaseStatus::Filed,
            CaseStatus::Approved,
            CaseStatus::Denied,
            CaseStatus::Closed,
        ] {
            let mut filter = scope.filter();
            filter.insert("status", status.as_str());
            cases_by_status.insert(
                status.as_str().to_string(),
                self.cases.base.count(filter).await?,
            );
        }

        let mut documents_by_status = BTreeMap::new();
        for status in [
            DocumentStatus::Pending,
            DocumentStatus::Submitted,
            DocumentStatus::Approved,
            DocumentStatus::Rejected,
            DocumentStatus::RequiresAction,
            DocumentStatus::NotRequired,
        ] {
            let mut filter = scope.filter();
            filter.insert("status", status.as_str());
            documents_by_status.insert(
                status.as_str().to_string(),
                self.documents.base.count(filter).await?,
            );
        }

        let recent_activity = self
            .activity
            .recent(scope, 10)
            .await?
            .into_iter()
            .map(|entry| ActivityEntry {
                action: entry.action,
                description: entry.description,
                actor_id: entry.actor_id.map(|id| id.to_hex()),
                case_id: entry.case_id.map(|id| id.to_hex()),
                created_at: entry.created_at.try_to_rfc3339_string().unwrap_or_default(),
            })
            .collect();

        Ok(DashboardReport {
            cases_by_status,
            documents_by_status,
            recent_activity,
        })
    }

    pub async fn report(
        &self,
        scope: &OrgScope,
        report_type: &str,
        from: Option<DateTime>,
        to: Option<DateTime>,
    ) -> DaoResult<TypedReport> {
        let mut range = bson::Document::new();
        if let Some(from) = from {
            range.insert("$gte", from);
        }
        if let Some(to) = to {
            range.insert("$lt", to);
        }

        let breakdown = match report_type {
            "cases" => {
                let mut breakdown = BTreeMap::new();
                for status in [
                    CaseStatus::Intake,
                    CaseStatus::InReview,
                    CaseStatus::Filed,
                    CaseStatus::Approved,
                    CaseStatus::Denied,
                    CaseStatus::Closed,
                ] {
                    let mut filter = scope.filter();
                    filter.insert("status", status.as_str());
                    if !range.is_empty() {
                        filter.insert("created_at", range.clone());
                    }
                    breakdown.insert(
                        status.as_str().to_string(),
                        self.cases.base.count(filter).await?,
                    );
                }
                breakdown
            }
            "documents" => {
                let mut breakdown = BTreeMap::new();
                for status in [
                    DocumentStatus::Pending,
                    DocumentStatus::Submitted,
                    DocumentStatus::Approved,
                    DocumentStatus::Rejected,
                    DocumentStatus::RequiresAction,
                    DocumentStatus::NotRequired,
                ] {
                    let mut filter = scope.filter();
                    filter.insert("status", status.as_str());
                    if !range.is_empty() {
                        filter.insert("created_at", range.clone());
                    }
                    breakdown.insert(
                        status.as_str().to_string(),
                        self.documents.base.count(filter).await?,
                    );
                }
                breakdown
            }
            "activity" => {
                let mut filter = scope.filter();
                if !range.is_empty() {
                    filter.insert("created_at", range.clone());
                }
                let entries = self.activity.base.find_many(filter, None).await?;
                let mut breakdown = BTreeMap::new();
                for entry in entries {
                    *breakdown.entry(entry.action).or_insert(0) += 1;
                }
                breakdown
            }
            other => {
                return Err(DaoError::Validation(format!(
                    "Unknown report type: {other}"
                )));
            }
        };

        Ok(TypedReport {
            report_type: report_type.to_string(),
            from: from.and_then(|d| d.try_to_rfc3339_string().ok()),
            to: to.and_then(|d| d.try_to_rfc3339_string().ok()),
            breakdown,
        })
    }
}
