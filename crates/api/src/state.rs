use casefolio_config::Settings;
use casefolio_services::{
    AnalyticsService, AuthService, DemoSweeper, DocumentStorage, DriveService, HttpMailer, Mailer,
    RateLimiter, Recorder, ReminderDispatcher, ReviewService,
    dao::{
        activity::ActivityDao, case::CaseDao, document::DocumentDao, message::MessageDao,
        notification::NotificationDao, organization::OrganizationDao, reminder::ReminderDao,
        user::UserDao,
    },
};
use mongodb::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub organizations: Arc<OrganizationDao>,
    pub users: Arc<UserDao>,
    pub cases: Arc<CaseDao>,
    pub documents: Arc<DocumentDao>,
    pub messages: Arc<MessageDao>,
    pub notifications: Arc<NotificationDao>,
    pub activity: Arc<ActivityDao>,
    pub reminders: Arc<ReminderDao>,
    pub rate_limiter: Arc<RateLimiter>,
    pub recorder: Recorder,
    pub storage: DocumentStorage,
    pub mailer: Arc<dyn Mailer>,
    pub drive: DriveService,
    pub review: ReviewService,
    pub analytics: Arc<AnalyticsService>,
    pub sweeper: Arc<DemoSweeper>,
    pub dispatcher: Arc<ReminderDispatcher>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(
            settings.jwt.clone(),
            settings.superadmin.token_ttl_secs,
        ));
        let organizations = Arc::new(OrganizationDao::new(&db));
        let users = Arc::new(UserDao::new(&db));
        let cases = Arc::new(CaseDao::new(&db));
        let documents = Arc::new(DocumentDao::new(&db));
        let messages = Arc::new(MessageDao::new(&db));
        let notifications = Arc::new(NotificationDao::new(&db));
        let activity = Arc::new(ActivityDao::new(&db));
        let reminders = Arc::new(ReminderDao::new(&db));
        let rate_limiter = Arc::new(RateLimiter::new());
        let recorder = Recorder::new(activity.clone(), notifications.clone());
        let storage = DocumentStorage::new(&settings.storage);
        let mailer: Arc<dyn Mailer> = Arc::new(HttpMailer::new(settings.email.clone()));
        let drive = DriveService::new(settings.drive.clone());
        let review = ReviewService::new(settings.review.clone());
        let analytics = Arc::new(AnalyticsService::new(
            cases.clone(),
            documents.clone(),
            messages.clone(),
            activity.clone(),
        ));
        let sweeper = Arc::new(DemoSweeper::new(
            organizations.clone(),
            documents.clone(),
            messages.clone(),
            notifications.clone(),
            activity.clone(),
            storage.clone(),
            settings.demo.organization_slug.clone(),
        ));
        let dispatcher = Arc::new(ReminderDispatcher::new(
            reminders.clone(),
            cases.clone(),
            mailer.clone(),
            recorder.clone(),
            settings.limits.reminder_batch_size,
        ));

        Self {
            db,
            settings,
            auth,
            organizations,
            users,
            cases,
            documents,
            messages,
            notifications,
            activity,
            reminders,
            rate_limiter,
            recorder,
            storage,
            mailer,
            drive,
            review,
            analytics,
            sweeper,
            dispatcher,
        }
    }
}
