use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Organizations
    create_indexes(
        db,
        "organizations",
        vec![index_unique(bson::doc! { "slug": 1 })],
    )
    .await?;

    // Users
    create_indexes(
        db,
        "users",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "organization_id": 1, "role": 1 }),
        ],
    )
    .await?;

    // Cases
    create_indexes(
        db,
        "cases",
        vec![
            index_unique(bson::doc! { "organization_id": 1, "case_number": 1 }),
            index(bson::doc! { "organization_id": 1, "client_id": 1, "created_at": -1 }),
            index(bson::doc! { "organization_id": 1, "assigned_staff_id": 1, "created_at": -1 }),
            index(bson::doc! { "organization_id": 1, "status": 1 }),
        ],
    )
    .await?;

    // Documents
    create_indexes(
        db,
        "documents",
        vec![
            index(bson::doc! { "organization_id": 1, "case_id": 1, "created_at": -1 }),
            index(bson::doc! { "organization_id": 1, "status": 1 }),
            index(bson::doc! { "organization_id": 1, "created_at": 1 }),
        ],
    )
    .await?;

    // Messages
    create_indexes(
        db,
        "messages",
        vec![
            index(bson::doc! { "organization_id": 1, "case_id": 1, "created_at": -1 }),
            index(bson::doc! { "organization_id": 1, "receiver_id": 1, "is_read": 1 }),
            index(bson::doc! { "organization_id": 1, "created_at": 1 }),
        ],
    )
    .await?;

    // Activity Logs
    create_indexes(
        db,
        "activity_logs",
        vec![
            index(bson::doc! { "organization_id": 1, "created_at": -1 }),
            index(bson::doc! { "organization_id": 1, "action": 1, "created_at": -1 }),
            index(bson::doc! { "organization_id": 1, "case_id": 1, "created_at": -1 }),
        ],
    )
    .await?;

    // Notifications
    create_indexes(
        db,
        "notifications",
        vec![
            index(bson::doc! { "user_id": 1, "is_read": 1, "created_at": -1 }),
            index(bson::doc! { "organization_id": 1, "user_id": 1 }),
            index(bson::doc! { "organization_id": 1, "created_at": 1 }),
        ],
    )
    .await?;

    // Reminders
    create_indexes(
        db,
        "reminders",
        vec![
            index(bson::doc! { "status": 1, "send_at": 1 }),
            index(bson::doc! { "organization_id": 1, "case_id": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
