//! Document status lookups and seeding.
//!
//! Statuses drive the merge target: the status picked by the user names the
//! model to generate, and the source documents move to it once fully served.

use crate::{
    config::statuses::StatusConfig,
    entities::{DocumentStatus, document_status},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Statuses of `doc_type` that generate another document, ordered by id.
pub async fn get_available_statuses(
    db: &DatabaseConnection,
    doc_type: &str,
) -> Result<Vec<document_status::Model>> {
    let statuses = DocumentStatus::find()
        .filter(document_status::Column::DocType.eq(doc_type))
        .order_by_asc(document_status::Column::Id)
        .all(db)
        .await?;

    Ok(statuses
        .into_iter()
        .filter(|status| status.generates.as_deref().is_some_and(|g| !g.is_empty()))
        .collect())
}

/// Model name generated by a status, `None` when the status is missing or generates nothing.
pub async fn get_generate_class(db: &DatabaseConnection, status_id: i32) -> Result<Option<String>> {
    let class = DocumentStatus::find_by_id(status_id)
        .one(db)
        .await?
        .and_then(|status| status.generates)
        .filter(|generates| !generates.is_empty());
    debug!("Status {} generates {:?}", status_id, class);
    Ok(class)
}

/// Status new documents of `doc_type` start in, if one is marked default.
pub async fn get_default_status<C>(db: &C, doc_type: &str) -> Result<Option<document_status::Model>>
where
    C: ConnectionTrait,
{
    DocumentStatus::find()
        .filter(document_status::Column::DocType.eq(doc_type))
        .filter(document_status::Column::IsDefault.eq(true))
        .order_by_asc(document_status::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts every configured status whose id is not in the database yet.
///
/// Existing rows are left untouched so edits made after first run survive.
/// Returns the number of inserted statuses.
pub async fn seed_statuses(db: &DatabaseConnection, statuses: &[StatusConfig]) -> Result<usize> {
    let mut inserted = 0;
    for config in statuses {
        if DocumentStatus::find_by_id(config.id).one(db).await?.is_some() {
            debug!("Status {} already present, skipping", config.id);
            continue;
        }

        document_status::ActiveModel {
            id: Set(config.id),
            doc_type: Set(config.doc_type.clone()),
            name: Set(config.name.clone()),
            generates: Set(config.generates.clone()),
            is_default: Set(config.is_default),
            editable: Set(config.editable),
        }
        .insert(db)
        .await?;
        inserted += 1;
    }

    info!("Seeded {} document statuses", inserted);
    Ok(inserted)
}
