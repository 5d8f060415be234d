use async_trait::async_trait;
use chrono::Utc;
use harbor_core::{Category, Error, Keyword, KeywordStore, NewKeyword, Result};
use harbor_entities::keywords;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QueryOrder, Schema, Set,
};
use tracing::{debug, info};

/// Keyword store backed by a SQL database (Postgres or SQLite) via sea-orm.
pub struct DatabaseKeywordStore {
    db: DatabaseConnection,
}

impl DatabaseKeywordStore {
    /// Connect and make sure the `keywords` table exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to keyword database");
        let mut options = ConnectOptions::new(database_url);
        // Every pooled connection would otherwise open its own private in-memory database.
        if database_url.contains(":memory:") {
            options.max_connections(1);
        }
        options.sqlx_logging(false);

        let db = Database::connect(options).await.map_err(Error::unavailable)?;
        Self::from_connection(db).await
    }

    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        ensure_table(&db).await.map_err(Error::unavailable)?;
        info!("DatabaseKeywordStore initialized");
        Ok(Self { db })
    }

    fn model_to_keyword(model: keywords::Model) -> Keyword {
        Keyword {
            id: i64::from(model.id),
            term: model.term,
            category: Category::from_stored(&model.category),
            created_at: model.created_at,
        }
    }
}

async fn ensure_table(db: &DatabaseConnection) -> std::result::Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(keywords::Entity);
    stmt.if_not_exists();
    db.execute_unprepared(&backend.build(&stmt).to_string()).await?;
    Ok(())
}

#[async_trait]
impl KeywordStore for DatabaseKeywordStore {
    async fn list(&self) -> Result<Vec<Keyword>> {
        let models = keywords::Entity::find()
            .order_by_desc(keywords::Column::CreatedAt)
            .order_by_desc(keywords::Column::Id)
            .all(&self.db)
            .await
            .map_err(Error::unavailable)?;

        Ok(models.into_iter().map(Self::model_to_keyword).collect())
    }

    async fn exists(&self, term: &str) -> Result<bool> {
        let found = keywords::Entity::find()
            .filter(keywords::Column::Term.eq(term))
            .one(&self.db)
            .await
            .map_err(Error::unavailable)?;

        Ok(found.is_some())
    }

    async fn insert(&self, keyword: &NewKeyword) -> Result<Keyword> {
        let model = keywords::ActiveModel {
            term: Set(keyword.term.clone()),
            category: Set(keyword.category.as_str().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(Error::unavailable)?;
        debug!("Inserted keyword {} with id {}", result.term, result.id);
        Ok(Self::model_to_keyword(result))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // Ids outside the column range cannot exist.
        let Ok(id) = i32::try_from(id) else {
            return Ok(());
        };

        let result = keywords::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(Error::unavailable)?;
        debug!("Deleted {} keyword rows for id {id}", result.rows_affected);
        Ok(())
    }
}
