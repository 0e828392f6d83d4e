use crate::entities::{prelude::*, search_counts};
use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

pub struct SearchCountRepository {
    conn: DatabaseConnection,
}

impl SearchCountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Creates the row for `term` with a count of one, or bumps the count of
    /// the existing row. A single statement, so concurrent callers cannot
    /// create duplicates.
    pub async fn increment_or_create(
        &self,
        term: &str,
        movie_id: i64,
        poster_url: &str,
    ) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = search_counts::ActiveModel {
            search_term: Set(term.to_string()),
            count: Set(1),
            movie_id: Set(movie_id),
            poster_url: Set(poster_url.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        SearchCounts::insert(active_model)
            .on_conflict(
                OnConflict::column(search_counts::Column::SearchTerm)
                    .value(
                        search_counts::Column::Count,
                        Expr::col((SearchCounts, search_counts::Column::Count)).add(1),
                    )
                    .update_column(search_counts::Column::UpdatedAt)
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn find_by_term(&self, term: &str) -> Result<Option<search_counts::Model>> {
        let row = SearchCounts::find()
            .filter(search_counts::Column::SearchTerm.eq(term))
            .one(&self.conn)
            .await?;
        Ok(row)
    }

    /// Highest counts first; equal counts keep insertion order.
    pub async fn top(&self, limit: u64) -> Result<Vec<search_counts::Model>> {
        let rows = SearchCounts::find()
            .filter(search_counts::Column::Count.gt(0))
            .order_by_desc(search_counts::Column::Count)
            .order_by_asc(search_counts::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(SearchCounts::find().count(&self.conn).await?)
    }
}
