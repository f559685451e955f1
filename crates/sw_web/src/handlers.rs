use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;
use sw_core::PriceTable;

use crate::error::WebError;
use crate::views;
use crate::AppState;

pub async fn list_articles(State(state): State<Arc<AppState>>) -> Result<Html<String>, WebError> {
    let articles = state.storage.list_articles().await?;
    Ok(Html(views::render_index(&articles)))
}

/// Non-numeric ids are treated like unknown ones.
pub async fn show_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, WebError> {
    let id: i64 = id.parse().map_err(|_| WebError::NotFound)?;

    let found = state
        .storage
        .get_article_with_stock_data(id)
        .await?
        .ok_or(WebError::NotFound)?;

    let table = PriceTable::from_stock_data(&found.stock_data)?;
    Ok(Html(views::render_article(&found.article, &table)))
}
