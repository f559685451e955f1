use chrono::{NaiveDate, Utc};
use sw_core::{ArticleStorage, NewArticle, Result};
use tracing::info;

/// The two fixed articles used to populate a fresh database, dated at
/// midnight of `today`.
pub fn placeholder_articles(today: NaiveDate) -> Vec<NewArticle> {
    let posted = today.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    let article = |title: &str, author: &str, content: &str| NewArticle {
        date_posted: posted,
        ..NewArticle::new(title, author, content)
    };
    vec![
        article("Fake Article 1", "Author 1", "This is a fake article for testing."),
        article("Fake Article 2", "Author 2", "This is another fake article for testing."),
    ]
}

pub async fn seed_placeholder_articles(storage: &dyn ArticleStorage) -> Result<Vec<i64>> {
    let articles = placeholder_articles(Utc::now().date_naive());
    let ids = storage.insert_articles(&articles).await?;
    info!("🌱 Inserted {} placeholder articles", ids.len());
    Ok(ids)
}
