use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use async_trait::async_trait;
use axum::Router;
use chrono::NaiveDate;
use sw_core::{
    Article, ArticleStorage, ArticleWithStockData, Error, NewArticle, PriceObservation, PriceTable,
    Result,
};
use sw_storage::InMemoryStorage;
use sw_web::{create_app, AppState};
use tower::ServiceExt;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn week() -> PriceTable {
    let mut observations = Vec::new();
    for d in 4..=8 {
        observations.push(PriceObservation::new(day(d), "AAPL", 170.0 + d as f64));
        if d != 6 {
            observations.push(PriceObservation::new(day(d), "MSFT", 400.0 + d as f64));
        }
    }
    PriceTable::pivot(observations).unwrap()
}

async fn setup() -> (Arc<InMemoryStorage>, Router) {
    let storage = Arc::new(InMemoryStorage::new());
    let app = create_app(AppState::new(storage.clone()));
    (storage, app)
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn index_lists_every_article() {
    let (storage, app) = setup().await;
    storage
        .insert_articles(&[
            NewArticle::new("Fake Article 1", "Author 1", "This is a fake article for testing."),
            NewArticle::new(
                "Fake Article 2",
                "Author 2",
                "This is another fake article for testing.",
            ),
        ])
        .await
        .unwrap();

    let (status, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Fake Article 1"));
    assert!(body.contains("Fake Article 2"));
    assert!(body.contains(r#"href="/article/2""#));
}

#[tokio::test]
async fn index_with_no_articles() {
    let (_storage, app) = setup().await;
    let (status, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No articles yet."));
}

#[tokio::test]
async fn article_page_shows_ticker_by_date_table() {
    let (storage, app) = setup().await;
    let id = storage
        .insert_article_with_stock_data(
            &NewArticle::new(
                "Weekly Stock Market Analysis",
                "Financial Expert",
                "In this week ...",
            ),
            &week(),
        )
        .await
        .unwrap();

    let (status, body) = get(app, &format!("/article/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Weekly Stock Market Analysis"));
    assert!(body.contains("In this week ..."));

    let header: String = (4..=8).map(|d| format!("<th>{}</th>", day(d))).collect();
    assert!(body.contains(&format!("<th>Ticker</th>{}", header)));
    assert!(body.contains("<tr><td>AAPL</td><td>174.00</td><td>175.00</td><td>176.00</td><td>177.00</td><td>178.00</td></tr>"));
    assert!(body.contains("<tr><td>MSFT</td><td>404.00</td><td>405.00</td><td>N/A</td><td>407.00</td><td>408.00</td></tr>"));
    assert_eq!(body.matches("<tr><td>").count(), 2);
}

#[tokio::test]
async fn article_without_stock_data_has_no_table() {
    let (storage, app) = setup().await;
    let id = storage
        .insert_article(&NewArticle::new("Plain", "Author", "Body"))
        .await
        .unwrap();

    let (status, body) = get(app, &format!("/article/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Plain"));
    assert!(!body.contains("<table"));
}

#[tokio::test]
async fn unknown_article_is_not_found() {
    let (storage, app) = setup().await;
    storage
        .insert_article(&NewArticle::new("Only", "Author", "Body"))
        .await
        .unwrap();
    let before = storage.list_articles().await.unwrap();

    let (status, body) = get(app.clone(), "/article/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Article not found");

    let (status, body) = get(app, "/article/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Article not found");

    assert_eq!(storage.list_articles().await.unwrap(), before);
}

/// Storage whose every call fails, as when the database goes away.
struct UnavailableStorage;

fn unavailable<T>() -> Result<T> {
    Err(Error::Database("connection refused".to_string()))
}

#[async_trait]
impl ArticleStorage for UnavailableStorage {
    async fn list_articles(&self) -> Result<Vec<Article>> {
        unavailable()
    }

    async fn get_article_with_stock_data(&self, _id: i64) -> Result<Option<ArticleWithStockData>> {
        unavailable()
    }

    async fn insert_article(&self, _article: &NewArticle) -> Result<i64> {
        unavailable()
    }

    async fn insert_articles(&self, _articles: &[NewArticle]) -> Result<Vec<i64>> {
        unavailable()
    }

    async fn insert_stock_data(&self, _article_id: i64, _table: &PriceTable) -> Result<usize> {
        unavailable()
    }

    async fn insert_article_with_stock_data(
        &self,
        _article: &NewArticle,
        _table: &PriceTable,
    ) -> Result<i64> {
        unavailable()
    }
}

#[tokio::test]
async fn storage_failure_is_internal_server_error() {
    let app = create_app(AppState::new(Arc::new(UnavailableStorage)));

    let (status, body) = get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal server error");

    let (status, body) = get(app, "/article/1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal server error");
}
