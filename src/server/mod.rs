//! HTTP surface over [`RateService`].

pub mod error;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::HeaderValue,
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::core::config::ServerConfig;
use crate::service::{AverageRate, MajorDifference, MinMaxAverage, RateService};
use error::{ApiError, ApiResult};

pub struct AppState {
    pub service: RateService,
}

pub async fn healthz() -> &'static str {
    "ok"
}

async fn get_average_rate(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<AverageRate>> {
    let Path((currency, date)) = path?;
    let rate = state.service.average_rate(&currency, &date).await?;
    Ok(Json(rate))
}

async fn get_min_max_average(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<MinMaxAverage>> {
    let Path((currency, quotations)) = path?;
    let averages = state
        .service
        .min_max_average(&currency, &quotations)
        .await?;
    Ok(Json(averages))
}

async fn get_major_difference(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<MajorDifference>> {
    let Path((currency, quotations)) = path?;
    let difference = state
        .service
        .major_difference(&currency, &quotations)
        .await?;
    Ok(Json(difference))
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_allow_origins.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }
    let origins = config
        .cors_allow_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/exchanges/{currency}/{date}", get(get_average_rate))
        .route("/averages/{currency}/{quotations}", get(get_min_max_average))
        .route("/buy-ask-rate/{currency}/{quotations}", get(get_major_difference))
        .fallback(route_not_found)
        .with_state(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FetchError;
    use crate::core::rates::{BidAskRate, MidRate, QuotationCount, RateSeries, RateSource};
    use crate::core::{CurrencySet, ValidationRules, Validators};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct StaticSource;

    #[async_trait]
    impl RateSource for StaticSource {
        async fn fetch_average_rate_series(
            &self,
            currency: &str,
            date: NaiveDate,
        ) -> Result<RateSeries<MidRate>, FetchError> {
            if currency == "EUR" {
                return Err(FetchError::UpstreamUnavailable {
                    url: "http://upstream/a/EUR".to_string(),
                    status: Some(404),
                    body: "404 NotFound - Not Found - Brak danych".to_string(),
                });
            }
            Ok(vec![
                MidRate {
                    effective_date: date,
                    mid: 4.18,
                },
                MidRate {
                    effective_date: date,
                    mid: 4.20,
                },
            ])
        }

        async fn fetch_last_n_average_series(
            &self,
            _currency: &str,
            _count: QuotationCount,
        ) -> Result<RateSeries<MidRate>, FetchError> {
            Err(FetchError::UpstreamUnavailable {
                url: "http://upstream/a/last".to_string(),
                status: Some(503),
                body: String::new(),
            })
        }

        async fn fetch_last_n_bid_ask_series(
            &self,
            _currency: &str,
            _count: QuotationCount,
        ) -> Result<RateSeries<BidAskRate>, FetchError> {
            let date = NaiveDate::from_ymd_opt(2023, 4, 25).unwrap();
            Ok(vec![BidAskRate {
                effective_date: date,
                bid: 4.15,
                ask: 4.25,
            }])
        }

        async fn fetch_currency_codes(&self) -> Result<Vec<String>, FetchError> {
            Ok(vec!["USD".to_string(), "EUR".to_string()])
        }
    }

    fn router() -> Router {
        let validators = Validators::new(
            Arc::new(CurrencySet::new(["USD", "EUR"])),
            ValidationRules::default(),
        );
        let service = RateService::new(validators, Arc::new(StaticSource));
        app_router(Arc::new(AppState { service }), &ServerConfig::default())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = router()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_exchange_rate_route() {
        let (status, body) = get_json("/exchanges/usd/2023-04-21").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currency"], "USD");
        assert_eq!(body["date"], "2023-04-21");
        let average = body["average_exchange_rate"].as_f64().unwrap();
        assert!((average - 4.19).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_requests() {
        let (status, body) = get_json("/exchanges/usd/invalid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid date format, should be YYYY-MM-DD."}));

        let (status, body) = get_json("/exchanges/invalid/2023-04-21").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Invalid currency invalid, must be one of [USD, EUR]."})
        );

        let (status, body) = get_json("/averages/usd/0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Invalid number of quotations, should be between 1 and 255 inclusive."})
        );

        let (status, body) = get_json("/buy-ask-rate/usd/five").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Invalid number of quotations, should be an integer."})
        );
    }

    #[tokio::test]
    async fn test_undecodable_path_is_json_bad_request() {
        for uri in ["/averages/usd/%FF", "/exchanges/%C3%28/2023-04-21", "/buy-ask-rate/usd/%FE"] {
            let (status, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            let message = body["error"].as_str().unwrap();
            assert!(!message.is_empty(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_upstream_not_found_is_404() {
        let (status, body) = get_json("/exchanges/eur/2023-04-21").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("Brak danych"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let (status, body) = get_json("/averages/usd/5").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "Failed to fetch data from http://upstream/a/last: 503"})
        );
    }

    #[tokio::test]
    async fn test_major_difference_route() {
        let (status, body) = get_json("/buy-ask-rate/usd/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currency"], "USD");
        assert_eq!(body["quotations"], 1);
        let difference = body["major difference"].as_f64().unwrap();
        assert!((difference - 0.10).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = get_json("/exchanges/usd").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"error": "Incorrectly formulated enquiries. Please check your spelling and try again."})
        );
    }
}
