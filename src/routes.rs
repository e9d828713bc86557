// src/routes.rs
use log::info;
use std::convert::Infallible;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::{ApiError, ApiErrorKind};
use crate::handlers::prices::get_prices;
use crate::handlers::wacc::get_wacc;

// Map our custom errors onto status codes; everything else is a 500.
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = match api_error.kind {
            ApiErrorKind::InvalidInput => warp::http::StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorKind::External => warp::http::StatusCode::BAD_GATEWAY,
        };
        message = api_error.message.clone();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes() -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let wacc_route = warp::path!("api" / "v1" / "wacc" / String)
        .and(warp::get())
        .and(warp::query())
        .and_then(get_wacc);

    let prices_route = warp::path!("api" / "v1" / "prices" / String)
        .and(warp::get())
        .and(warp::query())
        .and_then(get_prices);

    info!("All routes configured successfully.");

    wacc_route.or(prices_route).recover(handle_rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::http::StatusCode;

    async fn status_for(rejection: Rejection) -> StatusCode {
        handle_rejection(rejection)
            .await
            .unwrap()
            .into_response()
            .status()
    }

    #[tokio::test]
    async fn invalid_input_maps_to_422() {
        let rejection = warp::reject::custom(ApiError::invalid_input("not enough price history"));
        assert_eq!(status_for(rejection).await, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_502() {
        let rejection = warp::reject::custom(ApiError::external_error("fetch failed"));
        assert_eq!(status_for(rejection).await, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn missing_route_maps_to_404() {
        assert_eq!(status_for(warp::reject::not_found()).await, StatusCode::NOT_FOUND);
    }
}
