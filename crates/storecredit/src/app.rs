use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        account::store_credit_page,
        api::{
            add_credit, deduct_credit, delete_store_credit, get_balance, get_config, get_history,
            list_balances, list_customers, update_config,
        },
        health::{healthz, livez},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for the admin API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api_routes = Router::new()
        .route("/store-credit", get(list_balances))
        .route("/store-credit/add", post(add_credit))
        .route("/store-credit/deduct", post(deduct_credit))
        .route("/store-credit/balance/{customer_id}", get(get_balance))
        .route("/store-credit/customers", get(list_customers))
        .route("/store-credit/config", get(get_config).put(update_config))
        .route("/store-credit/{id}/history", get(get_history))
        .route("/store-credit/{id}", delete(delete_store_credit))
        .layer(cors);

    let timeout = state.config.request_timeout();

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .route("/account/store-credit", get(store_credit_page))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use storecredit_core::auth::new_session;
    use storecredit_core::credit::{Customer, VALUE_PER_UNIT_FIELD};
    use storecredit_core::state_machine::ORDER_RETURN_STATE_MACHINE;

    use crate::config::Config;
    use crate::state::tests::test_state;

    const TOKEN: &str = "test-admin-token";

    fn config() -> Config {
        Config {
            sqlite_path: ":memory:".to_string(),
            admin_token: Some(TOKEN.to_string()),
            session_cookie_name: "session".to_string(),
            login_path: "/account/login".to_string(),
            state_machine_name: ORDER_RETURN_STATE_MACHINE.to_string(),
            ledger_max_attempts: 5,
            request_timeout_seconds: 10,
            session_ttl_hours: 1,
        }
    }

    async fn state_with_customer() -> (AppState, Customer) {
        let state = test_state(config());
        let customer =
            Customer::new("Ada", "Lovelace").with_custom_field(VALUE_PER_UNIT_FIELD, 0.5);
        state.customers.upsert_customer(&customer).await.unwrap();
        (state, customer)
    }

    fn admin(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_app(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_livez() {
        let app = create_app(test_state(config()));
        let response = app
            .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_healthz_reports_healthy() {
        let (status, body) = send(
            &test_state(config()),
            Request::builder().uri("/healthz").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["healthy"], true);
    }

    #[tokio::test]
    async fn test_admin_api_requires_token() {
        let state = test_state(config());

        let (status, body) = send(
            &state,
            Request::builder()
                .uri("/api/store-credit")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "unauthorized");

        let (status, _) = send(
            &state,
            Request::builder()
                .uri("/api/store-credit")
                .header(header::AUTHORIZATION, "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_api_disabled_without_configured_token() {
        let mut config = config();
        config.admin_token = None;
        let (status, _) = send(
            &test_state(config),
            admin(Method::GET, "/api/store-credit", None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_add_then_deduct() {
        let (state, customer) = state_with_customer().await;

        let (status, body) = send(
            &state,
            admin(
                Method::POST,
                "/api/store-credit/add",
                Some(json!({ "customerId": customer.id, "amount": 10.0, "reason": "Refund" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["credits"], 20.0);
        assert_eq!(body["balance"]["balanceCredits"], 20.0);
        assert_eq!(body["balance"]["balanceAmount"], 10.0);
        assert_eq!(body["balance"]["valuePerCredit"], 0.5);
        assert_eq!(body["balance"]["rateSource"], "customer");
        assert!(body["historyId"].as_str().is_some());

        let (status, body) = send(
            &state,
            admin(
                Method::POST,
                "/api/store-credit/deduct",
                Some(json!({ "customerId": customer.id, "amount": 4.0 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["credits"], 8.0);
        assert_eq!(body["balance"]["balanceCredits"], 12.0);

        let (status, body) = send(
            &state,
            admin(
                Method::GET,
                &format!("/api/store-credit/balance/{}", customer.id),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balanceAmount"], 6.0);

        let (status, body) = send(&state, admin(Method::GET, "/api/store-credit", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["customerFullName"], "Ada Lovelace");
        assert_eq!(body[0]["credits"], 12.0);
        assert_eq!(body[0]["balance"], 6.0);
    }

    #[tokio::test]
    async fn test_deduct_more_than_balance_is_rejected() {
        let (state, customer) = state_with_customer().await;
        send(
            &state,
            admin(
                Method::POST,
                "/api/store-credit/add",
                Some(json!({ "customerId": customer.id, "amount": 1.0 })),
            ),
        )
        .await;

        let (status, body) = send(
            &state,
            admin(
                Method::POST,
                "/api/store-credit/deduct",
                Some(json!({ "customerId": customer.id, "amount": 5.0 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "insufficient_balance");

        let balance = state.manager.get_credit_balance(customer.id).await.unwrap();
        assert_eq!(balance.balance_credits, 2.0);
    }

    #[tokio::test]
    async fn test_deduct_without_balance_is_rejected() {
        let (state, customer) = state_with_customer().await;
        let (status, body) = send(
            &state,
            admin(
                Method::POST,
                "/api/store-credit/deduct",
                Some(json!({ "customerId": customer.id, "amount": 1.0 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "no_balance");
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let state = test_state(config());
        let (status, body) = send(
            &state,
            admin(
                Method::POST,
                "/api/store-credit/add",
                Some(json!({ "customerId": Uuid::new_v4(), "amount": 1.0 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "customer_not_found");
    }

    #[tokio::test]
    async fn test_bad_amount_and_bad_body_are_bad_requests() {
        let (state, customer) = state_with_customer().await;

        let (status, body) = send(
            &state,
            admin(
                Method::POST,
                "/api/store-credit/add",
                Some(json!({ "customerId": customer.id, "amount": -3 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_amount");

        let (status, body) = send(
            &state,
            admin(
                Method::POST,
                "/api/store-credit/add",
                Some(json!({ "amount": 3 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_body");
    }

    #[tokio::test]
    async fn test_config_round_trip() {
        let state = test_state(config());

        let (status, body) =
            send(&state, admin(Method::GET, "/api/store-credit/config", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["defaultValuePerCredit"], 1.0);

        let (status, body) = send(
            &state,
            admin(
                Method::PUT,
                "/api/store-credit/config",
                Some(json!({ "defaultValuePerCredit": 2.5 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["defaultValuePerCredit"], 2.5);

        let (status, _) = send(
            &state,
            admin(
                Method::PUT,
                "/api/store-credit/config",
                Some(json!({ "defaultValuePerCredit": 0 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_customers_listing() {
        let (state, _) = state_with_customer().await;
        let (status, body) =
            send(&state, admin(Method::GET, "/api/store-credit/customers", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "Ada Lovelace");
        assert_eq!(body[0]["valuePerCredit"], 0.5);
    }

    #[tokio::test]
    async fn test_history_and_delete() {
        let (state, customer) = state_with_customer().await;
        let (_, added) = send(
            &state,
            admin(
                Method::POST,
                "/api/store-credit/add",
                Some(json!({ "customerId": customer.id, "amount": 2.0 })),
            ),
        )
        .await;
        let store_credit_id = added["storeCreditId"].as_str().unwrap().to_string();

        let (status, body) = send(
            &state,
            admin(
                Method::GET,
                &format!("/api/store-credit/{store_credit_id}/history"),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["actionType"], "add");
        assert_eq!(body[0]["reason"], "Not specified");
        assert_eq!(body[0]["amount"], 2.0);

        let (status, _) = send(
            &state,
            admin(
                Method::DELETE,
                &format!("/api/store-credit/{store_credit_id}"),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(
            &state,
            admin(
                Method::GET,
                &format!("/api/store-credit/{store_credit_id}/history"),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "store_credit_not_found");

        let (status, _) = send(
            &state,
            admin(
                Method::DELETE,
                &format!("/api/store-credit/{store_credit_id}"),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_storefront_redirects_without_session() {
        let state = test_state(config());
        let response = create_app(state)
            .oneshot(
                Request::builder()
                    .uri("/account/store-credit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/account/login?redirectTo=%2Faccount%2Fstore-credit"
        );
    }

    #[tokio::test]
    async fn test_storefront_redirects_with_expired_session() {
        let (state, customer) = state_with_customer().await;
        let session = new_session(customer.id, Utc::now() - Duration::hours(2), Duration::hours(1));
        state.sessions.create_session(&session).await.unwrap();

        let response = create_app(state)
            .oneshot(
                Request::builder()
                    .uri("/account/store-credit")
                    .header(header::COOKIE, format!("session={}", session.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_storefront_renders_balance_and_history() {
        let (state, customer) = state_with_customer().await;
        send(
            &state,
            admin(
                Method::POST,
                "/api/store-credit/add",
                Some(json!({ "customerId": customer.id, "amount": 3.0, "reason": "Return #1001" })),
            ),
        )
        .await;
        let session = new_session(customer.id, Utc::now(), Duration::hours(1));
        state.sessions.create_session(&session).await.unwrap();

        let response = create_app(state)
            .oneshot(
                Request::builder()
                    .uri("/account/store-credit")
                    .header(header::COOKIE, format!("session={}", session.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains(r#"<strong id="credits">6.00</strong>"#));
        assert!(html.contains(r#"<strong id="balance">3.00</strong>"#));
        assert!(html.contains("Return #1001"));
    }
}
