//! Order flow integration tests: pricing, totals, payments, reports

mod common;

use common::spawn_app;
use http::StatusCode;
use serde_json::{Value, json};

/// Seed a service, category and pricing rule; returns (service_id, category_id)
async fn seed_catalog(app: &common::TestApp, token: &str, unit_price: f64, min_charge: f64) -> (i64, i64) {
    let (status, service) = app
        .request(
            "POST",
            "/api/service-types",
            Some(token),
            Some(json!({ "name": "Wash & Fold", "unit": "KG" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{service}");
    let (status, category) = app
        .request(
            "POST",
            "/api/laundry-categories",
            Some(token),
            Some(json!({ "name": "Clothes" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{category}");

    let (status, rule) = app
        .request(
            "POST",
            "/api/pricing-rules",
            Some(token),
            Some(json!({
                "service_type_id": service["id"],
                "laundry_category_id": category["id"],
                "unit_price": unit_price,
                "min_charge": min_charge
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{rule}");

    (
        service["id"].as_i64().unwrap(),
        category["id"].as_i64().unwrap(),
    )
}

async fn seed_customer(app: &common::TestApp, token: &str, branch_id: i64, name: &str) -> i64 {
    let (status, customer) = app
        .request(
            "POST",
            "/api/customers",
            Some(token),
            Some(json!({ "name": name, "branch_id": branch_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{customer}");
    customer["id"].as_i64().unwrap()
}

fn due(order: &Value) -> f64 {
    order["amount_due"].as_f64().unwrap()
}

#[tokio::test]
async fn order_totals_follow_pricing_rules_and_discount() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let branch_id = app.default_branch_id(&token).await;
    let (service_id, category_id) = seed_catalog(&app, &token, 2.5, 0.0).await;
    let customer_id = seed_customer(&app, &token, branch_id, "Rosa").await;

    // 4 kg at the rule price (2.50) + one line with a manual override
    let (status, order) = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "customer_id": customer_id,
                "branch_id": branch_id,
                "items": [
                    { "service_type_id": service_id, "laundry_category_id": category_id, "quantity": 4.0 },
                    { "service_type_id": service_id, "laundry_category_id": category_id,
                      "quantity": 2.0, "unit_price": 5.0, "description": "silk blouse" }
                ],
                "discount_type": "PERCENTAGE",
                "discount_value": 10.0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{order}");

    // subtotal = 4×2.50 + 2×5.00 = 20.00; 10% off → 18.00
    assert_eq!(order["subtotal"].as_f64().unwrap(), 20.0);
    assert_eq!(order["total_amount"].as_f64().unwrap(), 18.0);
    assert_eq!(order["amount_paid"].as_f64().unwrap(), 0.0);
    assert_eq!(due(&order), 18.0);
    assert_eq!(order["payment_status"], "UNPAID");
    assert_eq!(order["status"], "RECEIVED");
    assert!(order["order_number"].as_str().unwrap().starts_with("LND-"));
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["customer_name"], "Rosa");
}

#[tokio::test]
async fn min_charge_raises_small_lines() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let branch_id = app.default_branch_id(&token).await;
    // 4.00/kg with a 6.00 minimum per line
    let (service_id, category_id) = seed_catalog(&app, &token, 4.0, 6.0).await;
    let customer_id = seed_customer(&app, &token, branch_id, "Small Load").await;

    let (status, order) = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "customer_id": customer_id,
                "branch_id": branch_id,
                "items": [
                    { "service_type_id": service_id, "laundry_category_id": category_id, "quantity": 0.8 }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{order}");
    // 0.8 × 4.00 = 3.20 → raised to the 6.00 minimum
    assert_eq!(order["subtotal"].as_f64().unwrap(), 6.0);
}

#[tokio::test]
async fn missing_pricing_rule_without_override_is_rejected() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let branch_id = app.default_branch_id(&token).await;
    let customer_id = seed_customer(&app, &token, branch_id, "No Rule").await;

    // Catalog rows exist but no pricing rule
    let (_, service) = app
        .request(
            "POST",
            "/api/service-types",
            Some(&token),
            Some(json!({ "name": "Dry Cleaning", "unit": "ITEM" })),
        )
        .await;
    let (_, category) = app
        .request(
            "POST",
            "/api/laundry-categories",
            Some(&token),
            Some(json!({ "name": "Suits" })),
        )
        .await;

    let (status, body) = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "customer_id": customer_id,
                "branch_id": branch_id,
                "items": [{
                    "service_type_id": service["id"],
                    "laundry_category_id": category["id"],
                    "quantity": 1.0
                }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn payments_drive_amount_due_and_status() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let branch_id = app.default_branch_id(&token).await;
    let (service_id, category_id) = seed_catalog(&app, &token, 3.0, 0.0).await;
    let customer_id = seed_customer(&app, &token, branch_id, "Payer").await;

    // 10 kg × 3.00 = 30.00, 10.00 paid up front
    let (status, order) = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "customer_id": customer_id,
                "branch_id": branch_id,
                "items": [
                    { "service_type_id": service_id, "laundry_category_id": category_id, "quantity": 10.0 }
                ],
                "initial_payment": { "amount": 10.0, "method": "CASH" }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{order}");
    let order_id = order["id"].as_i64().unwrap();
    assert_eq!(order["amount_paid"].as_f64().unwrap(), 10.0);
    assert_eq!(due(&order), 20.0);
    assert_eq!(order["payment_status"], "PARTIAL");
    assert_eq!(order["payments"].as_array().unwrap().len(), 1);

    // Overpaying the balance is rejected
    let (status, body) = app
        .request(
            "POST",
            &format!("/api/orders/{order_id}/payments"),
            Some(&token),
            Some(json!({ "amount": 25.0, "method": "CARD" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");

    // Settle the remainder
    let (status, body) = app
        .request(
            "POST",
            &format!("/api/orders/{order_id}/payments"),
            Some(&token),
            Some(json!({ "amount": 20.0, "method": "CARD", "reference": "POS-1234" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let refreshed = &body["order"];
    assert_eq!(refreshed["amount_paid"].as_f64().unwrap(), 30.0);
    assert_eq!(due(refreshed), 0.0);
    assert_eq!(refreshed["payment_status"], "PAID");

    // amount_due == total_amount - amount_paid holds throughout
    assert_eq!(
        refreshed["total_amount"].as_f64().unwrap() - refreshed["amount_paid"].as_f64().unwrap(),
        due(refreshed)
    );

    let (status, payments) = app
        .request(
            "GET",
            &format!("/api/orders/{order_id}/payments"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payments.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn cancelled_orders_reject_payments_and_edits() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let branch_id = app.default_branch_id(&token).await;
    let (service_id, category_id) = seed_catalog(&app, &token, 2.0, 0.0).await;
    let customer_id = seed_customer(&app, &token, branch_id, "Canceller").await;

    let (_, order) = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "customer_id": customer_id,
                "branch_id": branch_id,
                "items": [
                    { "service_type_id": service_id, "laundry_category_id": category_id, "quantity": 1.0 }
                ]
            })),
        )
        .await;
    let order_id = order["id"].as_i64().unwrap();

    let (status, cancelled) = app
        .request(
            "PUT",
            &format!("/api/orders/{order_id}"),
            Some(&token),
            Some(json!({ "status": "CANCELLED" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");

    let (status, _) = app
        .request(
            "POST",
            &format!("/api/orders/{order_id}/payments"),
            Some(&token),
            Some(json!({ "amount": 1.0, "method": "CASH" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/orders/{order_id}"),
            Some(&token),
            Some(json!({ "status": "READY" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn duplicate_active_pricing_rule_conflicts() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let (service_id, category_id) = seed_catalog(&app, &token, 2.0, 0.0).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/pricing-rules",
            Some(&token),
            Some(json!({
                "service_type_id": service_id,
                "laundry_category_id": category_id,
                "unit_price": 9.99
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
}

#[tokio::test]
async fn quote_endpoint_resolves_active_rule() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let (service_id, category_id) = seed_catalog(&app, &token, 7.5, 3.0).await;

    let (status, quote) = app
        .request(
            "GET",
            &format!(
                "/api/pricing-rules/quote?service_type_id={service_id}&laundry_category_id={category_id}"
            ),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["unit_price"].as_f64().unwrap(), 7.5);
    assert_eq!(quote["min_charge"].as_f64().unwrap(), 3.0);

    let (status, _) = app
        .request(
            "GET",
            &format!(
                "/api/pricing-rules/quote?service_type_id={service_id}&laundry_category_id=999999"
            ),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn discount_cannot_undercut_amount_already_paid() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let branch_id = app.default_branch_id(&token).await;
    let (service_id, category_id) = seed_catalog(&app, &token, 10.0, 0.0).await;
    let customer_id = seed_customer(&app, &token, branch_id, "Discounter").await;

    let (_, order) = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "customer_id": customer_id,
                "branch_id": branch_id,
                "items": [
                    { "service_type_id": service_id, "laundry_category_id": category_id, "quantity": 2.0 }
                ],
                "initial_payment": { "amount": 15.0, "method": "CASH" }
            })),
        )
        .await;
    let order_id = order["id"].as_i64().unwrap();

    // 20.00 total, 15.00 paid; a 50% discount would drop the total to 10.00
    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/orders/{order_id}"),
            Some(&token),
            Some(json!({ "discount_type": "PERCENTAGE", "discount_value": 50.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // A 10% discount (18.00 total) still covers the payment and recomputes due
    let (status, updated) = app
        .request(
            "PUT",
            &format!("/api/orders/{order_id}"),
            Some(&token),
            Some(json!({ "discount_type": "PERCENTAGE", "discount_value": 10.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["total_amount"].as_f64().unwrap(), 18.0);
    assert_eq!(due(&updated), 3.0);
    assert_eq!(updated["payment_status"], "PARTIAL");
}

#[tokio::test]
async fn reports_reflect_orders_expenses_and_methods() {
    let app = spawn_app().await;
    let token = app.admin_token().await;
    let branch_id = app.default_branch_id(&token).await;
    let (service_id, category_id) = seed_catalog(&app, &token, 5.0, 0.0).await;
    let customer_id = seed_customer(&app, &token, branch_id, "Reporter").await;

    // 6 kg × 5.00 = 30.00, fully paid in cash
    let (status, order) = app
        .request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "customer_id": customer_id,
                "branch_id": branch_id,
                "items": [
                    { "service_type_id": service_id, "laundry_category_id": category_id, "quantity": 6.0 }
                ],
                "initial_payment": { "amount": 30.0, "method": "CASH" }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{order}");

    // One 12.00 expense today
    let (_, expense_category) = app
        .request(
            "POST",
            "/api/expense-categories",
            Some(&token),
            Some(json!({ "name": "Detergent" })),
        )
        .await;
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let (status, expense) = app
        .request(
            "POST",
            "/api/expenses",
            Some(&token),
            Some(json!({
                "expense_category_id": expense_category["id"],
                "branch_id": branch_id,
                "description": "20L detergent drum",
                "amount": 12.0,
                "incurred_on": today
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{expense}");

    let (status, dashboard) = app
        .request("GET", "/api/reports/dashboard", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{dashboard}");
    assert_eq!(dashboard["revenue"].as_f64().unwrap(), 30.0);
    assert_eq!(dashboard["collected"].as_f64().unwrap(), 30.0);
    assert_eq!(dashboard["outstanding"].as_f64().unwrap(), 0.0);
    assert_eq!(dashboard["order_count"].as_i64().unwrap(), 1);
    assert_eq!(dashboard["expense_total"].as_f64().unwrap(), 12.0);
    assert_eq!(dashboard["net"].as_f64().unwrap(), 18.0);

    // The daily buckets sum to the dashboard revenue
    let (status, revenue) = app
        .request(
            "GET",
            "/api/reports/revenue?granularity=day",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let bucket_sum: f64 = revenue
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["revenue"].as_f64().unwrap())
        .sum();
    assert_eq!(bucket_sum, 30.0);
    assert_eq!(revenue.as_array().unwrap().len(), 30);

    let (status, methods) = app
        .request("GET", "/api/reports/payment-methods", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let cash = methods
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["method"] == "CASH")
        .expect("cash row");
    assert_eq!(cash["total"].as_f64().unwrap(), 30.0);
    assert_eq!(cash["count"].as_i64().unwrap(), 1);

    let (status, services) = app
        .request("GET", "/api/reports/top-services", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(services[0]["service_name"], "Wash & Fold");
    assert_eq!(services[0]["revenue"].as_f64().unwrap(), 30.0);

    let (status, by_category) = app
        .request("GET", "/api/reports/expenses", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_category[0]["category_name"], "Detergent");
    assert_eq!(by_category[0]["total"].as_f64().unwrap(), 12.0);

    // Bad granularity is rejected
    let (status, _) = app
        .request(
            "GET",
            "/api/reports/revenue?granularity=week",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
