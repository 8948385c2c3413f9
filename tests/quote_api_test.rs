mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{authorized, get, json_request, test_app, TestAppBuilder};
use plaza_backend::config::QuoteConfig;
use plaza_backend::quote::validation::ValidationMode;
use plaza_backend::quote::wizard::{QuoteWizard, WizardStep};

fn jane_doe() -> Value {
    json!({
        "service": "life-insurance",
        "full_name": "Jane Doe",
        "dob": "1990-01-01",
        "email": "jane@example.com",
        "phone": "5551234567",
        "city_province": "Toronto, ON",
        "gender": "Female",
        "smoker": "No",
        "coverage_amount_life": "$500,000",
        "term_length": "20 years",
        "pre_existing_conditions": "No"
    })
}

fn issue_paths(body: &Value) -> Vec<Value> {
    body["issues"].as_array().cloned().unwrap_or_default().into_iter().map(|i| i["path"].clone()).collect()
}

#[tokio::test]
async fn test_catalog_lists_all_services() {
    let app = test_app();
    let (status, body) = app.send(get("/quotes/services")).await;
    assert_eq!(status, StatusCode::OK);

    let codes: Vec<&str> = body["services"].as_array().unwrap().iter().map(|s| s["code"].as_str().unwrap()).collect();
    assert_eq!(
        codes,
        vec![
            "life-insurance",
            "visitor-insurance",
            "super-visa-insurance",
            "resp",
            "tfsa",
            "rrsp",
            "health-dental",
            "travel-insurance-canadians",
            "international-students-plan",
        ]
    );
    assert_eq!(body["defaults"]["smoker"], "No");
    assert_eq!(body["contact_fields"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_service_fields() {
    let app = test_app();
    let (status, body) = app.send(get("/quotes/services/life-insurance/fields")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "Life Insurance");
    let smoker_details = body["fields"].as_array().unwrap().iter().find(|f| f["name"] == "smoker_details").unwrap();
    assert_eq!(smoker_details["visibility"], json!({ "when": "equals", "gate": "smoker", "value": "Yes" }));

    let (status, _) = app.send(get("/quotes/services/pet-insurance/fields")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validate_step() {
    let app = test_app();

    let (status, body) = app.send(json_request("POST", "/quotes/steps/0/validate", &json!({ "values": {} }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(issue_paths(&body), vec![json!(["service"])]);

    let mut values = jane_doe();
    values["smoker"] = json!("Yes");
    let (_, body) = app
        .send(json_request("POST", "/quotes/steps/service-details/validate", &json!({ "values": values })))
        .await;
    assert_eq!(body["valid"], false);
    assert_eq!(issue_paths(&body), vec![json!(["smoker_details"])]);

    let (_, body) = app.send(json_request("POST", "/quotes/steps/2/validate", &json!({ "values": jane_doe() }))).await;
    assert_eq!(body, json!({ "valid": true, "issues": [] }));

    let (status, _) = app.send(json_request("POST", "/quotes/steps/payment/validate", &json!({ "values": {} }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_accepted() {
    let app = test_app();
    let mut body = jane_doe();
    // Leftover answer from another service plus an unknown key.
    body["rrsp_has_existing"] = json!("No");
    body["favourite_colour"] = json!("blue");

    let (status, resp) = app.send(json_request("POST", "/quotes", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp, json!({ "success": true, "redirect_to": "/quote-submitted" }));

    let stored = app.quotes.items.lock().unwrap().clone();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].full_name, "Jane Doe");
    assert_eq!(stored[0].details.get("term_length").map(String::as_str), Some("20 years"));
    assert!(!stored[0].details.contains_key("rrsp_has_existing"));
    assert!(!stored[0].details.contains_key("favourite_colour"));
}

#[tokio::test]
async fn test_submit_invalid_email() {
    let app = test_app();
    let mut body = jane_doe();
    body["email"] = json!("not-an-email");

    let (status, resp) = app.send(json_request("POST", "/quotes", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["success"], false);
    assert_eq!(resp["message"], "Please check the form fields.");
    assert_eq!(issue_paths(&resp), vec![json!(["email"])]);
    assert!(app.quotes.items.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_smoker_without_details() {
    let app = test_app();
    let mut body = jane_doe();
    body["smoker"] = json!("Yes");
    body["smoker_details"] = json!("   ");

    let (status, resp) = app.send(json_request("POST", "/quotes", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(issue_paths(&resp), vec![json!(["smoker_details"])]);
}

#[tokio::test]
async fn test_submit_storage_failure() {
    let mut builder = TestAppBuilder::default();
    builder.quotes.fail_writes = true;
    let app = builder.build();

    let (status, resp) = app.send(json_request("POST", "/quotes", &jane_doe())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp, json!({ "success": false, "message": "We could not save your request. Please try again." }));
}

#[tokio::test]
async fn test_legacy_mode_skips_unlisted_services() {
    let builder = TestAppBuilder {
        quote_config: QuoteConfig { validation_mode: ValidationMode::Legacy, ..QuoteConfig::default() },
        ..TestAppBuilder::default()
    };
    let app = builder.build();
    let mut body = jane_doe();
    body["service"] = json!("rrsp");

    let (status, _) = app.send(json_request("POST", "/quotes", &body)).await;
    assert_eq!(status, StatusCode::OK);

    // Life insurance is still checked in legacy mode.
    let mut body = jane_doe();
    body["term_length"] = json!("");
    let (status, resp) = app.send(json_request("POST", "/quotes", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(issue_paths(&resp), vec![json!(["term_length"])]);
}

#[tokio::test]
async fn test_wizard_submits_through_service() {
    let app = test_app();
    let mut wizard = QuoteWizard::new();

    assert!(wizard.next_step().is_err());
    assert_eq!(wizard.current_step(), WizardStep::Service);

    let Value::Object(answers) = jane_doe() else { unreachable!() };
    for (name, value) in &answers {
        wizard.set_value(name, value.as_str().unwrap());
    }
    assert_eq!(wizard.next_step().unwrap(), WizardStep::ServiceDetails);
    assert_eq!(wizard.next_step().unwrap(), WizardStep::ContactInfo);
    assert_eq!(wizard.next_step().unwrap(), WizardStep::Review);

    let confirmation = wizard.submit(app.services.quote_service.as_ref()).await.unwrap();
    assert_eq!(confirmation.redirect_to, "/quote-submitted");
    assert_eq!(app.quotes.items.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_quote_routes() {
    let app = test_app();
    app.send(json_request("POST", "/quotes", &jane_doe())).await;

    let (status, _) = app.send(get("/admin/quotes")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.admin_token();
    let (status, list) = app.send(authorized(get("/admin/quotes?page=1&limit=10"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
    assert_eq!(list["items"][0]["service_label"], "Life Insurance");

    let id = list["items"][0]["id"].as_str().unwrap().to_string();
    let (status, detail) = app.send(authorized(get(&format!("/admin/quotes/{}", id)), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["groups"][0]["title"], "Personal Information");
    assert_eq!(detail["groups"][0]["answers"][0], json!({ "name": "full_name", "label": "Full Name", "value": "Jane Doe" }));
    assert_eq!(detail["groups"][1]["title"], "Service-Specific Details");

    let (status, _) = app.send(authorized(get("/admin/quotes/not-an-id"), &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.send(authorized(get("/admin/quotes/64b7f0c2a1b2c3d4e5f60718"), &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(authorized(get("/admin/quotes?limit=500"), &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
