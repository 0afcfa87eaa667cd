//! HTTP tests that drive the router in-process with `oneshot`

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use db::DBService;
use deployment::{Config, LocalDeployment};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app() -> Router {
    let db = DBService::new_in_memory().await.unwrap();
    server::app(LocalDeployment::from_parts(db, Config::default()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let (status, json) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"].clone()
}

#[tokio::test]
async fn ingredient_lifecycle() {
    let app = test_app().await;

    let flour = create(
        &app,
        "/api/v1/ingredient/add",
        json!({ "ingredientName": "Flour" }),
    )
    .await;
    let id = flour["id"].as_i64().unwrap();
    assert!(id >= 1);
    assert_eq!(flour["ingredientName"], "Flour");

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/ingredient/update/{id}"),
        Some(json!({ "ingredientName": "Wheat Flour" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["ingredientName"], "Wheat Flour");

    let (status, json) =
        send(&app, Method::GET, &format!("/api/v1/ingredient/find-by-id/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["ingredientName"], "Wheat Flour");

    let (status, _) =
        send(&app, Method::DELETE, &format!("/api/v1/ingredient/delete/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) =
        send(&app, Method::GET, &format!("/api/v1/ingredient/find-by-id/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("not found"));

    let (status, _) =
        send(&app, Method::DELETE, &format!("/api/v1/ingredient/delete/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_input_maps_to_client_errors() {
    let app = test_app().await;

    let (status, json) = send(&app, Method::GET, "/api/v1/recipe/find-by-id/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/ingredient/add",
        Some(json!({ "ingredientName": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    create(&app, "/api/v1/ingredient/add", json!({ "ingredientName": "Salt" })).await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/ingredient/add",
        Some(json!({ "ingredientName": "salt" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn ingredient_name_searches() {
    let app = test_app().await;
    create(&app, "/api/v1/ingredient/add", json!({ "ingredientName": "Brown Sugar" })).await;
    create(&app, "/api/v1/ingredient/add", json!({ "ingredientName": "Sugar" })).await;

    let (status, json) = send(
        &app,
        Method::GET,
        "/api/v1/ingredient/find-by-name?ingredientName=sugar",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let (status, json) = send(
        &app,
        Method::GET,
        "/api/v1/ingredient/find-by-exact-name?ingredientName=Sugar",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["ingredientName"], "Sugar");

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/ingredient/find-by-exact-name?ingredientName=Honey",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recipe_with_instruction_and_categories() {
    let app = test_app().await;

    let dinner = create(
        &app,
        "/api/v1/recipe-category/add",
        json!({ "category": "Dinner" }),
    )
    .await;
    let dinner_id = dinner["id"].as_i64().unwrap();

    let soup = create(
        &app,
        "/api/v1/recipe/add",
        json!({
            "recipeName": "Tomato Soup",
            "instructionTitle": "Simmer",
            "instructionDetail": "Simmer the tomatoes for 20 minutes",
            "categoryIds": [dinner_id],
        }),
    )
    .await;
    let soup_id = soup["id"].as_i64().unwrap();
    assert_eq!(soup["instruction"]["title"], "Simmer");
    assert_eq!(soup["categories"][0]["category"], "Dinner");

    let (status, json) = send(
        &app,
        Method::GET,
        "/api/v1/recipe/find-by-name?recipeName=soup",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["id"], soup_id);

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/recipe-category/remove-recipe/{dinner_id}"),
        Some(json!({ "recipeId": soup_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], true);

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/recipe-category/add-recipe/{dinner_id}"),
        Some(json!({ "recipeId": soup_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["recipes"][0]["recipeName"], "Tomato Soup");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/recipe-category/delete/{dinner_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, json) = send(
        &app,
        Method::GET,
        &format!("/api/v1/recipe/find-by-id/{soup_id}"),
        None,
    )
    .await;
    assert_eq!(json["data"]["categories"], json!([]));

    let (status, json) = send(
        &app,
        Method::PUT,
        "/api/v1/recipe-category/add-recipe/999",
        Some(json!({ "recipeId": soup_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn recipe_ingredient_associations() {
    let app = test_app().await;

    let butter = create(&app, "/api/v1/ingredient/add", json!({ "ingredientName": "Butter" })).await;
    let butter_id = butter["id"].as_i64().unwrap();

    let row = create(
        &app,
        "/api/v1/recipe-ingredient/add",
        json!({ "amount": 50.0, "measurement": "g", "ingredientId": butter_id }),
    )
    .await;
    let row_id = row["id"].as_i64().unwrap();
    assert_eq!(row["measurement"], "g");
    assert_eq!(row["ingredient"]["ingredientName"], "Butter");
    assert_eq!(row["recipeId"], Value::Null);

    let (_, json) = send(&app, Method::GET, "/api/v1/recipe-ingredient/list-unassigned", None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let recipe = create(
        &app,
        "/api/v1/recipe/add",
        json!({
            "recipeName": "Shortbread",
            "instructionTitle": "Bake",
            "instructionDetail": "Bake at 160C until pale gold",
        }),
    )
    .await;
    let recipe_id = recipe["id"].as_i64().unwrap();

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/recipe-ingredient/add-recipe/{row_id}"),
        Some(json!({ "recipeId": recipe_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["recipeId"], recipe_id);

    let (_, json) = send(&app, Method::GET, "/api/v1/recipe-ingredient/list-unassigned", None).await;
    assert_eq!(json["data"], json!([]));

    let (_, json) = send(
        &app,
        Method::GET,
        &format!("/api/v1/recipe-ingredient/find-by-ingredient/{butter_id}"),
        None,
    )
    .await;
    assert_eq!(json["data"][0]["id"], row_id);

    // Deleting the ingredient keeps the row but clears its ingredient
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/ingredient/delete/{butter_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) = send(
        &app,
        Method::GET,
        &format!("/api/v1/recipe-ingredient/find-by-id/{row_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["ingredient"], Value::Null);

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/recipe-ingredient/remove-recipe/{row_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], true);
}

#[tokio::test]
async fn recipe_instruction_crud() {
    let app = test_app().await;

    let instruction = create(
        &app,
        "/api/v1/recipe-instruction/add",
        json!({ "title": "Knead", "instruction": "Knead for ten minutes" }),
    )
    .await;
    let id = instruction["id"].as_i64().unwrap();

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/recipe-instruction/update/{id}"),
        Some(json!({ "title": "Knead", "instruction": "Knead for fifteen minutes" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["instruction"], "Knead for fifteen minutes");

    let (_, json) = send(&app, Method::GET, "/api/v1/recipe-instruction/list", None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/recipe-instruction/delete/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn malformed_requests_use_the_error_envelope() {
    let app = test_app().await;

    for body in [Value::Null, json!({}), json!({ "ingredientName": 7 })] {
        let (status, json) = send(&app, Method::POST, "/api/v1/ingredient/add", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{json}");
        assert_eq!(json["success"], false);
        assert!(json["message"].is_string());
    }

    let (status, json) = send(
        &app,
        Method::PUT,
        "/api/v1/recipe-category/add-recipe/1",
        Some(Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let (status, json) = send(&app, Method::GET, "/api/v1/recipe/find-by-id/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let (status, json) = send(&app, Method::GET, "/api/v1/recipe/find-by-name", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    // Nothing was written by the rejected requests
    let (_, json) = send(&app, Method::GET, "/api/v1/ingredient/list", None).await;
    assert_eq!(json["data"], json!([]));
}
