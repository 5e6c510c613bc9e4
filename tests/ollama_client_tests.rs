//! HTTP-level tests for the Ollama client against a mock server.

use std::sync::Arc;

use mockito::{Matcher, Server};
use serde_json::json;

use docchat::{
    AllowList, AskDocumentUseCase, AskImageUseCase, EncodedImage, ListModelsUseCase,
    ModelIdentifier, ModelRegistry, OllamaClient,
};

fn model(name: &str) -> ModelIdentifier {
    ModelIdentifier::new(name).unwrap()
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 200, 10]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// An address nothing listens on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn document_request_returns_response_field() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_header("accept", "application/json")
        .match_body(Matcher::Json(json!({
            "model": "llama3.1:latest",
            "prompt": "How many rows?",
            "text": "a,b\n1,2\n"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"model": "llama3.1:latest", "response": "One row.", "done": true}).to_string())
        .create_async()
        .await;

    let client = Arc::new(OllamaClient::new(server.url()));
    let answer = AskDocumentUseCase::new(client)
        .execute("a,b\n1,2\n", &model("llama3.1:latest"), "How many rows?")
        .await
        .expect("document request should succeed");

    assert_eq!(answer, "One row.");
    mock.assert_async().await;
}

#[tokio::test]
async fn document_request_with_garbage_body_is_malformed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body("this is not json")
        .create_async()
        .await;

    let client = Arc::new(OllamaClient::new(server.url()));
    let err = AskDocumentUseCase::new(client)
        .execute("text", &model("llama3.1:latest"), "q")
        .await
        .unwrap_err();

    assert!(err.is_malformed(), "unexpected error: {err}");
}

#[tokio::test]
async fn error_status_is_unreachable() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(404)
        .with_body(json!({"error": "model 'nope' not found"}).to_string())
        .create_async()
        .await;

    let client = Arc::new(OllamaClient::new(server.url()));
    let err = AskDocumentUseCase::new(client)
        .execute("text", &model("nope:latest"), "q")
        .await
        .unwrap_err();

    assert!(err.is_unreachable());
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn connection_refused_is_unreachable() {
    let client = Arc::new(OllamaClient::new(closed_port_url()));
    let err = AskDocumentUseCase::new(client)
        .execute("text", &model("llama3.1:latest"), "q")
        .await
        .unwrap_err();

    assert!(err.is_unreachable());
}

#[tokio::test]
async fn image_request_reassembles_fragments() {
    let mut server = Server::new_async().await;
    let encoded = EncodedImage::from_raw(&png_bytes()).unwrap();
    let body = [
        json!({"response": "A", "done": false}).to_string(),
        "not-json".to_string(),
        json!({"response": "B", "done": false}).to_string(),
        json!({"done": true}).to_string(),
    ]
    .join("\n");

    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::Json(json!({
            "model": "llava:latest",
            "prompt": "Describe it",
            "images": [encoded.as_base64()]
        })))
        .with_status(200)
        .with_header("content-type", "application/x-ndjson")
        .with_body(body)
        .create_async()
        .await;

    let client = Arc::new(OllamaClient::new(server.url()));
    let answer = AskImageUseCase::new(client)
        .execute(&png_bytes(), &model("llava:latest"), "Describe it")
        .await
        .expect("image request should succeed");

    assert_eq!(answer, "AB");
    mock.assert_async().await;
}

#[tokio::test]
async fn image_request_with_empty_body_is_empty_answer() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let client = Arc::new(OllamaClient::new(server.url()));
    let answer = AskImageUseCase::new(client)
        .execute(&png_bytes(), &model("llava:latest"), "q")
        .await
        .unwrap();

    assert_eq!(answer, "");
}

#[tokio::test]
async fn list_models_filters_through_allow_list() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "models": [
                    {"name": "llava:latest", "size": 1},
                    {"name": "other:version"},
                    {"name": "llama3.1:latest"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = Arc::new(OllamaClient::new(server.url()));
    let vision = ListModelsUseCase::new(client)
        .execute(&AllowList::vision_default())
        .await
        .unwrap();

    assert_eq!(vision.allowed.into_iter().collect::<Vec<_>>(), vec![model("llava:latest")]);
    assert_eq!(vision.missing.into_iter().collect::<Vec<_>>(), vec![model("bakllava:latest")]);
}

#[tokio::test]
async fn pull_sends_non_streaming_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/pull")
        .match_body(Matcher::Json(json!({"model": "llava:latest", "stream": false})))
        .with_status(200)
        .with_body(json!({"status": "success"}).to_string())
        .create_async()
        .await;

    let client = OllamaClient::new(server.url());
    client.pull_model(&model("llava:latest")).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn pull_error_is_provisioning_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/pull")
        .with_status(500)
        .with_body(json!({"error": "pull model manifest: file does not exist"}).to_string())
        .create_async()
        .await;

    let client = OllamaClient::new(server.url());
    let err = client.pull_model(&model("nosuch:latest")).await.unwrap_err();

    assert!(err.is_provisioning_failure());
    assert!(err.to_string().contains("file does not exist"));
}

#[tokio::test]
async fn pull_against_closed_port_is_provisioning_failure() {
    let client = OllamaClient::new(closed_port_url());
    let err = client.pull_model(&model("llava:latest")).await.unwrap_err();
    assert!(err.is_provisioning_failure());
}
