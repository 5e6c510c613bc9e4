//! End-to-end chat flows: upload, ask, pull and restart, driven through the
//! chat controller against a mock Ollama server.

use std::path::PathBuf;

use mockito::{Matcher, Server};
use serde_json::json;
use tempfile::TempDir;

use docchat::connector::api::controller::{ChatController, ChatEvent, ChatOutcome};
use docchat::{AllowList, Container, ContainerConfig, ModelIdentifier, Role};

fn model(name: &str) -> ModelIdentifier {
    ModelIdentifier::new(name).unwrap()
}

fn container(host: String) -> Container {
    Container::new(ContainerConfig {
        host,
        ..ContainerConfig::default()
    })
}

fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn text_chat_records_both_sides_of_a_turn() {
    let mut server = Server::new_async().await;
    let _tags = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_body(json!({"models": [{"name": "codegemma:latest"}]}).to_string())
        .create_async()
        .await;
    let generate = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({
            "model": "codegemma:latest",
            "prompt": "Who wrote it?",
            "text": "Written by Ada."
        })))
        .with_status(200)
        .with_body(json!({"response": "Ada did."}).to_string())
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "notes.txt", b"Written by Ada.");
    let container = container(server.url());
    let controller = ChatController::new(&container);

    let (mut state, started) = controller.start(&path, None).await.unwrap();
    assert!(matches!(started, ChatOutcome::SessionStarted { model: Some(_), .. }));
    assert_eq!(state.model(), Some(&model("codegemma:latest")));

    let outcome = controller
        .dispatch(&mut state, ChatEvent::Ask("Who wrote it?".to_string()))
        .await;
    assert_eq!(
        outcome,
        ChatOutcome::Answer {
            model: model("codegemma:latest"),
            text: "Ada did.".to_string()
        }
    );

    let roles: Vec<Role> = state.session().messages().iter().map(|m| m.role()).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
    generate.assert_async().await;
}

#[tokio::test]
async fn unreachable_server_keeps_question_without_answer() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "notes.txt", b"hello");
    let container = container(closed_port_url());
    let controller = ChatController::new(&container);

    let (mut state, _) = controller
        .start(&path, Some(model("llama3.1:latest")))
        .await
        .unwrap();

    let outcome = controller
        .dispatch(&mut state, ChatEvent::Ask("anyone there?".to_string()))
        .await;
    assert!(matches!(outcome, ChatOutcome::Error(_)));

    let messages = state.session().messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role(), Role::User);
    assert_eq!(messages[0].content(), "anyone there?");

    // The loop carries on; the user can retry straight away.
    let retry = controller
        .dispatch(&mut state, ChatEvent::Ask("still there?".to_string()))
        .await;
    assert!(matches!(retry, ChatOutcome::Error(_)));
    assert_eq!(state.session().len(), 2);
}

#[tokio::test]
async fn unsupported_upload_makes_no_network_call() {
    let mut server = Server::new_async().await;
    let any_get = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let any_post = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "slides.pptx", b"PK\x03\x04");
    let container = container(server.url());
    let controller = ChatController::new(&container);

    let err = controller.start(&path, None).await.unwrap_err();
    assert!(err.is_unsupported());
    any_get.assert_async().await;
    any_post.assert_async().await;
}

#[tokio::test]
async fn rejected_upload_leaves_session_untouched() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "notes.txt", b"hello");
    let bad = write_file(&dir, "movie.mp4", b"\x00\x00");
    let container = container(closed_port_url());
    let controller = ChatController::new(&container);

    let (mut state, _) = controller
        .start(&path, Some(model("llama3.1:latest")))
        .await
        .unwrap();
    let before = state.session().id().to_string();

    let outcome = controller.dispatch(&mut state, ChatEvent::Upload(bad)).await;
    assert!(matches!(outcome, ChatOutcome::Error(_)));
    assert_eq!(state.session().id(), before);
}

#[tokio::test]
async fn upload_starts_a_new_session() {
    let dir = TempDir::new().unwrap();
    let first = write_file(&dir, "a.txt", b"first");
    let second = write_file(&dir, "b.csv", b"x,y\n1,2\n");
    let container = container(closed_port_url());
    let controller = ChatController::new(&container);

    let (mut state, _) = controller
        .start(&first, Some(model("llama3.1:latest")))
        .await
        .unwrap();
    controller
        .dispatch(&mut state, ChatEvent::Ask("q".to_string()))
        .await;
    let old_id = state.session().id().to_string();

    let outcome = controller.dispatch(&mut state, ChatEvent::Upload(second)).await;
    assert!(matches!(outcome, ChatOutcome::SessionStarted { .. }));
    assert_ne!(state.session().id(), old_id);
    assert!(state.session().is_empty());
    // Still a text artifact, so the chosen model carries over.
    assert_eq!(state.model(), Some(&model("llama3.1:latest")));
}

#[tokio::test]
async fn image_chat_without_vision_models_offers_downloads_then_restarts() {
    let mut server = Server::new_async().await;
    let tags_before = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_body(json!({"models": [{"name": "llama3.1:latest"}]}).to_string())
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0]));
    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    let path = write_file(&dir, "cat.png", &png);

    let container = container(server.url());
    let controller = ChatController::new(&container);

    let (mut state, started) = controller.start(&path, None).await.unwrap();
    match &started {
        ChatOutcome::SessionStarted { model: chosen, missing, .. } => {
            assert!(chosen.is_none());
            assert_eq!(missing, &vec![model("bakllava:latest"), model("llava:latest")]);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(started.render().contains("No allowed models are available."));
    tags_before.assert_async().await;
    tags_before.remove_async().await;

    let ask = controller
        .dispatch(&mut state, ChatEvent::Ask("what is it?".to_string()))
        .await;
    assert!(matches!(ask, ChatOutcome::Error(_)));

    let _pull = server
        .mock("POST", "/api/pull")
        .with_status(200)
        .with_body(json!({"status": "success"}).to_string())
        .create_async()
        .await;
    let _tags_after = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_body(
            json!({"models": [{"name": "llama3.1:latest"}, {"name": "llava:latest"}]}).to_string(),
        )
        .create_async()
        .await;

    let old_id = state.session().id().to_string();
    let outcome = controller
        .dispatch(&mut state, ChatEvent::Pull(model("llava:latest")))
        .await;

    assert_eq!(
        outcome,
        ChatOutcome::SessionRestarted {
            pulled: model("llava:latest"),
            model: Some(model("llava:latest")),
        }
    );
    assert_ne!(state.session().id(), old_id);
    assert!(state.session().is_empty());
}

#[tokio::test]
async fn failed_pull_keeps_the_conversation() {
    let mut server = Server::new_async().await;
    let _pull = server
        .mock("POST", "/api/pull")
        .with_status(500)
        .with_body(json!({"error": "no space left on device"}).to_string())
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "notes.txt", b"hello");
    let container = container(server.url());
    let controller = ChatController::new(&container);

    let (mut state, _) = controller
        .start(&path, Some(model("llama3.1:latest")))
        .await
        .unwrap();
    let _ = controller
        .dispatch(&mut state, ChatEvent::Ask("q".to_string()))
        .await;
    let id = state.session().id().to_string();

    let outcome = controller
        .dispatch(&mut state, ChatEvent::Pull(model("codegemma:latest")))
        .await;
    match outcome {
        ChatOutcome::Error(msg) => assert!(msg.contains("no space left on device")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(state.session().id(), id);
    assert_eq!(state.session().len(), 1);
}

#[tokio::test]
async fn models_outside_the_allow_list_are_refused() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "notes.txt", b"hello");
    let container = Container::new(ContainerConfig {
        host: closed_port_url(),
        text_models: AllowList::new(["mistral:7b"]),
        vision_models: AllowList::vision_default(),
    });
    let controller = ChatController::new(&container);

    let err = controller
        .start(&path, Some(model("llama3.1:latest")))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not an allowed text model"));

    let (mut state, _) = controller.start(&path, Some(model("mistral:7b"))).await.unwrap();
    let outcome = controller
        .dispatch(&mut state, ChatEvent::UseModel(model("llava:latest")))
        .await;
    assert!(matches!(outcome, ChatOutcome::Error(_)));
    assert_eq!(state.model(), Some(&model("mistral:7b")));
}

#[tokio::test]
async fn pull_of_unlisted_model_is_refused_without_a_request() {
    let mut server = Server::new_async().await;
    let pull = server
        .mock("POST", "/api/pull")
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "notes.txt", b"hello");
    let container = container(server.url());
    let controller = ChatController::new(&container);

    let (mut state, _) = controller
        .start(&path, Some(model("llama3.1:latest")))
        .await
        .unwrap();
    let id = state.session().id().to_string();

    let outcome = controller
        .dispatch(&mut state, ChatEvent::Pull(model("mistral:7b")))
        .await;
    assert_eq!(
        outcome,
        ChatOutcome::Error("mistral:7b is not an allowed model.".to_string())
    );
    assert_eq!(state.session().id(), id);
    pull.assert_async().await;
}
