use crate::controller::{Phase, Studio};
use crate::error::GenerationError;
use crate::generator::AdGenerator;
use crate::local_server::routes;
use crate::mock::{MockCopyWriter, MockImageRenderer};
use crate::preview::CtaLabelMode;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Notify;
use warp::http::StatusCode;

const ACME_FORM: [(&str, &str); 6] = [
    ("name", "Acme"),
    ("description", "Widgets"),
    ("product", "Widget Pro"),
    ("targetAudience", "Engineers"),
    ("callToAction", "Learn More"),
    ("tone", "Professional"),
];

const ACME_BODY: &str = "name=Acme&description=Widgets&product=Widget+Pro&targetAudience=Engineers&callToAction=Learn+More&tone=Professional";

const COPY: &str =
    r#"{"headline": "Widgets that work", "body": "Widget Pro for engineers.", "imagePrompt": "A sleek widget on a desk"}"#;

fn studio(writer: MockCopyWriter, images: usize, mode: CtaLabelMode) -> Studio {
    let generator = AdGenerator::new(writer, MockImageRenderer::with_images(images));
    Studio::new(Arc::new(generator), mode)
}

fn snapshot(studio: &Studio) -> Value {
    serde_json::to_value(studio.snapshot()).unwrap()
}

#[tokio::test]
async fn acme_reaches_preview_through_loading() {
    let _ = env_logger::builder().is_test(true).try_init();
    let gate = Arc::new(Notify::new());
    let studio = studio(
        MockCopyWriter::replying(COPY).gated(gate.clone()),
        1,
        CtaLabelMode::Heuristic,
    );
    let mut events = studio.subscribe();

    let task = studio.submit_form(ACME_FORM).unwrap();
    assert_eq!(studio.phase(), Phase::Loading);
    assert_eq!(events.recv().await.unwrap(), r#"{"state":"loading"}"#);

    gate.notify_one();
    assert_eq!(task.await.unwrap(), Phase::Preview);
    assert_eq!(events.recv().await.unwrap(), r#"{"state":"preview"}"#);

    let state = snapshot(&studio);
    assert_eq!(state["state"], "preview");
    assert_eq!(state["ad"]["adCopy"]["headline"], "Widgets that work");
    assert_eq!(state["ad"]["adCopy"]["body"], "Widget Pro for engineers.");
    assert!(state["ad"]["imageUrl"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
    assert_eq!(state["ctaLabel"], "Learn More");
}

#[tokio::test]
async fn zero_images_route_to_error_and_retry_returns_to_form() {
    let studio = studio(MockCopyWriter::replying(COPY), 0, CtaLabelMode::Heuristic);

    let task = studio.submit_form(ACME_FORM).unwrap();
    assert_eq!(task.await.unwrap(), Phase::Error);

    let state = snapshot(&studio);
    assert_eq!(state["error"]["kind"], "empty_image_result");
    assert!(!state["error"]["message"].as_str().unwrap().is_empty());
    assert!(state.get("ad").is_none());

    studio.reset().unwrap();
    let state = snapshot(&studio);
    assert_eq!(state["state"], "form");
    assert_eq!(state["draft"]["name"], "");
    assert_eq!(state["draft"]["callToAction"], "Learn More");
    assert!(state.get("error").is_none());
}

#[tokio::test]
async fn shop_prompt_overrides_selected_cta() {
    let copy = r#"{"headline": "h", "body": "b", "imagePrompt": "A Shop counter stacked with widgets"}"#;
    let studio = studio(MockCopyWriter::replying(copy), 1, CtaLabelMode::Heuristic);

    let mut form = ACME_FORM;
    form[4] = ("callToAction", "Sign Up");
    studio.submit_form(form).unwrap().await.unwrap();

    assert_eq!(snapshot(&studio)["ctaLabel"], "Shop Now");
    assert!(studio.render().contains(">Shop Now</a>"));
}

#[tokio::test]
async fn selected_mode_shows_the_chosen_cta() {
    let copy = r#"{"headline": "h", "body": "b", "imagePrompt": "A Shop counter"}"#;
    let studio = studio(MockCopyWriter::replying(copy), 1, CtaLabelMode::Selected);

    let mut form = ACME_FORM;
    form[4] = ("callToAction", "Sign Up");
    studio.submit_form(form).unwrap().await.unwrap();

    assert_eq!(snapshot(&studio)["ctaLabel"], "Sign Up");
}

#[tokio::test]
async fn regenerate_shows_an_empty_form() {
    let studio = studio(MockCopyWriter::replying(COPY), 1, CtaLabelMode::Heuristic);
    studio.submit_form(ACME_FORM).unwrap().await.unwrap();

    studio.reset().unwrap();
    let page = studio.render();
    assert!(!page.contains("Acme"));
    assert!(!page.contains("Widgets that work"));
    assert!(page.contains(r#"name="name" value="""#));
}

#[tokio::test]
async fn generate_route_redirects_then_lands_on_preview() {
    let studio = studio(MockCopyWriter::replying(COPY), 1, CtaLabelMode::Heuristic);
    let mut events = studio.subscribe();
    let api = routes(studio.clone());

    let res = warp::test::request()
        .method("POST")
        .path("/generate")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(ACME_BODY)
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/");

    assert_eq!(events.recv().await.unwrap(), r#"{"state":"loading"}"#);
    assert_eq!(events.recv().await.unwrap(), r#"{"state":"preview"}"#);

    let res = warp::test::request().path("/").reply(&api).await;
    assert_eq!(res.status(), StatusCode::OK);
    let page = String::from_utf8_lossy(res.body()).into_owned();
    assert!(page.contains("Widgets that work"));
    assert!(page.contains("Create a New Ad"));

    let res = warp::test::request()
        .method("POST")
        .path("/reset")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(studio.phase(), Phase::Form);
}

#[tokio::test]
async fn generate_route_rejects_blank_fields() {
    let studio = studio(MockCopyWriter::replying(COPY), 1, CtaLabelMode::Heuristic);
    let api = routes(studio.clone());

    let res = warp::test::request()
        .method("POST")
        .path("/generate")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=Acme&description=&product=Widget+Pro&targetAudience=Engineers&callToAction=Learn+More&tone=Professional")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = String::from_utf8_lossy(res.body()).into_owned();
    assert!(page.contains("Please fill in: Business Description"));
    assert!(page.contains(r#"value="Acme""#));
    assert_eq!(studio.phase(), Phase::Form);
}

#[tokio::test]
async fn second_submit_while_loading_conflicts() {
    let gate = Arc::new(Notify::new());
    let studio = studio(
        MockCopyWriter::replying(COPY).gated(gate.clone()),
        1,
        CtaLabelMode::Selected,
    );
    let api = routes(studio.clone());
    let task = studio.submit_form(ACME_FORM).unwrap();

    let res = warp::test::request()
        .method("POST")
        .path("/generate")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(ACME_BODY)
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = warp::test::request()
        .method("POST")
        .path("/reset")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = warp::test::request()
        .method("PATCH")
        .path("/api/form")
        .json(&serde_json::json!({"field": "callToAction", "value": "Sign Up"}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(studio.phase(), Phase::Loading);

    gate.notify_one();
    assert_eq!(task.await.unwrap(), Phase::Preview);
    assert_eq!(snapshot(&studio)["ctaLabel"], "Learn More");
}

#[tokio::test]
async fn field_edits_go_through_the_api() {
    let studio = studio(MockCopyWriter::replying(COPY), 1, CtaLabelMode::Heuristic);
    let api = routes(studio.clone());

    let res = warp::test::request()
        .method("PATCH")
        .path("/api/form")
        .json(&serde_json::json!({"field": "tone", "value": "Humorous"}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = warp::test::request()
        .method("PATCH")
        .path("/api/form")
        .json(&serde_json::json!({"field": "colour", "value": "red"}))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = warp::test::request().path("/api/state").reply(&api).await;
    let state: Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(state["state"], "form");
    assert_eq!(state["draft"]["tone"], "Humorous");
    assert_eq!(state["draft"]["callToAction"], "Learn More");
    assert_eq!(state["draft"]["name"], "");
}

#[tokio::test]
async fn upload_buttons_only_acknowledge() {
    let studio = studio(MockCopyWriter::replying(COPY), 1, CtaLabelMode::Heuristic);
    let api = routes(studio.clone());

    let res = warp::test::request()
        .method("POST")
        .path("/upload/instagram")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.body().as_ref(), b"Uploading to Instagram... (demo)");

    let res = warp::test::request()
        .method("POST")
        .path("/upload/myspace")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(studio.phase(), Phase::Form);
}

#[tokio::test]
async fn health_check() {
    let studio = studio(MockCopyWriter::replying(COPY), 1, CtaLabelMode::Heuristic);
    let res = warp::test::request()
        .path("/health")
        .reply(&routes(studio))
        .await;
    assert_eq!(res.body().as_ref(), b"Server is running");
}

#[tokio::test]
async fn websocket_streams_transitions() {
    let studio = studio(MockCopyWriter::replying(COPY), 1, CtaLabelMode::Heuristic);
    let mut client = warp::test::ws()
        .path("/ws")
        .handshake(routes(studio.clone()))
        .await
        .expect("handshake");

    let current = client.recv().await.expect("current state");
    assert_eq!(current.to_str(), Ok(r#"{"state":"form"}"#));

    let task = studio.submit_form(ACME_FORM).unwrap();

    let first = client.recv().await.expect("loading event");
    assert_eq!(first.to_str(), Ok(r#"{"state":"loading"}"#));
    let second = client.recv().await.expect("preview event");
    assert_eq!(second.to_str(), Ok(r#"{"state":"preview"}"#));
    assert_eq!(task.await.unwrap(), Phase::Preview);
}

#[tokio::test]
async fn page_connecting_after_a_fast_failure_still_leaves_loading() {
    let studio = studio(
        MockCopyWriter::failing(|| GenerationError::CredentialMissing),
        1,
        CtaLabelMode::Heuristic,
    );
    let mut events = studio.subscribe();
    let api = routes(studio.clone());

    let res = warp::test::request()
        .method("POST")
        .path("/generate")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(ACME_BODY)
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(events.recv().await.unwrap(), r#"{"state":"loading"}"#);
    assert_eq!(events.recv().await.unwrap(), r#"{"state":"error"}"#);

    // The socket opens only after the task is done; nothing more will be broadcast.
    let mut client = warp::test::ws()
        .path("/ws")
        .handshake(api)
        .await
        .expect("handshake");
    let current = client.recv().await.expect("current state");
    assert_eq!(current.to_str(), Ok(r#"{"state":"error"}"#));
    assert_eq!(snapshot(&studio)["error"]["kind"], "credential_missing");
}
