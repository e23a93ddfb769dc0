use crate::gateway_harness::{GatewayTestServer, client, image_src, session_cookie};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Rgb, RgbImage};
use reqwest::StatusCode;
use reqwest::header::COOKIE;
use smilegen::config::ImageBackend;
use std::io::Cursor;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png_b64() -> String {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(256, 256, Rgb([30, 160, 90]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("fixture should encode");
    STANDARD.encode(bytes)
}

async fn start_with_remote(api: &MockServer) -> GatewayTestServer {
    let api_url = format!("{}/v1/images/generations", api.uri());
    GatewayTestServer::start(move |config| {
        config.image.backend = ImageBackend::Remote;
        config.image.api_url = api_url;
        config.image.api_key = Some("sk-test".into());
        config.image.timeout_secs = 5;
    })
    .await
}

fn prompts_sent(requests: &[wiremock::Request]) -> Vec<String> {
    requests
        .iter()
        .map(|r| {
            let body: serde_json::Value =
                serde_json::from_slice(&r.body).expect("request body should be json");
            body["prompt"].as_str().unwrap_or_default().to_string()
        })
        .collect()
}

#[tokio::test]
async fn remote_image_is_fitted_to_the_canvas() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "b64_json": png_b64() }]
        })))
        .expect(1)
        .mount(&api)
        .await;
    let server = start_with_remote(&api).await;
    let client = client();

    let generated = client
        .post(server.url("/generate"))
        .form(&[("retry", "false")])
        .send()
        .await
        .expect("generate request should complete");
    assert_eq!(generated.status(), StatusCode::OK);
    let src = image_src(&generated.text().await.expect("page should have a body"));

    let bytes = client
        .get(server.url(&src))
        .send()
        .await
        .expect("image request should complete")
        .bytes()
        .await
        .expect("image should have a body");
    let decoded = image::load_from_memory(&bytes).expect("served file should decode");
    assert_eq!((decoded.width(), decoded.height()), (120, 70));

    let prompts = prompts_sent(&api.received_requests().await.unwrap_or_default());
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("Create a highly detailed"));
}

#[tokio::test]
async fn failed_generation_can_be_retried_with_the_same_scene() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .up_to_n_times(1)
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "b64_json": png_b64() }]
        })))
        .mount(&api)
        .await;
    let server = start_with_remote(&api).await;
    let client = client();

    let failed = client
        .post(server.url("/generate"))
        .form(&[("retry", "false")])
        .send()
        .await
        .expect("generate request should complete");
    assert_eq!(failed.status(), StatusCode::BAD_GATEWAY);
    let cookie = session_cookie(&failed);
    let page = failed.text().await.expect("error page should have a body");
    assert!(page.contains("API error (500)"));
    assert!(page.contains(r#"name="retry" value="true""#));

    let retried = client
        .post(server.url("/generate"))
        .header(COOKIE, &cookie)
        .form(&[("retry", "true")])
        .send()
        .await
        .expect("retry request should complete");
    assert_eq!(retried.status(), StatusCode::OK);

    let prompts = prompts_sent(&api.received_requests().await.unwrap_or_default());
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1]);
}
