use crate::gateway_harness::{GatewayTestServer, client, image_src, rated_pairs, session_cookie};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, COOKIE, LOCATION};

#[tokio::test]
async fn health_reports_ok() {
    let server = GatewayTestServer::start(|_| {}).await;
    let body: serde_json::Value = client()
        .get(server.url("/health"))
        .send()
        .await
        .expect("health request should complete")
        .json()
        .await
        .expect("health should be json");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn generate_rate_and_promote() {
    let server = GatewayTestServer::start(|_| {}).await;
    let client = client();

    let landing = client
        .get(server.url("/"))
        .send()
        .await
        .expect("landing request should complete");
    assert_eq!(landing.status(), StatusCode::OK);
    let cookie = session_cookie(&landing);
    assert!(
        landing
            .text()
            .await
            .expect("landing should have a body")
            .contains("Make me smile")
    );

    let generated = client
        .post(server.url("/generate"))
        .header(COOKIE, &cookie)
        .form(&[("retry", "false")])
        .send()
        .await
        .expect("generate request should complete");
    assert_eq!(generated.status(), StatusCode::OK);
    let html = generated.text().await.expect("result page should have a body");
    let src = image_src(&html);

    let image = client
        .get(server.url(&src))
        .send()
        .await
        .expect("image request should complete");
    assert_eq!(image.status(), StatusCode::OK);
    assert_eq!(image.headers()[CONTENT_TYPE], "image/png");
    let bytes = image.bytes().await.expect("image should have a body");
    let decoded = image::load_from_memory(&bytes).expect("served file should decode");
    assert_eq!((decoded.width(), decoded.height()), (120, 70));

    let rated = client
        .post(server.url("/rate"))
        .header(COOKIE, &cookie)
        .form(&[("rating", "5")])
        .send()
        .await
        .expect("rate request should complete");
    assert_eq!(rated.status(), StatusCode::SEE_OTHER);
    assert_eq!(rated.headers()[LOCATION], "/");

    // One tag per category by default.
    assert_eq!(rated_pairs(&server).await, 4);
    let curated = std::fs::read_dir(server.config.inspiration_dir())
        .expect("inspiration dir should exist")
        .count();
    assert_eq!(curated, 1);

    let again = client
        .post(server.url("/rate"))
        .header(COOKIE, &cookie)
        .form(&[("rating", "3")])
        .send()
        .await
        .expect("second rate request should complete");
    assert_eq!(again.status(), StatusCode::SEE_OTHER);
    assert_eq!(rated_pairs(&server).await, 4);
}

#[tokio::test]
async fn out_of_range_rating_changes_nothing() {
    let server = GatewayTestServer::start(|_| {}).await;
    let client = client();

    let generated = client
        .post(server.url("/generate"))
        .form(&[("retry", "false")])
        .send()
        .await
        .expect("generate request should complete");
    let cookie = session_cookie(&generated);

    for bad in ["0", "6"] {
        let rated = client
            .post(server.url("/rate"))
            .header(COOKIE, &cookie)
            .form(&[("rating", bad)])
            .send()
            .await
            .expect("rate request should complete");
        assert_eq!(rated.status(), StatusCode::SEE_OTHER);
    }
    assert_eq!(rated_pairs(&server).await, 0);

    let pending = client
        .get(server.url("/"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .expect("index request should complete")
        .text()
        .await
        .expect("index should have a body");
    assert!(pending.contains(r#"name="rating""#));
}

#[tokio::test]
async fn forged_cookie_starts_a_fresh_session() {
    let server = GatewayTestServer::start(|_| {}).await;
    let client = client();

    let generated = client
        .post(server.url("/generate"))
        .form(&[("retry", "false")])
        .send()
        .await
        .expect("generate request should complete");
    let cookie = session_cookie(&generated);
    let (id, _) = cookie.split_once('.').expect("cookie should be signed");
    let forged = format!("{id}.{}", "0".repeat(64));

    let rated = client
        .post(server.url("/rate"))
        .header(COOKIE, forged)
        .form(&[("rating", "5")])
        .send()
        .await
        .expect("rate request should complete");
    assert_eq!(rated.status(), StatusCode::SEE_OTHER);
    assert_eq!(rated_pairs(&server).await, 0);
}
