use reqwest::StatusCode;
use reqwest::header::SET_COOKIE;
use smilegen::Config;
use smilegen::config::StoreBackend;
use smilegen::gateway::run_gateway_with_listener;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub struct GatewayTestServer {
    pub port: u16,
    pub config: Config,
    _workspace: TempDir,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl GatewayTestServer {
    pub async fn start(configure: impl FnOnce(&mut Config)) -> Self {
        let workspace = TempDir::new().expect("temp workspace should be created");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral listener should expose local address")
            .port();

        let mut config = Config {
            workspace_dir: workspace.path().to_path_buf(),
            config_path: workspace.path().join("config.toml"),
            ..Config::default()
        };
        config.store.backend = StoreBackend::Sqlite;
        config.selection.seed = Some(7);
        config.image.width = 120;
        config.image.height = 70;
        configure(&mut config);

        let host = "127.0.0.1".to_string();
        let served = Arc::new(config.clone());
        let handle =
            tokio::spawn(async move { run_gateway_with_listener(&host, listener, served).await });

        wait_until_gateway_ready(port).await;

        Self {
            port,
            config,
            _workspace: workspace,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..200 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("server did not become ready on port {port}");
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("reqwest client should be built")
}

/// `name=value` pair of the session cookie a response set.
pub fn session_cookie(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("response should set the session cookie")
        .to_string()
}

/// `src` of the generated image on a result page.
pub fn image_src(html: &str) -> String {
    let start = html.find("src=\"/generated/").expect("page should show an image") + 5;
    let end = html[start..].find('"').expect("src should be quoted") + start;
    html[start..end].to_string()
}

pub async fn rated_pairs(server: &GatewayTestServer) -> i64 {
    let body: serde_json::Value = client()
        .get(server.url("/api/aggregates"))
        .send()
        .await
        .expect("aggregates request should complete")
        .json()
        .await
        .expect("aggregates should be json");
    body["categories"]
        .as_array()
        .expect("categories should be an array")
        .iter()
        .flat_map(|c| c["tags"].as_array().cloned().unwrap_or_default())
        .map(|t| t["rating_count"].as_i64().unwrap_or(0))
        .sum()
}
