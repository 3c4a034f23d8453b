use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::LazyLock;

use serde_json::Value;
use tempfile::TempDir;

pub const ADMIN_EMAIL: &str = "admin@wayfare.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestServer {
    pub temp_dir: TempDir,
    pub base_url: String,
    server_process: Option<Child>,
}

static BUILD_RELEASE: LazyLock<()> = LazyLock::new(|| {
    let build_status = Command::new("cargo")
        .args(["build", "--release"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("build release binary");
    assert!(build_status.success(), "Failed to build release binary");
});

impl TestServer {
    pub async fn start() -> Self {
        LazyLock::force(&BUILD_RELEASE);

        let temp_dir = TempDir::new().expect("create temp dir");
        let data_dir = temp_dir.path();
        let binary = Path::new(env!("CARGO_MANIFEST_DIR")).join("target/release/wayfare");

        let init_output = Command::new(&binary)
            .args(["admin", "init", "--data-dir"])
            .arg(data_dir)
            .args(["--email", ADMIN_EMAIL])
            .args(["--password", ADMIN_PASSWORD])
            .args(["--first-name", "Test"])
            .args(["--last-name", "Admin"])
            .output()
            .expect("run init");
        assert!(
            init_output.status.success(),
            "Failed to initialize database"
        );

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);

        let base_url = format!("http://127.0.0.1:{}", port);

        let server_process = Command::new(&binary)
            .args(["serve", "--data-dir"])
            .arg(data_dir)
            .args(["--host", "127.0.0.1", "--port"])
            .arg(port.to_string())
            .env_remove("WAYFARE_OPENWEATHER_API_KEY")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("start server");

        Self::wait_for_ready(&base_url).await;

        Self {
            temp_dir,
            base_url,
            server_process: Some(server_process),
        }
    }

    async fn wait_for_ready(base_url: &str) {
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{}/health", base_url))
                .send()
                .await
                .is_ok()
            {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
        panic!("Server did not become ready");
    }

    /// Logs in and returns the session cookie value for the account.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let client = reqwest::Client::new();
        let resp = client
            .post(format!("{}/api/v1/auth/login", self.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request");
        assert!(resp.status().is_success(), "login failed: {}", resp.status());

        let set_cookie = resp
            .headers()
            .get("set-cookie")
            .expect("session cookie")
            .to_str()
            .expect("cookie header utf8");

        // "wayfare_session=<id>; Path=/; ..." -> "wayfare_session=<id>"
        set_cookie
            .split(';')
            .next()
            .expect("cookie pair")
            .to_string()
    }

    /// Registers a user through the public endpoint and returns its id.
    pub async fn register(&self, email: &str, password: &str) -> i64 {
        let client = reqwest::Client::new();
        let resp: Value = client
            .post(format!("{}/api/v1/auth/register", self.base_url))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "first_name": "Test",
                "last_name": "User"
            }))
            .send()
            .await
            .expect("register request")
            .json()
            .await
            .expect("parse register response");
        resp["data"]["id"].as_i64().expect("user id")
    }

    pub async fn admin_cookie(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(mut process) = self.server_process.take() {
            let _ = process.kill();
            let _ = process.wait();
        }
    }
}
