use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct CampaignRecord {
    id: u64,
    name: String,
    impressions: i64,
    clicks: i64,
    budget: f64,
    ctr: f64,
    cpc: f64,
}

#[derive(Debug, Deserialize)]
struct CampaignCreated {
    campaign: CampaignRecord,
    persisted: bool,
}

#[derive(Debug, Deserialize)]
struct CampaignDeleted {
    deleted: bool,
    persisted: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct Chart {
    labels: Vec<String>,
    ctr: Vec<f64>,
    cpc: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct Banner {
    text: String,
    severity: String,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));
static NAME_SEQ: AtomicU32 = AtomicU32::new(0);

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_dir() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("campaign_dashboard_http_{}_{}", std::process::id(), nanos));
    path
}

fn unique_name(prefix: &str) -> String {
    format!("{prefix} {}", NAME_SEQ.fetch_add(1, Ordering::SeqCst))
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/campaigns")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(data_dir: &Path) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_campaign_dashboard"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", data_dir)
        .env("MESSAGE_TIMEOUT_MS", "60000")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(&unique_data_dir()).await);
    // Never dropped, so kill it when the test binary exits.
    #[cfg(unix)]
    cleanup::register(server.child.id());
    *guard = Some(Arc::clone(&server));
    server
}

async fn create(client: &Client, base_url: &str, body: serde_json::Value) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/campaigns"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn list(client: &Client, base_url: &str) -> Vec<CampaignRecord> {
    client
        .get(format!("{base_url}/api/campaigns"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_create_campaign_derives_metrics() {
    let server = shared_server().await;
    let client = Client::new();
    let name = unique_name("Search");

    let response = create(
        &client,
        &server.base_url,
        serde_json::json!({
            "campaignName": name,
            "impressions": "1000",
            "clicks": "50",
            "budget": "500",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: CampaignCreated = response.json().await.unwrap();
    assert!(created.persisted);
    assert_eq!(created.campaign.name, name);
    assert_eq!(created.campaign.impressions, 1000);
    assert_eq!(created.campaign.clicks, 50);
    assert_eq!(created.campaign.budget, 500.0);
    assert_eq!(created.campaign.ctr, 5.0);
    assert_eq!(created.campaign.cpc, 10.0);

    let campaigns = list(&client, &server.base_url).await;
    assert!(campaigns.contains(&created.campaign));

    let chart: Chart = client
        .get(format!("{}/api/chart", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let index = chart.labels.iter().position(|label| *label == name).expect("charted");
    assert_eq!(chart.ctr[index], 5.0);
    assert_eq!(chart.cpc[index], 10.0);
}

#[tokio::test]
async fn http_rejects_invalid_campaigns() {
    let server = shared_server().await;
    let client = Client::new();
    let name = unique_name("Display");

    let response = create(
        &client,
        &server.base_url,
        serde_json::json!({ "campaignName": name, "impressions": 200, "clicks": 0, "budget": 50 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(
        body.error,
        "Cannot calculate CPC with zero clicks. Either increase clicks or set budget to zero."
    );

    let response = create(
        &client,
        &server.base_url,
        serde_json::json!({ "campaignName": name, "impressions": "lots", "clicks": 1, "budget": 5 }),
    )
    .await;
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.error, "Impressions must be a positive number");

    let campaigns = list(&client, &server.base_url).await;
    assert!(campaigns.iter().all(|campaign| campaign.name != name));
}

#[tokio::test]
async fn http_rejects_duplicate_names_case_insensitively() {
    let server = shared_server().await;
    let client = Client::new();
    let name = unique_name("Video");

    let first = create(
        &client,
        &server.base_url,
        serde_json::json!({ "campaignName": name, "impressions": 100, "clicks": 10, "budget": 20 }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = create(
        &client,
        &server.base_url,
        serde_json::json!({
            "campaignName": name.to_uppercase(),
            "impressions": 100,
            "clicks": 10,
            "budget": 20,
        }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = second.json().await.unwrap();
    assert_eq!(body.error, "A campaign with this name already exists");
}

#[tokio::test]
async fn http_delete_campaign() {
    let server = shared_server().await;
    let client = Client::new();
    let name = unique_name("Retargeting");

    let created: CampaignCreated = create(
        &client,
        &server.base_url,
        serde_json::json!({ "campaignName": name, "impressions": 500, "clicks": 25, "budget": 75 }),
    )
    .await
    .json()
    .await
    .unwrap();
    let id = created.campaign.id;

    let deleted: CampaignDeleted = client
        .delete(format!("{}/api/campaigns/{id}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(deleted.deleted);
    assert!(deleted.persisted);
    assert!(list(&client, &server.base_url).await.iter().all(|c| c.id != id));

    let again: CampaignDeleted = client
        .delete(format!("{}/api/campaigns/{id}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!again.deleted);
}

#[tokio::test]
async fn http_form_submit_renders_card_and_banner() {
    let data_dir = unique_data_dir();
    let server = spawn_server(&data_dir).await;
    let client = Client::new();

    let html = client
        .post(format!("{}/campaigns", server.base_url))
        .form(&[
            ("campaignName", "Spring <Sale>"),
            ("impressions", "12000"),
            ("clicks", "300"),
            ("budget", "4500"),
        ])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Spring &lt;Sale&gt;"));
    assert!(html.contains("2.5%"));
    assert!(html.contains("&#8377;15"));
    assert!(html.contains("12,000"));
    assert!(html.contains("Campaign &quot;Spring &lt;Sale&gt;&quot; added successfully!"));

    // The banner is consumed by the page that showed it.
    let html = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!html.contains("added successfully"));

    let html = client
        .post(format!("{}/campaigns", server.base_url))
        .form(&[("campaignName", "   "), ("impressions", "1"), ("clicks", "1"), ("budget", "1")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"<div class="message error" role="status">Campaign name is required</div>"#));

    let id = list(&client, &server.base_url).await[0].id;
    let html = client
        .post(format!("{}/campaigns/{id}/delete", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("deleted successfully!"));
    assert!(list(&client, &server.base_url).await.is_empty());

    drop(server);
    let _ = std::fs::remove_dir_all(data_dir);
}

#[tokio::test]
async fn http_campaigns_survive_restart() {
    let data_dir = unique_data_dir();
    let client = Client::new();

    let first = spawn_server(&data_dir).await;
    for (name, clicks) in [("Alpha", 10), ("Beta", 20)] {
        let response = create(
            &client,
            &first.base_url,
            serde_json::json!({ "campaignName": name, "impressions": 100, "clicks": clicks, "budget": 40 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let before = list(&client, &first.base_url).await;
    drop(first);

    let second = spawn_server(&data_dir).await;
    let after = list(&client, &second.base_url).await;
    assert_eq!(after, before);

    drop(second);
    let _ = std::fs::remove_dir_all(data_dir);
}

#[tokio::test]
async fn http_corrupt_storage_starts_empty_with_warning() {
    let data_dir = unique_data_dir();
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(data_dir.join("campaignData.json"), "{definitely not json").unwrap();
    let client = Client::new();

    let server = spawn_server(&data_dir).await;
    assert!(list(&client, &server.base_url).await.is_empty());

    let banner: Option<Banner> = client
        .get(format!("{}/api/message", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let banner = banner.expect("load warning shown");
    assert_eq!(banner.text, "Failed to load saved data");
    assert_eq!(banner.severity, "error");

    drop(server);
    let _ = std::fs::remove_dir_all(data_dir);
}

#[cfg(unix)]
#[tokio::test]
async fn http_sigterm_saves_campaigns_before_exit() {
    let data_dir = unique_data_dir();
    let client = Client::new();

    let mut server = spawn_server(&data_dir).await;
    let response = create(
        &client,
        &server.base_url,
        serde_json::json!({ "campaignName": "Evening", "impressions": 800, "clicks": 40, "budget": 120 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let before = list(&client, &server.base_url).await;

    // Remove the saved blob so only the shutdown save can bring it back.
    let blob_path = data_dir.join("campaignData.json");
    std::fs::remove_file(&blob_path).unwrap();

    unsafe {
        libc::kill(server.child.id() as i32, libc::SIGTERM);
    }
    let status = server.child.wait().unwrap();
    assert!(status.success());

    let saved: Vec<CampaignRecord> =
        serde_json::from_str(&std::fs::read_to_string(&blob_path).unwrap()).unwrap();
    assert_eq!(saved, before);

    drop(server);
    let _ = std::fs::remove_dir_all(data_dir);
}
