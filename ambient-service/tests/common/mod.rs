use ambient_service::config::{AmbientConfig, DatabaseConfig, FcmConfig};
use ambient_service::services::{Database, MockPushProvider};
use ambient_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: Database,
    pub push: Arc<MockPushProvider>,
}

pub fn test_config() -> AmbientConfig {
    let db_path = std::env::temp_dir().join(format!("ambient_test_{}.db", uuid::Uuid::new_v4()));
    AmbientConfig {
        common: CoreConfig { port: 0 },
        database: DatabaseConfig {
            url: format!("sqlite:{}", db_path.display()),
        },
        fcm: FcmConfig {
            project_id: "test-project".to_string(),
            service_account_key: "test-key".to_string(),
            credentials_file: None,
            enabled: false, // Use mock
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        // Random port (port 0), throwaway database file, observable mock push
        let push = Arc::new(MockPushProvider::new(true));
        let app = Application::build_with_provider(test_config(), push.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);
        let db = app.db().clone();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            push,
        }
    }
}
