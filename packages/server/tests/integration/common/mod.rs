use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use reqwest::Client;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::{Value, json};
use tempfile::TempDir;

use server::config::{
    AppConfig, AuthConfig, BootstrapUser, CorsConfig, DatabaseConfig, ServerConfig,
};
use server::entity::{attendance_record, student, student_subject, subject};
use server::state::AppState;
use server::store::SeaOrmStore;

pub const USERNAME: &str = "teacher";
pub const PASSWORD: &str = "correct-horse";

pub mod routes {
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const SUBJECTS: &str = "/api/v1/subjects";

    pub fn attendance(subject_code: &str, date: &str) -> String {
        format!("/api/v1/attendance/{subject_code}/{date}")
    }

    pub fn analytics(subject_code: &str) -> String {
        format!("/api/v1/analytics/{subject_code}")
    }

    pub fn analytics_for_month(subject_code: &str, month: u32, year: i32) -> String {
        format!("/api/v1/analytics/{subject_code}?month={month}&year={year}")
    }

    pub fn defaulters(subject_code: &str, month: &str, year: &str) -> String {
        format!("/api/v1/defaulters/{subject_code}/{month}/{year}")
    }
}

/// A running test server backed by a throwaway SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("attendance.db").display()
        );

        let bootstrap = BootstrapUser {
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
        };

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig::default(),
            },
            database: DatabaseConfig {
                url: db_url,
                max_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
                token_ttl_hours: 1,
                bootstrap: Some(bootstrap.clone()),
            },
        };

        let db = server::database::init_db(&app_config.database)
            .await
            .expect("Failed to initialize test database");
        server::seed::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");
        server::seed::seed_bootstrap_user(&db, &bootstrap)
            .await
            .expect("Failed to seed bootstrap user");

        let state = AppState {
            store: Arc::new(SeaOrmStore::new(db.clone())),
            db: db.clone(),
            config: app_config,
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Log in as the bootstrap user and return the bearer token.
    pub async fn login(&self) -> String {
        let res = self
            .post_without_token(
                routes::LOGIN,
                &json!({"username": USERNAME, "password": PASSWORD}),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);
        res.body["token"]
            .as_str()
            .expect("token missing from login response")
            .to_string()
    }

    pub async fn create_subject(&self, code: &str, name: &str) {
        subject::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert subject");
    }

    /// Insert a student and return its ID.
    pub async fn create_student(&self, roll_no: &str, name: &str) -> i32 {
        student::ActiveModel {
            gr_no: Set(Some(format!("GR{roll_no}"))),
            roll_no: Set(roll_no.to_string()),
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert student")
        .id
    }

    pub async fn enroll(&self, student_id: i32, subject_code: &str) {
        student_subject::ActiveModel {
            student_id: Set(student_id),
            subject_code: Set(subject_code.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to enroll student");
    }

    /// Create a subject with `count` enrolled students, roll numbers 1..=count.
    pub async fn create_class(&self, subject_code: &str, count: usize) -> Vec<i32> {
        self.create_subject(subject_code, "Test Subject").await;
        let mut ids = Vec::with_capacity(count);
        for i in 1..=count {
            let id = self
                .create_student(&format!("{i:02}"), &format!("Student {i}"))
                .await;
            self.enroll(id, subject_code).await;
            ids.push(id);
        }
        ids
    }

    /// Write an attendance fact directly, bypassing the API.
    pub async fn record(&self, student_id: i32, subject_code: &str, date: &str, present: bool) {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("bad test date");
        attendance_record::ActiveModel {
            student_id: Set(student_id),
            subject_code: Set(subject_code.to_string()),
            date: Set(date),
            present: Set(present),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert attendance record");
    }
}
