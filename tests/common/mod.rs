//! Shared fixtures: a local fake provider server, an on-disk config and a
//! chat sender that records instead of sending.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::extract::{Form, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tempfile::TempDir;

use kookie::api::{ApiRequester, Endpoints};
use kookie::chatbot::{ChatSender, Features, Mention, OutgoingMessage, SendError};
use kookie::config::ConfigStore;
use kookie::permission::Permission;
use kookie::usage::DailyUsage;

pub const GROUP: i64 = -1001;

/// A request the fake provider received.
#[derive(Debug, Clone)]
pub struct Hit {
    pub route: &'static str,
    /// Query string or form fields.
    pub params: HashMap<String, String>,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct Replies {
    pub token: Value,
    pub chat: Value,
    pub geo: Value,
    pub around: Value,
    pub joke: Value,
}

impl Default for Replies {
    fn default() -> Self {
        Self {
            token: json!({"access_token": "tok-123", "expires_in": 2592000}),
            chat: json!({"id": "as-1", "result": "祝你今天元气满满！"}),
            geo: json!({
                "status": "1", "info": "OK",
                "geocodes": [{"formatted_address": "北京市朝阳区阜通东大街6号", "location": "116.482086,39.990496"}]
            }),
            around: json!({
                "status": "1", "info": "OK",
                "pois": [
                    {"name": "Kookie Coffee", "address": "阜通东大街1号", "distance": "35", "type": "餐饮服务"},
                    {"name": "Bean Bar", "address": [], "distance": "120", "type": "餐饮服务"}
                ]
            }),
            joke: json!({
                "error": false, "category": "Programming", "type": "single",
                "joke": "There are 10 types of people.", "lang": "en"
            }),
        }
    }
}

#[derive(Clone)]
struct Fake {
    replies: Arc<Replies>,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl Fake {
    fn record(&self, route: &'static str, params: HashMap<String, String>, body: Value) {
        self.hits.lock().unwrap().push(Hit { route, params, body });
    }
}

async fn token(State(fake): State<Fake>, Form(form): Form<HashMap<String, String>>) -> Json<Value> {
    fake.record("token", form, Value::Null);
    Json(fake.replies.token.clone())
}

async fn chat(
    State(fake): State<Fake>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    fake.record("chat", query, body);
    Json(fake.replies.chat.clone())
}

async fn geo(State(fake): State<Fake>, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    fake.record("geo", query, Value::Null);
    Json(fake.replies.geo.clone())
}

async fn around(State(fake): State<Fake>, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    fake.record("around", query, Value::Null);
    Json(fake.replies.around.clone())
}

async fn joke(State(fake): State<Fake>, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    fake.record("joke", query, Value::Null);
    Json(fake.replies.joke.clone())
}

pub struct FakeProvider {
    pub base: String,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl FakeProvider {
    pub async fn spawn(replies: Replies) -> Self {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let fake = Fake { replies: Arc::new(replies), hits: hits.clone() };
        let router = Router::new()
            .route("/oauth/2.0/token", post(token))
            .route("/chat", post(chat))
            .route("/geo", get(geo))
            .route("/around", get(around))
            .route("/joke", get(joke))
            .with_state(fake);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { base: format!("http://{addr}"), hits }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            geocode: format!("{}/geo", self.base),
            around_search: format!("{}/around", self.base),
            ai_token: format!("{}/oauth/2.0/token", self.base),
            ai_chat: format!("{}/chat", self.base),
            joke: format!("{}/joke?type=single", self.base),
        }
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_on(&self, route: &str) -> Vec<Hit> {
        self.hits().into_iter().filter(|h| h.route == route).collect()
    }
}

/// Endpoints nothing listens on.
pub fn unreachable_endpoints() -> Endpoints {
    let dead = "http://127.0.0.1:1";
    Endpoints {
        geocode: format!("{dead}/geo"),
        around_search: format!("{dead}/around"),
        ai_token: format!("{dead}/oauth/2.0/token"),
        ai_chat: format!("{dead}/chat"),
        joke: format!("{dead}/joke"),
    }
}

pub const CONFIG: &str = r#"{
    "botInfo": {
        "gaodeApiConfig": { "apiKey": "gaode-key" },
        "baiduApiConfig": { "apiKey": "baidu-id", "secretKey": "baidu-secret" }
    },
    "telegramBotToken": "123456789:ABCdef"
}"#;

pub const BOT_INFO: &str = "你是谁呀？\n我是Kookie，一只可爱的小饼干！\n";

/// Config file and resources in a temp dir.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(CONFIG)
    }

    pub fn with_config(config: &str) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("kookie.json"), config).unwrap();
        std::fs::create_dir(dir.path().join("resources")).unwrap();
        std::fs::write(dir.path().join("resources/bot_info.txt"), BOT_INFO).unwrap();
        std::fs::write(dir.path().join("resources/answer_book.txt"), "去做吧\n再等等\n").unwrap();
        Self { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("kookie.json")
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(self.config_path())
    }

    pub fn requester(&self, endpoints: Endpoints) -> ApiRequester {
        ApiRequester::with_endpoints(self.store(), endpoints).unwrap()
    }

    pub fn features(&self, endpoints: Endpoints, permission: Permission) -> (Features<RecordingSender>, Arc<RecordingSender>) {
        let sender = Arc::new(RecordingSender::default());
        let features = Features {
            requester: Arc::new(self.requester(endpoints)),
            sender: sender.clone(),
            permission: Arc::new(permission),
            usage: Arc::new(DailyUsage::in_memory(chrono_tz::Asia::Shanghai).unwrap()),
            bot_info_path: self.dir.path().join("resources/bot_info.txt"),
            answer_book_path: self.dir.path().join("resources/answer_book.txt"),
        };
        (features, sender)
    }
}

#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(i64, OutgoingMessage)>>,
}

impl RecordingSender {
    pub fn sent(&self) -> Vec<(i64, OutgoingMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

impl ChatSender for RecordingSender {
    async fn send_group_message(&self, group_id: i64, message: &OutgoingMessage) -> Result<(), SendError> {
        self.sent.lock().unwrap().push((group_id, message.clone()));
        Ok(())
    }
}

pub fn alice() -> Mention {
    Mention { user_id: 42, display_name: "alice".to_string() }
}
