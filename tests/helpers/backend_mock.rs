//! Fake hosted backend for testing
//!
//! A wiremock server answering the row API (`/rest/v1/{table}`) and the auth
//! API (`/auth/v1/*`) from shared in-memory tables. Conditional updates are
//! applied under one lock, so concurrent seat claims behave like the real
//! database.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Map, Value};
use uuid::Uuid;
use wiremock::{matchers::path_regex, Mock, MockServer, Request, Respond, ResponseTemplate};

use eventhub::models::{EventStatus, Role};

#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password: String,
}

/// Tables and failure switches shared by both responders
#[derive(Debug, Default)]
pub struct FakeState {
    pub accounts: Vec<Account>,
    pub profiles: Vec<Value>,
    pub events: Vec<Value>,
    pub registrations: Vec<Value>,
    pub fail_event_list: bool,
    pub fail_registration_insert: bool,
    pub fail_logout: bool,
    /// Return events in insertion order even when `order` is requested
    pub ignore_order: bool,
}

/// Event row to seed; defaults to an upcoming event a week out with ten seats
#[derive(Debug, Clone)]
pub struct EventSeed {
    pub title: String,
    pub organizer_id: Uuid,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub registered_count: i32,
    pub status: EventStatus,
}

impl EventSeed {
    pub fn new(title: &str, organizer_id: Uuid) -> Self {
        Self {
            title: title.to_string(),
            organizer_id,
            date: Utc::now() + Duration::days(7),
            location: "Main Hall".to_string(),
            capacity: 10,
            registered_count: 0,
            status: EventStatus::Upcoming,
        }
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    pub fn seats(mut self, capacity: i32, registered_count: i32) -> Self {
        self.capacity = capacity;
        self.registered_count = registered_count;
        self
    }

    pub fn status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }
}

pub struct FakeBackend {
    pub server: MockServer,
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    /// Start the server with both APIs mounted
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let state = Arc::new(Mutex::new(FakeState::default()));

        Mock::given(path_regex(r"^/auth/v1/"))
            .respond_with(AuthResponder { state: Arc::clone(&state) })
            .mount(&server)
            .await;

        Mock::given(path_regex(r"^/rest/v1/"))
            .respond_with(RestResponder { state: Arc::clone(&state) })
            .mount(&server)
            .await;

        Self { server, state }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Create an auth account together with its profile row
    pub fn seed_account(&self, name: &str, email: &str, password: &str, role: Role) -> Uuid {
        let id = Uuid::new_v4();
        let mut state = self.state();
        state.accounts.push(Account {
            id,
            email: email.to_string(),
            password: password.to_string(),
        });
        state.profiles.push(json!({
            "id": id,
            "name": name,
            "email": email,
            "role": role,
        }));
        id
    }

    pub fn seed_event(&self, seed: EventSeed) -> Uuid {
        let id = Uuid::new_v4();
        self.state().events.push(json!({
            "id": id,
            "title": seed.title,
            "description": format!("All about {}", seed.title),
            "date": seed.date.to_rfc3339(),
            "location": seed.location,
            "image": "https://example.com/event.jpg",
            "organizer_id": seed.organizer_id,
            "capacity": seed.capacity,
            "registered_count": seed.registered_count,
            "status": seed.status,
            "created_at": Utc::now().to_rfc3339(),
        }));
        id
    }

    /// Insert a registration row directly; `status` is left out when `None`
    pub fn seed_registration(&self, event_id: Uuid, user_id: Uuid, status: Option<&str>) -> Uuid {
        let id = Uuid::new_v4();
        let mut row = json!({
            "id": id,
            "event_id": event_id,
            "user_id": user_id,
            "created_at": Utc::now().to_rfc3339(),
        });
        if let Some(status) = status {
            row["status"] = json!(status);
        }
        self.state().registrations.push(row);
        id
    }

    pub fn event(&self, id: Uuid) -> Option<Value> {
        let id = id.to_string();
        self.state()
            .events
            .iter()
            .find(|row| row["id"].as_str() == Some(id.as_str()))
            .cloned()
    }

    pub fn registered_count(&self, id: Uuid) -> i64 {
        self.event(id)
            .and_then(|row| row["registered_count"].as_i64())
            .unwrap_or_default()
    }

    /// Simulate another registrant moving the counter
    pub fn set_registered_count(&self, id: Uuid, count: i32) {
        let id = id.to_string();
        let mut state = self.state();
        if let Some(row) = state
            .events
            .iter_mut()
            .find(|row| row["id"].as_str() == Some(id.as_str()))
        {
            row["registered_count"] = json!(count);
        }
    }

    pub fn registrations_for(&self, event_id: Uuid) -> usize {
        let event_id = event_id.to_string();
        self.state()
            .registrations
            .iter()
            .filter(|row| row["event_id"].as_str() == Some(event_id.as_str()))
            .count()
    }

    /// Number of received requests with this method and path
    pub async fn requests(&self, method: &str, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == method && r.url.path() == path)
            .count()
    }

    pub async fn total_requests(&self) -> usize {
        self.server.received_requests().await.map(|r| r.len()).unwrap_or_default()
    }
}

struct AuthResponder {
    state: Arc<Mutex<FakeState>>,
}

impl Respond for AuthResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let endpoint = request.url.path().trim_start_matches("/auth/v1/");
        let mut state = self.state.lock().unwrap();

        match (request.method.as_str(), endpoint) {
            ("GET", "health") => ResponseTemplate::new(200).set_body_json(json!({ "name": "fake-auth" })),
            ("POST", "token") => {
                let email = body["email"].as_str().unwrap_or_default();
                let password = body["password"].as_str().unwrap_or_default();
                match state
                    .accounts
                    .iter()
                    .find(|a| a.email == email && a.password == password)
                {
                    Some(account) => ResponseTemplate::new(200).set_body_json(token_body(account)),
                    None => ResponseTemplate::new(400).set_body_json(json!({
                        "error": "invalid_grant",
                        "error_description": "Invalid login credentials",
                    })),
                }
            }
            ("POST", "signup") => {
                let email = body["email"].as_str().unwrap_or_default().to_string();
                if state.accounts.iter().any(|a| a.email == email) {
                    return ResponseTemplate::new(422).set_body_json(json!({
                        "code": 422,
                        "msg": "User already registered",
                    }));
                }

                let id = Uuid::new_v4();
                let metadata = body["data"].clone();
                state.accounts.push(Account {
                    id,
                    email: email.clone(),
                    password: body["password"].as_str().unwrap_or_default().to_string(),
                });
                // the profile row is created from sign-up metadata on the server side
                state.profiles.push(json!({
                    "id": id,
                    "name": metadata["name"],
                    "email": email,
                    "role": metadata["role"],
                }));

                ResponseTemplate::new(200).set_body_json(json!({
                    "id": id,
                    "email": email,
                    "user_metadata": metadata,
                }))
            }
            ("POST", "logout") if state.fail_logout => {
                ResponseTemplate::new(500).set_body_json(json!({ "msg": "logout failed" }))
            }
            ("POST", "logout") => ResponseTemplate::new(204),
            _ => ResponseTemplate::new(404).set_body_json(json!({ "msg": "not found" })),
        }
    }
}

fn token_body(account: &Account) -> Value {
    json!({
        "access_token": format!("token-{}", account.id),
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": format!("refresh-{}", account.id),
        "user": {
            "id": account.id,
            "email": account.email,
            "user_metadata": {},
        },
    })
}

struct RestResponder {
    state: Arc<Mutex<FakeState>>,
}

impl Respond for RestResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let table = request.url.path().trim_start_matches("/rest/v1/").to_string();
        let params: Vec<(String, String)> = request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let select = param(&params, "select").unwrap_or_else(|| "*".to_string());
        let ordered = param(&params, "order").is_some();
        let filters: Vec<(String, String)> = params
            .iter()
            .filter(|(k, _)| k != "select" && k != "order")
            .cloned()
            .collect();
        let returns_rows = request
            .headers
            .get("prefer")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("return=representation"))
            .unwrap_or(false);
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);

        let mut state = self.state.lock().unwrap();

        match (request.method.as_str(), table.as_str()) {
            ("GET", "events") => {
                if state.fail_event_list {
                    return ResponseTemplate::new(500).set_body_json(json!({ "message": "events unavailable" }));
                }
                let mut rows = select_rows(&state.events, &filters);
                if ordered && !state.ignore_order {
                    rows.sort_by_key(row_date);
                }
                ResponseTemplate::new(200).set_body_json(rows)
            }
            ("GET", "profiles") => ResponseTemplate::new(200).set_body_json(select_rows(&state.profiles, &filters)),
            ("GET", "registrations") => {
                let rows = select_rows(&state.registrations, &filters);
                if select.starts_with("profiles:") {
                    let joined: Vec<Value> = rows
                        .iter()
                        .map(|row| {
                            let profile = state
                                .profiles
                                .iter()
                                .find(|p| p["id"] == row["user_id"])
                                .map(|p| json!({ "name": p["name"] }))
                                .unwrap_or(Value::Null);
                            json!({ "profiles": profile })
                        })
                        .collect();
                    return ResponseTemplate::new(200).set_body_json(joined);
                }
                ResponseTemplate::new(200).set_body_json(rows)
            }
            ("POST", "events") => {
                let inserted: Vec<Value> = rows_of(body)
                    .into_iter()
                    .map(|mut row| {
                        row.insert("id".to_string(), json!(Uuid::new_v4()));
                        row.insert("created_at".to_string(), json!(Utc::now().to_rfc3339()));
                        Value::Object(row)
                    })
                    .collect();
                state.events.extend(inserted.iter().cloned());
                ResponseTemplate::new(201).set_body_json(inserted)
            }
            ("POST", "registrations") => {
                if state.fail_registration_insert {
                    return ResponseTemplate::new(500).set_body_json(json!({ "message": "insert failed" }));
                }
                let mut inserted = Vec::new();
                for mut row in rows_of(body) {
                    let duplicate = state
                        .registrations
                        .iter()
                        .any(|r| r["event_id"] == row["event_id"] && r["user_id"] == row["user_id"]);
                    if duplicate {
                        return ResponseTemplate::new(409).set_body_json(json!({
                            "code": "23505",
                            "message": "duplicate key value violates unique constraint \"registrations_event_id_user_id_key\"",
                        }));
                    }
                    row.insert("id".to_string(), json!(Uuid::new_v4()));
                    row.insert("created_at".to_string(), json!(Utc::now().to_rfc3339()));
                    inserted.push(Value::Object(row));
                }
                state.registrations.extend(inserted.iter().cloned());
                ResponseTemplate::new(201).set_body_json(inserted)
            }
            ("PATCH", "events") => {
                let changes = body.as_object().cloned().unwrap_or_default();
                let mut updated = Vec::new();
                for row in state.events.iter_mut().filter(|row| matches(row, &filters)) {
                    for (column, value) in &changes {
                        if column != "id" {
                            row[column.as_str()] = value.clone();
                        }
                    }
                    updated.push(row.clone());
                }
                if returns_rows {
                    ResponseTemplate::new(200).set_body_json(updated)
                } else {
                    ResponseTemplate::new(204)
                }
            }
            _ => ResponseTemplate::new(404).set_body_json(json!({
                "code": "PGRST205",
                "message": format!("Could not find the table '{}'", table),
            })),
        }
    }
}

fn param(params: &[(String, String)], name: &str) -> Option<String> {
    params.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
}

fn select_rows(rows: &[Value], filters: &[(String, String)]) -> Vec<Value> {
    rows.iter().filter(|row| matches(row, filters)).cloned().collect()
}

/// Only `eq.` filters are understood; anything else matches every row
fn matches(row: &Value, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(column, condition)| {
        let Some(expected) = condition.strip_prefix("eq.") else {
            return true;
        };
        match row.get(column) {
            Some(Value::String(s)) => s == expected,
            Some(Value::Null) | None => expected == "null",
            Some(other) => other.to_string() == expected,
        }
    })
}

fn row_date(row: &Value) -> Option<DateTime<Utc>> {
    row["date"]
        .as_str()
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|d| d.with_timezone(&Utc))
}

fn rows_of(body: Value) -> Vec<Map<String, Value>> {
    match body {
        Value::Array(rows) => rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        Value::Object(map) => vec![map],
        _ => Vec::new(),
    }
}
