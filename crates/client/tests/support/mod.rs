//! In-process stand-in for the finance backend.
//!
//! Serves the same REST surface under `/api` with in-memory JSON stores and
//! records what it saw (authorization headers, query strings) so tests can
//! assert on the wire behaviour of the client.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use api_types::{Money, transaction::Transaction, transaction::TransactionSummary};
use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, NaiveDate, Utc};
use client::{Client, Session, TransportConfig};
use serde_json::{Map, Value, json};

pub const ACCESS: &str = "tok_a";
pub const REFRESH: &str = "tok_r";

const COLLECTIONS: [&str; 5] = ["transactions", "categories", "tags", "budgets", "savings-goals"];

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub query: Vec<(String, String)>,
}

#[derive(Debug, Default)]
pub struct BackendState {
    next_id: i64,
    users: Vec<(Value, String)>,
    current_user: Option<usize>,
    collections: HashMap<&'static str, BTreeMap<i64, Map<String, Value>>>,
    pub seen: Vec<SeenRequest>,
    pub blacklisted: Vec<String>,
    pub fail_logout: bool,
    pub login_includes_user: bool,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Adds a user that can log in.
    pub fn add_user(&self, username: &str, password: &str) -> i64 {
        let mut state = self.state();
        let id = state.allocate_id();
        let user = json!({
            "id": id,
            "username": username,
            "email": format!("{username}@example.com"),
            "first_name": "",
            "last_name": "",
        });
        state.users.push((user, password.to_string()));
        id
    }

    /// Requests that reached the given path, oldest first.
    pub fn seen_for(&self, path: &str) -> Vec<SeenRequest> {
        self.state()
            .seen
            .iter()
            .filter(|seen| seen.path == path)
            .cloned()
            .collect()
    }

    pub async fn spawn(self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(self);

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        format!("http://{addr}/api")
    }
}

impl BackendState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn store(&mut self, name: &'static str) -> &mut BTreeMap<i64, Map<String, Value>> {
        self.collections.entry(name).or_default()
    }

    fn records(&self, name: &str) -> Vec<Map<String, Value>> {
        self.collections
            .get(name)
            .map(|store| store.values().cloned().collect())
            .unwrap_or_default()
    }
}

/// Starts a backend with user `alice`/`pw` and returns a client bound to it.
pub async fn start() -> (FakeBackend, Client) {
    let backend = FakeBackend::default();
    backend.add_user("alice", "pw");
    let base_url = backend.clone().spawn().await;
    let client = client_for(&base_url, Session::in_memory());
    (backend, client)
}

pub fn client_for(base_url: &str, session: Session) -> Client {
    let config = TransportConfig::new(base_url).with_timeout(Duration::from_secs(5));
    Client::new(&config, session).unwrap()
}

/// Base URL of a port nobody listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

fn error(status: StatusCode, payload: Value) -> Response {
    (status, Json(payload)).into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, json!({"detail": "Not found."}))
}

fn money(value: Option<&Value>) -> Option<Money> {
    value.and_then(|value| serde_json::from_value(value.clone()).ok())
}

fn as_float(amount: Money) -> f64 {
    amount.cents() as f64 / 100.0
}

fn parse_query(raw: Option<&str>) -> Vec<(String, String)> {
    raw.map(|raw| {
        raw.split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect()
    })
    .unwrap_or_default()
}

async fn record(State(backend): State<FakeBackend>, request: Request, next: Next) -> Response {
    let path = request
        .uri()
        .path()
        .strip_prefix("/api")
        .unwrap_or(request.uri().path())
        .to_string();
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    backend.state().seen.push(SeenRequest {
        method: request.method().to_string(),
        path,
        authorization,
        query: parse_query(request.uri().query()),
    });

    next.run(request).await
}

async fn require_token(State(backend): State<FakeBackend>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {ACCESS}");
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    let logged_in = backend.state().current_user.is_some();

    if !authorized || !logged_in {
        return error(
            StatusCode::UNAUTHORIZED,
            json!({"detail": "Authentication credentials were not provided."}),
        );
    }
    next.run(request).await
}

fn router(backend: FakeBackend) -> Router {
    let mut protected = Router::new()
        .route("/auth/logout/", post(logout))
        .route("/auth/profile/", get(profile))
        .route("/auth/profile/update/", axum::routing::patch(update_profile))
        .route("/transactions/summary/", get(summary))
        .route("/savings-goals/{id}/add_amount/", post(add_amount));

    for name in COLLECTIONS {
        protected = protected.merge(collection_routes(name));
    }

    let protected =
        protected.route_layer(middleware::from_fn_with_state(backend.clone(), require_token));

    let public = Router::new()
        .route("/auth/register/", post(register))
        .route("/auth/login/", post(login));

    let api = protected
        .merge(public)
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend);

    Router::new().nest("/api", api)
}

fn collection_routes(name: &'static str) -> Router<FakeBackend> {
    Router::new()
        .route(
            &format!("/{name}/"),
            get(
                move |State(backend): State<FakeBackend>,
                      Query(query): Query<HashMap<String, String>>| async move {
                    list(backend, name, query)
                },
            )
            .post(
                move |State(backend): State<FakeBackend>, Json(body): Json<Value>| async move {
                    create(backend, name, body)
                },
            ),
        )
        .route(
            &format!("/{name}/{{id}}/"),
            get(
                move |State(backend): State<FakeBackend>, Path(id): Path<i64>| async move {
                    fetch(backend, name, id)
                },
            )
            .patch(
                move |State(backend): State<FakeBackend>,
                      Path(id): Path<i64>,
                      Json(body): Json<Value>| async move {
                    update(backend, name, id, body)
                },
            )
            .delete(
                move |State(backend): State<FakeBackend>, Path(id): Path<i64>| async move {
                    remove(backend, name, id)
                },
            ),
        )
}

// Auth

async fn register(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    let mut state = backend.state();
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();

    if username.is_empty() || password.is_empty() || email.is_empty() {
        return error(
            StatusCode::BAD_REQUEST,
            json!({"username": ["This field is required."]}),
        );
    }
    if state.users.iter().any(|(user, _)| user["username"] == username) {
        return error(
            StatusCode::BAD_REQUEST,
            json!({"username": ["A user with that username already exists."]}),
        );
    }

    let id = state.allocate_id();
    let user = json!({
        "id": id,
        "username": username,
        "email": email,
        "first_name": body["first_name"].as_str().unwrap_or_default(),
        "last_name": body["last_name"].as_str().unwrap_or_default(),
    });
    state.users.push((user.clone(), password));
    state.current_user = Some(state.users.len() - 1);

    (
        StatusCode::CREATED,
        Json(json!({
            "user": user,
            "tokens": {"access": ACCESS, "refresh": REFRESH},
        })),
    )
        .into_response()
}

async fn login(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    let mut state = backend.state();
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let Some(index) = state
        .users
        .iter()
        .position(|(user, pw)| user["username"] == username && pw == password)
    else {
        return error(
            StatusCode::UNAUTHORIZED,
            json!({"detail": "No active account found with the given credentials"}),
        );
    };
    state.current_user = Some(index);

    let mut payload = json!({"access": ACCESS, "refresh": REFRESH});
    if state.login_includes_user {
        payload["user"] = state.users[index].0.clone();
    }
    Json(payload).into_response()
}

async fn logout(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    let mut state = backend.state();
    if state.fail_logout {
        return error(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "token blacklist unavailable"}),
        );
    }
    if let Some(token) = body["refresh_token"].as_str() {
        state.blacklisted.push(token.to_string());
    }
    Json(json!({"message": "Successfully logged out"})).into_response()
}

async fn profile(State(backend): State<FakeBackend>) -> Response {
    let state = backend.state();
    match state.current_user {
        Some(index) => Json(state.users[index].0.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_profile(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    let mut state = backend.state();
    let Some(index) = state.current_user else {
        return not_found();
    };
    let user = &mut state.users[index].0;
    for key in ["username", "email", "first_name", "last_name"] {
        if let Some(value) = body.get(key) {
            user[key] = value.clone();
        }
    }
    Json(user.clone()).into_response()
}

// Collections

fn list(backend: FakeBackend, name: &'static str, query: HashMap<String, String>) -> Response {
    let state = backend.state();
    let records: Vec<Value> = state
        .records(name)
        .into_iter()
        .map(|record| decorate(&state, name, record))
        .filter(|record| matches_filters(name, record, &query))
        .map(Value::Object)
        .collect();
    Json(Value::Array(records)).into_response()
}

fn matches_filters(name: &str, record: &Map<String, Value>, query: &HashMap<String, String>) -> bool {
    let text = |key: &str| record.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
    let date = |key: &str| query.get(key).and_then(|raw| raw.parse::<NaiveDate>().ok());

    for (key, value) in query {
        let keep = match (name, key.as_str()) {
            ("transactions" | "categories", "type") => text("type") == *value,
            ("transactions", "category") => {
                record.get("category").map(Value::to_string).as_deref() == Some(value.as_str())
            }
            ("transactions", "start_date") => match (date("start_date"), text("date").parse::<NaiveDate>()) {
                (Some(start), Ok(on)) => on >= start,
                _ => false,
            },
            ("transactions", "end_date") => match (date("end_date"), text("date").parse::<NaiveDate>()) {
                (Some(end), Ok(on)) => on <= end,
                _ => false,
            },
            ("transactions", "search") => text("description")
                .to_lowercase()
                .contains(&value.to_lowercase()),
            (_, "search") => text("name").to_lowercase().contains(&value.to_lowercase()),
            ("budgets", "year") => record.get("year").map(Value::to_string).as_deref() == Some(value.as_str()),
            ("budgets", "period") => text("period") == *value,
            _ => true,
        };
        if !keep {
            return false;
        }
    }
    true
}

fn create(backend: FakeBackend, name: &'static str, body: Value) -> Response {
    let mut state = backend.state();
    let Value::Object(mut record) = body else {
        return error(StatusCode::BAD_REQUEST, json!({"detail": "expected an object"}));
    };

    apply_defaults(name, &mut record);
    if let Err(payload) = validate(&state, name, &record) {
        return error(StatusCode::BAD_REQUEST, payload);
    }

    let id = state.allocate_id();
    let stamp = now();
    record.insert("id".to_string(), json!(id));
    record.insert("created_at".to_string(), json!(stamp));
    if name != "tags" {
        record.insert("updated_at".to_string(), json!(stamp));
    }
    normalize(name, &mut record);

    state.store(name).insert(id, record.clone());
    let body = decorate(&state, name, record);
    (StatusCode::CREATED, Json(Value::Object(body))).into_response()
}

fn fetch(backend: FakeBackend, name: &'static str, id: i64) -> Response {
    let state = backend.state();
    match state.collections.get(name).and_then(|store| store.get(&id)) {
        Some(record) => Json(Value::Object(decorate(&state, name, record.clone()))).into_response(),
        None => not_found(),
    }
}

fn update(backend: FakeBackend, name: &'static str, id: i64, body: Value) -> Response {
    let mut state = backend.state();
    let Some(existing) = state.collections.get(name).and_then(|store| store.get(&id)).cloned() else {
        return not_found();
    };
    let Value::Object(changes) = body else {
        return error(StatusCode::BAD_REQUEST, json!({"detail": "expected an object"}));
    };

    let mut record = existing;
    for (key, value) in changes {
        if matches!(key.as_str(), "id" | "created_at" | "updated_at") {
            continue;
        }
        record.insert(key, value);
    }
    if let Err(payload) = validate(&state, name, &record) {
        return error(StatusCode::BAD_REQUEST, payload);
    }
    if name != "tags" {
        record.insert("updated_at".to_string(), json!(now()));
    }
    normalize(name, &mut record);

    state.store(name).insert(id, record.clone());
    Json(Value::Object(decorate(&state, name, record))).into_response()
}

fn remove(backend: FakeBackend, name: &'static str, id: i64) -> Response {
    let mut state = backend.state();
    match state.store(name).remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

fn apply_defaults(name: &str, record: &mut Map<String, Value>) {
    let mut default = |key: &str, value: Value| {
        record.entry(key.to_string()).or_insert(value);
    };
    match name {
        "categories" => {
            default("color", json!("#1976d2"));
            default("icon", json!(""));
        }
        "transactions" => {
            default("description", json!(""));
            default("category", Value::Null);
            default("tags", json!([]));
        }
        "savings-goals" => {
            default("current_amount", json!("0.00"));
            default("deadline", Value::Null);
        }
        "budgets" => {
            default("period", json!("monthly"));
            default("month", Value::Null);
        }
        _ => {}
    }
}

fn validate(state: &BackendState, name: &str, record: &Map<String, Value>) -> Result<(), Value> {
    match name {
        "transactions" => {
            if !money(record.get("amount")).is_some_and(Money::is_positive) {
                return Err(json!({"amount": ["Ensure this value is greater than or equal to 0.01."]}));
            }
            if let Some(category_id) = record.get("category").and_then(Value::as_i64) {
                let Some(category) = state
                    .collections
                    .get("categories")
                    .and_then(|store| store.get(&category_id))
                else {
                    return Err(json!({"category": ["Invalid pk - object does not exist."]}));
                };
                if category.get("type") != record.get("type") {
                    return Err(json!({"non_field_errors": ["Category type does not match transaction type."]}));
                }
            }
            Ok(())
        }
        "savings-goals" => {
            if !money(record.get("target_amount")).is_some_and(Money::is_positive) {
                return Err(json!({"target_amount": ["Ensure this value is greater than or equal to 0.01."]}));
            }
            Ok(())
        }
        "budgets" => {
            if !money(record.get("amount")).is_some_and(Money::is_positive) {
                return Err(json!({"amount": ["Ensure this value is greater than or equal to 0.01."]}));
            }
            Ok(())
        }
        "categories" | "tags" => {
            let empty = record
                .get("name")
                .and_then(Value::as_str)
                .is_none_or(|name| name.trim().is_empty());
            if empty {
                return Err(json!({"name": ["This field may not be blank."]}));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Rewrites decimal fields to the backend's two-digit string form.
fn normalize(name: &str, record: &mut Map<String, Value>) {
    let keys: &[&str] = match name {
        "transactions" | "budgets" => &["amount"],
        "savings-goals" => &["target_amount", "current_amount"],
        _ => &[],
    };
    for key in keys {
        if let Some(amount) = money(record.get(*key)) {
            record.insert((*key).to_string(), json!(amount.to_string()));
        }
    }
}

/// Adds the read-only derived fields the serializers expose.
fn decorate(state: &BackendState, name: &str, mut record: Map<String, Value>) -> Map<String, Value> {
    let id = record.get("id").and_then(Value::as_i64).unwrap_or_default();
    let transactions = state.records("transactions");

    match name {
        "categories" => {
            let count = transactions
                .iter()
                .filter(|tx| tx.get("category").and_then(Value::as_i64) == Some(id))
                .count();
            record.insert("transaction_count".to_string(), json!(count));
        }
        "tags" => {
            let count = transactions
                .iter()
                .filter(|tx| {
                    tx.get("tags")
                        .and_then(Value::as_array)
                        .is_some_and(|tags| tags.iter().any(|tag| tag.as_i64() == Some(id)))
                })
                .count();
            record.insert("transaction_count".to_string(), json!(count));
        }
        "transactions" => {
            let category = record
                .get("category")
                .and_then(Value::as_i64)
                .and_then(|category| state.collections.get("categories")?.get(&category));
            record.insert(
                "category_name".to_string(),
                category.and_then(|c| c.get("name").cloned()).unwrap_or(Value::Null),
            );
            record.insert(
                "category_color".to_string(),
                category.and_then(|c| c.get("color").cloned()).unwrap_or(Value::Null),
            );
            let tags_list: Vec<Value> = record
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_i64)
                        .filter_map(|tag| state.collections.get("tags")?.get(&tag)?.get("name").cloned())
                        .collect()
                })
                .unwrap_or_default();
            record.insert("tags_list".to_string(), Value::Array(tags_list));
        }
        "budgets" => {
            let category = record.get("category").and_then(Value::as_i64);
            let year = record.get("year").and_then(Value::as_i64);
            let month = record.get("month").and_then(Value::as_i64);
            let monthly = record.get("period").and_then(Value::as_str) == Some("monthly");
            let spent: Money = transactions
                .iter()
                .filter_map(|tx| serde_json::from_value::<Transaction>(Value::Object(tx.clone())).ok())
                .filter(|tx| tx.category == category && tx.kind == api_types::TransactionKind::Expense)
                .filter(|tx| Some(i64::from(tx.date.year())) == year)
                .filter(|tx| !monthly || month.is_none() || Some(i64::from(tx.date.month())) == month)
                .map(|tx| tx.amount)
                .sum();
            let amount = money(record.get("amount")).unwrap_or_default();
            let progress = if amount.is_zero() {
                0.0
            } else {
                (as_float(spent) / as_float(amount) * 100.0).min(100.0)
            };
            let category_name = category
                .and_then(|category| state.collections.get("categories")?.get(&category)?.get("name").cloned())
                .unwrap_or(Value::Null);
            record.insert("category_name".to_string(), category_name);
            record.insert("spent_amount".to_string(), json!(as_float(spent)));
            record.insert("remaining_amount".to_string(), json!(as_float(amount - spent)));
            record.insert("progress_percentage".to_string(), json!(progress));
        }
        "savings-goals" => {
            let target = money(record.get("target_amount")).unwrap_or_default();
            let current = money(record.get("current_amount")).unwrap_or_default();
            let progress = if target.is_zero() {
                0.0
            } else {
                (as_float(current) / as_float(target) * 100.0).min(100.0)
            };
            let remaining = if current > target { Money::ZERO } else { target - current };
            record.insert("progress_percentage".to_string(), json!(progress));
            record.insert("remaining_amount".to_string(), json!(remaining.to_string()));
        }
        _ => {}
    }
    record
}

// Extra actions

async fn summary(
    State(backend): State<FakeBackend>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let state = backend.state();
    let start = query.get("start_date").and_then(|raw| raw.parse::<NaiveDate>().ok());
    let end = query.get("end_date").and_then(|raw| raw.parse::<NaiveDate>().ok());

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => current_month(),
    };

    let transactions: Vec<Transaction> = state
        .records("transactions")
        .into_iter()
        .map(|record| decorate(&state, "transactions", record))
        .filter_map(|record| serde_json::from_value(Value::Object(record)).ok())
        .collect();
    let summary = TransactionSummary::compute(start, end, &transactions);

    Json(json!({
        "start_date": summary.start_date,
        "end_date": summary.end_date,
        "total_income": as_float(summary.total_income),
        "total_expenses": as_float(summary.total_expenses),
        "balance": as_float(summary.balance),
        "transaction_count": summary.transaction_count,
    }))
    .into_response()
}

fn current_month() -> (NaiveDate, NaiveDate) {
    let today = Utc::now().date_naive();
    let start = today.with_day(1).unwrap_or(today);
    let next = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    };
    let end = next.and_then(|next| next.pred_opt()).unwrap_or(today);
    (start, end)
}

async fn add_amount(
    State(backend): State<FakeBackend>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = backend.state();
    let Some(amount) = money(body.get("amount")) else {
        return error(StatusCode::BAD_REQUEST, json!({"error": "Invalid amount"}));
    };
    if !amount.is_positive() {
        return error(
            StatusCode::BAD_REQUEST,
            json!({"error": "Amount must be greater than 0"}),
        );
    }

    let Some(goal) = state.store("savings-goals").get_mut(&id) else {
        return not_found();
    };
    let current = money(goal.get("current_amount")).unwrap_or_default();
    goal.insert(
        "current_amount".to_string(),
        json!((current + amount).to_string()),
    );
    goal.insert("updated_at".to_string(), json!(now()));
    let goal = goal.clone();

    Json(Value::Object(decorate(&state, "savings-goals", goal))).into_response()
}
