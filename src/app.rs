use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::dev::Service as _;
use actix_web::{web, HttpRequest, HttpResponse, HttpServer};
use serde_json::Value;

use crate::config::Config;
use crate::hooks::{Continuation, Hook, HookError, HookEvent};
use crate::metrics::Metrics;
use crate::records::{Record, RecordEvent};
use crate::router::{handler_with_body, Router};

// ============================================================================
// Application Handle
// ============================================================================
//
// The event-driven object everything registers against: per-collection
// record-create hooks and the serve hook that assembles the route table.
// After registration the app is frozen behind an Arc and only read
// concurrently, so serving needs no further synchronization beyond the
// record store mutex.
//
// ============================================================================

/// Event fired once per serve, carrying the route table being assembled.
pub struct ServeEvent {
    pub router: Router,
    cont: Continuation,
}

impl ServeEvent {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            cont: Continuation::default(),
        }
    }

    /// Let the remaining serve-bound handlers run.
    pub fn next(&mut self) {
        self.cont.call();
    }
}

impl HookEvent for ServeEvent {
    fn continuation(&self) -> &Continuation {
        &self.cont
    }

    fn continuation_mut(&mut self) -> &mut Continuation {
        &mut self.cont
    }
}

pub struct App {
    config: Arc<Config>,
    metrics: Arc<Metrics>,
    on_record_create: HashMap<String, Hook<RecordEvent>>,
    on_serve: Hook<ServeEvent>,
    store: Mutex<HashMap<String, Vec<Record>>>,
}

impl App {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            metrics: Arc::new(Metrics::new()?),
            on_record_create: HashMap::new(),
            on_serve: Hook::new(),
            store: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    /// Hook fired before a record in `collection` is committed.
    pub fn on_record_create(&mut self, collection: &str) -> &mut Hook<RecordEvent> {
        self.on_record_create
            .entry(collection.to_string())
            .or_default()
    }

    /// Hook fired once per serve while the route table is assembled.
    pub fn on_serve(&mut self) -> &mut Hook<ServeEvent> {
        &mut self.on_serve
    }

    /// Run the before-create hook chain for `collection` and commit the
    /// record when the chain lets the default action proceed.
    pub fn create_record(&self, collection: &str, data: Value) -> Result<Record, HookError> {
        let mut event = RecordEvent::new(Record::new(collection, data));

        let proceed = match self.on_record_create.get(collection) {
            Some(hook) => {
                self.metrics.record_hook_trigger("record_create", collection);
                hook.trigger(&mut event)?
            }
            None => true,
        };
        if !proceed {
            return Err(HookError::Stopped);
        }

        let record = event.record;
        self.store
            .lock()
            .expect("record store mutex poisoned")
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        self.metrics.record_created(collection);
        tracing::debug!(collection = collection, id = %record.id, "record committed");

        Ok(record)
    }

    /// Fire the serve hook against a fresh route table, then attach the
    /// built-in endpoints. Shared with tests so the HTTP surface can be
    /// exercised without binding a listener.
    pub(crate) fn build(self) -> Result<(Arc<App>, Router), HookError> {
        let mut event = ServeEvent::new(Router::new());
        self.metrics.record_hook_trigger("serve", "root");
        self.on_serve.trigger(&mut event)?;

        let mut router = event.router;
        crate::metrics::register_routes(&mut router, self.metrics.clone());

        let app = Arc::new(self);
        register_record_routes(&mut router, app.clone());

        Ok((app, router))
    }

    /// Materialize the route table and block serving HTTP traffic.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.http.clone();
        let (app, router) = self.build()?;
        let router = Arc::new(router);
        let metrics = app.metrics();

        tracing::info!(addr = %addr, routes = router.len(), "🛒 shopbase serving HTTP");

        HttpServer::new(move || {
            let router = router.clone();
            let metrics = metrics.clone();
            actix_web::App::new()
                .wrap_fn(move |req, srv| {
                    metrics.record_http_request(req.method().as_str());
                    srv.call(req)
                })
                .configure(move |cfg| router.apply(cfg))
        })
        .bind(addr)?
        .run()
        .await?;

        Ok(())
    }
}

/// Minimal records surface: create via POST, enough to drive the
/// before-create hook chain end to end. Everything richer (queries, auth,
/// realtime) belongs to the storage layer.
fn register_record_routes(router: &mut Router, app: Arc<App>) {
    router.post(
        "/api/collections/{collection}/records",
        handler_with_body(move |req: HttpRequest, body: web::Bytes| {
            let app = app.clone();
            async move {
                let collection = req
                    .match_info()
                    .get("collection")
                    .unwrap_or_default()
                    .to_string();

                let data: Value = if body.is_empty() {
                    Value::Object(Default::default())
                } else {
                    match serde_json::from_slice(&body) {
                        Ok(value) => value,
                        Err(err) => return bad_request(&format!("invalid JSON body: {err}")),
                    }
                };
                if !data.is_object() {
                    return bad_request("request body must be a JSON object");
                }

                match app.create_record(&collection, data) {
                    Ok(record) => HttpResponse::Ok().json(record),
                    Err(err) => bad_request(&err.to_string()),
                }
            }
        }),
    );
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "status": 400,
        "message": message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookHandler;
    use actix_web::test as actix_test;
    use serde_json::json;
    use std::path::PathBuf;

    fn test_config() -> Config {
        Config {
            stripe_key: String::new(),
            hooks_dir: None,
            hooks_watch: true,
            hooks_pool: 15,
            migrations_dir: None,
            automigrate: true,
            public_dir: PathBuf::from("./sb_public"),
            index_fallback: true,
            http: "127.0.0.1:0".into(),
        }
    }

    #[test]
    fn test_create_record_without_hooks_commits() {
        let app = App::new(test_config()).unwrap();
        let record = app.create_record("orders", json!({"total": 10})).unwrap();
        assert_eq!(record.collection, "orders");
        assert!(!record.id.is_empty());
    }

    #[test]
    fn test_create_record_blocked_by_hook() {
        let mut app = App::new(test_config()).unwrap();
        app.on_record_create("orders").bind(HookHandler {
            id: "blocker",
            priority: 0,
            func: Box::new(|_e: &mut RecordEvent| Ok(())),
        });

        let result = app.create_record("orders", json!({}));
        assert!(matches!(result, Err(HookError::Stopped)));
    }

    #[test]
    fn test_create_record_hook_sees_assigned_id() {
        let mut app = App::new(test_config()).unwrap();
        app.on_record_create("orders").bind(HookHandler {
            id: "probe",
            priority: 0,
            func: Box::new(|e: &mut RecordEvent| {
                assert!(!e.record.id.is_empty());
                e.next();
                Ok(())
            }),
        });

        assert!(app.create_record("orders", json!({})).is_ok());
    }

    #[test]
    fn test_builtin_routes_materialize() {
        let app = App::new(test_config()).unwrap();
        let (_app, router) = app.build().unwrap();

        assert!(router.has_route(&actix_web::http::Method::GET, "/metrics"));
        assert!(router.has_route(&actix_web::http::Method::GET, "/health"));
        assert!(router.has_route(
            &actix_web::http::Method::POST,
            "/api/collections/{collection}/records"
        ));
    }

    #[actix_web::test]
    async fn test_create_record_over_http() {
        let app = App::new(test_config()).unwrap();
        let (_app, router) = app.build().unwrap();
        let srv =
            actix_test::init_service(actix_web::App::new().configure(|cfg| router.apply(cfg))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/collections/orders/records")
            .set_json(json!({"total": 10}))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&srv, req).await;

        assert_eq!(body["collection"], "orders");
        assert_eq!(body["total"], 10);
        assert!(body["id"].as_str().is_some());
    }

    #[actix_web::test]
    async fn test_create_record_rejects_non_object_body() {
        let app = App::new(test_config()).unwrap();
        let (_app, router) = app.build().unwrap();
        let srv =
            actix_test::init_service(actix_web::App::new().configure(|cfg| router.apply(cfg))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/collections/orders/records")
            .set_payload("[1, 2, 3]")
            .to_request();
        let resp = actix_test::call_service(&srv, req).await;
        assert_eq!(resp.status(), 400);
    }
}
