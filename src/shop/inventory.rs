use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

use crate::app::{App, ServeEvent};
use crate::hooks::HookHandler;
use crate::router::handler;

// ============================================================================
// Inventory Lookup Endpoint
// ============================================================================
//
// GET /api/shop/inventory/{productId} answers with a simulated stock level.
// Every product id succeeds identically; no store is queried.
//
// ============================================================================

const STUB_QUANTITY: i64 = 42;

/// Per-request stock report; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryResponse {
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(rename = "inStock")]
    pub in_stock: bool,
    pub quantity: i64,
}

pub fn register(app: &mut App) {
    app.on_serve().bind(HookHandler {
        id: "shop-inventory",
        priority: 0,
        func: Box::new(|event: &mut ServeEvent| {
            event
                .router
                .get("/api/shop/inventory/{productId}", handler(lookup));
            event.next();
            Ok(())
        }),
    });
}

async fn lookup(req: HttpRequest) -> HttpResponse {
    let product_id = req.match_info().get("productId").unwrap_or_default();

    HttpResponse::Ok().json(InventoryResponse {
        product_id: product_id.to_string(),
        in_stock: true,
        quantity: STUB_QUANTITY,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::router::Router;
    use actix_web::test;
    use serde_json::Value;
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

    fn build_router() -> Router {
        let mut app = App::new(test_config()).unwrap();
        register(&mut app);

        let mut event = ServeEvent::new(Router::new());
        app.on_serve().trigger(&mut event).unwrap();
        event.router
    }

    #[actix_web::test]
    async fn test_returns_exact_stub_body() {
        let router = build_router();
        let srv =
            test::init_service(actix_web::App::new().configure(|cfg| router.apply(cfg))).await;

        let req = test::TestRequest::get()
            .uri("/api/shop/inventory/abc123")
            .to_request();
        let body = test::call_and_read_body(&srv, req).await;

        assert_eq!(
            &body[..],
            br#"{"productId":"abc123","inStock":true,"quantity":42}"#
        );
    }

    #[actix_web::test]
    async fn test_any_product_id_succeeds() {
        let router = build_router();
        let srv =
            test::init_service(actix_web::App::new().configure(|cfg| router.apply(cfg))).await;

        for id in ["SKU-00042", "0", "out-of-stock-item"] {
            let req = test::TestRequest::get()
                .uri(&format!("/api/shop/inventory/{id}"))
                .to_request();
            let body: Value = test::call_and_read_body_json(&srv, req).await;

            assert_eq!(body["productId"], id);
            assert_eq!(body["inStock"], true);
            assert_eq!(body["quantity"], 42);
        }
    }

    #[actix_web::test]
    async fn test_url_encoded_product_id() {
        let router = build_router();
        let srv =
            test::init_service(actix_web::App::new().configure(|cfg| router.apply(cfg))).await;

        let req = test::TestRequest::get()
            .uri("/api/shop/inventory/a%20b")
            .to_request();
        let resp = test::call_service(&srv, req).await;
        assert_eq!(resp.status(), 200);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["productId"], "a b");
        assert_eq!(body["quantity"], 42);
    }
}
