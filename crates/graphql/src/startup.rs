use std::sync::Arc;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use common::types::Health;
use common::utils::http::{build_cors, shutdown_signal};
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

use crate::schema::{create_schema, GraphQLSchema};
use crate::store::MongoStore;

async fn graphql_handler(Extension(schema): Extension<GraphQLSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub fn build_router(schema: GraphQLSchema, cors: CorsLayer) -> Router {
    Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/health", get(health))
        .layer(Extension(schema))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

/// Public entry: connect to the document store and serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_for_graphql()?;
    let client = crate::client::connect(&cfg.docstore).await?;
    let store = MongoStore::new(
        &client.database(&cfg.docstore.database),
        &cfg.docstore.users_collection,
        &cfg.docstore.recipes_collection,
    );
    let schema = create_schema(Arc::new(store), cfg.docstore.query_timeout());
    let app = build_router(schema, build_cors(&cfg.cors.allowed_origins));

    let addr = cfg.graphql.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "GraphQL server listening");
    let served = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;
    crate::client::disconnect(client, cfg.docstore.disconnect_timeout()).await;
    served?;
    info!("GraphQL server stopped");
    Ok(())
}
