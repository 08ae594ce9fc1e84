use std::sync::Arc;

use text_editor::config::EditorConfig;
use text_editor::editor::{FileEditController, editor_routes};
use text_editor::storage::{LocalView, View};

#[tokio::main]
async fn main() -> text_editor::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = EditorConfig::from_env()?;

    // ── Storage ─────────────────────────────────────────────────────────
    tokio::fs::create_dir_all(&config.root).await?;
    let local = LocalView::new(&config.root).await?;
    let root = local.root().display().to_string();
    let view: Arc<dyn View> = Arc::new(local);

    // ── HTTP ────────────────────────────────────────────────────────────
    let controller = Arc::new(FileEditController::new(view));
    let app = editor_routes(controller);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    eprintln!("📝 Text Editor v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Root: {}", root);
    eprintln!("   Load: GET http://{}/ajax/loadfile?dir=/&filename=<name>", addr);
    eprintln!("   Save: PUT http://{}/ajax/savefile\n", addr);

    tracing::info!(%addr, root = %root, "Text editor server started");
    axum::serve(listener, app).await?;

    Ok(())
}
