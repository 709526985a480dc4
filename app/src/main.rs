//! Command-line demo of the todolists client
//!
//! Resolves the session (signing in with `TODOLISTS_EMAIL` and
//! `TODOLISTS_PASSWORD` when set), then prints every list with its visible
//! tasks.

use anyhow::Context;
use todolists::{App, AppConfig, telemetry};
use todolists_api::{HttpTodoApi, LoginRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    telemetry::init(&config.log_filter);

    let app = App::new(&config).context("Failed to build the HTTP client")?;

    if !app.bootstrap().await && !sign_in(&app).await {
        if let Some(notification) = app.notifications().current() {
            tracing::error!(message = %notification.message, "Not signed in");
        }
        app.shutdown().await?;
        return Ok(());
    }

    let lists = app.lists().snapshot();
    for list in &lists.lists {
        app.tasks().list(list.id.as_str()).wait().await;
    }

    for list in &lists.lists {
        println!("{} [{}]", list.title, list.filter);
        for task in app.visible_tasks(&list.id) {
            println!("  - {} ({:?})", task.title, task.status);
        }
    }

    app.shutdown().await?;
    Ok(())
}

/// Sign in with credentials from the environment, then load the lists
async fn sign_in(app: &App<HttpTodoApi>) -> bool {
    let (Ok(email), Ok(password)) = (
        std::env::var("TODOLISTS_EMAIL"),
        std::env::var("TODOLISTS_PASSWORD"),
    ) else {
        tracing::warn!("TODOLISTS_EMAIL / TODOLISTS_PASSWORD not set");
        return false;
    };

    app.session()
        .login(LoginRequest::new(email, password, false))
        .wait()
        .await;

    if !app.session().is_authenticated() {
        return false;
    }

    app.lists().list().wait().await;
    true
}
