//! `eventos` - headless Eventos client.
//!
//! Logs in with the configured credentials, opens the dashboard for the
//! account's role and reports what it shows.
//!
//! ```bash
//! EVENTOS_API_URL=http://localhost:8080 \
//! EVENTOS_EMAIL=ana@example.com EVENTOS_PASSWORD=segredo \
//! cargo run -p eventos-app
//! ```

use eventos_app::routes::{navigate, Screen};
use eventos_app::views::{
    CatalogAction, CatalogReducer, CatalogState, EventEnrollmentsAction, EventEnrollmentsReducer,
    EventEnrollmentsState, MyEnrollmentsAction, MyEnrollmentsReducer, MyEnrollmentsState,
    OrganizerEventsAction, OrganizerEventsReducer, OrganizerEventsState,
};
use eventos_app::{AppEnvironment, Config, SessionStore, Store};
use eventos_client::EventosClient;
use eventos_core::User;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_tracing(&config);

    info!(api_url = %config.api_url, "Starting Eventos client");

    let backend = Arc::new(EventosClient::new(&config.api_url));
    let session = Arc::new(SessionStore::new());

    let Some(credentials) = config.credentials() else {
        let (route, _) = navigate("/dashboard", None);
        warn!(%route, "No credentials configured (EVENTOS_EMAIL, EVENTOS_PASSWORD)");
        return Ok(());
    };

    let viewer = session.login(backend.as_ref(), &credentials).await?;
    let (route, screen) = navigate("/dashboard", Some(&viewer));
    info!(%route, ?screen, "Opening dashboard");

    let env = AppEnvironment::new(backend, Arc::clone(&session), config);
    open(screen, viewer, env).await;

    session.logout().await;
    Ok(())
}

/// Load a screen and log a summary of what it shows.
async fn open(screen: Screen, viewer: User, env: AppEnvironment<EventosClient>) {
    match screen {
        Screen::Catalog => {
            let store = Store::new(CatalogState::new(viewer), CatalogReducer::default(), env);
            store.send(CatalogAction::Load).await;
            store
                .state(|s| {
                    for card in s.cards() {
                        info!(
                            event = %card.event.title,
                            spots_left = card.spots_left,
                            offer = ?card.offer,
                            "Event"
                        );
                    }
                    report(s.notification.as_ref());
                })
                .await;
        },
        Screen::MyEnrollments => {
            let store = Store::new(MyEnrollmentsState::new(viewer), MyEnrollmentsReducer::default(), env);
            store.send(MyEnrollmentsAction::Load).await;
            store
                .state(|s| {
                    for row in s.rows() {
                        info!(
                            event = row.enrollment.event_title.as_deref().unwrap_or("-"),
                            status = %row.enrollment.status,
                            offers = ?row.offers,
                            "Enrollment"
                        );
                    }
                    report(s.notification.as_ref());
                })
                .await;
        },
        Screen::OrganizerEvents => {
            let store = Store::new(
                OrganizerEventsState::new(viewer),
                OrganizerEventsReducer::default(),
                env,
            );
            store.send(OrganizerEventsAction::Load).await;
            store
                .state(|s| {
                    for row in s.rows() {
                        info!(
                            event = %row.event.title,
                            confirmed = row.event.current_enrollments,
                            capacity = row.event.capacity,
                            "Owned event"
                        );
                    }
                    report(s.notification.as_ref());
                })
                .await;
        },
        Screen::EventEnrollments(event_id) => {
            let store = Store::new(
                EventEnrollmentsState::new(viewer, event_id),
                EventEnrollmentsReducer::default(),
                env,
            );
            store.send(EventEnrollmentsAction::Load).await;
            store
                .state(|s| {
                    let stats = s.stats();
                    info!(
                        %event_id,
                        pending = stats.pending,
                        confirmed = stats.confirmed,
                        canceled = stats.canceled,
                        "Enrollments"
                    );
                    report(s.notification.as_ref());
                })
                .await;
        },
        Screen::Login | Screen::Register | Screen::Profile => {
            info!(?screen, "Nothing to load");
        },
    }
}

fn report(notification: Option<&eventos_app::Notification>) {
    if let Some(notification) = notification {
        warn!(level = ?notification.level, message = %notification.message, "Notification");
    }
}

fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
