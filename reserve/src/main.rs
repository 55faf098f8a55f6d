//! Blu Reserve terminal client
//!
//! Line-oriented front-end for the seat booking session.
//!
//! # Usage
//!
//! ```bash
//! # In-memory office floor with simulated latency
//! cargo run --bin blu-reserve
//!
//! # Against a booking backend
//! BLU_RESERVE_PROVIDER=http BLU_RESERVE_API_URL=http://localhost:8000 cargo run --bin blu-reserve
//! ```

use anyhow::Context;
use blu_reserve::cli::{Command, HELP, is_affirmative};
use blu_reserve::http::HttpBookingApi;
use blu_reserve::memory::{InMemoryBookingApi, SimulatedLatency};
use blu_reserve::{
    BookingEnvironment, BookingSession, Config, ConfirmationGate, EmployeeDirectory,
    Notification, NotificationSink, ProviderKind, Renderer, SeatBookingApi, SeatMapView,
};
use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Stdin shared by the command loop and the confirmation prompt
type Input = Arc<Mutex<Lines<BufReader<Stdin>>>>;

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

/// Asks `y/N` on the terminal
struct TerminalGate {
    input: Input,
}

impl ConfirmationGate for TerminalGate {
    fn confirm(&self, question: String) -> Pin<Box<dyn Future<Output = bool> + Send>> {
        let input = Arc::clone(&self.input);
        Box::pin(async move {
            println!("{question}");
            prompt("[y/N] ");
            let mut lines = input.lock().await;
            matches!(lines.next_line().await, Ok(Some(answer)) if is_affirmative(&answer))
        })
    }
}

/// Prints notifications and the seat grid to stdout
struct TerminalPresenter;

impl NotificationSink for TerminalPresenter {
    fn notify(&self, notification: &Notification) {
        println!("[{}] {}", notification.severity, notification.message);
    }
}

impl Renderer for TerminalPresenter {
    fn render(&self, view: &SeatMapView) {
        println!("\n{view}");
    }
}

fn build_api(config: &Config) -> anyhow::Result<Arc<dyn SeatBookingApi>> {
    let provider = &config.provider;
    match provider.kind {
        ProviderKind::Memory => {
            let latency = if provider.simulate_latency {
                SimulatedLatency::realistic()
            } else {
                SimulatedLatency::none()
            };
            Ok(Arc::new(InMemoryBookingApi::new().with_latency(latency)))
        },
        ProviderKind::Http => {
            let mut api = HttpBookingApi::new(&provider.api_url, provider.request_timeout())
                .context("building HTTP client")?;
            if let Some(token) = &provider.api_token {
                api = api.with_api_token(token);
            }
            Ok(Arc::new(api))
        },
    }
}

fn print_employees(directory: &EmployeeDirectory) {
    for (employee, manager) in directory.employees() {
        println!("  {employee}  ->  {} ({})", manager.name, manager.id);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    // Logs go to stderr so they don't interleave with the seat map
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.session.log_level)
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(provider = %config.provider.kind, api_url = %config.provider.api_url, "Configuration loaded");

    let input: Input = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let directory = Arc::new(EmployeeDirectory::office_roster());
    let presenter = Arc::new(TerminalPresenter);

    let environment = BookingEnvironment::new(
        build_api(&config)?,
        Arc::clone(&directory),
        Arc::new(TerminalGate {
            input: Arc::clone(&input),
        }),
    );
    let session = BookingSession::new(environment, presenter.clone(), presenter.clone());

    println!("Blu Reserve: seat booking\n\n{HELP}\n");
    presenter.render(&session.view().await);

    loop {
        prompt("> ");
        let line = {
            let mut lines = input.lock().await;
            lines.next_line().await.context("reading stdin")?
        };
        let Some(line) = line else { break };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(blu_reserve::cli::CommandError::Empty) => continue,
            Err(error) => {
                println!("{error}");
                continue;
            },
        };

        match command {
            Command::Employees => print_employees(&directory),
            Command::Employee(employee_id) => {
                session.select_employee(employee_id).await?;
            },
            Command::Seat(seat_id) => {
                session.select_seat(seat_id).await?;
            },
            Command::Confirm => {
                session.confirm_booking().await?;
            },
            Command::Reset => {
                session.clear_selection().await?;
            },
            Command::Show => presenter.render(&session.view().await),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    tracing::info!("Shutting down");
    session
        .shutdown(config.session.shutdown_timeout())
        .await
        .context("waiting for in-flight operations")?;

    Ok(())
}
