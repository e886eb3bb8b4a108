//! Subcommand dispatch and output rendering.

use std::net::SocketAddr;
use std::time::Duration;

use tracing::debug;

use slotbook_protocol::{Booking, Day, QueryRequest, Request, Response, Update};

use crate::channel::{InvocationChannel, RetryPolicy};
use crate::cli::{Cli, Command};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::monitor::MonitorSession;

/// Runs the parsed command line to completion.
pub async fn run(cli: Cli) -> ClientResult<()> {
    let config = if let Some(ref path) = cli.config {
        ClientConfig::load_from(path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().map_err(ClientError::Config)?
    };

    // CLI flags win over the config file.
    let mut settings = config.server;
    if let Some(server) = cli.server {
        settings.address = server;
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout = timeout;
    }
    if let Some(retries) = cli.retries {
        settings.retries = retries;
    }
    if let Some(semantics) = cli.semantics {
        settings.semantics = semantics;
    }

    let server: SocketAddr = settings
        .address
        .parse()
        .map_err(|_| ClientError::InvalidAddress(settings.address.clone()))?;
    let policy = RetryPolicy {
        timeout: Duration::from_secs(settings.timeout),
        retries: settings.retries,
        semantics: settings.semantics,
    };
    debug!(%server, ?policy, "dispatching command");
    let mut channel = InvocationChannel::connect(server, policy).await?;

    match cli.command {
        Command::Query { name, days } => {
            let days = days
                .iter()
                .map(|day| day.parse::<Day>())
                .collect::<Result<Vec<_>, _>>()?;
            let request = QueryRequest {
                name,
                days: days.clone(),
            };
            let response = channel.invoke(&Request::from(request)).await?;
            render(&response, &days)
        }

        Command::Book {
            name,
            day,
            start_slot,
            num_slots,
            user_id,
        } => {
            let booking = Booking {
                facility_name: name,
                day: day.parse()?,
                start_slot,
                num_slots,
                user_id,
            };
            let response = channel.invoke(&Request::from(booking)).await?;
            render(&response, &[])
        }

        Command::Update {
            confirmation_id,
            offset,
        } => {
            let update = Update {
                confirmation_id,
                offset,
            };
            let response = channel.invoke(&Request::from(update)).await?;
            render(&response, &[])
        }

        Command::Monitor { duration } => {
            println!("Monitoring for {duration} seconds...");
            let stats = MonitorSession::new(&mut channel)
                .run(duration, |record| println!("{record}"))
                .await?;
            println!(
                "Monitoring ended: {} update(s) received.",
                stats.records
            );
            Ok(())
        }
    }
}

/// Prints whichever response arrived. The channel has already warned about
/// any header mismatch; the payload is still rendered rather than dropped.
fn render(response: &Response, days: &[Day]) -> ClientResult<()> {
    match response {
        Response::Query(query) => {
            if days.is_empty() {
                println!(
                    "Received schedule data for an unknown day set ({} bytes).",
                    query.available.len()
                );
            } else {
                for (day, schedule) in query.day_schedules(days)? {
                    println!("\n{day}:");
                    print!("{schedule}");
                }
            }
        }
        Response::Book(booking) => {
            if booking.confirmation_id == 0 {
                println!("Booking rejected: {}", booking.message);
            } else {
                println!(
                    "Booking confirmed (confirmation id {}): {}",
                    booking.confirmation_id, booking.message
                );
            }
        }
        Response::Update(update) => {
            if update.is_success() {
                println!("Update applied: {}", update.message);
            } else {
                println!("Update failed: {}", update.message);
            }
        }
    }
    Ok(())
}
