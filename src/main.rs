use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_booking::api::showtimes::ShowtimeQuery;
use cinema_booking::api::ApiClient;
use cinema_booking::booking::{BookingFlow, BookingError, ShowtimeContext};
use cinema_booking::config::Config;
use cinema_booking::models::{Cinema, SeatStatus, Showtime};
use cinema_booking::pages::cinemas::{CinemaForm, CinemaList};
use cinema_booking::pages::showtimes::{ShowtimeForm, ShowtimeList, SimpleShowtimeForm};
use cinema_booking::pages::PageError;

#[derive(Parser)]
#[command(name = "cinema-booking", about = "Cinema ticket booking client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage cinemas
    Cinemas {
        #[command(subcommand)]
        action: CinemaAction,
    },
    /// Manage and query showtimes
    Showtimes {
        #[command(subcommand)]
        action: ShowtimeAction,
    },
    /// Print the seat chart for a showtime
    Seats { showtime_id: i64 },
    /// Pick seats for a showtime and book them
    Book {
        showtime_id: i64,
        /// Comma-separated seat ids, e.g. --seats 1,3,12
        #[arg(long, value_delimiter = ',', required = true)]
        seats: Vec<i64>,
        /// Movie title to show on the confirmation
        #[arg(long)]
        title: Option<String>,
    },
}

#[derive(Subcommand)]
enum CinemaAction {
    /// List cinemas, optionally filtered client-side
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a cinema
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        postcode: String,
        #[arg(long, default_value = "UK")]
        country: String,
        #[arg(long, default_value_t = 1)]
        screens: u32,
    },
    /// Edit a cinema (unset flags keep the current values)
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        postcode: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        screens: Option<u32>,
    },
    /// Delete a cinema
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ShowtimeAction {
    /// List showtimes, optionally filtered client-side
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Server-side title search
    Search { q: String },
    /// Showtimes for one cinema within a time window
    Window {
        #[arg(long)]
        cinema_id: i64,
        /// Local datetime, e.g. 2026-09-01T18:00
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Combined filter; all parts optional
    Filter {
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        cinema_id: Option<i64>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Showtimes for one cinema
    ByCinema { cinema_id: i64 },
    /// Create a showtime (canonical endpoint)
    Add {
        #[arg(long)]
        movie_title: String,
        #[arg(long, default_value_t = 1)]
        screen: u32,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long, default_value_t = 10.0)]
        price: f64,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        cinema_id: i64,
    },
    /// Create a showtime resolving the cinema by name
    AddSimple {
        #[arg(long)]
        movie_title: String,
        #[arg(long)]
        cinema_name: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Delete a showtime
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = ApiClient::new(&config.api);
    let cli = Cli::parse();

    match cli.command {
        Command::Cinemas { action } => run_cinemas(&client, action).await,
        Command::Showtimes { action } => run_showtimes(&client, action).await,
        Command::Seats { showtime_id } => show_seats(&client, showtime_id).await,
        Command::Book {
            showtime_id,
            seats,
            title,
        } => book(&client, showtime_id, &seats, title).await,
    }
}

async fn run_cinemas(client: &ApiClient, action: CinemaAction) -> anyhow::Result<()> {
    let mut page = CinemaList::new();
    match action {
        CinemaAction::List { search } => {
            page.load(client).await?;
            let rows = page.filter(search.as_deref().unwrap_or(""));
            print_cinemas(&rows);
        }
        CinemaAction::Add {
            name,
            email,
            phone,
            address,
            city,
            postcode,
            country,
            screens,
        } => {
            let form = CinemaForm {
                name,
                email,
                phone,
                address,
                city,
                postcode,
                country,
                state_or_province: None,
                total_screens: screens,
            };
            page.create(client, &form).await.map_err(render_page_error)?;
            if let Some(notice) = page.take_notice() {
                println!("{notice}");
            }
        }
        CinemaAction::Edit {
            id,
            name,
            email,
            phone,
            address,
            city,
            postcode,
            country,
            screens,
        } => {
            page.load(client).await?;
            let current = page
                .items()
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| anyhow!("no cinema with id {id}"))?;
            // PUT needs the full entity, so start from the current one
            let mut form = CinemaForm::from_cinema(current);
            if let Some(v) = name {
                form.name = v;
            }
            if let Some(v) = email {
                form.email = v;
            }
            if let Some(v) = phone {
                form.phone = v;
            }
            if let Some(v) = address {
                form.address = v;
            }
            if let Some(v) = city {
                form.city = v;
            }
            if let Some(v) = postcode {
                form.postcode = v;
            }
            if let Some(v) = country {
                form.country = v;
            }
            if let Some(v) = screens {
                form.total_screens = v;
            }
            page.update(client, id, &form).await.map_err(render_page_error)?;
            if let Some(notice) = page.take_notice() {
                println!("{notice}");
            }
        }
        CinemaAction::Delete { id, yes } => {
            page.load(client).await?;
            let name = page
                .items()
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
                .ok_or_else(|| anyhow!("no cinema with id {id}"))?;
            if !yes && !confirm(&format!("Delete cinema \"{name}\"?")) {
                return Ok(());
            }
            page.delete(client, id).await?;
            println!("Cinema \"{name}\" deleted");
        }
    }
    Ok(())
}

async fn run_showtimes(client: &ApiClient, action: ShowtimeAction) -> anyhow::Result<()> {
    let mut page = ShowtimeList::new();
    match action {
        ShowtimeAction::List { search } => {
            page.load(client).await?;
            let rows = page.filter_local(search.as_deref().unwrap_or(""));
            print_showtimes(&rows);
        }
        ShowtimeAction::Search { q } => {
            page.search(client, &q).await?;
            print_showtimes(&page.rows().iter().collect::<Vec<_>>());
        }
        ShowtimeAction::Window {
            cinema_id,
            from,
            to,
        } => {
            page.window(client, cinema_id, parse_local(&from)?, parse_local(&to)?)
                .await?;
            print_showtimes(&page.rows().iter().collect::<Vec<_>>());
        }
        ShowtimeAction::Filter {
            q,
            cinema_id,
            from,
            to,
        } => {
            let query = ShowtimeQuery {
                q,
                cinema_id,
                from: from.as_deref().map(parse_local).transpose()?,
                to: to.as_deref().map(parse_local).transpose()?,
            };
            page.apply_filter(client, &query).await?;
            print_showtimes(&page.rows().iter().collect::<Vec<_>>());
        }
        ShowtimeAction::ByCinema { cinema_id } => {
            page.by_cinema(client, cinema_id).await?;
            print_showtimes(&page.rows().iter().collect::<Vec<_>>());
        }
        ShowtimeAction::Add {
            movie_title,
            screen,
            start,
            end,
            price,
            language,
            format,
            cinema_id,
        } => {
            let form = ShowtimeForm {
                movie_title,
                screen_number: screen,
                start_time: parse_utc(&start)?,
                end_time: parse_utc(&end)?,
                ticket_price: price,
                language,
                format,
                cinema_id,
            };
            page.create(client, &form).await.map_err(render_page_error)?;
            if let Some(notice) = page.take_notice() {
                println!("{notice}");
            }
        }
        ShowtimeAction::AddSimple {
            movie_title,
            cinema_name,
            start,
            end,
        } => {
            let form = SimpleShowtimeForm {
                movie_title,
                cinema_name,
                start_time: parse_utc(&start)?,
                end_time: parse_utc(&end)?,
            };
            page.create_simple(client, &form)
                .await
                .map_err(render_page_error)?;
            if let Some(notice) = page.take_notice() {
                println!("{notice}");
            }
        }
        ShowtimeAction::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete showtime {id}?")) {
                return Ok(());
            }
            page.load(client).await?;
            page.delete(client, id).await?;
            println!("Showtime {id} deleted");
        }
    }
    Ok(())
}

async fn show_seats(client: &ApiClient, showtime_id: i64) -> anyhow::Result<()> {
    let mut flow = BookingFlow::new(showtime_id, ShowtimeContext::default());
    flow.load(client).await?;
    print_chart(&flow);
    Ok(())
}

async fn book(
    client: &ApiClient,
    showtime_id: i64,
    seats: &[i64],
    title: Option<String>,
) -> anyhow::Result<()> {
    let mut flow = BookingFlow::new(
        showtime_id,
        ShowtimeContext {
            movie_title: title,
            ..Default::default()
        },
    );
    flow.load(client).await?;

    for &seat_id in seats {
        if !flow.toggle(seat_id) {
            bail!("seat {seat_id} is already booked or does not exist in this seat map");
        }
    }

    match flow.submit(client).await {
        Ok(confirmation) => {
            println!("Thank you for your booking");
            if let Some(movie) = &confirmation.movie_title {
                println!("Your tickets for {movie} have been reserved.");
            }
            println!("Number of seats: {}", confirmation.seat_count);
            Ok(())
        }
        Err(BookingError::EmptySelection) => bail!("select at least one seat"),
        Err(BookingError::Api(e)) => {
            // the map was refreshed by the flow; show what is still free
            eprintln!("Booking failed: {e}");
            eprintln!("Current seat map:");
            print_chart(&flow);
            Err(e.into())
        }
    }
}

fn print_cinemas(rows: &[&Cinema]) {
    if rows.is_empty() {
        println!("No cinemas yet.");
        return;
    }
    for c in rows {
        println!(
            "{:>4}  {:<28} {:<24} {:<14} {:<10} {}",
            c.id, c.name, c.address, c.city, c.postcode, c.email
        );
    }
    println!("{} result(s)", rows.len());
}

fn print_showtimes(rows: &[&Showtime]) {
    if rows.is_empty() {
        println!("No showtimes yet.");
        return;
    }
    for s in rows {
        let cinema = s
            .cinema_name
            .clone()
            .or_else(|| s.cinema_id.map(|id| format!("cinema {id}")))
            .unwrap_or_default();
        println!(
            "{:>4}  {:<28} {:<20} {} → {}  £{:.2} {} {}",
            s.id,
            s.movie_title,
            cinema,
            s.start_time.format("%Y-%m-%d %H:%M"),
            s.end_time.format("%H:%M"),
            s.ticket_price,
            s.language.as_deref().unwrap_or("—"),
            s.format.as_deref().unwrap_or("—"),
        );
    }
    println!("{} result(s)", rows.len());
}

fn print_chart(flow: &BookingFlow) {
    for row in flow.rows() {
        print!("{:<4}", row.label);
        for seat in &row.seats {
            match seat.status {
                SeatStatus::Booked => print!(" [ x:{:>3}]", seat.seat_id),
                SeatStatus::Free if flow.selection().contains(seat.seat_id) => {
                    print!(" [ *:{:>3}]", seat.seat_id)
                }
                SeatStatus::Free => print!(" [{:>2}:{:>3}]", seat.seat_number, seat.seat_id),
            }
        }
        println!();
    }
}

fn confirm(prompt: &str) -> bool {
    use std::io::Write;
    print!("{prompt} [y/N] ");
    std::io::stdout().flush().ok();
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

fn parse_local(value: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .with_context(|| format!("invalid datetime \"{value}\", expected e.g. 2026-09-01T18:00"))
}

fn parse_utc(value: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(Utc.from_utc_datetime(&parse_local(value)?))
}

/// Flattens a page error into something printable, with the per-field
/// validation messages inline.
fn render_page_error(err: PageError) -> anyhow::Error {
    let fields = err.field_messages();
    if fields.is_empty() {
        return anyhow!(err);
    }
    let lines: Vec<String> = fields
        .iter()
        .map(|(field, message)| format!("  {field}: {message}"))
        .collect();
    anyhow!("{}\n{}", err, lines.join("\n"))
}
