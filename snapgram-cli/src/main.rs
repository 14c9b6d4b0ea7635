use clap::App;
use snapgram_models::db_conn::{init_pool, DbConn};
use std::io::{self, prelude::*};
use tracing::info;

mod follows;
mod posts;
mod tables;
mod users;

fn main() {
    // stdout is kept for the JSON output
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let mut app = App::new("Snapgram CLI")
        .bin_name("sgm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Collection of tools to manage a Snapgram database.")
        .subcommand(follows::command())
        .subcommand(posts::command())
        .subcommand(tables::command())
        .subcommand(users::command());
    let matches = app.clone().get_matches();

    match dotenv::dotenv() {
        Ok(path) => info!("Configuration read from {}", path.display()),
        Err(ref e) if e.not_found() => eprintln!("no .env was found"),
        e => e.map(|_| ()).unwrap(),
    }
    let conn = init_pool()
        .ok_or(())
        .and_then(|pool| DbConn::from_pool(&pool).map_err(|_| ()));

    match matches.subcommand() {
        ("follows", Some(args)) => {
            follows::run(args, &conn.expect("Couldn't connect to the database."))
        }
        ("posts", Some(args)) => posts::run(args, &conn.expect("Couldn't connect to the database.")),
        ("tables", Some(args)) => {
            tables::run(args, &conn.expect("Couldn't connect to the database."))
        }
        ("users", Some(args)) => users::run(args, &conn.expect("Couldn't connect to the database.")),
        _ => app.print_help().expect("Couldn't print help"),
    };
}

pub fn ask_for(something: &str) -> String {
    print!("{}: ", something);
    io::stdout().flush().expect("Couldn't flush STDOUT");
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .expect("Unable to read line");
    input.retain(|c| c != '\n');
    input
}

/// Reports a failed operation and exits.
pub fn fail(what: &str, err: snapgram_models::Error) -> ! {
    eprintln!("{}: {}", what, err);
    std::process::exit(1)
}

/// Parses an id argument, or exits with a message naming it.
pub fn id_arg(args: &clap::ArgMatches<'_>, name: &str) -> i32 {
    args.value_of(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("{} must be a number", name);
            std::process::exit(1)
        })
}

pub fn print_json<T: serde::Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("Couldn't serialize the result")
    );
}
