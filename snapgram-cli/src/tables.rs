use clap::{App, ArgMatches, SubCommand};

use snapgram_models::{tables, Connection};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("tables")
        .about("Manage the database tables")
        .subcommand(SubCommand::with_name("create").about("Create the missing tables"))
        .subcommand(
            SubCommand::with_name("drop").about("Drop all the tables, with everything they hold"),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("create", Some(_)) => tables::create_all(conn)
            .unwrap_or_else(|e| super::fail("Couldn't create the tables", e)),
        ("drop", Some(_)) => {
            tables::drop_all(conn).unwrap_or_else(|e| super::fail("Couldn't drop the tables", e))
        }
        ("", None) => command().print_help().unwrap(),
        _ => println!("Unknown subcommand"),
    }
}
