use clap::{App, Arg, ArgMatches, SubCommand};

use diesel::Connection as _;
use snapgram_models::{followers::Follower, users::*, Connection};
use std::io::{self, Write};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("users")
        .about("Manage users")
        .subcommand(
            SubCommand::with_name("new")
                .arg(
                    Arg::with_name("email")
                        .short("e")
                        .long("email")
                        .takes_value(true)
                        .help("Email address of the new user"),
                )
                .arg(
                    Arg::with_name("password")
                        .short("p")
                        .long("password")
                        .takes_value(true)
                        .help("The password of the new user"),
                )
                .arg(
                    Arg::with_name("inactive")
                        .long("inactive")
                        .help("Creates the account as inactive"),
                )
                .about("Create a new user"),
        )
        .subcommand(
            SubCommand::with_name("show")
                .arg(Arg::with_name("id").required(true).help("Id of the user"))
                .about("Print a user"),
        )
        .subcommand(
            SubCommand::with_name("delete")
                .arg(Arg::with_name("id").required(true).help("Id of the user"))
                .arg(
                    Arg::with_name("unfollow")
                        .long("unfollow")
                        .help("Also remove the follower edges the user is part of"),
                )
                .about("Delete a user, with all their posts and comments"),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("new", Some(x)) => new(x, conn),
        ("show", Some(x)) => show(x, conn),
        ("delete", Some(x)) => delete(x, conn),
        ("", None) => command().print_help().unwrap(),
        _ => println!("Unknown subcommand"),
    }
}

fn new<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let email = args
        .value_of("email")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Email address"));
    let password = args.value_of("password").map(String::from).unwrap_or_else(|| {
        print!("Password: ");
        io::stdout().flush().expect("Couldn't flush STDOUT");
        rpassword::read_password().expect("Couldn't read your password.")
    });

    let user = User::insert(
        conn,
        NewUser {
            email,
            password,
            is_active: !args.is_present("inactive"),
        },
    )
    .unwrap_or_else(|e| super::fail("Couldn't create the user", e));
    super::print_json(&user.serialize());
}

fn show<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let user = User::get(conn, super::id_arg(args, "id"))
        .unwrap_or_else(|e| super::fail("Couldn't find the user", e));
    super::print_json(&user.serialize());
}

fn delete<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let user = User::get(conn, super::id_arg(args, "id"))
        .unwrap_or_else(|e| super::fail("Couldn't find the user", e));
    let res = if args.is_present("unfollow") {
        conn.transaction(|| {
            Follower::delete_for_user(conn, user.id)?;
            user.delete(conn)
        })
    } else {
        user.delete(conn)
    };

    if let Err(e) = res {
        let edges = Follower::list_from(conn, user.id).map_or(0, |f| f.len())
            + Follower::list_to(conn, user.id).map_or(0, |f| f.len());
        if edges > 0 {
            eprintln!(
                "This user is part of {} follower edges, use --unfollow to remove them too",
                edges
            );
        }
        super::fail("Couldn't delete the user", e)
    }
}
