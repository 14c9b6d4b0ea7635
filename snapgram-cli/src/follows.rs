use clap::{App, Arg, ArgMatches, SubCommand};

use snapgram_models::{followers::*, Connection};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    let edge = |name: &'a str, about: &'a str| {
        SubCommand::with_name(name)
            .arg(
                Arg::with_name("from")
                    .required(true)
                    .help("Id of the user who follows"),
            )
            .arg(
                Arg::with_name("to")
                    .required(true)
                    .help("Id of the user being followed"),
            )
            .about(about)
    };
    SubCommand::with_name("follows")
        .about("Manage who follows who")
        .subcommand(edge("add", "Make a user follow another one"))
        .subcommand(edge("remove", "Make a user stop following another one"))
        .subcommand(
            SubCommand::with_name("list")
                .arg(Arg::with_name("user").required(true).help("Id of the user"))
                .about("Print the edges pointing to a user"),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("add", Some(x)) => add(x, conn),
        ("remove", Some(x)) => remove(x, conn),
        ("list", Some(x)) => list(x, conn),
        ("", None) => command().print_help().unwrap(),
        _ => println!("Unknown subcommand"),
    }
}

fn add<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let edge = Follower::insert(
        conn,
        NewFollower {
            user_from_id: super::id_arg(args, "from"),
            user_to_id: super::id_arg(args, "to"),
        },
    )
    .unwrap_or_else(|e| super::fail("Couldn't follow", e));
    let view = edge
        .serialize(conn)
        .unwrap_or_else(|e| super::fail("Couldn't load the users", e));
    super::print_json(&view);
}

fn remove<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    Follower::find(conn, super::id_arg(args, "from"), super::id_arg(args, "to"))
        .and_then(|edge| edge.delete(conn))
        .unwrap_or_else(|e| super::fail("Couldn't unfollow", e));
}

fn list<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let views = Follower::list_to(conn, super::id_arg(args, "user"))
        .and_then(|edges| edges.iter().map(|e| e.serialize(conn)).collect::<Result<Vec<_>, _>>())
        .unwrap_or_else(|e| super::fail("Couldn't list the followers", e));
    super::print_json(&views);
}
