use clap::{App, Arg, ArgMatches, SubCommand};

use snapgram_models::{comments::*, medias::*, posts::*, Connection};

fn post_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("post").required(true).help("Id of the post")
}

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("posts")
        .about("Manage posts, their media and their comments")
        .subcommand(
            SubCommand::with_name("new")
                .arg(
                    Arg::with_name("poster")
                        .long("poster")
                        .takes_value(true)
                        .required(true)
                        .help("Id of the user publishing the post"),
                )
                .about("Create an empty post"),
        )
        .subcommand(
            SubCommand::with_name("show")
                .arg(post_arg())
                .about("Print a post, with its poster, media and comments"),
        )
        .subcommand(
            SubCommand::with_name("delete")
                .arg(post_arg())
                .about("Delete a post, with its media and comments"),
        )
        .subcommand(
            SubCommand::with_name("attach")
                .arg(post_arg())
                .arg(
                    Arg::with_name("type")
                        .short("t")
                        .long("type")
                        .takes_value(true)
                        .required(true)
                        .possible_values(&["Picture", "URL", "Video", "Text"])
                        .help("What the media is"),
                )
                .arg(
                    Arg::with_name("url")
                        .short("u")
                        .long("url")
                        .takes_value(true)
                        .required(true)
                        .help("Where the media is"),
                )
                .about("Attach a media to a post"),
        )
        .subcommand(
            SubCommand::with_name("comment")
                .arg(post_arg())
                .arg(
                    Arg::with_name("author")
                        .short("a")
                        .long("author")
                        .takes_value(true)
                        .required(true)
                        .help("Id of the user writing the comment"),
                )
                .arg(
                    Arg::with_name("text")
                        .long("text")
                        .takes_value(true)
                        .help("The comment"),
                )
                .about("Comment on a post"),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("new", Some(x)) => new(x, conn),
        ("show", Some(x)) => show(x, conn),
        ("delete", Some(x)) => delete(x, conn),
        ("attach", Some(x)) => attach(x, conn),
        ("comment", Some(x)) => comment(x, conn),
        ("", None) => command().print_help().unwrap(),
        _ => println!("Unknown subcommand"),
    }
}

fn get_post<'a>(args: &ArgMatches<'a>, conn: &Connection) -> Post {
    Post::get(conn, super::id_arg(args, "post"))
        .unwrap_or_else(|e| super::fail("Couldn't find the post", e))
}

fn new<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let post = Post::insert(
        conn,
        NewPost {
            poster_id: super::id_arg(args, "poster"),
        },
    )
    .unwrap_or_else(|e| super::fail("Couldn't create the post", e));
    print_post(&post, conn);
}

fn show<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    print_post(&get_post(args, conn), conn);
}

fn delete<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    get_post(args, conn)
        .delete(conn)
        .unwrap_or_else(|e| super::fail("Couldn't delete the post", e));
}

fn attach<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let post = get_post(args, conn);
    let media_type = args
        .value_of("type")
        .unwrap_or_default()
        .parse::<MediaType>()
        .unwrap_or_else(|e| super::fail("Invalid media type", e));
    Media::insert(
        conn,
        NewMedia {
            media_type,
            url: args.value_of("url").unwrap_or_default().to_owned(),
            post_id: post.id,
        },
    )
    .unwrap_or_else(|e| super::fail("Couldn't attach the media", e));
    print_post(&post, conn);
}

fn comment<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let post = get_post(args, conn);
    let comment_text = args
        .value_of("text")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Comment"));
    Comment::insert(
        conn,
        NewComment {
            comment_text,
            author_id: super::id_arg(args, "author"),
            post_id: post.id,
        },
    )
    .unwrap_or_else(|e| super::fail("Couldn't add the comment", e));
    print_post(&post, conn);
}

fn print_post(post: &Post, conn: &Connection) {
    let view = post
        .serialize(conn)
        .unwrap_or_else(|e| super::fail("Couldn't load the post", e));
    super::print_json(&view);
}
