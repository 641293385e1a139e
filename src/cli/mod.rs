pub mod context;
pub mod family_commands;
pub mod member_commands;

use rusqlite::Connection;
use std::path::Path;

use crate::db::{account_repo, schema};
use crate::ops::{account_ops, family_ops};
use context::CliContext;

/// Run the interactive shell.
pub fn run(db_path: &Path) {
    println!("kintree - family tree manager");
    println!("Type 'help' for commands, 'exit' to quit.");
    println!();

    let conn = match Connection::open(db_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            return;
        }
    };

    if let Err(e) = schema::initialize(&conn) {
        eprintln!("Error initializing database: {}", e);
        return;
    }

    let ctx = match load_or_init(conn) {
        Some(ctx) => ctx,
        None => return,
    };

    repl_loop(&ctx);
}

fn load_or_init(conn: Connection) -> Option<CliContext> {
    match account_repo::find_first(&conn) {
        Ok(Some(account)) => {
            println!(
                "Loaded family '{}' for {}",
                account.family_name.as_deref().unwrap_or("(unnamed)"),
                account.username
            );
            Some(CliContext::new(conn, account))
        }
        Ok(None) => {
            println!("No existing family found.");
            init_new_family(conn)
        }
        Err(e) => {
            println!("Error loading data: {}", e);
            None
        }
    }
}

fn init_new_family(conn: Connection) -> Option<CliContext> {
    println!();
    let ctx_reader = |prompt: &str| {
        use std::io::Write;
        print!("{}", prompt);
        std::io::stdout().flush().ok();
        let mut buf = String::new();
        std::io::stdin().read_line(&mut buf).ok()?;
        Some(buf.trim().to_string())
    };

    let username = ctx_reader("Choose a username: ")?;
    if username.is_empty() || username.eq_ignore_ascii_case("exit") {
        return None;
    }

    let family_name = ctx_reader("Family name: ")?;
    if family_name.is_empty() {
        println!("Family name cannot be empty. Please restart and try again.");
        return None;
    }

    // The shell has no auth layer in front of it; a placeholder hash
    // stands in for the collaborator-provided credential.
    let account = match account_ops::register(&conn, &username, "local", None, None) {
        Ok(a) => a,
        Err(e) => {
            println!("Error: {}", e);
            return None;
        }
    };

    match family_ops::create_family(&conn, &account.username, &family_name) {
        Ok(family) => {
            println!("Welcome! Family '{}' has been created.", family.name);
            println!();
        }
        Err(e) => {
            println!("Error: {}", e);
            return None;
        }
    }

    let account = account_repo::find_by_username(&conn, &username).ok().flatten()?;
    Some(CliContext::new(conn, account))
}

fn repl_loop(ctx: &CliContext) {
    loop {
        let input = match ctx.read_line("> ") {
            Some(s) => s,
            None => break,
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, args) = parse_command(input);

        match command {
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,

            "members" | "list" | "ls" => member_commands::list(ctx),
            "add-member" | "add" => member_commands::add(ctx, args),
            "show-member" | "show" | "view" => member_commands::show(ctx, args),
            "edit-member" | "edit" => member_commands::edit(ctx, args),
            "remove-member" | "remove" => member_commands::remove(ctx, args),
            "find" => member_commands::find(ctx, args),
            "removed-members" | "removed" => member_commands::list_removed(ctx),

            "tree" => family_commands::tree(ctx),
            "log" | "relationships" => family_commands::log(ctx),
            "export" => family_commands::export(ctx),
            "rename-family" | "rename" => family_commands::rename(ctx, args),

            _ => {
                println!("Unknown command: {}. Type 'help' for commands.", command);
            }
        }
    }
}

fn parse_command(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (input, ""),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  members                 List active members");
    println!("  add-member [name]       Add a member (prompts for details)");
    println!("  show-member <name>      Show a member's profile and kin");
    println!("  edit-member <name>      Edit a member's profile");
    println!("  remove-member <name>    Remove a member (soft delete)");
    println!("  find <name>             Search members by name");
    println!("  removed-members         List removed members");
    println!("  tree                    Print the family tree");
    println!("  log                     Print the relationship log");
    println!("  export                  Dump the family view as JSON");
    println!("  rename-family <name>    Rename the family");
    println!("  help                    Show this help");
    println!("  exit                    Quit");
}
