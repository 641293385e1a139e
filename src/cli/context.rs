use rusqlite::Connection;
use std::io::{self, Write};

use crate::db::family_repo;
use crate::error::{KinError, KinResult};
use crate::model::{Account, Family, Person};
use crate::queries::person_queries;

pub struct CliContext {
    pub conn: Connection,
    pub account: Account,
}

impl CliContext {
    pub fn new(conn: Connection, account: Account) -> Self {
        Self { conn, account }
    }

    pub fn family_key(&self) -> &str {
        &self.account.username
    }

    /// Loads the owning family fresh; member sets change under every
    /// add/remove, so nothing is cached.
    pub fn family(&self) -> KinResult<Family> {
        family_repo::find_by_key(&self.conn, self.family_key())?
            .ok_or_else(|| KinError::not_found("Family", self.family_key()))
    }

    /// Prompt and read a line from stdin. Returns None on EOF.
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches('\n').trim_end_matches('\r').to_string()),
            Err(_) => None,
        }
    }

    /// Read a line, trimmed.
    pub fn prompt(&self, prompt: &str) -> Option<String> {
        self.read_line(prompt).map(|s| s.trim().to_string())
    }

    /// Find an active member by name query. Prints an error if not found
    /// or ambiguous.
    pub fn find_member(&self, args: &str) -> Option<Person> {
        let query = args.trim();
        if query.is_empty() {
            return None;
        }

        let family = match self.family() {
            Ok(f) => f,
            Err(e) => {
                self.print_error(&e);
                return None;
            }
        };
        let members =
            person_queries::active_members(&self.conn, family.id).unwrap_or_default();
        let lower = query.to_lowercase();
        let matches: Vec<&Person> = members
            .iter()
            .filter(|p| {
                p.full_name.to_lowercase().contains(&lower)
                    || p.nick_name
                        .as_ref()
                        .map(|n| n.to_lowercase().contains(&lower))
                        .unwrap_or(false)
            })
            .collect();

        match matches.len() {
            0 => {
                println!("No member found matching '{}'", query);
                None
            }
            1 => Some(matches[0].clone()),
            _ => {
                if let Some(exact) = matches
                    .iter()
                    .find(|p| p.full_name.eq_ignore_ascii_case(query))
                {
                    return Some((*exact).clone());
                }
                println!("Multiple matches found:");
                for p in &matches {
                    println!("  {}", p.full_name);
                }
                println!("Please be more specific.");
                None
            }
        }
    }

    /// Print an error.
    pub fn print_error(&self, e: &KinError) {
        println!("Error: {}", e);
    }
}
