use std::collections::HashSet;

use crate::cli::context::CliContext;
use crate::model::{Id, Person};
use crate::ops::family_ops;
use crate::queries::family_queries;

/// Prints the family as an indented tree, starting from the root member
/// and walking child pointers.
pub fn tree(ctx: &CliContext) {
    let view = match family_queries::family_view(&ctx.conn, ctx.family_key()) {
        Ok(v) => v,
        Err(e) => return ctx.print_error(&e),
    };

    println!("{} ({} members)", view.family.name, view.members.len());
    if view.members.is_empty() {
        return;
    }

    let root_id = view
        .family
        .root
        .person_id
        .filter(|id| view.members.iter().any(|m| m.id == *id))
        .unwrap_or(view.members[0].id);

    let mut printed = HashSet::new();
    print_branch(&view.members, root_id, 1, &mut printed);

    // Members not reachable from the root still get listed.
    for member in &view.members {
        if !printed.contains(&member.id) {
            println!("  {} (unconnected)", member.full_name);
        }
    }
}

fn print_branch(
    members: &[Person],
    id: Id<Person>,
    depth: usize,
    printed: &mut HashSet<Id<Person>>,
) {
    if !printed.insert(id) {
        return;
    }
    let member = match members.iter().find(|m| m.id == id) {
        Some(m) => m,
        None => return,
    };

    let indent = "  ".repeat(depth);
    let spouse = member
        .kinship
        .spouse_id
        .and_then(|sid| members.iter().find(|m| m.id == sid));
    match spouse {
        Some(s) => {
            printed.insert(s.id);
            println!("{}{} + {}", indent, member.full_name, s.full_name);
        }
        None => println!("{}{}", indent, member.full_name),
    }

    let mut child_ids: Vec<Id<Person>> = member.kinship.children_ids.clone();
    if let Some(s) = spouse {
        for c in &s.kinship.children_ids {
            if !child_ids.contains(c) {
                child_ids.push(*c);
            }
        }
    }
    for child_id in child_ids {
        print_branch(members, child_id, depth + 1, printed);
    }
}

/// Prints the hydrated family view as JSON.
pub fn export(ctx: &CliContext) {
    let view = match family_queries::family_view(&ctx.conn, ctx.family_key()) {
        Ok(v) => v,
        Err(e) => return ctx.print_error(&e),
    };
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("Error: {}", e),
    }
}

pub fn rename(ctx: &CliContext, args: &str) {
    let new_name = args.trim();
    if new_name.is_empty() {
        println!("Usage: rename-family <new name>");
        return;
    }
    match family_ops::rename_family(&ctx.conn, ctx.family_key(), new_name) {
        Ok(family) => println!("Family renamed to {}", family.name),
        Err(e) => ctx.print_error(&e),
    }
}

/// Prints the relationship log.
pub fn log(ctx: &CliContext) {
    let view = match family_queries::family_view(&ctx.conn, ctx.family_key()) {
        Ok(v) => v,
        Err(e) => return ctx.print_error(&e),
    };
    if view.relationships.is_empty() {
        println!("No relationships recorded.");
        return;
    }
    let name_of = |id| {
        view.members
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.full_name.clone())
            .unwrap_or_else(|| id.to_string())
    };
    for edge in &view.relationships {
        println!(
            "  {} -> {} ({})",
            name_of(edge.from_id),
            name_of(edge.to_id),
            edge.kind.as_str()
        );
    }
}
