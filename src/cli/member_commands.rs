use chrono::NaiveDate;

use crate::cli::context::CliContext;
use crate::model::{Gender, MemberDraft};
use crate::ops::member_ops;
use crate::queries::person_queries;

pub fn list(ctx: &CliContext) {
    let family = match ctx.family() {
        Ok(f) => f,
        Err(e) => return ctx.print_error(&e),
    };
    let members = person_queries::active_members(&ctx.conn, family.id).unwrap_or_default();
    if members.is_empty() {
        println!("No members yet. Use 'add-member' to add the first one.");
        return;
    }

    println!("Members of {} ({}):", family.name, members.len());
    println!();
    for member in &members {
        let gender = member.gender.as_str().to_lowercase();
        let spouse = member
            .kinship
            .spouse_id
            .and_then(|id| members.iter().find(|m| m.id == id))
            .map(|s| format!(" - spouse: {}", s.full_name))
            .unwrap_or_default();
        println!("  {} ({}){}", member.full_name, gender, spouse);
    }
}

pub fn list_removed(ctx: &CliContext) {
    let family = match ctx.family() {
        Ok(f) => f,
        Err(e) => return ctx.print_error(&e),
    };
    let members = person_queries::removed_members(&ctx.conn, family.id).unwrap_or_default();
    if members.is_empty() {
        println!("No removed members.");
        return;
    }
    println!("Removed members ({}):", members.len());
    for member in &members {
        println!("  {}", member.full_name);
    }
}

pub fn add(ctx: &CliContext, args: &str) {
    println!("Adding a member (press Enter to skip optional fields)");
    println!();

    let name = if !args.is_empty() {
        args.to_string()
    } else {
        match ctx.prompt("Full name (required): ") {
            Some(s) if s.is_empty() => {
                println!("Full name is required.");
                return;
            }
            Some(s) => s,
            None => return,
        }
    };

    let mut draft = MemberDraft::new(name);

    if let Some(g) = ctx.prompt("Gender (male/female/other): ") {
        if !g.is_empty() {
            match Gender::parse(&g) {
                Some(gender) => draft.gender = Some(gender),
                None => println!("Unknown gender, leaving unset."),
            }
        }
    }

    if let Some(b) = ctx.prompt("Birthday (YYYY-MM-DD): ") {
        if !b.is_empty() {
            match NaiveDate::parse_from_str(&b, "%Y-%m-%d") {
                Ok(date) => draft.birth_day = Some(date),
                Err(_) => println!("Invalid date format, skipping."),
            }
        }
    }

    let mut anchor = None;
    let mut relation = None;
    if let Some(who) = ctx.prompt("Relate to existing member (name, blank for none): ") {
        if !who.is_empty() {
            match ctx.find_member(&who) {
                Some(existing) => {
                    let rel = ctx
                        .prompt("Relationship (child/mother/father/parent/spouse): ")
                        .unwrap_or_default();
                    if rel.is_empty() {
                        println!("Relationship is required when an anchor is given.");
                        return;
                    }
                    anchor = Some(existing.id);
                    relation = Some(rel);
                }
                None => return,
            }
        }
    }

    match member_ops::add_member(
        &ctx.conn,
        ctx.family_key(),
        draft,
        anchor,
        relation.as_deref(),
    ) {
        Ok(person) => println!("Added {}", person.full_name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn show(ctx: &CliContext, args: &str) {
    let member = match ctx.find_member(args) {
        Some(m) => m,
        None => return,
    };
    let family = match ctx.family() {
        Ok(f) => f,
        Err(e) => return ctx.print_error(&e),
    };
    let members = person_queries::active_members(&ctx.conn, family.id).unwrap_or_default();
    let name_of = |id| {
        members
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.full_name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    println!("{}", member.full_name);
    if let Some(nick) = &member.nick_name {
        println!("  nickname: {}", nick);
    }
    println!("  gender: {}", member.gender.as_str().to_lowercase());
    if let Some(birthday) = member.birth_day {
        println!("  birthday: {}", birthday);
    }
    if let Some(bio) = &member.bio {
        println!("  bio: {}", bio);
    }
    if let Some(spouse) = member.kinship.spouse_id {
        println!("  spouse: {}", name_of(spouse));
    }
    if let Some(mother) = member.kinship.mother_id {
        println!("  mother: {}", name_of(mother));
    }
    if let Some(father) = member.kinship.father_id {
        println!("  father: {}", name_of(father));
    }
    if !member.kinship.children_ids.is_empty() {
        let names: Vec<String> = member
            .kinship
            .children_ids
            .iter()
            .map(|id| name_of(*id))
            .collect();
        println!("  children: {}", names.join(", "));
    }
}

pub fn edit(ctx: &CliContext, args: &str) {
    let member = match ctx.find_member(args) {
        Some(m) => m,
        None => return,
    };

    println!("Editing {} (press Enter to keep current values)", member.full_name);

    let mut draft = MemberDraft::new(member.full_name.clone());
    draft.gender = Some(member.gender);
    draft.nick_name = member.nick_name.clone();
    draft.mobile = member.mobile.clone();
    draft.email = member.email.clone();
    draft.image_url = member.image_url.clone();
    draft.bio = member.bio.clone();
    draft.blood_group = member.blood_group.clone();
    draft.birth_day = member.birth_day;
    draft.marriage_anniversary = member.marriage_anniversary;
    draft.job = member.job.clone();
    draft.education = member.education.clone();
    draft.death_anniversary = member.death_anniversary;

    if let Some(name) = ctx.prompt("Full name: ") {
        if !name.is_empty() {
            draft.full_name = name;
        }
    }
    if let Some(nick) = ctx.prompt("Nickname: ") {
        if !nick.is_empty() {
            draft.nick_name = Some(nick);
        }
    }
    if let Some(bio) = ctx.prompt("Bio: ") {
        if !bio.is_empty() {
            draft.bio = Some(bio);
        }
    }

    match member_ops::update_member(&ctx.conn, member.id, draft) {
        Ok(updated) => println!("Updated {}", updated.full_name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn remove(ctx: &CliContext, args: &str) {
    let member = match ctx.find_member(args) {
        Some(m) => m,
        None => return,
    };

    let confirm = ctx
        .prompt(&format!("Remove {} from the family? (y/N): ", member.full_name))
        .unwrap_or_default();
    if !confirm.eq_ignore_ascii_case("y") {
        println!("Cancelled.");
        return;
    }

    match member_ops::remove_member(&ctx.conn, ctx.family_key(), member.id) {
        Ok(()) => println!("Removed {}", member.full_name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn find(ctx: &CliContext, args: &str) {
    let query = args.trim();
    if query.is_empty() {
        println!("Usage: find <name>");
        return;
    }
    let family = match ctx.family() {
        Ok(f) => f,
        Err(e) => return ctx.print_error(&e),
    };
    match person_queries::find_by_name(&ctx.conn, family.id, query) {
        Ok(members) if members.is_empty() => println!("No members matching '{}'", query),
        Ok(members) => {
            for member in &members {
                println!("  {}", member.full_name);
            }
        }
        Err(e) => ctx.print_error(&e),
    }
}
