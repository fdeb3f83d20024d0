//! Contact commands - list, search, add, edit, rm, fav, notes

use anyhow::Result;
use chrono::Utc;

use cardfile_core::{Category, Contact, ContactDraft, SearchFilters};

use super::get_context;
use crate::output;

fn print_contacts(contacts: &[Contact], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(contacts)?);
        return Ok(());
    }

    if contacts.is_empty() {
        output::info("No contacts found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["", "ID", "Name", "Email", "Phone", "Category", "Last contacted"]);
    for contact in contacts {
        let star = if contact.is_favorite { "★" } else { "" };
        let last = contact
            .last_contacted
            .map(|t| t.format("%b %d, %Y").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        table.add_row(vec![
            star,
            &contact.id,
            &contact.name,
            &contact.email,
            &contact.phone,
            contact.category.as_str(),
            &last,
        ]);
    }
    println!("{}", table);
    Ok(())
}

pub fn list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    print_contacts(ctx.contacts.contacts(), json)
}

pub fn search(
    query: &str,
    category: Option<Category>,
    favorites: bool,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let filters = SearchFilters {
        category,
        favorites_only: favorites,
    };
    let results = ctx.contacts.search(query, &filters);
    print_contacts(&results, json)
}

#[allow(clippy::too_many_arguments)]
pub fn add(
    name: &str,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    category: Option<Category>,
    notes: Option<String>,
    favorite: bool,
) -> Result<()> {
    let mut ctx = get_context()?;
    let draft = ContactDraft {
        name: name.to_string(),
        email: email.unwrap_or_default(),
        phone: phone.unwrap_or_default(),
        address: address.unwrap_or_default(),
        category: category.unwrap_or_default(),
        notes: notes.unwrap_or_default(),
        is_favorite: favorite,
        last_contacted: None,
    };
    ctx.contacts.create(&mut ctx.session, &draft);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn edit(
    id: &str,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    category: Option<Category>,
    touch: bool,
) -> Result<()> {
    let mut ctx = get_context()?;
    let Some(current) = ctx.contacts.get(id) else {
        output::error("Contact not found!");
        return Ok(());
    };

    // Full-record replace: start from the cached record and apply flags
    let mut edited = current.clone();
    if let Some(name) = name {
        edited.name = name;
    }
    if let Some(email) = email {
        edited.email = email;
    }
    if let Some(phone) = phone {
        edited.phone = phone;
    }
    if let Some(address) = address {
        edited.address = address;
    }
    if let Some(category) = category {
        edited.category = category;
    }
    if touch {
        edited.last_contacted = Some(Utc::now());
    }

    ctx.contacts.update(&mut ctx.session, id, &edited);
    Ok(())
}

pub fn rm(id: &str, force: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let Some(contact) = ctx.contacts.get(id) else {
        output::error("Contact not found!");
        return Ok(());
    };

    if !force {
        let prompt = format!("Delete contact '{}'?", contact.name);
        if !dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
        {
            return Ok(());
        }
    }

    ctx.contacts.delete(&mut ctx.session, id);
    Ok(())
}

pub fn fav(id: &str) -> Result<()> {
    let mut ctx = get_context()?;
    ctx.contacts.toggle_favorite(&mut ctx.session, id);
    Ok(())
}

pub fn notes(id: &str, notes: &str) -> Result<()> {
    let mut ctx = get_context()?;
    ctx.contacts.update_notes(&mut ctx.session, id, notes);
    Ok(())
}
