//! Authentication commands - signup, login, logout, whoami, profile

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

fn read_password(flag: Option<String>) -> Result<String> {
    match flag {
        Some(password) => Ok(password),
        None => Ok(dialoguer::Password::new()
            .with_prompt("Password")
            .interact()?),
    }
}

pub fn signup(email: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password)?;
    let mut ctx = get_context()?;
    ctx.session.signup(email, &password);
    Ok(())
}

pub fn login(email: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password)?;
    let mut ctx = get_context()?;
    if ctx.login(email, &password) {
        output::info(&format!("{} contacts loaded.", ctx.contacts.contacts().len()));
    }
    Ok(())
}

pub fn logout() -> Result<()> {
    let mut ctx = get_context()?;
    ctx.logout();
    Ok(())
}

pub fn whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    match ctx.session.user() {
        Some(user) => {
            if json {
                println!("{}", serde_json::to_string_pretty(user)?);
                return Ok(());
            }
            println!("{}", user.name.bold());
            println!("  email: {}", user.email);
            if let Some(avatar) = &user.avatar_url {
                println!("  avatar: {}", avatar);
            }
        }
        None => output::info("Not logged in."),
    }
    Ok(())
}

pub fn profile(name: &str, avatar: Option<PathBuf>) -> Result<()> {
    let mut ctx = get_context()?;
    ctx.session.update_profile(name, avatar.as_deref());
    Ok(())
}
