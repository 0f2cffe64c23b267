//! Admin user management commands.
//!
//! These talk to the configured database directly, so they work without a
//! running gateway and without a master key.

use anyhow::{Context, bail};
use rand::Rng;
use warden_core::{normalize_email, normalize_name};
use warden_gateway::UserStore;
use warden_gateway::auth::{NewUser, UserRole, hash_password};

use crate::ui;

/// Arguments for admin commands.
pub struct AdminArgs {
    /// The admin action to perform.
    pub action: AdminAction,
}

/// Admin actions.
pub enum AdminAction {
    /// Create a new user.
    Create {
        /// Display name.
        name: String,
        /// Email address.
        email: String,
        /// Explicit password.
        password: Option<String>,
        /// Generate a random password instead.
        generate_password: bool,
        /// Role name.
        role: String,
    },
    /// List all users.
    List,
    /// Delete a user by email.
    Delete {
        /// Email of the user.
        email: String,
    },
}

/// Run the admin command.
///
/// # Errors
///
/// Returns error if the operation fails.
pub async fn run_admin(args: AdminArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;

    let store = UserStore::connect(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to open user store")?;

    match args.action {
        AdminAction::Create {
            name,
            email,
            password,
            generate_password: gen_pwd,
            role,
        } => {
            create_user(&store, &name, &email, password, gen_pwd, &role).await?;
        }
        AdminAction::List => {
            list_users(&store).await?;
        }
        AdminAction::Delete { email } => {
            delete_user(&store, &email).await?;
        }
    }

    Ok(())
}

async fn create_user(
    store: &UserStore,
    name: &str,
    email: &str,
    password: Option<String>,
    gen_pwd: bool,
    role_str: &str,
) -> anyhow::Result<()> {
    let role: UserRole = role_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid role: {role_str}. Use: user or admin"))?;

    let name = normalize_name(name)?;
    let email = normalize_email(email)?;

    let password = match (password, gen_pwd) {
        (Some(_), true) => bail!("Use either --password or --generate-password, not both"),
        (Some(pwd), false) => pwd,
        (None, true) => {
            let pwd = generate_password(20);
            ui::success(&format!("Generated password: {pwd}"));
            pwd
        }
        (None, false) => ui::prompts::new_password("Password")?,
    };
    if password.is_empty() {
        bail!("Password must not be empty");
    }

    let user = store
        .create(&NewUser {
            name,
            email,
            password_hash: hash_password(&password)?,
            role,
        })
        .await
        .context("Failed to save user")?;
    tracing::info!(user_id = user.id, role = %user.role, "Created user from CLI");

    ui::success(&format!(
        "Created user '{}' (id {}) with role {}",
        user.email, user.id, user.role
    ));

    Ok(())
}

async fn list_users(store: &UserStore) -> anyhow::Result<()> {
    let users = store.list().await.context("Failed to list users")?;

    if users.is_empty() {
        ui::info("No users yet.");
        ui::info(
            "Run 'warden admin create --name Admin --email you@example.com --role admin --generate-password'",
        );
        return Ok(());
    }

    ui::info(&format!("Users ({}):", users.len()));
    println!();
    println!(
        "{:<6} {:<32} {:<20} {:<6} {:<20}",
        "ID", "EMAIL", "NAME", "ROLE", "CREATED"
    );
    println!("{}", "-".repeat(88));

    for user in users {
        let created = user.created_at.format("%Y-%m-%d %H:%M:%S");
        println!(
            "{:<6} {:<32} {:<20} {:<6} {:<20}",
            user.id, user.email, user.name, user.role, created
        );
    }

    Ok(())
}

async fn delete_user(store: &UserStore, email: &str) -> anyhow::Result<()> {
    let email = normalize_email(email)?;

    let user = store
        .get_by_email(&email)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User not found: {email}"))?;

    if !ui::prompts::confirm(&format!("Delete user '{}' (id {})?", user.email, user.id))? {
        ui::info("Cancelled");
        return Ok(());
    }

    store.delete(user.id).await?;
    tracing::info!(user_id = user.id, "Deleted user from CLI");
    ui::success(&format!("Deleted user '{email}'"));

    Ok(())
}

/// Random password from a mixed alphanumeric/symbol charset.
fn generate_password(length: usize) -> String {
    const CHARSET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
