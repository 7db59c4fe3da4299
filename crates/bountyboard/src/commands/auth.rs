//! Auth command - session management.

use anyhow::Result;
use bountyboard_auth::SessionProvider;
use bountyboard_client::LoginOutcome;
use bountyboard_types::Session;
use clap::{Args, Subcommand};
use console::style;
use serde_json::json;

use super::{Context, print_json};

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Log in with email and password
    Login {
        /// Account email
        email: String,

        /// Password (prompted for when omitted)
        #[arg(long, env = "BOUNTYBOARD_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Finish login with the code sent by email
    Verify {
        /// Account email
        email: String,
        /// Verification code
        code: String,
    },

    /// Finish login with an authenticator-app code
    Totp {
        /// Account email
        email: String,
        /// Six-digit code
        token: String,
    },

    /// Show the stored session
    Status,

    /// Log out and clear the stored session
    Logout,

    /// Fetch the current user from the backend
    Whoami,
}

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AuthCommand::Login { email, password } => cmd_login(&email, password, ctx).await,
        AuthCommand::Verify { email, code } => cmd_verify(&email, &code, ctx).await,
        AuthCommand::Totp { email, token } => cmd_totp(&email, &token, ctx).await,
        AuthCommand::Status => cmd_status(ctx),
        AuthCommand::Logout => cmd_logout(ctx).await,
        AuthCommand::Whoami => cmd_whoami(ctx).await,
    }
}

async fn cmd_login(email: &str, password: Option<String>, ctx: &Context) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ")?,
    };
    if password.is_empty() {
        anyhow::bail!("No password provided");
    }

    let client = ctx.client()?;
    let outcome = client.auth().login(email, &password).await?;

    match outcome {
        LoginOutcome::Authenticated(session) => report_session("Logged in", &session, ctx),
        LoginOutcome::VerificationRequired { email } => {
            if ctx.json_output {
                return print_json(&json!({ "status": "verification_required", "email": email }));
            }
            println!("A verification code was sent to {}.", style(&email).cyan());
            println!("Run 'bountyboard auth verify {} <code>' to finish.", email);
            Ok(())
        }
        LoginOutcome::TwoFactorRequired { email } => {
            if ctx.json_output {
                return print_json(&json!({ "status": "two_factor_required", "email": email }));
            }
            println!("Two-factor authentication is enabled for {}.", style(&email).cyan());
            println!("Run 'bountyboard auth totp {} <code>' to finish.", email);
            Ok(())
        }
    }
}

async fn cmd_verify(email: &str, code: &str, ctx: &Context) -> Result<()> {
    let session = ctx.client()?.auth().verify_code(email, code).await?;
    report_session("Email verified", &session, ctx)
}

async fn cmd_totp(email: &str, token: &str, ctx: &Context) -> Result<()> {
    let session = ctx.client()?.auth().verify_totp(email, token).await?;
    report_session("Two-factor code accepted", &session, ctx)
}

fn cmd_status(ctx: &Context) -> Result<()> {
    let session = ctx.session();
    let user = session.user();
    let authenticated = session.is_authenticated();

    if ctx.json_output {
        return print_json(&json!({
            "isAuthenticated": authenticated,
            "hasRefreshToken": session.refresh_token().is_some(),
            "user": user,
            "backend": ctx.backend_url,
        }));
    }

    println!("Authentication Status");
    println!("---------------------");
    if authenticated {
        println!("Session: {}", style("authenticated").green());
        if let Some(user) = &user {
            println!("  User: {}", user.display_name());
            if let Some(email) = &user.email {
                println!("  Email: {}", email);
            }
        }
        if let Some(token) = session.access_token() {
            println!("  Access token: {}", mask(&token));
        }
        let refresh = if session.refresh_token().is_some() {
            "stored"
        } else {
            "none"
        };
        println!("  Refresh token: {}", refresh);
    } else {
        println!("Session: {}", style("not authenticated").yellow());
        println!("  Run 'bountyboard auth login <email>' to log in");
    }
    println!("Backend: {}", ctx.backend_url);

    Ok(())
}

async fn cmd_logout(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let was_authenticated = client.session().is_authenticated();
    client.auth().logout().await?;

    if ctx.json_output {
        return print_json(&json!({ "loggedOut": was_authenticated }));
    }
    if was_authenticated {
        println!("Logged out.");
    } else {
        println!("No session found.");
    }
    Ok(())
}

async fn cmd_whoami(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    if !client.session().is_authenticated() {
        anyhow::bail!("Not logged in. Run 'bountyboard auth login <email>' first.");
    }

    let user = client.auth().me().await?;
    if ctx.json_output {
        return print_json(&user);
    }

    println!("{}", style(user.display_name()).bold());
    println!("  ID: {}", user.id);
    if let Some(email) = &user.email {
        println!("  Email: {}", email);
    }
    if let Some(role) = &user.role {
        println!("  Role: {}", role);
    }
    Ok(())
}

fn report_session(headline: &str, session: &Session, ctx: &Context) -> Result<()> {
    if ctx.json_output {
        return print_json(&json!({ "status": "authenticated", "user": session.user }));
    }

    println!("{}", style(headline).green().bold());
    match &session.user {
        Some(user) => println!("Signed in as {}", user.display_name()),
        None => println!("Session stored. Run 'bountyboard auth whoami' to load your profile."),
    }
    Ok(())
}

/// Show only the ends of a token.
fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}
