//! CLI commands

use anyhow::{Context as _, Result};
use clap::Subcommand;
use portal_core::{ClientConfig, FileStorage, SessionStore, admin_guard, guest_guard};
use portal_http::types::{ApplicationStatus, CompanyData, ReviewAction};
use portal_http::{Envelope, Outcome, PortalClient, PortalService};
use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use std::path::PathBuf;
use tracing::info;

/// Everything a command needs: the service over a file-backed session and
/// the output mode
pub struct Context {
    service: PortalService,
    session_file: PathBuf,
    json: bool,
}

impl Context {
    pub fn new(config: &ClientConfig, data_dir: PathBuf, json: bool) -> Result<Self> {
        let storage = FileStorage::in_dir(&data_dir);
        let session_file = storage.path().to_path_buf();
        let client = PortalClient::from_config(config, SessionStore::new(storage))
            .with_context(|| format!("Invalid API base URL '{}'", config.api_base_url))?;

        Ok(Self {
            service: PortalService::new(client),
            session_file,
            json,
        })
    }

    /// Print an outcome and report whether it succeeded.
    ///
    /// With `--json` the envelope is printed as is. Otherwise data goes to
    /// stdout (through `summary` when it has something to say) and the
    /// error message to stderr.
    fn report<T: Serialize>(
        &self,
        outcome: Outcome<T>,
        summary: impl FnOnce(&T) -> Option<String>,
    ) -> Result<bool> {
        if self.json {
            let envelope = Envelope::from(outcome);
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            return Ok(!envelope.is_error());
        }

        match outcome {
            Ok(data) => {
                match summary(&data) {
                    Some(line) => println!("{line}"),
                    None => println!("{}", serde_json::to_string_pretty(&data)?),
                }
                Ok(true)
            }
            Err(message) => {
                eprintln!("Error: {message}");
                Ok(false)
            }
        }
    }

    fn print<T: Serialize>(&self, outcome: Outcome<T>) -> Result<bool> {
        self.report(outcome, |_| None)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and sign in
    Register {
        username: String,
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign in and store the session
    Login {
        username: String,
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Use the cached profile instead of asking the server
        #[arg(long)]
        local: bool,
    },

    /// Show the local session and what each route guard would decide
    Status,

    /// Password recovery
    Password {
        #[command(subcommand)]
        command: PasswordCommands,
    },

    /// Supplier applications
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },

    /// Admin review
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Onboarding chatbot
    Chat {
        #[command(subcommand)]
        command: ChatCommands,
    },

    /// GET an arbitrary API path
    Get { path: String },

    /// POST a JSON body to an arbitrary API path
    Post {
        path: String,
        /// Request body as JSON
        body: String,
    },
}

#[derive(Subcommand)]
pub enum PasswordCommands {
    /// Ask for a reset email
    Forgot { email: String },

    /// Set a new password with the emailed token
    Reset {
        token: String,
        #[arg(long, env = "PORTAL_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
}

#[derive(Subcommand)]
pub enum CompanyCommands {
    /// Submit an application
    Create {
        /// Unified business number
        #[arg(long = "id")]
        company_id: String,
        #[arg(long = "name")]
        company_name: String,
        /// Person in charge
        #[arg(long = "head")]
        company_head: String,
        #[arg(long = "email")]
        company_email: String,
        #[arg(long = "link")]
        company_link: Option<String>,
    },

    /// Show your own application
    Mine,

    /// Show one application
    Show { company_id: String },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// List applications
    Applications {
        /// Only show applications in this state (pending, approved, rejected)
        #[arg(long)]
        status: Option<ApplicationStatus>,
    },

    /// Approve or reject an application
    Review {
        company_id: String,
        #[command(subcommand)]
        decision: ReviewCommands,
    },

    /// Application counts by status
    Stats,
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    Approve,
    Reject {
        #[arg(long)]
        reason: String,
    },
}

#[derive(Subcommand)]
pub enum ChatCommands {
    /// Send a message, optionally continuing a session
    Send {
        message: String,
        #[arg(long)]
        session: Option<i64>,
    },

    /// List chat sessions
    Sessions,

    /// Messages of one session
    Messages { session_id: i64 },

    /// Onboarding data collected in one session
    Data { session_id: i64 },

    /// Export onboarding data
    Export {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        session_id: Option<i64>,
        /// Export every session
        #[arg(long)]
        all: bool,
    },
}

impl Commands {
    /// Run the command. `Ok(false)` means the API reported an error, which
    /// has already been printed.
    pub async fn execute(self, ctx: &Context) -> Result<bool> {
        let service = &ctx.service;
        match self {
            Self::Register {
                username,
                email,
                password,
            } => ctx.report(service.register(username, email, password).await, |token| {
                Some(format!(
                    "Registered and signed in as {} ({})",
                    token.user.username, token.user.role
                ))
            }),
            Self::Login { username, password } => {
                ctx.report(service.login(username, password).await, |token| {
                    Some(format!(
                        "Signed in as {} ({})",
                        token.user.username, token.user.role
                    ))
                })
            }
            Self::Logout => {
                service.logout();
                info!(path = %ctx.session_file.display(), "Session cleared");
                ctx.report(Ok(json!({ "logged_out": true })), |_| {
                    Some("Signed out".to_string())
                })
            }
            Self::Whoami { local } => {
                let outcome = if local {
                    service.stored_user().ok_or_else(|| "Not logged in".to_string())
                } else {
                    service.current_user().await
                };
                ctx.report(outcome, |user| {
                    Some(format!("{} <{}> ({})", user.username, user.email, user.role))
                })
            }
            Self::Status => ctx.print(Ok(status(ctx))),
            Self::Password { command } => command.execute(ctx).await,
            Self::Company { command } => command.execute(ctx).await,
            Self::Admin { command } => command.execute(ctx).await,
            Self::Chat { command } => command.execute(ctx).await,
            Self::Get { path } => ctx.print(service.get(&path).await),
            Self::Post { path, body } => {
                let body: JsonValue =
                    serde_json::from_str(&body).with_context(|| "Request body is not valid JSON")?;
                ctx.print(service.post(&path, &body).await)
            }
        }
    }
}

fn status(ctx: &Context) -> JsonValue {
    let session = ctx.service.session();
    json!({
        "session_file": ctx.session_file,
        "api_base_url": ctx.service.client().base_url(),
        "authenticated": session.is_authenticated(),
        "admin": session.is_admin(),
        "user": session.user(),
        "admin_guard": admin_guard(session),
        "guest_guard": guest_guard(session),
    })
}

impl PasswordCommands {
    pub async fn execute(self, ctx: &Context) -> Result<bool> {
        let service = &ctx.service;
        match self {
            Self::Forgot { email } => ctx.report(service.forgot_password(email).await, |r| {
                Some(r.message.clone())
            }),
            Self::Reset {
                token,
                new_password,
            } => ctx.report(service.reset_password(token, new_password).await, |r| {
                Some(r.message.clone())
            }),
        }
    }
}

impl CompanyCommands {
    pub async fn execute(self, ctx: &Context) -> Result<bool> {
        let service = &ctx.service;
        match self {
            Self::Create {
                company_id,
                company_name,
                company_head,
                company_email,
                company_link,
            } => {
                let data = CompanyData {
                    company_id,
                    company_name,
                    company_head,
                    company_email,
                    company_link,
                };
                ctx.report(service.create_company(&data).await, |company| {
                    Some(format!(
                        "Submitted application {} ({})",
                        company.company_id, company.status
                    ))
                })
            }
            Self::Mine => ctx.print(service.my_application().await),
            Self::Show { company_id } => ctx.print(service.company(&company_id).await),
        }
    }
}

impl AdminCommands {
    pub async fn execute(self, ctx: &Context) -> Result<bool> {
        let service = &ctx.service;
        match self {
            Self::Applications { status } => ctx.print(service.applications(status).await),
            Self::Review {
                company_id,
                decision,
            } => {
                let review = match decision {
                    ReviewCommands::Approve => ReviewAction::approve(),
                    ReviewCommands::Reject { reason } => ReviewAction::reject(reason),
                };
                ctx.report(
                    service.review_application(&company_id, &review).await,
                    |company| Some(format!("{} is now {}", company.company_id, company.status)),
                )
            }
            Self::Stats => ctx.print(service.admin_stats().await),
        }
    }
}

impl ChatCommands {
    pub async fn execute(self, ctx: &Context) -> Result<bool> {
        let service = &ctx.service;
        match self {
            Self::Send { message, session } => {
                ctx.print(service.send_chat_message(message, session).await)
            }
            Self::Sessions => ctx.print(service.chat_sessions().await),
            Self::Messages { session_id } => ctx.print(service.chat_messages(session_id).await),
            Self::Data { session_id } => ctx.print(service.onboarding_data(session_id).await),
            Self::Export { session_id, all } => match session_id {
                Some(id) if !all => ctx.print(service.export_onboarding_data(id).await),
                _ => ctx.print(service.export_all_onboarding_data().await),
            },
        }
    }
}
