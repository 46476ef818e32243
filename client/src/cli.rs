//! Command definitions and dispatch for the review CLI.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use reqwest::Url;

use client::app::{RegistryView, ReviewApp};
use client::config::ClientConfig;
use client::domain::{
    ActionChoice, EntryId, EntryKind, LoginRequest, ReviewFields, SectionId, ServiceNumber,
};
use client::outbound::{HttpAuthenticationService, HttpManualGateway, JsonFileCredentialStore};

/// Review client for the judicial bench-manual service.
#[derive(Debug, Parser)]
#[command(name = "review-cli", version, about)]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with a judicial service number.
    Login {
        /// Service number, for example PJ1001.
        #[arg(long)]
        pj: String,
        /// Secret, for deployments that require one.
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and clear persisted credentials.
    Logout,
    /// List manual sections.
    Sections {
        /// Use the administrator view.
        #[arg(long)]
        admin: bool,
    },
    /// Submit a four-field review against a section.
    Review {
        /// Target section id; defaults to the first unreviewed section.
        #[arg(long)]
        section: Option<String>,
        /// Recommended action: amend, clarify, retain, delete, no-comment.
        #[arg(long, default_value = "amend")]
        action: String,
        /// Rationale / justification text.
        #[arg(long)]
        rationale: String,
        /// Supporting references text.
        #[arg(long)]
        references: String,
        /// Proposed wording text.
        #[arg(long)]
        wording: String,
        /// Advance to the next section after a successful commit.
        #[arg(long)]
        advance: bool,
    },
    /// Edit section metadata (administrator).
    EditSection {
        /// Target section id.
        #[arg(long)]
        section: String,
        /// Replacement citation code.
        #[arg(long)]
        code: Option<String>,
        /// Replacement heading.
        #[arg(long)]
        title: Option<String>,
        /// Replacement manual part.
        #[arg(long)]
        part: Option<String>,
        /// Replacement provision text.
        #[arg(long)]
        content: Option<String>,
    },
    /// Strike a section from the registry (administrator).
    RemoveSection {
        /// Target section id.
        #[arg(long)]
        section: String,
    },
    /// Remove a single feedback entry (administrator).
    RemoveEntry {
        /// Target section id.
        #[arg(long)]
        section: String,
        /// Entry kind: comment, amendment, justification, reference, action.
        #[arg(long)]
        kind: String,
        /// Entry id.
        #[arg(long)]
        entry: String,
    },
    /// Download the aggregate PDF report (administrator).
    Report {
        /// Restrict the report to one reviewer id.
        #[arg(long)]
        user: Option<String>,
        /// Output directory; defaults to the configured report directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

type CliApp = ReviewApp<HttpAuthenticationService, HttpManualGateway, JsonFileCredentialStore>;

fn build_app(config: &ClientConfig) -> Result<CliApp> {
    let base = Url::parse(config.api_base_url()).wrap_err("invalid API base URL")?;
    let auth = HttpAuthenticationService::new(base.clone(), config.timeout())
        .wrap_err("failed to build authentication client")?;
    let gateway = HttpManualGateway::new(base, config.timeout())
        .wrap_err("failed to build manual gateway")?;
    let store = JsonFileCredentialStore::open(&config.credentials_dir())
        .wrap_err("failed to open credential store")?;
    Ok(ReviewApp::restore(
        Arc::new(auth),
        Arc::new(gateway),
        Arc::new(store),
        Arc::new(DefaultClock),
    ))
}

fn print_sections(app: &CliApp, view: RegistryView) {
    let Some(list) = app.sections(view) else {
        return;
    };
    for section in list.iter() {
        let counts: Vec<String> = EntryKind::ALL
            .iter()
            .map(|kind| format!("{kind}: {}", section.entry_count(*kind)))
            .collect();
        println!(
            "[{}] {} — {} ({})",
            section.code,
            section.title,
            section.part,
            counts.join(", ")
        );
    }
}

/// Dispatch one parsed command against a freshly restored application.
pub async fn run(cli: Cli, config: &ClientConfig) -> Result<()> {
    let mut app = build_app(config)?;

    match cli.command {
        Command::Login { pj, password } => {
            let mut request = LoginRequest::new(ServiceNumber::new(&pj)?);
            if let Some(secret) = &password {
                request = request.with_secret(secret)?;
            }
            let user = app
                .login(&request)
                .await
                .map_err(|err| eyre!(err.message))?;
            println!("Signed in as {} ({:?})", user.salutation(), user.role());
        }
        Command::Logout => {
            app.logout();
            println!("Signed out.");
        }
        Command::Sections { admin } => {
            if admin {
                app.load_sections_admin().await?;
                print_sections(&app, RegistryView::Administrator);
            } else {
                app.load_sections().await?;
                print_sections(&app, RegistryView::Standard);
            }
        }
        Command::Review {
            section,
            action,
            rationale,
            references,
            wording,
            advance,
        } => {
            app.load_sections().await?;
            let target = match section {
                Some(raw) => SectionId::new(raw)?,
                None => app
                    .active_section()
                    .cloned()
                    .ok_or_else(|| eyre!("no sections available for review"))?,
            };
            let fields = ReviewFields {
                action: action.parse::<ActionChoice>()?,
                rationale,
                references,
                wording,
            };
            let outcome = app.commit_review(&target, &fields, advance).await?;
            println!("Review committed against {}.", outcome.section);
            if let Some(next) = outcome.advanced_to {
                println!("Next section under review: {next}");
            }
        }
        Command::EditSection {
            section,
            code,
            title,
            part,
            content,
        } => {
            let patch = client::domain::ports::SectionPatch {
                code,
                title,
                part,
                content,
            };
            if patch.is_empty() {
                return Err(eyre!("nothing to change; pass at least one field"));
            }
            app.load_sections_admin().await?;
            app.edit_section(&SectionId::new(section)?, &patch).await?;
            println!("Section updated.");
        }
        Command::RemoveSection { section } => {
            app.load_sections_admin().await?;
            app.remove_section(&SectionId::new(section)?).await?;
            println!("Section struck from the registry.");
        }
        Command::RemoveEntry {
            section,
            kind,
            entry,
        } => {
            app.load_sections_admin().await?;
            app.remove_entry(
                &SectionId::new(section)?,
                kind.parse::<EntryKind>()?,
                &EntryId::new(entry)?,
            )
            .await?;
            println!("Entry removed.");
        }
        Command::Report { user, out } => {
            let for_user = match &user {
                Some(raw) => Some(client::domain::UserId::new(raw.clone())?),
                None => None,
            };
            let (filename, document) = app.download_report(for_user.as_ref()).await?;
            let dir = out.unwrap_or_else(|| config.report_dir());
            let path = dir.join(&filename);
            std::fs::write(&path, &document.bytes)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            println!("Report saved to {}.", path.display());
        }
    }
    Ok(())
}
