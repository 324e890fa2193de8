use std::sync::Arc;

use candidatures::candidatures::{
    Candidature, CandidatureError, CandidatureId, CandidatureStore, FilterMap,
};
use candidatures::config::{ApiConfig, AppConfig};
use candidatures::error::AppError;
use candidatures::format::{
    avatar_initials, format_currency, format_date, status_color, STATUSES,
};
use candidatures::http::ApiClient;
use candidatures::notifications::{NotificationKind, NotificationQueue};
use candidatures::telemetry;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "Candidatures console",
    about = "Browse and curate job applications from the command line",
    version
)]
struct Cli {
    /// Override the configured API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List candidatures, optionally filtered and sorted
    List(ListArgs),
    /// Show one candidature with its comments
    Show {
        /// Candidature id
        id: u64,
    },
    /// Change the status of a candidature
    SetStatus {
        /// Candidature id
        id: u64,
        /// New status, e.g. "Entretien RH"
        status: String,
    },
    /// Delete a candidature
    Delete {
        /// Candidature id
        id: u64,
    },
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    /// Free-text search across every field
    #[arg(long)]
    q: Option<String>,
    /// Keep candidatures with a competence containing this text
    #[arg(long)]
    skill: Option<String>,
    /// Sort as FIELD:DIRECTION, e.g. nom:asc
    #[arg(long)]
    sort: Option<String>,
    /// Server-side filter as KEY=VALUE (repeatable)
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
}

impl ListArgs {
    fn into_filters(self) -> FilterMap {
        let mut filters: FilterMap = self.filters.into_iter().collect();
        let reserved = [("q", self.q), ("skill", self.skill), ("sort", self.sort)];
        for (key, value) in reserved {
            if let Some(value) = value {
                filters.insert(key.to_string(), value);
            }
        }
        filters
    }
}

#[tokio::main]
async fn main() {
    let queue = NotificationQueue::new();
    let result = run_cli(&queue).await;

    if let Err(err) = &result {
        if !already_notified(err) {
            queue.report_unexpected(err);
        }
    }
    render_notifications(&queue);

    if result.is_err() {
        std::process::exit(1);
    }
}

async fn run_cli(queue: &NotificationQueue) -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(base_url) = cli.base_url {
        config.api = ApiConfig::new(base_url, config.api.timeout)?;
    }

    telemetry::init(&config.telemetry)?;
    info!(
        environment = ?config.environment,
        base_url = %config.api.base_url,
        "candidatures console ready"
    );

    let client = ApiClient::new(&config.api, Arc::new(queue.clone()))?;
    let store = CandidatureStore::new(client);

    match cli.command {
        Command::List(args) => {
            let filters = args.into_filters();
            store.fetch_all(Some(&filters)).await?;
            render_list(&store.data());
        }
        Command::Show { id } => match store.fetch_one(CandidatureId(id)).await? {
            Some(candidature) => render_detail(&candidature),
            None => println!("No candidature with id {id}"),
        },
        Command::SetStatus { id, status } => {
            if !is_standard_status(&status) {
                warn!(%status, known = ?STATUSES, "status is not one of the review statuses");
            }
            store.update_status(CandidatureId(id), &status).await?;
            queue.notify(
                format!("Status of candidature {id} set to {status}"),
                NotificationKind::Success,
            );
        }
        Command::Delete { id } => {
            store.delete_candidature(CandidatureId(id)).await?;
            queue.notify(
                format!("Candidature {id} deleted"),
                NotificationKind::Success,
            );
        }
    }

    Ok(())
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("filter key is empty in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn is_standard_status(status: &str) -> bool {
    let normalized = status.trim().to_lowercase();
    STATUSES
        .iter()
        .any(|known| known.to_lowercase() == normalized)
}

/// HTTP status failures were already posted by the client.
fn already_notified(err: &AppError) -> bool {
    matches!(
        err,
        AppError::Candidature(CandidatureError { cause: Some(cause), .. })
            if cause.status().is_some()
    )
}

fn render_list(candidatures: &[Candidature]) {
    if candidatures.is_empty() {
        println!("No candidatures match.");
        return;
    }

    println!("{} candidature(s)", candidatures.len());
    for candidature in candidatures {
        println!(
            "- [{}] #{} {} | {} | {} ({}) | {} | {}",
            avatar_initials(&candidature.nom),
            candidature.id,
            candidature.nom,
            candidature.poste,
            candidature.statut,
            status_color(&candidature.statut),
            display_date(&candidature.date_candidature),
            candidature.competences.join(", ")
        );
    }
}

fn render_detail(candidature: &Candidature) {
    println!(
        "[{}] {} (#{})",
        avatar_initials(&candidature.nom),
        candidature.nom,
        candidature.id
    );
    println!("Poste: {}", candidature.poste);
    println!(
        "Statut: {} ({})",
        candidature.statut,
        status_color(&candidature.statut)
    );
    println!(
        "Candidature du {}",
        display_date(&candidature.date_candidature)
    );
    println!("Expérience: {}", candidature.experience);
    println!("Compétences: {}", candidature.competences.join(", "));
    println!(
        "Salaire souhaité: {}",
        format_currency(candidature.salaire_souhaite)
    );
    println!("Disponibilité: {}", candidature.disponibilite);
    println!("Localisation: {}", candidature.localisation);
    println!("Contact: {} / {}", candidature.email, candidature.telephone);
    println!("CV: {}", candidature.cv);

    if !candidature.lettre_motivation.is_empty() {
        println!("\nLettre de motivation\n{}", candidature.lettre_motivation);
    }

    if candidature.commentaires.is_empty() {
        println!("\nCommentaires: aucun");
    } else {
        println!("\nCommentaires");
        for commentaire in &candidature.commentaires {
            println!(
                "- {} ({}): {}",
                commentaire.auteur,
                display_date(&commentaire.date),
                commentaire.contenu
            );
        }
    }
}

fn render_notifications(queue: &NotificationQueue) {
    for notification in queue.snapshot() {
        eprintln!("[{}] {}", notification.kind.label(), notification.message);
    }
}

fn display_date(raw: &str) -> String {
    format_date(raw).unwrap_or_else(|| raw.to_string())
}
