//! Roster Demo
//!
//! Plans the team for one worship service using the in-memory directory and
//! store: hydrate, pick a leader, fill the singer list, reorder it, save.
//!
//! Pass a TOML file path as the first argument to use a custom role
//! configuration; `RUST_LOG` controls log output.

use colored::*;
use roster_runtime::{
    AssignmentEditor, AssignmentStore, InMemoryAssignmentStore, InMemoryDirectory, RosterConfig,
    SaveOutcome,
};
use roster_types::{AssignmentRecord, AssignmentSet, ContextId, Member, MemberId, RoleName};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => RosterConfig::load(path)?,
        None => RosterConfig::default(),
    };
    let catalog = config.into_catalog()?;

    let directory = InMemoryDirectory::with_members(vec![
        Member::new("u1", "Anna Lee", "anna@church.org"),
        Member::new("u2", "Ben Okafor", "ben@church.org"),
        Member::new("u3", "Cara Diaz", "cara@church.org"),
        Member::new("u4", "Dan Moore", "dan@church.org"),
        Member::new("u5", "Eve Park", "eve@church.org"),
    ]);
    let store = InMemoryAssignmentStore::new();
    let context = ContextId::new("sunday-service");

    // What the server already holds for this service
    store
        .save_assignments(
            &context,
            vec![
                AssignmentRecord::new("u1", "worship_leader"),
                AssignmentRecord::new("u2", "singer").with_order(1),
                AssignmentRecord::new("u3", "usher"),
            ],
        )
        .await?;

    let mut editor = AssignmentEditor::new(context, &catalog);
    editor.reload(&store).await?;
    print_set("Loaded from server", editor.assignments());

    let candidates = editor.load_candidates(&directory, "").await;
    if let Some(error) = &candidates.error {
        println!("{} {}", "Directory unavailable:".red(), error);
    }

    // Hand worship leading to Ben; he leaves the singer list
    editor.open_selection(RoleName::new("worship_leader"))?;
    editor.toggle(&MemberId::new("u1"))?;
    editor.toggle(&MemberId::new("u2"))?;
    let outcome = editor.commit_selection(|_, diff| {
        println!("{} {} change(s)", "Owner notified:".cyan(), diff.len());
    })?;
    for displaced in &outcome.displaced {
        println!(
            "{} {} no longer {}",
            "Moved:".yellow(),
            displaced.member_id,
            displaced.role
        );
    }

    // Fill the singer list from everyone whose name matches "a"
    let singer = RoleName::new("singer");
    let visible: Vec<Member> = editor
        .eligible_candidates(&singer, &candidates.members)
        .into_iter()
        .filter(|m| m.matches("a"))
        .cloned()
        .collect();
    editor.open_selection(singer.clone())?;
    editor.select_all(&visible)?;
    let outcome = editor.commit_selection(|_, _| {})?;
    for rejected in &outcome.rejected {
        println!(
            "{} {} {}",
            "Skipped:".yellow(),
            rejected.member_id,
            rejected.reason
        );
    }

    // Drag the last singer to the top
    if let Some(last) = editor.assignments().members_of(&singer).last().cloned() {
        editor.reorder(&singer, &last, 0, |_, _| {})?;
    }
    print_set("After editing", editor.assignments());

    match editor.save(&store).await? {
        SaveOutcome::Saved { records } => {
            println!("{} {} record(s)", "Saved".green().bold(), records)
        }
        SaveOutcome::Unchanged => println!("{}", "Nothing to save".green()),
    }

    Ok(())
}

fn print_set(title: &str, set: &AssignmentSet) {
    println!();
    println!("{}", title.bold());
    for role in set.role_names() {
        let entries: Vec<String> = set
            .entries(&role)
            .iter()
            .map(|a| match a.order {
                Some(order) => format!("{}.{}", order, a.member_id),
                None => a.member_id.to_string(),
            })
            .collect();
        println!("  {:<16} {}", role.to_string().cyan(), entries.join(", "));
    }
}
